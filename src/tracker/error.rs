use std::fmt::{Display, Formatter};

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TrackerErrorCode {
    InvalidArgument,
    Uninitialized,
    BackendStart,
    Internal,
}

impl TrackerErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            TrackerErrorCode::InvalidArgument => "tracker/invalid-argument",
            TrackerErrorCode::Uninitialized => "tracker/uninitialized",
            TrackerErrorCode::BackendStart => "tracker/backend-start",
            TrackerErrorCode::Internal => "tracker/internal",
        }
    }
}

#[derive(Clone, Debug)]
pub struct TrackerError {
    pub code: TrackerErrorCode,
    message: String,
}

impl TrackerError {
    pub fn new(code: TrackerErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    pub fn code_str(&self) -> &'static str {
        self.code.as_str()
    }
}

impl Display for TrackerError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.message, self.code_str())
    }
}

impl std::error::Error for TrackerError {}

pub type TrackerResult<T> = Result<T, TrackerError>;

pub fn invalid_argument(message: impl Into<String>) -> TrackerError {
    TrackerError::new(TrackerErrorCode::InvalidArgument, message)
}

pub fn uninitialized(message: impl Into<String>) -> TrackerError {
    TrackerError::new(TrackerErrorCode::Uninitialized, message)
}

pub fn backend_start(message: impl Into<String>) -> TrackerError {
    TrackerError::new(TrackerErrorCode::BackendStart, message)
}

pub fn internal_error(message: impl Into<String>) -> TrackerError {
    TrackerError::new(TrackerErrorCode::Internal, message)
}
