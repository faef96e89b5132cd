use std::fmt;

use crate::component::ComponentError;

pub type AppResult<T> = Result<T, AppError>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppError {
    NoApp { app_name: String },
    BadAppName { app_name: String },
    DuplicateApp { app_name: String },
    AppDeleted { app_name: String },
    ComponentFailure { component: String, message: String },
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::NoApp { app_name } => {
                write!(
                    f,
                    "No app '{app_name}' has been created - call initialize_app() first"
                )
            }
            AppError::BadAppName { app_name } => {
                write!(f, "Illegal app name: '{app_name}'")
            }
            AppError::DuplicateApp { app_name } => {
                write!(f, "App named '{app_name}' already exists")
            }
            AppError::AppDeleted { app_name } => {
                write!(f, "App named '{app_name}' already deleted")
            }
            AppError::ComponentFailure { component, message } => {
                write!(f, "Component {component} error: {message}")
            }
        }
    }
}

impl std::error::Error for AppError {}

impl From<ComponentError> for AppError {
    fn from(err: ComponentError) -> Self {
        match err {
            ComponentError::MismatchingComponent { expected, found } => AppError::ComponentFailure {
                component: found,
                message: format!("does not satisfy provider for {expected}"),
            },
            ComponentError::ComponentAlreadyProvided { name } => AppError::ComponentFailure {
                component: name,
                message: "component already provided".to_string(),
            },
            ComponentError::InstanceAlreadyInitialized { name } => AppError::ComponentFailure {
                component: name,
                message: "instance already initialized".to_string(),
            },
            ComponentError::InitializationFailed { name, reason } => AppError::ComponentFailure {
                component: name,
                message: reason,
            },
            ComponentError::InstanceUnavailable { name } => AppError::ComponentFailure {
                component: name,
                message: "instance unavailable".to_string(),
            },
        }
    }
}
