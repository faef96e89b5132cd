use std::sync::LazyLock;

pub use crate::logger::{LogLevel, Logger};

pub static LOGGER: LazyLock<Logger> = LazyLock::new(|| Logger::new("audimeter/app"));
