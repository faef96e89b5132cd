//! Host application handles and the global app registry.
//!
//! Tracking services do not float free: each one is attached to a named
//! [`App`] through the component container, and the `App` value doubles as
//! the host application context a backend is started against.

mod api;
mod constants;
mod errors;
mod logger;
pub(crate) mod registry;
mod types;

#[doc(inline)]
pub use api::{delete_app, get_app, get_apps, initialize_app, set_log_level, SDK_VERSION};

#[doc(inline)]
pub use constants::DEFAULT_ENTRY_NAME;

#[doc(inline)]
pub use errors::{AppError, AppResult};

#[doc(inline)]
pub use types::{App, AppSettings};

#[allow(unused_imports)]
pub(crate) use logger::LOGGER;
