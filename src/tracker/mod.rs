//! The tracking facade and its backend capability boundary.

mod api;
mod backend;
mod config;
pub mod error;

pub use api::{get_tracker, register_tracker_component, TrackedEvent, Tracker};
pub use backend::{
    Backend, BackendState, MemoryBackend, NoopBackend, NotificationKind, PublisherConfig,
};
pub use config::{TrackerConfig, UsagePropertiesAutoUpdateMode, UserConsent};
