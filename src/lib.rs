//! Embeddable audience-measurement SDK.
//!
//! The crate exposes a small tracking facade ([`tracker::Tracker`]) that a
//! host application initializes once and then drives with view and event
//! tracking calls. All vendor interaction goes through injectable backend
//! traits, so the actual measurement backend can be a production adapter, a
//! no-op stub or an in-memory recorder for tests.
//!
//! ```no_run
//! use std::collections::BTreeMap;
//!
//! use audimeter_rs_sdk::app::{initialize_app, AppSettings};
//! use audimeter_rs_sdk::tracker::{get_tracker, TrackerConfig};
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let app = initialize_app(Some(AppSettings::default()))?;
//! let tracker = get_tracker(Some(app))?;
//!
//! let mut config = BTreeMap::new();
//! config.insert("publisherId".to_string(), "20634243".to_string());
//! config.insert("applicationName".to_string(), "NewsReader".to_string());
//! tracker.initialize(TrackerConfig::from_map(&config))?;
//!
//! tracker.track_view("/home/feed").await?;
//! tracker.track_event("click", "button").await?;
//! # Ok(())
//! # }
//! ```

pub mod app;
pub mod component;
pub mod logger;
pub mod streaming;
pub mod tracker;
