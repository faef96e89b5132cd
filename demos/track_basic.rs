//! Minimal tracking example that records measurements against the
//! in-memory backend. Swap [`MemoryBackend`] for a production adapter to
//! report real data.

use std::collections::BTreeMap;
use std::sync::Arc;

use audimeter_rs_sdk::app::{initialize_app, AppSettings};
use audimeter_rs_sdk::tracker::{get_tracker, MemoryBackend, TrackerConfig};

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let app = initialize_app(Some(AppSettings::default()))?;
    let tracker = get_tracker(Some(app))?;

    let backend = Arc::new(MemoryBackend::new());
    tracker.set_backend(backend.clone());

    let mut config = BTreeMap::new();
    config.insert("publisherId".to_string(), "20634243".to_string());
    config.insert("applicationName".to_string(), "NewsReader".to_string());
    config.insert("userConsent".to_string(), "1".to_string());
    tracker.initialize(TrackerConfig::from_map(&config))?;

    tracker.track_view("/home/feed").await?;
    tracker.track_event("click", "button").await?;

    for event in tracker.recorded_events() {
        println!("Recorded event: {:?} {:?}", event.kind, event.labels);
    }
    println!("Backend state: {:#?}", backend.snapshot());

    Ok(())
}
