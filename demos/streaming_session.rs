//! Drives one streaming measurement session end to end against the
//! in-memory streaming backend.

use std::sync::Arc;

use audimeter_rs_sdk::app::{initialize_app, AppSettings};
use audimeter_rs_sdk::streaming::{ContentMetadata, MediaType, MemoryStreamingBackend};
use audimeter_rs_sdk::tracker::{get_tracker, TrackerConfig};

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let app = initialize_app(Some(AppSettings::default()))?;
    let tracker = get_tracker(Some(app))?;

    let streaming_backend = Arc::new(MemoryStreamingBackend::new());
    tracker.set_streaming_backend(streaming_backend.clone());

    let metadata = ContentMetadata::new()
        .with_media_type(MediaType::LongFormOnDemand)
        .with_unique_id("ep-001")
        .with_length(1_800_000)
        .with_program_title("Morning Show");

    let connector = tracker.initialize_streaming(
        1,
        TrackerConfig::new()
            .with_publisher_id("20634243")
            .with_application_name("NewsReader"),
        metadata,
    )?;

    connector.notify_play().await?;
    connector.start_from_position(30_000).await?;
    connector.notify_pause().await?;
    connector.notify_end().await?;

    println!("Session {} finished", connector.session_id());
    for (tag, event) in streaming_backend.snapshot().events {
        println!("connector {tag}: {event:?}");
    }

    tracker.destroy_streaming(1);
    Ok(())
}
