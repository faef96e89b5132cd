use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::streaming::metadata::ContentMetadata;
use crate::tracker::TrackerConfig;
use crate::tracker::error::TrackerResult;

/// One playback lifecycle signal forwarded to the streaming backend.
#[derive(Clone, Debug, PartialEq)]
pub enum PlaybackEvent {
    SessionCreated { session_id: String },
    MetadataUpdated(Box<ContentMetadata>),
    PersistentLabelSet { name: String, value: String },
    PersistentLabelsSet { labels: BTreeMap<String, String> },
    Play,
    Pause,
    End,
    BufferStart,
    BufferStop,
    SeekStart,
    StartFromPosition { position_ms: i64 },
    StartFromDvrWindowOffset { offset_ms: i64 },
    DvrWindowLength { length_ms: i64 },
    PlaybackRateChanged { rate: f32 },
}

/// Capability boundary to the vendor's streaming analytics. `configure`
/// runs once per connector; every later signal arrives as one typed
/// [`PlaybackEvent`] together with the connector tag.
#[async_trait]
pub trait StreamingBackend: Send + Sync {
    fn configure(&self, config: &TrackerConfig, metadata: &ContentMetadata) -> TrackerResult<()>;

    async fn notify(&self, tag: i32, event: PlaybackEvent) -> TrackerResult<()>;
}

/// Streaming backend that accepts every call and does nothing.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopStreamingBackend;

#[async_trait]
impl StreamingBackend for NoopStreamingBackend {
    fn configure(&self, _config: &TrackerConfig, _metadata: &ContentMetadata) -> TrackerResult<()> {
        Ok(())
    }

    async fn notify(&self, _tag: i32, _event: PlaybackEvent) -> TrackerResult<()> {
        Ok(())
    }
}

/// Snapshot of everything a [`MemoryStreamingBackend`] has seen.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct StreamingBackendState {
    pub configured: Vec<(TrackerConfig, ContentMetadata)>,
    pub events: Vec<(i32, PlaybackEvent)>,
}

/// Streaming backend that records configuration and events for inspection.
#[derive(Debug, Default)]
pub struct MemoryStreamingBackend {
    state: Mutex<StreamingBackendState>,
}

impl MemoryStreamingBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn snapshot(&self) -> StreamingBackendState {
        self.state.lock().unwrap().clone()
    }

    pub fn reset(&self) {
        *self.state.lock().unwrap() = StreamingBackendState::default();
    }
}

#[async_trait]
impl StreamingBackend for MemoryStreamingBackend {
    fn configure(&self, config: &TrackerConfig, metadata: &ContentMetadata) -> TrackerResult<()> {
        self.state
            .lock()
            .unwrap()
            .configured
            .push((config.clone(), metadata.clone()));
        Ok(())
    }

    async fn notify(&self, tag: i32, event: PlaybackEvent) -> TrackerResult<()> {
        self.state.lock().unwrap().events.push((tag, event));
        Ok(())
    }
}

/// Inspectable state of one streaming connector.
#[derive(Clone, Debug, PartialEq)]
pub struct ConnectorState {
    pub tag: i32,
    pub session_id: String,
    pub config: TrackerConfig,
    pub metadata: ContentMetadata,
    pub persistent_labels: BTreeMap<String, String>,
}

/// Handle to one streaming measurement session, keyed by an integer tag on
/// the owning tracker (one connector per player instance).
///
/// The connector keeps the last metadata and persistent labels it was given
/// so the host can introspect them; the vendor-facing effect of every call
/// is a [`PlaybackEvent`] handed to the [`StreamingBackend`].
#[derive(Clone)]
pub struct StreamingConnector {
    inner: Arc<ConnectorInner>,
}

struct ConnectorInner {
    tag: i32,
    backend: Arc<dyn StreamingBackend>,
    config: TrackerConfig,
    metadata: Mutex<ContentMetadata>,
    persistent_labels: Mutex<BTreeMap<String, String>>,
    session_id: Mutex<String>,
}

impl StreamingConnector {
    pub(crate) fn new(
        tag: i32,
        config: TrackerConfig,
        metadata: ContentMetadata,
        backend: Arc<dyn StreamingBackend>,
    ) -> TrackerResult<Self> {
        backend.configure(&config, &metadata)?;
        Ok(Self {
            inner: Arc::new(ConnectorInner {
                tag,
                backend,
                config,
                metadata: Mutex::new(metadata),
                persistent_labels: Mutex::new(BTreeMap::new()),
                session_id: Mutex::new(generate_session_id()),
            }),
        })
    }

    pub fn tag(&self) -> i32 {
        self.inner.tag
    }

    pub fn session_id(&self) -> String {
        self.inner.session_id.lock().unwrap().clone()
    }

    pub fn snapshot(&self) -> ConnectorState {
        ConnectorState {
            tag: self.inner.tag,
            session_id: self.session_id(),
            config: self.inner.config.clone(),
            metadata: self.inner.metadata.lock().unwrap().clone(),
            persistent_labels: self.inner.persistent_labels.lock().unwrap().clone(),
        }
    }

    /// Starts a fresh playback session: a new session id is generated and
    /// announced to the backend.
    pub async fn create_playback_session(&self) -> TrackerResult<()> {
        let session_id = generate_session_id();
        *self.inner.session_id.lock().unwrap() = session_id.clone();
        self.notify(PlaybackEvent::SessionCreated { session_id }).await
    }

    pub async fn update(&self, metadata: ContentMetadata) -> TrackerResult<()> {
        *self.inner.metadata.lock().unwrap() = metadata.clone();
        self.notify(PlaybackEvent::MetadataUpdated(Box::new(metadata)))
            .await
    }

    pub async fn set_persistent_label(
        &self,
        name: impl Into<String>,
        value: impl Into<String>,
    ) -> TrackerResult<()> {
        let name = name.into();
        let value = value.into();
        self.inner
            .persistent_labels
            .lock()
            .unwrap()
            .insert(name.clone(), value.clone());
        self.notify(PlaybackEvent::PersistentLabelSet { name, value })
            .await
    }

    pub async fn set_persistent_labels(
        &self,
        labels: BTreeMap<String, String>,
    ) -> TrackerResult<()> {
        self.inner
            .persistent_labels
            .lock()
            .unwrap()
            .extend(labels.clone());
        self.notify(PlaybackEvent::PersistentLabelsSet { labels })
            .await
    }

    pub async fn notify_play(&self) -> TrackerResult<()> {
        self.notify(PlaybackEvent::Play).await
    }

    pub async fn notify_pause(&self) -> TrackerResult<()> {
        self.notify(PlaybackEvent::Pause).await
    }

    pub async fn notify_end(&self) -> TrackerResult<()> {
        self.notify(PlaybackEvent::End).await
    }

    pub async fn notify_buffer_start(&self) -> TrackerResult<()> {
        self.notify(PlaybackEvent::BufferStart).await
    }

    pub async fn notify_buffer_stop(&self) -> TrackerResult<()> {
        self.notify(PlaybackEvent::BufferStop).await
    }

    pub async fn notify_seek_start(&self) -> TrackerResult<()> {
        self.notify(PlaybackEvent::SeekStart).await
    }

    pub async fn start_from_position(&self, position_ms: i64) -> TrackerResult<()> {
        self.notify(PlaybackEvent::StartFromPosition { position_ms })
            .await
    }

    pub async fn start_from_dvr_window_offset(&self, offset_ms: i64) -> TrackerResult<()> {
        self.notify(PlaybackEvent::StartFromDvrWindowOffset { offset_ms })
            .await
    }

    pub async fn set_dvr_window_length(&self, length_ms: i64) -> TrackerResult<()> {
        self.notify(PlaybackEvent::DvrWindowLength { length_ms })
            .await
    }

    pub async fn notify_change_playback_rate(&self, rate: f32) -> TrackerResult<()> {
        self.notify(PlaybackEvent::PlaybackRateChanged { rate })
            .await
    }

    async fn notify(&self, event: PlaybackEvent) -> TrackerResult<()> {
        self.inner.backend.notify(self.inner.tag, event).await
    }
}

impl std::fmt::Debug for StreamingConnector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StreamingConnector")
            .field("tag", &self.inner.tag)
            .finish()
    }
}

fn generate_session_id() -> String {
    use rand::distributions::Alphanumeric;
    use rand::Rng;

    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .map(char::from)
        .take(32)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::streaming::metadata::MediaType;

    fn test_config() -> TrackerConfig {
        TrackerConfig::new()
            .with_publisher_id("20634243")
            .with_application_name("NewsReader")
    }

    fn test_metadata() -> ContentMetadata {
        ContentMetadata::new()
            .with_media_type(MediaType::Live)
            .with_unique_id("live-1")
    }

    fn connector_with_memory_backend() -> (StreamingConnector, Arc<MemoryStreamingBackend>) {
        let backend = Arc::new(MemoryStreamingBackend::new());
        let connector =
            StreamingConnector::new(7, test_config(), test_metadata(), backend.clone())
                .expect("connector");
        (connector, backend)
    }

    #[test]
    fn new_configures_backend_once() {
        let (_connector, backend) = connector_with_memory_backend();
        let state = backend.snapshot();
        assert_eq!(state.configured.len(), 1);
        assert_eq!(state.configured[0].0, test_config());
        assert_eq!(state.configured[0].1, test_metadata());
        assert!(state.events.is_empty());
    }

    #[tokio::test(flavor = "current_thread")]
    async fn playback_notifications_forward_in_call_order() {
        let (connector, backend) = connector_with_memory_backend();

        connector.notify_play().await.unwrap();
        connector.notify_buffer_start().await.unwrap();
        connector.notify_buffer_stop().await.unwrap();
        connector.notify_pause().await.unwrap();
        connector.start_from_position(30_000).await.unwrap();
        connector.notify_change_playback_rate(1.5).await.unwrap();
        connector.notify_end().await.unwrap();

        let events: Vec<PlaybackEvent> = backend
            .snapshot()
            .events
            .into_iter()
            .map(|(tag, event)| {
                assert_eq!(tag, 7);
                event
            })
            .collect();
        assert_eq!(
            events,
            vec![
                PlaybackEvent::Play,
                PlaybackEvent::BufferStart,
                PlaybackEvent::BufferStop,
                PlaybackEvent::Pause,
                PlaybackEvent::StartFromPosition {
                    position_ms: 30_000
                },
                PlaybackEvent::PlaybackRateChanged { rate: 1.5 },
                PlaybackEvent::End,
            ]
        );
    }

    #[tokio::test(flavor = "current_thread")]
    async fn update_stores_and_forwards_metadata() {
        let (connector, backend) = connector_with_memory_backend();
        let updated = test_metadata().with_program_title("Late Show");
        connector.update(updated.clone()).await.unwrap();

        assert_eq!(connector.snapshot().metadata, updated);
        let state = backend.snapshot();
        assert_eq!(
            state.events.last(),
            Some(&(7, PlaybackEvent::MetadataUpdated(Box::new(updated))))
        );
    }

    #[tokio::test(flavor = "current_thread")]
    async fn persistent_labels_accumulate() {
        let (connector, backend) = connector_with_memory_backend();
        connector.set_persistent_label("cs_fpid", "123").await.unwrap();
        connector
            .set_persistent_labels(BTreeMap::from([
                ("cs_fpit".to_string(), "456".to_string()),
                ("cs_fpdm".to_string(), "789".to_string()),
            ]))
            .await
            .unwrap();

        let labels = connector.snapshot().persistent_labels;
        assert_eq!(labels.len(), 3);
        assert_eq!(labels["cs_fpid"], "123");
        assert_eq!(labels["cs_fpdm"], "789");
        assert_eq!(backend.snapshot().events.len(), 2);
    }

    #[tokio::test(flavor = "current_thread")]
    async fn create_playback_session_rotates_session_id() {
        let (connector, backend) = connector_with_memory_backend();
        let before = connector.session_id();
        connector.create_playback_session().await.unwrap();
        let after = connector.session_id();

        assert_ne!(before, after);
        assert_eq!(after.len(), 32);
        match backend.snapshot().events.last() {
            Some((7, PlaybackEvent::SessionCreated { session_id })) => {
                assert_eq!(session_id, &after);
            }
            other => panic!("unexpected event: {other:?}"),
        }
    }
}
