use std::collections::BTreeMap;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::app::App;
use crate::tracker::config::UsagePropertiesAutoUpdateMode;
use crate::tracker::error::TrackerResult;

/// Publisher account registration handed to the backend. The persistent
/// labels ride along with every measurement the backend reports for this
/// publisher.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PublisherConfig {
    pub publisher_id: String,
    pub persistent_labels: BTreeMap<String, String>,
}

impl PublisherConfig {
    pub fn new(publisher_id: impl Into<String>) -> Self {
        Self {
            publisher_id: publisher_id.into(),
            persistent_labels: BTreeMap::new(),
        }
    }

    pub fn with_persistent_label(
        mut self,
        name: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        self.persistent_labels.insert(name.into(), value.into());
        self
    }
}

/// Kinds of notifications the backend accepts alongside a label set.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NotificationKind {
    /// A view (section/screen) measurement.
    View,
    /// A background measurement carrying no visible view change.
    Hidden,
    /// The application became active for the user.
    UxActive,
    /// The application left the foreground experience.
    UxInactive,
}

/// Capability boundary to the vendor analytics backend.
///
/// The facade never reaches into global vendor state; everything it needs
/// from the backend is one of these primitives. Configuration calls follow
/// a synchronous contract, while [`Backend::notify`] is asynchronous so a
/// production adapter can await its own delivery path.
#[async_trait]
pub trait Backend: Send + Sync {
    fn register_publisher(&self, publisher: &PublisherConfig) -> TrackerResult<()>;

    fn set_application_name(&self, name: &str);

    fn set_usage_properties_auto_update_mode(&self, mode: UsagePropertiesAutoUpdateMode);

    fn enable_validation_mode(&self);

    fn enable_child_directed_mode(&self);

    fn set_persistent_label(
        &self,
        publisher_id: &str,
        name: &str,
        value: &str,
    ) -> TrackerResult<()>;

    fn start(&self, app: &App) -> TrackerResult<()>;

    async fn notify(
        &self,
        kind: NotificationKind,
        labels: BTreeMap<String, String>,
    ) -> TrackerResult<()>;
}

/// Backend that accepts every call and does nothing. Stands in for hosts
/// that want the tracking surface wired up without a measurement vendor
/// behind it.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopBackend;

#[async_trait]
impl Backend for NoopBackend {
    fn register_publisher(&self, _publisher: &PublisherConfig) -> TrackerResult<()> {
        Ok(())
    }

    fn set_application_name(&self, _name: &str) {}

    fn set_usage_properties_auto_update_mode(&self, _mode: UsagePropertiesAutoUpdateMode) {}

    fn enable_validation_mode(&self) {}

    fn enable_child_directed_mode(&self) {}

    fn set_persistent_label(
        &self,
        _publisher_id: &str,
        _name: &str,
        _value: &str,
    ) -> TrackerResult<()> {
        Ok(())
    }

    fn start(&self, _app: &App) -> TrackerResult<()> {
        Ok(())
    }

    async fn notify(
        &self,
        _kind: NotificationKind,
        _labels: BTreeMap<String, String>,
    ) -> TrackerResult<()> {
        Ok(())
    }
}

/// Snapshot of everything a [`MemoryBackend`] has been told so far.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct BackendState {
    pub publishers: Vec<PublisherConfig>,
    pub application_name: Option<String>,
    pub auto_update_mode: Option<UsagePropertiesAutoUpdateMode>,
    pub validation_mode: bool,
    pub child_directed_mode: bool,
    pub persistent_labels: BTreeMap<String, BTreeMap<String, String>>,
    pub started_apps: Vec<String>,
    pub notifications: Vec<(NotificationKind, BTreeMap<String, String>)>,
}

/// Backend that records every call into an inspectable [`BackendState`].
/// Serves test doubles and local development without a vendor SDK.
#[derive(Debug, Default)]
pub struct MemoryBackend {
    state: Mutex<BackendState>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn snapshot(&self) -> BackendState {
        self.state.lock().unwrap().clone()
    }

    pub fn reset(&self) {
        *self.state.lock().unwrap() = BackendState::default();
    }
}

#[async_trait]
impl Backend for MemoryBackend {
    fn register_publisher(&self, publisher: &PublisherConfig) -> TrackerResult<()> {
        self.state.lock().unwrap().publishers.push(publisher.clone());
        Ok(())
    }

    fn set_application_name(&self, name: &str) {
        self.state.lock().unwrap().application_name = Some(name.to_string());
    }

    fn set_usage_properties_auto_update_mode(&self, mode: UsagePropertiesAutoUpdateMode) {
        self.state.lock().unwrap().auto_update_mode = Some(mode);
    }

    fn enable_validation_mode(&self) {
        self.state.lock().unwrap().validation_mode = true;
    }

    fn enable_child_directed_mode(&self) {
        self.state.lock().unwrap().child_directed_mode = true;
    }

    fn set_persistent_label(
        &self,
        publisher_id: &str,
        name: &str,
        value: &str,
    ) -> TrackerResult<()> {
        self.state
            .lock()
            .unwrap()
            .persistent_labels
            .entry(publisher_id.to_string())
            .or_default()
            .insert(name.to_string(), value.to_string());
        Ok(())
    }

    fn start(&self, app: &App) -> TrackerResult<()> {
        self.state
            .lock()
            .unwrap()
            .started_apps
            .push(app.name().to_string());
        Ok(())
    }

    async fn notify(
        &self,
        kind: NotificationKind,
        labels: BTreeMap<String, String>,
    ) -> TrackerResult<()> {
        self.state.lock().unwrap().notifications.push((kind, labels));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::{initialize_app, AppSettings};

    #[tokio::test(flavor = "current_thread")]
    async fn memory_backend_records_calls_in_order() {
        let app = initialize_app(Some(AppSettings {
            name: Some("backend-test".into()),
        }))
        .unwrap();
        let backend = MemoryBackend::new();

        let publisher = PublisherConfig::new("20634243").with_persistent_label("cs_ucfr", "1");
        backend.register_publisher(&publisher).unwrap();
        backend.set_application_name("NewsReader");
        backend.enable_validation_mode();
        backend.start(&app).unwrap();
        backend
            .notify(NotificationKind::View, BTreeMap::new())
            .await
            .unwrap();

        let state = backend.snapshot();
        assert_eq!(state.publishers, vec![publisher]);
        assert_eq!(state.application_name.as_deref(), Some("NewsReader"));
        assert!(state.validation_mode);
        assert_eq!(state.started_apps, vec!["backend-test".to_string()]);
        assert_eq!(state.notifications.len(), 1);
        assert_eq!(state.notifications[0].0, NotificationKind::View);
    }

    #[tokio::test(flavor = "current_thread")]
    async fn reset_clears_recorded_state() {
        let backend = MemoryBackend::new();
        backend.set_application_name("NewsReader");
        backend
            .notify(NotificationKind::Hidden, BTreeMap::new())
            .await
            .unwrap();
        backend.reset();
        assert_eq!(backend.snapshot(), BackendState::default());
    }

    #[test]
    fn persistent_labels_group_by_publisher() {
        let backend = MemoryBackend::new();
        backend.set_persistent_label("pub-a", "cs_fpid", "123").unwrap();
        backend.set_persistent_label("pub-a", "cs_fpit", "456").unwrap();
        backend.set_persistent_label("pub-b", "cs_fpid", "789").unwrap();

        let state = backend.snapshot();
        assert_eq!(
            state.persistent_labels["pub-a"]["cs_fpid"],
            "123".to_string()
        );
        assert_eq!(
            state.persistent_labels["pub-a"]["cs_fpit"],
            "456".to_string()
        );
        assert_eq!(
            state.persistent_labels["pub-b"]["cs_fpid"],
            "789".to_string()
        );
    }
}
