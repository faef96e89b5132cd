use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, LazyLock, Mutex};

use crate::app::registry;
use crate::app::App;
use crate::component::types::{ComponentError, DynService};
use crate::component::Component;
use crate::logger::Logger;
use crate::streaming::{
    ContentMetadata, NoopStreamingBackend, StreamingBackend, StreamingConnector,
};
use crate::tracker::backend::{Backend, NoopBackend, NotificationKind, PublisherConfig};
use crate::tracker::config::TrackerConfig;
use crate::tracker::error::{
    backend_start, internal_error, invalid_argument, uninitialized, TrackerResult,
};

const TRACKER_COMPONENT_NAME: &str = "tracker";

/// Persistent label carrying the user-consent decision.
const CONSENT_LABEL: &str = "cs_ucfr";

static LOGGER: LazyLock<Logger> = LazyLock::new(|| Logger::new("audimeter/tracker"));

/// One event the facade has submitted to its backend.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TrackedEvent {
    pub kind: NotificationKind,
    pub labels: BTreeMap<String, String>,
}

/// The tracking facade.
///
/// One `Tracker` is attached to each [`App`]; fetch it with
/// [`get_tracker`]. All vendor interaction goes through the injected
/// [`Backend`], so the facade itself never touches global vendor state.
/// Cloning shares the underlying instance.
#[derive(Clone)]
pub struct Tracker {
    inner: Arc<TrackerInner>,
}

struct TrackerInner {
    app: App,
    backend: Mutex<Arc<dyn Backend>>,
    streaming_backend: Mutex<Arc<dyn StreamingBackend>>,
    application_name: Mutex<Option<String>>,
    publisher_id: Mutex<Option<String>>,
    started: AtomicBool,
    events: Mutex<Vec<TrackedEvent>>,
    connectors: Mutex<HashMap<i32, StreamingConnector>>,
}

impl fmt::Debug for Tracker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Tracker")
            .field("app", &self.inner.app.name())
            .field("started", &self.is_started())
            .finish()
    }
}

impl Tracker {
    fn new(app: App) -> Self {
        Self {
            inner: Arc::new(TrackerInner {
                app,
                backend: Mutex::new(Arc::new(NoopBackend)),
                streaming_backend: Mutex::new(Arc::new(NoopStreamingBackend)),
                application_name: Mutex::new(None),
                publisher_id: Mutex::new(None),
                started: AtomicBool::new(false),
                events: Mutex::new(Vec::new()),
                connectors: Mutex::new(HashMap::new()),
            }),
        }
    }

    pub fn app(&self) -> &App {
        &self.inner.app
    }

    /// Replaces the measurement backend. Intended to be called before
    /// [`Tracker::initialize`]; the default is a [`NoopBackend`].
    pub fn set_backend(&self, backend: Arc<dyn Backend>) {
        *self.inner.backend.lock().unwrap() = backend;
    }

    /// Replaces the streaming backend used by connectors created after the
    /// call. The default is a [`NoopStreamingBackend`].
    pub fn set_streaming_backend(&self, backend: Arc<dyn StreamingBackend>) {
        *self.inner.streaming_backend.lock().unwrap() = backend;
    }

    /// Registers the configured publisher with the backend and starts it
    /// against the owning app.
    ///
    /// A configuration without a publisher id makes the call a no-op: the
    /// tracking surface stays usable for label formatting but nothing is
    /// reported. Backend failures surface as `tracker/backend-start` and
    /// leave the facade unstarted, so the call may be retried. A second
    /// call after a successful start is ignored.
    pub fn initialize(&self, config: TrackerConfig) -> TrackerResult<()> {
        if self.is_started() {
            LOGGER.debug("tracking already started; ignoring repeat initialize");
            return Ok(());
        }

        if let Some(name) = config.application_name.clone() {
            *self.inner.application_name.lock().unwrap() = Some(name);
        }

        let Some(publisher_id) = config.publisher_id.clone() else {
            LOGGER.debug("no publisher id configured; skipping backend start");
            return Ok(());
        };
        if publisher_id.trim().is_empty() {
            return Err(invalid_argument("publisher id must not be empty"));
        }

        let mut publisher = PublisherConfig::new(publisher_id.clone());
        if config.user_consent.is_decided() {
            publisher = publisher
                .with_persistent_label(CONSENT_LABEL, config.user_consent.as_label_value());
        }

        let backend = self.backend();
        backend
            .register_publisher(&publisher)
            .map_err(|err| backend_start(format!("publisher registration failed: {err}")))?;
        backend.set_usage_properties_auto_update_mode(config.usage_properties_auto_update_mode);
        if let Some(name) = config.application_name.as_deref() {
            backend.set_application_name(name);
        }
        if config.child_directed {
            backend.enable_child_directed_mode();
        }
        if config.debug {
            backend.enable_validation_mode();
        }
        backend
            .start(&self.inner.app)
            .map_err(|err| backend_start(format!("backend start failed: {err}")))?;

        *self.inner.publisher_id.lock().unwrap() = Some(publisher_id);
        self.inner.started.store(true, Ordering::SeqCst);
        Ok(())
    }

    pub fn is_started(&self) -> bool {
        self.inner.started.load(Ordering::SeqCst)
    }

    /// Submits a view measurement for the given path.
    ///
    /// The reported label is the application name concatenated with the
    /// path, with every `/` normalized to `.`. Requires the application
    /// name to be set first.
    pub async fn track_view(&self, path: &str) -> TrackerResult<()> {
        let app_name = self
            .application_name()
            .ok_or_else(|| {
                uninitialized(
                    "application name not set; call initialize or set_application_name first",
                )
            })?;

        let mut labels = BTreeMap::new();
        labels.insert("name".to_string(), view_label(&app_name, path));
        self.submit(NotificationKind::View, labels).await
    }

    /// Submits an event measurement labeled `category.action`.
    pub async fn track_event(&self, action: &str, category: &str) -> TrackerResult<()> {
        if action.trim().is_empty() {
            return Err(invalid_argument("event action must not be empty"));
        }
        if category.trim().is_empty() {
            return Err(invalid_argument("event category must not be empty"));
        }

        let mut labels = BTreeMap::new();
        labels.insert("event".to_string(), format!("{category}.{action}"));
        // Events travel as view notifications distinguished by the label key.
        self.submit(NotificationKind::View, labels).await
    }

    pub fn application_name(&self) -> Option<String> {
        self.inner.application_name.lock().unwrap().clone()
    }

    pub fn set_application_name(&self, name: impl Into<String>) {
        *self.inner.application_name.lock().unwrap() = Some(name.into());
    }

    /// Sets one persistent label on the registered publisher, then reports
    /// a hidden measurement so the change takes effect immediately.
    pub async fn set_persistent_label(&self, name: &str, value: &str) -> TrackerResult<()> {
        let publisher_id = self.registered_publisher()?;
        self.backend().set_persistent_label(&publisher_id, name, value)?;
        self.submit(NotificationKind::Hidden, BTreeMap::new()).await
    }

    /// Sets a batch of persistent labels, followed by a single hidden
    /// measurement.
    pub async fn update_persistent_labels(
        &self,
        labels: &BTreeMap<String, String>,
    ) -> TrackerResult<()> {
        let publisher_id = self.registered_publisher()?;
        let backend = self.backend();
        for (name, value) in labels {
            backend.set_persistent_label(&publisher_id, name, value)?;
        }
        self.submit(NotificationKind::Hidden, BTreeMap::new()).await
    }

    /// Reports that the application entered the foreground experience.
    pub async fn notify_ux_active(&self) -> TrackerResult<()> {
        self.submit(NotificationKind::UxActive, BTreeMap::new()).await
    }

    /// Reports that the application left the foreground experience.
    pub async fn notify_ux_inactive(&self) -> TrackerResult<()> {
        self.submit(NotificationKind::UxInactive, BTreeMap::new()).await
    }

    /// Events submitted so far, in submission order.
    pub fn recorded_events(&self) -> Vec<TrackedEvent> {
        self.inner.events.lock().unwrap().clone()
    }

    /// Creates a streaming connector under the given tag. An existing
    /// connector with the same tag is replaced.
    pub fn initialize_streaming(
        &self,
        tag: i32,
        config: TrackerConfig,
        metadata: ContentMetadata,
    ) -> TrackerResult<StreamingConnector> {
        let has_publisher = config
            .publisher_id
            .as_deref()
            .is_some_and(|id| !id.trim().is_empty());
        if !has_publisher {
            return Err(invalid_argument(
                "streaming configuration requires a publisher id",
            ));
        }

        LOGGER.debug(format!("initialize_streaming tag={tag}"));
        let backend = self.inner.streaming_backend.lock().unwrap().clone();
        let connector = StreamingConnector::new(tag, config, metadata, backend)?;
        self.inner
            .connectors
            .lock()
            .unwrap()
            .insert(tag, connector.clone());
        Ok(connector)
    }

    /// Returns the streaming connector registered under the tag, if any.
    pub fn streaming(&self, tag: i32) -> Option<StreamingConnector> {
        self.inner.connectors.lock().unwrap().get(&tag).cloned()
    }

    /// Drops the streaming connector registered under the tag. Unknown
    /// tags are ignored.
    pub fn destroy_streaming(&self, tag: i32) {
        LOGGER.debug(format!("destroy_streaming tag={tag}"));
        self.inner.connectors.lock().unwrap().remove(&tag);
    }

    fn backend(&self) -> Arc<dyn Backend> {
        self.inner.backend.lock().unwrap().clone()
    }

    fn registered_publisher(&self) -> TrackerResult<String> {
        self.inner
            .publisher_id
            .lock()
            .unwrap()
            .clone()
            .ok_or_else(|| uninitialized("no publisher registered; call initialize first"))
    }

    async fn submit(
        &self,
        kind: NotificationKind,
        labels: BTreeMap<String, String>,
    ) -> TrackerResult<()> {
        let event = TrackedEvent {
            kind,
            labels: labels.clone(),
        };
        self.inner.events.lock().unwrap().push(event);

        self.backend().notify(kind, labels).await
    }
}

fn view_label(app_name: &str, path: &str) -> String {
    format!("{app_name}{path}").replace('/', ".")
}

static TRACKER_COMPONENT: LazyLock<Component> = LazyLock::new(|| {
    Component::new(TRACKER_COMPONENT_NAME, Arc::new(tracker_factory))
});

fn tracker_factory(
    container: &crate::component::ComponentContainer,
    _options: serde_json::Value,
) -> Result<DynService, ComponentError> {
    let app = container.root_service::<App>().ok_or_else(|| {
        ComponentError::InitializationFailed {
            name: TRACKER_COMPONENT_NAME.to_string(),
            reason: "app not attached to component container".to_string(),
        }
    })?;
    let tracker = Tracker::new((*app).clone());
    Ok(Arc::new(tracker) as DynService)
}

fn ensure_registered() {
    let component = LazyLock::force(&TRACKER_COMPONENT).clone();
    let _ = registry::register_component(component);
}

pub fn register_tracker_component() {
    ensure_registered();
}

/// Returns the tracker attached to the given app, or to the default app
/// when `None` is passed.
pub fn get_tracker(app: Option<App>) -> TrackerResult<Arc<Tracker>> {
    ensure_registered();
    let app = match app {
        Some(app) => app,
        None => crate::app::get_app(None).map_err(|err| internal_error(err.to_string()))?,
    };

    let provider = registry::get_provider(&app, TRACKER_COMPONENT_NAME);
    provider
        .get_immediate::<Tracker>()
        .ok_or_else(|| internal_error("Tracker component not available"))
}
