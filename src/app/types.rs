use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::app::errors::{AppError, AppResult};
use crate::component::{Component, ComponentContainer, DynService};

/// Settings accepted by [`crate::app::initialize_app`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AppSettings {
    /// Instance name; the default entry name is used when absent.
    pub name: Option<String>,
}

/// Handle to one host application instance.
///
/// The `App` is the context tracking services bind to: it owns the component
/// container their providers live in, and it is the value handed to a
/// backend's `start` call. Cloning shares the underlying instance.
#[derive(Clone)]
pub struct App {
    inner: Arc<AppInner>,
}

struct AppInner {
    name: Arc<str>,
    is_deleted: AtomicBool,
    container: ComponentContainer,
}

impl App {
    pub fn new(name: impl Into<String>, container: ComponentContainer) -> Self {
        let app = Self {
            inner: Arc::new(AppInner {
                name: Arc::from(name.into()),
                is_deleted: AtomicBool::new(false),
                container,
            }),
        };
        let dyn_service: DynService = Arc::new(app.clone());
        app.inner.container.attach_root_service(dyn_service);
        app
    }

    pub fn name(&self) -> &str {
        &self.inner.name
    }

    pub fn container(&self) -> ComponentContainer {
        self.inner.container.clone()
    }

    pub fn add_component(&self, component: Component) -> AppResult<()> {
        self.check_destroyed()?;
        self.inner
            .container
            .add_component(component)
            .map_err(AppError::from)
    }

    pub fn is_deleted(&self) -> bool {
        self.inner.is_deleted.load(Ordering::SeqCst)
    }

    pub fn set_is_deleted(&self, value: bool) {
        self.inner.is_deleted.store(value, Ordering::SeqCst);
    }

    pub fn check_destroyed(&self) -> AppResult<()> {
        if self.is_deleted() {
            return Err(AppError::AppDeleted {
                app_name: self.name().to_owned(),
            });
        }
        Ok(())
    }
}

impl std::fmt::Debug for App {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("App").field("name", &self.name()).finish()
    }
}
