use std::collections::HashMap;
use std::sync::{Arc, LazyLock, Mutex, MutexGuard};

use crate::app::logger::LOGGER;
use crate::app::types::App;
use crate::component::{Component, Provider};

static APPS: LazyLock<Mutex<HashMap<String, App>>> = LazyLock::new(|| Mutex::new(HashMap::new()));

static REGISTERED_COMPONENTS: LazyLock<Mutex<HashMap<Arc<str>, Component>>> =
    LazyLock::new(|| Mutex::new(HashMap::new()));

pub(crate) fn apps_guard() -> MutexGuard<'static, HashMap<String, App>> {
    APPS.lock().unwrap_or_else(|poison| poison.into_inner())
}

pub(crate) fn registered_components_guard() -> MutexGuard<'static, HashMap<Arc<str>, Component>> {
    REGISTERED_COMPONENTS
        .lock()
        .unwrap_or_else(|poison| poison.into_inner())
}

/// Attaches a component to the given app, logging failures for debugging.
pub fn add_component(app: &App, component: &Component) {
    if app.container().add_component(component.clone()).is_err() {
        LOGGER.debug(format!(
            "Component {} failed to register with app {}",
            component.name(),
            app.name()
        ));
    }
}

/// Registers a global component and propagates it to already-initialized
/// apps. Returns false when a component with the same name already exists.
pub fn register_component(component: Component) -> bool {
    {
        let mut components = registered_components_guard();
        if components.contains_key(component.name()) {
            return false;
        }
        components.insert(Arc::from(component.name().to_owned()), component.clone());
    }

    let apps = apps_guard();
    for app in apps.values() {
        add_component(app, &component);
    }

    true
}

/// Fetches the provider for the named component on the given app.
pub fn get_provider(app: &App, name: &str) -> Provider {
    app.container().get_provider(name)
}
