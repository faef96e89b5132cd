use crate::app::constants::DEFAULT_ENTRY_NAME;
use crate::app::errors::{AppError, AppResult};
use crate::app::registry;
use crate::app::types::{App, AppSettings};
use crate::component::{Component, ComponentContainer, DynService, InstanceFactory};
use crate::logger::{self, LogLevel};

pub static SDK_VERSION: &str = env!("CARGO_PKG_VERSION");

fn normalize_name(settings: &AppSettings) -> AppResult<String> {
    let name = settings
        .name
        .clone()
        .unwrap_or_else(|| DEFAULT_ENTRY_NAME.to_string());
    if name.trim().is_empty() {
        return Err(AppError::BadAppName { app_name: name });
    }
    Ok(name)
}

/// Creates (or returns) the host application handle with the given settings.
///
/// Initializing a name that already exists returns the existing instance;
/// apps carry no per-instance options that could conflict.
pub fn initialize_app(settings: Option<AppSettings>) -> AppResult<App> {
    let settings = settings.unwrap_or_default();
    let name = normalize_name(&settings)?;

    {
        let apps = registry::apps_guard();
        if let Some(existing) = apps.get(&name) {
            return Ok(existing.clone());
        }
    }

    let container = ComponentContainer::new(name.clone());

    let components: Vec<Component> = {
        let global = registry::registered_components_guard();
        global.values().cloned().collect()
    };

    let app = App::new(name.clone(), container.clone());

    use std::sync::Arc;

    let app_for_factory = app.clone();
    let app_factory: InstanceFactory =
        Arc::new(move |_container, _options| Ok(Arc::new(app_for_factory.clone()) as DynService));
    let _ = container.add_component(Component::new("app", app_factory));
    for component in components {
        let _ = container.add_component(component);
    }

    registry::apps_guard().insert(name, app.clone());

    Ok(app)
}

pub fn get_app(name: Option<&str>) -> AppResult<App> {
    let lookup = name.unwrap_or(DEFAULT_ENTRY_NAME);
    if let Some(app) = registry::apps_guard().get(lookup) {
        return Ok(app.clone());
    }
    Err(AppError::NoApp {
        app_name: lookup.to_string(),
    })
}

pub fn get_apps() -> Vec<App> {
    registry::apps_guard().values().cloned().collect()
}

/// Removes the app from the registry, drops every cached service instance
/// and marks the handle deleted. Deleting an unknown app is a no-op.
pub fn delete_app(app: &App) -> AppResult<()> {
    let removed = registry::apps_guard().remove(app.name());

    if removed.is_some() {
        for provider in app.container().get_providers() {
            let _ = provider.delete();
        }
        app.set_is_deleted(true);
    }

    Ok(())
}

pub fn set_log_level(level: LogLevel) {
    logger::set_log_level_for_all(level);
}
