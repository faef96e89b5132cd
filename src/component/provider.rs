use std::any::Any;
use std::sync::{Arc, Mutex, Weak};

use serde_json::Value;

use crate::component::component::Component;
use crate::component::container::{ComponentContainer, ComponentContainerInner};
use crate::component::types::{ComponentError, DynService, InstantiationMode};

/// Lazily materializes one service instance for one component on one
/// container. Providers exist before their component is attached, so lookup
/// order never matters.
#[derive(Clone)]
pub struct Provider {
    inner: Arc<ProviderInner>,
}

struct ProviderInner {
    name: Arc<str>,
    container: Weak<ComponentContainerInner>,
    component: Mutex<Option<Component>>,
    instance: Mutex<Option<DynService>>,
    instance_options: Mutex<Value>,
}

impl Provider {
    pub(crate) fn new(name: &str, container: ComponentContainer) -> Self {
        Self {
            inner: Arc::new(ProviderInner {
                name: Arc::from(name.to_owned()),
                container: Arc::downgrade(&container.inner),
                component: Mutex::new(None),
                instance: Mutex::new(None),
                instance_options: Mutex::new(Value::Null),
            }),
        }
    }

    pub fn name(&self) -> &str {
        &self.inner.name
    }

    pub fn is_component_set(&self) -> bool {
        self.inner.component.lock().unwrap().is_some()
    }

    pub fn is_initialized(&self) -> bool {
        self.inner.instance.lock().unwrap().is_some()
    }

    pub fn clear_instance(&self) {
        *self.inner.instance.lock().unwrap() = None;
        *self.inner.instance_options.lock().unwrap() = Value::Null;
    }

    pub fn delete(&self) -> Result<(), ComponentError> {
        self.clear_instance();
        Ok(())
    }

    /// Returns the instance, running the factory if the component allows
    /// auto-initialization. `None` when no component is attached, the
    /// factory failed, or the stored instance has a different type.
    pub fn get_immediate<T>(&self) -> Option<Arc<T>>
    where
        T: Any + Send + Sync + 'static,
    {
        match self.get_or_initialize(Value::Null, false) {
            Ok(Some(service)) => service.downcast::<T>().ok(),
            _ => None,
        }
    }

    /// Explicitly initializes the instance with the given options. Fails if
    /// an instance already exists.
    pub fn initialize<T>(&self, options: Value) -> Result<Arc<T>, ComponentError>
    where
        T: Any + Send + Sync + 'static,
    {
        if self.is_initialized() {
            return Err(ComponentError::InstanceAlreadyInitialized {
                name: self.name().to_string(),
            });
        }

        match self.get_or_initialize(options, true)? {
            Some(service) => {
                service
                    .downcast::<T>()
                    .map_err(|_| ComponentError::InstanceUnavailable {
                        name: self.name().to_string(),
                    })
            }
            None => Err(ComponentError::InstanceUnavailable {
                name: self.name().to_string(),
            }),
        }
    }

    pub fn get_options(&self) -> Value {
        self.inner.instance_options.lock().unwrap().clone()
    }

    pub fn set_component(&self, component: Component) -> Result<(), ComponentError> {
        if component.name() != self.name() {
            return Err(ComponentError::MismatchingComponent {
                expected: self.name().to_string(),
                found: component.name().to_string(),
            });
        }

        {
            let mut guard = self.inner.component.lock().unwrap();
            if guard.is_some() {
                return Err(ComponentError::ComponentAlreadyProvided {
                    name: self.name().to_string(),
                });
            }
            *guard = Some(component.clone());
        }

        if component.instantiation_mode() == InstantiationMode::Eager {
            let _ = self.get_or_initialize(Value::Null, true);
        }

        Ok(())
    }

    fn get_or_initialize(
        &self,
        options: Value,
        force: bool,
    ) -> Result<Option<DynService>, ComponentError> {
        if let Some(instance) = self.inner.instance.lock().unwrap().as_ref() {
            return Ok(Some(instance.clone()));
        }

        let component = match self.inner.component.lock().unwrap().clone() {
            Some(component) => component,
            None => return Ok(None),
        };

        if !force && component.instantiation_mode() == InstantiationMode::Explicit {
            return Ok(None);
        }

        let container = match self.inner.container.upgrade() {
            Some(inner) => ComponentContainer { inner },
            None => {
                return Err(ComponentError::InitializationFailed {
                    name: self.name().to_string(),
                    reason: "container dropped".into(),
                });
            }
        };

        let instance = (component.instance_factory)(&container, options.clone()).map_err(
            |err| ComponentError::InitializationFailed {
                name: self.name().to_string(),
                reason: err.to_string(),
            },
        )?;

        *self.inner.instance.lock().unwrap() = Some(instance.clone());
        *self.inner.instance_options.lock().unwrap() = options;

        Ok(Some(instance))
    }
}
