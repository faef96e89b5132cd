use std::sync::Arc;

use crate::component::types::{InstanceFactory, InstantiationMode};

/// A named service blueprint: a factory plus the rules for when the factory
/// runs. Components are registered globally and attached to every app's
/// container, which hands instantiation to a [`crate::component::Provider`].
#[derive(Clone)]
pub struct Component {
    name: Arc<str>,
    pub(crate) instance_factory: InstanceFactory,
    pub(crate) instantiation_mode: InstantiationMode,
}

impl Component {
    pub fn new(name: impl Into<String>, instance_factory: InstanceFactory) -> Self {
        Self {
            name: Arc::from(name.into()),
            instance_factory,
            instantiation_mode: InstantiationMode::Lazy,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn instantiation_mode(&self) -> InstantiationMode {
        self.instantiation_mode
    }

    pub fn with_instantiation_mode(mut self, mode: InstantiationMode) -> Self {
        self.instantiation_mode = mode;
        self
    }
}

impl std::fmt::Debug for Component {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Component")
            .field("name", &self.name)
            .field("instantiation_mode", &self.instantiation_mode)
            .finish()
    }
}
