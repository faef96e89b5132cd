mod component;
pub mod container;
pub mod provider;
pub mod types;

pub use component::Component;
pub use container::ComponentContainer;
pub use provider::Provider;
pub use types::{ComponentError, DynService, InstanceFactory, InstantiationMode};

#[cfg(test)]
mod tests;
