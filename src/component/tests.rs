use crate::component::types::{DynService, InstanceFactory};
use crate::component::{Component, ComponentContainer, ComponentError, InstantiationMode};
use serde_json::{json, Value};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

fn unit_component(name: &str) -> Component {
    let factory: InstanceFactory = Arc::new(|_container, _options| Ok(Arc::new(()) as DynService));
    Component::new(name.to_string(), factory)
}

#[test]
fn set_component_rejects_mismatched_name() {
    let container = ComponentContainer::new("test");
    let provider = container.get_provider("tracker");
    assert!(matches!(
        provider.set_component(unit_component("other")),
        Err(ComponentError::MismatchingComponent { .. })
    ));
}

#[test]
fn set_component_rejects_second_registration() {
    let container = ComponentContainer::new("test");
    let provider = container.get_provider("tracker");
    provider.set_component(unit_component("tracker")).unwrap();
    assert!(matches!(
        provider.set_component(unit_component("tracker")),
        Err(ComponentError::ComponentAlreadyProvided { .. })
    ));
}

#[test]
fn eager_component_initializes_immediately() {
    let container = ComponentContainer::new("test");
    let provider = container.get_provider("tracker");
    let factory: InstanceFactory = Arc::new(|_container, _options| Ok(Arc::new(42u32) as DynService));
    let component = Component::new("tracker", factory).with_instantiation_mode(InstantiationMode::Eager);
    provider.set_component(component).unwrap();
    assert!(provider.is_initialized());
    assert_eq!(provider.get_immediate::<u32>().map(|arc| *arc), Some(42));
}

#[test]
fn lazy_component_initializes_on_first_retrieval() {
    let container = ComponentContainer::new("test");
    let provider = container.get_provider("tracker");
    let calls = Arc::new(AtomicUsize::new(0));
    let counter = calls.clone();
    let factory: InstanceFactory = Arc::new(move |_container, _options| {
        counter.fetch_add(1, Ordering::SeqCst);
        Ok(Arc::new("service") as DynService)
    });
    provider
        .set_component(Component::new("tracker", factory))
        .unwrap();

    assert!(!provider.is_initialized());
    assert!(provider.get_immediate::<&str>().is_some());
    assert!(provider.get_immediate::<&str>().is_some());
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[test]
fn explicit_component_requires_initialize() {
    let container = ComponentContainer::new("test");
    let provider = container.get_provider("tracker");
    let factory: InstanceFactory = Arc::new(|_container, options| Ok(Arc::new(options) as DynService));
    let component =
        Component::new("tracker", factory).with_instantiation_mode(InstantiationMode::Explicit);
    provider.set_component(component).unwrap();

    assert!(provider.get_immediate::<Value>().is_none());

    let options = json!({"debug": true});
    let instance = provider.initialize::<Value>(options.clone()).unwrap();
    assert_eq!(*instance, options);
    assert_eq!(provider.get_options(), options);

    assert!(matches!(
        provider.initialize::<Value>(Value::Null),
        Err(ComponentError::InstanceAlreadyInitialized { .. })
    ));
}

#[test]
fn clear_instance_allows_reinitialization() {
    let container = ComponentContainer::new("test");
    let provider = container.get_provider("tracker");
    let calls = Arc::new(AtomicUsize::new(0));
    let counter = calls.clone();
    let factory: InstanceFactory = Arc::new(move |_container, _options| {
        let value = counter.fetch_add(1, Ordering::SeqCst) + 1;
        Ok(Arc::new(value) as DynService)
    });
    provider
        .set_component(Component::new("tracker", factory))
        .unwrap();

    assert_eq!(provider.get_immediate::<usize>().map(|arc| *arc), Some(1));
    provider.clear_instance();
    assert_eq!(provider.get_immediate::<usize>().map(|arc| *arc), Some(2));
}

#[test]
fn root_service_round_trips_through_container() {
    let container = ComponentContainer::new("test");
    container.attach_root_service(Arc::new("root".to_string()) as DynService);
    assert_eq!(
        container.root_service::<String>().as_deref(),
        Some(&"root".to_string())
    );
    assert!(container.root_service::<u32>().is_none());
}
