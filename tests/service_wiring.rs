//! Integration tests for wiring long-lived services through a registry.
//!
//! Creators resolve their own dependencies from the same registry, the way application code
//! would. Services are swapped for doubles with overrides.
//!
//! NOTE: All tests use #[serial] because they share the same registry (services).

use serial_test::serial;
use service_registry::{define_registry, RegistryError};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

define_registry!(services);

static NEXT_ID: AtomicUsize = AtomicUsize::new(1);

fn next_id() -> usize {
    NEXT_ID.fetch_add(1, Ordering::SeqCst)
}

#[derive(Debug, Default)]
struct Configuration;

impl Configuration {
    fn user_name(&self) -> &str {
        "Markus"
    }
}

#[derive(Debug, Default)]
struct TextService {
    config: Arc<Configuration>,
    id: usize,
}

impl TextService {
    fn greeting(&self) -> String {
        format!("Hello {}", self.config.user_name())
    }
}

#[derive(Debug, Default)]
struct MessageService {
    texts: Arc<TextService>,
}

fn new_text_service() -> TextService {
    TextService {
        config: services::get(&[]),
        id: next_id(),
    }
}

fn new_message_service() -> MessageService {
    MessageService {
        texts: services::get(&[]),
    }
}

fn setup() {
    services::clear();
    services::register_creator(|| Configuration);
    services::register_creator(new_text_service);
    services::register_creator(new_message_service);
}

#[test]
#[serial]
fn test_creators_resolve_their_dependencies() {
    setup();

    let messages = services::get::<MessageService>(&[]);
    assert_eq!(messages.texts.greeting(), "Hello Markus");
    assert!(services::contains::<TextService>(&[]));
    assert!(services::contains::<Configuration>(&[]));
}

#[test]
#[serial]
fn test_dependencies_are_shared() {
    setup();

    // Two fresh consumers observe the same cached text service.
    let first = new_message_service();
    let second = new_message_service();
    assert!(Arc::ptr_eq(&first.texts, &second.texts));
    assert_eq!(first.texts.id, second.texts.id);
}

#[test]
#[serial]
fn test_default_singleton_is_stable() {
    setup();

    let first = services::get::<TextService>(&[]);
    let second = services::get::<TextService>(&[]);
    assert!(Arc::ptr_eq(&first, &second));
}

#[test]
#[serial]
fn test_qualified_instances_are_distinct() {
    setup();

    let a = services::get::<TextService>(&["a"]);
    let b = services::get::<TextService>(&["b"]);
    assert_ne!(a.id, b.id);
    assert!(Arc::ptr_eq(&a.config, &b.config));

    assert!(services::remove::<TextService>(&["a"]));
    assert!(Arc::ptr_eq(&b, &services::get::<TextService>(&["b"])));
}

#[test]
#[serial]
fn test_remove_forces_recreation() {
    setup();

    let before = services::get::<TextService>(&["a"]);
    services::remove::<TextService>(&["a"]);
    let after = services::get::<TextService>(&["a"]);

    assert!(!Arc::ptr_eq(&before, &after));
    assert_ne!(before.id, after.id);
}

#[test]
#[serial]
fn test_remove_missing_is_noop() {
    setup();

    assert!(!services::remove::<TextService>(&["never-created"]));
    assert!(services::registry().has_creator(service_registry::TypeKey::of::<TextService>()));
}

#[test]
#[serial]
fn test_remove_all_matching_by_prefix() {
    setup();

    let abc = services::get::<TextService>(&["abc"]);
    let def = services::get::<TextService>(&["def"]);
    let abc_def = services::get::<TextService>(&["abc_def"]);

    let removed = services::remove_all_matching(|key| key.starts_with("abc"));

    assert_eq!(removed, 2);
    assert!(!services::contains::<TextService>(&["abc"]));
    assert!(!services::contains::<TextService>(&["abc_def"]));
    assert!(Arc::ptr_eq(&def, &services::get::<TextService>(&["def"])));
    assert_ne!(abc.id, services::get::<TextService>(&["abc"]).id);
    assert_ne!(abc_def.id, services::get::<TextService>(&["abc_def"]).id);
}

#[test]
#[serial]
fn test_remove_all_matching_sees_leading_separator() {
    setup();

    services::get::<TextService>(&[]);
    services::get::<TextService>(&["text"]);

    // Unqualified selectors start with the separator, not the type name.
    assert_eq!(services::remove_all_matching(|key| key.starts_with("service_wiring")), 0);
    let removed = services::remove_all_matching(|key| {
        key.starts_with('_') && key.ends_with("TextService")
    });
    assert_eq!(removed, 1);
    assert!(services::contains::<TextService>(&["text"]));
}

#[test]
#[serial]
fn test_unregistered_type_yields_default() {
    services::clear();

    #[derive(Debug, Default, PartialEq)]
    struct Unregistered {
        value: u32,
    }

    let value = services::get::<Unregistered>(&[]);
    assert_eq!(*value, Unregistered::default());
    assert!(!services::contains::<Unregistered>(&[]));
    assert!(matches!(
        services::try_get::<Unregistered>(&[]),
        Err(RegistryError::TypeNotFound { .. })
    ));
}

#[test]
#[serial]
fn test_cached_instance_survives_creator_registration() {
    setup();

    let cached = services::get::<TextService>(&[]);
    services::register_creator(|| TextService {
        config: Arc::new(Configuration),
        id: 0,
    });

    assert!(Arc::ptr_eq(&cached, &services::get::<TextService>(&[])));
    assert_eq!(services::get::<TextService>(&["new"]).id, 0);
}
