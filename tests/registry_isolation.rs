//! Integration tests for registry isolation.
//!
//! Registries declared with `define_registry!`, built with `Registry::new()`, and the global
//! registry never share creators or instances.

use service_registry::{define_registry, Registry, RegistryApi};
use std::sync::Arc;

#[test]
fn test_multiple_isolated_registries() {
    define_registry!(database);
    define_registry!(cache);

    database::register_creator(|| "postgresql://localhost".to_string());
    cache::register_creator(|| "redis://localhost".to_string());

    assert_eq!(database::get::<String>(&[]).as_str(), "postgresql://localhost");
    assert_eq!(cache::get::<String>(&[]).as_str(), "redis://localhost");
}

#[test]
fn test_registry_does_not_leak_between_instances() {
    define_registry!(isolated_a);
    define_registry!(isolated_b);

    isolated_a::register_creator(|| "only in A".to_string());
    let _ = isolated_a::get::<String>(&[]);

    assert!(isolated_a::contains::<String>(&[]));
    assert!(!isolated_b::contains::<String>(&[]));
    assert!(isolated_b::try_get::<String>(&[]).is_err());
    assert_eq!(isolated_b::get::<String>(&[]).as_str(), "");
}

#[test]
fn test_owned_registries_are_independent() {
    let first = Registry::new();
    let second = Registry::new();

    first.register_creator(|| 1u64);
    second.register_creator(|| 2u64);

    assert_eq!(*first.get::<u64>(&[]), 1);
    assert_eq!(*second.get::<u64>(&[]), 2);

    first.remove::<u64>(&[]);
    assert!(!first.contains::<u64>(&[]));
    assert!(second.contains::<u64>(&[]));
}

#[test]
fn test_api_constant_is_trait_based_access() {
    define_registry!(app);

    app::API.register_creator(|| 100i32);
    let value: Arc<i32> = app::API.get(&[]);
    assert_eq!(*value, 100);
    assert!(Arc::ptr_eq(&value, &app::get::<i32>(&[])));
}

#[test]
fn test_registry_scoping() {
    mod module_a {
        use service_registry::define_registry;
        define_registry!(scoped);

        pub fn setup() {
            scoped::register_creator(|| "module A".to_string());
        }

        pub fn value() -> String {
            scoped::get::<String>(&[]).to_string()
        }
    }

    mod module_b {
        use service_registry::define_registry;
        define_registry!(scoped);

        pub fn setup() {
            scoped::register_creator(|| "module B".to_string());
        }

        pub fn value() -> String {
            scoped::get::<String>(&[]).to_string()
        }
    }

    module_a::setup();
    module_b::setup();

    assert_eq!(module_a::value(), "module A");
    assert_eq!(module_b::value(), "module B");
}
