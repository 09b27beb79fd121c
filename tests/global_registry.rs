//! Integration tests for the process-wide registry.
//!
//! NOTE: All tests use #[serial] because they share the global registry.

use serial_test::serial;
use service_registry::{
    contains, get, get_cloned, global, override_creator, override_instance, register_creator,
    remove, remove_all_matching, try_get, RegistryError,
};
use std::sync::Arc;

#[derive(Debug, Default, Clone, PartialEq)]
struct AppConfig {
    database_url: String,
    max_connections: u32,
}

fn production_config() -> AppConfig {
    AppConfig {
        database_url: "postgresql://localhost/app".to_string(),
        max_connections: 100,
    }
}

#[test]
#[serial]
fn test_global_lazy_singleton() {
    global().clear();
    register_creator(production_config);

    assert!(!contains::<AppConfig>(&[]));
    let first = get::<AppConfig>(&[]);
    assert!(contains::<AppConfig>(&[]));
    assert!(Arc::ptr_eq(&first, &get::<AppConfig>(&[])));
    assert_eq!(get_cloned::<AppConfig>(&[]).unwrap(), production_config());
}

#[test]
#[serial]
fn test_global_override_for_tests() {
    global().clear();
    register_creator(production_config);
    let real = get::<AppConfig>(&[]);

    override_creator(
        || AppConfig {
            database_url: "sqlite::memory:".to_string(),
            max_connections: 1,
        },
        &[],
    )
    .unwrap();
    let double = get::<AppConfig>(&[]);
    assert!(!Arc::ptr_eq(&real, &double));
    assert_eq!(double.max_connections, 1);

    override_instance(AppConfig::default(), &["empty"]).unwrap();
    assert_eq!(*get::<AppConfig>(&["empty"]), AppConfig::default());
}

#[test]
#[serial]
fn test_global_removal() {
    global().clear();
    register_creator(production_config);

    for qualifier in ["abc", "def", "abc_def"] {
        let _ = get::<AppConfig>(&[qualifier]);
    }
    assert_eq!(remove_all_matching(|key| key.starts_with("abc")), 2);
    assert!(contains::<AppConfig>(&["def"]));

    assert!(remove::<AppConfig>(&["def"]));
    assert!(!contains::<AppConfig>(&["def"]));
    assert!(global().selectors().is_empty());
}

#[test]
#[serial]
fn test_global_unregistered_type() {
    global().clear();

    assert_eq!(*get::<AppConfig>(&[]), AppConfig::default());
    assert_eq!(
        try_get::<AppConfig>(&[]).unwrap_err(),
        RegistryError::TypeNotFound {
            type_name: std::any::type_name::<AppConfig>()
        }
    );
}
