//! Service wiring example for service-registry.
//!
//! Demonstrates:
//! - Registering creators that resolve their own dependencies
//! - Lazy, cached resolution with `get()`
//! - Qualified instances of the same type
//! - Swapping a service for a double with `override_instance()`
//! - Evicting instances with `remove()` and `remove_all_matching()`
//!
//! Run with: `cargo run --example service_wiring`

use service_registry::{define_registry, RegistryError};
use std::sync::Arc;

define_registry!(app);

#[derive(Debug, Default)]
struct Configuration {
    user: String,
}

#[derive(Debug, Default)]
struct Greeter {
    config: Arc<Configuration>,
    language: &'static str,
}

impl Greeter {
    fn greet(&self) -> String {
        match self.language {
            "de" => format!("Hallo {}", self.config.user),
            _ => format!("Hello {}", self.config.user),
        }
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .init();

    println!("=== service-registry: Service Wiring ===\n");

    // -------------------------------------------------------------------------
    // 1. Register creators
    // -------------------------------------------------------------------------
    app::register_creator(|| Configuration {
        user: "Markus".to_string(),
    });
    app::register_creator(|| Greeter {
        config: app::get(&[]),
        language: "en",
    });

    // -------------------------------------------------------------------------
    // 2. Resolve lazily
    // -------------------------------------------------------------------------
    let greeter = app::get::<Greeter>(&[]);
    println!("1. {}", greeter.greet());
    println!(
        "   same instance on second lookup: {}",
        Arc::ptr_eq(&greeter, &app::get::<Greeter>(&[]))
    );

    // -------------------------------------------------------------------------
    // 3. Qualified instances
    // -------------------------------------------------------------------------
    let staging = app::get::<Greeter>(&["staging"]);
    println!(
        "\n2. qualified instance is separate: {}",
        !Arc::ptr_eq(&greeter, &staging)
    );

    // -------------------------------------------------------------------------
    // 4. Override with a double
    // -------------------------------------------------------------------------
    let double = Greeter {
        config: app::get(&[]),
        language: "de",
    };
    if let Err(e) = app::override_instance(double, &[]) {
        println!("\n3. override refused: {}", e);
    }
    println!("\n3. after override: {}", app::get::<Greeter>(&[]).greet());

    // -------------------------------------------------------------------------
    // 5. Eviction
    // -------------------------------------------------------------------------
    println!("\n4. cached selectors: {:?}", app::registry().selectors());
    let removed = app::remove_all_matching(|key| key.starts_with("staging"));
    println!("   removed {} staging entries", removed);
    app::remove::<Greeter>(&[]);
    println!("   cached selectors: {:?}", app::registry().selectors());

    // -------------------------------------------------------------------------
    // 6. Lookup failures
    // -------------------------------------------------------------------------
    #[derive(Debug, Default)]
    struct Unregistered;

    println!("\n5. get() falls back silently: {:?}", app::get::<Unregistered>(&[]));
    match app::try_get::<Unregistered>(&[]) {
        Ok(_) => println!("   unexpected instance"),
        Err(RegistryError::TypeNotFound { type_name }) => {
            println!("   try_get() reports the missing creator for {}", type_name)
        }
        Err(e) => println!("   other error: {}", e),
    }

    println!("\n=== Example completed successfully! ===");
}
