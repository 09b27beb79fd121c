//! # Service Registry
//!
//! A thread-safe service registry that lazily constructs and caches exactly one instance per
//! (type, qualifier) pair, and lets callers override or discard cached instances at runtime,
//! typically to swap real services for test doubles.
//!
//! ## Quick Start
//!
//! ```rust
//! use service_registry::{get, override_instance, register_creator};
//! use std::sync::Arc;
//!
//! #[derive(Default)]
//! struct Config {
//!     user: String,
//! }
//!
//! register_creator(|| Config { user: "Markus".to_string() });
//!
//! // Created on first use, then shared.
//! let config: Arc<Config> = get(&[]);
//! assert_eq!(config.user, "Markus");
//! assert!(Arc::ptr_eq(&config, &get::<Config>(&[])));
//!
//! // Qualifiers select independent instances of the same type.
//! let staging: Arc<Config> = get(&["staging"]);
//! assert!(!Arc::ptr_eq(&config, &staging));
//!
//! // Swap in a double.
//! override_instance(Config { user: "test".to_string() }, &[]).unwrap();
//! assert_eq!(get::<Config>(&[]).user, "test");
//! ```
//!
//! ## Lookup Failures
//!
//! [`get`] returns `T::default()` when `T` has no creator or the cached value has another type.
//! That value is not cached and looks like a valid service. [`try_get`] reports the same
//! situations as [`RegistryError`].
//!
//! ## Main Items
//!
//! - [`Registry`] - isolated registry; the erased core operations live here
//! - [`RegistryApi`] - typed operations, implemented by [`Registry`] and [`define_registry!`] modules
//! - [`global()`] and the free functions - the process-wide registry
//! - [`Selector`] - how keys are derived, relevant to [`remove_all_matching`]
//! - [`Registry::set_trace_callback`] - observe registry operations as [`RegistryEvent`]s

mod global;
mod macros;
mod registry;
mod registry_error;
mod registry_event;
mod registry_trait;
mod selector;

pub use global::{
    contains, get, get_cloned, global, override_creator, override_instance, register_creator,
    remove, remove_all_matching, try_get,
};
pub use registry::{Creator, Instance, Registry, TraceCallback};
pub use registry_error::RegistryError;
pub use registry_event::RegistryEvent;
pub use registry_trait::RegistryApi;
pub use selector::{Selector, TypeKey};
