//! The process-wide registry and its free-function façade.
//!
//! The registry is built on first use and lives until the process exits. For isolated state use
//! [`Registry::new`] or [`define_registry!`](crate::define_registry).

use std::sync::{Arc, LazyLock};

use crate::{Registry, RegistryApi, RegistryError};

static GLOBAL_REGISTRY: LazyLock<Registry> = LazyLock::new(Registry::new);

/// The process-wide registry.
pub fn global() -> &'static Registry {
    &GLOBAL_REGISTRY
}

/// Register `creator` as the factory for `T` in the global registry.
///
/// # Examples
///
/// ```
/// use service_registry::{get, register_creator};
///
/// #[derive(Default)]
/// struct Greeter {
///     name: String,
/// }
///
/// register_creator(|| Greeter { name: "Markus".to_string() });
/// assert_eq!(get::<Greeter>(&[]).name, "Markus");
/// ```
pub fn register_creator<T, F>(creator: F)
where
    T: Send + Sync + 'static,
    F: Fn() -> T + Send + Sync + 'static,
{
    global().register_creator(creator)
}

/// See [`RegistryApi::override_creator`].
pub fn override_creator<T, F>(creator: F, qualifiers: &[&str]) -> Result<(), RegistryError>
where
    T: Send + Sync + 'static,
    F: Fn() -> T + Send + Sync + 'static,
{
    global().override_creator(creator, qualifiers)
}

/// See [`RegistryApi::override_instance`].
pub fn override_instance<T: Send + Sync + 'static>(
    instance: T,
    qualifiers: &[&str],
) -> Result<(), RegistryError> {
    global().override_instance(instance, qualifiers)
}

/// Resolve `T` from the global registry.
///
/// Returns an uncached `T::default()` when `T` is unregistered or the cached value has another
/// type. Use [`try_get`] to tell those cases apart from a real instance.
pub fn get<T: Default + Send + Sync + 'static>(qualifiers: &[&str]) -> Arc<T> {
    global().get(qualifiers)
}

/// See [`RegistryApi::try_get`].
pub fn try_get<T: Send + Sync + 'static>(qualifiers: &[&str]) -> Result<Arc<T>, RegistryError> {
    global().try_get(qualifiers)
}

/// See [`RegistryApi::get_cloned`].
pub fn get_cloned<T: Clone + Send + Sync + 'static>(
    qualifiers: &[&str],
) -> Result<T, RegistryError> {
    global().get_cloned(qualifiers)
}

/// See [`RegistryApi::contains`].
pub fn contains<T: Send + Sync + 'static>(qualifiers: &[&str]) -> bool {
    global().contains::<T>(qualifiers)
}

/// See [`RegistryApi::remove`].
pub fn remove<T: Send + Sync + 'static>(qualifiers: &[&str]) -> bool {
    global().remove::<T>(qualifiers)
}

/// See [`RegistryApi::remove_all_matching`].
pub fn remove_all_matching(predicate: impl FnMut(&str) -> bool) -> usize {
    global().remove_all_matching(predicate)
}
