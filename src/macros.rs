//! Macros for declaring isolated process-wide registries.

/// Declares a module holding its own lazily initialized [`Registry`](crate::Registry).
///
/// The generated module contains:
/// - a hidden `static` registry, constructed on first use
/// - a public `Api` value implementing [`RegistryApi`](crate::RegistryApi)
/// - free functions mirroring the typed API
///
/// # Examples
///
/// ```rust
/// use service_registry::define_registry;
///
/// define_registry!(services);
///
/// services::register_creator(|| "postgres://localhost".to_string());
///
/// let url = services::get::<String>(&[]);
/// assert_eq!(url.as_str(), "postgres://localhost");
/// assert!(services::contains::<String>(&[]));
/// ```
///
/// # Multiple Registries
///
/// Each invocation is completely isolated from the others and from
/// [`global`](fn@crate::global):
///
/// ```rust
/// use service_registry::define_registry;
///
/// define_registry!(primary);
/// define_registry!(fallback);
///
/// primary::register_creator(|| 1u32);
/// assert!(primary::try_get::<u32>(&[]).is_ok());
/// assert!(fallback::try_get::<u32>(&[]).is_err());
/// ```
#[macro_export]
macro_rules! define_registry {
    ($name:ident) => {
        pub mod $name {
            #![allow(dead_code)]

            use std::sync::{Arc, LazyLock};

            static REGISTRY: LazyLock<$crate::Registry> = LazyLock::new($crate::Registry::new);

            /// Zero-sized handle implementing the typed registry API for this module.
            pub struct Api;

            impl $crate::RegistryApi for Api {
                fn registry(&self) -> &$crate::Registry {
                    &REGISTRY
                }
            }

            /// Convenient constant for trait-based access.
            pub const API: Api = Api;

            /// The underlying erased registry.
            pub fn registry() -> &'static $crate::Registry {
                &REGISTRY
            }

            pub fn register_creator<T, F>(creator: F)
            where
                T: Send + Sync + 'static,
                F: Fn() -> T + Send + Sync + 'static,
            {
                use $crate::RegistryApi;
                API.register_creator(creator)
            }

            pub fn override_creator<T, F>(
                creator: F,
                qualifiers: &[&str],
            ) -> Result<(), $crate::RegistryError>
            where
                T: Send + Sync + 'static,
                F: Fn() -> T + Send + Sync + 'static,
            {
                use $crate::RegistryApi;
                API.override_creator(creator, qualifiers)
            }

            pub fn override_instance<T: Send + Sync + 'static>(
                instance: T,
                qualifiers: &[&str],
            ) -> Result<(), $crate::RegistryError> {
                use $crate::RegistryApi;
                API.override_instance(instance, qualifiers)
            }

            /// Resolve `T`, silently falling back to `T::default()`.
            pub fn get<T: Default + Send + Sync + 'static>(qualifiers: &[&str]) -> Arc<T> {
                use $crate::RegistryApi;
                API.get(qualifiers)
            }

            pub fn try_get<T: Send + Sync + 'static>(
                qualifiers: &[&str],
            ) -> Result<Arc<T>, $crate::RegistryError> {
                use $crate::RegistryApi;
                API.try_get(qualifiers)
            }

            pub fn get_cloned<T: Clone + Send + Sync + 'static>(
                qualifiers: &[&str],
            ) -> Result<T, $crate::RegistryError> {
                use $crate::RegistryApi;
                API.get_cloned(qualifiers)
            }

            pub fn contains<T: Send + Sync + 'static>(qualifiers: &[&str]) -> bool {
                use $crate::RegistryApi;
                API.contains::<T>(qualifiers)
            }

            pub fn remove<T: Send + Sync + 'static>(qualifiers: &[&str]) -> bool {
                use $crate::RegistryApi;
                API.remove::<T>(qualifiers)
            }

            pub fn remove_all_matching(predicate: impl FnMut(&str) -> bool) -> usize {
                use $crate::RegistryApi;
                API.remove_all_matching(predicate)
            }

            pub fn set_trace_callback(
                callback: impl Fn(&$crate::RegistryEvent) + Send + Sync + 'static,
            ) {
                REGISTRY.set_trace_callback(callback)
            }

            pub fn clear_trace_callback() {
                REGISTRY.clear_trace_callback()
            }

            #[doc(hidden)]
            pub fn clear() {
                REGISTRY.clear()
            }
        }
    };
}
