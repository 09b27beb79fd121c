//! Typed façade over the erased [`Registry`] core.
//!
//! This module provides the `RegistryApi` trait with default implementations for type-safe
//! creator registration, lookup, override and removal. Implementors only supply access to a
//! [`Registry`]; [`Registry`] itself, the `Api` value generated by
//! [`define_registry!`](crate::define_registry) and the process-wide registry all use it.
//!
//! # Silent default on lookup
//!
//! [`RegistryApi::get`] never fails. When no creator is registered for `T`, or the cached value
//! is not a `T`, it returns a fresh `T::default()` that is **not** cached. That result is easy to
//! mistake for a resolved service. Use [`RegistryApi::try_get`] wherever "absent" must be told
//! apart from "present".

use std::sync::Arc;

use crate::registry::{Instance, Registry};
use crate::selector::{Selector, TypeKey};
use crate::RegistryError;

/// Core trait defining typed registry behavior.
pub trait RegistryApi {
    /// Access the registry the typed operations act on.
    fn registry(&self) -> &Registry;

    /// Register `creator` as the factory for `T`.
    ///
    /// Replaces any previous creator for `T`. Instances already cached keep living until they
    /// are removed or overridden.
    fn register_creator<T, F>(&self, creator: F)
    where
        T: Send + Sync + 'static,
        F: Fn() -> T + Send + Sync + 'static,
    {
        self.registry().register(
            TypeKey::of::<T>(),
            Arc::new(move || Arc::new(creator()) as Instance),
        );
    }

    /// Register `creator` for `T` and immediately re-create the instance at `qualifiers`.
    ///
    /// The next [`get`](Self::get) for the same qualifiers returns the new instance. Other
    /// cached instances of `T` are left alone, but uncached qualifiers will use `creator`.
    ///
    /// # Errors
    ///
    /// [`RegistryError::SelectorCollision`] if the selector belongs to another type/qualifier;
    /// nothing is changed in that case.
    fn override_creator<T, F>(&self, creator: F, qualifiers: &[&str]) -> Result<(), RegistryError>
    where
        T: Send + Sync + 'static,
        F: Fn() -> T + Send + Sync + 'static,
    {
        self.registry()
            .replace(
                TypeKey::of::<T>(),
                Arc::new(move || Arc::new(creator()) as Instance),
                qualifiers,
            )
            .map(drop)
    }

    /// Store `instance` at `qualifiers` and make it the creator result for `T`.
    ///
    /// Every later creation of `T` hands out this same shared instance.
    ///
    /// # Errors
    ///
    /// Same as [`override_creator`](Self::override_creator).
    fn override_instance<T>(&self, instance: T, qualifiers: &[&str]) -> Result<(), RegistryError>
    where
        T: Send + Sync + 'static,
    {
        let instance: Instance = Arc::new(instance);
        self.registry()
            .replace_with_instance(TypeKey::of::<T>(), instance, qualifiers)
    }

    /// Resolve `T`, falling back to `T::default()`.
    ///
    /// The fallback covers both an unregistered `T` and a cached value of another type. It is
    /// not cached and carries no error; see the module docs and [`try_get`](Self::try_get).
    fn get<T>(&self, qualifiers: &[&str]) -> Arc<T>
    where
        T: Default + Send + Sync + 'static,
    {
        self.try_get(qualifiers).unwrap_or_default()
    }

    /// Resolve `T`, creating it on first use.
    ///
    /// # Errors
    ///
    /// - [`RegistryError::TypeNotFound`] if `T` has no creator and nothing is cached
    /// - [`RegistryError::TypeMismatch`] if the cached value is not a `T`
    /// - [`RegistryError::SelectorCollision`] if the selector belongs to another type/qualifier
    fn try_get<T>(&self, qualifiers: &[&str]) -> Result<Arc<T>, RegistryError>
    where
        T: Send + Sync + 'static,
    {
        let key = TypeKey::of::<T>();
        self.registry()
            .get_or_create(key, qualifiers)?
            .downcast::<T>()
            .map_err(|_| RegistryError::TypeMismatch {
                type_name: key.name(),
                selector: Selector::new(&key, qualifiers).to_string(),
            })
    }

    /// Resolve `T` and return a clone of the shared instance.
    ///
    /// # Errors
    ///
    /// Same as [`try_get`](Self::try_get).
    fn get_cloned<T>(&self, qualifiers: &[&str]) -> Result<T, RegistryError>
    where
        T: Clone + Send + Sync + 'static,
    {
        let arc = self.try_get::<T>(qualifiers)?;
        Ok((*arc).clone())
    }

    /// Whether an instance of `T` is cached at `qualifiers`. Never creates one.
    fn contains<T>(&self, qualifiers: &[&str]) -> bool
    where
        T: Send + Sync + 'static,
    {
        self.registry().is_cached(TypeKey::of::<T>(), qualifiers)
    }

    /// Evict the cached `T` at `qualifiers`. Returns whether an entry was removed.
    fn remove<T>(&self, qualifiers: &[&str]) -> bool
    where
        T: Send + Sync + 'static,
    {
        self.registry().delete(TypeKey::of::<T>(), qualifiers)
    }

    /// Evict every cached instance whose raw selector satisfies `predicate`.
    ///
    /// Selectors have the form `"<qualifiers joined by _>_<type name>"`, so an unqualified entry
    /// starts with `_`. Returns the number of evicted entries.
    fn remove_all_matching(&self, predicate: impl FnMut(&str) -> bool) -> usize {
        self.registry().delete_all_matching(predicate)
    }
}

impl RegistryApi for Registry {
    fn registry(&self) -> &Registry {
        self
    }
}

// -------------------------------------------------------------------------------------------------
// Tests
// -------------------------------------------------------------------------------------------------
