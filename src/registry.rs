//! The type-erased registry core.
//!
//! A [`Registry`] owns two tables behind one reader/writer lock:
//!
//! - the creator table, keyed by the unqualified selector of a type, holding one factory per type;
//! - the instance store, keyed by the full selector, holding one single-flight cell per selector.
//!
//! Creation never runs under the table lock. `get_or_create` reserves the cell for its selector
//! while holding the write lock, drops the lock, then fills the cell. Callers racing on the same
//! selector wait on the cell rather than on the registry, so a creator runs at most once per cell
//! and may itself resolve other selectors from the same registry.
//!
//! # Examples
//!
//! ```
//! use service_registry::{Instance, Registry, TypeKey};
//! use std::sync::Arc;
//!
//! let registry = Registry::new();
//! let key = TypeKey::of::<String>();
//! registry.register(key, Arc::new(|| Arc::new("hello".to_string()) as Instance));
//!
//! let first = registry.get_or_create(key, &[]).unwrap();
//! let second = registry.get_or_create(key, &[]).unwrap();
//! assert!(Arc::ptr_eq(&first, &second));
//! assert_eq!(registry.selectors(), vec!["_alloc::string::String".to_string()]);
//! ```

use std::any::Any;
use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, OnceLock};

use parking_lot::RwLock;
use tracing::{debug, trace, warn};

use crate::selector::{Selector, SelectorOwner, TypeKey};
use crate::{RegistryError, RegistryEvent};

/// A type-erased, shareable instance.
pub type Instance = Arc<dyn Any + Send + Sync>;

/// A type-erased zero-argument factory.
pub type Creator = Arc<dyn Fn() -> Instance + Send + Sync>;

/// User-supplied observer for [`RegistryEvent`]s.
pub type TraceCallback = dyn Fn(&RegistryEvent) + Send + Sync + 'static;

struct CreatorEntry {
    key: TypeKey,
    create: Creator,
}

struct Slot {
    owner: SelectorOwner,
    cell: OnceLock<Instance>,
}

impl Slot {
    fn new(key: TypeKey, qualifiers: &[&str]) -> Arc<Self> {
        Arc::new(Self {
            owner: SelectorOwner::new(key, qualifiers),
            cell: OnceLock::new(),
        })
    }

    fn check_owner(
        &self,
        key: &TypeKey,
        qualifiers: &[&str],
        selector: &Selector,
    ) -> Result<(), RegistryError> {
        if self.owner.matches(key, qualifiers) {
            return Ok(());
        }
        let requested = SelectorOwner::new(*key, qualifiers);
        warn!(
            selector = %selector,
            requested = %requested,
            existing = %self.owner,
            "selector collision in instance store"
        );
        Err(RegistryError::SelectorCollision {
            selector: selector.to_string(),
            requested: requested.to_string(),
            existing: self.owner.to_string(),
        })
    }
}

/// Removes a reserved slot from the store when its creator unwinds before filling it.
struct Reservation<'a> {
    tables: &'a RwLock<Tables>,
    selector: &'a Selector,
    slot: &'a Arc<Slot>,
}

impl Drop for Reservation<'_> {
    fn drop(&mut self) {
        if self.slot.cell.get().is_some() {
            return;
        }
        let mut tables = self.tables.write();
        let reserved = tables
            .instances
            .get(self.selector)
            .is_some_and(|slot| Arc::ptr_eq(slot, self.slot));
        if reserved {
            debug!(selector = %self.selector, "dropping slot left empty by a failed creator");
            tables.instances.remove(self.selector);
        }
    }
}

#[derive(Default)]
struct Tables {
    creators: HashMap<Selector, CreatorEntry>,
    instances: HashMap<Selector, Arc<Slot>>,
}

impl Tables {
    fn install_creator(&mut self, key: TypeKey, create: Creator) {
        let selector = Selector::for_type(&key);
        if let Some(previous) = self.creators.get(&selector) {
            if previous.key.id() != key.id() {
                warn!(
                    selector = %selector,
                    type_name = key.name(),
                    "creator replaces one registered by a different type with the same name"
                );
            }
        }
        self.creators.insert(selector, CreatorEntry { key, create });
    }

    fn creator_for(&self, key: &TypeKey) -> Result<Option<Creator>, RegistryError> {
        let selector = Selector::for_type(key);
        match self.creators.get(&selector) {
            Some(entry) if entry.key.id() == key.id() => Ok(Some(entry.create.clone())),
            Some(entry) => {
                warn!(selector = %selector, "selector collision in creator table");
                Err(RegistryError::SelectorCollision {
                    selector: selector.to_string(),
                    requested: SelectorOwner::new(*key, &[]).to_string(),
                    existing: SelectorOwner::new(entry.key, &[]).to_string(),
                })
            }
            None => Ok(None),
        }
    }
}

/// Lazily constructing instance cache keyed by type and qualifier.
///
/// Most code uses the typed methods of [`RegistryApi`](crate::RegistryApi), which `Registry`
/// implements, or the process-wide [`global`](fn@crate::global) registry. The methods here are the
/// erased core those build on.
pub struct Registry {
    tables: RwLock<Tables>,
    trace: RwLock<Option<Arc<TraceCallback>>>,
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Registry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tables = self.tables.read();
        f.debug_struct("Registry")
            .field("creators", &tables.creators.len())
            .field("instances", &tables.instances.len())
            .finish()
    }
}

impl Registry {
    /// Creates an empty, isolated registry.
    pub fn new() -> Self {
        Self {
            tables: RwLock::new(Tables::default()),
            trace: RwLock::new(None),
        }
    }

    // -------------------------------------------------------------------------------------------------
    // Tracing
    // -------------------------------------------------------------------------------------------------

    /// Sets a callback invoked for every registry operation.
    ///
    /// The callback runs with no registry lock held and may call back into the registry.
    pub fn set_trace_callback(&self, callback: impl Fn(&RegistryEvent) + Send + Sync + 'static) {
        *self.trace.write() = Some(Arc::new(callback));
    }

    /// Removes the trace callback. Registered creators and instances are unaffected.
    pub fn clear_trace_callback(&self) {
        *self.trace.write() = None;
    }

    fn emit_event(&self, event: impl FnOnce() -> RegistryEvent) {
        let callback = self.trace.read().clone();
        if let Some(callback) = callback {
            callback(&event());
        }
    }

    // -------------------------------------------------------------------------------------------------
    // Creators
    // -------------------------------------------------------------------------------------------------

    /// Stores `creator` as the factory for `key`, replacing any previous one.
    ///
    /// Already cached instances are not touched; only selectors without a cached instance will
    /// use the new creator.
    pub fn register(&self, key: TypeKey, creator: Creator) {
        self.tables.write().install_creator(key, creator);
        debug!(type_name = key.name(), "registered creator");
        self.emit_event(|| RegistryEvent::Register {
            type_name: key.name(),
        });
    }

    /// Whether a creator is registered for `key`.
    pub fn has_creator(&self, key: TypeKey) -> bool {
        matches!(self.tables.read().creator_for(&key), Ok(Some(_)))
    }

    // -------------------------------------------------------------------------------------------------
    // Instances
    // -------------------------------------------------------------------------------------------------

    /// Returns the cached instance for `(key, qualifiers)`, creating and caching it on first use.
    ///
    /// # Errors
    ///
    /// - [`RegistryError::TypeNotFound`] if nothing is cached and no creator is registered
    /// - [`RegistryError::SelectorCollision`] if the selector string is held by a different
    ///   `(type, qualifiers)` pair
    ///
    /// # Panics
    ///
    /// A panicking creator propagates to the caller. The selector stays empty and the next
    /// request retries creation.
    pub fn get_or_create(
        &self,
        key: TypeKey,
        qualifiers: &[&str],
    ) -> Result<Instance, RegistryError> {
        let selector = Selector::new(&key, qualifiers);
        let result = self.resolve(&key, qualifiers, &selector);

        let (found, created) = match &result {
            Ok((_, created)) => (true, *created),
            Err(_) => (false, false),
        };
        self.emit_event(|| RegistryEvent::Get {
            selector: selector.to_string(),
            found,
            created,
        });

        result.map(|(instance, _)| instance)
    }

    fn resolve(
        &self,
        key: &TypeKey,
        qualifiers: &[&str],
        selector: &Selector,
    ) -> Result<(Instance, bool), RegistryError> {
        {
            let tables = self.tables.read();
            if let Some(slot) = tables.instances.get(selector) {
                slot.check_owner(key, qualifiers, selector)?;
                if let Some(instance) = slot.cell.get() {
                    trace!(selector = %selector, "instance cache hit");
                    return Ok((instance.clone(), false));
                }
            }
        }

        let (slot, creator) = {
            let mut tables = self.tables.write();
            let pending = match tables.instances.get(selector) {
                Some(slot) => {
                    slot.check_owner(key, qualifiers, selector)?;
                    if let Some(instance) = slot.cell.get() {
                        return Ok((instance.clone(), false));
                    }
                    Some(slot.clone())
                }
                None => None,
            };
            let Some(creator) = tables.creator_for(key)? else {
                return Err(RegistryError::TypeNotFound {
                    type_name: key.name(),
                });
            };
            let slot = pending.unwrap_or_else(|| {
                let slot = Slot::new(*key, qualifiers);
                tables.instances.insert(selector.clone(), slot.clone());
                slot
            });
            (slot, creator)
        };

        let _reservation = Reservation {
            tables: &self.tables,
            selector,
            slot: &slot,
        };
        let mut created = false;
        let instance = slot
            .cell
            .get_or_init(|| {
                created = true;
                debug!(selector = %selector, "creating instance");
                creator()
            })
            .clone();
        Ok((instance, created))
    }

    /// Registers `creator` for `key` and eagerly re-creates the instance at `(key, qualifiers)`.
    ///
    /// Any instance previously cached at that selector is discarded. When this returns, the
    /// selector holds an instance produced by `creator`. Other selectors of the same type keep
    /// their cached instances.
    ///
    /// # Errors
    ///
    /// [`RegistryError::SelectorCollision`] if the selector string is held by a different
    /// `(type, qualifiers)` pair. Neither the creator table nor the instance store is changed.
    pub fn replace(
        &self,
        key: TypeKey,
        creator: Creator,
        qualifiers: &[&str],
    ) -> Result<Instance, RegistryError> {
        let selector = Selector::new(&key, qualifiers);
        let slot = Slot::new(key, qualifiers);
        {
            let mut tables = self.tables.write();
            if let Some(previous) = tables.instances.get(&selector) {
                previous.check_owner(&key, qualifiers, &selector)?;
            }
            tables.install_creator(key, creator.clone());
            tables.instances.insert(selector.clone(), slot.clone());
        }
        debug!(selector = %selector, "replacing instance");

        // A concurrent get_or_create may fill the cell first; it uses the same creator.
        let _reservation = Reservation {
            tables: &self.tables,
            selector: &selector,
            slot: &slot,
        };
        let instance = slot.cell.get_or_init(|| creator()).clone();

        self.emit_event(|| RegistryEvent::Replace {
            selector: selector.to_string(),
        });
        Ok(instance)
    }

    /// Same as [`replace`](Self::replace) with a creator that always returns `instance`.
    pub fn replace_with_instance(
        &self,
        key: TypeKey,
        instance: Instance,
        qualifiers: &[&str],
    ) -> Result<(), RegistryError> {
        self.replace(key, Arc::new(move || instance.clone()), qualifiers)
            .map(drop)
    }

    /// Evicts the instance cached at `(key, qualifiers)`.
    ///
    /// Returns whether a cached instance was removed; a missing entry is not an error. An entry
    /// whose selector string is held by a different `(type, qualifiers)` pair is left alone and
    /// reported as not removed. The creator stays registered, so the next request re-creates the
    /// instance.
    pub fn delete(&self, key: TypeKey, qualifiers: &[&str]) -> bool {
        let selector = Selector::new(&key, qualifiers);
        let removed = {
            let mut tables = self.tables.write();
            let owned = tables
                .instances
                .get(&selector)
                .map(|slot| slot.check_owner(&key, qualifiers, &selector).is_ok());
            match owned {
                Some(true) => tables
                    .instances
                    .remove(&selector)
                    .is_some_and(|slot| slot.cell.get().is_some()),
                _ => false,
            }
        };
        debug!(selector = %selector, removed, "deleted instance");
        self.emit_event(|| RegistryEvent::Delete {
            selector: selector.to_string(),
            removed,
        });
        removed
    }

    /// Evicts every cached instance whose raw selector satisfies `predicate`.
    ///
    /// The predicate sees selectors in the exact format of [`Selector`], including the leading
    /// `_` of unqualified entries. Selectors whose creator is still running are skipped. The
    /// predicate runs under the write lock and must not call back into this registry. Returns the
    /// number of evicted entries.
    pub fn delete_all_matching(&self, mut predicate: impl FnMut(&str) -> bool) -> usize {
        let mut removed = 0;
        self.tables.write().instances.retain(|selector, slot| {
            if slot.cell.get().is_some() && predicate(selector.as_str()) {
                removed += 1;
                false
            } else {
                true
            }
        });
        debug!(removed, "deleted matching instances");
        self.emit_event(|| RegistryEvent::DeleteMatching { removed });
        removed
    }

    /// Whether an instance is currently cached at `(key, qualifiers)`.
    ///
    /// Never invokes a creator.
    pub fn is_cached(&self, key: TypeKey, qualifiers: &[&str]) -> bool {
        let selector = Selector::new(&key, qualifiers);
        self.tables
            .read()
            .instances
            .get(&selector)
            .is_some_and(|slot| slot.owner.matches(&key, qualifiers) && slot.cell.get().is_some())
    }

    /// Sorted snapshot of the selectors holding a cached instance.
    pub fn selectors(&self) -> Vec<String> {
        let mut selectors: Vec<String> = self
            .tables
            .read()
            .instances
            .iter()
            .filter(|(_, slot)| slot.cell.get().is_some())
            .map(|(selector, _)| selector.to_string())
            .collect();
        selectors.sort();
        selectors
    }

    /// Drops every creator and every cached instance.
    ///
    /// Intended for tests. Instances already handed out stay valid; the trace callback is kept.
    #[doc(hidden)]
    pub fn clear(&self) {
        self.emit_event(|| RegistryEvent::Clear {});
        let mut tables = self.tables.write();
        tables.creators.clear();
        tables.instances.clear();
    }
}

// -------------------------------------------------------------------------------------------------
// Tests
// -------------------------------------------------------------------------------------------------
