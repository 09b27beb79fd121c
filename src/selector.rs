//! Key derivation for the creator table and the instance store.
//!
//! A selector is the string `"<q1>_<q2>_..._<qn>_<type name>"`. With no qualifiers the
//! joined part is empty, so the default selector of a type is `"_<type name>"`. The leading
//! separator is part of the key format and callers matching on raw selectors
//! (see [`Registry::delete_all_matching`](crate::Registry::delete_all_matching)) must account
//! for it.
//!
//! Distinct inputs can produce the same string (`["a_b"]` and `["a", "b"]`, or two types sharing
//! a `type_name`). The registry detects such aliasing through [`SelectorOwner`] rather than
//! trusting the string alone.

use std::any::TypeId;
use std::fmt;

const SEPARATOR: &str = "_";

/// Runtime identity of a registered type.
///
/// `id` is the monomorphized key, `name` is the human readable form that appears in selectors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TypeKey {
    id: TypeId,
    name: &'static str,
}

impl TypeKey {
    pub fn of<T: ?Sized + 'static>() -> Self {
        Self {
            id: TypeId::of::<T>(),
            name: std::any::type_name::<T>(),
        }
    }

    pub fn id(&self) -> TypeId {
        self.id
    }

    pub fn name(&self) -> &'static str {
        self.name
    }
}

impl fmt::Display for TypeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

/// String key derived from a [`TypeKey`] and a qualifier list.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Selector(String);

impl Selector {
    /// Builds the instance selector for `key` qualified by `qualifiers`.
    pub fn new(key: &TypeKey, qualifiers: &[&str]) -> Self {
        let prefix = qualifiers.join(SEPARATOR);
        let mut selector = String::with_capacity(prefix.len() + SEPARATOR.len() + key.name.len());
        selector.push_str(&prefix);
        selector.push_str(SEPARATOR);
        selector.push_str(key.name);
        Self(selector)
    }

    /// The unqualified selector, used to key the creator table.
    pub fn for_type(key: &TypeKey) -> Self {
        Self::new(key, &[])
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for Selector {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// The exact `(type, qualifiers)` pair a selector was computed from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct SelectorOwner {
    pub(crate) key: TypeKey,
    pub(crate) qualifiers: Box<[String]>,
}

impl SelectorOwner {
    pub(crate) fn new(key: TypeKey, qualifiers: &[&str]) -> Self {
        Self {
            key,
            qualifiers: qualifiers.iter().map(|q| (*q).to_owned()).collect(),
        }
    }

    pub(crate) fn matches(&self, key: &TypeKey, qualifiers: &[&str]) -> bool {
        self.key.id() == key.id()
            && self.qualifiers.len() == qualifiers.len()
            && self.qualifiers.iter().zip(qualifiers).all(|(a, b)| a == b)
    }
}

impl fmt::Display for SelectorOwner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {:?}", self.key.name(), self.qualifiers)
    }
}
