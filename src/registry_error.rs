use thiserror::Error;

/// Failure modes of a registry lookup.
///
/// The typed [`RegistryApi::get`](crate::RegistryApi::get) collapses all of these into
/// `T::default()`. Use [`RegistryApi::try_get`](crate::RegistryApi::try_get) to observe them.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    /// No instance is cached and no creator is registered for the type.
    #[error("Type not found in registry: {type_name}")]
    TypeNotFound { type_name: &'static str },

    /// The cached instance cannot be viewed as the requested type.
    #[error("Type mismatch in registry for type: {type_name} (selector `{selector}`)")]
    TypeMismatch {
        type_name: &'static str,
        selector: String,
    },

    /// Two different `(type, qualifiers)` pairs produced the same selector string.
    #[error("Selector `{selector}` requested as {requested} is already held by {existing}")]
    SelectorCollision {
        selector: String,
        requested: String,
        existing: String,
    },
}
