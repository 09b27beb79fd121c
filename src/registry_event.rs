/// Events emitted by a registry during operations.
///
/// These are passed to the callback installed with
/// [`Registry::set_trace_callback`](crate::Registry::set_trace_callback). Selectors are carried
/// in their raw string form.
///
/// # Examples
///
/// ```rust
/// use service_registry::RegistryEvent;
///
/// let event = RegistryEvent::Register { type_name: "i32" };
/// assert_eq!(event.to_string(), "register { type_name: i32 }");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegistryEvent {
    /// A creator was registered for a type.
    Register { type_name: &'static str },

    /// An instance was requested.
    Get {
        selector: String,
        /// Whether an instance was returned.
        found: bool,
        /// Whether the creator ran to satisfy this request.
        created: bool,
    },

    /// A creator was replaced and the selector eagerly re-created.
    Replace { selector: String },

    /// A single cached instance was evicted (or was already absent).
    Delete { selector: String, removed: bool },

    /// Cached instances were evicted by predicate.
    DeleteMatching { removed: usize },

    /// All creators and instances were dropped.
    Clear {},
}

impl std::fmt::Display for RegistryEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RegistryEvent::Register { type_name } => {
                write!(f, "register {{ type_name: {} }}", type_name)
            }
            RegistryEvent::Get {
                selector,
                found,
                created,
            } => write!(
                f,
                "get {{ selector: {}, found: {}, created: {} }}",
                selector, found, created
            ),
            RegistryEvent::Replace { selector } => {
                write!(f, "replace {{ selector: {} }}", selector)
            }
            RegistryEvent::Delete { selector, removed } => {
                write!(f, "delete {{ selector: {}, removed: {} }}", selector, removed)
            }
            RegistryEvent::DeleteMatching { removed } => {
                write!(f, "delete_matching {{ removed: {} }}", removed)
            }
            RegistryEvent::Clear {} => write!(f, "Clearing the Registry"),
        }
    }
}
