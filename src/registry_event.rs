/// Events emitted by the registry during operations.
///
/// These events are passed to the tracing callback set via
/// [`SingletonRegistry::set_trace_callback`](crate::SingletonRegistry::set_trace_callback).
/// Unlike the `tracing` diagnostics they are emitted whether or not debug messages are enabled.
///
/// # Examples
///
/// ```rust
/// use singleton_lifecycle::RegistryEvent;
///
/// let event = RegistryEvent::Register { type_name: "i32", accepted: true };
/// assert_eq!(event.to_string(), "register { type_name: i32, accepted: true }");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegistryEvent {
    /// A value was offered for registration.
    Register {
        type_name: &'static str,
        /// `false` when an instance was already registered and the value was rejected
        accepted: bool,
    },

    /// An unregistration was requested.
    Unregister {
        type_name: &'static str,
        removed: bool,
    },

    /// A value was requested with `get_instance` or `try_get_instance`.
    Get {
        type_name: &'static str,
        found: bool,
    },

    /// A `has_instance` check was performed.
    Contains {
        type_name: &'static str,
        found: bool,
    },

    /// The registry was cleared.
    Clear {},
}

/// Type alias for the user-supplied trace callback.
pub type TraceCallback = dyn Fn(&RegistryEvent) + Send + Sync + 'static;

impl std::fmt::Display for RegistryEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RegistryEvent::Register {
                type_name,
                accepted,
            } => {
                write!(f, "register {{ type_name: {type_name}, accepted: {accepted} }}")
            }
            RegistryEvent::Unregister { type_name, removed } => {
                write!(f, "unregister {{ type_name: {type_name}, removed: {removed} }}")
            }
            RegistryEvent::Get { type_name, found } => {
                write!(f, "get {{ type_name: {type_name}, found: {found} }}")
            }
            RegistryEvent::Contains { type_name, found } => {
                write!(f, "contains {{ type_name: {type_name}, found: {found} }}")
            }
            RegistryEvent::Clear {} => write!(f, "Clearing the Registry"),
        }
    }
}
