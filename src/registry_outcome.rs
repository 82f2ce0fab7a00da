//! Outcomes of the registry's mutating operations.
//!
//! Neither outcome is an error: a rejected duplicate or a missing entry is normal
//! traffic for a lifecycle-driven registry. Callers that do not care can ignore them.

use std::fmt;

/// Result of [`SingletonRegistry::register`](crate::SingletonRegistry::register).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegisterOutcome {
    /// The value became the registered instance for its type.
    Registered,
    /// An instance of the type was already registered. It was kept and the new value dropped.
    AlreadyRegistered,
}

impl RegisterOutcome {
    pub fn is_registered(self) -> bool {
        matches!(self, RegisterOutcome::Registered)
    }
}

/// Result of [`SingletonRegistry::unregister`](crate::SingletonRegistry::unregister) and
/// [`SingletonRegistry::unregister_instance`](crate::SingletonRegistry::unregister_instance).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnregisterOutcome {
    Removed,
    /// Nothing was registered for the type.
    NotRegistered,
    /// The entry belongs to a different instance and was left in place.
    HeldByOther,
}

impl UnregisterOutcome {
    pub fn is_removed(self) -> bool {
        matches!(self, UnregisterOutcome::Removed)
    }
}

impl fmt::Display for RegisterOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RegisterOutcome::Registered => f.write_str("registered"),
            RegisterOutcome::AlreadyRegistered => f.write_str("already registered"),
        }
    }
}

impl fmt::Display for UnregisterOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UnregisterOutcome::Removed => f.write_str("removed"),
            UnregisterOutcome::NotRegistered => f.write_str("not registered"),
            UnregisterOutcome::HeldByOther => f.write_str("held by another instance"),
        }
    }
}
