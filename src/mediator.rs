//! Instance accessor capability.

use std::sync::Arc;

/// Gives access to the canonical instance of a singleton type.
///
/// Implemented by [`SingletonLifecycle`](crate::SingletonLifecycle): every adapter of a type,
/// including a discarded duplicate, answers with the one instance that is registered.
pub trait SingletonMediator {
    type Target: Send + Sync + 'static;

    /// The registered instance, or `None` while no instance of the type is registered.
    fn instance(&self) -> Option<Arc<Self::Target>>;
}
