use thiserror::Error;

/// Error type returned by a [`LifecycleHost`](crate::LifecycleHost) binding.
pub type HostError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Faults surfaced by [`SingletonLifecycle::try_create`](crate::SingletonLifecycle::try_create)
/// and [`SingletonLifecycle::try_destroy`](crate::SingletonLifecycle::try_destroy).
///
/// The [`Lifecycle`](crate::Lifecycle) callbacks log these and carry on.
#[derive(Debug, Error)]
pub enum LifecycleError {
    #[error("creation of singleton {type_name} was already handled")]
    AlreadyCreated { type_name: &'static str },

    #[error("singleton {type_name} was destroyed before it was created")]
    NotCreated { type_name: &'static str },

    #[error("singleton {type_name} was already destroyed")]
    AlreadyDestroyed { type_name: &'static str },

    #[error("host refused to destroy duplicate singleton {type_name}: {source}")]
    DestroyRequest {
        type_name: &'static str,
        #[source]
        source: HostError,
    },

    #[error("host panicked while handling singleton {type_name}: {message}")]
    Panicked {
        type_name: &'static str,
        message: String,
    },
}

impl LifecycleError {
    pub fn type_name(&self) -> &'static str {
        match self {
            LifecycleError::AlreadyCreated { type_name }
            | LifecycleError::NotCreated { type_name }
            | LifecycleError::AlreadyDestroyed { type_name }
            | LifecycleError::DestroyRequest { type_name, .. }
            | LifecycleError::Panicked { type_name, .. } => type_name,
        }
    }
}
