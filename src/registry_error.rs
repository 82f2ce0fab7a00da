use thiserror::Error;

/// Lookup failures reported by [`SingletonRegistry::get_instance`](crate::SingletonRegistry::get_instance).
///
/// Registration and unregistration never fail; they report through
/// [`RegisterOutcome`](crate::RegisterOutcome) and [`UnregisterOutcome`](crate::UnregisterOutcome).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    #[error("instance of type {type_name} not found; it must be created and registered before it is accessed")]
    TypeNotFound { type_name: &'static str },

    #[error("registry entry for type {type_name} holds a value of another type")]
    TypeMismatch { type_name: &'static str },
}

impl RegistryError {
    pub fn type_name(&self) -> &'static str {
        match self {
            RegistryError::TypeNotFound { type_name } | RegistryError::TypeMismatch { type_name } => {
                type_name
            }
        }
    }
}
