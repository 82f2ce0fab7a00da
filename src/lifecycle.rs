//! Bridges host-driven creation and destruction events to registry membership.
//!
//! The host framework owns object lifetimes. It calls [`Lifecycle::on_create`] once when
//! an object enters the live system and [`Lifecycle::on_destroy`] once when it is torn
//! down. A [`SingletonLifecycle`] turns those calls into registration and unregistration,
//! and discards any second instance of a type that is already registered.
//!
//! ```text
//! Pending --on_create--> Active    --on_destroy--> Destroyed   (registered, then unregistered)
//! Pending --on_create--> Discarded --on_destroy--> Destroyed   (duplicate, never registered)
//! ```

use std::any::Any;
use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

use crate::{
    HostError, LifecycleError, RegisterOutcome, SingletonMediator, SingletonRegistry,
    UnregisterOutcome,
};

/// Services the host framework offers to a lifecycle adapter.
pub trait LifecycleHost {
    /// Ask the host to tear down the object that owns the adapter.
    ///
    /// Called from inside `on_create`. The host reclaims the object on its own schedule
    /// and still delivers `on_destroy` afterwards.
    fn request_destroy(&mut self) -> Result<(), HostError>;
}

impl<F> LifecycleHost for F
where
    F: FnMut() -> Result<(), HostError>,
{
    fn request_destroy(&mut self) -> Result<(), HostError> {
        self()
    }
}

/// Host-invoked creation and destruction callbacks.
///
/// Neither callback fails or unwinds into the host; faults are logged when diagnostics
/// are enabled and otherwise dropped.
pub trait Lifecycle {
    fn on_create(&mut self, host: &mut dyn LifecycleHost);

    fn on_destroy(&mut self);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleState {
    /// Not yet admitted by the host.
    Pending,
    /// Registered as the canonical instance of its type.
    Active,
    /// Rejected as a duplicate; destruction requested, never registered.
    Discarded,
    Destroyed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CreateOutcome {
    Registered,
    Discarded,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DestroyOutcome {
    /// The adapter's own entry was removed.
    Unregistered,
    /// The adapter was active but its entry was already gone or replaced.
    NotHeld,
    /// The adapter was a duplicate; the registry was not touched.
    Duplicate,
}

/// Lifecycle adapter that keeps one instance of `T` registered in a [`SingletonRegistry`].
///
/// # Examples
///
/// ```rust
/// use singleton_lifecycle::{
///     CreateOutcome, HostError, LifecycleState, SingletonLifecycle, SingletonRegistry,
/// };
/// use std::sync::Arc;
///
/// struct AudioMixer;
///
/// let registry = Arc::new(SingletonRegistry::new());
/// let mut host = || -> Result<(), HostError> { Ok(()) };
///
/// let mut first = SingletonLifecycle::new(registry.clone(), AudioMixer);
/// let mut second = SingletonLifecycle::new(registry.clone(), AudioMixer);
///
/// assert_eq!(first.try_create(&mut host).unwrap(), CreateOutcome::Registered);
/// assert_eq!(second.try_create(&mut host).unwrap(), CreateOutcome::Discarded);
/// assert_eq!(second.state(), LifecycleState::Discarded);
///
/// first.try_destroy().unwrap();
/// assert!(!registry.has_instance::<AudioMixer>());
/// ```
pub struct SingletonLifecycle<T: Send + Sync + 'static> {
    registry: Arc<SingletonRegistry>,
    instance: Arc<T>,
    state: LifecycleState,
    duplicate: bool,
}

impl<T: Send + Sync + 'static> SingletonLifecycle<T> {
    pub fn new(registry: Arc<SingletonRegistry>, instance: T) -> Self {
        Self::from_arc(registry, Arc::new(instance))
    }

    pub fn from_arc(registry: Arc<SingletonRegistry>, instance: Arc<T>) -> Self {
        Self {
            registry,
            instance,
            state: LifecycleState::Pending,
            duplicate: false,
        }
    }

    pub fn state(&self) -> LifecycleState {
        self.state
    }

    /// Set once during creation, never cleared.
    pub fn is_duplicate(&self) -> bool {
        self.duplicate
    }

    /// The payload this adapter was built with, registered or not.
    pub fn own_instance(&self) -> &Arc<T> {
        &self.instance
    }

    pub fn registry(&self) -> &Arc<SingletonRegistry> {
        &self.registry
    }

    fn type_name() -> &'static str {
        std::any::type_name::<T>()
    }

    /// Handle the host's creation event and report what happened.
    ///
    /// # Errors
    ///
    /// - [`LifecycleError::AlreadyCreated`] if creation was already handled
    /// - [`LifecycleError::DestroyRequest`] if the host refused to destroy a duplicate;
    ///   the adapter still ends up discarded
    /// - [`LifecycleError::Panicked`] if the host or a `tracing` subscriber panicked; any
    ///   registration made before the panic is undone and the adapter stays pending
    pub fn try_create(
        &mut self,
        host: &mut dyn LifecycleHost,
    ) -> Result<CreateOutcome, LifecycleError> {
        if self.state != LifecycleState::Pending {
            return Err(LifecycleError::AlreadyCreated {
                type_name: Self::type_name(),
            });
        }

        panic::catch_unwind(AssertUnwindSafe(|| self.create(host))).unwrap_or_else(|payload| {
            if self.state != LifecycleState::Discarded {
                self.roll_back();
            }
            Err(panicked(Self::type_name(), payload))
        })
    }

    /// Undo a creation that unwound after the instance may have been inserted.
    fn roll_back(&mut self) {
        self.state = LifecycleState::Pending;
        let registry = &self.registry;
        let instance = &self.instance;
        let released =
            panic::catch_unwind(AssertUnwindSafe(|| registry.unregister_instance(instance)));
        if let Ok(outcome) = released {
            if registry.debug_messages() {
                tracing::warn!(
                    type_name = Self::type_name(),
                    %outcome,
                    "singleton creation unwound, registration rolled back"
                );
            }
        }
    }

    fn create(&mut self, host: &mut dyn LifecycleHost) -> Result<CreateOutcome, LifecycleError> {
        let type_name = Self::type_name();

        // Existence check and insert are a single registry operation.
        match self.registry.register_arc(Arc::clone(&self.instance)) {
            RegisterOutcome::Registered => {
                self.state = LifecycleState::Active;
                if self.registry.debug_messages() {
                    tracing::info!(type_name, "singleton created");
                }
                Ok(CreateOutcome::Registered)
            }
            RegisterOutcome::AlreadyRegistered => {
                self.duplicate = true;
                self.state = LifecycleState::Discarded;
                if self.registry.debug_messages() {
                    tracing::warn!(type_name, "singleton already exists, destroying duplicate");
                }
                host.request_destroy()
                    .map_err(|source| LifecycleError::DestroyRequest { type_name, source })?;
                Ok(CreateOutcome::Discarded)
            }
        }
    }

    /// Handle the host's destruction event and report what happened.
    ///
    /// # Errors
    ///
    /// - [`LifecycleError::NotCreated`] if creation never happened
    /// - [`LifecycleError::AlreadyDestroyed`] on a second call
    /// - [`LifecycleError::Panicked`] if a `tracing` subscriber panicked
    pub fn try_destroy(&mut self) -> Result<DestroyOutcome, LifecycleError> {
        let type_name = Self::type_name();
        match self.state {
            LifecycleState::Pending => Err(LifecycleError::NotCreated { type_name }),
            LifecycleState::Destroyed => Err(LifecycleError::AlreadyDestroyed { type_name }),
            LifecycleState::Discarded => {
                self.state = LifecycleState::Destroyed;
                Ok(DestroyOutcome::Duplicate)
            }
            LifecycleState::Active => {
                self.state = LifecycleState::Destroyed;
                panic::catch_unwind(AssertUnwindSafe(|| self.release()))
                    .map_err(|payload| panicked(type_name, payload))
            }
        }
    }

    fn release(&self) -> DestroyOutcome {
        match self.registry.unregister_instance(&self.instance) {
            UnregisterOutcome::Removed => {
                if self.registry.debug_messages() {
                    tracing::info!(type_name = Self::type_name(), "singleton deleted");
                }
                DestroyOutcome::Unregistered
            }
            UnregisterOutcome::NotRegistered | UnregisterOutcome::HeldByOther => {
                DestroyOutcome::NotHeld
            }
        }
    }

    fn report(&self, stage: &'static str, err: &LifecycleError) {
        if self.registry.debug_messages() {
            tracing::error!(type_name = err.type_name(), stage, error = %err, "singleton lifecycle failure");
        }
    }
}

fn panicked(type_name: &'static str, payload: Box<dyn Any + Send>) -> LifecycleError {
    let message = if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic payload".to_string()
    };
    LifecycleError::Panicked { type_name, message }
}

impl<T: Send + Sync + 'static> Lifecycle for SingletonLifecycle<T> {
    fn on_create(&mut self, host: &mut dyn LifecycleHost) {
        if let Err(err) = self.try_create(host) {
            self.report("create", &err);
        }
    }

    fn on_destroy(&mut self) {
        if let Err(err) = self.try_destroy() {
            self.report("destroy", &err);
        }
    }
}

impl<T: Send + Sync + 'static> SingletonMediator for SingletonLifecycle<T> {
    type Target = T;

    fn instance(&self) -> Option<Arc<T>> {
        self.registry.try_get_instance::<T>()
    }
}

impl<T: Send + Sync + 'static> Drop for SingletonLifecycle<T> {
    /// An active adapter dropped without a destruction event still gives up its entry.
    fn drop(&mut self) {
        if self.state != LifecycleState::Active {
            return;
        }
        self.state = LifecycleState::Destroyed;
        match panic::catch_unwind(AssertUnwindSafe(|| self.release())) {
            Ok(outcome) => {
                if self.registry.debug_messages() {
                    tracing::warn!(
                        type_name = Self::type_name(),
                        ?outcome,
                        "singleton dropped without a destruction event"
                    );
                }
            }
            Err(payload) => self.report("drop", &panicked(Self::type_name(), payload)),
        }
    }
}

impl<T: Send + Sync + 'static> fmt::Debug for SingletonLifecycle<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SingletonLifecycle")
            .field("type_name", &Self::type_name())
            .field("state", &self.state)
            .field("duplicate", &self.duplicate)
            .finish()
    }
}
