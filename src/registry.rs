//! The one-instance-per-type store.
//!
//! A [`SingletonRegistry`] is an explicitly owned context object. Hosts share it by
//! `Arc` with every [`SingletonLifecycle`](crate::SingletonLifecycle) adapter, and tests
//! build their own so they never see each other's entries. The process-wide default
//! lives behind [`global`].

use std::any::{Any, TypeId};
use std::collections::hash_map::Entry as MapEntry;
use std::collections::HashMap;
use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::sync::{Arc, LazyLock, Mutex, MutexGuard};

use crate::config::Diagnostics;
use crate::{
    DiagnosticsConfig, RegisterOutcome, RegistryError, RegistryEvent, TraceCallback, TypeKey,
    UnregisterOutcome,
};

/// Process-wide registry, configured from the environment on first access.
static GLOBAL_REGISTRY: LazyLock<Arc<SingletonRegistry>> =
    LazyLock::new(|| Arc::new(SingletonRegistry::with_config(DiagnosticsConfig::from_env())));

/// Returns a handle to the process-wide registry.
///
/// # Examples
///
/// ```
/// use singleton_lifecycle::global;
///
/// struct Clock;
///
/// global().register(Clock);
/// assert!(global().has_instance::<Clock>());
/// ```
pub fn global() -> Arc<SingletonRegistry> {
    Arc::clone(&GLOBAL_REGISTRY)
}

struct Entry {
    key: TypeKey,
    value: Arc<dyn Any + Send + Sync>,
}

/// Thread-safe map from a type to its single registered instance.
///
/// Every operation takes the same lock, so the decision to accept or reject a
/// registration is atomic: concurrent registrations of one type produce exactly one
/// [`RegisterOutcome::Registered`]. A poisoned lock is recovered, so no operation
/// fails because another thread panicked.
///
/// Diagnostics go to `tracing` and are written only while debug messages are enabled.
pub struct SingletonRegistry {
    entries: Mutex<HashMap<TypeId, Entry>>,
    trace: Mutex<Option<Arc<TraceCallback>>>,
    diagnostics: Diagnostics,
}

impl SingletonRegistry {
    /// Empty registry with diagnostics off.
    pub fn new() -> Self {
        Self::with_config(DiagnosticsConfig::default())
    }

    pub fn with_config(config: DiagnosticsConfig) -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            trace: Mutex::new(None),
            diagnostics: Diagnostics::new(config),
        }
    }

    fn entries(&self) -> MutexGuard<'_, HashMap<TypeId, Entry>> {
        self.entries.lock().unwrap_or_else(|p| p.into_inner())
    }

    // -------------------------------------------------------------------------------------------------
    // Diagnostics & tracing
    // -------------------------------------------------------------------------------------------------

    pub fn config(&self) -> DiagnosticsConfig {
        self.diagnostics.snapshot()
    }

    /// Whether diagnostics are written. Lifecycle adapters share this switch.
    pub fn debug_messages(&self) -> bool {
        self.diagnostics.debug_messages()
    }

    pub fn set_debug_messages(&self, enabled: bool) {
        self.diagnostics.set_debug_messages(enabled);
    }

    pub fn set_report_lookup_misses(&self, enabled: bool) {
        self.diagnostics.set_report_lookup_misses(enabled);
    }

    /// Set a callback invoked with a [`RegistryEvent`] for every registry operation.
    ///
    /// The callback runs after the storage lock is released, so it may query the registry.
    ///
    /// # Panics
    ///
    /// A panic inside the callback does not propagate to the caller of the registry
    /// operation. It is caught, logged at error level when debug messages are enabled,
    /// and the operation returns its normal result.
    pub fn set_trace_callback(&self, callback: impl Fn(&RegistryEvent) + Send + Sync + 'static) {
        let mut guard = self.trace.lock().unwrap_or_else(|p| p.into_inner());
        *guard = Some(Arc::new(callback));
    }

    pub fn clear_trace_callback(&self) {
        let mut guard = self.trace.lock().unwrap_or_else(|p| p.into_inner());
        *guard = None;
    }

    fn emit_event(&self, event: RegistryEvent) {
        let callback = self
            .trace
            .lock()
            .unwrap_or_else(|p| p.into_inner())
            .clone();
        if let Some(callback) = callback {
            let outcome = panic::catch_unwind(AssertUnwindSafe(|| callback(&event)));
            if outcome.is_err() && self.diagnostics.debug_messages() {
                tracing::error!(event = %event, "registry trace callback panicked");
            }
        }
    }

    // -------------------------------------------------------------------------------------------------
    // Registration
    // -------------------------------------------------------------------------------------------------

    /// Register `value` as the instance of `T` unless one is already registered.
    ///
    /// A duplicate is not an error: the existing instance is kept, `value` is dropped
    /// and a warning is logged.
    ///
    /// ```
    /// use singleton_lifecycle::{RegisterOutcome, SingletonRegistry};
    /// use std::sync::Arc;
    ///
    /// let registry = SingletonRegistry::new();
    /// assert_eq!(registry.register(1u8), RegisterOutcome::Registered);
    /// assert_eq!(registry.register(2u8), RegisterOutcome::AlreadyRegistered);
    ///
    /// let kept: Arc<u8> = registry.get_instance().unwrap();
    /// assert_eq!(*kept, 1);
    /// ```
    pub fn register<T: Send + Sync + 'static>(&self, value: T) -> RegisterOutcome {
        self.register_arc(Arc::new(value))
    }

    /// Register an `Arc`-wrapped value. The registry keeps a clone of the `Arc`, so the
    /// caller can compare identity later with [`unregister_instance`](Self::unregister_instance).
    pub fn register_arc<T: Send + Sync + 'static>(&self, value: Arc<T>) -> RegisterOutcome {
        let key = TypeKey::of::<T>();

        let outcome = match self.entries().entry(key.id()) {
            MapEntry::Occupied(_) => RegisterOutcome::AlreadyRegistered,
            MapEntry::Vacant(slot) => {
                slot.insert(Entry { key, value });
                RegisterOutcome::Registered
            }
        };

        self.emit_event(RegistryEvent::Register {
            type_name: key.name(),
            accepted: outcome.is_registered(),
        });

        if self.diagnostics.debug_messages() {
            match outcome {
                RegisterOutcome::Registered => {
                    tracing::info!(type_name = key.name(), "singleton registered");
                }
                RegisterOutcome::AlreadyRegistered => {
                    tracing::warn!(
                        type_name = key.name(),
                        "singleton already registered, skipping registration"
                    );
                }
            }
        }

        outcome
    }

    /// Remove whatever instance is registered for `T`. Idempotent.
    pub fn unregister<T: Send + Sync + 'static>(&self) -> UnregisterOutcome {
        let key = TypeKey::of::<T>();
        // Bound so the instance is dropped after the lock is released.
        let removed = self.entries().remove(&key.id());

        let outcome = if removed.is_some() {
            UnregisterOutcome::Removed
        } else {
            UnregisterOutcome::NotRegistered
        };
        self.report_unregister(key, outcome);
        outcome
    }

    /// Remove the entry for `T` only if it is `instance` itself.
    ///
    /// Used by lifecycle adapters: an adapter being torn down must never remove an
    /// instance registered by someone else after its own entry was already dropped.
    pub fn unregister_instance<T: Send + Sync + 'static>(
        &self,
        instance: &Arc<T>,
    ) -> UnregisterOutcome {
        let key = TypeKey::of::<T>();

        let (outcome, _removed) = {
            let mut entries = self.entries();
            let held = entries.get(&key.id()).map(|entry| {
                Arc::clone(&entry.value)
                    .downcast::<T>()
                    .map(|stored| Arc::ptr_eq(&stored, instance))
                    .unwrap_or(false)
            });
            match held {
                None => (UnregisterOutcome::NotRegistered, None),
                Some(true) => (UnregisterOutcome::Removed, entries.remove(&key.id())),
                Some(false) => (UnregisterOutcome::HeldByOther, None),
            }
        };

        self.report_unregister(key, outcome);
        outcome
    }

    fn report_unregister(&self, key: TypeKey, outcome: UnregisterOutcome) {
        self.emit_event(RegistryEvent::Unregister {
            type_name: key.name(),
            removed: outcome.is_removed(),
        });

        if !self.diagnostics.debug_messages() {
            return;
        }
        match outcome {
            UnregisterOutcome::Removed => {
                tracing::info!(type_name = key.name(), "singleton unregistered");
            }
            UnregisterOutcome::NotRegistered => {
                tracing::warn!(
                    type_name = key.name(),
                    "singleton not found, skipping unregistration"
                );
            }
            UnregisterOutcome::HeldByOther => {
                tracing::warn!(
                    type_name = key.name(),
                    "singleton is held by another instance, skipping unregistration"
                );
            }
        }
    }

    // -------------------------------------------------------------------------------------------------
    // Lookup
    // -------------------------------------------------------------------------------------------------

    /// Whether an instance of `T` is registered.
    pub fn has_instance<T: Send + Sync + 'static>(&self) -> bool {
        let key = TypeKey::of::<T>();
        let found = self.entries().contains_key(&key.id());

        self.emit_event(RegistryEvent::Contains {
            type_name: key.name(),
            found,
        });

        if !found && self.diagnostics.lookup_misses() {
            tracing::warn!(type_name = key.name(), "singleton not found");
        }
        found
    }

    /// Direct access to the registered instance of `T`.
    ///
    /// A miss is returned as [`RegistryError::TypeNotFound`] and logged at error level.
    /// Prefer [`try_get_instance`](Self::try_get_instance) when registration may not
    /// have happened yet.
    pub fn get_instance<T: Send + Sync + 'static>(&self) -> Result<Arc<T>, RegistryError> {
        let key = TypeKey::of::<T>();
        let stored = self
            .entries()
            .get(&key.id())
            .map(|entry| Arc::clone(&entry.value));

        let result = match stored {
            Some(value) => value
                .downcast::<T>()
                .map_err(|_| RegistryError::TypeMismatch {
                    type_name: key.name(),
                }),
            None => Err(RegistryError::TypeNotFound {
                type_name: key.name(),
            }),
        };

        self.emit_event(RegistryEvent::Get {
            type_name: key.name(),
            found: result.is_ok(),
        });

        if let Err(err) = &result {
            if self.diagnostics.debug_messages() {
                tracing::error!(type_name = key.name(), "{err}");
            }
        }

        result
    }

    /// Non-failing lookup. An empty registry answers `None` without a map lookup.
    pub fn try_get_instance<T: Send + Sync + 'static>(&self) -> Option<Arc<T>> {
        let key = TypeKey::of::<T>();

        let stored = {
            let entries = self.entries();
            if entries.is_empty() {
                None
            } else {
                Some(entries.get(&key.id()).map(|entry| Arc::clone(&entry.value)))
            }
        };

        let instance = match stored {
            None => {
                if self.diagnostics.lookup_misses() {
                    tracing::warn!(type_name = key.name(), "singleton registry is not initialized");
                }
                None
            }
            Some(value) => {
                let instance = value.and_then(|v| v.downcast::<T>().ok());
                if instance.is_none() && self.diagnostics.lookup_misses() {
                    tracing::warn!(type_name = key.name(), "singleton not found");
                }
                instance
            }
        };

        self.emit_event(RegistryEvent::Get {
            type_name: key.name(),
            found: instance.is_some(),
        });

        instance
    }

    /// Owned copy of the registered instance of `T`.
    pub fn get_cloned<T: Send + Sync + Clone + 'static>(&self) -> Result<T, RegistryError> {
        let arc = self.get_instance::<T>()?;
        Ok((*arc).clone())
    }

    /// `true` once at least one instance of any type is registered.
    pub fn is_initialized(&self) -> bool {
        !self.entries().is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries().is_empty()
    }

    /// Keys of every registered type, sorted by type name.
    pub fn registered_types(&self) -> Vec<TypeKey> {
        let mut keys: Vec<TypeKey> = self.entries().values().map(|entry| entry.key).collect();
        keys.sort_by_key(|key| key.name());
        keys
    }

    /// Remove every entry. Meant for tests; adapters that are still active are not notified.
    #[doc(hidden)]
    pub fn clear(&self) {
        self.emit_event(RegistryEvent::Clear {});

        let drained: Vec<Entry> = self.entries().drain().map(|(_, entry)| entry).collect();
        drop(drained);
    }
}

impl Default for SingletonRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for SingletonRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let types: Vec<&'static str> = self.registered_types().iter().map(|k| k.name()).collect();
        f.debug_struct("SingletonRegistry")
            .field("types", &types)
            .field("config", &self.config())
            .finish()
    }
}

// -------------------------------------------------------------------------------------------------
// Tests
// -------------------------------------------------------------------------------------------------
