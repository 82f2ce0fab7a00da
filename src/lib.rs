//! # Singleton Lifecycle
//!
//! A thread-safe registry holding exactly one live instance per type, and a lifecycle
//! adapter that registers and unregisters instances as a host framework creates and
//! destroys the objects owning them.
//!
//! When a second instance of an already registered type is created, the adapter marks
//! it as a duplicate and asks the host to destroy it. The original stays registered.
//!
//! ## Quick Start
//!
//! ```rust
//! use singleton_lifecycle::{Lifecycle, HostError, SingletonLifecycle, SingletonRegistry};
//! use std::sync::Arc;
//!
//! struct GameManager {
//!     level: u32,
//! }
//!
//! let registry = Arc::new(SingletonRegistry::new());
//! let mut host = || -> Result<(), HostError> { Ok(()) };
//!
//! let mut manager = SingletonLifecycle::new(registry.clone(), GameManager { level: 1 });
//! manager.on_create(&mut host);
//!
//! let current = registry.try_get_instance::<GameManager>().unwrap();
//! assert_eq!(current.level, 1);
//!
//! manager.on_destroy();
//! assert!(!registry.has_instance::<GameManager>());
//! ```
//!
//! ## Features
//!
//! - **One instance per type**: registration of an already registered type is rejected, never replaced
//! - **Thread-safe**: every operation is serialized by one lock; poisoning is recovered
//! - **Never throws across the lifecycle boundary**: host faults and panics are caught and logged
//! - **Explicit outcomes**: `RegisterOutcome`, `UnregisterOutcome`, `CreateOutcome`, `DestroyOutcome`
//! - **Diagnostics**: `tracing` output gated by [`DiagnosticsConfig`], plus an optional event callback
//!
//! ## Main Items
//!
//! - [`SingletonRegistry`] - the registry context object
//! - [`global`] - the process-wide registry
//! - [`define_registry!`] - declare additional named process-wide registries
//! - [`SingletonLifecycle`] - the lifecycle adapter, driven through [`Lifecycle`]
//! - [`LifecycleHost`] - what the host framework provides to an adapter

mod config;
mod lifecycle;
mod lifecycle_error;
mod macros;
mod mediator;
mod registry;
mod registry_error;
mod registry_event;
mod registry_outcome;
mod type_key;

pub use config::{DiagnosticsConfig, DEBUG_MESSAGES_ENV, REPORT_LOOKUP_MISSES_ENV};
pub use lifecycle::{
    CreateOutcome, DestroyOutcome, Lifecycle, LifecycleHost, LifecycleState, SingletonLifecycle,
};
pub use lifecycle_error::{HostError, LifecycleError};
pub use mediator::SingletonMediator;
pub use registry::{global, SingletonRegistry};
pub use registry_error::RegistryError;
pub use registry_event::{RegistryEvent, TraceCallback};
pub use registry_outcome::{RegisterOutcome, UnregisterOutcome};
pub use type_key::TypeKey;
