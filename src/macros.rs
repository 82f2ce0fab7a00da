//! Macro for declaring named process-wide registries.

/// Declares a module holding its own process-wide [`SingletonRegistry`](crate::SingletonRegistry).
///
/// The generated module contains:
/// - a lazily built registry (hidden), configured from the environment
/// - `registry()` returning a shared handle, for handing to lifecycle adapters
/// - free functions mirroring the registry's operations
/// - `lifecycle(instance)` building a [`SingletonLifecycle`](crate::SingletonLifecycle) bound to it
///
/// # Examples
///
/// ```rust
/// use singleton_lifecycle::{define_registry, RegisterOutcome};
/// use std::sync::Arc;
///
/// define_registry!(services);
///
/// struct Telemetry {
///     endpoint: &'static str,
/// }
///
/// assert!(!services::is_initialized());
/// services::register(Telemetry { endpoint: "udp://collector" });
/// assert_eq!(
///     services::register(Telemetry { endpoint: "udp://other" }),
///     RegisterOutcome::AlreadyRegistered
/// );
///
/// let telemetry: Arc<Telemetry> = services::get_instance().unwrap();
/// assert_eq!(telemetry.endpoint, "udp://collector");
/// ```
///
/// # Multiple Registries
///
/// Registries declared with different names never share entries:
///
/// ```rust
/// use singleton_lifecycle::define_registry;
///
/// define_registry!(scene);
/// define_registry!(menu);
///
/// scene::register(1u32);
/// assert!(scene::has_instance::<u32>());
/// assert!(!menu::has_instance::<u32>());
/// ```
#[macro_export]
macro_rules! define_registry {
    ($name:ident) => {
        pub mod $name {
            use std::sync::{Arc, LazyLock};

            static REGISTRY: LazyLock<Arc<$crate::SingletonRegistry>> = LazyLock::new(|| {
                Arc::new($crate::SingletonRegistry::with_config(
                    $crate::DiagnosticsConfig::from_env(),
                ))
            });

            /// Shared handle to this module's registry.
            pub fn registry() -> Arc<$crate::SingletonRegistry> {
                Arc::clone(&REGISTRY)
            }

            /// Build a lifecycle adapter that registers into this module's registry.
            pub fn lifecycle<T: Send + Sync + 'static>(
                instance: T,
            ) -> $crate::SingletonLifecycle<T> {
                $crate::SingletonLifecycle::new(registry(), instance)
            }

            pub fn register<T: Send + Sync + 'static>(value: T) -> $crate::RegisterOutcome {
                REGISTRY.register(value)
            }

            pub fn register_arc<T: Send + Sync + 'static>(
                value: Arc<T>,
            ) -> $crate::RegisterOutcome {
                REGISTRY.register_arc(value)
            }

            pub fn unregister<T: Send + Sync + 'static>() -> $crate::UnregisterOutcome {
                REGISTRY.unregister::<T>()
            }

            pub fn has_instance<T: Send + Sync + 'static>() -> bool {
                REGISTRY.has_instance::<T>()
            }

            pub fn get_instance<T: Send + Sync + 'static>(
            ) -> Result<Arc<T>, $crate::RegistryError> {
                REGISTRY.get_instance::<T>()
            }

            pub fn try_get_instance<T: Send + Sync + 'static>() -> Option<Arc<T>> {
                REGISTRY.try_get_instance::<T>()
            }

            pub fn is_initialized() -> bool {
                REGISTRY.is_initialized()
            }

            pub fn set_trace_callback(
                callback: impl Fn(&$crate::RegistryEvent) + Send + Sync + 'static,
            ) {
                REGISTRY.set_trace_callback(callback)
            }

            pub fn clear_trace_callback() {
                REGISTRY.clear_trace_callback()
            }
        }
    };
}
