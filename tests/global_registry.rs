//! Integration tests for the process-wide registry returned by `global()`.
//!
//! NOTE: All tests use #[serial] because they share the same process-wide registry.
//! Running them in parallel would cause interference and non-deterministic failures.

use serial_test::serial;
use singleton_lifecycle::{
    global, HostError, Lifecycle, LifecycleState, RegisterOutcome, SingletonLifecycle,
};
use std::sync::Arc;

#[derive(Debug)]
struct SaveSystem {
    slot: u8,
}

fn no_op_host() -> impl FnMut() -> Result<(), HostError> {
    || Ok(())
}

#[test]
#[serial]
fn test_global_handles_share_state() {
    global().clear();

    assert_eq!(global().register(SaveSystem { slot: 1 }), RegisterOutcome::Registered);

    let handle = global();
    let again = global();
    assert!(Arc::ptr_eq(&handle, &again));
    assert_eq!(handle.get_instance::<SaveSystem>().unwrap().slot, 1);

    global().clear();
    assert!(!handle.is_initialized());
}

#[test]
#[serial]
fn test_global_lifecycle_round_trip() {
    global().clear();
    let mut host = no_op_host();

    let mut first = SingletonLifecycle::new(global(), SaveSystem { slot: 1 });
    let mut second = SingletonLifecycle::new(global(), SaveSystem { slot: 2 });

    first.on_create(&mut host);
    second.on_create(&mut host);
    assert_eq!(second.state(), LifecycleState::Discarded);
    assert_eq!(global().get_instance::<SaveSystem>().unwrap().slot, 1);

    second.on_destroy();
    first.on_destroy();
    assert!(!global().has_instance::<SaveSystem>());
}

#[test]
#[serial]
fn test_global_starts_fresh_after_clear() {
    global().clear();
    assert!(!global().is_initialized());
    assert!(global().try_get_instance::<SaveSystem>().is_none());
}
