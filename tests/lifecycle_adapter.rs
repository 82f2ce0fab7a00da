//! Integration tests driving `SingletonLifecycle` through a simulated host framework.
//!
//! The host admits objects, collects destruction requests made during creation, and
//! later tears those objects down, the way a scene or entity system would.

use singleton_lifecycle::{
    CreateOutcome, DestroyOutcome, HostError, Lifecycle, LifecycleHost, LifecycleState,
    SingletonLifecycle, SingletonMediator, SingletonRegistry,
};
use std::sync::{Arc, Barrier};
use std::thread;

#[derive(Debug)]
struct AudioManager {
    id: u32,
}

#[derive(Debug)]
struct InputManager;

/// Host that records which object asked to be destroyed.
#[derive(Default)]
struct SceneHost {
    pending_destroy: Vec<usize>,
    current: usize,
}

impl LifecycleHost for SceneHost {
    fn request_destroy(&mut self) -> Result<(), HostError> {
        self.pending_destroy.push(self.current);
        Ok(())
    }
}

struct Scene {
    host: SceneHost,
    objects: Vec<Option<Box<dyn Lifecycle>>>,
}

impl Scene {
    fn new() -> Self {
        Self {
            host: SceneHost::default(),
            objects: Vec::new(),
        }
    }

    fn spawn(&mut self, mut object: Box<dyn Lifecycle>) -> usize {
        let index = self.objects.len();
        self.host.current = index;
        object.on_create(&mut self.host);
        self.objects.push(Some(object));
        index
    }

    /// Reclaims every object that asked for destruction; returns their indices.
    fn collect_garbage(&mut self) -> Vec<usize> {
        let doomed: Vec<usize> = self.host.pending_destroy.drain(..).collect();
        for &index in &doomed {
            self.despawn(index);
        }
        doomed
    }

    fn despawn(&mut self, index: usize) {
        if let Some(mut object) = self.objects[index].take() {
            object.on_destroy();
        }
    }

    fn alive(&self) -> usize {
        self.objects.iter().filter(|o| o.is_some()).count()
    }
}

#[test]
fn test_scene_discards_duplicate_managers() {
    let registry = Arc::new(SingletonRegistry::new());
    let mut scene = Scene::new();

    let first = scene.spawn(Box::new(SingletonLifecycle::new(
        registry.clone(),
        AudioManager { id: 1 },
    )));
    let second = scene.spawn(Box::new(SingletonLifecycle::new(
        registry.clone(),
        AudioManager { id: 2 },
    )));
    scene.spawn(Box::new(SingletonLifecycle::new(registry.clone(), InputManager)));

    assert_eq!(scene.collect_garbage(), vec![second]);
    assert_eq!(scene.alive(), 2);
    assert_eq!(registry.get_instance::<AudioManager>().unwrap().id, 1);
    assert!(registry.has_instance::<InputManager>());

    scene.despawn(first);
    assert!(!registry.has_instance::<AudioManager>());
    assert!(registry.has_instance::<InputManager>());
}

#[test]
fn test_replacement_after_teardown() {
    let registry = Arc::new(SingletonRegistry::new());
    let mut scene = Scene::new();

    let first = scene.spawn(Box::new(SingletonLifecycle::new(
        registry.clone(),
        AudioManager { id: 1 },
    )));
    scene.despawn(first);

    scene.spawn(Box::new(SingletonLifecycle::new(
        registry.clone(),
        AudioManager { id: 2 },
    )));

    assert!(scene.collect_garbage().is_empty());
    assert_eq!(registry.get_instance::<AudioManager>().unwrap().id, 2);
}

#[test]
fn test_duplicate_teardown_keeps_original() {
    let registry = Arc::new(SingletonRegistry::new());
    let mut host = SceneHost::default();

    let mut original = SingletonLifecycle::new(registry.clone(), AudioManager { id: 1 });
    let mut duplicate = SingletonLifecycle::new(registry.clone(), AudioManager { id: 2 });

    assert_eq!(original.try_create(&mut host).unwrap(), CreateOutcome::Registered);
    assert_eq!(duplicate.try_create(&mut host).unwrap(), CreateOutcome::Discarded);
    assert_eq!(host.pending_destroy.len(), 1);

    assert_eq!(duplicate.try_destroy().unwrap(), DestroyOutcome::Duplicate);
    assert_eq!(duplicate.state(), LifecycleState::Destroyed);
    assert_eq!(duplicate.instance().unwrap().id, 1);
    assert_eq!(original.state(), LifecycleState::Active);

    assert_eq!(original.try_destroy().unwrap(), DestroyOutcome::Unregistered);
    assert!(duplicate.instance().is_none());
}

#[test]
fn test_failing_host_does_not_escape_callbacks() {
    struct BrokenHost;

    impl LifecycleHost for BrokenHost {
        fn request_destroy(&mut self) -> Result<(), HostError> {
            Err("object already scheduled".into())
        }
    }

    let registry = Arc::new(SingletonRegistry::new());
    registry.set_debug_messages(true);

    let mut original = SingletonLifecycle::new(registry.clone(), InputManager);
    let mut duplicate = SingletonLifecycle::new(registry.clone(), InputManager);

    original.on_create(&mut BrokenHost);
    duplicate.on_create(&mut BrokenHost);
    duplicate.on_destroy();
    duplicate.on_destroy();

    assert!(duplicate.is_duplicate());
    assert_eq!(duplicate.state(), LifecycleState::Destroyed);
    assert!(Arc::ptr_eq(
        &registry.get_instance::<InputManager>().unwrap(),
        original.own_instance()
    ));
}

#[test]
fn test_concurrent_creation_elects_one_instance() {
    const ADAPTERS: u32 = 16;

    let registry = Arc::new(SingletonRegistry::new());
    let barrier = Arc::new(Barrier::new(ADAPTERS as usize));

    let handles: Vec<_> = (0..ADAPTERS)
        .map(|id| {
            let registry = registry.clone();
            let barrier = barrier.clone();
            thread::spawn(move || {
                let mut host = SceneHost::default();
                let mut adapter = SingletonLifecycle::new(registry, AudioManager { id });
                barrier.wait();
                adapter.on_create(&mut host);
                (adapter, host.pending_destroy.len())
            })
        })
        .collect();

    let results: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();

    let active: Vec<_> = results
        .iter()
        .filter(|(adapter, _)| adapter.state() == LifecycleState::Active)
        .collect();
    let destroy_requests: usize = results.iter().map(|(_, requests)| requests).sum();

    assert_eq!(active.len(), 1);
    assert_eq!(destroy_requests, ADAPTERS as usize - 1);
    assert_eq!(
        registry.get_instance::<AudioManager>().unwrap().id,
        active[0].0.own_instance().id
    );
}
