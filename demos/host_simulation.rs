//! Host simulation example for singleton-lifecycle.
//!
//! Demonstrates:
//! - A toy host that creates and destroys objects carrying lifecycle adapters
//! - Duplicate managers being discarded while the original survives
//! - Diagnostics written through `tracing`
//!
//! Run with: `SINGLETON_DEBUG_MESSAGES=1 cargo run --example host_simulation`

use singleton_lifecycle::{
    global, HostError, Lifecycle, LifecycleHost, SingletonLifecycle, SingletonMediator,
};

#[derive(Debug)]
struct MusicPlayer {
    track: &'static str,
}

/// Remembers destruction requests so they can be honoured after the current frame.
#[derive(Default)]
struct Host {
    doomed: Vec<usize>,
    current: usize,
}

impl LifecycleHost for Host {
    fn request_destroy(&mut self) -> Result<(), HostError> {
        self.doomed.push(self.current);
        Ok(())
    }
}

fn main() {
    tracing_subscriber::fmt::init();

    println!("=== singleton-lifecycle: Host Simulation ===\n");

    let mut host = Host::default();
    let mut objects: Vec<Option<SingletonLifecycle<MusicPlayer>>> = Vec::new();

    // -------------------------------------------------------------------------
    // 1. Load two scenes, each shipping its own music player
    // -------------------------------------------------------------------------
    println!("1. Loading scenes...");

    for track in ["title theme", "battle theme"] {
        let mut player = SingletonLifecycle::new(global(), MusicPlayer { track });
        host.current = objects.len();
        player.on_create(&mut host);
        println!("   {track}: {:?}", player.state());
        objects.push(Some(player));
    }

    // -------------------------------------------------------------------------
    // 2. End of frame: reclaim duplicates
    // -------------------------------------------------------------------------
    println!("\n2. Reclaiming duplicates...");

    for index in host.doomed.drain(..) {
        if let Some(mut player) = objects[index].take() {
            player.on_destroy();
            println!(
                "   destroyed duplicate '{}', canonical is still '{}'",
                player.own_instance().track,
                player.instance().map(|p| p.track).unwrap_or("<none>")
            );
        }
    }

    // -------------------------------------------------------------------------
    // 3. Look the player up from anywhere
    // -------------------------------------------------------------------------
    println!("\n3. Looking up the player...");

    match global().try_get_instance::<MusicPlayer>() {
        Some(player) => println!("   now playing: {}", player.track),
        None => println!("   no music player registered"),
    }

    // -------------------------------------------------------------------------
    // 4. Unload everything
    // -------------------------------------------------------------------------
    println!("\n4. Unloading...");

    for mut player in objects.into_iter().flatten() {
        player.on_destroy();
    }
    println!(
        "   registry initialized: {}",
        global().is_initialized()
    );

    println!("\n=== Done ===");
}
