//=========================================================================
// Ringbeat Engine
//
// Entry point wiring the window platform to the game scene.
//
// Architecture:
// ```text
//     EngineBuilder  ──build()──>  Engine  ──run(build_scene)──>  [Runtime]
//         │                          │
//         ├─ with_tps()              ├─ spawns the core thread
//         ├─ with_channel_capacity() │    (scene built and ticked there)
//         └─ with_title()            └─ runs the platform loop here
// ```
//
//=========================================================================

//=== External Dependencies ===============================================

use std::thread;
use std::time::{Duration, Instant};

use crossbeam_channel::{bounded, Receiver, Sender};
use log::{error, info};

//=== Internal Dependencies ===============================================

use crate::core::platform_bridge::{EventCollector, PlatformEvent, TickControl};
use crate::game::{FrameRenderer, GameScene, LoadError};
use crate::platform::Platform;

//=== EngineBuilder =======================================================

/// Builder for configuring and constructing an [`Engine`].
///
/// # Default Values
///
/// - **TPS**: 60.0 (core ticks per second)
/// - **Channel capacity**: 128 platform messages
/// - **Title**: "ringbeat"
///
/// # Examples
///
/// ```no_run
/// use ringbeat::EngineBuilder;
/// use ringbeat::game::{Camera, FrameRenderer, GameScene, GameTree, LoadError, Song, SongLoader};
/// # use ringbeat::game::{Note, SongMetadata};
/// # struct Files;
/// # impl SongLoader for Files {
/// #     fn metadata(&self, path: &str) -> Result<SongMetadata, LoadError> { Err(LoadError::NotFound(path.into())) }
/// #     fn notes(&self, path: &str) -> Result<Vec<Note>, LoadError> { Err(LoadError::NotFound(path.into())) }
/// # }
///
/// struct Headless;
///
/// impl FrameRenderer for Headless {
///     fn render(&mut self, _tree: &GameTree, _camera: &Camera) {}
/// }
///
/// EngineBuilder::new()
///     .with_tps(120.0)
///     .with_title("ringbeat: demo")
///     .build()
///     .run(|| GameScene::load(Song::new("demo"), 0, &Files, Headless));
/// ```
pub struct EngineBuilder {
    tps: f64,
    channel_capacity: usize,
    title: String,
}

impl EngineBuilder {
    /// Creates a new builder with default settings.
    pub fn new() -> Self {
        Self {
            tps: 60.0,
            channel_capacity: 128,
            title: "ringbeat".to_string(),
        }
    }

    /// Sets the target ticks per second of the core thread.
    ///
    /// Each tick feeds pending key batches to the scene and animates one
    /// frame.
    ///
    /// # Panics
    ///
    /// Panics if `tps <= 0.0`.
    pub fn with_tps(mut self, tps: f64) -> Self {
        assert!(tps > 0.0, "TPS must be positive, got {}", tps);
        self.tps = tps;
        self
    }

    /// Sets the channel capacity for platform → core communication.
    ///
    /// # Panics
    ///
    /// Panics if `capacity == 0`.
    pub fn with_channel_capacity(mut self, capacity: usize) -> Self {
        assert!(capacity > 0, "Channel capacity must be positive");
        self.channel_capacity = capacity;
        self
    }

    /// Sets the window title.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn build(self) -> Engine {
        info!("Building engine (TPS: {}, channel: {})", self.tps, self.channel_capacity);

        Engine {
            tps: self.tps,
            channel_capacity: self.channel_capacity,
            title: self.title,
        }
    }
}

impl Default for EngineBuilder {
    fn default() -> Self {
        Self::new()
    }
}

//=== Engine ==============================================================

/// Ringbeat runtime.
///
/// ```text
/// Engine (Main Thread)
///   ├─► Core Thread @ TPS
///   │     └─► EventCollector → GameScene (handle_input, animate)
///   │
///   └─► Platform (Event Loop)
///         └─► Window, Key Polling
///
/// Communication: bounded channel (PlatformEvent)
/// ```
pub struct Engine {
    tps: f64,
    channel_capacity: usize,
    title: String,
}

impl Engine {
    /// Starts the runtime and blocks until the window closes.
    ///
    /// `build_scene` runs on the core thread, since the scene tree is not
    /// `Send`. If it fails, the error is logged and the window stays open
    /// until closed.
    ///
    /// # Lifecycle
    ///
    /// 1. Creates the platform → core channel
    /// 2. Spawns the core thread, which builds the scene
    /// 3. Runs the platform event loop (blocks here)
    /// 4. On window close: core thread exits and is joined
    pub fn run<F, R>(self, build_scene: F)
    where
        F: FnOnce() -> Result<GameScene<R>, LoadError> + Send + 'static,
        R: FrameRenderer + 'static,
    {
        info!("Starting engine runtime (TPS: {})", self.tps);

        //--- 1. Create communication channel -----------------------------
        let (tx, rx): (Sender<PlatformEvent>, Receiver<PlatformEvent>) =
            bounded(self.channel_capacity);

        //--- 2. Spawn the core thread ------------------------------------
        let core_handle = spawn_core_thread(rx, self.tps, build_scene);

        //--- 3. Launch the platform subsystem -----------------------------
        let platform = Platform::new(tx, self.title);
        info!("Platform initialized, entering event loop");

        if let Err(e) = platform.run() {
            error!("Platform error: {}", e);
        }

        info!("Platform event loop exited");

        //--- 4. Cleanup --------------------------------------------------
        match core_handle.join() {
            Ok(()) => info!("Core thread terminated cleanly"),
            Err(e) => error!("Core thread panicked: {:?}", e),
        }

        info!("Engine shutdown complete");
    }
}

//=== Core Thread =========================================================

fn spawn_core_thread<F, R>(
    receiver: Receiver<PlatformEvent>,
    tps: f64,
    build_scene: F,
) -> thread::JoinHandle<()>
where
    F: FnOnce() -> Result<GameScene<R>, LoadError> + Send + 'static,
    R: FrameRenderer + 'static,
{
    let frame_duration = Duration::from_secs_f64(1.0 / tps);

    thread::spawn(move || {
        info!("Core thread started");

        let mut scene = match build_scene() {
            Ok(scene) => scene,
            Err(e) => {
                error!("Scene failed to load: {}", e);
                return;
            }
        };

        let mut core = CoreLoop::new(EventCollector::new(receiver));
        let start = Instant::now();

        loop {
            let frame_start = Instant::now();
            let time_ms = start.elapsed().as_secs_f64() * 1000.0;

            if core.tick(&mut scene, time_ms) == TickControl::Exit {
                info!("Core thread exiting");
                break;
            }

            let elapsed = frame_start.elapsed();
            if elapsed < frame_duration {
                thread::sleep(frame_duration - elapsed);
            }
        }
    })
}

/// One core-thread tick: collected key batches go to the scene, then the
/// scene animates a frame.
struct CoreLoop {
    collector: EventCollector,
}

impl CoreLoop {
    fn new(collector: EventCollector) -> Self {
        Self { collector }
    }

    fn tick<R: FrameRenderer>(&mut self, scene: &mut GameScene<R>, time_ms: f64) -> TickControl {
        if self.collector.collect_frame() == TickControl::Exit {
            return TickControl::Exit;
        }

        for batch in self.collector.take_batches() {
            scene.handle_input(&batch);
        }
        scene.animate(time_ms);

        TickControl::Continue
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::input::{InputEvent, KeyCode, Layer};
    use crate::game::song::tests::MemoryLoader;
    use crate::game::{Camera, Cursor, GameTree, NodeId, Song};
    use crossbeam_channel::unbounded;

    #[derive(Default)]
    struct CountingRenderer {
        frames: usize,
    }

    impl FrameRenderer for CountingRenderer {
        fn render(&mut self, _tree: &GameTree, _camera: &Camera) {
            self.frames += 1;
        }
    }

    fn demo_scene() -> GameScene<CountingRenderer> {
        GameScene::load(Song::new("demo"), 0, &MemoryLoader::default(), CountingRenderer::default())
            .unwrap()
    }

    //=====================================================================
    // EngineBuilder Tests
    //=====================================================================

    #[test]
    fn builder_defaults() {
        let builder = EngineBuilder::new();
        assert_eq!(builder.tps, 60.0);
        assert_eq!(builder.channel_capacity, 128);
        assert_eq!(builder.title, "ringbeat");
    }

    #[test]
    fn builder_with_tps() {
        let builder = EngineBuilder::new().with_tps(120.0);
        assert_eq!(builder.tps, 120.0);
    }

    #[test]
    #[should_panic(expected = "TPS must be positive")]
    fn builder_with_tps_panics_on_zero() {
        EngineBuilder::new().with_tps(0.0);
    }

    #[test]
    #[should_panic(expected = "TPS must be positive")]
    fn builder_with_tps_panics_on_negative() {
        EngineBuilder::new().with_tps(-60.0);
    }

    #[test]
    #[should_panic(expected = "Channel capacity must be positive")]
    fn builder_with_channel_capacity_panics_on_zero() {
        EngineBuilder::new().with_channel_capacity(0);
    }

    #[test]
    fn builder_fluent_api_chaining() {
        let engine = EngineBuilder::new()
            .with_tps(120.0)
            .with_channel_capacity(256)
            .with_title("demo")
            .build();

        assert_eq!(engine.tps, 120.0);
        assert_eq!(engine.channel_capacity, 256);
        assert_eq!(engine.title, "demo");
    }

    //=====================================================================
    // Core Loop Tests
    //=====================================================================

    #[test]
    fn tick_animates_even_without_input() {
        let (_tx, rx) = unbounded();
        let mut core = CoreLoop::new(EventCollector::new(rx));
        let mut scene = demo_scene();

        assert_eq!(core.tick(&mut scene, 0.0), TickControl::Continue);
        assert_eq!(core.tick(&mut scene, 16.0), TickControl::Continue);

        assert_eq!(scene.renderer().frames, 2);
    }

    #[test]
    fn tick_feeds_key_batches_to_scene() {
        let (tx, rx) = unbounded();
        let mut core = CoreLoop::new(EventCollector::new(rx));
        let mut scene = demo_scene();

        tx.send(PlatformEvent::Inputs(vec![InputEvent::KeyDown(KeyCode::KeyS)])).unwrap();
        core.tick(&mut scene, 0.0);
        tx.send(PlatformEvent::Inputs(vec![InputEvent::KeyDown(KeyCode::KeyD)])).unwrap();
        core.tick(&mut scene, 16.0);

        let lane = scene
            .tree()
            .with_behavior(&NodeId::Cursor, |cursor: &mut Cursor| cursor.lane(Layer::Primary));
        assert_eq!(lane, Some(1));
    }

    #[test]
    fn tick_exits_on_window_close_without_rendering() {
        let (tx, rx) = unbounded();
        let mut core = CoreLoop::new(EventCollector::new(rx));
        let mut scene = demo_scene();

        tx.send(PlatformEvent::WindowClosed).unwrap();

        assert_eq!(core.tick(&mut scene, 0.0), TickControl::Exit);
        assert_eq!(scene.renderer().frames, 0);
    }

    #[test]
    fn core_thread_stops_when_platform_disconnects() {
        let (tx, rx) = unbounded();
        let handle = spawn_core_thread(rx, 240.0, || {
            GameScene::load(Song::new("demo"), 0, &MemoryLoader::default(), CountingRenderer::default())
        });

        tx.send(PlatformEvent::Inputs(vec![InputEvent::KeyDown(KeyCode::KeyJ)])).unwrap();
        drop(tx);

        assert!(handle.join().is_ok());
    }

    #[test]
    fn core_thread_stops_when_scene_fails_to_load() {
        let (_tx, rx) = unbounded();
        let handle = spawn_core_thread(rx, 60.0, || {
            GameScene::load(Song::new("missing"), 0, &MemoryLoader::default(), CountingRenderer::default())
        });

        assert!(handle.join().is_ok());
    }
}
