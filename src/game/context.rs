//=========================================================================
// Game Context
//=========================================================================
//
// Process-scoped context shared by every node of a game tree.
//
// Bound once at tree construction and reached by walking to the root.
// Read-only for nodes; the frame clock is advanced by the scene.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::cell::Cell;

//=== Internal Dependencies ===============================================

use super::map::GameMap;
use super::song::Song;

//=== Settings ============================================================

/// Player settings relevant to gameplay.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Settings {
    /// Seconds. Negative moves the track forward (screen is delayed),
    /// positive moves it backward (audio output is delayed).
    pub audio_latency: f64,
}

//=== Clock ===============================================================

/// Elapsed game time, advanced once per frame.
#[derive(Debug, Default)]
pub struct Clock {
    elapsed: Cell<f64>,
}

impl Clock {
    /// Seconds since the scene started.
    pub fn elapsed(&self) -> f64 {
        self.elapsed.get()
    }

    pub(crate) fn advance(&self, delta_time: f64) {
        self.elapsed.set(self.elapsed.get() + delta_time);
    }
}

//=== GameContext =========================================================

/// Everything game nodes may read about the running song.
#[derive(Debug)]
pub struct GameContext {
    pub song: Song,
    pub map: GameMap,
    pub settings: Settings,
    pub clock: Clock,
}

impl GameContext {
    pub fn new(song: Song, map: GameMap, settings: Settings) -> Self {
        Self {
            song,
            map,
            settings,
            clock: Clock::default(),
        }
    }

    /// Song position in seconds, corrected for audio latency.
    pub fn song_time(&self) -> f64 {
        self.clock.elapsed() - self.settings.audio_latency
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
