//=========================================================================
// Input Layer
//=========================================================================
//
// Per-row gesture interpreter.
//
// Architecture:
//   HeldKeys ─► current bitmask ─┬─► pressed / released
//                                │        ↓
//                                │   countdowns (tap windows)
//                                │        ↓ decay(dt)
//                                │   expired keys → tap groups → Tap(n)
//                                └─► adjacency vs previous → Slide(d)
//
// Countdown per key index:
//
//   Idle(0) ── press ──► Pressed(+LIMIT) ── release ──► Releasing(-LENIENCY)
//                           │                               │ decays to 0
//                           │ decays to 0 while held        ↓
//                           └──► HeldPastLimit(0)        Idle(0) + tap resolution
//
// At most one gesture per layer per frame; a tap suppresses the slide.
//
//=========================================================================

//=== External Dependencies ===============================================

use log::debug;

//=== Internal Dependencies ===============================================

use super::event::KeyCode;
use super::gesture::Gesture;
use super::held_keys::HeldKeys;

//=== Tuning ==============================================================

/// Seconds a key may stay down and still be part of a tap.
pub const TAP_DURATION_LIMIT: f64 = 0.2;

/// Seconds after a release during which adjacent releases join the tap.
pub const TAP_LENIENCY: f64 = 0.05;

/// Smallest key group that counts as a tap.
pub const MIN_TAP_SIZE: usize = 2;

/// Largest key group that counts as a tap.
pub const MAX_TAP_SIZE: usize = 3;

/// Keys per layer (bitmask width).
pub const MAX_LAYER_KEYS: usize = 32;

//=== TapGroup ============================================================

struct TapGroup {
    members: u32,
    interrupted: bool,
}

impl TapGroup {
    fn size(&self) -> usize {
        self.members.count_ones() as usize
    }
}

//=== InputLayer ==========================================================

/// Gesture state of one key row.
///
/// Key `i` of the row owns bit `i` of every mask and `countdowns[i]`.
#[derive(Debug, Clone)]
pub struct InputLayer {
    keys: Vec<KeyCode>,
    previous: u32,
    countdowns: Vec<f64>,
}

impl InputLayer {
    /// Creates a layer over an ordered key row.
    ///
    /// # Panics
    ///
    /// Panics if the row has more than [`MAX_LAYER_KEYS`] keys.
    pub fn new(keys: Vec<KeyCode>) -> Self {
        assert!(
            keys.len() <= MAX_LAYER_KEYS,
            "Input layer supports at most {} keys, got {}",
            MAX_LAYER_KEYS,
            keys.len()
        );

        let countdowns = vec![0.0; keys.len()];
        Self {
            keys,
            previous: 0,
            countdowns,
        }
    }

    //--- Accessors --------------------------------------------------------

    pub fn keys(&self) -> &[KeyCode] {
        &self.keys
    }

    /// Held-key mask of the last processed frame.
    pub fn previous(&self) -> u32 {
        self.previous
    }

    pub fn countdowns(&self) -> &[f64] {
        &self.countdowns
    }

    /// Forgets held keys and pending taps.
    pub fn reset(&mut self) {
        self.previous = 0;
        self.countdowns.iter_mut().for_each(|c| *c = 0.0);
    }

    //=====================================================================
    // Frame Processing
    //=====================================================================

    /// Runs one frame over the held-key set and returns the gesture, if any.
    pub fn update(&mut self, held: &HeldKeys, delta_time: f64) -> Option<Gesture> {
        let current = self.sample(held);
        let pressed = current & !self.previous;
        let released = !current & self.previous;

        self.open_windows(pressed, released);
        let expired = self.decay(delta_time);
        let tap = self.resolve_taps(expired);
        let movement = slide_movement(pressed, self.previous);

        self.previous = current;

        match tap {
            Some(size) => Some(Gesture::Tap(size)),
            None if movement != 0 => Some(Gesture::Slide(movement)),
            None => None,
        }
    }

    //--- Internal Helpers -------------------------------------------------

    fn sample(&self, held: &HeldKeys) -> u32 {
        self.keys
            .iter()
            .enumerate()
            .filter(|(_, key)| held.is_held(**key))
            .fold(0, |mask, (index, _)| mask | bit(index))
    }

    /// Starts tap windows for new presses and leniency windows for quick
    /// releases.
    fn open_windows(&mut self, pressed: u32, released: u32) {
        for (index, countdown) in self.countdowns.iter_mut().enumerate() {
            if pressed & bit(index) != 0 {
                *countdown = TAP_DURATION_LIMIT;
            } else if released & bit(index) != 0 && *countdown > 0.0 {
                *countdown = -TAP_LENIENCY;
            }
        }
    }

    /// Moves every countdown toward zero. Returns the keys whose leniency
    /// window ran out this frame.
    fn decay(&mut self, delta_time: f64) -> u32 {
        let mut expired = 0;

        for (index, countdown) in self.countdowns.iter_mut().enumerate() {
            if *countdown > 0.0 {
                *countdown = (*countdown - delta_time).max(0.0);
            } else if *countdown < 0.0 {
                *countdown = (*countdown + delta_time).min(0.0);
                if *countdown == 0.0 {
                    expired |= bit(index);
                }
            }
        }

        expired
    }

    /// Groups expired keys with their releasing neighbours. Returns the size
    /// of the first valid tap.
    fn resolve_taps(&mut self, expired: u32) -> Option<usize> {
        let mut pending = expired;
        let mut fired = None;

        for index in 0..self.keys.len() {
            if pending & bit(index) == 0 {
                continue;
            }

            let group = self.collect_group(index, expired);
            pending &= !group.members;
            let size = group.size();

            if group.interrupted {
                debug!("Tap of {} keys interrupted by a fresh press", size);
            } else if !(MIN_TAP_SIZE..=MAX_TAP_SIZE).contains(&size) {
                debug!("Discarding key group of size {}", size);
            } else if fired.is_some() {
                debug!("Dropping extra tap of {} keys in the same frame", size);
            } else {
                fired = Some(size);
            }
        }

        fired
    }

    /// Scans outward from `origin`, consuming releasing and expired
    /// neighbours. A pressed neighbour invalidates the group.
    fn collect_group(&mut self, origin: usize, expired: u32) -> TapGroup {
        let mut group = TapGroup {
            members: bit(origin),
            interrupted: false,
        };

        for step in [-1isize, 1] {
            let mut index = origin as isize + step;

            while index >= 0 && (index as usize) < self.countdowns.len() {
                let position = index as usize;
                let countdown = self.countdowns[position];

                if countdown > 0.0 {
                    group.interrupted = true;
                    break;
                }
                if countdown == 0.0 && expired & bit(position) == 0 {
                    break;
                }

                group.members |= bit(position);
                self.countdowns[position] = 0.0;
                index += step;
            }
        }

        group
    }
}

//=== Bit Helpers =========================================================

fn bit(index: usize) -> u32 {
    1 << index
}

/// Signed lane movement from presses adjacent to previously held keys.
///
/// A press one index above a held key counts +1, one index below counts -1.
fn slide_movement(pressed: u32, previous: u32) -> i32 {
    let toward_higher = pressed & (previous << 1);
    let toward_lower = pressed & (previous >> 1);
    toward_higher.count_ones() as i32 - toward_lower.count_ones() as i32
}

//=========================================================================
// Unit Tests
//=========================================================================
