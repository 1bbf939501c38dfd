//=========================================================================
// Game Map
//=========================================================================
//
// Timed notes of one playable chart, ordered by start time.
//
//=========================================================================

//=== NoteLayer ===========================================================

/// Plane a note is drawn on and hit from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NoteLayer {
    Primary,
    Background,
}

impl From<NoteLayer> for crate::core::input::Layer {
    fn from(layer: NoteLayer) -> Self {
        match layer {
            NoteLayer::Primary => Self::Primary,
            NoteLayer::Background => Self::Background,
        }
    }
}

//=== Note ================================================================

/// A note spanning `[start_time, end_time]` seconds and a lane range.
///
/// Slide notes move from `start_lane` to `end_lane`; taps keep both equal.
#[derive(Debug, Clone, PartialEq)]
pub struct Note {
    pub start_time: f64,
    pub end_time: f64,
    pub start_lane: u32,
    pub end_lane: u32,
    pub layer: NoteLayer,
}

impl Note {
    pub fn duration(&self) -> f64 {
        self.end_time - self.start_time
    }
}

//=== GameMap =============================================================

/// Notes of a chart. Always sorted by start time.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GameMap {
    notes: Vec<Note>,
}

impl GameMap {
    /// Builds a map, sorting the notes by start time (stable).
    pub fn new(mut notes: Vec<Note>) -> Self {
        notes.sort_by(|a, b| a.start_time.total_cmp(&b.start_time));
        Self { notes }
    }

    pub fn notes(&self) -> &[Note] {
        &self.notes
    }

    pub fn len(&self) -> usize {
        self.notes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.notes.is_empty()
    }

    /// Notes starting within `[from, to)` seconds.
    pub fn notes_between(&self, from: f64, to: f64) -> &[Note] {
        let start = self.notes.partition_point(|n| n.start_time < from);
        let end = self.notes.partition_point(|n| n.start_time < to);
        &self.notes[start..end.max(start)]
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn note(start_time: f64, lane: u32) -> Note {
        Note {
            start_time,
            end_time: start_time + 0.5,
            start_lane: lane,
            end_lane: lane,
            layer: NoteLayer::Primary,
        }
    }

    #[test]
    fn notes_are_sorted_by_start_time() {
        let map = GameMap::new(vec![note(3.0, 0), note(1.0, 1), note(2.0, 2)]);

        let starts: Vec<_> = map.notes().iter().map(|n| n.start_time).collect();
        assert_eq!(starts, vec![1.0, 2.0, 3.0]);
    }

    #[test]
    fn equal_start_times_keep_input_order() {
        let map = GameMap::new(vec![note(1.0, 5), note(1.0, 6)]);

        let lanes: Vec<_> = map.notes().iter().map(|n| n.start_lane).collect();
        assert_eq!(lanes, vec![5, 6]);
    }

    #[test]
    fn notes_between_selects_window() {
        let map = GameMap::new(vec![note(0.5, 0), note(1.0, 1), note(1.5, 2), note(2.0, 3)]);

        let window: Vec<_> = map.notes_between(1.0, 2.0).iter().map(|n| n.start_lane).collect();
        assert_eq!(window, vec![1, 2]);
        assert!(map.notes_between(5.0, 6.0).is_empty());
    }

    #[test]
    fn note_layer_maps_to_input_layer() {
        use crate::core::input::Layer;
        assert_eq!(Layer::from(NoteLayer::Background), Layer::Background);
        assert_eq!(note(0.0, 0).duration(), 0.5);
    }
}
