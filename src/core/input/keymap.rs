//=========================================================================
// Keymap
//=========================================================================
//
// Fixed key rows driving the two layers.
//
//   top row    W E R T Y U I O  → Layer::Background
//   bottom row S D F G H J K L  → Layer::Primary
//
//=========================================================================

//=== External Dependencies ===============================================

use log::warn;

//=== Internal Dependencies ===============================================

use super::event::KeyCode;
use super::gesture::Layer;

//=== Default Rows ========================================================

/// Characters of the row driving the background layer.
pub const TOP_ROW: &str = "WERTYUIO";

/// Characters of the row driving the primary layer.
pub const BOTTOM_ROW: &str = "SDFGHJKL";

//=== Keymap ==============================================================

/// Ordered key rows for both layers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Keymap {
    primary: Vec<KeyCode>,
    background: Vec<KeyCode>,
}

impl Keymap {
    /// Builds a keymap from two character rows (case-insensitive).
    ///
    /// Characters without a key are skipped with a warning.
    pub fn from_rows(top: &str, bottom: &str) -> Self {
        Self {
            primary: parse_row(bottom),
            background: parse_row(top),
        }
    }

    /// The ordered keys of `layer`.
    pub fn row(&self, layer: Layer) -> &[KeyCode] {
        match layer {
            Layer::Primary => &self.primary,
            Layer::Background => &self.background,
        }
    }

    /// The layer and lane index `key` is bound to, if any.
    pub fn locate(&self, key: KeyCode) -> Option<(Layer, usize)> {
        Layer::ALL.into_iter().find_map(|layer| {
            self.row(layer)
                .iter()
                .position(|bound| *bound == key)
                .map(|index| (layer, index))
        })
    }
}

impl Default for Keymap {
    fn default() -> Self {
        Self::from_rows(TOP_ROW, BOTTOM_ROW)
    }
}

fn parse_row(row: &str) -> Vec<KeyCode> {
    row.chars()
        .filter_map(|c| {
            let key = KeyCode::from_char(c);
            if key.is_none() {
                warn!("No key for character {:?} in keymap row {:?}", c, row);
            }
            key
        })
        .collect()
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_rows_bind_both_layers() {
        let keymap = Keymap::default();

        assert_eq!(keymap.row(Layer::Primary).len(), 8);
        assert_eq!(keymap.row(Layer::Background).len(), 8);
        assert_eq!(keymap.row(Layer::Primary)[0], KeyCode::KeyS);
        assert_eq!(keymap.row(Layer::Background)[7], KeyCode::KeyO);
    }

    #[test]
    fn locate_finds_layer_and_lane() {
        let keymap = Keymap::default();

        assert_eq!(keymap.locate(KeyCode::KeyG), Some((Layer::Primary, 3)));
        assert_eq!(keymap.locate(KeyCode::KeyW), Some((Layer::Background, 0)));
        assert_eq!(keymap.locate(KeyCode::KeyZ), None);
    }

    #[test]
    fn rows_are_case_insensitive_and_skip_unknown_characters() {
        let keymap = Keymap::from_rows("we;r", "sdf");

        assert_eq!(keymap.row(Layer::Background), &[KeyCode::KeyW, KeyCode::KeyE, KeyCode::KeyR]);
        assert_eq!(keymap.row(Layer::Primary).len(), 3);
    }
}
