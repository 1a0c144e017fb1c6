use crossterm::event::KeyModifiers;

use crate::command::{GridCell, GridCommand};
use crate::sequence::GridSymbol;

use super::keys::VirtualKey;

const KEY_M: VirtualKey = VirtualKey::from_ascii(b'M');
const KEY_N: VirtualKey = VirtualKey::from_ascii(b'N');
const KEY_Y: VirtualKey = VirtualKey::from_ascii(b'Y');

/// Grid keys in row-major order, top-left first.
const QWERTY_GRID: [[u8; 3]; 3] = [[b'Q', b'W', b'E'], [b'A', b'S', b'D'], [b'Z', b'X', b'C']];
const NUMPAD_GRID: [[u8; 3]; 3] = [[7, 8, 9], [4, 5, 6], [1, 2, 3]];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeymapPreset {
    Qwerty,
    Numpad,
}

impl KeymapPreset {
    pub fn parse(value: &str) -> Self {
        match value {
            "qwerty" => Self::Qwerty,
            "numpad" => Self::Numpad,
            _ => Self::Qwerty,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Qwerty => "qwerty",
            Self::Numpad => "numpad",
        }
    }
}

/// What a translated key asks the caller to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyIntent {
    /// Tap-counted input for the sequence detector.
    Symbol(GridSymbol),
    /// Executes directly on the navigator, bypassing tap counting.
    Command(GridCommand),
    /// Ends the navigation session.
    Deactivate,
}

pub fn grid_cell_for_key(key: VirtualKey, preset: KeymapPreset) -> Option<GridCell> {
    let codes: [[VirtualKey; 3]; 3] = match preset {
        KeymapPreset::Qwerty => QWERTY_GRID.map(|row| row.map(VirtualKey::from_ascii)),
        KeymapPreset::Numpad => NUMPAD_GRID.map(|row| {
            row.map(|digit| VirtualKey(VirtualKey::NUMPAD0.0 + u16::from(digit)))
        }),
    };

    codes.iter().enumerate().find_map(|(row, keys)| {
        let col = keys.iter().position(|candidate| *candidate == key)?;
        GridCell::new(u8::try_from(col).ok()?, u8::try_from(row).ok()?)
    })
}

/// Translates a key-down. `None` means the key is not ours and should reach
/// the OS untouched.
pub fn translate_key_down(
    key: VirtualKey,
    modifiers: KeyModifiers,
    preset: KeymapPreset,
) -> Option<KeyIntent> {
    if key.is_modifier() {
        return None;
    }
    if modifiers.intersects(KeyModifiers::CONTROL | KeyModifiers::ALT | KeyModifiers::SUPER) {
        return None;
    }
    let shift = modifiers.contains(KeyModifiers::SHIFT);

    if let Some(cell) = grid_cell_for_key(key, preset) {
        if !shift {
            return Some(KeyIntent::Symbol(GridSymbol::Cell(cell)));
        }
        if cell == GridCell::CENTER {
            return Some(KeyIntent::Command(GridCommand::Reset(GridCell::CENTER)));
        }
        let (dx, dy) = cell.direction();
        return Some(KeyIntent::Command(GridCommand::ManualMove { dx, dy }));
    }

    if shift {
        return match key {
            KEY_M => Some(KeyIntent::Command(GridCommand::MoveToNextMonitor)),
            _ => None,
        };
    }

    match key {
        VirtualKey::BACKSPACE => Some(KeyIntent::Symbol(GridSymbol::Back)),
        VirtualKey::NUMPAD0 if preset == KeymapPreset::Numpad => {
            Some(KeyIntent::Symbol(GridSymbol::Back))
        }
        VirtualKey::ESCAPE => Some(KeyIntent::Deactivate),
        KEY_Y => Some(KeyIntent::Command(GridCommand::LeftClick)),
        KEY_N => Some(KeyIntent::Command(GridCommand::RightClick)),
        _ => None,
    }
}

/// Translates a key-up. `modifiers` must describe the state just before the
/// release, so releasing Shift itself still counts as shifted.
pub fn translate_key_up(
    key: VirtualKey,
    modifiers: KeyModifiers,
    preset: KeymapPreset,
) -> Option<KeyIntent> {
    if key.is_shift() {
        return Some(KeyIntent::Command(GridCommand::StopManualMove));
    }
    if modifiers.contains(KeyModifiers::SHIFT) && grid_cell_for_key(key, preset).is_some() {
        return Some(KeyIntent::Command(GridCommand::StopManualMove));
    }
    None
}

#[cfg(test)]
mod tests {
    use crossterm::event::KeyModifiers;

    use crate::command::{GridCell, GridCommand};
    use crate::input::VirtualKey;
    use crate::sequence::GridSymbol;

    use super::{KeyIntent, KeymapPreset, grid_cell_for_key, translate_key_down, translate_key_up};

    fn letter(ch: char) -> VirtualKey {
        VirtualKey::letter(ch).expect("letter key")
    }

    fn cell(col: u8, row: u8) -> GridCell {
        GridCell::new(col, row).expect("cell in range")
    }

    #[test]
    fn keymap_preset_parse_defaults_on_unknown_values() {
        assert_eq!(KeymapPreset::parse("qwerty"), KeymapPreset::Qwerty);
        assert_eq!(KeymapPreset::parse("numpad"), KeymapPreset::Numpad);
        assert_eq!(KeymapPreset::parse("dvorak"), KeymapPreset::Qwerty);
    }

    #[test]
    fn qwerty_grid_covers_all_nine_cells() {
        let keys = ['q', 'w', 'e', 'a', 's', 'd', 'z', 'x', 'c'];
        let cells: Vec<GridCell> = keys
            .iter()
            .filter_map(|ch| grid_cell_for_key(letter(*ch), KeymapPreset::Qwerty))
            .collect();
        assert_eq!(cells, GridCell::all().collect::<Vec<_>>());
    }

    #[test]
    fn numpad_grid_matches_physical_layout() {
        let seven = VirtualKey::numpad(7).expect("numpad key");
        let three = VirtualKey::numpad(3).expect("numpad key");
        assert_eq!(grid_cell_for_key(seven, KeymapPreset::Numpad), Some(cell(0, 0)));
        assert_eq!(grid_cell_for_key(three, KeymapPreset::Numpad), Some(cell(2, 2)));
        assert_eq!(grid_cell_for_key(seven, KeymapPreset::Qwerty), None);
    }

    #[test]
    fn plain_grid_key_is_a_tap_symbol() {
        let intent = translate_key_down(letter('d'), KeyModifiers::NONE, KeymapPreset::Qwerty);
        assert_eq!(intent, Some(KeyIntent::Symbol(GridSymbol::Cell(cell(2, 1)))));
    }

    #[test]
    fn shifted_grid_key_moves_or_resets() {
        let up_left = translate_key_down(letter('q'), KeyModifiers::SHIFT, KeymapPreset::Qwerty);
        assert_eq!(
            up_left,
            Some(KeyIntent::Command(GridCommand::ManualMove { dx: -1, dy: -1 }))
        );

        let center = translate_key_down(letter('s'), KeyModifiers::SHIFT, KeymapPreset::Qwerty);
        assert_eq!(
            center,
            Some(KeyIntent::Command(GridCommand::Reset(GridCell::CENTER)))
        );
    }

    #[test]
    fn command_keys_translate_directly() {
        let preset = KeymapPreset::Qwerty;
        assert_eq!(
            translate_key_down(letter('m'), KeyModifiers::SHIFT, preset),
            Some(KeyIntent::Command(GridCommand::MoveToNextMonitor))
        );
        assert_eq!(
            translate_key_down(letter('y'), KeyModifiers::NONE, preset),
            Some(KeyIntent::Command(GridCommand::LeftClick))
        );
        assert_eq!(
            translate_key_down(letter('n'), KeyModifiers::NONE, preset),
            Some(KeyIntent::Command(GridCommand::RightClick))
        );
        assert_eq!(
            translate_key_down(VirtualKey::BACKSPACE, KeyModifiers::NONE, preset),
            Some(KeyIntent::Symbol(GridSymbol::Back))
        );
        assert_eq!(
            translate_key_down(VirtualKey::ESCAPE, KeyModifiers::NONE, preset),
            Some(KeyIntent::Deactivate)
        );
    }

    #[test]
    fn unrelated_and_os_shortcut_keys_pass_through() {
        let preset = KeymapPreset::Qwerty;
        assert_eq!(translate_key_down(letter('m'), KeyModifiers::NONE, preset), None);
        assert_eq!(translate_key_down(letter('q'), KeyModifiers::CONTROL, preset), None);
        assert_eq!(
            translate_key_down(VirtualKey::LEFT_SHIFT, KeyModifiers::SHIFT, preset),
            None
        );
    }

    #[test]
    fn releasing_shift_or_shifted_grid_key_stops_motion() {
        let preset = KeymapPreset::Qwerty;
        let stop = Some(KeyIntent::Command(GridCommand::StopManualMove));
        assert_eq!(
            translate_key_up(VirtualKey::RIGHT_SHIFT, KeyModifiers::SHIFT, preset),
            stop
        );
        assert_eq!(translate_key_up(letter('d'), KeyModifiers::SHIFT, preset), stop);
        assert_eq!(translate_key_up(letter('d'), KeyModifiers::NONE, preset), None);
    }
}
