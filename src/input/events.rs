use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyEventState, KeyModifiers, ModifierKeyCode};

use super::keys::VirtualKey;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyDirection {
    Down,
    Up,
}

/// One key transition as delivered by the keyboard hook.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawKeyEvent {
    pub key: VirtualKey,
    pub modifiers: KeyModifiers,
    pub direction: KeyDirection,
}

impl RawKeyEvent {
    pub fn down(key: VirtualKey, modifiers: KeyModifiers) -> Self {
        Self {
            key,
            modifiers,
            direction: KeyDirection::Down,
        }
    }

    pub fn up(key: VirtualKey, modifiers: KeyModifiers) -> Self {
        Self {
            key,
            modifiers,
            direction: KeyDirection::Up,
        }
    }

    /// Converts a terminal key event. Keys without a virtual-key equivalent
    /// yield `None`, and so do auto-repeats: a held grid key must not count
    /// as extra taps, and held motion keys already move continuously.
    pub fn from_crossterm(event: KeyEvent) -> Option<Self> {
        let direction = match event.kind {
            KeyEventKind::Press => KeyDirection::Down,
            KeyEventKind::Release => KeyDirection::Up,
            KeyEventKind::Repeat => return None,
        };
        let key = match event.code {
            KeyCode::Char(ch) if event.state.contains(KeyEventState::KEYPAD) => ch
                .to_digit(10)
                .and_then(|digit| u8::try_from(digit).ok())
                .and_then(VirtualKey::numpad)?,
            KeyCode::Char(' ') => VirtualKey::SPACE,
            KeyCode::Char(ch) => VirtualKey::letter(ch).or_else(|| VirtualKey::digit(ch))?,
            KeyCode::Backspace => VirtualKey::BACKSPACE,
            KeyCode::Tab | KeyCode::BackTab => VirtualKey::TAB,
            KeyCode::Enter => VirtualKey::ENTER,
            KeyCode::Esc => VirtualKey::ESCAPE,
            KeyCode::Modifier(modifier) => modifier_key(modifier)?,
            _ => return None,
        };

        Some(Self {
            key,
            modifiers: event.modifiers,
            direction,
        })
    }
}

fn modifier_key(code: ModifierKeyCode) -> Option<VirtualKey> {
    match code {
        ModifierKeyCode::LeftShift => Some(VirtualKey::LEFT_SHIFT),
        ModifierKeyCode::RightShift => Some(VirtualKey::RIGHT_SHIFT),
        ModifierKeyCode::LeftControl => Some(VirtualKey::LEFT_CONTROL),
        ModifierKeyCode::RightControl => Some(VirtualKey::RIGHT_CONTROL),
        ModifierKeyCode::LeftAlt => Some(VirtualKey::LEFT_ALT),
        ModifierKeyCode::RightAlt => Some(VirtualKey::RIGHT_ALT),
        ModifierKeyCode::LeftSuper => Some(VirtualKey::LEFT_SUPER),
        ModifierKeyCode::RightSuper => Some(VirtualKey::RIGHT_SUPER),
        _ => None,
    }
}
