use crossterm::event::KeyModifiers;

use super::events::{KeyDirection, RawKeyEvent};
use super::keymap::{KeyIntent, KeymapPreset, translate_key_down, translate_key_up};
use super::keys::VirtualKey;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HookDecision {
    /// Not ours; deliver to the OS unchanged.
    PassThrough,
    /// Act on the intent but still deliver the key (modifier releases).
    Observe(KeyIntent),
    /// Act on the intent and hide the key from the OS.
    Swallow(KeyIntent),
}

/// Keyboard hook state for one installed hook. Owned by the application, so
/// at most one exists per running session.
///
/// Tracks held modifier keys from bare modifier transitions, because the
/// modifier set reported with a key-up no longer includes a modifier that
/// is itself being released. Left and right keys are tracked separately so
/// releasing one Shift keeps the other in effect.
#[derive(Debug)]
pub struct KeyboardHook {
    preset: KeymapPreset,
    held: Vec<VirtualKey>,
}

impl KeyboardHook {
    pub fn new(preset: KeymapPreset) -> Self {
        Self {
            preset,
            held: Vec::new(),
        }
    }

    pub fn preset(&self) -> KeymapPreset {
        self.preset
    }

    pub fn held_modifiers(&self) -> KeyModifiers {
        self.held
            .iter()
            .fold(KeyModifiers::NONE, |flags, key| flags | modifier_flag(*key))
    }

    pub fn handle(&mut self, event: RawKeyEvent) -> HookDecision {
        let modifiers = event.modifiers | self.held_modifiers();
        match event.direction {
            KeyDirection::Down => {
                if event.key.is_modifier() {
                    if !self.held.contains(&event.key) {
                        self.held.push(event.key);
                    }
                    return HookDecision::PassThrough;
                }
                translate_key_down(event.key, modifiers, self.preset)
                    .map_or(HookDecision::PassThrough, HookDecision::Swallow)
            }
            KeyDirection::Up => {
                let intent = translate_key_up(event.key, modifiers, self.preset);
                if event.key.is_modifier() {
                    self.release(event.key);
                    return intent.map_or(HookDecision::PassThrough, HookDecision::Observe);
                }
                intent.map_or(HookDecision::PassThrough, HookDecision::Swallow)
            }
        }
    }

    /// A side-less code (plain `SHIFT`) releases every key of its kind.
    fn release(&mut self, key: VirtualKey) {
        if is_sideless(key) {
            let flag = modifier_flag(key);
            self.held.retain(|held| modifier_flag(*held) != flag);
        } else {
            self.held.retain(|held| *held != key);
        }
    }
}

fn is_sideless(key: VirtualKey) -> bool {
    matches!(
        key,
        VirtualKey::SHIFT | VirtualKey::CONTROL | VirtualKey::ALT
    )
}

fn modifier_flag(key: VirtualKey) -> KeyModifiers {
    match key {
        VirtualKey::SHIFT | VirtualKey::LEFT_SHIFT | VirtualKey::RIGHT_SHIFT => KeyModifiers::SHIFT,
        VirtualKey::CONTROL | VirtualKey::LEFT_CONTROL | VirtualKey::RIGHT_CONTROL => {
            KeyModifiers::CONTROL
        }
        VirtualKey::ALT | VirtualKey::LEFT_ALT | VirtualKey::RIGHT_ALT => KeyModifiers::ALT,
        VirtualKey::LEFT_SUPER | VirtualKey::RIGHT_SUPER => KeyModifiers::SUPER,
        _ => KeyModifiers::NONE,
    }
}
