//! Raw key events to navigation intents. Key codes stop here; everything
//! downstream sees `KeyIntent` only.

mod events;
mod hook;
mod keymap;
mod keys;

pub use events::{KeyDirection, RawKeyEvent};
pub use hook::{HookDecision, KeyboardHook};
pub use keymap::{
    KeyIntent, KeymapPreset, grid_cell_for_key, translate_key_down, translate_key_up,
};
pub use keys::VirtualKey;
