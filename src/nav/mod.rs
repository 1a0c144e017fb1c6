//! Grid navigation: the region state machine, its undo history and the
//! continuous mover it drives.

mod history;
mod mover;
mod navigator;

pub use history::{EntryKind, HistoryEntry, NavHistory};
pub use mover::{ContinuousMover, DEFAULT_STEP_PX, MoverTransition};
pub use navigator::{
    DEFAULT_HISTORY_CAPACITY, GridNavigator, MIN_CELL_PX, NavDispatchResult, NavEvent,
    NavSettings,
};
