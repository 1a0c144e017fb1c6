mod types;

pub use types::{ActionId, CommandOutcome, GridCell, GridCommand, PointerButton};
