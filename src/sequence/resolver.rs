use crate::command::{GridCell, GridCommand};

/// Tap count at which a grid symbol turns into a reset and stops waiting.
pub const RESET_TAP_COUNT: u32 = 3;

/// Maps a finished `(symbol, taps)` sequence to an output, and decides when a
/// sequence is unambiguous enough to skip the disambiguation window.
pub trait SequenceResolver<S>: Send + Sync + 'static {
    type Output: Send + 'static;

    fn resolve(&self, symbol: &S, taps: u32) -> Option<Self::Output>;

    fn should_flush_immediately(&self, symbol: &S, taps: u32) -> bool;
}

/// What the user meant to press while navigating.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GridSymbol {
    Cell(GridCell),
    Back,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct GridSequenceResolver;

impl SequenceResolver<GridSymbol> for GridSequenceResolver {
    type Output = GridCommand;

    fn resolve(&self, symbol: &GridSymbol, taps: u32) -> Option<GridCommand> {
        match *symbol {
            GridSymbol::Back => Some(GridCommand::Back),
            GridSymbol::Cell(_) if taps == 0 => None,
            GridSymbol::Cell(cell) if taps < RESET_TAP_COUNT => Some(GridCommand::Drill(cell)),
            GridSymbol::Cell(cell) => Some(GridCommand::Reset(cell)),
        }
    }

    fn should_flush_immediately(&self, symbol: &GridSymbol, taps: u32) -> bool {
        match symbol {
            GridSymbol::Back => true,
            GridSymbol::Cell(_) => taps >= RESET_TAP_COUNT,
        }
    }
}
