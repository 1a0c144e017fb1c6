//! Tap-sequence disambiguation: repeated presses of one symbol are counted
//! and resolved into a single output once the sequence is over.

mod detector;
mod resolver;

pub use detector::SequenceDetector;
pub use resolver::{GridSequenceResolver, GridSymbol, RESET_TAP_COUNT, SequenceResolver};
