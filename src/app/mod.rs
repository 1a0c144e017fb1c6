mod core;
mod event_bus;
mod event_loop;
mod input_ops;
mod report;
mod state;
pub(crate) mod terminal_session;

#[cfg(test)]
mod tests;

pub use core::App;
pub use input_ops::LoopControl;
pub use report::{ReportFormat, Reporter, format_event};
pub use state::{AppState, SessionMode, StatusState};
