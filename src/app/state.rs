use crate::command::{ActionId, CommandOutcome};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SessionMode {
    #[default]
    Inactive,
    Active,
}

#[derive(Debug, Clone, Default)]
pub struct StatusState {
    pub message: String,
    pub last_action_id: Option<ActionId>,
    pub last_outcome: Option<CommandOutcome>,
}

#[derive(Debug, Clone, Default)]
pub struct AppState {
    pub mode: SessionMode,
    pub status: StatusState,
    /// Grid symbols handed to the sequence detector this session.
    pub symbols_registered: usize,
}
