use crossterm::event::Event;

use crate::nav::NavEvent;

/// What the application reports to the outside world.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEvent {
    SessionChanged { active: bool },
    Nav(NavEvent),
}

#[derive(Debug)]
pub(crate) enum DomainEvent {
    Input(Event),
    InputError(String),
}
