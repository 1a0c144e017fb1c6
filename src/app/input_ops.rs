use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use tracing::{debug, info};

use crate::command::{CommandOutcome, GridCommand};
use crate::event::AppEvent;
use crate::input::{HookDecision, KeyIntent, RawKeyEvent};
use crate::nav::{NavDispatchResult, NavEvent};
use crate::platform::Desktop;

use super::core::App;
use super::state::SessionMode;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopControl {
    Continue,
    Quit,
}

enum Hotkey {
    Toggle,
    Quit,
}

impl<D: Desktop> App<D> {
    pub fn handle_terminal_event(&mut self, event: Event) -> LoopControl {
        let Event::Key(key) = event else {
            return LoopControl::Continue;
        };

        match hotkey(&key) {
            Some(Hotkey::Quit) => return LoopControl::Quit,
            Some(Hotkey::Toggle) => {
                self.toggle_activation();
                return LoopControl::Continue;
            }
            None => {}
        }

        if let Some(raw) = RawKeyEvent::from_crossterm(key) {
            self.handle_key(raw);
        }
        LoopControl::Continue
    }

    /// Runs one key transition through the hook. While inactive the hook
    /// still tracks modifiers, but every key passes through.
    pub fn handle_key(&mut self, event: RawKeyEvent) -> HookDecision {
        let decision = self.hook.handle(event);
        if !self.navigator.is_active() {
            return HookDecision::PassThrough;
        }

        match decision {
            HookDecision::PassThrough => {}
            HookDecision::Observe(intent) | HookDecision::Swallow(intent) => {
                self.apply_intent(intent);
            }
        }
        decision
    }

    fn apply_intent(&mut self, intent: KeyIntent) {
        match intent {
            KeyIntent::Symbol(symbol) => {
                self.state.symbols_registered += 1;
                self.detector.register_input(symbol);
            }
            KeyIntent::Command(command) => {
                if command != GridCommand::StopManualMove {
                    self.flush_pending_sequence();
                }
                self.execute(command);
            }
            KeyIntent::Deactivate => self.deactivate(),
        }
    }

    pub fn toggle_activation(&mut self) {
        if self.navigator.is_active() {
            self.deactivate();
        } else {
            self.activate();
        }
    }

    pub fn activate(&mut self) {
        self.discard_pending_sequence();
        self.state.mode = SessionMode::Active;
        self.state.symbols_registered = 0;
        self.events.push(AppEvent::SessionChanged { active: true });
        let result = self.navigator.activate();
        self.record(result);
        info!("session active");
    }

    pub fn deactivate(&mut self) {
        self.discard_pending_sequence();
        let result = self.navigator.deactivate();
        self.record(result);
        if self.state.mode == SessionMode::Active {
            self.state.mode = SessionMode::Inactive;
            self.events.push(AppEvent::SessionChanged { active: false });
            info!("session inactive");
        }
    }

    pub fn execute(&mut self, command: GridCommand) -> CommandOutcome {
        let result = self.navigator.execute(command);
        self.record(result)
    }

    pub fn motion_tick(&mut self) -> CommandOutcome {
        let result = self.navigator.tick();
        self.record(result)
    }

    /// Executes every command the detector has resolved so far without
    /// waiting. Returns how many were executed.
    pub fn apply_resolved(&mut self) -> usize {
        let mut applied = 0;
        while let Ok(command) = self.resolved_rx.try_recv() {
            self.execute(command);
            applied += 1;
        }
        applied
    }

    /// Runs a still-pending tap sequence before a direct command, so intents
    /// execute in the order their keys were pressed.
    fn flush_pending_sequence(&mut self) {
        if self.detector.flush_pending() {
            self.apply_resolved();
        }
    }

    /// Cancels the detector's window and drops anything it already resolved,
    /// so a sequence from an old session can never land in a new one.
    fn discard_pending_sequence(&mut self) {
        self.detector.reset();
        let mut dropped = 0usize;
        while self.resolved_rx.try_recv().is_ok() {
            dropped += 1;
        }
        if dropped > 0 {
            debug!(dropped, "discarded resolved commands from previous session");
        }
    }

    fn record(&mut self, result: NavDispatchResult) -> CommandOutcome {
        for event in result.events {
            if let NavEvent::CommandExecuted { id, outcome } = event {
                self.state.status.last_action_id = Some(id);
                self.state.status.last_outcome = Some(outcome);
                self.state.status.message = format!("{} {}", id.as_str(), outcome.as_str());
            }
            self.events.push(AppEvent::Nav(event));
        }
        result.outcome
    }
}

fn hotkey(key: &KeyEvent) -> Option<Hotkey> {
    if key.kind != KeyEventKind::Press || !key.modifiers.contains(KeyModifiers::CONTROL) {
        return None;
    }
    match key.code {
        KeyCode::Char('c') | KeyCode::Char('C') => Some(Hotkey::Quit),
        KeyCode::Char('g') | KeyCode::Char('G') => Some(Hotkey::Toggle),
        _ => None,
    }
}
