use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender, unbounded_channel};
use tracing::debug;

use crate::command::GridCommand;
use crate::config::Config;
use crate::error::AppResult;
use crate::event::AppEvent;
use crate::input::KeyboardHook;
use crate::nav::GridNavigator;
use crate::platform::{Desktop, SimulatedDesktop};
use crate::sequence::{GridSequenceResolver, GridSymbol, SequenceDetector};

use super::state::AppState;

pub(crate) type GridDetector = SequenceDetector<GridSymbol, GridSequenceResolver>;

/// Owns one keyboard hook, one sequence detector and one navigator. The
/// detector resolves on its timer task; resolved commands come back through
/// `resolved_rx` so only the owner of `App` ever touches the navigator.
pub struct App<D: Desktop = SimulatedDesktop> {
    pub state: AppState,
    pub config: Config,
    pub(crate) navigator: GridNavigator<D>,
    pub(crate) hook: KeyboardHook,
    pub(crate) detector: GridDetector,
    pub(crate) resolved_rx: UnboundedReceiver<GridCommand>,
    pub(crate) events: Vec<AppEvent>,
}

impl App<SimulatedDesktop> {
    pub fn new() -> AppResult<Self> {
        let config = Config::load()?;
        Self::new_with_config(config)
    }

    pub fn new_with_config(config: Config) -> AppResult<Self> {
        let desktop = SimulatedDesktop::new(config.desktop.monitors.clone());
        Self::with_desktop(config, desktop)
    }
}

impl<D: Desktop> App<D> {
    pub fn with_desktop(config: Config, desktop: D) -> AppResult<Self> {
        config.validate()?;

        let (resolved_tx, resolved_rx) = unbounded_channel();
        let detector = SequenceDetector::new(
            config.disambiguation_window(),
            GridSequenceResolver,
            forward_resolved(resolved_tx),
        )?;

        Ok(Self {
            state: AppState::default(),
            navigator: GridNavigator::new(desktop, config.nav_settings()),
            hook: KeyboardHook::new(config.keymap_preset()),
            detector,
            resolved_rx,
            events: Vec::new(),
            config,
        })
    }

    pub fn navigator(&self) -> &GridNavigator<D> {
        &self.navigator
    }

    pub fn hook(&self) -> &KeyboardHook {
        &self.hook
    }

    pub fn has_pending_sequence(&self) -> bool {
        self.detector.pending().is_some()
    }

    /// Drains the events produced since the last call, oldest first.
    pub fn take_events(&mut self) -> Vec<AppEvent> {
        std::mem::take(&mut self.events)
    }
}

/// Detector sink: hands resolved commands to the loop. A closed channel means
/// the app is shutting down, so the command is logged and dropped.
fn forward_resolved(
    tx: UnboundedSender<GridCommand>,
) -> impl Fn(GridCommand) + Send + Sync + 'static {
    move |command| {
        if let Err(err) = tx.send(command) {
            debug!(command = ?err.0, "resolved command dropped; app is gone");
        }
    }
}
