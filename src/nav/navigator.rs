use serde::Serialize;
use tracing::{debug, info, trace};

use crate::command::{ActionId, CommandOutcome, GridCell, GridCommand, PointerButton};
use crate::geometry::Region;
use crate::platform::{Desktop, monitor_at, next_monitor, usable_monitors};

use super::history::NavHistory;
use super::mover::{ContinuousMover, DEFAULT_STEP_PX, MoverTransition};

/// Drilling stops once a cell would be narrower or shorter than this.
pub const MIN_CELL_PX: i32 = 4;
pub const DEFAULT_HISTORY_CAPACITY: usize = 64;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NavSettings {
    pub min_cell_px: i32,
    pub step_px: i32,
    pub history_capacity: usize,
}

impl Default for NavSettings {
    fn default() -> Self {
        Self {
            min_cell_px: MIN_CELL_PX,
            step_px: DEFAULT_STEP_PX,
            history_capacity: DEFAULT_HISTORY_CAPACITY,
        }
    }
}

/// Notifications produced by navigator operations, in the order they
/// happened. `BoundsChanged` with [`Region::EMPTY`] means "hide".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "event", rename_all = "kebab-case")]
pub enum NavEvent {
    BoundsChanged { bounds: Region },
    MotionStarted,
    MotionStopped,
    CommandExecuted { id: ActionId, outcome: CommandOutcome },
}

#[derive(Debug, Clone)]
pub struct NavDispatchResult {
    pub outcome: CommandOutcome,
    pub events: Vec<NavEvent>,
}

impl NavDispatchResult {
    /// Bounds reported by this operation, if any.
    pub fn bounds(&self) -> Option<Region> {
        self.events.iter().find_map(|event| match event {
            NavEvent::BoundsChanged { bounds } => Some(*bounds),
            _ => None,
        })
    }
}

enum Step {
    Moved(Region),
    Applied,
    Noop,
}

struct Session {
    monitor: Region,
    bounds: Region,
    history: NavHistory,
    mover: ContinuousMover,
}

impl Session {
    fn new(monitor: Region, settings: &NavSettings) -> Self {
        Self {
            monitor,
            bounds: monitor,
            history: NavHistory::with_capacity(settings.history_capacity),
            mover: ContinuousMover::new(settings.step_px),
        }
    }

    fn start_motion(&mut self, dx: i32, dy: i32, events: &mut Vec<NavEvent>) -> Step {
        if self.mover.start(dx, dy) == MoverTransition::Started {
            events.push(NavEvent::MotionStarted);
        }
        Step::Applied
    }

    fn stop_motion(&mut self, events: &mut Vec<NavEvent>) -> Step {
        match self.mover.stop() {
            MoverTransition::Stopped => {
                events.push(NavEvent::MotionStopped);
                Step::Applied
            }
            _ => Step::Noop,
        }
    }

    fn drill(&mut self, cell: GridCell, min_cell_px: i32) -> Step {
        let (cell_w, cell_h) = self.bounds.cell_size();
        if cell_w < min_cell_px || cell_h < min_cell_px {
            debug!(cell_w, cell_h, "drill floor reached");
            return Step::Noop;
        }
        self.history.push_checkpoint(self.bounds);
        self.bounds = self.bounds.cell(cell.col(), cell.row());
        Step::Moved(self.bounds)
    }

    fn reset(&mut self, cell: GridCell) -> Step {
        self.history.clear();
        self.bounds = monitor_half(&self.monitor, cell);
        Step::Moved(self.bounds)
    }

    fn back(&mut self) -> Step {
        match self.history.pop_checkpoint() {
            Some(bounds) => {
                self.bounds = bounds;
                Step::Moved(bounds)
            }
            None => Step::Noop,
        }
    }

    fn switch_monitor(&mut self, monitors: &[Region]) -> Step {
        let Some(next) = next_monitor(&self.monitor, monitors) else {
            return Step::Noop;
        };
        self.monitor = next;
        self.bounds = next;
        self.history.clear();
        Step::Moved(next)
    }
}

/// Macro-region of `monitor` for a reset: column 0/2 pick the left/right
/// half, column 1 the full width; rows likewise for height.
fn monitor_half(monitor: &Region, cell: GridCell) -> Region {
    let mid_x = monitor.left + monitor.width() / 2;
    let mid_y = monitor.top + monitor.height() / 2;
    let (left, right) = match cell.col() {
        0 => (monitor.left, mid_x),
        2 => (mid_x, monitor.right),
        _ => (monitor.left, monitor.right),
    };
    let (top, bottom) = match cell.row() {
        0 => (monitor.top, mid_y),
        2 => (mid_y, monitor.bottom),
        _ => (monitor.top, monitor.bottom),
    };
    Region::new(left, top, right, bottom)
}

/// Grid navigation state machine. Inactive until [`GridNavigator::activate`];
/// commands received while inactive do nothing.
///
/// Not synchronized: callers deliver commands and ticks from one thread.
pub struct GridNavigator<D: Desktop> {
    desktop: D,
    settings: NavSettings,
    session: Option<Session>,
}

impl<D: Desktop> GridNavigator<D> {
    pub fn new(desktop: D, settings: NavSettings) -> Self {
        Self {
            desktop,
            settings,
            session: None,
        }
    }

    pub fn desktop(&self) -> &D {
        &self.desktop
    }

    pub fn desktop_mut(&mut self) -> &mut D {
        &mut self.desktop
    }

    pub fn settings(&self) -> &NavSettings {
        &self.settings
    }

    pub fn is_active(&self) -> bool {
        self.session.is_some()
    }

    pub fn is_moving(&self) -> bool {
        self.session
            .as_ref()
            .is_some_and(|session| session.mover.is_running())
    }

    pub fn current_bounds(&self) -> Option<Region> {
        self.session.as_ref().map(|session| session.bounds)
    }

    pub fn monitor(&self) -> Option<Region> {
        self.session.as_ref().map(|session| session.monitor)
    }

    pub fn history_len(&self) -> usize {
        self.session
            .as_ref()
            .map_or(0, |session| session.history.len())
    }

    /// Starts a session on the monitor under the pointer. Calling it while
    /// active restarts the session.
    pub fn activate(&mut self) -> NavDispatchResult {
        let mut events = Vec::new();
        if self
            .session
            .take()
            .is_some_and(|previous| previous.mover.is_running())
        {
            events.push(NavEvent::MotionStopped);
        }

        let monitors = self.monitors();
        let monitor = monitor_at(self.desktop.cursor_position(), &monitors)
            .unwrap_or_else(|| self.desktop.virtual_screen());
        self.session = Some(Session::new(monitor, &self.settings));
        info!(?monitor, "navigation activated");

        let outcome = self.apply_step(Step::Moved(monitor), &mut events);
        finish(ActionId::Activate, outcome, events)
    }

    pub fn deactivate(&mut self) -> NavDispatchResult {
        let Some(session) = self.session.take() else {
            return finish(ActionId::Deactivate, CommandOutcome::Noop, Vec::new());
        };

        let mut events = Vec::new();
        if session.mover.is_running() {
            events.push(NavEvent::MotionStopped);
        }
        events.push(NavEvent::BoundsChanged {
            bounds: Region::EMPTY,
        });
        info!("navigation deactivated");
        finish(ActionId::Deactivate, CommandOutcome::Applied, events)
    }

    pub fn execute(&mut self, command: GridCommand) -> NavDispatchResult {
        let id = command.action_id();
        let min_cell_px = self.settings.min_cell_px;
        let Some(session) = self.session.as_mut() else {
            debug!(action = id.as_str(), "ignoring command while inactive");
            return finish(id, CommandOutcome::Noop, Vec::new());
        };

        let mut events = Vec::new();
        let step = match command {
            GridCommand::Drill(cell) => {
                session.stop_motion(&mut events);
                session.drill(cell, min_cell_px)
            }
            GridCommand::Reset(cell) => {
                session.stop_motion(&mut events);
                session.reset(cell)
            }
            GridCommand::Back => session.back(),
            GridCommand::ManualMove { dx, dy } => session.start_motion(dx, dy, &mut events),
            GridCommand::StopManualMove => session.stop_motion(&mut events),
            GridCommand::MoveToNextMonitor => {
                let monitors = usable_monitors(
                    self.desktop.monitor_rects(),
                    self.desktop.virtual_screen(),
                );
                session.switch_monitor(&monitors)
            }
            GridCommand::LeftClick => {
                self.desktop.click(PointerButton::Left);
                Step::Applied
            }
            GridCommand::RightClick => {
                self.desktop.click(PointerButton::Right);
                Step::Applied
            }
        };

        let outcome = self.apply_step(step, &mut events);
        finish(id, outcome, events)
    }

    /// One continuous-motion tick: shift the region by the mover's step,
    /// keep it on the monitor and record it as the manual history entry.
    pub fn tick(&mut self) -> NavDispatchResult {
        let Some(session) = self.session.as_mut() else {
            return finish(ActionId::MotionTick, CommandOutcome::Noop, Vec::new());
        };
        let Some((dx, dy)) = session.mover.tick() else {
            return finish(ActionId::MotionTick, CommandOutcome::Noop, Vec::new());
        };

        let bounds = session
            .bounds
            .translated(dx, dy)
            .clamped_within(&session.monitor);
        session.bounds = bounds;
        session.history.record_manual(bounds);
        trace!(dx, dy, ?bounds, "motion tick");

        let mut events = Vec::new();
        let outcome = self.apply_step(Step::Moved(bounds), &mut events);
        finish(ActionId::MotionTick, outcome, events)
    }

    fn monitors(&self) -> Vec<Region> {
        usable_monitors(self.desktop.monitor_rects(), self.desktop.virtual_screen())
    }

    fn apply_step(&mut self, step: Step, events: &mut Vec<NavEvent>) -> CommandOutcome {
        match step {
            Step::Moved(bounds) => {
                self.desktop.move_pointer(bounds.center());
                events.push(NavEvent::BoundsChanged { bounds });
                CommandOutcome::Applied
            }
            Step::Applied => CommandOutcome::Applied,
            Step::Noop => CommandOutcome::Noop,
        }
    }
}

fn finish(id: ActionId, outcome: CommandOutcome, mut events: Vec<NavEvent>) -> NavDispatchResult {
    if id != ActionId::MotionTick {
        debug!(action = id.as_str(), ?outcome, "navigator command");
    }
    events.push(NavEvent::CommandExecuted { id, outcome });
    NavDispatchResult { outcome, events }
}
