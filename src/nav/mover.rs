/// Pixels moved per tick unless configured otherwise.
pub const DEFAULT_STEP_PX: i32 = 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoverTransition {
    /// Was idle; the caller must arm its tick source.
    Started,
    /// Already running; only the direction changed.
    Redirected,
    /// Was running; the caller must disarm its tick source.
    Stopped,
    Unchanged,
}

/// Continuous directional motion. The mover owns no timer; whoever drives it
/// calls [`ContinuousMover::tick`] at a fixed interval while it is running.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContinuousMover {
    dx: i32,
    dy: i32,
    step: i32,
    running: bool,
}

impl Default for ContinuousMover {
    fn default() -> Self {
        Self::new(DEFAULT_STEP_PX)
    }
}

impl ContinuousMover {
    pub fn new(step: i32) -> Self {
        Self {
            dx: 0,
            dy: 0,
            step: step.max(1),
            running: false,
        }
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn direction(&self) -> (i32, i32) {
        (self.dx, self.dy)
    }

    /// Sets the direction (each axis clamped to -1..=1) and starts if idle.
    pub fn start(&mut self, dx: i32, dy: i32) -> MoverTransition {
        self.dx = dx.signum();
        self.dy = dy.signum();
        if self.running {
            return MoverTransition::Redirected;
        }
        self.running = true;
        MoverTransition::Started
    }

    pub fn stop(&mut self) -> MoverTransition {
        if !self.running {
            return MoverTransition::Unchanged;
        }
        self.running = false;
        MoverTransition::Stopped
    }

    /// Pixel delta for this tick, or `None` while stopped.
    pub fn tick(&self) -> Option<(i32, i32)> {
        self.running
            .then(|| (self.dx * self.step, self.dy * self.step))
    }
}
