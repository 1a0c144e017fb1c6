use tracing::debug;

use crate::command::PointerButton;
use crate::geometry::{Point, Region};

use super::traits::Desktop;

/// In-memory desktop: a fixed monitor layout and a pointer that only moves
/// when told to.
#[derive(Debug, Clone)]
pub struct SimulatedDesktop {
    monitors: Vec<Region>,
    pointer: Point,
    move_count: usize,
    clicks: Vec<(PointerButton, Point)>,
}

impl SimulatedDesktop {
    /// Starts with the pointer at the center of the first monitor.
    pub fn new(monitors: Vec<Region>) -> Self {
        let pointer = monitors
            .first()
            .map(Region::center)
            .unwrap_or_default();
        Self {
            monitors,
            pointer,
            move_count: 0,
            clicks: Vec::new(),
        }
    }

    pub fn with_pointer(mut self, pointer: Point) -> Self {
        self.pointer = pointer;
        self
    }

    pub fn pointer(&self) -> Point {
        self.pointer
    }

    pub fn move_count(&self) -> usize {
        self.move_count
    }

    pub fn clicks(&self) -> &[(PointerButton, Point)] {
        &self.clicks
    }

    pub fn set_monitors(&mut self, monitors: Vec<Region>) {
        self.monitors = monitors;
    }
}

impl Desktop for SimulatedDesktop {
    fn monitor_rects(&self) -> Vec<Region> {
        self.monitors.clone()
    }

    fn virtual_screen(&self) -> Region {
        self.monitors
            .iter()
            .fold(Region::EMPTY, |acc, monitor| acc.union(monitor))
    }

    fn cursor_position(&self) -> Point {
        self.pointer
    }

    fn move_pointer(&mut self, to: Point) {
        self.pointer = to;
        self.move_count += 1;
    }

    fn click(&mut self, button: PointerButton) {
        debug!(?button, x = self.pointer.x, y = self.pointer.y, "simulated click");
        self.clicks.push((button, self.pointer));
    }
}
