use crate::command::PointerButton;
use crate::geometry::{Point, Region};

/// OS-facing collaborators of the navigator. Calls are synchronous and
/// assumed to succeed; implementations log their own failures.
pub trait Desktop: Send {
    /// Monitor rectangles in virtual-screen coordinates, in OS order.
    fn monitor_rects(&self) -> Vec<Region>;
    /// Bounding rectangle of all monitors.
    fn virtual_screen(&self) -> Region;
    fn cursor_position(&self) -> Point;
    fn move_pointer(&mut self, to: Point);
    /// Press and release `button` at the current pointer position.
    fn click(&mut self, button: PointerButton);
}
