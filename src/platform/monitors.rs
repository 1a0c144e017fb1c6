use tracing::warn;

use crate::geometry::{Point, Region};

/// Drops zero-area monitors. When nothing usable remains, the virtual screen
/// stands in as the only monitor.
pub fn usable_monitors(reported: Vec<Region>, virtual_screen: Region) -> Vec<Region> {
    let reported_len = reported.len();
    let mut usable: Vec<Region> = reported
        .into_iter()
        .filter(|monitor| !monitor.is_empty())
        .collect();
    if usable.len() < reported_len {
        warn!(
            dropped = reported_len - usable.len(),
            "ignoring zero-area monitors"
        );
    }
    if usable.is_empty() {
        warn!(?virtual_screen, "no usable monitors; falling back to virtual screen");
        usable.push(virtual_screen);
    }
    usable
}

/// Monitor under `point`, else the first one.
pub fn monitor_at(point: Point, monitors: &[Region]) -> Option<Region> {
    monitors
        .iter()
        .find(|monitor| monitor.contains(point))
        .or_else(|| monitors.first())
        .copied()
}

pub fn sorted_by_origin(monitors: &[Region]) -> Vec<Region> {
    let mut sorted = monitors.to_vec();
    sorted.sort_by_key(|monitor| (monitor.left, monitor.top));
    sorted
}

/// Next monitor after `current` in `(left, top)` order, wrapping around.
/// `None` with fewer than two monitors.
pub fn next_monitor(current: &Region, monitors: &[Region]) -> Option<Region> {
    if monitors.len() < 2 {
        return None;
    }
    let sorted = sorted_by_origin(monitors);
    let index = sorted
        .iter()
        .position(|monitor| monitor.origin() == current.origin())
        .unwrap_or(0);
    sorted.get((index + 1) % sorted.len()).copied()
}
