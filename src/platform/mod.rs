mod monitors;
mod simulated;
mod traits;

pub use monitors::{monitor_at, next_monitor, sorted_by_origin, usable_monitors};
pub use simulated::SimulatedDesktop;
pub use traits::Desktop;
