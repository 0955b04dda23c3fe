/// Immutable start/end pairs.
mod extent;
/// Regularly spaced time steps over an extent.
mod steps;
/// Durations with calendar aware units.
mod value;

pub use extent::TimeExtent;
pub(crate) use extent::nanos;
pub use steps::{MAX_TIME_STEPS, generate_time_steps, normalized_positions};
pub use value::{TimeUnit, TimeValue};
