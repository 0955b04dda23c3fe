use chrono::{DateTime, Utc};

use super::{TimeExtent, TimeValue};
use crate::error::TimeSliderError;

/// Upper bound on generated time steps; finer intervals are rejected.
pub const MAX_TIME_STEPS: usize = 10_000;

/// Generates `start, start + interval, start + 2 * interval, ...` up to and
/// including the last step not after the extent end. Every step is computed
/// from the extent start so calendar units do not accumulate drift.
pub fn generate_time_steps(
  extent: &TimeExtent,
  interval: &TimeValue,
) -> Result<Vec<DateTime<Utc>>, TimeSliderError> {
  if interval.is_zero() {
    return Err(TimeSliderError::ZeroInterval);
  }

  let mut steps = vec![extent.start()];
  for multiple in 1u32.. {
    let Some(step) = interval.add_to(extent.start(), multiple) else {
      break;
    };
    if step > extent.end() {
      break;
    }
    if steps.len() == MAX_TIME_STEPS {
      return Err(TimeSliderError::TooManyTimeSteps(MAX_TIME_STEPS));
    }
    steps.push(step);
  }
  Ok(steps)
}

/// Position of every step within `extent`, in `[0, 1]`.
#[must_use]
pub fn normalized_positions(extent: &TimeExtent, steps: &[DateTime<Utc>]) -> Vec<f64> {
  steps
    .iter()
    .map(|step| extent.normalized_offset(*step).clamp(0.0, 1.0))
    .collect()
}
