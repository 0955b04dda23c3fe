use chrono::{DateTime, Utc};

use super::TimeSlider;
use crate::time::{TimeExtent, nanos};

impl TimeSlider {
  /// Snaps `extent` onto this slider's time steps within its full extent.
  #[must_use]
  pub fn snap(&self, extent: &TimeExtent) -> TimeExtent {
    match self.full_extent {
      Some(full) => snap_to_steps(extent, &full, &self.time_steps),
      None => *extent,
    }
  }
}

/// Moves both ends of `extent` onto the nearest of `steps`.
///
/// The extent is first clamped into `full`. A time instant collapses onto a
/// single step. Otherwise the start is the nearest step before the clamped
/// end and the end the nearest step after the chosen start, so the result
/// never inverts. An extent whose ends already are steps is returned as is,
/// which makes snapping idempotent.
#[must_use]
pub fn snap_to_steps(
  extent: &TimeExtent,
  full: &TimeExtent,
  steps: &[DateTime<Utc>],
) -> TimeExtent {
  if steps.is_empty() {
    return *extent;
  }
  if steps.contains(&extent.start()) && steps.contains(&extent.end()) {
    return *extent;
  }

  let clamped = extent.clamp_to(full);
  if extent.is_time_instant() {
    let step = nearest_step(steps, clamped.start(), |_| true).unwrap_or(steps[0]);
    return TimeExtent::instant(step);
  }

  let start =
    nearest_step(steps, clamped.start(), |step| step < clamped.end()).unwrap_or(steps[0]);
  match nearest_step(steps, clamped.end(), |step| step > start) {
    Some(end) => TimeExtent::ordered(start, end),
    // The start landed on the last step, give up one step of start instead.
    None => match steps {
      [.., before_last, last] => TimeExtent::ordered(*before_last, *last),
      _ => TimeExtent::instant(start),
    },
  }
}

/// The step closest to `target` among those accepted by `allowed`. Equal
/// distances keep the earlier step.
fn nearest_step(
  steps: &[DateTime<Utc>],
  target: DateTime<Utc>,
  allowed: impl Fn(DateTime<Utc>) -> bool,
) -> Option<DateTime<Utc>> {
  let mut best: Option<(u64, DateTime<Utc>)> = None;
  for step in steps.iter().copied().filter(|step| allowed(*step)) {
    let delta = nanos(step.signed_duration_since(target)).unsigned_abs();
    if best.is_none_or(|(best_delta, _)| delta < best_delta) {
      best = Some((delta, step));
    }
  }
  best.map(|(_, step)| step)
}
