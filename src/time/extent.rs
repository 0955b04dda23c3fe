use std::fmt::Display;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::error::TimeSliderError;

/// A closed time range. Start and end are equal for a time instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TimeExtent {
  start: DateTime<Utc>,
  end: DateTime<Utc>,
}

impl TimeExtent {
  /// Creates an extent, rejecting `start > end`.
  pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Result<Self, TimeSliderError> {
    if start > end {
      return Err(TimeSliderError::InvalidExtent {
        start: start.to_rfc3339(),
        end: end.to_rfc3339(),
      });
    }
    Ok(Self { start, end })
  }

  /// Builds an extent from two times in any order.
  #[must_use]
  pub fn ordered(a: DateTime<Utc>, b: DateTime<Utc>) -> Self {
    Self {
      start: a.min(b),
      end: a.max(b),
    }
  }

  #[must_use]
  pub fn instant(time: DateTime<Utc>) -> Self {
    Self {
      start: time,
      end: time,
    }
  }

  #[must_use]
  pub fn start(&self) -> DateTime<Utc> {
    self.start
  }

  #[must_use]
  pub fn end(&self) -> DateTime<Utc> {
    self.end
  }

  #[must_use]
  pub fn is_time_instant(&self) -> bool {
    self.start == self.end
  }

  #[must_use]
  pub fn duration(&self) -> Duration {
    self.end.signed_duration_since(self.start)
  }

  #[must_use]
  pub fn contains(&self, time: DateTime<Utc>) -> bool {
    time >= self.start && time <= self.end
  }

  /// Clamps both ends into `bounds`.
  #[must_use]
  pub fn clamp_to(&self, bounds: &TimeExtent) -> Self {
    Self {
      start: self.start.clamp(bounds.start, bounds.end),
      end: self.end.clamp(bounds.start, bounds.end),
    }
  }

  /// Offset of `time` relative to this extent, `0.0` at the start and `1.0`
  /// at the end. A zero-length extent maps everything to `0.0`.
  #[must_use]
  #[allow(clippy::cast_precision_loss)]
  pub fn normalized_offset(&self, time: DateTime<Utc>) -> f64 {
    let total = nanos(self.duration());
    if total == 0 {
      return 0.0;
    }
    nanos(time.signed_duration_since(self.start)) as f64 / total as f64
  }
}

/// Nanoseconds of `duration`, saturating where `i64` nanoseconds overflow.
pub(crate) fn nanos(duration: Duration) -> i64 {
  duration.num_nanoseconds().unwrap_or(if duration < Duration::zero() {
    i64::MIN
  } else {
    i64::MAX
  })
}

impl Display for TimeExtent {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    if self.is_time_instant() {
      write!(f, "{}", self.start.to_rfc3339())
    } else {
      write!(f, "{} - {}", self.start.to_rfc3339(), self.end.to_rfc3339())
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use chrono::TimeZone;

  fn day(d: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2020, 1, d, 0, 0, 0).unwrap()
  }

  #[test]
  fn rejects_reversed_extent() {
    assert!(matches!(
      TimeExtent::new(day(3), day(2)),
      Err(TimeSliderError::InvalidExtent { .. })
    ));
    assert!(TimeExtent::new(day(2), day(2)).unwrap().is_time_instant());
  }

  #[test]
  fn clamps_into_bounds() {
    let bounds = TimeExtent::new(day(2), day(8)).unwrap();
    let clamped = TimeExtent::new(day(1), day(9)).unwrap().clamp_to(&bounds);
    assert_eq!(clamped, bounds);

    let inside = TimeExtent::new(day(3), day(4)).unwrap();
    assert_eq!(inside.clamp_to(&bounds), inside);
  }

  #[test]
  fn normalized_offset_spans_unit_interval() {
    let extent = TimeExtent::new(day(1), day(11)).unwrap();
    assert!((extent.normalized_offset(day(1)) - 0.0).abs() < f64::EPSILON);
    assert!((extent.normalized_offset(day(6)) - 0.5).abs() < 1e-9);
    assert!((extent.normalized_offset(day(11)) - 1.0).abs() < 1e-9);
    assert!((TimeExtent::instant(day(4)).normalized_offset(day(9))).abs() < f64::EPSILON);
  }

  #[test]
  fn display_collapses_instants() {
    assert_eq!(
      TimeExtent::instant(day(5)).to_string(),
      "2020-01-05T00:00:00+00:00"
    );
    assert_eq!(
      TimeExtent::ordered(day(6), day(5)).to_string(),
      "2020-01-05T00:00:00+00:00 - 2020-01-06T00:00:00+00:00"
    );
  }
}
