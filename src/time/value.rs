use std::fmt::Display;
use std::str::FromStr;

use chrono::{DateTime, Duration, Months, Utc};
use serde::{Deserialize, Serialize};

use crate::error::TimeSliderError;

static ALL_UNITS: [TimeUnit; 10] = [
  TimeUnit::Milliseconds,
  TimeUnit::Seconds,
  TimeUnit::Minutes,
  TimeUnit::Hours,
  TimeUnit::Days,
  TimeUnit::Weeks,
  TimeUnit::Months,
  TimeUnit::Years,
  TimeUnit::Decades,
  TimeUnit::Centuries,
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum TimeUnit {
  Milliseconds,
  Seconds,
  Minutes,
  Hours,
  #[default]
  Days,
  Weeks,
  Months,
  Years,
  Decades,
  Centuries,
}

impl TimeUnit {
  #[must_use]
  pub fn all() -> &'static [TimeUnit] {
    &ALL_UNITS
  }

  /// Suffix used by [`TimeValue`]'s string form.
  #[must_use]
  pub fn suffix(self) -> &'static str {
    match self {
      TimeUnit::Milliseconds => "ms",
      TimeUnit::Seconds => "s",
      TimeUnit::Minutes => "min",
      TimeUnit::Hours => "h",
      TimeUnit::Days => "d",
      TimeUnit::Weeks => "w",
      TimeUnit::Months => "mo",
      TimeUnit::Years => "y",
      TimeUnit::Decades => "decade",
      TimeUnit::Centuries => "century",
    }
  }

  /// Number of months per unit for calendar units.
  fn months(self) -> Option<u32> {
    match self {
      TimeUnit::Months => Some(1),
      TimeUnit::Years => Some(12),
      TimeUnit::Decades => Some(120),
      TimeUnit::Centuries => Some(1200),
      _ => None,
    }
  }

  /// Fixed length of one unit for non-calendar units.
  fn fixed(self) -> Option<Duration> {
    match self {
      TimeUnit::Milliseconds => Some(Duration::milliseconds(1)),
      TimeUnit::Seconds => Some(Duration::seconds(1)),
      TimeUnit::Minutes => Some(Duration::minutes(1)),
      TimeUnit::Hours => Some(Duration::hours(1)),
      TimeUnit::Days => Some(Duration::days(1)),
      TimeUnit::Weeks => Some(Duration::weeks(1)),
      _ => None,
    }
  }
}

impl FromStr for TimeUnit {
  type Err = TimeSliderError;
  fn from_str(input: &str) -> Result<TimeUnit, Self::Err> {
    match input.to_lowercase().as_str() {
      "ms" | "millisecond" | "milliseconds" => Ok(TimeUnit::Milliseconds),
      "s" | "sec" | "second" | "seconds" => Ok(TimeUnit::Seconds),
      "min" | "minute" | "minutes" => Ok(TimeUnit::Minutes),
      "h" | "hour" | "hours" => Ok(TimeUnit::Hours),
      "d" | "day" | "days" => Ok(TimeUnit::Days),
      "w" | "week" | "weeks" => Ok(TimeUnit::Weeks),
      "mo" | "month" | "months" => Ok(TimeUnit::Months),
      "y" | "year" | "years" => Ok(TimeUnit::Years),
      "decade" | "decades" => Ok(TimeUnit::Decades),
      "century" | "centuries" => Ok(TimeUnit::Centuries),
      other => Err(TimeSliderError::ParseTimeValue(format!(
        "unknown unit '{other}'"
      ))),
    }
  }
}

/// An amount of time in a given unit, e.g. `3 months`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TimeValue {
  pub duration: u32,
  pub unit: TimeUnit,
}

impl TimeValue {
  #[must_use]
  pub fn new(duration: u32, unit: TimeUnit) -> Self {
    Self { duration, unit }
  }

  #[must_use]
  pub fn is_zero(&self) -> bool {
    self.duration == 0
  }

  /// `time + multiple * self`. Calendar units add whole months so that
  /// stepping from the 31st lands on the last day of shorter months.
  /// `None` when the result leaves the representable range.
  #[must_use]
  pub fn add_to(&self, time: DateTime<Utc>, multiple: u32) -> Option<DateTime<Utc>> {
    let count = self.duration.checked_mul(multiple)?;
    if let Some(months) = self.unit.months() {
      time.checked_add_months(Months::new(months.checked_mul(count)?))
    } else {
      let unit = self.unit.fixed()?;
      let total = unit.checked_mul(i32::try_from(count).ok()?)?;
      time.checked_add_signed(total)
    }
  }
}

impl Display for TimeValue {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    write!(f, "{}{}", self.duration, self.unit.suffix())
  }
}

impl FromStr for TimeValue {
  type Err = TimeSliderError;

  /// Parses `<count><unit>`, e.g. `1d`, `15min`, `2 mo`.
  fn from_str(input: &str) -> Result<Self, Self::Err> {
    let input = input.trim();
    let split = input
      .find(|c: char| !c.is_ascii_digit())
      .ok_or_else(|| TimeSliderError::ParseTimeValue(format!("missing unit in '{input}'")))?;
    let (count, unit) = input.split_at(split);
    let duration = count
      .parse::<u32>()
      .map_err(|e| TimeSliderError::ParseTimeValue(format!("invalid count in '{input}': {e}")))?;
    let unit = unit.trim().parse::<TimeUnit>()?;
    Ok(Self { duration, unit })
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use chrono::TimeZone;
  use rstest::rstest;

  #[rstest]
  #[case("1d", TimeValue::new(1, TimeUnit::Days))]
  #[case("15min", TimeValue::new(15, TimeUnit::Minutes))]
  #[case("2 mo", TimeValue::new(2, TimeUnit::Months))]
  #[case("500ms", TimeValue::new(500, TimeUnit::Milliseconds))]
  #[case("1century", TimeValue::new(1, TimeUnit::Centuries))]
  fn parses_time_values(#[case] input: &str, #[case] expected: TimeValue) {
    assert_eq!(input.parse::<TimeValue>().unwrap(), expected);
  }

  #[rstest]
  #[case("d")]
  #[case("12")]
  #[case("3 fortnights")]
  fn rejects_malformed_time_values(#[case] input: &str) {
    assert!(matches!(
      input.parse::<TimeValue>(),
      Err(TimeSliderError::ParseTimeValue(_))
    ));
  }

  #[test]
  fn display_uses_short_suffix() {
    for unit in TimeUnit::all() {
      let value = TimeValue::new(3, *unit);
      assert_eq!(value.to_string().parse::<TimeValue>().unwrap(), value);
    }
  }

  #[test]
  fn month_steps_clamp_to_month_end() {
    let jan31 = Utc.with_ymd_and_hms(2021, 1, 31, 0, 0, 0).unwrap();
    let month = TimeValue::new(1, TimeUnit::Months);
    assert_eq!(
      month.add_to(jan31, 1),
      Some(Utc.with_ymd_and_hms(2021, 2, 28, 0, 0, 0).unwrap())
    );
    assert_eq!(
      month.add_to(jan31, 2),
      Some(Utc.with_ymd_and_hms(2021, 3, 31, 0, 0, 0).unwrap())
    );
  }

  #[test]
  fn overflow_yields_none() {
    let late = DateTime::<Utc>::MAX_UTC - Duration::days(1);
    assert_eq!(TimeValue::new(2, TimeUnit::Days).add_to(late, 1), None);
    assert_eq!(TimeValue::new(1, TimeUnit::Centuries).add_to(late, 1), None);
  }
}
