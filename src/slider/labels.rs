use chrono::format::{Item, StrftimeItems};
use chrono::{DateTime, Duration, Utc};
use log::warn;
use serde::{Deserialize, Serialize};

use super::TimeSlider;

/// strftime patterns for the slider's labels.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabelFormats {
  /// Labels at both ends of the full extent.
  pub full_extent: String,
  /// Labels of the current extent's thumbs.
  pub current_extent: String,
  /// Labels of major ticks.
  pub time_step_interval: String,
}

impl LabelFormats {
  /// Formats fitting the length of the full extent.
  #[must_use]
  pub fn for_span(span: Duration) -> Self {
    let (full, current, ticks) = if span.num_days() > 365 {
      ("%Y-%m-%d", "%Y-%m-%d", "%Y")
    } else if span.num_days() > 30 {
      ("%Y-%m-%d", "%Y-%m-%d", "%m-%d")
    } else if span.num_days() > 1 {
      ("%Y-%m-%d %H:%M", "%m/%d %H:%M", "%m/%d")
    } else {
      ("%Y-%m-%d %H:%M:%S", "%H:%M:%S", "%H:%M")
    };
    Self {
      full_extent: full.to_string(),
      current_extent: current.to_string(),
      time_step_interval: ticks.to_string(),
    }
  }

  fn is_valid(&self) -> bool {
    is_valid_format(&self.full_extent)
      && is_valid_format(&self.current_extent)
      && is_valid_format(&self.time_step_interval)
  }
}

/// Whether `format` is a strftime pattern chrono can render.
#[must_use]
pub fn is_valid_format(format: &str) -> bool {
  StrftimeItems::new(format).all(|item| !matches!(item, Item::Error))
}

impl TimeSlider {
  /// Active formats: the configured ones, or ones derived from the span of
  /// the full extent.
  #[must_use]
  pub fn label_formats(&self) -> LabelFormats {
    self.label_formats.clone().unwrap_or_else(|| {
      LabelFormats::for_span(
        self
          .full_extent
          .map_or_else(Duration::zero, |full| full.duration()),
      )
    })
  }

  /// Overrides the label formats, `None` restores the derived ones. Invalid
  /// patterns are ignored.
  pub fn set_label_formats(&mut self, formats: Option<LabelFormats>) {
    if let Some(formats) = &formats
      && !formats.is_valid()
    {
      warn!("Ignoring invalid label formats {formats:?}");
      return;
    }
    self.label_formats = formats;
    self.refresh_tickmarks();
  }

  /// Start and end labels of the full extent.
  #[must_use]
  pub fn full_extent_labels(&self) -> Option<(String, String)> {
    let full = self.full_extent?;
    let format = self.label_formats().full_extent;
    Some((
      format_time(full.start(), &format),
      format_time(full.end(), &format),
    ))
  }

  /// Start and end labels of the current extent.
  #[must_use]
  pub fn current_extent_labels(&self) -> Option<(String, String)> {
    let current = self.current_extent?;
    let format = self.label_formats().current_extent;
    Some((
      format_time(current.start(), &format),
      format_time(current.end(), &format),
    ))
  }

  pub(super) fn tick_labels(&self) -> Vec<String> {
    let format = self.label_formats().time_step_interval;
    self
      .time_steps
      .iter()
      .map(|step| format_time(*step, &format))
      .collect()
  }
}

fn format_time(time: DateTime<Utc>, format: &str) -> String {
  time.format(format).to_string()
}
