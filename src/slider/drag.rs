use chrono::{DateTime, Duration, Utc};
use log::trace;

use super::TimeSlider;
use crate::time::{TimeExtent, nanos};

/// Unsnapped extent accumulated over one drag gesture, so that many small
/// pixel deltas add up instead of each being snapped away.
#[derive(Debug, Clone, Default)]
pub(super) struct DragState {
  working: Option<TimeExtent>,
}

impl DragState {
  pub(super) fn reset(&mut self) {
    self.working = None;
  }
}

/// `time + delta`, replaced by the bound in the direction of travel when the
/// sum is not representable, then clamped into `bounds`.
fn add_clamped(time: DateTime<Utc>, delta: Duration, bounds: &TimeExtent) -> DateTime<Utc> {
  time
    .checked_add_signed(delta)
    .unwrap_or(if delta < Duration::zero() {
      bounds.start()
    } else {
      bounds.end()
    })
    .clamp(bounds.start(), bounds.end())
}

impl TimeSlider {
  /// Width of the track in layout units, used to convert drag deltas.
  #[must_use]
  pub fn track_width(&self) -> f32 {
    self.track_width
  }

  pub fn set_track_width(&mut self, width: f32) {
    if (self.track_width - width).abs() > f32::EPSILON {
      self.track_width = width;
      self.layout_dirty = true;
    }
  }

  /// Starts a drag gesture from the current extent.
  pub fn begin_drag(&mut self) {
    self.drag.working = self.current_extent;
  }

  /// Ends the drag gesture, later deltas start from the current extent again.
  pub fn end_drag(&mut self) {
    self.drag.reset();
  }

  /// Converts a horizontal pixel delta into a time delta using the ratio of
  /// track width to full extent length.
  #[allow(clippy::cast_precision_loss, clippy::cast_possible_truncation)]
  fn pixels_to_duration(&self, delta_px: f32) -> Option<Duration> {
    let full = self.full_extent?;
    if self.track_width <= 0.0 {
      return None;
    }
    let pixels_per_nano = f64::from(self.track_width) / nanos(full.duration()) as f64;
    if !pixels_per_nano.is_finite() || pixels_per_nano <= 0.0 {
      return None;
    }
    Some(Duration::nanoseconds(
      (f64::from(delta_px) / pixels_per_nano) as i64,
    ))
  }

  fn drag_context(&mut self, delta_px: f32) -> Option<(TimeExtent, TimeExtent, Duration)> {
    let full = self.full_extent?;
    let delta = self.pixels_to_duration(delta_px)?;
    let working = self.drag.working.or(self.current_extent)?;
    trace!("Drag by {delta_px}px = {delta}");
    Some((full, working, delta))
  }

  /// Drags the start thumb. An instant moves as a whole.
  pub fn on_minimum_thumb_drag(&mut self, delta_px: f32) -> bool {
    if self.is_start_time_pinned {
      return false;
    }
    let Some((full, working, delta)) = self.drag_context(delta_px) else {
      return false;
    };
    let moved = if working.is_time_instant() {
      TimeExtent::instant(add_clamped(working.start(), delta, &full))
    } else {
      let latest = working
        .end()
        .checked_sub_signed(Duration::nanoseconds(1))
        .unwrap_or(working.end());
      let start = add_clamped(working.start(), delta, &full).min(latest);
      TimeExtent::ordered(start, working.end())
    };
    self.apply_drag(moved)
  }

  /// Drags the end thumb. An instant moves as a whole.
  pub fn on_maximum_thumb_drag(&mut self, delta_px: f32) -> bool {
    if self.is_end_time_pinned {
      return false;
    }
    let Some((full, working, delta)) = self.drag_context(delta_px) else {
      return false;
    };
    let moved = if working.is_time_instant() {
      TimeExtent::instant(add_clamped(working.end(), delta, &full))
    } else {
      let earliest = working
        .start()
        .checked_add_signed(Duration::nanoseconds(1))
        .unwrap_or(working.start());
      let end = add_clamped(working.end(), delta, &full).max(earliest);
      TimeExtent::ordered(working.start(), end)
    };
    self.apply_drag(moved)
  }

  /// Drags the bar between the thumbs, moving both ends and keeping the
  /// span. Does nothing while either end is pinned.
  pub fn on_current_extent_thumb_drag(&mut self, delta_px: f32) -> bool {
    if self.is_start_time_pinned || self.is_end_time_pinned {
      return false;
    }
    let Some((full, working, delta)) = self.drag_context(delta_px) else {
      return false;
    };
    let span = working.duration();
    let backward = delta < Duration::zero();
    let mut start = working.start().checked_add_signed(delta);
    let mut end = working.end().checked_add_signed(delta);
    if start.map_or(backward, |s| s < full.start()) {
      start = Some(full.start());
      end = full.start().checked_add_signed(span);
    } else if end.map_or(!backward, |e| e > full.end()) {
      end = Some(full.end());
      start = full.end().checked_sub_signed(span);
    }
    let (Some(start), Some(end)) = (start, end) else {
      return false;
    };
    self.apply_drag(TimeExtent::ordered(start, end).clamp_to(&full))
  }

  fn apply_drag(&mut self, moved: TimeExtent) -> bool {
    self.drag.working = Some(moved);
    let snapped = self.snap(&moved);
    self.publish(snapped)
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::time::{TimeUnit, TimeValue};
  use chrono::TimeZone;

  fn day(d: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2020, 1, d, 0, 0, 0).unwrap()
  }

  /// Ten days on a 100 px track: 10 px per day.
  fn slider(current: TimeExtent) -> TimeSlider {
    let mut slider = TimeSlider::new();
    slider
      .set_time_step_interval(TimeValue::new(1, TimeUnit::Days))
      .unwrap();
    slider
      .set_full_extent(TimeExtent::new(day(1), day(11)).unwrap())
      .unwrap();
    slider.set_current_extent(current);
    slider.set_track_width(100.0);
    slider
  }

  #[test]
  fn small_deltas_accumulate_within_a_gesture() {
    let mut slider = slider(TimeExtent::new(day(3), day(6)).unwrap());
    slider.begin_drag();
    assert!(!slider.on_maximum_thumb_drag(4.0));
    assert!(slider.on_maximum_thumb_drag(4.0));
    assert_eq!(
      slider.current_extent(),
      Some(TimeExtent::new(day(3), day(7)).unwrap())
    );
    slider.end_drag();
  }

  #[test]
  fn minimum_thumb_stops_before_end() {
    let mut slider = slider(TimeExtent::new(day(3), day(6)).unwrap());
    assert!(slider.on_minimum_thumb_drag(500.0));
    assert_eq!(
      slider.current_extent(),
      Some(TimeExtent::new(day(5), day(6)).unwrap())
    );
  }

  #[test]
  fn instant_moves_as_a_whole() {
    let mut slider = slider(TimeExtent::instant(day(5)));
    assert!(slider.on_maximum_thumb_drag(-21.0));
    assert_eq!(slider.current_extent(), Some(TimeExtent::instant(day(3))));
  }

  #[test]
  fn bar_drag_keeps_span_at_bounds() {
    let mut slider = slider(TimeExtent::new(day(3), day(6)).unwrap());
    assert!(slider.on_current_extent_thumb_drag(-1000.0));
    assert_eq!(
      slider.current_extent(),
      Some(TimeExtent::new(day(1), day(4)).unwrap())
    );
    slider.end_drag();
    assert!(slider.on_current_extent_thumb_drag(f32::MAX));
    assert_eq!(
      slider.current_extent(),
      Some(TimeExtent::new(day(8), day(11)).unwrap())
    );
  }

  fn daily_from(start: DateTime<Utc>) -> TimeSlider {
    let mut slider = TimeSlider::new();
    slider
      .set_time_step_interval(TimeValue::new(1, TimeUnit::Days))
      .unwrap();
    slider
      .set_full_extent(TimeExtent::new(start, start + Duration::days(10)).unwrap())
      .unwrap();
    slider.set_track_width(100.0);
    slider
  }

  #[test]
  fn drags_past_latest_date_clamp_to_end() {
    let start = DateTime::<Utc>::MAX_UTC - Duration::days(10);
    let step = |i| start + Duration::days(i);
    let mut slider = daily_from(start);

    slider.set_current_extent(TimeExtent::new(step(2), step(5)).unwrap());
    assert!(slider.on_maximum_thumb_drag(f32::MAX));
    assert_eq!(
      slider.current_extent(),
      Some(TimeExtent::new(step(2), DateTime::<Utc>::MAX_UTC).unwrap())
    );

    slider.set_current_extent(TimeExtent::new(step(2), step(5)).unwrap());
    assert!(slider.on_current_extent_thumb_drag(f32::MAX));
    assert_eq!(
      slider.current_extent(),
      Some(TimeExtent::new(step(7), step(10)).unwrap())
    );
  }

  #[test]
  fn drags_past_earliest_date_clamp_to_start() {
    let start = DateTime::<Utc>::MIN_UTC;
    let step = |i| start + Duration::days(i);
    let mut slider = daily_from(start);

    slider.set_current_extent(TimeExtent::new(step(2), step(5)).unwrap());
    assert!(slider.on_minimum_thumb_drag(-f32::MAX));
    assert_eq!(
      slider.current_extent(),
      Some(TimeExtent::new(start, step(5)).unwrap())
    );

    slider.set_current_extent(TimeExtent::new(step(2), step(5)).unwrap());
    assert!(slider.on_current_extent_thumb_drag(-f32::MAX));
    assert_eq!(
      slider.current_extent(),
      Some(TimeExtent::new(start, step(3)).unwrap())
    );
  }

  #[test]
  fn pinned_ends_block_drags() {
    let mut slider = slider(TimeExtent::new(day(3), day(6)).unwrap());
    slider.set_start_time_pinned(true);
    assert!(!slider.on_minimum_thumb_drag(30.0));
    assert!(!slider.on_current_extent_thumb_drag(30.0));
    assert!(slider.on_maximum_thumb_drag(30.0));
    assert_eq!(
      slider.current_extent(),
      Some(TimeExtent::new(day(3), day(9)).unwrap())
    );
  }

  #[test]
  fn zero_delta_and_missing_width_are_no_ops() {
    let mut slider = slider(TimeExtent::new(day(3), day(6)).unwrap());
    assert!(!slider.on_current_extent_thumb_drag(0.0));
    slider.set_track_width(0.0);
    assert!(!slider.on_current_extent_thumb_drag(25.0));
  }
}
