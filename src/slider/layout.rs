use egui::{Rect, Vec2, pos2, vec2};

use super::TimeSlider;
use crate::tickbar::LabelMeasurer;
use crate::view::{TrackElement, ViewAdapter};

/// Diameter of the start and end thumbs.
pub const THUMB_SIZE: f32 = 12.0;
/// Height of the current extent bar.
pub const TRACK_HEIGHT: f32 = 10.0;
/// Height reserved below the track for ticks and their labels.
pub const TICK_AREA_HEIGHT: f32 = 24.0;

impl TimeSlider {
  /// Computes the bounds of every track element and hands them to `view`.
  /// Track-relative coordinates: x in `[0, track width]`, the track on
  /// top and ticks below it.
  #[allow(clippy::cast_possible_truncation)]
  pub fn arrange(&mut self, view: &mut dyn ViewAdapter, measurer: &dyn LabelMeasurer) {
    self.set_track_width(view.track_width());
    let width = self.track_width;

    if let (Some(full), Some(current)) = (self.full_extent, self.current_extent) {
      let start_x = full.normalized_offset(current.start()) as f32 * width;
      let end_x = full.normalized_offset(current.end()) as f32 * width;
      let center_y = THUMB_SIZE / 2.0;
      let thumb = Vec2::splat(THUMB_SIZE);

      view.set_track_element_bounds(
        TrackElement::MinimumThumb,
        Rect::from_center_size(pos2(start_x, center_y), thumb),
      );
      // An instant is drawn with the start thumb alone.
      let end_thumb = if current.is_time_instant() {
        Vec2::ZERO
      } else {
        thumb
      };
      view.set_track_element_bounds(
        TrackElement::MaximumThumb,
        Rect::from_center_size(pos2(end_x, center_y), end_thumb),
      );
      view.set_track_element_bounds(
        TrackElement::CurrentExtentBar,
        Rect::from_min_max(
          pos2(start_x, center_y - TRACK_HEIGHT / 2.0),
          pos2(end_x, center_y + TRACK_HEIGHT / 2.0),
        ),
      );
    }

    let offset = vec2(0.0, THUMB_SIZE + 2.0);
    let ticks = self
      .tickbar
      .arrange(vec2(width, TICK_AREA_HEIGHT), measurer)
      .to_vec();
    for (i, tick) in ticks.iter().enumerate() {
      view.set_track_element_bounds(TrackElement::MinorTick(i), tick.minor_bounds.translate(offset));
      view.set_track_element_bounds(TrackElement::MajorTick(i), tick.major_bounds.translate(offset));
    }
    self.layout_dirty = false;
  }

  /// Asks the view for a layout pass if anything changed since the last
  /// arrange.
  pub fn sync_layout(&mut self, view: &mut dyn ViewAdapter) {
    if self.layout_dirty {
      view.request_layout();
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::tickbar::FixedWidthMeasurer;
  use crate::time::{TimeExtent, TimeUnit, TimeValue};
  use crate::view::RecordingView;
  use assert_approx_eq::assert_approx_eq;
  use chrono::{TimeZone, Utc};

  fn slider() -> TimeSlider {
    let mut slider = TimeSlider::new();
    slider
      .set_time_step_interval(TimeValue::new(1, TimeUnit::Days))
      .unwrap();
    slider
      .set_full_extent(
        TimeExtent::new(
          Utc.with_ymd_and_hms(2020, 1, 1, 0, 0, 0).unwrap(),
          Utc.with_ymd_and_hms(2020, 1, 11, 0, 0, 0).unwrap(),
        )
        .unwrap(),
      )
      .unwrap();
    slider
  }

  #[test]
  fn thumbs_follow_current_extent() {
    let mut slider = slider();
    slider.set_current_extent(
      TimeExtent::new(
        Utc.with_ymd_and_hms(2020, 1, 3, 0, 0, 0).unwrap(),
        Utc.with_ymd_and_hms(2020, 1, 6, 0, 0, 0).unwrap(),
      )
      .unwrap(),
    );
    let mut view = RecordingView::new(200.0);
    slider.arrange(&mut view, &FixedWidthMeasurer::default());

    let min = view.bounds(TrackElement::MinimumThumb).unwrap();
    let max = view.bounds(TrackElement::MaximumThumb).unwrap();
    let bar = view.bounds(TrackElement::CurrentExtentBar).unwrap();
    assert_approx_eq!(min.center().x, 40.0, 1e-3);
    assert_approx_eq!(max.center().x, 100.0, 1e-3);
    assert_approx_eq!(bar.width(), 60.0, 1e-3);
    assert!(view.bounds(TrackElement::MinorTick(10)).is_some());
    assert!(!slider.needs_layout());
  }

  #[test]
  fn instant_hides_end_thumb() {
    let mut slider = slider();
    let mut view = RecordingView::new(200.0);
    slider.arrange(&mut view, &FixedWidthMeasurer::default());
    assert_eq!(
      view.bounds(TrackElement::MaximumThumb).map(|r| r.size()),
      Some(Vec2::ZERO)
    );
  }

  #[test]
  fn layout_requested_only_after_changes() {
    let mut slider = slider();
    let mut view = RecordingView::new(200.0);
    slider.arrange(&mut view, &FixedWidthMeasurer::default());
    slider.sync_layout(&mut view);
    assert_eq!(view.layout_requests(), 0);

    assert!(slider.step_forward(1).unwrap());
    slider.sync_layout(&mut view);
    assert_eq!(view.layout_requests(), 1);
  }
}
