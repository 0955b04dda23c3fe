use egui::{Color32, FontId, Painter, Rect, Vec2};

use super::{TrackElement, ViewAdapter};
use crate::slider::TimeSlider;
use crate::tickbar::LabelMeasurer;

fn track_color() -> Color32 {
  Color32::from_gray(40)
}
fn interval_color() -> Color32 {
  Color32::from_rgba_unmultiplied(100, 150, 255, 150)
}
fn handle_color() -> Color32 {
  Color32::from_rgb(255, 255, 255)
}
fn tick_color() -> Color32 {
  Color32::from_gray(160)
}

const LABEL_FONT_SIZE: f32 = 10.0;

/// Measures labels with egui's text layout.
pub struct EguiMeasurer<'a> {
  painter: &'a Painter,
  font: FontId,
}

impl<'a> EguiMeasurer<'a> {
  #[must_use]
  pub fn new(painter: &'a Painter) -> Self {
    Self {
      painter,
      font: FontId::proportional(LABEL_FONT_SIZE),
    }
  }
}

impl LabelMeasurer for EguiMeasurer<'_> {
  fn measure(&self, text: &str) -> Vec2 {
    self
      .painter
      .layout_no_wrap(text.to_string(), self.font.clone(), Color32::WHITE)
      .size()
  }
}

/// Draws a slider track into `track_rect` of an egui painter.
pub struct EguiTrackView<'a> {
  painter: &'a Painter,
  track_rect: Rect,
  elements: Vec<(TrackElement, Rect)>,
}

impl<'a> EguiTrackView<'a> {
  #[must_use]
  pub fn new(painter: &'a Painter, track_rect: Rect) -> Self {
    Self {
      painter,
      track_rect,
      elements: Vec::new(),
    }
  }

  /// Paints the arranged elements and the labels of major ticks.
  pub fn paint(&self, slider: &TimeSlider) {
    let painter = self.painter;
    painter.rect_filled(
      Rect::from_min_size(
        self.track_rect.min,
        Vec2::new(self.track_rect.width(), crate::slider::THUMB_SIZE),
      ),
      5.0,
      track_color(),
    );

    for (element, bounds) in &self.elements {
      if bounds.size() == Vec2::ZERO {
        continue;
      }
      let bounds = bounds.translate(self.track_rect.min.to_vec2());
      match element {
        TrackElement::CurrentExtentBar => {
          painter.rect_filled(bounds, 2.0, interval_color());
        }
        TrackElement::MinimumThumb | TrackElement::MaximumThumb => {
          painter.circle_filled(bounds.center(), bounds.width() / 2.0, handle_color());
        }
        TrackElement::MinorTick(_) => {
          painter.rect_filled(bounds, 0.0, tick_color());
        }
        TrackElement::MajorTick(i) => {
          let tick = Rect::from_min_size(
            bounds.center_top(),
            Vec2::new(1.0, crate::tickbar::TickStyle::default().major_tick_size.y),
          );
          painter.rect_filled(tick, 0.0, tick_color());
          if let Some(label) = slider
            .tickbar()
            .layout()
            .get(*i)
            .and_then(|tick| tick.label.as_ref())
          {
            painter.text(
              bounds.center_bottom(),
              egui::Align2::CENTER_BOTTOM,
              label,
              FontId::proportional(LABEL_FONT_SIZE),
              Color32::WHITE,
            );
          }
        }
      }
    }
  }
}

impl ViewAdapter for EguiTrackView<'_> {
  fn track_width(&self) -> f32 {
    self.track_rect.width()
  }

  fn set_track_element_bounds(&mut self, element: TrackElement, bounds: Rect) {
    match self.elements.iter_mut().find(|(e, _)| *e == element) {
      Some(entry) => entry.1 = bounds,
      None => self.elements.push((element, bounds)),
    }
  }

  fn request_layout(&mut self) {
    self.painter.ctx().request_repaint();
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::time::{TimeExtent, TimeUnit, TimeValue};
  use assert_approx_eq::assert_approx_eq;
  use chrono::{TimeZone, Utc};
  use egui::{RawInput, pos2};

  fn slider() -> TimeSlider {
    let day = |d| Utc.with_ymd_and_hms(2020, 1, d, 0, 0, 0).unwrap();
    let mut slider = TimeSlider::new();
    slider
      .set_time_step_interval(TimeValue::new(1, TimeUnit::Days))
      .unwrap();
    slider
      .set_full_extent(TimeExtent::new(day(1), day(11)).unwrap())
      .unwrap();
    slider.set_current_extent(TimeExtent::new(day(2), day(6)).unwrap());
    slider.set_show_tick_labels(true);
    slider
  }

  #[test]
  fn arrange_records_every_element() {
    let ctx = egui::Context::default();
    let mut slider = slider();
    let mut elements = Vec::new();
    let mut label_size = Vec2::ZERO;

    let _ = ctx.run_ui(RawInput::default(), |ui| {
      let painter = ui.painter().clone();
      let measurer = EguiMeasurer::new(&painter);
      label_size = measurer.measure("01/05");

      let track = Rect::from_min_size(pos2(10.0, 10.0), Vec2::new(400.0, 40.0));
      let mut view = EguiTrackView::new(&painter, track);
      assert_approx_eq!(view.track_width(), 400.0);
      slider.arrange(&mut view, &measurer);
      view.paint(&slider);
      elements.clone_from(&view.elements);
    });

    assert!(label_size.x > 0.0 && label_size.y > 0.0);
    // Two thumbs, the bar and a minor and major rendering per tick.
    assert_eq!(elements.len(), 3 + 2 * 11);
    let bar = elements
      .iter()
      .find(|(element, _)| *element == TrackElement::CurrentExtentBar)
      .map(|(_, bounds)| *bounds)
      .unwrap();
    assert_approx_eq!(bar.min.x, 40.0, 1e-3);
    assert_approx_eq!(bar.max.x, 200.0, 1e-3);
    assert!(!slider.needs_layout());
  }

  #[test]
  fn repeated_bounds_replace_the_element() {
    let ctx = egui::Context::default();
    let _ = ctx.run_ui(RawInput::default(), |ui| {
      let painter = ui.painter().clone();
      let thumb = |x| Rect::from_min_size(pos2(x, 0.0), Vec2::splat(4.0));
      let mut view = EguiTrackView::new(&painter, thumb(0.0).expand(50.0));
      view.set_track_element_bounds(TrackElement::MinimumThumb, thumb(0.0));
      view.set_track_element_bounds(TrackElement::MinimumThumb, thumb(5.0));
      view.request_layout();
      assert_eq!(view.elements, vec![(TrackElement::MinimumThumb, thumb(5.0))]);
    });
  }
}
