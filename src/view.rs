//! The seam between the slider model and whatever draws it.

/// Painting the track with egui.
pub mod egui_view;

use std::collections::HashMap;

use egui::Rect;

/// A positioned part of the slider track.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TrackElement {
  MinimumThumb,
  MaximumThumb,
  /// The bar between the two thumbs.
  CurrentExtentBar,
  MinorTick(usize),
  MajorTick(usize),
}

/// Host side of the slider: reports the track width, receives element
/// bounds and schedules layout passes.
pub trait ViewAdapter {
  fn track_width(&self) -> f32;
  fn set_track_element_bounds(&mut self, element: TrackElement, bounds: Rect);
  fn request_layout(&mut self);
}

/// Keeps the last bounds of each element. Used headless and in tests.
#[derive(Debug, Clone, Default)]
pub struct RecordingView {
  width: f32,
  bounds: HashMap<TrackElement, Rect>,
  layout_requests: usize,
}

impl RecordingView {
  #[must_use]
  pub fn new(width: f32) -> Self {
    Self {
      width,
      ..Self::default()
    }
  }

  pub fn set_width(&mut self, width: f32) {
    self.width = width;
  }

  #[must_use]
  pub fn bounds(&self, element: TrackElement) -> Option<Rect> {
    self.bounds.get(&element).copied()
  }

  #[must_use]
  pub fn layout_requests(&self) -> usize {
    self.layout_requests
  }
}

impl ViewAdapter for RecordingView {
  fn track_width(&self) -> f32 {
    self.width
  }

  fn set_track_element_bounds(&mut self, element: TrackElement, bounds: Rect) {
    self.bounds.insert(element, bounds);
  }

  fn request_layout(&mut self) {
    self.layout_requests += 1;
  }
}
