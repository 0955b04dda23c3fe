//! Placement of tick marks along the slider track.
//!
//! Every tick has two candidate renderings: a short unlabeled minor tick and
//! a taller major tick carrying a label. When labels are shown, the layout
//! promotes every k-th tick to major, picking the smallest k whose labels do
//! not collide. Ticks are never removed, the unused rendering of each tick
//! is collapsed to a zero-size rectangle.

use egui::{Pos2, Rect, Vec2, pos2, vec2};

/// Minimum horizontal gap between two major tick boxes.
pub const MIN_LABEL_SPACING: f32 = 6.0;

/// Measures rendered label text.
pub trait LabelMeasurer {
  fn measure(&self, text: &str) -> Vec2;
}

/// Measures text as a fixed advance per character, for headless layout.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FixedWidthMeasurer {
  pub char_width: f32,
  pub line_height: f32,
}

impl Default for FixedWidthMeasurer {
  fn default() -> Self {
    Self {
      char_width: 7.0,
      line_height: 12.0,
    }
  }
}

impl LabelMeasurer for FixedWidthMeasurer {
  #[allow(clippy::cast_precision_loss)]
  fn measure(&self, text: &str) -> Vec2 {
    vec2(text.chars().count() as f32 * self.char_width, self.line_height)
  }
}

/// Sizes of the tick renderings.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TickStyle {
  pub minor_tick_size: Vec2,
  pub major_tick_size: Vec2,
  /// Vertical space between a major tick and its label.
  pub label_gap: f32,
}

impl Default for TickStyle {
  fn default() -> Self {
    Self {
      minor_tick_size: vec2(1.0, 4.0),
      major_tick_size: vec2(1.0, 7.0),
      label_gap: 2.0,
    }
  }
}

/// Layout result for one tick.
#[derive(Debug, Clone, PartialEq)]
pub struct TickPlacement {
  /// Normalized position along the track.
  pub position: f64,
  pub is_major: bool,
  pub minor_bounds: Rect,
  /// Tick plus label box.
  pub major_bounds: Rect,
  pub label: Option<String>,
}

impl TickPlacement {
  /// The rectangle that is actually shown.
  #[must_use]
  pub fn visible_bounds(&self) -> Rect {
    if self.is_major {
      self.major_bounds
    } else {
      self.minor_bounds
    }
  }
}

/// Tick layout state for one track.
#[derive(Debug, Clone, Default)]
pub struct Tickbar {
  style: TickStyle,
  positions: Vec<f64>,
  labels: Vec<String>,
  show_tick_labels: bool,
  layout: Vec<TickPlacement>,
}

impl Tickbar {
  #[must_use]
  pub fn new(style: TickStyle) -> Self {
    Self {
      style,
      ..Self::default()
    }
  }

  /// Sets the normalized tick positions and the label text of each tick.
  pub fn set_tickmarks(&mut self, positions: Vec<f64>, labels: Vec<String>) {
    self.positions = positions;
    self.labels = labels;
  }

  #[must_use]
  pub fn positions(&self) -> &[f64] {
    &self.positions
  }

  pub fn set_show_tick_labels(&mut self, show: bool) {
    self.show_tick_labels = show;
  }

  #[must_use]
  pub fn show_tick_labels(&self) -> bool {
    self.show_tick_labels
  }

  /// Last arranged layout.
  #[must_use]
  pub fn layout(&self) -> &[TickPlacement] {
    &self.layout
  }

  #[must_use]
  pub fn major_indices(&self) -> Vec<usize> {
    self
      .layout
      .iter()
      .enumerate()
      .filter(|(_, tick)| tick.is_major)
      .map(|(i, _)| i)
      .collect()
  }

  /// Lays out the ticks for a track of `size`. With fewer than two ticks
  /// the previous layout is kept.
  pub fn arrange(&mut self, size: Vec2, measurer: &dyn LabelMeasurer) -> &[TickPlacement] {
    if self.positions.len() < 2 {
      return &self.layout;
    }

    let labels: Vec<&str> = (0..self.positions.len())
      .map(|i| self.labels.get(i).map_or("", String::as_str))
      .collect();
    #[allow(clippy::cast_possible_truncation)]
    let centers: Vec<f32> = self
      .positions
      .iter()
      .map(|p| (*p as f32) * size.x)
      .collect();
    let minor_boxes: Vec<Rect> = centers
      .iter()
      .map(|x| centered_box(*x, self.style.minor_tick_size))
      .collect();
    let major_boxes: Vec<Rect> = centers
      .iter()
      .zip(&labels)
      .map(|(x, label)| {
        let label_size = measurer.measure(label);
        let tick = self.style.major_tick_size;
        centered_box(
          *x,
          vec2(
            tick.x.max(label_size.x),
            tick.y + self.style.label_gap + label_size.y,
          ),
        )
      })
      .collect();

    let majors = if self.show_tick_labels {
      select_major_ticks(&major_boxes)
    } else {
      Vec::new()
    };
    log::trace!(
      "Arranged {} ticks, {} major, track width {}",
      self.positions.len(),
      majors.len(),
      size.x
    );

    self.layout = self
      .positions
      .iter()
      .enumerate()
      .map(|(i, position)| {
        let is_major = majors.contains(&i);
        let hidden = Rect::from_center_size(pos2(centers[i], 0.0), Vec2::ZERO);
        TickPlacement {
          position: *position,
          is_major,
          minor_bounds: if is_major { hidden } else { minor_boxes[i] },
          major_bounds: if is_major { major_boxes[i] } else { hidden },
          label: is_major.then(|| labels[i].to_string()),
        }
      })
      .collect();
    &self.layout
  }
}

fn centered_box(x: f32, size: Vec2) -> Rect {
  Rect::from_min_size(Pos2::new(x - size.x / 2.0, 0.0), size)
}

/// Picks the ticks that get a label.
///
/// Tries every interval `k` from 2 up to half the tick count (rounded up),
/// starting the pattern at the index that leaves the same number of minor
/// ticks on both ends. The first `k` whose neighbouring major boxes keep
/// [`MIN_LABEL_SPACING`] apart wins. Without such a `k` only the middle tick
/// (the lower one for an even count) is labeled.
#[must_use]
pub fn select_major_ticks(major_boxes: &[Rect]) -> Vec<usize> {
  let count = major_boxes.len();
  if count == 0 {
    return Vec::new();
  }

  for interval in 2..=count.div_ceil(2) {
    let first = ((count - 1) % interval) / 2;
    let candidates: Vec<usize> = (first..count).step_by(interval).collect();
    let collides = candidates.windows(2).any(|pair| {
      major_boxes[pair[0]].max.x + MIN_LABEL_SPACING > major_boxes[pair[1]].min.x
    });
    if !collides {
      return candidates;
    }
  }

  vec![(count - 1) / 2]
}

#[cfg(test)]
mod tests {
  use super::*;

  #[allow(clippy::cast_precision_loss)]
  fn uniform(count: usize) -> Vec<f64> {
    (0..count).map(|i| i as f64 / (count - 1) as f64).collect()
  }

  fn boxes(centers: &[f32], width: f32) -> Vec<Rect> {
    centers.iter().map(|x| centered_box(*x, vec2(width, 10.0))).collect()
  }

  #[test]
  fn narrow_labels_use_every_other_tick() {
    let centers: Vec<f32> = (0..9u8).map(|i| f32::from(i) * 20.0).collect();
    assert_eq!(select_major_ticks(&boxes(&centers, 10.0)), vec![0, 2, 4, 6, 8]);
  }

  #[test]
  fn pattern_is_centered() {
    // 10 ticks with interval 3: (9 % 3) / 2 = 0, interval 4: (9 % 4) / 2 = 0,
    // interval 5: (9 % 5) / 2 = 2.
    let centers: Vec<f32> = (0..10u8).map(|i| f32::from(i) * 10.0).collect();
    assert_eq!(select_major_ticks(&boxes(&centers, 40.0)), vec![2, 7]);
  }

  #[test]
  fn wide_labels_fall_back_to_middle_tick() {
    let centers: Vec<f32> = (0..20u8).map(|i| f32::from(i) * 5.0).collect();
    assert_eq!(select_major_ticks(&boxes(&centers, 500.0)), vec![9]);
  }

  #[test]
  fn interval_search_stops_at_half_the_ticks() {
    // Only intervals above 5 would keep these labels apart.
    let centers: Vec<f32> = (0..10u8).map(|i| f32::from(i) * 10.0).collect();
    assert_eq!(select_major_ticks(&boxes(&centers, 60.0)), vec![4]);
  }

  #[test]
  fn two_ticks_label_the_first() {
    assert_eq!(select_major_ticks(&boxes(&[0.0, 100.0], 10.0)), vec![0]);
  }

  #[test]
  fn single_tick_keeps_previous_layout() {
    let mut tickbar = Tickbar::default();
    tickbar.set_show_tick_labels(true);
    tickbar.set_tickmarks(uniform(3), vec!["a".into(), "b".into(), "c".into()]);
    let previous = tickbar
      .arrange(vec2(100.0, 20.0), &FixedWidthMeasurer::default())
      .to_vec();

    tickbar.set_tickmarks(vec![0.5], vec!["x".into()]);
    let arranged = tickbar.arrange(vec2(300.0, 20.0), &FixedWidthMeasurer::default());
    assert_eq!(arranged, previous.as_slice());
  }

  #[test]
  fn hidden_ticks_collapse_to_zero_size() {
    let mut tickbar = Tickbar::default();
    tickbar.set_tickmarks(uniform(5), (0..5).map(|i| format!("{i}")).collect());
    tickbar.set_show_tick_labels(false);
    let layout = tickbar.arrange(vec2(400.0, 20.0), &FixedWidthMeasurer::default());

    assert_eq!(layout.len(), 5);
    for tick in layout {
      assert!(!tick.is_major);
      assert_eq!(tick.major_bounds.size(), Vec2::ZERO);
      assert_eq!(tick.minor_bounds.size(), TickStyle::default().minor_tick_size);
      assert!(tick.label.is_none());
    }
    assert!((layout[2].minor_bounds.center().x - 200.0).abs() < f32::EPSILON);
  }
}
