//! The time slider state: full extent, time steps, the current extent and
//! its pinned ends, playback settings and change listeners.

/// Mouse drags on the thumbs and the current extent bar.
mod drag;
/// Label text for extents and ticks.
mod labels;
/// Track geometry pushed into a [`crate::view::ViewAdapter`].
mod layout;
/// Timer driven stepping.
mod playback;
/// Discretisation onto time steps.
mod snap;
/// Step-wise movement of the current extent.
mod stepping;

pub use labels::{LabelFormats, is_valid_format};
pub use layout::{THUMB_SIZE, TICK_AREA_HEIGHT, TRACK_HEIGHT};
pub use playback::{LoopMode, MIN_PLAYBACK_INTERVAL, PlaybackDirection};
pub use snap::snap_to_steps;

use chrono::{DateTime, Utc};
use log::{debug, warn};

use crate::config::Config;
use crate::error::TimeSliderError;
use crate::tickbar::Tickbar;
use crate::time::{TimeExtent, TimeUnit, TimeValue, generate_time_steps, normalized_positions};

/// Steps over `full`, or its two ends without an interval.
fn time_steps_for(
  full: &TimeExtent,
  interval: Option<&TimeValue>,
) -> Result<Vec<DateTime<Utc>>, TimeSliderError> {
  let mut steps = match interval {
    Some(interval) => generate_time_steps(full, interval)?,
    None => vec![full.start(), full.end()],
  };
  steps.dedup();
  Ok(steps)
}

/// Payload of a current extent change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CurrentExtentChanged {
  pub old: Option<TimeExtent>,
  pub new: TimeExtent,
}

/// Handle returned by [`TimeSlider::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

type Listener = Box<dyn FnMut(&CurrentExtentChanged) + Send>;

/// Time slider model. All mutation happens through `&mut self`, the host
/// owns the slider on its UI thread.
pub struct TimeSlider {
  full_extent: Option<TimeExtent>,
  time_step_interval: Option<TimeValue>,
  time_steps: Vec<DateTime<Utc>>,
  current_extent: Option<TimeExtent>,
  is_start_time_pinned: bool,
  is_end_time_pinned: bool,
  playback: playback::PlaybackState,
  drag: drag::DragState,
  label_formats: Option<LabelFormats>,
  tickbar: Tickbar,
  track_width: f32,
  layout_dirty: bool,
  listeners: Vec<(ListenerId, Listener)>,
  next_listener_id: u64,
}

impl Default for TimeSlider {
  fn default() -> Self {
    Self::new()
  }
}

impl std::fmt::Debug for TimeSlider {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("TimeSlider")
      .field("full_extent", &self.full_extent)
      .field("time_step_interval", &self.time_step_interval)
      .field("time_steps", &self.time_steps.len())
      .field("current_extent", &self.current_extent)
      .field("is_start_time_pinned", &self.is_start_time_pinned)
      .field("is_end_time_pinned", &self.is_end_time_pinned)
      .field("listeners", &self.listeners.len())
      .finish_non_exhaustive()
  }
}

impl TimeSlider {
  #[must_use]
  pub fn new() -> Self {
    Self {
      full_extent: None,
      time_step_interval: None,
      time_steps: Vec::new(),
      current_extent: None,
      is_start_time_pinned: false,
      is_end_time_pinned: false,
      playback: playback::PlaybackState::default(),
      drag: drag::DragState::default(),
      label_formats: None,
      tickbar: Tickbar::default(),
      track_width: 0.0,
      layout_dirty: true,
      listeners: Vec::new(),
      next_listener_id: 0,
    }
  }

  /// Creates a slider with playback and label settings from `config`.
  #[must_use]
  pub fn with_config(config: &Config) -> Self {
    let mut slider = Self::new();
    if let Some(ms) = config.playback_interval_ms {
      slider.set_playback_interval(std::time::Duration::from_millis(ms));
    }
    if let Some(mode) = config.loop_mode {
      slider.set_loop_mode(mode);
    }
    if let Some(direction) = config.playback_direction {
      slider.set_playback_direction(direction);
    }
    if let Some(show) = config.show_tick_labels {
      slider.set_show_tick_labels(show);
    }
    if let Some(interval) = config.time_step_interval
      && let Err(e) = slider.set_time_step_interval(interval)
    {
      warn!("Ignoring configured time step interval: {e}");
    }
    if let Some(formats) = &config.label_formats {
      slider.set_label_formats(Some(formats.clone()));
    }
    slider
  }

  #[must_use]
  pub fn full_extent(&self) -> Option<TimeExtent> {
    self.full_extent
  }

  /// Sets the overall range, regenerates the time steps and re-snaps the
  /// current extent. Without a current extent the slider starts as a time
  /// instant on the first step. On error nothing changes.
  pub fn set_full_extent(&mut self, extent: TimeExtent) -> Result<(), TimeSliderError> {
    let steps = time_steps_for(&extent, self.time_step_interval.as_ref())
      .inspect_err(|e| warn!("Rejected full extent {extent}: {e}"))?;
    self.full_extent = Some(extent);
    self.install_time_steps(steps);
    let current = self
      .current_extent
      .unwrap_or_else(|| TimeExtent::instant(extent.start()));
    self.drag.reset();
    self.publish(self.snap(&current));
    Ok(())
  }

  #[must_use]
  pub fn time_step_interval(&self) -> Option<TimeValue> {
    self.time_step_interval
  }

  /// Sets the spacing of time steps. On error the previous interval and
  /// steps are kept.
  pub fn set_time_step_interval(&mut self, interval: TimeValue) -> Result<(), TimeSliderError> {
    if interval.is_zero() {
      warn!("Rejected time step interval {interval}");
      return Err(TimeSliderError::ZeroInterval);
    }
    if let Some(full) = self.full_extent {
      let steps = time_steps_for(&full, Some(&interval))
        .inspect_err(|e| warn!("Rejected time step interval {interval}: {e}"))?;
      self.install_time_steps(steps);
    }
    self.time_step_interval = Some(interval);
    if let Some(current) = self.current_extent {
      self.publish(self.snap(&current));
    }
    Ok(())
  }

  /// Divides the full extent into `count` equal intervals.
  pub fn initialize_time_steps(&mut self, count: usize) -> Result<(), TimeSliderError> {
    if count == 0 {
      return Err(TimeSliderError::StepCountOutOfRange(count));
    }
    let full = self.full_extent.ok_or(TimeSliderError::NoFullExtent)?;
    let per_step = full.duration().num_milliseconds() / i64::try_from(count).unwrap_or(i64::MAX);
    // Coarser units only when the millisecond count does not fit.
    let interval = [
      (TimeUnit::Milliseconds, 1),
      (TimeUnit::Seconds, 1_000),
      (TimeUnit::Minutes, 60_000),
      (TimeUnit::Hours, 3_600_000),
      (TimeUnit::Days, 86_400_000),
    ]
    .into_iter()
    .find_map(|(unit, millis)| {
      u32::try_from(per_step / millis)
        .ok()
        .map(|value| TimeValue::new(value, unit))
    })
    .ok_or(TimeSliderError::TooManyTimeSteps(count))?;
    self.set_time_step_interval(interval)
  }

  /// Time steps spanning the full extent, strictly increasing.
  #[must_use]
  pub fn time_steps(&self) -> &[DateTime<Utc>] {
    &self.time_steps
  }

  #[must_use]
  pub fn current_extent(&self) -> Option<TimeExtent> {
    self.current_extent
  }

  /// Snaps `extent` onto the time steps and publishes it.
  /// Returns whether the current extent changed.
  pub fn set_current_extent(&mut self, extent: TimeExtent) -> bool {
    self.drag.reset();
    self.publish(self.snap(&extent))
  }

  #[must_use]
  pub fn is_start_time_pinned(&self) -> bool {
    self.is_start_time_pinned
  }

  #[must_use]
  pub fn is_end_time_pinned(&self) -> bool {
    self.is_end_time_pinned
  }

  /// Pins the start. On a time instant both ends are pinned together.
  pub fn set_start_time_pinned(&mut self, pinned: bool) {
    self.is_start_time_pinned = pinned;
    if self.is_current_instant() {
      self.is_end_time_pinned = pinned;
    }
    self.layout_dirty = true;
  }

  /// Pins the end. On a time instant both ends are pinned together.
  pub fn set_end_time_pinned(&mut self, pinned: bool) {
    self.is_end_time_pinned = pinned;
    if self.is_current_instant() {
      self.is_start_time_pinned = pinned;
    }
    self.layout_dirty = true;
  }

  pub fn set_show_tick_labels(&mut self, show: bool) {
    self.tickbar.set_show_tick_labels(show);
    self.layout_dirty = true;
  }

  #[must_use]
  pub fn show_tick_labels(&self) -> bool {
    self.tickbar.show_tick_labels()
  }

  #[must_use]
  pub fn tickbar(&self) -> &Tickbar {
    &self.tickbar
  }

  /// Registers a callback run on every current extent change.
  pub fn subscribe(
    &mut self,
    listener: impl FnMut(&CurrentExtentChanged) + Send + 'static,
  ) -> ListenerId {
    let id = ListenerId(self.next_listener_id);
    self.next_listener_id += 1;
    self.listeners.push((id, Box::new(listener)));
    id
  }

  /// Removes a callback. Returns whether it was registered.
  pub fn unsubscribe(&mut self, id: ListenerId) -> bool {
    let before = self.listeners.len();
    self.listeners.retain(|(listener_id, _)| *listener_id != id);
    before != self.listeners.len()
  }

  /// Whether state changed since the last [`TimeSlider::arrange`].
  #[must_use]
  pub fn needs_layout(&self) -> bool {
    self.layout_dirty
  }

  fn is_current_instant(&self) -> bool {
    self.current_extent.is_some_and(|e| e.is_time_instant())
  }

  fn install_time_steps(&mut self, steps: Vec<DateTime<Utc>>) {
    self.time_steps = steps;
    debug!("Installed {} time steps", self.time_steps.len());
    self.refresh_tickmarks();
  }

  fn refresh_tickmarks(&mut self) {
    let Some(full) = self.full_extent else {
      return;
    };
    let positions = normalized_positions(&full, &self.time_steps);
    let labels = self.tick_labels();
    self.tickbar.set_tickmarks(positions, labels);
    self.layout_dirty = true;
  }

  /// Sets the current extent and notifies listeners when it differs from
  /// the published one.
  fn publish(&mut self, extent: TimeExtent) -> bool {
    if self.current_extent == Some(extent) {
      return false;
    }
    let change = CurrentExtentChanged {
      old: self.current_extent.replace(extent),
      new: extent,
    };
    debug!("Current extent changed to {extent}");
    self.layout_dirty = true;
    for (_, listener) in &mut self.listeners {
      listener(&change);
    }
    true
  }
}
