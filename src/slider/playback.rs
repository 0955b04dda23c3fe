use std::str::FromStr;
use std::time::{Duration, Instant};

use log::debug;
use serde::{Deserialize, Serialize};

use super::TimeSlider;

/// Shortest accepted playback interval.
pub const MIN_PLAYBACK_INTERVAL: Duration = Duration::from_millis(10);

/// What playback does after reaching the last reachable step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum LoopMode {
  /// Stop playing.
  None,
  /// Jump back to the loop start and keep going.
  #[default]
  Repeat,
  /// Turn around.
  Reverse,
}

impl FromStr for LoopMode {
  type Err = String;
  fn from_str(input: &str) -> Result<LoopMode, Self::Err> {
    match input.to_lowercase().as_str() {
      "none" => Ok(LoopMode::None),
      "repeat" => Ok(LoopMode::Repeat),
      "reverse" => Ok(LoopMode::Reverse),
      other => Err(format!("unknown loop mode '{other}'")),
    }
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum PlaybackDirection {
  #[default]
  Forward,
  Backward,
}

impl PlaybackDirection {
  #[must_use]
  pub fn reversed(self) -> Self {
    match self {
      PlaybackDirection::Forward => PlaybackDirection::Backward,
      PlaybackDirection::Backward => PlaybackDirection::Forward,
    }
  }

  fn steps(self) -> isize {
    match self {
      PlaybackDirection::Forward => 1,
      PlaybackDirection::Backward => -1,
    }
  }
}

impl FromStr for PlaybackDirection {
  type Err = String;
  fn from_str(input: &str) -> Result<PlaybackDirection, Self::Err> {
    match input.to_lowercase().as_str() {
      "forward" => Ok(PlaybackDirection::Forward),
      "backward" => Ok(PlaybackDirection::Backward),
      other => Err(format!("unknown playback direction '{other}'")),
    }
  }
}

#[derive(Debug, Clone)]
pub(super) struct PlaybackState {
  is_playing: bool,
  interval: Duration,
  direction: PlaybackDirection,
  loop_mode: LoopMode,
  /// Time the last due tick was accounted for.
  last_tick: Option<Instant>,
}

impl Default for PlaybackState {
  fn default() -> Self {
    Self {
      is_playing: false,
      interval: Duration::from_secs(1),
      direction: PlaybackDirection::default(),
      loop_mode: LoopMode::default(),
      last_tick: None,
    }
  }
}

impl TimeSlider {
  #[must_use]
  pub fn is_playing(&self) -> bool {
    self.playback.is_playing
  }

  /// Starts or stops playback. Stopping is the only cancellation there is.
  pub fn set_playing(&mut self, playing: bool) {
    if self.playback.is_playing != playing {
      debug!("Playback {}", if playing { "started" } else { "stopped" });
    }
    self.playback.is_playing = playing;
    self.playback.last_tick = None;
    self.layout_dirty = true;
  }

  #[must_use]
  pub fn playback_interval(&self) -> Duration {
    self.playback.interval
  }

  /// Sets the time between playback ticks, at least [`MIN_PLAYBACK_INTERVAL`].
  pub fn set_playback_interval(&mut self, interval: Duration) {
    self.playback.interval = interval.max(MIN_PLAYBACK_INTERVAL);
  }

  #[must_use]
  pub fn playback_direction(&self) -> PlaybackDirection {
    self.playback.direction
  }

  pub fn set_playback_direction(&mut self, direction: PlaybackDirection) {
    self.playback.direction = direction;
  }

  #[must_use]
  pub fn loop_mode(&self) -> LoopMode {
    self.playback.loop_mode
  }

  pub fn set_loop_mode(&mut self, mode: LoopMode) {
    self.playback.loop_mode = mode;
  }

  /// One timer callback: moves one step in the playback direction and, at
  /// the end of the reachable range, applies the loop mode. Returns whether
  /// the current extent moved.
  pub fn playback_tick(&mut self) -> bool {
    if !self.playback.is_playing {
      return false;
    }
    let direction = self.playback.direction;
    if self.move_time_step(direction.steps(), self.preserves_span()) {
      return true;
    }

    let moved = match self.playback.loop_mode {
      LoopMode::None => false,
      LoopMode::Repeat => match direction {
        PlaybackDirection::Forward => self.go_to_start(),
        PlaybackDirection::Backward => self.go_to_end(),
      },
      LoopMode::Reverse => {
        let reversed = direction.reversed();
        self.playback.direction = reversed;
        self.move_time_step(reversed.steps(), self.preserves_span())
      }
    };
    if !moved {
      self.set_playing(false);
    }
    moved
  }

  /// Runs every tick that became due since the previous call, for hosts
  /// that drive playback from their frame loop. Returns the number of ticks
  /// run. A long pause runs at most one pass over the time steps.
  pub fn update_playback(&mut self, now: Instant) -> usize {
    if !self.playback.is_playing {
      return 0;
    }
    let Some(last) = self.playback.last_tick else {
      self.playback.last_tick = Some(now);
      return 0;
    };

    let interval = self.playback.interval;
    let due = now.saturating_duration_since(last).as_nanos() / interval.as_nanos();
    let due = usize::try_from(due).unwrap_or(usize::MAX);
    let limit = self.time_steps.len().max(1);
    let mut ran = 0;
    while ran < due.min(limit) && self.playback.is_playing {
      self.playback_tick();
      ran += 1;
    }

    if due > limit {
      self.playback.last_tick = Some(now);
    } else if self.playback.is_playing {
      let elapsed = interval.saturating_mul(u32::try_from(ran).unwrap_or(u32::MAX));
      self.playback.last_tick = Some(last + elapsed);
    }
    ran
  }
}
