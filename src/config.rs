use std::path::{Path, PathBuf};

use dirs::home_dir;
use log::{error, warn};

use crate::slider::{LabelFormats, LoopMode, PlaybackDirection};
use crate::time::TimeValue;

/// Slider defaults, merged from the environment, a JSON file and built-in
/// values in that order of precedence.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Config {
  #[serde(skip)]
  pub config_path: Option<PathBuf>,
  #[serde(default)]
  pub playback_interval_ms: Option<u64>,
  #[serde(default)]
  pub loop_mode: Option<LoopMode>,
  #[serde(default)]
  pub playback_direction: Option<PlaybackDirection>,
  #[serde(default)]
  pub show_tick_labels: Option<bool>,
  #[serde(default)]
  pub time_step_interval: Option<TimeValue>,
  #[serde(default)]
  pub label_formats: Option<LabelFormats>,
}

const DEFAULT_PLAYBACK_INTERVAL_MS: u64 = 1000;
const CONFIG_FILE: &str = "config.json";

impl Config {
  #[must_use]
  pub fn new() -> Self {
    let from_env = Self::from_env();
    let from_file = from_env
      .config_path
      .clone()
      .or_else(default_config_dir)
      .and_then(|dir| Self::from_file(&dir.join(CONFIG_FILE)));

    let mut merged = from_env;
    if let Some(from_file) = &from_file {
      merged = merged.merge(from_file);
    }
    merged.merge(&Self::default())
  }

  fn empty() -> Self {
    Self {
      config_path: None,
      playback_interval_ms: None,
      loop_mode: None,
      playback_direction: None,
      show_tick_labels: None,
      time_step_interval: None,
      label_formats: None,
    }
  }

  fn from_env() -> Self {
    let config_path = std::env::var("TIMESLIDER_CONFIG").ok().map(PathBuf::from);

    let playback_interval_ms = std::env::var("TIMESLIDER_PLAYBACK_INTERVAL_MS")
      .ok()
      .and_then(|v| {
        v.parse::<u64>()
          .inspect_err(|e| warn!("Ignoring TIMESLIDER_PLAYBACK_INTERVAL_MS={v}: {e}"))
          .ok()
      });

    let loop_mode = std::env::var("TIMESLIDER_LOOP_MODE").ok().and_then(|v| {
      v.parse::<LoopMode>()
        .inspect_err(|e| warn!("Ignoring TIMESLIDER_LOOP_MODE: {e}"))
        .ok()
    });

    Self {
      config_path,
      playback_interval_ms,
      loop_mode,
      ..Self::empty()
    }
  }

  /// Reads a JSON config file. Missing or malformed files yield `None`.
  #[must_use]
  pub fn from_file(path: &Path) -> Option<Self> {
    let content = std::fs::read_to_string(path).ok()?;
    serde_json::from_str::<Self>(&content)
      .inspect_err(|e| error!("Failed to read config file {}: {e}", path.display()))
      .ok()
      .map(|config| Self {
        config_path: path.parent().map(Path::to_path_buf),
        ..config
      })
  }

  /// Writes this config as pretty JSON to `path`, creating parent dirs.
  pub fn save(&self, path: &Path) -> anyhow::Result<()> {
    if let Some(parent) = path.parent() {
      std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, serde_json::to_string_pretty(self)?)?;
    Ok(())
  }

  /// Fills every unset value from `other`.
  #[must_use]
  pub fn merge(self, other: &Self) -> Self {
    Self {
      config_path: self.config_path.or(other.config_path.clone()),
      playback_interval_ms: self.playback_interval_ms.or(other.playback_interval_ms),
      loop_mode: self.loop_mode.or(other.loop_mode),
      playback_direction: self.playback_direction.or(other.playback_direction),
      show_tick_labels: self.show_tick_labels.or(other.show_tick_labels),
      time_step_interval: self.time_step_interval.or(other.time_step_interval),
      label_formats: self.label_formats.or(other.label_formats.clone()),
    }
  }
}

fn default_config_dir() -> Option<PathBuf> {
  home_dir().map(|p| p.join(".config").join("timeslider"))
}

impl Default for Config {
  fn default() -> Self {
    Self {
      config_path: default_config_dir(),
      playback_interval_ms: Some(DEFAULT_PLAYBACK_INTERVAL_MS),
      loop_mode: Some(LoopMode::default()),
      playback_direction: Some(PlaybackDirection::default()),
      show_tick_labels: Some(true),
      ..Self::empty()
    }
  }
}
