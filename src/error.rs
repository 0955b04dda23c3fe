use thiserror::Error;

/// Errors for caller mistakes. Boundary conditions during stepping, dragging
/// and playback are not errors, they are rejected with `false` or ignored.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TimeSliderError {
  #[error("Start time {start} is after end time {end}.")]
  InvalidExtent { start: String, end: String },
  #[error("Step count must be positive, got {0}.")]
  StepCountOutOfRange(usize),
  #[error("Time step interval must be non-zero.")]
  ZeroInterval,
  #[error("Time step interval yields more than {0} time steps.")]
  TooManyTimeSteps(usize),
  #[error("No full extent set.")]
  NoFullExtent,
  #[error("Failed to parse time value: {0}")]
  ParseTimeValue(String),
}
