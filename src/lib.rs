pub mod config;
pub mod error;
pub mod slider;
pub mod tickbar;
pub mod time;
pub mod view;

pub use error::TimeSliderError;
pub use slider::{CurrentExtentChanged, TimeSlider};
pub use time::{TimeExtent, TimeUnit, TimeValue};
