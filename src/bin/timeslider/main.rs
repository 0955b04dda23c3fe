use std::time::Duration;

use anyhow::{Context, Result, anyhow};
use chrono::{DateTime, NaiveDate, Utc};
use clap::Parser as CliParser;
use log::info;
use timeslider::config::Config;
use timeslider::slider::{LoopMode, PlaybackDirection};
use timeslider::tickbar::FixedWidthMeasurer;
use timeslider::view::{RecordingView, TrackElement};
use timeslider::{TimeExtent, TimeSlider, TimeValue};

#[derive(clap::Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
  /// Start of the full extent. RFC 3339 or YYYY-MM-DD.
  #[arg(short, long)]
  start: String,

  /// End of the full extent. RFC 3339 or YYYY-MM-DD.
  #[arg(short, long)]
  end: String,

  /// Time step interval, e.g. 1d, 6h, 15min, 1mo.
  #[arg(short, long)]
  interval: Option<String>,

  /// Divide the full extent into this many steps instead of using an interval.
  #[arg(long, conflicts_with = "interval")]
  step_count: Option<usize>,

  /// Initial current extent start. Defaults to the first time step.
  #[arg(long)]
  current_start: Option<String>,

  /// Initial current extent end. Defaults to the current start.
  #[arg(long)]
  current_end: Option<String>,

  #[arg(long)]
  pin_start: bool,

  #[arg(long)]
  pin_end: bool,

  /// Number of playback ticks to run.
  #[arg(short, long, default_value_t = 0)]
  ticks: usize,

  /// What playback does at the end. Values: none, repeat, reverse.
  #[arg(short, long)]
  loop_mode: Option<LoopMode>,

  /// Playback direction. Values: forward, backward.
  #[arg(short, long)]
  direction: Option<PlaybackDirection>,

  /// Wait the playback interval between ticks instead of running them at once.
  #[arg(long)]
  realtime: bool,

  /// Track width used to lay out tick labels.
  #[arg(short, long, default_value_t = 600.0)]
  width: f32,
}

fn parse_time(input: &str) -> Result<DateTime<Utc>> {
  if let Ok(time) = DateTime::parse_from_rfc3339(input) {
    return Ok(time.with_timezone(&Utc));
  }
  NaiveDate::parse_from_str(input, "%Y-%m-%d")
    .with_context(|| format!("Invalid time '{input}'"))?
    .and_hms_opt(0, 0, 0)
    .map(|time| time.and_utc())
    .ok_or_else(|| anyhow!("Invalid time '{input}'"))
}

/// Pins the requested ends and leaves the others alone, since pins on a
/// time instant move together.
fn apply_pins(slider: &mut TimeSlider, pin_start: bool, pin_end: bool) {
  if pin_start {
    slider.set_start_time_pinned(true);
  }
  if pin_end {
    slider.set_end_time_pinned(true);
  }
}

fn print_ticks(slider: &mut TimeSlider, width: f32) {
  let mut view = RecordingView::new(width);
  slider.arrange(&mut view, &FixedWidthMeasurer::default());
  for (i, tick) in slider.tickbar().layout().iter().enumerate() {
    if let (Some(label), Some(bounds)) = (&tick.label, view.bounds(TrackElement::MajorTick(i))) {
      println!("  tick {i:>4} at {:>7.1}px  {label}", bounds.center().x);
    }
  }
}

#[tokio::main]
async fn main() -> Result<()> {
  let args = Args::parse();
  env_logger::init();

  let config = Config::new();
  let mut slider = TimeSlider::with_config(&config);
  if let Some(mode) = args.loop_mode {
    slider.set_loop_mode(mode);
  }
  if let Some(direction) = args.direction {
    slider.set_playback_direction(direction);
  }
  if let Some(interval) = &args.interval {
    slider.set_time_step_interval(interval.parse::<TimeValue>()?)?;
  }

  let full = TimeExtent::new(parse_time(&args.start)?, parse_time(&args.end)?)?;
  slider.set_full_extent(full)?;
  if let Some(count) = args.step_count {
    slider.initialize_time_steps(count)?;
  }

  if let Some(start) = &args.current_start {
    let start = parse_time(start)?;
    let end = args
      .current_end
      .as_deref()
      .map(parse_time)
      .transpose()?
      .unwrap_or(start);
    slider.set_current_extent(TimeExtent::new(start, end)?);
  }
  apply_pins(&mut slider, args.pin_start, args.pin_end);

  slider.subscribe(|change| info!("{:?} -> {}", change.old, change.new));

  println!("full extent: {full}");
  println!("time steps:  {}", slider.time_steps().len());
  if let Some(current) = slider.current_extent() {
    println!("current:     {current}");
  }
  println!("major ticks:");
  print_ticks(&mut slider, args.width);

  if args.ticks == 0 {
    return Ok(());
  }

  slider.set_playing(true);
  let mut timer = tokio::time::interval(if args.realtime {
    slider.playback_interval()
  } else {
    Duration::from_millis(1)
  });
  for tick in 1..=args.ticks {
    timer.tick().await;
    let moved = slider.playback_tick();
    if let Some(current) = slider.current_extent() {
      println!("tick {tick:>4}: {current}{}", if moved { "" } else { " (stopped)" });
    }
    if !slider.is_playing() {
      break;
    }
  }
  Ok(())
}

#[cfg(test)]
mod tests {
  use super::*;
  use rstest::rstest;

  fn slider(current: &str) -> TimeSlider {
    let mut slider = TimeSlider::new();
    slider
      .set_time_step_interval("1d".parse().unwrap())
      .unwrap();
    slider
      .set_full_extent(
        TimeExtent::new(
          parse_time("2020-01-01").unwrap(),
          parse_time("2020-01-11").unwrap(),
        )
        .unwrap(),
      )
      .unwrap();
    slider.set_current_extent(TimeExtent::instant(parse_time(current).unwrap()));
    slider
  }

  #[rstest]
  #[case(true, false)]
  #[case(false, true)]
  #[case(true, true)]
  fn pins_on_instant_survive(#[case] pin_start: bool, #[case] pin_end: bool) {
    let mut slider = slider("2020-01-04");
    apply_pins(&mut slider, pin_start, pin_end);
    assert!(slider.is_start_time_pinned());
    assert!(slider.is_end_time_pinned());
  }

  #[test]
  fn no_pins_requested() {
    let mut slider = slider("2020-01-04");
    apply_pins(&mut slider, false, false);
    assert!(!slider.is_start_time_pinned());
    assert!(!slider.is_end_time_pinned());
  }

  #[test]
  fn parses_dates_and_timestamps() {
    assert_eq!(
      parse_time("2020-01-02").unwrap(),
      parse_time("2020-01-02T00:00:00Z").unwrap()
    );
    assert!(parse_time("yesterday").is_err());
  }
}
