use log::debug;

use super::TimeSlider;
use crate::error::TimeSliderError;
use crate::time::TimeExtent;

impl TimeSlider {
  /// Moves the current extent by `steps` time steps, negative moving back.
  ///
  /// With `preserve_span` both ends must move by exactly `steps`, otherwise
  /// it suffices that one unpinned end can. Instants always preserve span.
  /// Returns `false` and leaves the extent alone when the move is not
  /// possible.
  #[allow(clippy::cast_possible_wrap, clippy::cast_sign_loss)]
  pub fn move_time_step(&mut self, steps: isize, preserve_span: bool) -> bool {
    if steps == 0 {
      return false;
    }
    let Some((start, end)) = self.current_indices() else {
      return false;
    };
    let Some(current) = self.current_extent else {
      return false;
    };
    let (start, end) = (start as isize, end as isize);
    let last = self.time_steps.len() as isize - 1;
    let start_movable = !self.is_start_time_pinned;
    let end_movable = !self.is_end_time_pinned;

    let (new_start, new_end) = if preserve_span || current.is_time_instant() {
      if !(start_movable && end_movable) {
        return false;
      }
      match (start.checked_add(steps), end.checked_add(steps)) {
        (Some(new_start), Some(new_end)) if new_start >= 0 && new_end <= last => {
          (new_start, new_end)
        }
        _ => return false,
      }
    } else {
      // Saturated sums fall short of `steps` and fail the full move check.
      let (new_start, new_end) = if steps > 0 {
        let new_end = if end_movable {
          end.saturating_add(steps).min(last)
        } else {
          end
        };
        let new_start = if start_movable {
          start.saturating_add(steps).min(new_end - 1)
        } else {
          start
        };
        (new_start, new_end)
      } else {
        let new_start = if start_movable {
          start.saturating_add(steps).max(0)
        } else {
          start
        };
        let new_end = if end_movable {
          end.saturating_add(steps).max(new_start + 1)
        } else {
          end
        };
        (new_start, new_end)
      };
      let full_move = (start_movable && new_start - start == steps)
        || (end_movable && new_end - end == steps);
      if !full_move {
        return false;
      }
      (new_start, new_end)
    };

    self.drag.reset();
    self.publish(TimeExtent::ordered(
      self.time_steps[new_start as usize],
      self.time_steps[new_end as usize],
    ))
  }

  /// Steps forward by `count`, keeping the span unless an end is pinned.
  pub fn step_forward(&mut self, count: usize) -> Result<bool, TimeSliderError> {
    let steps = isize::try_from(count)
      .ok()
      .filter(|steps| *steps > 0)
      .ok_or(TimeSliderError::StepCountOutOfRange(count))?;
    Ok(self.move_time_step(steps, self.preserves_span()))
  }

  /// Steps back by `count`, keeping the span unless an end is pinned.
  pub fn step_back(&mut self, count: usize) -> Result<bool, TimeSliderError> {
    let steps = isize::try_from(count)
      .ok()
      .filter(|steps| *steps > 0)
      .ok_or(TimeSliderError::StepCountOutOfRange(count))?;
    Ok(self.move_time_step(-steps, self.preserves_span()))
  }

  /// Moves the current extent as far back as the pins allow: the movable
  /// ends go to the first step, keeping the span in steps when both move.
  pub fn go_to_start(&mut self) -> bool {
    let Some((start, end)) = self.current_indices() else {
      return false;
    };
    let span = end - start;
    let target = match (self.is_start_time_pinned, self.is_end_time_pinned) {
      (false, false) => (0, span),
      (true, false) if span > 0 => (start, start + 1),
      (false, true) => (0, end),
      _ => return false,
    };
    self.jump_to_indices(target)
  }

  /// Moves the current extent as far forward as the pins allow.
  pub fn go_to_end(&mut self) -> bool {
    let Some((start, end)) = self.current_indices() else {
      return false;
    };
    let last = self.time_steps.len() - 1;
    let span = end - start;
    let target = match (self.is_start_time_pinned, self.is_end_time_pinned) {
      (false, false) => (last - span, last),
      (true, false) => (start, last),
      (false, true) if span > 0 => (end - 1, end),
      _ => return false,
    };
    self.jump_to_indices(target)
  }

  /// Span preservation used by the public step and playback operations.
  pub(super) fn preserves_span(&self) -> bool {
    !(self.is_start_time_pinned || self.is_end_time_pinned)
  }

  fn jump_to_indices(&mut self, (start, end): (usize, usize)) -> bool {
    debug!("Jumping to time steps {start}..={end}");
    self.drag.reset();
    self.publish(TimeExtent::ordered(
      self.time_steps[start],
      self.time_steps[end],
    ))
  }

  /// Indices of the current extent's ends within the time steps.
  fn current_indices(&self) -> Option<(usize, usize)> {
    let current = self.current_extent?;
    let start = self.time_steps.binary_search(&current.start()).ok()?;
    let end = self.time_steps.binary_search(&current.end()).ok()?;
    Some((start, end))
  }
}
