//! Stepped cursor movement.
//!
//! Some applications ignore a cursor that teleports. [`SlowCursor`] wraps
//! another cursor and breaks each move into steps of at most `max_step`
//! pixels per axis, pausing `tick` between steps. Clicks and button events
//! pass straight through, after any move already issued has finished.

use crate::platform::CursorControl;
use std::thread;
use std::time::Duration;

/// Intermediate positions from `from` to `to`, ending at `to`.
///
/// Each axis advances by at most `max_step` per step; an axis that has
/// arrived stays put while the other catches up. Empty when already there.
pub fn plan_path(from: (i32, i32), to: (i32, i32), max_step: u32) -> Vec<(i32, i32)> {
    let step = i64::from(max_step.max(1));
    let mut path = Vec::new();
    let mut current = from;
    while current != to {
        current = (
            step_toward(current.0, to.0, step),
            step_toward(current.1, to.1, step),
        );
        path.push(current);
    }
    path
}

fn step_toward(from: i32, to: i32, step: i64) -> i32 {
    let delta = (i64::from(to) - i64::from(from)).clamp(-step, step);
    // Lands between `from` and `to`, so it fits
    (i64::from(from) + delta) as i32
}

pub struct SlowCursor<C> {
    inner: C,
    max_step: u32,
    tick: Duration,
}

impl<C: CursorControl> SlowCursor<C> {
    pub fn new(inner: C, max_step: u32, tick: Duration) -> Self {
        Self {
            inner,
            max_step,
            tick,
        }
    }
}

impl<C: CursorControl> CursorControl for SlowCursor<C> {
    fn position(&self) -> (i32, i32) {
        self.inner.position()
    }

    fn move_cursor(&mut self, x: i32, y: i32) {
        let path = plan_path(self.inner.position(), (x, y), self.max_step);
        crate::debug_trace!("CURSOR", "Slow move to ({}, {}) in {} steps", x, y, path.len());
        let last = path.len().saturating_sub(1);
        for (i, (px, py)) in path.into_iter().enumerate() {
            self.inner.move_cursor(px, py);
            if i < last && !self.tick.is_zero() {
                thread::sleep(self.tick);
            }
        }
    }

    fn click(&mut self, hold: Duration) {
        self.inner.click(hold);
    }

    fn press(&mut self) {
        self.inner.press();
    }

    fn release(&mut self) {
        self.inner.release();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::fake::{CursorEvent, RecordingCursor};

    #[test]
    fn test_plan_path_clamps_each_axis() {
        assert_eq!(
            plan_path((0, 0), (450, 100), 200),
            vec![(200, 100), (400, 100), (450, 100)]
        );
        assert_eq!(plan_path((10, 10), (0, -5), 4), vec![(6, 6), (2, 2), (0, -2), (0, -5)]);
    }

    #[test]
    fn test_plan_path_already_there() {
        assert!(plan_path((5, 5), (5, 5), 10).is_empty());
    }

    #[test]
    fn test_plan_path_zero_step_still_arrives() {
        assert_eq!(plan_path((0, 0), (2, 0), 0), vec![(1, 0), (2, 0)]);
    }

    #[test]
    fn test_plan_path_extreme_coordinates() {
        assert_eq!(
            plan_path((i32::MIN, i32::MAX), (i32::MAX, i32::MIN), u32::MAX),
            vec![(i32::MAX, i32::MIN)]
        );
        assert_eq!(
            plan_path((i32::MIN, 0), (i32::MAX, 0), 1 << 31),
            vec![(0, 0), (i32::MAX, 0)]
        );
    }

    #[test]
    fn test_slow_cursor_moves_then_clicks() {
        let recorder = RecordingCursor::at(0, 0);
        let mut cursor = SlowCursor::new(recorder.clone(), 100, Duration::ZERO);

        cursor.move_cursor(250, 0);
        cursor.click(Duration::from_micros(1));

        assert_eq!(
            recorder.events(),
            vec![
                CursorEvent::Move(100, 0),
                CursorEvent::Move(200, 0),
                CursorEvent::Move(250, 0),
                CursorEvent::Click,
            ]
        );
        assert_eq!(cursor.position(), (250, 0));
    }
}
