//! Weekly time slots.
//!
//! # Time Model
//! Hours on a continuous weekly timeline: Monday 00:00 = 0.0, and each
//! calendar day adds 24 (Tuesday 00:00 = 24.0, Wednesday 00:00 = 48.0, ...).
//! Monday+Wednesday 9:30-11:00 is therefore `[9.5, 11.0)` and `[57.5, 59.0)`.

use serde::{Deserialize, Serialize};

use super::day::HOURS_PER_DAY;

/// A half-open interval [start, end) on the weekly timeline, in hours.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TimeSlot {
    /// Interval start (hours, inclusive).
    pub start: f64,
    /// Interval end (hours, exclusive).
    pub end: f64,
}

impl TimeSlot {
    /// Creates a new slot.
    pub fn new(start: f64, end: f64) -> Self {
        Self { start, end }
    }

    /// Creates a slot on `weekday` (Monday = 0) from hours-of-day.
    pub fn on_weekday(weekday: usize, begin: f64, end: f64) -> Self {
        let offset = weekday as f64 * HOURS_PER_DAY;
        Self::new(offset + begin, offset + end)
    }

    /// Length in hours.
    #[inline]
    pub fn duration(&self) -> f64 {
        self.end - self.start
    }

    /// Weekday number (Monday = 0) the slot starts on.
    #[inline]
    pub fn weekday(&self) -> usize {
        (self.start / HOURS_PER_DAY).floor() as usize
    }

    /// Whether two slots overlap. Touching endpoints do not overlap.
    #[inline]
    pub fn overlaps(&self, other: &Self) -> bool {
        self.start < other.end && other.start < self.end
    }
}
