//! Scheduled section: a course with a concrete weekly placement.
//!
//! # Placement
//!
//! Randomly placed courses draw a day pattern and a start time from
//! [`PlacementTables`]; the lecture length per weekday follows the theory
//! credit (see [`Course::hours_per_day`]). Fixed-time courses take day and
//! start from their specifier. Their end also follows the credit rule; the
//! specifier's closing time is only used when the credit has no rule.
//!
//! A section is never edited in place by the search: operators build a
//! fresh one via [`ScheduledSection::assign`].

use std::sync::Arc;

use rand::prelude::IndexedRandom;
use rand::Rng;

use super::{Course, CourseDay, TimeSlot};
use crate::config::PlacementTables;
use crate::error::{Result, TimetableError};

/// A course placed on the weekly timeline.
#[derive(Debug, Clone)]
pub struct ScheduledSection {
    course: Arc<Course>,
    day: CourseDay,
    begin: f64,
    end: f64,
    /// One slot per weekday of `day`, sorted by start.
    slots: Vec<TimeSlot>,
}

impl ScheduledSection {
    /// Places a course: fixed placement if it has one, random otherwise.
    ///
    /// # Errors
    /// - [`TimetableError::UnsupportedCreditConfiguration`] when a randomly
    ///   placed course has a theory credit with no placement table.
    /// - [`TimetableError::InvalidFixedTime`] for an unparsable specifier.
    pub fn assign<R: Rng>(
        course: Arc<Course>,
        tables: &PlacementTables,
        rng: &mut R,
    ) -> Result<Self> {
        match course.fixed_placement()? {
            Some(fixed) => {
                let end = course
                    .hours_per_day(fixed.day)
                    .map(|hours| fixed.begin + hours)
                    .unwrap_or(fixed.end);
                Ok(Self::placed(course, fixed.day, fixed.begin, end))
            }
            None => {
                let (day, begin, end) = random_placement(&course, tables, rng)?;
                Ok(Self::placed(course, day, begin, end))
            }
        }
    }

    /// Draws a new placement. Fixed-time sections are left unchanged.
    pub fn reassign<R: Rng>(&mut self, tables: &PlacementTables, rng: &mut R) -> Result<()> {
        if self.course.is_fixed() {
            return Ok(());
        }
        let (day, begin, end) = random_placement(&self.course, tables, rng)?;
        *self = Self::placed(Arc::clone(&self.course), day, begin, end);
        Ok(())
    }

    /// Builds a section at an explicit placement (hour-of-day `begin..end`).
    pub fn placed(course: Arc<Course>, day: CourseDay, begin: f64, end: f64) -> Self {
        let slots = day
            .weekdays()
            .iter()
            .map(|&weekday| TimeSlot::on_weekday(weekday, begin, end))
            .collect();
        Self {
            course,
            day,
            begin,
            end,
            slots,
        }
    }

    /// Whether any slot of this section overlaps any slot of `other`.
    ///
    /// # Algorithm
    /// Two-pointer sweep over both start-sorted slot lists: compare the
    /// heads, report an overlap if the later-starting head begins before
    /// the earlier one ends, otherwise advance the earlier-starting list.
    /// O(n + m) in slot counts (at most 2 each).
    pub fn overlaps(&self, other: &ScheduledSection) -> bool {
        let (xs, ys) = (&self.slots, &other.slots);
        let (mut i, mut j) = (0, 0);
        while i < xs.len() && j < ys.len() {
            let (x, y) = (&xs[i], &ys[j]);
            if x.start <= y.start {
                if x.end > y.start {
                    return true;
                }
                i += 1;
            } else {
                if y.end > x.start {
                    return true;
                }
                j += 1;
            }
        }
        false
    }

    /// Catalog entry this section places.
    #[inline]
    pub fn course(&self) -> &Arc<Course> {
        &self.course
    }

    /// Day pattern.
    #[inline]
    pub fn day(&self) -> CourseDay {
        self.day
    }

    /// Start time as hour-of-day.
    #[inline]
    pub fn begin(&self) -> f64 {
        self.begin
    }

    /// End time as hour-of-day.
    #[inline]
    pub fn end(&self) -> f64 {
        self.end
    }

    /// Weekly slots, sorted by start.
    #[inline]
    pub fn slots(&self) -> &[TimeSlot] {
        &self.slots
    }
}

fn random_placement<R: Rng>(
    course: &Course,
    tables: &PlacementTables,
    rng: &mut R,
) -> Result<(CourseDay, f64, f64)> {
    let unsupported = || TimetableError::UnsupportedCreditConfiguration {
        course_id: course.id.clone(),
        theory_credit: course.theory_credit,
    };

    let day = *tables
        .days_for(course.theory_credit)
        .and_then(|days| days.choose(rng))
        .ok_or_else(unsupported)?;
    let begin = *tables.starts.choose(rng).ok_or_else(unsupported)?;
    let hours = course.hours_per_day(day).ok_or_else(unsupported)?;
    Ok((day, begin, begin + hours))
}

/// Formats an hour-of-day as `HH:MM`.
pub fn format_hour(hour: f64) -> String {
    let total_minutes = (hour * 60.0).round() as i64;
    format!("{:02}:{:02}", total_minutes / 60, total_minutes % 60)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    fn course(id: &str, theory: i32) -> Arc<Course> {
        Arc::new(Course::new(id).with_credits(3, theory).with_teacher("T"))
    }

    fn fixed(id: &str, theory: i32, spec: &str) -> Arc<Course> {
        Arc::new(
            Course::new(id)
                .with_credits(3, theory)
                .with_teacher("T")
                .with_fixed_time(spec),
        )
    }

    #[test]
    fn test_random_three_credit_placement() {
        let tables = PlacementTables::default();
        let mut rng = SmallRng::seed_from_u64(42);
        for _ in 0..50 {
            let s = ScheduledSection::assign(course("C3", 3), &tables, &mut rng).unwrap();
            assert!(s.day().is_paired());
            assert!(tables.starts.contains(&s.begin()));
            assert!((s.end() - s.begin() - 1.5).abs() < 1e-10);
            assert_eq!(s.slots().len(), 2);
            assert!(s.slots()[0].start < s.slots()[1].start);
        }
    }

    #[test]
    fn test_random_two_credit_placement() {
        let tables = PlacementTables::default();
        let mut rng = SmallRng::seed_from_u64(42);
        for _ in 0..50 {
            let s = ScheduledSection::assign(course("C2", 2), &tables, &mut rng).unwrap();
            let expected = if s.day().is_paired() { 2.0 } else { 4.0 };
            assert!((s.end() - s.begin() - expected).abs() < 1e-10);
            assert_eq!(s.slots().len(), s.day().weekdays().len());
        }
    }

    #[test]
    fn test_unsupported_credit() {
        let tables = PlacementTables::default();
        let mut rng = SmallRng::seed_from_u64(42);
        let err = ScheduledSection::assign(course("LAB", 1), &tables, &mut rng).unwrap_err();
        assert!(matches!(
            err,
            TimetableError::UnsupportedCreditConfiguration {
                theory_credit: 1,
                ..
            }
        ));
    }

    #[test]
    fn test_fixed_time_end_from_credit() {
        let tables = PlacementTables::default();
        let mut rng = SmallRng::seed_from_u64(42);
        // Closing time in the specifier (12:00) is not authoritative.
        let s = ScheduledSection::assign(fixed("F", 3, "BD 0930-1200"), &tables, &mut rng)
            .unwrap();
        assert_eq!(s.day(), CourseDay::TueThu);
        assert_eq!(
            s.slots(),
            &[TimeSlot::new(33.5, 35.0), TimeSlot::new(81.5, 83.0)]
        );
    }

    #[test]
    fn test_fixed_time_unsupported_credit_uses_specifier_end() {
        let tables = PlacementTables::default();
        let mut rng = SmallRng::seed_from_u64(42);
        let s = ScheduledSection::assign(fixed("LAB", 0, "E 1300-1600"), &tables, &mut rng)
            .unwrap();
        assert_eq!(s.slots(), &[TimeSlot::new(109.0, 112.0)]);
    }

    #[test]
    fn test_fixed_reassign_is_noop() {
        let tables = PlacementTables::default();
        let mut rng = SmallRng::seed_from_u64(42);
        let mut s = ScheduledSection::assign(fixed("F", 2, "C 1400-1800"), &tables, &mut rng)
            .unwrap();
        let before = s.slots().to_vec();
        for _ in 0..20 {
            s.reassign(&tables, &mut rng).unwrap();
            assert_eq!(s.slots(), before.as_slice());
        }
    }

    #[test]
    fn test_overlap_same_clock_different_days() {
        let c = course("A", 3);
        let mw = ScheduledSection::placed(Arc::clone(&c), CourseDay::MonWed, 9.5, 11.0);
        let tt = ScheduledSection::placed(Arc::clone(&c), CourseDay::TueThu, 9.5, 11.0);
        assert!(!mw.overlaps(&tt));
        assert!(!tt.overlaps(&mw));
    }

    #[test]
    fn test_overlap_paired_and_single_day() {
        let mw = ScheduledSection::placed(course("A", 3), CourseDay::MonWed, 9.5, 11.0);
        let mon = ScheduledSection::placed(course("B", 2), CourseDay::Mon, 10.0, 14.0);
        assert!(mw.overlaps(&mon));
        assert!(mon.overlaps(&mw));

        let wed = ScheduledSection::placed(course("B", 2), CourseDay::Wed, 10.0, 14.0);
        assert!(mw.overlaps(&wed));
        assert!(wed.overlaps(&mw));
    }

    #[test]
    fn test_touching_sections_do_not_overlap() {
        let a = ScheduledSection::placed(course("A", 3), CourseDay::MonWed, 9.5, 11.0);
        let b = ScheduledSection::placed(course("B", 3), CourseDay::MonWed, 11.0, 12.5);
        assert!(!a.overlaps(&b));
        assert!(!b.overlaps(&a));
    }

    #[test]
    fn test_overlap_symmetry_random() {
        let tables = PlacementTables::default();
        let mut rng = SmallRng::seed_from_u64(42);
        let sections: Vec<_> = (0..30)
            .map(|i| {
                let theory = if i % 2 == 0 { 2 } else { 3 };
                ScheduledSection::assign(course("X", theory), &tables, &mut rng).unwrap()
            })
            .collect();
        for a in &sections {
            for b in &sections {
                assert_eq!(a.overlaps(b), b.overlaps(a));
            }
        }
    }

    #[test]
    fn test_format_hour() {
        assert_eq!(format_hour(9.5), "09:30");
        assert_eq!(format_hour(17.0), "17:00");
        assert_eq!(format_hour(9.0 + 20.0 / 60.0), "09:20");
    }
}
