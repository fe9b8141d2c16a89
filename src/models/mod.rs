//! Timetabling domain models.
//!
//! | Type | Meaning |
//! |------|---------|
//! | [`Course`] | Catalog entry: one offered section, not yet placed |
//! | [`CourseDay`] | Day pattern: single weekday or weekday pair |
//! | [`TimeSlot`] | Half-open interval on the weekly hour timeline |
//! | [`ScheduledSection`] | A course with a concrete weekly placement |
//! | [`StudentDemand`] | Course identifiers one student asks for |

mod course;
mod day;
mod demand;
mod section;
mod slot;

pub use course::{Course, FixedTime};
pub use day::{CourseDay, HOURS_PER_DAY, WEEKDAYS};
pub use demand::StudentDemand;
pub use section::{format_hour, ScheduledSection};
pub use slot::TimeSlot;
