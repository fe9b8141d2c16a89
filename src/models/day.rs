//! Day patterns.
//!
//! A section recurs either on one weekday or on a fixed weekday pair.
//! Codes follow the catalog file convention: `A`..`E` for Monday..Friday,
//! `AC` for Monday+Wednesday, `BD` for Tuesday+Thursday.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Number of teaching weekdays (Monday..Friday).
pub const WEEKDAYS: usize = 5;

/// Hours per calendar day on the weekly timeline.
pub const HOURS_PER_DAY: f64 = 24.0;

/// Weekday or weekday pair on which a section recurs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum CourseDay {
    #[serde(rename = "A")]
    Mon,
    #[serde(rename = "B")]
    Tue,
    #[serde(rename = "C")]
    Wed,
    #[serde(rename = "D")]
    Thu,
    #[serde(rename = "E")]
    Fri,
    #[serde(rename = "AC")]
    MonWed,
    #[serde(rename = "BD")]
    TueThu,
}

impl CourseDay {
    /// The two paired patterns every mandatory multi-section course must cover.
    pub const PAIRED: [CourseDay; 2] = [CourseDay::MonWed, CourseDay::TueThu];

    /// Weekday numbers (Monday = 0) this pattern occupies, in ascending order.
    pub fn weekdays(self) -> &'static [usize] {
        match self {
            CourseDay::Mon => &[0],
            CourseDay::Tue => &[1],
            CourseDay::Wed => &[2],
            CourseDay::Thu => &[3],
            CourseDay::Fri => &[4],
            CourseDay::MonWed => &[0, 2],
            CourseDay::TueThu => &[1, 3],
        }
    }

    /// Whether this pattern spans two weekdays.
    #[inline]
    pub fn is_paired(self) -> bool {
        matches!(self, CourseDay::MonWed | CourseDay::TueThu)
    }

    /// Catalog file code.
    pub fn code(self) -> &'static str {
        match self {
            CourseDay::Mon => "A",
            CourseDay::Tue => "B",
            CourseDay::Wed => "C",
            CourseDay::Thu => "D",
            CourseDay::Fri => "E",
            CourseDay::MonWed => "AC",
            CourseDay::TueThu => "BD",
        }
    }
}

impl fmt::Display for CourseDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for CourseDay {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "A" => Ok(CourseDay::Mon),
            "B" => Ok(CourseDay::Tue),
            "C" => Ok(CourseDay::Wed),
            "D" => Ok(CourseDay::Thu),
            "E" => Ok(CourseDay::Fri),
            "AC" => Ok(CourseDay::MonWed),
            "BD" => Ok(CourseDay::TueThu),
            other => Err(format!("unknown day code '{other}'")),
        }
    }
}
