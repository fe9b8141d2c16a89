//! Course catalog entry.
//!
//! A course is the static description of one offered section. Several
//! sections of the same course share an identifier and differ by section
//! number. Entries are parsed once and never mutated.

use serde::{Deserialize, Serialize};

use super::CourseDay;
use crate::error::{Result, TimetableError};

/// One offered section, before any time placement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Course {
    /// Offering identifier, shared by parallel sections of the same course.
    pub id: String,
    /// Year level of the intended students.
    pub year: i32,
    /// Display name.
    pub name: String,
    /// Section number among sections sharing `id`.
    pub section: i32,
    /// Whether the course is mandatory for its year level.
    pub mandatory: bool,
    /// Total credit.
    pub credit: i32,
    /// Theory credit (drives lecture duration).
    pub theory_credit: i32,
    /// Teacher name.
    pub teacher: String,
    /// Fixed-time specifier such as `"BD 1530-1700"`. `None` = randomly placed.
    pub fixed_time: Option<String>,
}

/// A parsed fixed-time specifier: `<DAYCODE> <HHMM>-<HHMM>`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FixedTime {
    /// Day pattern.
    pub day: CourseDay,
    /// Opening time as hour-of-day (minutes as a fraction).
    pub begin: f64,
    /// Closing time as written in the specifier.
    pub end: f64,
}

impl FixedTime {
    /// Parses `"<DAYCODE> <HHMM>-<HHMM>"`.
    pub fn parse(spec: &str) -> Option<Self> {
        let mut tokens = spec.split_whitespace();
        let day = tokens.next()?.parse::<CourseDay>().ok()?;
        let (open, close) = tokens.next()?.split_once('-')?;
        if tokens.next().is_some() {
            return None;
        }
        Some(Self {
            day,
            begin: parse_hhmm(open)?,
            end: parse_hhmm(close)?,
        })
    }
}

fn parse_hhmm(token: &str) -> Option<f64> {
    if token.len() != 4 || !token.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let hour: u32 = token[..2].parse().ok()?;
    let minute: u32 = token[2..].parse().ok()?;
    if hour > 23 || minute > 59 {
        return None;
    }
    Some(hour as f64 + minute as f64 / 60.0)
}

impl Course {
    /// Creates a course with the given identifier and defaults elsewhere.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            year: 1,
            name: String::new(),
            section: 1,
            mandatory: false,
            credit: 3,
            theory_credit: 3,
            teacher: String::new(),
            fixed_time: None,
        }
    }

    /// Sets the display name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Sets the year level.
    pub fn with_year(mut self, year: i32) -> Self {
        self.year = year;
        self
    }

    /// Sets the section number.
    pub fn with_section(mut self, section: i32) -> Self {
        self.section = section;
        self
    }

    /// Marks the course mandatory (or not).
    pub fn with_mandatory(mut self, mandatory: bool) -> Self {
        self.mandatory = mandatory;
        self
    }

    /// Sets total and theory credit.
    pub fn with_credits(mut self, credit: i32, theory_credit: i32) -> Self {
        self.credit = credit;
        self.theory_credit = theory_credit;
        self
    }

    /// Sets the teacher.
    pub fn with_teacher(mut self, teacher: impl Into<String>) -> Self {
        self.teacher = teacher.into();
        self
    }

    /// Sets a fixed-time specifier. An empty string means randomly placed.
    pub fn with_fixed_time(mut self, spec: impl Into<String>) -> Self {
        let spec = spec.into();
        self.fixed_time = if spec.trim().is_empty() {
            None
        } else {
            Some(spec)
        };
        self
    }

    /// Whether this course has a fixed placement.
    #[inline]
    pub fn is_fixed(&self) -> bool {
        self.fixed_time.is_some()
    }

    /// Parses the fixed-time specifier, if any.
    pub fn fixed_placement(&self) -> Result<Option<FixedTime>> {
        match &self.fixed_time {
            None => Ok(None),
            Some(spec) => FixedTime::parse(spec)
                .map(Some)
                .ok_or_else(|| TimetableError::InvalidFixedTime {
                    course_id: self.id.clone(),
                    spec: spec.clone(),
                }),
        }
    }

    /// Lecture length per weekday for a day pattern, from the theory credit.
    ///
    /// - 3 theory credits: 1.5 hours per weekday.
    /// - 2 theory credits: 2 hours per weekday on a paired pattern, 4 hours
    ///   on a single day.
    ///
    /// Returns `None` for any other theory-credit value.
    pub fn hours_per_day(&self, day: CourseDay) -> Option<f64> {
        match self.theory_credit {
            3 => Some(1.5),
            2 if day.is_paired() => Some(2.0),
            2 => Some(4.0),
            _ => None,
        }
    }
}
