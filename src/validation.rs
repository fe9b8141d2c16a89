//! Input validation for timetable search.
//!
//! Checks catalog integrity before the search starts. Detects:
//! - Duplicate sections (same identifier and section number)
//! - Sections without a teacher
//! - Randomly placed sections whose theory credit has no placement table
//! - Unparsable fixed-time specifiers
//!
//! Demanded identifiers missing from the catalog are reported separately;
//! they are not errors, fitness evaluation skips them.

use std::collections::{BTreeSet, HashSet};

use crate::catalog::Catalog;
use crate::config::PlacementTables;
use crate::models::{Course, StudentDemand};

/// Validation result.
pub type ValidationResult = Result<(), Vec<ValidationError>>;

/// A validation error.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationError {
    /// Error category.
    pub kind: ValidationErrorKind,
    /// Human-readable description.
    pub message: String,
}

/// Categories of validation errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationErrorKind {
    /// Two rows share identifier and section number.
    DuplicateSection,
    /// A section has no teacher.
    EmptyTeacher,
    /// No placement table covers the theory credit of a random section.
    UnsupportedCredit,
    /// Fixed-time specifier does not parse.
    InvalidFixedTime,
}

impl ValidationError {
    fn new(kind: ValidationErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

/// Validates a course list against the placement tables.
///
/// # Returns
/// `Ok(())` if all checks pass, `Err(errors)` with all detected issues.
pub fn validate_catalog(courses: &[Course], tables: &PlacementTables) -> ValidationResult {
    let mut errors = Vec::new();
    let mut sections = HashSet::new();

    for course in courses {
        if !sections.insert((course.id.as_str(), course.section)) {
            errors.push(ValidationError::new(
                ValidationErrorKind::DuplicateSection,
                format!("Duplicate section {} of '{}'", course.section, course.id),
            ));
        }

        if course.teacher.trim().is_empty() {
            errors.push(ValidationError::new(
                ValidationErrorKind::EmptyTeacher,
                format!("Section {} of '{}' has no teacher", course.section, course.id),
            ));
        }

        if course.fixed_placement().is_err() {
            errors.push(ValidationError::new(
                ValidationErrorKind::InvalidFixedTime,
                format!(
                    "'{}' has invalid fixed time '{}'",
                    course.id,
                    course.fixed_time.as_deref().unwrap_or_default()
                ),
            ));
        } else if !course.is_fixed() && tables.days_for(course.theory_credit).is_none() {
            errors.push(ValidationError::new(
                ValidationErrorKind::UnsupportedCredit,
                format!(
                    "'{}' has {} theory credits; only 2 and 3 can be placed",
                    course.id, course.theory_credit
                ),
            ));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Demanded identifiers absent from the catalog, sorted and deduplicated.
pub fn unknown_demands(demands: &[StudentDemand], catalog: &Catalog) -> Vec<String> {
    demands
        .iter()
        .flat_map(|d| &d.course_ids)
        .filter(|id| catalog.sections_of(id).is_none())
        .cloned()
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}
