//! Hard-constraint checking for candidate timetables.
//!
//! A candidate is valid iff:
//! 1. **Teacher non-overlap**: no two sections of one teacher overlap.
//! 2. **Mandatory-year non-overlap**: within a year level, no pair with at
//!    least one mandatory member overlaps, unless both are parallel
//!    sections of the same course.
//! 3. **Day coverage**: every mandatory course with two or more sections
//!    uses both paired patterns (Monday+Wednesday and Tuesday+Thursday).
//!
//! Checks run against the catalog's index maps; gene `i` of a candidate
//! must place catalog course `i`.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::catalog::Catalog;
use crate::models::{CourseDay, ScheduledSection};

/// Which hard constraint a violation breaks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ViolationType {
    /// Two sections of one teacher overlap.
    TeacherConflict,
    /// A mandatory section overlaps another course of the same year.
    MandatoryConflict,
    /// A mandatory multi-section course misses a paired day pattern.
    DayCoverage,
}

/// A hard-constraint violation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Violation {
    /// Type of violation.
    pub violation_type: ViolationType,
    /// Related entity (teacher, year level, or course identifier).
    pub entity_id: String,
    /// Human-readable description.
    pub message: String,
}

/// Evaluates hard constraints against a catalog's index maps.
#[derive(Debug, Clone)]
pub struct ConstraintChecker {
    catalog: Arc<Catalog>,
}

impl ConstraintChecker {
    /// Creates a checker for a catalog.
    pub fn new(catalog: Arc<Catalog>) -> Self {
        Self { catalog }
    }

    /// Whether all hard constraints hold. Stops at the first violation.
    pub fn is_valid(&self, genes: &[ScheduledSection]) -> bool {
        self.scan(genes, true).is_empty()
    }

    /// Lists every hard-constraint violation.
    pub fn violations(&self, genes: &[ScheduledSection]) -> Vec<Violation> {
        self.scan(genes, false)
    }

    /// Whether `candidate` conflicts with any already placed section.
    ///
    /// Used while building a candidate gene by gene: `placed` holds genes
    /// `0..placed.len()`, `candidate` is the next one. Covers the pairwise
    /// rules (teacher, mandatory year); day coverage needs whole groups.
    /// Two sections fixed at the same specifier form one session and never
    /// conflict.
    pub fn conflicts_with(&self, placed: &[ScheduledSection], candidate: &ScheduledSection) -> bool {
        let course = candidate.course();
        placed.iter().any(|other| {
            let o = other.course();
            if course.is_fixed() && o.fixed_time == course.fixed_time {
                return false;
            }
            let same_teacher = o.teacher == course.teacher;
            let year_clash = o.year == course.year
                && (o.mandatory || course.mandatory)
                && o.id != course.id;
            (same_teacher || year_clash) && other.overlaps(candidate)
        })
    }

    fn scan(&self, genes: &[ScheduledSection], first_only: bool) -> Vec<Violation> {
        let maps = self.catalog.maps();
        let mut found = Vec::new();

        for (teacher, indices) in &maps.by_teacher {
            for (a, b) in pairs(indices) {
                if genes[a].overlaps(&genes[b]) {
                    found.push(Violation {
                        violation_type: ViolationType::TeacherConflict,
                        entity_id: teacher.clone(),
                        message: format!(
                            "{} overlaps {}",
                            describe(&genes[a]),
                            describe(&genes[b])
                        ),
                    });
                    if first_only {
                        return found;
                    }
                }
            }
        }

        for (year, indices) in &maps.by_year {
            for (a, b) in pairs(indices) {
                let (ca, cb) = (genes[a].course(), genes[b].course());
                if !(ca.mandatory || cb.mandatory) || ca.id == cb.id {
                    continue;
                }
                if genes[a].overlaps(&genes[b]) {
                    found.push(Violation {
                        violation_type: ViolationType::MandatoryConflict,
                        entity_id: year.to_string(),
                        message: format!(
                            "{} overlaps {}",
                            describe(&genes[a]),
                            describe(&genes[b])
                        ),
                    });
                    if first_only {
                        return found;
                    }
                }
            }
        }

        for (course_id, indices) in &maps.by_course {
            if indices.len() < 2 || !indices.iter().any(|&i| genes[i].course().mandatory) {
                continue;
            }
            let missing: Vec<CourseDay> = CourseDay::PAIRED
                .into_iter()
                .filter(|day| !indices.iter().any(|&i| genes[i].day() == *day))
                .collect();
            if !missing.is_empty() {
                let codes: Vec<&str> = missing.iter().map(|d| d.code()).collect();
                found.push(Violation {
                    violation_type: ViolationType::DayCoverage,
                    entity_id: course_id.clone(),
                    message: format!("no section on {}", codes.join(", ")),
                });
                if first_only {
                    return found;
                }
            }
        }

        found
    }
}

fn pairs(indices: &[usize]) -> impl Iterator<Item = (usize, usize)> + '_ {
    indices
        .iter()
        .enumerate()
        .flat_map(move |(k, &a)| indices[k + 1..].iter().map(move |&b| (a, b)))
}

fn describe(section: &ScheduledSection) -> String {
    let c = section.course();
    format!("{}-{} ({})", c.id, c.section, section.day())
}
