//! Timetable fitness.
//!
//! # Score
//!
//! ```text
//! fitness = base - Σ student_penalty / student_count
//! base    = 1.0 if all hard constraints hold, else 0.5
//! ```
//!
//! Higher is better; the maximum is 1.0. The hard-constraint penalty is flat,
//! not proportional to the number of violations.
//!
//! # Student penalty
//!
//! Each demanded identifier that the catalog offers becomes a group: the
//! student's possible sections for that course. The student will land in
//! one section per group; penalties are expectations over all such choices,
//! each combination equally likely.
//!
//! - **Pairwise overlap**: expected fraction of group pairs whose chosen
//!   sections overlap.
//! - **Long days**: expected number of weekdays with at least
//!   [`LONG_DAY_HOURS`] of lectures, divided by [`LONG_DAY_DIVISOR`].
//!
//! # Complexity
//! The long-day expectation enumerates the full Cartesian product of group
//! choices: O(Π |group|) per student. Groups are small (parallel sections of
//! one course, typically ≤ 4), but cost grows exponentially with the number
//! of demanded courses.

use std::sync::Arc;

use crate::catalog::Catalog;
use crate::constraints::ConstraintChecker;
use crate::models::{ScheduledSection, StudentDemand, WEEKDAYS};

/// Fitness deducted when any hard constraint fails.
pub const INVALID_PENALTY: f64 = 0.5;

/// Cumulative lecture hours from which a weekday counts as long.
pub const LONG_DAY_HOURS: f64 = 4.0;

/// Normalizer for the long-day count of one combination.
pub const LONG_DAY_DIVISOR: f64 = 30.0;

/// Scores candidate timetables against hard constraints and student demand.
///
/// Evaluation is deterministic and reads only shared immutable data, so one
/// evaluator can score candidates from several threads.
#[derive(Debug, Clone)]
pub struct FitnessEvaluator {
    catalog: Arc<Catalog>,
    checker: ConstraintChecker,
    demands: Vec<StudentDemand>,
}

impl FitnessEvaluator {
    /// Creates an evaluator for a catalog and the students' demand lists.
    pub fn new(catalog: Arc<Catalog>, demands: Vec<StudentDemand>) -> Self {
        Self {
            checker: ConstraintChecker::new(Arc::clone(&catalog)),
            catalog,
            demands,
        }
    }

    /// Hard-constraint checker used for the base score.
    pub fn checker(&self) -> &ConstraintChecker {
        &self.checker
    }

    /// Catalog the evaluator scores against.
    pub fn catalog(&self) -> &Arc<Catalog> {
        &self.catalog
    }

    /// Demand lists.
    pub fn demands(&self) -> &[StudentDemand] {
        &self.demands
    }

    /// Computes the fitness of a gene sequence in catalog order.
    pub fn evaluate(&self, genes: &[ScheduledSection]) -> f64 {
        let base = if self.checker.is_valid(genes) {
            1.0
        } else {
            1.0 - INVALID_PENALTY
        };
        if self.demands.is_empty() {
            return base;
        }

        let total: f64 = self
            .demands
            .iter()
            .map(|demand| self.student_penalty(genes, demand))
            .sum();
        base - total / self.demands.len() as f64
    }

    /// Pairwise-overlap plus long-day penalty for one student.
    pub fn student_penalty(&self, genes: &[ScheduledSection], demand: &StudentDemand) -> f64 {
        let groups = self.groups(genes, demand);
        let overlap = if groups.len() >= 2 {
            pairwise_overlap_penalty(&groups)
        } else {
            0.0
        };
        overlap + long_day_penalty(&groups)
    }

    /// The student's candidate sections, one group per resolvable identifier.
    ///
    /// Identifiers the catalog does not offer are skipped.
    fn groups<'a>(
        &self,
        genes: &'a [ScheduledSection],
        demand: &StudentDemand,
    ) -> Vec<Vec<&'a ScheduledSection>> {
        demand
            .course_ids
            .iter()
            .filter_map(|id| self.catalog.sections_of(id))
            .map(|indices| indices.iter().map(|&i| &genes[i]).collect())
            .collect()
    }
}

/// Expected fraction of group pairs whose chosen sections overlap.
///
/// With `n1` = number of full combinations and `n2` = number of group pairs,
/// each overlapping section pair `(lhs ∈ g_i, rhs ∈ g_j)` accounts for
/// `n1 / (|g_i|·|g_j|)` combinations. The penalty is the accumulated weight
/// divided by `n1 · n2`.
pub fn pairwise_overlap_penalty(groups: &[Vec<&ScheduledSection>]) -> f64 {
    let n1: f64 = groups.iter().map(|g| g.len() as f64).product();
    let n2 = (groups.len() * groups.len().saturating_sub(1) / 2) as f64;
    if n1 == 0.0 || n2 == 0.0 {
        return 0.0;
    }

    let mut weight = 0.0;
    for (i, gi) in groups.iter().enumerate() {
        for gj in &groups[i + 1..] {
            let per_pair = n1 / (gi.len() * gj.len()) as f64;
            for lhs in gi {
                for rhs in gj {
                    if lhs.overlaps(rhs) {
                        weight += per_pair;
                    }
                }
            }
        }
    }
    weight / (n1 * n2)
}

/// Expected long-day penalty over every combination of group choices.
pub fn long_day_penalty(groups: &[Vec<&ScheduledSection>]) -> f64 {
    expected_long_days(groups, [0.0; WEEKDAYS])
}

/// Picks one section of the first group, recurses on the rest, and averages
/// over the group's size. At the leaf, scores the accumulated day hours.
fn expected_long_days(groups: &[Vec<&ScheduledSection>], hours: [f64; WEEKDAYS]) -> f64 {
    let Some((group, rest)) = groups.split_first() else {
        let long_days = hours.iter().filter(|&&h| h >= LONG_DAY_HOURS).count();
        return long_days as f64 / LONG_DAY_DIVISOR;
    };
    if group.is_empty() {
        return expected_long_days(rest, hours);
    }

    let total: f64 = group
        .iter()
        .map(|section| {
            let mut next = hours;
            for slot in section.slots() {
                if let Some(h) = next.get_mut(slot.weekday()) {
                    *h += slot.duration();
                }
            }
            expected_long_days(rest, next)
        })
        .sum();
    total / group.len() as f64
}
