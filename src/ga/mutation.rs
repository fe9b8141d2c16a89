//! Targeted re-randomization (mutation).
//!
//! Every gene of every non-elite candidate is re-placed with probability
//! `p`, drawing a fresh placement exactly as population initialization
//! does. Fixed-time genes keep their placement. Each mutated candidate is
//! re-evaluated; elites are copied through untouched.
//!
//! # Shared probability
//! The probability lives in a [`SharedProbability`] cell so it can be tuned
//! from another thread between generations. One `apply` reads it once and
//! uses that snapshot throughout.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use rand::Rng;

use super::{GeneticOperator, Population};
use crate::config::PlacementTables;
use crate::error::{Result, TimetableError};
use crate::fitness::FitnessEvaluator;

/// A probability shared between the search and its controller.
///
/// Stores the `f64` bit pattern in an atomic, so reads and writes are
/// single consistent snapshots without a lock.
#[derive(Debug, Clone)]
pub struct SharedProbability(Arc<AtomicU64>);

impl SharedProbability {
    /// Creates a cell holding `p`, clamped to 0.0–1.0. NaN is stored as 0.0.
    pub fn new(p: f64) -> Self {
        Self(Arc::new(AtomicU64::new(unit_interval(p).to_bits())))
    }

    /// Current value.
    pub fn get(&self) -> f64 {
        f64::from_bits(self.0.load(Ordering::Acquire))
    }

    /// Replaces the value, clamped to 0.0–1.0. NaN is stored as 0.0.
    pub fn set(&self, p: f64) {
        self.0.store(unit_interval(p).to_bits(), Ordering::Release);
    }
}

/// Clamps a probability to 0.0–1.0, mapping NaN to 0.0.
pub(crate) fn unit_interval(p: f64) -> f64 {
    if p.is_nan() {
        0.0
    } else {
        p.clamp(0.0, 1.0)
    }
}

/// Per-gene re-randomization of non-elite candidates.
#[derive(Debug, Clone)]
pub struct Rerandomize {
    probability: SharedProbability,
    tables: PlacementTables,
    evaluations: usize,
}

impl Rerandomize {
    /// Creates the operator with a per-gene probability.
    pub fn new(probability: f64, tables: PlacementTables) -> Self {
        Self {
            probability: SharedProbability::new(probability),
            tables,
            evaluations: 0,
        }
    }

    /// Handle to the probability cell; clones share the value.
    pub fn probability(&self) -> SharedProbability {
        self.probability.clone()
    }
}

impl GeneticOperator for Rerandomize {
    fn name(&self) -> &'static str {
        "rerandomize"
    }

    fn apply<R: Rng>(
        &mut self,
        current: &Population,
        next: &mut Population,
        evaluator: &FitnessEvaluator,
        rng: &mut R,
    ) -> Result<()> {
        self.evaluations = 0;
        let p = self.probability.get();
        let genes = evaluator.catalog().len();
        let mut members = current.members().to_vec();

        for candidate in members.iter_mut().filter(|m| !m.is_elite()) {
            if candidate.is_empty() || candidate.len() != genes {
                return Err(TimetableError::InvalidCandidate);
            }
            for index in 0..candidate.len() {
                if rng.random_bool(p) {
                    let mut gene = candidate.genes()[index].clone();
                    gene.reassign(&self.tables, rng)?;
                    candidate.set_gene(index, gene);
                }
            }
            candidate.evaluate(evaluator);
            self.evaluations += 1;
        }

        next.set_members(members);
        Ok(())
    }

    fn evaluations(&self) -> usize {
        self.evaluations
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Catalog;
    use crate::ga::Timetable;
    use crate::models::{Course, CourseDay, ScheduledSection, StudentDemand};
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    fn setup(size: usize) -> (Arc<Catalog>, FitnessEvaluator, Population) {
        let catalog = Arc::new(Catalog::new(vec![
            Course::new("A").with_teacher("Kim"),
            Course::new("B").with_teacher("Lee").with_credits(3, 2),
            Course::new("F").with_teacher("Park").with_fixed_time("BD 1400-1530"),
        ]));
        let evaluator = FitnessEvaluator::new(
            Arc::clone(&catalog),
            vec![StudentDemand::new(["A", "B", "F"])],
        );
        let mut rng = SmallRng::seed_from_u64(42);
        let members = (0..size)
            .map(|_| {
                let mut t = Timetable::random(&catalog, &PlacementTables::default(), &mut rng).unwrap();
                t.evaluate(&evaluator);
                t
            })
            .collect();
        (catalog, evaluator, Population::from_members(members))
    }

    fn placements(t: &Timetable) -> Vec<(String, f64)> {
        t.genes()
            .iter()
            .map(|g| (g.day().to_string(), g.begin()))
            .collect()
    }

    #[test]
    fn test_shared_probability() {
        let p = SharedProbability::new(0.25);
        let handle = p.clone();
        handle.set(0.5);
        assert!((p.get() - 0.5).abs() < 1e-10);
        handle.set(4.0);
        assert!((p.get() - 1.0).abs() < 1e-10);
        handle.set(f64::NAN);
        assert!((p.get() - 0.0).abs() < 1e-10);
        assert!((SharedProbability::new(f64::NAN).get() - 0.0).abs() < 1e-10);
    }

    #[test]
    fn test_nan_probability_does_not_mutate() {
        let (_, evaluator, pop) = setup(10);
        let mut rng = SmallRng::seed_from_u64(9);
        let mut op = Rerandomize::new(1.0, PlacementTables::default());
        op.probability().set(f64::NAN);
        let mut next = pop.empty_like();
        op.apply(&pop, &mut next, &evaluator, &mut rng).unwrap();
        for (a, b) in pop.members().iter().zip(next.members()) {
            assert_eq!(placements(a), placements(b));
        }
    }

    #[test]
    fn test_short_candidate_rejected() {
        let (catalog, evaluator, _) = setup(1);
        let gene = ScheduledSection::placed(
            Arc::clone(&catalog.courses()[0]),
            CourseDay::TueThu,
            14.0,
            15.5,
        );
        let pop = Population::from_members(vec![Timetable::from_genes(vec![gene])]);
        let mut rng = SmallRng::seed_from_u64(9);
        let mut next = pop.empty_like();
        let err = Rerandomize::new(0.0, PlacementTables::default())
            .apply(&pop, &mut next, &evaluator, &mut rng)
            .unwrap_err();
        assert!(matches!(err, TimetableError::InvalidCandidate));
    }

    #[test]
    fn test_zero_probability_keeps_genes() {
        let (_, evaluator, pop) = setup(10);
        let mut rng = SmallRng::seed_from_u64(9);
        let mut op = Rerandomize::new(0.0, PlacementTables::default());
        let mut next = pop.empty_like();
        op.apply(&pop, &mut next, &evaluator, &mut rng).unwrap();

        assert_eq!(next.len(), 10);
        for (a, b) in pop.members().iter().zip(next.members()) {
            assert_eq!(placements(a), placements(b));
            assert_eq!(a.fitness().to_bits(), b.fitness().to_bits());
        }
        assert_eq!(op.evaluations(), 10);
    }

    #[test]
    fn test_elites_untouched() {
        let (_, evaluator, mut pop) = setup(30);
        for m in pop.members_mut().iter_mut().take(5) {
            m.set_elite(true);
        }
        let mut rng = SmallRng::seed_from_u64(9);
        let mut op = Rerandomize::new(1.0, PlacementTables::default());
        let mut next = pop.empty_like();
        op.apply(&pop, &mut next, &evaluator, &mut rng).unwrap();

        for (a, b) in pop.members().iter().zip(next.members()).take(5) {
            assert!(b.is_elite());
            assert_eq!(placements(a), placements(b));
        }
        assert_eq!(op.evaluations(), 25);

        // With p = 1 some non-elite must have moved.
        let moved = pop
            .members()
            .iter()
            .zip(next.members())
            .skip(5)
            .any(|(a, b)| placements(a) != placements(b));
        assert!(moved);
    }

    #[test]
    fn test_fixed_genes_never_move() {
        let (_, evaluator, pop) = setup(10);
        let mut rng = SmallRng::seed_from_u64(9);
        let mut op = Rerandomize::new(1.0, PlacementTables::default());
        let mut next = pop.empty_like();
        op.apply(&pop, &mut next, &evaluator, &mut rng).unwrap();
        // Fixed-time course sorts to index 0.
        for m in next.members() {
            assert_eq!(m.genes()[0].day().to_string(), "BD");
            assert!((m.genes()[0].begin() - 14.0).abs() < 1e-10);
        }
    }

    #[test]
    fn test_probability_handle_tunes_operator() {
        let (_, evaluator, pop) = setup(10);
        let mut rng = SmallRng::seed_from_u64(9);
        let mut op = Rerandomize::new(1.0, PlacementTables::default());
        op.probability().set(0.0);
        let mut next = pop.empty_like();
        op.apply(&pop, &mut next, &evaluator, &mut rng).unwrap();
        for (a, b) in pop.members().iter().zip(next.members()) {
            assert_eq!(placements(a), placements(b));
        }
    }

    #[test]
    fn test_empty_candidate_rejected() {
        let (_, evaluator, _) = setup(1);
        let pop = Population::from_members(vec![Timetable::from_genes(vec![])]);
        let mut rng = SmallRng::seed_from_u64(9);
        let mut next = pop.empty_like();
        let err = Rerandomize::new(0.5, PlacementTables::default())
            .apply(&pop, &mut next, &evaluator, &mut rng)
            .unwrap_err();
        assert!(matches!(err, TimetableError::InvalidCandidate));
    }
}
