//! Weakest-replacement (random immigrants).
//!
//! Copies the current population into the next, sorts it (elites first,
//! then descending fitness), drops the `k` weakest non-elites and appends
//! `k` freshly randomized, evaluated candidates, where
//!
//! ```text
//! k = min(round(non_elites · percentage / 100), non_elites)
//! ```
//!
//! Immigrants are appended, not sorted in; no constraint repair is tried.

use std::sync::Arc;

use rand::Rng;
use tracing::debug;

use super::{GeneticOperator, Population, Timetable};
use crate::catalog::Catalog;
use crate::config::PlacementTables;
use crate::error::{Result, TimetableError};
use crate::fitness::FitnessEvaluator;

/// Replaces the weakest non-elite candidates with random ones.
#[derive(Debug, Clone)]
pub struct WeakestReplacement {
    percentage: f64,
    catalog: Arc<Catalog>,
    tables: PlacementTables,
    evaluations: usize,
}

impl WeakestReplacement {
    /// Creates the operator replacing `percentage` (0–100) of non-elites.
    pub fn new(percentage: f64, catalog: Arc<Catalog>, tables: PlacementTables) -> Self {
        Self {
            percentage: percentage.clamp(0.0, 100.0),
            catalog,
            tables,
            evaluations: 0,
        }
    }

    /// Number of candidates replaced for a given non-elite count.
    pub fn replacement_count(&self, non_elites: usize) -> usize {
        ((non_elites as f64 * self.percentage / 100.0).round() as usize).min(non_elites)
    }
}

impl GeneticOperator for WeakestReplacement {
    fn name(&self) -> &'static str {
        "replace"
    }

    fn apply<R: Rng>(
        &mut self,
        current: &Population,
        next: &mut Population,
        evaluator: &FitnessEvaluator,
        rng: &mut R,
    ) -> Result<()> {
        self.evaluations = 0;
        if current.is_empty() {
            return Err(TimetableError::EmptyPopulation);
        }

        next.set_members(current.members().to_vec());
        next.sort_by_fitness();

        let k = self.replacement_count(next.non_elite_count());
        if k == 0 {
            return Ok(());
        }
        if next.capacity() < k {
            return Err(TimetableError::InsufficientCapacity {
                required: k,
                capacity: next.capacity(),
            });
        }

        let keep = next.len() - k;
        next.members_mut().truncate(keep);

        for _ in 0..k {
            let mut immigrant = Timetable::random(&self.catalog, &self.tables, rng)?;
            immigrant.evaluate(evaluator);
            self.evaluations += 1;
            next.push(immigrant);
        }
        debug!(replaced = k, "random immigrants added");
        Ok(())
    }

    fn evaluations(&self) -> usize {
        self.evaluations
    }
}
