//! Candidate timetable chromosome.
//!
//! # Encoding
//!
//! One gene per catalog course, in catalog order: gene `i` is the
//! [`ScheduledSection`] placing course `i`. The index is the join key used
//! by every constraint and grouping lookup, so operators replace genes
//! wholesale and never reorder them.

use std::sync::Arc;

use rand::Rng;

use crate::catalog::Catalog;
use crate::config::PlacementTables;
use crate::constraints::ConstraintChecker;
use crate::error::Result;
use crate::fitness::FitnessEvaluator;
use crate::models::ScheduledSection;

/// A full timetable candidate.
///
/// Higher fitness = better timetable (maximum 1.0). The cached fitness is
/// cleared whenever a gene changes.
#[derive(Debug, Clone)]
pub struct Timetable {
    genes: Vec<ScheduledSection>,
    fitness: Option<f64>,
    elite: bool,
}

impl Timetable {
    /// Wraps an existing gene sequence (unevaluated, not elite).
    pub fn from_genes(genes: Vec<ScheduledSection>) -> Self {
        Self {
            genes,
            fitness: None,
            elite: false,
        }
    }

    /// Creates a timetable with every gene placed independently.
    pub fn random<R: Rng>(catalog: &Catalog, tables: &PlacementTables, rng: &mut R) -> Result<Self> {
        let genes = catalog
            .courses()
            .iter()
            .map(|course| ScheduledSection::assign(Arc::clone(course), tables, rng))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self::from_genes(genes))
    }

    /// Creates a timetable gene by gene, re-placing each gene up to
    /// `attempts` times while it clashes with a section placed before it
    /// (same teacher, or mandatory course of the same year).
    ///
    /// Fixed-time genes are never re-placed. Day coverage is not repaired.
    pub fn random_repaired<R: Rng>(
        catalog: &Catalog,
        tables: &PlacementTables,
        checker: &ConstraintChecker,
        attempts: usize,
        rng: &mut R,
    ) -> Result<Self> {
        let mut genes: Vec<ScheduledSection> = Vec::with_capacity(catalog.len());
        for course in catalog.courses() {
            let mut section = ScheduledSection::assign(Arc::clone(course), tables, rng)?;
            if !course.is_fixed() {
                for _ in 0..attempts {
                    if !checker.conflicts_with(&genes, &section) {
                        break;
                    }
                    section.reassign(tables, rng)?;
                }
            }
            genes.push(section);
        }
        Ok(Self::from_genes(genes))
    }

    /// Gene sequence in catalog order.
    #[inline]
    pub fn genes(&self) -> &[ScheduledSection] {
        &self.genes
    }

    /// Replaces one gene and clears the cached fitness.
    ///
    /// Returns `false` if `index` is out of range.
    pub fn set_gene(&mut self, index: usize, section: ScheduledSection) -> bool {
        match self.genes.get_mut(index) {
            Some(slot) => {
                *slot = section;
                self.fitness = None;
                true
            }
            None => false,
        }
    }

    /// Number of genes.
    #[inline]
    pub fn len(&self) -> usize {
        self.genes.len()
    }

    /// Whether the gene sequence is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.genes.is_empty()
    }

    /// Cached fitness, or negative infinity if not yet evaluated.
    #[inline]
    pub fn fitness(&self) -> f64 {
        self.fitness.unwrap_or(f64::NEG_INFINITY)
    }

    /// Whether a fitness value is cached.
    #[inline]
    pub fn is_evaluated(&self) -> bool {
        self.fitness.is_some()
    }

    /// Computes and caches fitness.
    pub fn evaluate(&mut self, evaluator: &FitnessEvaluator) -> f64 {
        let fitness = evaluator.evaluate(&self.genes);
        self.fitness = Some(fitness);
        fitness
    }

    /// Whether this candidate is protected in the current generation.
    #[inline]
    pub fn is_elite(&self) -> bool {
        self.elite
    }

    /// Sets the elite flag.
    #[inline]
    pub fn set_elite(&mut self, elite: bool) {
        self.elite = elite;
    }
}

/// Single-point crossover: genes `..point` from `p1`, `point..` from `p2`,
/// and the mirror child. Both children are unevaluated and not elite.
pub fn single_point_crossover(p1: &Timetable, p2: &Timetable, point: usize) -> (Timetable, Timetable) {
    let point = point.min(p1.len()).min(p2.len());
    let child = |a: &Timetable, b: &Timetable| {
        let genes = a.genes[..point]
            .iter()
            .chain(&b.genes[point..])
            .cloned()
            .collect();
        Timetable::from_genes(genes)
    };
    (child(p1, p2), child(p2, p1))
}
