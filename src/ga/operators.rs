//! Genetic operators for timetable search.
//!
//! Every operator reads the current population and writes the next one.
//! The evolution loop runs a fixed pipeline once per generation:
//!
//! | Order | Operator | Effect |
//! |-------|----------|--------|
//! | 1 | [`Elite`] | Flags the fittest share of the population as elite |
//! | 2 | [`Crossover`] | Keeps elites, refills with single-point children |
//! | 3 | [`Rerandomize`] | Re-places non-elite genes with a small probability |
//! | 4 | [`WeakestReplacement`] | Swaps the weakest non-elites for random immigrants |
//!
//! The set is closed: [`Operator`] wraps each variant and dispatches the
//! [`GeneticOperator`] calls.

use rand::Rng;

use super::chromosome::single_point_crossover;
use super::mutation::unit_interval;
use super::{Population, Rerandomize, Timetable, WeakestReplacement};
use crate::error::{Result, TimetableError};
use crate::fitness::FitnessEvaluator;

/// A population operator invoked once per generation.
pub trait GeneticOperator {
    /// Operator name for logging.
    fn name(&self) -> &'static str;

    /// Builds `next` from `current`.
    ///
    /// `next` is expected to be an [`Population::empty_like`] copy of
    /// `current`; its capacity bounds how many members the operator makes.
    fn apply<R: Rng>(
        &mut self,
        current: &Population,
        next: &mut Population,
        evaluator: &FitnessEvaluator,
        rng: &mut R,
    ) -> Result<()>;

    /// Fitness evaluations performed by the most recent [`apply`](Self::apply).
    fn evaluations(&self) -> usize;
}

/// Marks the top share of the population as elite.
#[derive(Debug, Clone)]
pub struct Elite {
    percentage: f64,
}

impl Elite {
    /// Creates an elitism operator keeping `percentage` (0–100) of members.
    pub fn new(percentage: f64) -> Self {
        Self {
            percentage: percentage.clamp(0.0, 100.0),
        }
    }

    fn elite_count(&self, size: usize) -> usize {
        ((size as f64 * self.percentage / 100.0).round() as usize).min(size)
    }
}

impl GeneticOperator for Elite {
    fn name(&self) -> &'static str {
        "elite"
    }

    fn apply<R: Rng>(
        &mut self,
        current: &Population,
        next: &mut Population,
        _evaluator: &FitnessEvaluator,
        _rng: &mut R,
    ) -> Result<()> {
        let mut members = current.members().to_vec();
        for m in &mut members {
            m.set_elite(false);
        }
        members.sort_by(|a, b| b.fitness().total_cmp(&a.fitness()));
        let count = self.elite_count(members.len());
        for m in members.iter_mut().take(count) {
            m.set_elite(true);
        }
        next.set_members(members);
        Ok(())
    }

    fn evaluations(&self) -> usize {
        0
    }
}

/// Single-point crossover with tournament parent selection.
///
/// Elites pass through unchanged; the rest of the next population, up to
/// its capacity, is filled with children. A selected pair is recombined
/// with the configured probability and otherwise copied.
#[derive(Debug, Clone)]
pub struct Crossover {
    probability: f64,
    tournament_size: usize,
    evaluations: usize,
}

impl Crossover {
    /// Creates a crossover operator.
    pub fn new(probability: f64, tournament_size: usize) -> Self {
        Self {
            probability: unit_interval(probability),
            tournament_size: tournament_size.max(1),
            evaluations: 0,
        }
    }

    fn select<'a, R: Rng>(&self, members: &'a [Timetable], rng: &mut R) -> &'a Timetable {
        let mut best = &members[rng.random_range(0..members.len())];
        for _ in 1..self.tournament_size {
            let challenger = &members[rng.random_range(0..members.len())];
            if challenger.fitness() > best.fitness() {
                best = challenger;
            }
        }
        best
    }
}

impl GeneticOperator for Crossover {
    fn name(&self) -> &'static str {
        "crossover"
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
        let genes = current.chromosome_len();
        if genes == 0 || current.members().iter().any(|m| m.len() != genes) {
            return Err(TimetableError::InvalidCandidate);
        }

        let target = next.capacity().max(current.len());
        let mut members: Vec<Timetable> = current
            .members()
            .iter()
            .filter(|m| m.is_elite())
            .cloned()
            .collect();

        while members.len() < target {
            let p1 = self.select(current.members(), rng);
            let p2 = self.select(current.members(), rng);

            let (mut c1, mut c2) = if genes >= 2 && rng.random_bool(self.probability) {
                let point = rng.random_range(1..genes);
                single_point_crossover(p1, p2, point)
            } else {
                (p1.clone(), p2.clone())
            };

            for child in [&mut c1, &mut c2] {
                child.set_elite(false);
                if !child.is_evaluated() {
                    child.evaluate(evaluator);
                    self.evaluations += 1;
                }
            }

            members.push(c1);
            if members.len() < target {
                members.push(c2);
            }
        }

        next.set_members(members);
        Ok(())
    }

    fn evaluations(&self) -> usize {
        self.evaluations
    }
}

/// The closed set of operators the evolution loop can run.
#[derive(Debug, Clone)]
pub enum Operator {
    Elite(Elite),
    Crossover(Crossover),
    Rerandomize(Rerandomize),
    Replace(WeakestReplacement),
}

impl GeneticOperator for Operator {
    fn name(&self) -> &'static str {
        match self {
            Operator::Elite(op) => op.name(),
            Operator::Crossover(op) => op.name(),
            Operator::Rerandomize(op) => op.name(),
            Operator::Replace(op) => op.name(),
        }
    }

    fn apply<R: Rng>(
        &mut self,
        current: &Population,
        next: &mut Population,
        evaluator: &FitnessEvaluator,
        rng: &mut R,
    ) -> Result<()> {
        match self {
            Operator::Elite(op) => op.apply(current, next, evaluator, rng),
            Operator::Crossover(op) => op.apply(current, next, evaluator, rng),
            Operator::Rerandomize(op) => op.apply(current, next, evaluator, rng),
            Operator::Replace(op) => op.apply(current, next, evaluator, rng),
        }
    }

    fn evaluations(&self) -> usize {
        match self {
            Operator::Elite(op) => op.evaluations(),
            Operator::Crossover(op) => op.evaluations(),
            Operator::Rerandomize(op) => op.evaluations(),
            Operator::Replace(op) => op.evaluations(),
        }
    }
}
