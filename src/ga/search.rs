//! Generation loop for timetable search.
//!
//! # Algorithm
//!
//! 1. Build the initial population gene by gene, re-placing clashing genes
//!    up to `init_repair_attempts` times, and evaluate it.
//! 2. Per generation run the operator pipeline
//!    Elite → Crossover → Rerandomize → WeakestReplacement, each reading the
//!    previous operator's output.
//! 3. Evaluate members left without cached fitness, report statistics to
//!    the observer, then test [`Termination`].
//!
//! Generations are strictly sequential. Only fitness evaluation inside one
//! generation runs in parallel.

use std::sync::Arc;

use rand::Rng;
use tracing::{debug, info};

use super::{
    Crossover, Elite, GeneticOperator, Operator, Population, Rerandomize, SharedProbability,
    Timetable, WeakestReplacement,
};
use crate::catalog::Catalog;
use crate::config::SearchConfig;
use crate::error::{Result, TimetableError};
use crate::fitness::FitnessEvaluator;
use crate::models::StudentDemand;
use crate::report::{GenerationStats, SearchObserver};

/// Stop condition evaluated once per generation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Termination {
    /// Generation ceiling.
    pub max_generations: usize,
    /// Stop once the fittest member reaches this value.
    pub target_fitness: Option<f64>,
}

impl Termination {
    /// Reads the generation ceiling and target fitness from a configuration.
    pub fn from_config(config: &SearchConfig) -> Self {
        Self {
            max_generations: config.max_generations,
            target_fitness: config.target_fitness,
        }
    }

    /// Whether the run should stop after `generation`.
    pub fn should_terminate(&self, population: &Population, generation: usize, _evaluations: usize) -> bool {
        if generation >= self.max_generations {
            return true;
        }
        match (self.target_fitness, population.fittest()) {
            (Some(target), Some(best)) => best.fitness() >= target,
            _ => false,
        }
    }
}

/// Result of a search run.
#[derive(Debug, Clone)]
pub struct SearchOutcome {
    /// Fittest timetable seen during the run.
    pub best: Timetable,
    /// Generations completed (0 if the initial population already met the target).
    pub generations: usize,
    /// Total fitness evaluations.
    pub evaluations: usize,
    /// Statistics per generation, starting with the initial population.
    pub history: Vec<GenerationStats>,
}

/// Genetic search over timetables for one catalog and demand set.
#[derive(Debug)]
pub struct TimetableSearch {
    config: SearchConfig,
    catalog: Arc<Catalog>,
    evaluator: FitnessEvaluator,
    pipeline: Vec<Operator>,
    termination: Termination,
    mutation: SharedProbability,
}

impl TimetableSearch {
    /// Creates a search. Fails on an invalid configuration or empty catalog.
    pub fn new(config: SearchConfig, catalog: Arc<Catalog>, demands: Vec<StudentDemand>) -> Result<Self> {
        config.validate()?;
        if catalog.is_empty() {
            return Err(TimetableError::InvalidConfig("catalog has no courses".into()));
        }

        let evaluator = FitnessEvaluator::new(Arc::clone(&catalog), demands);
        let pipeline = Self::standard_pipeline(&config, &catalog);
        let mutation = pipeline
            .iter()
            .find_map(|op| match op {
                Operator::Rerandomize(r) => Some(r.probability()),
                _ => None,
            })
            .unwrap_or_else(|| SharedProbability::new(config.mutation_probability));

        Ok(Self {
            termination: Termination::from_config(&config),
            config,
            catalog,
            evaluator,
            pipeline,
            mutation,
        })
    }

    /// Operators in per-generation order.
    pub fn standard_pipeline(config: &SearchConfig, catalog: &Arc<Catalog>) -> Vec<Operator> {
        vec![
            Operator::Elite(Elite::new(config.elitism_percentage)),
            Operator::Crossover(Crossover::new(
                config.crossover_probability,
                config.tournament_size,
            )),
            Operator::Rerandomize(Rerandomize::new(
                config.mutation_probability,
                config.placement.clone(),
            )),
            Operator::Replace(WeakestReplacement::new(
                config.replacement_percentage,
                Arc::clone(catalog),
                config.placement.clone(),
            )),
        ]
    }

    /// Configuration the search runs with.
    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    /// Fitness evaluator shared by all operators.
    pub fn evaluator(&self) -> &FitnessEvaluator {
        &self.evaluator
    }

    /// Handle to the live mutation probability; may be changed between generations.
    pub fn mutation_probability(&self) -> SharedProbability {
        self.mutation.clone()
    }

    /// Builds and evaluates the initial population.
    pub fn initial_population<R: Rng>(&self, rng: &mut R) -> Result<Population> {
        let size = self.config.population_size;
        let mut population = Population::new(size);
        for _ in 0..size {
            population.push(Timetable::random_repaired(
                &self.catalog,
                &self.config.placement,
                self.evaluator.checker(),
                self.config.init_repair_attempts,
                rng,
            )?);
        }
        population.evaluate_pending(&self.evaluator, self.config.parallel);
        Ok(population)
    }

    /// Runs the pipeline once. Returns the next population and the number
    /// of fitness evaluations performed.
    pub fn step<R: Rng>(&mut self, current: &Population, rng: &mut R) -> Result<(Population, usize)> {
        let mut evaluations = 0;
        let mut population = current.clone();

        for op in &mut self.pipeline {
            let mut next = population.empty_like();
            op.apply(&population, &mut next, &self.evaluator, rng)?;
            evaluations += op.evaluations();
            debug!(
                operator = op.name(),
                members = next.len(),
                evaluations = op.evaluations(),
                "operator applied"
            );
            population = next;
        }

        evaluations += population.evaluate_pending(&self.evaluator, self.config.parallel);
        Ok((population, evaluations))
    }

    /// Runs until the termination predicate holds.
    pub fn run<R: Rng>(&mut self, rng: &mut R, observer: &mut dyn SearchObserver) -> Result<SearchOutcome> {
        info!(
            courses = self.catalog.len(),
            students = self.evaluator.demands().len(),
            population = self.config.population_size,
            max_generations = self.config.max_generations,
            "search started"
        );

        let mut population = self.initial_population(rng)?;
        let mut evaluations = population.len();
        let mut best = population
            .fittest()
            .cloned()
            .ok_or(TimetableError::EmptyPopulation)?;
        let mut history = Vec::new();
        let mut generation = 0;

        loop {
            let stats = GenerationStats::from_population(generation, &population, evaluations);
            info!(
                generation,
                fittest = stats.fittest,
                mean = stats.mean,
                median = stats.median,
                "generation complete"
            );
            observer.on_generation(&stats)?;
            history.push(stats);

            if let Some(fittest) = population.fittest() {
                if fittest.fitness() > best.fitness() {
                    best = fittest.clone();
                }
            }

            if self
                .termination
                .should_terminate(&population, generation, evaluations)
            {
                break;
            }

            let (next, performed) = self.step(&population, rng)?;
            population = next;
            evaluations += performed;
            generation += 1;
        }

        best.set_elite(false);
        let outcome = SearchOutcome {
            best,
            generations: generation,
            evaluations,
            history,
        };
        info!(
            generations = outcome.generations,
            evaluations = outcome.evaluations,
            fittest = outcome.best.fitness(),
            "search finished"
        );
        observer.on_complete(&outcome, self.evaluator.checker())?;
        Ok(outcome)
    }
}
