//! Search configuration.
//!
//! [`SearchConfig`] holds every parameter of a run: population shape,
//! operator rates, termination thresholds, and the placement tables used
//! for random section placement. It is loaded once and passed by reference
//! to the components that need it.
//!
//! # Defaults
//!
//! ```
//! use u_timetable::config::SearchConfig;
//!
//! let config = SearchConfig::default();
//! assert_eq!(config.population_size, 200);
//! assert_eq!(config.elitism_percentage, 5.0);
//! assert!(config.validate().is_ok());
//! ```

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{Result, TimetableError};
use crate::models::CourseDay;

/// Candidate start times and day patterns for random placement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlacementTables {
    /// Start times (hour-of-day) shared by 2- and 3-theory-credit courses.
    pub starts: Vec<f64>,
    /// Day patterns allowed for 3-theory-credit courses. Paired patterns only.
    pub three_credit_days: Vec<CourseDay>,
    /// Day patterns allowed for 2-theory-credit courses.
    pub two_credit_days: Vec<CourseDay>,
}

impl Default for PlacementTables {
    fn default() -> Self {
        Self {
            starts: vec![9.5, 11.0, 14.0, 15.5, 17.0],
            three_credit_days: vec![CourseDay::MonWed, CourseDay::TueThu],
            two_credit_days: vec![
                CourseDay::Mon,
                CourseDay::Tue,
                CourseDay::Wed,
                CourseDay::Thu,
                CourseDay::Fri,
                CourseDay::MonWed,
                CourseDay::TueThu,
            ],
        }
    }
}

impl PlacementTables {
    /// Day patterns available for a theory-credit value, if any table covers it.
    pub fn days_for(&self, theory_credit: i32) -> Option<&[CourseDay]> {
        match theory_credit {
            3 => Some(&self.three_credit_days),
            2 => Some(&self.two_credit_days),
            _ => None,
        }
    }
}

/// Configuration for a timetable search run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Number of candidate timetables per generation.
    pub population_size: usize,
    /// Share of the population kept as elites (0–100).
    pub elitism_percentage: f64,
    /// Probability of recombining a selected parent pair (0.0–1.0).
    pub crossover_probability: f64,
    /// Per-gene re-randomization probability (0.0–1.0).
    pub mutation_probability: f64,
    /// Share of non-elites replaced by fresh random candidates (0–100).
    pub replacement_percentage: f64,
    /// Tournament size for parent selection.
    pub tournament_size: usize,
    /// Generation ceiling.
    pub max_generations: usize,
    /// Stop as soon as the fittest candidate reaches this fitness.
    pub target_fitness: Option<f64>,
    /// Placement retries per gene when building the initial population.
    ///
    /// Retries stop once the gene no longer conflicts with already placed
    /// sections of the same teacher or mandatory year. 0 disables repair.
    pub init_repair_attempts: usize,
    /// Evaluate pending fitness values in parallel using rayon.
    pub parallel: bool,
    /// Random seed. `None` draws one from the thread RNG.
    pub seed: Option<u64>,
    /// Random placement tables.
    pub placement: PlacementTables,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            population_size: 200,
            elitism_percentage: 5.0,
            crossover_probability: 0.8,
            mutation_probability: 0.002,
            replacement_percentage: 10.0,
            tournament_size: 3,
            max_generations: 1000,
            target_fitness: None,
            init_repair_attempts: 10,
            parallel: true,
            seed: None,
            placement: PlacementTables::default(),
        }
    }
}

impl SearchConfig {
    /// Loads a configuration from a JSON file. Missing fields take defaults.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        let config: SearchConfig = serde_json::from_str(&text)?;
        config.validate()?;
        Ok(config)
    }

    /// Sets the population size.
    pub fn with_population_size(mut self, n: usize) -> Self {
        self.population_size = n;
        self
    }

    /// Sets the elitism percentage.
    pub fn with_elitism_percentage(mut self, pct: f64) -> Self {
        self.elitism_percentage = pct.clamp(0.0, 100.0);
        self
    }

    /// Sets the crossover probability.
    pub fn with_crossover_probability(mut self, p: f64) -> Self {
        self.crossover_probability = p.clamp(0.0, 1.0);
        self
    }

    /// Sets the per-gene mutation probability.
    pub fn with_mutation_probability(mut self, p: f64) -> Self {
        self.mutation_probability = p.clamp(0.0, 1.0);
        self
    }

    /// Sets the replacement percentage.
    pub fn with_replacement_percentage(mut self, pct: f64) -> Self {
        self.replacement_percentage = pct.clamp(0.0, 100.0);
        self
    }

    /// Sets the tournament size.
    pub fn with_tournament_size(mut self, k: usize) -> Self {
        self.tournament_size = k;
        self
    }

    /// Sets the generation ceiling.
    pub fn with_max_generations(mut self, n: usize) -> Self {
        self.max_generations = n;
        self
    }

    /// Sets the fitness threshold.
    pub fn with_target_fitness(mut self, fitness: f64) -> Self {
        self.target_fitness = Some(fitness);
        self
    }

    /// Sets initial-population repair attempts.
    pub fn with_init_repair_attempts(mut self, attempts: usize) -> Self {
        self.init_repair_attempts = attempts;
        self
    }

    /// Enables or disables parallel evaluation.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Sets the random seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Sets the placement tables.
    pub fn with_placement(mut self, placement: PlacementTables) -> Self {
        self.placement = placement;
        self
    }

    /// Number of elites for a population of `size`.
    pub fn elite_count(&self, size: usize) -> usize {
        ((size as f64 * self.elitism_percentage / 100.0).round() as usize).min(size)
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<()> {
        let fail = |msg: &str| Err(TimetableError::InvalidConfig(msg.into()));

        if self.population_size < 2 {
            return fail("population_size must be at least 2");
        }
        if self.max_generations == 0 {
            return fail("max_generations must be at least 1");
        }
        if !(0.0..=100.0).contains(&self.elitism_percentage) {
            return fail("elitism_percentage must be within 0..=100");
        }
        if !(0.0..=100.0).contains(&self.replacement_percentage) {
            return fail("replacement_percentage must be within 0..=100");
        }
        if !(0.0..=1.0).contains(&self.crossover_probability) {
            return fail("crossover_probability must be within 0..=1");
        }
        if !(0.0..=1.0).contains(&self.mutation_probability) {
            return fail("mutation_probability must be within 0..=1");
        }
        if self.tournament_size == 0 {
            return fail("tournament_size must be at least 1");
        }
        if self.elite_count(self.population_size) >= self.population_size {
            return fail("elitism_percentage too high: elites fill entire population");
        }
        if self.placement.starts.is_empty() {
            return fail("placement.starts must not be empty");
        }
        if self.placement.three_credit_days.is_empty() || self.placement.two_credit_days.is_empty()
        {
            return fail("placement day tables must not be empty");
        }
        if self
            .placement
            .three_credit_days
            .iter()
            .any(|d| !d.is_paired())
        {
            return fail("placement.three_credit_days accepts paired patterns only");
        }
        Ok(())
    }
}
