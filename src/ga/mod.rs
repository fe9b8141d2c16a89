//! Genetic search over course timetables.
//!
//! # Encoding
//!
//! A [`Timetable`] holds one [`ScheduledSection`](crate::models::ScheduledSection)
//! per catalog course, in catalog order. Operators replace genes but never
//! reorder them, so gene `i` always places course `i`.
//!
//! # Submodules
//!
//! - [`operators`]: the [`GeneticOperator`] trait and the closed [`Operator`] set
//!
//! # Reference
//! - Goldberg (1989), "Genetic Algorithms in Search, Optimization, and Machine Learning"
//! - Grefenstette (1992), "Genetic algorithms for changing environments" (random immigrants)

mod chromosome;
mod mutation;
pub mod operators;
mod population;
mod replacement;
mod search;

pub use chromosome::{Timetable, single_point_crossover};
pub use mutation::{Rerandomize, SharedProbability};
pub use operators::{Crossover, Elite, GeneticOperator, Operator};
pub use population::Population;
pub use replacement::WeakestReplacement;
pub use search::{SearchOutcome, Termination, TimetableSearch};
