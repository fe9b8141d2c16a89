//! Course timetabling by genetic search.
//!
//! Places every offered course section on a weekly timeline so that no
//! teacher is double-booked, mandatory courses of a year level never
//! clash, and parallel sections of a mandatory course cover both paired
//! day patterns, while minimizing the conflicts students face for the
//! course combinations they request.
//!
//! # Modules
//!
//! - **`models`**: Domain types: `Course`, `CourseDay`, `TimeSlot`,
//!   `ScheduledSection`, `StudentDemand`
//! - **`catalog`**: Gene order and teacher / year / course index maps
//! - **`constraints`**: Hard-constraint validity checker
//! - **`fitness`**: Student-demand fitness with the long-day expectation
//! - **`ga`**: Candidate timetables, population, operators, search loop
//! - **`config`**: Search parameters and placement tables
//! - **`loader`**: Tab-delimited catalog and demand readers
//! - **`validation`**: Input integrity checks
//! - **`report`**: Generation statistics and the run log
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use rand::SeedableRng;
//! use rand::rngs::SmallRng;
//! use u_timetable::{Catalog, SearchConfig, TimetableSearch, loader};
//!
//! let courses = loader::read_catalog_file("courses.tsv")?;
//! let demands = loader::read_demands_file("demands.tsv")?;
//! let catalog = Arc::new(Catalog::new(courses));
//! let mut search = TimetableSearch::new(SearchConfig::default(), catalog, demands)?;
//! let outcome = search.run(&mut SmallRng::seed_from_u64(42), &mut ())?;
//! println!("best fitness {}", outcome.best.fitness());
//! # Ok::<(), u_timetable::TimetableError>(())
//! ```
//!
//! # References
//!
//! - Burke & Petrovic (2002), "Recent research directions in automated timetabling"
//! - Goldberg (1989), "Genetic Algorithms in Search, Optimization, and Machine Learning"

pub mod catalog;
pub mod config;
pub mod constraints;
pub mod error;
pub mod fitness;
pub mod ga;
pub mod loader;
pub mod models;
pub mod report;
pub mod validation;

pub use catalog::Catalog;
pub use config::{PlacementTables, SearchConfig};
pub use constraints::ConstraintChecker;
pub use error::{Result, TimetableError};
pub use fitness::FitnessEvaluator;
pub use ga::{SearchOutcome, Timetable, TimetableSearch};
