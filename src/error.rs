//! Error types for timetable search.

use thiserror::Error;

/// Crate-wide result alias.
pub type Result<T> = std::result::Result<T, TimetableError>;

/// Errors raised while placing sections, running operators, or loading input.
#[derive(Error, Debug)]
pub enum TimetableError {
    /// No placement table covers this theory-credit value.
    #[error("course '{course_id}': no placement table for {theory_credit} theory credits")]
    UnsupportedCreditConfiguration {
        course_id: String,
        theory_credit: i32,
    },

    /// Fixed-time specifier is not of the form `<DAY> <HHMM>-<HHMM>`.
    #[error("course '{course_id}': invalid fixed time '{spec}'")]
    InvalidFixedTime { course_id: String, spec: String },

    /// A candidate reached an operator without a usable gene sequence.
    #[error("candidate has no gene sequence")]
    InvalidCandidate,

    #[error("population is empty")]
    EmptyPopulation,

    /// The next population cannot hold the requested replacements.
    #[error("next population holds {capacity} candidates, {required} replacements requested")]
    InsufficientCapacity { required: usize, capacity: usize },

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// An input row could not be parsed.
    #[error("line {line}: {reason}")]
    MalformedRow { line: u64, reason: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Csv(#[from] csv::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}
