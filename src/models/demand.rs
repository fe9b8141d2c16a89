//! Student course demand.

use serde::{Deserialize, Serialize};

/// The ordered list of course identifiers one student wants to take.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StudentDemand {
    /// Demanded course identifiers.
    pub course_ids: Vec<String>,
}

impl StudentDemand {
    /// Creates a demand list.
    pub fn new<I, S>(course_ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            course_ids: course_ids.into_iter().map(Into::into).collect(),
        }
    }

    /// Whether the student demands nothing.
    pub fn is_empty(&self) -> bool {
        self.course_ids.is_empty()
    }
}
