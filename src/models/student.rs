use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Per-student rollup of a document set. Derived on every read, never stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentAggregate {
    pub id: String,
    pub name: String,
    pub roll_no: String,
    pub course: String,
    pub year: String,
    pub total_points: u64,
    pub documents_count: usize,
}

/// A student aggregate with its position in a merit list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RankedEntry {
    #[serde(flatten)]
    pub student: StudentAggregate,
    pub rank: usize,
}

/// Ranked entries plus the moment they were computed.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MeritList {
    pub merit_list: Vec<RankedEntry>,
    pub generated_at: DateTime<Utc>,
}

/// Optional restrictions applied to aggregates before ranking.
///
/// `course` and `year` match exactly. `student_ids`, when present, keeps
/// only the listed students.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MeritFilter {
    pub course: Option<String>,
    pub year: Option<String>,
    pub student_ids: Option<Vec<String>>,
}

impl MeritFilter {
    /// Build a filter, treating blank strings as "no filter".
    pub fn new(course: Option<String>, year: Option<String>) -> Self {
        Self {
            course: course.filter(|c| !c.is_empty()),
            year: year.filter(|y| !y.is_empty()),
            student_ids: None,
        }
    }

    pub fn with_student_ids(mut self, ids: Option<Vec<String>>) -> Self {
        self.student_ids = ids;
        self
    }

    pub fn matches(&self, student: &StudentAggregate) -> bool {
        if let Some(course) = &self.course {
            if &student.course != course {
                return false;
            }
        }
        if let Some(year) = &self.year {
            if &student.year != year {
                return false;
            }
        }
        if let Some(ids) = &self.student_ids {
            if !ids.iter().any(|id| id == &student.id) {
                return false;
            }
        }
        true
    }
}
