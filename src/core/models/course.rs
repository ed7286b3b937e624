//! Course model

use super::{Grade, LetterGrade, Weighting};
use serde::{Deserialize, Serialize};

/// A single course on a transcript term
///
/// Grade, credits, and weighting stay optional because drafts may be only
/// partially filled in. A course missing any of them is simply left out of the
/// term's GPA and credit totals.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CourseRecord {
    /// Stable identifier, unique within its term
    pub id: String,

    /// Course title (e.g., "Algebra 1")
    #[serde(default)]
    pub name: String,

    /// Letter grade
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub grade: Option<Grade>,

    /// Credit hours (can be fractional)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub credits: Option<f64>,

    /// Course weighting category
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weighting: Option<Weighting>,
}

impl CourseRecord {
    /// Create a fully graded course
    ///
    /// # Arguments
    /// * `id` - Identifier unique within the term
    /// * `name` - Course title
    /// * `grade` - Letter grade
    /// * `credits` - Credit hours
    /// * `weighting` - Weighting category
    #[must_use]
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        grade: LetterGrade,
        credits: f64,
        weighting: Weighting,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            grade: Some(Grade::Letter(grade)),
            credits: Some(credits),
            weighting: Some(weighting),
        }
    }

    /// Create a course with only an id and name (nothing graded yet)
    #[must_use]
    pub fn ungraded(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            grade: None,
            credits: None,
            weighting: None,
        }
    }

    /// Credits usable for aggregation: present, finite, and non-negative
    #[must_use]
    pub fn countable_credits(&self) -> Option<f64> {
        self.credits.filter(|c| c.is_finite() && *c >= 0.0)
    }
}
