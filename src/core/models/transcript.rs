//! Transcript model

use super::TermRecord;
use serde::{Deserialize, Serialize};

/// A student's full academic record in canonical (normalized) form
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transcript {
    /// Identifier of the owning student (opaque to the core)
    #[serde(default)]
    pub student_ref: String,

    /// Terms in ascending grade-level order
    #[serde(default)]
    pub terms: Vec<TermRecord>,

    /// GPA across all terms, re-weighted from the term GPAs
    #[serde(rename = "cumulativeGPA", default)]
    pub cumulative_gpa: f64,

    /// Credits across all terms
    #[serde(default)]
    pub cumulative_credits: f64,
}

impl Transcript {
    /// Create a transcript with no terms
    #[must_use]
    pub fn new(student_ref: impl Into<String>) -> Self {
        Self {
            student_ref: student_ref.into(),
            terms: Vec::new(),
            cumulative_gpa: 0.0,
            cumulative_credits: 0.0,
        }
    }

    /// Number of terms
    #[must_use]
    pub fn term_count(&self) -> usize {
        self.terms.len()
    }

    /// Total number of courses across all terms
    #[must_use]
    pub fn course_count(&self) -> usize {
        self.terms.iter().map(|t| t.courses.len()).sum()
    }
}
