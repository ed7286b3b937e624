//! Error types for the transcript core
//!
//! Only two conditions are hard failures. Degraded course data (missing or
//! unrecognized grade, credits, or weighting) is never an error: it is left out
//! of the aggregation instead, so partially entered drafts always produce
//! statistics.

use thiserror::Error;

/// Errors surfaced by core transcript operations
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TranscriptError {
    /// The input is not the expected collection or record shape
    #[error("Invalid input shape at '{path}': expected {expected}")]
    InvalidInputShape {
        /// Location of the offending value (e.g. `terms[2].courses`)
        path: String,
        /// What was expected at that location
        expected: String,
    },

    /// An explicitly supplied year span ends on or before it starts
    #[error("Invalid year range for grade {grade_level}: {start_year}-{end_year} (end year must be after start year)")]
    InvalidYearRange {
        /// Grade level of the offending term
        grade_level: i32,
        /// Supplied start year
        start_year: i32,
        /// Supplied end year
        end_year: i32,
    },
}

impl TranscriptError {
    /// Shorthand for an [`TranscriptError::InvalidInputShape`]
    pub fn shape(path: impl Into<String>, expected: impl Into<String>) -> Self {
        Self::InvalidInputShape {
            path: path.into(),
            expected: expected.into(),
        }
    }
}

/// Convenience Result type for core operations
pub type Result<T> = std::result::Result<T, TranscriptError>;
