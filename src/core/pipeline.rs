//! Entry points used by the boundaries that call into the core
//!
//! Create and draft paths normalize leniently; the edit-save path validates
//! year spans strictly first. Both finish with a full recalculation so every
//! derived field is consistent with the courses.

use crate::core::aggregate::{compute_cumulative_stats, recalc_transcript, TermStats};
use crate::core::error::Result;
use crate::core::grading::GradingPolicy;
use crate::core::models::{RawTranscript, TermRecord, Transcript};
use crate::core::normalize::{normalize_strict, normalize_transcript, pad_terms, NormalizeOptions};
use serde::Serialize;

/// Canonical transcript from a raw payload (create / import-draft path)
#[must_use]
pub fn build_transcript(
    raw: &RawTranscript,
    options: &NormalizeOptions,
    policy: &GradingPolicy,
) -> Transcript {
    let transcript = recalc_transcript(&normalize_transcript(raw, options), policy);
    crate::info!(
        "Built transcript for '{}': {} terms, GPA {:.2}, {} credits",
        transcript.student_ref,
        transcript.terms.len(),
        transcript.cumulative_gpa,
        transcript.cumulative_credits
    );
    transcript
}

/// Canonical transcript from an edited payload (edit-save path)
///
/// # Errors
/// Returns [`crate::core::error::TranscriptError::InvalidYearRange`] when an
/// explicit end year is not after its start year.
pub fn save_transcript(
    raw: &RawTranscript,
    options: &NormalizeOptions,
    policy: &GradingPolicy,
) -> Result<Transcript> {
    let normalized = normalize_strict(raw, options)?;
    Ok(recalc_transcript(&normalized, policy))
}

/// Canonical transcript from an untyped JSON payload (create path)
///
/// # Errors
/// Returns [`crate::core::error::TranscriptError::InvalidInputShape`] if the
/// payload is not shaped like a transcript.
pub fn build_transcript_from_json(
    value: serde_json::Value,
    options: &NormalizeOptions,
    policy: &GradingPolicy,
) -> Result<Transcript> {
    let raw = RawTranscript::from_json_value(value)?;
    Ok(build_transcript(&raw, options, policy))
}

/// One displayed term with the running totals through it
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PreviewTerm {
    /// The term (possibly an empty padded slot)
    pub term: TermRecord,
    /// Cumulative statistics through this term
    pub cumulative: TermStats,
}

/// Read-only view of a transcript laid out in fixed term slots
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TranscriptPreview {
    /// Owning student
    pub student_ref: String,
    /// Terms padded to the slot count, each with running totals
    pub terms: Vec<PreviewTerm>,
    /// Overall GPA
    #[serde(rename = "cumulativeGPA")]
    pub cumulative_gpa: f64,
    /// Overall credits
    pub cumulative_credits: f64,
}

/// Preview statistics for a transcript without changing it
///
/// Terms are recalculated, padded to `options.preview_terms` slots, and
/// paired with the cumulative totals through each slot.
#[must_use]
pub fn preview_transcript(
    transcript: &Transcript,
    options: &NormalizeOptions,
    policy: &GradingPolicy,
) -> TranscriptPreview {
    let recalculated = recalc_transcript(transcript, policy);
    let base_grade = recalculated
        .terms
        .first()
        .map_or(options.base_grade_level, |t| t.grade_level);
    let start_year = recalculated
        .terms
        .first()
        .map_or(options.student_start_year, |t| t.start_year);

    let padded = pad_terms(
        &recalculated.terms,
        options.preview_terms,
        base_grade,
        start_year,
    );
    let cumulative = compute_cumulative_stats(&padded);

    TranscriptPreview {
        student_ref: recalculated.student_ref,
        terms: padded
            .into_iter()
            .zip(cumulative)
            .map(|(term, cumulative)| PreviewTerm { term, cumulative })
            .collect(),
        cumulative_gpa: recalculated.cumulative_gpa,
        cumulative_credits: recalculated.cumulative_credits,
    }
}
