//! Record normalization
//!
//! Turns raw transcript input into canonical terms: years filled in, course
//! ids unique within each term, grade and weighting text canonicalized. Every
//! function here is a pure transform of its input.

use crate::core::error::{Result, TranscriptError};
use crate::core::models::{
    CourseRecord, Grade, RawCourseRecord, RawTermRecord, RawTranscript, TermRecord, Transcript,
    Weighting,
};
use chrono::Datelike;
use std::collections::{HashMap, HashSet};
use uuid::Uuid;

/// Years at or below this are treated as missing
pub const MIN_PLAUSIBLE_YEAR: i32 = 1900;

/// Years above this are treated as missing
pub const MAX_PLAUSIBLE_YEAR: i32 = 9999;

/// Slot count used by preview layouts when nothing else is configured
pub const DEFAULT_PREVIEW_TERMS: usize = 4;

/// Grade level of the first padded slot when nothing else is configured
pub const DEFAULT_BASE_GRADE_LEVEL: i32 = 9;

/// Inputs that normalization needs from outside the payload
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NormalizeOptions {
    /// Year the student started; used when the payload does not carry one
    pub student_start_year: i32,
    /// Number of term slots preview layouts are padded to
    pub preview_terms: usize,
    /// Grade level assigned to the first slot when padding an empty transcript
    pub base_grade_level: i32,
}

impl Default for NormalizeOptions {
    fn default() -> Self {
        Self {
            student_start_year: chrono::Utc::now().year(),
            preview_terms: DEFAULT_PREVIEW_TERMS,
            base_grade_level: DEFAULT_BASE_GRADE_LEVEL,
        }
    }
}

impl NormalizeOptions {
    /// Options anchored at a specific student start year
    #[must_use]
    pub const fn starting(student_start_year: i32) -> Self {
        Self {
            student_start_year,
            preview_terms: DEFAULT_PREVIEW_TERMS,
            base_grade_level: DEFAULT_BASE_GRADE_LEVEL,
        }
    }
}

/// Start and end year of an academic year
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct YearRange {
    /// First calendar year
    pub start_year: i32,
    /// Last calendar year
    pub end_year: i32,
}

const fn plausible(year: Option<i32>) -> Option<i32> {
    match year {
        Some(y) if y > MIN_PLAUSIBLE_YEAR && y <= MAX_PLAUSIBLE_YEAR => Some(y),
        _ => None,
    }
}

/// Fill in a term's year span
///
/// A plausible start year (1901 to 9999) is kept, otherwise it is
/// `student_start_year + index`. A plausible end year after the start is kept,
/// otherwise it is start + 1. Arithmetic saturates at `i32::MAX`.
#[must_use]
pub fn infer_year_range(term: &RawTermRecord, index: usize, student_start_year: i32) -> YearRange {
    let offset = i32::try_from(index).unwrap_or(i32::MAX);
    let start_year = plausible(term.start_year)
        .unwrap_or_else(|| student_start_year.saturating_add(offset));
    let end_year = plausible(term.end_year)
        .filter(|end| *end > start_year)
        .unwrap_or_else(|| start_year.saturating_add(1));

    YearRange {
        start_year,
        end_year,
    }
}

/// Canonicalize one raw course under the given id
#[must_use]
pub fn canonical_course(raw: &RawCourseRecord, id: String) -> CourseRecord {
    CourseRecord {
        id,
        name: raw.name.clone().unwrap_or_default(),
        grade: raw.grade.as_deref().map(Grade::parse),
        credits: raw.credits,
        weighting: raw.weighting.as_deref().map(Weighting::parse),
    }
}

/// Generate an id not present in `taken`
fn fresh_id(taken: &HashSet<String>) -> String {
    loop {
        let candidate = Uuid::new_v4().to_string();
        if !taken.contains(&candidate) {
            return candidate;
        }
    }
}

/// Collapse courses sharing an id
///
/// The last occurrence of an id wins, but it keeps the position where that
/// id first appeared. Courses without an id get a freshly generated one and
/// are never merged with anything.
#[must_use]
pub fn dedupe_courses(courses: &[RawCourseRecord]) -> Vec<CourseRecord> {
    let mut taken: HashSet<String> = courses.iter().filter_map(|c| c.id.clone()).collect();
    let mut position_by_id: HashMap<String, usize> = HashMap::new();
    let mut result: Vec<CourseRecord> = Vec::with_capacity(courses.len());

    for raw in courses {
        let Some(id) = raw.id.clone() else {
            let id = fresh_id(&taken);
            taken.insert(id.clone());
            result.push(canonical_course(raw, id));
            continue;
        };

        if let Some(&pos) = position_by_id.get(&id) {
            crate::debug!("Collapsing duplicate course id '{id}' at position {pos}");
            result[pos] = canonical_course(raw, id);
        } else {
            position_by_id.insert(id.clone(), result.len());
            result.push(canonical_course(raw, id));
        }
    }

    result
}

/// Canonicalize one raw term at position `index`
#[must_use]
pub fn normalize_term(raw: &RawTermRecord, index: usize, student_start_year: i32) -> TermRecord {
    let years = infer_year_range(raw, index, student_start_year);
    TermRecord {
        grade_level: raw.grade_level,
        start_year: years.start_year,
        end_year: years.end_year,
        courses: dedupe_courses(&raw.courses),
        gpa: raw.gpa.unwrap_or(0.0),
        total_credits: raw.total_credits.unwrap_or(0.0),
    }
}

/// Canonicalize a raw transcript
///
/// Derived fields are carried over untouched; run the aggregation engine
/// afterwards to refresh them. Normalizing an already canonical transcript
/// returns it unchanged.
#[must_use]
pub fn normalize_transcript(raw: &RawTranscript, options: &NormalizeOptions) -> Transcript {
    let start = raw.student_start_year.unwrap_or(options.student_start_year);
    Transcript {
        student_ref: raw.student_ref.clone().unwrap_or_default(),
        terms: raw
            .terms
            .iter()
            .enumerate()
            .map(|(i, term)| normalize_term(term, i, start))
            .collect(),
        cumulative_gpa: raw.cumulative_gpa.unwrap_or(0.0),
        cumulative_credits: raw.cumulative_credits.unwrap_or(0.0),
    }
}

/// Reject explicitly supplied end years that are not after their start year
///
/// The start year compared against is the explicit one if plausible, or the
/// one inference would produce. Terms without an explicit end year pass.
///
/// # Errors
/// Returns [`TranscriptError::InvalidYearRange`] for the first offending term.
pub fn validate_year_ranges(raw: &RawTranscript, options: &NormalizeOptions) -> Result<()> {
    let student_start = raw.student_start_year.unwrap_or(options.student_start_year);

    for (i, term) in raw.terms.iter().enumerate() {
        let Some(end_year) = term.end_year else {
            continue;
        };
        let start_year = infer_year_range(term, i, student_start).start_year;
        if end_year <= start_year {
            return Err(TranscriptError::InvalidYearRange {
                grade_level: term.grade_level,
                start_year,
                end_year,
            });
        }
    }

    Ok(())
}

/// Strict normalization used when saving edits
///
/// # Errors
/// Returns [`TranscriptError::InvalidYearRange`] instead of correcting a bad span.
pub fn normalize_strict(raw: &RawTranscript, options: &NormalizeOptions) -> Result<Transcript> {
    validate_year_ranges(raw, options)?;
    Ok(normalize_transcript(raw, options))
}

/// Append empty terms until there are `target_count`
///
/// Each padded slot continues the sequence from the current length: grade
/// `base_grade_level + len`, start year `student_start_year + len`. Existing
/// terms are never removed or changed.
#[must_use]
pub fn pad_terms(
    terms: &[TermRecord],
    target_count: usize,
    base_grade_level: i32,
    student_start_year: i32,
) -> Vec<TermRecord> {
    let mut padded = terms.to_vec();

    while padded.len() < target_count {
        let offset = i32::try_from(padded.len()).unwrap_or(i32::MAX);
        let start_year = student_start_year.saturating_add(offset);
        padded.push(TermRecord::empty(
            base_grade_level.saturating_add(offset),
            start_year,
            start_year.saturating_add(1),
        ));
    }

    if padded.len() > terms.len() {
        crate::debug!("Padded {} terms to {}", terms.len(), padded.len());
    }
    padded
}
