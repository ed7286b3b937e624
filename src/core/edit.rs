//! Transcript edit operations
//!
//! Each operation takes a transcript snapshot and returns a new one; the input
//! is never modified. Touched terms are recalculated and the cumulative fields
//! refreshed before returning, so derived numbers always match the courses.

use crate::core::aggregate::{recalc_term, with_cumulative};
use crate::core::error::{Result, TranscriptError};
use crate::core::grading::GradingPolicy;
use crate::core::models::{CourseRecord, Grade, LetterGrade, TermRecord, Transcript, Weighting};
use uuid::Uuid;

/// Credits given to a newly added blank course
pub const NEW_COURSE_CREDITS: f64 = 0.5;

/// Partial update for a course; `None` leaves a field as it is
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CoursePatch {
    /// New title
    pub name: Option<String>,
    /// New grade
    pub grade: Option<Grade>,
    /// New credits
    pub credits: Option<f64>,
    /// New weighting
    pub weighting: Option<Weighting>,
}

impl CoursePatch {
    fn apply(&self, course: &CourseRecord) -> CourseRecord {
        CourseRecord {
            id: course.id.clone(),
            name: self.name.clone().unwrap_or_else(|| course.name.clone()),
            grade: self.grade.clone().or_else(|| course.grade.clone()),
            credits: self.credits.or(course.credits),
            weighting: self.weighting.clone().or_else(|| course.weighting.clone()),
        }
    }
}

fn term_at(transcript: &Transcript, term_index: usize) -> Result<&TermRecord> {
    transcript.terms.get(term_index).ok_or_else(|| {
        TranscriptError::shape(
            format!("terms[{term_index}]"),
            format!("an existing term (transcript has {})", transcript.terms.len()),
        )
    })
}

fn course_position(term: &TermRecord, term_index: usize, course_id: &str) -> Result<usize> {
    term.course_position(course_id).ok_or_else(|| {
        TranscriptError::shape(
            format!("terms[{term_index}].courses"),
            format!("a course with id '{course_id}'"),
        )
    })
}

/// Replace the courses of the terms in `changes`, recalculating each and the totals
fn with_courses(
    transcript: &Transcript,
    changes: Vec<(usize, Vec<CourseRecord>)>,
    policy: &GradingPolicy,
) -> Transcript {
    let mut terms = transcript.terms.clone();
    for (index, courses) in changes {
        let updated = TermRecord {
            courses,
            ..terms[index].clone()
        };
        terms[index] = recalc_term(&updated, policy);
    }
    with_cumulative(Transcript {
        terms,
        ..transcript.clone()
    })
}

fn unused_id(term: &TermRecord) -> String {
    loop {
        let candidate = Uuid::new_v4().to_string();
        if term.course_position(&candidate).is_none() {
            return candidate;
        }
    }
}

/// Append a blank course (grade A, 0.5 credits, normal) to a term
///
/// # Errors
/// Returns `InvalidInputShape` if `term_index` is out of range.
pub fn add_course(
    transcript: &Transcript,
    term_index: usize,
    policy: &GradingPolicy,
) -> Result<Transcript> {
    let term = term_at(transcript, term_index)?;
    let mut courses = term.courses.clone();
    courses.push(CourseRecord::new(
        unused_id(term),
        "",
        LetterGrade::A,
        NEW_COURSE_CREDITS,
        Weighting::Normal,
    ));
    Ok(with_courses(transcript, vec![(term_index, courses)], policy))
}

/// Update fields of one course
///
/// # Errors
/// Returns `InvalidInputShape` if the term or course does not exist.
pub fn update_course(
    transcript: &Transcript,
    term_index: usize,
    course_id: &str,
    patch: &CoursePatch,
    policy: &GradingPolicy,
) -> Result<Transcript> {
    let term = term_at(transcript, term_index)?;
    let pos = course_position(term, term_index, course_id)?;
    let mut courses = term.courses.clone();
    courses[pos] = patch.apply(&courses[pos]);
    Ok(with_courses(transcript, vec![(term_index, courses)], policy))
}

/// Remove a course by id
///
/// # Errors
/// Returns `InvalidInputShape` if the term or course does not exist.
pub fn remove_course(
    transcript: &Transcript,
    term_index: usize,
    course_id: &str,
    policy: &GradingPolicy,
) -> Result<Transcript> {
    let term = term_at(transcript, term_index)?;
    let pos = course_position(term, term_index, course_id)?;
    let mut courses = term.courses.clone();
    courses.remove(pos);
    Ok(with_courses(transcript, vec![(term_index, courses)], policy))
}

/// Move a course to a new position within its term
///
/// # Errors
/// Returns `InvalidInputShape` if the term does not exist or either position
/// is out of range.
pub fn reorder_course(
    transcript: &Transcript,
    term_index: usize,
    from: usize,
    to: usize,
    policy: &GradingPolicy,
) -> Result<Transcript> {
    let term = term_at(transcript, term_index)?;
    let len = term.courses.len();
    if from >= len || to >= len {
        return Err(TranscriptError::shape(
            format!("terms[{term_index}].courses"),
            format!("positions {from} and {to} within {len} courses"),
        ));
    }

    let mut courses = term.courses.clone();
    let course = courses.remove(from);
    courses.insert(to, course);
    Ok(with_courses(transcript, vec![(term_index, courses)], policy))
}

/// Drag a course from one term into another at `to_index` (clamped to the end)
///
/// Moving within the same term behaves like [`reorder_course`]. A course whose
/// id already exists in the destination term gets a fresh id.
///
/// # Errors
/// Returns `InvalidInputShape` if either term or the course does not exist.
pub fn move_course(
    transcript: &Transcript,
    from_term: usize,
    course_id: &str,
    to_term: usize,
    to_index: usize,
    policy: &GradingPolicy,
) -> Result<Transcript> {
    let source = term_at(transcript, from_term)?;
    let destination = term_at(transcript, to_term)?;
    let pos = course_position(source, from_term, course_id)?;

    if from_term == to_term {
        let to = to_index.min(source.courses.len() - 1);
        return reorder_course(transcript, from_term, pos, to, policy);
    }

    let mut source_courses = source.courses.clone();
    let mut course = source_courses.remove(pos);
    if destination.course_position(&course.id).is_some() {
        course.id = unused_id(destination);
    }

    let mut destination_courses = destination.courses.clone();
    let at = to_index.min(destination_courses.len());
    destination_courses.insert(at, course);

    Ok(with_courses(
        transcript,
        vec![(from_term, source_courses), (to_term, destination_courses)],
        policy,
    ))
}

/// Append an empty term after the last one
///
/// The new grade level is one above the highest existing level (or
/// `base_grade_level` for an empty transcript). The start year continues from
/// the last term's end year, or `fallback_start_year` if there are no terms.
#[must_use]
pub fn add_term(transcript: &Transcript, base_grade_level: i32, fallback_start_year: i32) -> Transcript {
    let grade_level = transcript
        .terms
        .iter()
        .map(|t| t.grade_level)
        .max()
        .map_or(base_grade_level, |g| g.saturating_add(1));
    let start_year = transcript
        .terms
        .last()
        .map_or(fallback_start_year, |t| t.end_year);

    let mut terms = transcript.terms.clone();
    terms.push(TermRecord::empty(grade_level, start_year, start_year.saturating_add(1)));
    with_cumulative(Transcript {
        terms,
        ..transcript.clone()
    })
}

/// Remove a term and refresh the cumulative fields
///
/// # Errors
/// Returns `InvalidInputShape` if `term_index` is out of range.
pub fn remove_term(transcript: &Transcript, term_index: usize) -> Result<Transcript> {
    term_at(transcript, term_index)?;
    let mut terms = transcript.terms.clone();
    terms.remove(term_index);
    Ok(with_cumulative(Transcript {
        terms,
        ..transcript.clone()
    }))
}
