//! Transcript drafts from roster exports
//!
//! A roster export has one row per (student, course), already decoded from
//! whatever file format it came in. Rows are grouped per student, then into
//! terms, and each term is recalculated so the draft is ready for review in
//! the same shape as any other transcript.

use crate::core::aggregate::{recalc_term, with_cumulative};
use crate::core::error::{Result, TranscriptError};
use crate::core::grading::GradingPolicy;
use crate::core::models::{CourseRecord, Grade, LetterGrade, TermRecord, Transcript, Weighting};
use crate::core::normalize::YearRange;
use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use uuid::Uuid;

/// Credits given to every imported course
pub const IMPORTED_COURSE_CREDITS: f64 = 0.5;

/// Name used when a roster row carries no student name
pub const DEFAULT_STUDENT_NAME: &str = "Student, Name";

/// One roster row, already decoded from the file
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ImportRow {
    /// Student as "Last, First"
    pub student_name: Option<String>,
    /// Course title
    pub course_name: Option<String>,
    /// Letter grade, when the export has one
    pub letter_grade: Option<String>,
    /// Percentage grade (0-100)
    pub grade_percent: Option<f64>,
    /// Date the course started
    pub start_date: Option<NaiveDate>,
}

/// Read roster rows from a JSON array of row objects
///
/// # Errors
/// Returns [`TranscriptError::InvalidInputShape`] if the text is not a JSON
/// array of row objects.
pub fn rows_from_json_str(json: &str) -> Result<Vec<ImportRow>> {
    serde_json::from_str(json)
        .map_err(|e| TranscriptError::shape("$", format!("an array of roster rows ({e})")))
}

/// How imported courses are grouped into terms
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TermGrouping {
    /// One term per academic year, numbered up from the base grade level
    #[default]
    AcademicYear,
    /// One term per grade level guessed from the course title
    CourseTitle,
}

/// Student name split from "Last, First"
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StudentName {
    /// Given name
    pub first: String,
    /// Family name
    pub last: String,
}

impl StudentName {
    /// Split "Last, First"; missing parts become "Last" / "First"
    #[must_use]
    pub fn parse(full: &str) -> Self {
        let mut parts = full.split(',').map(str::trim);
        let last = parts.next().filter(|s| !s.is_empty()).unwrap_or("Last");
        let first = parts.next().filter(|s| !s.is_empty()).unwrap_or("First");
        Self {
            first: first.to_string(),
            last: last.to_string(),
        }
    }
}

impl fmt::Display for StudentName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}, {}", self.last, self.first)
    }
}

/// A student and the transcript drafted from their rows
#[derive(Debug, Clone, PartialEq)]
pub struct ImportDraft {
    /// Who the rows belong to
    pub student: StudentName,
    /// Recalculated transcript; `student_ref` is the display name
    pub transcript: Transcript,
}

/// Letter grade for a percentage: 90 A, 80 B, 70 C, 60 D, otherwise F
#[must_use]
pub fn letter_from_percent(percent: f64) -> LetterGrade {
    match percent {
        p if p >= 90.0 => LetterGrade::A,
        p if p >= 80.0 => LetterGrade::B,
        p if p >= 70.0 => LetterGrade::C,
        p if p >= 60.0 => LetterGrade::D,
        _ => LetterGrade::F,
    }
}

/// Academic year a date falls in; years roll over in July
#[must_use]
pub fn academic_year_for(date: NaiveDate) -> YearRange {
    let year = date.year();
    if date.month() >= 7 {
        YearRange {
            start_year: year,
            end_year: year + 1,
        }
    } else {
        YearRange {
            start_year: year - 1,
            end_year: year,
        }
    }
}

const TITLE_KEYWORDS: [(i32, &[&str]); 7] = [
    (9, &["english 1", "algebra 1", "biology", "cultural geography"]),
    (10, &["english 2", "geometry", "chemistry", "world history"]),
    (11, &["english 3", "algebra 2", "earth science", "us history"]),
    (12, &["english 4", "physics", "economics", "government"]),
    (6, &["language arts 6", "math 6"]),
    (7, &["language arts 7", "math 7"]),
    (8, &["language arts 8", "math 8"]),
];

/// Guess a grade level from a course title, falling back on the start year
///
/// Titles are matched case-insensitively against well-known course names.
/// Without a match, start years from 2025 on map to 12 and everything else to 9.
#[must_use]
pub fn detect_grade_level(course_name: &str, start_year: i32) -> i32 {
    let name = course_name.to_lowercase();
    TITLE_KEYWORDS
        .iter()
        .find(|(_, keywords)| keywords.iter().any(|k| name.contains(k)))
        .map_or_else(|| if start_year >= 2025 { 12 } else { 9 }, |(level, _)| *level)
}

/// Course for an accepted row, or `None` if the row lacks a title or start date
fn imported_course(row: &ImportRow) -> Option<(CourseRecord, NaiveDate)> {
    let name = row.course_name.as_deref().map(str::trim).filter(|s| !s.is_empty())?;
    let date = row.start_date?;

    let grade = row
        .letter_grade
        .as_deref()
        .filter(|s| !s.trim().is_empty())
        .map_or_else(
            || Grade::Letter(letter_from_percent(row.grade_percent.unwrap_or(0.0))),
            Grade::parse,
        );

    let course = CourseRecord {
        id: Uuid::new_v4().to_string(),
        name: name.to_string(),
        grade: Some(grade),
        credits: Some(IMPORTED_COURSE_CREDITS),
        weighting: Some(Weighting::Normal),
    };
    Some((course, date))
}

fn terms_by_academic_year(courses: Vec<(CourseRecord, NaiveDate)>, base_grade_level: i32) -> Vec<TermRecord> {
    let mut years: BTreeMap<(i32, i32), Vec<CourseRecord>> = BTreeMap::new();
    for (course, date) in courses {
        let range = academic_year_for(date);
        years
            .entry((range.start_year, range.end_year))
            .or_default()
            .push(course);
    }

    years
        .into_iter()
        .zip(base_grade_level..)
        .map(|(((start, end), courses), grade_level)| TermRecord {
            courses,
            ..TermRecord::empty(grade_level, start, end)
        })
        .collect()
}

fn terms_by_course_title(courses: Vec<(CourseRecord, NaiveDate)>) -> Vec<TermRecord> {
    let mut levels: BTreeMap<i32, (YearRange, Vec<CourseRecord>)> = BTreeMap::new();
    for (course, date) in courses {
        let range = academic_year_for(date);
        let level = detect_grade_level(&course.name, range.start_year);
        let entry = levels.entry(level).or_insert_with(|| (range, Vec::new()));
        if range.start_year < entry.0.start_year {
            entry.0 = range;
        }
        entry.1.push(course);
    }

    levels
        .into_iter()
        .map(|(grade_level, (range, courses))| TermRecord {
            courses,
            ..TermRecord::empty(grade_level, range.start_year, range.end_year)
        })
        .collect()
}

/// Build one recalculated transcript draft per student in the rows
///
/// Students appear in first-seen order. Rows without a course title or start
/// date are skipped; a student with no accepted rows still gets an empty draft.
#[must_use]
pub fn build_import_drafts(
    rows: &[ImportRow],
    grouping: TermGrouping,
    base_grade_level: i32,
    policy: &GradingPolicy,
) -> Vec<ImportDraft> {
    let mut students: Vec<(String, Vec<(CourseRecord, NaiveDate)>)> = Vec::new();

    for row in rows {
        let name = row
            .student_name
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .unwrap_or(DEFAULT_STUDENT_NAME);

        let slot = match students.iter().position(|(n, _)| n == name) {
            Some(idx) => idx,
            None => {
                students.push((name.to_string(), Vec::new()));
                students.len() - 1
            }
        };

        match imported_course(row) {
            Some(course) => students[slot].1.push(course),
            None => crate::debug!("Skipping roster row without course title or start date: {row:?}"),
        }
    }

    students
        .into_iter()
        .map(|(name, courses)| {
            let student = StudentName::parse(&name);
            let terms = match grouping {
                TermGrouping::AcademicYear => terms_by_academic_year(courses, base_grade_level),
                TermGrouping::CourseTitle => terms_by_course_title(courses),
            };
            let transcript = with_cumulative(Transcript {
                terms: terms.iter().map(|t| recalc_term(t, policy)).collect(),
                ..Transcript::new(student.to_string())
            });
            crate::info!(
                "Drafted transcript for {student}: {} terms, {} courses",
                transcript.term_count(),
                transcript.course_count()
            );
            ImportDraft {
                student,
                transcript,
            }
        })
        .collect()
}
