//! Term (grade-level year) model

use super::CourseRecord;
use serde::{Deserialize, Serialize};

/// One grade level's record on a transcript
///
/// `gpa` and `total_credits` are derived from `courses`; they are refreshed by
/// the aggregation engine after every course change and are never trusted as
/// input.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TermRecord {
    /// Grade level (nominally 6-12)
    pub grade_level: i32,

    /// First calendar year of the academic year
    pub start_year: i32,

    /// Last calendar year of the academic year
    pub end_year: i32,

    /// Courses in display order
    #[serde(default)]
    pub courses: Vec<CourseRecord>,

    /// Term GPA, rounded to two decimals
    #[serde(default)]
    pub gpa: f64,

    /// Credits counted toward the term GPA
    #[serde(default)]
    pub total_credits: f64,
}

impl TermRecord {
    /// Create a term with no courses and zero statistics
    #[must_use]
    pub const fn empty(grade_level: i32, start_year: i32, end_year: i32) -> Self {
        Self {
            grade_level,
            start_year,
            end_year,
            courses: Vec::new(),
            gpa: 0.0,
            total_credits: 0.0,
        }
    }

    /// Position of the course with `id`, if present
    #[must_use]
    pub fn course_position(&self, id: &str) -> Option<usize> {
        self.courses.iter().position(|c| c.id == id)
    }

    /// Look up a course by id
    #[must_use]
    pub fn get_course(&self, id: &str) -> Option<&CourseRecord> {
        self.courses.iter().find(|c| c.id == id)
    }

    /// Academic year label (e.g., "2023-2024")
    #[must_use]
    pub fn year_label(&self) -> String {
        format!("{}-{}", self.start_year, self.end_year)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::{LetterGrade, Weighting};

    #[test]
    fn test_empty_term() {
        let term = TermRecord::empty(9, 2021, 2022);

        assert_eq!(term.grade_level, 9);
        assert!(term.courses.is_empty());
        assert!(term.gpa.abs() < f64::EPSILON);
        assert!(term.total_credits.abs() < f64::EPSILON);
        assert_eq!(term.year_label(), "2021-2022");
    }

    #[test]
    fn test_course_lookup() {
        let mut term = TermRecord::empty(10, 2022, 2023);
        term.courses.push(CourseRecord::new(
            "geo",
            "Geometry",
            LetterGrade::A,
            1.0,
            Weighting::Normal,
        ));
        term.courses.push(CourseRecord::ungraded("art", "Art I"));

        assert_eq!(term.course_position("art"), Some(1));
        assert_eq!(term.get_course("geo").map(|c| c.name.as_str()), Some("Geometry"));
        assert!(term.get_course("missing").is_none());
    }

    #[test]
    fn test_json_field_names_are_camel_case() {
        let json = serde_json::to_value(TermRecord::empty(11, 2023, 2024)).unwrap();

        assert_eq!(json["gradeLevel"], 11);
        assert_eq!(json["startYear"], 2023);
        assert_eq!(json["endYear"], 2024);
        assert!(json.get("totalCredits").is_some());
    }
}
