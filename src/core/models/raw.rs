//! Raw (pre-normalization) transcript input
//!
//! These mirror the canonical models but every field a form or an import draft
//! may leave out is optional. The normalizer turns them into [`Transcript`].

use super::lenient;
use super::{CourseRecord, TermRecord, Transcript};
use crate::core::error::{Result, TranscriptError};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A course as submitted by a caller
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawCourseRecord {
    /// Identifier; missing ids are generated during normalization
    #[serde(default, alias = "_id", deserialize_with = "lenient::opt_text")]
    pub id: Option<String>,

    /// Course title
    #[serde(default, deserialize_with = "lenient::opt_text")]
    pub name: Option<String>,

    /// Grade text in any case
    #[serde(default, deserialize_with = "lenient::opt_text")]
    pub grade: Option<String>,

    /// Credit hours; non-numeric input is treated as missing
    #[serde(default, deserialize_with = "lenient::opt_number")]
    pub credits: Option<f64>,

    /// Weighting text in any case
    #[serde(default, alias = "type", deserialize_with = "lenient::opt_text")]
    pub weighting: Option<String>,
}

/// A term as submitted by a caller
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawTermRecord {
    /// Grade level
    pub grade_level: i32,

    /// Start year, inferred when missing or implausible
    #[serde(default, deserialize_with = "lenient::opt_year")]
    pub start_year: Option<i32>,

    /// End year, inferred when missing, implausible, or not after the start
    #[serde(default, deserialize_with = "lenient::opt_year")]
    pub end_year: Option<i32>,

    /// Courses in display order, possibly with duplicate ids
    #[serde(default)]
    pub courses: Vec<RawCourseRecord>,

    /// Previously derived GPA (carried through, recomputed by aggregation)
    #[serde(default, deserialize_with = "lenient::opt_number")]
    pub gpa: Option<f64>,

    /// Previously derived credits (carried through, recomputed by aggregation)
    #[serde(default, deserialize_with = "lenient::opt_number")]
    pub total_credits: Option<f64>,
}

/// A transcript payload as submitted by a caller
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawTranscript {
    /// Owning student id, or a populated student object
    #[serde(default, alias = "student", deserialize_with = "lenient::opt_reference")]
    pub student_ref: Option<String>,

    /// Year the student started; anchors year inference for terms without years
    #[serde(default, deserialize_with = "lenient::opt_year")]
    pub student_start_year: Option<i32>,

    /// Terms in submission order
    #[serde(default, alias = "records")]
    pub terms: Vec<RawTermRecord>,

    /// Previously derived cumulative GPA
    #[serde(
        default,
        rename = "cumulativeGPA",
        deserialize_with = "lenient::opt_number"
    )]
    pub cumulative_gpa: Option<f64>,

    /// Previously derived cumulative credits
    #[serde(default, deserialize_with = "lenient::opt_number")]
    pub cumulative_credits: Option<f64>,
}

impl RawTranscript {
    /// Build a raw transcript from an untyped JSON payload
    ///
    /// The payload must be an object whose `terms` (or `records`) is an array
    /// of term objects, each with an integer `gradeLevel` and an array of
    /// course objects. Values inside a course never cause a failure.
    ///
    /// # Errors
    /// Returns [`TranscriptError::InvalidInputShape`] naming the first
    /// structural mismatch.
    pub fn from_json_value(value: Value) -> Result<Self> {
        check_shape(&value)?;
        serde_json::from_value(value).map_err(|e| TranscriptError::shape("$", e.to_string()))
    }

    /// Parse a raw transcript from JSON text
    ///
    /// # Errors
    /// Returns [`TranscriptError::InvalidInputShape`] if the text is not JSON
    /// or does not have the transcript shape.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let value: Value =
            serde_json::from_str(json).map_err(|e| TranscriptError::shape("$", e.to_string()))?;
        Self::from_json_value(value)
    }
}

fn check_shape(value: &Value) -> Result<()> {
    let Some(object) = value.as_object() else {
        return Err(TranscriptError::shape("$", "a transcript object"));
    };

    let (key, terms) = match (object.get("terms"), object.get("records")) {
        (Some(terms), _) => ("terms", terms),
        (None, Some(records)) => ("records", records),
        (None, None) => return Ok(()),
    };
    let Some(terms) = terms.as_array() else {
        return Err(TranscriptError::shape(key, "an array of terms"));
    };

    for (i, term) in terms.iter().enumerate() {
        let Some(term) = term.as_object() else {
            return Err(TranscriptError::shape(format!("{key}[{i}]"), "a term object"));
        };
        if !term.get("gradeLevel").is_some_and(|g| g.is_i64() || g.is_u64()) {
            return Err(TranscriptError::shape(
                format!("{key}[{i}].gradeLevel"),
                "an integer grade level",
            ));
        }
        let Some(courses) = term.get("courses") else {
            continue;
        };
        let Some(courses) = courses.as_array() else {
            return Err(TranscriptError::shape(
                format!("{key}[{i}].courses"),
                "an array of courses",
            ));
        };
        if let Some(j) = courses.iter().position(|c| !c.is_object()) {
            return Err(TranscriptError::shape(
                format!("{key}[{i}].courses[{j}]"),
                "a course object",
            ));
        }
    }

    Ok(())
}

impl From<&CourseRecord> for RawCourseRecord {
    fn from(course: &CourseRecord) -> Self {
        Self {
            id: Some(course.id.clone()),
            name: (!course.name.trim().is_empty()).then(|| course.name.clone()),
            grade: course.grade.as_ref().map(ToString::to_string),
            credits: course.credits,
            weighting: course.weighting.as_ref().map(ToString::to_string),
        }
    }
}

impl From<&TermRecord> for RawTermRecord {
    fn from(term: &TermRecord) -> Self {
        Self {
            grade_level: term.grade_level,
            start_year: Some(term.start_year),
            end_year: Some(term.end_year),
            courses: term.courses.iter().map(RawCourseRecord::from).collect(),
            gpa: Some(term.gpa),
            total_credits: Some(term.total_credits),
        }
    }
}

impl From<&Transcript> for RawTranscript {
    fn from(transcript: &Transcript) -> Self {
        Self {
            student_ref: (!transcript.student_ref.is_empty())
                .then(|| transcript.student_ref.clone()),
            student_start_year: None,
            terms: transcript.terms.iter().map(RawTermRecord::from).collect(),
            cumulative_gpa: Some(transcript.cumulative_gpa),
            cumulative_credits: Some(transcript.cumulative_credits),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_accepts_legacy_field_aliases() {
        let raw = RawTranscript::from_json_value(json!({
            "student": "507f1f77",
            "records": [{
                "gradeLevel": 9,
                "courses": [{"_id": "c1", "name": "Biology", "grade": "b", "credits": 1, "type": "Honors"}]
            }]
        }))
        .unwrap();

        assert_eq!(raw.student_ref.as_deref(), Some("507f1f77"));
        assert_eq!(raw.terms.len(), 1);
        let course = &raw.terms[0].courses[0];
        assert_eq!(course.id.as_deref(), Some("c1"));
        assert_eq!(course.weighting.as_deref(), Some("Honors"));
        assert_eq!(course.credits, Some(1.0));
    }

    #[test]
    fn test_degraded_course_fields_do_not_fail() {
        let raw = RawTranscript::from_json_value(json!({
            "terms": [{
                "gradeLevel": 10,
                "startYear": "2021",
                "courses": [{"grade": null, "credits": "lots", "weighting": 3}]
            }]
        }))
        .unwrap();

        let term = &raw.terms[0];
        assert_eq!(term.start_year, Some(2021));
        assert_eq!(term.courses[0].grade, None);
        assert_eq!(term.courses[0].credits, None);
        assert_eq!(term.courses[0].weighting.as_deref(), Some("3"));
    }

    #[test]
    fn test_rejects_non_object_payload() {
        let err = RawTranscript::from_json_value(json!([1, 2, 3])).unwrap_err();
        assert!(matches!(err, TranscriptError::InvalidInputShape { ref path, .. } if path == "$"));
    }

    #[test]
    fn test_rejects_non_array_courses() {
        let err = RawTranscript::from_json_value(json!({
            "terms": [{"gradeLevel": 9, "courses": {"a": 1}}]
        }))
        .unwrap_err();

        assert_eq!(
            err,
            TranscriptError::shape("terms[0].courses", "an array of courses")
        );
    }

    #[test]
    fn test_rejects_missing_grade_level() {
        let err = RawTranscript::from_json_value(json!({"terms": [{"courses": []}]})).unwrap_err();
        assert!(matches!(
            err,
            TranscriptError::InvalidInputShape { ref path, .. } if path == "terms[0].gradeLevel"
        ));
    }

    #[test]
    fn test_rejects_non_object_course() {
        let err = RawTranscript::from_json_str(
            r#"{"terms": [{"gradeLevel": 9, "courses": [{"name": "Art"}, "Band"]}]}"#,
        )
        .unwrap_err();
        assert_eq!(
            err,
            TranscriptError::shape("terms[0].courses[1]", "a course object")
        );
    }

    #[test]
    fn test_empty_object_is_an_empty_transcript() {
        let raw = RawTranscript::from_json_str("{}").unwrap();
        assert!(raw.terms.is_empty());
        assert!(raw.student_ref.is_none());
    }
}
