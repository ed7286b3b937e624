//! Integration tests for the transcript pipeline: normalize, aggregate, edit, import

use serde_json::json;
use std::collections::HashSet;
use tempfile::TempDir;
use transcript_analytics::core::aggregate::{compute_cumulative_stats, recalc_transcript};
use transcript_analytics::core::edit::{add_course, move_course, remove_term, CoursePatch};
use transcript_analytics::core::error::TranscriptError;
use transcript_analytics::core::grading::GradingPolicy;
use transcript_analytics::core::import::{build_import_drafts, rows_from_json_str, TermGrouping};
use transcript_analytics::core::models::{Grade, RawTranscript, Transcript};
use transcript_analytics::core::normalize::{normalize_transcript, NormalizeOptions};
use transcript_analytics::core::pipeline::{build_transcript, build_transcript_from_json, save_transcript};

fn payload() -> serde_json::Value {
    json!({
        "student": {"_id": "64b0c0ffee", "firstName": "Jane"},
        "records": [
            {
                "gradeLevel": 9,
                "startYear": 2020,
                "endYear": 2021,
                "courses": [
                    {"_id": "eng9", "name": "English 1", "grade": "A", "credits": 1, "type": "normal"},
                    {"_id": "alg1", "name": "Algebra 1", "grade": "C", "credits": 1, "type": "normal"},
                    {"_id": "eng9", "name": "English 1 (retake)", "grade": "B", "credits": 1, "type": "honors"},
                    {"name": "Study Hall", "grade": "P", "credits": 0.5, "type": "normal"}
                ]
            },
            {
                "gradeLevel": 10,
                "courses": [
                    {"_id": "chem", "name": "Chemistry", "grade": "a", "credits": 1, "type": "AP"},
                    {"_id": "art", "name": "Art", "credits": 0.5, "type": "normal"}
                ]
            },
            {
                "gradeLevel": 11,
                "startYear": 0,
                "endYear": "2019",
                "courses": []
            }
        ]
    })
}

fn options() -> NormalizeOptions {
    NormalizeOptions::starting(2020)
}

fn built() -> Transcript {
    build_transcript_from_json(payload(), &options(), &GradingPolicy::default())
        .expect("payload should be well shaped")
}

#[test]
fn test_full_pipeline_numbers() {
    let transcript = built();

    assert_eq!(transcript.student_ref, "64b0c0ffee");

    let ninth = &transcript.terms[0];
    // Duplicate id collapsed into the first slot with the later values
    assert_eq!(ninth.courses.len(), 3);
    assert_eq!(ninth.courses[0].id, "eng9");
    assert_eq!(ninth.courses[0].name, "English 1 (retake)");
    // (3.5 + 2 + 0 * 0.5) / 2.5 = 2.2
    assert_eq!(ninth.gpa, 2.2);
    assert!((ninth.total_credits - 2.5).abs() < f64::EPSILON);

    let tenth = &transcript.terms[1];
    assert_eq!((tenth.start_year, tenth.end_year), (2021, 2022));
    assert_eq!(tenth.gpa, 5.0);
    assert!((tenth.total_credits - 1.0).abs() < f64::EPSILON);

    let eleventh = &transcript.terms[2];
    assert_eq!((eleventh.start_year, eleventh.end_year), (2022, 2023));
    assert_eq!(eleventh.gpa, 0.0);

    // (2.2 * 2.5 + 5 * 1) / 3.5 = 3.0
    assert_eq!(transcript.cumulative_gpa, 3.0);
    assert!((transcript.cumulative_credits - 3.5).abs() < f64::EPSILON);
}

#[test]
fn test_course_ids_unique_within_every_term() {
    for term in &built().terms {
        let ids: HashSet<&str> = term.courses.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids.len(), term.courses.len());
        assert!(term.end_year > term.start_year);
    }
}

#[test]
fn test_canonical_transcript_round_trips() {
    let transcript = built();
    let raw = RawTranscript::from(&transcript);

    assert_eq!(normalize_transcript(&raw, &NormalizeOptions::starting(1999)), transcript);

    let via_json = RawTranscript::from_json_str(&serde_json::to_string(&transcript).unwrap())
        .expect("canonical JSON should read back");
    assert_eq!(normalize_transcript(&via_json, &options()), transcript);
}

#[test]
fn test_recalculation_is_idempotent() {
    let once = built();
    let twice = recalc_transcript(&once, &GradingPolicy::default());
    assert_eq!(once, twice);
}

#[test]
fn test_cumulative_matches_last_running_total() {
    let transcript = built();
    let running = compute_cumulative_stats(&transcript.terms);
    let last = running.last().unwrap();

    assert_eq!(last.gpa, transcript.cumulative_gpa);
    assert!((last.total_credits - transcript.cumulative_credits).abs() < f64::EPSILON);
    for (stats, term) in running.iter().zip(&transcript.terms) {
        assert!(stats.gpa >= 0.0);
        assert!(term.gpa >= 0.0 && term.total_credits >= 0.0);
    }
}

#[test]
fn test_capped_policy_through_pipeline() {
    let capped = build_transcript_from_json(payload(), &options(), &GradingPolicy::capped(4.5))
        .expect("payload should be well shaped");
    assert_eq!(capped.terms[1].gpa, 4.5);
}

#[test]
fn test_save_path_rejects_explicit_backwards_years() {
    let raw = RawTranscript::from_json_value(payload()).unwrap();

    let err = save_transcript(&raw, &options(), &GradingPolicy::default()).unwrap_err();
    assert_eq!(
        err,
        TranscriptError::InvalidYearRange {
            grade_level: 11,
            start_year: 2022,
            end_year: 2019,
        }
    );
    assert!(err.to_string().contains("grade 11"));

    // The same payload is accepted and corrected on the draft path
    let draft = build_transcript(&raw, &options(), &GradingPolicy::default());
    assert_eq!(draft.terms[2].end_year, 2023);
}

#[test]
fn test_extreme_years_are_handled_without_panicking() {
    let payload = json!({"terms": [
        {"gradeLevel": 9, "startYear": 2_147_483_647, "courses": []},
        {"gradeLevel": 10, "courses": []}
    ]});
    let transcript = build_transcript_from_json(payload, &options(), &GradingPolicy::default())
        .expect("payload should be well shaped");

    assert_eq!((transcript.terms[0].start_year, transcript.terms[0].end_year), (2020, 2021));
    assert_eq!((transcript.terms[1].start_year, transcript.terms[1].end_year), (2021, 2022));
}

#[test]
fn test_malformed_payloads_are_rejected() {
    let cases = [
        (json!("just text"), "$"),
        (json!({"terms": {}}), "terms"),
        (json!({"terms": [{"courses": []}]}), "terms[0].gradeLevel"),
        (json!({"terms": [{"gradeLevel": 9, "courses": [1]}]}), "terms[0].courses[0]"),
    ];

    for (value, expected_path) in cases {
        let err = build_transcript_from_json(value, &options(), &GradingPolicy::default())
            .unwrap_err();
        assert!(
            matches!(err, TranscriptError::InvalidInputShape { ref path, .. } if path == expected_path),
            "expected failure at {expected_path}, got {err}"
        );
    }
}

#[test]
fn test_edit_sequence_keeps_totals_consistent() {
    let policy = GradingPolicy::default();
    let transcript = built();

    let edited = add_course(&transcript, 2, &policy).unwrap();
    let added_id = edited.terms[2].courses[0].id.clone();
    let edited = move_course(&edited, 2, &added_id, 1, 0, &policy).unwrap();
    let edited = remove_term(&edited, 2).unwrap();

    assert_eq!(edited.terms.len(), 2);
    assert_eq!(edited.terms[1].courses[0].id, added_id);
    assert_eq!(edited, recalc_transcript(&edited, &policy));

    let patch = CoursePatch {
        grade: Some(Grade::parse("F")),
        ..CoursePatch::default()
    };
    let failed = transcript_analytics::core::edit::update_course(&edited, 1, "chem", &patch, &policy)
        .unwrap();
    assert!(failed.terms[1].gpa < edited.terms[1].gpa);
}

#[test]
fn test_roster_import_end_to_end() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let roster = temp_dir.path().join("roster.json");
    let rows = json!([
        {"studentName": "Doe, Jane", "courseName": "English 1", "startDate": "2021-08-20", "gradePercent": 95},
        {"studentName": "Doe, Jane", "courseName": "Algebra 1", "startDate": "2021-08-20", "gradePercent": 82},
        {"studentName": "Doe, Jane", "courseName": "English 2", "startDate": "2022-08-22", "gradePercent": 74},
        {"studentName": "Roe, Sam", "courseName": "Biology", "startDate": "2021-08-20", "gradePercent": 65}
    ]);
    std::fs::write(&roster, rows.to_string()).expect("Failed to write roster");

    let content = std::fs::read_to_string(&roster).expect("Failed to read roster");
    let rows = rows_from_json_str(&content).expect("roster should parse");
    let drafts = build_import_drafts(&rows, TermGrouping::AcademicYear, 9, &GradingPolicy::default());

    assert_eq!(drafts.len(), 2);
    let jane = &drafts[0].transcript;
    assert_eq!(jane.terms.len(), 2);
    assert_eq!(jane.terms[0].gpa, 3.5);
    assert_eq!(jane.terms[1].gpa, 2.0);
    // (3.5 * 1 + 2 * 0.5) / 1.5 = 3.0
    assert_eq!(jane.cumulative_gpa, 3.0);
    assert_eq!(drafts[1].student.first, "Sam");
    assert_eq!(drafts[1].transcript.cumulative_gpa, 1.0);
}
