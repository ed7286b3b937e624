//! GPA and credit aggregation
//!
//! Term statistics come from the term's courses. Cumulative statistics are
//! the registrar-style combination of *published* term results: each term's
//! already-rounded GPA is re-weighted by that term's credits. Re-summing raw
//! course points across all terms gives different numbers once rounding
//! compounds, and is not what transcripts show.

use crate::core::grading::{grade_points, GradingPolicy};
use crate::core::models::{CourseRecord, TermRecord, Transcript};
use crate::core::rounding::round2;
use serde::{Deserialize, Serialize};

/// GPA and credit totals for one term, or cumulatively through a term
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TermStats {
    /// GPA rounded to two decimals (0 when no credits)
    pub gpa: f64,
    /// Credits counted
    pub total_credits: f64,
}

/// Weighted points and credits a course contributes, or `None` if it is skipped
///
/// Courses missing a grade, countable credits, or a weighting are left out of
/// both the numerator and the denominator.
#[must_use]
pub fn course_contribution(course: &CourseRecord, policy: &GradingPolicy) -> Option<(f64, f64)> {
    let grade = course.grade.as_ref()?;
    let weighting = course.weighting.as_ref()?;
    let credits = course.countable_credits()?;
    Some((grade_points(grade, weighting, policy) * credits, credits))
}

/// Compute GPA and total credits for a list of courses
#[must_use]
pub fn compute_term_stats(courses: &[CourseRecord], policy: &GradingPolicy) -> TermStats {
    let mut total_points = 0.0;
    let mut total_credits = 0.0;

    for course in courses {
        if let Some((points, credits)) = course_contribution(course, policy) {
            total_points += points;
            total_credits += credits;
        } else {
            crate::debug!("Skipping incomplete course '{}' ({})", course.name, course.id);
        }
    }

    TermStats {
        gpa: weighted_gpa(total_points, total_credits),
        total_credits,
    }
}

/// Running cumulative statistics through each term, in input order
///
/// Entry `i` covers terms `0..=i`, combining each term's stored `gpa` and
/// `total_credits`. Terms must be recalculated first (see [`recalc_term`]).
#[must_use]
pub fn compute_cumulative_stats(terms: &[TermRecord]) -> Vec<TermStats> {
    let mut points = 0.0;
    let mut credits = 0.0;

    terms
        .iter()
        .map(|term| {
            points += term.gpa * term.total_credits;
            credits += term.total_credits;
            TermStats {
                gpa: weighted_gpa(points, credits),
                total_credits: credits,
            }
        })
        .collect()
}

/// Copy of `term` with `gpa` and `total_credits` recomputed from its courses
#[must_use]
pub fn recalc_term(term: &TermRecord, policy: &GradingPolicy) -> TermRecord {
    let stats = compute_term_stats(&term.courses, policy);
    TermRecord {
        gpa: stats.gpa,
        total_credits: stats.total_credits,
        ..term.clone()
    }
}

/// Copy of `transcript` with every term recalculated and cumulative fields refreshed
#[must_use]
pub fn recalc_transcript(transcript: &Transcript, policy: &GradingPolicy) -> Transcript {
    let terms: Vec<TermRecord> = transcript
        .terms
        .iter()
        .map(|term| recalc_term(term, policy))
        .collect();
    with_cumulative(Transcript {
        terms,
        ..transcript.clone()
    })
}

/// Set the transcript-level cumulative fields from its (already recalculated) terms
#[must_use]
pub fn with_cumulative(mut transcript: Transcript) -> Transcript {
    let overall = compute_cumulative_stats(&transcript.terms)
        .last()
        .copied()
        .unwrap_or_default();
    transcript.cumulative_gpa = overall.gpa;
    transcript.cumulative_credits = overall.total_credits;
    transcript
}

fn weighted_gpa(points: f64, credits: f64) -> f64 {
    if credits > 0.0 {
        round2(points / credits)
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::{Grade, LetterGrade, Weighting};

    fn course(id: &str, grade: LetterGrade, credits: f64, weighting: Weighting) -> CourseRecord {
        CourseRecord::new(id, id, grade, credits, weighting)
    }

    fn term(grade_level: i32, courses: Vec<CourseRecord>) -> TermRecord {
        let mut term = TermRecord::empty(grade_level, 2011 + grade_level, 2012 + grade_level);
        term.courses = courses;
        recalc_term(&term, &GradingPolicy::default())
    }

    fn stats_term(gpa: f64, total_credits: f64) -> TermRecord {
        TermRecord {
            gpa,
            total_credits,
            ..TermRecord::empty(9, 2020, 2021)
        }
    }

    #[test]
    fn test_mixed_weighting_term() {
        let courses = vec![
            course("a", LetterGrade::A, 1.0, Weighting::Normal),
            course("b", LetterGrade::B, 0.5, Weighting::Honors),
        ];
        let stats = compute_term_stats(&courses, &GradingPolicy::default());

        assert!((stats.total_credits - 1.5).abs() < f64::EPSILON);
        assert_eq!(stats.gpa, 3.83);
    }

    #[test]
    fn test_empty_term_is_zero() {
        let stats = compute_term_stats(&[], &GradingPolicy::default());
        assert_eq!(stats, TermStats::default());
    }

    #[test]
    fn test_incomplete_courses_are_skipped() {
        let mut missing_credits = course("x", LetterGrade::C, 1.0, Weighting::Normal);
        missing_credits.credits = None;
        let mut missing_grade = course("y", LetterGrade::C, 1.0, Weighting::Normal);
        missing_grade.grade = None;
        let mut missing_weighting = course("z", LetterGrade::C, 1.0, Weighting::Normal);
        missing_weighting.weighting = None;

        let courses = vec![
            course("a", LetterGrade::A, 1.0, Weighting::Normal),
            missing_credits,
            missing_grade,
            missing_weighting,
        ];
        let stats = compute_term_stats(&courses, &GradingPolicy::default());

        assert!((stats.total_credits - 1.0).abs() < f64::EPSILON);
        assert_eq!(stats.gpa, 4.0);
    }

    #[test]
    fn test_unrecognized_grade_counts_credits_at_zero_points() {
        let mut pass = course("p", LetterGrade::A, 1.0, Weighting::Normal);
        pass.grade = Some(Grade::Unrecognized("P".to_string()));
        let courses = vec![course("a", LetterGrade::A, 1.0, Weighting::Normal), pass];

        let stats = compute_term_stats(&courses, &GradingPolicy::default());

        assert!((stats.total_credits - 2.0).abs() < f64::EPSILON);
        assert_eq!(stats.gpa, 2.0);
    }

    #[test]
    fn test_zero_credit_courses_do_not_divide_by_zero() {
        let courses = vec![course("a", LetterGrade::A, 0.0, Weighting::Ap)];
        let stats = compute_term_stats(&courses, &GradingPolicy::default());
        assert_eq!(stats, TermStats::default());
    }

    #[test]
    fn test_capped_policy_changes_term_gpa() {
        let courses = vec![course("a", LetterGrade::A, 1.0, Weighting::Ap)];

        let open = compute_term_stats(&courses, &GradingPolicy::unbounded());
        let capped = compute_term_stats(&courses, &GradingPolicy::capped(4.5));

        assert_eq!(open.gpa, 5.0);
        assert_eq!(capped.gpa, 4.5);
    }

    #[test]
    fn test_cumulative_reweights_term_gpas() {
        let terms = vec![stats_term(4.0, 2.0), stats_term(3.0, 1.0)];
        let cumulative = compute_cumulative_stats(&terms);

        assert_eq!(cumulative.len(), 2);
        assert_eq!(cumulative[0].gpa, 4.0);
        assert!((cumulative[0].total_credits - 2.0).abs() < f64::EPSILON);
        assert_eq!(cumulative[1].gpa, 3.67);
        assert!((cumulative[1].total_credits - 3.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_cumulative_uses_rounded_term_gpa_not_raw_points() {
        // 26 points over 7 credits publishes as 3.71; 3.71 * 7 = 25.97
        let first = term(
            9,
            vec![
                course("a", LetterGrade::A, 5.0, Weighting::Normal),
                course("b", LetterGrade::B, 2.0, Weighting::Normal),
            ],
        );
        let second = term(10, vec![course("c", LetterGrade::B, 1.0, Weighting::Honors)]);
        assert_eq!(first.gpa, 3.71);
        assert_eq!(second.gpa, 3.5);

        let cumulative = compute_cumulative_stats(&[first.clone(), second.clone()]);

        // (25.97 + 3.5) / 8 = 3.68375
        assert_eq!(cumulative[1].gpa, 3.68);

        // Re-summing raw course points would give 29.5 / 8 = 3.6875 -> 3.69
        let all_courses: Vec<CourseRecord> =
            first.courses.into_iter().chain(second.courses).collect();
        let raw = compute_term_stats(&all_courses, &GradingPolicy::default());
        assert_eq!(raw.gpa, 3.69);
        assert!((raw.gpa - cumulative[1].gpa).abs() > 0.005);
    }

    #[test]
    fn test_cumulative_of_no_terms_is_empty() {
        assert!(compute_cumulative_stats(&[]).is_empty());
    }

    #[test]
    fn test_cumulative_skips_zero_credit_terms() {
        let terms = vec![stats_term(0.0, 0.0), stats_term(3.5, 4.0)];
        let cumulative = compute_cumulative_stats(&terms);

        assert_eq!(cumulative[0], TermStats::default());
        assert_eq!(cumulative[1].gpa, 3.5);
    }

    #[test]
    fn test_recalc_term_is_idempotent() {
        let mut draft = TermRecord::empty(11, 2023, 2024);
        draft.courses = vec![
            course("a", LetterGrade::A, 1.0, Weighting::Ap),
            course("b", LetterGrade::C, 0.5, Weighting::Normal),
        ];
        draft.gpa = 1.23;
        draft.total_credits = 99.0;

        let policy = GradingPolicy::default();
        let once = recalc_term(&draft, &policy);
        let twice = recalc_term(&once, &policy);

        assert_eq!(once, twice);
        assert_eq!(once.courses, draft.courses);
        assert_eq!(once.gpa, 4.0);
    }

    #[test]
    fn test_recalc_transcript_sets_cumulative_from_last_term() {
        let mut transcript = Transcript::new("s1");
        transcript.terms = vec![
            TermRecord {
                courses: vec![course("a", LetterGrade::A, 2.0, Weighting::Normal)],
                ..TermRecord::empty(9, 2020, 2021)
            },
            TermRecord {
                courses: vec![course("b", LetterGrade::C, 1.0, Weighting::Normal)],
                ..TermRecord::empty(10, 2021, 2022)
            },
        ];

        let recalculated = recalc_transcript(&transcript, &GradingPolicy::default());

        assert_eq!(recalculated.terms[0].gpa, 4.0);
        assert_eq!(recalculated.terms[1].gpa, 2.0);
        assert_eq!(recalculated.cumulative_gpa, 3.33);
        assert!((recalculated.cumulative_credits - 3.0).abs() < f64::EPSILON);
    }
}
