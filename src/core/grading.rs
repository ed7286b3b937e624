//! Grade-point valuation
//!
//! Maps a (letter grade, weighting) pair to the per-credit point value used by
//! the aggregation engine. Unknown letters and unknown weightings are worth
//! zero, never an error.

use crate::core::models::{Grade, LetterGrade, Weighting};
use serde::{Deserialize, Serialize};

/// Grade-point policy knobs
///
/// By default points are unbounded, so an AP "A" is worth 5.0 per credit.
/// Some registrars cap weighted points; set `max_grade_points` to apply one.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct GradingPolicy {
    /// Upper bound on base + boost, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_grade_points: Option<f64>,
}

impl GradingPolicy {
    /// No ceiling on grade points
    #[must_use]
    pub const fn unbounded() -> Self {
        Self {
            max_grade_points: None,
        }
    }

    /// Cap grade points at `max`
    #[must_use]
    pub const fn capped(max: f64) -> Self {
        Self {
            max_grade_points: Some(max),
        }
    }

    /// Apply the ceiling (if any) to a point value
    #[must_use]
    pub fn apply(&self, points: f64) -> f64 {
        self.max_grade_points.map_or(points, |max| points.min(max))
    }
}

/// Base points for a recognized letter
#[must_use]
pub const fn letter_points(letter: LetterGrade) -> f64 {
    match letter {
        LetterGrade::A => 4.0,
        LetterGrade::B => 3.0,
        LetterGrade::C => 2.0,
        LetterGrade::D => 1.0,
        LetterGrade::F => 0.0,
    }
}

/// Base points for a grade: A=4, B=3, C=2, D=1, F=0, anything else 0
#[must_use]
pub const fn base_points(grade: &Grade) -> f64 {
    match grade {
        Grade::Letter(letter) => letter_points(*letter),
        Grade::Unrecognized(_) => 0.0,
    }
}

/// Weighting boost: normal=0, honors=0.5, ap=1, anything else 0
#[must_use]
pub const fn weight_boost(weighting: &Weighting) -> f64 {
    match weighting {
        Weighting::Normal | Weighting::Unrecognized(_) => 0.0,
        Weighting::Honors => 0.5,
        Weighting::Ap => 1.0,
    }
}

/// Per-credit grade points under `policy`
#[must_use]
pub fn grade_points(grade: &Grade, weighting: &Weighting, policy: &GradingPolicy) -> f64 {
    policy.apply(base_points(grade) + weight_boost(weighting))
}

/// Unbounded per-credit grade points from free text (e.g. `("a", "AP")` is 5.0)
#[must_use]
pub fn grade_points_for(grade: &str, weighting: &str) -> f64 {
    grade_points(
        &Grade::parse(grade),
        &Weighting::parse(weighting),
        &GradingPolicy::unbounded(),
    )
}
