//! Letter grade and course weighting

use serde::{Deserialize, Serialize};
use std::fmt;

/// One of the five recognized letter grades
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LetterGrade {
    /// A
    A,
    /// B
    B,
    /// C
    C,
    /// D
    D,
    /// F
    F,
}

impl LetterGrade {
    /// All recognized letters, best first
    pub const ALL: [Self; 5] = [Self::A, Self::B, Self::C, Self::D, Self::F];

    /// Canonical uppercase letter
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::A => "A",
            Self::B => "B",
            Self::C => "C",
            Self::D => "D",
            Self::F => "F",
        }
    }
}

/// A course grade as entered
///
/// Text outside the five recognized letters is kept (uppercased) rather than
/// rejected; it is worth zero base points.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Grade {
    /// A recognized letter
    Letter(LetterGrade),
    /// Anything else, uppercased and trimmed
    Unrecognized(String),
}

impl Grade {
    /// Parse grade text case-insensitively
    #[must_use]
    pub fn parse(text: &str) -> Self {
        let canonical = text.trim().to_ascii_uppercase();
        match canonical.as_str() {
            "A" => Self::Letter(LetterGrade::A),
            "B" => Self::Letter(LetterGrade::B),
            "C" => Self::Letter(LetterGrade::C),
            "D" => Self::Letter(LetterGrade::D),
            "F" => Self::Letter(LetterGrade::F),
            _ => Self::Unrecognized(canonical),
        }
    }

    /// The recognized letter, if any
    #[must_use]
    pub const fn letter(&self) -> Option<LetterGrade> {
        match self {
            Self::Letter(letter) => Some(*letter),
            Self::Unrecognized(_) => None,
        }
    }
}

impl From<LetterGrade> for Grade {
    fn from(letter: LetterGrade) -> Self {
        Self::Letter(letter)
    }
}

impl From<String> for Grade {
    fn from(text: String) -> Self {
        Self::parse(&text)
    }
}

impl From<Grade> for String {
    fn from(grade: Grade) -> Self {
        grade.to_string()
    }
}

impl fmt::Display for Grade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Letter(letter) => f.write_str(letter.as_str()),
            Self::Unrecognized(text) => f.write_str(text),
        }
    }
}

/// Course difficulty category
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Weighting {
    /// Regular course
    Normal,
    /// Honors course
    Honors,
    /// Advanced Placement course
    Ap,
    /// Anything else, lowercased and trimmed
    Unrecognized(String),
}

impl Weighting {
    /// The three recognized categories
    pub const RECOGNIZED: [Self; 3] = [Self::Normal, Self::Honors, Self::Ap];

    /// Parse weighting text case-insensitively
    #[must_use]
    pub fn parse(text: &str) -> Self {
        let canonical = text.trim().to_ascii_lowercase();
        match canonical.as_str() {
            "normal" => Self::Normal,
            "honors" => Self::Honors,
            "ap" => Self::Ap,
            _ => Self::Unrecognized(canonical),
        }
    }
}

impl From<String> for Weighting {
    fn from(text: String) -> Self {
        Self::parse(&text)
    }
}

impl From<Weighting> for String {
    fn from(weighting: Weighting) -> Self {
        weighting.to_string()
    }
}

impl fmt::Display for Weighting {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Normal => f.write_str("normal"),
            Self::Honors => f.write_str("honors"),
            Self::Ap => f.write_str("ap"),
            Self::Unrecognized(text) => f.write_str(text),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grade_parse_is_case_insensitive() {
        assert_eq!(Grade::parse("a"), Grade::Letter(LetterGrade::A));
        assert_eq!(Grade::parse(" f "), Grade::Letter(LetterGrade::F));
        assert_eq!(Grade::parse("b").to_string(), "B");
    }

    #[test]
    fn test_grade_parse_keeps_unrecognized_text() {
        assert_eq!(Grade::parse("b+"), Grade::Unrecognized("B+".to_string()));
        assert_eq!(Grade::parse("E").letter(), None);
    }

    #[test]
    fn test_weighting_parse_is_case_insensitive() {
        assert_eq!(Weighting::parse("AP"), Weighting::Ap);
        assert_eq!(Weighting::parse("Honors"), Weighting::Honors);
        assert_eq!(Weighting::parse("NORMAL"), Weighting::Normal);
        assert_eq!(
            Weighting::parse("Dual Credit"),
            Weighting::Unrecognized("dual credit".to_string())
        );
    }

    #[test]
    fn test_serde_uses_canonical_text() {
        let json = serde_json::to_string(&Weighting::Ap).unwrap();
        assert_eq!(json, "\"ap\"");

        let grade: Grade = serde_json::from_str("\"c\"").unwrap();
        assert_eq!(grade, Grade::Letter(LetterGrade::C));
    }
}
