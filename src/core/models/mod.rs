//! Data models for transcripts

pub mod course;
pub mod grade;
mod lenient;
pub mod raw;
pub mod term;
pub mod transcript;

pub use course::CourseRecord;
pub use grade::{Grade, LetterGrade, Weighting};
pub use raw::{RawCourseRecord, RawTermRecord, RawTranscript};
pub use term::TermRecord;
pub use transcript::Transcript;
