//! Validate command handler

use super::read_transcript;
use std::path::Path;
use transcript_analytics::config::Config;
use transcript_analytics::core::pipeline::save_transcript;
use transcript_analytics::warn;

/// Run the edit-save checks on a transcript file without writing anything.
pub fn run(input_file: &Path, config: &Config) -> Result<(), String> {
    let raw = read_transcript(input_file)?;

    match save_transcript(&raw, &config.normalize_options(), &config.grading_policy()) {
        Ok(transcript) => {
            println!(
                "✓ {} is valid: {} terms, cumulative GPA {:.2} over {} credits",
                input_file.display(),
                transcript.term_count(),
                transcript.cumulative_gpa,
                transcript.cumulative_credits
            );
            Ok(())
        }
        Err(e) => {
            warn!("Validation failed for {}: {e}", input_file.display());
            Err(format!("✗ {}: {e}", input_file.display()))
        }
    }
}
