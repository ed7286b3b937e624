//! Compute command handler

use super::{output_path, read_transcript, write_json};
use std::path::Path;
use transcript_analytics::config::Config;
use transcript_analytics::core::pipeline::build_transcript;
use transcript_analytics::info;

/// Normalize and recalculate a transcript file, writing canonical JSON.
pub fn run(
    input_file: &Path,
    output_file: Option<&Path>,
    config: &Config,
    verbose: bool,
) -> Result<(), String> {
    let raw = read_transcript(input_file)?;
    let transcript = build_transcript(&raw, &config.normalize_options(), &config.grading_policy());

    let destination = output_path(input_file, output_file, config, ".computed.json")?;
    write_json(&transcript, &destination)?;

    println!("✓ Computed transcript written to: {}", destination.display());
    info!("Computed {} -> {}", input_file.display(), destination.display());

    if verbose {
        println!(
            "\n=== {} terms, {} courses ===",
            transcript.term_count(),
            transcript.course_count()
        );
        println!("Cumulative GPA: {:.2}", transcript.cumulative_gpa);
        println!("Cumulative Credits: {}", transcript.cumulative_credits);
    }
    Ok(())
}
