//! Import command handler

use super::{output_path, write_json};
use serde::Serialize;
use std::path::Path;
use transcript_analytics::config::Config;
use transcript_analytics::core::import::{build_import_drafts, rows_from_json_str, TermGrouping};
use transcript_analytics::core::models::Transcript;
use transcript_analytics::{error, info};

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct DraftOutput<'a> {
    first_name: &'a str,
    last_name: &'a str,
    transcript: &'a Transcript,
}

/// Draft one transcript per student from roster rows and write them as a JSON array.
pub fn run(
    input_file: &Path,
    output_file: Option<&Path>,
    by_title: bool,
    config: &Config,
    verbose: bool,
) -> Result<(), String> {
    let content = std::fs::read_to_string(input_file)
        .map_err(|e| format!("✗ Failed to read {}: {e}", input_file.display()))?;
    let rows = rows_from_json_str(&content).map_err(|e| {
        error!("Failed to load roster {}: {e}", input_file.display());
        format!("✗ Failed to load {}: {e}", input_file.display())
    })?;

    let grouping = if by_title {
        TermGrouping::CourseTitle
    } else {
        TermGrouping::AcademicYear
    };
    let drafts = build_import_drafts(
        &rows,
        grouping,
        config.normalize_options().base_grade_level,
        &config.grading_policy(),
    );

    let output: Vec<DraftOutput<'_>> = drafts
        .iter()
        .map(|draft| DraftOutput {
            first_name: &draft.student.first,
            last_name: &draft.student.last,
            transcript: &draft.transcript,
        })
        .collect();

    let destination = output_path(input_file, output_file, config, ".drafts.json")?;
    write_json(&output, &destination)?;

    println!(
        "✓ {} transcript drafts written to: {}",
        drafts.len(),
        destination.display()
    );
    info!("Imported {} rows from {}", rows.len(), input_file.display());

    if verbose {
        for draft in &drafts {
            println!(
                "  {}: {} terms, GPA {:.2}, {} credits",
                draft.student,
                draft.transcript.term_count(),
                draft.transcript.cumulative_gpa,
                draft.transcript.cumulative_credits
            );
        }
    }
    Ok(())
}
