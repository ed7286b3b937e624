//! Preview command handler

use super::read_transcript;
use std::path::Path;
use transcript_analytics::config::Config;
use transcript_analytics::core::pipeline::{build_transcript, preview_transcript, TranscriptPreview};

/// Print a transcript padded to the configured slot count, with running totals.
pub fn run(input_file: &Path, json: bool, config: &Config) -> Result<(), String> {
    let raw = read_transcript(input_file)?;
    let options = config.normalize_options();
    let policy = config.grading_policy();

    let transcript = build_transcript(&raw, &options, &policy);
    let preview = preview_transcript(&transcript, &options, &policy);

    if json {
        let out = serde_json::to_string_pretty(&preview)
            .map_err(|e| format!("✗ Failed to serialize preview: {e}"))?;
        println!("{out}");
    } else {
        print!("{}", render_table(&preview));
    }
    Ok(())
}

fn render_table(preview: &TranscriptPreview) -> String {
    let mut out = format!("\n=== Transcript preview: {} ===\n\n", preview.student_ref);
    out.push_str(&format!(
        "{:<6} {:<10} {:>7} {:>8} {:>8} {:>9} {:>9}\n",
        "Grade", "Years", "Courses", "GPA", "Credits", "Cum GPA", "Cum Cred"
    ));

    for row in &preview.terms {
        let term = &row.term;
        out.push_str(&format!(
            "{:<6} {:<10} {:>7} {:>8.2} {:>8} {:>9.2} {:>9}\n",
            term.grade_level,
            term.year_label(),
            term.courses.len(),
            term.gpa,
            term.total_credits,
            row.cumulative.gpa,
            row.cumulative.total_credits
        ));
    }

    out.push_str(&format!(
        "\nCumulative GPA: {:.2}  Credits: {}\n",
        preview.cumulative_gpa, preview.cumulative_credits
    ));
    out
}
