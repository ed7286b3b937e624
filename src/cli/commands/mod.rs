//! CLI command handlers for `transcripts`.
//!
//! Each command is implemented in its own submodule. Handlers return
//! `Err(message)` with a ready-to-print `✗` line on failure.

pub mod compute;
pub mod config;
pub mod import;
pub mod preview;
pub mod validate;

use std::path::{Path, PathBuf};
use transcript_analytics::config::Config;
use transcript_analytics::core::models::RawTranscript;
use transcript_analytics::error;

/// Read and shape-check a transcript JSON file
pub fn read_transcript(input_file: &Path) -> Result<RawTranscript, String> {
    let content = std::fs::read_to_string(input_file).map_err(|e| {
        error!("Failed to read {}: {e}", input_file.display());
        format!("✗ Failed to read {}: {e}", input_file.display())
    })?;

    RawTranscript::from_json_str(&content).map_err(|e| {
        error!("Rejected transcript {}: {e}", input_file.display());
        format!("✗ {}: {e}", input_file.display())
    })
}

/// Resolve where a command writes its output
///
/// An explicit path wins; otherwise `<out_dir>/<stem><suffix>`, creating
/// `out_dir` if needed.
pub fn output_path(
    input_file: &Path,
    output_file: Option<&Path>,
    config: &Config,
    suffix: &str,
) -> Result<PathBuf, String> {
    if let Some(output) = output_file {
        return Ok(output.to_path_buf());
    }

    let out_dir = PathBuf::from(&config.paths.out_dir);
    std::fs::create_dir_all(&out_dir).map_err(|e| {
        format!(
            "✗ Failed to create output directory {}: {e}",
            out_dir.display()
        )
    })?;

    let filename = input_file
        .file_stem()
        .and_then(|stem| stem.to_str())
        .unwrap_or("transcript");
    Ok(out_dir.join(format!("{filename}{suffix}")))
}

/// Write a value as pretty JSON
pub fn write_json<T: serde::Serialize>(value: &T, path: &Path) -> Result<(), String> {
    let json = serde_json::to_string_pretty(value)
        .map_err(|e| format!("✗ Failed to serialize output: {e}"))?;
    std::fs::write(path, json + "\n")
        .map_err(|e| format!("✗ Failed to write {}: {e}", path.display()))
}
