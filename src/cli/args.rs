//! CLI argument definitions for `transcripts`

use clap::{builder::BoolishValueParser, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use transcript_analytics::config::ConfigOverrides;
use transcript_analytics::logger::Level;

/// CLI log level argument
///
/// Converts to lowercase strings for config storage and to `logger::Level`
/// for runtime use.
#[derive(Copy, Clone, Debug, ValueEnum, PartialEq, Eq)]
pub enum LogLevelArg {
    /// Error-level logging
    Error,
    /// Warning-level logging
    Warn,
    /// Info-level logging
    Info,
    /// Debug-level logging
    Debug,
}

impl From<LogLevelArg> for Level {
    fn from(arg: LogLevelArg) -> Self {
        match arg {
            LogLevelArg::Error => Self::Error,
            LogLevelArg::Warn => Self::Warn,
            LogLevelArg::Info => Self::Info,
            LogLevelArg::Debug => Self::Debug,
        }
    }
}

impl std::fmt::Display for LogLevelArg {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let as_str = match self {
            Self::Error => "error",
            Self::Warn => "warn",
            Self::Info => "info",
            Self::Debug => "debug",
        };
        write!(f, "{as_str}")
    }
}

#[derive(Debug, Subcommand)]
pub enum ConfigSubcommand {
    /// Display configuration values.
    ///
    /// If a KEY is provided, displays only that configuration value.
    /// If no KEY is provided, displays all configuration values.
    Get {
        /// Optional configuration key to display (e.g., `level`, `max_grade_points`, `out_dir`)
        #[arg(value_name = "KEY")]
        key: Option<String>,
    },
    /// Set a configuration value.
    Set {
        /// Configuration key to set
        #[arg(value_name = "KEY")]
        key: String,
        /// Value to set
        #[arg(value_name = "VALUE")]
        value: String,
    },
    /// Unset a configuration value.
    Unset {
        /// Configuration key to unset
        #[arg(value_name = "KEY")]
        key: String,
    },
    /// Reset configuration to defaults (requires confirmation).
    Reset,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Manage configuration.
    ///
    /// If no subcommand is provided, displays all configuration values.
    Config {
        #[command(subcommand)]
        subcommand: Option<ConfigSubcommand>,
    },
    /// Compute term and cumulative statistics for a transcript JSON file.
    ///
    /// Missing years are inferred and out-of-order years corrected; the
    /// canonical transcript is written as JSON.
    Compute {
        /// Path to a transcript JSON file
        #[arg(value_name = "FILE")]
        input_file: PathBuf,

        /// Output file path (optional; defaults to `<out_dir>/<name>.computed.json`)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,
    },
    /// Check a transcript JSON file the way a save would.
    ///
    /// Fails when any term has an end year that is not after its start year.
    Validate {
        /// Path to a transcript JSON file
        #[arg(value_name = "FILE")]
        input_file: PathBuf,
    },
    /// Show a transcript laid out in fixed term slots with running totals.
    Preview {
        /// Path to a transcript JSON file
        #[arg(value_name = "FILE")]
        input_file: PathBuf,

        /// Number of term slots (default: config `preview_terms`)
        #[arg(long, value_name = "N")]
        terms: Option<usize>,

        /// Print the preview as JSON instead of a table
        #[arg(long)]
        json: bool,
    },
    /// Draft transcripts from roster rows, one per student.
    ///
    /// The input is a JSON array of rows with `studentName`, `courseName`,
    /// `startDate` and either `gradePercent` or `letterGrade`.
    Import {
        /// Path to a roster rows JSON file
        #[arg(value_name = "FILE")]
        input_file: PathBuf,

        /// Output file path (optional; defaults to `<out_dir>/<name>.drafts.json`)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Group courses into terms by grade level guessed from course titles
        /// instead of by academic year
        #[arg(long)]
        by_title: bool,
    },
}

#[derive(Parser, Debug)]
#[command(
    name = "transcripts",
    about = "Transcript GPA and credit calculator",
    version = env!("CARGO_PKG_VERSION")
)]
pub struct Cli {
    /// Set the runtime log level (error|warn|info|debug). Falls back to config if omitted.
    #[arg(long, value_enum)]
    pub log_level: Option<LogLevelArg>,

    /// Enable verbose output (runtime only)
    #[arg(short = 'v', long = "verbose")]
    pub verbose: bool,

    /// Enable debug-level logging and runtime debug flag (shorthand)
    #[arg(long = "debug")]
    pub debug_flag: bool,

    /// Write runtime logs to a file
    #[arg(long, value_name = "PATH")]
    pub log_file: Option<PathBuf>,

    // --- Config overrides ---
    /// Override config logging level (stored in config file)
    #[arg(long = "config-level", value_enum)]
    pub config_level: Option<LogLevelArg>,

    /// Override config log file path
    #[arg(long = "config-log-file", value_name = "PATH")]
    pub config_log_file: Option<PathBuf>,

    /// Override config verbose flag (true/false)
    #[arg(long = "config-verbose", value_parser = BoolishValueParser::new())]
    pub config_verbose: Option<bool>,

    /// Cap per-credit grade points (e.g. 4.5)
    #[arg(long = "max-grade-points", value_name = "POINTS")]
    pub max_grade_points: Option<f64>,

    /// Grade level of the first term in drafts and padded previews
    #[arg(long = "base-grade-level", value_name = "LEVEL")]
    pub base_grade_level: Option<i32>,

    /// Start year used for transcripts that carry none
    #[arg(long = "start-year", value_name = "YEAR")]
    pub start_year: Option<i32>,

    /// Override config output directory
    #[arg(long = "config-out-dir", value_name = "DIR")]
    pub config_out_dir: Option<PathBuf>,

    /// Override config output directory (short form)
    #[arg(long = "out-dir", value_name = "DIR")]
    pub out_dir: Option<PathBuf>,

    /// Subcommand to execute.
    /// A subcommand is required to run the CLI.
    #[command(subcommand)]
    pub command: Command,
}

impl Cli {
    /// Convert CLI flags into config overrides
    ///
    /// `--out-dir` takes precedence over `--config-out-dir` when both are given.
    pub fn to_config_overrides(&self) -> ConfigOverrides {
        let preview_terms = match self.command {
            Command::Preview { terms, .. } => terms,
            _ => None,
        };

        ConfigOverrides {
            level: self.config_level.map(|lvl| lvl.to_string().to_lowercase()),
            file: self
                .config_log_file
                .as_ref()
                .map(|p| p.to_string_lossy().to_string()),
            verbose: self.config_verbose,
            max_grade_points: self.max_grade_points,
            preview_terms,
            base_grade_level: self.base_grade_level,
            student_start_year: self.start_year,
            out_dir: self
                .out_dir
                .as_ref()
                .or(self.config_out_dir.as_ref())
                .map(|p| p.to_string_lossy().to_string()),
        }
    }
}
