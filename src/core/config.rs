//! Configuration module for transcript analytics

use crate::core::grading::GradingPolicy;
use crate::core::normalize::{NormalizeOptions, DEFAULT_BASE_GRADE_LEVEL, DEFAULT_PREVIEW_TERMS};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

/// Default CLI configuration loaded based on build profile.
/// Uses release defaults in release mode, debug defaults in debug mode.
#[cfg(not(debug_assertions))]
const CONFIG_DEFAULTS: &str = include_str!("../assets/DefaultCLIConfigRelease.toml");

#[cfg(debug_assertions)]
const CONFIG_DEFAULTS: &str = include_str!("../assets/DefaultCLIConfigDebug.toml");

#[cfg(not(debug_assertions))]
const CONFIG_FILE_NAME: &str = "config.toml";

#[cfg(debug_assertions)]
const CONFIG_FILE_NAME: &str = "dconfig.toml";

/// Variable expanded to the config directory inside path values
const DIR_VARIABLE: &str = "$TRANSCRIPTS";

/// Logging configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (error, warn, info, debug)
    #[serde(default)]
    pub level: String,
    /// Log file path
    #[serde(default)]
    pub file: String,
    /// Enable verbose output
    #[serde(default)]
    pub verbose: bool,
}

/// Grade-point configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GradingConfig {
    /// Ceiling on per-credit grade points; absent means unbounded
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_grade_points: Option<f64>,
}

/// Normalization and preview configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NormalizeConfig {
    /// Term slots shown by `preview`
    #[serde(default)]
    pub preview_terms: usize,
    /// Grade level of the first term in drafts and padded previews
    #[serde(default)]
    pub base_grade_level: i32,
    /// Start year used when a transcript carries none; absent means the current year
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub student_start_year: Option<i32>,
}

/// Paths configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PathsConfig {
    /// Directory for computed transcript files
    #[serde(default)]
    pub out_dir: String,
}

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Logging settings
    pub logging: LoggingConfig,
    /// Grade-point settings
    #[serde(default)]
    pub grading: GradingConfig,
    /// Normalization settings
    #[serde(default)]
    pub normalize: NormalizeConfig,
    /// Path settings
    #[serde(default)]
    pub paths: PathsConfig,
}

/// Optional CLI overrides for configuration values
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    /// Override logging level
    pub level: Option<String>,
    /// Override log file path
    pub file: Option<String>,
    /// Override verbose flag
    pub verbose: Option<bool>,
    /// Override grade-point ceiling
    pub max_grade_points: Option<f64>,
    /// Override preview slot count
    pub preview_terms: Option<usize>,
    /// Override base grade level
    pub base_grade_level: Option<i32>,
    /// Override fallback student start year
    pub student_start_year: Option<i32>,
    /// Override output directory
    pub out_dir: Option<String>,
}

fn parse_value<T: std::str::FromStr>(key: &str, value: &str, kind: &str) -> Result<T, String> {
    value
        .trim()
        .parse::<T>()
        .map_err(|_| format!("Invalid {kind} value for '{key}': '{value}'"))
}

impl Config {
    /// Get the `$TRANSCRIPTS` directory path
    ///
    /// Returns:
    /// - Linux: `~/.config/transcripts`
    /// - macOS: `~/Library/Application Support/transcripts`
    /// - Windows: `%APPDATA%\transcripts`
    #[must_use]
    pub fn get_transcripts_dir() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("transcripts")
    }

    /// Merge missing fields from defaults into this config
    ///
    /// Used when loading so that fields added in newer versions pick up their
    /// defaults. Only empty (or zero) fields are filled.
    ///
    /// # Returns
    ///
    /// `true` if any fields were added/changed, `false` otherwise
    #[allow(clippy::useless_let_if_seq)]
    pub fn merge_defaults(&mut self, defaults: &Self) -> bool {
        let mut changed = false;

        if self.logging.level.is_empty() && !defaults.logging.level.is_empty() {
            self.logging.level.clone_from(&defaults.logging.level);
            changed = true;
        }
        if self.logging.file.is_empty() && !defaults.logging.file.is_empty() {
            self.logging.file.clone_from(&defaults.logging.file);
            changed = true;
        }

        if self.normalize.preview_terms == 0 && defaults.normalize.preview_terms > 0 {
            self.normalize.preview_terms = defaults.normalize.preview_terms;
            changed = true;
        }
        if self.normalize.base_grade_level == 0 && defaults.normalize.base_grade_level != 0 {
            self.normalize.base_grade_level = defaults.normalize.base_grade_level;
            changed = true;
        }

        if self.paths.out_dir.is_empty() && !defaults.paths.out_dir.is_empty() {
            self.paths.out_dir.clone_from(&defaults.paths.out_dir);
            changed = true;
        }

        changed
    }

    /// Apply CLI-provided overrides onto the loaded configuration
    ///
    /// Only non-`None` values replace config values; the file on disk is not
    /// touched.
    pub fn apply_overrides(&mut self, overrides: &ConfigOverrides) {
        if let Some(level) = &overrides.level {
            self.logging.level.clone_from(level);
        }
        if let Some(file) = &overrides.file {
            self.logging.file.clone_from(file);
        }
        if let Some(verbose) = overrides.verbose {
            self.logging.verbose = verbose;
        }

        if let Some(max) = overrides.max_grade_points {
            self.grading.max_grade_points = Some(max);
        }

        if let Some(terms) = overrides.preview_terms {
            self.normalize.preview_terms = terms;
        }
        if let Some(level) = overrides.base_grade_level {
            self.normalize.base_grade_level = level;
        }
        if let Some(year) = overrides.student_start_year {
            self.normalize.student_start_year = Some(year);
        }

        if let Some(out_dir) = &overrides.out_dir {
            self.paths.out_dir.clone_from(out_dir);
        }
    }

    /// Grade-point ceiling in effect
    ///
    /// Zero, negative and non-finite values mean unbounded, whether they came
    /// from the file, `set`, or a CLI override.
    #[must_use]
    pub fn max_grade_points(&self) -> Option<f64> {
        self.grading
            .max_grade_points
            .filter(|max| max.is_finite() && *max > 0.0)
    }

    /// Grading policy described by the `[grading]` section
    #[must_use]
    pub fn grading_policy(&self) -> GradingPolicy {
        GradingPolicy {
            max_grade_points: self.max_grade_points(),
        }
    }

    /// Normalization options described by the `[normalize]` section
    ///
    /// Zero values fall back to the built-in defaults.
    #[must_use]
    pub fn normalize_options(&self) -> NormalizeOptions {
        let mut options = NormalizeOptions::default();
        if let Some(year) = self.normalize.student_start_year {
            options.student_start_year = year;
        }
        options.preview_terms = if self.normalize.preview_terms == 0 {
            DEFAULT_PREVIEW_TERMS
        } else {
            self.normalize.preview_terms
        };
        options.base_grade_level = if self.normalize.base_grade_level == 0 {
            DEFAULT_BASE_GRADE_LEVEL
        } else {
            self.normalize.base_grade_level
        };
        options
    }

    /// Get the user config file path
    ///
    /// `config.toml` for release builds, `dconfig.toml` for debug builds, inside
    /// [`get_transcripts_dir`](Self::get_transcripts_dir).
    #[must_use]
    pub fn get_config_file_path() -> PathBuf {
        Self::get_transcripts_dir().join(CONFIG_FILE_NAME)
    }

    /// Expand `$TRANSCRIPTS` to the config directory
    #[must_use]
    fn expand_variables(value: &str) -> String {
        if value.contains(DIR_VARIABLE) {
            let dir = Self::get_transcripts_dir();
            value.replace(DIR_VARIABLE, dir.to_str().unwrap_or("."))
        } else {
            value.to_string()
        }
    }

    /// Initialize config from a TOML string
    ///
    /// `$TRANSCRIPTS` is expanded in path values. Missing fields use their serde
    /// defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML cannot be parsed or doesn't match the expected schema
    pub fn from_toml(toml_str: &str) -> Result<Self, toml::de::Error> {
        let mut config: Self = toml::from_str(toml_str)?;

        config.logging.file = Self::expand_variables(&config.logging.file);
        config.paths.out_dir = Self::expand_variables(&config.paths.out_dir);

        Ok(config)
    }

    /// Load configuration from embedded defaults
    ///
    /// # Panics
    /// Panics if the embedded default configuration is invalid TOML, which is
    /// caught by the test suite.
    #[must_use]
    pub fn from_defaults() -> Self {
        Self::from_toml(CONFIG_DEFAULTS).expect("Failed to parse compiled-in default configuration")
    }

    /// Load configuration from the user config file, creating it on first run
    ///
    /// Falls back to defaults if the file cannot be read or parsed.
    #[must_use]
    pub fn load() -> Self {
        Self::load_from(&Self::get_config_file_path())
    }

    /// Load configuration from `path`, creating it from defaults if missing
    ///
    /// Fields missing from an existing file are filled from defaults and the
    /// file is rewritten.
    #[must_use]
    pub fn load_from(path: &Path) -> Self {
        let defaults = Self::from_defaults();

        if path.exists() {
            if let Ok(content) = fs::read_to_string(path) {
                if let Ok(mut config) = Self::from_toml(&content) {
                    if config.merge_defaults(&defaults) {
                        let _ = config.save_to(path);
                    }
                    return config;
                }
            }
            crate::warn!("Ignoring unreadable config file {}", path.display());
        } else {
            // First run
            let _ = defaults.save_to(path);
            return defaults;
        }

        defaults
    }

    /// Save configuration to the user config file
    ///
    /// # Errors
    /// Returns an error if the directory cannot be created or the file cannot
    /// be written.
    pub fn save(&self) -> Result<(), Box<dyn std::error::Error>> {
        self.save_to(&Self::get_config_file_path())
    }

    /// Save configuration as TOML to `path`, creating parent directories
    ///
    /// # Errors
    /// Returns an error if serialization, directory creation, or the write fails.
    pub fn save_to(&self, path: &Path) -> Result<(), Box<dyn std::error::Error>> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let toml_str = toml::to_string_pretty(self)?;
        fs::write(path, toml_str)?;
        Ok(())
    }

    /// Get a configuration value by key
    ///
    /// Supported keys: `level`, `file`, `verbose`, `max_grade_points`,
    /// `preview_terms`, `base_grade_level`, `student_start_year`, `out_dir`.
    /// Unset optional values read as an empty string.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<String> {
        match key {
            "level" => Some(self.logging.level.clone()),
            "file" => Some(self.logging.file.clone()),
            "verbose" => Some(self.logging.verbose.to_string()),
            "max_grade_points" | "max-grade-points" => Some(
                self.max_grade_points()
                    .map(|v| v.to_string())
                    .unwrap_or_default(),
            ),
            "preview_terms" | "preview-terms" => Some(self.normalize.preview_terms.to_string()),
            "base_grade_level" | "base-grade-level" => {
                Some(self.normalize.base_grade_level.to_string())
            }
            "student_start_year" | "student-start-year" => Some(
                self.normalize
                    .student_start_year
                    .map(|v| v.to_string())
                    .unwrap_or_default(),
            ),
            "out_dir" | "out-dir" => Some(self.paths.out_dir.clone()),
            _ => None,
        }
    }

    /// Set a configuration value by key
    ///
    /// For `max_grade_points` and `student_start_year`, an empty value or
    /// `none` clears the setting. Call [`save()`](Config::save) to persist.
    ///
    /// # Errors
    /// Returns an error if the key is not recognized or the value does not
    /// parse for that key.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), String> {
        let cleared = value.trim().is_empty() || value.trim().eq_ignore_ascii_case("none");
        match key {
            "level" => self.logging.level = value.to_string(),
            "file" => self.logging.file = value.to_string(),
            "verbose" => {
                self.logging.verbose = value
                    .parse::<bool>()
                    .map_err(|_| format!("Invalid boolean value for 'verbose': '{value}'"))?;
            }
            "max_grade_points" | "max-grade-points" => {
                self.grading.max_grade_points = if cleared {
                    None
                } else {
                    let max: f64 = parse_value(key, value, "number")?;
                    if !max.is_finite() || max < 0.0 {
                        return Err(format!("Invalid number value for '{key}': '{value}'"));
                    }
                    Some(max).filter(|m| *m > 0.0)
                };
            }
            "preview_terms" | "preview-terms" => {
                self.normalize.preview_terms = parse_value(key, value, "count")?;
            }
            "base_grade_level" | "base-grade-level" => {
                self.normalize.base_grade_level = parse_value(key, value, "integer")?;
            }
            "student_start_year" | "student-start-year" => {
                self.normalize.student_start_year = if cleared {
                    None
                } else {
                    Some(parse_value(key, value, "year")?)
                };
            }
            "out_dir" | "out-dir" => self.paths.out_dir = value.to_string(),
            _ => return Err(format!("Unknown config key: '{key}'")),
        }
        Ok(())
    }

    /// Unset a configuration value by key (reset to default)
    ///
    /// Call [`save()`](Config::save) to persist.
    ///
    /// # Errors
    /// Returns an error if the key is not recognized.
    pub fn unset(&mut self, key: &str, defaults: &Self) -> Result<(), String> {
        match key {
            "level" => self.logging.level.clone_from(&defaults.logging.level),
            "file" => self.logging.file.clone_from(&defaults.logging.file),
            "verbose" => self.logging.verbose = defaults.logging.verbose,
            "max_grade_points" | "max-grade-points" => {
                self.grading.max_grade_points = defaults.grading.max_grade_points;
            }
            "preview_terms" | "preview-terms" => {
                self.normalize.preview_terms = defaults.normalize.preview_terms;
            }
            "base_grade_level" | "base-grade-level" => {
                self.normalize.base_grade_level = defaults.normalize.base_grade_level;
            }
            "student_start_year" | "student-start-year" => {
                self.normalize.student_start_year = defaults.normalize.student_start_year;
            }
            "out_dir" | "out-dir" => self.paths.out_dir.clone_from(&defaults.paths.out_dir),
            _ => return Err(format!("Unknown config key: '{key}'")),
        }
        Ok(())
    }

    /// Reset all configuration to defaults by deleting the config file
    ///
    /// The next [`load()`](Config::load) recreates it. Succeeds if there is no
    /// file.
    ///
    /// # Errors
    /// Returns an error if the file exists but cannot be deleted.
    pub fn reset() -> Result<(), std::io::Error> {
        let config_file = Self::get_config_file_path();
        if config_file.exists() {
            fs::remove_file(config_file)?;
        }
        Ok(())
    }
}

impl fmt::Display for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "[logging]")?;
        writeln!(f, "  level = \"{}\"", self.logging.level)?;
        writeln!(f, "  file = \"{}\"", self.logging.file)?;
        writeln!(f, "  verbose = {}", self.logging.verbose)?;

        writeln!(f, "\n[grading]")?;
        match self.max_grade_points() {
            Some(max) => writeln!(f, "  max_grade_points = {max}")?,
            None => writeln!(f, "  max_grade_points = (unbounded)")?,
        }

        writeln!(f, "\n[normalize]")?;
        writeln!(f, "  preview_terms = {}", self.normalize.preview_terms)?;
        writeln!(f, "  base_grade_level = {}", self.normalize.base_grade_level)?;
        match self.normalize.student_start_year {
            Some(year) => writeln!(f, "  student_start_year = {year}")?,
            None => writeln!(f, "  student_start_year = (current year)")?,
        }

        writeln!(f, "\n[paths]")?;
        writeln!(f, "  out_dir = \"{}\"", self.paths.out_dir)?;

        Ok(())
    }
}
