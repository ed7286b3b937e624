//! `config` command: show and edit the stored settings

use crate::args::ConfigSubcommand;
use std::io::{self, Write};
use transcript_analytics::config::Config;

/// Dispatch config subcommands
pub fn run(
    subcommand: Option<ConfigSubcommand>,
    config: &mut Config,
    defaults: &Config,
) -> Result<(), String> {
    match subcommand {
        None => {
            show_all(config);
            Ok(())
        }
        Some(ConfigSubcommand::Get { key: None }) => {
            show_all(config);
            Ok(())
        }
        Some(ConfigSubcommand::Get { key: Some(key) }) => {
            let value = config
                .get(&key)
                .ok_or_else(|| format!("Unknown config key: '{key}'"))?;
            println!("{}", describe_value(&key, &value));
            Ok(())
        }
        Some(ConfigSubcommand::Set { key, value }) => {
            config.set(&key, &value)?;
            persist(config)?;
            let stored = config.get(&key).unwrap_or_default();
            println!("✓ {key} = {}", describe_value(&key, &stored));
            Ok(())
        }
        Some(ConfigSubcommand::Unset { key }) => {
            config.unset(&key, defaults)?;
            persist(config)?;
            let stored = config.get(&key).unwrap_or_default();
            println!("✓ {key} reset to default ({})", describe_value(&key, &stored));
            Ok(())
        }
        Some(ConfigSubcommand::Reset) => reset(),
    }
}

fn show_all(config: &Config) {
    println!("\n=== Transcript configuration ===\n");
    print!("{config}");
    println!("\nFile: {}", Config::get_config_file_path().display());
}

fn persist(config: &Config) -> Result<(), String> {
    config
        .save()
        .map_err(|e| format!("Failed to save config: {e}"))
}

/// Human-readable form of a stored value; empty optional keys get a label
fn describe_value(key: &str, value: &str) -> String {
    if !value.is_empty() {
        return value.to_string();
    }
    match key.replace('-', "_").as_str() {
        "max_grade_points" => "unbounded".to_string(),
        "student_start_year" => "current year".to_string(),
        "file" => "no log file".to_string(),
        _ => "(empty)".to_string(),
    }
}

fn reset() -> Result<(), String> {
    if !Config::get_config_file_path().exists() {
        println!("✓ Config is already at defaults");
        return Ok(());
    }

    print!("Reset all transcript settings to defaults? (y/n): ");
    io::stdout().flush().ok();

    let mut response = String::new();
    io::stdin().read_line(&mut response).ok();

    let answer = response.trim();
    if answer.eq_ignore_ascii_case("y") || answer.eq_ignore_ascii_case("yes") {
        Config::reset().map_err(|e| format!("Failed to remove config file: {e}"))?;
        println!("✓ Config reset to defaults");
    } else {
        println!("✗ Reset cancelled");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_describe_value_labels_cleared_keys() {
        assert_eq!(describe_value("max_grade_points", ""), "unbounded");
        assert_eq!(describe_value("max-grade-points", ""), "unbounded");
        assert_eq!(describe_value("student_start_year", ""), "current year");
        assert_eq!(describe_value("out_dir", ""), "(empty)");
        assert_eq!(describe_value("max_grade_points", "4.5"), "4.5");
    }

    #[test]
    fn test_zero_ceiling_reads_back_as_unbounded() {
        let mut config = Config::from_defaults();
        config.set("max_grade_points", "0").unwrap();
        let stored = config.get("max_grade_points").unwrap();
        assert_eq!(describe_value("max_grade_points", &stored), "unbounded");
    }
}
