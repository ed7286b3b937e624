//! Command-line interface entry point for `transcripts`

mod args;
mod commands;

use args::{Cli, Command};
use clap::Parser;
use transcript_analytics::config::Config;
use transcript_analytics::info;
use transcript_analytics::logger::{enable_debug, enable_verbose, init_file_logging, set_level, Level};

fn main() {
    let args = Cli::parse();

    // Load configuration once at startup and apply CLI overrides to it
    let mut config = Config::load();
    let defaults = Config::from_defaults();
    config.apply_overrides(&args.to_config_overrides());

    // CLI flag overrides config logging.level; fallback warn
    let effective_level = args
        .log_level
        .map(std::convert::Into::into)
        .or_else(|| parse_level(&config.logging.level))
        .unwrap_or(Level::Warn);

    let mut level = effective_level;
    if args.debug_flag || level == Level::Debug {
        level = Level::Debug;
        enable_debug();
    }

    let verbose = args.verbose || config.logging.verbose;
    if verbose {
        enable_verbose();
    }
    set_level(level);

    // CLI flag wins, otherwise use config logging.file if set
    let config_log_path: Option<std::path::PathBuf> = if config.logging.file.is_empty() {
        None
    } else {
        Some(std::path::PathBuf::from(&config.logging.file))
    };

    if let Some(log_path) = args.log_file.as_ref().or(config_log_path.as_ref()) {
        if let Some(parent) = log_path.parent() {
            let _ = std::fs::create_dir_all(parent);
        }
        let display_path = log_path.to_string_lossy();
        if init_file_logging(log_path) {
            if verbose {
                eprintln!("✓ File logging initialized at: {display_path}");
            } else {
                info!("File logging initialized at: {display_path}");
            }
        } else {
            eprintln!("✗ Failed to initialize file logging at: {display_path}");
        }
    }

    let outcome = match args.command {
        Command::Config { subcommand } => commands::config::run(subcommand, &mut config, &defaults),
        Command::Compute { input_file, output } => {
            commands::compute::run(&input_file, output.as_deref(), &config, verbose)
        }
        Command::Validate { input_file } => commands::validate::run(&input_file, &config),
        Command::Preview {
            input_file, json, ..
        } => commands::preview::run(&input_file, json, &config),
        Command::Import {
            input_file,
            output,
            by_title,
        } => commands::import::run(&input_file, output.as_deref(), by_title, &config, verbose),
    };

    if let Err(message) = outcome {
        eprintln!("{message}");
        std::process::exit(1);
    }
}

fn parse_level(val: &str) -> Option<Level> {
    match val.to_ascii_lowercase().as_str() {
        "error" => Some(Level::Error),
        "warn" => Some(Level::Warn),
        "info" => Some(Level::Info),
        "debug" => Some(Level::Debug),
        _ => None,
    }
}
