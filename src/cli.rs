// src/cli.rs

//! CLI argument parsing using `clap`.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};

use crate::config::default_config_path;

/// Command-line arguments for `storyboard`.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "storyboard",
    version,
    about = "Watch a folder for stories and portraits and turn them into line-art storyboards.",
    long_about = None
)]
pub struct CliArgs {
    /// Path to the config file (TOML).
    ///
    /// Default: `Storyboard.toml` in the current working directory. The
    /// default file may be absent, in which case built-in defaults are used;
    /// a path given here must exist.
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Directory to watch for project folders (overrides `[paths].input_dir`).
    #[arg(long, value_name = "DIR")]
    pub input_dir: Option<PathBuf>,

    /// Where storyboards are written (overrides `[paths].output_dir`).
    #[arg(long, value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    /// Where consumed projects are moved (overrides `[paths].processed_dir`).
    #[arg(long, value_name = "DIR")]
    pub processed_dir: Option<PathBuf>,

    /// Logging level (error, warn, info, debug, trace).
    ///
    /// If omitted, `STORYBOARD_LOG` or a default level will be used.
    #[arg(long, value_enum, value_name = "LEVEL")]
    pub log_level: Option<LogLevel>,

    /// Load + validate config, report available collaborators, then exit.
    #[arg(long)]
    pub dry_run: bool,
}

impl CliArgs {
    /// The config path to load and whether the user asked for it explicitly.
    pub fn config_path(&self) -> (PathBuf, bool) {
        match &self.config {
            Some(path) => (path.clone(), true),
            None => (default_config_path(), false),
        }
    }
}

/// Log level as exposed on the CLI.
#[derive(Debug, Copy, Clone, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// Convenience wrapper around `CliArgs::parse()`.
pub fn parse() -> CliArgs {
    CliArgs::parse()
}
