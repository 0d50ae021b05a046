//! Configuration for the tapline CLI
//!
//! Command-line flags with environment fallbacks, plus validation and
//! the verbose/quiet to log-level mapping.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};

/// tapline - parse Test Anything Protocol streams
#[derive(Parser, Debug, Clone, Default)]
#[command(name = "tapline")]
#[command(version, about, long_about = None)]
pub struct Config {
    /// TAP input file
    ///
    /// Reads from stdin when omitted, so producers can pipe straight in:
    ///   perl t/basic.t | tapline
    pub input: Option<PathBuf>,

    /// Output format for the parsed session
    #[arg(short, long, env = "TAPLINE_FORMAT", value_enum, default_value_t = Format::Summary)]
    pub format: Format,

    /// Enable verbose logging (debug level)
    ///
    /// Logs are written to stderr so piped TAP output stays clean.
    #[arg(short, long, default_value = "false")]
    pub verbose: bool,

    /// Quiet mode - suppress info-level logs
    ///
    /// Only errors and warnings will be logged.
    #[arg(short, long, default_value = "false")]
    pub quiet: bool,
}

/// Available output formats
#[derive(ValueEnum, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Format {
    /// Human-readable summary with failing tests listed
    #[default]
    Summary,
    /// Full session report as pretty-printed JSON
    Json,
}

impl Config {
    /// Validate the configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the input path is specified but missing, or
    /// points at a directory.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(ref input) = self.input {
            if !input.exists() {
                return Err(ConfigError::InputNotFound(input.clone()));
            }
            if input.is_dir() {
                return Err(ConfigError::InputIsDirectory(input.clone()));
            }
        }
        Ok(())
    }

    /// Get the log level based on verbose/quiet flags
    #[must_use]
    pub fn log_level(&self) -> tracing::Level {
        if self.verbose {
            tracing::Level::DEBUG
        } else if self.quiet {
            tracing::Level::WARN
        } else {
            tracing::Level::INFO
        }
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Input path not found
    #[error("input file not found: {}", .0.display())]
    InputNotFound(PathBuf),

    /// Input path is a directory
    #[error("input path is a directory: {}", .0.display())]
    InputIsDirectory(PathBuf),
}
