//! Command-line argument definitions for the table flattener
//!
//! This module defines the CLI interface using the clap derive API.

use crate::constants::{APP_DIR_NAME, CONFIG_FILE_NAME};
use crate::{Error, Result};
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// CLI arguments for the table flattener
///
/// Converts dated, whitespace-delimited text tables into flattened
/// multi-dimensional records with per-dimension metadata.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "table-flattener",
    version,
    about = "Flatten dated text tables into multi-dimensional records",
    long_about = "Reads one whitespace-delimited table file per day for every configured table, \
                  selects the data rows by configurable line numbers or patterns, and writes \
                  the flattened records together with per-dimension metadata as JSON."
)]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands
#[derive(Debug, Clone, Subcommand)]
pub enum Commands {
    /// Convert the configured tables to JSON
    Convert(ConvertArgs),
    /// Show the date template derived from an example file path
    Pattern(PatternArgs),
}

/// Arguments for the convert command
#[derive(Debug, Clone, Parser)]
pub struct ConvertArgs {
    /// Path to the JSON configuration file
    ///
    /// If not specified, uses ./config.json, then
    /// <user config dir>/table-flattener/config.json
    #[arg(
        short = 'c',
        long = "config",
        value_name = "FILE",
        help = "Path to configuration file (JSON format)"
    )]
    pub config_file: Option<PathBuf>,

    /// Output file for the converted tables
    ///
    /// If not specified, writes to stdout
    #[arg(
        short = 'o',
        long = "output",
        value_name = "FILE",
        help = "Output file for the converted tables"
    )]
    pub output_path: Option<PathBuf>,

    /// Pretty-print the JSON output
    #[arg(long = "pretty", help = "Pretty-print the JSON output")]
    pub pretty: bool,

    /// Format of the summary written to stderr after conversion
    #[arg(
        long = "summary-format",
        value_enum,
        default_value = "human",
        help = "Format of the conversion summary"
    )]
    pub summary_format: OutputFormat,

    /// Logging verbosity level
    #[arg(
        short = 'v',
        long = "verbose",
        action = clap::ArgAction::Count,
        help = "Increase logging verbosity (-v: info, -vv: debug, -vvv: trace)"
    )]
    pub verbose: u8,

    /// Only show errors; no progress bar and no summary
    #[arg(
        short = 'q',
        long = "quiet",
        help = "Suppress output except errors",
        conflicts_with = "verbose"
    )]
    pub quiet: bool,
}

/// Arguments for the pattern command
#[derive(Debug, Clone, Parser)]
pub struct PatternArgs {
    /// Example file path containing a date
    #[arg(value_name = "EXAMPLE_PATH")]
    pub example_path: String,

    /// First date to resolve (yyyymmdd or yyyy/mm/dd)
    #[arg(long = "start", value_name = "DATE")]
    pub start: Option<String>,

    /// Last date to resolve (yyyymmdd, yyyy/mm/dd or "yesterday"); defaults to --start
    #[arg(long = "end", value_name = "DATE", requires = "start")]
    pub end: Option<String>,

    /// Logging verbosity level
    #[arg(
        short = 'v',
        long = "verbose",
        action = clap::ArgAction::Count,
        help = "Increase logging verbosity (-v: info, -vv: debug, -vvv: trace)"
    )]
    pub verbose: u8,
}

/// Output format options for machine-readable results
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable output
    Human,
    /// JSON format for scripting
    Json,
}

impl ConvertArgs {
    /// Validate the convert command arguments
    pub fn validate(&self) -> Result<()> {
        if let Some(config_file) = &self.config_file {
            if !config_file.is_file() {
                return Err(Error::configuration(format!(
                    "Config file does not exist: {}",
                    config_file.display()
                )));
            }
        }

        if let Some(parent) = self
            .output_path
            .as_ref()
            .and_then(|path| path.parent())
            .filter(|parent| !parent.as_os_str().is_empty())
        {
            if !parent.is_dir() {
                return Err(Error::configuration(format!(
                    "Output directory does not exist: {}",
                    parent.display()
                )));
            }
        }

        Ok(())
    }

    /// Configuration file to load: explicit, local, then per-user
    pub fn resolve_config_file(&self) -> Result<PathBuf> {
        if let Some(path) = &self.config_file {
            return Ok(path.clone());
        }

        let local = PathBuf::from(CONFIG_FILE_NAME);
        if local.is_file() {
            return Ok(local);
        }

        if let Some(user) = default_config_path().filter(|path| path.is_file()) {
            return Ok(user);
        }

        Err(Error::configuration(format!(
            "No configuration file given and no {CONFIG_FILE_NAME} found in the current directory \
             or the user config directory"
        )))
    }

    /// Determine the log level based on verbosity flags
    pub fn get_log_level(&self) -> &'static str {
        log_level(self.verbose, self.quiet)
    }

    /// Progress bars and summaries are hidden in quiet mode
    pub fn show_progress(&self) -> bool {
        !self.quiet
    }
}

impl PatternArgs {
    pub fn get_log_level(&self) -> &'static str {
        log_level(self.verbose, false)
    }
}

/// Per-user configuration file location
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join(APP_DIR_NAME).join(CONFIG_FILE_NAME))
}

fn log_level(verbose: u8, quiet: bool) -> &'static str {
    if quiet {
        "error"
    } else {
        match verbose {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn parse(argv: &[&str]) -> Args {
        Args::try_parse_from(argv).unwrap()
    }

    #[test]
    fn test_convert_args() {
        let args = parse(&[
            "table-flattener",
            "convert",
            "-c",
            "cfg.json",
            "-o",
            "out.json",
            "--pretty",
            "-vv",
        ]);
        match args.command {
            Some(Commands::Convert(convert)) => {
                assert_eq!(convert.config_file, Some(PathBuf::from("cfg.json")));
                assert_eq!(convert.output_path, Some(PathBuf::from("out.json")));
                assert!(convert.pretty);
                assert_eq!(convert.get_log_level(), "debug");
                assert_eq!(convert.summary_format, OutputFormat::Human);
            }
            other => panic!("Expected convert command, got {other:?}"),
        }
    }

    #[test]
    fn test_quiet_conflicts_with_verbose() {
        assert!(Args::try_parse_from(["table-flattener", "convert", "-q", "-v"]).is_err());

        match parse(&["table-flattener", "convert", "-q"]).command {
            Some(Commands::Convert(convert)) => {
                assert_eq!(convert.get_log_level(), "error");
                assert!(!convert.show_progress());
            }
            other => panic!("Expected convert command, got {other:?}"),
        }
    }

    #[test]
    fn test_pattern_args() {
        match parse(&[
            "table-flattener",
            "pattern",
            "/d/20150312/f.txt",
            "--start",
            "20150301",
        ])
        .command
        {
            Some(Commands::Pattern(pattern)) => {
                assert_eq!(pattern.example_path, "/d/20150312/f.txt");
                assert_eq!(pattern.start.as_deref(), Some("20150301"));
                assert!(pattern.end.is_none());
                assert_eq!(pattern.get_log_level(), "warn");
            }
            other => panic!("Expected pattern command, got {other:?}"),
        }

        assert!(
            Args::try_parse_from(["table-flattener", "pattern", "/x", "--end", "20150301"])
                .is_err()
        );
    }

    #[test]
    fn test_validate_missing_config_file() {
        let temp_dir = TempDir::new().unwrap();
        let absent = temp_dir.path().join("absent.json").to_string_lossy().to_string();
        let args = match parse(&["table-flattener", "convert", "-c", absent.as_str()]).command {
            Some(Commands::Convert(convert)) => convert,
            other => panic!("Expected convert command, got {other:?}"),
        };

        assert!(matches!(args.validate(), Err(Error::Configuration { .. })));
    }

    #[test]
    fn test_validate_output_directory() {
        let temp_dir = TempDir::new().unwrap();
        let good = temp_dir.path().join("out.json");
        let bad = temp_dir.path().join("missing").join("out.json");

        for (path, ok) in [(good, true), (bad, false)] {
            let path = path.to_string_lossy().to_string();
            let args = match parse(&["table-flattener", "convert", "-o", path.as_str()]).command {
                Some(Commands::Convert(convert)) => convert,
                other => panic!("Expected convert command, got {other:?}"),
            };
            assert_eq!(args.validate().is_ok(), ok);
        }
    }
}
