//! Command line definition.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Camera barcode scanning station.
#[derive(Debug, Parser)]
#[command(name = "barscan", version, about)]
pub struct Cli {
    /// Config file (defaults to the platform config directory)
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Print command output as JSON
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Scan continuously and collect every accepted code
    Scan {
        /// Directory of frames to use as the camera
        #[arg(long, value_name = "DIR")]
        source: PathBuf,

        /// Stop after this many seconds (default: until Ctrl-C or the stream ends)
        #[arg(long, value_name = "SECS")]
        duration: Option<u64>,

        /// Export the results as CSV when scanning stops
        #[arg(long)]
        export: bool,

        /// Clear the result list once the export is written
        #[arg(long, requires = "export")]
        clear: bool,
    },

    /// Scan one customer code and look the customer up
    Checkin {
        /// Directory of frames to use as the camera
        #[arg(long, value_name = "DIR")]
        source: PathBuf,

        /// Give up after this many seconds
        #[arg(long, value_name = "SECS", default_value_t = 30)]
        timeout: u64,
    },

    /// Look a customer up by code
    Lookup {
        /// Customer code
        code: String,
    },

    /// Print the effective configuration as TOML
    Config,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scan_arguments() {
        let cli = Cli::try_parse_from([
            "barscan", "scan", "--source", "frames", "--duration", "5", "--export", "--json",
        ])
        .unwrap();

        assert!(cli.json);
        match cli.command {
            Command::Scan {
                source,
                duration,
                export,
                clear,
            } => {
                assert_eq!(source, PathBuf::from("frames"));
                assert_eq!(duration, Some(5));
                assert!(export);
                assert!(!clear);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_clear_requires_export() {
        assert!(Cli::try_parse_from(["barscan", "scan", "--source", "f", "--clear"]).is_err());

        let cli = Cli::try_parse_from(["barscan", "scan", "--source", "f", "--export", "--clear"])
            .unwrap();
        assert!(matches!(cli.command, Command::Scan { clear: true, .. }));
    }

    #[test]
    fn test_checkin_default_timeout() {
        let cli = Cli::try_parse_from(["barscan", "--config", "b.toml", "checkin", "--source", "f"])
            .unwrap();

        assert_eq!(cli.config, Some(PathBuf::from("b.toml")));
        assert!(matches!(cli.command, Command::Checkin { timeout: 30, .. }));
    }

    #[test]
    fn test_source_is_required() {
        assert!(Cli::try_parse_from(["barscan", "scan"]).is_err());
        assert!(Cli::try_parse_from(["barscan", "lookup"]).is_err());
    }
}
