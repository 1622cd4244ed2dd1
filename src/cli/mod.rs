//! Command-line interface definitions.

pub mod check;
pub mod run;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Default configuration file looked up by every command.
pub const DEFAULT_CONFIG_PATH: &str = "keeper.toml";

/// Slicekeeper - executes due slices of on-chain sliced orders.
#[derive(Parser, Debug)]
#[command(name = "slicekeeper")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the keeper loop (foreground)
    Run(RunArgs),

    /// Run diagnostic checks
    #[command(subcommand)]
    Check(CheckCommand),
}

/// Subcommands for `slicekeeper check`
#[derive(Subcommand, Debug)]
pub enum CheckCommand {
    /// Validate configuration without a signer
    Config(ConfigPathArg),
    /// Connect to the node and print head block, keeper and contract addresses
    Chain(ConfigPathArg),
}

/// Shared argument for commands that only need a config path.
#[derive(Parser, Debug)]
pub struct ConfigPathArg {
    /// Path to configuration file
    #[arg(short, long, default_value = DEFAULT_CONFIG_PATH)]
    pub config: PathBuf,
}

/// Arguments for the `run` subcommand.
#[derive(Parser, Debug)]
pub struct RunArgs {
    /// Path to configuration file
    #[arg(short, long, default_value = DEFAULT_CONFIG_PATH)]
    pub config: PathBuf,

    /// First block to scan (1 or later), ignoring any stored cursor
    #[arg(long, value_parser = clap::value_parser!(u64).range(1..))]
    pub from_block: Option<u64>,

    /// Decide and log slices but never submit transactions
    #[arg(long)]
    pub dry_run: bool,

    /// Override log level (debug, info, warn, error)
    #[arg(long)]
    pub log_level: Option<String>,

    /// Use JSON log format instead of pretty
    #[arg(long)]
    pub json_logs: bool,

    /// Persist the scan cursor to this file
    #[arg(long)]
    pub cursor_file: Option<PathBuf>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_run_args_defaults() {
        let cli = Cli::try_parse_from(["slicekeeper", "run"]).unwrap();
        if let Commands::Run(args) = cli.command {
            assert_eq!(args.config, PathBuf::from("keeper.toml"));
            assert!(args.from_block.is_none());
            assert!(!args.dry_run);
            assert!(args.log_level.is_none());
            assert!(!args.json_logs);
            assert!(args.cursor_file.is_none());
        } else {
            panic!("Expected Run command");
        }
    }

    #[test]
    fn test_run_args_overrides() {
        let cli = Cli::try_parse_from([
            "slicekeeper",
            "run",
            "--config",
            "custom.toml",
            "--from-block",
            "1200",
            "--dry-run",
            "--log-level",
            "debug",
            "--json-logs",
            "--cursor-file",
            "state/cursor.json",
        ])
        .unwrap();
        if let Commands::Run(args) = cli.command {
            assert_eq!(args.config, PathBuf::from("custom.toml"));
            assert_eq!(args.from_block, Some(1200));
            assert!(args.dry_run);
            assert_eq!(args.log_level.as_deref(), Some("debug"));
            assert!(args.json_logs);
            assert_eq!(args.cursor_file, Some(PathBuf::from("state/cursor.json")));
        } else {
            panic!("Expected Run command");
        }
    }

    #[test]
    fn test_run_args_rejects_negative_block() {
        assert!(Cli::try_parse_from(["slicekeeper", "run", "--from-block", "-1"]).is_err());
    }

    #[test]
    fn test_run_args_rejects_genesis_block() {
        assert!(Cli::try_parse_from(["slicekeeper", "run", "--from-block", "0"]).is_err());
        assert!(Cli::try_parse_from(["slicekeeper", "run", "--from-block", "1"]).is_ok());
    }

    #[test]
    fn test_parse_check_config() {
        let cli = Cli::try_parse_from(["slicekeeper", "check", "config", "-c", "k.toml"]).unwrap();
        match cli.command {
            Commands::Check(CheckCommand::Config(arg)) => {
                assert_eq!(arg.config, PathBuf::from("k.toml"));
            }
            other => panic!("Expected check config, got {other:?}"),
        }
    }

    #[test]
    fn test_parse_check_chain() {
        let cli = Cli::try_parse_from(["slicekeeper", "check", "chain"]).unwrap();
        assert!(matches!(
            cli.command,
            Commands::Check(CheckCommand::Chain(_))
        ));
    }

    #[test]
    fn test_subcommand_is_required() {
        assert!(Cli::try_parse_from(["slicekeeper"]).is_err());
    }
}
