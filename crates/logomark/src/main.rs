//! Logomark CLI - rename logo images after the brand a vision model sees in them.
//!
//! # Usage
//!
//! ```bash
//! # Preview renames for a folder of scans
//! logomark rename ./scans --dry-run
//!
//! # Rename with a local OpenAI-compatible server
//! logomark rename ./scans --provider local --model qwen2.5-vl-7b
//!
//! # Trim uniform borders, keeping 10px of margin
//! logomark trim ./logos --margin 10
//!
//! # Extend the canvas, then trim back with a 48px margin
//! logomark manipulate e,t48 ./logos extra.png
//!
//! # View configuration
//! logomark config show
//! ```

use clap::{Parser, Subcommand};

mod cli;
mod logging;

/// Logomark - brand-based image renaming and logo cleanup.
#[derive(Parser, Debug)]
#[command(name = "logomark")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Enable verbose (debug) logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Output logs in JSON format
    #[arg(long, global = true)]
    json_logs: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Available commands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Identify the brand in each image and rename the file after it
    Rename(cli::rename::RenameArgs),

    /// Trim uniform-color borders detected from the corners
    Trim(cli::edit::TrimArgs),

    /// Center images on a 3x canvas of their edge color
    Extend(cli::edit::ExtendArgs),

    /// Apply a chain of extend/trim operations, e.g. `e,t48`
    Manipulate(cli::edit::ManipulateArgs),

    /// View and manage configuration
    Config(cli::config::ConfigArgs),
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Logging isn't initialized yet, so use eprintln for config warnings.
    let config = match logomark_core::Config::load() {
        Ok(config) => config,
        Err(e) => {
            eprintln!(
                "Warning: Failed to load config: {e}\n  \
                 Using default configuration. Check your config file with `logomark config path`."
            );
            logomark_core::Config::default()
        }
    };
    logging::init_from_config(&config, cli.verbose, cli.json_logs);

    tracing::debug!("Logomark v{}", logomark_core::VERSION);

    match cli.command {
        Commands::Rename(args) => cli::rename::execute(args, &config).await,
        Commands::Trim(args) => cli::edit::execute_trim(args, &config).await,
        Commands::Extend(args) => cli::edit::execute_extend(args, &config).await,
        Commands::Manipulate(args) => cli::edit::execute_manipulate(args, &config).await,
        Commands::Config(args) => cli::config::execute(args).await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::parse_from(["logomark", "trim", "logo.png", "-v", "--json-logs"]);
        assert!(cli.verbose);
        assert!(cli.json_logs);
        assert!(matches!(cli.command, Commands::Trim(_)));
    }

    #[test]
    fn test_manipulate_subcommand() {
        let cli = Cli::parse_from(["logomark", "manipulate", "e,t48", "a.png", "logos/", "-r"]);
        match cli.command {
            Commands::Manipulate(args) => {
                assert_eq!(args.ops, "e,t48");
                assert_eq!(args.inputs.len(), 2);
                assert!(args.replace);
            }
            other => panic!("expected manipulate, got {other:?}"),
        }
    }
}
