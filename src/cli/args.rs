use crate::config::OutputFormat;
use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "quackquack")]
#[command(about = "Check call signatures and arguments against duck-typing contracts", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short = 'v', long = "verbose", action = clap::ArgAction::Count, global = true)]
    pub verbosity: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Parse a signature and print its structure
    Parse {
        /// Signature text, e.g. "(i: number, j?: string) => boolean"
        signature: String,

        /// Output format (defaults to the configured format)
        #[arg(short, long, value_enum)]
        format: Option<OutputFormat>,
    },

    /// Check whether two signatures are compatible
    Compare {
        /// Signature the caller expects
        expected: String,

        /// Signature the candidate declares
        actual: String,

        /// Output format (defaults to the configured format)
        #[arg(short, long, value_enum)]
        format: Option<OutputFormat>,
    },

    /// Validate a JSON argument list against a signature's parameters
    Validate {
        /// Signature text
        signature: String,

        /// Arguments as a JSON array, e.g. '[1, "ok"]'
        args: String,

        /// Output format (defaults to the configured format)
        #[arg(short, long, value_enum)]
        format: Option<OutputFormat>,
    },
}

/// Parse CLI arguments using Clap
pub fn parse_args() -> Cli {
    Cli::parse()
}
