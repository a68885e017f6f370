//! CLI module for quackquack
//!
//! - Argument parsing (`args`)
//! - Command handlers (`commands`)
//! - Runtime setup (`setup`)

pub mod args;
pub mod commands;
pub mod setup;

pub use args::{Cli, Commands};
pub use commands::{handle_compare_command, handle_parse_command, handle_validate_command};
pub use setup::{apply_color_setting, init_logging, LoggingHandle, LOG_ENV};

/// Parse CLI arguments using Clap
pub fn parse_args() -> Cli {
    args::parse_args()
}
