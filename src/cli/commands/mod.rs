//! Command handlers for CLI subcommands
//!
//! Each handler prints its report to stdout. Handlers whose command has a
//! pass/fail outcome return it so the binary can set the exit status.

mod compare;
mod parse;
mod validate;

pub use compare::handle_compare_command;
pub use parse::handle_parse_command;
pub use validate::handle_validate_command;
