//! Compare command handler
//!
//! Reports whether an annotated signature would satisfy an expected one.

use crate::config::OutputFormat;
use crate::signature::{compatible, parse_signature};
use anyhow::Result;
use colored::Colorize;
use serde_json::json;

/// Handle the compare command. Returns whether the signatures are compatible.
pub fn handle_compare_command(expected: &str, actual: &str, format: OutputFormat) -> Result<bool> {
    let expected = parse_signature(expected)?;
    let actual = parse_signature(actual)?;
    let is_compatible = compatible(&expected, &actual);

    match format {
        OutputFormat::Json => {
            let report = json!({
                "compatible": is_compatible,
                "expected": expected,
                "actual": actual,
            });
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        OutputFormat::Text if is_compatible => {
            println!("{} {}", "compatible:".green().bold(), expected);
        }
        OutputFormat::Text => {
            println!("{}", "incompatible".red().bold());
            println!("  expected: {expected}");
            println!("  actual:   {actual}");
        }
    }

    Ok(is_compatible)
}
