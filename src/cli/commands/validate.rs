//! Validate command handler
//!
//! Checks a JSON argument list against a signature's compiled parameter
//! schema. `Promise<...>` parameters are driven to settlement so their
//! contents are reported too. Return values are not involved.

use crate::config::{get_max_reported_issues, OutputFormat};
use crate::errors::QuackError;
use crate::schema::{settle, FunctionSchema, Phase, ValidationError};
use crate::signature::parse_signature;
use crate::value::Value;
use anyhow::{bail, Context, Result};
use colored::Colorize;
use comfy_table::{presets::UTF8_FULL, Table};
use serde_json::json;

/// Handle the validate command. Returns whether the arguments are valid.
pub fn handle_validate_command(signature: &str, args: &str, format: OutputFormat) -> Result<bool> {
    let signature = parse_signature(signature)?;
    let schema = FunctionSchema::compile(&signature)?;
    let args = parse_arguments(args)?;

    match check_arguments(&schema, args) {
        Ok(_) => {
            match format {
                OutputFormat::Json => println!("{}", json!({ "valid": true })),
                OutputFormat::Text => println!("{} {}", "valid:".green().bold(), signature),
            }
            Ok(true)
        }
        Err(QuackError::Validation(error)) => {
            let limit = get_max_reported_issues();
            match format {
                OutputFormat::Json => {
                    println!("{}", serde_json::to_string_pretty(&json_report(&error, limit))?)
                }
                OutputFormat::Text => println!("{}", text_report(&error, limit)),
            }
            Ok(false)
        }
        Err(other) => Err(other.into()),
    }
}

fn check_arguments(schema: &FunctionSchema, args: Vec<Value>) -> crate::errors::Result<Vec<Value>> {
    let checked = schema.parameters().check(args)?;
    futures::executor::block_on(settle(checked, Phase::Arguments))
}

fn parse_arguments(args: &str) -> Result<Vec<Value>> {
    let json: serde_json::Value =
        serde_json::from_str(args).context("arguments must be valid JSON")?;
    match json {
        serde_json::Value::Array(items) => Ok(items.into_iter().map(Value::from).collect()),
        other => bail!("arguments must be a JSON array, got {other}"),
    }
}

fn json_report(error: &ValidationError, limit: usize) -> serde_json::Value {
    let issues = error.issues();
    let shown = &issues[..issues.len().min(limit)];
    json!({
        "valid": false,
        "phase": error.phase(),
        "issues": shown,
        "omitted": issues.len() - shown.len(),
    })
}

pub(crate) fn text_report(error: &ValidationError, limit: usize) -> String {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_header(vec!["Location", "Expected", "Received"]);
    for issue in error.issues().iter().take(limit) {
        table.add_row(vec![
            issue.path.to_string(),
            issue.expected.clone(),
            issue.received.clone(),
        ]);
    }

    let mut report = format!("{}\n{}", "invalid arguments".red().bold(), table);
    let omitted = error.issues().len().saturating_sub(limit);
    if omitted > 0 {
        report.push_str(&format!("\n... and {omitted} more"));
    }
    report
}

#[cfg(test)]
mod tests {
    use super::*;

    fn failure(signature: &str, args: &str) -> ValidationError {
        let schema = FunctionSchema::compile(&parse_signature(signature).unwrap()).unwrap();
        match check_arguments(&schema, parse_arguments(args).unwrap()) {
            Err(QuackError::Validation(error)) => error,
            other => panic!("expected validation failure, got {other:?}"),
        }
    }

    #[test]
    fn test_promise_parameters_are_settled() {
        let error = failure("(p: Promise<number>) => void", "[\"x\"]");
        assert_eq!(error.phase(), Phase::Arguments);
        assert_eq!(error.positions(), vec![0]);

        let schema = FunctionSchema::compile(&parse_signature("(p: Promise<number>) => void").unwrap()).unwrap();
        assert_eq!(
            check_arguments(&schema, parse_arguments("[2]").unwrap()).unwrap(),
            vec![Value::from(2)]
        );
    }

    #[test]
    fn test_parse_arguments_requires_array() {
        assert_eq!(parse_arguments("[1, \"a\"]").unwrap().len(), 2);
        assert!(parse_arguments("{\"a\": 1}").is_err());
        assert!(parse_arguments("[1,").is_err());
    }

    #[test]
    fn test_text_report_truncates() {
        colored::control::set_override(false);
        let error = failure("(a: number, b: number, c: number) => void", "[\"x\", \"y\", \"z\"]");
        let report = text_report(&error, 2);
        assert!(report.contains("argument 0"));
        assert!(report.contains("argument 1"));
        assert!(!report.contains("argument 2"));
        assert!(report.ends_with("... and 1 more"));
    }

    #[test]
    fn test_json_report_counts_omitted() {
        let error = failure("(a: number, b: string) => void", "[\"x\", 1]");
        let report = json_report(&error, 1);
        assert_eq!(report["valid"], json!(false));
        assert_eq!(report["phase"], json!("arguments"));
        assert_eq!(report["issues"].as_array().unwrap().len(), 1);
        assert_eq!(report["omitted"], json!(1));
    }
}
