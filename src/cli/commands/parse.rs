//! Parse command handler

use crate::config::OutputFormat;
use crate::signature::{parse_signature, FunctionSignature};
use anyhow::Result;
use colored::Colorize;
use comfy_table::{presets::UTF8_FULL, Table};

/// Handle the parse command
pub fn handle_parse_command(signature: &str, format: OutputFormat) -> Result<()> {
    let parsed = parse_signature(signature)?;
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&parsed)?),
        OutputFormat::Text => println!("{}", render_signature(&parsed)),
    }
    Ok(())
}

pub(crate) fn render_signature(signature: &FunctionSignature) -> String {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_header(vec!["#", "Name", "Type", "Optional"]);
    for (position, parameter) in signature.parameters.iter().enumerate() {
        table.add_row(vec![
            position.to_string(),
            parameter.name.clone().unwrap_or_else(|| "-".to_string()),
            parameter.ty.to_string(),
            if parameter.optional { "yes" } else { "no" }.to_string(),
        ]);
    }

    format!(
        "{}\n{}\n{} {}{}",
        signature.to_string().bold(),
        table,
        "returns".dimmed(),
        signature.returns,
        if signature.is_async { " (async)" } else { "" }
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_lists_parameters() {
        colored::control::set_override(false);
        let sig = parse_signature("async (i: number, string?) => boolean").unwrap();
        let rendered = render_signature(&sig);
        assert!(rendered.starts_with("async (i: number, string?) => boolean"));
        assert!(rendered.contains("number"));
        assert!(rendered.contains("yes"));
        assert!(rendered.ends_with("returns boolean (async)"));
    }
}
