use anyhow::Result;
use quackquack::cli::{
    apply_color_setting, handle_compare_command, handle_parse_command, handle_validate_command,
    init_logging, parse_args, Commands,
};
use quackquack::config::{get_config, get_output_format, OutputFormat};
use std::process::ExitCode;

fn main() -> Result<ExitCode> {
    let cli = parse_args();
    let mut logging = init_logging(cli.verbosity);
    let config = get_config();
    logging.apply_config(config);
    apply_color_setting(config);

    let passed = match cli.command {
        Commands::Parse { signature, format } => {
            handle_parse_command(&signature, resolve_format(format))?;
            true
        }
        Commands::Compare {
            expected,
            actual,
            format,
        } => handle_compare_command(&expected, &actual, resolve_format(format))?,
        Commands::Validate {
            signature,
            args,
            format,
        } => handle_validate_command(&signature, &args, resolve_format(format))?,
    };

    Ok(if passed {
        ExitCode::SUCCESS
    } else {
        ExitCode::from(1)
    })
}

fn resolve_format(flag: Option<OutputFormat>) -> OutputFormat {
    flag.unwrap_or_else(get_output_format)
}
