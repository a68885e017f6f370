use std::sync::OnceLock;

use super::core::{OutputFormat, QuackConfig, ValidationConfig};
use super::loader::load_config;

/// Cache the configuration
static CONFIG: OnceLock<QuackConfig> = OnceLock::new();

/// Get the cached configuration
pub fn get_config() -> &'static QuackConfig {
    CONFIG.get_or_init(load_config)
}

/// Get the default report format (default: text)
pub fn get_output_format() -> OutputFormat {
    output_format(get_config())
}

/// Get the issue cap for validation reports (default: 20)
pub fn get_max_reported_issues() -> usize {
    max_reported_issues(get_config())
}

/// Get the configured log filter, if any
pub fn get_log_filter() -> Option<String> {
    get_config().logging.as_ref().and_then(|l| l.filter.clone())
}

pub(crate) fn output_format(config: &QuackConfig) -> OutputFormat {
    config
        .output
        .as_ref()
        .and_then(|o| o.format)
        .unwrap_or_default()
}

pub(crate) fn max_reported_issues(config: &QuackConfig) -> usize {
    config
        .validation
        .as_ref()
        .and_then(|v| v.max_reported_issues)
        .filter(|&n| n > 0)
        .unwrap_or(ValidationConfig::DEFAULT_MAX_REPORTED_ISSUES)
}
