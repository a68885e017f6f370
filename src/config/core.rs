use serde::{Deserialize, Serialize};

/// Root configuration structure for quackquack
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct QuackConfig {
    /// Output configuration for CLI reports
    #[serde(default)]
    pub output: Option<OutputConfig>,

    /// Validation report configuration
    #[serde(default)]
    pub validation: Option<ValidationConfig>,

    /// Logging configuration
    #[serde(default)]
    pub logging: Option<LoggingConfig>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OutputConfig {
    #[serde(default)]
    pub format: Option<OutputFormat>,
    /// Enable colored output (default: auto-detect based on TTY)
    #[serde(default)]
    pub use_color: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ValidationConfig {
    /// Maximum number of issues listed per validation failure (default: 20)
    #[serde(default)]
    pub max_reported_issues: Option<usize>,
}

impl ValidationConfig {
    pub const DEFAULT_MAX_REPORTED_ISSUES: usize = 20;

    pub fn validate(&self) -> Result<(), String> {
        match self.max_reported_issues {
            Some(0) => Err("max_reported_issues must be at least 1".to_string()),
            _ => Ok(()),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// `EnvFilter` directive used when `QUACKQUACK_LOG` is unset
    #[serde(default)]
    pub filter: Option<String>,
}
