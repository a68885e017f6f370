//! Runtime setup for the CLI: logging and color control.

use crate::config::QuackConfig;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{reload, EnvFilter, Registry};

/// Environment variable holding an `EnvFilter` directive.
pub const LOG_ENV: &str = "QUACKQUACK_LOG";

const DEFAULT_FILTER: &str = "warn";

/// Pick the filter directive: the environment wins, then `-v`, then the
/// config file, then `warn`.
pub fn log_directive(env: Option<String>, verbosity: u8, config: &QuackConfig) -> String {
    if let Some(directive) = env.filter(|d| !d.trim().is_empty()) {
        return directive;
    }
    match verbosity {
        0 => config
            .logging
            .as_ref()
            .and_then(|l| l.filter.clone())
            .unwrap_or_else(|| DEFAULT_FILTER.to_string()),
        1 => "info".to_string(),
        2 => "debug".to_string(),
        _ => "trace".to_string(),
    }
}

/// Handle to the installed filter, used to apply the config file's
/// directive once the config has been loaded.
pub struct LoggingHandle {
    verbosity: u8,
    directive: String,
    filter: reload::Handle<EnvFilter, Registry>,
}

/// Install the global subscriber, writing to stderr.
///
/// Runs before the config file is read so that config loading warnings are
/// reported. The filter starts from the environment and `-v` only; call
/// [`LoggingHandle::apply_config`] once the config is available.
pub fn init_logging(verbosity: u8) -> LoggingHandle {
    let directive = log_directive(std::env::var(LOG_ENV).ok(), verbosity, &QuackConfig::default());
    let (filter, handle) = reload::Layer::new(parse_filter(&directive));

    // A second initialisation (e.g. from tests) keeps the first subscriber
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .try_init();

    LoggingHandle {
        verbosity,
        directive,
        filter: handle,
    }
}

impl LoggingHandle {
    /// The directive currently in effect.
    pub fn directive(&self) -> &str {
        &self.directive
    }

    /// Switch to the config file's filter unless the environment or `-v`
    /// already chose one.
    pub fn apply_config(&mut self, config: &QuackConfig) {
        let directive = log_directive(std::env::var(LOG_ENV).ok(), self.verbosity, config);
        if directive == self.directive {
            return;
        }
        if let Err(e) = self.filter.reload(parse_filter(&directive)) {
            tracing::debug!(error = %e, "log filter not reloaded");
            return;
        }
        self.directive = directive;
    }
}

fn parse_filter(directive: &str) -> EnvFilter {
    EnvFilter::try_new(directive).unwrap_or_else(|e| {
        eprintln!("warning: invalid log filter {directive:?}: {e}; using {DEFAULT_FILTER}");
        EnvFilter::new(DEFAULT_FILTER)
    })
}

/// Force colors on or off when the config says so; otherwise auto-detect.
pub fn apply_color_setting(config: &QuackConfig) {
    match config.output.as_ref().and_then(|o| o.use_color) {
        Some(true) => colored::control::set_override(true),
        Some(false) => colored::control::set_override(false),
        None => {}
    }
}
