//! Configuration loaded from `.quackquack.toml`
//!
//! The nearest file found walking up from the working directory wins. A
//! missing file yields defaults silently; unreadable or invalid files are
//! reported through `log` and also yield defaults.

mod accessors;
mod core;
mod loader;

pub use accessors::*;
pub use self::core::{LoggingConfig, OutputConfig, OutputFormat, QuackConfig, ValidationConfig};
pub use loader::{
    directory_ancestors, load_config, load_config_from, parse_and_validate_config,
    CONFIG_FILE_NAME,
};
