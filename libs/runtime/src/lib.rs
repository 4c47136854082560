//! Process-level plumbing shared by every Trueque binary: layered
//! configuration and logging initialisation.

pub mod config;
pub mod logging;

pub use config::{
    default_logging_config, AppConfig, AppConfigProvider, AppSection, CliArgs, LoggingConfig,
    Section,
};
