//! Configuration for the strata deposit demo.
//!
//! Settings persist to disk as RON and can be overridden from the command
//! line via clap. Every section is `#[serde(default)]`, so older or partial
//! files keep loading as fields are added.

mod cli;
mod config;
mod error;

pub use cli::CliArgs;
pub use config::{Config, DebugConfig, GenerationConfig, config_file};
pub use error::ConfigError;
