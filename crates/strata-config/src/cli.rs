//! Command-line argument parsing.

use std::path::PathBuf;

use clap::Parser;

use crate::Config;

/// Command-line arguments. Values given here override `config.ron`.
#[derive(Parser, Debug, Default)]
#[command(name = "strata", about = "Procedural ore deposit placement")]
pub struct CliArgs {
    /// World seed.
    #[arg(long)]
    pub seed: Option<u64>,

    /// Placement attempts per deposit per column.
    #[arg(long)]
    pub attempts: Option<u32>,

    /// Side length of the generated area in columns.
    #[arg(long)]
    pub area: Option<u32>,

    /// Log level (error, warn, info, debug, trace).
    #[arg(long)]
    pub log_level: Option<String>,

    /// Path to config directory (overrides default location).
    #[arg(long)]
    pub config: Option<PathBuf>,
}

impl Config {
    /// Apply CLI overrides to a loaded config.
    pub fn apply_cli_overrides(&mut self, args: &CliArgs) {
        if let Some(seed) = args.seed {
            self.generation.world_seed = seed;
        }
        if let Some(attempts) = args.attempts {
            self.generation.attempts_per_deposit = attempts;
        }
        if let Some(area) = args.area {
            self.generation.area_chunks = area;
        }
        if let Some(ref level) = args.log_level {
            self.debug.log_level = level.clone();
        }
    }
}
