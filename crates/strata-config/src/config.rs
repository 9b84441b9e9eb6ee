//! Configuration structs with defaults and RON persistence.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

const FILE_NAME: &str = "config.ron";

/// Top-level configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    pub generation: GenerationConfig,
    pub debug: DebugConfig,
}

/// World generation settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct GenerationConfig {
    /// Seed every placement attempt is derived from.
    pub world_seed: u64,
    /// Lowest buildable Y (inclusive).
    pub min_build_height: i32,
    /// Highest buildable Y (inclusive).
    pub max_build_height: i32,
    /// Placement attempts per deposit per chunk column.
    pub attempts_per_deposit: u32,
    /// Side length of the generated area, in 16×16 columns.
    pub area_chunks: u32,
}

/// Debug/development settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DebugConfig {
    /// Log level override (e.g. "debug", "info", "warn").
    pub log_level: String,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            world_seed: 0x5eed,
            min_build_height: -64,
            max_build_height: 127,
            attempts_per_deposit: 8,
            area_chunks: 4,
        }
    }
}

impl Default for DebugConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}

impl GenerationConfig {
    /// Number of buildable layers, or `None` if the range is inverted.
    pub fn build_layers(&self) -> Option<u32> {
        let span = i64::from(self.max_build_height) - i64::from(self.min_build_height);
        u32::try_from(span + 1).ok().filter(|&n| n > 0)
    }
}

/// Path of the config file inside `config_dir`.
pub fn config_file(config_dir: &Path) -> PathBuf {
    config_dir.join(FILE_NAME)
}

fn read_config(path: &Path) -> Result<Config, ConfigError> {
    let text = std::fs::read_to_string(path).map_err(ConfigError::ReadError)?;
    let config: Config = ron::from_str(&text).map_err(ConfigError::ParseError)?;
    config.validate()?;
    Ok(config)
}

impl Config {
    /// Reads `config.ron` from `config_dir`, writing the defaults first if it is missing.
    pub fn load_or_create(config_dir: &Path) -> Result<Self, ConfigError> {
        let path = config_file(config_dir);
        if !path.exists() {
            let config = Self::default();
            config.save(config_dir)?;
            log::info!("Wrote default config to {}", path.display());
            return Ok(config);
        }
        let config = read_config(&path)?;
        log::info!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Writes this config to `config_dir/config.ron`, creating the directory.
    pub fn save(&self, config_dir: &Path) -> Result<(), ConfigError> {
        std::fs::create_dir_all(config_dir).map_err(ConfigError::WriteError)?;
        let text = ron::ser::to_string_pretty(
            self,
            ron::ser::PrettyConfig::new().depth_limit(3).enumerate_arrays(false),
        )
        .map_err(ConfigError::SerializeError)?;
        std::fs::write(config_file(config_dir), text).map_err(ConfigError::WriteError)
    }

    /// Re-reads the file; `Some` only when its contents differ from `self`.
    pub fn reload(&self, config_dir: &Path) -> Result<Option<Self>, ConfigError> {
        let fresh = read_config(&config_file(config_dir))?;
        if fresh == *self {
            return Ok(None);
        }
        log::info!("Config changed on disk");
        Ok(Some(fresh))
    }

    /// Rejects settings the generator cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let generation = &self.generation;
        if generation.build_layers().is_none() {
            return Err(ConfigError::Invalid(format!(
                "min_build_height {} is above max_build_height {}",
                generation.min_build_height, generation.max_build_height
            )));
        }
        if generation.area_chunks == 0 {
            return Err(ConfigError::Invalid("area_chunks must be at least 1".into()));
        }
        Ok(())
    }
}
