//! Runner configuration (TOML).

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

use bistscan_core::data::{Universe, UniverseError};
use bistscan_core::{ConfigError, ScanConfig};

#[derive(Debug, Error)]
pub enum RunnerError {
    #[error("read config: {0}")]
    Io(#[from] std::io::Error),

    #[error("parse config TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid scan config: {0}")]
    Scan(#[from] ConfigError),

    #[error("universe: {0}")]
    Universe(#[from] UniverseError),

    #[error("interval_secs must be at least 1")]
    ZeroInterval,

    #[error("failed to spawn scan thread: {0}")]
    Spawn(String),
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct RunnerConfig {
    /// Seconds between scan starts.
    pub interval_secs: u64,
    /// Pause between symbols within a scan.
    pub symbol_pause_ms: u64,
    /// TOML file with `symbols = [...]`; the built-in list when absent.
    pub universe_file: Option<PathBuf>,
    pub scan: ScanConfig,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            interval_secs: 60,
            symbol_pause_ms: 120,
            universe_file: None,
            scan: ScanConfig::default(),
        }
    }
}

impl RunnerConfig {
    pub fn from_file(path: &Path) -> Result<Self, RunnerError> {
        let content = std::fs::read_to_string(path)?;
        let mut config = Self::from_toml(&content)?;
        // Relative universe paths resolve against the config file.
        if let (Some(file), Some(dir)) = (config.universe_file.as_mut(), path.parent()) {
            if file.is_relative() {
                *file = dir.join(&*file);
            }
        }
        Ok(config)
    }

    pub fn from_toml(content: &str) -> Result<Self, RunnerError> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), RunnerError> {
        if self.interval_secs == 0 {
            return Err(RunnerError::ZeroInterval);
        }
        self.scan.validate()?;
        Ok(())
    }

    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_secs)
    }

    pub fn symbol_pause(&self) -> Duration {
        Duration::from_millis(self.symbol_pause_ms)
    }

    pub fn load_universe(&self) -> Result<Universe, RunnerError> {
        Ok(Universe::load_or_fallback(self.universe_file.as_deref())?)
    }

    pub fn to_toml(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }
}
