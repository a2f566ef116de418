use std::path::Path;
use serde::{Deserialize, Serialize};

use crate::{
    dynamics::DynamicsConfig,
    error::{ConfigError, Result},
    motion::MotionConfig,
    session::SessionConfig,
};

/// Main configuration for dino-vis
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Dynamics extraction tuning
    pub dynamics: DynamicsConfig,

    /// Driving loop settings
    pub session: SessionConfig,

    /// Mapping from dynamics to scene motion
    pub motion: MotionConfig,
}

impl Config {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(|_| ConfigError::FileNotFound { path: path.display().to_string() })?;

        let config: Config = toml::from_str(&content)
            .map_err(|e| {
                tracing::warn!("TOML error in {}: {}", path.display(), e);
                ConfigError::ParseFailed { path: path.display().to_string() }
            })?;
        config.validate()?;
        Ok(config)
    }

    /// Save configuration to a TOML file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| ConfigError::InvalidValue {
                key: "config".to_string(),
                value: e.to_string()
            })?;

        std::fs::write(path, content)?;
        Ok(())
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        self.dynamics.validate()?;
        self.session.validate(self.dynamics.max_magnitude)?;
        self.motion.validate()?;
        Ok(())
    }
}
