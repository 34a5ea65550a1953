//! YAML configuration loader.

use std::fs;
use std::path::Path;

use crate::config::types::BackdropConfig;
use crate::config::validator::ConfigValidator;
use crate::error::{Error, Result};

/// Reads, parses and validates backdrop configurations.
/// The engine takes its config once at startup; there is no reload.
pub struct ConfigLoader {
    validator: ConfigValidator,
}

impl ConfigLoader {
    pub fn new() -> Self {
        Self {
            validator: ConfigValidator::new(),
        }
    }

    /// Loads and validates the config file at `path`.
    pub fn load(&self, path: &Path) -> Result<BackdropConfig> {
        let content = fs::read_to_string(path)
            .map_err(|e| Error::ConfigLoad(path.display().to_string(), e.to_string()))?;

        let mut config = Self::parse(&path.display().to_string(), &content)?;
        self.validator.validate(&config)?;
        config.source_path = Some(path.to_path_buf());

        tracing::info!("Loaded backdrop config from {}", path.display());
        Ok(config)
    }

    /// Parses and validates config from a YAML string.
    pub fn from_yaml_str(yaml: &str) -> Result<BackdropConfig> {
        let config = Self::parse("<inline>", yaml)?;
        ConfigValidator::new().validate(&config)?;
        Ok(config)
    }

    fn parse(origin: &str, content: &str) -> Result<BackdropConfig> {
        // An empty document means "all defaults"
        if content.trim().is_empty() {
            return Ok(BackdropConfig::default());
        }
        serde_yaml::from_str(content).map_err(|e| Error::ConfigParse(origin.to_string(), e.to_string()))
    }
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}
