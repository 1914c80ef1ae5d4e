use std::fs;
use std::path::Path;

use crate::config::PipelineConfig;
use crate::Result;

impl PipelineConfig {
    /// Read a JSON configuration file. Missing fields take their defaults.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let config_str = fs::read_to_string(path.as_ref())?;
        let config = Self::from_json(&config_str)?;
        tracing::debug!("Loaded configuration from {}", path.as_ref().display());
        Ok(config)
    }

    pub fn from_json(config_str: &str) -> Result<Self> {
        let config: PipelineConfig = serde_json::from_str(config_str)?;
        config.validate()?;
        Ok(config)
    }
}
