use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::model::ModelSize;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Application settings
    pub app: AppConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Directory for generated Markdown transcripts
    pub output_dir: PathBuf,

    /// Directory for temporary audio downloads (system temp if unset)
    pub temp_dir: Option<PathBuf>,

    /// Maximum simultaneous downloads in batch mode
    pub max_concurrent_downloads: usize,

    /// Model size used when none is given on the command line
    pub default_model: ModelSize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            app: AppConfig {
                output_dir: PathBuf::from("transcriptions"),
                temp_dir: None,
                max_concurrent_downloads: 4,
                default_model: ModelSize::Base,
            },
        }
    }
}

impl Config {
    /// Load configuration from file or create default
    pub async fn load() -> Result<Self> {
        let config_path = Self::config_path()?;

        if config_path.exists() {
            let content =
                fs_err::read_to_string(&config_path).context("Failed to read config file")?;

            let config: Config =
                serde_yaml::from_str(&content).context("Failed to parse config file")?;

            config.validate()?;
            Ok(config)
        } else {
            let config = Self::default();
            config.save().await?;
            Ok(config)
        }
    }

    /// Save configuration to file
    pub async fn save(&self) -> Result<()> {
        let config_path = Self::config_path()?;

        if let Some(parent) = config_path.parent() {
            fs_err::create_dir_all(parent)?;
        }

        let content = serde_yaml::to_string(self).context("Failed to serialize config")?;

        fs_err::write(&config_path, content).context("Failed to write config file")?;

        Ok(())
    }

    /// Get configuration file path
    fn config_path() -> Result<PathBuf> {
        // First try current directory for easy testing
        let local_config = PathBuf::from("config.yaml");
        if local_config.exists() {
            return Ok(local_config);
        }

        let config_dir = dirs::config_dir().context("Could not determine config directory")?;

        Ok(config_dir.join("tubescribe").join("config.yaml"))
    }

    /// Validate configuration
    fn validate(&self) -> Result<()> {
        if self.app.max_concurrent_downloads == 0 {
            anyhow::bail!("max_concurrent_downloads must be at least 1");
        }

        if self.app.output_dir.as_os_str().is_empty() {
            anyhow::bail!("output_dir must not be empty");
        }

        Ok(())
    }
}
