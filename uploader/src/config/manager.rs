use super::ClientConfig;
use crate::errors::{ExchangeError, Result};
use std::path::Path;
use tokio::fs;
use tracing::{debug, info};

pub struct ConfigManager {
    current_config: ClientConfig,
}

impl ConfigManager {
    /// Load configuration from `path`, or fall back to defaults when no file
    /// was given. An explicitly named file that cannot be read is an error.
    pub async fn load(path: Option<&Path>) -> Result<Self> {
        let config = match path {
            Some(path) => Self::load_file(path).await?,
            None => {
                debug!("No config file given, using defaults");
                ClientConfig::default()
            }
        };
        Ok(Self {
            current_config: config,
        })
    }

    pub fn get_current_config(&self) -> &ClientConfig {
        &self.current_config
    }

    pub fn into_config(self) -> ClientConfig {
        self.current_config
    }

    async fn load_file(path: &Path) -> Result<ClientConfig> {
        let content = fs::read_to_string(path)
            .await
            .map_err(|e| ExchangeError::Config {
                path: path.display().to_string(),
                reason: e.to_string(),
            })?;

        let config: ClientConfig = toml::from_str(&content).map_err(|e| ExchangeError::Config {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;

        info!(
            "Loaded config from {} (user agent '{}', poll cap {:?})",
            path.display(),
            config.user_agent,
            config.max_import_polls
        );

        Ok(config)
    }
}
