pub mod manager;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
pub use manager::ConfigManager;

use crate::constants::defaults;

/// Client-side tuning for an exchange run.
///
/// Everything here is optional in the TOML file; the endpoint, credentials and
/// file list always come from the command line.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientConfig {
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
    // No timeout unless configured, imports can legitimately take long
    pub request_timeout_seconds: Option<u64>,
    // Safety valve for servers that never leave the progress state
    pub max_import_polls: Option<u32>,
    // Where the temporary archive is built (system temp dir otherwise)
    pub archive_dir: Option<PathBuf>,
    #[serde(default)]
    pub quiet: bool,
}

fn default_user_agent() -> String {
    defaults::USER_AGENT.to_string()
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            user_agent: default_user_agent(),
            request_timeout_seconds: None,
            max_import_polls: None,
            archive_dir: None,
            quiet: false,
        }
    }
}
