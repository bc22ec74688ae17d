//! Graph API client configuration.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GraphConfig {
    /// Page access token for the Send API.
    pub access_token: String,
    /// Graph API version segment, e.g. `v19.0`.
    #[serde(default = "default_api_version")]
    pub api_version: String,
}

fn default_api_version() -> String {
    "v19.0".to_string()
}

impl GraphConfig {
    pub fn from_path(path: &str) -> anyhow::Result<Self> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("Failed to read messenger config {}: {}", path, e))?;
        let config: GraphConfig = toml::from_str(&contents)
            .map_err(|e| anyhow::anyhow!("Invalid messenger config: {}", e))?;
        Ok(config)
    }

    pub fn from_env() -> anyhow::Result<Self> {
        let access_token = std::env::var("MESSENGER_ACCESS_TOKEN").map_err(|_| {
            anyhow::anyhow!("MESSENGER_ACCESS_TOKEN environment variable is required")
        })?;

        let api_version =
            std::env::var("MESSENGER_API_VERSION").unwrap_or_else(|_| default_api_version());

        Ok(Self {
            access_token,
            api_version,
        })
    }
}
