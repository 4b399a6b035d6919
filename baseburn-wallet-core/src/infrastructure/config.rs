//! Runtime settings
//!
//! Resolution order: built-in defaults, then an optional `baseburn.toml`
//! (or the file named by `BASEBURN_CONFIG`), then `BASEBURN_*` environment
//! variables. A `.env` file is loaded first when present.

use std::path::PathBuf;

use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};

use crate::infrastructure::platform::FileStorage;
use crate::shared::constants::{CONFIG_FILE_NAME, ENV_PREFIX};
use crate::shared::error::BurnError;
use crate::shared::types::Network;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub network: Network,
    /// Overrides the network's public RPC endpoint
    #[serde(default)]
    pub rpc_url: Option<String>,
    #[serde(default = "FileStorage::default_dir")]
    pub data_dir: PathBuf,
    /// Hex key used by the CLI wallet. Never printed.
    #[serde(default, skip_serializing)]
    pub private_key: Option<String>,
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            network: Network::default(),
            rpc_url: None,
            data_dir: FileStorage::default_dir(),
            private_key: None,
            log_level: default_log_level(),
        }
    }
}

impl Settings {
    pub fn load() -> Result<Self, BurnError> {
        dotenv::dotenv().ok();

        let file = std::env::var(format!("{}_CONFIG", ENV_PREFIX))
            .unwrap_or_else(|_| CONFIG_FILE_NAME.to_string());

        let settings: Settings = Config::builder()
            .add_source(File::with_name(&file).required(false))
            .add_source(Environment::with_prefix(ENV_PREFIX))
            .build()?
            .try_deserialize()?;

        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> Result<(), BurnError> {
        if let Some(url) = &self.rpc_url {
            if !(url.starts_with("http://") || url.starts_with("https://")) {
                return Err(BurnError::config(format!("rpc_url must be an http(s) URL: {}", url)));
            }
        }
        if self.data_dir.as_os_str().is_empty() {
            return Err(BurnError::config("data_dir cannot be empty"));
        }
        Ok(())
    }

    /// RPC endpoint actually used: the override or the network default
    pub fn effective_rpc_url(&self) -> &str {
        self.rpc_url.as_deref().unwrap_or_else(|| self.network.rpc_url())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_settings() {
        let settings = Settings::default();
        assert_eq!(settings.network, Network::Base);
        assert_eq!(settings.effective_rpc_url(), "https://mainnet.base.org");
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_rpc_override() {
        let settings = Settings {
            rpc_url: Some("http://localhost:8545".to_string()),
            ..Settings::default()
        };
        assert_eq!(settings.effective_rpc_url(), "http://localhost:8545");

        let bad = Settings {
            rpc_url: Some("localhost:8545".to_string()),
            ..Settings::default()
        };
        assert!(matches!(bad.validate(), Err(BurnError::Config(_))));
    }

    #[test]
    fn test_private_key_is_never_serialized() {
        let settings = Settings {
            private_key: Some("0xsecret".to_string()),
            ..Settings::default()
        };
        let json = serde_json::to_string(&settings).unwrap();
        assert!(!json.contains("secret"));
    }

    #[test]
    fn test_deserialize_network_names() {
        let settings: Settings =
            serde_json::from_str(r#"{"network":"base_sepolia","data_dir":"/tmp/x"}"#).unwrap();
        assert_eq!(settings.network, Network::BaseSepolia);
        assert_eq!(settings.log_level, "info");
    }
}
