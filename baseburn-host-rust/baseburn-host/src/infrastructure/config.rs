use anyhow::{anyhow, Result};
use serde::Serialize;
use std::env;

pub const DEFAULT_PORT: u16 = 4000;
pub const DEFAULT_MINIAPP_NAME: &str = "BurnFarcaster";
pub const DEFAULT_HOSTED_MANIFEST_URL: &str =
    "https://api.farcaster.xyz/miniapps/manifest/01979542-1343-514a-249a-664b5a5cb299";

#[derive(Debug, Clone, Serialize)]
pub struct HostConfig {
    pub port: u16,
    pub public_url: Option<String>,
    pub farcaster_header: Option<String>,
    pub farcaster_payload: Option<String>,
    #[serde(skip_serializing)]
    pub farcaster_signature: Option<String>,
    pub miniapp_name: String,
    pub hosted_manifest_url: String,
    pub environment: String,
    pub log_level: String,
    pub log_dir: String,
}

impl Default for HostConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            public_url: None,
            farcaster_header: None,
            farcaster_payload: None,
            farcaster_signature: None,
            miniapp_name: DEFAULT_MINIAPP_NAME.to_string(),
            hosted_manifest_url: DEFAULT_HOSTED_MANIFEST_URL.to_string(),
            environment: "development".to_string(),
            log_level: "info".to_string(),
            log_dir: "logs".to_string(),
        }
    }
}

impl HostConfig {
    /// Load from the process environment after reading `.env`.
    pub fn from_env() -> Result<Self> {
        dotenv::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build from any key lookup. Empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());
        let defaults = Self::default();

        let port = match get("PORT") {
            Some(raw) => raw
                .parse::<u16>()
                .map_err(|_| anyhow!("PORT must be a number between 0 and 65535, got '{}'", raw))?,
            None => defaults.port,
        };

        Ok(Self {
            port,
            public_url: get("NEXT_PUBLIC_URL"),
            farcaster_header: get("FARCASTER_HEADER"),
            farcaster_payload: get("FARCASTER_PAYLOAD"),
            farcaster_signature: get("FARCASTER_SIGNATURE"),
            miniapp_name: get("MINIAPP_NAME").unwrap_or(defaults.miniapp_name),
            hosted_manifest_url: get("HOSTED_MANIFEST_URL").unwrap_or(defaults.hosted_manifest_url),
            environment: get("ENVIRONMENT").unwrap_or(defaults.environment),
            log_level: get("LOG_LEVEL").unwrap_or(defaults.log_level),
            log_dir: get("LOG_DIR").unwrap_or(defaults.log_dir),
        })
    }

    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    pub fn is_valid_http_url(url: &str) -> bool {
        (url.starts_with("https://") || url.starts_with("http://")) && url.len() > "https://".len()
    }

    /// Every problem found, empty when the configuration is usable.
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();

        if let Some(url) = &self.public_url {
            if !Self::is_valid_http_url(url) {
                errors.push(format!("NEXT_PUBLIC_URL must be an http(s) URL, got '{url}'"));
            }
        }

        if !Self::is_valid_http_url(&self.hosted_manifest_url) {
            errors.push(format!(
                "HOSTED_MANIFEST_URL must be an http(s) URL, got '{}'",
                self.hosted_manifest_url
            ));
        }

        if self.miniapp_name.is_empty() {
            errors.push("MINIAPP_NAME cannot be empty".to_string());
        }

        if self.is_production() {
            let required = [
                ("NEXT_PUBLIC_URL", &self.public_url),
                ("FARCASTER_HEADER", &self.farcaster_header),
                ("FARCASTER_PAYLOAD", &self.farcaster_payload),
                ("FARCASTER_SIGNATURE", &self.farcaster_signature),
            ];
            for (name, value) in required {
                if value.is_none() {
                    errors.push(format!("{name} is required in production environment"));
                }
            }
        }

        errors
    }
}
