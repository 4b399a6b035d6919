//! Token entity for the burn core

use serde::{Deserialize, Serialize};

use crate::shared::constants::{TokenConfig, CUSTOM_TOKEN_LOGO};
use crate::shared::types::TokenMetadata;
use crate::shared::utils::is_native_address;

/// Token the user can burn. Serialized exactly as the mini app stores it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenInfo {
    pub symbol: String,
    pub name: String,
    /// Contract address, or `"native"` for the chain's own asset
    pub address: String,
    pub decimals: u8,
    pub logo: String,
}

impl TokenInfo {
    /// Build a custom token from contract metadata
    pub fn custom(address: &str, metadata: TokenMetadata) -> Self {
        Self {
            symbol: metadata.symbol,
            name: metadata.name,
            address: address.to_string(),
            decimals: metadata.decimals,
            logo: CUSTOM_TOKEN_LOGO.to_string(),
        }
    }

    pub fn is_native(&self) -> bool {
        is_native_address(&self.address)
    }

    /// Case-insensitive address comparison
    pub fn has_address(&self, address: &str) -> bool {
        self.address.eq_ignore_ascii_case(address)
    }
}

impl From<&TokenConfig> for TokenInfo {
    fn from(config: &TokenConfig) -> Self {
        Self {
            symbol: config.symbol.to_string(),
            name: config.name.to_string(),
            address: config.address.to_string(),
            decimals: config.decimals,
            logo: config.logo.to_string(),
        }
    }
}
