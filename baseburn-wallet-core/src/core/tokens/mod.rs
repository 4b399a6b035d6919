//! Token registry
//!
//! Built-in Base meme tokens plus user-added ERC-20 contracts. Custom tokens
//! are persisted under `custom-tokens`.

use std::sync::Arc;
use std::time::Duration;

use crate::core::wallet::TokenMetadataSource;
use crate::domain::entities::TokenInfo;
use crate::domain::repositories::KeyValueStore;
use crate::shared::constants::{BASE_MEME_TOKENS, CUSTOM_TOKENS_KEY, METADATA_LOOKUP_RETRIES};
use crate::shared::error::BurnError;
use crate::shared::types::{BurnResult, TokenMetadata};
use crate::shared::utils::validate_ethereum_address;

const DEFAULT_RETRY_DELAY: Duration = Duration::from_millis(500);

pub struct TokenRegistry {
    store: Arc<dyn KeyValueStore>,
    custom: Vec<TokenInfo>,
    retry_delay: Duration,
}

impl TokenRegistry {
    /// Load custom tokens; a missing or malformed list is treated as empty.
    pub fn rehydrate(store: Arc<dyn KeyValueStore>) -> Self {
        let custom = match store.get(CUSTOM_TOKENS_KEY) {
            Ok(Some(json)) => serde_json::from_str(&json).unwrap_or_else(|e| {
                log::warn!("Discarding malformed custom token list: {}", e);
                Vec::new()
            }),
            Ok(None) => Vec::new(),
            Err(e) => {
                log::warn!("Failed to read custom tokens: {}", e);
                Vec::new()
            }
        };

        Self {
            store,
            custom,
            retry_delay: DEFAULT_RETRY_DELAY,
        }
    }

    /// Pause between metadata lookup attempts
    pub fn with_retry_delay(mut self, delay: Duration) -> Self {
        self.retry_delay = delay;
        self
    }

    pub fn builtin_tokens() -> Vec<TokenInfo> {
        BASE_MEME_TOKENS.iter().map(TokenInfo::from).collect()
    }

    pub fn custom_tokens(&self) -> &[TokenInfo] {
        &self.custom
    }

    /// Built-ins first, then custom tokens in the order they were added
    pub fn all_tokens(&self) -> Vec<TokenInfo> {
        let mut tokens = Self::builtin_tokens();
        tokens.extend(self.custom.iter().cloned());
        tokens
    }

    /// Look a token up by symbol or address, ignoring case
    pub fn find(&self, query: &str) -> Option<TokenInfo> {
        let query = query.trim();
        self.all_tokens().into_iter().find(|token| {
            token.symbol.eq_ignore_ascii_case(query) || token.has_address(query)
        })
    }

    pub fn resolve(&self, query: &str) -> BurnResult<TokenInfo> {
        self.find(query)
            .ok_or_else(|| BurnError::token_not_found(query))
    }

    fn contains_address(&self, address: &str) -> bool {
        BASE_MEME_TOKENS
            .iter()
            .any(|token| token.address.eq_ignore_ascii_case(address))
            || self.custom.iter().any(|token| token.has_address(address))
    }

    /// Add an ERC-20 contract after reading its metadata.
    pub async fn add_custom_token(
        &mut self,
        address: &str,
        source: &dyn TokenMetadataSource,
    ) -> BurnResult<TokenInfo> {
        let address = address.trim();
        validate_ethereum_address(address)
            .map_err(|_| BurnError::validation("Please enter a valid contract address (0x...)"))?;

        if self.contains_address(address) {
            return Err(BurnError::token_already_exists(address));
        }

        let metadata = self.lookup_metadata(address, source).await?;
        let token = TokenInfo::custom(address, metadata);

        self.custom.push(token.clone());
        if let Err(e) = self.persist() {
            self.custom.pop();
            return Err(e);
        }

        log::info!("Added custom token {} ({})", token.symbol, token.address);
        Ok(token)
    }

    async fn lookup_metadata(
        &self,
        address: &str,
        source: &dyn TokenMetadataSource,
    ) -> BurnResult<TokenMetadata> {
        let mut attempt = 0;
        loop {
            match source.token_metadata(address).await {
                Ok(metadata) if !metadata.name.is_empty() && !metadata.symbol.is_empty() => {
                    return Ok(metadata)
                }
                Ok(_) => log::warn!("Token {} returned empty metadata", address),
                Err(e) => log::warn!("Metadata lookup for {} failed: {}", address, e),
            }

            if attempt >= METADATA_LOOKUP_RETRIES {
                return Err(BurnError::validation(
                    "Unable to fetch token information. Please check the contract address.",
                ));
            }
            attempt += 1;
            tokio::time::sleep(self.retry_delay).await;
        }
    }

    fn persist(&self) -> BurnResult<()> {
        let json = serde_json::to_string(&self.custom)?;
        self.store.set(CUSTOM_TOKENS_KEY, &json)
    }
}
