//! Wallet seam for the burn core
//!
//! The core never signs or broadcasts itself. Everything chain-facing goes
//! through [`WalletClient`] and [`TokenMetadataSource`];
//! [`crate::infrastructure::evm::EthersWallet`] implements both.

use async_trait::async_trait;
use ethers::types::U256;

use crate::domain::entities::TokenInfo;
use crate::shared::types::{Address, BurnResult, ReceiptStatus, TokenMetadata, TransactionHash};

/// Connected wallet able to read balances and send burns
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait WalletClient: Send + Sync {
    /// Connected account
    fn address(&self) -> Address;

    /// Chain the wallet is currently on
    async fn chain_id(&self) -> BurnResult<u64>;

    /// Balance of `token` in its own base units
    async fn balance(&self, token: &TokenInfo) -> BurnResult<U256>;

    /// Plain value transfer of the native asset
    async fn send_native(&self, to: &str, value: U256) -> BurnResult<TransactionHash>;

    /// ERC-20 `transfer(to, value)` on `token`
    async fn transfer_token(&self, token: &str, to: &str, value: U256)
        -> BurnResult<TransactionHash>;

    /// Wait until `hash` is mined
    async fn wait_for_receipt(&self, hash: &str) -> BurnResult<ReceiptStatus>;
}

/// Reads ERC-20 metadata from a contract
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TokenMetadataSource: Send + Sync {
    async fn token_metadata(&self, address: &str) -> BurnResult<TokenMetadata>;
}
