//! EVM wallet adapter
//!
//! [`EthersWallet`] signs with a local key and talks JSON-RPC over HTTP.
//! [`EthersTokenReader`] only reads, for commands that need no key.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use ethers::middleware::SignerMiddleware;
use ethers::providers::{Http, Middleware, PendingTransaction, Provider};
use ethers::signers::{LocalWallet, Signer};
use ethers::types::{Address as EvmAddress, TransactionReceipt, TransactionRequest, H256, U256, U64};

use crate::core::wallet::{TokenMetadataSource, WalletClient};
use crate::domain::entities::TokenInfo;
use crate::infrastructure::config::Settings;
use crate::shared::error::BurnError;
use crate::shared::types::{Address, BurnResult, Network, ReceiptStatus, TokenMetadata, TransactionHash};

ethers::contract::abigen!(
    Erc20,
    r#"[
        function name() external view returns (string)
        function symbol() external view returns (string)
        function decimals() external view returns (uint8)
        function balanceOf(address account) external view returns (uint256)
        function transfer(address to, uint256 amount) external returns (bool)
    ]"#
);

type SigningClient = SignerMiddleware<Provider<Http>, LocalWallet>;

// Base produces a block every two seconds
const RECEIPT_POLL_INTERVAL: Duration = Duration::from_secs(2);

fn connect_provider(rpc_url: &str) -> BurnResult<Provider<Http>> {
    Provider::<Http>::try_from(rpc_url)
        .map_err(|e| BurnError::config(format!("Invalid RPC URL {}: {}", rpc_url, e)))
}

fn parse_address(address: &str) -> BurnResult<EvmAddress> {
    address
        .parse()
        .map_err(|_| BurnError::validation(format!("Invalid address: {}", address)))
}

fn format_hash(hash: H256) -> TransactionHash {
    format!("{:?}", hash)
}

/// Only a mined receipt is final. A transaction the node does not know
/// (yet) is a network condition, so the burn stays pending.
fn receipt_status(hash: H256, receipt: Option<TransactionReceipt>) -> BurnResult<ReceiptStatus> {
    let receipt = receipt.ok_or_else(|| {
        BurnError::network(format!("Transaction {:?} not found by the node", hash))
    })?;

    if receipt.status == Some(U64::from(1)) {
        Ok(ReceiptStatus::Confirmed)
    } else {
        Ok(ReceiptStatus::Reverted)
    }
}

async fn read_metadata<M: Middleware + 'static>(
    client: Arc<M>,
    address: &str,
) -> BurnResult<TokenMetadata> {
    let contract = Erc20::new(parse_address(address)?, client);

    let name = contract
        .name()
        .call()
        .await
        .map_err(|e| BurnError::network(format!("name() failed: {}", e)))?;
    let symbol = contract
        .symbol()
        .call()
        .await
        .map_err(|e| BurnError::network(format!("symbol() failed: {}", e)))?;
    let decimals = contract
        .decimals()
        .call()
        .await
        .map_err(|e| BurnError::network(format!("decimals() failed: {}", e)))?;

    Ok(TokenMetadata {
        name,
        symbol,
        decimals,
    })
}

/// Signing wallet backed by a local private key
pub struct EthersWallet {
    client: Arc<SigningClient>,
    network: Network,
}

impl EthersWallet {
    pub fn new(rpc_url: &str, private_key: &str, network: Network) -> BurnResult<Self> {
        let provider = connect_provider(rpc_url)?;
        let signer: LocalWallet = private_key
            .trim()
            .trim_start_matches("0x")
            .parse()
            .map_err(|e| BurnError::config(format!("Invalid private key: {}", e)))?;
        let signer = signer.with_chain_id(network.chain_id());

        log::info!(
            "Wallet {:?} connected to {} via {}",
            signer.address(),
            network,
            rpc_url
        );

        Ok(Self {
            client: Arc::new(SignerMiddleware::new(provider, signer)),
            network,
        })
    }

    pub fn from_settings(settings: &Settings) -> BurnResult<Self> {
        let key = settings
            .private_key
            .as_deref()
            .ok_or_else(|| BurnError::config("BASEBURN_PRIVATE_KEY is not set"))?;
        Self::new(settings.effective_rpc_url(), key, settings.network)
    }

    pub fn network(&self) -> Network {
        self.network
    }
}

#[async_trait]
impl WalletClient for EthersWallet {
    fn address(&self) -> Address {
        ethers::utils::to_checksum(&self.client.address(), None)
    }

    async fn chain_id(&self) -> BurnResult<u64> {
        let chain_id = self
            .client
            .get_chainid()
            .await
            .map_err(|e| BurnError::network(format!("Failed to read chain id: {}", e)))?;
        Ok(chain_id.as_u64())
    }

    async fn balance(&self, token: &TokenInfo) -> BurnResult<U256> {
        let owner = self.client.address();
        if token.is_native() {
            return self
                .client
                .get_balance(owner, None)
                .await
                .map_err(|e| BurnError::network(e.to_string()));
        }

        Erc20::new(parse_address(&token.address)?, self.client.clone())
            .balance_of(owner)
            .call()
            .await
            .map_err(|e| BurnError::network(e.to_string()))
    }

    async fn send_native(&self, to: &str, value: U256) -> BurnResult<TransactionHash> {
        let request = TransactionRequest::new().to(parse_address(to)?).value(value);
        let pending = self
            .client
            .send_transaction(request, None)
            .await
            .map_err(|e| BurnError::transaction(e.to_string()))?;
        Ok(format_hash(pending.tx_hash()))
    }

    async fn transfer_token(
        &self,
        token: &str,
        to: &str,
        value: U256,
    ) -> BurnResult<TransactionHash> {
        let contract = Erc20::new(parse_address(token)?, self.client.clone());
        let call = contract.transfer(parse_address(to)?, value);
        let pending = call
            .send()
            .await
            .map_err(|e| BurnError::transaction(e.to_string()))?;
        Ok(format_hash(pending.tx_hash()))
    }

    async fn wait_for_receipt(&self, hash: &str) -> BurnResult<ReceiptStatus> {
        let tx_hash: H256 = hash
            .parse()
            .map_err(|_| BurnError::validation(format!("Invalid transaction hash: {}", hash)))?;

        let receipt = PendingTransaction::new(tx_hash, self.client.provider())
            .interval(RECEIPT_POLL_INTERVAL)
            .await
            .map_err(|e| BurnError::network(format!("Receipt lookup failed: {}", e)))?;

        receipt_status(tx_hash, receipt)
    }
}

#[async_trait]
impl TokenMetadataSource for EthersWallet {
    async fn token_metadata(&self, address: &str) -> BurnResult<TokenMetadata> {
        read_metadata(self.client.clone(), address).await
    }
}

/// Read-only contract access, no key required
pub struct EthersTokenReader {
    provider: Arc<Provider<Http>>,
}

impl EthersTokenReader {
    pub fn new(rpc_url: &str) -> BurnResult<Self> {
        Ok(Self {
            provider: Arc::new(connect_provider(rpc_url)?),
        })
    }
}

#[async_trait]
impl TokenMetadataSource for EthersTokenReader {
    async fn token_metadata(&self, address: &str) -> BurnResult<TokenMetadata> {
        read_metadata(self.provider.clone(), address).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Well-known development key, never funded on Base
    const DEV_KEY: &str = "0xac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";
    const DEV_ADDRESS: &str = "0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266";

    #[test]
    fn test_wallet_address_from_key() {
        let wallet = EthersWallet::new("http://localhost:8545", DEV_KEY, Network::Base).unwrap();
        assert_eq!(wallet.address(), DEV_ADDRESS);
        assert_eq!(wallet.network(), Network::Base);
    }

    #[test]
    fn test_invalid_key_and_url() {
        assert!(matches!(
            EthersWallet::new("http://localhost:8545", "0x1234", Network::Base),
            Err(BurnError::Config(_))
        ));
        assert!(matches!(
            EthersWallet::new("not a url", DEV_KEY, Network::Base),
            Err(BurnError::Config(_))
        ));
        assert!(EthersTokenReader::new("::").is_err());
    }

    #[test]
    fn test_from_settings_requires_key() {
        let settings = Settings::default();
        assert!(matches!(
            EthersWallet::from_settings(&settings),
            Err(BurnError::Config(_))
        ));
    }

    #[test]
    fn test_parse_address() {
        assert!(parse_address(DEV_ADDRESS).is_ok());
        assert!(parse_address("native").is_err());
    }

    #[test]
    fn test_format_hash_is_full_length() {
        let hash = format_hash(H256::repeat_byte(0xab));
        assert_eq!(hash.len(), 66);
        assert!(hash.starts_with("0xabab"));
    }

    #[test]
    fn test_unknown_transaction_is_not_final() {
        let hash = H256::repeat_byte(0x01);
        assert!(matches!(receipt_status(hash, None), Err(BurnError::Network(_))));

        let mined = TransactionReceipt {
            status: Some(U64::from(1)),
            ..Default::default()
        };
        assert_eq!(receipt_status(hash, Some(mined)).unwrap(), ReceiptStatus::Confirmed);

        let reverted = TransactionReceipt {
            status: Some(U64::zero()),
            ..Default::default()
        };
        assert_eq!(receipt_status(hash, Some(reverted)).unwrap(), ReceiptStatus::Reverted);
    }

    #[tokio::test]
    async fn test_wait_rejects_malformed_hash() {
        let wallet = EthersWallet::new("http://localhost:8545", DEV_KEY, Network::Base).unwrap();
        let err = wallet.wait_for_receipt("0xnothex").await.unwrap_err();
        assert!(matches!(err, BurnError::Validation(_)));
    }
}
