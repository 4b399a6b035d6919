//! BaseBurn Wallet Core
//!
//! Burn ledger for the BaseBurn mini app: records every burn attempt,
//! derives reward points from the successful ones and keeps both in a
//! local key/value store.
//!
//! ## Architecture
//!
//! - **Core**: ledger, ledger event channel, token registry, burn orchestration
//! - **Domain**: burn records, tokens and the storage trait
//! - **Infrastructure**: file/memory stores, settings, the ethers wallet adapter
//! - **Shared**: common types, constants, and utilities
//!
//! ## Usage
//!
//! ```no_run
//! use std::sync::Arc;
//! use baseburn_wallet_core::{init_burn_core, EthersWallet, Settings};
//!
//! # async fn run() -> Result<(), baseburn_wallet_core::BurnError> {
//! let settings = Settings::load()?;
//! let core = init_burn_core(settings.clone()).await?;
//! let wallet = Arc::new(EthersWallet::from_settings(&settings)?);
//!
//! let token = core.tokens.resolve("DEGEN")?;
//! let record = core.burner(wallet).burn_and_confirm(&token, "2.5").await?;
//! println!("{} earned {} points", record.id, record.points_earned);
//! # Ok(())
//! # }
//! ```

use std::sync::Arc;

use tokio::task::JoinHandle;

pub mod core;
pub mod domain;
pub mod infrastructure;
pub mod shared;

pub use crate::core::events::{spawn_ledger, LedgerEvent, LedgerHandle, LedgerSnapshot};
pub use crate::core::ledger::Ledger;
pub use crate::core::tokens::TokenRegistry;
pub use crate::core::transactions::{Burner, ConfirmationWatch, SubmittedBurn};
pub use crate::core::wallet::{TokenMetadataSource, WalletClient};
pub use domain::entities::{BurnRecord, BurnStatus, LedgerSummary, TokenInfo};
pub use domain::repositories::KeyValueStore;
pub use infrastructure::evm::{EthersTokenReader, EthersWallet};
pub use infrastructure::platform::{FileStorage, MemoryStorage};
pub use infrastructure::Settings;
pub use shared::error::{BurnError, TransactionFailure};
pub use shared::types::{Amount, BurnResult, Network};

/// Initialize `env_logger` with `level` as the default filter.
/// `RUST_LOG` still wins when set.
pub fn init_logging(level: &str) {
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp_millis()
        .try_init();
}

/// Initialize the burn core from settings: open the data directory,
/// rehydrate the ledger and token registry and start the ledger task.
pub async fn init_burn_core(settings: Settings) -> BurnResult<BurnCore> {
    let store: Arc<dyn KeyValueStore> = Arc::new(FileStorage::new(&settings.data_dir)?);
    log::info!("Using data directory {}", settings.data_dir.display());
    Ok(BurnCore::with_store(settings, store))
}

/// Main burn core struct that provides access to all functionality
pub struct BurnCore {
    pub settings: Settings,
    pub tokens: TokenRegistry,
    ledger: LedgerHandle,
    ledger_task: JoinHandle<Ledger>,
}

impl BurnCore {
    /// Build the core over any store. Must run inside a tokio runtime.
    pub fn with_store(settings: Settings, store: Arc<dyn KeyValueStore>) -> Self {
        let tokens = TokenRegistry::rehydrate(store.clone());
        let (ledger, ledger_task) = spawn_ledger(Ledger::rehydrate(store));
        Self {
            settings,
            tokens,
            ledger,
            ledger_task,
        }
    }

    pub fn ledger(&self) -> &LedgerHandle {
        &self.ledger
    }

    pub fn burner(&self, wallet: Arc<dyn WalletClient>) -> Burner {
        Burner::new(self.ledger.clone(), wallet, self.settings.network)
    }

    pub async fn history(&self) -> BurnResult<Vec<BurnRecord>> {
        Ok(self.ledger.snapshot().await?.history)
    }

    pub async fn summary(&self) -> BurnResult<LedgerSummary> {
        Ok(self.ledger.snapshot().await?.summary)
    }

    /// Stop the ledger task and return the ledger.
    ///
    /// Waits for every outstanding [`LedgerHandle`] (burners and watchers
    /// included) to be dropped.
    pub async fn shutdown(self) -> BurnResult<Ledger> {
        drop(self.ledger);
        Ok(self.ledger_task.await?)
    }
}
