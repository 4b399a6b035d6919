//! Burn orchestration
//!
//! [`Burner`] validates a burn, records it as pending, hands it to the
//! wallet and spawns a watcher that reports the receipt back to the ledger.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;

use crate::core::events::LedgerHandle;
use crate::core::ledger::validate_amount;
use crate::core::wallet::WalletClient;
use crate::domain::entities::{BurnRecord, BurnStatus, TokenInfo};
use crate::shared::constants::{BURN_ADDRESS, TRANSACTION_CONFIRMATION_TIMEOUT};
use crate::shared::error::{BurnError, TransactionFailure};
use crate::shared::types::{Amount, BurnResult, Network, ReceiptStatus, TransactionHash};

/// Background wait for one transaction receipt
#[derive(Debug)]
pub struct ConfirmationWatch {
    pub id: String,
    pub hash: TransactionHash,
    task: JoinHandle<Option<BurnStatus>>,
}

impl ConfirmationWatch {
    /// Terminal status the ledger applied, or `None` if the record was
    /// left unchanged (receipt unavailable, timed out, or already settled).
    pub async fn wait(self) -> BurnResult<Option<BurnStatus>> {
        Ok(self.task.await?)
    }
}

/// A burn handed to the wallet, with its receipt watcher
#[derive(Debug)]
pub struct SubmittedBurn {
    pub record: BurnRecord,
    pub watch: ConfirmationWatch,
}

pub struct Burner {
    ledger: LedgerHandle,
    wallet: Arc<dyn WalletClient>,
    network: Network,
    confirmation_timeout: Duration,
}

impl Burner {
    pub fn new(ledger: LedgerHandle, wallet: Arc<dyn WalletClient>, network: Network) -> Self {
        Self {
            ledger,
            wallet,
            network,
            confirmation_timeout: Duration::from_millis(TRANSACTION_CONFIRMATION_TIMEOUT),
        }
    }

    pub fn with_confirmation_timeout(mut self, timeout: Duration) -> Self {
        self.confirmation_timeout = timeout;
        self
    }

    pub fn ledger(&self) -> &LedgerHandle {
        &self.ledger
    }

    /// Submit a burn and return once the wallet has assigned a hash.
    ///
    /// The pending record is written before the wallet is asked to send.
    /// A wallet failure marks the record failed and returns a
    /// [`BurnError::Transaction`] carrying the user-facing category.
    pub async fn submit_burn(&self, token: &TokenInfo, amount: &str) -> BurnResult<SubmittedBurn> {
        let requested = validate_amount(amount, None)?;
        let value = requested.to_base_units(token.decimals)?;

        let chain_id = self.wallet.chain_id().await?;
        if chain_id != self.network.chain_id() {
            return Err(BurnError::WrongNetwork {
                expected: self.network.chain_id(),
                actual: chain_id,
            });
        }

        let balance = self
            .wallet
            .balance(token)
            .await
            .map_err(|e| BurnError::balance_unavailable(e.to_string()))?;
        let balance = Amount::from_base_units(balance, token.decimals);

        let record = self.ledger.submit(amount, token, Some(balance)).await?;

        let sent = if token.is_native() {
            self.wallet.send_native(BURN_ADDRESS, value).await
        } else {
            self.wallet
                .transfer_token(&token.address, BURN_ADDRESS, value)
                .await
        };

        let hash = match sent {
            Ok(hash) => hash,
            Err(e) => {
                let error = categorise(e);
                log::error!("Burn {} was not sent: {}", record.id, error);
                if let Err(e) = self.ledger.mark_failed(&record.id).await {
                    log::error!("Failed to mark burn {} as failed: {}", record.id, e);
                }
                return Err(error);
            }
        };

        // Already broadcast: the watcher must run even if the hash write failed
        if let Err(e) = self.ledger.attach_hash(&record.id, &hash).await {
            log::error!("Burn {} sent as {} but the hash was not saved: {}", record.id, hash, e);
        }
        log::info!(
            "Burn {} sent: {}",
            record.id,
            self.network.tx_url(&hash)
        );

        let watch = self.watch_confirmation(&record.id, &hash);
        let record = BurnRecord { hash, ..record };
        Ok(SubmittedBurn { record, watch })
    }

    /// Submit a burn and wait for its receipt. Returns the record as the
    /// ledger holds it afterwards.
    pub async fn burn_and_confirm(&self, token: &TokenInfo, amount: &str) -> BurnResult<BurnRecord> {
        let submitted = self.submit_burn(token, amount).await?;
        let id = submitted.record.id.clone();
        submitted.watch.wait().await?;

        self.ledger
            .snapshot()
            .await?
            .record(&id)
            .cloned()
            .ok_or_else(|| BurnError::record_not_found(id))
    }

    /// Spawn a task that waits for `hash` and reports the outcome once.
    pub fn watch_confirmation(&self, id: &str, hash: &str) -> ConfirmationWatch {
        let task = tokio::spawn(watch_receipt(
            self.ledger.clone(),
            self.wallet.clone(),
            id.to_string(),
            hash.to_string(),
            self.confirmation_timeout,
        ));
        ConfirmationWatch {
            id: id.to_string(),
            hash: hash.to_string(),
            task,
        }
    }

    /// Re-attach watchers to pending records that already have a hash.
    /// Records without a hash were never sent and stay pending.
    pub async fn resume_pending(&self) -> BurnResult<Vec<ConfirmationWatch>> {
        let snapshot = self.ledger.snapshot().await?;
        let watches: Vec<ConfirmationWatch> = snapshot
            .pending()
            .filter(|record| record.has_hash())
            .map(|record| self.watch_confirmation(&record.id, &record.hash))
            .collect();

        log::info!("Resumed {} pending burn(s)", watches.len());
        Ok(watches)
    }
}

fn categorise(error: BurnError) -> BurnError {
    match error {
        BurnError::Transaction(_) => error,
        other => BurnError::transaction(other.to_string()),
    }
}

async fn watch_receipt(
    ledger: LedgerHandle,
    wallet: Arc<dyn WalletClient>,
    id: String,
    hash: String,
    timeout: Duration,
) -> Option<BurnStatus> {
    let failure = match tokio::time::timeout(timeout, wallet.wait_for_receipt(&hash)).await {
        Ok(Ok(ReceiptStatus::Confirmed)) => None,
        Ok(Ok(ReceiptStatus::Reverted)) => Some(TransactionFailure::Reverted),
        Ok(Err(BurnError::Transaction(failure))) => Some(failure),
        Ok(Err(e)) => {
            log::warn!("Receipt for {} unavailable, burn {} stays pending: {}", hash, id, e);
            return None;
        }
        Err(_) => {
            log::warn!("Timed out waiting for {}, burn {} stays pending", hash, id);
            return None;
        }
    };

    let applied = match failure {
        None => ledger.mark_success(&id).await,
        Some(failure) => {
            log::warn!("Burn {} failed: {}", id, failure);
            ledger.mark_failed(&id).await
        }
    };

    match applied {
        Ok(record) => Some(record.status),
        Err(e @ BurnError::InvalidTransition { .. }) => {
            log::warn!("Receipt for {} not applied: {}", hash, e);
            None
        }
        Err(e) => {
            log::error!("Could not record receipt for {}: {}", hash, e);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::events::spawn_ledger;
    use crate::core::ledger::Ledger;
    use crate::core::wallet::MockWalletClient;
    use crate::domain::repositories::KeyValueStore;
    use crate::infrastructure::platform::MemoryStorage;
    use crate::shared::constants::BASE_MEME_TOKENS;
    use ethers::types::U256;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn eth() -> TokenInfo {
        TokenInfo::from(&BASE_MEME_TOKENS[0])
    }

    fn degen() -> TokenInfo {
        TokenInfo::from(&BASE_MEME_TOKENS[1])
    }

    fn ether(units: u64) -> U256 {
        U256::from(units) * U256::exp10(18)
    }

    fn on_base(wallet: &mut MockWalletClient, balance: U256) {
        wallet.expect_chain_id().returning(|| Ok(8453));
        wallet.expect_balance().returning(move |_| Ok(balance));
    }

    fn burner(wallet: MockWalletClient) -> Burner {
        let (ledger, _task) = spawn_ledger(Ledger::rehydrate(Arc::new(MemoryStorage::new())));
        Burner::new(ledger, Arc::new(wallet), Network::Base)
    }

    #[tokio::test]
    async fn test_native_burn_confirms() {
        let mut wallet = MockWalletClient::new();
        on_base(&mut wallet, ether(10));
        wallet
            .expect_send_native()
            .withf(|to: &str, value: &U256| {
                to == BURN_ADDRESS && *value == U256::from(2_500_000_000_000_000_000u128)
            })
            .times(1)
            .returning(|_, _| Ok("0xabc".to_string()));
        wallet
            .expect_wait_for_receipt()
            .returning(|_| Ok(ReceiptStatus::Confirmed));

        let burner = burner(wallet);
        let record = burner.burn_and_confirm(&eth(), "2.5").await.unwrap();

        assert_eq!(record.status, BurnStatus::Success);
        assert_eq!(record.hash, "0xabc");
        assert_eq!(record.points_earned, 250);
        assert_eq!(burner.ledger().snapshot().await.unwrap().summary.points, 250);
    }

    #[tokio::test]
    async fn test_token_burn_uses_transfer() {
        let mut wallet = MockWalletClient::new();
        on_base(&mut wallet, ether(100));
        let address = degen().address;
        wallet
            .expect_transfer_token()
            .withf(move |token: &str, to: &str, value: &U256| {
                token == address && to == BURN_ADDRESS && *value == ether(3)
            })
            .times(1)
            .returning(|_, _, _| Ok("0xdef".to_string()));
        wallet
            .expect_wait_for_receipt()
            .returning(|_| Ok(ReceiptStatus::Confirmed));

        let burner = burner(wallet);
        let submitted = burner.submit_burn(&degen(), "3").await.unwrap();
        assert_eq!(submitted.record.status, BurnStatus::Pending);
        assert_eq!(submitted.record.hash, "0xdef");

        assert_eq!(submitted.watch.wait().await.unwrap(), Some(BurnStatus::Success));
    }

    #[tokio::test]
    async fn test_invalid_amount_touches_nothing() {
        // No expectations: any wallet call panics
        let burner = burner(MockWalletClient::new());

        for amount in ["", "0", "-1", "abc"] {
            let err = burner.submit_burn(&eth(), amount).await.unwrap_err();
            assert!(matches!(err, BurnError::Validation(_)));
        }
        assert!(burner.ledger().snapshot().await.unwrap().history.is_empty());
    }

    #[tokio::test]
    async fn test_wrong_network() {
        let mut wallet = MockWalletClient::new();
        wallet.expect_chain_id().returning(|| Ok(1));

        let burner = burner(wallet);
        let err = burner.submit_burn(&eth(), "1").await.unwrap_err();
        assert_eq!(err, BurnError::WrongNetwork { expected: 8453, actual: 1 });
        assert!(burner.ledger().snapshot().await.unwrap().history.is_empty());
    }

    #[tokio::test]
    async fn test_balance_checks() {
        let mut wallet = MockWalletClient::new();
        wallet.expect_chain_id().returning(|| Ok(8453));
        wallet
            .expect_balance()
            .times(1)
            .returning(|_| Err(BurnError::network("rpc down")));
        let burner = burner(wallet);
        let err = burner.submit_burn(&eth(), "1").await.unwrap_err();
        assert!(matches!(err, BurnError::BalanceUnavailable(_)));

        let mut wallet = MockWalletClient::new();
        on_base(&mut wallet, ether(1));
        let burner = self::burner(wallet);
        let err = burner.submit_burn(&eth(), "1.5").await.unwrap_err();
        assert!(matches!(err, BurnError::Validation(_)));
        assert!(burner.ledger().snapshot().await.unwrap().history.is_empty());
    }

    #[tokio::test]
    async fn test_user_rejection_marks_failed() {
        let mut wallet = MockWalletClient::new();
        on_base(&mut wallet, ether(10));
        wallet
            .expect_send_native()
            .returning(|_, _| Err(BurnError::network("User rejected the request.")));

        let burner = burner(wallet);
        let err = burner.submit_burn(&eth(), "1").await.unwrap_err();
        assert_eq!(err, BurnError::Transaction(TransactionFailure::UserRejected));
        assert_eq!(err.to_string(), "Transaction error: Transaction cancelled");

        let snapshot = burner.ledger().snapshot().await.unwrap();
        assert_eq!(snapshot.history.len(), 1);
        assert_eq!(snapshot.history[0].status, BurnStatus::Failed);
        assert_eq!(snapshot.summary.points, 0);
    }

    #[tokio::test]
    async fn test_reverted_receipt_marks_failed() {
        let mut wallet = MockWalletClient::new();
        on_base(&mut wallet, ether(10));
        wallet
            .expect_send_native()
            .returning(|_, _| Ok("0x01".to_string()));
        wallet
            .expect_wait_for_receipt()
            .returning(|_| Ok(ReceiptStatus::Reverted));

        let burner = burner(wallet);
        let record = burner.burn_and_confirm(&eth(), "1").await.unwrap();
        assert_eq!(record.status, BurnStatus::Failed);
        assert_eq!(burner.ledger().snapshot().await.unwrap().summary.points, 0);
    }

    #[tokio::test]
    async fn test_receipt_error_leaves_pending() {
        let mut wallet = MockWalletClient::new();
        on_base(&mut wallet, ether(10));
        wallet
            .expect_send_native()
            .returning(|_, _| Ok("0x02".to_string()));
        wallet
            .expect_wait_for_receipt()
            .returning(|_| Err(BurnError::network("connection reset")));

        let burner = burner(wallet);
        let record = burner.burn_and_confirm(&eth(), "1").await.unwrap();
        assert_eq!(record.status, BurnStatus::Pending);
        assert_eq!(record.hash, "0x02");
    }

    #[tokio::test]
    async fn test_too_many_decimals_for_token() {
        let burner = burner(MockWalletClient::new());
        let normie = TokenInfo::from(&BASE_MEME_TOKENS[6]);
        assert_eq!(normie.decimals, 9);

        let err = burner.submit_burn(&normie, "0.0000000001").await.unwrap_err();
        assert!(matches!(err, BurnError::Validation(_)));
    }

    #[tokio::test]
    async fn test_resume_pending() {
        let store = Arc::new(MemoryStorage::new());
        {
            let mut ledger = Ledger::rehydrate(store.clone());
            let sent = ledger.submit("1", &eth(), None).unwrap();
            ledger.attach_hash(&sent.id, "0xaaa").unwrap();
            ledger.submit("2", &eth(), None).unwrap();
        }
        assert!(store.get(crate::shared::constants::HISTORY_KEY).unwrap().is_some());

        let mut wallet = MockWalletClient::new();
        wallet
            .expect_wait_for_receipt()
            .withf(|hash: &str| hash == "0xaaa")
            .times(1)
            .returning(|_| Ok(ReceiptStatus::Confirmed));

        let (ledger, _task) = spawn_ledger(Ledger::rehydrate(store));
        let burner = Burner::new(ledger, Arc::new(wallet), Network::Base);

        let watches = burner.resume_pending().await.unwrap();
        assert_eq!(watches.len(), 1);
        assert_eq!(watches[0].hash, "0xaaa");
        for watch in watches {
            assert_eq!(watch.wait().await.unwrap(), Some(BurnStatus::Success));
        }

        let snapshot = burner.ledger().snapshot().await.unwrap();
        assert_eq!(snapshot.summary.points, 100);
        assert_eq!(snapshot.pending().count(), 1);
    }

    /// Store whose `nth` write (1-based) fails once
    struct FailingWrite {
        inner: MemoryStorage,
        writes: AtomicUsize,
        nth: usize,
    }

    impl FailingWrite {
        fn on(nth: usize) -> Self {
            Self {
                inner: MemoryStorage::new(),
                writes: AtomicUsize::new(0),
                nth,
            }
        }
    }

    impl KeyValueStore for FailingWrite {
        fn get(&self, key: &str) -> BurnResult<Option<String>> {
            self.inner.get(key)
        }

        fn set(&self, key: &str, value: &str) -> BurnResult<()> {
            if self.writes.fetch_add(1, Ordering::SeqCst) + 1 == self.nth {
                return Err(BurnError::storage("disk full"));
            }
            self.inner.set(key, value)
        }

        fn remove(&self, key: &str) -> BurnResult<()> {
            self.inner.remove(key)
        }

        fn keys(&self) -> BurnResult<Vec<String>> {
            self.inner.keys()
        }
    }

    #[tokio::test]
    async fn test_broadcast_burn_survives_hash_write_failure() {
        // Write 1 is the pending record, write 2 the hash
        let store = Arc::new(FailingWrite::on(2));
        let mut wallet = MockWalletClient::new();
        on_base(&mut wallet, ether(10));
        wallet
            .expect_send_native()
            .returning(|_, _| Ok("0xbroadcast".to_string()));
        wallet
            .expect_wait_for_receipt()
            .withf(|hash: &str| hash == "0xbroadcast")
            .returning(|_| Ok(ReceiptStatus::Confirmed));

        let (ledger, _task) = spawn_ledger(Ledger::rehydrate(store.clone()));
        let burner = Burner::new(ledger, Arc::new(wallet), Network::Base);

        let submitted = burner.submit_burn(&eth(), "1").await.unwrap();
        assert_eq!(submitted.record.hash, "0xbroadcast");
        assert_eq!(submitted.watch.wait().await.unwrap(), Some(BurnStatus::Success));

        let reloaded = Ledger::rehydrate(store);
        assert_eq!(reloaded.history()[0].hash, "0xbroadcast");
        assert_eq!(reloaded.history()[0].status, BurnStatus::Success);
        assert_eq!(reloaded.summary().points, 100);
    }

    #[tokio::test]
    async fn test_unsaved_hash_is_still_resumable() {
        let store = Arc::new(FailingWrite::on(2));
        let mut wallet = MockWalletClient::new();
        on_base(&mut wallet, ether(10));
        wallet
            .expect_send_native()
            .returning(|_, _| Ok("0xbroadcast".to_string()));
        wallet
            .expect_wait_for_receipt()
            .returning(|_| Err(BurnError::network("receipt not available yet")));

        let (ledger, _task) = spawn_ledger(Ledger::rehydrate(store));
        let burner = Burner::new(ledger, Arc::new(wallet), Network::Base);

        let submitted = burner.submit_burn(&eth(), "1").await.unwrap();
        assert_eq!(submitted.watch.wait().await.unwrap(), None);

        let watches = burner.resume_pending().await.unwrap();
        assert_eq!(watches.len(), 1);
        assert_eq!(watches[0].hash, "0xbroadcast");
    }

    #[tokio::test]
    async fn test_duplicate_watchers_apply_once() {
        let mut wallet = MockWalletClient::new();
        wallet
            .expect_wait_for_receipt()
            .returning(|_| Ok(ReceiptStatus::Confirmed));
        let burner = burner(wallet);

        let record = burner.ledger().submit("1", &eth(), None).await.unwrap();
        burner.ledger().attach_hash(&record.id, "0xaaa").await.unwrap();

        let first = burner.watch_confirmation(&record.id, "0xaaa");
        let second = burner.watch_confirmation(&record.id, "0xaaa");
        let mut outcomes = vec![first.wait().await.unwrap(), second.wait().await.unwrap()];
        outcomes.sort_by_key(|outcome| outcome.is_some());

        assert_eq!(outcomes, vec![None, Some(BurnStatus::Success)]);
        assert_eq!(burner.ledger().snapshot().await.unwrap().summary.points, 100);
    }

    #[test]
    fn test_categorise_keeps_transaction_errors() {
        let reverted = BurnError::Transaction(TransactionFailure::Reverted);
        assert_eq!(categorise(reverted.clone()), reverted);
        assert_eq!(
            categorise(BurnError::network("insufficient funds for gas")),
            BurnError::Transaction(TransactionFailure::InsufficientGas)
        );
    }
}
