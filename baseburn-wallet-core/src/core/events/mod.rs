//! Ledger event channel
//!
//! The [`Ledger`] is moved into a single consumer task and every mutation
//! reaches it as a [`LedgerMessage`] over one mpsc channel, so there is
//! exactly one writer. Wallet-side watchers report through
//! [`LedgerHandle::notify`].

use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;

use crate::core::ledger::Ledger;
use crate::domain::entities::{BurnRecord, BurnStatus, LedgerSummary, TokenInfo};
use crate::shared::constants::LEDGER_CHANNEL_CAPACITY;
use crate::shared::error::BurnError;
use crate::shared::types::{Amount, BurnResult, TransactionHash};

type Respond<T> = oneshot::Sender<BurnResult<T>>;

/// One-shot notification from the wallet/chain layer
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LedgerEvent {
    HashAssigned { id: String, hash: TransactionHash },
    Confirmed { id: String },
    Failed { id: String, reason: String },
}

/// Messages handled by the ledger task
#[derive(Debug)]
pub enum LedgerMessage {
    Submit {
        amount: String,
        token: TokenInfo,
        balance: Option<Amount>,
        respond_to: Respond<BurnRecord>,
    },
    AttachHash {
        id: String,
        hash: TransactionHash,
        respond_to: Respond<()>,
    },
    MarkSuccess {
        id: String,
        respond_to: Respond<BurnRecord>,
    },
    MarkFailed {
        id: String,
        respond_to: Respond<BurnRecord>,
    },
    Snapshot {
        respond_to: Respond<LedgerSnapshot>,
    },
    /// Fire-and-forget notification; failures are logged by the task
    Event(LedgerEvent),
}

/// Point-in-time copy of the ledger state
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LedgerSnapshot {
    pub history: Vec<BurnRecord>,
    pub summary: LedgerSummary,
}

impl LedgerSnapshot {
    pub fn pending(&self) -> impl Iterator<Item = &BurnRecord> {
        self.history
            .iter()
            .filter(|record| record.status == BurnStatus::Pending)
    }

    pub fn record(&self, id: &str) -> Option<&BurnRecord> {
        self.history.iter().find(|record| record.id == id)
    }
}

/// Cloneable sender side of the ledger task
#[derive(Debug, Clone)]
pub struct LedgerHandle {
    sender: mpsc::Sender<LedgerMessage>,
}

/// Move the ledger into its consumer task.
///
/// The task ends once every handle is dropped and yields the ledger back.
pub fn spawn_ledger(ledger: Ledger) -> (LedgerHandle, JoinHandle<Ledger>) {
    let (sender, receiver) = mpsc::channel(LEDGER_CHANNEL_CAPACITY);
    let task = tokio::spawn(run_ledger(ledger, receiver));
    (LedgerHandle { sender }, task)
}

async fn run_ledger(mut ledger: Ledger, mut receiver: mpsc::Receiver<LedgerMessage>) -> Ledger {
    log::debug!("Ledger task started");

    while let Some(message) = receiver.recv().await {
        match message {
            LedgerMessage::Submit {
                amount,
                token,
                balance,
                respond_to,
            } => {
                let _ = respond_to.send(ledger.submit(&amount, &token, balance));
            }
            LedgerMessage::AttachHash {
                id,
                hash,
                respond_to,
            } => {
                let _ = respond_to.send(ledger.attach_hash(&id, &hash));
            }
            LedgerMessage::MarkSuccess { id, respond_to } => {
                let _ = respond_to.send(ledger.mark_success(&id));
            }
            LedgerMessage::MarkFailed { id, respond_to } => {
                let _ = respond_to.send(ledger.mark_failed(&id));
            }
            LedgerMessage::Snapshot { respond_to } => {
                let _ = respond_to.send(Ok(LedgerSnapshot {
                    history: ledger.history().to_vec(),
                    summary: ledger.summary().clone(),
                }));
            }
            LedgerMessage::Event(event) => apply_event(&mut ledger, event),
        }
    }

    log::debug!("Ledger task stopped");
    ledger
}

fn apply_event(ledger: &mut Ledger, event: LedgerEvent) {
    let result = match &event {
        LedgerEvent::HashAssigned { id, hash } => ledger.attach_hash(id, hash),
        LedgerEvent::Confirmed { id } => ledger.mark_success(id).map(|_| ()),
        LedgerEvent::Failed { id, reason } => {
            log::warn!("Burn {} failed: {}", id, reason);
            ledger.mark_failed(id).map(|_| ())
        }
    };

    if let Err(e) = result {
        log::warn!("Ignoring ledger event {:?}: {}", event, e);
    }
}

impl LedgerHandle {
    async fn request<T>(&self, message: impl FnOnce(Respond<T>) -> LedgerMessage) -> BurnResult<T> {
        let (tx, rx) = oneshot::channel();
        self.sender
            .send(message(tx))
            .await
            .map_err(|_| BurnError::LedgerClosed)?;
        rx.await.map_err(|_| BurnError::LedgerClosed)?
    }

    /// Record a pending burn; see [`Ledger::submit`]
    pub async fn submit(
        &self,
        amount: &str,
        token: &TokenInfo,
        balance: Option<Amount>,
    ) -> BurnResult<BurnRecord> {
        self.request(|respond_to| LedgerMessage::Submit {
            amount: amount.to_string(),
            token: token.clone(),
            balance,
            respond_to,
        })
        .await
    }

    pub async fn attach_hash(&self, id: &str, hash: &str) -> BurnResult<()> {
        self.request(|respond_to| LedgerMessage::AttachHash {
            id: id.to_string(),
            hash: hash.to_string(),
            respond_to,
        })
        .await
    }

    pub async fn mark_success(&self, id: &str) -> BurnResult<BurnRecord> {
        self.request(|respond_to| LedgerMessage::MarkSuccess {
            id: id.to_string(),
            respond_to,
        })
        .await
    }

    pub async fn mark_failed(&self, id: &str) -> BurnResult<BurnRecord> {
        self.request(|respond_to| LedgerMessage::MarkFailed {
            id: id.to_string(),
            respond_to,
        })
        .await
    }

    pub async fn snapshot(&self) -> BurnResult<LedgerSnapshot> {
        self.request(|respond_to| LedgerMessage::Snapshot { respond_to })
            .await
    }

    /// Queue a wallet notification without waiting for it to be applied
    pub async fn notify(&self, event: LedgerEvent) -> BurnResult<()> {
        self.sender
            .send(LedgerMessage::Event(event))
            .await
            .map_err(|_| BurnError::LedgerClosed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::platform::MemoryStorage;
    use crate::shared::constants::BASE_MEME_TOKENS;
    use std::sync::Arc;

    fn spawn() -> (LedgerHandle, JoinHandle<Ledger>) {
        spawn_ledger(Ledger::rehydrate(Arc::new(MemoryStorage::new())))
    }

    fn eth() -> TokenInfo {
        TokenInfo::from(&BASE_MEME_TOKENS[0])
    }

    #[tokio::test]
    async fn test_handle_round_trip() {
        let (handle, task) = spawn();

        let record = handle.submit("2.5", &eth(), None).await.unwrap();
        handle.attach_hash(&record.id, "0xfeed").await.unwrap();
        let confirmed = handle.mark_success(&record.id).await.unwrap();
        assert_eq!(confirmed.status, BurnStatus::Success);
        assert_eq!(confirmed.hash, "0xfeed");

        let snapshot = handle.snapshot().await.unwrap();
        assert_eq!(snapshot.summary.points, 250);
        assert_eq!(snapshot.pending().count(), 0);

        drop(handle);
        let ledger = task.await.unwrap();
        assert_eq!(ledger.history().len(), 1);
    }

    #[tokio::test]
    async fn test_events_are_applied_in_order() {
        let (handle, _task) = spawn();
        let ok = handle.submit("1", &eth(), None).await.unwrap();
        let bad = handle.submit("3", &eth(), None).await.unwrap();

        handle
            .notify(LedgerEvent::HashAssigned {
                id: ok.id.clone(),
                hash: "0x01".into(),
            })
            .await
            .unwrap();
        handle
            .notify(LedgerEvent::Confirmed { id: ok.id.clone() })
            .await
            .unwrap();
        handle
            .notify(LedgerEvent::Failed {
                id: bad.id.clone(),
                reason: "reverted".into(),
            })
            .await
            .unwrap();
        // Duplicate confirmation is ignored
        handle
            .notify(LedgerEvent::Confirmed { id: ok.id.clone() })
            .await
            .unwrap();

        let snapshot = handle.snapshot().await.unwrap();
        assert_eq!(snapshot.summary.points, 100);
        assert_eq!(snapshot.record(&ok.id).unwrap().hash, "0x01");
        assert_eq!(snapshot.record(&bad.id).unwrap().status, BurnStatus::Failed);
    }

    #[tokio::test]
    async fn test_concurrent_handles_share_one_writer() {
        let (handle, task) = spawn();

        let mut joins = Vec::new();
        for _ in 0..20 {
            let handle = handle.clone();
            joins.push(tokio::spawn(async move {
                let record = handle.submit("0.5", &eth(), None).await?;
                handle.mark_success(&record.id).await
            }));
        }
        for join in joins {
            join.await.unwrap().unwrap();
        }
        drop(handle);

        let ledger = task.await.unwrap();
        assert_eq!(ledger.summary().points, 1000);
        assert_eq!(ledger.summary().total_burned.to_string(), "10");
    }

    #[tokio::test]
    async fn test_closed_ledger() {
        let (handle, task) = spawn();
        task.abort();
        let _ = task.await;

        let err = handle.snapshot().await.unwrap_err();
        assert_eq!(err, BurnError::LedgerClosed);
    }
}
