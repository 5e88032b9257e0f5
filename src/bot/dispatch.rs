use bigdecimal::BigDecimal;
use serde::Serialize;
use tracing::{info, warn};

use crate::error::YieldError;
use crate::model::{Block, BlockTag, EventKind, PriceAccessor, VaultEvent};
use crate::store::Db;
use crate::vault::VaultReader;
use crate::yields::scale_event;

#[derive(Debug, Clone)]
pub enum ChainEvent {
    NewBlock(Block),
    Deposit(VaultEvent),
    Withdraw(VaultEvent),
}

impl From<VaultEvent> for ChainEvent {
    fn from(event: VaultEvent) -> Self {
        match event.kind {
            EventKind::Deposit => ChainEvent::Deposit(event),
            EventKind::Withdraw => ChainEvent::Withdraw(event),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type")]
pub enum Outcome {
    SharePrice {
        block_number: u64,
        asset_per_share: BigDecimal,
        accessor: PriceAccessor,
    },
    EventRecorded {
        kind: EventKind,
        block_number: u64,
        /// `false` when the log had already been stored.
        inserted: bool,
    },
}

/// Applies chain events to the store for one vault.
///
/// Every event is idempotent: share prices are upserted per block and logs
/// are keyed by `(transaction_hash, log_index)`, so redelivery is safe.
pub struct Dispatcher {
    reader: VaultReader,
    db: Db,
    vault: String,
}

impl Dispatcher {
    pub fn new(reader: VaultReader, db: Db) -> Self {
        let vault = reader.address().to_string();
        Dispatcher { reader, db, vault }
    }

    pub fn reader(&self) -> &VaultReader {
        &self.reader
    }

    pub async fn dispatch(&self, event: ChainEvent) -> Result<Outcome, YieldError> {
        match event {
            ChainEvent::NewBlock(block) => {
                let snapshot = self.reader.read_state(BlockTag::Number(block.number)).await?;
                self.db.lock().await.record_share_price(
                    &self.vault,
                    &block,
                    &snapshot.asset_per_share,
                    snapshot.accessor,
                )?;
                Ok(Outcome::SharePrice {
                    block_number: block.number,
                    asset_per_share: snapshot.asset_per_share,
                    accessor: snapshot.accessor,
                })
            }
            ChainEvent::Deposit(mut event) | ChainEvent::Withdraw(mut event) => {
                scale_event(&self.reader, &mut event);
                let inserted = self.db.lock().await.record_event(&self.vault, &event)?;
                Ok(Outcome::EventRecorded {
                    kind: event.kind,
                    block_number: event.block_number,
                    inserted,
                })
            }
        }
    }

    /// Dispatch and log the outcome. Failures are logged, not returned, so a
    /// bad event never stops the caller's loop.
    pub async fn handle(&self, event: ChainEvent) -> Option<Outcome> {
        match self.dispatch(event).await {
            Ok(outcome) => {
                match &outcome {
                    Outcome::SharePrice {
                        block_number,
                        asset_per_share,
                        accessor,
                    } => info!(
                        vault = %self.vault,
                        block = block_number,
                        aps = %asset_per_share,
                        accessor = accessor.name(),
                        "share price"
                    ),
                    Outcome::EventRecorded {
                        kind,
                        block_number,
                        inserted,
                    } => info!(
                        vault = %self.vault,
                        block = block_number,
                        kind = kind.as_str(),
                        inserted,
                        "vault event"
                    ),
                }
                Some(outcome)
            }
            Err(e) => {
                warn!(vault = %self.vault, error = %e, "dispatch failed");
                None
            }
        }
    }
}
