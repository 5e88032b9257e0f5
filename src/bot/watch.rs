use std::sync::Arc;
use std::time::Duration;

use tracing::{info, warn};

use crate::chain::ChainReader;
use crate::error::YieldError;
use crate::model::BlockTag;
use crate::yields::collect_events;

use super::dispatch::{ChainEvent, Dispatcher};

/// What one poll did.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PollSummary {
    pub latest_block: u64,
    pub events: usize,
    pub failures: usize,
}

/// Polls the chain for new blocks and vault logs and feeds the dispatcher.
pub struct Watcher {
    chain: Arc<dyn ChainReader>,
    dispatcher: Dispatcher,
    next_block: Option<u64>,
}

impl Watcher {
    /// `start_block` is the first block whose logs are replayed; `None` starts
    /// at the chain head.
    pub fn new(chain: Arc<dyn ChainReader>, dispatcher: Dispatcher, start_block: Option<u64>) -> Self {
        Watcher {
            chain,
            dispatcher,
            next_block: start_block,
        }
    }

    /// Process logs since the last poll, then the latest block itself.
    ///
    /// Returns `Ok(None)` if there is nothing new to process. A failed chain
    /// read leaves the cursor in place so the same range is retried on the
    /// next poll.
    /// When a deposit or withdraw fails to dispatch, the cursor stays at that
    /// event's block and its logs are delivered again; logs already stored
    /// are ignored by the store. A failed head share price is not retried.
    pub async fn poll_once(&mut self) -> Result<Option<PollSummary>, YieldError> {
        let latest = self
            .chain
            .blocks()
            .latest_block()
            .await
            .map_err(|e| YieldError::BlockReadFailed {
                number: "latest".into(),
                reason: e.to_string(),
            })?;

        let from = self.next_block.unwrap_or(latest.number);
        if from > latest.number {
            return Ok(None);
        }

        let events = collect_events(
            self.chain.blocks(),
            self.dispatcher.reader(),
            from,
            BlockTag::Number(latest.number),
        )
        .await?;

        let mut summary = PollSummary {
            latest_block: latest.number,
            events: events.len(),
            failures: 0,
        };
        // Events are block-ordered, so the first failure is the earliest.
        let mut retry_from: Option<u64> = None;
        for event in events {
            let block = event.block_number;
            if self.dispatcher.handle(ChainEvent::from(event)).await.is_none() {
                summary.failures += 1;
                retry_from.get_or_insert(block);
            }
        }
        if self.dispatcher.handle(ChainEvent::NewBlock(latest)).await.is_none() {
            summary.failures += 1;
        }

        self.next_block = Some(retry_from.unwrap_or(latest.number + 1));
        Ok(Some(summary))
    }

    /// Poll every `interval` until ctrl-c, or once when `once` is set.
    pub async fn run(mut self, interval: Duration, once: bool) -> anyhow::Result<()> {
        let mut ticker = tokio::time::interval(interval);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = ticker.tick() => {}
                _ = tokio::signal::ctrl_c() => {
                    info!("shutting down watcher");
                    return Ok(());
                }
            }

            match self.poll_once().await {
                Ok(Some(summary)) => info!(
                    block = summary.latest_block,
                    events = summary.events,
                    failures = summary.failures,
                    "poll complete"
                ),
                Ok(None) => {}
                Err(e) => warn!(error = %e, "poll failed, retrying next tick"),
            }

            if once {
                return Ok(());
            }
        }
    }
}
