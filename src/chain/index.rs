use std::cmp::Ordering;
use std::collections::HashMap;

use tracing::debug;

use crate::error::{ChainError, YieldError};
use crate::model::Block;

use super::BlockSource;

/// Maps wall-clock timestamps onto block numbers by binary search over the
/// block source.
///
/// Assumes timestamps are non-decreasing in block number. Each search costs
/// O(log n) block fetches; a block number is fetched at most once per search.
pub struct BlockIndex<'a> {
    source: &'a dyn BlockSource,
}

impl<'a> BlockIndex<'a> {
    pub fn new(source: &'a dyn BlockSource) -> Self {
        BlockIndex { source }
    }

    /// Largest block number whose timestamp is `<= target`, or an exact match
    /// (not necessarily the first one) if the search lands on it.
    pub async fn resolve_block(&self, target: u64) -> Result<u64, YieldError> {
        let latest = self
            .source
            .latest_block()
            .await
            .map_err(|e| block_err("latest", e))?;
        if target > latest.timestamp {
            return Err(YieldError::FutureTimestamp {
                target,
                latest: latest.timestamp,
            });
        }

        let earliest = self
            .source
            .earliest_block()
            .await
            .map_err(|e| block_err("earliest", e))?;
        if target < earliest.timestamp {
            return Err(YieldError::NotFound { target });
        }

        let mut seen: HashMap<u64, u64> = HashMap::new();
        seen.insert(latest.number, latest.timestamp);
        seen.insert(earliest.number, earliest.timestamp);

        let mut low = earliest.number;
        let mut high = latest.number;

        while low <= high {
            let mid = low + (high - low) / 2;
            let ts = self.timestamp_of(mid, &mut seen).await?;

            match ts.cmp(&target) {
                Ordering::Less => low = mid + 1,
                Ordering::Greater => {
                    if mid == earliest.number {
                        return Err(YieldError::NotFound { target });
                    }
                    high = mid - 1;
                }
                Ordering::Equal => {
                    debug!(target, block = mid, probed = seen.len(), "exact timestamp match");
                    return Ok(mid);
                }
            }
        }

        debug!(target, block = high, probed = seen.len(), "closest block before target");
        Ok(high)
    }

    /// Resolve a block `days_ago` days before `now` (unix seconds).
    pub async fn resolve_days_ago(&self, now: u64, days_ago: u32) -> Result<u64, YieldError> {
        let target = now.saturating_sub(u64::from(days_ago) * 86_400);
        self.resolve_block(target).await
    }

    async fn timestamp_of(&self, number: u64, seen: &mut HashMap<u64, u64>) -> Result<u64, YieldError> {
        if let Some(ts) = seen.get(&number) {
            return Ok(*ts);
        }
        let block: Block = self
            .source
            .block_by_number(number)
            .await
            .map_err(|e| block_err(&number.to_string(), e))?;
        seen.insert(number, block.timestamp);
        Ok(block.timestamp)
    }
}

fn block_err(number: &str, err: ChainError) -> YieldError {
    YieldError::BlockReadFailed {
        number: number.to_string(),
        reason: err.to_string(),
    }
}
