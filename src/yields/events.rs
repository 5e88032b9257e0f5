use std::collections::HashMap;

use crate::chain::BlockSource;
use crate::error::YieldError;
use crate::model::{BlockTag, VaultEvent};
use crate::vault::VaultReader;

/// Fetch, decode and order a vault's deposit and withdraw events in
/// `[from_block, to]`.
///
/// Events are sorted by block number; the sort is stable so events in the
/// same block keep fetch order (deposits before withdraws, each in log order).
/// Timestamps are resolved with one block fetch per distinct block.
pub async fn collect_events(
    chain: &dyn BlockSource,
    reader: &VaultReader,
    from_block: u64,
    to: BlockTag,
) -> Result<Vec<VaultEvent>, YieldError> {
    let mut events = reader
        .source()
        .vault_logs(from_block, to)
        .await
        .map_err(|e| YieldError::StateReadFailed {
            vault: reader.address(),
            block: to,
            reason: format!("fetching logs: {e}"),
        })?;
    events.sort_by_key(|e| e.block_number);

    let mut timestamps: HashMap<u64, u64> = HashMap::new();
    for event in &mut events {
        let timestamp = match timestamps.get(&event.block_number) {
            Some(ts) => *ts,
            None => {
                let block = chain
                    .block_by_number(event.block_number)
                    .await
                    .map_err(|e| YieldError::BlockReadFailed {
                        number: event.block_number.to_string(),
                        reason: e.to_string(),
                    })?;
                timestamps.insert(event.block_number, block.timestamp);
                block.timestamp
            }
        };
        event.timestamp = timestamp;
        scale_event(reader, event);
    }

    Ok(events)
}

/// Fill `assets`/`shares` from the raw amounts using the vault's decimals.
pub fn scale_event(reader: &VaultReader, event: &mut VaultEvent) {
    event.assets = reader.assets(event.raw_assets);
    event.shares = reader.shares(event.raw_shares);
}
