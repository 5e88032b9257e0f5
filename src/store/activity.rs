use bigdecimal::BigDecimal;
use rusqlite::params;
use serde::Serialize;

use crate::model::{Block, PriceAccessor, VaultEvent};

use super::YieldStore;

/// A stored share-price observation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SharePrice {
    pub vault_address: String,
    pub block_number: u64,
    pub block_timestamp: u64,
    pub asset_per_share: String,
    pub accessor: String,
}

impl YieldStore {
    /// Record a deposit/withdraw. Returns `false` if the log was already
    /// stored, so replaying an event is harmless.
    pub fn record_event(&self, vault: &str, event: &VaultEvent) -> rusqlite::Result<bool> {
        let inserted = self.conn.execute(
            "INSERT OR IGNORE INTO vault_events
                (transaction_hash, log_index, vault_address, block_number, block_timestamp,
                 kind, sender, owner, assets, shares)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
            params![
                event.transaction_hash.to_string(),
                event.log_index,
                vault,
                event.block_number,
                event.timestamp,
                event.kind.as_str(),
                event.sender.to_string(),
                event.owner.to_string(),
                event.assets.to_string(),
                event.shares.to_string(),
            ],
        )?;
        Ok(inserted > 0)
    }

    pub fn count_events(&self, vault: &str) -> rusqlite::Result<u64> {
        self.conn.query_row(
            "SELECT COUNT(*) FROM vault_events WHERE vault_address = ?1",
            [vault],
            |row| row.get(0),
        )
    }

    /// Upsert the share price observed at `block`.
    pub fn record_share_price(
        &self,
        vault: &str,
        block: &Block,
        asset_per_share: &BigDecimal,
        accessor: PriceAccessor,
    ) -> rusqlite::Result<()> {
        self.conn.execute(
            "INSERT OR REPLACE INTO share_prices
                (vault_address, block_number, block_timestamp, asset_per_share, accessor)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                vault,
                block.number,
                block.timestamp,
                asset_per_share.to_string(),
                accessor.name(),
            ],
        )?;
        Ok(())
    }

    /// Share prices for `vault`, ascending by block.
    pub fn share_prices(&self, vault: &str) -> rusqlite::Result<Vec<SharePrice>> {
        let mut stmt = self.conn.prepare(
            "SELECT vault_address, block_number, block_timestamp, asset_per_share, accessor
             FROM share_prices WHERE vault_address = ?1 ORDER BY block_number ASC",
        )?;
        let rows = stmt.query_map([vault], |row| {
            Ok(SharePrice {
                vault_address: row.get(0)?,
                block_number: row.get(1)?,
                block_timestamp: row.get(2)?,
                asset_per_share: row.get(3)?,
                accessor: row.get(4)?,
            })
        })?;
        rows.collect()
    }
}
