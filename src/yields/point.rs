use bigdecimal::BigDecimal;
use num_traits::Zero;
use serde::Serialize;
use tracing::info;

use crate::chain::{BlockIndex, BlockSource};
use crate::error::YieldError;
use crate::model::{BlockTag, NewYield, YieldRecord};
use crate::store::Db;
use crate::vault::VaultReader;

use super::{percent_change, to_f64};

/// Point-in-time yield between a historical block and the chain head.
#[derive(Debug, Clone, Serialize)]
pub struct YieldMeasurement {
    pub historical_block: u64,
    /// Head block the current price was read at.
    pub current_block: u64,
    pub initial_aps: BigDecimal,
    pub current_aps: BigDecimal,
    /// Percentage.
    pub real_yield: BigDecimal,
}

/// Measure the real yield of `reader`'s vault over the last `days_ago` days,
/// counted back from `now` (unix seconds). Nothing is persisted.
///
/// The historical block is resolved before any vault call. The head is read
/// once and the current price is taken at that block number.
pub async fn measure_yield(
    chain: &dyn BlockSource,
    reader: &VaultReader,
    days_ago: u32,
    now: u64,
) -> Result<YieldMeasurement, YieldError> {
    let vault = reader.address();

    let historical_block = BlockIndex::new(chain).resolve_days_ago(now, days_ago).await?;
    let head = chain
        .latest_block()
        .await
        .map_err(|e| YieldError::BlockReadFailed {
            number: "latest".into(),
            reason: e.to_string(),
        })?;

    let initial = match reader.read_state(BlockTag::Number(historical_block)).await {
        Ok(snapshot) => snapshot,
        Err(e @ (YieldError::NoSharesIssued { .. } | YieldError::StateReadFailed { .. })) => {
            return Err(YieldError::InsufficientHistory {
                vault,
                reason: e.to_string(),
            });
        }
        Err(e) => return Err(e),
    };

    if initial.asset_per_share.is_zero() {
        return Err(YieldError::InsufficientHistory {
            vault,
            reason: format!("asset-per-share is zero at block {historical_block}"),
        });
    }

    let current = reader.read_state(BlockTag::Number(head.number)).await?;

    let real_yield = percent_change(&initial.asset_per_share, &current.asset_per_share);
    Ok(YieldMeasurement {
        historical_block,
        current_block: current.block_number,
        initial_aps: initial.asset_per_share,
        current_aps: current.asset_per_share,
        real_yield,
    })
}

/// Measure the yield over `days_ago` days ending now and store it.
pub async fn compute_yield(
    chain: &dyn BlockSource,
    reader: &VaultReader,
    db: &Db,
    days_ago: u32,
) -> Result<YieldRecord, YieldError> {
    let now = chrono::Utc::now().timestamp().max(0) as u64;
    compute_yield_at(chain, reader, db, days_ago, now).await
}

/// [`compute_yield`] with an explicit "now".
pub async fn compute_yield_at(
    chain: &dyn BlockSource,
    reader: &VaultReader,
    db: &Db,
    days_ago: u32,
    now: u64,
) -> Result<YieldRecord, YieldError> {
    let asset = *reader.asset()?;
    let m = measure_yield(chain, reader, days_ago, now).await?;

    let new = NewYield {
        vault_address: reader.address().to_string(),
        asset_address: asset.address.to_string(),
        days_ago,
        initial_aps: to_f64(&m.initial_aps),
        current_aps: to_f64(&m.current_aps),
        real_yield: to_f64(&m.real_yield),
    };

    let store = db.lock().await;
    let id = store.save(&new)?;
    let record = store.get(id)?.ok_or(rusqlite::Error::QueryReturnedNoRows)?;

    info!(
        vault = %record.vault_address,
        days_ago,
        from_block = m.historical_block,
        to_block = m.current_block,
        real_yield = %m.real_yield,
        id,
        "real yield stored"
    );
    Ok(record)
}
