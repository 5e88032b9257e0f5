use std::collections::HashMap;

use bigdecimal::BigDecimal;
use num_traits::{One, Zero};
use serde::Serialize;
use tracing::debug;

use crate::chain::BlockSource;
use crate::error::YieldError;
use crate::model::{BlockTag, VaultEvent};
use crate::vault::VaultReader;

use super::percent_change;

/// Significant digits kept for the compounded figure.
const COMPOUND_PRECISION: u64 = 50;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IntervalYield {
    pub from_block: u64,
    pub to_block: u64,
    pub from_aps: BigDecimal,
    pub to_aps: BigDecimal,
    /// Percentage.
    pub yield_pct: BigDecimal,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PiecewiseYield {
    /// Sum of the interval percentages.
    pub total: BigDecimal,
    /// `prod(1 + r_i) - 1` in percent. Reported for comparison only.
    pub compounded: BigDecimal,
    pub intervals: Vec<IntervalYield>,
}

impl PiecewiseYield {
    fn empty() -> Self {
        PiecewiseYield {
            total: BigDecimal::zero(),
            compounded: BigDecimal::zero(),
            intervals: Vec::new(),
        }
    }
}

/// Summed interval yield across `events` plus the final interval from the
/// last event to the latest block.
pub async fn accumulate_yield(
    chain: &dyn BlockSource,
    reader: &VaultReader,
    events: &[VaultEvent],
) -> Result<BigDecimal, YieldError> {
    Ok(accumulate_intervals(chain, reader, events).await?.total)
}

/// Walk `events` (ascending by block) and measure the yield of every interval
/// between consecutive events, then from the last event to the latest block.
///
/// The walk is all-or-nothing: any read failure aborts it. A zero
/// asset-per-share at the start of an interval aborts with
/// [`YieldError::DivisionByZeroAps`], which carries the sum accumulated so far.
/// No events means no intervals and a total of zero.
pub async fn accumulate_intervals(
    chain: &dyn BlockSource,
    reader: &VaultReader,
    events: &[VaultEvent],
) -> Result<PiecewiseYield, YieldError> {
    if events.is_empty() {
        return Ok(PiecewiseYield::empty());
    }

    let mut report = PiecewiseYield::empty();
    let mut growth = BigDecimal::one();
    let mut aps_at: HashMap<u64, BigDecimal> = HashMap::new();
    let mut previous: Option<(u64, BigDecimal)> = None;

    for event in events {
        let block = event.block_number;
        let aps = match aps_at.get(&block) {
            Some(aps) => aps.clone(),
            None => {
                let aps = reader.read_asset_per_share(BlockTag::Number(block)).await?;
                aps_at.insert(block, aps.clone());
                aps
            }
        };

        if let Some((from_block, from_aps)) = previous.take() {
            push_interval(&mut report, &mut growth, from_block, from_aps, block, aps.clone())?;
        }
        previous = Some((block, aps));
    }

    let latest = chain
        .latest_block()
        .await
        .map_err(|e| YieldError::BlockReadFailed {
            number: "latest".into(),
            reason: e.to_string(),
        })?;
    let current = reader
        .read_asset_per_share(BlockTag::Number(latest.number))
        .await?;

    if let Some((from_block, from_aps)) = previous {
        push_interval(&mut report, &mut growth, from_block, from_aps, latest.number, current)?;
    }

    report.compounded = (growth - BigDecimal::one()) * BigDecimal::from(100);
    Ok(report)
}

fn push_interval(
    report: &mut PiecewiseYield,
    growth: &mut BigDecimal,
    from_block: u64,
    from_aps: BigDecimal,
    to_block: u64,
    to_aps: BigDecimal,
) -> Result<(), YieldError> {
    if from_aps.is_zero() {
        return Err(YieldError::DivisionByZeroAps {
            block_number: from_block,
            partial: report.total.clone(),
        });
    }

    let yield_pct = percent_change(&from_aps, &to_aps);
    debug!(from_block, to_block, %yield_pct, "interval");

    report.total += &yield_pct;
    let factor = BigDecimal::one() + &yield_pct / BigDecimal::from(100);
    *growth = (&*growth * factor).with_prec(COMPOUND_PRECISION);

    report.intervals.push(IntervalYield {
        from_block,
        to_block,
        from_aps,
        to_aps,
        yield_pct,
    });
    Ok(())
}
