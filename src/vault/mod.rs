pub mod accessor;
pub mod units;

use std::sync::Arc;

use alloy::primitives::{Address, U256};
use bigdecimal::BigDecimal;
use num_traits::Zero;
use tracing::{debug, warn};

use crate::chain::VaultSource;
use crate::error::YieldError;
use crate::model::{BlockTag, PriceAccessor, VaultSnapshot};

pub use accessor::AssetInfo;
use accessor::ReadContext;
use units::scale_units;

/// Reads vault state at arbitrary blocks.
///
/// Decimals (vault and underlying asset) are read once on [`connect`] and
/// reused for every scaling. Price reads walk `accessors` in order; the first
/// one whose capability check and call both succeed wins.
///
/// [`connect`]: VaultReader::connect
pub struct VaultReader {
    source: Arc<dyn VaultSource>,
    vault_decimals: u8,
    asset: Result<AssetInfo, String>,
    accessors: Vec<PriceAccessor>,
}

impl VaultReader {
    pub async fn connect(source: Arc<dyn VaultSource>) -> Result<Self, YieldError> {
        let vault = source.address();
        let vault_decimals = source
            .decimals()
            .await
            .map_err(|e| YieldError::StateReadFailed {
                vault,
                block: BlockTag::Latest,
                reason: e.to_string(),
            })?;

        let asset = match source.asset().await {
            Ok(address) => match source.asset_decimals(address).await {
                Ok(decimals) => Ok(AssetInfo { address, decimals }),
                Err(e) => Err(format!("asset {address} decimals: {e}")),
            },
            Err(e) => Err(e.to_string()),
        };
        if let Err(reason) = &asset {
            warn!(%vault, %reason, "underlying asset unavailable, scaling assets by vault decimals");
        }

        Ok(VaultReader {
            source,
            vault_decimals,
            asset,
            accessors: PriceAccessor::FALLBACK_ORDER.to_vec(),
        })
    }

    /// Replace the fallback order.
    pub fn with_accessors(mut self, accessors: Vec<PriceAccessor>) -> Self {
        self.accessors = accessors;
        self
    }

    pub fn address(&self) -> Address {
        self.source.address()
    }

    pub fn source(&self) -> &Arc<dyn VaultSource> {
        &self.source
    }

    pub fn vault_decimals(&self) -> u8 {
        self.vault_decimals
    }

    pub fn asset(&self) -> Result<&AssetInfo, YieldError> {
        self.asset
            .as_ref()
            .map_err(|reason| YieldError::AssetInfoUnavailable {
                vault: self.address(),
                reason: reason.clone(),
            })
    }

    /// Scale a raw share amount.
    pub fn shares(&self, raw: U256) -> BigDecimal {
        scale_units(raw, self.vault_decimals)
    }

    /// Scale a raw underlying-asset amount.
    pub fn assets(&self, raw: U256) -> BigDecimal {
        let decimals = self
            .asset
            .as_ref()
            .map(|a| a.decimals)
            .unwrap_or(self.vault_decimals);
        scale_units(raw, decimals)
    }

    /// Snapshot the vault at `at`.
    ///
    /// `Latest` is pinned to the head block number before any state call, so
    /// supply, balance and assets all come from the same block.
    pub async fn read_state(&self, at: BlockTag) -> Result<VaultSnapshot, YieldError> {
        let vault = self.address();
        let block_number = match at {
            BlockTag::Number(n) => n,
            BlockTag::Latest => {
                self.source
                    .block_number()
                    .await
                    .map_err(|e| YieldError::StateReadFailed {
                        vault,
                        block: at,
                        reason: format!("resolving head block: {e}"),
                    })?
            }
        };
        let at = BlockTag::Number(block_number);

        let supply = match self.source.total_supply(at).await {
            Ok(raw) => Some(scale_units(raw, self.vault_decimals)),
            Err(e) => {
                debug!(%vault, block = %at, error = %e, "totalSupply unavailable");
                None
            }
        };
        if supply.as_ref().is_some_and(|s| s.is_zero()) {
            return Err(YieldError::NoSharesIssued { vault, block: at });
        }

        let ctx = ReadContext {
            source: self.source.as_ref(),
            at,
            vault_decimals: self.vault_decimals,
            asset: self.asset.as_ref().ok(),
            supply: supply.as_ref(),
        };

        let mut skipped = Vec::new();
        for accessor in &self.accessors {
            match accessor.try_read(&ctx).await {
                Ok(priced) => {
                    return Ok(VaultSnapshot {
                        block_number,
                        total_assets: priced.total_assets,
                        total_supply: supply,
                        asset_per_share: priced.asset_per_share,
                        accessor: *accessor,
                    });
                }
                Err(reason) => {
                    debug!(%vault, block = %at, accessor = accessor.name(), %reason, "accessor skipped");
                    skipped.push(format!("{}: {reason}", accessor.name()));
                }
            }
        }

        Err(YieldError::StateReadFailed {
            vault,
            block: at,
            reason: skipped.join("; "),
        })
    }

    pub async fn read_asset_per_share(&self, at: BlockTag) -> Result<BigDecimal, YieldError> {
        Ok(self.read_state(at).await?.asset_per_share)
    }
}
