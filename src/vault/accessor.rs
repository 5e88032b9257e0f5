use alloy::primitives::Address;
use bigdecimal::BigDecimal;
use tracing::debug;

use crate::chain::VaultSource;
use crate::model::{BlockTag, PriceAccessor};

use super::units::{one_unit, scale_units};

/// Underlying token of a vault.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AssetInfo {
    pub address: Address,
    pub decimals: u8,
}

/// Everything an accessor needs for one read.
pub(crate) struct ReadContext<'a> {
    pub source: &'a dyn VaultSource,
    pub at: BlockTag,
    pub vault_decimals: u8,
    pub asset: Option<&'a AssetInfo>,
    /// Scaled `totalSupply`, if it could be read.
    pub supply: Option<&'a BigDecimal>,
}

impl ReadContext<'_> {
    fn asset_decimals(&self) -> u8 {
        self.asset.map(|a| a.decimals).unwrap_or(self.vault_decimals)
    }
}

/// Output of a successful accessor.
pub(crate) struct Priced {
    pub asset_per_share: BigDecimal,
    pub total_assets: Option<BigDecimal>,
}

impl PriceAccessor {
    /// Whether this accessor can be used for the vault at `ctx.at`.
    /// `Err` carries the reason it was skipped.
    pub(crate) async fn check(&self, ctx: &ReadContext<'_>) -> Result<(), String> {
        match self {
            PriceAccessor::AssetsPerSupply => {
                if ctx.supply.is_none() {
                    return Err("totalSupply unavailable".into());
                }
                let asset = ctx.asset.ok_or("underlying asset unknown")?;
                let idle = ctx
                    .source
                    .asset_balance(asset.address, ctx.at)
                    .await
                    .map_err(|e| e.to_string())?;
                if idle.is_zero() {
                    return Err("vault holds no underlying balance".into());
                }
                Ok(())
            }
            // Capability is the call itself succeeding.
            PriceAccessor::TokenPrice | PriceAccessor::ConvertToAssets => Ok(()),
        }
    }

    pub(crate) async fn apply(&self, ctx: &ReadContext<'_>) -> Result<Priced, String> {
        match self {
            PriceAccessor::AssetsPerSupply => {
                let supply = ctx.supply.ok_or("totalSupply unavailable")?;
                let raw = ctx
                    .source
                    .total_assets(ctx.at)
                    .await
                    .map_err(|e| e.to_string())?;
                let assets = scale_units(raw, ctx.asset_decimals());
                Ok(Priced {
                    asset_per_share: &assets / supply,
                    total_assets: Some(assets),
                })
            }
            PriceAccessor::TokenPrice => {
                let raw = ctx
                    .source
                    .token_price(ctx.at)
                    .await
                    .map_err(|e| e.to_string())?;
                Ok(Priced {
                    asset_per_share: scale_units(raw, ctx.asset_decimals()),
                    total_assets: None,
                })
            }
            PriceAccessor::ConvertToAssets => {
                let raw = ctx
                    .source
                    .convert_to_assets(one_unit(ctx.vault_decimals), ctx.at)
                    .await
                    .map_err(|e| e.to_string())?;
                Ok(Priced {
                    asset_per_share: scale_units(raw, ctx.asset_decimals()),
                    total_assets: None,
                })
            }
        }
    }

    /// `check` then `apply`.
    pub(crate) async fn try_read(&self, ctx: &ReadContext<'_>) -> Result<Priced, String> {
        self.check(ctx).await?;
        let priced = self.apply(ctx).await?;
        debug!(accessor = self.name(), block = %ctx.at, aps = %priced.asset_per_share, "priced");
        Ok(priced)
    }
}
