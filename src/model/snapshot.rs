use bigdecimal::BigDecimal;
use serde::Serialize;

/// Named price accessors, in the order they are attempted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PriceAccessor {
    /// `totalAssets() / totalSupply()`.
    AssetsPerSupply,
    /// A single combined price function, e.g. Idle's `tokenPrice()`.
    TokenPrice,
    /// `convertToAssets(10^decimals)`.
    ConvertToAssets,
}

impl PriceAccessor {
    pub const FALLBACK_ORDER: [PriceAccessor; 3] = [
        PriceAccessor::AssetsPerSupply,
        PriceAccessor::TokenPrice,
        PriceAccessor::ConvertToAssets,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            PriceAccessor::AssetsPerSupply => "assets_per_supply",
            PriceAccessor::TokenPrice => "token_price",
            PriceAccessor::ConvertToAssets => "convert_to_assets",
        }
    }
}

/// Vault state at one block. Never persisted.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VaultSnapshot {
    pub block_number: u64,
    /// `None` when the price came from an accessor that does not expose it.
    pub total_assets: Option<BigDecimal>,
    pub total_supply: Option<BigDecimal>,
    pub asset_per_share: BigDecimal,
    pub accessor: PriceAccessor,
}
