use alloy::primitives::{Address, B256, U256};
use bigdecimal::BigDecimal;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    Deposit,
    Withdraw,
}

impl EventKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            EventKind::Deposit => "deposit",
            EventKind::Withdraw => "withdraw",
        }
    }
}

/// A decoded ERC-4626 `Deposit` or `Withdraw` log.
///
/// `raw_assets`/`raw_shares` are the on-chain integers; `assets`/`shares` are
/// filled in once the owning vault's decimals are known, and `timestamp` once
/// the block has been fetched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VaultEvent {
    pub block_number: u64,
    pub timestamp: u64,
    pub kind: EventKind,
    pub sender: Address,
    pub owner: Address,
    pub raw_assets: U256,
    pub raw_shares: U256,
    pub assets: BigDecimal,
    pub shares: BigDecimal,
    pub transaction_hash: B256,
    pub log_index: u64,
}
