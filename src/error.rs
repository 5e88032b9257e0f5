use alloy::primitives::Address;
use bigdecimal::BigDecimal;
use thiserror::Error;

use crate::model::BlockTag;

/// Raw failure from the chain collaborator (RPC transport, reverted call,
/// undecodable log). Translated into [`YieldError`] before it leaves a
/// component.
#[derive(Debug, Error)]
pub enum ChainError {
    #[error("transport error: {0}")]
    Transport(String),

    #[error("call `{method}` failed: {message}")]
    Call { method: &'static str, message: String },

    #[error("could not decode log: {0}")]
    Decode(String),

    #[error("block {0} not returned by node")]
    MissingBlock(u64),
}

#[derive(Debug, Error)]
pub enum YieldError {
    #[error("target timestamp {target} is after the latest block timestamp {latest}")]
    FutureTimestamp { target: u64, latest: u64 },

    #[error("no block at or before timestamp {target}")]
    NotFound { target: u64 },

    #[error("could not read block {number}: {reason}")]
    BlockReadFailed { number: String, reason: String },

    #[error("asset info unavailable for vault {vault}: {reason}")]
    AssetInfoUnavailable { vault: Address, reason: String },

    #[error("state read failed for vault {vault} at {block}: {reason}")]
    StateReadFailed {
        vault: Address,
        block: BlockTag,
        reason: String,
    },

    #[error("vault {vault} has no shares issued at {block}")]
    NoSharesIssued { vault: Address, block: BlockTag },

    #[error("insufficient history for vault {vault}: {reason}")]
    InsufficientHistory { vault: Address, reason: String },

    #[error("asset-per-share is zero at block {block_number} (partial yield {partial}%)")]
    DivisionByZeroAps {
        block_number: u64,
        partial: BigDecimal,
    },

    #[error("storage error: {0}")]
    Storage(#[from] rusqlite::Error),
}
