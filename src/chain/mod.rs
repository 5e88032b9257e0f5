pub mod index;
pub mod rpc;

use std::sync::Arc;

use alloy::primitives::{Address, U256};
use async_trait::async_trait;

use crate::error::ChainError;
use crate::model::{Block, BlockTag, VaultEvent};

pub use index::BlockIndex;
pub use rpc::RpcChain;

// ── Collaborator interfaces ─────────────────────────────────────────

/// Read access to block headers.
#[async_trait]
pub trait BlockSource: Send + Sync {
    async fn block_by_number(&self, number: u64) -> Result<Block, ChainError>;

    async fn latest_block(&self) -> Result<Block, ChainError>;

    async fn earliest_block(&self) -> Result<Block, ChainError> {
        self.block_by_number(0).await
    }
}

/// Read-only calls against a single vault contract.
///
/// Every method maps to one contract call (or one log query). Implementations
/// return the raw on-chain integers; scaling is the caller's job.
#[async_trait]
pub trait VaultSource: Send + Sync {
    fn address(&self) -> Address;

    /// Current head block number, used to pin "latest" reads to one block.
    async fn block_number(&self) -> Result<u64, ChainError>;

    async fn decimals(&self) -> Result<u8, ChainError>;

    async fn asset(&self) -> Result<Address, ChainError>;

    async fn asset_decimals(&self, asset: Address) -> Result<u8, ChainError>;

    /// Underlying token balance held by the vault itself.
    async fn asset_balance(&self, asset: Address, at: BlockTag) -> Result<U256, ChainError>;

    async fn total_assets(&self, at: BlockTag) -> Result<U256, ChainError>;

    async fn total_supply(&self, at: BlockTag) -> Result<U256, ChainError>;

    async fn token_price(&self, at: BlockTag) -> Result<U256, ChainError>;

    async fn convert_to_assets(&self, shares: U256, at: BlockTag) -> Result<U256, ChainError>;

    /// Deposit logs followed by withdraw logs in `[from_block, to]`, each group
    /// in log order. Timestamps and scaled amounts are left unset.
    async fn vault_logs(&self, from_block: u64, to: BlockTag) -> Result<Vec<VaultEvent>, ChainError>;
}

/// A chain handle that can also hand out per-vault readers.
pub trait ChainReader: BlockSource {
    fn vault(&self, address: Address) -> Arc<dyn VaultSource>;

    fn blocks(&self) -> &dyn BlockSource;
}
