use std::sync::Arc;

use alloy::primitives::{Address, U256};
use alloy::providers::{DynProvider, Provider, ProviderBuilder};
use alloy::rpc::types::{BlockId, BlockNumberOrTag, Filter, Log};
use alloy::sol;
use alloy::sol_types::SolEvent;
use anyhow::Context;
use async_trait::async_trait;

use crate::error::ChainError;
use crate::model::{Block, BlockTag, EventKind, VaultEvent};

use super::{BlockSource, ChainReader, VaultSource};

// ── Contract interfaces ─────────────────────────────────────────────

sol! {
    #[allow(missing_docs)]
    #[sol(rpc)]
    contract IERC4626 {
        event Deposit(address indexed sender, address indexed owner, uint256 assets, uint256 shares);
        event Withdraw(
            address indexed sender,
            address indexed receiver,
            address indexed owner,
            uint256 assets,
            uint256 shares
        );

        function asset() external view returns (address);
        function decimals() external view returns (uint8);
        function totalAssets() external view returns (uint256);
        function totalSupply() external view returns (uint256);
        function convertToAssets(uint256 shares) external view returns (uint256);
        function tokenPrice() external view returns (uint256);
    }
}

sol! {
    #[allow(missing_docs)]
    #[sol(rpc)]
    contract IERC20 {
        function balanceOf(address account) external view returns (uint256);
        function decimals() external view returns (uint8);
    }
}

// ── Provider ────────────────────────────────────────────────────────

/// JSON-RPC backed chain reader. Historical reads need an archive node.
#[derive(Clone)]
pub struct RpcChain {
    provider: DynProvider,
}

impl RpcChain {
    pub fn connect(rpc_url: &str) -> anyhow::Result<Self> {
        let url = rpc_url
            .parse()
            .with_context(|| format!("invalid RPC URL '{rpc_url}'"))?;
        let provider = ProviderBuilder::new().connect_http(url).erased();
        Ok(RpcChain { provider })
    }

    async fn fetch_block(&self, tag: BlockNumberOrTag) -> Result<Block, ChainError> {
        let block = self
            .provider
            .get_block_by_number(tag)
            .await
            .map_err(|e| ChainError::Transport(e.to_string()))?;
        match block {
            Some(b) => Ok(Block {
                number: b.header.number,
                timestamp: b.header.timestamp,
            }),
            None => Err(ChainError::MissingBlock(tag.as_number().unwrap_or_default())),
        }
    }
}

#[async_trait]
impl BlockSource for RpcChain {
    async fn block_by_number(&self, number: u64) -> Result<Block, ChainError> {
        self.fetch_block(BlockNumberOrTag::Number(number)).await
    }

    async fn latest_block(&self) -> Result<Block, ChainError> {
        self.fetch_block(BlockNumberOrTag::Latest).await
    }

    async fn earliest_block(&self) -> Result<Block, ChainError> {
        self.fetch_block(BlockNumberOrTag::Earliest).await
    }
}

impl ChainReader for RpcChain {
    fn vault(&self, address: Address) -> Arc<dyn VaultSource> {
        Arc::new(RpcVault {
            provider: self.provider.clone(),
            address,
        })
    }

    fn blocks(&self) -> &dyn BlockSource {
        self
    }
}

// ── Vault calls ─────────────────────────────────────────────────────

pub struct RpcVault {
    provider: DynProvider,
    address: Address,
}

fn block_id(at: BlockTag) -> BlockId {
    match at {
        BlockTag::Number(n) => BlockId::Number(BlockNumberOrTag::Number(n)),
        BlockTag::Latest => BlockId::latest(),
    }
}

fn call_err(method: &'static str) -> impl FnOnce(alloy::contract::Error) -> ChainError {
    move |e| ChainError::Call {
        method,
        message: e.to_string(),
    }
}

#[async_trait]
impl VaultSource for RpcVault {
    fn address(&self) -> Address {
        self.address
    }

    async fn block_number(&self) -> Result<u64, ChainError> {
        self.provider
            .get_block_number()
            .await
            .map_err(|e| ChainError::Transport(e.to_string()))
    }

    async fn decimals(&self) -> Result<u8, ChainError> {
        IERC4626::new(self.address, &self.provider)
            .decimals()
            .call()
            .await
            .map_err(call_err("decimals"))
    }

    async fn asset(&self) -> Result<Address, ChainError> {
        IERC4626::new(self.address, &self.provider)
            .asset()
            .call()
            .await
            .map_err(call_err("asset"))
    }

    async fn asset_decimals(&self, asset: Address) -> Result<u8, ChainError> {
        IERC20::new(asset, &self.provider)
            .decimals()
            .call()
            .await
            .map_err(call_err("asset.decimals"))
    }

    async fn asset_balance(&self, asset: Address, at: BlockTag) -> Result<U256, ChainError> {
        IERC20::new(asset, &self.provider)
            .balanceOf(self.address)
            .block(block_id(at))
            .call()
            .await
            .map_err(call_err("asset.balanceOf"))
    }

    async fn total_assets(&self, at: BlockTag) -> Result<U256, ChainError> {
        IERC4626::new(self.address, &self.provider)
            .totalAssets()
            .block(block_id(at))
            .call()
            .await
            .map_err(call_err("totalAssets"))
    }

    async fn total_supply(&self, at: BlockTag) -> Result<U256, ChainError> {
        IERC4626::new(self.address, &self.provider)
            .totalSupply()
            .block(block_id(at))
            .call()
            .await
            .map_err(call_err("totalSupply"))
    }

    async fn token_price(&self, at: BlockTag) -> Result<U256, ChainError> {
        IERC4626::new(self.address, &self.provider)
            .tokenPrice()
            .block(block_id(at))
            .call()
            .await
            .map_err(call_err("tokenPrice"))
    }

    async fn convert_to_assets(&self, shares: U256, at: BlockTag) -> Result<U256, ChainError> {
        IERC4626::new(self.address, &self.provider)
            .convertToAssets(shares)
            .block(block_id(at))
            .call()
            .await
            .map_err(call_err("convertToAssets"))
    }

    async fn vault_logs(&self, from_block: u64, to: BlockTag) -> Result<Vec<VaultEvent>, ChainError> {
        let to_block = match to {
            BlockTag::Number(n) => BlockNumberOrTag::Number(n),
            BlockTag::Latest => BlockNumberOrTag::Latest,
        };
        let base = Filter::new()
            .address(self.address)
            .from_block(from_block)
            .to_block(to_block);

        let deposits = self
            .provider
            .get_logs(&base.clone().event_signature(IERC4626::Deposit::SIGNATURE_HASH))
            .await
            .map_err(|e| ChainError::Transport(e.to_string()))?;
        let withdraws = self
            .provider
            .get_logs(&base.event_signature(IERC4626::Withdraw::SIGNATURE_HASH))
            .await
            .map_err(|e| ChainError::Transport(e.to_string()))?;

        let mut events = Vec::with_capacity(deposits.len() + withdraws.len());
        for log in &deposits {
            events.push(decode_deposit(log)?);
        }
        for log in &withdraws {
            events.push(decode_withdraw(log)?);
        }
        Ok(events)
    }
}

// ── Log decoding ────────────────────────────────────────────────────

fn decode_deposit(log: &Log) -> Result<VaultEvent, ChainError> {
    let decoded = log
        .log_decode::<IERC4626::Deposit>()
        .map_err(|e| ChainError::Decode(e.to_string()))?;
    let data = &decoded.inner.data;
    unscaled_event(log, EventKind::Deposit, data.sender, data.owner, data.assets, data.shares)
}

fn decode_withdraw(log: &Log) -> Result<VaultEvent, ChainError> {
    let decoded = log
        .log_decode::<IERC4626::Withdraw>()
        .map_err(|e| ChainError::Decode(e.to_string()))?;
    let data = &decoded.inner.data;
    unscaled_event(log, EventKind::Withdraw, data.sender, data.owner, data.assets, data.shares)
}

fn unscaled_event(
    log: &Log,
    kind: EventKind,
    sender: Address,
    owner: Address,
    assets: U256,
    shares: U256,
) -> Result<VaultEvent, ChainError> {
    let block_number = log
        .block_number
        .ok_or_else(|| ChainError::Decode("log without block number (pending?)".into()))?;
    Ok(VaultEvent {
        block_number,
        timestamp: 0,
        kind,
        sender,
        owner,
        raw_assets: assets,
        raw_shares: shares,
        assets: Default::default(),
        shares: Default::default(),
        transaction_hash: log.transaction_hash.unwrap_or_default(),
        log_index: log.log_index.unwrap_or_default(),
    })
}
