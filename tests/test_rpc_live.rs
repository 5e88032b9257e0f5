use std::sync::Arc;

use alloy::primitives::{Address, address};

use vault_yield::chain::{BlockIndex, ChainReader, RpcChain};
use vault_yield::model::{BlockTag, PriceAccessor};
use vault_yield::store::YieldStore;
use vault_yield::vault::VaultReader;
use vault_yield::yields::{collect_events, compute_yield, to_f64};

const RPC_URL: &str = "https://ethereum-rpc.publicnode.com";

/// Steakhouse USDC (Morpho) on mainnet.
const STEAKHOUSE_USDC: Address = address!("BEEF01735c132Ada46AA9aA4c54623cAA92A64CB");

fn rpc_url() -> String {
    std::env::var("VAULT_YIELD_RPC_URL").unwrap_or_else(|_| RPC_URL.to_string())
}

#[tokio::test]
#[ignore] // Requires an archive RPC + network access
async fn test_live_vault_state_and_yield() {
    let chain = Arc::new(RpcChain::connect(&rpc_url()).unwrap());
    let reader = VaultReader::connect(chain.vault(STEAKHOUSE_USDC)).await.unwrap();

    assert_eq!(reader.asset().unwrap().decimals, 6);
    assert_eq!(reader.vault_decimals(), 18);

    let snapshot = reader.read_state(BlockTag::Latest).await.unwrap();
    println!("snapshot: {snapshot:?}");
    assert!(to_f64(&snapshot.asset_per_share) > 1.0);
    assert_ne!(snapshot.accessor, PriceAccessor::TokenPrice);

    let db = YieldStore::open_in_memory().unwrap().into_shared();
    let record = compute_yield(chain.blocks(), &reader, &db, 7).await.unwrap();
    println!("7-day real yield: {:.4}%", record.real_yield);
    assert!(record.real_yield > -5.0 && record.real_yield < 5.0);
}

#[tokio::test]
#[ignore] // Requires an archive RPC + network access
async fn test_live_block_index_and_logs() {
    let chain = RpcChain::connect(&rpc_url()).unwrap();

    let latest = chain.blocks().latest_block().await.unwrap();
    let index = BlockIndex::new(chain.blocks());
    let found = index.resolve_block(latest.timestamp - 3_600).await.unwrap();
    // ~12s blocks
    assert!(latest.number - found >= 250 && latest.number - found <= 350, "found {found}");

    let reader = VaultReader::connect(chain.vault(STEAKHOUSE_USDC)).await.unwrap();
    let events = collect_events(chain.blocks(), &reader, latest.number - 500, BlockTag::Number(latest.number))
        .await
        .unwrap();
    println!("{} events in the last 500 blocks", events.len());
    assert!(events.windows(2).all(|w| w[0].block_number <= w[1].block_number));
}
