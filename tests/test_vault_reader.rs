
use alloy::primitives::{Address, U256};
use bigdecimal::BigDecimal;

use vault_yield::chain::ChainReader;
use vault_yield::error::YieldError;
use vault_yield::model::{BlockTag, PriceAccessor};
use vault_yield::vault::VaultReader;

use mock_common::*;

fn vault_addr() -> Address {
    Address::repeat_byte(0x42)
}

fn chain() -> MockChain {
    MockChain::linear(100, 1_700_000_000, 12)
}

async fn reader(chain: &MockChain) -> VaultReader {
    VaultReader::connect(chain.vault(vault_addr())).await.unwrap()
}

#[tokio::test]
async fn test_aps_scales_for_common_decimals() {
    for decimals in [0u8, 6, 18] {
        let chain = chain();
        chain.add_vault(
            MockVault::new(vault_addr(), decimals).with_state(
                0,
                raw(1_000_000, decimals),
                raw(500_000, decimals),
            ),
        );
        let reader = reader(&chain).await;

        let snapshot = reader.read_state(BlockTag::Latest).await.unwrap();
        assert_eq!(snapshot.asset_per_share, BigDecimal::from(2), "decimals {decimals}");
        assert_eq!(snapshot.accessor, PriceAccessor::AssetsPerSupply);
        assert_eq!(snapshot.total_assets, Some(BigDecimal::from(1_000_000)));
        assert_eq!(snapshot.total_supply, Some(BigDecimal::from(500_000)));
    }
}

#[tokio::test]
async fn test_asset_and_vault_decimals_scale_independently() {
    // USDC-style asset (6) behind an 18-decimal share token
    let chain = chain();
    chain.add_vault(
        MockVault::new(vault_addr(), 18)
            .with_asset(Address::repeat_byte(0xcc), 6)
            .with_state(0, raw(1_050, 6), raw(1_000, 18)),
    );
    let reader = reader(&chain).await;

    let aps = reader.read_asset_per_share(BlockTag::Latest).await.unwrap();
    assert_eq!(aps, dec("1.05"));
    assert_eq!(reader.asset().unwrap().decimals, 6);
    assert_eq!(reader.vault_decimals(), 18);
}

#[tokio::test]
async fn test_falls_back_to_token_price_when_total_assets_fails() {
    let chain = chain();
    chain.add_vault(
        MockVault::new(vault_addr(), 6)
            .failing_total_assets()
            .with_full_state(
                0,
                VaultState {
                    total_assets: raw(100, 6),
                    total_supply: raw(100, 6),
                    idle: raw(100, 6),
                    token_price: Some(raw_frac(1_025, 3, 6)),
                },
            ),
    );
    let reader = reader(&chain).await;

    let snapshot = reader.read_state(BlockTag::Number(50)).await.unwrap();
    assert_eq!(snapshot.accessor, PriceAccessor::TokenPrice);
    assert_eq!(snapshot.asset_per_share, dec("1.025"));
    assert_eq!(snapshot.total_assets, None);
    assert_eq!(snapshot.block_number, 50);
}

#[tokio::test]
async fn test_zero_idle_balance_skips_assets_per_supply() {
    // Idle-style vault: everything deployed elsewhere, price via tokenPrice
    let chain = chain();
    chain.add_vault(MockVault::new(vault_addr(), 18).with_full_state(
        0,
        VaultState {
            total_assets: raw(500, 18),
            total_supply: raw(100, 18),
            idle: U256::ZERO,
            token_price: Some(raw_frac(11, 1, 18)),
        },
    ));
    let reader = reader(&chain).await;

    let snapshot = reader.read_state(BlockTag::Latest).await.unwrap();
    assert_eq!(snapshot.accessor, PriceAccessor::TokenPrice);
    assert_eq!(snapshot.asset_per_share, dec("1.1"));
}

#[tokio::test]
async fn test_falls_back_to_convert_to_assets() {
    let chain = chain();
    chain.add_vault(
        MockVault::new(vault_addr(), 6)
            .failing_total_assets()
            .with_state(0, raw(150, 6), raw(100, 6)),
    );
    let reader = reader(&chain).await;

    let snapshot = reader.read_state(BlockTag::Latest).await.unwrap();
    assert_eq!(snapshot.accessor, PriceAccessor::ConvertToAssets);
    assert_eq!(snapshot.asset_per_share, dec("1.5"));
}

#[tokio::test]
async fn test_zero_supply_is_no_shares_issued() {
    let chain = chain();
    chain.add_vault(MockVault::new(vault_addr(), 18).with_state(0, U256::ZERO, U256::ZERO));
    let reader = reader(&chain).await;

    match reader.read_state(BlockTag::Number(10)).await {
        Err(YieldError::NoSharesIssued { vault, block }) => {
            assert_eq!(vault, vault_addr());
            assert_eq!(block, BlockTag::Number(10));
        }
        other => panic!("expected NoSharesIssued, got {other:?}"),
    }
}

#[tokio::test]
async fn test_all_accessors_failing_is_state_read_failed() {
    let chain = chain();
    chain.add_vault(
        MockVault::new(vault_addr(), 18)
            .failing_total_assets()
            .without_convert()
            .with_state(0, raw(1, 18), raw(1, 18)),
    );
    let reader = reader(&chain).await;

    match reader.read_state(BlockTag::Latest).await {
        Err(YieldError::StateReadFailed { reason, .. }) => {
            for name in ["assets_per_supply", "token_price", "convert_to_assets"] {
                assert!(reason.contains(name), "missing {name} in: {reason}");
            }
        }
        other => panic!("expected StateReadFailed, got {other:?}"),
    }
}

#[tokio::test]
async fn test_read_before_deployment_fails() {
    let chain = chain();
    chain.add_vault(MockVault::new(vault_addr(), 18).with_state(40, raw(1, 18), raw(1, 18)));
    let reader = reader(&chain).await;

    assert!(matches!(
        reader.read_state(BlockTag::Number(39)).await,
        Err(YieldError::StateReadFailed { .. })
    ));
    assert!(reader.read_state(BlockTag::Number(40)).await.is_ok());
}

#[tokio::test]
async fn test_missing_asset_is_asset_info_unavailable() {
    let chain = chain();
    chain.add_vault(
        MockVault::new(vault_addr(), 6)
            .without_asset()
            .with_state(0, raw(120, 6), raw(100, 6)),
    );
    let reader = reader(&chain).await;

    assert!(matches!(
        reader.asset(),
        Err(YieldError::AssetInfoUnavailable { .. })
    ));
    // Price is still available through the share-conversion accessor
    let snapshot = reader.read_state(BlockTag::Latest).await.unwrap();
    assert_eq!(snapshot.accessor, PriceAccessor::ConvertToAssets);
    assert_eq!(snapshot.asset_per_share, dec("1.2"));
}

#[tokio::test]
async fn test_custom_accessor_order() {
    let chain = chain();
    chain.add_vault(MockVault::new(vault_addr(), 18).with_full_state(
        0,
        VaultState {
            total_assets: raw(200, 18),
            total_supply: raw(100, 18),
            idle: raw(200, 18),
            token_price: Some(raw(3, 18)),
        },
    ));
    let reader = reader(&chain)
        .await
        .with_accessors(vec![PriceAccessor::TokenPrice, PriceAccessor::AssetsPerSupply]);

    let snapshot = reader.read_state(BlockTag::Latest).await.unwrap();
    assert_eq!(snapshot.accessor, PriceAccessor::TokenPrice);
    assert_eq!(snapshot.asset_per_share, BigDecimal::from(3));
}

#[tokio::test]
async fn test_decimals_read_once() {
    let chain = chain();
    let vault = chain.add_vault(MockVault::new(vault_addr(), 18).with_state(0, raw(2, 18), raw(1, 18)));
    let reader = reader(&chain).await;

    for block in [1, 20, 60] {
        reader.read_state(BlockTag::Number(block)).await.unwrap();
    }
    reader.read_state(BlockTag::Latest).await.unwrap();
    assert_eq!(vault.decimals_calls(), 1);
}

#[tokio::test]
async fn test_token_price_still_checks_supply() {
    let chain = chain();
    chain.add_vault(
        MockVault::new(vault_addr(), 18)
            .failing_total_assets()
            .with_full_state(
                0,
                VaultState {
                    total_supply: U256::ZERO,
                    token_price: Some(raw(1, 18)),
                    ..Default::default()
                },
            ),
    );
    let reader = reader(&chain).await;

    assert!(matches!(
        reader.read_state(BlockTag::Latest).await,
        Err(YieldError::NoSharesIssued { .. })
    ));
}

#[tokio::test]
async fn test_unreadable_supply_uses_price_accessors() {
    let chain = chain();
    chain.add_vault(
        MockVault::new(vault_addr(), 18)
            .failing_total_supply()
            .with_full_state(
                0,
                VaultState {
                    total_assets: raw(10, 18),
                    total_supply: raw(10, 18),
                    idle: raw(10, 18),
                    token_price: Some(raw_frac(102, 2, 18)),
                },
            ),
    );
    let reader = reader(&chain).await;

    let snapshot = reader.read_state(BlockTag::Latest).await.unwrap();
    assert_eq!(snapshot.accessor, PriceAccessor::TokenPrice);
    assert_eq!(snapshot.total_supply, None);
    assert_eq!(snapshot.asset_per_share, dec("1.02"));
}

#[tokio::test]
async fn test_latest_read_is_pinned_to_one_block() {
    // A mint doubles assets and supply right after totalSupply is read
    let chain = chain();
    chain.add_vault(
        MockVault::new(vault_addr(), 18)
            .with_state(0, raw(100, 18), raw(100, 18))
            .with_mint_after_supply_read(
                1,
                VaultState {
                    total_assets: raw(200, 18),
                    total_supply: raw(200, 18),
                    idle: raw(200, 18),
                    token_price: None,
                },
            ),
    );
    let reader = reader(&chain).await;

    let snapshot = reader.read_state(BlockTag::Latest).await.unwrap();
    assert_eq!(snapshot.block_number, 99);
    assert_eq!(snapshot.total_assets, Some(BigDecimal::from(100)));
    assert_eq!(snapshot.asset_per_share, BigDecimal::from(1));

    // The mint did land, one block later
    assert_eq!(chain.latest_number(), 100);
    let after = reader.read_state(BlockTag::Latest).await.unwrap();
    assert_eq!(after.block_number, 100);
    assert_eq!(after.total_supply, Some(BigDecimal::from(200)));
    assert_eq!(after.asset_per_share, BigDecimal::from(1));
}
