//! One function per CLI subcommand.

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};

use crate::api::{self, state::AppState};
use crate::bot::{Dispatcher, Watcher};
use crate::chain::{ChainReader, RpcChain};
use crate::config::{RuntimeConfig, parse_address, vault_or_env};
use crate::model::BlockTag;
use crate::store::{Db, YieldStore};
use crate::vault::VaultReader;
use crate::yields::{self, to_f64};

fn open_db(config: &RuntimeConfig) -> Result<Db> {
    Ok(YieldStore::open(&config.db_path)?.into_shared())
}

fn connect_chain(config: &RuntimeConfig) -> Result<Arc<RpcChain>> {
    Ok(Arc::new(RpcChain::connect(config.rpc_url()?)?))
}

pub async fn serve(config: &RuntimeConfig, host: &str, port: u16) -> Result<()> {
    let chain = connect_chain(config)?;
    let db = open_db(config)?;
    api::serve(host, port, AppState::new(chain, db)).await
}

/// Compute each vault in turn; a failing vault is reported and skipped.
pub async fn compute(config: &RuntimeConfig, vaults: &[String], days: u32) -> Result<()> {
    let chain = connect_chain(config)?;
    let db = open_db(config)?;

    let mut failed = 0usize;
    for vault in vaults {
        let address = match parse_address(vault) {
            Ok(a) => a,
            Err(e) => {
                eprintln!("Skipping {vault}: {e:#}");
                failed += 1;
                continue;
            }
        };

        let result = async {
            let reader = VaultReader::connect(chain.vault(address)).await?;
            yields::compute_yield(chain.blocks(), &reader, &db, days).await
        }
        .await;

        match result {
            Ok(record) => {
                println!("Vault: {}", record.vault_address);
                println!("Real Yield over {} days: {:.2}%\n", record.days_ago, record.real_yield);
            }
            Err(e) => {
                eprintln!("Vault {address}: {e}");
                failed += 1;
            }
        }
    }

    if failed == vaults.len() {
        anyhow::bail!("no yield could be computed");
    }
    Ok(())
}

pub async fn piecewise(config: &RuntimeConfig, vault: &str, from_block: u64, json: bool) -> Result<()> {
    let chain = connect_chain(config)?;
    let address = parse_address(vault)?;

    let reader = VaultReader::connect(chain.vault(address)).await?;
    let events = yields::collect_events(chain.blocks(), &reader, from_block, BlockTag::Latest).await?;
    let report = yields::accumulate_intervals(chain.blocks(), &reader, &events).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!("Vault:     {address}");
    println!("Events:    {}", events.len());
    for interval in &report.intervals {
        println!(
            "  {:>10} -> {:<10} aps {:.6} -> {:.6}  {:+.4}%",
            interval.from_block,
            interval.to_block,
            to_f64(&interval.from_aps),
            to_f64(&interval.to_aps),
            to_f64(&interval.yield_pct),
        );
    }
    println!("Total Yield: {:.2}%", to_f64(&report.total));
    println!("Compounded:  {:.2}%", to_f64(&report.compounded));
    Ok(())
}

pub async fn watch(
    config: &RuntimeConfig,
    vault: Option<&str>,
    poll_secs: u64,
    from_block: Option<u64>,
    once: bool,
) -> Result<()> {
    let chain = connect_chain(config)?;
    let db = open_db(config)?;
    let address = vault_or_env(vault)?;

    let reader = VaultReader::connect(chain.vault(address))
        .await
        .with_context(|| format!("connecting to vault {address}"))?;
    println!("=== vault-yield watch ===");
    println!("Vault:    {address}");
    println!("Decimals: {}", reader.vault_decimals());
    println!("Poll:     {poll_secs}s");
    println!();

    let watcher = Watcher::new(chain, Dispatcher::new(reader, db), from_block);
    watcher.run(Duration::from_secs(poll_secs.max(1)), once).await
}

pub fn list(config: &RuntimeConfig) -> Result<()> {
    let store = YieldStore::open(&config.db_path)?;
    for record in store.list_all()? {
        println!(
            "{:>4}  {}  asset {}  {:>3}d  {:.6} -> {:.6}  {:+.2}%  @{}",
            record.id,
            record.vault_address,
            record.asset_address,
            record.days_ago,
            record.initial_aps,
            record.current_aps,
            record.real_yield,
            record.timestamp,
        );
    }
    Ok(())
}

pub fn average(config: &RuntimeConfig) -> Result<()> {
    let store = YieldStore::open(&config.db_path)?;
    match store.average_real_yield()? {
        Some(avg) => println!("Average Real Yield: {avg:.2}%"),
        None => println!("No yields stored yet."),
    }
    Ok(())
}
