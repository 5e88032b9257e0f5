use std::path::PathBuf;

use alloy::primitives::Address;
use anyhow::{Context, Result};

use crate::cli::Cli;

pub const RPC_URL_ENV: &str = "VAULT_YIELD_RPC_URL";
pub const DB_ENV: &str = "VAULT_YIELD_DB";
pub const VAULT_ENV: &str = "ERC4626_VAULT_ADDRESS";
pub const DEFAULT_DB: &str = "vault_yields.db";

/// Settings resolved from CLI flags and environment.
pub struct RuntimeConfig {
    rpc_url: Option<String>,
    pub db_path: PathBuf,
}

impl RuntimeConfig {
    pub fn from_cli(cli: &Cli) -> Self {
        let rpc_url = cli
            .rpc_url
            .clone()
            .or_else(|| std::env::var(RPC_URL_ENV).ok())
            .filter(|url| !url.is_empty());

        let db_path = cli
            .db
            .clone()
            .or_else(|| std::env::var(DB_ENV).ok().map(PathBuf::from))
            .unwrap_or_else(|| PathBuf::from(DEFAULT_DB));

        RuntimeConfig { rpc_url, db_path }
    }

    /// Only commands that read the chain need this.
    pub fn rpc_url(&self) -> Result<&str> {
        self.rpc_url.as_deref().ok_or_else(|| {
            anyhow::anyhow!(
                "{RPC_URL_ENV} env var not set. \
                 Set it to an archive JSON-RPC endpoint or pass --rpc-url."
            )
        })
    }
}

pub fn parse_address(value: &str) -> Result<Address> {
    value
        .trim()
        .parse()
        .with_context(|| format!("invalid address '{value}'"))
}

/// Explicit vault argument, else `ERC4626_VAULT_ADDRESS`.
pub fn vault_or_env(arg: Option<&str>) -> Result<Address> {
    match arg {
        Some(v) => parse_address(v),
        None => {
            let v = std::env::var(VAULT_ENV)
                .with_context(|| format!("no vault given and {VAULT_ENV} env var not set"))?;
            parse_address(&v)
        }
    }
}
