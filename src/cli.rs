use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// ERC-4626 vault real-yield tracker: point-in-time and piecewise yields,
/// a block/event watcher, and a REST API over stored results.
#[derive(Parser)]
#[command(name = "vault-yield", version, about)]
pub struct Cli {
    /// JSON-RPC endpoint (archive node). Falls back to VAULT_YIELD_RPC_URL.
    #[arg(long, global = true)]
    pub rpc_url: Option<String>,

    /// SQLite database path. Falls back to VAULT_YIELD_DB, then vault_yields.db.
    #[arg(long, global = true)]
    pub db: Option<PathBuf>,

    /// Log level (overridden by RUST_LOG)
    #[arg(long, global = true, default_value = "info")]
    pub log_level: String,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Serve the REST API
    Serve {
        #[arg(long, default_value = "127.0.0.1")]
        host: String,

        #[arg(long, default_value = "8080")]
        port: u16,
    },

    /// Compute and store the real yield of one or more vaults
    Compute {
        /// Vault addresses
        #[arg(required = true)]
        vaults: Vec<String>,

        /// Look-back window in days
        #[arg(long, default_value = "30")]
        days: u32,
    },

    /// Sum interval yields between a vault's deposit/withdraw events
    Piecewise {
        /// Vault address
        vault: String,

        /// First block to scan for events
        #[arg(long, default_value = "0")]
        from_block: u64,

        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },

    /// Watch new blocks and vault events, recording share prices and transactions
    Watch {
        /// Vault address. Falls back to ERC4626_VAULT_ADDRESS.
        vault: Option<String>,

        /// Seconds between polls
        #[arg(long, default_value = "12")]
        poll_secs: u64,

        /// Replay logs starting at this block instead of the chain head
        #[arg(long)]
        from_block: Option<u64>,

        /// Poll once then exit (for external cron)
        #[arg(long)]
        once: bool,
    },

    /// Print all stored yields
    List,

    /// Print the average real yield across stored records
    Average,
}
