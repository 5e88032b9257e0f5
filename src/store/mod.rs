mod activity;
mod yields;

use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use rusqlite::Connection;
use tokio::sync::Mutex;

pub use activity::SharePrice;

/// Shared handle to the store. Lock it for one operation at a time and never
/// hold it across a chain read.
pub type Db = Arc<Mutex<YieldStore>>;

/// SQLite-backed persistence for yield records and bot activity.
pub struct YieldStore {
    conn: Connection,
}

impl YieldStore {
    pub fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("creating db directory {}", parent.display()))?;
        }

        let conn = Connection::open(path)
            .with_context(|| format!("opening sqlite at {}", path.display()))?;
        conn.execute_batch("PRAGMA journal_mode = WAL;")?;
        migrate(&conn).context("running migrations")?;

        Ok(YieldStore { conn })
    }

    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory().context("opening in-memory sqlite")?;
        migrate(&conn).context("running migrations")?;
        Ok(YieldStore { conn })
    }

    pub fn into_shared(self) -> Db {
        Arc::new(Mutex::new(self))
    }
}

fn migrate(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS yields (
            id            INTEGER PRIMARY KEY AUTOINCREMENT,
            vault_address TEXT NOT NULL,
            asset_address TEXT NOT NULL,
            days_ago      INTEGER NOT NULL,
            initial_aps   REAL NOT NULL,
            current_aps   REAL NOT NULL,
            real_yield    REAL NOT NULL,
            timestamp     INTEGER NOT NULL DEFAULT (unixepoch())
        );

        CREATE TABLE IF NOT EXISTS vault_events (
            transaction_hash TEXT NOT NULL,
            log_index        INTEGER NOT NULL,
            vault_address    TEXT NOT NULL,
            block_number     INTEGER NOT NULL,
            block_timestamp  INTEGER NOT NULL,
            kind             TEXT NOT NULL,
            sender           TEXT NOT NULL,
            owner            TEXT NOT NULL,
            assets           TEXT NOT NULL,
            shares           TEXT NOT NULL,
            PRIMARY KEY (transaction_hash, log_index)
        );

        CREATE TABLE IF NOT EXISTS share_prices (
            vault_address   TEXT NOT NULL,
            block_number    INTEGER NOT NULL,
            block_timestamp INTEGER NOT NULL,
            asset_per_share TEXT NOT NULL,
            accessor        TEXT NOT NULL,
            PRIMARY KEY (vault_address, block_number)
        );
        ",
    )
}
