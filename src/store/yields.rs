use rusqlite::{OptionalExtension, Row, params};

use crate::model::{NewYield, YieldRecord};

use super::YieldStore;

const COLUMNS: &str =
    "id, vault_address, asset_address, days_ago, initial_aps, current_aps, real_yield, timestamp";

fn from_row(row: &Row<'_>) -> rusqlite::Result<YieldRecord> {
    Ok(YieldRecord {
        id: row.get(0)?,
        vault_address: row.get(1)?,
        asset_address: row.get(2)?,
        days_ago: row.get(3)?,
        initial_aps: row.get(4)?,
        current_aps: row.get(5)?,
        real_yield: row.get(6)?,
        timestamp: row.get(7)?,
    })
}

impl YieldStore {
    /// Insert a record; the id and creation time are assigned here.
    pub fn save(&self, record: &NewYield) -> rusqlite::Result<i64> {
        self.conn.execute(
            "INSERT INTO yields (vault_address, asset_address, days_ago, initial_aps, current_aps, real_yield)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                record.vault_address,
                record.asset_address,
                record.days_ago,
                record.initial_aps,
                record.current_aps,
                record.real_yield,
            ],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    pub fn get(&self, id: i64) -> rusqlite::Result<Option<YieldRecord>> {
        self.conn
            .query_row(
                &format!("SELECT {COLUMNS} FROM yields WHERE id = ?1"),
                [id],
                from_row,
            )
            .optional()
    }

    /// All records, oldest first.
    pub fn list_all(&self) -> rusqlite::Result<Vec<YieldRecord>> {
        let mut stmt = self
            .conn
            .prepare(&format!("SELECT {COLUMNS} FROM yields ORDER BY id ASC"))?;
        let rows = stmt.query_map([], from_row)?;
        rows.collect()
    }

    /// Returns whether a row was removed.
    pub fn delete(&self, id: i64) -> rusqlite::Result<bool> {
        let affected = self.conn.execute("DELETE FROM yields WHERE id = ?1", [id])?;
        Ok(affected > 0)
    }

    /// Mean `real_yield` over all rows, `None` when the table is empty.
    pub fn average_real_yield(&self) -> rusqlite::Result<Option<f64>> {
        self.conn
            .query_row("SELECT AVG(real_yield) FROM yields", [], |row| row.get(0))
    }
}
