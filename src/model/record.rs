use serde::{Deserialize, Serialize};

/// A yield computation ready to be stored. Values are `f64` because the
/// `yields` table keeps them as `REAL`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewYield {
    pub vault_address: String,
    pub asset_address: String,
    pub days_ago: u32,
    pub initial_aps: f64,
    pub current_aps: f64,
    /// Percentage.
    pub real_yield: f64,
}

/// A stored row of the `yields` table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct YieldRecord {
    pub id: i64,
    pub vault_address: String,
    pub asset_address: String,
    pub days_ago: u32,
    pub initial_aps: f64,
    pub current_aps: f64,
    pub real_yield: f64,
    /// Creation time, unix seconds.
    pub timestamp: i64,
}

impl YieldRecord {
    pub fn from_new(id: i64, new: NewYield, timestamp: i64) -> Self {
        YieldRecord {
            id,
            vault_address: new.vault_address,
            asset_address: new.asset_address,
            days_ago: new.days_ago,
            initial_aps: new.initial_aps,
            current_aps: new.current_aps,
            real_yield: new.real_yield,
            timestamp,
        }
    }

    /// The computed part of the record, without id and creation time.
    pub fn values(&self) -> NewYield {
        NewYield {
            vault_address: self.vault_address.clone(),
            asset_address: self.asset_address.clone(),
            days_ago: self.days_ago,
            initial_aps: self.initial_aps,
            current_aps: self.current_aps,
            real_yield: self.real_yield,
        }
    }
}
