use serde::{Deserialize, Serialize};

// ── Request types ────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct CreateYieldRequest {
    pub vault_address: String,
    pub num_days: u32,
}

// ── Response types ───────────────────────────────────────────────────

#[derive(Debug, Serialize, Deserialize)]
pub struct CreateYieldResponse {
    pub message: String,
    pub id: i64,
    pub real_yield: f64,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct AverageResponse {
    pub average_real_yield: Option<f64>,
}
