use alloy::primitives::Address;
use axum::Json;
use axum::extract::{Path, State};
use tracing::warn;

use crate::api::error::ApiError;
use crate::api::state::AppState;
use crate::api::types::{AverageResponse, CreateYieldRequest, CreateYieldResponse, MessageResponse};
use crate::model::YieldRecord;
use crate::vault::VaultReader;
use crate::yields;

pub async fn create(
    State(state): State<AppState>,
    Json(req): Json<CreateYieldRequest>,
) -> Result<Json<CreateYieldResponse>, ApiError> {
    let vault: Address = req
        .vault_address
        .trim()
        .parse()
        .map_err(|e| ApiError::BadRequest(format!("invalid vault_address: {e}")))?;

    let computed = async {
        let reader = VaultReader::connect(state.chain.vault(vault)).await?;
        yields::compute_yield(state.chain.blocks(), &reader, &state.db, req.num_days).await
    }
    .await;

    let record = computed.map_err(|e| {
        warn!(%vault, days = req.num_days, error = %e, "yield computation failed");
        ApiError::from(e)
    })?;

    Ok(Json(CreateYieldResponse {
        message: "Yield calculated".into(),
        id: record.id,
        real_yield: record.real_yield,
    }))
}

pub async fn get_one(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<YieldRecord>, ApiError> {
    let db = state.db.lock().await;
    db.get(id)?
        .map(Json)
        .ok_or_else(ApiError::yield_not_found)
}

pub async fn list(State(state): State<AppState>) -> Result<Json<Vec<YieldRecord>>, ApiError> {
    let db = state.db.lock().await;
    Ok(Json(db.list_all()?))
}

pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<MessageResponse>, ApiError> {
    let db = state.db.lock().await;
    if !db.delete(id)? {
        return Err(ApiError::yield_not_found());
    }
    Ok(Json(MessageResponse {
        message: "Yield deleted".into(),
    }))
}

pub async fn average(State(state): State<AppState>) -> Result<Json<AverageResponse>, ApiError> {
    let db = state.db.lock().await;
    Ok(Json(AverageResponse {
        average_real_yield: db.average_real_yield()?,
    }))
}
