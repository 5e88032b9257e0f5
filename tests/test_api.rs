
use std::sync::Arc;

use alloy::primitives::Address;
use axum::Json;
use axum::body::to_bytes;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;

use vault_yield::api::error::ApiError;
use vault_yield::api::handlers;
use vault_yield::api::state::AppState;
use vault_yield::api::types::CreateYieldRequest;
use vault_yield::model::NewYield;
use vault_yield::store::YieldStore;

use mock_common::*;

const HOUR: u64 = 3_600;

fn vault_addr() -> Address {
    Address::repeat_byte(0x42)
}

/// 40 days of hourly blocks whose head sits an hour past the wall clock, with
/// a vault that gains 10% four hours before the head.
fn state() -> AppState {
    let head = chrono::Utc::now().timestamp() as u64 + HOUR;
    let count = 40 * 24;
    let chain = MockChain::linear(count, head - (count - 1) * HOUR, HOUR);
    chain.add_vault(
        MockVault::new(vault_addr(), 6)
            .with_state(0, raw(100, 6), raw(100, 6))
            .with_state(count - 5, raw(110, 6), raw(100, 6)),
    );
    AppState::new(Arc::new(chain), YieldStore::open_in_memory().unwrap().into_shared())
}

fn request(vault: &str, num_days: u32) -> Json<CreateYieldRequest> {
    Json(CreateYieldRequest {
        vault_address: vault.to_string(),
        num_days,
    })
}

async fn error_body(err: ApiError) -> (StatusCode, serde_json::Value) {
    let response = err.into_response();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

#[tokio::test]
async fn test_create_then_get() {
    let state = state();

    let Json(created) = handlers::create(State(state.clone()), request(&vault_addr().to_string(), 1))
        .await
        .unwrap();
    assert_eq!(created.message, "Yield calculated");
    assert!((created.real_yield - 10.0).abs() < 1e-9);

    let Json(record) = handlers::get_one(State(state), Path(created.id)).await.unwrap();
    assert_eq!(record.id, created.id);
    assert_eq!(record.days_ago, 1);
    assert_eq!(record.vault_address, vault_addr().to_string());
    assert!((record.current_aps - 1.1).abs() < 1e-12);
}

#[tokio::test]
async fn test_create_accepts_lowercase_address() {
    let state = state();
    let lower = vault_addr().to_string().to_lowercase();

    let Json(created) = handlers::create(State(state), request(&lower, 7)).await.unwrap();
    assert!(created.id > 0);
}

#[tokio::test]
async fn test_create_rejects_bad_address() {
    let err = handlers::create(State(state()), request("not-an-address", 1))
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::BadRequest(_)));

    let (status, body) = error_body(err).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("vault_address"));
}

#[tokio::test]
async fn test_create_window_before_genesis_is_unprocessable() {
    let state = state();
    let err = handlers::create(State(state.clone()), request(&vault_addr().to_string(), 365))
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::Unprocessable(_)));

    let Json(all) = handlers::list(State(state)).await.unwrap();
    assert!(all.is_empty());
}

#[tokio::test]
async fn test_create_for_unknown_contract_is_unprocessable() {
    let unknown = Address::repeat_byte(0x99).to_string();
    let err = handlers::create(State(state()), request(&unknown, 1))
        .await
        .unwrap_err();

    let (status, body) = error_body(err).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn test_get_missing_is_404() {
    let err = handlers::get_one(State(state()), Path(999)).await.unwrap_err();

    let (status, body) = error_body(err).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, serde_json::json!({ "error": "Yield not found" }));
}

#[tokio::test]
async fn test_delete() {
    let state = state();
    let id = state
        .db
        .lock()
        .await
        .save(&NewYield {
            vault_address: vault_addr().to_string(),
            asset_address: Address::repeat_byte(0xaa).to_string(),
            days_ago: 30,
            initial_aps: 1.0,
            current_aps: 1.02,
            real_yield: 2.0,
        })
        .unwrap();

    let Json(msg) = handlers::delete(State(state.clone()), Path(id)).await.unwrap();
    assert_eq!(msg.message, "Yield deleted");

    let err = handlers::get_one(State(state.clone()), Path(id)).await.unwrap_err();
    assert!(matches!(err, ApiError::NotFound(_)));

    let err = handlers::delete(State(state), Path(id)).await.unwrap_err();
    let (status, body) = error_body(err).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Yield not found");
}

#[tokio::test]
async fn test_list_and_average() {
    let state = state();

    let Json(avg) = handlers::average(State(state.clone())).await.unwrap();
    assert_eq!(avg.average_real_yield, None);

    for days in [1, 2] {
        handlers::create(State(state.clone()), request(&vault_addr().to_string(), days))
            .await
            .unwrap();
    }

    let Json(all) = handlers::list(State(state.clone())).await.unwrap();
    assert_eq!(all.len(), 2);
    assert!(all[0].id < all[1].id);

    let Json(avg) = handlers::average(State(state)).await.unwrap();
    assert!((avg.average_real_yield.unwrap() - 10.0).abs() < 1e-9);
}

#[tokio::test]
async fn test_router_builds() {
    let _ = vault_yield::api::router(state());
}
