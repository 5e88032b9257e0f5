pub mod error;
pub mod handlers;
pub mod state;
pub mod types;

use anyhow::{Context, Result};
use axum::Router;
use axum::routing::get;
use tower_http::cors::{Any, CorsLayer};
use tracing::info;

use state::AppState;

pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(|| async { "ok" }))
        .route("/yields/", get(handlers::list).post(handlers::create))
        .route("/yields/average", get(handlers::average))
        .route("/yields/{id}", get(handlers::get_one).delete(handlers::delete))
        .layer(cors)
        .with_state(state)
}

pub async fn serve(host: &str, port: u16, state: AppState) -> Result<()> {
    let app = router(state);

    let addr = format!("{host}:{port}");
    info!(%addr, "vault-yield API listening");
    println!("vault-yield API server listening on {addr}");
    println!("  Health:  GET    http://{addr}/health");
    println!("  Yields:  GET    http://{addr}/yields/");
    println!("  Compute: POST   http://{addr}/yields/");
    println!("  Record:  GET    http://{addr}/yields/{{id}}");
    println!("  Delete:  DELETE http://{addr}/yields/{{id}}");
    println!("  Average: GET    http://{addr}/yields/average");

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("binding to {addr}"))?;

    axum::serve(listener, app).await.context("running server")?;

    Ok(())
}
