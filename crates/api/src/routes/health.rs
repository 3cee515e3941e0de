use axum::extract::State;
use axum::{routing::get, Json, Router};
use nachbar_db::repositories::UserRepo;
use serde::Serialize;

use crate::error::AppResult;
use crate::state::AppState;

/// Health check response payload.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    /// Overall service status.
    pub status: &'static str,
    /// Crate version from Cargo.toml.
    pub version: &'static str,
    /// Whether the database is reachable.
    pub db_healthy: bool,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DbHealthResponse {
    pub status: &'static str,
    pub users_count: i64,
}

/// GET /health -- returns service and database health.
async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let db_healthy = nachbar_db::health_check(&state.pool).await.is_ok();

    let status = if db_healthy { "ok" } else { "degraded" };

    Json(HealthResponse {
        status,
        version: env!("CARGO_PKG_VERSION"),
        db_healthy,
    })
}

/// GET /health/db -- fails with 500 when the database is unreachable.
async fn db_health(State(state): State<AppState>) -> AppResult<Json<DbHealthResponse>> {
    let users_count = UserRepo::count(&state.pool).await?;
    Ok(Json(DbHealthResponse {
        status: "db ok",
        users_count,
    }))
}

/// Mount health check routes (intended for root-level, NOT under `/api/v1`).
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/health", get(health_check))
        .route("/health/db", get(db_health))
}
