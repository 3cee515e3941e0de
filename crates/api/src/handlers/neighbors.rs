//! Handlers for neighbor activity metrics.
//!
//! Both endpoints count profiles in one postal code whose user was active
//! within a window, then hide counts below a threshold.

use axum::extract::{Query, State};
use axum::Json;
use chrono::{Duration, Utc};
use nachbar_core::error::CoreError;
use nachbar_core::types::DbId;
use nachbar_core::validation::{validate_plz, validate_range};
use nachbar_db::models::neighbor::{
    NeighborMetrics, DEFAULT_MIN_COUNT, DEFAULT_WINDOW_DAYS, MAX_MIN_COUNT, MAX_WINDOW_DAYS,
    MIN_MIN_COUNT, MIN_WINDOW_DAYS,
};
use nachbar_db::repositories::ProfileRepo;
use serde::Deserialize;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::query::parse_int;
use crate::state::AppState;

/// Query parameters for `GET /public/neighbors/metrics`.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicMetricsParams {
    pub plz: Option<String>,
    pub days: Option<String>,
    pub min_count: Option<String>,
}

/// Query parameters for `GET /neighbors/metrics`.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricsParams {
    pub days: Option<String>,
    pub min_count: Option<String>,
}

/// Validated window and threshold.
#[derive(Debug, Clone, Copy, PartialEq)]
struct MetricsWindow {
    days: i64,
    min_count: i64,
}

impl MetricsWindow {
    fn parse(days: Option<&str>, min_count: Option<&str>) -> Result<Self, CoreError> {
        let days = parse_int("days", days)?.unwrap_or(DEFAULT_WINDOW_DAYS);
        validate_range("days", days, MIN_WINDOW_DAYS, MAX_WINDOW_DAYS)?;

        let min_count = parse_int("minCount", min_count)?.unwrap_or(DEFAULT_MIN_COUNT);
        validate_range("minCount", min_count, MIN_MIN_COUNT, MAX_MIN_COUNT)?;

        Ok(Self { days, min_count })
    }
}

/// GET /api/v1/public/neighbors/metrics
pub async fn public_metrics(
    State(state): State<AppState>,
    Query(params): Query<PublicMetricsParams>,
) -> AppResult<Json<NeighborMetrics>> {
    let plz = params
        .plz
        .map(|p| p.trim().to_string())
        .ok_or_else(|| AppError::Core(CoreError::Validation("plz is required".into())))?;
    validate_plz(&plz)?;
    let window = MetricsWindow::parse(params.days.as_deref(), params.min_count.as_deref())?;

    let metrics = count_metrics(&state, plz, window, None).await?;
    Ok(Json(metrics))
}

/// GET /api/v1/neighbors/metrics
///
/// Metrics for the caller's own postal code, not counting the caller.
pub async fn my_metrics(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(params): Query<MetricsParams>,
) -> AppResult<Json<NeighborMetrics>> {
    let window = MetricsWindow::parse(params.days.as_deref(), params.min_count.as_deref())?;

    let plz = ProfileRepo::find_by_user(&state.pool, auth.user_id)
        .await?
        .and_then(|p| p.plz)
        .filter(|p| !p.is_empty())
        .ok_or_else(|| AppError::Core(CoreError::Conflict("PLZ not set".into())))?;

    let metrics = count_metrics(&state, plz, window, Some(auth.user_id)).await?;
    Ok(Json(metrics))
}

async fn count_metrics(
    state: &AppState,
    plz: String,
    window: MetricsWindow,
    exclude_user: Option<DbId>,
) -> AppResult<NeighborMetrics> {
    let since = Utc::now() - Duration::days(window.days);
    let count = ProfileRepo::count_active_in_plz(&state.pool, &plz, since, exclude_user).await?;
    Ok(NeighborMetrics::from_count(
        plz,
        window.days,
        window.min_count,
        count,
    ))
}
