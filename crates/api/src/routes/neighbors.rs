//! Route definitions for neighbor metrics.

use axum::routing::get;
use axum::Router;

use crate::handlers::neighbors;
use crate::state::AppState;

/// Routes merged at the API root.
///
/// ```text
/// GET /public/neighbors/metrics   -> public_metrics
/// GET /neighbors/metrics          -> my_metrics (requires auth)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/public/neighbors/metrics", get(neighbors::public_metrics))
        .route("/neighbors/metrics", get(neighbors::my_metrics))
}
