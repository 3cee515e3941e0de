//! Route definitions for the `/moderator` resource.

use axum::middleware::from_fn_with_state;
use axum::routing::get;
use axum::Router;

use crate::handlers::ping;
use crate::middleware::rbac::{require_roles, RoleGate, MODERATION_STAFF};
use crate::state::AppState;

/// Routes mounted at `/moderator`. Moderators and administrators only.
///
/// ```text
/// GET /ping   -> ping
/// ```
pub fn router(state: &AppState) -> Router<AppState> {
    Router::new()
        .route("/ping", get(ping::ping))
        .route_layer(from_fn_with_state(
            RoleGate::new(state.clone(), MODERATION_STAFF),
            require_roles,
        ))
}
