//! Route definitions for the `/admin` resource. Every route requires the
//! `ADMIN` role.

use axum::middleware::from_fn_with_state;
use axum::routing::{get, patch};
use axum::Router;

use crate::handlers::{admin_activities, admin_users, ping};
use crate::middleware::rbac::{require_roles, RoleGate, ADMIN_ONLY};
use crate::state::AppState;

/// Routes mounted at `/admin`.
///
/// ```text
/// GET   /ping                      -> ping
///
/// GET   /activities                -> list_activities
/// PATCH /activities/bulk/status    -> bulk_status
/// GET   /activities/{id}           -> get_activity
/// PATCH /activities/{id}           -> update_activity
/// PATCH /activities/{id}/status    -> set_status
///
/// GET   /users                     -> list_users
/// PATCH /users/{id}/role           -> set_role
/// PATCH /users/{id}/ban            -> set_ban
/// GET   /users/{id}/warnings       -> list_warnings
/// POST  /users/{id}/warnings       -> create_warning
/// ```
pub fn router(state: &AppState) -> Router<AppState> {
    Router::new()
        .route("/ping", get(ping::ping))
        .route("/activities", get(admin_activities::list_activities))
        .route(
            "/activities/bulk/status",
            patch(admin_activities::bulk_status),
        )
        .route(
            "/activities/{id}",
            get(admin_activities::get_activity).patch(admin_activities::update_activity),
        )
        .route(
            "/activities/{id}/status",
            patch(admin_activities::set_status),
        )
        .route("/users", get(admin_users::list_users))
        .route("/users/{id}/role", patch(admin_users::set_role))
        .route("/users/{id}/ban", patch(admin_users::set_ban))
        .route(
            "/users/{id}/warnings",
            get(admin_users::list_warnings).post(admin_users::create_warning),
        )
        .route_layer(from_fn_with_state(
            RoleGate::new(state.clone(), ADMIN_ONLY),
            require_roles,
        ))
}
