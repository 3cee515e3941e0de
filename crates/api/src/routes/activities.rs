//! Route definitions for the public `/activities` resource.

use axum::routing::get;
use axum::Router;

use crate::handlers::activities;
use crate::state::AppState;

/// Routes mounted at `/activities`.
///
/// ```text
/// GET    /        -> list_activities
/// POST   /        -> create_activity (requires auth)
/// GET    /{id}    -> get_activity
/// PATCH  /{id}    -> update_activity (owner)
/// DELETE /{id}    -> archive_activity (owner)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(activities::list_activities).post(activities::create_activity),
        )
        .route(
            "/{id}",
            get(activities::get_activity)
                .patch(activities::update_activity)
                .delete(activities::archive_activity),
        )
}
