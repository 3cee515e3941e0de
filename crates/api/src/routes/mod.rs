pub mod activities;
pub mod admin;
pub mod auth;
pub mod health;
pub mod moderator;
pub mod neighbors;
pub mod users;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /auth/signup                                 signup (public)
/// /auth/login                                  login (public)
/// /auth/me                                     current identity (auth)
///
/// /users/me                                    get, update own profile (auth)
///
/// /activities                                  list (public), create (auth)
/// /activities/{id}                             get (public), update, archive (owner)
///
/// /admin/ping                                  role probe (admin)
/// /admin/activities                            list (admin)
/// /admin/activities/{id}                       get, edit (admin)
/// /admin/activities/{id}/status                set status (admin)
/// /admin/activities/bulk/status                bulk set status (admin)
/// /admin/users                                 list (admin)
/// /admin/users/{id}/role                       set role (admin)
/// /admin/users/{id}/ban                        ban, unban (admin)
/// /admin/users/{id}/warnings                   list, issue (admin)
///
/// /moderator/ping                              role probe (moderator, admin)
///
/// /public/neighbors/metrics                    neighbor counts by plz (public)
/// /neighbors/metrics                           neighbor counts, own plz (auth)
/// ```
///
/// Role-gated groups need the state to build their gate, hence the
/// parameter.
pub fn api_routes(state: &AppState) -> Router<AppState> {
    Router::new()
        .nest("/auth", auth::router())
        .nest("/users", users::router())
        .nest("/activities", activities::router())
        .nest("/admin", admin::router(state))
        .nest("/moderator", moderator::router(state))
        .merge(neighbors::router())
}
