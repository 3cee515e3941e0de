//! Request handlers, one module per resource.

use axum::Json;
use serde::Serialize;

pub mod activities;
pub mod admin_activities;
pub mod admin_users;
pub mod auth;
pub mod neighbors;
pub mod ping;
pub mod users;

/// Body returned by writes that have nothing else to report.
#[derive(Debug, Serialize)]
pub struct OkResponse {
    pub ok: bool,
}

/// `{ "ok": true }`
pub fn ok() -> Json<OkResponse> {
    Json(OkResponse { ok: true })
}
