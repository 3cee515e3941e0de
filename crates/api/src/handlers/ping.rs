//! Role probes used by clients to check their access level.

use axum::Json;
use nachbar_core::roles::UserRole;
use serde::Serialize;

use crate::middleware::auth::AuthUser;

#[derive(Debug, Serialize)]
pub struct PingResponse {
    pub ok: bool,
    pub role: UserRole,
}

/// GET /api/v1/admin/ping and /api/v1/moderator/ping
///
/// Reaching this handler means the role gate let the caller through.
pub async fn ping(auth: AuthUser) -> Json<PingResponse> {
    Json(PingResponse {
        ok: true,
        role: auth.role,
    })
}
