//! Role-based access control (RBAC) middleware.
//!
//! Each protected route group declares the roles it accepts as a plain
//! `&'static [UserRole]` and attaches [`require_roles`] with
//! `route_layer`. The gate authenticates the caller via [`AuthUser`] and
//! rejects with 403 when the stored role is not in the set. An empty set
//! declares an open route and skips the gate entirely.
//!
//! ```ignore
//! Router::new()
//!     .route("/ping", get(ping))
//!     .route_layer(from_fn_with_state(RoleGate::new(state, ADMIN_ONLY), require_roles))
//! ```

use axum::extract::{FromRequestParts, Request, State};
use axum::middleware::Next;
use axum::response::Response;
use nachbar_core::error::CoreError;
use nachbar_core::roles::{role_permitted, UserRole};

use super::auth::AuthUser;
use crate::error::AppError;
use crate::state::AppState;

/// Administrators only.
pub const ADMIN_ONLY: &[UserRole] = &[UserRole::Admin];

/// Moderators and administrators.
pub const MODERATION_STAFF: &[UserRole] = &[UserRole::Moderator, UserRole::Admin];

/// State for [`require_roles`]: the app state plus the declared role set.
#[derive(Clone)]
pub struct RoleGate {
    pub state: AppState,
    pub roles: &'static [UserRole],
}

impl RoleGate {
    pub fn new(state: AppState, roles: &'static [UserRole]) -> Self {
        Self { state, roles }
    }
}

/// Reject callers whose role is not in the gate's declared set.
///
/// On success the resolved [`AuthUser`] is stored in the request extensions
/// so handlers extracting it do not reload the user.
pub async fn require_roles(
    State(gate): State<RoleGate>,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    if gate.roles.is_empty() {
        return Ok(next.run(request).await);
    }

    let (mut parts, body) = request.into_parts();
    let user = AuthUser::from_request_parts(&mut parts, &gate.state).await?;

    if !role_permitted(gate.roles, user.role) {
        tracing::debug!(user_id = %user.user_id, role = %user.role, "Role not permitted");
        return Err(AppError::Core(CoreError::Forbidden(
            "Insufficient role".into(),
        )));
    }

    Ok(next.run(Request::from_parts(parts, body)).await)
}
