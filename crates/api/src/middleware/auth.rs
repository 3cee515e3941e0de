//! JWT-based authentication extractor for Axum handlers.

use axum::extract::FromRequestParts;
use axum::http::header::{AUTHORIZATION, COOKIE};
use axum::http::request::Parts;
use axum::http::HeaderMap;
use nachbar_core::error::CoreError;
use nachbar_core::roles::UserRole;
use nachbar_core::types::DbId;
use nachbar_db::repositories::UserRepo;

use crate::auth::jwt::validate_token;
use crate::error::AppError;
use crate::state::AppState;

/// Cookie that may carry the access token instead of the `Authorization` header.
pub const TOKEN_COOKIE: &str = "happynachbar_token";

/// Authenticated user resolved from a bearer token.
///
/// The token is taken from `Authorization: Bearer <token>` or, failing that,
/// the [`TOKEN_COOKIE`] cookie. After signature and expiry checks the user is
/// loaded from the database: unknown and banned users are rejected, and the
/// role is the one currently stored, not one embedded in the token.
///
/// ```ignore
/// async fn my_handler(user: AuthUser) -> AppResult<Json<()>> {
///     tracing::info!(user_id = %user.user_id, role = %user.role, "handling request");
///     Ok(Json(()))
/// }
/// ```
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub user_id: DbId,
    pub email: String,
    pub role: UserRole,
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        // Already resolved by the role gate for this request.
        if let Some(user) = parts.extensions.get::<AuthUser>() {
            return Ok(user.clone());
        }

        let token = extract_token(&parts.headers)?;

        let claims = validate_token(&token, &state.config.jwt).map_err(|_| {
            AppError::Core(CoreError::Unauthorized("Invalid or expired token".into()))
        })?;

        let user = UserRepo::find_by_id(&state.pool, claims.sub)
            .await?
            .filter(|u| !u.is_banned)
            .ok_or_else(|| {
                AppError::Core(CoreError::Unauthorized("Invalid or expired token".into()))
            })?;

        let auth_user = AuthUser {
            user_id: user.id,
            email: user.email,
            role: user.role,
        };
        parts.extensions.insert(auth_user.clone());
        Ok(auth_user)
    }
}

/// Find the bearer token in the `Authorization` header or the token cookie.
fn extract_token(headers: &HeaderMap) -> Result<String, AppError> {
    if let Some(auth_header) = headers.get(AUTHORIZATION).and_then(|v| v.to_str().ok()) {
        let token = auth_header.strip_prefix("Bearer ").ok_or_else(|| {
            AppError::Core(CoreError::Unauthorized(
                "Invalid Authorization format. Expected: Bearer <token>".into(),
            ))
        })?;
        return Ok(token.trim().to_string());
    }

    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .find_map(|header| cookie_value(header, TOKEN_COOKIE))
        .ok_or_else(|| {
            AppError::Core(CoreError::Unauthorized(
                "Missing Authorization header".into(),
            ))
        })
}

/// Look up one cookie in a `Cookie` header value (`a=1; b=2`).
fn cookie_value(header: &str, name: &str) -> Option<String> {
    header
        .split(';')
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(key, _)| *key == name)
        .map(|(_, value)| value.trim_matches('"').to_string())
        .filter(|value| !value.is_empty())
}
