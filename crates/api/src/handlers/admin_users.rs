//! Handlers for `/admin/users` (user listing, role and ban management,
//! warnings).

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::Json;
use nachbar_core::error::CoreError;
use nachbar_core::pagination::Page;
use nachbar_core::roles::UserRole;
use nachbar_core::types::DbId;
use nachbar_core::validation::{parse_bool_param, parse_optional};
use nachbar_core::warning::{validate_warning_message, WarningSeverity};
use nachbar_db::models::user::{AdminUserItem, UserModerationState};
use nachbar_db::models::warning::{CreateWarning, UserWarning, WarningItem};
use nachbar_db::repositories::{AdminUserListQuery, UserRepo, WarningRepo};
use serde::{Deserialize, Deserializer};

use crate::error::{AppError, AppResult};
use crate::extract::{ApiJson, ApiPath};
use crate::handlers::activities::parse_timestamp;
use crate::middleware::auth::AuthUser;
use crate::query::{parse_cursor, parse_take};
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request types
// ---------------------------------------------------------------------------

/// Query parameters for `GET /admin/users`.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminListUsersParams {
    pub take: Option<String>,
    pub cursor: Option<String>,
    pub q: Option<String>,
    pub role: Option<String>,
    /// `true`/`false` in any case; any other value is ignored.
    pub is_banned: Option<String>,
}

/// Query parameters for `GET /admin/users/{id}/warnings`.
#[derive(Debug, Default, Deserialize)]
pub struct PageParams {
    pub take: Option<String>,
    pub cursor: Option<String>,
}

/// Request body for `PATCH /admin/users/{id}/role`.
#[derive(Debug, Deserialize)]
pub struct SetRoleRequest {
    pub role: String,
}

/// Request body for `PATCH /admin/users/{id}/ban`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SetBanRequest {
    /// A JSON boolean or the strings `"true"`/`"false"`.
    #[serde(deserialize_with = "lenient_bool")]
    pub is_banned: bool,
    pub reason: Option<String>,
}

/// Request body for `POST /admin/users/{id}/warnings`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateWarningRequest {
    pub message: String,
    pub severity: String,
    pub expires_at: Option<String>,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// GET /api/v1/admin/users
pub async fn list_users(
    State(state): State<AppState>,
    Query(params): Query<AdminListUsersParams>,
) -> AppResult<Json<Page<AdminUserItem>>> {
    let take = parse_take(params.take.as_deref())?;
    let cursor = parse_cursor(params.cursor.as_deref())?;

    let query = AdminUserListQuery {
        q: params.q,
        role: parse_optional(params.role.as_deref(), UserRole::parse)?,
        is_banned: params.is_banned.as_deref().and_then(parse_bool_param),
    };

    let page = UserRepo::list_admin(&state.pool, &query, take, cursor).await?;
    Ok(Json(page.map(AdminUserItem::from)))
}

/// PATCH /api/v1/admin/users/{id}/role
pub async fn set_role(
    State(state): State<AppState>,
    admin: AuthUser,
    ApiPath(user_id): ApiPath<DbId>,
    ApiJson(input): ApiJson<SetRoleRequest>,
) -> AppResult<Json<UserModerationState>> {
    let role = UserRole::parse(&input.role)?;

    let updated = UserRepo::set_role(&state.pool, user_id, role)
        .await?
        .ok_or_else(|| user_not_found(user_id))?;

    tracing::info!(
        actor_id = %admin.user_id,
        target_user_id = %user_id,
        role = %updated.role,
        "User role changed by admin",
    );

    Ok(Json(updated))
}

/// PATCH /api/v1/admin/users/{id}/ban
///
/// Ban or unban a user. Administrators cannot ban themselves.
pub async fn set_ban(
    State(state): State<AppState>,
    admin: AuthUser,
    ApiPath(user_id): ApiPath<DbId>,
    ApiJson(input): ApiJson<SetBanRequest>,
) -> AppResult<Json<UserModerationState>> {
    if input.is_banned && admin.user_id == user_id {
        return Err(AppError::BadRequest("You cannot ban yourself".into()));
    }

    let reason = input
        .reason
        .as_deref()
        .map(str::trim)
        .filter(|r| !r.is_empty());

    let updated = UserRepo::set_ban(&state.pool, user_id, input.is_banned, reason)
        .await?
        .ok_or_else(|| user_not_found(user_id))?;

    tracing::info!(
        actor_id = %admin.user_id,
        target_user_id = %user_id,
        is_banned = updated.is_banned,
        reason = updated.ban_reason.as_deref(),
        "User ban state changed by admin",
    );

    Ok(Json(updated))
}

/// GET /api/v1/admin/users/{id}/warnings
pub async fn list_warnings(
    State(state): State<AppState>,
    ApiPath(user_id): ApiPath<DbId>,
    Query(params): Query<PageParams>,
) -> AppResult<Json<Page<WarningItem>>> {
    let take = parse_take(params.take.as_deref())?;
    let cursor = parse_cursor(params.cursor.as_deref())?;

    if !UserRepo::exists(&state.pool, user_id).await? {
        return Err(user_not_found(user_id));
    }

    let page = WarningRepo::list_for_user(&state.pool, user_id, take, cursor).await?;
    Ok(Json(page.map(WarningItem::from)))
}

/// POST /api/v1/admin/users/{id}/warnings
///
/// Issue a warning to a user. Returns 201 with the stored warning.
pub async fn create_warning(
    State(state): State<AppState>,
    admin: AuthUser,
    ApiPath(user_id): ApiPath<DbId>,
    ApiJson(input): ApiJson<CreateWarningRequest>,
) -> AppResult<(StatusCode, Json<UserWarning>)> {
    let message = input.message.trim().to_string();
    validate_warning_message(&message)?;
    let severity = WarningSeverity::parse(&input.severity)?;
    let expires_at = parse_timestamp("expiresAt", input.expires_at.as_deref())?;

    if !UserRepo::exists(&state.pool, user_id).await? {
        return Err(user_not_found(user_id));
    }

    let warning = WarningRepo::create(
        &state.pool,
        &CreateWarning {
            user_id,
            message,
            severity,
            expires_at,
            created_by_admin_id: admin.user_id,
        },
    )
    .await?;

    tracing::info!(
        actor_id = %admin.user_id,
        target_user_id = %user_id,
        warning_id = %warning.id,
        severity = severity.as_str(),
        "Warning issued by admin",
    );

    Ok((StatusCode::CREATED, Json(warning)))
}

fn user_not_found(id: DbId) -> AppError {
    AppError::Core(CoreError::NotFound { entity: "User", id })
}

fn lenient_bool<'de, D: Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum BoolOrText {
        Bool(bool),
        Text(String),
    }

    match BoolOrText::deserialize(deserializer)? {
        BoolOrText::Bool(value) => Ok(value),
        BoolOrText::Text(text) => parse_bool_param(&text)
            .ok_or_else(|| serde::de::Error::custom("isBanned must be true or false")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ban_request(body: serde_json::Value) -> Result<SetBanRequest, serde_json::Error> {
        serde_json::from_value(body)
    }

    #[test]
    fn ban_flag_accepts_booleans_and_boolean_strings() {
        let cases = [
            (serde_json::json!(true), true),
            (serde_json::json!(false), false),
            (serde_json::json!("true"), true),
            (serde_json::json!("FALSE"), false),
        ];
        for (flag, expected) in cases {
            let request = ban_request(serde_json::json!({ "isBanned": flag })).unwrap();
            assert_eq!(request.is_banned, expected);
        }
    }

    #[test]
    fn ban_flag_rejects_other_values() {
        assert!(ban_request(serde_json::json!({ "isBanned": "yes" })).is_err());
        assert!(ban_request(serde_json::json!({ "isBanned": 1 })).is_err());
        assert!(ban_request(serde_json::json!({})).is_err());
    }
}
