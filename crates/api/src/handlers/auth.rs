//! Handlers for the `/auth` resource (signup, login, me).

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use nachbar_core::error::CoreError;
use nachbar_core::roles::UserRole;
use nachbar_core::types::DbId;
use nachbar_core::validation::{normalize_email, validate_email, validate_length};
use nachbar_db::models::user::{AccountResponse, CreateUser};
use nachbar_db::repositories::UserRepo;
use serde::{Deserialize, Serialize};

use crate::auth::jwt::generate_access_token;
use crate::auth::password::{
    hash_password, validate_password_strength, verify_password, MIN_PASSWORD_LENGTH,
};
use crate::error::{AppError, AppResult};
use crate::extract::ApiJson;
use crate::middleware::auth::AuthUser;
use crate::state::AppState;

/// Display name bounds shared by signup and profile edits.
pub const DISPLAY_NAME_MIN_LEN: usize = 2;
pub const DISPLAY_NAME_MAX_LEN: usize = 50;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Request body for `POST /auth/signup`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignupRequest {
    pub email: String,
    pub password: String,
    pub display_name: Option<String>,
}

/// Request body for `POST /auth/login`.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub access_token: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MeResponse {
    pub user_id: DbId,
    pub email: String,
    pub role: UserRole,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /api/v1/auth/signup
///
/// Register a new account with an empty profile. Returns 409 when the email
/// is already taken.
pub async fn signup(
    State(state): State<AppState>,
    ApiJson(input): ApiJson<SignupRequest>,
) -> AppResult<(StatusCode, Json<AccountResponse>)> {
    let email = normalize_email(&input.email);
    validate_email(&email)?;

    validate_password_strength(&input.password, MIN_PASSWORD_LENGTH)
        .map_err(|msg| AppError::Core(CoreError::Validation(msg)))?;

    let display_name = match input.display_name.as_deref().map(str::trim) {
        Some(name) if !name.is_empty() => {
            validate_length(
                "displayName",
                name,
                DISPLAY_NAME_MIN_LEN,
                DISPLAY_NAME_MAX_LEN,
            )?;
            Some(name.to_string())
        }
        _ => None,
    };

    let password_hash = hash_password(&input.password)
        .map_err(|e| AppError::InternalError(format!("Password hashing error: {e}")))?;

    let user = UserRepo::create(
        &state.pool,
        &CreateUser {
            email,
            password_hash,
            display_name,
        },
    )
    .await?;

    tracing::info!(user_id = %user.id, "User signed up");

    Ok((StatusCode::CREATED, Json(AccountResponse::from(&user))))
}

/// POST /api/v1/auth/login
///
/// Authenticate with email + password and return an access token.
/// Ban state is checked only after the password verifies.
pub async fn login(
    State(state): State<AppState>,
    ApiJson(input): ApiJson<LoginRequest>,
) -> AppResult<Json<LoginResponse>> {
    let invalid = || AppError::Core(CoreError::Unauthorized("Invalid email or password".into()));

    let email = normalize_email(&input.email);
    let user = UserRepo::find_by_email(&state.pool, &email)
        .await?
        .ok_or_else(invalid)?;

    let password_valid = verify_password(&input.password, &user.password_hash)
        .map_err(|e| AppError::InternalError(format!("Password verification error: {e}")))?;
    if !password_valid {
        return Err(invalid());
    }

    if user.is_banned {
        return Err(AppError::Core(CoreError::Forbidden(
            "Account is banned".into(),
        )));
    }

    UserRepo::touch_last_active(&state.pool, user.id).await?;

    let access_token = generate_access_token(user.id, &user.email, &state.config.jwt)
        .map_err(|e| AppError::InternalError(format!("Token generation error: {e}")))?;

    Ok(Json(LoginResponse { access_token }))
}

/// GET /api/v1/auth/me
pub async fn me(auth: AuthUser) -> Json<MeResponse> {
    Json(MeResponse {
        user_id: auth.user_id,
        email: auth.email,
        role: auth.role,
    })
}
