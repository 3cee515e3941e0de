//! Handlers for the caller's own account (`/users/me`).

use axum::extract::State;
use axum::Json;
use nachbar_core::error::CoreError;
use nachbar_core::validation::{validate_length, validate_plz, validate_url};
use nachbar_db::models::user::{MeResponse, UpdateProfile};
use nachbar_db::repositories::{ProfileRepo, UserRepo};

use crate::error::{AppError, AppResult};
use crate::extract::ApiJson;
use crate::handlers::auth::{DISPLAY_NAME_MAX_LEN, DISPLAY_NAME_MIN_LEN};
use crate::handlers::{ok, OkResponse};
use crate::middleware::auth::AuthUser;
use crate::state::AppState;

pub const BIO_MAX_LEN: usize = 500;

/// GET /api/v1/users/me
///
/// The caller's account, profile and profile completion.
pub async fn get_me(State(state): State<AppState>, auth: AuthUser) -> AppResult<Json<MeResponse>> {
    let user = UserRepo::find_by_id(&state.pool, auth.user_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "User",
            id: auth.user_id,
        }))?;
    let profile = ProfileRepo::find_by_user(&state.pool, auth.user_id).await?;

    Ok(Json(MeResponse::new(&user, profile)))
}

/// PATCH /api/v1/users/me
///
/// Upsert the provided profile fields. Blank strings are trimmed and
/// validated like any other value.
pub async fn update_me(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiJson(input): ApiJson<UpdateProfile>,
) -> AppResult<Json<OkResponse>> {
    let input = normalize_profile(input)?;

    if !input.is_empty() {
        ProfileRepo::upsert(&state.pool, auth.user_id, &input).await?;
        tracing::debug!(user_id = %auth.user_id, "Profile updated");
    }

    Ok(ok())
}

/// Trim every field and validate what remains.
fn normalize_profile(input: UpdateProfile) -> Result<UpdateProfile, CoreError> {
    let trim = |v: Option<String>| v.map(|s| s.trim().to_string());
    let profile = UpdateProfile {
        display_name: trim(input.display_name),
        plz: trim(input.plz),
        avatar_url: trim(input.avatar_url),
        bio: trim(input.bio),
    };

    if let Some(name) = &profile.display_name {
        validate_length("displayName", name, DISPLAY_NAME_MIN_LEN, DISPLAY_NAME_MAX_LEN)?;
    }
    if let Some(plz) = &profile.plz {
        validate_plz(plz)?;
    }
    if let Some(url) = &profile.avatar_url {
        validate_url("avatarUrl", url)?;
    }
    if let Some(bio) = &profile.bio {
        validate_length("bio", bio, 0, BIO_MAX_LEN)?;
    }

    Ok(profile)
}
