//! Handlers for `/admin/activities` (moderation of every activity).
//!
//! The route group is gated to administrators by [`require_roles`]; the
//! handlers still extract [`AuthUser`] to attribute each action in the log.
//!
//! [`require_roles`]: crate::middleware::rbac::require_roles

use axum::extract::{Query, State};
use axum::Json;
use nachbar_core::activity::{ActivityStatus, StatusActor, MAX_BULK_IDS};
use nachbar_core::error::CoreError;
use nachbar_core::pagination::Page;
use nachbar_core::types::DbId;
use nachbar_core::validation::{parse_optional, parse_uuid_param};
use nachbar_db::models::activity::{
    ActivityListQuery, AdminActivityCard, AdminActivityDetail, StatusResponse, UpdateActivity,
};
use nachbar_db::repositories::{ActivityImageRepo, ActivityRepo};
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};
use crate::extract::{ApiJson, ApiPath};
use crate::handlers::activities::{
    activity_not_found, parse_category, parse_plz, parse_timestamp, validate_update,
};
use crate::middleware::auth::AuthUser;
use crate::query::{parse_cursor, parse_take};
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Query parameters for `GET /admin/activities`.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminListActivitiesParams {
    pub take: Option<String>,
    pub cursor: Option<String>,
    pub q: Option<String>,
    pub category: Option<String>,
    pub status: Option<String>,
    pub plz: Option<String>,
    pub created_by_id: Option<String>,
}

/// Request body for `PATCH /admin/activities/{id}`.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminUpdateActivityRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub category: Option<String>,
    pub plz: Option<String>,
    pub scheduled_at: Option<String>,
}

/// Request body for `PATCH /admin/activities/{id}/status`.
#[derive(Debug, Deserialize)]
pub struct SetStatusRequest {
    pub status: String,
}

/// Request body for `PATCH /admin/activities/bulk/status`.
#[derive(Debug, Deserialize)]
pub struct BulkStatusRequest {
    pub ids: Vec<DbId>,
    pub status: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BulkStatusResponse {
    pub ok: bool,
    pub updated_count: u64,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// GET /api/v1/admin/activities
///
/// Every activity regardless of status unless `status` is given.
pub async fn list_activities(
    State(state): State<AppState>,
    Query(params): Query<AdminListActivitiesParams>,
) -> AppResult<Json<Page<AdminActivityCard>>> {
    let take = parse_take(params.take.as_deref())?;
    let cursor = parse_cursor(params.cursor.as_deref())?;

    let query = ActivityListQuery {
        q: params.q,
        category: parse_category(params.category.as_deref())?,
        status: parse_optional(params.status.as_deref(), ActivityStatus::parse)?,
        plz: parse_plz(params.plz.as_deref())?,
        created_by_id: parse_optional(params.created_by_id.as_deref(), |v| {
            parse_uuid_param("createdById", v)
        })?,
        start_from: None,
        start_to: None,
    };

    let page = ActivityRepo::list(&state.pool, &query, take, cursor).await?;
    Ok(Json(page.map(AdminActivityCard::from)))
}

/// GET /api/v1/admin/activities/{id}
pub async fn get_activity(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<DbId>,
) -> AppResult<Json<AdminActivityDetail>> {
    Ok(Json(load_admin_detail(&state, id).await?))
}

/// PATCH /api/v1/admin/activities/{id}
///
/// Edit the core fields of any activity. Images are not touched.
pub async fn update_activity(
    State(state): State<AppState>,
    admin: AuthUser,
    ApiPath(id): ApiPath<DbId>,
    ApiJson(input): ApiJson<AdminUpdateActivityRequest>,
) -> AppResult<Json<AdminActivityDetail>> {
    let update = admin_update_from_request(input)?;

    let before = ActivityRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| activity_not_found(id))?;

    let after = ActivityRepo::update(&state.pool, id, &update, None, "")
        .await?
        .ok_or_else(|| activity_not_found(id))?;

    tracing::info!(
        actor_id = %admin.user_id,
        activity_id = %id,
        title_changed = before.title != after.title,
        category_from = before.category.as_str(),
        category_to = after.category.as_str(),
        plz_from = %before.plz,
        plz_to = %after.plz,
        "Activity edited by admin",
    );

    Ok(Json(load_admin_detail(&state, id).await?))
}

/// PATCH /api/v1/admin/activities/{id}/status
///
/// Archive or restore one activity.
pub async fn set_status(
    State(state): State<AppState>,
    admin: AuthUser,
    ApiPath(id): ApiPath<DbId>,
    ApiJson(input): ApiJson<SetStatusRequest>,
) -> AppResult<Json<StatusResponse>> {
    let requested = ActivityStatus::parse(&input.status)?;

    let existing = ActivityRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| activity_not_found(id))?;
    let next = existing.status.transition(requested, StatusActor::Admin)?;

    let updated = ActivityRepo::set_status(&state.pool, id, next)
        .await?
        .ok_or_else(|| activity_not_found(id))?;

    tracing::info!(
        actor_id = %admin.user_id,
        activity_id = %id,
        from = existing.status.as_str(),
        to = updated.status.as_str(),
        "Activity status changed by admin",
    );

    Ok(Json(StatusResponse {
        id: updated.id,
        status: updated.status,
    }))
}

/// PATCH /api/v1/admin/activities/bulk/status
///
/// Set one status on up to [`MAX_BULK_IDS`] activities. Unknown ids are
/// skipped and not counted.
pub async fn bulk_status(
    State(state): State<AppState>,
    admin: AuthUser,
    ApiJson(input): ApiJson<BulkStatusRequest>,
) -> AppResult<Json<BulkStatusResponse>> {
    validate_bulk_ids(&input.ids)?;
    let status = ActivityStatus::parse(&input.status)?;

    let updated_count = ActivityRepo::bulk_set_status(&state.pool, &input.ids, status).await?;

    tracing::info!(
        actor_id = %admin.user_id,
        requested = input.ids.len(),
        updated_count,
        status = status.as_str(),
        "Bulk activity status change by admin",
    );

    Ok(Json(BulkStatusResponse {
        ok: true,
        updated_count,
    }))
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

async fn load_admin_detail(state: &AppState, id: DbId) -> AppResult<AdminActivityDetail> {
    let view = ActivityRepo::find_view(&state.pool, id, None)
        .await?
        .ok_or_else(|| activity_not_found(id))?;
    let images = ActivityImageRepo::list_for_activity(&state.pool, id).await?;
    Ok(AdminActivityDetail::new(view, images))
}

/// Build the update DTO. A blank title and an empty body are both
/// rejected.
fn admin_update_from_request(input: AdminUpdateActivityRequest) -> AppResult<UpdateActivity> {
    let title = match input.title.map(|t| t.trim().to_string()) {
        Some(title) if title.is_empty() => {
            return Err(AppError::BadRequest("Title cannot be empty".into()));
        }
        other => other,
    };

    let update = UpdateActivity {
        title,
        description: input.description.map(|d| d.trim().to_string()),
        category: parse_category(input.category.as_deref())?,
        plz: input.plz,
        scheduled_at: parse_timestamp("scheduledAt", input.scheduled_at.as_deref())?,
    };

    if update.is_empty() {
        return Err(AppError::BadRequest("No fields to update".into()));
    }
    validate_update(&update)?;
    Ok(update)
}

fn validate_bulk_ids(ids: &[DbId]) -> Result<(), CoreError> {
    if ids.is_empty() || ids.len() > MAX_BULK_IDS {
        return Err(CoreError::Validation(format!(
            "ids must contain between 1 and {MAX_BULK_IDS} entries, got {}",
            ids.len()
        )));
    }
    Ok(())
}
