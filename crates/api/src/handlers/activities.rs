//! Handlers for the public `/activities` resource.
//!
//! Reads are public and only ever see `ACTIVE` activities. Writes require
//! authentication and, for existing activities, ownership.

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::Json;
use nachbar_core::activity::{
    validate_description, validate_image_urls, validate_title, ActivityCategory, ActivityStatus,
    StatusActor, DEFAULT_IMAGE_ALT,
};
use nachbar_core::error::CoreError;
use nachbar_core::pagination::Page;
use nachbar_core::types::{DbId, Timestamp};
use nachbar_core::validation::{parse_datetime_param, parse_optional, parse_uuid_param, validate_plz};
use nachbar_db::models::activity::{
    Activity, ActivityCard, ActivityDetail, ActivityListQuery, CreateActivity, UpdateActivity,
};
use nachbar_db::repositories::{ActivityImageRepo, ActivityRepo};
use serde::Deserialize;

use crate::error::{AppError, AppResult};
use crate::extract::{ApiJson, ApiPath};
use crate::handlers::{ok, OkResponse};
use crate::middleware::auth::AuthUser;
use crate::query::{parse_cursor, parse_take};
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request types
// ---------------------------------------------------------------------------

/// Query parameters for `GET /activities`. Everything arrives as a string
/// and is validated before any filter is built.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListActivitiesParams {
    pub take: Option<String>,
    pub cursor: Option<String>,
    pub q: Option<String>,
    pub category: Option<String>,
    pub plz: Option<String>,
    pub created_by_id: Option<String>,
    pub start_from: Option<String>,
    pub start_to: Option<String>,
}

/// Request body for `POST /activities`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateActivityRequest {
    pub title: String,
    pub description: Option<String>,
    pub category: String,
    pub plz: String,
    pub start_at: Option<String>,
    pub image_urls: Option<Vec<String>>,
}

/// Request body for `PATCH /activities/{id}`.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateActivityRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub category: Option<String>,
    pub plz: Option<String>,
    pub start_at: Option<String>,
    pub image_urls: Option<Vec<String>>,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// GET /api/v1/activities
///
/// Public feed of `ACTIVE` activities, newest first.
pub async fn list_activities(
    State(state): State<AppState>,
    Query(params): Query<ListActivitiesParams>,
) -> AppResult<Json<Page<ActivityCard>>> {
    let take = parse_take(params.take.as_deref())?;
    let cursor = parse_cursor(params.cursor.as_deref())?;

    let query = ActivityListQuery {
        q: params.q,
        category: parse_category(params.category.as_deref())?,
        status: Some(ActivityStatus::Active),
        plz: parse_plz(params.plz.as_deref())?,
        created_by_id: parse_optional(params.created_by_id.as_deref(), |v| {
            parse_uuid_param("createdById", v)
        })?,
        start_from: parse_timestamp("startFrom", params.start_from.as_deref())?,
        start_to: parse_timestamp("startTo", params.start_to.as_deref())?,
    };

    let page = ActivityRepo::list(&state.pool, &query, take, cursor).await?;
    Ok(Json(page.map(ActivityCard::from)))
}

/// GET /api/v1/activities/{id}
pub async fn get_activity(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<DbId>,
) -> AppResult<Json<ActivityDetail>> {
    let detail = load_detail(&state, id, Some(ActivityStatus::Active)).await?;
    Ok(Json(detail))
}

/// POST /api/v1/activities
///
/// Create an activity owned by the caller. Returns 201 with the detail.
pub async fn create_activity(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiJson(input): ApiJson<CreateActivityRequest>,
) -> AppResult<(StatusCode, Json<ActivityDetail>)> {
    let title = input.title.trim().to_string();
    validate_title(&title)?;
    let description = trim_optional(input.description);
    if let Some(description) = &description {
        validate_description(description)?;
    }
    let category = ActivityCategory::parse(&input.category)?;
    validate_plz(&input.plz)?;
    let scheduled_at = parse_timestamp("startAt", input.start_at.as_deref())?;
    let image_urls = input.image_urls.unwrap_or_default();
    validate_image_urls(&image_urls)?;

    let activity = ActivityRepo::create(
        &state.pool,
        &CreateActivity {
            title,
            description,
            category,
            plz: input.plz,
            scheduled_at,
            created_by_id: auth.user_id,
            image_urls,
        },
    )
    .await?;

    tracing::info!(activity_id = %activity.id, user_id = %auth.user_id, "Activity created");

    let detail = load_detail(&state, activity.id, None).await?;
    Ok((StatusCode::CREATED, Json(detail)))
}

/// PATCH /api/v1/activities/{id}
///
/// Partial update by the owner. When `imageUrls` is present the image set
/// is replaced wholesale (an empty list removes every image).
pub async fn update_activity(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiPath(id): ApiPath<DbId>,
    ApiJson(input): ApiJson<UpdateActivityRequest>,
) -> AppResult<Json<ActivityDetail>> {
    load_owned_active(&state, id, &auth).await?;

    let update = UpdateActivity {
        title: trim_optional(input.title),
        description: trim_optional(input.description),
        category: parse_category(input.category.as_deref())?,
        plz: input.plz,
        scheduled_at: parse_timestamp("startAt", input.start_at.as_deref())?,
    };
    validate_update(&update)?;
    if let Some(urls) = &input.image_urls {
        validate_image_urls(urls)?;
    }

    ActivityRepo::update(
        &state.pool,
        id,
        &update,
        input.image_urls.as_deref(),
        DEFAULT_IMAGE_ALT,
    )
    .await?
    .ok_or_else(|| activity_not_found(id))?;

    tracing::debug!(activity_id = %id, user_id = %auth.user_id, "Activity updated");

    let detail = load_detail(&state, id, None).await?;
    Ok(Json(detail))
}

/// DELETE /api/v1/activities/{id}
///
/// Archive the caller's activity. Archived activities disappear from every
/// public read but stay in the database.
pub async fn archive_activity(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiPath(id): ApiPath<DbId>,
) -> AppResult<Json<OkResponse>> {
    let activity = load_owned_active(&state, id, &auth).await?;
    let next = activity
        .status
        .transition(ActivityStatus::Archived, StatusActor::Owner)?;

    ActivityRepo::set_status(&state.pool, id, next)
        .await?
        .ok_or_else(|| activity_not_found(id))?;

    tracing::info!(activity_id = %id, user_id = %auth.user_id, "Activity archived by owner");

    Ok(ok())
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

pub(crate) fn activity_not_found(id: DbId) -> AppError {
    AppError::Core(CoreError::NotFound {
        entity: "Activity",
        id,
    })
}

/// Load the view and images of an activity, optionally requiring a status.
pub(crate) async fn load_detail(
    state: &AppState,
    id: DbId,
    status: Option<ActivityStatus>,
) -> AppResult<ActivityDetail> {
    let view = ActivityRepo::find_view(&state.pool, id, status)
        .await?
        .ok_or_else(|| activity_not_found(id))?;
    let images = ActivityImageRepo::list_for_activity(&state.pool, id).await?;
    Ok(ActivityDetail::new(view, images))
}

/// An `ACTIVE` activity owned by the caller. Anything else that is not
/// `ACTIVE` is reported as missing; a foreign activity is forbidden.
async fn load_owned_active(state: &AppState, id: DbId, auth: &AuthUser) -> AppResult<Activity> {
    let activity = ActivityRepo::find_by_id(&state.pool, id)
        .await?
        .filter(|a| a.status == ActivityStatus::Active)
        .ok_or_else(|| activity_not_found(id))?;

    if activity.created_by_id != auth.user_id {
        return Err(AppError::Core(CoreError::Forbidden("Not owner".into())));
    }
    Ok(activity)
}

/// Validate every field present in an update.
pub(crate) fn validate_update(update: &UpdateActivity) -> Result<(), CoreError> {
    if let Some(title) = &update.title {
        validate_title(title)?;
    }
    if let Some(description) = &update.description {
        validate_description(description)?;
    }
    if let Some(plz) = &update.plz {
        validate_plz(plz)?;
    }
    Ok(())
}

pub(crate) fn parse_category(value: Option<&str>) -> Result<Option<ActivityCategory>, CoreError> {
    parse_optional(value, ActivityCategory::parse)
}

pub(crate) fn parse_plz(value: Option<&str>) -> Result<Option<String>, CoreError> {
    parse_optional(value, |v| validate_plz(v).map(|()| v.to_string()))
}

pub(crate) fn parse_timestamp(
    field: &'static str,
    value: Option<&str>,
) -> Result<Option<Timestamp>, CoreError> {
    parse_optional(value, |v| parse_datetime_param(field, v))
}

fn trim_optional(value: Option<String>) -> Option<String> {
    value.map(|v| v.trim().to_string())
}
