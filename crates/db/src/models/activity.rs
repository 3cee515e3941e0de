//! Activity models, DTOs, and the card/detail response shapes.
//!
//! Listing and detail queries both read [`ActivityView`], a denormalized
//! row joining the creator's email and display name plus the thumbnail
//! (the image with the lowest `sort_order`). Public and admin responses are
//! shaped from it with the fallbacks in `nachbar_core::activity`.

use nachbar_core::activity::{
    display_name_or_default, effective_start, ActivityCategory, ActivityStatus,
};
use nachbar_core::pagination::Keyed;
use nachbar_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// Plain row from the `activities` table.
#[derive(Debug, Clone, FromRow)]
pub struct Activity {
    pub id: DbId,
    pub title: String,
    pub description: Option<String>,
    #[sqlx(try_from = "String")]
    pub category: ActivityCategory,
    #[sqlx(try_from = "String")]
    pub status: ActivityStatus,
    pub plz: String,
    pub scheduled_at: Option<Timestamp>,
    pub created_by_id: DbId,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating an activity. New activities are always `ACTIVE`.
#[derive(Debug, Clone)]
pub struct CreateActivity {
    pub title: String,
    pub description: Option<String>,
    pub category: ActivityCategory,
    pub plz: String,
    pub scheduled_at: Option<Timestamp>,
    pub created_by_id: DbId,
    pub image_urls: Vec<String>,
}

/// DTO for editing an activity. Only non-`None` fields are applied.
#[derive(Debug, Clone, Default)]
pub struct UpdateActivity {
    pub title: Option<String>,
    pub description: Option<String>,
    pub category: Option<ActivityCategory>,
    pub plz: Option<String>,
    pub scheduled_at: Option<Timestamp>,
}

impl UpdateActivity {
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.category.is_none()
            && self.plz.is_none()
            && self.scheduled_at.is_none()
    }
}

/// Filters accepted by the activity listings. Every field is optional and
/// independent.
#[derive(Debug, Clone, Default)]
pub struct ActivityListQuery {
    pub q: Option<String>,
    pub category: Option<ActivityCategory>,
    pub status: Option<ActivityStatus>,
    pub plz: Option<String>,
    pub created_by_id: Option<DbId>,
    pub start_from: Option<Timestamp>,
    pub start_to: Option<Timestamp>,
}

// ---------------------------------------------------------------------------
// Images
// ---------------------------------------------------------------------------

/// Row from the `activity_images` table.
#[derive(Debug, Clone, FromRow)]
pub struct ActivityImage {
    pub id: DbId,
    pub activity_id: DbId,
    pub url: String,
    pub sort_order: i32,
    pub alt: Option<String>,
    pub created_at: Timestamp,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageResponse {
    pub url: String,
    pub sort_order: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alt: Option<String>,
}

impl From<ActivityImage> for ImageResponse {
    fn from(image: ActivityImage) -> Self {
        Self {
            url: image.url,
            sort_order: image.sort_order,
            alt: image.alt,
        }
    }
}

// ---------------------------------------------------------------------------
// Denormalized view
// ---------------------------------------------------------------------------

/// Activity joined with creator info and thumbnail.
#[derive(Debug, Clone, FromRow)]
pub struct ActivityView {
    pub id: DbId,
    pub title: String,
    pub description: Option<String>,
    #[sqlx(try_from = "String")]
    pub category: ActivityCategory,
    #[sqlx(try_from = "String")]
    pub status: ActivityStatus,
    pub plz: String,
    pub scheduled_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
    pub created_by_id: DbId,
    pub creator_email: String,
    pub creator_display_name: Option<String>,
    pub thumbnail_url: Option<String>,
}

impl Keyed for ActivityView {
    fn key_id(&self) -> DbId {
        self.id
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatorSummary {
    pub id: DbId,
    pub display_name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminCreatorSummary {
    pub id: DbId,
    pub email: String,
    pub display_name: String,
}

/// Item of the public feed.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityCard {
    pub id: DbId,
    pub title: String,
    pub category: ActivityCategory,
    pub start_at: Timestamp,
    pub plz: String,
    pub created_by: CreatorSummary,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
    pub thumbnail_url: Option<String>,
}

impl From<ActivityView> for ActivityCard {
    fn from(v: ActivityView) -> Self {
        Self {
            id: v.id,
            title: v.title,
            category: v.category,
            start_at: effective_start(v.scheduled_at, v.created_at),
            plz: v.plz,
            created_by: CreatorSummary {
                id: v.created_by_id,
                display_name: display_name_or_default(v.creator_display_name.as_deref()),
            },
            created_at: v.created_at,
            updated_at: v.updated_at,
            thumbnail_url: v.thumbnail_url,
        }
    }
}

/// Public detail: the card plus description and every image.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityDetail {
    #[serde(flatten)]
    pub card: ActivityCard,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub images: Vec<ImageResponse>,
}

impl ActivityDetail {
    pub fn new(mut view: ActivityView, images: Vec<ActivityImage>) -> Self {
        let description = view.description.take();
        Self {
            card: ActivityCard::from(view),
            description,
            images: images.into_iter().map(ImageResponse::from).collect(),
        }
    }
}

/// Item of the admin listing. Unlike the public card it carries the status
/// and the creator's email.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminActivityCard {
    pub id: DbId,
    pub title: String,
    pub category: ActivityCategory,
    pub status: ActivityStatus,
    pub plz: String,
    pub start_at: Timestamp,
    pub created_by: AdminCreatorSummary,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
    pub thumbnail_url: Option<String>,
}

impl From<ActivityView> for AdminActivityCard {
    fn from(v: ActivityView) -> Self {
        Self {
            id: v.id,
            title: v.title,
            category: v.category,
            status: v.status,
            plz: v.plz,
            start_at: effective_start(v.scheduled_at, v.created_at),
            created_by: AdminCreatorSummary {
                id: v.created_by_id,
                email: v.creator_email,
                display_name: display_name_or_default(v.creator_display_name.as_deref()),
            },
            created_at: v.created_at,
            updated_at: v.updated_at,
            thumbnail_url: v.thumbnail_url,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminActivityDetail {
    #[serde(flatten)]
    pub card: AdminActivityCard,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub images: Vec<ImageResponse>,
}

impl AdminActivityDetail {
    pub fn new(mut view: ActivityView, images: Vec<ActivityImage>) -> Self {
        let description = view.description.take();
        Self {
            card: AdminActivityCard::from(view),
            description,
            images: images.into_iter().map(ImageResponse::from).collect(),
        }
    }
}

/// Status after a single admin status change.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusResponse {
    pub id: DbId,
    pub status: ActivityStatus,
}
