//! Activity categories, the ACTIVE/ARCHIVED status machine, input limits,
//! and the presentation fallbacks shared by filtering and response shaping.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::types::Timestamp;
use crate::validation::{validate_length, validate_url};

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Minimum title length in characters.
pub const TITLE_MIN_LEN: usize = 3;

/// Maximum title length in characters.
pub const TITLE_MAX_LEN: usize = 120;

/// Maximum description length in characters.
pub const DESCRIPTION_MAX_LEN: usize = 2000;

/// Maximum number of image URLs attached to one activity.
pub const MAX_IMAGE_URLS: usize = 5;

/// Maximum number of ids accepted by a bulk status change.
pub const MAX_BULK_IDS: usize = 100;

/// Display name shown for creators whose profile has none.
pub const DEFAULT_DISPLAY_NAME: &str = "Neighbor";

/// Alt text for images added through an update without a new title.
pub const DEFAULT_IMAGE_ALT: &str = "Activity image";

// ---------------------------------------------------------------------------
// Category
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ActivityCategory {
    Outdoor,
    Sport,
    Social,
    Indoor,
    Help,
    Other,
}

const VALID_CATEGORY_STRINGS: &[&str] = &["OUTDOOR", "SPORT", "SOCIAL", "INDOOR", "HELP", "OTHER"];

impl ActivityCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Outdoor => "OUTDOOR",
            Self::Sport => "SPORT",
            Self::Social => "SOCIAL",
            Self::Indoor => "INDOOR",
            Self::Help => "HELP",
            Self::Other => "OTHER",
        }
    }

    pub fn parse(s: &str) -> Result<Self, CoreError> {
        match s {
            "OUTDOOR" => Ok(Self::Outdoor),
            "SPORT" => Ok(Self::Sport),
            "SOCIAL" => Ok(Self::Social),
            "INDOOR" => Ok(Self::Indoor),
            "HELP" => Ok(Self::Help),
            "OTHER" => Ok(Self::Other),
            _ => Err(CoreError::Validation(format!(
                "Invalid category '{s}'. Must be one of: {}",
                VALID_CATEGORY_STRINGS.join(", ")
            ))),
        }
    }
}

impl TryFrom<String> for ActivityCategory {
    type Error = CoreError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

// ---------------------------------------------------------------------------
// Status machine
// ---------------------------------------------------------------------------

/// Lifecycle status. Archiving is the only form of deletion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ActivityStatus {
    Active,
    Archived,
}

/// Who is asking for a status change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusActor {
    Owner,
    Admin,
}

impl ActivityStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "ACTIVE",
            Self::Archived => "ARCHIVED",
        }
    }

    pub fn parse(s: &str) -> Result<Self, CoreError> {
        match s {
            "ACTIVE" => Ok(Self::Active),
            "ARCHIVED" => Ok(Self::Archived),
            _ => Err(CoreError::Validation(format!(
                "Invalid status '{s}'. Must be one of: ACTIVE, ARCHIVED"
            ))),
        }
    }

    /// Validate a status change and return the resulting status.
    ///
    /// `ACTIVE -> ARCHIVED` is open to owners and admins, `ARCHIVED -> ACTIVE`
    /// to admins only. Requesting the current status is a no-op.
    pub fn transition(self, to: Self, actor: StatusActor) -> Result<Self, CoreError> {
        if self == to {
            return Ok(to);
        }
        match (to, actor) {
            (Self::Archived, _) => Ok(Self::Archived),
            (Self::Active, StatusActor::Admin) => Ok(Self::Active),
            (Self::Active, StatusActor::Owner) => Err(CoreError::Forbidden(
                "Only administrators can restore archived activities".into(),
            )),
        }
    }
}

impl TryFrom<String> for ActivityStatus {
    type Error = CoreError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

// ---------------------------------------------------------------------------
// Presentation fallbacks
// ---------------------------------------------------------------------------

/// The time an activity "starts": the explicit schedule when set, else
/// the creation time. The date-range filter uses the same chain.
pub fn effective_start(scheduled_at: Option<Timestamp>, created_at: Timestamp) -> Timestamp {
    scheduled_at.unwrap_or(created_at)
}

/// Profile display name, falling back to [`DEFAULT_DISPLAY_NAME`] when the
/// profile has none or it is blank.
pub fn display_name_or_default(display_name: Option<&str>) -> String {
    match display_name.map(str::trim) {
        Some(name) if !name.is_empty() => name.to_string(),
        _ => DEFAULT_DISPLAY_NAME.to_string(),
    }
}

// ---------------------------------------------------------------------------
// Input validation
// ---------------------------------------------------------------------------

pub fn validate_title(title: &str) -> Result<(), CoreError> {
    validate_length("title", title, TITLE_MIN_LEN, TITLE_MAX_LEN)
}

pub fn validate_description(description: &str) -> Result<(), CoreError> {
    validate_length("description", description, 0, DESCRIPTION_MAX_LEN)
}

/// At most [`MAX_IMAGE_URLS`] entries, each a well-formed URL.
pub fn validate_image_urls(urls: &[String]) -> Result<(), CoreError> {
    if urls.len() > MAX_IMAGE_URLS {
        return Err(CoreError::Validation(format!(
            "imageUrls may contain at most {MAX_IMAGE_URLS} entries, got {}",
            urls.len()
        )));
    }
    for url in urls {
        validate_url("imageUrls", url)?;
    }
    Ok(())
}
