//! User and profile models, DTOs, and the shapes returned by the account
//! and admin user endpoints.

use nachbar_core::activity::DEFAULT_DISPLAY_NAME;
use nachbar_core::pagination::Keyed;
use nachbar_core::roles::UserRole;
use nachbar_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Full user row from the `users` table.
///
/// Contains the password hash -- NEVER serialize this to API responses directly.
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: DbId,
    pub email: String,
    pub password_hash: String,
    #[sqlx(try_from = "String")]
    pub role: UserRole,
    pub is_banned: bool,
    pub banned_at: Option<Timestamp>,
    pub ban_reason: Option<String>,
    pub last_active_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Account summary returned after signup.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountResponse {
    pub id: DbId,
    pub email: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl From<&User> for AccountResponse {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            email: user.email.clone(),
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

/// DTO for creating a new user. `email` must already be normalized.
#[derive(Debug)]
pub struct CreateUser {
    pub email: String,
    pub password_hash: String,
    pub display_name: Option<String>,
}

/// Role and ban state after a moderation change.
#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserModerationState {
    pub id: DbId,
    #[sqlx(try_from = "String")]
    pub role: UserRole,
    pub is_banned: bool,
    pub banned_at: Option<Timestamp>,
    pub ban_reason: Option<String>,
}

// ---------------------------------------------------------------------------
// Profile
// ---------------------------------------------------------------------------

/// Editable profile fields from `user_profiles`.
#[derive(Debug, Clone, Default, PartialEq, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub display_name: Option<String>,
    pub plz: Option<String>,
    pub avatar_url: Option<String>,
    pub bio: Option<String>,
}

/// DTO for upserting a profile. Only non-`None` fields are written.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProfile {
    pub display_name: Option<String>,
    pub plz: Option<String>,
    pub avatar_url: Option<String>,
    pub bio: Option<String>,
}

impl UpdateProfile {
    pub fn is_empty(&self) -> bool {
        self.display_name.is_none()
            && self.plz.is_none()
            && self.avatar_url.is_none()
            && self.bio.is_none()
    }
}

/// How much of the profile has been filled in.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileCompletion {
    pub is_complete: bool,
    pub percent: u8,
    pub missing: Vec<&'static str>,
}

impl ProfileCompletion {
    const TRACKED_FIELDS: usize = 4;

    /// The default display name counts as missing.
    pub fn of(profile: Option<&UserProfile>) -> Self {
        fn blank(value: Option<&String>) -> bool {
            value.map(|v| v.trim().is_empty()).unwrap_or(true)
        }

        let mut missing = Vec::new();

        let display_name = profile.and_then(|p| p.display_name.as_ref());
        if blank(display_name)
            || display_name.map(|d| d.trim()) == Some(DEFAULT_DISPLAY_NAME)
        {
            missing.push("displayName");
        }
        if blank(profile.and_then(|p| p.plz.as_ref())) {
            missing.push("plz");
        }
        if blank(profile.and_then(|p| p.avatar_url.as_ref())) {
            missing.push("avatarUrl");
        }
        if blank(profile.and_then(|p| p.bio.as_ref())) {
            missing.push("bio");
        }

        let done = Self::TRACKED_FIELDS - missing.len();
        let percent = ((done as f64 / Self::TRACKED_FIELDS as f64) * 100.0).round() as u8;

        Self {
            is_complete: missing.is_empty(),
            percent,
            missing,
        }
    }
}

/// Response body for `GET /users/me`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MeResponse {
    pub id: DbId,
    pub email: String,
    pub profile: Option<UserProfile>,
    pub profile_completion: ProfileCompletion,
}

impl MeResponse {
    pub fn new(user: &User, profile: Option<UserProfile>) -> Self {
        let profile_completion = ProfileCompletion::of(profile.as_ref());
        Self {
            id: user.id,
            email: user.email.clone(),
            profile,
            profile_completion,
        }
    }
}

// ---------------------------------------------------------------------------
// Admin listing
// ---------------------------------------------------------------------------

/// Row of the admin user listing (users LEFT JOIN user_profiles).
#[derive(Debug, Clone, FromRow)]
pub struct AdminUserRow {
    pub id: DbId,
    pub email: String,
    #[sqlx(try_from = "String")]
    pub role: UserRole,
    pub is_banned: bool,
    pub banned_at: Option<Timestamp>,
    pub ban_reason: Option<String>,
    pub last_active_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub has_profile: bool,
    pub display_name: Option<String>,
    pub plz: Option<String>,
}

impl Keyed for AdminUserRow {
    fn key_id(&self) -> DbId {
        self.id
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileSummary {
    pub display_name: Option<String>,
    pub plz: Option<String>,
}

/// Item of `GET /admin/users`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminUserItem {
    pub id: DbId,
    pub email: String,
    pub role: UserRole,
    pub is_banned: bool,
    pub banned_at: Option<Timestamp>,
    pub ban_reason: Option<String>,
    pub last_active_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub profile: Option<ProfileSummary>,
}

impl From<AdminUserRow> for AdminUserItem {
    fn from(row: AdminUserRow) -> Self {
        let profile = row.has_profile.then(|| ProfileSummary {
            display_name: row.display_name,
            plz: row.plz,
        });
        Self {
            id: row.id,
            email: row.email,
            role: row.role,
            is_banned: row.is_banned,
            banned_at: row.banned_at,
            ban_reason: row.ban_reason,
            last_active_at: row.last_active_at,
            created_at: row.created_at,
            profile,
        }
    }
}
