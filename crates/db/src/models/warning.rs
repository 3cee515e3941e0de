//! User warning models and the admin listing shape.

use nachbar_core::activity::display_name_or_default;
use nachbar_core::pagination::Keyed;
use nachbar_core::types::{DbId, Timestamp};
use nachbar_core::warning::WarningSeverity;
use serde::Serialize;
use sqlx::FromRow;

/// Row from the `user_warnings` table.
#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserWarning {
    pub id: DbId,
    pub user_id: DbId,
    pub message: String,
    #[sqlx(try_from = "String")]
    pub severity: WarningSeverity,
    pub expires_at: Option<Timestamp>,
    pub created_by_admin_id: DbId,
    pub created_at: Timestamp,
}

/// DTO for issuing a warning.
#[derive(Debug, Clone)]
pub struct CreateWarning {
    pub user_id: DbId,
    pub message: String,
    pub severity: WarningSeverity,
    pub expires_at: Option<Timestamp>,
    pub created_by_admin_id: DbId,
}

/// Warning joined with the issuing admin's display name.
#[derive(Debug, Clone, FromRow)]
pub struct WarningRow {
    pub id: DbId,
    pub user_id: DbId,
    pub message: String,
    #[sqlx(try_from = "String")]
    pub severity: WarningSeverity,
    pub expires_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub created_by_admin_id: DbId,
    pub admin_display_name: Option<String>,
}

impl Keyed for WarningRow {
    fn key_id(&self) -> DbId {
        self.id
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IssuedBy {
    pub id: DbId,
    pub display_name: String,
}

/// Item of `GET /admin/users/{id}/warnings`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WarningItem {
    pub id: DbId,
    pub user_id: DbId,
    pub message: String,
    pub severity: WarningSeverity,
    pub expires_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub created_by_admin: IssuedBy,
}

impl From<WarningRow> for WarningItem {
    fn from(row: WarningRow) -> Self {
        Self {
            id: row.id,
            user_id: row.user_id,
            message: row.message,
            severity: row.severity,
            expires_at: row.expires_at,
            created_at: row.created_at,
            created_by_admin: IssuedBy {
                id: row.created_by_admin_id,
                display_name: display_name_or_default(row.admin_display_name.as_deref()),
            },
        }
    }
}
