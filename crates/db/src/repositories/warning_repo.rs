//! Repository for the `user_warnings` table.

use nachbar_core::filter::FilterSet;
use nachbar_core::pagination::Page;
use nachbar_core::types::DbId;
use sqlx::PgPool;

use crate::keyset::KeysetQuery;
use crate::models::warning::{CreateWarning, UserWarning, WarningRow};

const COLUMNS: &str = "id, user_id, message, severity, expires_at, created_by_admin_id, created_at";

const LIST_SELECT: &str = "\
    SELECT w.id, w.user_id, w.message, w.severity, w.expires_at, w.created_at, \
           w.created_by_admin_id, p.display_name AS admin_display_name \
    FROM user_warnings w \
    LEFT JOIN user_profiles p ON p.user_id = w.created_by_admin_id";

pub struct WarningRepo;

impl WarningRepo {
    pub async fn create(pool: &PgPool, input: &CreateWarning) -> Result<UserWarning, sqlx::Error> {
        let query = format!(
            "INSERT INTO user_warnings (user_id, message, severity, expires_at, created_by_admin_id)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, UserWarning>(&query)
            .bind(input.user_id)
            .bind(&input.message)
            .bind(input.severity.as_str())
            .bind(input.expires_at)
            .bind(input.created_by_admin_id)
            .fetch_one(pool)
            .await
    }

    /// One page of a user's warnings, newest first.
    pub async fn list_for_user(
        pool: &PgPool,
        user_id: DbId,
        take: Option<i64>,
        cursor: Option<DbId>,
    ) -> Result<Page<WarningRow>, sqlx::Error> {
        KeysetQuery::new(pool, LIST_SELECT, "user_warnings", "w")
            .filter(FilterSet::new().eq("w.user_id", Some(user_id)))
            .page(take, cursor)
            .await
    }
}
