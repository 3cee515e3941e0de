//! Repository for the `activities` table.
//!
//! Activities are never deleted; archiving is a status change.

use nachbar_core::activity::ActivityStatus;
use nachbar_core::filter::FilterSet;
use nachbar_core::pagination::Page;
use nachbar_core::types::DbId;
use sqlx::PgPool;

use crate::keyset::KeysetQuery;
use crate::models::activity::{
    Activity, ActivityListQuery, ActivityView, CreateActivity, UpdateActivity,
};
use crate::repositories::ActivityImageRepo;

const COLUMNS: &str = "id, title, description, category, status, plz, scheduled_at, \
                        created_by_id, created_at, updated_at";

/// Activity joined with creator email, display name and thumbnail.
const VIEW_SELECT: &str = "\
    SELECT a.id, a.title, a.description, a.category, a.status, a.plz, \
           a.scheduled_at, a.created_at, a.updated_at, a.created_by_id, \
           u.email AS creator_email, p.display_name AS creator_display_name, \
           (SELECT i.url FROM activity_images i WHERE i.activity_id = a.id \
            ORDER BY i.sort_order ASC, i.id ASC LIMIT 1) AS thumbnail_url \
    FROM activities a \
    JOIN users u ON u.id = a.created_by_id \
    LEFT JOIN user_profiles p ON p.user_id = a.created_by_id";

/// Text columns searched by the `q` filter.
const SEARCH_COLUMNS: &[&str] = &["a.title", "a.description"];

pub struct ActivityRepo;

impl ActivityRepo {
    /// Insert an `ACTIVE` activity and its images in one transaction.
    ///
    /// Images take the title as alt text and their list position as
    /// `sort_order`.
    pub async fn create(pool: &PgPool, input: &CreateActivity) -> Result<Activity, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let query = format!(
            "INSERT INTO activities (title, description, category, status, plz, scheduled_at, created_by_id)
             VALUES ($1, $2, $3, $4, $5, $6, $7)
             RETURNING {COLUMNS}"
        );
        let activity = sqlx::query_as::<_, Activity>(&query)
            .bind(&input.title)
            .bind(&input.description)
            .bind(input.category.as_str())
            .bind(ActivityStatus::Active.as_str())
            .bind(&input.plz)
            .bind(input.scheduled_at)
            .bind(input.created_by_id)
            .fetch_one(&mut *tx)
            .await?;

        if !input.image_urls.is_empty() {
            ActivityImageRepo::replace_inner(&mut tx, activity.id, &input.image_urls, &input.title)
                .await?;
        }

        tx.commit().await?;
        Ok(activity)
    }

    /// Find an activity by ID regardless of status.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Activity>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM activities WHERE id = $1");
        sqlx::query_as::<_, Activity>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find the denormalized view of an activity, optionally requiring a
    /// status.
    pub async fn find_view(
        pool: &PgPool,
        id: DbId,
        status: Option<ActivityStatus>,
    ) -> Result<Option<ActivityView>, sqlx::Error> {
        let query = format!(
            "{VIEW_SELECT} WHERE a.id = $1 AND ($2::TEXT IS NULL OR a.status = $2)"
        );
        sqlx::query_as::<_, ActivityView>(&query)
            .bind(id)
            .bind(status.map(|s| s.as_str()))
            .fetch_optional(pool)
            .await
    }

    /// Apply a partial update and, when `image_urls` is given, replace the
    /// image set, all in one transaction.
    ///
    /// Replacement images take the new title as alt text, or `fallback_alt`
    /// when the title is unchanged. Returns `None` if no such activity exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateActivity,
        image_urls: Option<&[String]>,
        fallback_alt: &str,
    ) -> Result<Option<Activity>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let query = format!(
            "UPDATE activities SET
                title = COALESCE($2, title),
                description = COALESCE($3, description),
                category = COALESCE($4, category),
                plz = COALESCE($5, plz),
                scheduled_at = COALESCE($6, scheduled_at)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        let updated = sqlx::query_as::<_, Activity>(&query)
            .bind(id)
            .bind(&input.title)
            .bind(&input.description)
            .bind(input.category.map(|c| c.as_str()))
            .bind(&input.plz)
            .bind(input.scheduled_at)
            .fetch_optional(&mut *tx)
            .await?;

        let Some(updated) = updated else {
            return Ok(None);
        };

        if let Some(urls) = image_urls {
            let alt = input.title.as_deref().unwrap_or(fallback_alt);
            ActivityImageRepo::replace_inner(&mut tx, id, urls, alt).await?;
        }

        tx.commit().await?;
        Ok(Some(updated))
    }

    /// Set the status of one activity. Returns `None` if it does not exist.
    pub async fn set_status(
        pool: &PgPool,
        id: DbId,
        status: ActivityStatus,
    ) -> Result<Option<Activity>, sqlx::Error> {
        let query = format!("UPDATE activities SET status = $2 WHERE id = $1 RETURNING {COLUMNS}");
        sqlx::query_as::<_, Activity>(&query)
            .bind(id)
            .bind(status.as_str())
            .fetch_optional(pool)
            .await
    }

    /// Set the status of many activities. Unknown ids are skipped.
    ///
    /// Returns the number of rows updated.
    pub async fn bulk_set_status(
        pool: &PgPool,
        ids: &[DbId],
        status: ActivityStatus,
    ) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("UPDATE activities SET status = $2 WHERE id = ANY($1)")
            .bind(ids)
            .bind(status.as_str())
            .execute(pool)
            .await?;
        Ok(result.rows_affected())
    }

    /// One page of activities matching `params`, newest first.
    pub async fn list(
        pool: &PgPool,
        params: &ActivityListQuery,
        take: Option<i64>,
        cursor: Option<DbId>,
    ) -> Result<Page<ActivityView>, sqlx::Error> {
        KeysetQuery::new(pool, VIEW_SELECT, "activities", "a")
            .filter(build_activity_filter(params))
            .page(take, cursor)
            .await
    }
}

/// Translate listing parameters into a [`FilterSet`] over the view aliases.
fn build_activity_filter(params: &ActivityListQuery) -> FilterSet {
    FilterSet::new()
        .eq("a.status", params.status)
        .eq("a.plz", params.plz.as_deref())
        .eq("a.category", params.category)
        .eq("a.created_by_id", params.created_by_id)
        .contains_any(SEARCH_COLUMNS, params.q.as_deref())
        .effective_start_within(
            "a.scheduled_at",
            "a.created_at",
            params.start_from,
            params.start_to,
        )
}
