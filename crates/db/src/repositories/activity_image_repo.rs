//! Repository for the `activity_images` table.

use nachbar_core::types::DbId;
use sqlx::PgPool;

use crate::models::activity::ActivityImage;

const COLUMNS: &str = "id, activity_id, url, sort_order, alt, created_at";

pub struct ActivityImageRepo;

impl ActivityImageRepo {
    /// Images of one activity in display order.
    pub async fn list_for_activity(
        pool: &PgPool,
        activity_id: DbId,
    ) -> Result<Vec<ActivityImage>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM activity_images \
             WHERE activity_id = $1 ORDER BY sort_order ASC, id ASC"
        );
        sqlx::query_as::<_, ActivityImage>(&query)
            .bind(activity_id)
            .fetch_all(pool)
            .await
    }

    /// Replace all images of an activity within an existing transaction.
    ///
    /// `sort_order` follows the position in `urls`; every image gets `alt`.
    pub(crate) async fn replace_inner(
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
        activity_id: DbId,
        urls: &[String],
        alt: &str,
    ) -> Result<(), sqlx::Error> {
        sqlx::query("DELETE FROM activity_images WHERE activity_id = $1")
            .bind(activity_id)
            .execute(&mut **tx)
            .await?;

        for (idx, url) in urls.iter().enumerate() {
            sqlx::query(
                "INSERT INTO activity_images (activity_id, url, sort_order, alt) \
                 VALUES ($1, $2, $3, $4)",
            )
            .bind(activity_id)
            .bind(url)
            .bind(idx as i32)
            .bind(alt)
            .execute(&mut **tx)
            .await?;
        }

        Ok(())
    }
}
