//! Repository for the `user_profiles` table.

use nachbar_core::types::{DbId, Timestamp};
use sqlx::PgPool;

use crate::models::user::{UpdateProfile, UserProfile};

const COLUMNS: &str = "display_name, plz, avatar_url, bio";

pub struct ProfileRepo;

impl ProfileRepo {
    pub async fn find_by_user(
        pool: &PgPool,
        user_id: DbId,
    ) -> Result<Option<UserProfile>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM user_profiles WHERE user_id = $1");
        sqlx::query_as::<_, UserProfile>(&query)
            .bind(user_id)
            .fetch_optional(pool)
            .await
    }

    /// Insert or update the profile. Only non-`None` fields are written.
    pub async fn upsert(
        pool: &PgPool,
        user_id: DbId,
        input: &UpdateProfile,
    ) -> Result<UserProfile, sqlx::Error> {
        let query = format!(
            "INSERT INTO user_profiles (user_id, display_name, plz, avatar_url, bio)
             VALUES ($1, $2, $3, $4, $5)
             ON CONFLICT (user_id) DO UPDATE SET
                display_name = COALESCE(EXCLUDED.display_name, user_profiles.display_name),
                plz = COALESCE(EXCLUDED.plz, user_profiles.plz),
                avatar_url = COALESCE(EXCLUDED.avatar_url, user_profiles.avatar_url),
                bio = COALESCE(EXCLUDED.bio, user_profiles.bio)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, UserProfile>(&query)
            .bind(user_id)
            .bind(&input.display_name)
            .bind(&input.plz)
            .bind(&input.avatar_url)
            .bind(&input.bio)
            .fetch_one(pool)
            .await
    }

    /// Count profiles in `plz` whose user was active at or after `since`,
    /// optionally leaving one user out.
    pub async fn count_active_in_plz(
        pool: &PgPool,
        plz: &str,
        since: Timestamp,
        exclude_user: Option<DbId>,
    ) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*)::BIGINT
             FROM user_profiles p
             JOIN users u ON u.id = p.user_id
             WHERE p.plz = $1
               AND u.last_active_at >= $2
               AND ($3::UUID IS NULL OR p.user_id <> $3)",
        )
        .bind(plz)
        .bind(since)
        .bind(exclude_user)
        .fetch_one(pool)
        .await
    }
}
