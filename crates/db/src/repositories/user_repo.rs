//! Repository for the `users` table.

use nachbar_core::filter::FilterSet;
use nachbar_core::pagination::Page;
use nachbar_core::roles::UserRole;
use nachbar_core::types::DbId;
use sqlx::PgPool;

use crate::keyset::KeysetQuery;
use crate::models::user::{AdminUserRow, CreateUser, User, UserModerationState};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, email, password_hash, role, is_banned, banned_at, ban_reason, \
                        last_active_at, created_at, updated_at";

const MODERATION_COLUMNS: &str = "id, role, is_banned, banned_at, ban_reason";

/// Admin listing: users joined with their (optional) profile.
const ADMIN_LIST_SELECT: &str = "\
    SELECT u.id, u.email, u.role, u.is_banned, u.banned_at, u.ban_reason, \
           u.last_active_at, u.created_at, \
           (p.user_id IS NOT NULL) AS has_profile, p.display_name, p.plz \
    FROM users u \
    LEFT JOIN user_profiles p ON p.user_id = u.id";

/// Text columns searched by the admin `q` filter.
const ADMIN_SEARCH_COLUMNS: &[&str] = &["u.email", "p.display_name"];

/// Filters accepted by the admin user listing.
#[derive(Debug, Clone, Default)]
pub struct AdminUserListQuery {
    pub q: Option<String>,
    pub role: Option<UserRole>,
    pub is_banned: Option<bool>,
}

/// Provides CRUD operations for users.
pub struct UserRepo;

impl UserRepo {
    /// Insert a new user together with its profile row, returning the user.
    ///
    /// A duplicate email fails with the `uq_users_email` constraint.
    pub async fn create(pool: &PgPool, input: &CreateUser) -> Result<User, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let query = format!(
            "INSERT INTO users (email, password_hash)
             VALUES ($1, $2)
             RETURNING {COLUMNS}"
        );
        let user = sqlx::query_as::<_, User>(&query)
            .bind(&input.email)
            .bind(&input.password_hash)
            .fetch_one(&mut *tx)
            .await?;

        sqlx::query("INSERT INTO user_profiles (user_id, display_name) VALUES ($1, $2)")
            .bind(user.id)
            .bind(&input.display_name)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(user)
    }

    /// Find a user by internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<User>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM users WHERE id = $1");
        sqlx::query_as::<_, User>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find a user by (normalized) email.
    pub async fn find_by_email(pool: &PgPool, email: &str) -> Result<Option<User>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM users WHERE email = $1");
        sqlx::query_as::<_, User>(&query)
            .bind(email)
            .fetch_optional(pool)
            .await
    }

    pub async fn exists(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        sqlx::query_scalar::<_, bool>("SELECT EXISTS (SELECT 1 FROM users WHERE id = $1)")
            .bind(id)
            .fetch_one(pool)
            .await
    }

    pub async fn count(pool: &PgPool) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*)::BIGINT FROM users")
            .fetch_one(pool)
            .await
    }

    /// Set `last_active_at` to now.
    pub async fn touch_last_active(pool: &PgPool, id: DbId) -> Result<(), sqlx::Error> {
        sqlx::query("UPDATE users SET last_active_at = NOW() WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(())
    }

    /// Change a user's role. Returns `None` if no such user exists.
    pub async fn set_role(
        pool: &PgPool,
        id: DbId,
        role: UserRole,
    ) -> Result<Option<UserModerationState>, sqlx::Error> {
        let query = format!("UPDATE users SET role = $2 WHERE id = $1 RETURNING {MODERATION_COLUMNS}");
        sqlx::query_as::<_, UserModerationState>(&query)
            .bind(id)
            .bind(role.as_str())
            .fetch_optional(pool)
            .await
    }

    /// Ban or unban a user. Banning stamps `banned_at` and stores the
    /// reason; unbanning clears both.
    ///
    /// Returns `None` if no such user exists.
    pub async fn set_ban(
        pool: &PgPool,
        id: DbId,
        is_banned: bool,
        reason: Option<&str>,
    ) -> Result<Option<UserModerationState>, sqlx::Error> {
        let query = format!(
            "UPDATE users SET
                is_banned = $2,
                banned_at = CASE WHEN $2 THEN NOW() ELSE NULL END,
                ban_reason = CASE WHEN $2 THEN $3 ELSE NULL END
             WHERE id = $1
             RETURNING {MODERATION_COLUMNS}"
        );
        sqlx::query_as::<_, UserModerationState>(&query)
            .bind(id)
            .bind(is_banned)
            .bind(reason)
            .fetch_optional(pool)
            .await
    }

    /// One page of the admin user listing, newest first.
    pub async fn list_admin(
        pool: &PgPool,
        params: &AdminUserListQuery,
        take: Option<i64>,
        cursor: Option<DbId>,
    ) -> Result<Page<AdminUserRow>, sqlx::Error> {
        let filter = FilterSet::new()
            .eq("u.is_banned", params.is_banned)
            .eq("u.role", params.role)
            .contains_any(ADMIN_SEARCH_COLUMNS, params.q.as_deref());

        KeysetQuery::new(pool, ADMIN_LIST_SELECT, "users", "u")
            .filter(filter)
            .page(take, cursor)
            .await
    }
}
