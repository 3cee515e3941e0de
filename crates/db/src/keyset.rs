//! SQL implementation of [`KeysetSource`].
//!
//! [`KeysetQuery`] is the one listing query behind every paginated
//! endpoint. It appends the rendered [`FilterSet`], an optional cursor seek
//! and the fixed `created_at DESC, id DESC` order to a caller-supplied
//! `SELECT ... FROM <table> <alias> ...` prefix:
//!
//! ```text
//! <select> WHERE <filter>
//!     [AND (alias.created_at, alias.id) < (SELECT created_at, id FROM table WHERE id = $c)]
//! ORDER BY alias.created_at DESC, alias.id DESC
//! LIMIT $l
//! ```
//!
//! The cursor row is looked up without the filter, so a cursor stays valid
//! even if its own row no longer matches. An unknown cursor makes the row
//! comparison `NULL`, which yields an empty page.

use std::marker::PhantomData;

use async_trait::async_trait;
use nachbar_core::filter::{BindValue, FilterSet};
use nachbar_core::pagination::{paginate, Keyed, KeysetSource, Page};
use nachbar_core::types::DbId;
use sqlx::postgres::{PgArguments, PgRow};
use sqlx::query::QueryAs;
use sqlx::{FromRow, PgPool, Postgres};

/// A filtered keyset listing over one table.
pub struct KeysetQuery<'a, R> {
    pool: &'a PgPool,
    select: &'static str,
    table: &'static str,
    alias: &'static str,
    filter: FilterSet,
    _row: PhantomData<fn() -> R>,
}

impl<'a, R> KeysetQuery<'a, R> {
    /// `select` must end with the `FROM` clause (joins allowed) and alias
    /// `table` as `alias`.
    pub fn new(
        pool: &'a PgPool,
        select: &'static str,
        table: &'static str,
        alias: &'static str,
    ) -> Self {
        Self {
            pool,
            select,
            table,
            alias,
            filter: FilterSet::new(),
            _row: PhantomData,
        }
    }

    pub fn filter(mut self, filter: FilterSet) -> Self {
        self.filter = filter;
        self
    }
}

impl<'a, R> KeysetQuery<'a, R>
where
    R: for<'r> FromRow<'r, PgRow> + Keyed + Send + Unpin,
{
    /// Fetch one page.
    pub async fn page(&self, take: Option<i64>, cursor: Option<DbId>) -> Result<Page<R>, sqlx::Error> {
        paginate(self, take, cursor).await
    }
}

#[async_trait]
impl<'a, R> KeysetSource for KeysetQuery<'a, R>
where
    R: for<'r> FromRow<'r, PgRow> + Keyed + Send + Unpin,
{
    type Row = R;
    type Error = sqlx::Error;

    async fn fetch(&self, cursor: Option<DbId>, limit: i64) -> Result<Vec<R>, sqlx::Error> {
        let (sql, binds) = render_keyset_sql(
            self.select,
            self.table,
            self.alias,
            &self.filter,
            cursor.is_some(),
        );
        tracing::debug!(table = self.table, ?cursor, limit, "keyset fetch");

        let mut q = bind_values(sqlx::query_as::<_, R>(&sql), &binds);
        if let Some(cursor) = cursor {
            q = q.bind(cursor);
        }
        q.bind(limit).fetch_all(self.pool).await
    }
}

/// Render the full statement. Returns the SQL and the filter binds; the
/// cursor (if any) and the limit follow them positionally.
fn render_keyset_sql(
    select: &str,
    table: &str,
    alias: &str,
    filter: &FilterSet,
    with_cursor: bool,
) -> (String, Vec<BindValue>) {
    let predicate = filter.to_sql(1);
    let mut bind_idx = predicate.next_bind;

    let mut sql = format!("{select} WHERE {}", predicate.sql);
    if with_cursor {
        sql.push_str(&format!(
            " AND ({alias}.created_at, {alias}.id) < \
             (SELECT cur.created_at, cur.id FROM {table} cur WHERE cur.id = ${bind_idx})"
        ));
        bind_idx += 1;
    }
    sql.push_str(&format!(
        " ORDER BY {alias}.created_at DESC, {alias}.id DESC LIMIT ${bind_idx}"
    ));

    (sql, predicate.binds)
}

/// Bind a slice of [`BindValue`] to a sqlx `QueryAs`.
pub(crate) fn bind_values<'q, O>(
    mut q: QueryAs<'q, Postgres, O, PgArguments>,
    bind_values: &'q [BindValue],
) -> QueryAs<'q, Postgres, O, PgArguments> {
    for val in bind_values {
        match val {
            BindValue::Text(v) => q = q.bind(v.as_str()),
            BindValue::Uuid(v) => q = q.bind(*v),
            BindValue::Bool(v) => q = q.bind(*v),
            BindValue::Timestamp(v) => q = q.bind(*v),
        }
    }
    q
}
