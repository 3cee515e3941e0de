//! Keyset (cursor) pagination engine.
//!
//! Every listing is ordered by `created_at DESC, id DESC`, a total order
//! because ids are unique. A page is fetched by probing for `take + 1` rows
//! strictly after the cursor: the extra row only signals that another page
//! exists and is never returned. The cursor handed back to clients is the
//! id of the last row on the page.
//!
//! Storage is abstracted behind [`KeysetSource`]; the SQL implementation
//! lives in `nachbar_db::keyset`.

use async_trait::async_trait;
use serde::Serialize;

use crate::types::DbId;

// ---------------------------------------------------------------------------
// Page size bounds
// ---------------------------------------------------------------------------

/// Page size used when the client does not send `take`.
pub const DEFAULT_TAKE: i64 = 20;

/// Smallest page size.
pub const MIN_TAKE: i64 = 1;

/// Largest page size. Larger requests are clamped, never honoured.
pub const MAX_TAKE: i64 = 50;

/// Clamp a client-supplied page size to `[MIN_TAKE, MAX_TAKE]`.
pub fn clamp_take(take: Option<i64>) -> i64 {
    take.unwrap_or(DEFAULT_TAKE).clamp(MIN_TAKE, MAX_TAKE)
}

// ---------------------------------------------------------------------------
// Traits
// ---------------------------------------------------------------------------

/// A row that can serve as a pagination cursor.
pub trait Keyed {
    fn key_id(&self) -> DbId;
}

/// A filtered, ordered collection that can be read in keyset order.
#[async_trait]
pub trait KeysetSource: Send + Sync {
    type Row: Keyed + Send;
    type Error: Send;

    /// Return at most `limit` rows in `(created_at DESC, id DESC)` order,
    /// starting strictly after the row identified by `cursor`.
    ///
    /// A cursor that matches no row yields no rows.
    async fn fetch(&self, cursor: Option<DbId>, limit: i64) -> Result<Vec<Self::Row>, Self::Error>;
}

// ---------------------------------------------------------------------------
// Page
// ---------------------------------------------------------------------------

/// One page of results. `next_cursor` is `None` exactly when no further
/// page exists.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    pub items: Vec<T>,
    pub next_cursor: Option<DbId>,
}

impl<T> Page<T> {
    pub fn empty() -> Self {
        Self {
            items: Vec::new(),
            next_cursor: None,
        }
    }

    pub fn has_more(&self) -> bool {
        self.next_cursor.is_some()
    }

    /// Shape every item, keeping the cursor.
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            next_cursor: self.next_cursor,
        }
    }
}

impl<T: Keyed> Page<T> {
    /// Build a page from a `take + 1` probe.
    pub fn from_probe(mut rows: Vec<T>, take: i64) -> Self {
        let take = usize::try_from(take).unwrap_or(0);
        let has_more = rows.len() > take;
        rows.truncate(take);

        let next_cursor = if has_more {
            rows.last().map(Keyed::key_id)
        } else {
            None
        };

        Self {
            items: rows,
            next_cursor,
        }
    }
}

/// Fetch one page from `source`.
///
/// `take` is clamped with [`clamp_take`]. Source errors propagate
/// unchanged; a partial page is never returned.
pub async fn paginate<S: KeysetSource>(
    source: &S,
    take: Option<i64>,
    cursor: Option<DbId>,
) -> Result<Page<S::Row>, S::Error> {
    let take = clamp_take(take);
    let rows = source.fetch(cursor, take + 1).await?;
    Ok(Page::from_probe(rows, take))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
