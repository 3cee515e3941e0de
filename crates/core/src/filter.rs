//! Filter clause builder for listing endpoints.
//!
//! A [`FilterSet`] collects optional, independently specified filters and
//! renders them into a single `AND`-combined SQL predicate with positional
//! (`$n`) placeholders plus the ordered values to bind. Clauses are only
//! added when their input is present, so an empty set renders as `TRUE`.
//!
//! Column names are `&'static str` supplied by repositories; client input
//! only ever reaches the query as bind values.

use crate::activity::{ActivityCategory, ActivityStatus};
use crate::roles::UserRole;
use crate::types::{DbId, Timestamp};
use crate::warning::WarningSeverity;

// ---------------------------------------------------------------------------
// Bind values
// ---------------------------------------------------------------------------

/// Typed value bound to a positional placeholder.
#[derive(Debug, Clone, PartialEq)]
pub enum BindValue {
    Text(String),
    Uuid(DbId),
    Bool(bool),
    Timestamp(Timestamp),
}

impl From<String> for BindValue {
    fn from(v: String) -> Self {
        Self::Text(v)
    }
}

impl From<&str> for BindValue {
    fn from(v: &str) -> Self {
        Self::Text(v.to_string())
    }
}

impl From<DbId> for BindValue {
    fn from(v: DbId) -> Self {
        Self::Uuid(v)
    }
}

impl From<bool> for BindValue {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

impl From<Timestamp> for BindValue {
    fn from(v: Timestamp) -> Self {
        Self::Timestamp(v)
    }
}

impl From<ActivityCategory> for BindValue {
    fn from(v: ActivityCategory) -> Self {
        Self::Text(v.as_str().to_string())
    }
}

impl From<ActivityStatus> for BindValue {
    fn from(v: ActivityStatus) -> Self {
        Self::Text(v.as_str().to_string())
    }
}

impl From<UserRole> for BindValue {
    fn from(v: UserRole) -> Self {
        Self::Text(v.as_str().to_string())
    }
}

impl From<WarningSeverity> for BindValue {
    fn from(v: WarningSeverity) -> Self {
        Self::Text(v.as_str().to_string())
    }
}

// ---------------------------------------------------------------------------
// Clauses
// ---------------------------------------------------------------------------

/// One conjunct of a [`FilterSet`].
#[derive(Debug, Clone, PartialEq)]
pub enum Clause {
    /// `column = value`
    Eq {
        column: &'static str,
        value: BindValue,
    },
    /// Case-insensitive substring match OR-ed across several text columns.
    ContainsAny {
        columns: &'static [&'static str],
        term: String,
    },
    /// Effective start (`scheduled` if set, else `created`) within an
    /// inclusive range. Either bound may be open.
    EffectiveStartWithin {
        scheduled: &'static str,
        created: &'static str,
        from: Option<Timestamp>,
        to: Option<Timestamp>,
    },
}

/// Rendered predicate ready to be spliced after `WHERE`.
#[derive(Debug, Clone, PartialEq)]
pub struct SqlPredicate {
    pub sql: String,
    pub binds: Vec<BindValue>,
    /// First placeholder index not used by this predicate.
    pub next_bind: u32,
}

/// Ordered, `AND`-combined set of filter clauses.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterSet {
    clauses: Vec<Clause>,
}

impl FilterSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `column = value` when `value` is present.
    pub fn eq<V: Into<BindValue>>(mut self, column: &'static str, value: Option<V>) -> Self {
        if let Some(value) = value {
            self.clauses.push(Clause::Eq {
                column,
                value: value.into(),
            });
        }
        self
    }

    /// Add a free-text match across `columns` when `term` is non-empty
    /// after trimming.
    pub fn contains_any(mut self, columns: &'static [&'static str], term: Option<&str>) -> Self {
        if let Some(term) = term.map(str::trim).filter(|t| !t.is_empty()) {
            self.clauses.push(Clause::ContainsAny {
                columns,
                term: term.to_string(),
            });
        }
        self
    }

    /// Add an effective-start range when at least one bound is present.
    pub fn effective_start_within(
        mut self,
        scheduled: &'static str,
        created: &'static str,
        from: Option<Timestamp>,
        to: Option<Timestamp>,
    ) -> Self {
        if from.is_some() || to.is_some() {
            self.clauses.push(Clause::EffectiveStartWithin {
                scheduled,
                created,
                from,
                to,
            });
        }
        self
    }

    pub fn clauses(&self) -> &[Clause] {
        &self.clauses
    }

    pub fn is_empty(&self) -> bool {
        self.clauses.is_empty()
    }

    /// Render the predicate, numbering placeholders from `first_bind`.
    pub fn to_sql(&self, first_bind: u32) -> SqlPredicate {
        let mut conditions: Vec<String> = Vec::with_capacity(self.clauses.len());
        let mut binds: Vec<BindValue> = Vec::new();
        let mut bind_idx = first_bind;

        for clause in &self.clauses {
            match clause {
                Clause::Eq { column, value } => {
                    conditions.push(format!("{column} = ${bind_idx}"));
                    bind_idx += 1;
                    binds.push(value.clone());
                }
                Clause::ContainsAny { columns, term } => {
                    let alternatives: Vec<String> = columns
                        .iter()
                        .map(|c| format!("{c} ILIKE ${bind_idx}"))
                        .collect();
                    conditions.push(format!("({})", alternatives.join(" OR ")));
                    bind_idx += 1;
                    binds.push(BindValue::Text(format!("%{}%", escape_like(term))));
                }
                Clause::EffectiveStartWithin {
                    scheduled,
                    created,
                    from,
                    to,
                } => {
                    let mut scheduled_range: Vec<String> = Vec::new();
                    let mut created_range: Vec<String> = Vec::new();

                    if let Some(from) = from {
                        scheduled_range.push(format!("{scheduled} >= ${bind_idx}"));
                        created_range.push(format!("{created} >= ${bind_idx}"));
                        bind_idx += 1;
                        binds.push(BindValue::Timestamp(*from));
                    }
                    if let Some(to) = to {
                        scheduled_range.push(format!("{scheduled} <= ${bind_idx}"));
                        created_range.push(format!("{created} <= ${bind_idx}"));
                        bind_idx += 1;
                        binds.push(BindValue::Timestamp(*to));
                    }

                    conditions.push(format!(
                        "(({scheduled} IS NOT NULL AND {}) OR ({scheduled} IS NULL AND {}))",
                        scheduled_range.join(" AND "),
                        created_range.join(" AND "),
                    ));
                }
            }
        }

        let sql = if conditions.is_empty() {
            "TRUE".to_string()
        } else {
            conditions.join(" AND ")
        };

        SqlPredicate {
            sql,
            binds,
            next_bind: bind_idx,
        }
    }
}

/// Escape `LIKE` metacharacters so the term matches literally.
fn escape_like(term: &str) -> String {
    let mut out = String::with_capacity(term.len());
    for c in term.chars() {
        if matches!(c, '\\' | '%' | '_') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    const TEXT_COLUMNS: &[&str] = &["a.title", "a.description"];

    #[test]
    fn empty_set_renders_identity() {
        let predicate = FilterSet::new().to_sql(1);
        assert_eq!(predicate.sql, "TRUE");
        assert!(predicate.binds.is_empty());
        assert_eq!(predicate.next_bind, 1);
    }

    #[test]
    fn absent_inputs_add_no_clauses() {
        let filter = FilterSet::new()
            .eq::<String>("a.plz", None)
            .contains_any(TEXT_COLUMNS, None)
            .contains_any(TEXT_COLUMNS, Some("   "))
            .effective_start_within("a.scheduled_at", "a.created_at", None, None);
        assert!(filter.is_empty());
    }

    #[test]
    fn equality_clauses_are_and_combined_in_order() {
        let predicate = FilterSet::new()
            .eq("a.status", Some(ActivityStatus::Active))
            .eq("a.plz", Some("63073"))
            .eq("a.category", Some(ActivityCategory::Social))
            .to_sql(1);

        assert_eq!(
            predicate.sql,
            "a.status = $1 AND a.plz = $2 AND a.category = $3"
        );
        assert_eq!(
            predicate.binds,
            vec![
                BindValue::Text("ACTIVE".into()),
                BindValue::Text("63073".into()),
                BindValue::Text("SOCIAL".into()),
            ]
        );
        assert_eq!(predicate.next_bind, 4);
    }

    #[test]
    fn text_search_ors_columns_with_one_bind() {
        let predicate = FilterSet::new()
            .contains_any(TEXT_COLUMNS, Some("  Kaffee "))
            .to_sql(3);

        assert_eq!(
            predicate.sql,
            "(a.title ILIKE $3 OR a.description ILIKE $3)"
        );
        assert_eq!(predicate.binds, vec![BindValue::Text("%Kaffee%".into())]);
        assert_eq!(predicate.next_bind, 4);
    }

    #[test]
    fn text_search_escapes_like_metacharacters() {
        let predicate = FilterSet::new()
            .contains_any(TEXT_COLUMNS, Some("100%_sure\\"))
            .to_sql(1);
        assert_eq!(
            predicate.binds,
            vec![BindValue::Text("%100\\%\\_sure\\\\%".into())]
        );
    }

    #[test]
    fn date_range_branches_on_schedule() {
        let from = Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap();
        let to = Utc.with_ymd_and_hms(2026, 2, 1, 0, 0, 0).unwrap();

        let predicate = FilterSet::new()
            .effective_start_within("a.scheduled_at", "a.created_at", Some(from), Some(to))
            .to_sql(1);

        assert_eq!(
            predicate.sql,
            "((a.scheduled_at IS NOT NULL AND a.scheduled_at >= $1 AND a.scheduled_at <= $2) \
             OR (a.scheduled_at IS NULL AND a.created_at >= $1 AND a.created_at <= $2))"
        );
        assert_eq!(
            predicate.binds,
            vec![BindValue::Timestamp(from), BindValue::Timestamp(to)]
        );
        assert_eq!(predicate.next_bind, 3);
    }

    #[test]
    fn date_range_with_open_upper_bound() {
        let from = Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap();
        let predicate = FilterSet::new()
            .effective_start_within("a.scheduled_at", "a.created_at", Some(from), None)
            .to_sql(1);

        assert_eq!(
            predicate.sql,
            "((a.scheduled_at IS NOT NULL AND a.scheduled_at >= $1) \
             OR (a.scheduled_at IS NULL AND a.created_at >= $1))"
        );
        assert_eq!(predicate.binds.len(), 1);
    }

    #[test]
    fn every_specified_filter_is_rendered() {
        let owner = DbId::new_v4();
        let from = Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap();

        let predicate = FilterSet::new()
            .eq("a.status", Some(ActivityStatus::Active))
            .eq("a.created_by_id", Some(owner))
            .contains_any(TEXT_COLUMNS, Some("walk"))
            .effective_start_within("a.scheduled_at", "a.created_at", Some(from), None)
            .to_sql(1);

        assert_eq!(predicate.binds.len(), 4);
        assert_eq!(predicate.next_bind, 5);
        assert_eq!(predicate.sql.matches(" AND (").count(), 2);
        assert!(predicate.sql.starts_with("a.status = $1 AND a.created_by_id = $2"));
    }
}
