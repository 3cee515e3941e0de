//! Privacy-thresholded neighbor activity counts.

use serde::Serialize;

pub const DEFAULT_WINDOW_DAYS: i64 = 30;
pub const MIN_WINDOW_DAYS: i64 = 1;
pub const MAX_WINDOW_DAYS: i64 = 365;

pub const DEFAULT_MIN_COUNT: i64 = 3;
pub const MIN_MIN_COUNT: i64 = 1;
pub const MAX_MIN_COUNT: i64 = 20;

/// Active neighbors in one postal code. Counts below `min_count` are
/// reported as zero so small areas do not reveal individuals.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NeighborMetrics {
    pub plz: String,
    pub window_days: i64,
    pub min_count: i64,
    pub active_neighbors: i64,
    pub threshold_applied: bool,
}

impl NeighborMetrics {
    pub fn from_count(plz: String, window_days: i64, min_count: i64, count: i64) -> Self {
        let threshold_applied = count < min_count;
        Self {
            plz,
            window_days,
            min_count,
            active_neighbors: if threshold_applied { 0 } else { count },
            threshold_applied,
        }
    }
}
