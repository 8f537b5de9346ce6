//! Trend derivation over history logs.

use chrono::{DateTime, Utc};
use serde_json::Value;

use crate::error::StoreError;
use crate::history::HistoryStore;

/// One charted data point.
#[derive(Debug, Clone, PartialEq)]
pub struct GrowthPoint {
    pub timestamp: DateTime<Utc>,
    pub value: f64,
}

/// A chronological numeric series for one field of one log.
#[derive(Debug, Clone, PartialEq)]
pub struct GrowthSeries {
    pub field: String,
    pub points: Vec<GrowthPoint>,
}

impl GrowthSeries {
    /// Change between the two most recent points.
    ///
    /// With fewer than two data points, growth cannot be computed: callers
    /// must treat `None` as "insufficient data", never as zero.
    #[must_use]
    pub fn delta(&self) -> Option<f64> {
        if self.points.len() < 2 {
            return None;
        }
        let last = self.points[self.points.len() - 1].value;
        let previous = self.points[self.points.len() - 2].value;
        Some(last - previous)
    }
}

impl HistoryStore {
    /// Extract `field` from each entry's data, skipping entries where the
    /// field is absent or non-numeric, in chronological (append) order.
    ///
    /// # Errors
    ///
    /// Same failure modes as [`HistoryStore::read`].
    pub fn derive_growth(&self, log: &str, field: &str) -> Result<GrowthSeries, StoreError> {
        let points = self
            .read(log)?
            .into_iter()
            .filter_map(|entry| {
                let value = entry.data.get(field).and_then(Value::as_f64)?;
                Some(GrowthPoint {
                    timestamp: entry.timestamp,
                    value,
                })
            })
            .collect();
        Ok(GrowthSeries {
            field: field.to_string(),
            points,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn temp_store() -> (tempfile::TempDir, HistoryStore) {
        let dir = tempfile::tempdir().unwrap();
        let store = HistoryStore::open(dir.path()).unwrap();
        (dir, store)
    }

    #[test]
    fn skips_entries_missing_the_field() {
        let (_dir, store) = temp_store();
        store.append("personal_stats", json!({"followerCount": 100})).unwrap();
        store.append("personal_stats", json!({"totalViews": 5})).unwrap();
        store.append("personal_stats", json!({"followerCount": 130})).unwrap();

        let series = store.derive_growth("personal_stats", "followerCount").unwrap();
        assert_eq!(series.points.len(), 2);
        assert!((series.points[0].value - 100.0).abs() < f64::EPSILON);
        assert_eq!(series.delta(), Some(30.0));
    }

    #[test]
    fn single_point_is_insufficient_for_delta() {
        let (_dir, store) = temp_store();
        store.append("personal_stats", json!({"followerCount": 100})).unwrap();

        let series = store.derive_growth("personal_stats", "followerCount").unwrap();
        assert_eq!(series.points.len(), 1);
        assert_eq!(series.delta(), None, "one point is insufficient data, not zero growth");
    }

    #[test]
    fn derive_growth_is_idempotent_on_an_unchanged_log() {
        let (_dir, store) = temp_store();
        store.append("personal_stats", json!({"followerCount": 100})).unwrap();
        store.append("personal_stats", json!({"followerCount": 90})).unwrap();

        let first = store.derive_growth("personal_stats", "followerCount").unwrap();
        let second = store.derive_growth("personal_stats", "followerCount").unwrap();
        assert_eq!(first, second);
        assert_eq!(first.delta(), Some(-10.0));
    }
}
