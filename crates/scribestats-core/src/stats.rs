//! Aggregate computations over extracted article records: totals, read rate,
//! display sorting, and view-count milestones.

use std::cmp::Ordering;

use crate::types::ArticleRecord;

/// Fixed ascending view-count thresholds for one-time congratulatory
/// notifications.
pub const MILESTONES: [u64; 9] = [
    1_000, 5_000, 10_000, 25_000, 50_000, 100_000, 250_000, 500_000, 1_000_000,
];

/// Aggregates across one extraction batch. Absent views/reads contribute
/// nothing to the sums — they are not coerced to zero per article, only
/// skipped.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Totals {
    pub views: u64,
    pub reads: u64,
    /// Σreads / Σviews × 100, or 0 when Σviews = 0.
    pub read_rate: f64,
}

#[must_use]
pub fn compute_totals(articles: &[ArticleRecord]) -> Totals {
    let views: u64 = articles.iter().filter_map(|a| a.views).sum();
    let reads: u64 = articles.iter().filter_map(|a| a.reads).sum();
    #[allow(clippy::cast_precision_loss)]
    let read_rate = if views > 0 {
        reads as f64 / views as f64 * 100.0
    } else {
        0.0
    };
    Totals {
        views,
        reads,
        read_rate,
    }
}

/// The next unreached milestone, or `None` once past the final threshold.
#[must_use]
pub fn next_milestone(total_views: u64) -> Option<u64> {
    MILESTONES.iter().copied().find(|&m| total_views < m)
}

/// The highest milestone now reached but not yet notified, if any.
///
/// `last_notified` is the persisted high-water mark; it only ever moves up,
/// so a threshold is notified at most once ever.
#[must_use]
pub fn newly_crossed(total_views: u64, last_notified: u64) -> Option<u64> {
    MILESTONES
        .iter()
        .copied()
        .filter(|&m| total_views >= m && last_notified < m)
        .next_back()
}

/// User-selectable display sort key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortKey {
    Views,
    Reads,
    ReadRate,
    Fans,
}

/// Sort for display only, descending by the selected key. The sort is stable,
/// so ties retain their prior relative order. The history store keeps the
/// original extraction order; callers sort a copy.
pub fn sort_for_display(articles: &mut [ArticleRecord], key: SortKey) {
    match key {
        SortKey::Views => articles.sort_by(|a, b| b.views.unwrap_or(0).cmp(&a.views.unwrap_or(0))),
        SortKey::Reads => articles.sort_by(|a, b| b.reads.unwrap_or(0).cmp(&a.reads.unwrap_or(0))),
        SortKey::ReadRate => articles.sort_by(|a, b| {
            b.read_rate()
                .partial_cmp(&a.read_rate())
                .unwrap_or(Ordering::Equal)
        }),
        SortKey::Fans => articles.sort_by(|a, b| b.fans.cmp(&a.fans)),
    }
}
