//! Overview ratios and rankings built on top of the per-metric outputs.

use retail_map_analytics_models::{CountMap, DcCatchment, DcLoad, NetworkOverview, RankedCount};
use retail_map_network_models::UNKNOWN_LABEL;

/// Number of states listed on the overview.
pub const TOP_STATES: usize = 10;

/// Number of leading states whose combined share is reported.
pub const CONCENTRATION_TOP_N: usize = 3;

/// Labels ordered by count, largest first, truncated to `limit`.
///
/// Equal counts keep label order.
#[must_use]
pub fn rank_counts(counts: &CountMap, limit: usize) -> Vec<RankedCount> {
    let mut ranked: Vec<RankedCount> = counts
        .iter()
        .map(|(label, &count)| RankedCount {
            label: label.clone(),
            count,
        })
        .collect();
    ranked.sort_by(|a, b| b.count.cmp(&a.count));
    ranked.truncate(limit);
    ranked
}

/// Number of distinct known labels, leaving out the `"Unknown"` bucket.
#[must_use]
pub fn known_label_count(counts: &CountMap) -> usize {
    counts.keys().filter(|label| *label != UNKNOWN_LABEL).count()
}

/// Percentage of `total` held by the `n` largest buckets.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn top_share_percent(counts: &CountMap, total: usize, n: usize) -> f64 {
    if total == 0 {
        return 0.0;
    }
    let top: u64 = rank_counts(counts, n).iter().map(|r| r.count).sum();
    top as f64 / total as f64 * 100.0
}

/// Average, busiest, and quietest DC by stores served.
///
/// `None` for an empty catchment.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn dc_load(catchment: &[DcCatchment]) -> Option<DcLoad> {
    let max_stores = catchment.iter().map(|dc| dc.stores_served).max()?;
    let min_stores = catchment.iter().map(|dc| dc.stores_served).min()?;
    let served: u64 = catchment.iter().map(|dc| dc.stores_served).sum();

    Some(DcLoad {
        avg_stores_per_dc: served as f64 / catchment.len() as f64,
        max_stores,
        min_stores,
    })
}

/// Builds the overview for one run.
///
/// `populated_districts` and `total_districts` come from the containment
/// assignment. Ratios with a zero denominator are zero.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn network_overview(
    total_stores: usize,
    state_counts: &CountMap,
    populated_districts: usize,
    total_districts: usize,
    catchment: Option<&[DcCatchment]>,
) -> NetworkOverview {
    let avg_per_district = if populated_districts == 0 {
        0.0
    } else {
        total_stores as f64 / populated_districts as f64
    };
    let coverage_percent = if total_districts == 0 {
        0.0
    } else {
        populated_districts as f64 / total_districts as f64 * 100.0
    };

    NetworkOverview {
        avg_per_district,
        coverage_percent,
        top_states: rank_counts(state_counts, TOP_STATES),
        concentration_percent: top_share_percent(state_counts, total_stores, CONCENTRATION_TOP_N),
        dc_load: catchment.and_then(dc_load),
    }
}
