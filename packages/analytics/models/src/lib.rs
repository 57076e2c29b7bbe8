#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Aggregate record types for the retail network dashboard.
//!
//! Every type here is a snapshot computed from one input batch. None of
//! them hold references back to stores, facilities, or districts, so they
//! serialize straight to JSON for the presentation layer.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// Label to store count.
pub type CountMap = BTreeMap<String, u64>;

/// Geographic field a store batch can be grouped by.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, AsRefStr,
)]
#[serde(rename_all = "PascalCase")]
#[strum(serialize_all = "PascalCase", ascii_case_insensitive)]
pub enum GeographyField {
    /// The store's state.
    State,
    /// The district whose polygon contains the store.
    District,
}

/// Market concentration level derived from the Gini coefficient.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "PascalCase")]
#[strum(serialize_all = "PascalCase")]
pub enum ConcentrationLevel {
    /// Gini at or below 0.4.
    Low,
    /// Gini above 0.4 and at or below 0.6.
    Medium,
    /// Gini above 0.6.
    High,
}

impl ConcentrationLevel {
    /// Classifies a Gini coefficient.
    #[must_use]
    pub fn from_gini(gini: f64) -> Self {
        if gini > 0.6 {
            Self::High
        } else if gini > 0.4 {
            Self::Medium
        } else {
            Self::Low
        }
    }
}

/// Gini-based concentration of stores across geographic buckets.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Concentration {
    /// Gini coefficient in `[0, 1]`.
    pub gini: f64,
    /// Level derived from `gini`.
    pub level: ConcentrationLevel,
}

impl Default for Concentration {
    fn default() -> Self {
        Self {
            gini: 0.0,
            level: ConcentrationLevel::Low,
        }
    }
}

/// Stores per 100k population for one district.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DensityRecord {
    pub district: String,
    pub state: Option<String>,
    pub store_count: u64,
    /// Population in thousands.
    pub population_k: f64,
    /// Stores per 100k residents.
    pub density: f64,
}

/// An underserved district.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WhiteSpaceRecord {
    pub district: String,
    pub state: Option<String>,
    /// Population in thousands.
    pub population_k: f64,
    pub store_count: u64,
    /// Population (thousands) per existing store, rounded.
    pub opportunity_score: u64,
}

/// Catchment statistics for one distribution center.
///
/// Distances are all zero when the DC serves no stores.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DcCatchment {
    /// Position of the DC in the facility batch.
    pub dc_index: usize,
    pub dc_name: String,
    pub dc_state: String,
    pub stores_served: u64,
    pub avg_distance_km: f64,
    pub max_distance_km: f64,
    pub min_distance_km: f64,
}

/// Furthest assigned store for one distribution center.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DcReachEntry {
    pub dc_index: usize,
    pub dc_name: String,
    /// Zero when the DC serves no stores.
    pub max_distance_km: f64,
}

/// Network-wide reach: mean of per-DC maximum distances over DCs that
/// serve at least one store.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DcReach {
    pub reach_km: f64,
    pub per_dc: Vec<DcReachEntry>,
}

/// One bucket of the distance histogram: `(lower_km, upper_km]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DistanceBand {
    /// Display label, e.g. `"10-25km"` or `"100km+"`.
    pub label: String,
    pub lower_km: f64,
    /// `None` for the open-ended overflow band.
    pub upper_km: Option<f64>,
    pub count: u64,
}

/// Histogram of store distances to their nearest DC.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DistanceDistribution {
    /// Bands in ascending order; the last one is the overflow band.
    pub bands: Vec<DistanceBand>,
    pub avg_distance_km: f64,
    /// Number of stores in the input batch.
    pub total_stores: u64,
    /// Share of stores (percent) in bands whose upper bound is at most the
    /// configured "within" distance.
    pub percent_within_km: f64,
    /// The "within" distance `percent_within_km` was computed for.
    pub within_km: f64,
}

impl DistanceDistribution {
    /// Total number of stores placed in any band.
    #[must_use]
    pub fn measured_count(&self) -> u64 {
        self.bands.iter().map(|b| b.count).sum()
    }

    /// Percentage of the batch in bands whose upper bound is `<= km`.
    ///
    /// Works on the numeric band bounds, so stores between the last band
    /// edge below `km` and `km` itself are not counted.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn percent_within(&self, km: f64) -> f64 {
        if self.total_stores == 0 {
            return 0.0;
        }
        let within: u64 = self
            .bands
            .iter()
            .filter(|b| b.upper_km.is_some_and(|upper| upper <= km))
            .map(|b| b.count)
            .sum();
        within as f64 / self.total_stores as f64 * 100.0
    }
}

/// Summary counts shown on the dashboard overview.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NetworkSummary {
    pub total_stores: u64,
    pub total_dcs: u64,
    pub total_districts: u64,
    pub populated_districts: u64,
    pub brand_count: u64,
    /// Distinct known states. The `"Unknown"` bucket is not a state.
    pub state_count: u64,
}

/// A label and its store count, as ranked on the overview.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RankedCount {
    pub label: String,
    pub count: u64,
}

/// How evenly stores are spread over the distribution centers.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DcLoad {
    pub avg_stores_per_dc: f64,
    pub max_stores: u64,
    pub min_stores: u64,
}

/// Ratios and rankings derived from the summary counts.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NetworkOverview {
    /// Stores per populated district.
    pub avg_per_district: f64,
    /// Populated districts as a percentage of all named districts.
    pub coverage_percent: f64,
    /// Largest state buckets, most stores first.
    pub top_states: Vec<RankedCount>,
    /// Share of stores (percent) held by the three largest state buckets.
    pub concentration_percent: f64,
    /// Absent when no DCs are configured for the category.
    pub dc_load: Option<DcLoad>,
}

/// Everything the dashboard needs for one category, computed in one run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyticsReport {
    pub summary: NetworkSummary,
    pub overview: NetworkOverview,
    pub brand_composition: CountMap,
    pub state_counts: CountMap,
    pub district_counts: CountMap,
    pub state_brand_counts: BTreeMap<String, CountMap>,
    pub density: Vec<DensityRecord>,
    pub white_space: Vec<WhiteSpaceRecord>,
    /// Absent when no DCs are configured for the category.
    pub dc_catchment: Option<Vec<DcCatchment>>,
    pub dc_reach: DcReach,
    /// Absent when no DCs are configured for the category.
    pub distance_distribution: Option<DistanceDistribution>,
    pub state_concentration: Concentration,
    pub insights: Vec<String>,
}

#[cfg(test)]
mod tests {
    use std::str::FromStr as _;

    use super::*;

    fn band(lower: f64, upper: Option<f64>, count: u64) -> DistanceBand {
        DistanceBand {
            label: String::new(),
            lower_km: lower,
            upper_km: upper,
            count,
        }
    }

    #[test]
    fn level_thresholds_are_exclusive() {
        assert_eq!(ConcentrationLevel::from_gini(0.0), ConcentrationLevel::Low);
        assert_eq!(ConcentrationLevel::from_gini(0.4), ConcentrationLevel::Low);
        assert_eq!(ConcentrationLevel::from_gini(0.41), ConcentrationLevel::Medium);
        assert_eq!(ConcentrationLevel::from_gini(0.6), ConcentrationLevel::Medium);
        assert_eq!(ConcentrationLevel::from_gini(0.61), ConcentrationLevel::High);
    }

    #[test]
    fn geography_field_parses_case_insensitively() {
        assert_eq!(
            GeographyField::from_str("district").unwrap(),
            GeographyField::District
        );
        assert_eq!(GeographyField::State.to_string(), "State");
    }

    #[test]
    fn percent_within_uses_numeric_bounds() {
        let dist = DistanceDistribution {
            bands: vec![
                band(0.0, Some(5.0), 2),
                band(5.0, Some(30.0), 3),
                band(30.0, None, 5),
            ],
            total_stores: 10,
            ..DistanceDistribution::default()
        };

        assert!((dist.percent_within(5.0) - 20.0).abs() < 1e-9);
        // 25 falls inside the 5-30 band, which is not wholly within 25
        assert!((dist.percent_within(25.0) - 20.0).abs() < 1e-9);
        assert!((dist.percent_within(30.0) - 50.0).abs() < 1e-9);
        assert_eq!(dist.measured_count(), 10);
    }

    #[test]
    fn percent_within_empty_batch_is_zero() {
        assert!(DistanceDistribution::default().percent_within(25.0).abs() < f64::EPSILON);
    }
}
