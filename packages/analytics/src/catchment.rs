//! Distribution center catchment, reach, and distance banding.
//!
//! Built on nearest-facility assignment. Each metric comes in two forms:
//! one that assigns stores itself, and a `*_from_assignment` form that
//! reuses a [`FacilityAssignment`] computed once per run.

use retail_map_analytics_models::{
    DcCatchment, DcReach, DcReachEntry, DistanceBand, DistanceDistribution,
};
use retail_map_facility::{FacilityAssignment, assign_stores_to_facilities};
use retail_map_network_models::{DistributionCenter, Store};
use serde::{Deserialize, Serialize};

/// Default band upper bounds in kilometers.
pub const DEFAULT_DISTANCE_BANDS_KM: [f64; 4] = [10.0, 25.0, 50.0, 100.0];

/// Default "within N km" distance for the coverage percentage.
pub const DEFAULT_WITHIN_KM: f64 = 25.0;

/// Ascending band upper bounds for the distance histogram.
///
/// Non-finite and non-positive bounds are dropped; the rest are sorted and
/// deduplicated, so any input yields a usable set of half-open bands.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "Vec<f64>", into = "Vec<f64>")]
pub struct DistanceBands(Vec<f64>);

impl DistanceBands {
    #[must_use]
    pub fn new(bounds: &[f64]) -> Self {
        let mut bounds: Vec<f64> = bounds
            .iter()
            .copied()
            .filter(|b| b.is_finite() && *b > 0.0)
            .collect();
        bounds.sort_by(f64::total_cmp);
        bounds.dedup();
        Self(bounds)
    }

    /// Upper bounds in ascending order.
    #[must_use]
    pub fn bounds(&self) -> &[f64] {
        &self.0
    }

    /// Empty histogram: one band per bound plus the overflow band.
    fn empty_histogram(&self) -> Vec<DistanceBand> {
        let mut bands = Vec::with_capacity(self.0.len() + 1);
        let mut lower = 0.0;
        for &upper in &self.0 {
            bands.push(DistanceBand {
                label: format!("{lower}-{upper}km"),
                lower_km: lower,
                upper_km: Some(upper),
                count: 0,
            });
            lower = upper;
        }
        bands.push(DistanceBand {
            label: format!("{lower}km+"),
            lower_km: lower,
            upper_km: None,
            count: 0,
        });
        bands
    }
}

impl Default for DistanceBands {
    fn default() -> Self {
        Self::new(&DEFAULT_DISTANCE_BANDS_KM)
    }
}

impl From<Vec<f64>> for DistanceBands {
    fn from(bounds: Vec<f64>) -> Self {
        Self::new(&bounds)
    }
}

impl From<DistanceBands> for Vec<f64> {
    fn from(bands: DistanceBands) -> Self {
        bands.0
    }
}

/// Per-DC store counts and distance statistics, busiest DC first.
///
/// Empty when there are no DCs.
#[must_use]
pub fn analyze_dc_catchment(stores: &[Store], dcs: &[DistributionCenter]) -> Vec<DcCatchment> {
    let assignment = assign_stores_to_facilities(stores, dcs);
    catchment_from_assignment(dcs, &assignment)
}

/// [`analyze_dc_catchment`] over an existing assignment.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn catchment_from_assignment(
    dcs: &[DistributionCenter],
    assignment: &FacilityAssignment,
) -> Vec<DcCatchment> {
    let mut catchment: Vec<DcCatchment> = dcs
        .iter()
        .enumerate()
        .map(|(idx, dc)| {
            let distances = assignment.member_distances(idx);
            let (avg, max, min) = if distances.is_empty() {
                (0.0, 0.0, 0.0)
            } else {
                (
                    distances.iter().sum::<f64>() / distances.len() as f64,
                    distances.iter().copied().fold(f64::NEG_INFINITY, f64::max),
                    distances.iter().copied().fold(f64::INFINITY, f64::min),
                )
            };

            DcCatchment {
                dc_index: idx,
                dc_name: dc.display_name(idx),
                dc_state: dc.state_label().to_string(),
                stores_served: distances.len() as u64,
                avg_distance_km: avg,
                max_distance_km: max,
                min_distance_km: min,
            }
        })
        .collect();

    catchment.sort_by(|a, b| b.stores_served.cmp(&a.stores_served));
    catchment
}

/// Mean of each DC's furthest assigned store, over DCs serving stores.
#[must_use]
pub fn calculate_dc_reach(stores: &[Store], dcs: &[DistributionCenter]) -> DcReach {
    let assignment = assign_stores_to_facilities(stores, dcs);
    reach_from_assignment(dcs, &assignment)
}

/// [`calculate_dc_reach`] over an existing assignment.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn reach_from_assignment(
    dcs: &[DistributionCenter],
    assignment: &FacilityAssignment,
) -> DcReach {
    let mut serving = Vec::new();

    let per_dc = dcs
        .iter()
        .enumerate()
        .map(|(idx, dc)| {
            let distances = assignment.member_distances(idx);
            let max_distance_km = if distances.is_empty() {
                0.0
            } else {
                let max = distances.iter().copied().fold(f64::NEG_INFINITY, f64::max);
                log::debug!(
                    "DC {idx} ({}) - {} stores assigned, furthest distance: {max:.2} km",
                    dc.display_name(idx),
                    distances.len()
                );
                serving.push(max);
                max
            };

            DcReachEntry {
                dc_index: idx,
                dc_name: dc.display_name(idx),
                max_distance_km,
            }
        })
        .collect();

    let reach_km = if serving.is_empty() {
        0.0
    } else {
        serving.iter().sum::<f64>() / serving.len() as f64
    };

    DcReach { reach_km, per_dc }
}

/// Histogram of nearest-DC distances.
///
/// `None` when there are no DCs to measure against.
#[must_use]
pub fn get_distance_distribution(
    stores: &[Store],
    dcs: &[DistributionCenter],
    bands: &DistanceBands,
    within_km: f64,
) -> Option<DistanceDistribution> {
    if dcs.is_empty() {
        return None;
    }
    let assignment = assign_stores_to_facilities(stores, dcs);
    Some(distribution_from_assignment(
        stores.len(),
        &assignment,
        bands,
        within_km,
    ))
}

/// [`get_distance_distribution`] over an existing assignment.
///
/// `total_stores` is the size of the store batch and is the denominator
/// of the coverage percentage.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn distribution_from_assignment(
    total_stores: usize,
    assignment: &FacilityAssignment,
    bands: &DistanceBands,
    within_km: f64,
) -> DistanceDistribution {
    let mut histogram = bands.empty_histogram();
    let mut sum = 0.0;
    let mut measured = 0usize;

    for (_, store) in assignment.assigned() {
        let distance = store.distance_km;
        sum += distance;
        measured += 1;

        let slot = histogram
            .iter()
            .position(|band| band.upper_km.is_none_or(|upper| distance <= upper))
            .unwrap_or(histogram.len() - 1);
        histogram[slot].count += 1;
    }

    let mut distribution = DistanceDistribution {
        bands: histogram,
        avg_distance_km: if measured == 0 {
            0.0
        } else {
            sum / measured as f64
        },
        total_stores: total_stores as u64,
        percent_within_km: 0.0,
        within_km,
    };
    distribution.percent_within_km = distribution.percent_within(within_km);
    distribution
}

#[cfg(test)]
mod tests {
    use retail_map_network_models::Point;

    use super::*;
    use crate::test_support::{dc, store_at};

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 0.01
    }

    #[test]
    fn two_dc_end_to_end_catchment() {
        let stores = vec![store_at(3.10, 101.60), store_at(3.20, 101.70), store_at(5.40, 100.30)];
        let dc1 = dc("Shah Alam", "Selangor", 3.07, 101.52);
        let dc2 = dc("Prai", "Penang", 5.38, 100.39);

        let d = |s: usize, facility: &DistributionCenter| {
            haversine_reference(stores[s].point, facility.point)
        };
        let s1 = d(0, &dc1);
        let s2 = d(1, &dc1);
        let s3 = d(2, &dc2);

        let catchment = analyze_dc_catchment(&stores, &[dc1.clone(), dc2.clone()]);
        assert_eq!(catchment.len(), 2);

        assert_eq!(catchment[0].dc_name, "Shah Alam");
        assert_eq!(catchment[0].stores_served, 2);
        assert!(close(catchment[0].avg_distance_km, (s1 + s2) / 2.0));
        assert!(close(catchment[0].max_distance_km, s1.max(s2)));
        assert!(close(catchment[0].min_distance_km, s1.min(s2)));

        assert_eq!(catchment[1].dc_name, "Prai");
        assert_eq!(catchment[1].stores_served, 1);
        assert!(close(catchment[1].avg_distance_km, s3));
        assert!(close(catchment[1].max_distance_km, s3));
        assert!(close(catchment[1].min_distance_km, s3));
    }

    #[test]
    fn hand_computed_catchment_distances() {
        // Stores due north of the DC on the same meridian: 1 degree of
        // latitude is 6371 * pi / 180 = 111.19 km.
        let stores = vec![store_at(1.0, 100.0), store_at(2.0, 100.0)];
        let dcs = vec![dc("Equator", "X", 0.0, 100.0)];

        let catchment = analyze_dc_catchment(&stores, &dcs);
        assert!(close(catchment[0].min_distance_km, 111.19));
        assert!(close(catchment[0].max_distance_km, 222.39));
        assert!(close(catchment[0].avg_distance_km, 166.79));
    }

    #[test]
    fn idle_dc_reports_zero_distances() {
        let stores = vec![store_at(3.1, 101.6)];
        let dcs = vec![dc("Busy", "A", 3.1, 101.6), dc("", "", 6.0, 116.0)];

        let catchment = analyze_dc_catchment(&stores, &dcs);
        let idle = &catchment[1];
        assert_eq!(idle.dc_name, "DC 2");
        assert_eq!(idle.dc_state, "Unknown");
        assert_eq!(idle.stores_served, 0);
        assert!(idle.avg_distance_km.abs() < f64::EPSILON);
        assert!(idle.max_distance_km.abs() < f64::EPSILON);
        assert!(idle.min_distance_km.abs() < f64::EPSILON);
    }

    #[test]
    fn no_dcs_degrades_to_empty() {
        let stores = vec![store_at(3.1, 101.6)];
        assert!(analyze_dc_catchment(&stores, &[]).is_empty());
        assert_eq!(calculate_dc_reach(&stores, &[]), DcReach::default());
        assert!(get_distance_distribution(&stores, &[], &DistanceBands::default(), 25.0).is_none());
    }

    #[test]
    fn reach_averages_only_serving_dcs() {
        let stores = vec![store_at(1.0, 100.0), store_at(0.0, 110.5)];
        let dcs = vec![
            dc("West", "A", 0.0, 100.0),
            dc("East", "B", 0.0, 110.0),
            dc("Idle", "C", 60.0, 0.0),
        ];

        let reach = calculate_dc_reach(&stores, &dcs);
        let west = reach.per_dc[0].max_distance_km;
        let east = reach.per_dc[1].max_distance_km;

        assert_eq!(reach.per_dc.len(), 3);
        assert!(reach.per_dc[2].max_distance_km.abs() < f64::EPSILON);
        assert!(close(reach.reach_km, (west + east) / 2.0));
    }

    #[test]
    fn reach_counts_dc_whose_stores_sit_on_top_of_it() {
        let stores = vec![store_at(0.0, 100.0), store_at(2.0, 110.0)];
        let dcs = vec![dc("Onsite", "A", 0.0, 100.0), dc("Far", "B", 0.0, 110.0)];

        let reach = calculate_dc_reach(&stores, &dcs);
        let far = reach.per_dc[1].max_distance_km;
        assert!(close(reach.reach_km, far / 2.0));
    }

    #[test]
    fn default_band_labels() {
        let bands = DistanceBands::default().empty_histogram();
        let labels: Vec<&str> = bands.iter().map(|b| b.label.as_str()).collect();
        assert_eq!(labels, vec!["0-10km", "10-25km", "25-50km", "50-100km", "100km+"]);
    }

    #[test]
    fn bands_are_normalized() {
        let bands = DistanceBands::new(&[50.0, f64::NAN, 5.0, -1.0, 50.0, 0.0]);
        assert_eq!(bands.bounds(), &[5.0, 50.0]);

        let labels: Vec<String> = DistanceBands::new(&[])
            .empty_histogram()
            .into_iter()
            .map(|b| b.label)
            .collect();
        assert_eq!(labels, vec!["0km+".to_string()]);
    }

    #[test]
    fn histogram_places_upper_bound_in_lower_band() {
        // 111.19 km per degree of latitude
        let stores = vec![
            store_at(0.0, 100.0),
            store_at(0.05, 100.0),
            store_at(0.2, 100.0),
            store_at(2.0, 100.0),
        ];
        let dcs = vec![dc("Origin", "X", 0.0, 100.0)];
        let bands = DistanceBands::new(&[10.0, 25.0]);

        let dist = get_distance_distribution(&stores, &dcs, &bands, 25.0).unwrap();
        let counts: Vec<u64> = dist.bands.iter().map(|b| b.count).collect();
        assert_eq!(counts, vec![2, 1, 1]);
        assert_eq!(dist.measured_count(), 4);
        assert!((dist.percent_within_km - 75.0).abs() < 1e-9);
    }

    #[test]
    fn coverage_uses_numeric_bounds_for_custom_bands() {
        // A label-parsing implementation would mis-read "0-5km"/"5-30km".
        let stores = vec![store_at(0.0, 100.0), store_at(0.1, 100.0), store_at(0.5, 100.0)];
        let dcs = vec![dc("Origin", "X", 0.0, 100.0)];
        let bands = DistanceBands::new(&[5.0, 30.0]);

        let dist = get_distance_distribution(&stores, &dcs, &bands, 25.0).unwrap();
        let counts: Vec<u64> = dist.bands.iter().map(|b| b.count).collect();
        assert_eq!(counts, vec![1, 1, 1]);
        assert!((dist.percent_within_km - 100.0 / 3.0).abs() < 1e-9);
        assert!((dist.percent_within(30.0) - 200.0 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn average_distance_over_measured_stores() {
        let stores = vec![store_at(1.0, 100.0), store_at(f64::NAN, 0.0)];
        let dcs = vec![dc("Origin", "X", 0.0, 100.0)];

        let dist = get_distance_distribution(&stores, &dcs, &DistanceBands::default(), 25.0).unwrap();
        assert_eq!(dist.measured_count(), 1);
        assert_eq!(dist.total_stores, 2);
        assert!(close(dist.avg_distance_km, 111.19));
    }

    fn haversine_reference(a: Point, b: Point) -> f64 {
        // Independent Haversine for cross-checking.
        let r = 6371.0_f64;
        let (lat1, lat2) = (a.latitude.to_radians(), b.latitude.to_radians());
        let d_lat = lat2 - lat1;
        let d_lon = (b.longitude - a.longitude).to_radians();
        let h = (d_lat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (d_lon / 2.0).sin().powi(2);
        2.0 * r * h.sqrt().asin()
    }
}
