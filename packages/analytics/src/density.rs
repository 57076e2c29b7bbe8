//! District-level density and white-space (expansion opportunity) metrics.
//!
//! All three metrics read the containment buckets. The `*_from_assignment`
//! variants take a precomputed [`DistrictAssignment`]; the plain variants
//! compute one, uncached.

use retail_map_analytics_models::{DensityRecord, WhiteSpaceRecord};
use retail_map_network_models::{District, Store};
use retail_map_spatial::{DistrictAssignment, assign_stores_to_districts};

/// Default population threshold (thousands) for white-space detection.
pub const DEFAULT_WHITE_SPACE_THRESHOLD_K: f64 = 50.0;

/// A district with this many stores or more is never white space.
const WHITE_SPACE_MAX_STORES: usize = 3;

/// Stores per 100k population for every district with a known positive
/// population, densest first.
#[must_use]
pub fn calculate_density(stores: &[Store], districts: &[District]) -> Vec<DensityRecord> {
    let assignment = assign_stores_to_districts(stores, districts, None);
    density_from_assignment(districts, &assignment)
}

/// [`calculate_density`] over an existing assignment.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn density_from_assignment(
    districts: &[District],
    assignment: &DistrictAssignment,
) -> Vec<DensityRecord> {
    let mut records: Vec<DensityRecord> = districts
        .iter()
        .filter_map(|district| {
            let population_k = district.positive_population()?;
            let store_count = assignment.store_count(&district.name);
            Some(DensityRecord {
                district: district.name.clone(),
                state: district.state.clone(),
                store_count: store_count as u64,
                population_k,
                density: store_count as f64 / population_k * 100.0,
            })
        })
        .collect();

    records.sort_by(|a, b| b.density.total_cmp(&a.density));
    records
}

/// Districts with population at or above `threshold_k` (thousands) and
/// fewer than three stores, best opportunity first.
#[must_use]
pub fn identify_white_space(
    stores: &[Store],
    districts: &[District],
    threshold_k: f64,
) -> Vec<WhiteSpaceRecord> {
    let assignment = assign_stores_to_districts(stores, districts, None);
    white_space_from_assignment(districts, &assignment, threshold_k)
}

/// [`identify_white_space`] over an existing assignment.
#[must_use]
#[allow(
    clippy::cast_precision_loss,
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss
)]
pub fn white_space_from_assignment(
    districts: &[District],
    assignment: &DistrictAssignment,
    threshold_k: f64,
) -> Vec<WhiteSpaceRecord> {
    let mut records: Vec<WhiteSpaceRecord> = districts
        .iter()
        .filter_map(|district| {
            let population_k = district.positive_population()?;
            let store_count = assignment.store_count(&district.name);
            if population_k < threshold_k || store_count >= WHITE_SPACE_MAX_STORES {
                return None;
            }

            let opportunity_score = (population_k / store_count.max(1) as f64).round() as u64;
            Some(WhiteSpaceRecord {
                district: district.name.clone(),
                state: district.state.clone(),
                population_k,
                store_count: store_count as u64,
                opportunity_score,
            })
        })
        .collect();

    records.sort_by(|a, b| b.opportunity_score.cmp(&a.opportunity_score));
    records
}

/// Number of districts holding at least one store.
#[must_use]
pub fn count_populated_districts(stores: &[Store], districts: &[District]) -> usize {
    if stores.is_empty() || districts.is_empty() {
        return 0;
    }
    assign_stores_to_districts(stores, districts, None).populated_count()
}
