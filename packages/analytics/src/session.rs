//! One analytics run over a category's stores, DCs, and districts.
//!
//! [`AnalyticsSession`] owns the run settings and the district assignment
//! cache. Callers keep the session alive across runs to reuse containment
//! results when the same batch is analyzed again.

use retail_map_analytics_models::{AnalyticsReport, GeographyField, NetworkSummary};
use retail_map_facility::assign_stores_to_facilities;
use retail_map_network_models::{District, DistributionCenter, Store};
use retail_map_spatial::{DistrictAssignmentCache, assign_stores_to_districts};
use serde::{Deserialize, Serialize};

use crate::{
    catchment::{
        DEFAULT_WITHIN_KM, DistanceBands, catchment_from_assignment, distribution_from_assignment,
        reach_from_assignment,
    },
    concentration::calculate_concentration,
    density::{DEFAULT_WHITE_SPACE_THRESHOLD_K, density_from_assignment, white_space_from_assignment},
    grouping::{brand_composition, group_by_geography, group_by_state_and_brand},
    insights::{InsightInputs, generate_insights},
    overview::{known_label_count, network_overview},
};

/// Tunables for an analytics run. Every field has a default, so an empty
/// `[analytics]` table is valid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalyticsSettings {
    /// Upper bounds of the distance histogram bands, in kilometers.
    pub distance_bands_km: DistanceBands,
    /// Minimum district population (thousands) for white-space detection.
    pub white_space_threshold_k: f64,
    /// Distance used for the "stores within N km of a DC" percentage.
    pub within_km: f64,
    /// Reuse containment results for repeated identical batches.
    pub use_cache: bool,
}

impl Default for AnalyticsSettings {
    fn default() -> Self {
        Self {
            distance_bands_km: DistanceBands::default(),
            white_space_threshold_k: DEFAULT_WHITE_SPACE_THRESHOLD_K,
            within_km: DEFAULT_WITHIN_KM,
            use_cache: true,
        }
    }
}

/// Borrowed input batch for one run.
#[derive(Debug, Clone, Copy)]
pub struct AnalyticsInput<'a> {
    pub stores: &'a [Store],
    pub facilities: &'a [DistributionCenter],
    pub districts: &'a [District],
}

/// Explicit, caller-owned analytics state.
#[derive(Debug, Default)]
pub struct AnalyticsSession {
    settings: AnalyticsSettings,
    cache: DistrictAssignmentCache,
}

impl AnalyticsSession {
    #[must_use]
    pub fn new(settings: AnalyticsSettings) -> Self {
        Self {
            settings,
            cache: DistrictAssignmentCache::new(),
        }
    }

    #[must_use]
    pub const fn settings(&self) -> &AnalyticsSettings {
        &self.settings
    }

    #[must_use]
    pub const fn cache(&self) -> &DistrictAssignmentCache {
        &self.cache
    }

    /// Drops any cached district assignment.
    pub fn clear_cache(&mut self) {
        self.cache.clear();
    }

    /// Runs the full pipeline and returns a fresh report.
    ///
    /// The input batch is never modified. Stores are annotated with their
    /// resolved district and state on a copy before any grouping runs.
    #[allow(clippy::cast_possible_truncation)]
    pub fn run(&mut self, input: &AnalyticsInput<'_>) -> AnalyticsReport {
        let AnalyticsInput {
            stores,
            facilities,
            districts,
        } = *input;

        log::info!(
            "Running analytics over {} stores, {} DCs, {} districts",
            stores.len(),
            facilities.len(),
            districts.len()
        );

        let cache = self.settings.use_cache.then_some(&mut self.cache);
        let districts_assignment = assign_stores_to_districts(stores, districts, cache);
        let annotated = districts_assignment.annotate(stores);

        let brand_composition = brand_composition(&annotated);
        let state_counts = group_by_geography(&annotated, GeographyField::State, None);
        let district_counts = group_by_geography(
            &annotated,
            GeographyField::District,
            (!districts.is_empty()).then_some(&districts_assignment),
        );
        let state_brand_counts = group_by_state_and_brand(&annotated);

        let density = density_from_assignment(districts, &districts_assignment);
        let white_space = white_space_from_assignment(
            districts,
            &districts_assignment,
            self.settings.white_space_threshold_k,
        );

        let facility_assignment = assign_stores_to_facilities(&annotated, facilities);
        let has_facilities = !facilities.is_empty();
        let dc_catchment =
            has_facilities.then(|| catchment_from_assignment(facilities, &facility_assignment));
        let dc_reach = reach_from_assignment(facilities, &facility_assignment);
        let distance_distribution = has_facilities.then(|| {
            distribution_from_assignment(
                stores.len(),
                &facility_assignment,
                &self.settings.distance_bands_km,
                self.settings.within_km,
            )
        });

        let state_concentration = calculate_concentration(&state_counts);

        let insights = generate_insights(&InsightInputs {
            state_counts: Some(&state_counts),
            dc_catchment: dc_catchment.as_deref(),
            distance_distribution: distance_distribution.as_ref(),
            white_space: Some(&white_space),
            brand_composition: Some(&brand_composition),
            density: Some(&density),
        });

        let summary = NetworkSummary {
            total_stores: stores.len() as u64,
            total_dcs: facilities.len() as u64,
            total_districts: districts_assignment.buckets().len() as u64,
            populated_districts: districts_assignment.populated_count() as u64,
            brand_count: brand_composition.len() as u64,
            state_count: known_label_count(&state_counts) as u64,
        };
        let overview = network_overview(
            stores.len(),
            &state_counts,
            districts_assignment.populated_count(),
            districts_assignment.buckets().len(),
            dc_catchment.as_deref(),
        );

        log::debug!(
            "Analytics complete: {} populated districts, {} insights",
            summary.populated_districts,
            insights.len()
        );

        AnalyticsReport {
            summary,
            overview,
            brand_composition,
            state_counts,
            district_counts,
            state_brand_counts,
            density,
            white_space,
            dc_catchment,
            dc_reach,
            distance_distribution,
            state_concentration,
            insights,
        }
    }
}
