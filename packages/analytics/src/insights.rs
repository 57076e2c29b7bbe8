//! Plain-language insights for the dashboard overview.
//!
//! Sections are emitted in a fixed order: state concentration, DC
//! coverage, white space, brand leader, density. Each section only speaks
//! when its input is present and crosses its threshold.

use retail_map_analytics_models::{
    CountMap, DcCatchment, DensityRecord, DistanceDistribution, WhiteSpaceRecord,
};

/// Share of stores in the top three states above which the network is
/// called concentrated.
const HIGH_CONCENTRATION_PERCENT: f64 = 60.0;

/// Share below which the network is called well distributed.
const WELL_DISTRIBUTED_PERCENT: f64 = 40.0;

/// Inputs for [`generate_insights`]. Absent sections produce no text.
#[derive(Debug, Clone, Copy, Default)]
pub struct InsightInputs<'a> {
    pub state_counts: Option<&'a CountMap>,
    pub dc_catchment: Option<&'a [DcCatchment]>,
    pub distance_distribution: Option<&'a DistanceDistribution>,
    pub white_space: Option<&'a [WhiteSpaceRecord]>,
    pub brand_composition: Option<&'a CountMap>,
    pub density: Option<&'a [DensityRecord]>,
}

/// Entries sorted by count, largest first. Ties keep label order.
fn ranked(counts: &CountMap) -> Vec<(&str, u64)> {
    let mut entries: Vec<(&str, u64)> = counts.iter().map(|(k, v)| (k.as_str(), *v)).collect();
    entries.sort_by(|a, b| b.1.cmp(&a.1));
    entries
}

/// Builds the ordered list of insight sentences.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn generate_insights(inputs: &InsightInputs<'_>) -> Vec<String> {
    let mut insights = Vec::new();

    if let Some(state_counts) = inputs.state_counts.filter(|c| !c.is_empty()) {
        let states = ranked(state_counts);
        let total: u64 = states.iter().map(|(_, c)| c).sum();
        let top3: u64 = states.iter().take(3).map(|(_, c)| c).sum();
        let concentration = if total > 0 {
            top3 as f64 / total as f64 * 100.0
        } else {
            0.0
        };

        if concentration > HIGH_CONCENTRATION_PERCENT {
            insights.push(format!(
                "High concentration: {concentration:.0}% of stores in top 3 states"
            ));
        } else if concentration < WELL_DISTRIBUTED_PERCENT {
            insights.push(format!(
                "Well-distributed: Stores spread across {} states",
                states.len()
            ));
        }
    }

    if let Some(top_dc) = inputs.dc_catchment.and_then(<[DcCatchment]>::first) {
        insights.push(format!(
            "Strongest DC presence in {} serving {} stores",
            top_dc.dc_state, top_dc.stores_served
        ));

        if let Some(dist) = inputs.distance_distribution
            && dist.percent_within_km > 0.0
        {
            insights.push(format!(
                "{:.0}% of stores within {}km of a distribution center",
                dist.percent_within_km, dist.within_km
            ));
        }
    }

    if let Some(white_space) = inputs.white_space
        && let Some(top) = white_space.first()
    {
        insights.push(format!(
            "{} high-potential expansion opportunities identified",
            white_space.len()
        ));
        insights.push(format!(
            "Top opportunity: {} (population: {}k)",
            top.district, top.population_k
        ));
    }

    if let Some(brand_composition) = inputs.brand_composition {
        let brands = ranked(brand_composition);
        if brands.len() > 1 {
            let (leader, count) = brands[0];
            let total: u64 = brands.iter().map(|(_, c)| c).sum();
            let share = if total > 0 {
                count as f64 / total as f64 * 100.0
            } else {
                0.0
            };
            insights.push(format!(
                "Brand leader: {leader} accounts for {share:.0}% of stores"
            ));
        }
    }

    if let Some(top) = inputs.density.and_then(<[DensityRecord]>::first) {
        insights.push(format!(
            "Highest density: {} ({:.1} stores per 100k population)",
            top.district, top.density
        ));
    }

    insights
}
