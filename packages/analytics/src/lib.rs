#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Aggregation and metrics layer for the retail network dashboard.
//!
//! Every function here is a pure transform over a store batch, the
//! distribution centers, and the district collection. None of them fail:
//! missing or empty inputs degrade to empty or zero results so the
//! dashboard always renders with partial data.
//!
//! [`session::AnalyticsSession`] runs all of them in one pass and reuses
//! the two spatial assignments between metrics.

pub mod catchment;
pub mod concentration;
pub mod density;
pub mod grouping;
pub mod insights;
pub mod overview;
pub mod session;

#[cfg(test)]
mod test_support;

pub use catchment::{
    DistanceBands, analyze_dc_catchment, calculate_dc_reach, get_distance_distribution,
};
pub use concentration::calculate_concentration;
pub use density::{calculate_density, count_populated_districts, identify_white_space};
pub use grouping::{brand_composition, group_by_geography, group_by_state_and_brand};
pub use insights::{InsightInputs, generate_insights};
pub use overview::network_overview;
pub use session::{AnalyticsInput, AnalyticsSession, AnalyticsSettings};
