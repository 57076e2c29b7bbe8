//! Distribution centers from the per-category DC JSON file.
//!
//! The file groups locations by state:
//!
//! ```json
//! [{ "state": "Selangor", "locations": [{ "code": "DC1", "name": "Shah Alam",
//!    "address": "...", "gps": "3.07, 101.52" }] }]
//! ```

use std::path::Path;

use retail_map_network_models::{DistributionCenter, Point};
use serde::Deserialize;

use crate::{LoaderError, read_file};

#[derive(Debug, Deserialize)]
struct StateGroup {
    state: Option<String>,
    locations: Option<Vec<Location>>,
}

#[derive(Debug, Deserialize)]
struct Location {
    code: Option<String>,
    name: Option<String>,
    address: Option<String>,
    gps: Option<String>,
}

/// Parses a `"lat, lon"` string.
///
/// Returns `None` unless both parts parse as finite numbers.
#[must_use]
pub fn parse_gps(gps: &str) -> Option<Point> {
    let mut parts = gps.split(',');
    let latitude: f64 = parts.next()?.trim().parse().ok()?;
    let longitude: f64 = parts.next()?.trim().parse().ok()?;
    let point = Point::new(latitude, longitude);
    point.is_finite().then_some(point)
}

/// Parses the DC JSON document, flattening state groups in file order.
///
/// Locations with an empty or unparsable `gps` are skipped.
///
/// # Errors
///
/// * If the document is not a JSON array of state groups
pub fn parse_distribution_centers(json: &str) -> Result<Vec<DistributionCenter>, LoaderError> {
    let groups: Vec<StateGroup> = serde_json::from_str(json)?;

    let mut facilities = Vec::new();
    for group in groups {
        let state = group.state.unwrap_or_default();
        for location in group.locations.unwrap_or_default() {
            let gps = location.gps.unwrap_or_default();
            if gps.trim().is_empty() {
                continue;
            }
            let Some(point) = parse_gps(&gps) else {
                log::warn!("Could not parse GPS: {gps:?}");
                continue;
            };
            facilities.push(DistributionCenter {
                code: location.code.unwrap_or_default(),
                name: location.name.unwrap_or_default(),
                address: location.address.unwrap_or_default(),
                point,
                state: state.clone(),
            });
        }
    }

    log::info!("Loaded {} distribution centers", facilities.len());
    Ok(facilities)
}

/// Loads and parses a DC JSON file.
///
/// # Errors
///
/// * If the file cannot be read
/// * If the file is not a JSON array of state groups
pub fn load_distribution_centers(path: &Path) -> Result<Vec<DistributionCenter>, LoaderError> {
    parse_distribution_centers(&read_file(path)?)
}
