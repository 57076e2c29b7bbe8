//! District boundaries joined with district statistics.
//!
//! Geometry and statistics live in separate `FeatureCollection`s. They are
//! joined on the district name, case-insensitively.

use std::{collections::BTreeMap, path::Path};

use geo::MultiPolygon;
use geojson::Feature;
use retail_map_network_models::{District, district_key};

use crate::{LoaderError, number_property, parse_feature_collection, read_file, string_property};

/// Population, income per capita, and total income for one district.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct DistrictStats {
    /// Population in thousands.
    pub population_k: Option<f64>,
    pub income_per_capita: Option<f64>,
    pub income: Option<f64>,
}

/// Converts a feature's geometry into a [`MultiPolygon`].
/// Handles both `Polygon` and `MultiPolygon` geometry types.
fn feature_boundary(feature: &Feature) -> Option<MultiPolygon<f64>> {
    let geometry = feature.geometry.clone()?;
    let geo_geom: geo::Geometry<f64> = geometry.try_into().ok()?;
    match geo_geom {
        geo::Geometry::MultiPolygon(mp) => Some(mp),
        geo::Geometry::Polygon(p) => Some(MultiPolygon(vec![p])),
        _ => None,
    }
}

/// Parses the district geometry collection, in file order.
///
/// Features without a name or without polygonal geometry are skipped.
/// Statistics are left empty; see [`join_statistics`].
///
/// # Errors
///
/// * If the document is not a `GeoJSON` `FeatureCollection`
pub fn parse_district_geometry(json: &str) -> Result<Vec<District>, LoaderError> {
    let collection = parse_feature_collection(json)?;

    let mut districts = Vec::with_capacity(collection.features.len());
    for feature in &collection.features {
        let Some(name) = string_property(feature, &["name", "Name"]) else {
            log::warn!("Skipping district feature without a name");
            continue;
        };
        let Some(boundary) = feature_boundary(feature) else {
            log::warn!("Skipping district {name}: geometry is not a polygon");
            continue;
        };
        districts.push(District {
            name,
            state: string_property(feature, &["state", "State"]),
            boundary,
            population_k: None,
            income_per_capita: None,
            income: None,
        });
    }

    log::info!("Loaded geometry: {} districts", districts.len());
    Ok(districts)
}

/// Parses the district statistics collection into a lookup keyed by
/// lower-cased district name. A later record for the same name wins.
///
/// # Errors
///
/// * If the document is not a `GeoJSON` `FeatureCollection`
pub fn parse_district_statistics(
    json: &str,
) -> Result<BTreeMap<String, DistrictStats>, LoaderError> {
    let collection = parse_feature_collection(json)?;

    let stats: BTreeMap<String, DistrictStats> = collection
        .features
        .iter()
        .filter_map(|feature| {
            let name = string_property(feature, &["District"])?;
            Some((
                district_key(&name),
                DistrictStats {
                    population_k: number_property(feature, "Population (k)"),
                    income_per_capita: number_property(feature, "Income per capita"),
                    income: number_property(feature, "Income"),
                },
            ))
        })
        .collect();

    log::info!(
        "Loaded statistics: {} records ({} distinct districts)",
        collection.features.len(),
        stats.len()
    );
    Ok(stats)
}

/// Copies statistics onto matching districts. Districts without a match
/// keep absent attributes.
///
/// Returns the number of districts that were joined.
pub fn join_statistics(districts: &mut [District], stats: &BTreeMap<String, DistrictStats>) -> usize {
    let mut joined = 0;
    for district in districts.iter_mut() {
        if let Some(s) = stats.get(&district.key()) {
            district.population_k = s.population_k;
            district.income_per_capita = s.income_per_capita;
            district.income = s.income;
            joined += 1;
        }
    }

    log::info!(
        "Successfully joined {joined} out of {} districts",
        districts.len()
    );
    joined
}

/// Loads district geometry and statistics and joins them.
///
/// # Errors
///
/// * If either file cannot be read
/// * If either file is not a `GeoJSON` `FeatureCollection`
pub fn load_districts(geometry: &Path, statistics: &Path) -> Result<Vec<District>, LoaderError> {
    let mut districts = parse_district_geometry(&read_file(geometry)?)?;
    let stats = parse_district_statistics(&read_file(statistics)?)?;
    join_statistics(&mut districts, &stats);
    Ok(districts)
}
