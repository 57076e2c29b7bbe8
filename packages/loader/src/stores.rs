//! Store locations from per-brand `GeoJSON` point files.

use std::path::Path;

use geojson::{Feature, Value};
use retail_map_network_models::{Point, Store};

use crate::{
    LoaderError, brands::BrandPalette, brands::brand_from_filename, parse_feature_collection,
    read_file, string_property,
};

/// Point of a store feature. `GeoJSON` positions are `[lon, lat]`.
fn feature_point(feature: &Feature) -> Option<Point> {
    let Value::Point(position) = &feature.geometry.as_ref()?.value else {
        return None;
    };
    let longitude = *position.first()?;
    let latitude = *position.get(1)?;
    let point = Point::new(latitude, longitude);
    point.is_finite().then_some(point)
}

/// Parses one brand's store `FeatureCollection`.
///
/// Every store is labelled with `brand` regardless of any brand property in
/// the file. Features without a usable point geometry are skipped.
///
/// # Errors
///
/// * If the document is not a `GeoJSON` `FeatureCollection`
pub fn parse_stores(
    json: &str,
    brand: &str,
    palette: &BrandPalette,
) -> Result<Vec<Store>, LoaderError> {
    let collection = parse_feature_collection(json)?;
    let brand_color = palette.color_for(brand).to_string();

    let mut skipped = 0usize;
    let stores: Vec<Store> = collection
        .features
        .iter()
        .filter_map(|feature| {
            let Some(point) = feature_point(feature) else {
                skipped += 1;
                return None;
            };
            Some(Store {
                name: string_property(feature, &["name", "Name"]),
                address: string_property(feature, &["address", "Address"]),
                point,
                brand: Some(brand.to_string()),
                brand_color: Some(brand_color.clone()),
                district: string_property(feature, &["District", "district"]),
                state: string_property(feature, &["State", "state"]),
            })
        })
        .collect();

    if skipped > 0 {
        log::warn!("Skipped {skipped} {brand} features without a point geometry");
    }
    log::info!(
        "Brand: {brand}, Color: {brand_color}, Features: {}",
        stores.len()
    );

    Ok(stores)
}

/// Loads a store file, deriving the brand from its file name.
///
/// # Errors
///
/// * If the file cannot be read
/// * If the file is not a `GeoJSON` `FeatureCollection`
pub fn load_store_file(path: &Path, palette: &BrandPalette) -> Result<Vec<Store>, LoaderError> {
    let file_name = path
        .file_name()
        .and_then(|name| name.to_str())
        .ok_or_else(|| LoaderError::Conversion {
            message: format!("store file has no usable name: {}", path.display()),
        })?;
    let brand = brand_from_filename(file_name);
    let json = read_file(path)?;
    parse_stores(&json, &brand, palette)
}
