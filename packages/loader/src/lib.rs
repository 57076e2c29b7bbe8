#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Input normalization for the retail network dashboard.
//!
//! Turns the on-disk data of a category (store `GeoJSON` files, a
//! distribution center JSON file, and the shared district geometry and
//! statistics files) into the plain records the analytics layer consumes.
//! Individual malformed records are skipped with a warning; only file
//! level problems are errors.

pub mod brands;
pub mod catalog;
pub mod districts;
pub mod facilities;
pub mod stores;

use std::path::Path;

use geojson::{Feature, FeatureCollection, GeoJson};
use serde_json::Value;
use thiserror::Error;

pub use brands::{BrandPalette, DEFAULT_BRAND_COLOR, brand_from_filename};
pub use catalog::{Catalog, CategoryConfig, CategoryData, DistrictSources};

/// Errors that can occur while loading input files.
#[derive(Debug, Error)]
pub enum LoaderError {
    /// Reading a file failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A JSON document could not be decoded.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A `GeoJSON` document could not be decoded.
    #[error("GeoJSON error: {0}")]
    GeoJson(#[from] Box<geojson::Error>),

    /// The catalog could not be decoded.
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    /// The catalog has no category with this name.
    #[error("Unknown category: {name}")]
    UnknownCategory {
        /// The requested category.
        name: String,
    },

    /// Data conversion error.
    #[error("Conversion error: {message}")]
    Conversion {
        /// Description of what went wrong.
        message: String,
    },
}

impl From<geojson::Error> for LoaderError {
    fn from(e: geojson::Error) -> Self {
        Self::GeoJson(Box::new(e))
    }
}

/// Reads a file to a string, logging which file failed.
fn read_file(path: &Path) -> Result<String, LoaderError> {
    std::fs::read_to_string(path).map_err(|e| {
        log::warn!("Could not read {}: {e}", path.display());
        LoaderError::Io(e)
    })
}

/// Parses a `GeoJSON` document that must be a `FeatureCollection`.
fn parse_feature_collection(json: &str) -> Result<FeatureCollection, LoaderError> {
    match json.parse::<GeoJson>()? {
        GeoJson::FeatureCollection(collection) => Ok(collection),
        GeoJson::Feature(_) => Err(LoaderError::Conversion {
            message: "expected a FeatureCollection, found a Feature".to_string(),
        }),
        GeoJson::Geometry(_) => Err(LoaderError::Conversion {
            message: "expected a FeatureCollection, found a Geometry".to_string(),
        }),
    }
}

/// First non-empty string property among `keys`. Numbers are rendered as
/// text.
fn string_property(feature: &Feature, keys: &[&str]) -> Option<String> {
    keys.iter().find_map(|key| match feature.property(key)? {
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    })
}

/// Numeric property, accepting numbers and numeric strings.
fn number_property(feature: &Feature, key: &str) -> Option<f64> {
    match feature.property(key)? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().replace(',', "").parse().ok(),
        _ => None,
    }
    .filter(|v: &f64| v.is_finite())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn feature(properties: serde_json::Value) -> Feature {
        let json = serde_json::json!({
            "type": "Feature",
            "geometry": null,
            "properties": properties,
        });
        json.to_string().parse::<GeoJson>().map_or_else(
            |e| panic!("bad fixture: {e}"),
            |g| match g {
                GeoJson::Feature(f) => f,
                _ => panic!("not a feature"),
            },
        )
    }

    #[test]
    fn string_property_tries_keys_in_order() {
        let f = feature(serde_json::json!({ "Name": "Upper", "name": "" }));
        assert_eq!(string_property(&f, &["name", "Name"]), Some("Upper".to_string()));
        assert_eq!(string_property(&f, &["missing"]), None);
    }

    #[test]
    fn number_property_accepts_numeric_strings() {
        let f = feature(serde_json::json!({
            "a": 245.5,
            "b": " 1,024.5 ",
            "c": "n/a",
            "d": null,
        }));
        assert_eq!(number_property(&f, "a"), Some(245.5));
        assert_eq!(number_property(&f, "b"), Some(1024.5));
        assert_eq!(number_property(&f, "c"), None);
        assert_eq!(number_property(&f, "d"), None);
    }

    #[test]
    fn rejects_bare_geometry() {
        let json = serde_json::json!({ "type": "Point", "coordinates": [101.6, 3.1] });
        assert!(matches!(
            parse_feature_collection(&json.to_string()),
            Err(LoaderError::Conversion { .. })
        ));
    }
}
