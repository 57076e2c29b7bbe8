#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Retail network record types.
//!
//! Stores, distribution centers, and districts as consumed by the
//! analytics engine. These are plain records: loaders produce them,
//! the spatial and analytics packages read them. None of the types here
//! know anything about rendering or file formats.

use geo::MultiPolygon;
use serde::{Deserialize, Serialize};

/// Bucket label used when a categorical field is missing or empty.
pub const UNKNOWN_LABEL: &str = "Unknown";

/// Returns the value if present and non-empty, otherwise [`UNKNOWN_LABEL`].
#[must_use]
pub fn label_or_unknown(value: Option<&str>) -> &str {
    value.filter(|s| !s.is_empty()).unwrap_or(UNKNOWN_LABEL)
}

/// Normalizes a district name for identity comparison.
///
/// District identity is name-based and case-insensitive.
#[must_use]
pub fn district_key(name: &str) -> String {
    name.trim().to_lowercase()
}

/// A WGS84 location in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Point {
    /// Latitude in degrees.
    pub latitude: f64,
    /// Longitude in degrees.
    pub longitude: f64,
}

impl Point {
    #[must_use]
    pub const fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Returns `true` if both coordinates are finite numbers.
    #[must_use]
    pub const fn is_finite(&self) -> bool {
        self.latitude.is_finite() && self.longitude.is_finite()
    }
}

/// A retail location.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Store {
    /// Store name as published by the brand.
    pub name: Option<String>,
    /// Street address.
    pub address: Option<String>,
    /// Store location.
    pub point: Point,
    /// Brand label (e.g. "Mr DIY").
    pub brand: Option<String>,
    /// Hex display color for the brand. Carried through, never computed here.
    pub brand_color: Option<String>,
    /// Resolved district name. Populated by containment assignment.
    pub district: Option<String>,
    /// Resolved state name. Populated by containment assignment.
    pub state: Option<String>,
}

impl Store {
    /// Creates a store with only a location and brand.
    #[must_use]
    pub fn new(point: Point, brand: impl Into<String>) -> Self {
        Self {
            name: None,
            address: None,
            point,
            brand: Some(brand.into()),
            brand_color: None,
            district: None,
            state: None,
        }
    }

    /// Brand label, falling back to [`UNKNOWN_LABEL`].
    #[must_use]
    pub fn brand_label(&self) -> &str {
        label_or_unknown(self.brand.as_deref())
    }

    /// State label, falling back to [`UNKNOWN_LABEL`].
    #[must_use]
    pub fn state_label(&self) -> &str {
        label_or_unknown(self.state.as_deref())
    }

    /// District label, falling back to [`UNKNOWN_LABEL`].
    #[must_use]
    pub fn district_label(&self) -> &str {
        label_or_unknown(self.district.as_deref())
    }

    /// Returns a copy of this store carrying the resolved geography.
    ///
    /// The state is only overwritten when the containing district has one.
    #[must_use]
    pub fn with_geography(&self, geography: &ResolvedGeography) -> Self {
        let mut store = self.clone();
        store.district = Some(geography.district.clone());
        if let Some(state) = &geography.state {
            store.state = Some(state.clone());
        }
        store
    }
}

/// A distribution center (DC).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DistributionCenter {
    /// Facility code (e.g. "DC-KL01").
    pub code: String,
    /// Facility name.
    pub name: String,
    /// Street address.
    pub address: String,
    /// Facility location.
    pub point: Point,
    /// State the facility is listed under.
    pub state: String,
}

impl DistributionCenter {
    /// Display name, falling back to a 1-based positional label.
    #[must_use]
    pub fn display_name(&self, index: usize) -> String {
        if self.name.is_empty() {
            format!("DC {}", index + 1)
        } else {
            self.name.clone()
        }
    }

    /// State label, falling back to [`UNKNOWN_LABEL`].
    #[must_use]
    pub fn state_label(&self) -> &str {
        label_or_unknown(Some(self.state.as_str()))
    }
}

/// An administrative district polygon with demographic attributes.
#[derive(Debug, Clone, PartialEq)]
pub struct District {
    /// District name. Identity is case-insensitive on this field.
    pub name: String,
    /// State the district belongs to.
    pub state: Option<String>,
    /// Boundary polygon(s), possibly with holes.
    pub boundary: MultiPolygon<f64>,
    /// Population in thousands.
    pub population_k: Option<f64>,
    /// Income per capita.
    pub income_per_capita: Option<f64>,
    /// Total income.
    pub income: Option<f64>,
}

impl District {
    /// Case-insensitive identity key for this district.
    #[must_use]
    pub fn key(&self) -> String {
        district_key(&self.name)
    }

    /// Population in thousands, if known and strictly positive.
    #[must_use]
    pub fn positive_population(&self) -> Option<f64> {
        self.population_k.filter(|p| p.is_finite() && *p > 0.0)
    }
}

/// Geography resolved for a store by containment assignment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedGeography {
    /// Name of the containing district.
    pub district: String,
    /// State of the containing district, if the district carries one.
    pub state: Option<String>,
}
