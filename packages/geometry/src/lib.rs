#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Geometry primitives for the retail network engine.
//!
//! Haversine great-circle distance on a spherical Earth and
//! point-in-polygon containment over district boundaries. Containment
//! delegates to [`geo::Contains`], which treats points lying exactly on
//! a ring as *not* contained. Malformed boundaries never contain anything.

use geo::{Contains, LineString, MultiPolygon, Polygon};
use retail_map_network_models::Point;
use thiserror::Error;

/// Mean Earth radius in kilometers.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Reasons a boundary cannot take part in containment tests.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BoundaryError {
    /// The boundary has no polygons at all.
    #[error("boundary has no polygons")]
    Empty,

    /// A ring holds a NaN or infinite coordinate.
    #[error("polygon {polygon} has a non-finite coordinate")]
    NonFinite {
        /// Index of the offending polygon.
        polygon: usize,
    },

    /// A ring has fewer than three distinct vertices.
    #[error("polygon {polygon} has a degenerate ring")]
    DegenerateRing {
        /// Index of the offending polygon.
        polygon: usize,
    },
}

/// Great-circle distance between two points in kilometers (Haversine).
///
/// NaN inputs propagate to a NaN result.
#[must_use]
pub fn distance_km(a: Point, b: Point) -> f64 {
    let d_lat = (b.latitude - a.latitude).to_radians();
    let d_lon = (b.longitude - a.longitude).to_radians();

    let h = (d_lat / 2.0).sin().powi(2)
        + a.latitude.to_radians().cos()
            * b.latitude.to_radians().cos()
            * (d_lon / 2.0).sin().powi(2);

    let c = 2.0 * h.sqrt().atan2((1.0 - h).sqrt());
    EARTH_RADIUS_KM * c
}

/// Checks that a boundary is usable for containment tests.
///
/// # Errors
///
/// Returns [`BoundaryError`] describing the first problem found.
pub fn validate_boundary(boundary: &MultiPolygon<f64>) -> Result<(), BoundaryError> {
    if boundary.0.is_empty() {
        return Err(BoundaryError::Empty);
    }

    for (idx, polygon) in boundary.0.iter().enumerate() {
        for ring in rings(polygon) {
            if !ring.coords().all(|c| c.x.is_finite() && c.y.is_finite()) {
                return Err(BoundaryError::NonFinite { polygon: idx });
            }
            if distinct_vertices(ring) < 3 {
                return Err(BoundaryError::DegenerateRing { polygon: idx });
            }
        }
    }

    Ok(())
}

/// Returns `true` if the point lies strictly inside the boundary.
///
/// Interior rings are holes. Points on a ring edge or vertex are outside.
/// A non-finite point or a boundary rejected by [`validate_boundary`] is
/// never contained.
#[must_use]
pub fn point_in_polygon(point: Point, boundary: &MultiPolygon<f64>) -> bool {
    if !point.is_finite() || validate_boundary(boundary).is_err() {
        return false;
    }
    contains_unchecked(point, boundary)
}

/// Containment test for a boundary already known to pass
/// [`validate_boundary`]. Skips re-validation on hot paths.
#[must_use]
pub fn contains_unchecked(point: Point, boundary: &MultiPolygon<f64>) -> bool {
    if !point.is_finite() {
        return false;
    }
    boundary.contains(&geo::Point::new(point.longitude, point.latitude))
}

fn rings(polygon: &Polygon<f64>) -> impl Iterator<Item = &LineString<f64>> {
    std::iter::once(polygon.exterior()).chain(polygon.interiors())
}

fn distinct_vertices(ring: &LineString<f64>) -> usize {
    let coords = &ring.0;
    let open = match (coords.first(), coords.last()) {
        (Some(first), Some(last)) if coords.len() > 1 && first == last => {
            &coords[..coords.len() - 1]
        }
        _ => &coords[..],
    };

    let mut seen: Vec<geo::Coord<f64>> = Vec::with_capacity(open.len());
    for c in open {
        if !seen.contains(c) {
            seen.push(*c);
        }
        if seen.len() >= 3 {
            break;
        }
    }
    seen.len()
}
