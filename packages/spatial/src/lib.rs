#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! District containment assignment.
//!
//! Builds an R-tree over district polygons and assigns each store to the
//! first district, in collection order, whose polygon contains it. Stores
//! outside every polygon are left out of all buckets. Results can be
//! memoized in a [`DistrictAssignmentCache`] keyed by input content.

pub mod cache;

use std::collections::BTreeMap;

use geo::{BoundingRect, MultiPolygon};
use retail_map_geometry::{contains_unchecked, validate_boundary};
use retail_map_network_models::{District, Point, ResolvedGeography, Store, district_key};
use rstar::{AABB, RTree, RTreeObject};

pub use cache::{DistrictAssignmentCache, DistrictCacheKey};

/// A district polygon stored in the R-tree with its collection position.
struct DistrictEntry {
    position: usize,
    envelope: AABB<[f64; 2]>,
    polygon: MultiPolygon<f64>,
}

impl RTreeObject for DistrictEntry {
    type Envelope = AABB<[f64; 2]>;

    fn envelope(&self) -> Self::Envelope {
        self.envelope
    }
}

/// Spatial index over a district collection.
///
/// Districts with malformed boundaries are logged and left out of the
/// index, so they never contain any store.
pub struct DistrictIndex {
    tree: RTree<DistrictEntry>,
}

impl DistrictIndex {
    /// Builds the index from a district collection.
    #[must_use]
    pub fn build(districts: &[District]) -> Self {
        let mut entries = Vec::with_capacity(districts.len());

        for (position, district) in districts.iter().enumerate() {
            if let Err(e) = validate_boundary(&district.boundary) {
                log::warn!(
                    "Skipping district '{}' in containment checks: {e}",
                    district.name
                );
                continue;
            }

            entries.push(DistrictEntry {
                position,
                envelope: compute_envelope(&district.boundary),
                polygon: district.boundary.clone(),
            });
        }

        let index = Self {
            tree: RTree::bulk_load(entries),
        };

        log::debug!(
            "Indexed {} of {} districts for containment",
            index.len(),
            districts.len()
        );

        index
    }

    /// Collection position of the first district containing the point.
    ///
    /// Overlapping polygons resolve to the one listed first.
    #[must_use]
    pub fn lookup(&self, point: Point) -> Option<usize> {
        if !point.is_finite() {
            return None;
        }

        let query_env = AABB::from_point([point.longitude, point.latitude]);

        self.tree
            .locate_in_envelope_intersecting(&query_env)
            .filter(|entry| contains_unchecked(point, &entry.polygon))
            .map(|entry| entry.position)
            .min()
    }

    /// Number of districts taking part in containment checks.
    #[must_use]
    pub fn len(&self) -> usize {
        self.tree.size()
    }

    /// Returns `true` if no district is usable.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tree.size() == 0
    }
}

/// Stores contained in one district.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DistrictBucket {
    /// District name as first seen in the collection.
    pub name: String,
    /// State of the district.
    pub state: Option<String>,
    /// Indices of contained stores, in store batch order.
    pub stores: Vec<usize>,
}

/// District name to store indices, plus the geography resolved per store.
///
/// Every named district in the collection has a bucket, even when empty.
/// Districts sharing a name (case-insensitively) share a bucket.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DistrictAssignment {
    buckets: Vec<DistrictBucket>,
    by_key: BTreeMap<String, usize>,
    geography: Vec<Option<ResolvedGeography>>,
}

impl DistrictAssignment {
    /// All buckets in district collection order.
    #[must_use]
    pub fn buckets(&self) -> &[DistrictBucket] {
        &self.buckets
    }

    /// Bucket for a district name (case-insensitive).
    #[must_use]
    pub fn bucket(&self, name: &str) -> Option<&DistrictBucket> {
        self.by_key
            .get(&district_key(name))
            .map(|&idx| &self.buckets[idx])
    }

    /// Number of stores contained in the named district.
    #[must_use]
    pub fn store_count(&self, name: &str) -> usize {
        self.bucket(name).map_or(0, |b| b.stores.len())
    }

    /// Number of districts holding at least one store.
    #[must_use]
    pub fn populated_count(&self) -> usize {
        self.buckets.iter().filter(|b| !b.stores.is_empty()).count()
    }

    /// Geography resolved for the store at `store_index`.
    #[must_use]
    pub fn geography(&self, store_index: usize) -> Option<&ResolvedGeography> {
        self.geography.get(store_index).and_then(Option::as_ref)
    }

    /// Number of stores that landed in some district.
    #[must_use]
    pub fn assigned_count(&self) -> usize {
        self.geography.iter().flatten().count()
    }

    /// Returns annotated copies of `stores` with resolved district/state.
    ///
    /// Stores that were not contained in any district are copied unchanged.
    #[must_use]
    pub fn annotate(&self, stores: &[Store]) -> Vec<Store> {
        stores
            .iter()
            .enumerate()
            .map(|(idx, store)| {
                self.geography(idx)
                    .map_or_else(|| store.clone(), |g| store.with_geography(g))
            })
            .collect()
    }
}

/// Assigns each store to the first district whose polygon contains it.
///
/// With a cache, a result computed earlier for identical inputs is
/// returned instead of recomputing.
#[must_use]
pub fn assign_stores_to_districts(
    stores: &[Store],
    districts: &[District],
    cache: Option<&mut DistrictAssignmentCache>,
) -> DistrictAssignment {
    let Some(cache) = cache else {
        return compute_assignment(stores, districts);
    };

    let key = DistrictCacheKey::for_inputs(stores, districts);
    if let Some(hit) = cache.get(&key) {
        log::debug!("District assignment cache hit for {key}");
        return hit.clone();
    }

    let assignment = compute_assignment(stores, districts);
    cache.insert(key, assignment.clone());
    assignment
}

fn compute_assignment(stores: &[Store], districts: &[District]) -> DistrictAssignment {
    let mut buckets: Vec<DistrictBucket> = Vec::new();
    let mut by_key = BTreeMap::new();
    // district position -> bucket index
    let mut bucket_of = Vec::with_capacity(districts.len());

    for district in districts {
        let key = district.key();
        if key.is_empty() {
            bucket_of.push(None);
            continue;
        }
        let idx = *by_key.entry(key).or_insert_with(|| {
            buckets.push(DistrictBucket {
                name: district.name.clone(),
                state: district.state.clone(),
                stores: Vec::new(),
            });
            buckets.len() - 1
        });
        bucket_of.push(Some(idx));
    }

    let index = DistrictIndex::build(districts);
    let mut geography = vec![None; stores.len()];
    if index.is_empty() {
        log::debug!("No usable district boundaries, {} stores unassigned", stores.len());
        return DistrictAssignment {
            buckets,
            by_key,
            geography,
        };
    }

    for (store_idx, store) in stores.iter().enumerate() {
        let Some(position) = index.lookup(store.point) else {
            continue;
        };
        // An unnamed first match still swallows the store.
        let Some(bucket_idx) = bucket_of[position] else {
            continue;
        };

        let district = &districts[position];
        buckets[bucket_idx].stores.push(store_idx);
        geography[store_idx] = Some(ResolvedGeography {
            district: district.name.clone(),
            state: district.state.clone().filter(|s| !s.is_empty()),
        });
    }

    log::debug!(
        "Assigned {} of {} stores to {} districts",
        geography.iter().flatten().count(),
        stores.len(),
        buckets.len()
    );

    DistrictAssignment {
        buckets,
        by_key,
        geography,
    }
}

/// Compute the bounding box envelope for a [`MultiPolygon`].
fn compute_envelope(mp: &MultiPolygon<f64>) -> AABB<[f64; 2]> {
    mp.bounding_rect().map_or_else(
        || AABB::from_point([0.0, 0.0]),
        |rect| AABB::from_corners([rect.min().x, rect.min().y], [rect.max().x, rect.max().y]),
    )
}

#[cfg(test)]
pub(crate) mod test_support {
    use geo::{LineString, MultiPolygon, Polygon};
    use retail_map_network_models::{District, Point, Store};

    pub fn square(min_lon: f64, min_lat: f64, max_lon: f64, max_lat: f64) -> MultiPolygon<f64> {
        MultiPolygon(vec![Polygon::new(
            LineString::from(vec![
                (min_lon, min_lat),
                (max_lon, min_lat),
                (max_lon, max_lat),
                (min_lon, max_lat),
                (min_lon, min_lat),
            ]),
            vec![],
        )])
    }

    pub fn district(name: &str, state: &str, boundary: MultiPolygon<f64>) -> District {
        District {
            name: name.to_string(),
            state: Some(state.to_string()),
            boundary,
            population_k: Some(100.0),
            income_per_capita: None,
            income: None,
        }
    }

    pub fn store(lat: f64, lon: f64) -> Store {
        Store::new(Point::new(lat, lon), "Test")
    }
}
