//! Single-slot cache for district assignments.
//!
//! Keyed by an MD5 digest over everything the assignment depends on: store
//! coordinates, district names, states, and boundary coordinates. Two
//! batches with equal content share a key regardless of where they live
//! in memory, so a rebuilt batch never serves stale results.

use retail_map_network_models::{District, Store};

use crate::DistrictAssignment;

/// Content digest of a (stores, districts) input pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DistrictCacheKey([u8; 16]);

impl DistrictCacheKey {
    /// Computes the key for an input pair.
    #[must_use]
    pub fn for_inputs(stores: &[Store], districts: &[District]) -> Self {
        let mut context = md5::Context::new();

        context.consume((stores.len() as u64).to_le_bytes());
        for store in stores {
            context.consume(store.point.latitude.to_le_bytes());
            context.consume(store.point.longitude.to_le_bytes());
        }

        context.consume((districts.len() as u64).to_le_bytes());
        for district in districts {
            consume_str(&mut context, &district.name);
            consume_str(&mut context, district.state.as_deref().unwrap_or_default());

            context.consume((district.boundary.0.len() as u64).to_le_bytes());
            for polygon in &district.boundary.0 {
                context.consume((polygon.interiors().len() as u64).to_le_bytes());
                let rings = std::iter::once(polygon.exterior()).chain(polygon.interiors());
                for ring in rings {
                    context.consume((ring.0.len() as u64).to_le_bytes());
                    for coord in &ring.0 {
                        context.consume(coord.x.to_le_bytes());
                        context.consume(coord.y.to_le_bytes());
                    }
                }
            }
        }

        Self(context.finalize().0)
    }
}

impl std::fmt::Display for DistrictCacheKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for byte in &self.0 {
            write!(f, "{byte:02x}")?;
        }
        Ok(())
    }
}

fn consume_str(context: &mut md5::Context, value: &str) {
    context.consume((value.len() as u64).to_le_bytes());
    context.consume(value.as_bytes());
}

/// Holds at most one district assignment. The last insert wins.
#[derive(Debug, Default)]
pub struct DistrictAssignmentCache {
    slot: Option<(DistrictCacheKey, DistrictAssignment)>,
    hits: u64,
}

impl DistrictAssignmentCache {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Cached assignment for `key`, if the slot holds it.
    pub fn get(&mut self, key: &DistrictCacheKey) -> Option<&DistrictAssignment> {
        match &self.slot {
            Some((cached, assignment)) if cached == key => {
                self.hits += 1;
                Some(assignment)
            }
            _ => None,
        }
    }

    /// Stores an assignment, replacing whatever the slot held.
    pub fn insert(&mut self, key: DistrictCacheKey, assignment: DistrictAssignment) {
        self.slot = Some((key, assignment));
    }

    /// Drops the cached entry if it belongs to `key`.
    ///
    /// Returns `true` if an entry was dropped.
    pub fn invalidate(&mut self, key: &DistrictCacheKey) -> bool {
        if self.slot.as_ref().is_some_and(|(cached, _)| cached == key) {
            self.slot = None;
            true
        } else {
            false
        }
    }

    /// Empties the cache.
    pub fn clear(&mut self) {
        self.slot = None;
    }

    /// Key of the cached entry, if any.
    #[must_use]
    pub fn cached_key(&self) -> Option<DistrictCacheKey> {
        self.slot.as_ref().map(|(key, _)| *key)
    }

    /// Number of lookups served from the slot.
    #[must_use]
    pub const fn hits(&self) -> u64 {
        self.hits
    }
}

#[cfg(test)]
mod tests {
    use crate::test_support::{district, square, store};

    use super::*;

    #[test]
    fn equal_content_gives_equal_keys() {
        let a = vec![store(3.1, 101.6)];
        let b = vec![store(3.1, 101.6)];
        let districts = vec![district("Petaling", "Selangor", square(101.5, 3.0, 101.7, 3.2))];

        assert_eq!(
            DistrictCacheKey::for_inputs(&a, &districts),
            DistrictCacheKey::for_inputs(&b, &districts)
        );
    }

    #[test]
    fn moving_a_store_changes_the_key() {
        let districts = vec![district("Petaling", "Selangor", square(101.5, 3.0, 101.7, 3.2))];

        assert_ne!(
            DistrictCacheKey::for_inputs(&[store(3.1, 101.6)], &districts),
            DistrictCacheKey::for_inputs(&[store(3.1, 101.61)], &districts)
        );
    }

    #[test]
    fn renaming_a_district_changes_the_key() {
        let stores = vec![store(3.1, 101.6)];
        let before = vec![district("Petaling", "Selangor", square(101.5, 3.0, 101.7, 3.2))];
        let after = vec![district("Gombak", "Selangor", square(101.5, 3.0, 101.7, 3.2))];

        assert_ne!(
            DistrictCacheKey::for_inputs(&stores, &before),
            DistrictCacheKey::for_inputs(&stores, &after)
        );
    }

    #[test]
    fn invalidate_only_drops_matching_key() {
        let districts = vec![district("Petaling", "Selangor", square(101.5, 3.0, 101.7, 3.2))];
        let key_a = DistrictCacheKey::for_inputs(&[store(3.1, 101.6)], &districts);
        let key_b = DistrictCacheKey::for_inputs(&[store(3.2, 101.6)], &districts);

        let mut cache = DistrictAssignmentCache::new();
        cache.insert(key_a, DistrictAssignment::default());

        assert!(!cache.invalidate(&key_b));
        assert_eq!(cache.cached_key(), Some(key_a));
        assert!(cache.invalidate(&key_a));
        assert!(cache.get(&key_a).is_none());
    }

    #[test]
    fn clear_empties_the_slot() {
        let key = DistrictCacheKey::for_inputs(&[], &[]);
        let mut cache = DistrictAssignmentCache::new();
        cache.insert(key, DistrictAssignment::default());

        cache.clear();
        assert!(cache.cached_key().is_none());
        assert_eq!(cache.hits(), 0);
    }

    #[test]
    fn key_renders_as_hex() {
        let key = DistrictCacheKey::for_inputs(&[], &[]);
        let rendered = key.to_string();
        assert_eq!(rendered.len(), 32);
        assert!(rendered.chars().all(|c| c.is_ascii_hexdigit()));
    }
}
