#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Nearest distribution center assignment.
//!
//! Every store is assigned to the facility with the smallest Haversine
//! distance. The scan is brute force over all store/facility pairs, which
//! is plenty for a few thousand stores against tens of facilities.

use retail_map_geometry::distance_km;
use retail_map_network_models::{DistributionCenter, Store};
use serde::{Deserialize, Serialize};

/// The facility a single store is served by.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoreAssignment {
    /// Index of the nearest facility in the facility batch.
    pub facility_index: usize,
    /// Distance to that facility in kilometers.
    pub distance_km: f64,
}

/// Result of assigning a store batch to a facility batch.
///
/// Indexed by position in the input slices. Empty when no facilities
/// were supplied.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FacilityAssignment {
    stores: Vec<Option<StoreAssignment>>,
    members: Vec<Vec<usize>>,
}

impl FacilityAssignment {
    /// Assignment for the store at `store_index`, if any.
    #[must_use]
    pub fn assignment(&self, store_index: usize) -> Option<&StoreAssignment> {
        self.stores.get(store_index).and_then(Option::as_ref)
    }

    /// Indices of stores served by the facility at `facility_index`,
    /// in store batch order.
    #[must_use]
    pub fn members(&self, facility_index: usize) -> &[usize] {
        self.members
            .get(facility_index)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Distances of every store served by `facility_index`.
    #[must_use]
    pub fn member_distances(&self, facility_index: usize) -> Vec<f64> {
        self.members(facility_index)
            .iter()
            .filter_map(|&idx| self.assignment(idx))
            .map(|a| a.distance_km)
            .collect()
    }

    /// All assigned stores in store batch order.
    pub fn assigned(&self) -> impl Iterator<Item = (usize, &StoreAssignment)> {
        self.stores
            .iter()
            .enumerate()
            .filter_map(|(idx, a)| a.as_ref().map(|a| (idx, a)))
    }

    /// Number of facilities the batch was assigned against.
    #[must_use]
    pub fn facility_count(&self) -> usize {
        self.members.len()
    }

    /// Number of stores that received an assignment.
    #[must_use]
    pub fn assigned_count(&self) -> usize {
        self.stores.iter().flatten().count()
    }

    /// Returns `true` if no store was assigned.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.assigned_count() == 0
    }
}

/// Assigns each store to its nearest facility.
///
/// Ties go to the facility seen first. A store whose distance to every
/// facility is NaN (non-finite coordinates) stays unassigned.
#[must_use]
pub fn assign_stores_to_facilities(
    stores: &[Store],
    facilities: &[DistributionCenter],
) -> FacilityAssignment {
    if facilities.is_empty() {
        return FacilityAssignment::default();
    }

    let mut members = vec![Vec::new(); facilities.len()];
    let assignments = stores
        .iter()
        .enumerate()
        .map(|(store_idx, store)| {
            let nearest = nearest_facility(store, facilities)?;
            members[nearest.facility_index].push(store_idx);
            Some(nearest)
        })
        .collect::<Vec<_>>();

    if log::log_enabled!(log::Level::Debug) {
        let summary = members
            .iter()
            .enumerate()
            .map(|(idx, m)| format!("DC {idx}: {} stores", m.len()))
            .collect::<Vec<_>>()
            .join(", ");
        log::debug!(
            "Assigned {} stores to {} DCs. Summary: {summary}",
            stores.len(),
            facilities.len()
        );
    }

    FacilityAssignment {
        stores: assignments,
        members,
    }
}

fn nearest_facility(store: &Store, facilities: &[DistributionCenter]) -> Option<StoreAssignment> {
    let mut best: Option<StoreAssignment> = None;

    for (facility_index, facility) in facilities.iter().enumerate() {
        let distance = distance_km(store.point, facility.point);
        let closer = match best {
            None => distance < f64::INFINITY,
            Some(current) => distance < current.distance_km,
        };
        if closer {
            best = Some(StoreAssignment {
                facility_index,
                distance_km: distance,
            });
        }
    }

    best
}

#[cfg(test)]
mod tests {
    use retail_map_network_models::Point;

    use super::*;

    fn store(lat: f64, lon: f64) -> Store {
        Store::new(Point::new(lat, lon), "Test")
    }

    fn dc(name: &str, lat: f64, lon: f64) -> DistributionCenter {
        DistributionCenter {
            code: name.to_uppercase(),
            name: name.to_string(),
            address: String::new(),
            point: Point::new(lat, lon),
            state: "Selangor".to_string(),
        }
    }

    #[test]
    fn no_facilities_yields_empty_assignment() {
        let result = assign_stores_to_facilities(&[store(3.0, 101.0)], &[]);
        assert!(result.is_empty());
        assert_eq!(result.facility_count(), 0);
        assert!(result.assignment(0).is_none());
    }

    #[test]
    fn every_store_gets_the_minimum_distance() {
        let stores = vec![
            store(3.10, 101.60),
            store(3.20, 101.70),
            store(5.40, 100.30),
            store(1.50, 103.70),
            store(2.20, 102.25),
        ];
        let dcs = vec![
            dc("klang", 3.04, 101.45),
            dc("penang", 5.35, 100.40),
            dc("johor", 1.49, 103.74),
        ];

        let result = assign_stores_to_facilities(&stores, &dcs);
        assert_eq!(result.assigned_count(), stores.len());

        for (idx, s) in stores.iter().enumerate() {
            let assignment = result.assignment(idx).unwrap();
            let brute_min = dcs
                .iter()
                .map(|d| distance_km(s.point, d.point))
                .fold(f64::INFINITY, f64::min);
            assert!((assignment.distance_km - brute_min).abs() < f64::EPSILON);
            assert!(result.members(assignment.facility_index).contains(&idx));
        }
    }

    #[test]
    fn ties_go_to_first_facility() {
        let stores = vec![store(0.0, 0.0)];
        let dcs = vec![dc("east", 0.0, 1.0), dc("west", 0.0, -1.0)];

        let result = assign_stores_to_facilities(&stores, &dcs);
        assert_eq!(result.assignment(0).unwrap().facility_index, 0);
        assert!(result.members(1).is_empty());
    }

    #[test]
    fn members_preserve_store_order() {
        let stores = vec![store(3.0, 101.0), store(5.0, 100.0), store(3.1, 101.1)];
        let dcs = vec![dc("central", 3.05, 101.05), dc("north", 5.0, 100.0)];

        let result = assign_stores_to_facilities(&stores, &dcs);
        assert_eq!(result.members(0), &[0, 2]);
        assert_eq!(result.members(1), &[1]);
        assert_eq!(result.member_distances(1), vec![0.0]);
    }

    #[test]
    fn non_finite_store_stays_unassigned() {
        let stores = vec![store(f64::NAN, 101.0), store(3.0, 101.0)];
        let dcs = vec![dc("central", 3.0, 101.0)];

        let result = assign_stores_to_facilities(&stores, &dcs);
        assert!(result.assignment(0).is_none());
        assert!(result.assignment(1).is_some());
        assert_eq!(result.assigned().count(), 1);
    }
}
