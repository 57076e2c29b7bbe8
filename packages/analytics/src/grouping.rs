//! Categorical grouping of stores by brand and geography.
//!
//! Missing labels fold into the `"Unknown"` bucket, so every grouping
//! accounts for every store in the batch.

use std::collections::BTreeMap;

use retail_map_analytics_models::{CountMap, GeographyField};
use retail_map_network_models::Store;
use retail_map_spatial::DistrictAssignment;

fn increment(map: &mut CountMap, label: &str) {
    *map.entry(label.to_string()).or_insert(0) += 1;
}

/// Store count per brand.
#[must_use]
pub fn brand_composition(stores: &[Store]) -> CountMap {
    let mut composition = CountMap::new();
    for store in stores {
        increment(&mut composition, store.brand_label());
    }
    composition
}

/// Store count per value of a geographic field.
///
/// For [`GeographyField::District`] with a containment assignment, a store
/// inside a district polygon counts toward that district. Any other store
/// falls back to its own district field, then to `"Unknown"`.
#[must_use]
pub fn group_by_geography(
    stores: &[Store],
    field: GeographyField,
    districts: Option<&DistrictAssignment>,
) -> CountMap {
    let mut grouped = CountMap::new();

    match field {
        GeographyField::District => {
            for (idx, store) in stores.iter().enumerate() {
                let resolved = districts
                    .and_then(|assignment| assignment.geography(idx))
                    .map(|geography| geography.district.as_str());
                increment(&mut grouped, resolved.unwrap_or_else(|| store.district_label()));
            }
        }
        GeographyField::State => {
            for store in stores {
                increment(&mut grouped, store.state_label());
            }
        }
    }

    grouped
}

/// Store count per brand within each state.
#[must_use]
pub fn group_by_state_and_brand(stores: &[Store]) -> BTreeMap<String, CountMap> {
    let mut grouped: BTreeMap<String, CountMap> = BTreeMap::new();
    for store in stores {
        let brands = grouped.entry(store.state_label().to_string()).or_default();
        increment(brands, store.brand_label());
    }
    grouped
}
