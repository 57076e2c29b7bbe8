use geo::{LineString, MultiPolygon, Polygon};
use retail_map_network_models::{District, DistributionCenter, Point, Store};

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

pub fn district(
    name: &str,
    state: &str,
    boundary: MultiPolygon<f64>,
    population_k: Option<f64>,
) -> District {
    District {
        name: name.to_string(),
        state: Some(state.to_string()),
        boundary,
        population_k,
        income_per_capita: None,
        income: None,
    }
}

pub fn store_at(lat: f64, lon: f64) -> Store {
    Store::new(Point::new(lat, lon), "Test")
}

pub fn branded(lat: f64, lon: f64, brand: &str) -> Store {
    Store::new(Point::new(lat, lon), brand)
}

pub fn dc(name: &str, state: &str, lat: f64, lon: f64) -> DistributionCenter {
    DistributionCenter {
        code: name.to_uppercase(),
        name: name.to_string(),
        address: String::new(),
        point: Point::new(lat, lon),
        state: state.to_string(),
    }
}
