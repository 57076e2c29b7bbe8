//! TOML catalog of store categories and shared district data.
//!
//! ```toml
//! [districts]
//! geometry = "District Data/malaysia.district.geojson"
//! statistics = "District Data/District Statistics.geojson"
//!
//! [analytics]
//! within_km = 25
//!
//! [[categories]]
//! name = "MR DIY + MR TOY"
//! data_dir = "Finalized Data/MR DIY + MR TOY"
//! store_files = ["Mr_DIY.geojson", "Mr_Toy.geojson"]
//! dc_file = "DC/mr_diy_distribution_centers.json"
//! ```
//!
//! Relative paths resolve against the directory holding the catalog file.

use std::{
    collections::BTreeMap,
    path::{Path, PathBuf},
};

use retail_map_analytics::AnalyticsSettings;
use retail_map_network_models::{District, DistributionCenter, Store};
use serde::{Deserialize, Serialize};

use crate::{
    LoaderError, brands::BrandPalette, districts::load_districts,
    facilities::load_distribution_centers, read_file, stores::load_store_file,
};

/// Where the district geometry and statistics files live.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DistrictSources {
    pub geometry: PathBuf,
    pub statistics: PathBuf,
}

/// One store category, e.g. "Fast Fashion".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryConfig {
    pub name: String,
    /// Directory holding this category's files.
    pub data_dir: PathBuf,
    /// Store `GeoJSON` file names inside `data_dir`, one per brand.
    pub store_files: Vec<String>,
    /// DC JSON file, relative to `data_dir`. Categories without one have
    /// no distribution centers.
    #[serde(default)]
    pub dc_file: Option<String>,
}

/// Parsed catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Catalog {
    pub districts: DistrictSources,
    #[serde(default)]
    pub analytics: AnalyticsSettings,
    /// Brand colors added to, or replacing, the built-in palette.
    #[serde(default)]
    pub brand_colors: BTreeMap<String, String>,
    #[serde(default)]
    pub categories: Vec<CategoryConfig>,
    /// Directory relative paths resolve against.
    #[serde(skip)]
    pub base_dir: PathBuf,
}

/// Everything loaded for one category.
#[derive(Debug, Clone, Default)]
pub struct CategoryData {
    pub name: String,
    pub stores: Vec<Store>,
    pub facilities: Vec<DistributionCenter>,
    pub districts: Vec<District>,
}

/// Parses catalog TOML. Relative paths resolve against `base_dir`.
///
/// # Errors
///
/// * If the TOML is malformed or misses required fields
pub fn parse_catalog(toml_str: &str, base_dir: &Path) -> Result<Catalog, LoaderError> {
    let mut catalog: Catalog = toml::from_str(toml_str)?;
    catalog.base_dir = base_dir.to_path_buf();
    Ok(catalog)
}

impl Catalog {
    /// Reads and parses a catalog file.
    ///
    /// # Errors
    ///
    /// * If the file cannot be read
    /// * If the TOML is malformed or misses required fields
    pub fn load(path: &Path) -> Result<Self, LoaderError> {
        let base_dir = path.parent().unwrap_or_else(|| Path::new("."));
        parse_catalog(&read_file(path)?, base_dir)
    }

    /// Category names in catalog order.
    #[must_use]
    pub fn category_names(&self) -> Vec<&str> {
        self.categories.iter().map(|c| c.name.as_str()).collect()
    }

    /// Looks up a category by exact name.
    #[must_use]
    pub fn category(&self, name: &str) -> Option<&CategoryConfig> {
        self.categories.iter().find(|c| c.name == name)
    }

    /// Brand palette with this catalog's overrides applied.
    #[must_use]
    pub fn palette(&self) -> BrandPalette {
        BrandPalette::with_overrides(&self.brand_colors)
    }

    fn resolve(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.base_dir.join(path)
        }
    }

    /// Loads a category's stores, DCs, and the shared districts.
    ///
    /// A store file, DC file, or district file that fails to load is
    /// logged and left out so the remaining data can still be analyzed.
    ///
    /// # Errors
    ///
    /// * If the catalog has no category called `name`
    pub fn load_category(&self, name: &str) -> Result<CategoryData, LoaderError> {
        let category = self
            .category(name)
            .ok_or_else(|| LoaderError::UnknownCategory {
                name: name.to_string(),
            })?;

        log::info!("Loading stores for category: {name}");
        let palette = self.palette();
        let data_dir = self.resolve(&category.data_dir);

        let mut stores = Vec::new();
        for file in &category.store_files {
            match load_store_file(&data_dir.join(file), &palette) {
                Ok(mut loaded) => stores.append(&mut loaded),
                Err(e) => log::warn!("Could not load {file}: {e}"),
            }
        }
        log::info!("Loaded {} stores for {name}", stores.len());

        let facilities = match &category.dc_file {
            Some(dc_file) => load_distribution_centers(&data_dir.join(dc_file)).unwrap_or_else(|e| {
                log::warn!("Could not load distribution centers for {name}: {e}");
                Vec::new()
            }),
            None => Vec::new(),
        };

        let districts = load_districts(
            &self.resolve(&self.districts.geometry),
            &self.resolve(&self.districts.statistics),
        )
        .unwrap_or_else(|e| {
            log::warn!("Could not load district data: {e}");
            Vec::new()
        });

        Ok(CategoryData {
            name: category.name.clone(),
            stores,
            facilities,
            districts,
        })
    }
}
