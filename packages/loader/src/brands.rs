//! Brand labels and display colors.

use std::collections::BTreeMap;

/// Color used for brands missing from the palette.
pub const DEFAULT_BRAND_COLOR: &str = "#666666";

/// Built-in brand colors. Several brands appear under more than one
/// spelling because store files are named inconsistently.
const BUILTIN_BRAND_COLORS: &[(&str, &str)] = &[
    // Retail chains
    ("MR DIY", "#FFC82E"),
    ("Mr DIY", "#FFC82E"),
    ("Mr_DIY", "#FFC82E"),
    ("MR Toy", "#E53935"),
    ("Mr Toy", "#E53935"),
    ("Mr_Toy", "#E53935"),
    ("Eco Shop", "#4CAF50"),
    ("Eco-Shop", "#4CAF50"),
    ("99 SpeedMart", "#FF9800"),
    ("99 Speedmart", "#FF9800"),
    // Convenience stores
    ("7-Eleven", "#00A859"),
    ("7-eleven", "#00A859"),
    ("711", "#00A859"),
    ("Family Mart", "#00BFA5"),
    ("FamilyMart", "#00BFA5"),
    ("MyNews", "#D50000"),
    ("MyNews Mart", "#D50000"),
    ("My News", "#D50000"),
    ("KK Mart", "#FB8C00"),
    ("KK Super Mart", "#FB8C00"),
    ("KKMart", "#FB8C00"),
    // Food and beverages
    ("Oriental Kopi", "#6D4C41"),
    ("OldTown White Coffee", "#8D6E63"),
    ("Old Town White Coffee", "#8D6E63"),
    ("OldTown", "#8D6E63"),
    ("Tea Garden", "#81C784"),
    ("TeaGarden", "#81C784"),
    ("Memang Meow", "#9C27B0"),
    ("MemangMeow", "#9C27B0"),
    // Fast fashion
    ("Padini", "#000000"),
    ("H&M", "#C8102E"),
    ("HM", "#C8102E"),
    ("Uniqlo", "#E60012"),
    ("HLA", "#002F6C"),
    // Department stores
    ("Parkson", "#8E44AD"),
    ("Aeon", "#A0008E"),
    ("AEON", "#A0008E"),
    // Gold shops
    ("Tomei", "#FF6B6B"),
    ("Poh Kong", "#4ECDC4"),
    ("Habib Jewels", "#9B59B6"),
    ("Habib", "#9B59B6"),
    ("Wah Chan", "#F39C12"),
    // Markers
    ("Distribution Center", "#2196F3"),
    ("DC", "#2196F3"),
];

/// Brand label for a store file: the file name without its `.geojson`
/// extension, with underscores read as spaces.
///
/// `"Mr_DIY.geojson"` becomes `"Mr DIY"`.
#[must_use]
pub fn brand_from_filename(file_name: &str) -> String {
    file_name.replacen(".geojson", "", 1).replace('_', " ")
}

/// Lower-cases and strips whitespace, underscores, and hyphens.
fn normalize(brand: &str) -> String {
    brand
        .chars()
        .filter(|c| !c.is_whitespace() && *c != '_' && *c != '-')
        .flat_map(char::to_lowercase)
        .collect()
}

/// Brand to display color lookup.
#[derive(Debug, Clone)]
pub struct BrandPalette {
    exact: BTreeMap<String, String>,
    normalized: BTreeMap<String, String>,
}

impl Default for BrandPalette {
    fn default() -> Self {
        Self::builtin()
    }
}

impl BrandPalette {
    /// The built-in palette.
    #[must_use]
    pub fn builtin() -> Self {
        let mut palette = Self {
            exact: BTreeMap::new(),
            normalized: BTreeMap::new(),
        };
        for (brand, color) in BUILTIN_BRAND_COLORS {
            palette.insert(brand, color);
        }
        palette
    }

    /// The built-in palette extended with `overrides`. An override for a
    /// brand already in the palette replaces its color.
    #[must_use]
    pub fn with_overrides(overrides: &BTreeMap<String, String>) -> Self {
        let mut palette = Self::builtin();
        for (brand, color) in overrides {
            palette.exact.insert(brand.clone(), color.clone());
            palette.normalized.insert(normalize(brand), color.clone());
        }
        palette
    }

    fn insert(&mut self, brand: &str, color: &str) {
        self.exact.insert(brand.to_string(), color.to_string());
        // first spelling wins
        self.normalized
            .entry(normalize(brand))
            .or_insert_with(|| color.to_string());
    }

    /// Color for `brand`: exact match, then normalized match, then
    /// [`DEFAULT_BRAND_COLOR`].
    #[must_use]
    pub fn color_for(&self, brand: &str) -> &str {
        if brand.is_empty() {
            return DEFAULT_BRAND_COLOR;
        }
        if let Some(color) = self.exact.get(brand) {
            return color;
        }
        if let Some(color) = self.normalized.get(&normalize(brand)) {
            return color;
        }
        log::debug!("No color found for brand: {brand}, using default");
        DEFAULT_BRAND_COLOR
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn brand_from_filename_strips_extension_and_underscores() {
        assert_eq!(brand_from_filename("Mr_DIY.geojson"), "Mr DIY");
        assert_eq!(brand_from_filename("99 SpeedMart.geojson"), "99 SpeedMart");
        assert_eq!(brand_from_filename("Eco-Shop.geojson"), "Eco-Shop");
        assert_eq!(brand_from_filename("Tea_Garden"), "Tea Garden");
    }

    #[test]
    fn exact_then_normalized_then_default() {
        let palette = BrandPalette::builtin();
        assert_eq!(palette.color_for("Mr DIY"), "#FFC82E");
        assert_eq!(palette.color_for("mr-diy"), "#FFC82E");
        assert_eq!(palette.color_for("Oldtown White_Coffee"), "#8D6E63");
        assert_eq!(palette.color_for("Family  Mart"), "#00BFA5");
        assert_eq!(palette.color_for("Brand Nobody Heard Of"), DEFAULT_BRAND_COLOR);
        assert_eq!(palette.color_for(""), DEFAULT_BRAND_COLOR);
    }

    #[test]
    fn overrides_replace_and_extend() {
        let overrides = BTreeMap::from([
            ("Padini".to_string(), "#123456".to_string()),
            ("Watsons".to_string(), "#00A0A0".to_string()),
        ]);
        let palette = BrandPalette::with_overrides(&overrides);
        assert_eq!(palette.color_for("Padini"), "#123456");
        assert_eq!(palette.color_for("watsons"), "#00A0A0");
        assert_eq!(palette.color_for("Uniqlo"), "#E60012");
    }
}
