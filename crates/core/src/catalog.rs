//! Product catalog.
//!
//! The catalog is a fixed, ordered list of products loaded once at startup.
//! Catalog order matters: the "newest" sort is defined in terms of it.

use std::collections::HashSet;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::types::ProductId;

/// Highest rating a product can carry.
pub const MAX_RATING: f64 = 5.0;

/// Errors raised while loading a catalog.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("invalid catalog JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("duplicate product id: {0}")]
    DuplicateId(ProductId),
    #[error("product {id} has rating {rating}, expected 0-5")]
    RatingOutOfRange { id: ProductId, rating: f64 },
    #[error("product {0} has a negative price")]
    NegativePrice(ProductId),
}

/// Product department.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Category {
    Men,
    Women,
    Accessories,
}

impl Category {
    /// All categories in navigation order.
    pub const ALL: [Self; 3] = [Self::Men, Self::Women, Self::Accessories];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Men => "Men",
            Self::Women => "Women",
            Self::Accessories => "Accessories",
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|c| c.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("invalid category: {s}"))
    }
}

/// A catalog entry. Never mutated after the catalog is loaded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    /// Price in the base currency (USD).
    pub price: Decimal,
    pub category: Category,
    pub description: String,
    #[serde(default)]
    pub images: Vec<String>,
    pub sku: String,
    pub rating: f64,
    #[serde(default)]
    pub featured: bool,
    pub colors: Vec<String>,
    pub sizes: Vec<String>,
    #[serde(default)]
    pub stock: u32,
}

impl Product {
    /// First listed image, if any.
    #[must_use]
    pub fn primary_image(&self) -> Option<&str> {
        self.images.first().map(String::as_str)
    }

    #[must_use]
    pub fn offers_size(&self, size: &str) -> bool {
        self.sizes.iter().any(|s| s == size)
    }

    #[must_use]
    pub fn offers_color(&self, color: &str) -> bool {
        self.colors.iter().any(|c| c == color)
    }

    /// Rating rounded to whole stars, for star displays.
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn stars(&self) -> u8 {
        self.rating.clamp(0.0, MAX_RATING).round() as u8
    }
}

/// Ordered, immutable product list.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    products: Vec<Product>,
}

impl Catalog {
    /// Build a catalog, validating ids, ratings and prices.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError` on duplicate ids, ratings outside 0-5 or
    /// negative prices.
    pub fn new(products: Vec<Product>) -> Result<Self, CatalogError> {
        let mut seen = HashSet::with_capacity(products.len());
        for product in &products {
            if !seen.insert(&product.id) {
                return Err(CatalogError::DuplicateId(product.id.clone()));
            }
            if !(0.0..=MAX_RATING).contains(&product.rating) {
                return Err(CatalogError::RatingOutOfRange {
                    id: product.id.clone(),
                    rating: product.rating,
                });
            }
            if product.price.is_sign_negative() {
                return Err(CatalogError::NegativePrice(product.id.clone()));
            }
        }
        Ok(Self { products })
    }

    /// Load a catalog from a JSON array of products.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::Json` on malformed input, or any validation
    /// error from [`Catalog::new`].
    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        let products: Vec<Product> = serde_json::from_str(json)?;
        Self::new(products)
    }

    #[must_use]
    pub fn find(&self, id: &ProductId) -> Option<&Product> {
        self.products.iter().find(|p| &p.id == id)
    }

    /// Index of a product in catalog order.
    #[must_use]
    pub fn position(&self, id: &ProductId) -> Option<usize> {
        self.products.iter().position(|p| &p.id == id)
    }

    /// The first `limit` featured products, in catalog order.
    #[must_use]
    pub fn featured(&self, limit: usize) -> Vec<&Product> {
        self.products.iter().filter(|p| p.featured).take(limit).collect()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Product> {
        self.products.iter()
    }

    #[must_use]
    pub fn products(&self) -> &[Product] {
        &self.products
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.products.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }

    /// Distinct sizes across the catalog, in first-seen order.
    #[must_use]
    pub fn sizes(&self) -> Vec<&str> {
        distinct(self.products.iter().flat_map(|p| p.sizes.iter()))
    }

    /// Distinct colors across the catalog, in first-seen order.
    #[must_use]
    pub fn colors(&self) -> Vec<&str> {
        distinct(self.products.iter().flat_map(|p| p.colors.iter()))
    }

    /// The demo catalog shipped with the storefront.
    #[must_use]
    pub fn seed() -> Self {
        Self {
            products: seed_products(),
        }
    }
}

impl<'a> IntoIterator for &'a Catalog {
    type Item = &'a Product;
    type IntoIter = std::slice::Iter<'a, Product>;

    fn into_iter(self) -> Self::IntoIter {
        self.products.iter()
    }
}

fn distinct<'a>(values: impl Iterator<Item = &'a String>) -> Vec<&'a str> {
    let mut seen = HashSet::new();
    values
        .map(String::as_str)
        .filter(|v| seen.insert(*v))
        .collect()
}

/// Build a seed product; `images` are image search terms.
#[allow(clippy::too_many_arguments)]
fn product(
    id: &str,
    name: &str,
    price_cents: i64,
    category: Category,
    description: &str,
    images: &[&str],
    sku: &str,
    rating: f64,
    featured: bool,
    colors: &[&str],
    sizes: &[&str],
    stock: u32,
) -> Product {
    const IMAGE_BASE: &str = "https://source.unsplash.com/random/400x400/?";
    let owned = |values: &[&str]| -> Vec<String> { values.iter().map(|v| (*v).to_string()).collect() };
    Product {
        id: ProductId::from(id),
        name: name.to_string(),
        price: Decimal::new(price_cents, 2),
        category,
        description: description.to_string(),
        images: images.iter().map(|q| format!("{IMAGE_BASE}{q}")).collect(),
        sku: sku.to_string(),
        rating,
        featured,
        colors: owned(colors),
        sizes: owned(sizes),
        stock,
    }
}

fn seed_products() -> Vec<Product> {
    vec![
        product(
            "101",
            "Classic Silk Trench Coat",
            49_900,
            Category::Women,
            "An enduring classic, crafted from luxurious silk-blend fabric. Features a belted waist and oversized lapels.",
            &["coat,woman", "trench,coat"],
            "W-TC-001",
            4.8,
            true,
            &["Black", "Beige"],
            &["S", "M", "L"],
            12,
        ),
        product(
            "102",
            "Wool Cashmere Sweater",
            18_999,
            Category::Men,
            "A supremely soft wool-cashmere blend sweater. Perfect for layering in transitional weather.",
            &["sweater,man", "cashmere,sweater"],
            "M-SW-005",
            4.5,
            true,
            &["Gray", "Blue"],
            &["S", "M", "L", "XL"],
            25,
        ),
        product(
            "103",
            "Diamond Stud Earrings",
            85_000,
            Category::Accessories,
            "Elegant 1ct simulated diamond stud earrings set in 18k white gold.",
            &["jewelry,earrings"],
            "A-JR-010",
            5.0,
            false,
            &["White"],
            &["OS"],
            5,
        ),
        product(
            "104",
            "Slim Fit Denim Jeans",
            9_500,
            Category::Men,
            "Premium quality slim-fit denim jeans with natural fading. Comfortable and durable.",
            &["denim,jeans", "jeans,fashion"],
            "M-DN-002",
            4.2,
            true,
            &["Blue", "Black"],
            &["S", "M", "L", "XL"],
            40,
        ),
        product(
            "105",
            "Leather Crossbody Bag",
            24_000,
            Category::Women,
            "Italian leather crossbody bag with polished hardware and adjustable strap.",
            &["bag,leather", "crossbody,bag"],
            "W-BG-003",
            4.7,
            false,
            &["Black", "Red"],
            &["OS"],
            18,
        ),
        product(
            "106",
            "Geometric Silk Scarf",
            6_500,
            Category::Accessories,
            "100% silk scarf featuring a unique geometric print. Adds a refined touch to any outfit.",
            &["scarf,silk"],
            "A-SF-001",
            4.6,
            false,
            &["Blue", "Red"],
            &["OS"],
            30,
        ),
    ]
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_seed_catalog_is_valid() {
        let seed = Catalog::seed();
        let validated = Catalog::new(seed.products().to_vec()).unwrap();
        assert_eq!(validated.len(), 6);
    }

    #[test]
    fn test_featured_respects_limit_and_order() {
        let catalog = Catalog::seed();
        let ids: Vec<_> = catalog.featured(2).iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, ["101", "102"]);
        assert_eq!(catalog.featured(10).len(), 3);
    }

    #[test]
    fn test_find_and_position() {
        let catalog = Catalog::seed();
        let id = ProductId::from("104");
        assert_eq!(catalog.find(&id).unwrap().name, "Slim Fit Denim Jeans");
        assert_eq!(catalog.position(&id), Some(3));
        assert!(catalog.find(&ProductId::from("999")).is_none());
    }

    #[test]
    fn test_from_json_rejects_duplicates() {
        let json = r#"[
            {"id":"1","name":"A","price":"10.00","category":"Men","description":"","sku":"A","rating":4.0,"colors":["Red"],"sizes":["M"]},
            {"id":"1","name":"B","price":"12.00","category":"Women","description":"","sku":"B","rating":3.0,"colors":["Red"],"sizes":["M"]}
        ]"#;
        assert!(matches!(
            Catalog::from_json(json),
            Err(CatalogError::DuplicateId(_))
        ));
    }

    #[test]
    fn test_from_json_rejects_bad_rating() {
        let json = r#"[
            {"id":"1","name":"A","price":"10.00","category":"Men","description":"","sku":"A","rating":5.5,"colors":[],"sizes":[]}
        ]"#;
        assert!(matches!(
            Catalog::from_json(json),
            Err(CatalogError::RatingOutOfRange { .. })
        ));
    }

    #[test]
    fn test_distinct_facet_values() {
        let catalog = Catalog::seed();
        assert_eq!(catalog.sizes(), ["S", "M", "L", "XL", "OS"]);
        assert_eq!(catalog.colors(), ["Black", "Beige", "Gray", "Blue", "White", "Red"]);
    }

    #[test]
    fn test_category_parse() {
        assert_eq!("women".parse::<Category>().unwrap(), Category::Women);
        assert!("Kids".parse::<Category>().is_err());
    }
}
