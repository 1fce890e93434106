//! Filter, sort and paginate pipeline over the catalog.
//!
//! A product is shown iff it passes every active facet. Within a facet the
//! selected values are OR-ed; a facet with no selection passes everything.
//! The matching products are then stably sorted and sliced into a page.
//!
//! ```
//! use luxe_core::{Catalog, FilterState, PipelineOptions, SortKey, filter};
//!
//! let catalog = Catalog::seed();
//! let mut state = FilterState::default();
//! state.facets.price.push("0-100".parse().unwrap());
//! state.sort = SortKey::PriceLow;
//!
//! let page = filter::run(&catalog, &state, &PipelineOptions::default());
//! assert_eq!(page.total_matches, 2);
//! assert_eq!(page.items[0].name, "Geometric Silk Scarf");
//! ```

use core::fmt;
use core::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::catalog::{Catalog, Category, MAX_RATING, Product};

/// Products per page when nothing else is configured.
pub const DEFAULT_PER_PAGE: usize = 8;

/// Errors from parsing filter tokens.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FilterError {
    #[error("invalid price range '{0}', expected 'min-max'")]
    InvalidPriceRange(String),
    #[error("invalid minimum rating '{0}'")]
    InvalidRating(String),
    #[error("invalid category '{0}'")]
    InvalidCategory(String),
    #[error("unknown filter dimension '{0}'")]
    UnknownDimension(String),
    #[error("unknown sort key '{0}'")]
    UnknownSort(String),
}

/// Whether a price range includes its upper bound.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UpperBound {
    #[default]
    Inclusive,
    Exclusive,
}

impl FromStr for UpperBound {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "inclusive" => Ok(Self::Inclusive),
            "exclusive" => Ok(Self::Exclusive),
            other => Err(format!("expected 'inclusive' or 'exclusive', got '{other}'")),
        }
    }
}

/// Knobs that differed between storefront variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PipelineOptions {
    pub upper_bound: UpperBound,
    /// Also match the search term against the category name.
    pub search_category: bool,
}

/// A `"min-max"` price range token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PriceRange {
    min: Decimal,
    max: Decimal,
}

impl PriceRange {
    /// Create a range; the bounds are swapped if given in reverse.
    #[must_use]
    pub fn new(min: Decimal, max: Decimal) -> Self {
        if min <= max {
            Self { min, max }
        } else {
            Self { min: max, max: min }
        }
    }

    #[must_use]
    pub const fn min(&self) -> Decimal {
        self.min
    }

    #[must_use]
    pub const fn max(&self) -> Decimal {
        self.max
    }

    #[must_use]
    pub fn contains(&self, price: Decimal, upper: UpperBound) -> bool {
        price >= self.min
            && match upper {
                UpperBound::Inclusive => price <= self.max,
                UpperBound::Exclusive => price < self.max,
            }
    }
}

impl FromStr for PriceRange {
    type Err = FilterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || FilterError::InvalidPriceRange(s.to_string());
        let (min, max) = s.trim().split_once('-').ok_or_else(invalid)?;
        let min = Decimal::from_str(min.trim()).map_err(|_| invalid())?;
        let max = Decimal::from_str(max.trim()).map_err(|_| invalid())?;
        if min > max {
            return Err(invalid());
        }
        Ok(Self { min, max })
    }
}

impl fmt::Display for PriceRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.min.normalize(), self.max.normalize())
    }
}

impl TryFrom<String> for PriceRange {
    type Error = FilterError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<PriceRange> for String {
    fn from(range: PriceRange) -> Self {
        range.to_string()
    }
}

/// Parse a minimum-rating token such as `"4"` or `"4.5"`.
///
/// # Errors
///
/// Returns `FilterError::InvalidRating` for non-numeric tokens or values
/// outside 0-5.
pub fn parse_rating(token: &str) -> Result<f64, FilterError> {
    token
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|r| (0.0..=MAX_RATING).contains(r))
        .ok_or_else(|| FilterError::InvalidRating(token.to_string()))
}

/// One independent facet of the catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dimension {
    Category,
    Price,
    Size,
    Color,
    Rating,
}

impl FromStr for Dimension {
    type Err = FilterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "category" => Ok(Self::Category),
            "price" => Ok(Self::Price),
            "size" => Ok(Self::Size),
            "color" => Ok(Self::Color),
            "rating" => Ok(Self::Rating),
            other => Err(FilterError::UnknownDimension(other.to_string())),
        }
    }
}

/// Selected values per facet.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Facets {
    pub category: Vec<Category>,
    pub price: Vec<PriceRange>,
    pub size: Vec<String>,
    pub color: Vec<String>,
    pub rating: Vec<f64>,
}

impl Facets {
    /// Build facets from `(dimension, value)` control tokens.
    ///
    /// # Errors
    ///
    /// Returns the first malformed token.
    pub fn from_tokens<'a, I>(tokens: I) -> Result<Self, FilterError>
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let mut facets = Self::default();
        for (dimension, value) in tokens {
            facets.select(dimension.parse()?, value)?;
        }
        Ok(facets)
    }

    /// Add a value to a facet, ignoring duplicates.
    ///
    /// # Errors
    ///
    /// Returns an error if `value` is not valid for `dimension`.
    pub fn select(&mut self, dimension: Dimension, value: &str) -> Result<(), FilterError> {
        match dimension {
            Dimension::Category => {
                let category = value
                    .parse::<Category>()
                    .map_err(|_| FilterError::InvalidCategory(value.to_string()))?;
                push_unique(&mut self.category, category);
            }
            Dimension::Price => push_unique(&mut self.price, value.parse()?),
            Dimension::Size => push_unique(&mut self.size, value.trim().to_string()),
            Dimension::Color => push_unique(&mut self.color, value.trim().to_string()),
            Dimension::Rating => push_unique(&mut self.rating, parse_rating(value)?),
        }
        Ok(())
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.category.is_empty()
            && self.price.is_empty()
            && self.size.is_empty()
            && self.color.is_empty()
            && self.rating.is_empty()
    }

    /// Whether `product` passes every active facet.
    #[must_use]
    pub fn matches(&self, product: &Product, options: &PipelineOptions) -> bool {
        let category = self.category.is_empty() || self.category.contains(&product.category);
        let price = self.price.is_empty()
            || self
                .price
                .iter()
                .any(|range| range.contains(product.price, options.upper_bound));
        let size = self.size.is_empty() || self.size.iter().any(|s| product.offers_size(s));
        let color = self.color.is_empty() || self.color.iter().any(|c| product.offers_color(c));
        let rating = self.rating.is_empty() || self.rating.iter().any(|min| product.rating >= *min);

        category && price && size && color && rating
    }
}

fn push_unique<T: PartialEq>(values: &mut Vec<T>, value: T) {
    if !values.contains(&value) {
        values.push(value);
    }
}

/// Product ordering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SortKey {
    #[serde(rename = "price-low")]
    PriceLow,
    #[serde(rename = "price-high")]
    PriceHigh,
    #[serde(rename = "rating")]
    Rating,
    /// Reverse catalog order; later entries count as newer.
    #[default]
    #[serde(rename = "newest")]
    Newest,
}

impl SortKey {
    pub const ALL: [Self; 4] = [Self::Newest, Self::PriceLow, Self::PriceHigh, Self::Rating];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::PriceLow => "price-low",
            Self::PriceHigh => "price-high",
            Self::Rating => "rating",
            Self::Newest => "newest",
        }
    }

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::PriceLow => "Price: Low to High",
            Self::PriceHigh => "Price: High to Low",
            Self::Rating => "Top Rated",
            Self::Newest => "Newest",
        }
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortKey {
    type Err = FilterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|k| k.as_str() == s.trim())
            .ok_or_else(|| FilterError::UnknownSort(s.to_string()))
    }
}

/// Everything that decides which products a visitor sees.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterState {
    pub facets: Facets,
    pub search: String,
    pub sort: SortKey,
    /// 1-based page cursor.
    pub page: usize,
    pub per_page: usize,
}

impl Default for FilterState {
    fn default() -> Self {
        Self {
            facets: Facets::default(),
            search: String::new(),
            sort: SortKey::default(),
            page: 1,
            per_page: DEFAULT_PER_PAGE,
        }
    }
}

impl FilterState {
    /// Replace the facets and go back to the first page.
    pub fn apply_facets(&mut self, facets: Facets) {
        self.facets = facets;
        self.page = 1;
    }

    /// Set the search term and go back to the first page.
    pub fn set_search(&mut self, term: &str) {
        term.trim().clone_into(&mut self.search);
        self.page = 1;
    }

    pub const fn set_sort(&mut self, sort: SortKey) {
        self.sort = sort;
    }

    /// Drop all facets and the search term. The sort order is kept.
    pub fn clear(&mut self) {
        self.facets = Facets::default();
        self.search.clear();
        self.page = 1;
    }

    /// Clear and select a single category.
    pub fn browse_category(&mut self, category: Category) {
        self.clear();
        self.facets.category.push(category);
    }

    /// Move the cursor by `delta` pages. Moves that would leave
    /// `1..=total_pages` are ignored. Returns whether the page changed.
    pub fn step_page(&mut self, delta: isize, total_pages: usize) -> bool {
        let Some(target) = self.page.checked_add_signed(delta) else {
            return false;
        };
        if target == self.page || target < 1 || target > total_pages.max(1) {
            return false;
        }
        self.page = target;
        true
    }

    /// Clamp the cursor into `1..=total_pages`.
    pub fn clamp_page(&mut self, total_pages: usize) {
        self.page = self.page.clamp(1, total_pages.max(1));
    }

    #[must_use]
    pub const fn effective_per_page(&self) -> usize {
        if self.per_page == 0 { 1 } else { self.per_page }
    }

    /// Whether a product passes the facets and the search term.
    #[must_use]
    pub fn matches(&self, product: &Product, options: &PipelineOptions) -> bool {
        self.facets.matches(product, options) && self.matches_search(product, options)
    }

    fn matches_search(&self, product: &Product, options: &PipelineOptions) -> bool {
        let term = self.search.trim();
        if term.is_empty() {
            return true;
        }
        let term = term.to_lowercase();
        product.name.to_lowercase().contains(&term)
            || product.description.to_lowercase().contains(&term)
            || (options.search_category && product.category.as_str().to_lowercase().contains(&term))
    }
}

/// One page of pipeline output.
#[derive(Debug, Clone, PartialEq)]
pub struct ProductPage<'a> {
    pub items: Vec<&'a Product>,
    /// Matches across all pages.
    pub total_matches: usize,
    /// Never less than 1, even with no matches.
    pub total_pages: usize,
    /// The clamped 1-based page actually returned.
    pub page: usize,
    pub per_page: usize,
}

impl ProductPage<'_> {
    #[must_use]
    pub const fn has_previous(&self) -> bool {
        self.page > 1
    }

    #[must_use]
    pub const fn has_next(&self) -> bool {
        self.page < self.total_pages
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// All matching products in display order, before pagination.
#[must_use]
pub fn matching<'a>(
    catalog: &'a Catalog,
    state: &FilterState,
    options: &PipelineOptions,
) -> Vec<&'a Product> {
    let mut matched: Vec<(usize, &Product)> = catalog
        .iter()
        .enumerate()
        .filter(|(_, product)| state.matches(product, options))
        .collect();

    // `sort_by` is stable, so ties keep catalog order.
    match state.sort {
        SortKey::PriceLow => matched.sort_by(|(_, a), (_, b)| a.price.cmp(&b.price)),
        SortKey::PriceHigh => matched.sort_by(|(_, a), (_, b)| b.price.cmp(&a.price)),
        SortKey::Rating => matched.sort_by(|(_, a), (_, b)| b.rating.total_cmp(&a.rating)),
        SortKey::Newest => matched.sort_by(|(ia, _), (ib, _)| ib.cmp(ia)),
    }

    matched.into_iter().map(|(_, product)| product).collect()
}

/// Number of pages for `matches` results, with a floor of one page.
#[must_use]
pub const fn page_count(matches: usize, per_page: usize) -> usize {
    let per_page = if per_page == 0 { 1 } else { per_page };
    let pages = matches.div_ceil(per_page);
    if pages == 0 { 1 } else { pages }
}

/// Run the full pipeline and return the requested (clamped) page.
#[must_use]
pub fn run<'a>(
    catalog: &'a Catalog,
    state: &FilterState,
    options: &PipelineOptions,
) -> ProductPage<'a> {
    let matched = matching(catalog, state, options);
    let per_page = state.effective_per_page();
    let total_matches = matched.len();
    let total_pages = page_count(total_matches, per_page);
    let page = state.page.clamp(1, total_pages);

    let items = matched
        .into_iter()
        .skip((page - 1) * per_page)
        .take(per_page)
        .collect();

    ProductPage {
        items,
        total_matches,
        total_pages,
        page,
        per_page,
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use crate::types::ProductId;

    fn catalog_with_prices(prices: &[i64]) -> Catalog {
        let products = prices
            .iter()
            .enumerate()
            .map(|(i, price)| Product {
                id: ProductId::new(format!("p{i}")),
                name: format!("Item {i}"),
                price: Decimal::new(*price, 0),
                category: Category::Men,
                description: String::new(),
                images: Vec::new(),
                sku: format!("SKU-{i}"),
                rating: 3.0,
                featured: false,
                colors: vec!["Black".to_string()],
                sizes: vec!["M".to_string()],
                stock: 1,
            })
            .collect();
        Catalog::new(products).unwrap()
    }

    fn prices(page: &ProductPage<'_>) -> Vec<Decimal> {
        page.items.iter().map(|p| p.price).collect()
    }

    fn ids(products: &[&Product]) -> Vec<String> {
        products.iter().map(|p| p.id.to_string()).collect()
    }

    #[test]
    fn test_price_range_filter_selects_cheap_product() {
        let catalog = catalog_with_prices(&[50, 150, 300]);
        let mut state = FilterState::default();
        state.facets.price.push("0-100".parse().unwrap());

        let page = run(&catalog, &state, &PipelineOptions::default());
        assert_eq!(prices(&page), [Decimal::new(50, 0)]);
        assert_eq!(page.total_matches, 1);
    }

    #[test]
    fn test_price_desc_on_unfiltered_set() {
        let catalog = catalog_with_prices(&[50, 150, 300]);
        let state = FilterState {
            sort: SortKey::PriceHigh,
            ..FilterState::default()
        };

        let page = run(&catalog, &state, &PipelineOptions::default());
        assert_eq!(
            prices(&page),
            [Decimal::new(300, 0), Decimal::new(150, 0), Decimal::new(50, 0)]
        );
    }

    #[test]
    fn test_empty_facets_return_full_catalog() {
        let catalog = Catalog::seed();
        let state = FilterState::default();
        let page = run(&catalog, &state, &PipelineOptions::default());
        assert_eq!(page.total_matches, catalog.len());
        assert_eq!(page.total_pages, 1);
    }

    #[test]
    fn test_upper_bound_policy() {
        let catalog = catalog_with_prices(&[100, 101]);
        let mut state = FilterState::default();
        state.facets.price.push("0-100".parse().unwrap());

        let inclusive = run(&catalog, &state, &PipelineOptions::default());
        assert_eq!(inclusive.total_matches, 1);

        let exclusive = run(
            &catalog,
            &state,
            &PipelineOptions {
                upper_bound: UpperBound::Exclusive,
                ..PipelineOptions::default()
            },
        );
        assert_eq!(exclusive.total_matches, 0);
    }

    #[test]
    fn test_dimensions_are_anded_values_are_ored() {
        let catalog = Catalog::seed();
        let facets = Facets::from_tokens([
            ("category", "Men"),
            ("category", "Women"),
            ("color", "Black"),
        ])
        .unwrap();
        let state = FilterState {
            facets,
            ..FilterState::default()
        };

        let matched = matching(&catalog, &state, &PipelineOptions::default());
        // Newest first: reverse catalog order.
        assert_eq!(ids(&matched), ["105", "104", "101"]);
    }

    #[test]
    fn test_rating_matches_any_minimum() {
        let catalog = Catalog::seed();
        let facets = Facets::from_tokens([("rating", "4.8"), ("rating", "5")]).unwrap();
        let state = FilterState {
            facets,
            sort: SortKey::Rating,
            ..FilterState::default()
        };

        let matched = matching(&catalog, &state, &PipelineOptions::default());
        assert_eq!(ids(&matched), ["103", "101"]);
    }

    #[test]
    fn test_size_facet() {
        let catalog = Catalog::seed();
        let facets = Facets::from_tokens([("size", "XL")]).unwrap();
        let state = FilterState {
            facets,
            sort: SortKey::PriceLow,
            ..FilterState::default()
        };
        let matched = matching(&catalog, &state, &PipelineOptions::default());
        assert_eq!(ids(&matched), ["104", "102"]);
    }

    #[test]
    fn test_search_is_case_insensitive_over_name_and_description() {
        let catalog = Catalog::seed();
        let mut state = FilterState::default();
        state.set_search("  SILK ");
        let matched = matching(&catalog, &state, &PipelineOptions::default());
        assert_eq!(ids(&matched), ["106", "101"]);

        state.set_search("italian leather");
        let matched = matching(&catalog, &state, &PipelineOptions::default());
        assert_eq!(ids(&matched), ["105"]);
    }

    #[test]
    fn test_search_category_option() {
        let catalog = Catalog::seed();
        let mut state = FilterState::default();
        state.set_search("accessories");

        assert!(matching(&catalog, &state, &PipelineOptions::default()).is_empty());

        let options = PipelineOptions {
            search_category: true,
            ..PipelineOptions::default()
        };
        assert_eq!(ids(&matching(&catalog, &state, &options)), ["106", "103"]);
    }

    #[test]
    fn test_sort_ascending_is_reverse_of_descending_for_distinct_prices() {
        let catalog = Catalog::seed();
        let asc = matching(
            &catalog,
            &FilterState {
                sort: SortKey::PriceLow,
                ..FilterState::default()
            },
            &PipelineOptions::default(),
        );
        let mut desc = matching(
            &catalog,
            &FilterState {
                sort: SortKey::PriceHigh,
                ..FilterState::default()
            },
            &PipelineOptions::default(),
        );
        desc.reverse();
        assert_eq!(ids(&asc), ids(&desc));
    }

    #[test]
    fn test_ties_keep_catalog_order() {
        let catalog = catalog_with_prices(&[20, 10, 20, 10]);
        let state = FilterState {
            sort: SortKey::PriceLow,
            ..FilterState::default()
        };
        assert_eq!(
            ids(&matching(&catalog, &state, &PipelineOptions::default())),
            ["p1", "p3", "p0", "p2"]
        );
    }

    #[test]
    fn test_pages_partition_the_match_set() {
        let catalog = catalog_with_prices(&[1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11]);
        for per_page in 1..=12 {
            let mut state = FilterState {
                per_page,
                sort: SortKey::PriceLow,
                ..FilterState::default()
            };
            let first = run(&catalog, &state, &PipelineOptions::default());
            assert_eq!(first.total_pages, 11_usize.div_ceil(per_page));

            let mut seen = Vec::new();
            for page in 1..=first.total_pages {
                state.page = page;
                let result = run(&catalog, &state, &PipelineOptions::default());
                assert!(result.items.len() <= per_page);
                seen.extend(prices(&result));
            }
            let all: Vec<Decimal> = (1..=11).map(|p| Decimal::new(p, 0)).collect();
            assert_eq!(seen, all, "per_page = {per_page}");
        }
    }

    #[test]
    fn test_out_of_range_page_is_clamped() {
        let catalog = catalog_with_prices(&[1, 2, 3]);
        let state = FilterState {
            per_page: 2,
            page: 9,
            ..FilterState::default()
        };
        let page = run(&catalog, &state, &PipelineOptions::default());
        assert_eq!(page.page, 2);
        assert_eq!(page.items.len(), 1);
        assert!(page.has_previous());
        assert!(!page.has_next());

        let state = FilterState {
            page: 0,
            ..state
        };
        assert_eq!(run(&catalog, &state, &PipelineOptions::default()).page, 1);
    }

    #[test]
    fn test_no_matches_is_one_empty_page() {
        let catalog = Catalog::seed();
        let mut state = FilterState::default();
        state.set_search("no such product");
        state.page = 3;
        let page = run(&catalog, &state, &PipelineOptions::default());
        assert_eq!(page.total_matches, 0);
        assert_eq!(page.total_pages, 1);
        assert_eq!(page.page, 1);
        assert!(page.is_empty());
    }

    #[test]
    fn test_zero_per_page_is_treated_as_one() {
        let catalog = catalog_with_prices(&[1, 2]);
        let state = FilterState {
            per_page: 0,
            ..FilterState::default()
        };
        let page = run(&catalog, &state, &PipelineOptions::default());
        assert_eq!(page.per_page, 1);
        assert_eq!(page.total_pages, 2);
    }

    #[test]
    fn test_step_page_stays_in_bounds() {
        let mut state = FilterState::default();
        assert!(!state.step_page(-1, 3));
        assert!(state.step_page(1, 3));
        assert!(state.step_page(1, 3));
        assert!(!state.step_page(1, 3));
        assert_eq!(state.page, 3);
    }

    #[test]
    fn test_facet_changes_reset_page() {
        let mut state = FilterState {
            page: 4,
            sort: SortKey::Rating,
            ..FilterState::default()
        };
        state.apply_facets(Facets::from_tokens([("color", "Red")]).unwrap());
        assert_eq!(state.page, 1);

        state.page = 2;
        state.browse_category(Category::Women);
        assert_eq!(state.page, 1);
        assert_eq!(state.facets.category, [Category::Women]);
        assert!(state.facets.color.is_empty());
        assert_eq!(state.sort, SortKey::Rating);
    }

    #[test]
    fn test_price_range_tokens() {
        let range: PriceRange = "100-250.50".parse().unwrap();
        assert_eq!(range.to_string(), "100-250.5");
        assert!("100".parse::<PriceRange>().is_err());
        assert!("abc-10".parse::<PriceRange>().is_err());
        assert!("300-100".parse::<PriceRange>().is_err());
        assert_eq!(
            serde_json::to_string(&"0-100".parse::<PriceRange>().unwrap()).unwrap(),
            "\"0-100\""
        );
    }

    #[test]
    fn test_from_tokens_rejects_bad_input() {
        assert!(matches!(
            Facets::from_tokens([("weight", "1kg")]),
            Err(FilterError::UnknownDimension(_))
        ));
        assert!(matches!(
            Facets::from_tokens([("rating", "7")]),
            Err(FilterError::InvalidRating(_))
        ));
        assert!(matches!(
            Facets::from_tokens([("category", "Kids")]),
            Err(FilterError::InvalidCategory(_))
        ));
    }

    #[test]
    fn test_filter_state_persists_in_original_shape() {
        let mut state = FilterState::default();
        state.facets = Facets::from_tokens([("category", "Men"), ("price", "0-100")]).unwrap();
        let json = serde_json::to_value(&state).unwrap();
        assert_eq!(json["facets"]["category"][0], "Men");
        assert_eq!(json["facets"]["price"][0], "0-100");
        assert_eq!(json["sort"], "newest");

        let restored: FilterState = serde_json::from_value(json).unwrap();
        assert_eq!(restored, state);
    }
}
