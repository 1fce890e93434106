//! Display models for templates.
//!
//! Templates only print strings and booleans. Every price is converted to
//! the visitor's currency and formatted here, and every "is this option
//! selected" question is answered here.

use luxe_core::{
    CartLine, Category, ClientState, CurrencyCode, FilterState, Notice, Order, OrderStatus,
    PriceRange, Product, ProductPage, ShippingMethod, SortKey, Totals, format_price,
};
use url::form_urlencoded;

use crate::error::Result;
use crate::middleware::Visitor;

/// Price filter options offered in the shop sidebar.
pub const PRICE_RANGES: &[(&str, &str)] = &[
    ("0-100", "Under $100"),
    ("100-250", "$100 - $250"),
    ("250-500", "$250 - $500"),
    ("500-1000", "$500 - $1,000"),
];

/// Minimum-rating filter options.
pub const RATING_OPTIONS: &[(&str, &str)] = &[("4.5", "4.5 stars & up"), ("4", "4 stars & up")];

/// Products shown on the home page.
pub const FEATURED_LIMIT: usize = 4;

// =============================================================================
// Layout
// =============================================================================

pub struct NoticeView {
    pub level: &'static str,
    pub message: String,
}

impl From<Notice> for NoticeView {
    fn from(notice: Notice) -> Self {
        Self {
            level: notice.level.as_str(),
            message: notice.message,
        }
    }
}

pub struct SelectOption {
    pub value: String,
    pub label: String,
    pub selected: bool,
}

/// Header, footer and toast data shared by every page.
pub struct Layout {
    pub title: String,
    /// Path of the current page, used as the redirect target of header forms.
    pub path: String,
    pub currencies: Vec<SelectOption>,
    pub categories: Vec<&'static str>,
    pub cart_count: u32,
    pub wishlist_count: usize,
    pub dark_mode: bool,
    pub user_name: Option<String>,
    pub is_admin: bool,
    pub notice: Option<NoticeView>,
}

impl Layout {
    /// Build the layout and consume any flashed notice.
    ///
    /// # Errors
    ///
    /// Returns an error if the session store fails.
    pub async fn build(visitor: &Visitor, title: &str, path: &str) -> Result<Self> {
        let notice = visitor.take_notice().await?.map(NoticeView::from);
        let state = visitor.state();
        Ok(Self::from_state(state, title, path, notice))
    }

    #[must_use]
    pub fn from_state(
        state: &ClientState,
        title: &str,
        path: &str,
        notice: Option<NoticeView>,
    ) -> Self {
        let currencies = CurrencyCode::ALL
            .into_iter()
            .map(|c| SelectOption {
                value: c.code().to_string(),
                label: format!("{} {}", c.symbol(), c.code()),
                selected: c == state.currency,
            })
            .collect();

        Self {
            title: title.to_string(),
            path: path.to_string(),
            currencies,
            categories: Category::ALL.into_iter().map(Category::as_str).collect(),
            cart_count: state.cart.item_count(),
            wishlist_count: state.wishlist.len(),
            dark_mode: state.dark_mode,
            user_name: state.user.as_ref().map(|u| u.name.clone()),
            is_admin: state.user.as_ref().is_some_and(luxe_core::SessionUser::is_admin),
            notice,
        }
    }
}

// =============================================================================
// Products
// =============================================================================

/// "★★★★☆" for a product's rounded rating.
#[must_use]
pub fn stars(product: &Product) -> String {
    let filled = usize::from(product.stars());
    let empty = 5usize.saturating_sub(filled);
    format!("{}{}", "★".repeat(filled), "☆".repeat(empty))
}

pub struct ProductCard {
    pub id: String,
    pub url: String,
    pub name: String,
    pub category: &'static str,
    pub price: String,
    pub image: String,
    pub stars: String,
    pub rating: String,
    pub in_wishlist: bool,
}

impl ProductCard {
    #[must_use]
    pub fn new(product: &Product, state: &ClientState) -> Self {
        Self {
            id: product.id.to_string(),
            url: format!("/products/{}", product.id),
            name: product.name.clone(),
            category: product.category.as_str(),
            price: format_price(product.price, state.currency),
            image: product.primary_image().unwrap_or_default().to_string(),
            stars: stars(product),
            rating: format!("{:.1}", product.rating),
            in_wishlist: state.wishlist.contains(&product.id),
        }
    }

    #[must_use]
    pub fn list<'a>(products: impl IntoIterator<Item = &'a Product>, state: &ClientState) -> Vec<Self> {
        products.into_iter().map(|p| Self::new(p, state)).collect()
    }
}

pub struct ProductDetail {
    pub card: ProductCard,
    pub description: String,
    pub images: Vec<String>,
    pub sku: String,
    pub sizes: Vec<String>,
    pub colors: Vec<String>,
    pub stock: u32,
    pub in_stock: bool,
}

impl ProductDetail {
    #[must_use]
    pub fn new(product: &Product, state: &ClientState) -> Self {
        Self {
            card: ProductCard::new(product, state),
            description: product.description.clone(),
            images: product.images.clone(),
            sku: product.sku.clone(),
            sizes: product.sizes.clone(),
            colors: product.colors.clone(),
            stock: product.stock,
            in_stock: product.stock > 0,
        }
    }
}

// =============================================================================
// Shop
// =============================================================================

pub struct FacetGroup {
    /// Query parameter name.
    pub name: &'static str,
    pub label: &'static str,
    pub options: Vec<SelectOption>,
}

pub struct PageLink {
    pub number: usize,
    pub url: String,
    pub current: bool,
}

pub struct Pagination {
    pub page: usize,
    pub total_pages: usize,
    pub total_matches: usize,
    pub previous_url: Option<String>,
    pub next_url: Option<String>,
    pub pages: Vec<PageLink>,
}

impl Pagination {
    #[must_use]
    pub fn new(page: &ProductPage<'_>, filters: &FilterState) -> Self {
        let pages = (1..=page.total_pages)
            .map(|number| PageLink {
                number,
                url: shop_url(filters, number),
                current: number == page.page,
            })
            .collect();

        Self {
            page: page.page,
            total_pages: page.total_pages,
            total_matches: page.total_matches,
            previous_url: page
                .has_previous()
                .then(|| shop_url(filters, page.page - 1)),
            next_url: page.has_next().then(|| shop_url(filters, page.page + 1)),
            pages,
        }
    }
}

/// Shop URL that rebuilds `filters` at `page`.
#[must_use]
pub fn shop_url(filters: &FilterState, page: usize) -> String {
    let mut query = form_urlencoded::Serializer::new(String::new());
    for category in &filters.facets.category {
        query.append_pair("category", category.as_str());
    }
    for range in &filters.facets.price {
        query.append_pair("price", &range.to_string());
    }
    for size in &filters.facets.size {
        query.append_pair("size", size);
    }
    for color in &filters.facets.color {
        query.append_pair("color", color);
    }
    for rating in &filters.facets.rating {
        query.append_pair("rating", &rating.to_string());
    }
    if !filters.search.is_empty() {
        query.append_pair("q", &filters.search);
    }
    query.append_pair("sort", filters.sort.as_str());
    query.append_pair("page", &page.to_string());
    format!("/shop?{}", query.finish())
}

/// Sidebar facet groups with the visitor's selections checked.
#[must_use]
pub fn facet_groups(filters: &FilterState, sizes: &[&str], colors: &[&str]) -> Vec<FacetGroup> {
    let facets = &filters.facets;

    let categories = Category::ALL
        .into_iter()
        .map(|c| SelectOption {
            value: c.as_str().to_string(),
            label: c.as_str().to_string(),
            selected: facets.category.contains(&c),
        })
        .collect();

    let prices = PRICE_RANGES
        .iter()
        .map(|(value, label)| SelectOption {
            value: (*value).to_string(),
            label: (*label).to_string(),
            selected: value
                .parse::<PriceRange>()
                .is_ok_and(|range| facets.price.contains(&range)),
        })
        .collect();

    let strings = |values: &[&str], selected: &[String]| -> Vec<SelectOption> {
        values
            .iter()
            .map(|v| SelectOption {
                value: (*v).to_string(),
                label: (*v).to_string(),
                selected: selected.iter().any(|s| s == v),
            })
            .collect()
    };

    let ratings = RATING_OPTIONS
        .iter()
        .map(|(value, label)| SelectOption {
            value: (*value).to_string(),
            label: (*label).to_string(),
            selected: value
                .parse::<f64>()
                .is_ok_and(|r| facets.rating.iter().any(|s| (s - r).abs() < f64::EPSILON)),
        })
        .collect();

    vec![
        FacetGroup {
            name: "category",
            label: "Category",
            options: categories,
        },
        FacetGroup {
            name: "price",
            label: "Price",
            options: prices,
        },
        FacetGroup {
            name: "size",
            label: "Size",
            options: strings(sizes, &facets.size),
        },
        FacetGroup {
            name: "color",
            label: "Color",
            options: strings(colors, &facets.color),
        },
        FacetGroup {
            name: "rating",
            label: "Rating",
            options: ratings,
        },
    ]
}

#[must_use]
pub fn sort_options(current: SortKey) -> Vec<SelectOption> {
    SortKey::ALL
        .into_iter()
        .map(|k| SelectOption {
            value: k.as_str().to_string(),
            label: k.label().to_string(),
            selected: k == current,
        })
        .collect()
}

// =============================================================================
// Cart, checkout and orders
// =============================================================================

pub struct CartLineView {
    pub item_id: String,
    pub url: String,
    pub name: String,
    pub image: String,
    pub variant: String,
    pub quantity: u32,
    pub price: String,
    pub line_total: String,
}

impl CartLineView {
    #[must_use]
    pub fn new(line: &CartLine, currency: CurrencyCode) -> Self {
        let variant = [line.size.as_str(), line.color.as_str()]
            .into_iter()
            .filter(|v| !v.is_empty())
            .collect::<Vec<_>>()
            .join(" / ");

        Self {
            item_id: line.item_id.clone(),
            url: format!("/products/{}", line.product_id),
            name: line.name.clone(),
            image: line.image.clone().unwrap_or_default(),
            variant,
            quantity: line.quantity,
            price: format_price(line.price, currency),
            line_total: format_price(line.line_total(), currency),
        }
    }

    #[must_use]
    pub fn list(lines: &[CartLine], currency: CurrencyCode) -> Vec<Self> {
        lines.iter().map(|l| Self::new(l, currency)).collect()
    }
}

pub struct TotalsView {
    pub item_count: u32,
    pub subtotal: String,
    pub discount: Option<String>,
    pub coupon_code: Option<String>,
    pub shipping: String,
    pub tax: String,
    pub total: String,
}

impl TotalsView {
    #[must_use]
    pub fn new(totals: &Totals, state: &ClientState) -> Self {
        let currency = state.currency;
        let discount = (!totals.discount.is_zero())
            .then(|| format!("-{}", format_price(totals.discount, currency)));
        let shipping = match totals.shipping {
            None => "Calculated at next step".to_string(),
            Some(fee) if fee.is_zero() => "Free".to_string(),
            Some(fee) => format_price(fee, currency),
        };

        Self {
            item_count: totals.item_count,
            subtotal: format_price(totals.subtotal, currency),
            discount,
            coupon_code: state.coupon.as_ref().map(|c| c.code.clone()),
            shipping,
            tax: format_price(totals.tax, currency),
            total: format_price(totals.total, currency),
        }
    }
}

pub struct ShippingOption {
    pub value: &'static str,
    pub label: &'static str,
    pub fee: String,
    pub selected: bool,
}

#[must_use]
pub fn shipping_options(current: Option<ShippingMethod>, currency: CurrencyCode) -> Vec<ShippingOption> {
    let current = current.unwrap_or_default();
    ShippingMethod::ALL
        .into_iter()
        .map(|m| ShippingOption {
            value: m.as_str(),
            label: m.label(),
            fee: if m.fee().is_zero() {
                "Free".to_string()
            } else {
                format_price(m.fee(), currency)
            },
            selected: m == current,
        })
        .collect()
}

pub struct OrderView {
    pub id: String,
    pub date: String,
    pub total: String,
    pub item_count: u32,
    pub status: String,
    pub statuses: Vec<SelectOption>,
}

impl OrderView {
    /// Totals are shown in the currency the order was placed in.
    #[must_use]
    pub fn new(order: &Order) -> Self {
        let statuses = OrderStatus::ALL
            .into_iter()
            .map(|s| SelectOption {
                value: s.to_string().to_lowercase(),
                label: s.to_string(),
                selected: s == order.status,
            })
            .collect();

        Self {
            id: order.id.to_string(),
            date: order.placed_at.format("%Y-%m-%d").to_string(),
            total: format_price(order.totals.total, order.currency),
            item_count: order.totals.item_count,
            status: order.status.to_string(),
            statuses,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use luxe_core::{Catalog, Facets, ProductId};

    use super::*;

    #[test]
    fn test_shop_url_round_trips_through_query() {
        let mut filters = FilterState::default();
        filters.facets = Facets::from_tokens([("category", "Women"), ("price", "100-250")]).unwrap();
        filters.search = "silk coat".to_string();
        filters.sort = SortKey::PriceHigh;

        assert_eq!(
            shop_url(&filters, 2),
            "/shop?category=Women&price=100-250&q=silk+coat&sort=price-high&page=2"
        );
    }

    #[test]
    fn test_stars() {
        let catalog = Catalog::seed();
        let earrings = catalog.find(&ProductId::from("103")).unwrap();
        let jeans = catalog.find(&ProductId::from("104")).unwrap();
        assert_eq!(stars(earrings), "★★★★★");
        assert_eq!(stars(jeans), "★★★★☆");
    }

    #[test]
    fn test_facet_groups_mark_selected() {
        let mut filters = FilterState::default();
        filters.facets = Facets::from_tokens([("price", "0-100"), ("rating", "4.5")]).unwrap();

        let groups = facet_groups(&filters, &["S", "M"], &["Blue"]);
        let price = groups.iter().find(|g| g.name == "price").unwrap();
        assert!(price.options.iter().any(|o| o.value == "0-100" && o.selected));
        assert!(price.options.iter().filter(|o| o.selected).count() == 1);

        let rating = groups.iter().find(|g| g.name == "rating").unwrap();
        assert!(rating.options.iter().any(|o| o.value == "4.5" && o.selected));
        assert!(rating.options.iter().any(|o| o.value == "4" && !o.selected));
    }

    #[test]
    fn test_totals_view_before_shipping_is_chosen() {
        let state = ClientState::default();
        let view = TotalsView::new(&Totals::default(), &state);
        assert_eq!(view.shipping, "Calculated at next step");
        assert_eq!(view.total, "$0.00");
        assert!(view.discount.is_none());
    }
}
