//! Shop grid route handlers.
//!
//! `GET /shop` without a query string shows the visitor's stored filters.
//! With a query string the filters are rebuilt from it: repeated
//! `category`, `price`, `size`, `color` and `rating` parameters select
//! facet values, `q` is the search term, `sort` the sort key and `page` the
//! page cursor.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::{Path, RawQuery, State},
    response::Redirect,
};
use luxe_core::{Action, Category, Dimension, Facets, Notice, SortKey};
use tracing::instrument;
use url::form_urlencoded;

use crate::error::{AppError, Result};
use crate::middleware::Visitor;
use crate::state::AppState;
use crate::views::{
    FacetGroup, Layout, Pagination, ProductCard, SelectOption, facet_groups, shop_url,
    sort_options,
};

/// Shop page template.
#[derive(Template, WebTemplate)]
#[template(path = "shop.html")]
pub struct ShopTemplate {
    pub layout: Layout,
    pub products: Vec<ProductCard>,
    pub facets: Vec<FacetGroup>,
    pub sort_options: Vec<SelectOption>,
    pub search: String,
    pub pagination: Pagination,
    pub has_filters: bool,
}

/// Filters decoded from a shop query string.
#[derive(Debug, Default, PartialEq)]
pub struct ShopQuery {
    pub facets: Facets,
    pub search: String,
    pub sort: SortKey,
    pub page: usize,
    /// Tokens that were ignored, as visitor-facing messages.
    pub rejected: Vec<String>,
}

impl ShopQuery {
    /// Decode a raw query string. Bad tokens are skipped and reported in
    /// `rejected`; unknown parameters are ignored.
    #[must_use]
    pub fn parse(query: &str) -> Self {
        let mut parsed = Self {
            page: 1,
            ..Self::default()
        };

        for (key, value) in form_urlencoded::parse(query.as_bytes()) {
            let value = value.trim();
            if value.is_empty() {
                continue;
            }
            match key.as_ref() {
                "q" => value.clone_into(&mut parsed.search),
                "sort" => match value.parse() {
                    Ok(sort) => parsed.sort = sort,
                    Err(err) => parsed.rejected.push(format!("Ignored {err}.")),
                },
                "page" => parsed.page = value.parse().unwrap_or(1),
                other => {
                    let Ok(dimension) = other.parse::<Dimension>() else {
                        continue;
                    };
                    if let Err(err) = parsed.facets.select(dimension, value) {
                        parsed.rejected.push(format!("Ignored {err}."));
                    }
                }
            }
        }
        parsed
    }

    /// Actions that install these filters, in reducer order.
    #[must_use]
    pub fn into_actions(self) -> Vec<Action> {
        vec![
            Action::ApplyFilters(self.facets),
            Action::Search(self.search),
            Action::Sort(self.sort),
            Action::GoToPage(self.page),
        ]
    }
}

/// Display the product grid.
#[instrument(skip(state, visitor))]
pub async fn index(
    State(state): State<AppState>,
    mut visitor: Visitor,
    RawQuery(query): RawQuery,
) -> Result<ShopTemplate> {
    let store = state.store();

    if let Some(query) = query.filter(|q| !q.is_empty()) {
        let mut parsed = ShopQuery::parse(&query);
        let rejected = std::mem::take(&mut parsed.rejected);
        visitor.apply(store, parsed.into_actions()).await?;
        if let Some(message) = rejected.first() {
            tracing::warn!(rejected = ?rejected, "ignored shop query tokens");
            visitor.flash(&Notice::error(message.clone())).await?;
        }
    }

    let page = store.page(visitor.state_mut());
    visitor.save().await?;

    let filters = &visitor.state().filters;
    let catalog = store.catalog();
    let products = ProductCard::list(page.items.iter().copied(), visitor.state());
    let path = shop_url(filters, page.page);

    Ok(ShopTemplate {
        layout: Layout::build(&visitor, "Shop | Luxe", &path).await?,
        products,
        facets: facet_groups(filters, &catalog.sizes(), &catalog.colors()),
        sort_options: sort_options(filters.sort),
        search: filters.search.clone(),
        pagination: Pagination::new(&page, filters),
        has_filters: !filters.facets.is_empty() || !filters.search.is_empty(),
    })
}

/// Clear all filters and the search term.
#[instrument(skip(state, visitor))]
pub async fn clear(State(state): State<AppState>, mut visitor: Visitor) -> Result<Redirect> {
    visitor.dispatch(state.store(), Action::ClearFilters).await?;
    Ok(Redirect::to("/shop"))
}

/// Show a single category.
#[instrument(skip(state, visitor))]
pub async fn category(
    State(state): State<AppState>,
    mut visitor: Visitor,
    Path(name): Path<String>,
) -> Result<Redirect> {
    let category: Category = name
        .parse()
        .map_err(|_| AppError::NotFound(format!("category {name}")))?;
    visitor
        .dispatch(state.store(), Action::BrowseCategory(category))
        .await?;
    Ok(Redirect::to("/shop"))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use luxe_core::PriceRange;

    use super::*;

    #[test]
    fn test_parse_repeated_facets() {
        let query =
            ShopQuery::parse("category=Men&category=women&price=0-100&size=M&sort=rating&page=2");
        assert_eq!(query.facets.category, [Category::Men, Category::Women]);
        assert_eq!(query.facets.price, ["0-100".parse::<PriceRange>().unwrap()]);
        assert_eq!(query.facets.size, ["M"]);
        assert_eq!(query.sort, SortKey::Rating);
        assert_eq!(query.page, 2);
        assert!(query.rejected.is_empty());
    }

    #[test]
    fn test_parse_skips_bad_tokens() {
        let query = ShopQuery::parse(
            "price=cheap&rating=9&sort=random&utm_source=x&q=silk+scarf&page=abc",
        );
        assert!(query.facets.is_empty());
        assert_eq!(query.rejected.len(), 3);
        assert_eq!(query.search, "silk scarf");
        assert_eq!(query.sort, SortKey::Newest);
        assert_eq!(query.page, 1);
    }

    #[test]
    fn test_blank_values_are_ignored() {
        let query = ShopQuery::parse("q=&size=&page=");
        assert_eq!(
            query,
            ShopQuery {
                page: 1,
                ..ShopQuery::default()
            }
        );
    }
}
