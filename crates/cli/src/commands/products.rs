//! Catalog browsing.

use std::io::Write;

use clap::Args;
use luxe_core::{Action, Dimension, Facets, ProductId, SortKey};

use super::Context;
use crate::error::{CliError, Result};
use crate::render;

/// Filter flags replace the saved filters; without any, the saved
/// filters are shown again.
#[derive(Debug, Default, Args)]
pub struct ProductsArgs {
    /// Category to include (repeatable)
    #[arg(long = "category", value_name = "CATEGORY")]
    pub categories: Vec<String>,

    /// Price range such as 100-250 (repeatable)
    #[arg(long = "price", value_name = "MIN-MAX")]
    pub prices: Vec<String>,

    /// Size to include (repeatable)
    #[arg(long = "size")]
    pub sizes: Vec<String>,

    /// Color to include (repeatable)
    #[arg(long = "color")]
    pub colors: Vec<String>,

    /// Minimum rating (repeatable)
    #[arg(long = "rating", value_name = "MIN")]
    pub ratings: Vec<String>,

    /// Free-text search over name and description
    #[arg(short, long)]
    pub search: Option<String>,

    /// Sort order: newest, price-low, price-high, rating
    #[arg(long)]
    pub sort: Option<SortKey>,

    /// Jump to a page
    #[arg(long, conflicts_with_all = ["next", "previous"])]
    pub page: Option<usize>,

    /// Next page of the saved results
    #[arg(long, conflicts_with = "previous")]
    pub next: bool,

    /// Previous page of the saved results
    #[arg(long)]
    pub previous: bool,

    /// Reset filters and search before anything else
    #[arg(long)]
    pub clear: bool,
}

impl ProductsArgs {
    fn has_filters(&self) -> bool {
        !(self.categories.is_empty()
            && self.prices.is_empty()
            && self.sizes.is_empty()
            && self.colors.is_empty()
            && self.ratings.is_empty())
            || self.search.is_some()
    }

    /// Actions that install these flags, in reducer order.
    ///
    /// # Errors
    ///
    /// Returns the first malformed filter value.
    pub fn actions(&self) -> Result<Vec<Action>> {
        let mut actions = Vec::new();
        if self.clear {
            actions.push(Action::ClearFilters);
        }

        if self.has_filters() {
            let mut facets = Facets::default();
            let groups = [
                (Dimension::Category, &self.categories),
                (Dimension::Price, &self.prices),
                (Dimension::Size, &self.sizes),
                (Dimension::Color, &self.colors),
                (Dimension::Rating, &self.ratings),
            ];
            for (dimension, values) in groups {
                for value in values {
                    facets.select(dimension, value)?;
                }
            }
            actions.push(Action::ApplyFilters(facets));
            actions.push(Action::Search(self.search.clone().unwrap_or_default()));
        }

        if let Some(sort) = self.sort {
            actions.push(Action::Sort(sort));
        }
        if let Some(page) = self.page {
            actions.push(Action::GoToPage(page));
        }
        if self.next {
            actions.push(Action::ChangePage(1));
        }
        if self.previous {
            actions.push(Action::ChangePage(-1));
        }
        Ok(actions)
    }
}

/// List the current page of products.
///
/// # Errors
///
/// Returns an error for malformed filters or if the state cannot be saved.
pub fn list(ctx: &mut Context, args: &ProductsArgs, out: &mut impl Write) -> Result<()> {
    ctx.dispatch_all(args.actions()?, out)?;

    let Context { store, file, state } = ctx;
    let page = store.page(state);
    render::products(out, &page, state)?;
    file.save(state)
}

/// Show one product.
///
/// # Errors
///
/// Returns `ProductNotFound` for an unknown id.
pub fn show(ctx: &Context, id: &str, out: &mut impl Write) -> Result<()> {
    let product = ctx
        .store()
        .catalog()
        .find(&ProductId::from(id))
        .ok_or_else(|| CliError::ProductNotFound(id.to_string()))?;
    render::product(out, product, ctx.state())?;
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use luxe_core::Category;

    use super::super::testing::{context, reload, text};
    use super::*;

    #[test]
    fn test_filters_persist_between_runs() {
        let (_dir, mut ctx) = context();
        let args = ProductsArgs {
            categories: vec!["Women".to_string()],
            ..ProductsArgs::default()
        };

        let mut out = Vec::new();
        list(&mut ctx, &args, &mut out).unwrap();
        let saved = reload(&ctx);
        assert_eq!(saved.filters.facets.category, vec![Category::Women]);

        let mut again = Vec::new();
        list(&mut ctx, &ProductsArgs::default(), &mut again).unwrap();
        assert_eq!(text(out), text(again));
    }

    #[test]
    fn test_search_only_clears_facets() {
        let args = ProductsArgs {
            search: Some("silk".to_string()),
            ..ProductsArgs::default()
        };
        let actions = args.actions().unwrap();
        assert_eq!(
            actions,
            vec![
                Action::ApplyFilters(Facets::default()),
                Action::Search("silk".to_string()),
            ]
        );
    }

    #[test]
    fn test_bad_price_is_rejected() {
        let args = ProductsArgs {
            prices: vec!["cheap".to_string()],
            ..ProductsArgs::default()
        };
        assert!(matches!(args.actions(), Err(CliError::Filter(_))));
    }

    #[test]
    fn test_next_page_is_clamped() {
        let (_dir, mut ctx) = context();
        let next = ProductsArgs {
            next: true,
            ..ProductsArgs::default()
        };

        let mut out = Vec::new();
        list(&mut ctx, &next, &mut out).unwrap();
        list(&mut ctx, &next, &mut out).unwrap();

        // Six seed products at four per page.
        assert_eq!(reload(&ctx).filters.page, 2);
        assert!(text(out).contains("Page 2 of 2 (6 products)"));
    }

    #[test]
    fn test_unknown_product() {
        let (_dir, ctx) = context();
        let mut out = Vec::new();
        assert!(matches!(
            show(&ctx, "999", &mut out),
            Err(CliError::ProductNotFound(id)) if id == "999"
        ));
    }
}
