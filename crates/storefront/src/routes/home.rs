//! Home page route handler.

use askama::Template;
use askama_web::WebTemplate;
use axum::extract::State;
use tracing::instrument;

use crate::error::Result;
use crate::middleware::Visitor;
use crate::state::AppState;
use crate::views::{FEATURED_LIMIT, Layout, ProductCard};

/// Home page template.
#[derive(Template, WebTemplate)]
#[template(path = "home.html")]
pub struct HomeTemplate {
    pub layout: Layout,
    pub featured: Vec<ProductCard>,
}

/// Display the home page with featured products.
#[instrument(skip(state, visitor))]
pub async fn home(State(state): State<AppState>, visitor: Visitor) -> Result<HomeTemplate> {
    let catalog = state.store().catalog();
    let featured = ProductCard::list(catalog.featured(FEATURED_LIMIT), visitor.state());

    Ok(HomeTemplate {
        layout: Layout::build(&visitor, "Luxe | Timeless Fashion", "/").await?,
        featured,
    })
}
