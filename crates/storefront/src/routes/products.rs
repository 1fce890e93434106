//! Product detail route handler.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::{Path, State},
    response::{IntoResponse, Redirect, Response},
};
use luxe_core::{Notice, ProductId};
use tracing::instrument;

use crate::error::Result;
use crate::middleware::Visitor;
use crate::state::AppState;
use crate::views::{Layout, ProductCard, ProductDetail};

/// Related products shown under the detail view.
const RELATED_LIMIT: usize = 4;

/// Product detail page template.
#[derive(Template, WebTemplate)]
#[template(path = "product.html")]
pub struct ProductTemplate {
    pub layout: Layout,
    pub product: ProductDetail,
    pub related: Vec<ProductCard>,
}

/// Display a product. Unknown ids send the visitor back to the shop.
#[instrument(skip(state, visitor))]
pub async fn show(
    State(state): State<AppState>,
    visitor: Visitor,
    Path(id): Path<String>,
) -> Result<Response> {
    let catalog = state.store().catalog();
    let id = ProductId::new(id);

    let Some(product) = catalog.find(&id) else {
        tracing::debug!(product_id = %id, "unknown product");
        visitor.flash(&Notice::error("Product not found.")).await?;
        return Ok(Redirect::to("/shop").into_response());
    };

    let related = catalog
        .iter()
        .filter(|p| p.category == product.category && p.id != product.id)
        .take(RELATED_LIMIT);

    let title = format!("{} | Luxe", product.name);
    let path = format!("/products/{id}");

    Ok(ProductTemplate {
        product: ProductDetail::new(product, visitor.state()),
        related: ProductCard::list(related, visitor.state()),
        layout: Layout::build(&visitor, &title, &path).await?,
    }
    .into_response())
}
