//! Wishlist route handlers.

use askama::Template;
use askama_web::WebTemplate;
use axum::{Form, extract::State, response::Redirect};
use luxe_core::{Action, ProductId};
use serde::Deserialize;
use tracing::instrument;

use super::redirect_back;
use crate::error::Result;
use crate::middleware::Visitor;
use crate::state::AppState;
use crate::views::{Layout, ProductCard};

#[derive(Debug, Deserialize)]
pub struct WishlistForm {
    pub product_id: String,
    pub next: Option<String>,
}

/// Wishlist page template.
#[derive(Template, WebTemplate)]
#[template(path = "wishlist.html")]
pub struct WishlistTemplate {
    pub layout: Layout,
    pub products: Vec<ProductCard>,
}

/// Display saved products.
#[instrument(skip(state, visitor))]
pub async fn show(State(state): State<AppState>, visitor: Visitor) -> Result<WishlistTemplate> {
    let saved = visitor.state().wishlist.products(state.store().catalog());

    Ok(WishlistTemplate {
        products: ProductCard::list(saved, visitor.state()),
        layout: Layout::build(&visitor, "Wishlist | Luxe", "/wishlist").await?,
    })
}

/// Save or unsave a product.
#[instrument(skip(state, visitor))]
pub async fn toggle(
    State(state): State<AppState>,
    mut visitor: Visitor,
    Form(form): Form<WishlistForm>,
) -> Result<Redirect> {
    let action = Action::ToggleWishlist {
        product_id: ProductId::new(form.product_id),
    };
    visitor.dispatch(state.store(), action).await?;
    Ok(redirect_back(form.next.as_deref(), "/wishlist"))
}

/// Move a saved product into the cart with its default variant.
#[instrument(skip(state, visitor))]
pub async fn move_to_cart(
    State(state): State<AppState>,
    mut visitor: Visitor,
    Form(form): Form<WishlistForm>,
) -> Result<Redirect> {
    let action = Action::MoveToCart {
        product_id: ProductId::new(form.product_id),
    };
    visitor.dispatch(state.store(), action).await?;
    Ok(redirect_back(form.next.as_deref(), "/wishlist"))
}
