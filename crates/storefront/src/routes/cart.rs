//! Cart route handlers.
//!
//! The cart lives in the visitor's session. Mutations redirect back to the
//! page they came from (the `next` form field) or to the cart.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form, Json,
    extract::State,
    response::Redirect,
};
use luxe_core::{Action, ProductId, cart};
use serde::Deserialize;
use serde_json::{Value, json};
use tracing::instrument;

use super::redirect_back;
use crate::error::Result;
use crate::middleware::Visitor;
use crate::state::AppState;
use crate::views::{CartLineView, Layout, TotalsView};

/// Add to cart form data.
#[derive(Debug, Deserialize)]
pub struct AddToCartForm {
    pub product_id: String,
    pub size: Option<String>,
    pub color: Option<String>,
    /// Raw input; blank or invalid means 1.
    pub quantity: Option<String>,
    pub next: Option<String>,
}

/// Update cart form data.
#[derive(Debug, Deserialize)]
pub struct UpdateCartForm {
    pub item_id: String,
    /// Raw input; blank, invalid or non-positive removes the line.
    pub quantity: String,
}

/// Remove from cart form data.
#[derive(Debug, Deserialize)]
pub struct RemoveFromCartForm {
    pub item_id: String,
}

/// Coupon form data.
#[derive(Debug, Deserialize)]
pub struct CouponForm {
    pub code: String,
}

/// Cart page template.
#[derive(Template, WebTemplate)]
#[template(path = "cart.html")]
pub struct CartShowTemplate {
    pub layout: Layout,
    pub lines: Vec<CartLineView>,
    pub totals: TotalsView,
}

/// Display cart page.
#[instrument(skip(state, visitor))]
pub async fn show(State(state): State<AppState>, visitor: Visitor) -> Result<CartShowTemplate> {
    let client = visitor.state();
    let totals = state.store().totals(client);

    Ok(CartShowTemplate {
        lines: CartLineView::list(client.cart.lines(), client.currency),
        totals: TotalsView::new(&totals, client),
        layout: Layout::build(&visitor, "Your Cart | Luxe", "/cart").await?,
    })
}

/// Add a variant to the cart.
#[instrument(skip(state, visitor))]
pub async fn add(
    State(state): State<AppState>,
    mut visitor: Visitor,
    Form(form): Form<AddToCartForm>,
) -> Result<Redirect> {
    let action = Action::AddToCart {
        product_id: ProductId::new(form.product_id),
        size: form.size,
        color: form.color,
        quantity: cart::parse_quantity(form.quantity.as_deref().unwrap_or_default()),
    };
    visitor.dispatch(state.store(), action).await?;
    Ok(redirect_back(form.next.as_deref(), "/cart"))
}

/// Set a line's quantity.
#[instrument(skip(state, visitor))]
pub async fn update(
    State(state): State<AppState>,
    mut visitor: Visitor,
    Form(form): Form<UpdateCartForm>,
) -> Result<Redirect> {
    let action = Action::UpdateQuantity {
        item_id: form.item_id,
        quantity: cart::parse_update_quantity(&form.quantity),
    };
    visitor.dispatch(state.store(), action).await?;
    Ok(Redirect::to("/cart"))
}

/// Remove a line.
#[instrument(skip(state, visitor))]
pub async fn remove(
    State(state): State<AppState>,
    mut visitor: Visitor,
    Form(form): Form<RemoveFromCartForm>,
) -> Result<Redirect> {
    visitor
        .dispatch(
            state.store(),
            Action::RemoveLine {
                item_id: form.item_id,
            },
        )
        .await?;
    Ok(Redirect::to("/cart"))
}

/// Apply a coupon code.
#[instrument(skip(state, visitor))]
pub async fn coupon(
    State(state): State<AppState>,
    mut visitor: Visitor,
    Form(form): Form<CouponForm>,
) -> Result<Redirect> {
    visitor
        .dispatch(state.store(), Action::ApplyCoupon(form.code))
        .await?;
    Ok(Redirect::to("/cart"))
}

/// Cart item count for header badges.
#[instrument(skip(visitor))]
pub async fn count(visitor: Visitor) -> Json<Value> {
    Json(json!({ "count": visitor.state().cart.item_count() }))
}
