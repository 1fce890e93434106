//! Checkout route handlers.
//!
//! Each step posts its form and redirects back to `GET /checkout`, which
//! renders whichever step the visitor's checkout is at.

use askama::Template;
use askama_web::WebTemplate;
use axum::{Form, extract::State, response::Redirect};
use luxe_core::{Action, PaymentDetails, ShippingDetails, ShippingMethod};
use serde::Deserialize;
use tracing::instrument;

use crate::error::{AppError, Result};
use crate::middleware::Visitor;
use crate::state::AppState;
use crate::views::{CartLineView, Layout, ShippingOption, TotalsView, shipping_options};

#[derive(Debug, Deserialize)]
pub struct DeliveryForm {
    pub method: String,
}

/// Checkout page template.
#[derive(Template, WebTemplate)]
#[template(path = "checkout.html")]
pub struct CheckoutTemplate {
    pub layout: Layout,
    /// 1, 2 or 3.
    pub step: u8,
    pub cart_empty: bool,
    pub shipping: ShippingDetails,
    pub methods: Vec<ShippingOption>,
    pub lines: Vec<CartLineView>,
    pub totals: TotalsView,
}

/// Display the current checkout step.
#[instrument(skip(state, visitor))]
pub async fn show(State(state): State<AppState>, visitor: Visitor) -> Result<CheckoutTemplate> {
    let client = visitor.state();
    let checkout = &client.checkout;
    let totals = state.store().totals(client);

    Ok(CheckoutTemplate {
        step: checkout.step.number(),
        cart_empty: client.cart.is_empty(),
        shipping: checkout.shipping_details.clone().unwrap_or_default(),
        methods: shipping_options(checkout.shipping_method, client.currency),
        lines: CartLineView::list(client.cart.lines(), client.currency),
        totals: TotalsView::new(&totals, client),
        layout: Layout::build(&visitor, "Checkout | Luxe", "/checkout").await?,
    })
}

/// Step 1: shipping address.
#[instrument(skip(state, visitor, form))]
pub async fn shipping(
    State(state): State<AppState>,
    mut visitor: Visitor,
    Form(form): Form<ShippingDetails>,
) -> Result<Redirect> {
    visitor
        .dispatch(state.store(), Action::SubmitShipping(form))
        .await?;
    Ok(Redirect::to("/checkout"))
}

/// Step 2: delivery method.
#[instrument(skip(state, visitor))]
pub async fn delivery(
    State(state): State<AppState>,
    mut visitor: Visitor,
    Form(form): Form<DeliveryForm>,
) -> Result<Redirect> {
    let method: ShippingMethod = form.method.parse().map_err(AppError::BadRequest)?;
    visitor
        .dispatch(state.store(), Action::ChooseDelivery(method))
        .await?;
    Ok(Redirect::to("/checkout"))
}

/// Go back one step.
#[instrument(skip(state, visitor))]
pub async fn back(State(state): State<AppState>, mut visitor: Visitor) -> Result<Redirect> {
    visitor.dispatch(state.store(), Action::CheckoutBack).await?;
    Ok(Redirect::to("/checkout"))
}

/// Step 3: payment. Places the order on success.
#[instrument(skip(state, visitor, form))]
pub async fn place(
    State(state): State<AppState>,
    mut visitor: Visitor,
    Form(form): Form<PaymentDetails>,
) -> Result<Redirect> {
    let placed = visitor
        .dispatch(state.store(), Action::PlaceOrder(form))
        .await?;

    if !placed {
        return Ok(Redirect::to("/checkout"));
    }
    if visitor.state().user.is_some() {
        Ok(Redirect::to("/account"))
    } else {
        Ok(Redirect::to("/"))
    }
}
