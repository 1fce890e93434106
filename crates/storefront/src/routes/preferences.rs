//! Display preference handlers: currency and dark mode.

use axum::{Form, extract::State, response::Redirect};
use luxe_core::{Action, CurrencyCode};
use serde::Deserialize;
use tracing::instrument;

use super::redirect_back;
use crate::error::{AppError, Result};
use crate::middleware::Visitor;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct CurrencyForm {
    pub currency: String,
    pub next: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct PreferenceForm {
    pub next: Option<String>,
}

/// Change the display currency. Stored prices are unaffected.
#[instrument(skip(state, visitor))]
pub async fn currency(
    State(state): State<AppState>,
    mut visitor: Visitor,
    Form(form): Form<CurrencyForm>,
) -> Result<Redirect> {
    let currency: CurrencyCode = form
        .currency
        .parse()
        .map_err(|e: luxe_core::UnknownCurrency| AppError::BadRequest(e.to_string()))?;
    visitor
        .dispatch(state.store(), Action::SetCurrency(currency))
        .await?;
    Ok(redirect_back(form.next.as_deref(), "/"))
}

/// Toggle dark mode.
#[instrument(skip(state, visitor))]
pub async fn dark_mode(
    State(state): State<AppState>,
    mut visitor: Visitor,
    Form(form): Form<PreferenceForm>,
) -> Result<Redirect> {
    visitor
        .dispatch(state.store(), Action::ToggleDarkMode)
        .await?;
    Ok(redirect_back(form.next.as_deref(), "/"))
}
