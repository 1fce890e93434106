//! Account route handlers.
//!
//! Login is a mock over the demo accounts. The dashboard lists the orders
//! placed from this session.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Path, State},
    response::Redirect,
};
use luxe_core::{Action, OrderId, OrderStatus, SessionUser};
use serde::Deserialize;
use tracing::instrument;

use crate::error::{AppError, Result, clear_sentry_user, set_sentry_user};
use crate::middleware::Visitor;
use crate::state::AppState;
use crate::views::{Layout, OrderView};

/// Login form data.
#[derive(Deserialize)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct OrderStatusForm {
    pub status: String,
}

/// Logged-in dashboard data.
pub struct Dashboard {
    pub name: String,
    pub email: String,
    pub is_admin: bool,
    pub orders: Vec<OrderView>,
}

/// Account page template: login form or dashboard.
#[derive(Template, WebTemplate)]
#[template(path = "account.html")]
pub struct AccountTemplate {
    pub layout: Layout,
    pub dashboard: Option<Dashboard>,
}

/// Display the login form or the dashboard.
#[instrument(skip(visitor))]
pub async fn show(visitor: Visitor) -> Result<AccountTemplate> {
    let client = visitor.state();
    let dashboard = client.user.as_ref().map(|user| Dashboard {
        name: user.name.clone(),
        email: user.email.to_string(),
        is_admin: user.is_admin(),
        orders: client.orders.latest_first().map(OrderView::new).collect(),
    });

    Ok(AccountTemplate {
        dashboard,
        layout: Layout::build(&visitor, "My Account | Luxe", "/account").await?,
    })
}

/// Demo login.
#[instrument(skip(state, visitor, form))]
pub async fn login(
    State(state): State<AppState>,
    mut visitor: Visitor,
    Form(form): Form<LoginForm>,
) -> Result<Redirect> {
    let action = Action::Login {
        email: form.email,
        password: form.password,
    };
    if visitor.dispatch(state.store(), action).await? {
        if let Some(user) = &visitor.state().user {
            set_sentry_user(user.email.as_str());
        }
    }
    Ok(Redirect::to("/account"))
}

/// Logout.
#[instrument(skip(state, visitor))]
pub async fn logout(State(state): State<AppState>, mut visitor: Visitor) -> Result<Redirect> {
    visitor.dispatch(state.store(), Action::Logout).await?;
    clear_sentry_user();
    Ok(Redirect::to("/account"))
}

/// Change an order's status. Admins only.
#[instrument(skip(state, visitor))]
pub async fn set_order_status(
    State(state): State<AppState>,
    mut visitor: Visitor,
    Path(id): Path<String>,
    Form(form): Form<OrderStatusForm>,
) -> Result<Redirect> {
    let is_admin = visitor.state().user.as_ref().is_some_and(SessionUser::is_admin);
    if !is_admin {
        return Err(AppError::Forbidden("admin login required".to_string()));
    }

    let status: OrderStatus = form.status.parse().map_err(AppError::BadRequest)?;
    let order_id = OrderId::new(id);
    if visitor.state().orders.find(&order_id).is_none() {
        return Err(AppError::NotFound(format!("order {order_id}")));
    }

    visitor
        .dispatch(state.store(), Action::SetOrderStatus { order_id, status })
        .await?;
    Ok(Redirect::to("/account"))
}
