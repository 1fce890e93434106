//! HTTP route handlers for storefront.
//!
//! # Route Structure
//!
//! ```text
//! GET  /                       - Home page (featured products)
//! GET  /health                 - Health check
//!
//! # Shop
//! GET  /shop                   - Product grid; query parameters rebuild the filters
//! POST /shop/clear             - Clear filters and search
//! GET  /shop/category/{name}   - Browse a single category
//! GET  /products/{id}          - Product detail
//!
//! # Cart
//! GET  /cart                   - Cart page with order summary
//! POST /cart/add               - Add a variant
//! POST /cart/update            - Set a line's quantity (0 removes)
//! POST /cart/remove            - Remove a line
//! POST /cart/coupon            - Apply a coupon code
//! GET  /cart/count             - Item count (JSON)
//!
//! # Wishlist
//! GET  /wishlist               - Saved products
//! POST /wishlist/toggle        - Save or unsave a product
//! POST /wishlist/move          - Move a saved product into the cart
//!
//! # Preferences
//! POST /currency               - Change display currency
//! POST /preferences/dark-mode  - Toggle dark mode
//!
//! # Checkout
//! GET  /checkout               - Current checkout step
//! POST /checkout/shipping      - Step 1: shipping address
//! POST /checkout/delivery      - Step 2: delivery method
//! POST /checkout/back          - Go back one step
//! POST /checkout/place         - Step 3: payment, places the order
//!
//! # Account
//! GET  /account                - Login form or dashboard with order history
//! POST /account/login          - Demo login
//! POST /account/logout         - Logout
//! POST /account/orders/{id}/status - Admin: change an order's status
//! ```
//!
//! Every POST answers with a redirect (POST-redirect-GET). Outcomes are
//! shown on the next page as a flashed notice.

pub mod account;
pub mod cart;
pub mod checkout;
pub mod home;
pub mod preferences;
pub mod products;
pub mod shop;
pub mod wishlist;

use axum::{
    Router,
    response::Redirect,
    routing::{get, post},
};

use crate::state::AppState;

/// Create the shop routes router.
pub fn shop_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(shop::index))
        .route("/clear", post(shop::clear))
        .route("/category/{name}", get(shop::category))
}

/// Create the cart routes router.
pub fn cart_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(cart::show))
        .route("/add", post(cart::add))
        .route("/update", post(cart::update))
        .route("/remove", post(cart::remove))
        .route("/coupon", post(cart::coupon))
        .route("/count", get(cart::count))
}

/// Create the wishlist routes router.
pub fn wishlist_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(wishlist::show))
        .route("/toggle", post(wishlist::toggle))
        .route("/move", post(wishlist::move_to_cart))
}

/// Create the checkout routes router.
pub fn checkout_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(checkout::show))
        .route("/shipping", post(checkout::shipping))
        .route("/delivery", post(checkout::delivery))
        .route("/back", post(checkout::back))
        .route("/place", post(checkout::place))
}

/// Create the account routes router.
pub fn account_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(account::show))
        .route("/login", post(account::login))
        .route("/logout", post(account::logout))
        .route("/orders/{id}/status", post(account::set_order_status))
}

/// Create all routes for the storefront.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(home::home))
        .nest("/shop", shop_routes())
        .route("/products/{id}", get(products::show))
        .nest("/cart", cart_routes())
        .nest("/wishlist", wishlist_routes())
        .route("/currency", post(preferences::currency))
        .route("/preferences/dark-mode", post(preferences::dark_mode))
        .nest("/checkout", checkout_routes())
        .nest("/account", account_routes())
}

/// Redirect to a same-site path submitted with a form, or to `fallback`.
#[must_use]
pub fn redirect_back(next: Option<&str>, fallback: &str) -> Redirect {
    Redirect::to(safe_next(next).unwrap_or(fallback))
}

/// Only absolute paths on this site are accepted as redirect targets.
/// Control characters would make an invalid `Location` header.
fn safe_next(next: Option<&str>) -> Option<&str> {
    next.map(str::trim).filter(|n| {
        n.starts_with('/')
            && !n.starts_with("//")
            && !n.contains('\\')
            && !n.chars().any(|c| c.is_ascii_control())
    })
}
