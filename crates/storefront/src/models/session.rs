//! Session keys for persisted visitor state.
//!
//! Each slice of [`luxe_core::ClientState`] is stored under its own key so
//! a slice that fails to deserialize falls back to its default without
//! taking the rest of the visitor's state with it.

/// Session keys, one per persisted slice.
pub mod keys {
    pub const CART: &str = "luxe_cart";
    pub const WISHLIST: &str = "luxe_wishlist";
    pub const CURRENCY: &str = "luxe_currency";
    pub const FILTERS: &str = "luxe_filters";
    pub const USER: &str = "luxe_user";
    pub const ORDERS: &str = "luxe_orders";
    pub const CHECKOUT: &str = "luxe_checkout";
    pub const COUPON: &str = "luxe_coupon";
    pub const DARK_MODE: &str = "luxe_dark_mode";

    /// One-shot notice shown on the next rendered page.
    pub const NOTICE: &str = "luxe_notice";
}
