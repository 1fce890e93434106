//! Luxe Core - domain library for the Luxe storefront.
//!
//! This crate holds everything the storefront knows about its shop:
//! - `catalog` - the fixed, ordered product list
//! - `filter` - faceted filtering, search, sorting and pagination
//! - `cart`, `wishlist` - the visitor's selections
//! - `pricing` - coupons, shipping fees, tax and totals
//! - `checkout`, `order` - the three-step checkout and order history
//! - `account` - mock demo login
//! - `store` - the client state and the reducer that changes it
//!
//! # Architecture
//!
//! The core crate does no I/O: no HTTP, no files, no clocks. Callers pass
//! the current time into [`Store::dispatch`] and persist [`ClientState`]
//! however they like. The storefront keeps it in the session; the CLI
//! keeps it in a JSON file.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod account;
pub mod cart;
pub mod catalog;
pub mod checkout;
pub mod filter;
pub mod order;
pub mod pricing;
pub mod store;
pub mod types;
pub mod wishlist;

pub use account::{AuthError, Authenticator, MockAuthenticator, SessionUser};
pub use cart::{Cart, CartError, CartLine};
pub use catalog::{Catalog, CatalogError, Category, Product};
pub use checkout::{Checkout, CheckoutError, CheckoutStep, PaymentDetails, ShippingDetails};
pub use filter::{
    Dimension, Facets, FilterError, FilterState, PipelineOptions, PriceRange, ProductPage,
    SortKey, UpperBound,
};
pub use order::{Order, OrderHistory};
pub use pricing::{
    Coupon, CouponBook, CouponError, Discount, PricingPolicy, ShippingMethod, TaxBasis, Totals,
};
pub use store::{Action, ClientState, Notice, NoticeLevel, Store, StoreError};
pub use types::*;
pub use wishlist::{Wishlist, WishlistChange};
