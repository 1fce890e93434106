//! Client state and the reducer that updates it.
//!
//! Everything a visitor accumulates (cart, wishlist, filters, currency,
//! login, orders, checkout progress) lives in one [`ClientState`] value.
//! It is changed only through [`Store::dispatch`], which applies an
//! [`Action`] and returns an optional [`Notice`] for the visitor. Callers
//! load the state before dispatching and persist it afterwards.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::account::{AuthError, Authenticator, MockAuthenticator, SessionUser};
use crate::cart::{Cart, CartError};
use crate::catalog::{Catalog, Category, Product};
use crate::checkout::{Checkout, CheckoutError, PaymentDetails, ShippingDetails};
use crate::filter::{self, DEFAULT_PER_PAGE, Facets, FilterState, PipelineOptions, ProductPage, SortKey};
use crate::order::{Order, OrderHistory, order_number};
use crate::pricing::{Coupon, CouponError, Discount, PricingPolicy, ShippingMethod, Totals};
use crate::types::{CurrencyCode, OrderId, OrderStatus, ProductId, format_price};
use crate::wishlist::{Wishlist, WishlistChange};

/// Any rejected action.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error(transparent)]
    Cart(#[from] CartError),
    #[error(transparent)]
    Coupon(#[from] CouponError),
    #[error(transparent)]
    Checkout(#[from] CheckoutError),
    #[error(transparent)]
    Auth(#[from] AuthError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NoticeLevel {
    Info,
    Success,
    Error,
}

impl NoticeLevel {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Info => "info",
            Self::Success => "success",
            Self::Error => "error",
        }
    }
}

/// A short message shown to the visitor after an action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

impl Notice {
    pub fn info(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Info,
            message: message.into(),
        }
    }

    pub fn success(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Success,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Error,
            message: message.into(),
        }
    }
}

impl From<&StoreError> for Notice {
    fn from(err: &StoreError) -> Self {
        let message = match err {
            StoreError::Coupon(_) => "Invalid coupon code.".to_string(),
            StoreError::Checkout(CheckoutError::EmptyCart) => "Cannot place empty order!".to_string(),
            other => other.to_string(),
        };
        Self::error(message)
    }
}

/// Everything persisted for one visitor.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientState {
    pub cart: Cart,
    pub wishlist: Wishlist,
    pub currency: CurrencyCode,
    pub filters: FilterState,
    pub user: Option<SessionUser>,
    pub orders: OrderHistory,
    pub checkout: Checkout,
    pub coupon: Option<Coupon>,
    pub dark_mode: bool,
}

/// A visitor interaction that changes client state.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    AddToCart {
        product_id: ProductId,
        size: Option<String>,
        color: Option<String>,
        quantity: u32,
    },
    UpdateQuantity {
        item_id: String,
        quantity: u32,
    },
    RemoveLine {
        item_id: String,
    },
    ToggleWishlist {
        product_id: ProductId,
    },
    MoveToCart {
        product_id: ProductId,
    },
    SetCurrency(CurrencyCode),
    ApplyFilters(Facets),
    Search(String),
    Sort(SortKey),
    /// Move the page cursor by a relative amount.
    ChangePage(isize),
    /// Jump to a page; clamped on the next render.
    GoToPage(usize),
    ClearFilters,
    BrowseCategory(Category),
    ApplyCoupon(String),
    SubmitShipping(ShippingDetails),
    ChooseDelivery(ShippingMethod),
    CheckoutBack,
    PlaceOrder(PaymentDetails),
    Login {
        email: String,
        password: String,
    },
    Logout,
    ToggleDarkMode,
    /// Admin-only in the UI; the reducer does not check roles.
    SetOrderStatus {
        order_id: OrderId,
        status: OrderStatus,
    },
}

impl Action {
    /// Stable name for logs. Payloads are left out since some carry
    /// passwords or card numbers.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::AddToCart { .. } => "add_to_cart",
            Self::UpdateQuantity { .. } => "update_quantity",
            Self::RemoveLine { .. } => "remove_line",
            Self::ToggleWishlist { .. } => "toggle_wishlist",
            Self::MoveToCart { .. } => "move_to_cart",
            Self::SetCurrency(_) => "set_currency",
            Self::ApplyFilters(_) => "apply_filters",
            Self::Search(_) => "search",
            Self::Sort(_) => "sort",
            Self::ChangePage(_) => "change_page",
            Self::GoToPage(_) => "go_to_page",
            Self::ClearFilters => "clear_filters",
            Self::BrowseCategory(_) => "browse_category",
            Self::ApplyCoupon(_) => "apply_coupon",
            Self::SubmitShipping(_) => "submit_shipping",
            Self::ChooseDelivery(_) => "choose_delivery",
            Self::CheckoutBack => "checkout_back",
            Self::PlaceOrder(_) => "place_order",
            Self::Login { .. } => "login",
            Self::Logout => "logout",
            Self::ToggleDarkMode => "toggle_dark_mode",
            Self::SetOrderStatus { .. } => "set_order_status",
        }
    }
}

/// Shop-wide configuration plus the reducer.
pub struct Store {
    catalog: Catalog,
    pricing: PricingPolicy,
    pipeline: PipelineOptions,
    per_page: usize,
    authenticator: Box<dyn Authenticator>,
}

impl std::fmt::Debug for Store {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Store")
            .field("products", &self.catalog.len())
            .field("pricing", &self.pricing)
            .field("pipeline", &self.pipeline)
            .field("per_page", &self.per_page)
            .finish_non_exhaustive()
    }
}

impl Store {
    /// A store over `catalog` with default pricing, pipeline options, page
    /// size and the demo authenticator.
    #[must_use]
    pub fn new(catalog: Catalog) -> Self {
        Self {
            catalog,
            pricing: PricingPolicy::default(),
            pipeline: PipelineOptions::default(),
            per_page: DEFAULT_PER_PAGE,
            authenticator: Box::new(MockAuthenticator),
        }
    }

    #[must_use]
    pub fn with_pricing(mut self, pricing: PricingPolicy) -> Self {
        self.pricing = pricing;
        self
    }

    #[must_use]
    pub const fn with_pipeline(mut self, pipeline: PipelineOptions) -> Self {
        self.pipeline = pipeline;
        self
    }

    #[must_use]
    pub const fn with_per_page(mut self, per_page: usize) -> Self {
        self.per_page = if per_page == 0 { 1 } else { per_page };
        self
    }

    #[must_use]
    pub fn with_authenticator(mut self, authenticator: impl Authenticator + 'static) -> Self {
        self.authenticator = Box::new(authenticator);
        self
    }

    #[must_use]
    pub const fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    #[must_use]
    pub const fn pricing(&self) -> &PricingPolicy {
        &self.pricing
    }

    #[must_use]
    pub const fn per_page(&self) -> usize {
        self.per_page
    }

    fn product(&self, id: &ProductId) -> Result<&Product, StoreError> {
        self.catalog
            .find(id)
            .ok_or_else(|| CartError::UnknownProduct(id.clone()).into())
    }

    /// Current product page. Writes the store's page size and the clamped
    /// page cursor back into `state`.
    pub fn page(&self, state: &mut ClientState) -> ProductPage<'_> {
        state.filters.per_page = self.per_page;
        let page = filter::run(&self.catalog, &state.filters, &self.pipeline);
        state.filters.page = page.page;
        page
    }

    /// Cart totals including any applied coupon and chosen shipping.
    #[must_use]
    pub fn totals(&self, state: &ClientState) -> Totals {
        self.pricing.totals(
            &state.cart,
            state.coupon.as_ref(),
            state.checkout.shipping_method,
        )
    }

    /// Apply one action.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` when the action is rejected. Rejected actions
    /// leave the state unchanged, except that an unknown coupon code also
    /// removes any previously applied coupon.
    pub fn dispatch(
        &self,
        state: &mut ClientState,
        action: Action,
        now: DateTime<Utc>,
    ) -> Result<Option<Notice>, StoreError> {
        tracing::debug!(action = action.name(), "dispatch");

        let notice = match action {
            Action::AddToCart {
                product_id,
                size,
                color,
                quantity,
            } => {
                let product = self.product(&product_id)?;
                state
                    .cart
                    .add(product, size.as_deref(), color.as_deref(), quantity)?;
                Some(Notice::info(format!("{} added to cart!", product.name)))
            }
            Action::UpdateQuantity { item_id, quantity } => {
                state.cart.set_quantity(&item_id, quantity)?;
                (quantity == 0).then(|| Notice::info("Item removed from cart."))
            }
            Action::RemoveLine { item_id } => {
                state.cart.remove(&item_id)?;
                Some(Notice::info("Item removed from cart."))
            }
            Action::ToggleWishlist { product_id } => match state.wishlist.toggle(&product_id) {
                WishlistChange::Added => Some(Notice::success("Item added to wishlist!")),
                WishlistChange::Removed => Some(Notice::info("Item removed from wishlist.")),
            },
            Action::MoveToCart { product_id } => {
                let product = self.product(&product_id)?;
                state.cart.add(product, None, None, 1)?;
                state.wishlist.remove(&product_id);
                Some(Notice::success(format!("{} moved to cart!", product.name)))
            }
            Action::SetCurrency(currency) => {
                state.currency = currency;
                None
            }
            Action::ApplyFilters(facets) => {
                state.filters.apply_facets(facets);
                None
            }
            Action::Search(term) => {
                state.filters.set_search(&term);
                None
            }
            Action::Sort(sort) => {
                state.filters.set_sort(sort);
                None
            }
            Action::ChangePage(delta) => {
                let matches = filter::matching(&self.catalog, &state.filters, &self.pipeline).len();
                let total_pages = filter::page_count(matches, self.per_page);
                state.filters.clamp_page(total_pages);
                state.filters.step_page(delta, total_pages);
                None
            }
            Action::GoToPage(page) => {
                state.filters.page = page;
                None
            }
            Action::ClearFilters => {
                state.filters.clear();
                None
            }
            Action::BrowseCategory(category) => {
                state.filters.browse_category(category);
                None
            }
            Action::ApplyCoupon(code) => match self.pricing.coupons.redeem(&code) {
                Ok(coupon) => {
                    let notice = Notice::success(format!(
                        "Coupon \"{}\" applied! {} off.",
                        coupon.code,
                        describe_discount(coupon.discount, state.currency)
                    ));
                    state.coupon = Some(coupon.clone());
                    Some(notice)
                }
                Err(err) => {
                    state.coupon = None;
                    return Err(err.into());
                }
            },
            Action::SubmitShipping(details) => {
                state.checkout.submit_shipping(details)?;
                None
            }
            Action::ChooseDelivery(method) => {
                state.checkout.choose_delivery(method)?;
                None
            }
            Action::CheckoutBack => {
                state.checkout.back();
                None
            }
            Action::PlaceOrder(payment) => Some(self.place_order(state, &payment, now)?),
            Action::Login { email, password } => {
                let user = self.authenticator.authenticate(&email, &password)?;
                let message = if user.is_admin() {
                    "Admin logged in!"
                } else {
                    "User logged in!"
                };
                tracing::info!(email = %user.email, role = %user.role, "login");
                state.user = Some(user);
                Some(Notice::success(message))
            }
            Action::Logout => {
                state.user = None;
                Some(Notice::success("Logged out successfully."))
            }
            Action::ToggleDarkMode => {
                state.dark_mode = !state.dark_mode;
                None
            }
            Action::SetOrderStatus { order_id, status } => state
                .orders
                .set_status(&order_id, status)
                .then(|| Notice::info(format!("Order #{order_id} marked {status}."))),
        };

        Ok(notice)
    }

    fn place_order(
        &self,
        state: &mut ClientState,
        payment: &PaymentDetails,
        now: DateTime<Utc>,
    ) -> Result<Notice, StoreError> {
        let card_last4 = state.checkout.confirm_payment(payment)?;
        if state.cart.is_empty() {
            return Err(CheckoutError::EmptyCart.into());
        }

        let totals = self.totals(state);
        let order = Order {
            id: order_number(now),
            placed_at: now,
            lines: state.cart.take(),
            totals,
            currency: state.currency,
            shipping: state.checkout.shipping_details.clone(),
            card_last4,
            status: OrderStatus::Processing,
        };
        let notice = Notice::success(format!("Order #{} placed successfully!", order.id));
        tracing::info!(order_id = %order.id, total = %order.totals.total, "order placed");

        state.orders.push(order);
        state.checkout.reset();
        state.coupon = None;
        Ok(notice)
    }
}

fn describe_discount(discount: Discount, currency: CurrencyCode) -> String {
    match discount {
        Discount::Flat(amount) => format_price(amount, currency),
        Discount::Percent(pct) => format!("{}%", pct.normalize()),
    }
}
