//! Order totals: subtotal, coupon discount, shipping and tax.
//!
//! All arithmetic is exact decimal arithmetic in the base currency.
//! Rounding to cents happens only when an amount is formatted.

use core::fmt;
use core::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::cart::Cart;

/// Default sales tax rate (5%).
pub const DEFAULT_TAX_RATE: Decimal = Decimal::from_parts(5, 0, 0, false, 2);

/// Errors from coupon lookup.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CouponError {
    #[error("invalid coupon code '{0}'")]
    Unknown(String),
}

/// Delivery options offered at checkout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShippingMethod {
    Free,
    #[default]
    Standard,
    Express,
}

impl ShippingMethod {
    pub const ALL: [Self; 3] = [Self::Free, Self::Standard, Self::Express];

    /// Flat fee for the method.
    #[must_use]
    pub const fn fee(self) -> Decimal {
        match self {
            Self::Free => Decimal::ZERO,
            Self::Standard => Decimal::from_parts(1000, 0, 0, false, 2),
            Self::Express => Decimal::from_parts(2500, 0, 0, false, 2),
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Free => "free",
            Self::Standard => "standard",
            Self::Express => "express",
        }
    }

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Free => "Free (7-10 business days)",
            Self::Standard => "Standard (3-5 business days)",
            Self::Express => "Express (1-2 business days)",
        }
    }
}

impl FromStr for ShippingMethod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|m| m.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("invalid shipping method: {s}"))
    }
}

impl fmt::Display for ShippingMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How a coupon reduces the subtotal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum Discount {
    /// Fixed amount off, in the base currency.
    Flat(Decimal),
    /// Percentage off the subtotal, e.g. `10` for 10%.
    Percent(Decimal),
}

impl Discount {
    /// The amount taken off `subtotal`, never more than the subtotal.
    #[must_use]
    pub fn amount(self, subtotal: Decimal) -> Decimal {
        let raw = match self {
            Self::Flat(amount) => amount,
            Self::Percent(pct) => subtotal * pct / Decimal::ONE_HUNDRED,
        };
        raw.clamp(Decimal::ZERO, subtotal.max(Decimal::ZERO))
    }
}

/// A redeemable code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Coupon {
    /// Upper-case code.
    pub code: String,
    pub discount: Discount,
}

impl Coupon {
    #[must_use]
    pub fn new(code: &str, discount: Discount) -> Self {
        Self {
            code: normalize_code(code),
            discount,
        }
    }
}

fn normalize_code(code: &str) -> String {
    code.trim().to_ascii_uppercase()
}

/// The set of codes the store accepts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CouponBook {
    coupons: Vec<Coupon>,
}

impl CouponBook {
    #[must_use]
    pub const fn new(coupons: Vec<Coupon>) -> Self {
        Self { coupons }
    }

    /// Look up a code, ignoring case and surrounding whitespace.
    ///
    /// # Errors
    ///
    /// Returns `CouponError::Unknown` if no coupon has that code.
    pub fn redeem(&self, code: &str) -> Result<&Coupon, CouponError> {
        let code = normalize_code(code);
        self.coupons
            .iter()
            .find(|c| c.code == code)
            .ok_or(CouponError::Unknown(code))
    }
}

impl Default for CouponBook {
    /// `LUXE20`: $20 off.
    fn default() -> Self {
        Self::new(vec![Coupon::new(
            "LUXE20",
            Discount::Flat(Decimal::new(20, 0)),
        )])
    }
}

/// Which amount the tax rate is applied to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaxBasis {
    /// Tax on the full subtotal.
    #[default]
    Subtotal,
    /// Tax on the subtotal after the coupon discount.
    DiscountedSubtotal,
}

impl FromStr for TaxBasis {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "subtotal" => Ok(Self::Subtotal),
            "discounted" | "discounted_subtotal" => Ok(Self::DiscountedSubtotal),
            other => Err(format!("expected 'subtotal' or 'discounted', got '{other}'")),
        }
    }
}

/// Store-wide pricing rules.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PricingPolicy {
    pub tax_rate: Decimal,
    pub tax_basis: TaxBasis,
    pub coupons: CouponBook,
}

impl Default for PricingPolicy {
    fn default() -> Self {
        Self {
            tax_rate: DEFAULT_TAX_RATE,
            tax_basis: TaxBasis::default(),
            coupons: CouponBook::default(),
        }
    }
}

/// Computed order summary, in the base currency.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Totals {
    pub item_count: u32,
    pub subtotal: Decimal,
    pub discount: Decimal,
    /// `None` until a shipping method is chosen.
    pub shipping: Option<Decimal>,
    pub tax: Decimal,
    pub total: Decimal,
}

impl PricingPolicy {
    /// Compute `subtotal − discount + shipping + tax`.
    #[must_use]
    pub fn totals(
        &self,
        cart: &Cart,
        coupon: Option<&Coupon>,
        shipping: Option<ShippingMethod>,
    ) -> Totals {
        let subtotal = cart.subtotal();
        let discount = coupon.map_or(Decimal::ZERO, |c| c.discount.amount(subtotal));
        let shipping = shipping.map(ShippingMethod::fee);

        let taxable = match self.tax_basis {
            TaxBasis::Subtotal => subtotal,
            TaxBasis::DiscountedSubtotal => subtotal - discount,
        };
        let tax = taxable * self.tax_rate;
        let total = subtotal - discount + shipping.unwrap_or(Decimal::ZERO) + tax;

        Totals {
            item_count: cart.item_count(),
            subtotal,
            discount,
            shipping,
            tax,
            total,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::catalog::Catalog;
    use crate::types::ProductId;

    fn cart_with(items: &[(&str, u32)]) -> Cart {
        let catalog = Catalog::seed();
        let mut cart = Cart::default();
        for (id, qty) in items {
            let product = catalog.find(&ProductId::from(*id)).unwrap();
            cart.add(product, None, None, *qty).unwrap();
        }
        cart
    }

    #[test]
    fn test_totals_without_coupon_or_shipping() {
        let cart = cart_with(&[("104", 2)]); // 2 x 95.00
        let totals = PricingPolicy::default().totals(&cart, None, None);

        assert_eq!(totals.item_count, 2);
        assert_eq!(totals.subtotal, Decimal::new(190, 0));
        assert_eq!(totals.discount, Decimal::ZERO);
        assert_eq!(totals.shipping, None);
        assert_eq!(totals.tax, Decimal::new(950, 2));
        assert_eq!(totals.total, Decimal::new(19_950, 2));
    }

    #[test]
    fn test_totals_with_flat_coupon_and_standard_shipping() {
        let cart = cart_with(&[("105", 1)]); // 240.00
        let policy = PricingPolicy::default();
        let coupon = policy.coupons.redeem("luxe20").unwrap().clone();
        let totals = policy.totals(&cart, Some(&coupon), Some(ShippingMethod::Standard));

        // 240 - 20 + 10 + 12 (5% of 240)
        assert_eq!(totals.discount, Decimal::new(20, 0));
        assert_eq!(totals.shipping, Some(Decimal::new(10, 0)));
        assert_eq!(totals.tax, Decimal::new(12, 0));
        assert_eq!(totals.total, Decimal::new(242, 0));
    }

    #[test]
    fn test_discounted_tax_basis() {
        let cart = cart_with(&[("105", 1)]);
        let policy = PricingPolicy {
            tax_basis: TaxBasis::DiscountedSubtotal,
            ..PricingPolicy::default()
        };
        let coupon = Coupon::new("LUXE20", Discount::Flat(Decimal::new(20, 0)));
        let totals = policy.totals(&cart, Some(&coupon), None);

        // 5% of 220
        assert_eq!(totals.tax, Decimal::new(11, 0));
        assert_eq!(totals.total, Decimal::new(231, 0));
    }

    #[test]
    fn test_percent_coupon() {
        let cart = cart_with(&[("106", 2)]); // 130.00
        let coupon = Coupon::new("SAVE10", Discount::Percent(Decimal::new(10, 0)));
        let totals = PricingPolicy::default().totals(&cart, Some(&coupon), Some(ShippingMethod::Free));
        assert_eq!(totals.discount, Decimal::new(13, 0));
        assert_eq!(totals.shipping, Some(Decimal::ZERO));
    }

    #[test]
    fn test_discount_never_exceeds_subtotal() {
        let cart = cart_with(&[("106", 1)]); // 65.00
        let coupon = Coupon::new("BIG", Discount::Flat(Decimal::new(500, 0)));
        let totals = PricingPolicy::default().totals(&cart, Some(&coupon), None);
        assert_eq!(totals.discount, Decimal::new(65, 0));
        assert!(totals.total >= Decimal::ZERO);
    }

    #[test]
    fn test_empty_cart_totals_are_zero() {
        let totals = PricingPolicy::default().totals(&Cart::default(), None, None);
        assert_eq!(totals, Totals::default());
    }

    #[test]
    fn test_unknown_coupon() {
        let book = CouponBook::default();
        assert_eq!(
            book.redeem(" nope "),
            Err(CouponError::Unknown("NOPE".to_string()))
        );
    }

    #[test]
    fn test_shipping_method_parse() {
        assert_eq!("Express".parse::<ShippingMethod>().unwrap(), ShippingMethod::Express);
        assert!("drone".parse::<ShippingMethod>().is_err());
    }
}
