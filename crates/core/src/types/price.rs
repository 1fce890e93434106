//! Currency handling and price formatting using decimal arithmetic.
//!
//! Catalog prices are stored in the base currency (USD). Conversion to the
//! visitor's display currency happens only when a price is formatted.

use core::fmt;
use core::str::FromStr;

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

/// ISO 4217 currency codes supported by the storefront.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum CurrencyCode {
    #[default]
    USD,
    EUR,
    GBP,
}

impl CurrencyCode {
    /// All supported currencies, in selector order.
    pub const ALL: [Self; 3] = [Self::USD, Self::EUR, Self::GBP];

    /// Conversion rate from the base currency (USD).
    #[must_use]
    pub const fn exchange_rate(self) -> Decimal {
        match self {
            Self::USD => Decimal::ONE,
            Self::EUR => Decimal::from_parts(92, 0, 0, false, 2),
            Self::GBP => Decimal::from_parts(79, 0, 0, false, 2),
        }
    }

    /// Display symbol.
    #[must_use]
    pub const fn symbol(self) -> &'static str {
        match self {
            Self::USD => "$",
            Self::EUR => "€",
            Self::GBP => "£",
        }
    }

    /// ISO code as a string.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::USD => "USD",
            Self::EUR => "EUR",
            Self::GBP => "GBP",
        }
    }
}

impl fmt::Display for CurrencyCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Error returned when parsing an unsupported currency code.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unsupported currency: {0}")]
pub struct UnknownCurrency(pub String);

impl FromStr for CurrencyCode {
    type Err = UnknownCurrency;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "USD" => Ok(Self::USD),
            "EUR" => Ok(Self::EUR),
            "GBP" => Ok(Self::GBP),
            _ => Err(UnknownCurrency(s.to_string())),
        }
    }
}

/// Convert a base-currency amount into `currency`, rounded to cents.
#[must_use]
pub fn convert(amount: Decimal, currency: CurrencyCode) -> Decimal {
    (amount * currency.exchange_rate())
        .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Format a base-currency amount for display, e.g. `"$99.00"`.
#[must_use]
pub fn format_price(amount: Decimal, currency: CurrencyCode) -> String {
    format!("{}{:.2}", currency.symbol(), convert(amount, currency))
}
