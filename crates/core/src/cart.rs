//! Shopping cart with variant-aware quantity merging.
//!
//! A cart line is identified by its (product, size, color) tuple. Adding a
//! tuple that is already in the cart increments that line instead of
//! appending a new one.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::catalog::Product;
use crate::types::ProductId;

/// Quantity used when the requested one is missing or unreadable.
pub const DEFAULT_QUANTITY: u32 = 1;

/// Errors from cart mutations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CartError {
    #[error("product {0} does not exist")]
    UnknownProduct(ProductId),
    #[error("{product} is not available in {variant}")]
    UnavailableVariant { product: String, variant: String },
    #[error("quantity must be at least 1")]
    ZeroQuantity,
    #[error("cart line {0} not found")]
    LineNotFound(String),
}

/// One (product, size, color) selection and its quantity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartLine {
    /// `"{product}-{size}-{color}"`.
    pub item_id: String,
    pub product_id: ProductId,
    pub name: String,
    /// Unit price in the base currency, captured when the line was created.
    pub price: Decimal,
    pub image: Option<String>,
    pub size: String,
    pub color: String,
    pub quantity: u32,
}

impl CartLine {
    #[must_use]
    pub fn line_total(&self) -> Decimal {
        self.price * Decimal::from(self.quantity)
    }
}

/// Build the line key for a variant selection.
#[must_use]
pub fn line_key(product_id: &ProductId, size: &str, color: &str) -> String {
    format!("{product_id}-{size}-{color}")
}

/// Ordered list of cart lines. Lines always have a quantity of at least 1.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Cart {
    lines: Vec<CartLine>,
}

impl Cart {
    /// Add `quantity` of a variant. A missing size or color defaults to
    /// the first one the product offers.
    ///
    /// Returns the key of the line that was created or incremented.
    ///
    /// # Errors
    ///
    /// Returns `CartError::ZeroQuantity` for a zero quantity and
    /// `CartError::UnavailableVariant` if the product does not offer the
    /// requested size or color.
    pub fn add(
        &mut self,
        product: &Product,
        size: Option<&str>,
        color: Option<&str>,
        quantity: u32,
    ) -> Result<String, CartError> {
        if quantity == 0 {
            return Err(CartError::ZeroQuantity);
        }

        let size = resolve_variant(product, size, &product.sizes, "size")?;
        let color = resolve_variant(product, color, &product.colors, "color")?;
        let key = line_key(&product.id, &size, &color);

        if let Some(line) = self.lines.iter_mut().find(|l| l.item_id == key) {
            line.quantity = line.quantity.saturating_add(quantity);
        } else {
            self.lines.push(CartLine {
                item_id: key.clone(),
                product_id: product.id.clone(),
                name: product.name.clone(),
                price: product.price,
                image: product.primary_image().map(str::to_string),
                size,
                color,
                quantity,
            });
        }
        Ok(key)
    }

    /// Set a line's quantity. Zero removes the line.
    ///
    /// # Errors
    ///
    /// Returns `CartError::LineNotFound` for an unknown key.
    pub fn set_quantity(&mut self, key: &str, quantity: u32) -> Result<(), CartError> {
        if quantity == 0 {
            return self.remove(key).map(|_| ());
        }
        let line = self
            .lines
            .iter_mut()
            .find(|l| l.item_id == key)
            .ok_or_else(|| CartError::LineNotFound(key.to_string()))?;
        line.quantity = quantity;
        Ok(())
    }

    /// Remove a line and return it.
    ///
    /// # Errors
    ///
    /// Returns `CartError::LineNotFound` for an unknown key.
    pub fn remove(&mut self, key: &str) -> Result<CartLine, CartError> {
        let index = self
            .lines
            .iter()
            .position(|l| l.item_id == key)
            .ok_or_else(|| CartError::LineNotFound(key.to_string()))?;
        Ok(self.lines.remove(index))
    }

    pub fn clear(&mut self) {
        self.lines.clear();
    }

    #[must_use]
    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    #[must_use]
    pub fn line(&self, key: &str) -> Option<&CartLine> {
        self.lines.iter().find(|l| l.item_id == key)
    }

    /// Total number of units across all lines, saturating at `u32::MAX`.
    #[must_use]
    pub fn item_count(&self) -> u32 {
        self.lines
            .iter()
            .fold(0, |count: u32, l| count.saturating_add(l.quantity))
    }

    /// `Σ(price × quantity)` in the base currency.
    #[must_use]
    pub fn subtotal(&self) -> Decimal {
        self.lines.iter().map(CartLine::line_total).sum()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Take all lines, leaving the cart empty.
    pub fn take(&mut self) -> Vec<CartLine> {
        std::mem::take(&mut self.lines)
    }
}

fn resolve_variant(
    product: &Product,
    requested: Option<&str>,
    offered: &[String],
    kind: &str,
) -> Result<String, CartError> {
    let requested = requested.map(str::trim).filter(|v| !v.is_empty());
    match requested {
        Some(value) if offered.iter().any(|o| o == value) => Ok(value.to_string()),
        Some(value) => Err(CartError::UnavailableVariant {
            product: product.name.clone(),
            variant: format!("{kind} {value}"),
        }),
        // Products without any variants of this kind use an empty value.
        None => Ok(offered.first().cloned().unwrap_or_default()),
    }
}

/// Parse a quantity for add-to-cart. Blank, non-numeric or non-positive
/// input falls back to [`DEFAULT_QUANTITY`].
#[must_use]
pub fn parse_quantity(input: &str) -> u32 {
    input
        .trim()
        .parse::<u32>()
        .ok()
        .filter(|q| *q > 0)
        .unwrap_or(DEFAULT_QUANTITY)
}

/// Parse a quantity for a cart update. Unreadable or non-positive input
/// becomes 0, which removes the line.
#[must_use]
pub fn parse_update_quantity(input: &str) -> u32 {
    input.trim().parse::<i64>().ok().map_or(0, |q| {
        u32::try_from(q).unwrap_or(if q < 0 { 0 } else { u32::MAX })
    })
}
