//! Three-step checkout: shipping address, delivery method, payment.
//!
//! The flow is a small state machine. Each step validates its form before
//! advancing; going back to the first step forgets the delivery method so
//! the summary shows shipping as not yet calculated.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::pricing::ShippingMethod;
use crate::types::Email;

/// Errors from checkout transitions.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CheckoutError {
    #[error("checkout is at the {current} step, not {expected}")]
    WrongStep {
        current: CheckoutStep,
        expected: CheckoutStep,
    },
    #[error("please provide a valid {0}")]
    InvalidField(&'static str),
    #[error("cannot place an empty order")]
    EmptyCart,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CheckoutStep {
    #[default]
    Shipping,
    Delivery,
    Payment,
}

impl CheckoutStep {
    /// 1-based step number for progress indicators.
    #[must_use]
    pub const fn number(self) -> u8 {
        match self {
            Self::Shipping => 1,
            Self::Delivery => 2,
            Self::Payment => 3,
        }
    }

    #[must_use]
    pub const fn previous(self) -> Option<Self> {
        match self {
            Self::Shipping => None,
            Self::Delivery => Some(Self::Shipping),
            Self::Payment => Some(Self::Delivery),
        }
    }
}

impl std::fmt::Display for CheckoutStep {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Shipping => write!(f, "shipping"),
            Self::Delivery => write!(f, "delivery"),
            Self::Payment => write!(f, "payment"),
        }
    }
}

/// Step 1 form.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ShippingDetails {
    pub full_name: String,
    pub email: String,
    pub address: String,
    pub city: String,
    pub postal_code: String,
    pub country: String,
}

impl ShippingDetails {
    /// Check required fields and normalize the email.
    ///
    /// # Errors
    ///
    /// Returns `CheckoutError::InvalidField` naming the first bad field.
    pub fn validated(mut self) -> Result<Self, CheckoutError> {
        require(&self.full_name, "full name")?;
        self.email = Email::parse(&self.email)
            .map_err(|_| CheckoutError::InvalidField("email"))?
            .to_string();
        require(&self.address, "address")?;
        require(&self.city, "city")?;
        require(&self.postal_code, "postal code")?;
        require(&self.country, "country")?;
        Ok(self)
    }
}

/// Step 3 form. Only the last four digits of the card are retained.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
pub struct PaymentDetails {
    pub cardholder: String,
    pub card_number: String,
    /// `MM/YY`.
    pub expiry: String,
    pub cvc: String,
}

impl PaymentDetails {
    /// Validate the form and return the card's last four digits.
    ///
    /// # Errors
    ///
    /// Returns `CheckoutError::InvalidField` naming the first bad field.
    pub fn validate(&self) -> Result<String, CheckoutError> {
        require(&self.cardholder, "cardholder name")?;

        let digits: String = self.card_number.chars().filter(|c| !c.is_whitespace()).collect();
        if !(12..=19).contains(&digits.len()) || !digits.chars().all(|c| c.is_ascii_digit()) {
            return Err(CheckoutError::InvalidField("card number"));
        }

        let valid_expiry = self
            .expiry
            .trim()
            .split_once('/')
            .filter(|(mm, yy)| mm.len() == 2 && yy.len() == 2)
            .and_then(|(mm, yy)| Some((mm.parse::<u8>().ok()?, yy.parse::<u8>().ok()?)))
            .is_some_and(|(month, _)| (1..=12).contains(&month));
        if !valid_expiry {
            return Err(CheckoutError::InvalidField("expiry date"));
        }

        let cvc = self.cvc.trim();
        if !(3..=4).contains(&cvc.len()) || !cvc.chars().all(|c| c.is_ascii_digit()) {
            return Err(CheckoutError::InvalidField("security code"));
        }

        Ok(digits.chars().skip(digits.len() - 4).collect())
    }
}

fn require(value: &str, field: &'static str) -> Result<(), CheckoutError> {
    if value.trim().is_empty() {
        Err(CheckoutError::InvalidField(field))
    } else {
        Ok(())
    }
}

/// Checkout progress for one visitor.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Checkout {
    pub step: CheckoutStep,
    pub shipping_details: Option<ShippingDetails>,
    /// `None` until the shipping form is submitted.
    pub shipping_method: Option<ShippingMethod>,
}

impl Checkout {
    fn expect_step(&self, expected: CheckoutStep) -> Result<(), CheckoutError> {
        if self.step == expected {
            Ok(())
        } else {
            Err(CheckoutError::WrongStep {
                current: self.step,
                expected,
            })
        }
    }

    /// Step 1 → 2. Selects standard shipping until the visitor picks one.
    ///
    /// # Errors
    ///
    /// Fails if not at the shipping step or the form is invalid.
    pub fn submit_shipping(&mut self, details: ShippingDetails) -> Result<(), CheckoutError> {
        self.expect_step(CheckoutStep::Shipping)?;
        self.shipping_details = Some(details.validated()?);
        self.shipping_method = Some(ShippingMethod::Standard);
        self.step = CheckoutStep::Delivery;
        Ok(())
    }

    /// Step 2 → 3.
    ///
    /// # Errors
    ///
    /// Fails if not at the delivery step.
    pub fn choose_delivery(&mut self, method: ShippingMethod) -> Result<(), CheckoutError> {
        self.expect_step(CheckoutStep::Delivery)?;
        self.shipping_method = Some(method);
        self.step = CheckoutStep::Payment;
        Ok(())
    }

    /// Go back one step. Returns whether the step changed.
    pub fn back(&mut self) -> bool {
        let Some(previous) = self.step.previous() else {
            return false;
        };
        self.step = previous;
        if previous == CheckoutStep::Shipping {
            self.shipping_method = None;
        }
        true
    }

    /// Validate the payment step and return the card's last four digits.
    /// State is unchanged; [`Checkout::reset`] runs once the order exists.
    ///
    /// # Errors
    ///
    /// Fails if not at the payment step or the form is invalid.
    pub fn confirm_payment(&self, payment: &PaymentDetails) -> Result<String, CheckoutError> {
        self.expect_step(CheckoutStep::Payment)?;
        payment.validate()
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn shipping() -> ShippingDetails {
        ShippingDetails {
            full_name: "Ada Lovelace".to_string(),
            email: "Ada@Example.com".to_string(),
            address: "12 St James's Square".to_string(),
            city: "London".to_string(),
            postal_code: "SW1Y 4JH".to_string(),
            country: "UK".to_string(),
        }
    }

    fn payment() -> PaymentDetails {
        PaymentDetails {
            cardholder: "Ada Lovelace".to_string(),
            card_number: "4242 4242 4242 4242".to_string(),
            expiry: "12/29".to_string(),
            cvc: "123".to_string(),
        }
    }

    #[test]
    fn test_happy_path() {
        let mut checkout = Checkout::default();
        checkout.submit_shipping(shipping()).unwrap();
        assert_eq!(checkout.step, CheckoutStep::Delivery);
        assert_eq!(checkout.shipping_method, Some(ShippingMethod::Standard));
        assert_eq!(
            checkout.shipping_details.as_ref().unwrap().email,
            "ada@example.com"
        );

        checkout.choose_delivery(ShippingMethod::Express).unwrap();
        assert_eq!(checkout.step, CheckoutStep::Payment);
        assert_eq!(checkout.confirm_payment(&payment()).unwrap(), "4242");
    }

    #[test]
    fn test_back_to_first_step_clears_shipping_method() {
        let mut checkout = Checkout::default();
        checkout.submit_shipping(shipping()).unwrap();
        checkout.choose_delivery(ShippingMethod::Express).unwrap();

        assert!(checkout.back());
        assert_eq!(checkout.shipping_method, Some(ShippingMethod::Express));
        assert!(checkout.back());
        assert_eq!(checkout.step, CheckoutStep::Shipping);
        assert_eq!(checkout.shipping_method, None);
        assert!(!checkout.back());
    }

    #[test]
    fn test_steps_cannot_be_skipped() {
        let mut checkout = Checkout::default();
        assert!(matches!(
            checkout.choose_delivery(ShippingMethod::Free),
            Err(CheckoutError::WrongStep { .. })
        ));
        assert!(matches!(
            checkout.confirm_payment(&payment()),
            Err(CheckoutError::WrongStep { .. })
        ));
    }

    #[test]
    fn test_invalid_shipping_form_does_not_advance() {
        let mut checkout = Checkout::default();
        let details = ShippingDetails {
            city: "  ".to_string(),
            ..shipping()
        };
        assert_eq!(
            checkout.submit_shipping(details),
            Err(CheckoutError::InvalidField("city"))
        );
        assert_eq!(checkout.step, CheckoutStep::Shipping);

        let details = ShippingDetails {
            email: "not-an-email".to_string(),
            ..shipping()
        };
        assert_eq!(
            checkout.submit_shipping(details),
            Err(CheckoutError::InvalidField("email"))
        );
    }

    #[test]
    fn test_payment_validation() {
        let bad_card = PaymentDetails {
            card_number: "4242".to_string(),
            ..payment()
        };
        assert_eq!(bad_card.validate(), Err(CheckoutError::InvalidField("card number")));

        let bad_expiry = PaymentDetails {
            expiry: "13/29".to_string(),
            ..payment()
        };
        assert_eq!(bad_expiry.validate(), Err(CheckoutError::InvalidField("expiry date")));

        let bad_cvc = PaymentDetails {
            cvc: "12a".to_string(),
            ..payment()
        };
        assert_eq!(bad_cvc.validate(), Err(CheckoutError::InvalidField("security code")));
    }
}
