//! Three-step checkout from the terminal.

use std::io::Write;

use clap::Subcommand;
use luxe_core::{Action, PaymentDetails, ShippingDetails, ShippingMethod};

use super::Context;
use crate::error::Result;
use crate::render;

#[derive(Debug, Subcommand)]
pub enum CheckoutCommand {
    /// Show the current step and the order summary
    Show,
    /// Step 1: shipping address
    Shipping {
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        address: String,
        #[arg(long)]
        city: String,
        #[arg(long)]
        postal_code: String,
        #[arg(long)]
        country: String,
    },
    /// Step 2: delivery method (free, standard, express)
    Delivery { method: ShippingMethod },
    /// Go back one step
    Back,
    /// Step 3: pay and place the order
    Pay {
        #[arg(long)]
        cardholder: String,
        #[arg(long)]
        card_number: String,
        /// MM/YY
        #[arg(long)]
        expiry: String,
        #[arg(long)]
        cvc: String,
    },
}

/// # Errors
///
/// Returns the store's rejection or an I/O error.
pub fn run(ctx: &mut Context, command: CheckoutCommand, out: &mut impl Write) -> Result<()> {
    let action = match command {
        CheckoutCommand::Show => {
            let totals = ctx.store().totals(ctx.state());
            render::checkout(out, ctx.state(), &totals)?;
            return Ok(());
        }
        CheckoutCommand::Shipping {
            name,
            email,
            address,
            city,
            postal_code,
            country,
        } => Action::SubmitShipping(ShippingDetails {
            full_name: name,
            email,
            address,
            city,
            postal_code,
            country,
        }),
        CheckoutCommand::Delivery { method } => Action::ChooseDelivery(method),
        CheckoutCommand::Back => Action::CheckoutBack,
        CheckoutCommand::Pay {
            cardholder,
            card_number,
            expiry,
            cvc,
        } => {
            // The order notice is the whole output once the cart is gone.
            return ctx.dispatch(
                Action::PlaceOrder(PaymentDetails {
                    cardholder,
                    card_number,
                    expiry,
                    cvc,
                }),
                out,
            );
        }
    };

    ctx.dispatch(action, out)?;
    let totals = ctx.store().totals(ctx.state());
    render::checkout(out, ctx.state(), &totals)?;
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use luxe_core::CheckoutStep;

    use super::super::cart::{self, CartCommand};
    use super::super::testing::{context, reload, text};
    use super::*;
    use crate::error::CliError;

    fn shipping() -> CheckoutCommand {
        CheckoutCommand::Shipping {
            name: "Ada Lovelace".to_string(),
            email: "ada@example.com".to_string(),
            address: "1 Analytical Way".to_string(),
            city: "London".to_string(),
            postal_code: "N1 9GU".to_string(),
            country: "UK".to_string(),
        }
    }

    fn pay() -> CheckoutCommand {
        CheckoutCommand::Pay {
            cardholder: "Ada Lovelace".to_string(),
            card_number: "4242 4242 4242 4242".to_string(),
            expiry: "12/30".to_string(),
            cvc: "123".to_string(),
        }
    }

    #[test]
    fn test_full_checkout_records_order() {
        let (_dir, mut ctx) = context();
        let mut out = Vec::new();
        cart::run(
            &mut ctx,
            CartCommand::Add {
                product_id: "101".to_string(),
                size: None,
                color: None,
                quantity: "1".to_string(),
            },
            &mut out,
        )
        .unwrap();

        run(&mut ctx, shipping(), &mut out).unwrap();
        assert!(text(out.clone()).contains("Delivery: Standard"));
        run(&mut ctx, CheckoutCommand::Delivery { method: ShippingMethod::Express }, &mut out)
            .unwrap();
        run(&mut ctx, pay(), &mut out).unwrap();

        let saved = reload(&ctx);
        assert!(saved.cart.is_empty());
        assert_eq!(saved.orders.len(), 1);
        assert_eq!(saved.checkout.step, CheckoutStep::Shipping);
        assert!(text(out).contains("placed successfully!"));
    }

    #[test]
    fn test_paying_out_of_order_is_rejected() {
        let (_dir, mut ctx) = context();
        let mut out = Vec::new();
        let err = run(&mut ctx, pay(), &mut out).unwrap_err();
        assert!(matches!(err, CliError::Rejected(_)));
        assert!(reload(&ctx).orders.is_empty());
    }
}
