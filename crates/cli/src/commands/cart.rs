//! Cart and wishlist commands.

use std::io::Write;

use clap::Subcommand;
use luxe_core::{Action, ProductId, cart};

use super::Context;
use crate::error::Result;
use crate::render;

#[derive(Debug, Subcommand)]
pub enum CartCommand {
    /// Show the cart with its totals
    Show,
    /// Add a product; missing size/color default to the first offered
    Add {
        product_id: String,
        #[arg(long)]
        size: Option<String>,
        #[arg(long)]
        color: Option<String>,
        /// Blank or invalid input adds one
        #[arg(short, long, default_value = "1", allow_hyphen_values = true)]
        quantity: String,
    },
    /// Set a line's quantity; zero or invalid input removes it
    Update {
        item_id: String,
        #[arg(allow_hyphen_values = true)]
        quantity: String,
    },
    /// Remove a line
    Remove { item_id: String },
    /// Apply a coupon code
    Coupon { code: String },
}

#[derive(Debug, Subcommand)]
pub enum WishlistCommand {
    /// Show saved products
    Show,
    /// Save or unsave a product
    Toggle { product_id: String },
    /// Move a saved product into the cart
    Move { product_id: String },
}

fn show_cart(ctx: &Context, out: &mut impl Write) -> Result<()> {
    let totals = ctx.store().totals(ctx.state());
    render::cart(out, ctx.state(), &totals)?;
    Ok(())
}

/// # Errors
///
/// Returns the store's rejection or an I/O error.
pub fn run(ctx: &mut Context, command: CartCommand, out: &mut impl Write) -> Result<()> {
    match command {
        CartCommand::Show => return show_cart(ctx, out),
        CartCommand::Add {
            product_id,
            size,
            color,
            quantity,
        } => {
            let action = Action::AddToCart {
                product_id: ProductId::new(product_id),
                size,
                color,
                quantity: cart::parse_quantity(&quantity),
            };
            return ctx.dispatch(action, out);
        }
        CartCommand::Update { item_id, quantity } => ctx.dispatch(
            Action::UpdateQuantity {
                item_id,
                quantity: cart::parse_update_quantity(&quantity),
            },
            out,
        )?,
        CartCommand::Remove { item_id } => ctx.dispatch(Action::RemoveLine { item_id }, out)?,
        CartCommand::Coupon { code } => ctx.dispatch(Action::ApplyCoupon(code), out)?,
    }
    show_cart(ctx, out)
}

/// # Errors
///
/// Returns the store's rejection or an I/O error.
pub fn run_wishlist(ctx: &mut Context, command: WishlistCommand, out: &mut impl Write) -> Result<()> {
    match command {
        WishlistCommand::Show => {
            let products = ctx.state().wishlist.products(ctx.store().catalog());
            render::wishlist(out, &products, ctx.state().currency)?;
            Ok(())
        }
        WishlistCommand::Toggle { product_id } => ctx.dispatch(
            Action::ToggleWishlist {
                product_id: ProductId::new(product_id),
            },
            out,
        ),
        WishlistCommand::Move { product_id } => ctx.dispatch(
            Action::MoveToCart {
                product_id: ProductId::new(product_id),
            },
            out,
        ),
    }
}
