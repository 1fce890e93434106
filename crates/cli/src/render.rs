//! Plain-text views written to the terminal.

use std::io::{self, Write};

use luxe_core::{
    ClientState, CurrencyCode, Notice, NoticeLevel, Order, Product, ProductPage, Totals,
    format_price,
};

fn stars(product: &Product) -> String {
    let filled = usize::from(product.stars());
    format!("{}{}", "★".repeat(filled), "☆".repeat(5usize.saturating_sub(filled)))
}

pub fn notice(out: &mut impl Write, notice: &Notice) -> io::Result<()> {
    let marker = match notice.level {
        NoticeLevel::Info => "i",
        NoticeLevel::Success => "✓",
        NoticeLevel::Error => "✗",
    };
    writeln!(out, "{marker} {}", notice.message)
}

pub fn products(out: &mut impl Write, page: &ProductPage<'_>, state: &ClientState) -> io::Result<()> {
    if page.is_empty() {
        writeln!(out, "No products match your filters.")?;
    }
    for product in &page.items {
        let saved = if state.wishlist.contains(&product.id) { "♥" } else { " " };
        writeln!(
            out,
            "{saved} {:<5} {:<28} {:<12} {:>10}  {}",
            product.id,
            product.name,
            product.category.as_str(),
            format_price(product.price, state.currency),
            stars(product),
        )?;
    }
    writeln!(
        out,
        "Page {} of {} ({} products)",
        page.page, page.total_pages, page.total_matches
    )
}

pub fn product(out: &mut impl Write, product: &Product, state: &ClientState) -> io::Result<()> {
    writeln!(out, "{} [{}]", product.name, product.id)?;
    writeln!(out, "{} | SKU {}", product.category.as_str(), product.sku)?;
    writeln!(out, "{}  {} {:.1}", format_price(product.price, state.currency), stars(product), product.rating)?;
    writeln!(out, "{}", product.description)?;
    if !product.sizes.is_empty() {
        writeln!(out, "Sizes:  {}", product.sizes.join(", "))?;
    }
    if !product.colors.is_empty() {
        writeln!(out, "Colors: {}", product.colors.join(", "))?;
    }
    if product.stock > 0 {
        writeln!(out, "{} in stock", product.stock)
    } else {
        writeln!(out, "Out of stock")
    }
}

pub fn totals(out: &mut impl Write, totals: &Totals, state: &ClientState) -> io::Result<()> {
    let currency = state.currency;
    writeln!(out, "Subtotal ({} items): {}", totals.item_count, format_price(totals.subtotal, currency))?;
    if !totals.discount.is_zero() {
        let code = state.coupon.as_ref().map_or("", |c| c.code.as_str());
        writeln!(out, "Discount {code}: -{}", format_price(totals.discount, currency))?;
    }
    let shipping = match totals.shipping {
        None => "Calculated at next step".to_string(),
        Some(fee) if fee.is_zero() => "Free".to_string(),
        Some(fee) => format_price(fee, currency),
    };
    writeln!(out, "Shipping: {shipping}")?;
    writeln!(out, "Tax: {}", format_price(totals.tax, currency))?;
    writeln!(out, "Total: {}", format_price(totals.total, currency))
}

pub fn cart(out: &mut impl Write, state: &ClientState, summary: &Totals) -> io::Result<()> {
    if state.cart.is_empty() {
        return writeln!(out, "Your cart is empty.");
    }
    for line in state.cart.lines() {
        writeln!(
            out,
            "{:<20} {:<28} {:>3} × {:>10} = {:>10}",
            line.item_id,
            line.name,
            line.quantity,
            format_price(line.price, state.currency),
            format_price(line.line_total(), state.currency),
        )?;
    }
    totals(out, summary, state)
}

pub fn wishlist(out: &mut impl Write, products: &[&Product], currency: CurrencyCode) -> io::Result<()> {
    if products.is_empty() {
        return writeln!(out, "Your wishlist is empty.");
    }
    for product in products {
        writeln!(out, "{:<5} {:<28} {:>10}", product.id, product.name, format_price(product.price, currency))?;
    }
    Ok(())
}

pub fn checkout(out: &mut impl Write, state: &ClientState, summary: &Totals) -> io::Result<()> {
    let checkout = &state.checkout;
    writeln!(out, "Checkout step {} of 3", checkout.step.number())?;
    if let Some(details) = &checkout.shipping_details {
        writeln!(
            out,
            "Ship to: {}, {}, {} {}, {} <{}>",
            details.full_name, details.address, details.postal_code, details.city, details.country, details.email
        )?;
    }
    if let Some(method) = checkout.shipping_method {
        writeln!(out, "Delivery: {}", method.label())?;
    }
    totals(out, summary, state)
}

/// Orders are shown in the currency they were placed in.
pub fn orders<'a>(out: &mut impl Write, orders: impl IntoIterator<Item = &'a Order>) -> io::Result<()> {
    let mut any = false;
    for order in orders {
        any = true;
        writeln!(
            out,
            "#{}  {}  {:>3} items  {:>10}  {}",
            order.id,
            order.placed_at.format("%Y-%m-%d"),
            order.totals.item_count,
            format_price(order.totals.total, order.currency),
            order.status,
        )?;
    }
    if !any {
        writeln!(out, "No orders yet.")?;
    }
    Ok(())
}
