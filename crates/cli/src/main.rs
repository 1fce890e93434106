//! Luxe CLI - browse the catalog, fill a cart and check out from a terminal.
//!
//! # Usage
//!
//! ```bash
//! # Women's products under $250, cheapest first
//! luxe products --category Women --price 0-100 --price 100-250 --sort price-low
//!
//! # Add a variant and apply a coupon
//! luxe cart add 101 --size M --color Black
//! luxe cart coupon LUXE20
//!
//! # Check out
//! luxe checkout shipping --name "Ada" --email ada@example.com --address "1 Way" \
//!     --city London --postal-code N1 --country UK
//! luxe checkout delivery express
//! luxe checkout pay --cardholder Ada --card-number 4242424242424242 --expiry 12/30 --cvc 123
//! ```
//!
//! State is kept in a JSON file (`--state`, default `luxe-state.json`) so
//! each invocation continues where the last one left off.

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::io::Write;
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use luxe_core::{Action, Catalog, CurrencyCode, Store};

mod commands;
mod error;
mod render;
mod state_file;

use commands::Context;
use commands::account::OrdersCommand;
use commands::cart::{CartCommand, WishlistCommand};
use commands::checkout::CheckoutCommand;
use commands::products::ProductsArgs;
use error::{CliError, Result};
use state_file::StateFile;

#[derive(Parser)]
#[command(name = "luxe")]
#[command(author, version, about = "Luxe storefront in the terminal")]
struct Cli {
    /// Saved visitor state
    #[arg(long, global = true, env = "LUXE_STATE_PATH", default_value = "luxe-state.json")]
    state: PathBuf,

    /// JSON product catalog; the built-in demo catalog when unset
    #[arg(long, global = true, env = "LUXE_CATALOG_PATH")]
    catalog: Option<PathBuf>,

    /// Products per page
    #[arg(long, global = true, env = "LUXE_PAGE_SIZE", default_value_t = 8)]
    page_size: usize,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List products using the saved or given filters
    Products(ProductsArgs),
    /// Show one product
    Product { id: String },
    /// Manage the cart
    Cart {
        #[command(subcommand)]
        action: CartCommand,
    },
    /// Manage the wishlist
    Wishlist {
        #[command(subcommand)]
        action: WishlistCommand,
    },
    /// Set the display currency (USD, EUR, GBP)
    Currency { code: CurrencyCode },
    /// Log in with a demo account
    Login { email: String, password: String },
    /// Log out
    Logout,
    /// Walk through checkout
    Checkout {
        #[command(subcommand)]
        step: CheckoutCommand,
    },
    /// Order history
    Orders {
        #[command(subcommand)]
        action: OrdersCommand,
    },
    /// Forget all saved state
    Reset,
}

fn main() {
    dotenvy::dotenv().ok();

    // Logs go to stderr so command output stays clean
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "luxe_cli=warn".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let stdout = std::io::stdout();
    let mut out = stdout.lock();

    if let Err(e) = run(cli, &mut out) {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

fn load_catalog(path: Option<&PathBuf>) -> Result<Catalog> {
    let Some(path) = path else {
        return Ok(Catalog::seed());
    };
    let json = std::fs::read_to_string(path).map_err(|source| CliError::Read {
        path: path.clone(),
        source,
    })?;
    let catalog = Catalog::from_json(&json)?;
    tracing::info!(path = %path.display(), products = catalog.len(), "catalog loaded");
    Ok(catalog)
}

fn run(cli: Cli, out: &mut impl Write) -> Result<()> {
    let store = Store::new(load_catalog(cli.catalog.as_ref())?).with_per_page(cli.page_size);
    let mut ctx = Context::open(store, StateFile::new(cli.state))?;

    match cli.command {
        Commands::Products(args) => commands::products::list(&mut ctx, &args, out),
        Commands::Product { id } => commands::products::show(&ctx, &id, out),
        Commands::Cart { action } => commands::cart::run(&mut ctx, action, out),
        Commands::Wishlist { action } => commands::cart::run_wishlist(&mut ctx, action, out),
        Commands::Currency { code } => {
            ctx.dispatch(Action::SetCurrency(code), out)?;
            writeln!(out, "Prices are now shown in {code}.")?;
            Ok(())
        }
        Commands::Login { email, password } => {
            commands::account::login(&mut ctx, email, password, out)
        }
        Commands::Logout => commands::account::logout(&mut ctx, out),
        Commands::Checkout { step } => commands::checkout::run(&mut ctx, step, out),
        Commands::Orders { action } => commands::account::orders(&mut ctx, action, out),
        Commands::Reset => ctx.reset(out),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    fn run_args(state: &std::path::Path, args: &[&str]) -> Result<String> {
        let state = state.to_str().unwrap();
        let cli = Cli::try_parse_from(
            ["luxe", "--state", state].into_iter().chain(args.iter().copied()),
        )
        .unwrap();
        let mut out = Vec::new();
        run(cli, &mut out)?;
        Ok(String::from_utf8(out).unwrap())
    }

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_currency_applies_to_later_runs() {
        let dir = tempfile::tempdir().unwrap();
        let state = dir.path().join("state.json");

        let out = run_args(&state, &["currency", "eur"]).unwrap();
        assert_eq!(out, "Prices are now shown in EUR.\n");

        let out = run_args(&state, &["product", "101"]).unwrap();
        assert!(out.contains('€'));
    }

    #[test]
    fn test_unknown_currency_is_a_usage_error() {
        assert!(Cli::try_parse_from(["luxe", "currency", "JPY"]).is_err());
    }

    #[test]
    fn test_reset_starts_over() {
        let dir = tempfile::tempdir().unwrap();
        let state = dir.path().join("state.json");

        run_args(&state, &["cart", "add", "101"]).unwrap();
        run_args(&state, &["reset"]).unwrap();
        let out = run_args(&state, &["cart", "show"]).unwrap();
        assert_eq!(out, "Your cart is empty.\n");
    }

    #[test]
    fn test_catalog_file_replaces_seed() {
        let dir = tempfile::tempdir().unwrap();
        let state = dir.path().join("state.json");
        let catalog = dir.path().join("catalog.json");
        std::fs::write(&catalog, "[]").unwrap();

        let out = run_args(&state, &["--catalog", catalog.to_str().unwrap(), "products"]).unwrap();
        assert!(out.starts_with("No products match your filters."));
    }
}
