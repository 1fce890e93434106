//! Storefront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! All variables are optional.
//! - `LUXE_HOST` - Bind address (default: 127.0.0.1)
//! - `LUXE_PORT` - Listen port (default: 3000)
//! - `LUXE_BASE_URL` - Public URL; `https://` enables secure cookies
//!   (default: `http://localhost:3000`)
//! - `LUXE_PAGE_SIZE` - Products per shop page (default: 8)
//! - `LUXE_TAX_RATE` - Sales tax rate as a decimal fraction (default: 0.05)
//! - `LUXE_TAX_BASIS` - `subtotal` or `discounted` (default: subtotal)
//! - `LUXE_PRICE_UPPER_BOUND` - `inclusive` or `exclusive` (default: inclusive)
//! - `LUXE_SEARCH_CATEGORY` - Also match search terms against category names
//!   (default: false)
//! - `LUXE_CATALOG_PATH` - JSON catalog to load instead of the built-in one
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name

use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;
use std::str::FromStr;

use luxe_core::filter::DEFAULT_PER_PAGE;
use luxe_core::pricing::DEFAULT_TAX_RATE;
use luxe_core::{PipelineOptions, TaxBasis};
use rust_decimal::Decimal;
use thiserror::Error;
use url::Url;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Storefront application configuration.
#[derive(Debug, Clone)]
pub struct StorefrontConfig {
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Public base URL for the storefront
    pub base_url: String,
    /// Products per shop page
    pub page_size: usize,
    pub tax_rate: Decimal,
    pub tax_basis: TaxBasis,
    /// Filter pipeline options
    pub pipeline: PipelineOptions,
    /// Optional catalog file; the built-in catalog is used when unset
    pub catalog_path: Option<PathBuf>,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    pub sentry_environment: Option<String>,
}

impl Default for StorefrontConfig {
    fn default() -> Self {
        Self {
            host: IpAddr::from([127, 0, 0, 1]),
            port: 3000,
            base_url: "http://localhost:3000".to_string(),
            page_size: DEFAULT_PER_PAGE,
            tax_rate: DEFAULT_TAX_RATE,
            tax_basis: TaxBasis::default(),
            pipeline: PipelineOptions::default(),
            catalog_path: None,
            sentry_dsn: None,
            sentry_environment: None,
        }
    }
}

impl StorefrontConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set to an invalid value.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let host = parse_env("LUXE_HOST", "127.0.0.1")?;
        let port = parse_env("LUXE_PORT", "3000")?;
        let base_url = get_env_or_default("LUXE_BASE_URL", "http://localhost:3000");
        Url::parse(&base_url)
            .map_err(|e| ConfigError::InvalidEnvVar("LUXE_BASE_URL".to_string(), e.to_string()))?;

        let page_size: usize = parse_env("LUXE_PAGE_SIZE", "8")?;
        if page_size == 0 {
            return Err(ConfigError::InvalidEnvVar(
                "LUXE_PAGE_SIZE".to_string(),
                "must be at least 1".to_string(),
            ));
        }

        let tax_rate: Decimal = parse_env("LUXE_TAX_RATE", "0.05")?;
        if tax_rate.is_sign_negative() || tax_rate >= Decimal::ONE {
            return Err(ConfigError::InvalidEnvVar(
                "LUXE_TAX_RATE".to_string(),
                format!("expected a fraction in 0..1, got {tax_rate}"),
            ));
        }

        let pipeline = PipelineOptions {
            upper_bound: parse_env("LUXE_PRICE_UPPER_BOUND", "inclusive")?,
            search_category: parse_env("LUXE_SEARCH_CATEGORY", "false")?,
        };

        Ok(Self {
            host,
            port,
            base_url,
            page_size,
            tax_rate,
            tax_basis: parse_env("LUXE_TAX_BASIS", "subtotal")?,
            pipeline,
            catalog_path: get_optional_env("LUXE_CATALOG_PATH").map(PathBuf::from),
            sentry_dsn: get_optional_env("SENTRY_DSN"),
            sentry_environment: get_optional_env("SENTRY_ENVIRONMENT"),
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    /// Whether cookies should carry the `Secure` flag.
    #[must_use]
    pub fn is_secure(&self) -> bool {
        self.base_url.starts_with("https://")
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get an optional environment variable. Empty values count as unset.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    get_optional_env(key).unwrap_or_else(|| default.to_string())
}

/// Parse an environment variable, falling back to `default` when unset.
fn parse_env<T>(key: &str, default: &str) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    parse_value(key, &get_env_or_default(key, default))
}

fn parse_value<T>(key: &str, raw: &str) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    raw.trim()
        .parse::<T>()
        .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use luxe_core::UpperBound;

    use super::*;

    #[test]
    fn test_default_socket_addr() {
        let config = StorefrontConfig::default();
        assert_eq!(config.socket_addr().to_string(), "127.0.0.1:3000");
        assert!(!config.is_secure());
    }

    #[test]
    fn test_parse_value_reports_key() {
        let err = parse_value::<u16>("LUXE_PORT", "eighty").unwrap_err();
        assert!(err.to_string().starts_with("Invalid environment variable LUXE_PORT"));
    }

    #[test]
    fn test_parse_value_domain_types() {
        assert_eq!(
            parse_value::<UpperBound>("K", "exclusive").unwrap(),
            UpperBound::Exclusive
        );
        assert_eq!(
            parse_value::<TaxBasis>("K", "discounted").unwrap(),
            TaxBasis::DiscountedSubtotal
        );
        assert_eq!(
            parse_value::<Decimal>("K", " 0.08 ").unwrap(),
            Decimal::new(8, 2)
        );
        assert!(parse_value::<bool>("K", "sometimes").is_err());
    }

    #[test]
    fn test_secure_cookies_follow_scheme() {
        let config = StorefrontConfig {
            base_url: "https://luxe.example".to_string(),
            ..StorefrontConfig::default()
        };
        assert!(config.is_secure());
    }
}
