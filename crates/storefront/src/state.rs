//! Application state shared across handlers.

use std::path::PathBuf;
use std::sync::Arc;

use luxe_core::{Catalog, CatalogError, CouponBook, PricingPolicy, Store};

use crate::config::StorefrontConfig;

/// Error building the application state.
#[derive(Debug, thiserror::Error)]
pub enum StateError {
    #[error("cannot read catalog {path}: {source}")]
    CatalogIo {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("invalid catalog: {0}")]
    Catalog(#[from] CatalogError),
}

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc`. The store is read-only;
/// per-visitor state lives in the session.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: StorefrontConfig,
    store: Store,
}

impl AppState {
    /// Create the application state, loading the catalog named by the
    /// configuration or falling back to the built-in one.
    ///
    /// # Errors
    ///
    /// Returns `StateError` if the catalog file cannot be read or parsed.
    pub fn new(config: StorefrontConfig) -> Result<Self, StateError> {
        let catalog = match &config.catalog_path {
            Some(path) => {
                let json = std::fs::read_to_string(path).map_err(|source| StateError::CatalogIo {
                    path: path.clone(),
                    source,
                })?;
                Catalog::from_json(&json)?
            }
            None => Catalog::seed(),
        };
        tracing::info!(products = catalog.len(), "catalog loaded");

        Ok(Self::with_catalog(config, catalog))
    }

    /// Create the application state around an already loaded catalog.
    #[must_use]
    pub fn with_catalog(config: StorefrontConfig, catalog: Catalog) -> Self {
        let pricing = PricingPolicy {
            tax_rate: config.tax_rate,
            tax_basis: config.tax_basis,
            coupons: CouponBook::default(),
        };
        let store = Store::new(catalog)
            .with_pricing(pricing)
            .with_pipeline(config.pipeline)
            .with_per_page(config.page_size);

        Self {
            inner: Arc::new(AppStateInner { config, store }),
        }
    }

    /// Get a reference to the storefront configuration.
    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    /// Get a reference to the store (catalog, pricing and reducer).
    #[must_use]
    pub fn store(&self) -> &Store {
        &self.inner.store
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::with_catalog(StorefrontConfig::default(), Catalog::seed())
    }
}
