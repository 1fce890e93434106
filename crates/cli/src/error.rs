//! CLI error type.

use std::path::PathBuf;

use luxe_core::{CatalogError, FilterError, StoreError};
use thiserror::Error;

/// Errors that end a command with a non-zero exit code.
#[derive(Debug, Error)]
pub enum CliError {
    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },

    /// The state file exists but does not hold a saved state. It is left
    /// untouched so nothing is lost; `luxe reset` starts over.
    #[error("state file {} is corrupt: {source}", path.display())]
    CorruptState {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("failed to encode state: {0}")]
    Encode(serde_json::Error),

    #[error(transparent)]
    Catalog(#[from] CatalogError),

    /// The action was rejected by the store.
    #[error("{0}")]
    Rejected(String),

    #[error(transparent)]
    Filter(#[from] FilterError),

    #[error("product not found: {0}")]
    ProductNotFound(String),

    #[error("order not found: {0}")]
    OrderNotFound(String),

    #[error("log in as an admin to change order status")]
    AdminRequired,

    #[error("output error: {0}")]
    Output(#[from] std::io::Error),
}

impl From<StoreError> for CliError {
    fn from(err: StoreError) -> Self {
        Self::Rejected(luxe_core::Notice::from(&err).message)
    }
}

pub type Result<T> = std::result::Result<T, CliError>;
