//! JSON file holding one visitor's saved state.
//!
//! The terminal counterpart of the storefront session: every command
//! loads it, applies its actions and writes it back.

use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use luxe_core::ClientState;
use tempfile::NamedTempFile;

use crate::error::{CliError, Result};

#[derive(Debug, Clone)]
pub struct StateFile {
    path: PathBuf,
}

impl StateFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the saved state. A missing file is a fresh visitor.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or is not valid JSON.
    pub fn load(&self) -> Result<ClientState> {
        let json = match fs::read_to_string(&self.path) {
            Ok(json) => json,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                tracing::debug!(path = %self.path.display(), "no saved state, starting fresh");
                return Ok(ClientState::default());
            }
            Err(source) => {
                return Err(CliError::Read {
                    path: self.path.clone(),
                    source,
                });
            }
        };

        serde_json::from_str(&json).map_err(|source| CliError::CorruptState {
            path: self.path.clone(),
            source,
        })
    }

    /// Write the state through a temp file in the same directory, then
    /// rename it over the old one.
    ///
    /// # Errors
    ///
    /// Returns an error if the state cannot be encoded or written.
    pub fn save(&self, state: &ClientState) -> Result<()> {
        let json = serde_json::to_string_pretty(state).map_err(CliError::Encode)?;
        let write_err = |source: std::io::Error| CliError::Write {
            path: self.path.clone(),
            source,
        };

        let dir = self
            .path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));
        let mut tmp = NamedTempFile::new_in(dir).map_err(write_err)?;
        tmp.write_all(json.as_bytes()).map_err(write_err)?;
        tmp.persist(&self.path).map_err(|e| write_err(e.error))?;

        tracing::debug!(path = %self.path.display(), "state saved");
        Ok(())
    }

    /// Delete the saved state. Deleting a missing file is not an error.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be removed.
    pub fn remove(&self) -> Result<()> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(source) => Err(CliError::Write {
                path: self.path.clone(),
                source,
            }),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use luxe_core::{CurrencyCode, ProductId};

    use super::*;

    #[test]
    fn test_missing_file_is_fresh_state() {
        let dir = tempfile::tempdir().unwrap();
        let file = StateFile::new(dir.path().join("state.json"));
        assert_eq!(file.load().unwrap(), ClientState::default());
    }

    #[test]
    fn test_save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let file = StateFile::new(dir.path().join("state.json"));

        let mut state = ClientState::default();
        state.currency = CurrencyCode::GBP;
        state.wishlist.toggle(&ProductId::from("102"));
        file.save(&state).unwrap();

        assert_eq!(file.load().unwrap(), state);
    }

    #[test]
    fn test_corrupt_file_is_reported_and_kept() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state.json");
        fs::write(&path, "{ not json").unwrap();

        let file = StateFile::new(&path);
        assert!(matches!(file.load(), Err(CliError::CorruptState { .. })));
        assert_eq!(fs::read_to_string(&path).unwrap(), "{ not json");
    }

    #[test]
    fn test_remove_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let file = StateFile::new(dir.path().join("state.json"));
        file.save(&ClientState::default()).unwrap();
        file.remove().unwrap();
        file.remove().unwrap();
        assert!(!file.path().exists());
    }
}
