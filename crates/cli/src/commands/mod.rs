//! Command implementations.
//!
//! Every command runs against a [`Context`]: the store plus the visitor
//! state loaded from the state file.

pub mod account;
pub mod cart;
pub mod checkout;
pub mod products;

use std::io::Write;

use chrono::Utc;
use luxe_core::{Action, ClientState, Store};

use crate::error::Result;
use crate::render;
use crate::state_file::StateFile;

pub struct Context {
    store: Store,
    file: StateFile,
    state: ClientState,
}

impl Context {
    /// Load the visitor state from `file`.
    ///
    /// # Errors
    ///
    /// Returns an error if the state file cannot be read.
    pub fn open(store: Store, file: StateFile) -> Result<Self> {
        let state = file.load()?;
        Ok(Self { store, file, state })
    }

    pub const fn store(&self) -> &Store {
        &self.store
    }

    pub const fn state(&self) -> &ClientState {
        &self.state
    }

    /// Apply one action, save the state and print its notice.
    ///
    /// The state is saved even when the action is rejected, since an
    /// unknown coupon still clears the applied one.
    ///
    /// # Errors
    ///
    /// Returns the rejection, or an error if saving or printing fails.
    pub fn dispatch(&mut self, action: Action, out: &mut impl Write) -> Result<()> {
        let name = action.name();
        let result = self.store.dispatch(&mut self.state, action, Utc::now());
        self.file.save(&self.state)?;

        match result {
            Ok(Some(notice)) => render::notice(out, &notice)?,
            Ok(None) => {}
            Err(err) => {
                tracing::warn!(action = name, error = %err, "action rejected");
                return Err(err.into());
            }
        }
        Ok(())
    }

    /// Apply actions in order, stopping at the first rejection.
    ///
    /// # Errors
    ///
    /// See [`Context::dispatch`].
    pub fn dispatch_all(
        &mut self,
        actions: impl IntoIterator<Item = Action>,
        out: &mut impl Write,
    ) -> Result<()> {
        for action in actions {
            self.dispatch(action, out)?;
        }
        Ok(())
    }

    /// Forget everything saved for this visitor.
    ///
    /// # Errors
    ///
    /// Returns an error if the state file cannot be removed.
    pub fn reset(&mut self, out: &mut impl Write) -> Result<()> {
        self.file.remove()?;
        self.state = ClientState::default();
        tracing::info!(path = %self.file.path().display(), "state reset");
        writeln!(out, "Saved state cleared.")?;
        Ok(())
    }
}
