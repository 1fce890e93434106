//! Per-visitor state extractor.
//!
//! [`Visitor`] loads the visitor's [`ClientState`] from the session at the
//! start of a request. Handlers mutate it only through
//! [`Visitor::dispatch`], which runs the store's reducer, flashes the
//! resulting notice and writes the state back.

use axum::{extract::FromRequestParts, http::request::Parts};
use luxe_core::{Action, ClientState, Notice, Store};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tower_sessions::Session;

use crate::error::{AppError, Result, add_breadcrumb};
use crate::models::session_keys as keys;

/// The current visitor's persisted state.
pub struct Visitor {
    session: Session,
    state: ClientState,
}

impl<S> FromRequestParts<S> for Visitor
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self> {
        // Get the session from extensions (set by SessionManagerLayer)
        let session = parts
            .extensions
            .get::<Session>()
            .cloned()
            .ok_or_else(|| AppError::Internal("session layer is not installed".to_string()))?;
        Self::load(session).await
    }
}

impl Visitor {
    /// Read every slice of client state from `session`.
    ///
    /// # Errors
    ///
    /// Returns an error if the session store fails. A slice that no longer
    /// deserializes is replaced by its default.
    pub async fn load(session: Session) -> Result<Self> {
        let state = ClientState {
            cart: slice(&session, keys::CART).await?,
            wishlist: slice(&session, keys::WISHLIST).await?,
            currency: slice(&session, keys::CURRENCY).await?,
            filters: slice(&session, keys::FILTERS).await?,
            user: slice(&session, keys::USER).await?,
            orders: slice(&session, keys::ORDERS).await?,
            checkout: slice(&session, keys::CHECKOUT).await?,
            coupon: slice(&session, keys::COUPON).await?,
            dark_mode: slice(&session, keys::DARK_MODE).await?,
        };
        Ok(Self { session, state })
    }

    #[must_use]
    pub const fn state(&self) -> &ClientState {
        &self.state
    }

    pub const fn state_mut(&mut self) -> &mut ClientState {
        &mut self.state
    }

    /// Apply `action`, flash its notice and persist the new state.
    ///
    /// Returns whether the action was accepted. Rejections are shown to the
    /// visitor as error notices rather than failing the request.
    ///
    /// # Errors
    ///
    /// Returns an error if the session cannot be written.
    pub async fn dispatch(&mut self, store: &Store, action: Action) -> Result<bool> {
        self.apply(store, [action]).await
    }

    /// Apply several actions in order and persist once. The last notice
    /// produced is the one flashed. Returns whether every action was
    /// accepted.
    ///
    /// # Errors
    ///
    /// Returns an error if the session cannot be written.
    pub async fn apply(
        &mut self,
        store: &Store,
        actions: impl IntoIterator<Item = Action>,
    ) -> Result<bool> {
        let mut accepted = true;
        let mut last_notice = None;

        for action in actions {
            let name = action.name();
            add_breadcrumb("action", name);

            match store.dispatch(&mut self.state, action, chrono::Utc::now()) {
                Ok(notice) => last_notice = notice.or(last_notice),
                Err(err) => {
                    tracing::warn!(action = name, error = %err, "action rejected");
                    last_notice = Some(Notice::from(&err));
                    accepted = false;
                }
            }
        }

        if let Some(notice) = &last_notice {
            self.flash(notice).await?;
        }
        self.save().await?;
        Ok(accepted)
    }

    /// Write every slice of client state back to the session.
    ///
    /// # Errors
    ///
    /// Returns an error if the session cannot be written.
    pub async fn save(&self) -> Result<()> {
        let state = &self.state;
        put(&self.session, keys::CART, &state.cart).await?;
        put(&self.session, keys::WISHLIST, &state.wishlist).await?;
        put(&self.session, keys::CURRENCY, state.currency).await?;
        put(&self.session, keys::FILTERS, &state.filters).await?;
        put(&self.session, keys::USER, &state.user).await?;
        put(&self.session, keys::ORDERS, &state.orders).await?;
        put(&self.session, keys::CHECKOUT, &state.checkout).await?;
        put(&self.session, keys::COUPON, &state.coupon).await?;
        put(&self.session, keys::DARK_MODE, state.dark_mode).await?;
        Ok(())
    }

    /// Queue a notice for the next rendered page.
    ///
    /// # Errors
    ///
    /// Returns an error if the session cannot be written.
    pub async fn flash(&self, notice: &Notice) -> Result<()> {
        put(&self.session, keys::NOTICE, notice).await
    }

    /// Take the queued notice, if any. It is shown once.
    ///
    /// # Errors
    ///
    /// Returns an error if the session store fails.
    pub async fn take_notice(&self) -> Result<Option<Notice>> {
        match self.session.remove::<Notice>(keys::NOTICE).await {
            Ok(notice) => Ok(notice),
            Err(tower_sessions::session::Error::SerdeJson(err)) => {
                tracing::warn!(error = %err, "discarding unreadable notice");
                Ok(None)
            }
            Err(err) => Err(err.into()),
        }
    }
}

async fn slice<T>(session: &Session, key: &str) -> Result<T>
where
    T: DeserializeOwned + Default,
{
    match session.get::<T>(key).await {
        Ok(value) => Ok(value.unwrap_or_default()),
        Err(tower_sessions::session::Error::SerdeJson(err)) => {
            tracing::warn!(key, error = %err, "resetting unreadable session slice");
            Ok(T::default())
        }
        Err(err) => Err(err.into()),
    }
}

async fn put<T>(session: &Session, key: &str, value: T) -> Result<()>
where
    T: Serialize + Send + Sync,
{
    session.insert(key, value).await?;
    Ok(())
}
