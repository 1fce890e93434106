//! Demo login.
//!
//! The storefront ships with two hard-coded demo accounts. This is a mock:
//! there is no password storage, hashing or account creation. Anything
//! real belongs behind the [`Authenticator`] trait.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::types::{Email, Role};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthError {
    #[error("Invalid email or password.")]
    InvalidCredentials,
}

/// The logged-in visitor, as kept in client state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionUser {
    pub email: Email,
    pub role: Role,
    pub name: String,
}

impl SessionUser {
    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}

/// Checks a login attempt.
pub trait Authenticator: Send + Sync {
    /// # Errors
    ///
    /// Returns `AuthError::InvalidCredentials` when the login is rejected.
    fn authenticate(&self, email: &str, password: &str) -> Result<SessionUser, AuthError>;
}

struct DemoAccount {
    email: &'static str,
    password: &'static str,
    role: Role,
    name: &'static str,
}

const DEMO_ACCOUNTS: &[DemoAccount] = &[
    DemoAccount {
        email: "admin@luxe.com",
        password: "12345",
        role: Role::Admin,
        name: "Admin",
    },
    DemoAccount {
        email: "user@test.com",
        password: "password",
        role: Role::Customer,
        name: "Test User",
    },
];

/// Literal-comparison authenticator over the demo accounts.
#[derive(Debug, Clone, Copy, Default)]
pub struct MockAuthenticator;

impl Authenticator for MockAuthenticator {
    fn authenticate(&self, email: &str, password: &str) -> Result<SessionUser, AuthError> {
        let email = Email::parse(email).map_err(|_| AuthError::InvalidCredentials)?;
        DEMO_ACCOUNTS
            .iter()
            .find(|a| a.email == email.as_str() && a.password == password)
            .map(|a| SessionUser {
                email: email.clone(),
                role: a.role,
                name: a.name.to_string(),
            })
            .ok_or(AuthError::InvalidCredentials)
    }
}
