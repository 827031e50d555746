//! Admin credential check.
//!
//! There are no sessions or tokens: every admin call presents the raw
//! username and password again, either in a JSON body (login) or in the
//! `Authorization` header as `username:password`.

use crate::error::ApiError;
use secrecy::{ExposeSecret, SecretString};
use sha2::{Digest, Sha256};
use subtle::ConstantTimeEq;
use tracing::warn;

/// Configured admin credentials.
pub struct AdminCredentials {
    username: String,
    password: SecretString,
}

impl AdminCredentials {
    pub fn new(username: impl Into<String>, password: SecretString) -> Self {
        Self {
            username: username.into(),
            password,
        }
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    /// Whether both username and password are set.
    pub fn is_configured(&self) -> bool {
        !self.username.is_empty() && !self.password.expose_secret().is_empty()
    }
}

/// Allow/deny gate for the admin endpoints.
pub struct AdminGate {
    credentials: AdminCredentials,
}

impl AdminGate {
    pub fn new(credentials: AdminCredentials) -> Self {
        if !credentials.is_configured() {
            warn!("Admin credentials are not configured; all admin requests will be rejected");
        }
        Self { credentials }
    }

    /// Check a username/password pair.
    ///
    /// Both must match exactly (case-sensitive). Nothing matches while the
    /// gate has no credentials configured.
    pub fn verify(&self, username: &str, password: &str) -> bool {
        if !self.credentials.is_configured() {
            return false;
        }

        let username_ok = digest_eq(username, &self.credentials.username);
        let password_ok = digest_eq(password, self.credentials.password.expose_secret());
        username_ok & password_ok
    }

    /// Check credentials from the login body.
    pub fn login(&self, username: Option<&str>, password: Option<&str>) -> Result<(), ApiError> {
        match (username, password) {
            (Some(u), Some(p)) if self.verify(u, p) => Ok(()),
            _ => {
                warn!("Admin login rejected");
                Err(ApiError::InvalidCredentials)
            }
        }
    }

    /// Check an `Authorization: username:password` header value.
    ///
    /// The value is split on the first colon, so passwords may contain colons.
    pub fn authorize_header(&self, header: Option<&str>) -> Result<(), ApiError> {
        let Some((username, password)) = header.and_then(|h| h.split_once(':')) else {
            warn!("Admin request without usable Authorization header");
            return Err(ApiError::Unauthorized);
        };

        if self.verify(username, password) {
            Ok(())
        } else {
            warn!("Admin request with invalid credentials");
            Err(ApiError::Unauthorized)
        }
    }
}

/// Compare two strings in constant time by comparing their SHA-256 digests.
fn digest_eq(supplied: &str, expected: &str) -> bool {
    let supplied = Sha256::digest(supplied.as_bytes());
    let expected = Sha256::digest(expected.as_bytes());
    supplied.as_slice().ct_eq(expected.as_slice()).into()
}
