//! Core data types for the storage layer.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Metadata for a vault.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VaultMetadata {
    /// Format version (e.g., "0.1")
    pub format_version: String,

    /// When this vault was created
    pub created_at: DateTime<Utc>,
}

/// A user record as seen by callers, with the secret recovered to plaintext.
///
/// The plaintext `secret` exists only in this in-memory value; on disk the
/// record carries the sealed bytes. Callers display it and discard it.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRecord {
    /// Unique identifier, assigned by the store on creation, never reused
    pub id: i64,

    /// User-facing name
    pub username: String,

    /// Contact email
    pub email: String,

    /// The decrypted password
    pub secret: String,
}

impl std::fmt::Debug for UserRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UserRecord")
            .field("id", &self.id)
            .field("username", &self.username)
            .field("email", &self.email)
            .field("secret", &"[REDACTED]")
            .finish()
    }
}

/// Builder for creating new user records.
#[derive(Clone)]
pub struct NewUser {
    /// User-facing name (must be non-empty)
    pub username: String,

    /// Contact email (must be non-empty)
    pub email: String,

    /// The plaintext password, sealed before it ever reaches storage
    pub secret: String,
}

impl NewUser {
    pub fn new(
        username: impl Into<String>,
        email: impl Into<String>,
        secret: impl Into<String>,
    ) -> Self {
        Self {
            username: username.into(),
            email: email.into(),
            secret: secret.into(),
        }
    }
}

impl std::fmt::Debug for NewUser {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NewUser")
            .field("username", &self.username)
            .field("email", &self.email)
            .field("secret", &"[REDACTED]")
            .finish()
    }
}

/// Partial update of a user record. Fields left as `None` are unchanged.
#[derive(Clone, Default)]
pub struct UserPatch {
    /// Replacement username
    pub username: Option<String>,

    /// Replacement email
    pub email: Option<String>,

    /// Replacement password; re-sealed, overwriting the old cipher wholesale
    pub secret: Option<String>,
}

impl UserPatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn username(mut self, username: impl Into<String>) -> Self {
        self.username = Some(username.into());
        self
    }

    pub fn email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    pub fn secret(mut self, secret: impl Into<String>) -> Self {
        self.secret = Some(secret.into());
        self
    }

    /// True when no field is being changed.
    pub fn is_empty(&self) -> bool {
        self.username.is_none() && self.email.is_none() && self.secret.is_none()
    }
}

impl std::fmt::Debug for UserPatch {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UserPatch")
            .field("username", &self.username)
            .field("email", &self.email)
            .field("secret", &self.secret.as_ref().map(|_| "[REDACTED]"))
            .finish()
    }
}

/// Raw row data from the `users` table, before the secret is opened.
#[derive(Debug, Clone)]
pub struct UserRow {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub secret_cipher: Vec<u8>,
}

/// Sealed replacement values for an UPDATE, as consumed by the backend.
///
/// Unlike [`UserPatch`] this carries the secret already sealed; the
/// backend never sees plaintext.
#[derive(Debug, Clone, Default)]
pub struct RowPatch {
    pub username: Option<String>,
    pub email: Option<String>,
    pub secret_cipher: Option<Vec<u8>>,
}
