//! Error types for vault core operations.
//!
//! This module defines the error taxonomy for all core operations.
//! Errors are descriptive at the core level; the CLI layer maps these
//! to user-friendly messages.

use thiserror::Error;

/// Result type alias for vault operations.
pub type Result<T> = std::result::Result<T, VaultError>;

/// Core error type for vault operations.
#[derive(Debug, Error)]
pub enum VaultError {
    /// Data validation error (empty username/email, oversized secret input)
    #[error("Validation error: {0}")]
    Validation(String),

    /// Sealing a secret failed
    #[error("Encryption error: {0}")]
    Encryption(String),

    /// Opening a stored secret failed (wrong key, truncation, or tampering)
    #[error("Decryption error: {0}")]
    Decryption(String),

    /// Operation targeted a record id that does not exist
    #[error("No user record with id {0}")]
    NotFound(i64),

    /// Backing store is transiently unavailable; the caller may retry
    #[error("Storage busy: {0}")]
    StorageBusy(String),

    /// Storage backend error (I/O, SQL, schema)
    #[error("Storage error: {0}")]
    Storage(String),
}

impl From<rusqlite::Error> for VaultError {
    fn from(err: rusqlite::Error) -> Self {
        match &err {
            rusqlite::Error::SqliteFailure(code, _)
                if matches!(
                    code.code,
                    rusqlite::ErrorCode::DatabaseBusy | rusqlite::ErrorCode::DatabaseLocked
                ) =>
            {
                VaultError::StorageBusy(err.to_string())
            }
            _ => VaultError::Storage(err.to_string()),
        }
    }
}

impl From<std::io::Error> for VaultError {
    fn from(err: std::io::Error) -> Self {
        VaultError::Storage(err.to_string())
    }
}
