//! Symmetric key material and key derivation.
//!
//! A vault key is either generated fresh from the OS random source (one
//! process lifetime, nothing persisted) or derived from a passphrase with
//! Argon2id so the same key can be re-supplied across process runs.

use argon2::Argon2;
use rand::rngs::OsRng;
use rand::RngCore;
use secrecy::{ExposeSecret, SecretString};
use zeroize::ZeroizeOnDrop;

use crate::error::{Result, VaultError};

/// Argon2id parameters.
///
/// These values balance security and usability:
/// - Memory: 64 MB (64 * 1024 KB)
/// - Iterations: 3
/// - Parallelism: 1 (single-threaded for simplicity)
const ARGON2_MEMORY_KB: u32 = 64 * 1024;
const ARGON2_ITERATIONS: u32 = 3;
const ARGON2_PARALLELISM: u32 = 1;

/// Length of a vault key in bytes (32 bytes = 256 bits for AES-256-GCM).
pub const KEY_LENGTH: usize = 32;

/// Minimum length of a key-derivation salt in bytes.
pub const MIN_SALT_LENGTH: usize = 16;

/// The symmetric key sealing and opening stored secrets.
///
/// Key material is zeroized from memory when dropped, reducing the window
/// of exposure. The key is immutable for the lifetime of the process.
#[derive(Clone, ZeroizeOnDrop)]
pub struct SecretKey {
    /// The raw key bytes (zeroized on drop)
    key: [u8; KEY_LENGTH],
}

impl SecretKey {
    /// Create a `SecretKey` from raw bytes.
    ///
    /// # Security
    ///
    /// The caller is responsible for ensuring the bytes come from a secure source.
    pub fn from_bytes(bytes: [u8; KEY_LENGTH]) -> Self {
        Self { key: bytes }
    }

    /// Generate a fresh, uniformly random key from the OS random source.
    pub fn generate() -> Self {
        let mut bytes = [0u8; KEY_LENGTH];
        OsRng.fill_bytes(&mut bytes);
        Self { key: bytes }
    }

    /// Derive a key from a passphrase using Argon2id.
    ///
    /// Deterministic: the same passphrase and salt always produce the same
    /// key, so a vault can be reopened across process runs. The salt must
    /// be unique per vault and at least [`MIN_SALT_LENGTH`] bytes.
    ///
    /// # Errors
    ///
    /// Returns `VaultError::Validation` for an empty passphrase or a short
    /// salt, `VaultError::Encryption` if derivation itself fails.
    pub fn derive(passphrase: &SecretString, salt: &[u8]) -> Result<Self> {
        if passphrase.expose_secret().is_empty() {
            return Err(VaultError::Validation(
                "Passphrase cannot be empty".to_string(),
            ));
        }

        if salt.len() < MIN_SALT_LENGTH {
            return Err(VaultError::Validation(format!(
                "Salt must be at least {} bytes",
                MIN_SALT_LENGTH
            )));
        }

        let params = argon2::Params::new(
            ARGON2_MEMORY_KB,
            ARGON2_ITERATIONS,
            ARGON2_PARALLELISM,
            Some(KEY_LENGTH),
        )
        .map_err(|e| VaultError::Encryption(format!("Failed to create Argon2 params: {}", e)))?;

        let argon2 = Argon2::new(argon2::Algorithm::Argon2id, argon2::Version::V0x13, params);

        let mut key_bytes = [0u8; KEY_LENGTH];
        argon2
            .hash_password_into(
                passphrase.expose_secret().as_bytes(),
                salt,
                &mut key_bytes,
            )
            .map_err(|e| VaultError::Encryption(format!("Key derivation failed: {}", e)))?;

        Ok(Self::from_bytes(key_bytes))
    }

    /// Get a reference to the raw key bytes.
    ///
    /// # Security
    ///
    /// Avoid storing or logging this value. Use only for immediate cipher operations.
    pub fn as_bytes(&self) -> &[u8; KEY_LENGTH] {
        &self.key
    }
}

impl std::fmt::Debug for SecretKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SecretKey")
            .field("key", &"[REDACTED]")
            .finish()
    }
}

/// Generate a fresh random salt for key derivation.
pub fn generate_salt() -> [u8; MIN_SALT_LENGTH] {
    let mut salt = [0u8; MIN_SALT_LENGTH];
    OsRng.fill_bytes(&mut salt);
    salt
}
