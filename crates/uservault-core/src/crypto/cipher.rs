//! Authenticated sealing and opening of secret values.
//!
//! Secrets are sealed with AES-256-GCM under the vault key. Each seal uses
//! a fresh random 96-bit nonce, prepended to the ciphertext, so the same
//! plaintext seals to a different byte sequence on every call. The GCM tag
//! makes truncation or corruption of a stored value a hard failure on open
//! rather than silently wrong plaintext.

use aes_gcm::{
    aead::{Aead, AeadCore, KeyInit, OsRng},
    Aes256Gcm, Nonce,
};

use crate::crypto::key::SecretKey;
use crate::error::{Result, VaultError};

/// AES-GCM nonce length in bytes.
const NONCE_LENGTH: usize = 12;

/// AES-GCM authentication tag length in bytes.
const TAG_LENGTH: usize = 16;

/// Maximum plaintext size accepted by [`seal`]. Secrets are passwords,
/// not documents.
pub const MAX_SECRET_BYTES: usize = 4096;

/// Seal a plaintext secret under the vault key.
///
/// # Returns
///
/// Returns `nonce || ciphertext || tag` as a single opaque byte sequence,
/// suitable for storing in the `secret_cipher` column.
///
/// # Errors
///
/// Returns `VaultError::Encryption` if the plaintext exceeds
/// [`MAX_SECRET_BYTES`] or the cipher cannot be initialized.
pub fn seal(key: &SecretKey, plaintext: &[u8]) -> Result<Vec<u8>> {
    if plaintext.len() > MAX_SECRET_BYTES {
        return Err(VaultError::Encryption(format!(
            "Secret too large ({} bytes, max {})",
            plaintext.len(),
            MAX_SECRET_BYTES
        )));
    }

    let cipher = build_cipher(key)?;
    let nonce = Aes256Gcm::generate_nonce(&mut OsRng);
    let ciphertext = cipher
        .encrypt(&nonce, plaintext)
        .map_err(|e| VaultError::Encryption(format!("Sealing failed: {}", e)))?;

    let mut sealed = Vec::with_capacity(NONCE_LENGTH + ciphertext.len());
    sealed.extend_from_slice(nonce.as_slice());
    sealed.extend_from_slice(&ciphertext);
    Ok(sealed)
}

/// Open a sealed secret under the vault key.
///
/// # Errors
///
/// Returns `VaultError::Decryption` if the input is shorter than a valid
/// sealed value, was sealed under a different key, or fails GCM tag
/// verification because it has been truncated or corrupted.
pub fn open(key: &SecretKey, sealed: &[u8]) -> Result<Vec<u8>> {
    if sealed.len() < NONCE_LENGTH + TAG_LENGTH {
        return Err(VaultError::Decryption(format!(
            "Sealed value too short ({} bytes)",
            sealed.len()
        )));
    }

    let cipher = build_cipher(key)?;
    let (nonce_bytes, ciphertext) = sealed.split_at(NONCE_LENGTH);
    let nonce = Nonce::from_slice(nonce_bytes);

    cipher
        .decrypt(nonce, ciphertext)
        .map_err(|_| VaultError::Decryption("Tag verification failed".to_string()))
}

fn build_cipher(key: &SecretKey) -> Result<Aes256Gcm> {
    Aes256Gcm::new_from_slice(key.as_bytes())
        .map_err(|e| VaultError::Encryption(format!("Cipher init failed: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seal_open_round_trip() {
        let key = SecretKey::generate();
        let plaintext = b"mysecretpassword";

        let sealed = seal(&key, plaintext).unwrap();
        let opened = open(&key, &sealed).unwrap();

        assert_eq!(opened, plaintext);
    }

    #[test]
    fn test_sealed_value_differs_from_plaintext() {
        let key = SecretKey::generate();
        let plaintext = b"secret data";

        let sealed = seal(&key, plaintext).unwrap();

        assert_ne!(sealed.as_slice(), plaintext);
        assert!(sealed.len() > plaintext.len());
    }

    #[test]
    fn test_sealing_is_randomized() {
        let key = SecretKey::generate();
        let plaintext = b"same plaintext";

        let sealed1 = seal(&key, plaintext).unwrap();
        let sealed2 = seal(&key, plaintext).unwrap();

        // Fresh nonce per call: identical plaintext, different ciphertext.
        assert_ne!(sealed1, sealed2);
        assert_eq!(open(&key, &sealed1).unwrap(), plaintext);
        assert_eq!(open(&key, &sealed2).unwrap(), plaintext);
    }

    #[test]
    fn test_wrong_key_fails_open() {
        let key1 = SecretKey::generate();
        let key2 = SecretKey::generate();

        let sealed = seal(&key1, b"secret data").unwrap();
        let result = open(&key2, &sealed);

        assert!(matches!(result, Err(VaultError::Decryption(_))));
    }

    #[test]
    fn test_any_flipped_byte_fails_open() {
        let key = SecretKey::generate();
        let sealed = seal(&key, b"pw1").unwrap();

        for index in 0..sealed.len() {
            let mut corrupted = sealed.clone();
            corrupted[index] ^= 0xFF;

            let result = open(&key, &corrupted);
            assert!(
                matches!(result, Err(VaultError::Decryption(_))),
                "byte {} flip should fail open",
                index
            );
        }
    }

    #[test]
    fn test_truncated_value_fails_open() {
        let key = SecretKey::generate();
        let sealed = seal(&key, b"secret data").unwrap();

        let result = open(&key, &sealed[..sealed.len() - 1]);
        assert!(matches!(result, Err(VaultError::Decryption(_))));

        let result = open(&key, &sealed[..NONCE_LENGTH]);
        assert!(matches!(result, Err(VaultError::Decryption(_))));
    }

    #[test]
    fn test_empty_plaintext_round_trips() {
        let key = SecretKey::generate();

        let sealed = seal(&key, b"").unwrap();
        let opened = open(&key, &sealed).unwrap();

        assert!(opened.is_empty());
    }

    #[test]
    fn test_oversized_plaintext_rejected() {
        let key = SecretKey::generate();
        let plaintext = vec![0x42u8; MAX_SECRET_BYTES + 1];

        let result = seal(&key, &plaintext);
        assert!(matches!(result, Err(VaultError::Encryption(_))));
    }
}
