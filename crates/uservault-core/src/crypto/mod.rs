//! Cryptographic operations for the vault.
//!
//! This module provides the sealing cipher and key handling:
//! - **AES-256-GCM**: authenticated encryption of stored secrets
//! - **Argon2id**: memory-hard key derivation from a passphrase
//! - Key material zeroized from memory on drop
//!
//! ## Security Model
//!
//! - One symmetric key per vault, generated once or derived from a
//!   passphrase; held in memory only, never persisted
//! - Every stored secret is sealed with a fresh nonce; opening verifies
//!   the GCM tag, so tampering fails loudly instead of producing garbage
//!
//! ## Threat Model
//!
//! We defend against:
//! - Theft of the vault file (secrets are unreadable without the key)
//! - Corruption or modification of stored ciphertext
//!
//! We do NOT defend against:
//! - Compromised OS / keylogger
//! - Access to the running process's memory

pub mod cipher;
pub mod key;

pub use cipher::{open, seal, MAX_SECRET_BYTES};
pub use key::{generate_salt, SecretKey};
