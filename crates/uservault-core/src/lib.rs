//! # Uservault Core
//!
//! Core library for Uservault - a small encrypted store of user records
//! with the password field sealed at rest.
//!
//! This crate provides the domain logic, storage abstraction, and cipher
//! independent of the CLI interface.
//!
//! ## Architecture
//!
//! - **crypto**: vault key handling and authenticated sealing of secrets
//! - **storage**: backend trait, SQLite implementation, and row types
//! - **store**: the CRUD record store tying the two together
//!
//! A record's password travels as plaintext only inside API values; the
//! `users` table on disk ever holds just the sealed bytes.

pub mod crypto;
pub mod error;
pub mod storage;
pub mod store;

pub use crypto::SecretKey;
pub use error::{Result, VaultError};
pub use storage::{NewUser, SqliteBackend, UserPatch, UserRecord};
pub use store::UserStore;

/// Core version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
