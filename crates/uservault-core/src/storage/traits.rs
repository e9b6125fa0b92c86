//! Storage backend trait definition.
//!
//! The `UserBackend` trait defines the interface the record store requires
//! of its persistence engine: a single table with exact-match lookup by id,
//! where mutations report whether any row was affected. This abstraction
//! keeps the store testable against in-memory engines and leaves room for
//! backends other than SQLite without changing the core logic.

use crate::error::Result;
use crate::storage::types::{RowPatch, UserRow};

/// Persistence interface for the `users` table.
///
/// All implementations must ensure:
/// - Ids are assigned by the engine, unique, and never reused after deletion
/// - Rows come back from `select_all` in insertion order
/// - Mutations report whether a row matched, so the store can distinguish
///   not-found from success
pub trait UserBackend {
    /// Insert a row and return its assigned id.
    ///
    /// # Errors
    ///
    /// Returns `VaultError::Storage` if the insert fails, or
    /// `VaultError::StorageBusy` if the engine is transiently locked.
    fn insert(&mut self, username: &str, email: &str, secret_cipher: &[u8]) -> Result<i64>;

    /// Apply the provided fields to the row with the given id.
    ///
    /// All provided fields are applied in one atomic mutation.
    ///
    /// # Returns
    ///
    /// Returns `true` if a row matched, `false` if the id does not exist.
    fn update_by_id(&mut self, id: i64, patch: &RowPatch) -> Result<bool>;

    /// Remove the row with the given id permanently.
    ///
    /// # Returns
    ///
    /// Returns `true` if a row was removed, `false` if the id does not exist.
    fn delete_by_id(&mut self, id: i64) -> Result<bool>;

    /// Fetch every row in insertion order.
    fn select_all(&self) -> Result<Vec<UserRow>>;

    /// Fetch the row with the given id.
    ///
    /// # Returns
    ///
    /// Returns `Ok(Some(row))` if found, `Ok(None)` if not found.
    fn select_by_id(&self, id: i64) -> Result<Option<UserRow>>;
}
