//! The user record store.
//!
//! `UserStore` owns a persistence backend and the vault key, and drives the
//! record lifecycle: created by [`UserStore::create`], mutated by
//! [`UserStore::update`], removed permanently by [`UserStore::delete`].
//! The password field is sealed on the way into storage and opened on the
//! way out; plaintext never reaches the backend.

use tracing::debug;

use crate::crypto::{self, SecretKey};
use crate::error::{Result, VaultError};
use crate::storage::traits::UserBackend;
use crate::storage::types::{NewUser, RowPatch, UserPatch, UserRecord, UserRow};

/// CRUD store over user records with the password sealed at rest.
///
/// The store is an explicitly constructed value: it owns its backend handle
/// and its key, and is handed to the caller rather than living in process
/// globals. The key is read-only for the store's lifetime.
pub struct UserStore<B: UserBackend> {
    backend: B,
    key: SecretKey,
}

impl<B: UserBackend> UserStore<B> {
    /// Construct a store over a backend with the given vault key.
    pub fn new(backend: B, key: SecretKey) -> Self {
        Self { backend, key }
    }

    /// Consume the store, returning the backend.
    pub fn into_backend(self) -> B {
        self.backend
    }

    /// Create a new record.
    ///
    /// The secret is sealed before anything is persisted; the returned
    /// record is the only place the plaintext secret travels back to the
    /// caller.
    ///
    /// # Errors
    ///
    /// Returns `VaultError::Validation` if username or email is empty
    /// (nothing is persisted), `VaultError::Encryption` if sealing fails.
    pub fn create(&mut self, new_user: NewUser) -> Result<UserRecord> {
        validate_field("username", &new_user.username)?;
        validate_field("email", &new_user.email)?;

        let sealed = crypto::seal(&self.key, new_user.secret.as_bytes())?;
        let id = self
            .backend
            .insert(&new_user.username, &new_user.email, &sealed)?;

        debug!(id, username = %new_user.username, "created user record");

        Ok(UserRecord {
            id,
            username: new_user.username,
            email: new_user.email,
            secret: new_user.secret,
        })
    }

    /// Fetch every record in insertion order, secrets recovered.
    ///
    /// # Errors
    ///
    /// Returns `VaultError::Decryption` if any record's cipher cannot be
    /// opened. The whole call fails rather than skipping the record; an
    /// unopenable row means the vault is corrupt or the key is wrong.
    pub fn read_all(&self) -> Result<Vec<UserRecord>> {
        let rows = self.backend.select_all()?;

        let mut records = Vec::with_capacity(rows.len());
        for row in rows {
            records.push(self.open_row(row)?);
        }

        debug!(count = records.len(), "read all user records");
        Ok(records)
    }

    /// Fetch one record by id, secret recovered.
    ///
    /// # Errors
    ///
    /// Returns `VaultError::NotFound` if the id does not exist.
    pub fn read_by_id(&self, id: i64) -> Result<UserRecord> {
        let row = self
            .backend
            .select_by_id(id)?
            .ok_or(VaultError::NotFound(id))?;
        self.open_row(row)
    }

    /// Apply a partial update to the record with the given id.
    ///
    /// Omitted fields are left unchanged. A provided secret is re-sealed
    /// and the old cipher is overwritten wholesale. All provided fields
    /// are committed in one backend mutation, or none are.
    ///
    /// # Errors
    ///
    /// Returns `VaultError::NotFound` if the id does not exist,
    /// `VaultError::Validation` if a provided username or email is empty
    /// (nothing is written).
    pub fn update(&mut self, id: i64, patch: UserPatch) -> Result<UserRecord> {
        if let Some(ref username) = patch.username {
            validate_field("username", username)?;
        }
        if let Some(ref email) = patch.email {
            validate_field("email", email)?;
        }

        let existing = self
            .backend
            .select_by_id(id)?
            .ok_or(VaultError::NotFound(id))?;

        let sealed = match patch.secret.as_deref() {
            Some(secret) => Some(crypto::seal(&self.key, secret.as_bytes())?),
            None => None,
        };

        let row_patch = RowPatch {
            username: patch.username.clone(),
            email: patch.email.clone(),
            secret_cipher: sealed,
        };
        if !self.backend.update_by_id(id, &row_patch)? {
            // Row vanished between the select and the update.
            return Err(VaultError::NotFound(id));
        }

        debug!(id, "updated user record");

        let secret = match patch.secret {
            Some(secret) => secret,
            None => self.open_secret(&existing)?,
        };
        Ok(UserRecord {
            id,
            username: patch.username.unwrap_or(existing.username),
            email: patch.email.unwrap_or(existing.email),
            secret,
        })
    }

    /// Remove the record with the given id permanently.
    ///
    /// # Errors
    ///
    /// Returns `VaultError::NotFound` if the id does not exist, including
    /// a second delete of the same id, which is surfaced, not swallowed.
    pub fn delete(&mut self, id: i64) -> Result<()> {
        if !self.backend.delete_by_id(id)? {
            return Err(VaultError::NotFound(id));
        }
        debug!(id, "deleted user record");
        Ok(())
    }

    fn open_row(&self, row: UserRow) -> Result<UserRecord> {
        let secret = self.open_secret(&row)?;
        Ok(UserRecord {
            id: row.id,
            username: row.username,
            email: row.email,
            secret,
        })
    }

    fn open_secret(&self, row: &UserRow) -> Result<String> {
        let plaintext = crypto::open(&self.key, &row.secret_cipher).map_err(|e| {
            VaultError::Decryption(format!("Record {}: {}", row.id, e))
        })?;
        String::from_utf8(plaintext)
            .map_err(|_| VaultError::Decryption(format!("Record {}: secret is not UTF-8", row.id)))
    }
}

fn validate_field(name: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(VaultError::Validation(format!("{} cannot be empty", name)));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::sqlite::SqliteBackend;

    fn store() -> UserStore<SqliteBackend> {
        let backend = SqliteBackend::in_memory().expect("in-memory vault");
        UserStore::new(backend, SecretKey::generate())
    }

    #[test]
    fn test_create_rejects_empty_username() {
        let mut store = store();

        let result = store.create(NewUser::new("", "a@example.com", "pw1"));
        assert!(matches!(result, Err(VaultError::Validation(_))));

        let result = store.create(NewUser::new("   ", "a@example.com", "pw1"));
        assert!(matches!(result, Err(VaultError::Validation(_))));

        assert!(store.read_all().expect("read_all").is_empty());
    }

    #[test]
    fn test_create_rejects_empty_email() {
        let mut store = store();

        let result = store.create(NewUser::new("alice", "", "pw1"));
        assert!(matches!(result, Err(VaultError::Validation(_))));
        assert!(store.read_all().expect("read_all").is_empty());
    }

    #[test]
    fn test_update_rejects_empty_replacement_fields() {
        let mut store = store();
        let record = store
            .create(NewUser::new("alice", "a@example.com", "pw1"))
            .expect("create");

        let result = store.update(record.id, UserPatch::new().email("  "));
        assert!(matches!(result, Err(VaultError::Validation(_))));

        let unchanged = store.read_by_id(record.id).expect("read_by_id");
        assert_eq!(unchanged.email, "a@example.com");
    }

    #[test]
    fn test_empty_patch_still_reports_not_found() {
        let mut store = store();

        let result = store.update(42, UserPatch::new());
        assert!(matches!(result, Err(VaultError::NotFound(42))));
    }

    #[test]
    fn test_empty_patch_leaves_record_unchanged() {
        let mut store = store();
        let record = store
            .create(NewUser::new("alice", "a@example.com", "pw1"))
            .expect("create");

        let updated = store.update(record.id, UserPatch::new()).expect("update");
        assert_eq!(updated, record);
    }

    #[test]
    fn test_read_by_id_missing_record() {
        let store = store();
        assert!(matches!(store.read_by_id(7), Err(VaultError::NotFound(7))));
    }
}
