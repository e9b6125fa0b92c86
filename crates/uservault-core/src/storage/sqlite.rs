//! SQLite persistence backend.
//!
//! One vault is one SQLite database file holding the `users` table and a
//! `meta` key/value table. The `users` id column is `AUTOINCREMENT`, so an
//! id is never handed out twice even after the row that held it is deleted.

use std::path::Path;
use std::time::Duration;

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use chrono::{DateTime, Utc};
use rusqlite::{Connection, OptionalExtension};

use crate::crypto::key::generate_salt;
use crate::error::{Result, VaultError};
use crate::storage::traits::UserBackend;
use crate::storage::types::{RowPatch, UserRow, VaultMetadata};

/// Vault format version written to new vaults.
const FORMAT_VERSION: &str = "0.1";

/// How long SQLite waits on a locked database before surfacing busy.
const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// SQLite-backed implementation of [`UserBackend`].
pub struct SqliteBackend {
    conn: Connection,
}

impl SqliteBackend {
    /// Create a new vault at the specified path.
    ///
    /// The key-derivation salt is generated by the caller (one fresh salt
    /// per vault) and stored in the `meta` table so the vault key can be
    /// re-derived on later opens.
    ///
    /// # Errors
    ///
    /// Returns `VaultError::Storage` if the file already exists or the
    /// schema cannot be initialized.
    pub fn create(path: &Path, kdf_salt: &[u8]) -> Result<Self> {
        if path.exists() {
            return Err(VaultError::Storage(
                "Vault file already exists".to_string(),
            ));
        }

        let conn = Connection::open(path)?;
        conn.busy_timeout(BUSY_TIMEOUT)?;
        Self::init_schema(&conn, kdf_salt)?;
        Ok(Self { conn })
    }

    /// Open an existing vault.
    ///
    /// # Errors
    ///
    /// Returns `VaultError::Storage` if the file does not exist or is not
    /// a vault created by [`SqliteBackend::create`].
    pub fn open(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(VaultError::Storage(format!(
                "Vault file not found: {}",
                path.display()
            )));
        }

        let conn = Connection::open(path)?;
        conn.busy_timeout(BUSY_TIMEOUT)?;

        let backend = Self { conn };
        if backend.meta_get("format_version")?.is_none() {
            return Err(VaultError::Storage(
                "Not a vault database (missing metadata)".to_string(),
            ));
        }
        Ok(backend)
    }

    /// Open a throwaway in-memory vault with a fresh salt.
    pub fn in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        Self::init_schema(&conn, &generate_salt())?;
        Ok(Self { conn })
    }

    fn init_schema(conn: &Connection, kdf_salt: &[u8]) -> Result<()> {
        conn.execute_batch(
            r#"
            CREATE TABLE meta (
                key TEXT PRIMARY KEY,
                value TEXT NOT NULL
            );

            CREATE TABLE users (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                username TEXT NOT NULL,
                email TEXT NOT NULL,
                secret_cipher BLOB NOT NULL
            );
            "#,
        )?;

        let created_at = Utc::now().to_rfc3339();
        conn.execute(
            "INSERT INTO meta (key, value) VALUES (?, ?)",
            ["format_version", FORMAT_VERSION],
        )?;
        conn.execute(
            "INSERT INTO meta (key, value) VALUES (?, ?)",
            ["created_at", &created_at],
        )?;
        conn.execute(
            "INSERT INTO meta (key, value) VALUES (?, ?)",
            ["kdf_salt", &BASE64.encode(kdf_salt)],
        )?;

        Ok(())
    }

    /// Read a metadata value.
    pub fn meta_get(&self, key: &str) -> Result<Option<String>> {
        let value = self
            .conn
            .query_row("SELECT value FROM meta WHERE key = ?", [key], |row| {
                row.get(0)
            })
            .optional()?;
        Ok(value)
    }

    /// Write a metadata value, replacing any existing one.
    pub fn meta_set(&mut self, key: &str, value: &str) -> Result<()> {
        self.conn.execute(
            "INSERT INTO meta (key, value) VALUES (?, ?)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value",
            [key, value],
        )?;
        Ok(())
    }

    /// The key-derivation salt stored when this vault was created.
    pub fn kdf_salt(&self) -> Result<Vec<u8>> {
        let encoded = self
            .meta_get("kdf_salt")?
            .ok_or_else(|| VaultError::Storage("Vault has no kdf_salt metadata".to_string()))?;
        BASE64
            .decode(encoded)
            .map_err(|e| VaultError::Storage(format!("Invalid kdf_salt metadata: {}", e)))
    }

    /// Vault metadata.
    pub fn metadata(&self) -> Result<VaultMetadata> {
        let format_version = self
            .meta_get("format_version")?
            .ok_or_else(|| VaultError::Storage("Vault has no format_version".to_string()))?;

        let created_at_str = self
            .meta_get("created_at")?
            .ok_or_else(|| VaultError::Storage("Vault has no created_at".to_string()))?;
        let created_at = DateTime::parse_from_rfc3339(&created_at_str)
            .map_err(|e| VaultError::Storage(format!("Invalid created_at timestamp: {}", e)))?
            .with_timezone(&Utc);

        Ok(VaultMetadata {
            format_version,
            created_at,
        })
    }
}

impl UserBackend for SqliteBackend {
    fn insert(&mut self, username: &str, email: &str, secret_cipher: &[u8]) -> Result<i64> {
        self.conn.execute(
            "INSERT INTO users (username, email, secret_cipher) VALUES (?, ?, ?)",
            (username, email, secret_cipher),
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    fn update_by_id(&mut self, id: i64, patch: &RowPatch) -> Result<bool> {
        // One statement applies every provided field; omitted fields keep
        // their current value via COALESCE.
        let affected = self.conn.execute(
            r#"
            UPDATE users SET
                username = COALESCE(?1, username),
                email = COALESCE(?2, email),
                secret_cipher = COALESCE(?3, secret_cipher)
            WHERE id = ?4
            "#,
            (
                patch.username.as_deref(),
                patch.email.as_deref(),
                patch.secret_cipher.as_deref(),
                id,
            ),
        )?;
        Ok(affected > 0)
    }

    fn delete_by_id(&mut self, id: i64) -> Result<bool> {
        let affected = self
            .conn
            .execute("DELETE FROM users WHERE id = ?", [id])?;
        Ok(affected > 0)
    }

    fn select_all(&self) -> Result<Vec<UserRow>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, username, email, secret_cipher FROM users ORDER BY id",
        )?;
        let rows = stmt.query_map([], |row| {
            Ok(UserRow {
                id: row.get(0)?,
                username: row.get(1)?,
                email: row.get(2)?,
                secret_cipher: row.get(3)?,
            })
        })?;

        let mut users = Vec::new();
        for row in rows {
            users.push(row?);
        }
        Ok(users)
    }

    fn select_by_id(&self, id: i64) -> Result<Option<UserRow>> {
        let row = self
            .conn
            .query_row(
                "SELECT id, username, email, secret_cipher FROM users WHERE id = ?",
                [id],
                |row| {
                    Ok(UserRow {
                        id: row.get(0)?,
                        username: row.get(1)?,
                        email: row.get(2)?,
                        secret_cipher: row.get(3)?,
                    })
                },
            )
            .optional()?;
        Ok(row)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_and_select_round_trip() {
        let mut backend = SqliteBackend::in_memory().expect("in-memory vault");

        let id = backend
            .insert("alice", "a@example.com", b"sealed-bytes")
            .expect("insert");

        let row = backend
            .select_by_id(id)
            .expect("select")
            .expect("row should exist");
        assert_eq!(row.username, "alice");
        assert_eq!(row.email, "a@example.com");
        assert_eq!(row.secret_cipher, b"sealed-bytes");

        let all = backend.select_all().expect("select_all");
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].id, id);
    }

    #[test]
    fn test_ids_are_never_reused_after_delete() {
        let mut backend = SqliteBackend::in_memory().expect("in-memory vault");

        let first = backend.insert("alice", "a@example.com", b"c1").expect("insert");
        assert!(backend.delete_by_id(first).expect("delete"));
        let second = backend.insert("bob", "b@example.com", b"c2").expect("insert");

        assert!(second > first);
    }

    #[test]
    fn test_update_reports_missing_row() {
        let mut backend = SqliteBackend::in_memory().expect("in-memory vault");

        let patch = RowPatch {
            email: Some("b@example.com".to_string()),
            ..Default::default()
        };
        assert!(!backend.update_by_id(42, &patch).expect("update"));
    }

    #[test]
    fn test_update_applies_only_provided_fields() {
        let mut backend = SqliteBackend::in_memory().expect("in-memory vault");
        let id = backend.insert("alice", "a@example.com", b"c1").expect("insert");

        let patch = RowPatch {
            email: Some("b@example.com".to_string()),
            ..Default::default()
        };
        assert!(backend.update_by_id(id, &patch).expect("update"));

        let row = backend.select_by_id(id).expect("select").expect("row");
        assert_eq!(row.username, "alice");
        assert_eq!(row.email, "b@example.com");
        assert_eq!(row.secret_cipher, b"c1");
    }

    #[test]
    fn test_delete_reports_missing_row() {
        let mut backend = SqliteBackend::in_memory().expect("in-memory vault");

        let id = backend.insert("alice", "a@example.com", b"c1").expect("insert");
        assert!(backend.delete_by_id(id).expect("delete"));
        assert!(!backend.delete_by_id(id).expect("second delete"));
    }

    #[test]
    fn test_select_all_preserves_insertion_order() {
        let mut backend = SqliteBackend::in_memory().expect("in-memory vault");

        backend.insert("alice", "a@example.com", b"c1").expect("insert");
        backend.insert("bob", "b@example.com", b"c2").expect("insert");
        backend.insert("carol", "c@example.com", b"c3").expect("insert");

        let names: Vec<String> = backend
            .select_all()
            .expect("select_all")
            .into_iter()
            .map(|row| row.username)
            .collect();
        assert_eq!(names, ["alice", "bob", "carol"]);
    }

    #[test]
    fn test_meta_round_trip() {
        let mut backend = SqliteBackend::in_memory().expect("in-memory vault");

        assert_eq!(
            backend.meta_get("format_version").expect("meta_get").as_deref(),
            Some(FORMAT_VERSION)
        );
        assert!(backend.meta_get("missing").expect("meta_get").is_none());

        backend.meta_set("format_version", "0.2").expect("meta_set");
        assert_eq!(
            backend.meta_get("format_version").expect("meta_get").as_deref(),
            Some("0.2")
        );

        let salt = backend.kdf_salt().expect("kdf_salt");
        assert_eq!(salt.len(), crate::crypto::key::MIN_SALT_LENGTH);
    }

    #[test]
    fn test_metadata_parses_created_at() {
        let backend = SqliteBackend::in_memory().expect("in-memory vault");

        let metadata = backend.metadata().expect("metadata");
        assert_eq!(metadata.format_version, FORMAT_VERSION);
        assert!(metadata.created_at <= Utc::now());
    }
}
