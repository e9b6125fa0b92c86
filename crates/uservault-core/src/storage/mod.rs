//! Storage layer: backend trait, SQLite implementation, and row types.

pub mod sqlite;
pub mod traits;
pub mod types;

pub use sqlite::SqliteBackend;
pub use traits::UserBackend;
pub use types::{NewUser, RowPatch, UserPatch, UserRecord, UserRow, VaultMetadata};
