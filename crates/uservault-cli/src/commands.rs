//! Command handlers wiring the CLI to the core store.

use std::path::Path;

use anyhow::Context;
use dialoguer::Password;
use secrecy::SecretString;

use uservault_core::crypto::generate_salt;
use uservault_core::{NewUser, SecretKey, SqliteBackend, UserPatch, UserStore};

use crate::output;

/// Initialize a new vault at `path`, prompting for a passphrase.
pub fn init(path: &str, quiet: bool) -> anyhow::Result<()> {
    let passphrase = prompt_init_passphrase()?;

    // Derive before touching the filesystem; an unusable passphrase must
    // not leave a vault file behind.
    let salt = generate_salt();
    SecretKey::derive(&passphrase, &salt).context("Failed to derive vault key")?;

    SqliteBackend::create(Path::new(path), &salt)
        .with_context(|| format!("Failed to create vault at {}", path))?;

    tracing::info!(vault = %path, "initialized new vault");
    if !quiet {
        println!("Initialized new vault at {}", path);
    }
    Ok(())
}

pub fn add(
    path: &str,
    username: String,
    email: String,
    secret: Option<String>,
    quiet: bool,
) -> anyhow::Result<()> {
    let mut store = open_store(path)?;
    let secret = match secret {
        Some(value) => value,
        None => prompt_secret("Secret")?,
    };

    let record = store.create(NewUser::new(username, email, secret))?;

    if !quiet {
        println!("Added user {} with id {}", record.username, record.id);
    }
    Ok(())
}

pub fn list(path: &str, json: bool, quiet: bool) -> anyhow::Result<()> {
    let store = open_store(path)?;
    let records = store.read_all()?;

    if json {
        println!("{}", serde_json::to_string_pretty(&records)?);
    } else {
        output::print_records(&records, quiet);
    }
    Ok(())
}

pub fn show(path: &str, id: i64, json: bool) -> anyhow::Result<()> {
    let store = open_store(path)?;
    let record = store.read_by_id(id)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&record)?);
    } else {
        output::print_record(&record);
    }
    Ok(())
}

pub fn update(
    path: &str,
    id: i64,
    username: Option<String>,
    email: Option<String>,
    secret: Option<String>,
    quiet: bool,
) -> anyhow::Result<()> {
    let mut patch = UserPatch::new();
    if let Some(value) = username {
        patch = patch.username(value);
    }
    if let Some(value) = email {
        patch = patch.email(value);
    }
    if let Some(value) = secret {
        patch = patch.secret(value);
    }
    if patch.is_empty() {
        anyhow::bail!("Nothing to update; pass --username, --email, or --secret");
    }

    let mut store = open_store(path)?;
    let record = store.update(id, patch)?;

    if !quiet {
        println!("Updated user record {}", record.id);
    }
    Ok(())
}

pub fn delete(path: &str, id: i64, quiet: bool) -> anyhow::Result<()> {
    let mut store = open_store(path)?;
    store.delete(id)?;

    if !quiet {
        println!("Deleted user record {}", id);
    }
    Ok(())
}

/// Open the vault at `path` and derive its key from the passphrase.
fn open_store(path: &str) -> anyhow::Result<UserStore<SqliteBackend>> {
    let backend = SqliteBackend::open(Path::new(path))
        .with_context(|| format!("Failed to open vault at {}", path))?;

    let passphrase = prompt_passphrase()?;
    let salt = backend.kdf_salt().context("Vault is missing its key-derivation salt")?;
    let key = SecretKey::derive(&passphrase, &salt).context("Failed to derive vault key")?;

    tracing::debug!(vault = %path, "opened vault");
    Ok(UserStore::new(backend, key))
}

fn prompt_passphrase() -> anyhow::Result<SecretString> {
    if let Ok(value) = std::env::var("USERVAULT_PASSPHRASE") {
        if !value.trim().is_empty() {
            return Ok(SecretString::from(value));
        }
    }
    let value = Password::new()
        .with_prompt("Passphrase")
        .interact()
        .map_err(|e| anyhow::anyhow!("Failed to read passphrase: {}", e))?;
    Ok(SecretString::from(value))
}

fn prompt_init_passphrase() -> anyhow::Result<SecretString> {
    if let Ok(value) = std::env::var("USERVAULT_PASSPHRASE") {
        if !value.trim().is_empty() {
            return Ok(SecretString::from(value));
        }
    }
    let value = Password::new()
        .with_prompt("Enter passphrase")
        .with_confirmation("Confirm passphrase", "Passphrases do not match")
        .interact()
        .map_err(|e| anyhow::anyhow!("Failed to read passphrase: {}", e))?;
    Ok(SecretString::from(value))
}

fn prompt_secret(prompt: &str) -> anyhow::Result<String> {
    Password::new()
        .with_prompt(prompt)
        .interact()
        .map_err(|e| anyhow::anyhow!("Failed to read secret: {}", e))
}
