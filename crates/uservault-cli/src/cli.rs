use clap::{Parser, Subcommand};
use clap_complete::Shell;

use uservault_core::VERSION;

/// Uservault - an encrypted store of user records, CLI-first
#[derive(Parser)]
#[command(name = "uservault")]
#[command(author, version = VERSION, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to the vault file
    #[arg(short, long, global = true, env = "USERVAULT_PATH")]
    pub vault: Option<String>,

    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Quiet mode (minimal output)
    #[arg(short, long, global = true)]
    pub quiet: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize a new encrypted vault
    Init {
        /// Path where the vault will be created
        #[arg(value_name = "PATH")]
        path: Option<String>,
    },

    /// Add a new user record
    Add {
        /// Username (must be non-empty)
        #[arg(value_name = "USERNAME")]
        username: String,

        /// Email (must be non-empty)
        #[arg(value_name = "EMAIL")]
        email: String,

        /// Password to seal (prompted if omitted)
        #[arg(long)]
        secret: Option<String>,
    },

    /// List all user records with secrets recovered
    List {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show a specific record by id
    Show {
        /// Record id
        #[arg(value_name = "ID")]
        id: i64,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Update fields of a record; omitted fields stay unchanged
    Update {
        /// Record id
        #[arg(value_name = "ID")]
        id: i64,

        /// New username
        #[arg(long)]
        username: Option<String>,

        /// New email
        #[arg(long)]
        email: Option<String>,

        /// New password (re-sealed, old cipher overwritten)
        #[arg(long)]
        secret: Option<String>,
    },

    /// Delete a record permanently
    Delete {
        /// Record id
        #[arg(value_name = "ID")]
        id: i64,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_name = "SHELL")]
        shell: Shell,
    },
}
