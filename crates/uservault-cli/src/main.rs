//! Uservault CLI - an encrypted store of user records
//!
//! This is the command-line interface for Uservault. It prompts for the
//! vault passphrase, derives the vault key, and drives the core store.

mod cli;
mod commands;
mod output;

use clap::{CommandFactory, Parser};
use clap_complete::generate;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use cli::{Cli, Commands};
use uservault_core::VERSION;

fn main() -> anyhow::Result<()> {
    init_tracing();

    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Init { path }) => {
            let target = path.or(cli.vault).ok_or_else(|| {
                anyhow::anyhow!("No vault path provided. Use --vault or pass a path.")
            })?;
            commands::init(&target, cli.quiet)?;
        }
        Some(Commands::Add {
            username,
            email,
            secret,
        }) => {
            let target = require_vault(cli.vault)?;
            commands::add(&target, username, email, secret, cli.quiet)?;
        }
        Some(Commands::List { json }) => {
            let target = require_vault(cli.vault)?;
            commands::list(&target, json, cli.quiet)?;
        }
        Some(Commands::Show { id, json }) => {
            let target = require_vault(cli.vault)?;
            commands::show(&target, id, json)?;
        }
        Some(Commands::Update {
            id,
            username,
            email,
            secret,
        }) => {
            let target = require_vault(cli.vault)?;
            commands::update(&target, id, username, email, secret, cli.quiet)?;
        }
        Some(Commands::Delete { id }) => {
            let target = require_vault(cli.vault)?;
            commands::delete(&target, id, cli.quiet)?;
        }
        Some(Commands::Completions { shell }) => {
            let mut cmd = Cli::command();
            generate(shell, &mut cmd, "uservault", &mut std::io::stdout());
        }
        None => {
            println!("Uservault v{}", VERSION);
            println!("\nRun `uservault --help` for usage information.");
        }
    }

    Ok(())
}

fn require_vault(vault: Option<String>) -> anyhow::Result<String> {
    vault.ok_or_else(|| anyhow::anyhow!("No vault path provided. Use --vault or pass a path."))
}

fn init_tracing() {
    // Respect user-provided filters, default to info to avoid noisy stdout.
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let fmt_layer = tracing_subscriber::fmt::layer().with_target(false);
    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .init();
}
