//! Command-line interface.

pub mod browse;
pub mod commands;
pub mod completions;
pub mod output;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::core::config::Config;
use crate::core::constants::STORE_ENV;
use crate::error::Result;

/// Vaultview - browse and edit a hierarchical secret store.
#[derive(Parser)]
#[command(
    name = "vaultview",
    about = "Browse and edit a hierarchical secret store",
    version
)]
pub struct Cli {
    /// Config file (default: ~/.config/vaultview/config.toml)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Secret-tree file to browse
    #[arg(long, global = true, env = STORE_ENV)]
    pub store: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Option<Command>,
}

/// Top-level commands.
#[derive(Subcommand)]
pub enum Command {
    /// Browse interactively (default)
    Browse,

    /// List the engines of the store
    Engines,

    /// List a directory
    Ls {
        /// Engine name
        engine: String,
        /// Directory path, e.g. app/db/
        #[arg(default_value = "")]
        path: String,
    },

    /// Show a secret's values and metadata
    Show {
        /// Engine name
        engine: String,
        /// Secret path, e.g. app/db/creds
        path: String,
        /// Print values instead of the mask
        #[arg(long)]
        reveal: bool,
    },

    /// Set one value of a secret
    Set {
        /// Engine name
        engine: String,
        /// Secret path, e.g. app/db/creds
        path: String,
        /// Key within the secret
        key: String,
        /// New value
        value: String,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// Supported shells for completions.
#[derive(clap::ValueEnum, Clone, Debug)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    PowerShell,
}

/// Execute the parsed command line.
///
/// # Errors
///
/// Returns error if configuration can't be loaded or the command fails.
pub fn execute(cli: Cli) -> Result<()> {
    let command = cli.command.unwrap_or(Command::Browse);
    if let Command::Completions { shell } = command {
        return completions::execute(shell);
    }

    let config = Config::load(cli.config.as_deref())?.with_store(cli.store);
    config.validate()?;

    match command {
        Command::Browse => browse::execute(&config),
        Command::Engines => commands::engines(&config),
        Command::Ls { engine, path } => commands::ls(&config, &engine, &path),
        Command::Show {
            engine,
            path,
            reveal,
        } => commands::show(&config, &engine, &path, reveal),
        Command::Set {
            engine,
            path,
            key,
            value,
        } => commands::set(&config, &engine, &path, &key, &value),
        Command::Completions { .. } => Ok(()),
    }
}
