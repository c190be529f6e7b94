//! Vaultview - browse and edit a hierarchical secret store from the terminal.

use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use vaultview::cli::output;
use vaultview::cli::{execute, Cli};
use vaultview::core::constants::LOG_ENV;
use vaultview::error::{ConfigError, Error};

fn main() {
    let cli = Cli::parse();

    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| {
        if cli.verbose {
            EnvFilter::new("vaultview=debug")
        } else {
            EnvFilter::new("vaultview=warn")
        }
    });

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false).without_time().with_writer(std::io::stderr))
        .init();

    if let Err(e) = execute(cli) {
        let suggestion = match &e {
            Error::Config(ConfigError::NoStore) => {
                Some("pass --store <file> or set store in ~/.config/vaultview/config.toml")
            }
            Error::InvalidTransition(_) => Some("run: vaultview ls <engine> to see what exists"),
            _ => None,
        };

        output::error(&e.to_string());
        if let Some(hint) = suggestion {
            output::hint(hint);
        }
        std::process::exit(1);
    }
}
