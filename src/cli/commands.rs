//! Non-interactive commands.
//!
//! Each command drives a [`Session`] the same way the browser does, waiting
//! for the store after every step.

use std::sync::Arc;
use std::time::Duration;

use tracing::info;

use crate::cli::output;
use crate::core::config::Config;
use crate::core::path;
use crate::core::session::{Session, View};
use crate::error::{Error, Result};

/// How long a command waits on the store before giving up.
const STORE_TIMEOUT: Duration = Duration::from_secs(30);

/// Open the configured store in a fresh session.
pub(crate) fn open_session(config: &Config) -> Result<Session> {
    let store = config.open_store()?;
    info!(store = %store.path().display(), "store opened");
    Ok(Session::new(Arc::new(store), config))
}

/// Wait for outstanding store work and surface the first failure.
fn settle(session: &mut Session) -> Result<()> {
    if !session.wait_idle(STORE_TIMEOUT) {
        return Err(Error::StoreUnavailable(format!(
            "no reply within {}s",
            STORE_TIMEOUT.as_secs()
        )));
    }
    match session.take_error() {
        Some(e) => Err(e),
        None => Ok(()),
    }
}

/// Walk from engine selection down to `dir`.
fn enter(session: &mut Session, engine: &str, dir: &str) -> Result<()> {
    let segments = path::segments(dir)?;
    session.start();
    settle(session)?;
    session.select(engine)?;
    settle(session)?;
    for segment in segments {
        session.select(&segment)?;
        settle(session)?;
    }
    Ok(())
}

/// Walk to a leaf and open it.
fn open_leaf(session: &mut Session, engine: &str, leaf: &str) -> Result<()> {
    let (dir, name) = path::split_leaf(leaf)?;
    enter(session, engine, &dir)?;
    session.select(name)?;
    settle(session)
}

/// Print the store's engines.
pub fn engines(config: &Config) -> Result<()> {
    let mut session = open_session(config)?;
    session.start();
    settle(&mut session)?;

    if let View::EngineSelect { engines, .. } = session.view() {
        if engines.is_empty() {
            output::dimmed("no engines");
        }
        for engine in engines {
            println!("{}", engine);
        }
    }
    Ok(())
}

/// Print the listing of one directory, directories first as stored.
pub fn ls(config: &Config, engine: &str, dir: &str) -> Result<()> {
    let mut session = open_session(config)?;
    enter(&mut session, engine, dir)?;

    if let View::PathBrowse {
        listing: Some(listing),
        ..
    } = session.view()
    {
        if listing.children.is_empty() {
            output::dimmed("(empty)");
        }
        for child in &listing.children {
            println!("{}", child);
        }
    }
    Ok(())
}

/// Print a secret, masking values unless `reveal`.
pub fn show(config: &Config, engine: &str, leaf: &str, reveal: bool) -> Result<()> {
    let mut session = open_session(config)?;
    open_leaf(&mut session, engine, leaf)?;

    if let View::LeafDetail {
        name,
        path,
        values,
        metadata,
        ..
    } = session.view()
    {
        output::header(&format!("{} ({}:{})", name, engine, output::path(path)));
        output::kv("version", metadata.version);
        output::kv("created", metadata.created_display());
        output::rule();
        if values.is_empty() {
            output::dimmed("no values");
        }
        for (key, value) in values {
            let shown = if reveal { value.as_str() } else { config.mask.as_str() };
            println!("  {}  {}", output::key(key), shown);
        }
    }
    Ok(())
}

/// Change one value of a secret and save it.
pub fn set(config: &Config, engine: &str, leaf: &str, key: &str, value: &str) -> Result<()> {
    let mut session = open_session(config)?;
    open_leaf(&mut session, engine, leaf)?;

    session.set_value(key, value)?;
    let dirty = matches!(session.view(), View::LeafDetail { dirty: true, .. });
    if !dirty {
        output::dimmed(&format!("no changes to {}", output::key(key)));
        return Ok(());
    }

    session.save()?;
    settle(&mut session)?;
    output::success(&format!("set {} in {}:{}", output::key(key), engine, leaf));
    Ok(())
}
