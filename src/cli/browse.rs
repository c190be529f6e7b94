//! Browse command.
//!
//! A prompt-driven browser over a [`Session`]: pick an engine, walk the
//! directories, open a secret, edit and save it. Esc goes back one level.

use std::io::{self, IsTerminal};
use std::time::Duration;

use dialoguer::theme::ColorfulTheme;
use dialoguer::{Input, Select};
use tracing::debug;

use crate::cli::commands::open_session;
use crate::cli::output;
use crate::core::config::Config;
use crate::core::session::{Session, View};
use crate::error::Result;

const STORE_TIMEOUT: Duration = Duration::from_secs(30);

const BACK: &str = "..";
const REFRESH: &str = "↻ refresh";
const QUIT: &str = "quit";
const EDIT: &str = "edit value";
const ADD: &str = "add key";
const SAVE: &str = "save";
const DISCARD: &str = "discard changes";
const REVEAL: &str = "reveal values";
const HIDE: &str = "hide values";

enum Action {
    Select(String),
    Back,
    Refresh,
    Edit,
    Add,
    Save,
    Discard,
    ToggleReveal,
    Quit,
}

/// Run the interactive browser until the user quits.
pub fn execute(config: &Config) -> Result<()> {
    if !io::stdin().is_terminal() {
        output::error("browse needs an interactive terminal");
        output::hint("use: vaultview ls | show | set");
        return Err(io::Error::new(io::ErrorKind::Unsupported, "stdin is not a terminal").into());
    }

    let mut session = open_session(config)?;
    session.on_change(|tag| debug!(%tag, "view changed"));
    session.start();

    let theme = ColorfulTheme::default();
    let mut revealed = false;

    loop {
        if !session.wait_idle(STORE_TIMEOUT) {
            output::warn("store is slow to answer; showing what is loaded");
        }
        if let Some(notice) = session.status() {
            output::notice(notice);
        }
        session.dismiss_status();

        let action = prompt(&session, &theme, config, revealed)?;
        let result = match action {
            Action::Quit => return Ok(()),
            Action::Select(name) => session.select(&name),
            Action::Back => {
                let result = session.back();
                if !matches!(session.view(), View::LeafDetail { .. }) {
                    revealed = false;
                }
                result
            }
            Action::Refresh => session.refresh(),
            Action::Edit => edit_value(&mut session, &theme),
            Action::Add => add_value(&mut session, &theme),
            Action::Save => session.save(),
            Action::Discard => session.discard(),
            Action::ToggleReveal => {
                revealed = !revealed;
                Ok(())
            }
        };
        if let Err(e) = result {
            output::error(&e.to_string());
        }
    }
}

fn prompt(
    session: &Session,
    theme: &ColorfulTheme,
    config: &Config,
    revealed: bool,
) -> Result<Action> {
    match session.view() {
        View::EngineSelect { engines, .. } => {
            output::section("engines");
            let mut items: Vec<String> = engines.to_vec();
            items.push(QUIT.to_string());
            let choice = Select::with_theme(theme)
                .with_prompt("select an engine")
                .items(&items)
                .default(0)
                .interact_opt()?;
            Ok(match choice {
                Some(i) if i < engines.len() => Action::Select(items[i].clone()),
                _ => Action::Quit,
            })
        }
        View::PathBrowse {
            engine,
            path,
            listing,
            ..
        } => {
            output::section(&format!("{}:/{}", engine, path));
            let children = listing
                .as_ref()
                .map(|l| l.children.clone())
                .unwrap_or_default();
            let preselect = listing
                .as_ref()
                .and_then(|l| l.selected_index())
                .map_or(0, |i| i + 1);

            let mut items = vec![BACK.to_string()];
            items.extend(children.iter().cloned());
            items.push(REFRESH.to_string());

            let choice = Select::with_theme(theme)
                .with_prompt("select")
                .items(&items)
                .default(preselect.min(items.len() - 1))
                .interact_opt()?;
            Ok(match choice {
                None | Some(0) => Action::Back,
                Some(i) if i == items.len() - 1 => Action::Refresh,
                Some(i) => Action::Select(items[i].clone()),
            })
        }
        View::LeafDetail {
            engine,
            name,
            path,
            values,
            metadata,
            dirty,
            ..
        } => {
            output::section(&format!("{} ({}:{})", name, engine, output::path(path)));
            output::kv("version", metadata.version);
            output::kv("created", metadata.created_display());
            output::rule();
            for (key, value) in values {
                let shown = if revealed { value.as_str() } else { config.mask.as_str() };
                println!("  {}  {}", output::key(key), shown);
            }
            if dirty {
                output::warn("unsaved changes");
            }

            let mut items = vec![BACK, EDIT, ADD];
            if dirty {
                items.extend([SAVE, DISCARD]);
            }
            items.push(if revealed { HIDE } else { REVEAL });
            items.push(REFRESH);

            let choice = Select::with_theme(theme)
                .with_prompt("action")
                .items(&items)
                .default(0)
                .interact_opt()?;
            Ok(match choice.map(|i| items[i]) {
                None | Some(BACK) => Action::Back,
                Some(EDIT) => Action::Edit,
                Some(ADD) => Action::Add,
                Some(SAVE) => Action::Save,
                Some(DISCARD) => Action::Discard,
                Some(REFRESH) => Action::Refresh,
                Some(_) => Action::ToggleReveal,
            })
        }
    }
}

fn edit_value(session: &mut Session, theme: &ColorfulTheme) -> Result<()> {
    let keys: Vec<String> = match session.view() {
        View::LeafDetail { values, .. } => values.keys().cloned().collect(),
        _ => return Ok(()),
    };
    if keys.is_empty() {
        output::dimmed("no values to edit");
        return Ok(());
    }

    let Some(index) = Select::with_theme(theme)
        .with_prompt("key")
        .items(&keys)
        .default(0)
        .interact_opt()?
    else {
        return Ok(());
    };
    let key = &keys[index];
    let current = match session.view() {
        View::LeafDetail { values, .. } => values.get(key).cloned().unwrap_or_default(),
        _ => String::new(),
    };

    let value: String = Input::with_theme(theme)
        .with_prompt(output::key(key))
        .with_initial_text(current)
        .allow_empty(true)
        .interact_text()?;
    session.set_value(key, &value)
}

fn add_value(session: &mut Session, theme: &ColorfulTheme) -> Result<()> {
    let key: String = Input::with_theme(theme)
        .with_prompt("new key")
        .interact_text()?;
    let value: String = Input::with_theme(theme)
        .with_prompt(output::key(&key))
        .allow_empty(true)
        .interact_text()?;
    session.set_value(key.trim(), &value)
}
