//! A browsing session: the state machine wired to a background worker.
//!
//! This is what a display surface talks to. Entry points return as soon as
//! the transition is decided; store calls finish in the background and are
//! applied on the next [`Session::pump`] or [`Session::wait_idle`]. Store
//! failures never escape as errors here; they become a timed status notice
//! and the session keeps going.
//!
//! ```no_run
//! use std::sync::Arc;
//! use std::time::Duration;
//! use vaultview::core::config::Config;
//! use vaultview::core::session::{Session, View};
//! use vaultview::core::store::Memory;
//!
//! let store = Memory::new().with_secret("kv", "app/db", &[("user", "admin")]);
//! let mut session = Session::new(Arc::new(store), &Config::default());
//! session.start();
//! session.wait_idle(Duration::from_secs(5));
//! session.select("kv")?;
//! session.wait_idle(Duration::from_secs(5));
//! if let View::PathBrowse { listing: Some(listing), .. } = session.view() {
//!     println!("{:?}", listing.children);
//! }
//! # Ok::<(), vaultview::error::Error>(())
//! ```

use std::sync::Arc;
use std::time::{Duration, Instant};

use tracing::{debug, warn};

use crate::core::config::Config;
use crate::core::domain::{Listing, Metadata, Notice};
use crate::core::machine::{Effect, StateTag, ViewStateMachine};
use crate::core::store::SecretStore;
use crate::core::types::{EngineName, SecretData};
use crate::core::worker::Worker;
use crate::error::{Error, Result};

/// What the surface should render right now.
#[derive(Debug)]
pub enum View<'a> {
    EngineSelect {
        /// Empty until the engine list has loaded.
        engines: &'a [EngineName],
        loading: bool,
    },
    PathBrowse {
        engine: &'a str,
        path: &'a str,
        /// `None` while the first listing of this directory is loading.
        listing: Option<Listing>,
        loading: bool,
    },
    LeafDetail {
        engine: &'a str,
        name: &'a str,
        path: &'a str,
        values: &'a SecretData,
        metadata: &'a Metadata,
        dirty: bool,
        /// A `back` now will drop the unsaved edits.
        discard_armed: bool,
        loading: bool,
    },
}

impl View<'_> {
    pub fn tag(&self) -> StateTag {
        match self {
            View::EngineSelect { .. } => StateTag::EngineSelect,
            View::PathBrowse { .. } => StateTag::PathBrowse,
            View::LeafDetail { .. } => StateTag::LeafDetail,
        }
    }
}

type Listener = Box<dyn FnMut(StateTag)>;

#[derive(Debug)]
struct Status {
    notice: Notice,
    shown_at: Instant,
}

/// One interactive browsing session over one store.
pub struct Session {
    machine: ViewStateMachine,
    worker: Worker,
    status: Option<Status>,
    status_ttl: Duration,
    last_error: Option<Error>,
    listeners: Vec<Listener>,
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("machine", &self.machine)
            .field("worker", &self.worker)
            .field("status", &self.status)
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

impl Session {
    pub fn new(store: Arc<dyn SecretStore>, config: &Config) -> Self {
        Self {
            machine: ViewStateMachine::new(config.confirm_discard),
            worker: Worker::new(store),
            status: None,
            status_ttl: config.status_ttl(),
            last_error: None,
            listeners: Vec::new(),
        }
    }

    pub fn state(&self) -> StateTag {
        self.machine.state()
    }

    /// The underlying state machine, for read access.
    pub fn machine(&self) -> &ViewStateMachine {
        &self.machine
    }

    /// Register a callback run with the new state whenever displayed data
    /// changes.
    pub fn on_change(&mut self, listener: impl FnMut(StateTag) + 'static) {
        self.listeners.push(Box::new(listener));
    }

    /// Whether store jobs are still running.
    pub fn is_busy(&self) -> bool {
        self.worker.in_flight() > 0
    }

    /// Load the engine list.
    pub fn start(&mut self) {
        let result = self.machine.start();
        // Only fails outside EngineSelect, where the list is already loaded.
        if let Err(e) = self.handle(result) {
            debug!(error = %e, "start ignored");
        }
    }

    /// Select an engine, directory or leaf from the current screen.
    ///
    /// # Errors
    ///
    /// Returns `InvalidTransition` or `InvalidPath` if the selection makes no
    /// sense on the current screen; nothing changes in that case.
    pub fn select(&mut self, name: &str) -> Result<()> {
        let result = self.machine.select(name);
        self.handle(result)
    }

    /// Go up one level.
    ///
    /// # Errors
    ///
    /// Returns `InvalidTransition` while a save is in flight.
    pub fn back(&mut self) -> Result<()> {
        let result = self.machine.back();
        self.handle(result)
    }

    /// Re-fetch the current directory or leaf.
    ///
    /// # Errors
    ///
    /// Returns `InvalidTransition` on the engine screen or for a leaf with
    /// unsaved edits.
    pub fn refresh(&mut self) -> Result<()> {
        let result = self.machine.refresh();
        self.handle(result)
    }

    /// Write the open leaf back if it changed.
    ///
    /// # Errors
    ///
    /// Returns `InvalidTransition` when no leaf is open or a save is already
    /// in flight.
    pub fn save(&mut self) -> Result<()> {
        let result = self.machine.save();
        self.handle(result)
    }

    /// Edit one value of the open leaf.
    ///
    /// # Errors
    ///
    /// Returns `InvalidTransition` when no leaf is open.
    pub fn set_value(&mut self, key: &str, value: &str) -> Result<()> {
        let result = self.machine.set_value(key, value);
        self.handle(result)
    }

    /// Drop unsaved edits of the open leaf.
    ///
    /// # Errors
    ///
    /// Returns `InvalidTransition` when no leaf is open.
    pub fn discard(&mut self) -> Result<()> {
        let result = self.machine.discard();
        self.handle(result)
    }

    /// Apply every reply that is ready, without blocking. Returns how many
    /// were applied.
    pub fn pump(&mut self) -> usize {
        let mut applied = 0;
        while let Some(reply) = self.worker.try_recv() {
            self.apply(reply);
            applied += 1;
        }
        applied
    }

    /// Block until no job is in flight or `timeout` passes, applying replies
    /// as they arrive. Returns whether the session went idle.
    pub fn wait_idle(&mut self, timeout: Duration) -> bool {
        let deadline = Instant::now() + timeout;
        while self.worker.in_flight() > 0 {
            let now = Instant::now();
            if now >= deadline {
                warn!(in_flight = self.worker.in_flight(), "timed out waiting for store");
                return false;
            }
            if let Some(reply) = self.worker.recv_timeout(deadline - now) {
                self.apply(reply);
            }
        }
        true
    }

    /// The current status notice, until it expires.
    pub fn status(&self) -> Option<&Notice> {
        self.status_at(Instant::now())
    }

    /// The status notice as it would be seen at `now`.
    pub fn status_at(&self, now: Instant) -> Option<&Notice> {
        self.status
            .as_ref()
            .filter(|s| now.saturating_duration_since(s.shown_at) < self.status_ttl)
            .map(|s| &s.notice)
    }

    /// Hide the status notice early.
    pub fn dismiss_status(&mut self) {
        self.status = None;
    }

    /// Take the last store error that was turned into a notice.
    pub fn take_error(&mut self) -> Option<Error> {
        self.last_error.take()
    }

    pub fn view(&self) -> View<'_> {
        let loading = self.machine.is_busy();
        match self.machine.state() {
            StateTag::EngineSelect => View::EngineSelect {
                engines: self.machine.engines().unwrap_or(&[]),
                loading,
            },
            StateTag::PathBrowse => {
                let nav = self.machine.navigator();
                View::PathBrowse {
                    engine: nav.engine().unwrap_or_default(),
                    path: nav.path(),
                    listing: self.machine.listing(),
                    loading,
                }
            }
            StateTag::LeafDetail => match self.machine.leaf() {
                Some(leaf) => View::LeafDetail {
                    engine: leaf.engine(),
                    name: leaf.name(),
                    path: leaf.path(),
                    values: leaf.values(),
                    metadata: leaf.metadata(),
                    dirty: leaf.has_changes(),
                    discard_armed: self.machine.discard_armed(),
                    loading,
                },
                None => View::EngineSelect {
                    engines: &[],
                    loading,
                },
            },
        }
    }

    fn apply(&mut self, reply: crate::core::job::Reply) {
        let result = self.machine.apply(reply);
        if let Err(e) = self.handle(result) {
            // Replies only fail on contract errors when a store returns
            // malformed data; show them rather than lose them.
            warn!(error = %e, "reply rejected");
            self.report(e);
            self.changed();
        }
    }

    /// Run the effect of a transition. Operational errors become notices;
    /// contract errors are handed back.
    fn handle(&mut self, result: Result<Effect>) -> Result<()> {
        match result {
            Ok(effect) => {
                match effect {
                    Effect::Unchanged => {}
                    Effect::Redraw => self.changed(),
                    Effect::Dispatch(job) => {
                        self.worker.dispatch(job);
                        self.changed();
                    }
                }
                if let Some(notice) = self.machine.take_notice() {
                    self.show(notice);
                }
                Ok(())
            }
            Err(e) if e.is_operational() => {
                warn!(error = %e, "store operation failed");
                self.report(e);
                self.changed();
                Ok(())
            }
            Err(e) => {
                self.machine.take_notice();
                Err(e)
            }
        }
    }

    fn report(&mut self, e: Error) {
        let notice = self
            .machine
            .take_notice()
            .unwrap_or_else(|| Notice::from(&e));
        self.show(notice);
        self.last_error = Some(e);
    }

    fn show(&mut self, notice: Notice) {
        debug!(level = ?notice.level, text = %notice.text, "status");
        self.status = Some(Status {
            notice,
            shown_at: Instant::now(),
        });
    }

    fn changed(&mut self) {
        let tag = self.machine.state();
        for listener in &mut self.listeners {
            listener(tag);
        }
    }
}
