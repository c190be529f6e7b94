//! The three-screen browsing flow.
//!
//! ```text
//! EngineSelect --select(engine)--> PathBrowse --select(leaf)--> LeafDetail
//!      ^                             |    ^                          |
//!      +-------- back at root -------+    +---------- back ----------+
//! ```
//!
//! Like the navigator, the machine never touches the store. Transitions that
//! need data return [`Effect::Dispatch`] and finish when [`ViewStateMachine::apply`]
//! receives the reply.

use tracing::{debug, info, warn};

use crate::core::domain::{Listing, Notice};
use crate::core::edit::{CommitOutcome, Draft, EditSession};
use crate::core::job::{Job, Outcome, Reply, Request, Ticket, TicketSeq};
use crate::core::navigator::{Navigator, Step};
use crate::core::path;
use crate::core::types::{EngineName, SecretPath};
use crate::error::{Error, Result};

/// Which screen is active.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StateTag {
    EngineSelect,
    PathBrowse,
    LeafDetail,
}

impl std::fmt::Display for StateTag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            StateTag::EngineSelect => "engine-select",
            StateTag::PathBrowse => "path-browse",
            StateTag::LeafDetail => "leaf-detail",
        };
        f.write_str(name)
    }
}

/// What the caller has to do after a transition or reply.
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    /// Nothing visible changed.
    Unchanged,
    /// Displayed data changed.
    Redraw,
    /// Run this job and feed the reply to [`ViewStateMachine::apply`].
    Dispatch(Job),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ReadPurpose {
    Open,
    Reload,
}

#[derive(Debug)]
struct PendingRead {
    ticket: Ticket,
    engine: EngineName,
    path: SecretPath,
    purpose: ReadPurpose,
}

#[derive(Debug)]
struct PendingWrite {
    ticket: Ticket,
    draft: Draft,
}

/// Owns the navigator and the open edit session and gates which is active.
#[derive(Debug)]
pub struct ViewStateMachine {
    state: StateTag,
    engines: Option<Vec<EngineName>>,
    navigator: Navigator,
    leaf: Option<EditSession>,
    tickets: TicketSeq,
    engines_pending: Option<Ticket>,
    read_pending: Option<PendingRead>,
    write_pending: Option<PendingWrite>,
    confirm_discard: bool,
    discard_armed: bool,
    notice: Option<Notice>,
}

impl Default for ViewStateMachine {
    fn default() -> Self {
        Self::new(true)
    }
}

impl ViewStateMachine {
    /// Create a machine in `EngineSelect`.
    ///
    /// With `confirm_discard`, leaving a leaf with unsaved edits takes two
    /// `back`s; otherwise edits are dropped on the first.
    pub fn new(confirm_discard: bool) -> Self {
        Self {
            state: StateTag::EngineSelect,
            engines: None,
            navigator: Navigator::new(),
            leaf: None,
            tickets: TicketSeq::default(),
            engines_pending: None,
            read_pending: None,
            write_pending: None,
            confirm_discard,
            discard_armed: false,
            notice: None,
        }
    }

    pub fn state(&self) -> StateTag {
        self.state
    }

    /// Engine names, once loaded.
    pub fn engines(&self) -> Option<&[EngineName]> {
        self.engines.as_deref()
    }

    pub fn navigator(&self) -> &Navigator {
        &self.navigator
    }

    /// Listing of the current directory while browsing.
    pub fn listing(&self) -> Option<Listing> {
        match self.state {
            StateTag::PathBrowse => self.navigator.listing(),
            _ => None,
        }
    }

    /// The open leaf while in `LeafDetail`.
    pub fn leaf(&self) -> Option<&EditSession> {
        self.leaf.as_ref()
    }

    /// Whether any store job is outstanding.
    pub fn is_busy(&self) -> bool {
        self.engines_pending.is_some()
            || self.navigator.is_pending()
            || self.read_pending.is_some()
            || self.write_pending.is_some()
    }

    /// Whether the next `back` will drop unsaved edits.
    pub fn discard_armed(&self) -> bool {
        self.discard_armed
    }

    /// Take the informational notice raised by the last transition.
    pub fn take_notice(&mut self) -> Option<Notice> {
        self.notice.take()
    }

    /// Load (or reload) the engine list.
    pub fn start(&mut self) -> Result<Effect> {
        if self.state != StateTag::EngineSelect {
            return Err(Error::transition(format!(
                "engines can only be loaded from engine selection, not {}",
                self.state
            )));
        }
        let ticket = self.tickets.next();
        self.engines_pending = Some(ticket);
        Ok(Effect::Dispatch(Job::new(ticket, Request::ListEngines)))
    }

    /// Select an engine, a directory, or a leaf, depending on the screen.
    pub fn select(&mut self, name: &str) -> Result<Effect> {
        match self.state {
            StateTag::EngineSelect => self.select_engine(name),
            StateTag::PathBrowse if path::is_directory(name) => {
                self.read_pending = None;
                let step = self.navigator.descend(name)?;
                self.on_step(step)
            }
            StateTag::PathBrowse => self.select_leaf(name),
            StateTag::LeafDetail => Err(Error::transition(
                "nothing to select in leaf detail; go back first",
            )),
        }
    }

    /// Go up one level.
    pub fn back(&mut self) -> Result<Effect> {
        match self.state {
            StateTag::EngineSelect => {
                self.navigator.cancel();
                Ok(Effect::Unchanged)
            }
            StateTag::PathBrowse => {
                self.read_pending = None;
                let step = self.navigator.ascend()?;
                self.on_step(step)
            }
            StateTag::LeafDetail => self.leave_leaf(),
        }
    }

    /// Re-fetch whatever the current screen shows.
    pub fn refresh(&mut self) -> Result<Effect> {
        match self.state {
            StateTag::EngineSelect => Err(Error::transition(
                "refresh is only available while browsing",
            )),
            StateTag::PathBrowse => {
                self.read_pending = None;
                let step = self.navigator.refresh()?;
                self.on_step(step)
            }
            StateTag::LeafDetail => {
                let leaf = self.require_leaf()?;
                if leaf.has_changes() {
                    return Err(Error::transition(
                        "unsaved changes; save or discard before refreshing",
                    ));
                }
                let (engine, path) = (leaf.engine().to_string(), leaf.path().to_string());
                Ok(self.issue_read(engine, path, ReadPurpose::Reload))
            }
        }
    }

    /// Write the open leaf back if it changed.
    pub fn save(&mut self) -> Result<Effect> {
        if self.write_pending.is_some() {
            return Err(Error::transition("a save is already in progress"));
        }
        let leaf = self.require_leaf()?;
        let Some(draft) = leaf.begin_commit() else {
            self.notice = Some(Notice::info("no changes to save"));
            return Ok(Effect::Redraw);
        };

        let request = Request::WriteLeaf {
            engine: leaf.engine().to_string(),
            path: leaf.path().to_string(),
            data: draft.data().clone(),
        };
        let ticket = self.tickets.next();
        debug!(%ticket, "dispatching save");
        self.discard_armed = false;
        self.write_pending = Some(PendingWrite { ticket, draft });
        Ok(Effect::Dispatch(Job::new(ticket, request)))
    }

    /// Edit one value of the open leaf.
    pub fn set_value(&mut self, key: &str, value: &str) -> Result<Effect> {
        let leaf = self.require_leaf_mut()?;
        leaf.set_value(key, value);
        self.discard_armed = false;
        Ok(Effect::Redraw)
    }

    /// Drop unsaved edits of the open leaf.
    pub fn discard(&mut self) -> Result<Effect> {
        self.require_leaf_mut()?.discard();
        self.discard_armed = false;
        Ok(Effect::Redraw)
    }

    /// Apply a finished job. Replies to superseded jobs are ignored.
    pub fn apply(&mut self, reply: Reply) -> Result<Effect> {
        let ticket = reply.ticket;
        match reply.outcome {
            Outcome::Engines(result) => self.apply_engines(ticket, result),
            Outcome::Children(result) => {
                let resolved = self.navigator.resolve(ticket, result);
                if let Some(gone) = self.navigator.take_vanished() {
                    self.notice = Some(Notice::error(format!("path '{}' does not exist", gone)));
                }
                self.on_step(resolved?)
            }
            Outcome::Leaf(result) => self.apply_read(ticket, result),
            Outcome::Written(result) => self.apply_write(ticket, result),
        }
    }

    fn select_engine(&mut self, name: &str) -> Result<Effect> {
        let known = self
            .engines
            .as_ref()
            .is_some_and(|engines| engines.iter().any(|e| e == name));
        if !known {
            return Err(Error::transition(format!("unknown engine '{}'", name)));
        }
        let step = self.navigator.enter_engine(name)?;
        self.on_step(step)
    }

    fn select_leaf(&mut self, name: &str) -> Result<Effect> {
        let listed = self
            .navigator
            .listing()
            .is_some_and(|l| l.children.iter().any(|c| c == name));
        if !listed {
            return Err(Error::transition(format!(
                "'{}' is not in the current listing",
                name
            )));
        }
        let engine = self
            .navigator
            .engine()
            .ok_or_else(|| Error::transition("no engine selected"))?
            .to_string();
        let leaf_path = path::child(self.navigator.path(), name)?;
        self.navigator.cancel();
        Ok(self.issue_read(engine, leaf_path, ReadPurpose::Open))
    }

    fn leave_leaf(&mut self) -> Result<Effect> {
        if self.write_pending.is_some() {
            return Err(Error::transition("a save is in progress"));
        }
        let leaf = self.require_leaf()?;
        if leaf.has_changes() {
            let (name, path) = (leaf.name().to_string(), leaf.path().to_string());
            if self.confirm_discard && !self.discard_armed {
                self.discard_armed = true;
                self.notice = Some(Notice::warn(format!(
                    "unsaved changes to '{}'; go back again to discard them",
                    name
                )));
                return Ok(Effect::Redraw);
            }
            info!(%path, "discarding unsaved edits on back");
        }
        self.leaf = None;
        self.read_pending = None;
        self.discard_armed = false;
        self.state = StateTag::PathBrowse;
        Ok(Effect::Redraw)
    }

    fn on_step(&mut self, step: Step) -> Result<Effect> {
        Ok(match step {
            Step::Ready(_) => {
                self.state = StateTag::PathBrowse;
                Effect::Redraw
            }
            Step::Fetch(job) => Effect::Dispatch(job),
            Step::AtTop => {
                self.navigator.leave();
                self.state = StateTag::EngineSelect;
                Effect::Redraw
            }
            Step::Stale => Effect::Unchanged,
        })
    }

    fn issue_read(&mut self, engine: EngineName, path: SecretPath, purpose: ReadPurpose) -> Effect {
        let ticket = self.tickets.next();
        let request = Request::ReadLeaf {
            engine: engine.clone(),
            path: path.clone(),
        };
        self.read_pending = Some(PendingRead {
            ticket,
            engine,
            path,
            purpose,
        });
        Effect::Dispatch(Job::new(ticket, request))
    }

    fn apply_engines(
        &mut self,
        ticket: Ticket,
        result: Result<Vec<EngineName>>,
    ) -> Result<Effect> {
        if self.engines_pending != Some(ticket) {
            debug!(%ticket, "dropping stale engine list");
            return Ok(Effect::Unchanged);
        }
        self.engines_pending = None;
        let engines = result?;
        debug!(count = engines.len(), "engines loaded");
        self.engines = Some(engines);
        Ok(Effect::Redraw)
    }

    fn apply_read(
        &mut self,
        ticket: Ticket,
        result: Result<crate::core::domain::SecretRecord>,
    ) -> Result<Effect> {
        let pending = match self.read_pending.take() {
            Some(p) if p.ticket == ticket => p,
            other => {
                debug!(%ticket, "dropping stale leaf read");
                self.read_pending = other;
                return Ok(Effect::Unchanged);
            }
        };

        match (pending.purpose, result) {
            (ReadPurpose::Open, Ok(record)) => {
                self.leaf = Some(EditSession::open(&pending.engine, &pending.path, &record)?);
                self.discard_armed = false;
                self.state = StateTag::LeafDetail;
                Ok(Effect::Redraw)
            }
            (ReadPurpose::Reload, Ok(record)) => {
                if let Some(leaf) = self.leaf.as_mut() {
                    leaf.reload(&record);
                }
                Ok(Effect::Redraw)
            }
            (purpose, Err(e)) if e.is_not_found() => {
                warn!(path = %pending.path, "secret vanished");
                let name = path::leaf_name(&pending.path)?;
                self.navigator.forget_child(name);
                self.notice = Some(Notice::error(format!("secret '{}' does not exist", name)));
                if purpose == ReadPurpose::Reload {
                    self.leaf = None;
                    self.discard_armed = false;
                    self.state = StateTag::PathBrowse;
                }
                Err(e)
            }
            (_, Err(e)) => Err(e),
        }
    }

    fn apply_write(&mut self, ticket: Ticket, result: Result<()>) -> Result<Effect> {
        let pending = match self.write_pending.take() {
            Some(p) if p.ticket == ticket => p,
            other => {
                debug!(%ticket, "dropping stale write result");
                self.write_pending = other;
                return Ok(Effect::Unchanged);
            }
        };
        let leaf = self.require_leaf_mut()?;
        if leaf.finish_commit(pending.draft, result)? == CommitOutcome::Saved {
            let (engine, path, name) = (
                leaf.engine().to_string(),
                leaf.path().to_string(),
                leaf.name().to_string(),
            );
            self.notice = Some(Notice::info(format!("saved '{}'", name)));
            return Ok(self.issue_read(engine, path, ReadPurpose::Reload));
        }
        Ok(Effect::Redraw)
    }

    fn require_leaf(&self) -> Result<&EditSession> {
        match (self.state, self.leaf.as_ref()) {
            (StateTag::LeafDetail, Some(leaf)) => Ok(leaf),
            _ => Err(Error::transition(format!(
                "no secret is open (in {})",
                self.state
            ))),
        }
    }

    fn require_leaf_mut(&mut self) -> Result<&mut EditSession> {
        let state = self.state;
        match (state, self.leaf.as_mut()) {
            (StateTag::LeafDetail, Some(leaf)) => Ok(leaf),
            _ => Err(Error::transition(format!("no secret is open (in {})", state))),
        }
    }
}
