//! Directory navigation over the listing cache.
//!
//! The navigator never calls the store itself. A move that can be served
//! from the cache happens immediately; otherwise it hands back a [`Job`] and
//! leaves its position alone until [`Navigator::resolve`] is given the
//! matching reply. Issuing any new move supersedes an outstanding job, and
//! the superseded reply is dropped without touching the cache.

use tracing::{debug, warn};

use crate::core::cache::{CacheKey, ListingCache};
use crate::core::constants::ROOT;
use crate::core::domain::Listing;
use crate::core::job::{Job, Outcome, Request, Ticket, TicketSeq};
use crate::core::path;
use crate::core::store::SecretStore;
use crate::core::types::{ChildName, EngineName, SecretPath};
use crate::error::{Error, Result};

/// Result of a navigation request or of applying a reply.
#[derive(Debug, Clone, PartialEq)]
pub enum Step {
    /// The navigator moved; this is the listing to show.
    Ready(Listing),
    /// The listing must be fetched first; position is unchanged.
    Fetch(Job),
    /// Already at the engine root; the caller decides where to go.
    AtTop,
    /// The reply belonged to a superseded request and was dropped.
    Stale,
}

#[derive(Debug, Clone)]
enum Intent {
    Enter,
    Descend(ChildName),
    Ascend(Option<ChildName>),
    Refresh,
}

#[derive(Debug)]
struct Pending {
    ticket: Ticket,
    key: CacheKey,
    intent: Intent,
}

/// Tracks the current engine and directory.
#[derive(Debug, Default)]
pub struct Navigator {
    engine: Option<EngineName>,
    path: SecretPath,
    selected: Option<ChildName>,
    cache: ListingCache,
    pending: Option<Pending>,
    tickets: TicketSeq,
    vanished: Option<SecretPath>,
}

impl Navigator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn engine(&self) -> Option<&str> {
        self.engine.as_deref()
    }

    /// Current directory path; empty at the engine root.
    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn current_key(&self) -> Option<CacheKey> {
        self.engine
            .as_ref()
            .map(|engine| CacheKey::new(engine.clone(), self.path.clone()))
    }

    /// The listing for the current directory, if cached.
    pub fn listing(&self) -> Option<Listing> {
        let key = self.current_key()?;
        let children = self.cache.get(&key)?.to_vec();
        Some(Listing::new(key, children).with_selected(self.selected.clone()))
    }

    /// Read-only view of the cache.
    pub fn cache(&self) -> &ListingCache {
        &self.cache
    }

    /// Whether a listing fetch is outstanding.
    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Take the path reported missing by the last refresh, if any.
    pub fn take_vanished(&mut self) -> Option<SecretPath> {
        self.vanished.take()
    }

    /// Switch to `engine` and show its root listing.
    ///
    /// # Errors
    ///
    /// Returns `InvalidTransition` for an empty engine name.
    pub fn enter_engine(&mut self, engine: &str) -> Result<Step> {
        if engine.is_empty() {
            return Err(Error::transition("engine name is empty"));
        }
        self.cancel();
        let key = CacheKey::new(engine, ROOT);
        Ok(self.show_or_fetch(key, Intent::Enter))
    }

    /// Move into a child directory of the current listing.
    ///
    /// # Errors
    ///
    /// Returns `InvalidTransition` if no engine is entered, `child` is a leaf,
    /// or `child` isn't in the current listing.
    pub fn descend(&mut self, child: &str) -> Result<Step> {
        let current = self.require_key()?;
        if !path::is_directory(child) {
            return Err(Error::transition(format!(
                "'{}' is a leaf, not a directory",
                child
            )));
        }
        let listed = self
            .cache
            .get(&current)
            .is_some_and(|children| children.iter().any(|c| c == child));
        if !listed {
            return Err(Error::transition(format!(
                "'{}' is not in the listing of {}",
                child, current
            )));
        }

        let target = current.sibling(path::child(current.path(), child)?);
        self.cancel();
        Ok(self.show_or_fetch(target, Intent::Descend(child.to_string())))
    }

    /// Move to the parent directory, pre-selecting the directory just left.
    ///
    /// Returns [`Step::AtTop`] when already at the engine root.
    pub fn ascend(&mut self) -> Result<Step> {
        let current = self.require_key()?;
        self.cancel();
        if current.path() == ROOT {
            return Ok(Step::AtTop);
        }
        let parent = current.sibling(path::parent(current.path())?);
        let left = path::last_segment(current.path())?;
        Ok(self.show_or_fetch(parent, Intent::Ascend(Some(left))))
    }

    /// Re-fetch the current directory, bypassing the cache.
    pub fn refresh(&mut self) -> Result<Step> {
        let current = self.require_key()?;
        self.cancel();
        Ok(Step::Fetch(self.issue(current, Intent::Refresh)))
    }

    /// Apply the reply to a job this navigator issued.
    ///
    /// # Errors
    ///
    /// Store errors are passed through with the position unchanged, except a
    /// refresh that finds the current directory gone: that directory is
    /// dropped from the cache and the navigator falls back to its parent.
    pub fn resolve(&mut self, ticket: Ticket, result: Result<Vec<ChildName>>) -> Result<Step> {
        let pending = match self.pending.take() {
            Some(p) if p.ticket == ticket => p,
            other => {
                debug!(%ticket, "dropping stale listing reply");
                self.pending = other;
                return Ok(Step::Stale);
            }
        };

        match result {
            Ok(children) => {
                debug!(key = %pending.key, count = children.len(), "listing fetched");
                self.cache.put(pending.key.clone(), children);
                let selected = match pending.intent {
                    Intent::Ascend(selected) => selected,
                    _ => None,
                };
                Ok(self.move_to(pending.key, selected))
            }
            Err(e) if e.is_not_found() => match pending.intent {
                Intent::Refresh => self.recover_vanished(pending.key),
                Intent::Descend(child) => {
                    if let Some(current) = self.current_key() {
                        self.cache.remove_child(&current, &child);
                    }
                    Err(e)
                }
                _ => Err(e),
            },
            Err(e) => {
                warn!(key = %pending.key, error = %e, "listing fetch failed");
                Err(e)
            }
        }
    }

    /// Drive `step` to completion by calling `store` inline.
    ///
    /// For callers that are fine blocking on the store; the session uses a
    /// worker instead.
    pub fn settle(&mut self, mut step: Step, store: &dyn SecretStore) -> Result<Step> {
        while let Step::Fetch(job) = step {
            let reply = job.run(store);
            step = match reply.outcome {
                Outcome::Children(result) => self.resolve(reply.ticket, result)?,
                _ => return Err(Error::transition("navigator issued a non-listing job")),
            };
        }
        Ok(step)
    }

    /// Drop `child` from the current listing, e.g. after a leaf read
    /// reported it missing.
    pub fn forget_child(&mut self, child: &str) -> bool {
        match self.current_key() {
            Some(key) => self.cache.remove_child(&key, child),
            None => false,
        }
    }

    /// Abandon any outstanding fetch; its reply will be dropped.
    pub fn cancel(&mut self) {
        if let Some(p) = self.pending.take() {
            debug!(ticket = %p.ticket, key = %p.key, "superseding pending fetch");
        }
    }

    /// Leave the current engine. The cache is kept for the session.
    pub fn leave(&mut self) {
        self.cancel();
        self.engine = None;
        self.path.clear();
        self.selected = None;
    }

    fn require_key(&self) -> Result<CacheKey> {
        self.current_key()
            .ok_or_else(|| Error::transition("no engine selected"))
    }

    fn show_or_fetch(&mut self, key: CacheKey, intent: Intent) -> Step {
        if self.cache.contains(&key) {
            debug!(key = %key, "listing cache hit");
            let selected = match intent {
                Intent::Ascend(selected) => selected,
                _ => None,
            };
            return self.move_to(key, selected);
        }
        debug!(key = %key, "listing cache miss");
        Step::Fetch(self.issue(key, intent))
    }

    fn issue(&mut self, key: CacheKey, intent: Intent) -> Job {
        let ticket = self.tickets.next();
        let job = Job::new(ticket, Request::ListChildren(key.clone()));
        self.pending = Some(Pending {
            ticket,
            key,
            intent,
        });
        job
    }

    fn move_to(&mut self, key: CacheKey, selected: Option<ChildName>) -> Step {
        self.engine = Some(key.engine().to_string());
        self.path = key.path().to_string();
        self.selected = selected;
        match self.listing() {
            Some(listing) => Step::Ready(listing),
            None => Step::Ready(Listing::new(key, Vec::new())),
        }
    }

    /// The current directory is gone: forget it, prune it from the parent
    /// listing and show the parent. Does not recurse past the parent.
    fn recover_vanished(&mut self, key: CacheKey) -> Result<Step> {
        warn!(key = %key, "directory vanished");
        self.cache.invalidate(&key);
        self.vanished = Some(key.path().to_string());

        if key.path() == ROOT {
            self.leave();
            return Ok(Step::AtTop);
        }

        let parent = key.sibling(path::parent(key.path())?);
        let name = path::last_segment(key.path())?;
        self.cache.remove_child(&parent, &name);
        Ok(self.show_or_fetch(parent, Intent::Ascend(None)))
    }
}
