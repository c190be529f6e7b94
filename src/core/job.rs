//! Store jobs and their replies.
//!
//! Every store call the core wants made is described as a [`Job`] stamped
//! with a [`Ticket`]. Whoever owns the slot that issued it remembers only the
//! latest ticket, so a reply carrying an older one is recognised as stale.

use std::fmt;

use crate::core::cache::CacheKey;
use crate::core::domain::SecretRecord;
use crate::core::store::SecretStore;
use crate::core::types::{ChildName, EngineName, SecretData, SecretPath};
use crate::error::{Error, Result};

/// Identifies one issued job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Ticket(u64);

impl fmt::Display for Ticket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Monotonic ticket source.
#[derive(Debug, Default)]
pub struct TicketSeq {
    last: u64,
}

impl TicketSeq {
    pub fn next(&mut self) -> Ticket {
        self.last += 1;
        Ticket(self.last)
    }
}

/// A store call to make.
#[derive(Debug, Clone, PartialEq)]
pub enum Request {
    ListEngines,
    ListChildren(CacheKey),
    ReadLeaf {
        engine: EngineName,
        path: SecretPath,
    },
    WriteLeaf {
        engine: EngineName,
        path: SecretPath,
        data: SecretData,
    },
}

impl fmt::Display for Request {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Request::ListEngines => write!(f, "list engines"),
            Request::ListChildren(key) => write!(f, "list {}", key),
            Request::ReadLeaf { engine, path } => write!(f, "read {}:{}", engine, path),
            Request::WriteLeaf { engine, path, .. } => write!(f, "write {}:{}", engine, path),
        }
    }
}

/// What a job produced.
#[derive(Debug)]
pub enum Outcome {
    Engines(Result<Vec<EngineName>>),
    Children(Result<Vec<ChildName>>),
    Leaf(Result<SecretRecord>),
    Written(Result<()>),
}

/// A finished job, delivered back to the owner thread.
#[derive(Debug)]
pub struct Reply {
    pub ticket: Ticket,
    pub outcome: Outcome,
}

/// A ticketed request.
#[derive(Debug, Clone, PartialEq)]
pub struct Job {
    pub ticket: Ticket,
    pub request: Request,
}

impl Job {
    pub fn new(ticket: Ticket, request: Request) -> Self {
        Self { ticket, request }
    }

    /// Perform the store call. Blocks for as long as the store does.
    pub fn run(&self, store: &dyn SecretStore) -> Reply {
        let outcome = match &self.request {
            Request::ListEngines => Outcome::Engines(store.list_engines()),
            Request::ListChildren(key) => {
                Outcome::Children(store.list_children(key.engine(), key.path()))
            }
            Request::ReadLeaf { engine, path } => Outcome::Leaf(store.read_leaf(engine, path)),
            Request::WriteLeaf { engine, path, data } => {
                Outcome::Written(store.write_leaf(engine, path, data))
            }
        };
        Reply {
            ticket: self.ticket,
            outcome,
        }
    }

    /// A reply reporting `error` without touching the store.
    pub fn fail(&self, error: Error) -> Reply {
        let outcome = match self.request {
            Request::ListEngines => Outcome::Engines(Err(error)),
            Request::ListChildren(_) => Outcome::Children(Err(error)),
            Request::ReadLeaf { .. } => Outcome::Leaf(Err(error)),
            Request::WriteLeaf { .. } => Outcome::Written(Err(error)),
        };
        Reply {
            ticket: self.ticket,
            outcome,
        }
    }
}
