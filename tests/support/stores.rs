//! In-process stores with knobs for session tests.

use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Condvar, Mutex};
use std::time::{Duration, Instant};

use vaultview::core::domain::SecretRecord;
use vaultview::core::store::{Memory, SecretStore};
use vaultview::core::types::{ChildName, EngineName, SecretData};
use vaultview::error::{Error, Result};

#[derive(Default)]
struct Gate {
    held: HashSet<String>,
    parked: HashSet<String>,
}

/// A [`Memory`] store that counts calls, can go offline, and can hold
/// listings of chosen directories until released.
pub struct TestStore {
    pub inner: Memory,
    lists: AtomicUsize,
    reads: AtomicUsize,
    writes: AtomicUsize,
    offline: AtomicBool,
    gate: Mutex<Gate>,
    signal: Condvar,
}

impl TestStore {
    pub fn new(inner: Memory) -> Self {
        Self {
            inner,
            lists: AtomicUsize::new(0),
            reads: AtomicUsize::new(0),
            writes: AtomicUsize::new(0),
            offline: AtomicBool::new(false),
            gate: Mutex::new(Gate::default()),
            signal: Condvar::new(),
        }
    }

    /// Store with `kv` holding `a/x`, `b/y` and `app/db/creds`.
    pub fn sample() -> Self {
        Self::new(
            Memory::new()
                .with_secret("kv", "a/x", &[("k", "1")])
                .with_secret("kv", "b/y", &[("k", "2")])
                .with_secret("kv", "app/db/creds", DB_CREDS_PAIRS),
        )
    }

    pub fn lists(&self) -> usize {
        self.lists.load(Ordering::SeqCst)
    }

    pub fn reads(&self) -> usize {
        self.reads.load(Ordering::SeqCst)
    }

    pub fn writes(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    /// Make every call fail with `StoreUnavailable` until set back.
    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    /// Block listings of `path` until [`TestStore::release`].
    pub fn hold(&self, path: &str) {
        self.gate.lock().unwrap().held.insert(path.to_string());
    }

    pub fn release(&self, path: &str) {
        self.gate.lock().unwrap().held.remove(path);
        self.signal.notify_all();
    }

    /// Wait until a listing of `path` is parked at the gate.
    pub fn wait_parked(&self, path: &str, timeout: Duration) -> bool {
        let deadline = Instant::now() + timeout;
        let mut gate = self.gate.lock().unwrap();
        while !gate.parked.contains(path) {
            let now = Instant::now();
            if now >= deadline {
                return false;
            }
            gate = self.signal.wait_timeout(gate, deadline - now).unwrap().0;
        }
        true
    }

    fn check_online(&self) -> Result<()> {
        if self.offline.load(Ordering::SeqCst) {
            return Err(Error::StoreUnavailable("connection refused".into()));
        }
        Ok(())
    }

    fn pass_gate(&self, path: &str) {
        let mut gate = self.gate.lock().unwrap();
        if !gate.held.contains(path) {
            return;
        }
        gate.parked.insert(path.to_string());
        self.signal.notify_all();
        while gate.held.contains(path) {
            gate = self.signal.wait(gate).unwrap();
        }
        gate.parked.remove(path);
    }
}

const DB_CREDS_PAIRS: &[(&str, &str)] = super::fixtures::DB_CREDS;

impl SecretStore for TestStore {
    fn list_engines(&self) -> Result<Vec<EngineName>> {
        self.check_online()?;
        self.inner.list_engines()
    }

    fn list_children(&self, engine: &str, path: &str) -> Result<Vec<ChildName>> {
        self.lists.fetch_add(1, Ordering::SeqCst);
        self.pass_gate(path);
        self.check_online()?;
        self.inner.list_children(engine, path)
    }

    fn read_leaf(&self, engine: &str, path: &str) -> Result<SecretRecord> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        self.check_online()?;
        self.inner.read_leaf(engine, path)
    }

    fn write_leaf(&self, engine: &str, path: &str, data: &SecretData) -> Result<()> {
        self.writes.fetch_add(1, Ordering::SeqCst);
        self.check_online()?;
        self.inner.write_leaf(engine, path, data)
    }
}
