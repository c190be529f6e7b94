//! Background execution of store jobs.
//!
//! Each job runs on its own thread and posts its [`Reply`] to a channel that
//! only the owning thread reads. Core state is never touched off that
//! thread; ordering between replies is sorted out by their tickets.

use std::io;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender, TryRecvError};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use tracing::{debug, trace, warn};

use crate::core::job::{Job, Reply};
use crate::core::store::SecretStore;
use crate::error::Error;

type Task = Box<dyn FnOnce() + Send>;
type Spawn = fn(String, Task) -> io::Result<()>;

fn spawn_thread(name: String, task: Task) -> io::Result<()> {
    thread::Builder::new().name(name).spawn(task).map(|_| ())
}

/// Runs jobs against a shared store and collects their replies.
pub struct Worker {
    store: Arc<dyn SecretStore>,
    spawn: Spawn,
    tx: Sender<Reply>,
    rx: Receiver<Reply>,
    in_flight: Arc<AtomicUsize>,
}

impl std::fmt::Debug for Worker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Worker")
            .field("in_flight", &self.in_flight())
            .finish_non_exhaustive()
    }
}

impl Worker {
    pub fn new(store: Arc<dyn SecretStore>) -> Self {
        Self::with_spawn(store, spawn_thread)
    }

    pub(crate) fn with_spawn(store: Arc<dyn SecretStore>, spawn: Spawn) -> Self {
        let (tx, rx) = mpsc::channel();
        Self {
            store,
            spawn,
            tx,
            rx,
            in_flight: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Number of dispatched jobs whose reply has not been received yet.
    pub fn in_flight(&self) -> usize {
        self.in_flight.load(Ordering::SeqCst)
    }

    /// Start `job` on a new thread.
    ///
    /// If no thread can be started the job still gets a reply, failed with
    /// `StoreUnavailable`, so whoever waits on its ticket hears back.
    pub fn dispatch(&self, job: Job) {
        debug!(ticket = %job.ticket, request = %job.request, "dispatching job");
        let store = Arc::clone(&self.store);
        let tx = self.tx.clone();
        let name = format!("vaultview-job-{}", job.ticket);
        let fallback = job.clone();
        self.in_flight.fetch_add(1, Ordering::SeqCst);

        let spawned = (self.spawn)(
            name,
            Box::new(move || {
                let reply = job.run(&*store);
                trace!(ticket = %reply.ticket, "job finished");
                // The receiver only goes away with the worker itself.
                let _ = tx.send(reply);
            }),
        );

        if let Err(e) = spawned {
            warn!(error = %e, ticket = %fallback.ticket, "failed to spawn job thread");
            let error =
                Error::StoreUnavailable(format!("could not start {}: {}", fallback.request, e));
            let _ = self.tx.send(fallback.fail(error));
        }
    }

    /// A finished reply, if one is waiting.
    pub fn try_recv(&self) -> Option<Reply> {
        match self.rx.try_recv() {
            Ok(reply) => Some(self.received(reply)),
            Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => None,
        }
    }

    /// Wait up to `timeout` for the next reply.
    pub fn recv_timeout(&self, timeout: Duration) -> Option<Reply> {
        match self.rx.recv_timeout(timeout) {
            Ok(reply) => Some(self.received(reply)),
            Err(RecvTimeoutError::Timeout) | Err(RecvTimeoutError::Disconnected) => None,
        }
    }

    fn received(&self, reply: Reply) -> Reply {
        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        reply
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::job::{Outcome, Request, TicketSeq};
    use crate::core::store::Memory;

    #[test]
    fn test_dispatch_and_receive() {
        let store = Arc::new(Memory::new().with_engine("kv"));
        let worker = Worker::new(store);
        let mut tickets = TicketSeq::default();
        let ticket = tickets.next();

        worker.dispatch(Job::new(ticket, Request::ListEngines));
        let reply = worker.recv_timeout(Duration::from_secs(5)).unwrap();

        assert_eq!(reply.ticket, ticket);
        assert!(matches!(reply.outcome, Outcome::Engines(Ok(ref e)) if e == &["kv"]));
        assert_eq!(worker.in_flight(), 0);
    }

    #[test]
    fn test_spawn_failure_still_replies() {
        let store = Arc::new(Memory::new().with_engine("kv"));
        let worker = Worker::with_spawn(store, |_, _| {
            Err(io::Error::new(io::ErrorKind::WouldBlock, "no threads left"))
        });
        let ticket = TicketSeq::default().next();

        worker.dispatch(Job::new(ticket, Request::ListEngines));
        assert_eq!(worker.in_flight(), 1);

        let reply = worker.try_recv().unwrap();
        assert_eq!(reply.ticket, ticket);
        match reply.outcome {
            Outcome::Engines(Err(Error::StoreUnavailable(msg))) => {
                assert!(msg.contains("no threads left"));
            }
            other => panic!("unexpected outcome: {:?}", other),
        }
        assert_eq!(worker.in_flight(), 0);
    }

    #[test]
    fn test_try_recv_when_idle() {
        let worker = Worker::new(Arc::new(Memory::new()));
        assert!(worker.try_recv().is_none());
        assert_eq!(worker.in_flight(), 0);
    }
}
