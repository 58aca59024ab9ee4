//! Pool construction, submission, and shutdown coordination.
//!
//! The [`WorkerPool`] owns one shared MPSC channel and an idle-worker
//! semaphore. Every worker iteration releases exactly one idle permit before
//! parking on the channel, and every accepted submission consumes exactly one
//! permit, so a send can only succeed when a worker iteration is already
//! committed to receive it. The channel buffer therefore never holds work
//! that has no reserved worker, which preserves hand-to-hand transfer
//! semantics on top of tokio's bounded channel.

use crate::server::pool::worker::worker_loop;
use core::future::Future;
use core::pin::Pin;
use core::sync::atomic::{AtomicU8, AtomicUsize, Ordering};
use core::time::Duration;
use parking_lot::Mutex;
use std::sync::Arc;
use tokio::{
    sync::{Semaphore, mpsc},
    time::{sleep, timeout},
};

/// How long a submission may wait for a worker slot before it is rejected.
///
/// This window is all the waiting a submission gets: there is no queue behind it.
pub const SUBMIT_GRACE: Duration = Duration::from_millis(100);

/// A self-contained, deferred unit of work executed exactly once by a worker.
///
/// The submitter never observes the outcome; a task reports failures through
/// logging only.
pub type Task = Pin<Box<dyn Future<Output = ()> + Send + 'static>>;

/// Pool lifecycle. `Running` is the only state that admits work.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum PoolState {
    Running = 0,
    ShuttingDown = 1,
    Stopped = 2,
}

impl PoolState {
    fn from_u8(raw: u8) -> Self {
        match raw {
            0 => Self::Running,
            1 => Self::ShuttingDown,
            _ => Self::Stopped,
        }
    }
}

/// State shared between the pool handle and its worker loops.
pub(crate) struct PoolShared {
    pub(crate) lifecycle: AtomicU8,
    /// Tasks currently executing. Shutdown bookkeeping only.
    pub(crate) in_flight: AtomicUsize,
    /// Workers that have not yet exited their loop; the last one out moves
    /// the lifecycle to `Stopped`.
    pub(crate) workers_alive: AtomicUsize,
}

/// A fixed-size pool of asynchronous workers with load-shedding admission.
///
/// Created once per server process and shared by reference; dropping the pool
/// without calling [`WorkerPool::shutdown`] also closes the channel and lets
/// workers wind down.
pub struct WorkerPool {
    /// Sole sender for the handoff channel. Taken (and thereby closed) by
    /// `shutdown`; every send happens under this same lock, so no send can
    /// race the close.
    sender: Mutex<Option<mpsc::Sender<Task>>>,
    idle: Arc<Semaphore>,
    shared: Arc<PoolShared>,
    grace: Duration,
}

impl WorkerPool {
    /// Spawns `num_workers` persistent worker loops with the default
    /// [`SUBMIT_GRACE`] admission window.
    #[must_use]
    pub fn new(num_workers: usize) -> Self {
        Self::with_grace_period(num_workers, SUBMIT_GRACE)
    }

    /// Like [`WorkerPool::new`] with an explicit admission window.
    ///
    /// `num_workers` is clamped to at least one.
    #[must_use]
    pub fn with_grace_period(num_workers: usize, grace: Duration) -> Self {
        let num_workers = num_workers.max(1);

        // Capacity matches the worker count: admission is gated by idle
        // permits, so at most `num_workers` accepted tasks can be awaiting
        // pickup at any instant and `try_send` below cannot hit a full
        // buffer.
        let (tx, rx) = mpsc::channel::<Task>(num_workers);
        let rx = Arc::new(tokio::sync::Mutex::new(rx));
        let idle = Arc::new(Semaphore::new(0));
        let shared = Arc::new(PoolShared {
            lifecycle: AtomicU8::new(PoolState::Running as u8),
            in_flight: AtomicUsize::new(0),
            workers_alive: AtomicUsize::new(num_workers),
        });

        for worker_id in 0..num_workers {
            tokio::spawn(worker_loop(
                worker_id,
                Arc::clone(&rx),
                Arc::clone(&idle),
                Arc::clone(&shared),
            ));
        }

        Self {
            sender: Mutex::new(Some(tx)),
            idle,
            shared,
            grace,
        }
    }

    /// Attempts to hand `task` to an idle worker, waiting up to the grace
    /// period for one to become ready.
    ///
    /// Returns `true` the instant a worker slot has received the task;
    /// execution may still be pending. Returns `false` when the grace period
    /// elapses first or the pool is no longer running. Safe to call from any
    /// number of concurrent submitters, and always returns within the grace
    /// period plus a small epsilon.
    pub async fn submit<F>(&self, task: F) -> bool
    where
        F: Future<Output = ()> + Send + 'static,
    {
        if self.state() != PoolState::Running {
            return false;
        }

        let Ok(Ok(permit)) = timeout(self.grace, Arc::clone(&self.idle).acquire_owned()).await
        else {
            return false;
        };

        // Hand off under the sender lock. `shutdown` takes the same lock
        // before closing the channel, so the sender is `Some` if and only if
        // the pool is still `Running` - no task is ever handed off after the
        // pool leaves that state.
        let guard = self.sender.lock();
        match guard.as_ref() {
            Some(tx) => match tx.try_send(Box::pin(task)) {
                Ok(()) => {
                    permit.forget();
                    true
                }
                Err(_) => false,
            },
            None => false,
        }
    }

    /// Transitions the pool out of `Running` and closes the handoff channel.
    ///
    /// Idempotent: only the first call observes `Running` and performs the
    /// close. Workers finish the task they are executing, drain anything
    /// already handed off, and exit; this method does not wait for them -
    /// callers needing a drained guarantee follow up with
    /// [`WorkerPool::drain`].
    pub fn shutdown(&self) {
        let mut guard = self.sender.lock();
        if self
            .shared
            .lifecycle
            .compare_exchange(
                PoolState::Running as u8,
                PoolState::ShuttingDown as u8,
                Ordering::AcqRel,
                Ordering::Acquire,
            )
            .is_err()
        {
            return;
        }
        // Dropping the only sender closes the channel. Held under the lock so
        // no concurrent `submit` can observe a half-shut pool.
        drop(guard.take());
    }

    /// Waits up to `limit` for every worker to finish and exit after
    /// [`WorkerPool::shutdown`]. Returns `false` if the deadline passed with
    /// work still in flight.
    pub async fn drain(&self, limit: Duration) -> bool {
        timeout(limit, async {
            while self.state() != PoolState::Stopped || self.in_flight() > 0 {
                sleep(Duration::from_millis(10)).await;
            }
        })
        .await
        .is_ok()
    }

    /// Current lifecycle state.
    #[must_use]
    pub fn state(&self) -> PoolState {
        PoolState::from_u8(self.shared.lifecycle.load(Ordering::Acquire))
    }

    /// Number of tasks currently executing.
    #[must_use]
    pub fn in_flight(&self) -> usize {
        self.shared.in_flight.load(Ordering::Acquire)
    }
}
