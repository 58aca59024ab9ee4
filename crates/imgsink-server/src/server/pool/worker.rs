use crate::server::pool::manager::{PoolShared, PoolState, Task};
use core::sync::atomic::Ordering;
use std::sync::Arc;
use tokio::sync::{Semaphore, mpsc};

/// Persistent worker loop: receive one task from the shared handoff channel,
/// execute it to completion, repeat until the channel is closed and drained.
///
/// Each iteration releases exactly one idle permit *before* parking on the
/// channel. Admission in [`WorkerPool::submit`] consumes one permit per
/// accepted task, so a submission can only succeed when some worker iteration
/// is committed to pick the task up.
///
/// After shutdown closes the channel, `recv` keeps yielding tasks that were
/// already handed off before returning `None`, so every accepted task runs
/// exactly once. The last worker to exit moves the pool to
/// [`PoolState::Stopped`].
///
/// [`WorkerPool::submit`]: crate::server::pool::WorkerPool::submit
pub(crate) async fn worker_loop(
    worker_id: usize,
    rx: Arc<tokio::sync::Mutex<mpsc::Receiver<Task>>>,
    idle: Arc<Semaphore>,
    shared: Arc<PoolShared>,
) {
    tracing::trace!("worker {worker_id} started");

    loop {
        idle.add_permits(1);

        // Single consumer at a time; the others queue on the lock and count
        // as ready via the permit they already released.
        let task = { rx.lock().await.recv().await };
        let Some(task) = task else { break };

        shared.in_flight.fetch_add(1, Ordering::AcqRel);
        task.await;
        shared.in_flight.fetch_sub(1, Ordering::AcqRel);
    }

    if shared.workers_alive.fetch_sub(1, Ordering::AcqRel) == 1 {
        shared
            .lifecycle
            .store(PoolState::Stopped as u8, Ordering::Release);
    }

    tracing::trace!("worker {worker_id} stopped");
}
