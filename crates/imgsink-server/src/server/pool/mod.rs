//! Admission-controlled worker pool.
//!
//! This module defines the [`WorkerPool`], a fixed set of asynchronous
//! workers consuming from a single shared handoff channel. Submission is
//! deliberately not a queue: a task is accepted only when a worker slot is
//! committed within a bounded grace period, which turns saturation into
//! prompt rejection instead of unbounded buffering.

pub mod manager;
pub(crate) mod worker;

#[cfg(test)]
mod tests;

pub use manager::{PoolState, SUBMIT_GRACE, Task, WorkerPool};
