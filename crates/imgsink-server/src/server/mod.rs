//! Server composition: configuration, telemetry, worker pool, upload
//! orchestration, and the HTTP surface.
//!
//! ## Structure
//!
//! - [`config`] - CLI/env configuration and validation.
//! - [`telemetry`] - `tracing` subscriber initialization.
//! - [`pool`] - Admission-controlled worker pool (the concurrency core).
//! - [`upload`] - Upload validation and orchestration on top of the pool.
//! - [`service`] - axum routes and request handlers.

pub mod config;
pub mod pool;
pub mod service;
pub mod telemetry;
pub mod upload;
