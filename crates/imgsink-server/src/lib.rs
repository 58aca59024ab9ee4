//! HTTP image ingestion service.
//!
//! Accepts JPEG uploads over multipart HTTP, validates size and format,
//! rescales the content, and persists it to disk. Processing runs on a
//! fixed-size worker pool with a grace-period admission window, so the
//! service sheds excess load with `429 Too Many Requests` instead of
//! queueing unboundedly.
//!
//! The library target exists so integration tests (and embedders) can build
//! the router and drive it in-process; the `imgsink-server` binary lives in
//! `src/main.rs`.

pub mod server;
