//! Shared contract types for the imgsink image ingestion service.
//!
//! This crate defines everything the server and its callers must agree on:
//! upload limits, artifact identifiers, the JSON response shapes, leading-byte
//! image format classification, and the central [`Error`] type with its HTTP
//! status mapping.

mod common;
pub use common::*;
