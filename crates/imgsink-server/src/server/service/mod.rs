//! HTTP surface: route construction and request handlers.
//!
//! ## Structure
//!
//! - [`handler`] - axum handlers for `POST /upload` and `GET /health`, plus
//!   [`handler::router`] which assembles the application.

pub mod handler;

pub use handler::{AppState, router};
