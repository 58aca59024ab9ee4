//! # Common Upload Types and Constants
//!
//! This module defines the shared types and constants used for accepting,
//! naming, and acknowledging uploaded images across the system. It ensures
//! that the HTTP surface and the processing pipeline adhere to a consistent
//! contract for limits and wire shapes.
//!
//! ## Types
//!
//! - [`ImageId`] - Collision-resistant identifier assigned to every accepted
//!   upload
//! - [`UploadResponse`] - Success body returned to the uploader
//! - [`ErrorResponse`] - Failure body returned to the uploader
//!
//! ## Constants
//!
//! - [`MAX_UPLOAD_BYTES`] - Upload size ceiling enforced before any work is
//!   scheduled
//! - [`SNIFF_WINDOW`] - Number of leading bytes inspected for format
//!   classification

use core::fmt;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Upload size ceiling, in bytes (8192 KiB).
///
/// Requests whose image payload exceeds this limit are rejected with
/// `413 Payload Too Large` before a processing task is ever built.
pub const MAX_UPLOAD_BYTES: usize = 8192 * 1024;

/// Number of leading payload bytes inspected to classify the image format.
pub const SNIFF_WINDOW: usize = 512;

/// Identifier assigned to an accepted upload.
///
/// Backed by a random UUID (v4), so two uploads receive distinct identifiers
/// with overwhelming probability. The identifier doubles as the on-disk file
/// stem via [`ImageId::file_name`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ImageId(Uuid);

impl ImageId {
    /// Generates a fresh, collision-resistant identifier.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// The on-disk file name for this artifact.
    ///
    /// All persisted images are JPEG, so the extension is fixed.
    #[must_use]
    pub fn file_name(&self) -> String {
        format!("{}.jpg", self.0)
    }
}

impl Default for ImageId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ImageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Success body for `POST /upload`.
///
/// Receiving this response means the upload was *accepted for processing*; it
/// is not a durability guarantee. Transform or persistence failures after
/// acceptance are logged server-side and never reported to this caller.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadResponse {
    pub image_id: ImageId,
}

/// Failure body for any rejected request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}
