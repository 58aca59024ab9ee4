//! Error types for the image ingestion service.
//!
//! This module defines the central `Error` enum, which captures all
//! recoverable and reportable error cases within the upload pipeline. It
//! implements [`IntoResponse`] so handlers can propagate errors with `?` and
//! have them rendered as the appropriate HTTP status with a JSON body.
//!
//! ## Error Cases
//! - `SizeLimitExceeded`: The payload exceeds the configured upload ceiling.
//! - `UnsupportedType`: The payload is not a JPEG image (or is undetectable).
//! - `AdmissionRejected`: No worker became available within the grace period.
//! - `InvalidRequest`: The multipart request was malformed or missing the
//!   `image` field.
//! - `Transform`: The rescale collaborator failed after acceptance.
//! - `Persist`: The filesystem write failed after acceptance.
//! - `Internal`: A handler-level fault before acceptance.
//!
//! `Transform` and `Persist` occur only inside an already-accepted processing
//! task. They are logged for operational visibility and never surfaced to the
//! original uploader, who has long since received `200 OK`.

use crate::ErrorResponse;
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};

pub type Result<T> = core::result::Result<T, Error>;

/// Unified error type for the upload pipeline.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The payload exceeds [`MAX_UPLOAD_BYTES`](crate::MAX_UPLOAD_BYTES).
    #[error("file is bigger than 8192 Kilobytes")]
    SizeLimitExceeded,

    /// The payload is not a JPEG image.
    #[error("file is not a JPEG image")]
    UnsupportedType,

    /// The worker pool stayed saturated for the whole admission window.
    #[error("too many requests")]
    AdmissionRejected,

    /// The multipart request was malformed or incomplete.
    #[error("invalid upload request: {reason}")]
    InvalidRequest { reason: String },

    /// The rescale collaborator failed. Post-acceptance only.
    #[error("image transform failed: {reason}")]
    Transform { reason: String },

    /// Writing the transformed image to disk failed. Post-acceptance only.
    #[error("failed to persist image: {0}")]
    Persist(#[from] std::io::Error),

    /// Unexpected handler-level fault before acceptance.
    #[error("internal error: {context}")]
    Internal { context: String },
}

impl Error {
    /// The HTTP status this error maps to when surfaced to a caller.
    #[must_use]
    pub fn status(&self) -> StatusCode {
        match self {
            Self::SizeLimitExceeded => StatusCode::PAYLOAD_TOO_LARGE,
            Self::UnsupportedType | Self::InvalidRequest { .. } => StatusCode::BAD_REQUEST,
            Self::AdmissionRejected => StatusCode::TOO_MANY_REQUESTS,
            Self::Transform { .. } | Self::Persist(_) | Self::Internal { .. } => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let body = Json(ErrorResponse {
            error: self.to_string(),
        });
        (self.status(), body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_mapping_matches_contract() {
        assert_eq!(Error::SizeLimitExceeded.status(), StatusCode::PAYLOAD_TOO_LARGE);
        assert_eq!(Error::UnsupportedType.status(), StatusCode::BAD_REQUEST);
        assert_eq!(Error::AdmissionRejected.status(), StatusCode::TOO_MANY_REQUESTS);
        assert_eq!(
            Error::InvalidRequest {
                reason: "missing field".into()
            }
            .status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            Error::Transform {
                reason: "boom".into()
            }
            .status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
