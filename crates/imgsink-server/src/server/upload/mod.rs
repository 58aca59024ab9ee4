//! Upload orchestration on top of the worker pool.
//!
//! A request moves through `Received -> Validated -> Submitted ->
//! {Accepted | Rejected}`. Validation is synchronous and happens before any
//! task is built; acceptance means *scheduled*, not *completed*. Once a task
//! is admitted, transform or persistence failures are logged for operational
//! visibility and are deliberately invisible to the original uploader, who
//! already received its identifier.

pub mod scale;


pub use scale::{PassthroughRescale, Rescale};

use crate::server::pool::WorkerPool;
use bytes::Bytes;
use imgsink_core::{Error, ImageFormat, ImageId, MAX_UPLOAD_BYTES, Result, SNIFF_WINDOW};
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Validates inbound images and schedules their processing.
///
/// Holds a reference to the process-wide [`WorkerPool`] but does not own its
/// lifecycle; the pool is created and shut down by `main`.
pub struct UploadOrchestrator {
    base_dir: PathBuf,
    pool: Arc<WorkerPool>,
    scaler: Arc<dyn Rescale>,
}

impl UploadOrchestrator {
    pub fn new(base_dir: PathBuf, pool: Arc<WorkerPool>, scaler: Arc<dyn Rescale>) -> Self {
        Self {
            base_dir,
            pool,
            scaler,
        }
    }

    /// Synchronous pre-admission checks: size ceiling, then format sniffing
    /// over the leading byte window. Only JPEG payloads pass.
    pub fn validate(&self, payload: &[u8]) -> Result<()> {
        if payload.len() > MAX_UPLOAD_BYTES {
            return Err(Error::SizeLimitExceeded);
        }
        let window = &payload[..payload.len().min(SNIFF_WINDOW)];
        match ImageFormat::sniff(window) {
            Some(ImageFormat::Jpeg) => Ok(()),
            _ => Err(Error::UnsupportedType),
        }
    }

    /// Assigns an identifier, builds the processing task, and submits it to
    /// the pool.
    ///
    /// On admission the identifier is returned immediately; processing is
    /// asynchronous from here on and its outcome is never reported to this
    /// caller. On rejection no task exists and no identifier is assigned to
    /// the caller.
    pub async fn accept(&self, payload: Bytes) -> Result<ImageId> {
        let id = ImageId::new();
        let dest = self.base_dir.join(id.file_name());
        let scaler = Arc::clone(&self.scaler);

        let task = async move {
            if let Err(error) = process_image(&scaler, payload, &dest).await {
                tracing::error!(%id, path = %dest.display(), %error, "image processing failed");
            } else {
                tracing::info!(%id, path = %dest.display(), "image persisted");
            }
        };

        if self.pool.submit(task).await {
            Ok(id)
        } else {
            Err(Error::AdmissionRejected)
        }
    }
}

/// Body of an accepted processing task: rescale the validated content, then
/// write the result to `dest`.
///
/// The rescale collaborator is synchronous and may be slow, so it runs on the
/// blocking thread pool; overall concurrency stays bounded by the worker pool
/// because the owning worker awaits it.
async fn process_image(scaler: &Arc<dyn Rescale>, payload: Bytes, dest: &Path) -> Result<()> {
    let scaled = {
        let scaler = Arc::clone(scaler);
        let payload = payload.clone();
        tokio::task::spawn_blocking(move || scaler.rescale(&payload))
            .await
            .map_err(|e| Error::Transform {
                reason: format!("transform task aborted: {e}"),
            })??
    };
    tokio::fs::write(dest, &scaled).await?;
    Ok(())
}
