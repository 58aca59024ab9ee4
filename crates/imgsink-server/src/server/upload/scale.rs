//! The external rescale collaborator boundary.

use bytes::Bytes;
use imgsink_core::Result;

/// Transforms a validated image payload into its stored form.
///
/// Implementations may be slow and are invoked on the blocking thread pool.
/// A failure is logged by the owning task and never retried.
pub trait Rescale: Send + Sync + 'static {
    fn rescale(&self, src: &[u8]) -> Result<Bytes>;
}

/// Identity transform: stores the payload unmodified.
///
/// Default wiring until a real scaler implementation is plugged in; the
/// orchestrator and pool are agnostic to what runs behind the trait.
pub struct PassthroughRescale;

impl Rescale for PassthroughRescale {
    fn rescale(&self, src: &[u8]) -> Result<Bytes> {
        Ok(Bytes::copy_from_slice(src))
    }
}
