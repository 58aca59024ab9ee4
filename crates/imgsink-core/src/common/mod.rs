mod error;
mod format;
mod types;

pub use error::{Error, Result};
pub use format::ImageFormat;
pub use types::{ErrorResponse, ImageId, MAX_UPLOAD_BYTES, SNIFF_WINDOW, UploadResponse};
