//! Error taxonomy for the remote service clients.

use descry_types::MediaKind;
use thiserror::Error;

/// Errors from the file store and generative model clients.
///
/// Handlers surface the `Display` text of whichever variant occurred; there
/// is no retry and no structured error code beyond the variant itself.
#[derive(Debug, Error)]
pub enum GenAiError {
    /// The upload or status read was rejected by the remote store.
    #[error("upload failed: {0}")]
    Upload(String),
    /// The remote store marked the uploaded file as failed.
    #[error("{0} processing failed")]
    ProcessingFailed(MediaKind),
    /// The file was still processing after the configured number of checks.
    #[error("{kind} still processing after {checks} status checks")]
    ProcessingTimeout { kind: MediaKind, checks: u32 },
    /// The inference call was rejected or returned no text.
    #[error("inference failed: {0}")]
    Inference(String),
    /// Transport-level failure.
    #[error(transparent)]
    Http(#[from] reqwest::Error),
    /// Local media file could not be read.
    #[error("media file error: {0}")]
    Io(#[from] std::io::Error),
}
