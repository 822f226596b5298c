//! descry-genai: clients for the remote generative-AI service.
//!
//! Two HTTP clients against the same service:
//! - [`FileStoreClient`] uploads local media and waits for the remote store
//!   to finish processing it (fixed-interval polling for audio/video).
//! - [`GenerativeClient`] issues one-shot description calls referencing an
//!   uploaded file.

pub mod error;
pub mod files;
pub mod generate;

pub use error::GenAiError;
pub use files::{FileStoreClient, PollPolicy};
pub use generate::GenerativeClient;
