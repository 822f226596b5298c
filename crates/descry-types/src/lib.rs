use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

// ──────────────────── Media Catalogue ────────────────────

/// The four fixed media files the gateway can describe.
///
/// Each kind carries its own local file name, MIME type, remote display
/// name, and description prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MediaKind {
    Image,
    Audio,
    Text,
    Video,
}

impl MediaKind {
    pub const ALL: [MediaKind; 4] = [
        MediaKind::Image,
        MediaKind::Audio,
        MediaKind::Text,
        MediaKind::Video,
    ];

    /// File name under the configured media directory.
    pub fn file_name(self) -> &'static str {
        match self {
            MediaKind::Image => "jetpack.jpg",
            MediaKind::Audio => "samplesmall.mp3",
            MediaKind::Text => "a11.txt",
            MediaKind::Video => "Big_Buck_Bunny.mp4",
        }
    }

    /// MIME type declared on upload.
    pub fn mime_type(self) -> &'static str {
        match self {
            MediaKind::Image => "image/jpeg",
            MediaKind::Audio => "audio/mp3",
            MediaKind::Text => "text/plain",
            MediaKind::Video => "video/mp4",
        }
    }

    /// Display name registered with the remote file store.
    pub fn display_name(self) -> &'static str {
        match self {
            MediaKind::Image => "Jetpack drawing",
            MediaKind::Audio => "Audio sample",
            MediaKind::Text => "Apollo 11",
            MediaKind::Video => "Big Buck Bunny",
        }
    }

    /// Prompt paired with the uploaded file in the inference call.
    pub fn prompt(self) -> &'static str {
        match self {
            MediaKind::Image => "Tell me about this image.",
            MediaKind::Audio => "Tell me about this audio clip.",
            MediaKind::Text => "Transcribe the first few sentences of this document.",
            MediaKind::Video => "Tell me about this video.",
        }
    }

    /// Whether the remote store processes this kind asynchronously.
    ///
    /// Audio and video stay in `Processing` for a while after upload;
    /// images and plain text are usable immediately.
    pub fn pollable(self) -> bool {
        matches!(self, MediaKind::Audio | MediaKind::Video)
    }
}

impl fmt::Display for MediaKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            MediaKind::Image => "image",
            MediaKind::Audio => "audio",
            MediaKind::Text => "text",
            MediaKind::Video => "video",
        };
        f.write_str(s)
    }
}

impl FromStr for MediaKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "image" => Ok(MediaKind::Image),
            "audio" => Ok(MediaKind::Audio),
            "text" => Ok(MediaKind::Text),
            "video" => Ok(MediaKind::Video),
            other => Err(format!("unknown media kind: {other}")),
        }
    }
}

// ──────────────────── Remote File Types ────────────────────

/// Processing state of a remote file.
///
/// Transitions are owned exclusively by the remote service; this process
/// only observes them via status reads.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum FileState {
    #[default]
    #[serde(rename = "PROCESSING")]
    Processing,
    /// The service reports ready files as `READY` or `ACTIVE`.
    #[serde(rename = "READY", alias = "ACTIVE")]
    Ready,
    #[serde(rename = "FAILED")]
    Failed,
}

impl FileState {
    /// Terminal states end the poll loop.
    pub fn is_terminal(self) -> bool {
        !matches!(self, FileState::Processing)
    }
}

/// A file held by the remote store.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadedFile {
    /// Remote identifier (e.g. "files/abc123"), used for status reads.
    pub name: String,
    /// Reference URI handed to the inference call.
    pub uri: String,
    /// MIME type as recorded by the store.
    pub mime_type: String,
    /// Last observed state.
    #[serde(default)]
    pub state: FileState,
}
