use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

/// Source platform tag as the backend knows it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourcePlatform {
    Bilibili,
    Youtube,
    Local,
}

impl SourcePlatform {
    pub fn as_str(self) -> &'static str {
        match self {
            SourcePlatform::Bilibili => "bilibili",
            SourcePlatform::Youtube => "youtube",
            SourcePlatform::Local => "local",
        }
    }
}

impl fmt::Display for SourcePlatform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Processing quality tier, serialized as the backend's lowercase tags.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Quality {
    Fast,
    Medium,
    Slow,
}

impl Quality {
    pub fn as_str(self) -> &'static str {
        match self {
            Quality::Fast => "fast",
            Quality::Medium => "medium",
            Quality::Slow => "slow",
        }
    }
}

/// Note rendering options forwarded verbatim with each creation call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct NoteOptions {
    pub screenshot: bool,
    pub link: bool,
}

/// One local file to upload: the bytes are read lazily inside the batch so
/// a read failure counts as that file's failure, not the batch's.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadSpec {
    pub path: PathBuf,
    pub file_name: String,
    pub content_type: String,
}

/// Task status as reported by the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemoteStatus {
    Pending,
    Running,
    Success,
    Failed,
}

impl RemoteStatus {
    /// Parses the backend's uppercase status tags.
    pub fn parse(tag: &str) -> Option<Self> {
        match tag {
            "PENDING" => Some(RemoteStatus::Pending),
            "RUNNING" => Some(RemoteStatus::Running),
            "SUCCESS" => Some(RemoteStatus::Success),
            "FAILED" => Some(RemoteStatus::Failed),
            _ => None,
        }
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, RemoteStatus::Success | RemoteStatus::Failed)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SegmentPayload {
    pub start: f64,
    pub end: f64,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TranscriptPayload {
    pub full_text: String,
    pub language: String,
    pub segments: Vec<SegmentPayload>,
}

/// Media metadata as reported by the status endpoint. `raw_info` is the
/// provider's metadata re-serialized to JSON text.
#[derive(Debug, Clone, PartialEq)]
pub struct MediaPayload {
    pub cover_url: String,
    pub duration: f64,
    pub file_path: String,
    pub platform: String,
    pub title: String,
    pub video_id: String,
    pub raw_info: Option<String>,
}

/// One decoded reply from the status endpoint.
#[derive(Debug, Clone, PartialEq)]
pub struct StatusSnapshot {
    pub status: RemoteStatus,
    pub markdown: Option<String>,
    pub transcript: Option<TranscriptPayload>,
    pub media: Option<MediaPayload>,
}

/// Failure taxonomy of the remote API. Anything that kept the call from
/// completing is `Transport`; a completed call whose envelope carries a
/// non-zero code is `Rejected`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    #[error("transport error: {0}")]
    Transport(String),
    #[error("backend rejected the request (code {code}): {}", .message.as_deref().unwrap_or("no message"))]
    Rejected { code: i64, message: Option<String> },
}

/// Engine outcomes, polled by the shell and mapped to core messages.
#[derive(Debug, Clone, PartialEq)]
pub enum EngineEvent {
    /// The single-link creation call settled.
    UrlSettled {
        platform: SourcePlatform,
        result: Result<String, ApiError>,
    },
    /// One upload in a batch settled; siblings may still be in flight.
    UploadSettled {
        file_name: String,
        result: Result<String, ApiError>,
    },
    /// Every upload in the batch has settled.
    BatchSettled { accepted: usize, failed: usize },
    /// A status poll settled.
    StatusSettled {
        task_id: String,
        result: Result<StatusSnapshot, ApiError>,
    },
    /// A best-effort remote delete settled.
    DeleteSettled {
        video_id: String,
        result: Result<(), ApiError>,
    },
}
