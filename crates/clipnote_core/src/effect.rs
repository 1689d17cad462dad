use std::fmt;

use crate::{PendingFile, Platform, TaskId};

/// Processing quality tier sent with every submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Quality {
    Fast,
    #[default]
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

/// Note rendering options. `screenshot` only makes sense for video-bearing
/// sources; the caller is expected to drop it for text/audio submissions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct NoteOptions {
    pub screenshot: bool,
    pub link: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    /// Create one note job from a remote video link.
    SubmitUrl {
        url: String,
        platform: Platform,
        quality: Quality,
        options: NoteOptions,
    },
    /// Create one note job per file, concurrently, settle-all.
    SubmitFiles {
        files: Vec<PendingFile>,
        quality: Quality,
        options: NoteOptions,
    },
    /// Ask the backend for a task's authoritative status.
    FetchStatus { task_id: TaskId },
    /// Best-effort remote mirror of a local deletion.
    DeleteRemote { video_id: String, platform: Platform },
    /// Surface a user-facing notification.
    Notify(Notice),
}

/// User-facing notifications, rendered by the shell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    /// The single-link submission was accepted.
    NoteJobSubmitted,
    /// Every file in the batch was accepted.
    UploadBatchCompleted { accepted: usize },
    /// At least one file in the batch failed.
    UploadBatchPartialFailure { accepted: usize, failed: usize },
    /// A picked file has an unsupported content type.
    UnsupportedFile { name: String },
    /// The single-link submission failed.
    SubmitFailed { message: String },
    /// The form input was rejected before reaching the network.
    InvalidInput { message: String },
    /// A task was removed and the backend confirmed the delete.
    TaskDeleted,
    /// A task was removed locally but the remote delete failed.
    DeleteFailed { message: String },
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Notice::NoteJobSubmitted => write!(f, "Note generation job submitted."),
            Notice::UploadBatchCompleted { accepted } => {
                write!(f, "All {accepted} file(s) uploaded; note jobs submitted.")
            }
            Notice::UploadBatchPartialFailure { accepted, failed } => write!(
                f,
                "{accepted} file(s) submitted, {failed} failed; check the task history."
            ),
            Notice::UnsupportedFile { name } => write!(
                f,
                "Unsupported file type for {name}: upload a txt, mp3 or mp4 file."
            ),
            Notice::SubmitFailed { message } => {
                write!(f, "Note generation failed: {message}")
            }
            Notice::InvalidInput { message } => f.write_str(message),
            Notice::TaskDeleted => write!(f, "Task deleted."),
            Notice::DeleteFailed { message } => {
                write!(f, "Remote delete failed: {message}")
            }
        }
    }
}
