use std::fmt;

pub type TaskId = String;

/// Title shown for a remote submission until the backend reports metadata.
pub const PLACEHOLDER_TITLE: &str = "Fetching title…";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskStatus {
    Pending,
    Running,
    Succeeded,
    Failed,
}

impl TaskStatus {
    /// Terminal statuses are never polled again and never regress.
    pub fn is_terminal(self) -> bool {
        matches!(self, TaskStatus::Succeeded | TaskStatus::Failed)
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TaskStatus::Pending => write!(f, "pending"),
            TaskStatus::Running => write!(f, "running"),
            TaskStatus::Succeeded => write!(f, "succeeded"),
            TaskStatus::Failed => write!(f, "failed"),
        }
    }
}

/// Source platform of a submission. `Local` marks an uploaded file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Platform {
    /// The form's initial platform choice.
    #[default]
    Bilibili,
    Youtube,
    Local,
}

impl Platform {
    pub fn as_str(self) -> &'static str {
        match self {
            Platform::Bilibili => "bilibili",
            Platform::Youtube => "youtube",
            Platform::Local => "local",
        }
    }

    pub fn is_local(self) -> bool {
        matches!(self, Platform::Local)
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One time-stamped slice of the transcription, in seconds.
#[derive(Debug, Clone, PartialEq)]
pub struct Segment {
    pub start: f64,
    pub end: f64,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Transcript {
    pub full_text: String,
    pub language: String,
    pub segments: Vec<Segment>,
}

/// Descriptive info about the source media. Starts as a placeholder and is
/// replaced wholesale once the backend reports authoritative metadata.
#[derive(Debug, Clone, PartialEq)]
pub struct MediaMeta {
    pub cover_url: String,
    pub duration: f64,
    pub file_path: String,
    pub platform: Platform,
    pub title: String,
    pub video_id: String,
    /// Provider metadata as raw JSON text, when the backend supplies it.
    pub raw_info: Option<String>,
}

/// One tracked note-generation request.
#[derive(Debug, Clone, PartialEq)]
pub struct Task {
    pub id: TaskId,
    pub status: TaskStatus,
    pub platform: Platform,
    pub markdown: String,
    pub transcript: Transcript,
    pub media: MediaMeta,
    pub created_at: String,
}

impl Task {
    /// A freshly accepted submission: status `Pending`, empty note content,
    /// and defaulted metadata. Local uploads use the file name as the
    /// display title and their own task id as the video identifier.
    pub fn pending(
        id: TaskId,
        platform: Platform,
        file_name: Option<&str>,
        created_at: impl Into<String>,
    ) -> Self {
        let title = match (platform, file_name) {
            (Platform::Local, Some(name)) => name.to_string(),
            _ => PLACEHOLDER_TITLE.to_string(),
        };
        let video_id = if platform.is_local() {
            id.clone()
        } else {
            String::new()
        };
        Self {
            id,
            status: TaskStatus::Pending,
            platform,
            markdown: String::new(),
            transcript: Transcript::default(),
            media: MediaMeta {
                cover_url: String::new(),
                duration: 0.0,
                file_path: String::new(),
                platform,
                title,
                video_id,
                raw_info: None,
            },
            created_at: created_at.into(),
        }
    }
}

/// Partial update merged into a task by status reconciliation.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TaskPatch {
    pub status: Option<TaskStatus>,
    pub markdown: Option<String>,
    pub transcript: Option<Transcript>,
    pub media: Option<MediaMeta>,
}

impl TaskPatch {
    pub fn is_empty(&self) -> bool {
        self.status.is_none()
            && self.markdown.is_none()
            && self.transcript.is_none()
            && self.media.is_none()
    }
}
