use crate::{NoteOptions, PendingFile, Platform, Quality, Task, TaskId, TaskPatch};

#[derive(Debug, Clone, PartialEq)]
pub enum Msg {
    /// User edited the video-link input.
    InputChanged(String),
    /// User picked a source platform.
    PlatformSelected(Platform),
    /// User picked local files for upload; switches the form to `local`.
    FilesChosen(Vec<PendingFile>),
    /// User discarded the picked files.
    FileSelectionCleared,
    /// User confirmed the form.
    SubmitRequested {
        quality: Quality,
        options: NoteOptions,
    },
    /// Backend accepted the single-link submission.
    UrlAccepted {
        task_id: TaskId,
        platform: Platform,
        created_at: String,
    },
    /// The single-link submission failed (transport or backend).
    UrlFailed { message: String },
    /// One upload in a batch was accepted.
    UploadAccepted {
        task_id: TaskId,
        file_name: String,
        created_at: String,
    },
    /// One upload in a batch failed; its siblings keep going.
    UploadFailed { file_name: String, message: String },
    /// Every upload in the batch has settled.
    BatchSettled { accepted: usize, failed: usize },
    /// Status reconciliation produced a partial update for a task.
    StatusArrived { task_id: TaskId, patch: TaskPatch },
    /// User selected a task from the history (or cleared the selection).
    TaskSelected(Option<TaskId>),
    /// User deleted a task from the history.
    DeleteRequested(TaskId),
    /// The best-effort remote delete settled.
    DeleteSettled { error: Option<String> },
    /// User cleared the whole history.
    ClearAllRequested,
    /// Shell-driven polling tick for status reconciliation.
    PollTick,
    /// Restore the registry from the persisted snapshot at startup.
    SnapshotRestored {
        tasks: Vec<Task>,
        current_task_id: Option<TaskId>,
    },
    /// Fallback for placeholder wiring.
    NoOp,
}
