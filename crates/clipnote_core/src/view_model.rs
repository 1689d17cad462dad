use crate::{FormError, Platform, TaskId, TaskStatus};

#[derive(Debug, Clone, PartialEq, Default)]
pub struct AppViewModel {
    pub url_input: String,
    pub platform: Platform,
    /// Names of the files currently picked for upload.
    pub selected_files: Vec<String>,
    pub form_error: Option<FormError>,
    pub task_count: usize,
    /// History rows, most recently registered first.
    pub tasks: Vec<TaskRowView>,
    pub selected_task_id: Option<TaskId>,
    /// File names whose creation call failed in the last batch.
    pub last_batch_failures: Vec<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TaskRowView {
    pub task_id: TaskId,
    pub title: String,
    pub platform: Platform,
    pub status: TaskStatus,
    pub created_at: String,
}
