use std::path::PathBuf;

use crate::view_model::{AppViewModel, TaskRowView};
use crate::{Platform, TaskStore};

/// Declared content types accepted for local file submission.
pub const ALLOWED_UPLOAD_TYPES: [&str; 3] = ["text/plain", "audio/mpeg", "video/mp4"];

/// A local file picked for upload, with its caller-declared content type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingFile {
    pub path: PathBuf,
    pub name: String,
    pub content_type: String,
}

impl PendingFile {
    pub fn is_video(&self) -> bool {
        self.content_type == "video/mp4"
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormField {
    VideoUrl,
    Platform,
}

/// A validation failure attached to the offending input field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormError {
    pub field: FormField,
    pub message: String,
}

impl FormError {
    pub(crate) fn new(field: FormField, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct AppState {
    pub(crate) store: TaskStore,
    pub(crate) url_input: String,
    pub(crate) platform: Platform,
    pub(crate) selected_files: Vec<PendingFile>,
    pub(crate) form_error: Option<FormError>,
    pub(crate) last_batch_failures: Vec<String>,
    pub(crate) dirty: bool,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    /// The task registry. Reads go through here; mutation happens in
    /// `update()` so the dirty flag stays truthful.
    pub fn store(&self) -> &TaskStore {
        &self.store
    }

    pub fn view(&self) -> AppViewModel {
        AppViewModel {
            url_input: self.url_input.clone(),
            platform: self.platform,
            selected_files: self.selected_files.iter().map(|f| f.name.clone()).collect(),
            form_error: self.form_error.clone(),
            task_count: self.store.len(),
            tasks: self
                .store
                .tasks()
                .iter()
                .map(|task| TaskRowView {
                    task_id: task.id.clone(),
                    title: task.media.title.clone(),
                    platform: task.platform,
                    status: task.status,
                    created_at: task.created_at.clone(),
                })
                .collect(),
            selected_task_id: self.store.selected_id().map(str::to_string),
            last_batch_failures: self.last_batch_failures.clone(),
        }
    }

    /// True when the registry changed since the last call; the shell uses
    /// this to drive write-through persistence and re-rendering.
    pub fn consume_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    pub(crate) fn mark_dirty(&mut self) {
        self.dirty = true;
    }
}
