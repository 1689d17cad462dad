//! Clipnote core: pure state machine for note-generation job tracking.
mod effect;
mod msg;
mod state;
mod store;
mod task;
mod update;
mod view_model;

pub use effect::{Effect, NoteOptions, Notice, Quality};
pub use msg::Msg;
pub use state::{AppState, FormError, FormField, PendingFile, ALLOWED_UPLOAD_TYPES};
pub use store::TaskStore;
pub use task::{
    MediaMeta, Platform, Segment, Task, TaskId, TaskPatch, TaskStatus, Transcript,
    PLACEHOLDER_TITLE,
};
pub use update::update;
pub use view_model::{AppViewModel, TaskRowView};
