//! Clipnote engine: remote note API client and submission orchestration.
mod api;
mod engine;
mod persist;
mod submit;
mod types;

pub use api::{ApiSettings, HttpBackend, NoteBackend};
pub use engine::EngineHandle;
pub use persist::{ensure_state_dir, AtomicFileWriter, PersistError};
pub use submit::{submit_batch, submit_link, ChannelEventSink, EventSink};
pub use types::{
    ApiError, EngineEvent, MediaPayload, NoteOptions, Quality, RemoteStatus, SegmentPayload,
    SourcePlatform, StatusSnapshot, TranscriptPayload, UploadSpec,
};
