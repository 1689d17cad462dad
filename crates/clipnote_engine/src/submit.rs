use futures_util::future::join_all;
use note_logging::{note_info, note_warn};

use crate::{ApiError, EngineEvent, NoteBackend, NoteOptions, Quality, SourcePlatform, UploadSpec};

/// Where settled submission outcomes are reported.
pub trait EventSink: Send + Sync {
    fn emit(&self, event: EngineEvent);
}

pub struct ChannelEventSink {
    tx: std::sync::mpsc::Sender<EngineEvent>,
}

impl ChannelEventSink {
    pub fn new(tx: std::sync::mpsc::Sender<EngineEvent>) -> Self {
        Self { tx }
    }
}

impl EventSink for ChannelEventSink {
    fn emit(&self, event: EngineEvent) {
        let _ = self.tx.send(event);
    }
}

/// Single-link submission: one creation call, one settled event.
pub async fn submit_link(
    backend: &dyn NoteBackend,
    video_url: &str,
    platform: SourcePlatform,
    quality: Quality,
    options: NoteOptions,
    sink: &dyn EventSink,
) {
    let result = backend
        .create_from_url(video_url, platform, quality, options)
        .await;
    match &result {
        Ok(task_id) => note_info!("link submission accepted, task_id={task_id}"),
        Err(err) => note_warn!("link submission failed: {err}"),
    }
    sink.emit(EngineEvent::UrlSettled { platform, result });
}

/// Batch upload fan-out: every file's creation call runs concurrently and
/// the barrier waits for all of them to settle. One file failing never
/// cancels or blocks its siblings. Each settled upload is reported as its
/// own event; the aggregate follows once the whole set is in.
pub async fn submit_batch(
    backend: &dyn NoteBackend,
    files: Vec<UploadSpec>,
    quality: Quality,
    options: NoteOptions,
    sink: &dyn EventSink,
) -> (usize, usize) {
    let uploads = files.into_iter().map(|spec| async move {
        let result = upload_one(backend, &spec, quality, options).await;
        let accepted = result.is_ok();
        if let Err(err) = &result {
            note_warn!("upload of {} failed: {err}", spec.file_name);
        }
        sink.emit(EngineEvent::UploadSettled {
            file_name: spec.file_name,
            result,
        });
        accepted
    });

    let outcomes = join_all(uploads).await;
    let accepted = outcomes.iter().filter(|ok| **ok).count();
    let failed = outcomes.len() - accepted;
    note_info!("upload batch settled: {accepted} accepted, {failed} failed");
    sink.emit(EngineEvent::BatchSettled { accepted, failed });
    (accepted, failed)
}

async fn upload_one(
    backend: &dyn NoteBackend,
    spec: &UploadSpec,
    quality: Quality,
    options: NoteOptions,
) -> Result<String, ApiError> {
    let bytes = tokio::fs::read(&spec.path).await.map_err(|err| {
        ApiError::Transport(format!("read {}: {err}", spec.path.display()))
    })?;
    backend
        .create_from_upload(&spec.file_name, &spec.content_type, bytes, quality, options)
        .await
}
