use std::sync::mpsc;
use std::thread;
use std::time::Duration;

use chrono::Utc;
use clipnote_core::{
    Effect, MediaMeta, Msg, NoteOptions, Notice, PendingFile, Platform, Quality, Segment,
    TaskPatch, TaskStatus, Transcript,
};
use clipnote_engine::{
    ApiError, ApiSettings, EngineEvent, EngineHandle, MediaPayload, RemoteStatus, StatusSnapshot,
    TranscriptPayload, UploadSpec,
};
use note_logging::note_warn;

use crate::app::Input;

/// Bridges core effects to the engine and engine events back to messages.
pub(crate) struct EffectRunner {
    engine: EngineHandle,
}

impl EffectRunner {
    pub(crate) fn new(settings: ApiSettings, input_tx: mpsc::Sender<Input>) -> Result<Self, ApiError> {
        let engine = EngineHandle::new(settings)?;
        let runner = Self { engine };
        runner.spawn_event_loop(input_tx);
        Ok(runner)
    }

    /// Dispatches engine-bound effects and hands notification effects back
    /// to the caller for rendering.
    pub(crate) fn enqueue(&self, effects: Vec<Effect>) -> Vec<Notice> {
        let mut notices = Vec::new();
        for effect in effects {
            match effect {
                Effect::SubmitUrl {
                    url,
                    platform,
                    quality,
                    options,
                } => {
                    self.engine.submit_url(
                        url,
                        engine_platform(platform),
                        engine_quality(quality),
                        engine_options(options),
                    );
                }
                Effect::SubmitFiles {
                    files,
                    quality,
                    options,
                } => {
                    let specs = files.into_iter().map(upload_spec).collect();
                    self.engine
                        .submit_files(specs, engine_quality(quality), engine_options(options));
                }
                Effect::FetchStatus { task_id } => {
                    self.engine.fetch_status(task_id);
                }
                Effect::DeleteRemote { video_id, platform } => {
                    self.engine.delete_task(video_id, engine_platform(platform));
                }
                Effect::Notify(notice) => notices.push(notice),
            }
        }
        notices
    }

    fn spawn_event_loop(&self, input_tx: mpsc::Sender<Input>) {
        let engine = self.engine.clone();
        thread::spawn(move || loop {
            if let Some(event) = engine.try_recv() {
                if let Some(msg) = map_event(event) {
                    if input_tx.send(Input::Core(msg)).is_err() {
                        break;
                    }
                }
            } else {
                thread::sleep(Duration::from_millis(20));
            }
        });
    }
}

/// Maps a settled engine outcome to a core message, stamping acceptance
/// timestamps on the way in. Poll failures return `None`: the next tick
/// retries them without bothering the reducer.
fn map_event(event: EngineEvent) -> Option<Msg> {
    match event {
        EngineEvent::UrlSettled { platform, result } => Some(match result {
            Ok(task_id) => Msg::UrlAccepted {
                task_id,
                platform: core_platform(platform),
                created_at: Utc::now().to_rfc3339(),
            },
            Err(err) => Msg::UrlFailed {
                message: err.to_string(),
            },
        }),
        EngineEvent::UploadSettled { file_name, result } => Some(match result {
            Ok(task_id) => Msg::UploadAccepted {
                task_id,
                file_name,
                created_at: Utc::now().to_rfc3339(),
            },
            Err(err) => Msg::UploadFailed {
                file_name,
                message: err.to_string(),
            },
        }),
        EngineEvent::BatchSettled { accepted, failed } => {
            Some(Msg::BatchSettled { accepted, failed })
        }
        EngineEvent::StatusSettled { task_id, result } => match result {
            Ok(snapshot) => Some(Msg::StatusArrived {
                task_id,
                patch: snapshot_patch(snapshot),
            }),
            Err(err) => {
                note_warn!("status poll for {} failed: {}", task_id, err);
                None
            }
        },
        EngineEvent::DeleteSettled { result, .. } => Some(Msg::DeleteSettled {
            error: result.err().map(|err| err.to_string()),
        }),
    }
}

fn snapshot_patch(snapshot: StatusSnapshot) -> TaskPatch {
    TaskPatch {
        status: Some(core_status(snapshot.status)),
        markdown: snapshot.markdown,
        transcript: snapshot.transcript.map(core_transcript),
        media: snapshot.media.map(core_media),
    }
}

fn core_status(status: RemoteStatus) -> TaskStatus {
    match status {
        RemoteStatus::Pending => TaskStatus::Pending,
        RemoteStatus::Running => TaskStatus::Running,
        RemoteStatus::Success => TaskStatus::Succeeded,
        RemoteStatus::Failed => TaskStatus::Failed,
    }
}

fn core_transcript(payload: TranscriptPayload) -> Transcript {
    Transcript {
        full_text: payload.full_text,
        language: payload.language,
        segments: payload
            .segments
            .into_iter()
            .map(|segment| Segment {
                start: segment.start,
                end: segment.end,
                text: segment.text,
            })
            .collect(),
    }
}

fn core_media(payload: MediaPayload) -> MediaMeta {
    MediaMeta {
        cover_url: payload.cover_url,
        duration: payload.duration,
        file_path: payload.file_path,
        platform: parse_platform(&payload.platform),
        title: payload.title,
        video_id: payload.video_id,
        raw_info: payload.raw_info,
    }
}

fn parse_platform(tag: &str) -> Platform {
    match tag {
        "youtube" => Platform::Youtube,
        "local" => Platform::Local,
        _ => Platform::Bilibili,
    }
}

fn core_platform(platform: clipnote_engine::SourcePlatform) -> Platform {
    match platform {
        clipnote_engine::SourcePlatform::Bilibili => Platform::Bilibili,
        clipnote_engine::SourcePlatform::Youtube => Platform::Youtube,
        clipnote_engine::SourcePlatform::Local => Platform::Local,
    }
}

fn engine_platform(platform: Platform) -> clipnote_engine::SourcePlatform {
    match platform {
        Platform::Bilibili => clipnote_engine::SourcePlatform::Bilibili,
        Platform::Youtube => clipnote_engine::SourcePlatform::Youtube,
        Platform::Local => clipnote_engine::SourcePlatform::Local,
    }
}

fn engine_quality(quality: Quality) -> clipnote_engine::Quality {
    match quality {
        Quality::Fast => clipnote_engine::Quality::Fast,
        Quality::Medium => clipnote_engine::Quality::Medium,
        Quality::Slow => clipnote_engine::Quality::Slow,
    }
}

fn engine_options(options: NoteOptions) -> clipnote_engine::NoteOptions {
    clipnote_engine::NoteOptions {
        screenshot: options.screenshot,
        link: options.link,
    }
}

fn upload_spec(file: PendingFile) -> UploadSpec {
    UploadSpec {
        path: file.path,
        file_name: file.name,
        content_type: file.content_type,
    }
}
