use std::sync::{mpsc, Arc, Mutex};
use std::thread;

use crate::api::{ApiSettings, HttpBackend, NoteBackend};
use crate::submit::{self, ChannelEventSink, EventSink};
use crate::{ApiError, EngineEvent, NoteOptions, Quality, SourcePlatform, UploadSpec};

enum EngineCommand {
    SubmitUrl {
        video_url: String,
        platform: SourcePlatform,
        quality: Quality,
        options: NoteOptions,
    },
    SubmitFiles {
        files: Vec<UploadSpec>,
        quality: Quality,
        options: NoteOptions,
    },
    FetchStatus {
        task_id: String,
    },
    DeleteTask {
        video_id: String,
        platform: SourcePlatform,
    },
}

/// Handle to the IO thread. Commands go in over a channel; settled
/// outcomes come back as [`EngineEvent`]s polled with `try_recv`. Clones
/// share the same command queue and event stream.
#[derive(Clone)]
pub struct EngineHandle {
    cmd_tx: mpsc::Sender<EngineCommand>,
    event_rx: Arc<Mutex<mpsc::Receiver<EngineEvent>>>,
}

impl EngineHandle {
    pub fn new(settings: ApiSettings) -> Result<Self, ApiError> {
        let backend = Arc::new(HttpBackend::new(&settings)?);
        let (cmd_tx, cmd_rx) = mpsc::channel();
        let (event_tx, event_rx) = mpsc::channel();

        thread::spawn(move || {
            let runtime = tokio::runtime::Runtime::new().expect("tokio runtime");
            while let Ok(command) = cmd_rx.recv() {
                let backend = backend.clone();
                let event_tx = event_tx.clone();
                runtime.spawn(async move {
                    handle_command(backend.as_ref(), command, event_tx).await;
                });
            }
        });

        Ok(Self {
            cmd_tx,
            event_rx: Arc::new(Mutex::new(event_rx)),
        })
    }

    pub fn submit_url(
        &self,
        video_url: impl Into<String>,
        platform: SourcePlatform,
        quality: Quality,
        options: NoteOptions,
    ) {
        let _ = self.cmd_tx.send(EngineCommand::SubmitUrl {
            video_url: video_url.into(),
            platform,
            quality,
            options,
        });
    }

    pub fn submit_files(&self, files: Vec<UploadSpec>, quality: Quality, options: NoteOptions) {
        let _ = self.cmd_tx.send(EngineCommand::SubmitFiles {
            files,
            quality,
            options,
        });
    }

    pub fn fetch_status(&self, task_id: impl Into<String>) {
        let _ = self.cmd_tx.send(EngineCommand::FetchStatus {
            task_id: task_id.into(),
        });
    }

    pub fn delete_task(&self, video_id: impl Into<String>, platform: SourcePlatform) {
        let _ = self.cmd_tx.send(EngineCommand::DeleteTask {
            video_id: video_id.into(),
            platform,
        });
    }

    pub fn try_recv(&self) -> Option<EngineEvent> {
        self.event_rx.lock().ok()?.try_recv().ok()
    }
}

async fn handle_command(
    backend: &dyn NoteBackend,
    command: EngineCommand,
    event_tx: mpsc::Sender<EngineEvent>,
) {
    let sink = ChannelEventSink::new(event_tx);
    match command {
        EngineCommand::SubmitUrl {
            video_url,
            platform,
            quality,
            options,
        } => {
            submit::submit_link(backend, &video_url, platform, quality, options, &sink).await;
        }
        EngineCommand::SubmitFiles {
            files,
            quality,
            options,
        } => {
            submit::submit_batch(backend, files, quality, options, &sink).await;
        }
        EngineCommand::FetchStatus { task_id } => {
            let result = backend.task_status(&task_id).await;
            sink.emit(EngineEvent::StatusSettled { task_id, result });
        }
        EngineCommand::DeleteTask { video_id, platform } => {
            let result = backend.delete_task(&video_id, platform).await;
            sink.emit(EngineEvent::DeleteSettled { video_id, result });
        }
    }
}
