use url::Url;

use crate::state::ALLOWED_UPLOAD_TYPES;
use crate::{AppState, Effect, FormError, FormField, Msg, NoteOptions, Notice, Platform, Quality};

/// Pure update function: applies a message to state and returns any effects.
pub fn update(mut state: AppState, msg: Msg) -> (AppState, Vec<Effect>) {
    let effects = match msg {
        Msg::InputChanged(text) => {
            state.url_input = text;
            state.form_error = None;
            Vec::new()
        }
        Msg::PlatformSelected(platform) => {
            state.platform = platform;
            state.form_error = None;
            Vec::new()
        }
        Msg::FilesChosen(files) => {
            // Picking files switches the form to local mode and clears the
            // link input, mirroring the submission modes being exclusive.
            state.selected_files = files;
            state.url_input.clear();
            state.platform = Platform::Local;
            state.form_error = None;
            Vec::new()
        }
        Msg::FileSelectionCleared => {
            state.selected_files.clear();
            state.platform = Platform::default();
            Vec::new()
        }
        Msg::SubmitRequested { quality, options } => {
            state.form_error = None;
            if !state.selected_files.is_empty() {
                submit_files(&mut state, quality, options)
            } else {
                submit_url(&mut state, quality, options)
            }
        }
        Msg::UrlAccepted {
            task_id,
            platform,
            created_at,
        } => {
            state
                .store
                .register_pending(task_id, platform, None, &created_at);
            state.url_input.clear();
            state.mark_dirty();
            vec![Effect::Notify(Notice::NoteJobSubmitted)]
        }
        Msg::UrlFailed { message } => {
            // The input is kept so the user can retry by hand.
            vec![Effect::Notify(Notice::SubmitFailed { message })]
        }
        Msg::UploadAccepted {
            task_id,
            file_name,
            created_at,
        } => {
            state
                .store
                .register_pending(task_id, Platform::Local, Some(&file_name), &created_at);
            state.mark_dirty();
            Vec::new()
        }
        Msg::UploadFailed { file_name, .. } => {
            state.last_batch_failures.push(file_name);
            Vec::new()
        }
        Msg::BatchSettled { accepted, failed } => {
            let notice = if failed == 0 {
                state.selected_files.clear();
                state.platform = Platform::default();
                Notice::UploadBatchCompleted { accepted }
            } else {
                // Selection is kept so the user can see what failed and
                // resubmit by hand; nothing is retried automatically.
                Notice::UploadBatchPartialFailure { accepted, failed }
            };
            vec![Effect::Notify(notice)]
        }
        Msg::StatusArrived { task_id, patch } => {
            if state.store.apply_patch(&task_id, patch) {
                state.mark_dirty();
            }
            Vec::new()
        }
        Msg::TaskSelected(task_id) => {
            state.store.select(task_id);
            state.mark_dirty();
            Vec::new()
        }
        Msg::DeleteRequested(task_id) => match state.store.remove(&task_id) {
            Some(task) => {
                state.mark_dirty();
                // Local tasks are identified to the backend by their own
                // task id; remote ones by the resolved video identifier.
                let video_id = if task.platform.is_local() {
                    task.id
                } else {
                    task.media.video_id
                };
                vec![Effect::DeleteRemote {
                    video_id,
                    platform: task.platform,
                }]
            }
            None => Vec::new(),
        },
        Msg::DeleteSettled { error } => match error {
            None => vec![Effect::Notify(Notice::TaskDeleted)],
            Some(message) => vec![Effect::Notify(Notice::DeleteFailed { message })],
        },
        Msg::ClearAllRequested => {
            if !state.store.is_empty() || state.store.selected_id().is_some() {
                state.store.clear();
                state.mark_dirty();
            }
            Vec::new()
        }
        Msg::PollTick => state
            .store
            .tasks()
            .iter()
            .filter(|task| !task.status.is_terminal())
            .map(|task| Effect::FetchStatus {
                task_id: task.id.clone(),
            })
            .collect(),
        Msg::SnapshotRestored {
            tasks,
            current_task_id,
        } => {
            state.store.restore(tasks, current_task_id);
            Vec::new()
        }
        Msg::NoOp => Vec::new(),
    };

    (state, effects)
}

/// Batch path: reject unsupported declared content types individually and
/// fan the remaining files out as one settle-all submission.
fn submit_files(
    state: &mut AppState,
    quality: Quality,
    options: NoteOptions,
) -> Vec<Effect> {
    let files = std::mem::take(&mut state.selected_files);
    let (valid, invalid): (Vec<_>, Vec<_>) = files
        .into_iter()
        .partition(|file| ALLOWED_UPLOAD_TYPES.contains(&file.content_type.as_str()));

    let mut effects: Vec<Effect> = invalid
        .into_iter()
        .map(|file| Effect::Notify(Notice::UnsupportedFile { name: file.name }))
        .collect();

    state.last_batch_failures.clear();
    state.selected_files = valid.clone();
    if !valid.is_empty() {
        effects.push(Effect::SubmitFiles {
            files: valid,
            quality,
            options,
        });
    }
    effects
}

/// Single-link path: all validation happens here, before any network call.
fn submit_url(
    state: &mut AppState,
    quality: Quality,
    options: NoteOptions,
) -> Vec<Effect> {
    let url = state.url_input.trim().to_string();
    if url.is_empty() {
        return reject(
            state,
            FormField::VideoUrl,
            "Enter a video link or choose a file.",
        );
    }
    if state.platform.is_local() {
        return reject(
            state,
            FormField::Platform,
            "Pick Bilibili or YouTube to submit a video link.",
        );
    }
    if Url::parse(&url).is_err() {
        return reject(state, FormField::VideoUrl, "Enter a valid video link.");
    }
    vec![Effect::SubmitUrl {
        url,
        platform: state.platform,
        quality,
        options,
    }]
}

fn reject(state: &mut AppState, field: FormField, message: &str) -> Vec<Effect> {
    state.form_error = Some(FormError::new(field, message));
    vec![Effect::Notify(Notice::InvalidInput {
        message: message.to_string(),
    })]
}
