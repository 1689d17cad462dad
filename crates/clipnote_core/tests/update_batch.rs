use std::path::PathBuf;
use std::sync::Once;

use clipnote_core::{
    update, AppState, Effect, Msg, NoteOptions, Notice, PendingFile, Platform, Quality,
};

fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(note_logging::initialize_for_tests);
}

fn file(name: &str, content_type: &str) -> PendingFile {
    PendingFile {
        path: PathBuf::from(format!("/tmp/{name}")),
        name: name.to_string(),
        content_type: content_type.to_string(),
    }
}

fn choose_and_submit(files: Vec<PendingFile>) -> (AppState, Vec<Effect>) {
    let (state, _) = update(AppState::new(), Msg::FilesChosen(files));
    update(
        state,
        Msg::SubmitRequested {
            quality: Quality::Medium,
            options: NoteOptions::default(),
        },
    )
}

#[test]
fn choosing_files_switches_to_local_mode() {
    init_logging();
    let (state, _) = update(AppState::new(), Msg::InputChanged("https://x.example".into()));
    let (state, effects) = update(
        state,
        Msg::FilesChosen(vec![file("notes.txt", "text/plain")]),
    );

    assert!(effects.is_empty());
    let view = state.view();
    assert_eq!(view.platform, Platform::Local);
    assert!(view.url_input.is_empty());
    assert_eq!(view.selected_files, vec!["notes.txt".to_string()]);
}

#[test]
fn clearing_selection_restores_default_platform() {
    init_logging();
    let (state, _) = update(
        AppState::new(),
        Msg::FilesChosen(vec![file("a.mp3", "audio/mpeg")]),
    );
    let (state, _) = update(state, Msg::FileSelectionCleared);

    let view = state.view();
    assert_eq!(view.platform, Platform::Bilibili);
    assert!(view.selected_files.is_empty());
}

#[test]
fn invalid_types_are_rejected_individually_and_excluded() {
    init_logging();
    let (state, effects) = choose_and_submit(vec![
        file("a.mp4", "video/mp4"),
        file("b.exe", "application/octet-stream"),
        file("c.txt", "text/plain"),
    ]);

    assert_eq!(
        effects,
        vec![
            Effect::Notify(Notice::UnsupportedFile {
                name: "b.exe".to_string(),
            }),
            Effect::SubmitFiles {
                files: vec![file("a.mp4", "video/mp4"), file("c.txt", "text/plain")],
                quality: Quality::Medium,
                options: NoteOptions::default(),
            },
        ]
    );
    // The rejected file also leaves the selection.
    assert_eq!(
        state.view().selected_files,
        vec!["a.mp4".to_string(), "c.txt".to_string()]
    );
}

#[test]
fn all_invalid_selection_produces_no_submission() {
    init_logging();
    let (state, effects) = choose_and_submit(vec![file("b.exe", "application/octet-stream")]);

    assert_eq!(
        effects,
        vec![Effect::Notify(Notice::UnsupportedFile {
            name: "b.exe".to_string(),
        })]
    );
    assert_eq!(state.store().len(), 0);
    assert!(state.view().selected_files.is_empty());
}

#[test]
fn each_accepted_upload_registers_a_local_task() {
    init_logging();
    let (state, _) = choose_and_submit(vec![
        file("a.mp4", "video/mp4"),
        file("c.txt", "text/plain"),
    ]);

    let (state, _) = update(
        state,
        Msg::UploadAccepted {
            task_id: "t-a".to_string(),
            file_name: "a.mp4".to_string(),
            created_at: "2026-08-08T10:00:00Z".to_string(),
        },
    );
    let (state, _) = update(
        state,
        Msg::UploadAccepted {
            task_id: "t-c".to_string(),
            file_name: "c.txt".to_string(),
            created_at: "2026-08-08T10:00:01Z".to_string(),
        },
    );

    let view = state.view();
    assert_eq!(view.task_count, 2);
    // Most recent registration first.
    assert_eq!(view.tasks[0].title, "c.txt");
    assert_eq!(view.tasks[1].title, "a.mp4");
    assert!(view.tasks.iter().all(|t| t.platform == Platform::Local));
}

#[test]
fn full_success_clears_selection_despite_type_rejections() {
    init_logging();
    // A valid, B invalid type, C valid: B's rejection does not make the
    // aggregate a partial failure when A and C both succeed.
    let (state, _) = choose_and_submit(vec![
        file("a.mp4", "video/mp4"),
        file("b.exe", "application/octet-stream"),
        file("c.txt", "text/plain"),
    ]);
    let (state, _) = update(
        state,
        Msg::UploadAccepted {
            task_id: "t-a".to_string(),
            file_name: "a.mp4".to_string(),
            created_at: "2026-08-08T10:00:00Z".to_string(),
        },
    );
    let (state, _) = update(
        state,
        Msg::UploadAccepted {
            task_id: "t-c".to_string(),
            file_name: "c.txt".to_string(),
            created_at: "2026-08-08T10:00:01Z".to_string(),
        },
    );
    let (state, effects) = update(
        state,
        Msg::BatchSettled {
            accepted: 2,
            failed: 0,
        },
    );

    assert_eq!(
        effects,
        vec![Effect::Notify(Notice::UploadBatchCompleted { accepted: 2 })]
    );
    assert_eq!(state.store().len(), 2);
    let view = state.view();
    assert!(view.selected_files.is_empty());
    assert_eq!(view.platform, Platform::Bilibili);
}

#[test]
fn partial_failure_keeps_selection_and_names_the_failures() {
    init_logging();
    let (state, _) = choose_and_submit(vec![
        file("a.mp4", "video/mp4"),
        file("c.txt", "text/plain"),
    ]);
    let (state, _) = update(
        state,
        Msg::UploadAccepted {
            task_id: "t-a".to_string(),
            file_name: "a.mp4".to_string(),
            created_at: "2026-08-08T10:00:00Z".to_string(),
        },
    );
    let (state, _) = update(
        state,
        Msg::UploadFailed {
            file_name: "c.txt".to_string(),
            message: "disk full".to_string(),
        },
    );
    let (state, effects) = update(
        state,
        Msg::BatchSettled {
            accepted: 1,
            failed: 1,
        },
    );

    assert_eq!(
        effects,
        vec![Effect::Notify(Notice::UploadBatchPartialFailure {
            accepted: 1,
            failed: 1,
        })]
    );
    // One task registered for the success; the failure is visible.
    assert_eq!(state.store().len(), 1);
    let view = state.view();
    assert_eq!(view.last_batch_failures, vec!["c.txt".to_string()]);
    assert_eq!(view.selected_files, vec!["a.mp4".to_string(), "c.txt".to_string()]);
}

#[test]
fn new_submission_resets_previous_batch_failures() {
    init_logging();
    let (state, _) = choose_and_submit(vec![file("c.txt", "text/plain")]);
    let (state, _) = update(
        state,
        Msg::UploadFailed {
            file_name: "c.txt".to_string(),
            message: "boom".to_string(),
        },
    );
    let (state, _) = update(state, Msg::FilesChosen(vec![file("d.txt", "text/plain")]));
    let (state, _) = update(
        state,
        Msg::SubmitRequested {
            quality: Quality::Slow,
            options: NoteOptions::default(),
        },
    );
    assert!(state.view().last_batch_failures.is_empty());
}
