use std::fs;
use std::path::Path;

use clipnote_core::{MediaMeta, Platform, Segment, Task, TaskId, TaskStatus, Transcript};
use clipnote_engine::AtomicFileWriter;
use note_logging::{note_error, note_info, note_warn};
use serde::{Deserialize, Serialize};

pub(crate) const STATE_FILENAME: &str = ".clipnote_state.ron";

#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default)]
enum PersistedStatus {
    #[default]
    Pending,
    Running,
    Succeeded,
    Failed,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default)]
enum PersistedPlatform {
    #[default]
    Bilibili,
    Youtube,
    Local,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
struct PersistedSegment {
    #[serde(default)]
    start: f64,
    #[serde(default)]
    end: f64,
    #[serde(default)]
    text: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
struct PersistedTranscript {
    #[serde(default)]
    full_text: String,
    #[serde(default)]
    language: String,
    #[serde(default)]
    segments: Vec<PersistedSegment>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
struct PersistedMedia {
    #[serde(default)]
    cover_url: String,
    #[serde(default)]
    duration: f64,
    #[serde(default)]
    file_path: String,
    #[serde(default)]
    platform: PersistedPlatform,
    #[serde(default)]
    title: String,
    #[serde(default)]
    video_id: String,
    #[serde(default)]
    raw_info: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
struct PersistedTask {
    id: String,
    #[serde(default)]
    status: PersistedStatus,
    #[serde(default)]
    platform: PersistedPlatform,
    #[serde(default)]
    markdown: String,
    #[serde(default)]
    transcript: PersistedTranscript,
    #[serde(default)]
    media: PersistedMedia,
    #[serde(default)]
    created_at: String,
}

/// The whole registry snapshot, written and read as one unit.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
struct PersistedState {
    #[serde(default)]
    tasks: Vec<PersistedTask>,
    #[serde(default)]
    current_task_id: Option<String>,
}

/// Loads the persisted snapshot. A missing file is a fresh start; an
/// unreadable or unparsable one is logged and treated the same.
pub(crate) fn load_snapshot(state_dir: &Path) -> (Vec<Task>, Option<TaskId>) {
    let path = state_dir.join(STATE_FILENAME);
    let content = match fs::read_to_string(&path) {
        Ok(text) => text,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            return (Vec::new(), None);
        }
        Err(err) => {
            note_warn!("Failed to read persisted state from {:?}: {}", path, err);
            return (Vec::new(), None);
        }
    };

    let state: PersistedState = match ron::from_str(&content) {
        Ok(state) => state,
        Err(err) => {
            note_warn!("Failed to parse persisted state from {:?}: {}", path, err);
            return (Vec::new(), None);
        }
    };

    note_info!("Loaded {} persisted task(s) from {:?}", state.tasks.len(), path);
    let tasks = state.tasks.into_iter().map(PersistedTask::into_task).collect();
    (tasks, state.current_task_id)
}

/// Write-through save of the full registry snapshot.
pub(crate) fn save_snapshot(state_dir: &Path, tasks: &[Task], current_task_id: Option<&str>) {
    let state = PersistedState {
        tasks: tasks.iter().map(PersistedTask::from_task).collect(),
        current_task_id: current_task_id.map(str::to_string),
    };

    let pretty = ron::ser::PrettyConfig::new();
    let content = match ron::ser::to_string_pretty(&state, pretty) {
        Ok(text) => text,
        Err(err) => {
            note_error!("Failed to serialize persisted state: {}", err);
            return;
        }
    };

    let writer = AtomicFileWriter::new(state_dir.to_path_buf());
    if let Err(err) = writer.write(STATE_FILENAME, &content) {
        note_error!("Failed to write persisted state to {:?}: {}", state_dir, err);
    }
}

impl PersistedTask {
    fn from_task(task: &Task) -> Self {
        Self {
            id: task.id.clone(),
            status: match task.status {
                TaskStatus::Pending => PersistedStatus::Pending,
                TaskStatus::Running => PersistedStatus::Running,
                TaskStatus::Succeeded => PersistedStatus::Succeeded,
                TaskStatus::Failed => PersistedStatus::Failed,
            },
            platform: PersistedPlatform::from_platform(task.platform),
            markdown: task.markdown.clone(),
            transcript: PersistedTranscript {
                full_text: task.transcript.full_text.clone(),
                language: task.transcript.language.clone(),
                segments: task
                    .transcript
                    .segments
                    .iter()
                    .map(|segment| PersistedSegment {
                        start: segment.start,
                        end: segment.end,
                        text: segment.text.clone(),
                    })
                    .collect(),
            },
            media: PersistedMedia {
                cover_url: task.media.cover_url.clone(),
                duration: task.media.duration,
                file_path: task.media.file_path.clone(),
                platform: PersistedPlatform::from_platform(task.media.platform),
                title: task.media.title.clone(),
                video_id: task.media.video_id.clone(),
                raw_info: task.media.raw_info.clone(),
            },
            created_at: task.created_at.clone(),
        }
    }

    fn into_task(self) -> Task {
        Task {
            id: self.id,
            status: match self.status {
                PersistedStatus::Pending => TaskStatus::Pending,
                PersistedStatus::Running => TaskStatus::Running,
                PersistedStatus::Succeeded => TaskStatus::Succeeded,
                PersistedStatus::Failed => TaskStatus::Failed,
            },
            platform: self.platform.into_platform(),
            markdown: self.markdown,
            transcript: Transcript {
                full_text: self.transcript.full_text,
                language: self.transcript.language,
                segments: self
                    .transcript
                    .segments
                    .into_iter()
                    .map(|segment| Segment {
                        start: segment.start,
                        end: segment.end,
                        text: segment.text,
                    })
                    .collect(),
            },
            media: MediaMeta {
                cover_url: self.media.cover_url,
                duration: self.media.duration,
                file_path: self.media.file_path,
                platform: self.media.platform.into_platform(),
                title: self.media.title,
                video_id: self.media.video_id,
                raw_info: self.media.raw_info,
            },
            created_at: self.created_at,
        }
    }
}

impl PersistedPlatform {
    fn from_platform(platform: Platform) -> Self {
        match platform {
            Platform::Bilibili => PersistedPlatform::Bilibili,
            Platform::Youtube => PersistedPlatform::Youtube,
            Platform::Local => PersistedPlatform::Local,
        }
    }

    fn into_platform(self) -> Platform {
        match self {
            PersistedPlatform::Bilibili => Platform::Bilibili,
            PersistedPlatform::Youtube => Platform::Youtube,
            PersistedPlatform::Local => Platform::Local,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clipnote_core::PLACEHOLDER_TITLE;
    use tempfile::TempDir;

    fn sample_tasks() -> Vec<Task> {
        let mut done = Task::pending(
            "t1".to_string(),
            Platform::Youtube,
            None,
            "2026-08-08T09:00:00Z",
        );
        done.status = TaskStatus::Succeeded;
        done.markdown = "# Notes".to_string();
        done.transcript = Transcript {
            full_text: "hello world".to_string(),
            language: "en".to_string(),
            segments: vec![Segment {
                start: 0.0,
                end: 2.5,
                text: "hello world".to_string(),
            }],
        };
        done.media.title = "A talk".to_string();
        done.media.video_id = "yt-abc".to_string();
        done.media.raw_info = Some(r#"{"uploader":"someone"}"#.to_string());

        let local = Task::pending(
            "t2".to_string(),
            Platform::Local,
            Some("lecture.mp4"),
            "2026-08-08T09:05:00Z",
        );
        vec![local, done]
    }

    #[test]
    fn snapshot_round_trips_tasks_and_selection() {
        let temp = TempDir::new().unwrap();
        let tasks = sample_tasks();

        save_snapshot(temp.path(), &tasks, Some("t2"));
        let (loaded, current) = load_snapshot(temp.path());

        assert_eq!(loaded, tasks);
        assert_eq!(current.as_deref(), Some("t2"));
    }

    #[test]
    fn missing_snapshot_is_a_fresh_start() {
        let temp = TempDir::new().unwrap();
        let (loaded, current) = load_snapshot(temp.path());
        assert!(loaded.is_empty());
        assert!(current.is_none());
    }

    #[test]
    fn corrupt_snapshot_is_a_fresh_start() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join(STATE_FILENAME), "(not valid ron").unwrap();
        let (loaded, current) = load_snapshot(temp.path());
        assert!(loaded.is_empty());
        assert!(current.is_none());
    }

    #[test]
    fn placeholder_title_survives_the_round_trip() {
        let temp = TempDir::new().unwrap();
        let tasks = vec![Task::pending(
            "t3".to_string(),
            Platform::Bilibili,
            None,
            "2026-08-08T10:00:00Z",
        )];
        save_snapshot(temp.path(), &tasks, None);
        let (loaded, _) = load_snapshot(temp.path());
        assert_eq!(loaded[0].media.title, PLACEHOLDER_TITLE);
    }
}
