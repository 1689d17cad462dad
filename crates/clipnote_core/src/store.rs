use crate::{Platform, Task, TaskId, TaskPatch};

/// Single source of truth for all known tasks and the current selection.
///
/// Tasks are kept most-recent-first: registration always inserts at the
/// head. The store is an owned value; every mutation funnels through the
/// methods below so logically-concurrent callers (submission, polling,
/// deletion) stay consistent without external locking.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TaskStore {
    tasks: Vec<Task>,
    current_task_id: Option<TaskId>,
}

impl TaskStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a new pending task at the head of the collection.
    ///
    /// Ids come from fresh backend acknowledgements and are unique by
    /// construction; a duplicate id is ignored rather than doubled.
    pub fn register_pending(
        &mut self,
        task_id: TaskId,
        platform: Platform,
        file_name: Option<&str>,
        created_at: &str,
    ) {
        if self.get(&task_id).is_some() {
            return;
        }
        self.tasks
            .insert(0, Task::pending(task_id, platform, file_name, created_at));
    }

    /// Merges `patch` into the task matching `task_id`.
    ///
    /// Unknown ids are a no-op: reconciliation may race with deletion. A
    /// status that would regress a terminal task to a non-terminal one is
    /// dropped while the rest of the patch still applies.
    ///
    /// Returns whether anything changed.
    pub fn apply_patch(&mut self, task_id: &str, patch: TaskPatch) -> bool {
        let Some(task) = self.tasks.iter_mut().find(|t| t.id == task_id) else {
            return false;
        };
        let mut changed = false;
        if let Some(status) = patch.status {
            let regresses = task.status.is_terminal() && !status.is_terminal();
            if !regresses && task.status != status {
                task.status = status;
                changed = true;
            }
        }
        if let Some(markdown) = patch.markdown {
            if task.markdown != markdown {
                task.markdown = markdown;
                changed = true;
            }
        }
        if let Some(transcript) = patch.transcript {
            if task.transcript != transcript {
                task.transcript = transcript;
                changed = true;
            }
        }
        if let Some(media) = patch.media {
            if task.media != media {
                task.media = media;
                changed = true;
            }
        }
        changed
    }

    /// Removes the task and returns it so the caller can mirror the
    /// deletion remotely. Removing an unknown id is a no-op. Clears the
    /// selection when it pointed at the removed task.
    pub fn remove(&mut self, task_id: &str) -> Option<Task> {
        let index = self.tasks.iter().position(|t| t.id == task_id)?;
        let task = self.tasks.remove(index);
        if self.current_task_id.as_deref() == Some(task_id) {
            self.current_task_id = None;
        }
        Some(task)
    }

    /// Drops every task and the selection.
    pub fn clear(&mut self) {
        self.tasks.clear();
        self.current_task_id = None;
    }

    /// Sets the selection pointer. The id is not validated: selecting an
    /// unknown id is legal and simply reads back as no selected task.
    pub fn select(&mut self, task_id: Option<TaskId>) {
        self.current_task_id = task_id;
    }

    pub fn selected(&self) -> Option<&Task> {
        let id = self.current_task_id.as_deref()?;
        self.get(id)
    }

    pub fn selected_id(&self) -> Option<&str> {
        self.current_task_id.as_deref()
    }

    pub fn get(&self, task_id: &str) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == task_id)
    }

    /// All tasks, most recently registered first.
    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Replaces the whole store with a persisted snapshot.
    pub fn restore(&mut self, tasks: Vec<Task>, current_task_id: Option<TaskId>) {
        self.tasks = tasks;
        self.current_task_id = current_task_id;
    }
}
