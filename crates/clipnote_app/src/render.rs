use clipnote_core::{AppViewModel, Notice, Task};

/// One line per history row, most recent first.
pub(crate) fn history_lines(view: &AppViewModel) -> Vec<String> {
    if view.tasks.is_empty() {
        return vec!["history is empty".to_string()];
    }
    view.tasks
        .iter()
        .map(|row| {
            let marker = if view.selected_task_id.as_deref() == Some(row.task_id.as_str()) {
                '*'
            } else {
                ' '
            };
            format!(
                "{marker} {id:<12} {status:<9} {platform:<8} {title}",
                id = row.task_id,
                status = row.status.to_string(),
                platform = row.platform.to_string(),
                title = row.title,
            )
        })
        .collect()
}

pub(crate) fn notice_line(notice: &Notice) -> String {
    format!("[clipnote] {notice}")
}

/// The selected task's note, or a hint when there is nothing to show.
pub(crate) fn selected_note(task: Option<&Task>) -> String {
    match task {
        None => "no task selected".to_string(),
        Some(task) if task.markdown.is_empty() => {
            format!("task {} has no note yet (status: {})", task.id, task.status)
        }
        Some(task) => task.markdown.clone(),
    }
}
