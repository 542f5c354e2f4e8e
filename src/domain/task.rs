//! Task board entries and aggregate counts.

use serde::{Deserialize, Serialize};

/// Lifecycle status of a task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    /// Not started.
    Pending,
    /// Being worked on.
    InProgress,
    /// Done.
    Completed,
}

/// One task on a team's task board. Tasks are keyed by `task_id`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskInfo {
    /// Task identifier.
    pub task_id: String,
    /// Short title.
    pub subject: String,
    /// Longer description.
    #[serde(default)]
    pub description: String,
    /// Current status.
    pub status: TaskStatus,
    /// Owning agent name.
    #[serde(default)]
    pub owner: String,
    /// Tasks that must finish before this one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub blocked_by: Option<Vec<String>>,
    /// Tasks waiting on this one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub blocks: Option<Vec<String>>,
    /// ISO-8601 creation time.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    /// ISO-8601 last update time.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
}

/// Partial update applied by [`crate::domain::DashboardStore::update_task`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskUpdate {
    /// New status.
    pub status: Option<TaskStatus>,
    /// New owner.
    pub owner: Option<String>,
    /// New subject.
    pub subject: Option<String>,
    /// New description.
    pub description: Option<String>,
}

impl TaskInfo {
    /// Applies the fields set in `update`.
    pub fn apply(&mut self, update: &TaskUpdate) {
        if let Some(status) = update.status {
            self.status = status;
        }
        if let Some(owner) = &update.owner {
            self.owner.clone_from(owner);
        }
        if let Some(subject) = &update.subject {
            self.subject.clone_from(subject);
        }
        if let Some(description) = &update.description {
            self.description.clone_from(description);
        }
    }
}

/// Per-status task counts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskStats {
    /// Pending tasks.
    pub pending: usize,
    /// In-progress tasks.
    pub in_progress: usize,
    /// Completed tasks.
    pub completed: usize,
    /// All tasks.
    pub total: usize,
}

impl TaskStats {
    /// Counts `tasks` by status.
    #[must_use]
    pub fn from_tasks(tasks: &[TaskInfo]) -> Self {
        tasks.iter().fold(
            Self {
                total: tasks.len(),
                ..Self::default()
            },
            |mut stats, task| {
                match task.status {
                    TaskStatus::Pending => stats.pending += 1,
                    TaskStatus::InProgress => stats.in_progress += 1,
                    TaskStatus::Completed => stats.completed += 1,
                }
                stats
            },
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn task(id: &str, status: TaskStatus) -> TaskInfo {
        TaskInfo {
            task_id: id.to_string(),
            subject: format!("task {id}"),
            description: String::new(),
            status,
            owner: "a1".to_string(),
            blocked_by: None,
            blocks: None,
            created_at: None,
            updated_at: None,
        }
    }

    #[test]
    fn stats_count_each_status() {
        let tasks = vec![
            task("1", TaskStatus::Pending),
            task("2", TaskStatus::InProgress),
            task("3", TaskStatus::InProgress),
            task("4", TaskStatus::Completed),
        ];
        let stats = TaskStats::from_tasks(&tasks);
        assert_eq!(stats.pending, 1);
        assert_eq!(stats.in_progress, 2);
        assert_eq!(stats.completed, 1);
        assert_eq!(stats.total, 4);
    }

    #[test]
    fn update_only_touches_set_fields() {
        let mut t = task("1", TaskStatus::Pending);
        t.apply(&TaskUpdate {
            status: Some(TaskStatus::Completed),
            ..TaskUpdate::default()
        });
        assert_eq!(t.status, TaskStatus::Completed);
        assert_eq!(t.owner, "a1");
        assert_eq!(t.subject, "task 1");
    }

    #[test]
    fn status_wire_names() {
        let json = serde_json::to_string(&TaskStatus::InProgress).unwrap_or_default();
        assert_eq!(json, "\"in_progress\"");
    }
}
