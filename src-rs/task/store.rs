use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

use chrono::Utc;
use uuid::Uuid;

use super::types::{Task, TaskError, TaskStatus, TaskSummary, Transition};

struct Entries<R> {
    tasks: HashMap<String, Task<R>>,
    order: Vec<String>,
}

/// In-memory task registry. Records live for the lifetime of the process.
pub struct TaskStore<R> {
    entries: RwLock<Entries<R>>,
}

impl<R: Clone> Default for TaskStore<R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: Clone> TaskStore<R> {
    pub fn new() -> Self {
        Self {
            entries: RwLock::new(Entries {
                tasks: HashMap::new(),
                order: Vec::new(),
            }),
        }
    }

    pub fn create(&self) -> Task<R> {
        let id = Uuid::new_v4().to_string();
        let task = Task {
            id: id.clone(),
            status: TaskStatus::Submitted,
            result: None,
            error: None,
            submitted_at: Utc::now(),
            started_at: None,
            completed_at: None,
        };
        let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);
        entries.tasks.insert(id.clone(), task.clone());
        entries.order.push(id);
        task
    }

    pub fn get(&self, id: &str) -> Result<Task<R>, TaskError> {
        let entries = self.entries.read().unwrap_or_else(PoisonError::into_inner);
        entries
            .tasks
            .get(id)
            .cloned()
            .ok_or_else(|| TaskError::NotFound(id.to_string()))
    }

    /// Applies `transition` under the write lock so readers never observe a
    /// half-updated record. Moves out of a terminal state are rejected.
    pub fn update(&self, id: &str, transition: Transition<R>) -> Result<Task<R>, TaskError> {
        let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);
        let task = entries
            .tasks
            .get_mut(id)
            .ok_or_else(|| TaskError::NotFound(id.to_string()))?;

        let target = transition.target();
        let allowed = match (task.status, target) {
            (TaskStatus::Submitted, TaskStatus::Running) => true,
            (TaskStatus::Submitted | TaskStatus::Running, TaskStatus::Completed | TaskStatus::Failed) => true,
            _ => false,
        };
        if !allowed {
            return Err(TaskError::InvalidTransition {
                id: id.to_string(),
                from: task.status,
                to: target,
            });
        }

        let now = Utc::now();
        match transition {
            Transition::Start => {
                task.started_at = Some(now);
            }
            Transition::Complete(result) => {
                task.started_at.get_or_insert(now);
                task.result = Some(result);
                task.completed_at = Some(now);
            }
            Transition::Fail(error) => {
                task.started_at.get_or_insert(now);
                task.error = Some(error);
                task.completed_at = Some(now);
            }
        }
        task.status = target;
        Ok(task.clone())
    }

    /// The most recent `limit` tasks, oldest first.
    pub fn list(&self, limit: usize) -> Vec<Task<R>> {
        let entries = self.entries.read().unwrap_or_else(PoisonError::into_inner);
        let skip = entries.order.len().saturating_sub(limit);
        entries.order[skip..]
            .iter()
            .filter_map(|id| entries.tasks.get(id).cloned())
            .collect()
    }

    pub fn summaries(&self, limit: usize) -> Vec<TaskSummary> {
        self.list(limit).iter().map(Task::summary).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn created_task_is_submitted() {
        let store: TaskStore<String> = TaskStore::new();
        let task = store.create();
        let fetched = store.get(&task.id).unwrap();
        assert_eq!(fetched.status, TaskStatus::Submitted);
        assert!(fetched.result.is_none());
        assert!(fetched.error.is_none());
        assert!(fetched.started_at.is_none());
    }

    #[test]
    fn unknown_id_is_not_found() {
        let store: TaskStore<String> = TaskStore::new();
        assert_eq!(
            store.get("missing").unwrap_err(),
            TaskError::NotFound("missing".to_string())
        );
        assert!(store.update("missing", Transition::Start).is_err());
    }

    #[test]
    fn lifecycle_sets_timestamps_in_order() {
        let store: TaskStore<String> = TaskStore::new();
        let id = store.create().id;
        store.update(&id, Transition::Start).unwrap();
        let done = store.update(&id, Transition::Complete("14".to_string())).unwrap();

        assert_eq!(done.status, TaskStatus::Completed);
        assert_eq!(done.result.as_deref(), Some("14"));
        assert!(done.error.is_none());
        let started = done.started_at.unwrap();
        let completed = done.completed_at.unwrap();
        assert!(done.submitted_at <= started);
        assert!(started <= completed);
    }

    #[test]
    fn terminal_tasks_reject_further_transitions() {
        let store: TaskStore<String> = TaskStore::new();
        let id = store.create().id;
        store.update(&id, Transition::Start).unwrap();
        store.update(&id, Transition::Fail("boom".to_string())).unwrap();

        let err = store.update(&id, Transition::Complete("late".to_string())).unwrap_err();
        assert!(matches!(err, TaskError::InvalidTransition { .. }));
        let task = store.get(&id).unwrap();
        assert_eq!(task.status, TaskStatus::Failed);
        assert!(task.result.is_none());
        assert_eq!(task.error.as_deref(), Some("boom"));
    }

    #[test]
    fn running_cannot_restart() {
        let store: TaskStore<String> = TaskStore::new();
        let id = store.create().id;
        store.update(&id, Transition::Start).unwrap();
        assert!(store.update(&id, Transition::Start).is_err());
    }

    #[test]
    fn list_returns_most_recent_in_submission_order() {
        let store: TaskStore<String> = TaskStore::new();
        let ids: Vec<String> = (0..5).map(|_| store.create().id).collect();

        let listed: Vec<String> = store.list(2).into_iter().map(|task| task.id).collect();
        assert_eq!(listed, vec![ids[3].clone(), ids[4].clone()]);
        assert_eq!(store.list(50).len(), 5);
        assert!(store.list(0).is_empty());
    }

    #[test]
    fn summary_flags_errors() {
        let store: TaskStore<String> = TaskStore::new();
        let id = store.create().id;
        store.update(&id, Transition::Fail("nope".to_string())).unwrap();
        let summaries = store.summaries(10);
        assert_eq!(summaries.len(), 1);
        assert!(summaries[0].has_error);
        assert_eq!(summaries[0].status, TaskStatus::Failed);
    }
}
