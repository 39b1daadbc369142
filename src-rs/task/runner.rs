use std::sync::Arc;
use std::time::Duration;

use tracing::{info, warn};

use super::store::TaskStore;
use super::types::{Task, Transition};
use crate::eval::{self, EvalError, Evaluation};

pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Runs expression evaluations out-of-band, recording their progress in the
/// shared store.
#[derive(Clone)]
pub struct ExecutionRunner {
    store: Arc<TaskStore<String>>,
    default_timeout: Duration,
}

impl ExecutionRunner {
    pub fn new(store: Arc<TaskStore<String>>) -> Self {
        Self {
            store,
            default_timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }

    pub fn store(&self) -> &Arc<TaskStore<String>> {
        &self.store
    }

    /// Registers a task and schedules its evaluation. Must be called from
    /// within a tokio runtime.
    pub fn submit(&self, code: String, timeout_secs: Option<u64>) -> Task<String> {
        let task = self.store.create();
        let timeout = timeout_secs
            .filter(|secs| *secs > 0)
            .map(Duration::from_secs)
            .unwrap_or(self.default_timeout);
        info!(task_id = %task.id, timeout_secs = timeout.as_secs(), "execution task submitted");

        let store = self.store.clone();
        let id = task.id.clone();
        tokio::spawn(async move {
            run_task(store, id, timeout, move || eval::strategy::run(&code)).await;
        });
        task
    }
}

async fn run_task<F>(store: Arc<TaskStore<String>>, id: String, timeout: Duration, job: F)
where
    F: FnOnce() -> Result<Evaluation, EvalError> + Send + 'static,
{
    if let Err(err) = store.update(&id, Transition::Start) {
        warn!(task_id = %id, error = %err, "could not start execution task");
        return;
    }

    // The blocking worker keeps running after a timeout; its result is dropped.
    let worker = tokio::task::spawn_blocking(job);
    let transition = match tokio::time::timeout(timeout, worker).await {
        Ok(Ok(Ok(evaluation))) => {
            info!(task_id = %id, strategy = %evaluation.strategy, "execution task completed");
            Transition::Complete(evaluation.output)
        }
        Ok(Ok(Err(err))) => Transition::Fail(err.to_string()),
        Ok(Err(join_err)) => Transition::Fail(format!("evaluation worker failed: {}", join_err)),
        Err(_) => Transition::Fail(format!("evaluation timed out after {:?}", timeout)),
    };

    if let Transition::Fail(reason) = &transition {
        warn!(task_id = %id, error = %reason, "execution task failed");
    }
    if let Err(err) = store.update(&id, transition) {
        warn!(task_id = %id, error = %err, "could not record execution result");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::task::TaskStatus;

    async fn wait_terminal(store: &TaskStore<String>, id: &str) -> Task<String> {
        for _ in 0..200 {
            let task = store.get(id).unwrap();
            if task.status.is_terminal() {
                return task;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        panic!("task {} never finished", id);
    }

    #[tokio::test]
    async fn submitted_task_completes_with_result() {
        let runner = ExecutionRunner::new(Arc::new(TaskStore::new()));
        let task = runner.submit("2+3*4".to_string(), Some(5));
        assert_eq!(task.status, TaskStatus::Submitted);

        let done = wait_terminal(runner.store(), &task.id).await;
        assert_eq!(done.status, TaskStatus::Completed);
        assert_eq!(done.result.as_deref(), Some("14"));
        assert!(done.error.is_none());
    }

    #[tokio::test]
    async fn rejected_code_fails_the_task() {
        let runner = ExecutionRunner::new(Arc::new(TaskStore::new()));
        let task = runner.submit("__import__('os')".to_string(), None);

        let done = wait_terminal(runner.store(), &task.id).await;
        assert_eq!(done.status, TaskStatus::Failed);
        assert!(done.result.is_none());
        assert!(done.error.unwrap().contains("forbidden"));
    }

    #[tokio::test]
    async fn deeply_nested_code_fails_the_task() {
        let runner = ExecutionRunner::new(Arc::new(TaskStore::new()));
        let code = format!("{}1{}", "(".repeat(20_000), ")".repeat(20_000));
        let task = runner.submit(code, Some(5));

        let done = wait_terminal(runner.store(), &task.id).await;
        assert_eq!(done.status, TaskStatus::Failed);
        assert!(done.result.is_none());
    }

    #[tokio::test]
    async fn slow_evaluation_times_out() {
        let store = Arc::new(TaskStore::new());
        let task = store.create();
        run_task(store.clone(), task.id.clone(), Duration::from_millis(20), || {
            std::thread::sleep(Duration::from_millis(300));
            eval::strategy::run("1 + 1")
        })
        .await;

        let done = store.get(&task.id).unwrap();
        assert_eq!(done.status, TaskStatus::Failed);
        assert!(done.result.is_none());
        assert_eq!(done.error.as_deref(), Some("evaluation timed out after 20ms"));
    }
}
