use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Clone, Debug)]
pub struct CLIConfig {
    pub base_url: String,
    pub language: String,
    pub detail_level: String,
    pub timeout: u64,
    pub poll_interval_ms: u64,
    pub max_polls: usize,
}

#[derive(Debug, Serialize)]
pub struct ExecuteRequest {
    pub code: String,
    pub timeout: u64,
}

#[derive(Debug, Serialize)]
pub struct Question {
    pub expression: String,
}

#[derive(Debug, Serialize)]
pub struct AnalyzeRequest {
    pub question: Question,
    pub language: String,
    pub detail_level: String,
}

#[derive(Debug, Deserialize)]
pub struct SubmitResponse {
    pub task_id: String,
    pub status: String,
}

#[derive(Debug, Deserialize)]
pub struct TaskResult {
    pub task_id: String,
    pub status: String,
    pub result: Option<String>,
    pub analysis: Option<Value>,
    pub error: Option<String>,
}

impl TaskResult {
    pub fn is_terminal(&self) -> bool {
        self.status == "completed" || self.status == "failed"
    }
}

#[derive(Debug, Deserialize)]
pub struct TaskInfo {
    pub task_id: String,
    pub status: String,
    pub submitted_at: String,
    pub completed_at: Option<String>,
    pub has_error: bool,
}
