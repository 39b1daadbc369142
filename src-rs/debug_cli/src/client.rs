use reqwest::blocking::Client;
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::models::{AnalyzeRequest, ExecuteRequest, SubmitResponse, TaskInfo, TaskResult};

pub struct HTTPClient {
    pub base_url: String,
    client: Client,
}

impl HTTPClient {
    pub fn new(base_url: &str) -> Result<Self, String> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(30))
            .build()
            .map_err(|err| err.to_string())?;
        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        })
    }

    pub fn execute(&self, req: &ExecuteRequest) -> Result<SubmitResponse, String> {
        self.post("/execute", req)
    }

    pub fn result(&self, task_id: &str) -> Result<TaskResult, String> {
        self.get(&format!("/result/{}", task_id))
    }

    pub fn analyze(&self, req: &AnalyzeRequest) -> Result<SubmitResponse, String> {
        self.post("/ai/analyze", req)
    }

    pub fn ai_result(&self, task_id: &str) -> Result<TaskResult, String> {
        self.get(&format!("/ai/result/{}", task_id))
    }

    pub fn ai_config(&self) -> Result<serde_json::Value, String> {
        self.get("/ai/config")
    }

    pub fn list_tasks(&self, path: &str, limit: usize) -> Result<Vec<TaskInfo>, String> {
        let value: serde_json::Value = self.get(&format!("{}?limit={}", path, limit))?;
        let tasks = value
            .get("tasks")
            .and_then(|v| v.as_array())
            .cloned()
            .unwrap_or_default();
        let mut out = Vec::new();
        for item in tasks {
            if let Ok(task) = serde_json::from_value::<TaskInfo>(item) {
                out.push(task);
            }
        }
        Ok(out)
    }

    fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, String> {
        let url = format!("{}{}", self.base_url, path);
        let resp = self.client.get(url).send().map_err(|err| err.to_string())?;
        decode(resp)
    }

    fn post<B: Serialize, T: DeserializeOwned>(&self, path: &str, body: &B) -> Result<T, String> {
        let url = format!("{}{}", self.base_url, path);
        let resp = self
            .client
            .post(url)
            .json(body)
            .send()
            .map_err(|err| err.to_string())?;
        decode(resp)
    }
}

fn decode<T: DeserializeOwned>(resp: reqwest::blocking::Response) -> Result<T, String> {
    if resp.status().is_success() {
        resp.json::<T>().map_err(|err| err.to_string())
    } else {
        let status = resp.status();
        let body = resp.text().unwrap_or_default();
        Err(format!("http {}: {}", status.as_u16(), body))
    }
}
