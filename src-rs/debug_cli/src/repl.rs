use std::io;
use std::thread;
use std::time::Duration;

use crate::client::HTTPClient;
use crate::models::{AnalyzeRequest, CLIConfig, ExecuteRequest, Question, TaskResult};
use crate::render;

pub struct REPL {
    pub config: CLIConfig,
    pub client: HTTPClient,
}

impl REPL {
    pub fn new(config: CLIConfig, client: HTTPClient) -> Self {
        Self { config, client }
    }

    pub fn run(&mut self) {
        render::banner(&self.config);
        loop {
            render::prompt();
            let mut line = String::new();
            match io::stdin().read_line(&mut line) {
                Ok(0) | Err(_) => break,
                Ok(_) => {}
            }
            let line = line.trim().to_string();
            if line.is_empty() {
                continue;
            }
            if line.starts_with('/') {
                if self.handle_command(&line) {
                    break;
                }
                continue;
            }
            self.evaluate(&line);
        }
    }

    fn handle_command(&mut self, line: &str) -> bool {
        let mut parts = line.splitn(2, ' ');
        let cmd = parts.next().unwrap_or("").trim_start_matches('/');
        let rest = parts.next().unwrap_or("").trim();
        match cmd {
            "exit" | "quit" => return true,
            "help" => render::help(),
            "analyze" => {
                if rest.is_empty() {
                    render::error("expression required");
                } else {
                    self.analyze(rest);
                }
            }
            "tasks" => self.list_tasks("/tasks", rest),
            "aitasks" => self.list_tasks("/ai/tasks", rest),
            "aiconfig" => match self.client.ai_config() {
                Ok(value) => render::info(&value.to_string()),
                Err(err) => render::error(&err),
            },
            "lang" => {
                if rest.is_empty() {
                    render::info(&format!("lang: {}", self.config.language));
                } else {
                    self.config.language = rest.to_string();
                    render::info("language updated");
                }
            }
            "detail" => {
                if rest.is_empty() {
                    render::info(&format!("detail: {}", self.config.detail_level));
                } else {
                    self.config.detail_level = rest.to_string();
                    render::info("detail level updated");
                }
            }
            "config" => render::config(&self.config),
            "base" => {
                if rest.is_empty() {
                    render::info(&format!("base: {}", self.config.base_url));
                } else {
                    match HTTPClient::new(rest) {
                        Ok(client) => {
                            self.config.base_url = rest.to_string();
                            self.client = client;
                            render::info("base url updated");
                        }
                        Err(err) => render::error(&err),
                    }
                }
            }
            _ => render::info("unknown command, type /help"),
        }
        false
    }

    fn evaluate(&self, expression: &str) {
        let req = ExecuteRequest {
            code: expression.to_string(),
            timeout: self.config.timeout,
        };
        let submitted = match self.client.execute(&req) {
            Ok(resp) => resp,
            Err(err) => return render::error(&err),
        };
        match self.poll(|client| client.result(&submitted.task_id)) {
            Ok(task) => render::result(&task),
            Err(err) => render::error(&err),
        }
    }

    fn analyze(&self, expression: &str) {
        let req = AnalyzeRequest {
            question: Question {
                expression: expression.to_string(),
            },
            language: self.config.language.clone(),
            detail_level: self.config.detail_level.clone(),
        };
        let submitted = match self.client.analyze(&req) {
            Ok(resp) => resp,
            Err(err) => return render::error(&err),
        };
        render::info(&format!("[{}] {}", submitted.status, submitted.task_id));
        match self.poll(|client| client.ai_result(&submitted.task_id)) {
            Ok(task) => render::analysis(&task),
            Err(err) => render::error(&err),
        }
    }

    fn poll(&self, fetch: impl Fn(&HTTPClient) -> Result<TaskResult, String>) -> Result<TaskResult, String> {
        for _ in 0..self.config.max_polls {
            let task = fetch(&self.client)?;
            if task.is_terminal() {
                return Ok(task);
            }
            thread::sleep(Duration::from_millis(self.config.poll_interval_ms));
        }
        Err("gave up waiting for the task to finish".to_string())
    }

    fn list_tasks(&self, path: &str, rest: &str) {
        let limit = rest.parse::<usize>().unwrap_or(10);
        match self.client.list_tasks(path, limit) {
            Ok(tasks) => render::tasks(&tasks),
            Err(err) => render::error(&err),
        }
    }
}
