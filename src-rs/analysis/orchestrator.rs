use std::sync::Arc;

use tracing::{info, warn};

use super::prompt::{build_prompt, system_prompt};
use super::structurer::structure;
use super::types::{DetailLevel, MathQuestion, StructuredAnalysis};
use crate::llm::{ChatCompletionsAdapter, CompletionRequest, Message, ProviderError, ProviderRegistry};
use crate::task::{Task, TaskStore, Transition};

pub const TEMPERATURE: f64 = 0.7;
pub const MAX_TOKENS: u32 = 2000;

/// Runs AI analyses as background tasks against the effective provider.
#[derive(Clone)]
pub struct AnalysisOrchestrator {
    store: Arc<TaskStore<StructuredAnalysis>>,
    providers: Arc<ProviderRegistry>,
}

impl AnalysisOrchestrator {
    pub fn new(store: Arc<TaskStore<StructuredAnalysis>>, providers: Arc<ProviderRegistry>) -> Self {
        Self { store, providers }
    }

    pub fn store(&self) -> &Arc<TaskStore<StructuredAnalysis>> {
        &self.store
    }

    /// Registers an analysis task and schedules it on the runtime. Must be
    /// called from within a tokio runtime.
    pub fn submit(&self, question: MathQuestion, language: String, detail_level: DetailLevel) -> Task<StructuredAnalysis> {
        let task = self.store.create();
        info!(task_id = %task.id, expression = %question.expression, language = %language, "analysis task submitted");

        let this = self.clone();
        let id = task.id.clone();
        tokio::spawn(async move {
            this.run_task(&id, &question, &language, detail_level).await;
        });
        task
    }

    async fn run_task(&self, id: &str, question: &MathQuestion, language: &str, detail_level: DetailLevel) {
        if let Err(err) = self.store.update(id, Transition::Start) {
            warn!(task_id = %id, error = %err, "could not start analysis task");
            return;
        }
        let transition = match self.analyze(question, language, detail_level).await {
            Ok(analysis) => {
                info!(task_id = %id, steps = analysis.solution_steps.len(), "analysis task completed");
                Transition::Complete(analysis)
            }
            Err(err) => {
                warn!(task_id = %id, code = err.code(), error = %err, "analysis task failed");
                Transition::Fail(err.to_string())
            }
        };
        if let Err(err) = self.store.update(id, transition) {
            warn!(task_id = %id, error = %err, "could not record analysis result");
        }
    }

    /// Resolves the effective provider, asks it for an explanation and
    /// structures the reply. No request is made without an API key.
    pub async fn analyze(
        &self,
        question: &MathQuestion,
        language: &str,
        detail_level: DetailLevel,
    ) -> Result<StructuredAnalysis, ProviderError> {
        let adapter = ChatCompletionsAdapter::new(self.providers.effective())?;
        info!(model = adapter.model(), expression = %question.expression, "requesting analysis");

        let request = CompletionRequest {
            messages: vec![
                Message::system(system_prompt(language)),
                Message::user(&build_prompt(question, language, detail_level)),
            ],
            temperature: TEMPERATURE,
            max_tokens: MAX_TOKENS,
        };
        let response = adapter.complete(request).await?;
        Ok(structure(&response.content, question))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::AiConfig;
    use crate::task::TaskStatus;

    fn orchestrator(api_key: &str, api_base: &str) -> AnalysisOrchestrator {
        let providers = ProviderRegistry::new(AiConfig {
            api_base: api_base.to_string(),
            api_key: api_key.to_string(),
            model: "deepseek-chat".to_string(),
            timeout: 2,
        });
        AnalysisOrchestrator::new(Arc::new(TaskStore::new()), Arc::new(providers))
    }

    #[tokio::test]
    async fn missing_key_is_a_configuration_error() {
        let orchestrator = orchestrator("", "http://127.0.0.1:9");
        let err = orchestrator
            .analyze(&MathQuestion::new("1 + 1"), "zh-CN", DetailLevel::Standard)
            .await
            .unwrap_err();
        assert_eq!(err, ProviderError::Configuration);
    }

    #[tokio::test]
    async fn unreachable_provider_fails_the_task() {
        // Port 9 (discard) is not listening on loopback.
        let orchestrator = orchestrator("sk-test", "http://127.0.0.1:9");
        let task = orchestrator.submit(MathQuestion::new("1 + 1"), "en-US".to_string(), DetailLevel::Standard);

        let mut last = orchestrator.store().get(&task.id).unwrap();
        for _ in 0..300 {
            if last.status.is_terminal() {
                break;
            }
            tokio::time::sleep(std::time::Duration::from_millis(10)).await;
            last = orchestrator.store().get(&task.id).unwrap();
        }
        assert_eq!(last.status, TaskStatus::Failed);
        assert!(last.result.is_none());
        assert!(last.error.unwrap().starts_with("network error"));
    }

    #[tokio::test]
    async fn refused_connection_is_a_network_error() {
        let orchestrator = orchestrator("sk-test", "http://127.0.0.1:9");
        let err = orchestrator
            .analyze(&MathQuestion::new("1 + 1"), "en-US", DetailLevel::Standard)
            .await
            .unwrap_err();
        assert!(matches!(err, ProviderError::Network(_)), "{:?}", err);
        assert_eq!(err.code(), "network_error");
    }
}
