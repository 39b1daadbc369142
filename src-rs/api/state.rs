use std::sync::Arc;

use crate::analysis::AnalysisOrchestrator;
use crate::config::ServerConfig;
use crate::llm::ProviderRegistry;
use crate::task::{ExecutionRunner, TaskStore};

/// Shared handles for every request handler. The registries live as long
/// as the server does.
pub struct AppState {
    pub config: Arc<ServerConfig>,
    pub providers: Arc<ProviderRegistry>,
    pub executions: ExecutionRunner,
    pub analyses: AnalysisOrchestrator,
}

impl AppState {
    pub fn new(config: ServerConfig) -> Self {
        let providers = Arc::new(ProviderRegistry::new(config.default_ai_config()));
        Self::with_providers(config, providers)
    }

    pub fn with_providers(config: ServerConfig, providers: Arc<ProviderRegistry>) -> Self {
        Self {
            config: Arc::new(config),
            executions: ExecutionRunner::new(Arc::new(TaskStore::new())),
            analyses: AnalysisOrchestrator::new(Arc::new(TaskStore::new()), providers.clone()),
            providers,
        }
    }
}
