pub use crate::analysis::{AnalysisOrchestrator, DetailLevel, MathQuestion, StructuredAnalysis};
pub use crate::config::ServerConfig;
pub use crate::error::ApiError;
pub use crate::llm::{AiConfig, CustomAiConfig, ProviderError, ProviderRegistry};
pub use crate::task::{ExecutionRunner, Task, TaskStatus, TaskStore};

pub mod handlers;
pub mod server;
pub mod state;
