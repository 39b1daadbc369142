pub mod config;
pub mod error;
pub mod helpers;

#[path = "eval/lib.rs"]
pub mod eval;
#[path = "task/lib.rs"]
pub mod task;
#[path = "llm/lib.rs"]
pub mod llm;
#[path = "analysis/lib.rs"]
pub mod analysis;
#[path = "api/lib.rs"]
pub mod api;

pub use analysis::{AnalysisOrchestrator, StructuredAnalysis};
pub use config::ServerConfig;
pub use eval::evaluate;
pub use task::{ExecutionRunner, TaskStore};
