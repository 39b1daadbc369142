pub mod orchestrator;
pub mod prompt;
pub mod structurer;
pub mod types;

pub use orchestrator::AnalysisOrchestrator;
pub use structurer::structure;
pub use types::{DetailLevel, MathQuestion, SolutionStep, StructuredAnalysis};
