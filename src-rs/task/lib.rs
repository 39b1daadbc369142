pub mod runner;
pub mod store;
pub mod types;

pub use runner::ExecutionRunner;
pub use store::TaskStore;
pub use types::{Task, TaskError, TaskStatus, TaskSummary, Transition};
