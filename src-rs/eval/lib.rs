pub mod ast;
pub mod interp;
pub mod lexer;
pub mod parser;
pub mod safety;
pub mod strategy;
pub mod types;
pub mod value;

pub use parser::Dialect;
pub use types::{EvalError, Evaluation, Strategy};
pub use value::Number;

/// Evaluates an arithmetic or algebraic expression to its printed result.
pub fn evaluate(expression: &str) -> Result<String, EvalError> {
    strategy::run(expression).map(|evaluation| evaluation.output)
}
