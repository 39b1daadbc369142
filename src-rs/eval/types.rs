use std::fmt;

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EvalError {
    #[error("expression contains a forbidden operation: {0}")]
    Rejected(String),

    #[error("evaluation error: {0}")]
    Evaluation(String),
}

/// One stage of the evaluation fallback chain.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Strategy {
    /// Parse to a tree without evaluating, then fold numerically.
    Symbolic,
    /// Int/float arithmetic with only the `sp` namespace reachable.
    Namespace,
    /// Namespace arithmetic plus the builtin functions.
    Unrestricted,
}

impl Strategy {
    pub const CHAIN: [Strategy; 3] = [Strategy::Symbolic, Strategy::Namespace, Strategy::Unrestricted];

    pub fn as_str(&self) -> &'static str {
        match self {
            Strategy::Symbolic => "symbolic",
            Strategy::Namespace => "namespace",
            Strategy::Unrestricted => "unrestricted",
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Evaluation {
    pub output: String,
    pub strategy: Strategy,
}
