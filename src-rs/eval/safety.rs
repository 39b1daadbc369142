//! Best-effort textual pre-filter for submitted expressions.
//!
//! This is a substring denylist, not isolation. It does not protect against
//! obfuscated input; the evaluator's own grammar is what actually limits
//! what an expression can do.

use super::types::EvalError;

pub const FORBIDDEN_PATTERNS: [&str; 17] = [
    "import os",
    "import sys",
    "import subprocess",
    "import socket",
    "os.",
    "sys.",
    "subprocess.",
    "socket.",
    "__",
    "exec",
    "eval",
    "compile",
    "open",
    "file",
    "import shutil",
    "import pickle",
    "import json",
];

pub fn forbidden_pattern(code: &str) -> Option<&'static str> {
    FORBIDDEN_PATTERNS
        .iter()
        .copied()
        .find(|pattern| code.contains(pattern))
}

pub fn check(code: &str) -> Result<(), EvalError> {
    match forbidden_pattern(code) {
        Some(pattern) => Err(EvalError::Rejected(pattern.to_string())),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_arithmetic_passes() {
        assert!(check("2 + 3 * 4").is_ok());
        assert!(check("sp.sqrt(2)").is_ok());
    }

    #[test]
    fn denylisted_tokens_are_rejected() {
        for code in ["__import__('os')", "open('/etc/passwd')", "eval('1')", "os.system('ls')"] {
            assert!(matches!(check(code), Err(EvalError::Rejected(_))), "{}", code);
        }
    }
}
