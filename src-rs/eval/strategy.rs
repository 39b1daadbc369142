use tracing::debug;

use super::interp::{evaluate, fold};
use super::parser::{parse, Dialect};
use super::safety;
use super::types::{EvalError, Evaluation, Strategy};
use super::value::format_float;
use super::ast::Expr;

impl Strategy {
    pub fn dialect(&self) -> Dialect {
        match self {
            Strategy::Symbolic => Dialect::SYMBOLIC,
            Strategy::Namespace => Dialect::NAMESPACE,
            Strategy::Unrestricted => Dialect::UNRESTRICTED,
        }
    }

    /// Runs this single stage; the error is the stage's failure message.
    pub fn attempt(&self, code: &str) -> Result<String, String> {
        let tree = parse(code, &self.dialect())?;
        match self {
            Strategy::Symbolic => match fold(&tree)? {
                Expr::Num(number) => Ok(format_float(number.as_f64())),
                residual => Ok(residual.to_string()),
            },
            Strategy::Namespace | Strategy::Unrestricted => Ok(evaluate(&tree)?.to_string()),
        }
    }
}

/// Strips `=` characters and surrounding whitespace.
pub fn clean(code: &str) -> String {
    code.replace('=', "").trim().to_string()
}

/// Evaluates `code`, trying each strategy in order and stopping at the first
/// success. Denylisted input is rejected before any strategy runs.
pub fn run(code: &str) -> Result<Evaluation, EvalError> {
    safety::check(code)?;
    let cleaned = clean(code);

    let mut last_err = String::from("no evaluation strategy available");
    for strategy in Strategy::CHAIN {
        match strategy.attempt(&cleaned) {
            Ok(output) => return Ok(Evaluation { output, strategy }),
            Err(err) => {
                debug!(strategy = %strategy, error = %err, "evaluation strategy failed");
                last_err = err;
            }
        }
    }
    Err(EvalError::Evaluation(last_err))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn arithmetic_is_handled_by_the_symbolic_stage() {
        let result = run("2+3*4").unwrap();
        assert_eq!(result.output, "14");
        assert_eq!(result.strategy, Strategy::Symbolic);
    }

    #[test]
    fn division_keeps_fraction() {
        assert_eq!(run("10/4").unwrap().output, "2.5");
    }

    #[test]
    fn equals_signs_are_dropped() {
        assert_eq!(run("3 + 4 =").unwrap().output, "7");
    }

    #[test]
    fn symbols_survive_in_the_result() {
        assert_eq!(run("x + 1 + 1").unwrap().output, "x + 1 + 1");
        assert_eq!(run("x + (1 + 1)").unwrap().output, "x + 2");
    }

    #[test]
    fn floor_division_falls_through_to_namespace_stage() {
        let result = run("7 // 2").unwrap();
        assert_eq!(result.output, "3");
        assert_eq!(result.strategy, Strategy::Namespace);
    }

    #[test]
    fn builtins_fall_through_to_unrestricted_stage() {
        let result = run("abs(-3) + 1").unwrap();
        assert_eq!(result.output, "4");
        assert_eq!(result.strategy, Strategy::Unrestricted);
    }

    #[test]
    fn exhausted_chain_reports_last_failure() {
        match run("1 / 0") {
            Err(EvalError::Evaluation(msg)) => assert_eq!(msg, "division by zero"),
            other => panic!("unexpected: {:?}", other),
        }
    }

    #[test]
    fn integer_overflow_is_a_value_not_a_panic() {
        let result = run("(-9223372036854775807 - 1) // -1").unwrap();
        assert_eq!(result.output.parse::<f64>().unwrap(), 9_223_372_036_854_775_808.0);
    }

    #[test]
    fn deep_nesting_is_an_evaluation_error() {
        let code = format!("{}1{}", "(".repeat(20_000), ")".repeat(20_000));
        match run(&code) {
            Err(EvalError::Evaluation(msg)) => assert!(msg.contains("too"), "{}", msg),
            other => panic!("unexpected: {:?}", other),
        }
    }

    #[test]
    fn rejected_input_never_reaches_a_strategy() {
        // "1 + 1" would evaluate; the denylist hit must win.
        assert!(matches!(run("1 + 1 # open"), Err(EvalError::Rejected(_))));
    }
}
