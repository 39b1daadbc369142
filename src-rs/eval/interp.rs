use std::f64::consts::{E, PI};

use super::ast::{BinOp, Expr};
use super::value::Number;

/// Numerically evaluates every fully numeric subtree, leaving free symbols
/// in place. All numbers are treated as floats.
pub fn fold(expr: &Expr) -> Result<Expr, String> {
    match expr {
        Expr::Num(number) => Ok(Expr::Num(Number::Float(number.as_f64()))),
        Expr::Symbol(name) => Ok(Expr::Symbol(name.clone())),
        Expr::Const(name) => Ok(Expr::Num(Number::Float(constant(name)?.as_f64()))),
        Expr::Neg(inner) => match fold(inner)? {
            Expr::Num(number) => Ok(Expr::Num(number.neg()?)),
            other => Ok(Expr::Neg(Box::new(other))),
        },
        Expr::Binary(op, lhs, rhs) => match (fold(lhs)?, fold(rhs)?) {
            (Expr::Num(a), Expr::Num(b)) => Ok(Expr::Num(Number::Float(apply_binary(*op, a, b)?.as_f64()))),
            (lhs, rhs) => Ok(Expr::binary(*op, lhs, rhs)),
        },
        Expr::Call(name, args) => {
            let folded = args.iter().map(fold).collect::<Result<Vec<_>, _>>()?;
            let numeric: Option<Vec<Number>> = folded
                .iter()
                .map(|arg| match arg {
                    Expr::Num(number) => Some(*number),
                    _ => None,
                })
                .collect();
            match numeric {
                Some(values) => Ok(Expr::Num(Number::Float(apply_function(name, &values)?.as_f64()))),
                None => Ok(Expr::Call(name.clone(), folded)),
            }
        }
    }
}

/// Evaluates an expression tree to a single number with int/float
/// semantics. Free symbols are an error.
pub fn evaluate(expr: &Expr) -> Result<Number, String> {
    match expr {
        Expr::Num(number) => Ok(*number),
        Expr::Symbol(name) => Err(format!("name '{}' is not defined", name)),
        Expr::Const(name) => constant(name),
        Expr::Neg(inner) => evaluate(inner)?.neg(),
        Expr::Binary(op, lhs, rhs) => apply_binary(*op, evaluate(lhs)?, evaluate(rhs)?),
        Expr::Call(name, args) => {
            let values = args.iter().map(evaluate).collect::<Result<Vec<_>, _>>()?;
            apply_function(name, &values)
        }
    }
}

fn apply_binary(op: BinOp, a: Number, b: Number) -> Result<Number, String> {
    match op {
        BinOp::Add => a.add(b),
        BinOp::Sub => a.sub(b),
        BinOp::Mul => a.mul(b),
        BinOp::Div => a.div(b),
        BinOp::FloorDiv => a.floor_div(b),
        BinOp::Mod => a.rem(b),
        BinOp::Pow => a.pow(b),
    }
}

fn constant(name: &str) -> Result<Number, String> {
    match name {
        "pi" => Ok(Number::Float(PI)),
        "E" => Ok(Number::Float(E)),
        other => Err(format!("unknown constant '{}'", other)),
    }
}

fn apply_function(name: &str, args: &[Number]) -> Result<Number, String> {
    match (name, args) {
        ("sqrt", [x]) => sqrt(*x),
        ("sin", [x]) => float(x.as_f64().sin()),
        ("cos", [x]) => float(x.as_f64().cos()),
        ("tan", [x]) => float(x.as_f64().tan()),
        ("exp", [x]) => float(x.as_f64().exp()),
        ("log", [x]) => log(*x, None),
        ("log", [x, base]) => log(*x, Some(*base)),
        ("Abs" | "abs", [x]) => match x {
            Number::Int(value) => Ok(value
                .checked_abs()
                .map(Number::Int)
                .unwrap_or(Number::Float((*value as f64).abs()))),
            Number::Float(value) => Ok(Number::Float(value.abs())),
        },
        ("Rational", [p, q]) => p.div(*q),
        ("round", [x]) => round(*x),
        ("round", [x, digits]) => round_to(*x, *digits),
        ("min", values) if !values.is_empty() => extremum(values, |a, b| b < a),
        ("max", values) if !values.is_empty() => extremum(values, |a, b| b > a),
        ("pow", [base, exp]) => base.pow(*exp),
        ("int", [x]) => match x {
            Number::Int(value) => Ok(Number::Int(*value)),
            Number::Float(value) => Ok(Number::Int(value.trunc() as i64)),
        },
        ("float", [x]) => Ok(Number::Float(x.as_f64())),
        (name, args) => Err(format!("{}() does not accept {} argument(s)", name, args.len())),
    }
}

fn float(value: f64) -> Result<Number, String> {
    if value.is_finite() {
        Ok(Number::Float(value))
    } else {
        Err("math domain error".to_string())
    }
}

fn sqrt(x: Number) -> Result<Number, String> {
    if x.as_f64() < 0.0 {
        return Err("math domain error".to_string());
    }
    if let Number::Int(value) = x {
        let root = (value as f64).sqrt().round() as i64;
        if root.checked_mul(root) == Some(value) {
            return Ok(Number::Int(root));
        }
    }
    float(x.as_f64().sqrt())
}

fn log(x: Number, base: Option<Number>) -> Result<Number, String> {
    let value = x.as_f64();
    if value <= 0.0 {
        return Err("math domain error".to_string());
    }
    match base {
        None => float(value.ln()),
        Some(base) => {
            let base = base.as_f64();
            if base <= 0.0 || base == 1.0 {
                return Err("math domain error".to_string());
            }
            float(value.ln() / base.ln())
        }
    }
}

fn round(x: Number) -> Result<Number, String> {
    match x {
        Number::Int(value) => Ok(Number::Int(value)),
        Number::Float(value) => {
            let rounded = round_half_even(value);
            if rounded.abs() < i64::MAX as f64 {
                Ok(Number::Int(rounded as i64))
            } else {
                Err("cannot convert float to integer".to_string())
            }
        }
    }
}

fn round_to(x: Number, digits: Number) -> Result<Number, String> {
    let digits = match digits {
        Number::Int(digits) => digits,
        Number::Float(_) => return Err("round() digits must be an integer".to_string()),
    };
    match x {
        Number::Int(value) if digits >= 0 => Ok(Number::Int(value)),
        _ => {
            let scale = 10f64.powi(digits.clamp(-308, 308) as i32);
            float(round_half_even(x.as_f64() * scale) / scale)
        }
    }
}

fn round_half_even(value: f64) -> f64 {
    let rounded = value.round();
    if (value - value.trunc()).abs() == 0.5 && rounded % 2.0 != 0.0 {
        rounded - value.signum()
    } else {
        rounded
    }
}

fn extremum(values: &[Number], replaces: impl Fn(f64, f64) -> bool) -> Result<Number, String> {
    let mut best = values[0];
    for value in &values[1..] {
        if replaces(best.as_f64(), value.as_f64()) {
            best = *value;
        }
    }
    Ok(best)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::eval::parser::{parse, Dialect};

    #[test]
    fn fold_keeps_symbols_and_collapses_numbers() {
        let expr = parse("2*x + 3*4", &Dialect::SYMBOLIC).unwrap();
        assert_eq!(fold(&expr).unwrap().to_string(), "2*x + 12");
    }

    #[test]
    fn evaluate_uses_integer_semantics() {
        let expr = parse("7 // 2 + 7 % 4", &Dialect::NAMESPACE).unwrap();
        assert_eq!(evaluate(&expr).unwrap(), Number::Int(6));
    }

    #[test]
    fn builtins_behave_like_their_python_namesakes() {
        let expr = parse("round(2.5) + round(3.5) + abs(-1)", &Dialect::UNRESTRICTED).unwrap();
        assert_eq!(evaluate(&expr).unwrap(), Number::Int(7));
        let expr = parse("max(1, 4.5, 3)", &Dialect::UNRESTRICTED).unwrap();
        assert_eq!(evaluate(&expr).unwrap(), Number::Float(4.5));
    }

    #[test]
    fn perfect_squares_stay_integral() {
        let expr = parse("sp.sqrt(16)", &Dialect::NAMESPACE).unwrap();
        assert_eq!(evaluate(&expr).unwrap(), Number::Int(4));
    }
}
