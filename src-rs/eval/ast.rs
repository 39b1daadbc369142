use std::fmt;

use super::value::{format_float, Number};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BinOp {
    Add,
    Sub,
    Mul,
    Div,
    FloorDiv,
    Mod,
    Pow,
}

impl BinOp {
    fn precedence(self) -> u8 {
        match self {
            BinOp::Add | BinOp::Sub => 1,
            BinOp::Mul | BinOp::Div | BinOp::FloorDiv | BinOp::Mod => 2,
            BinOp::Pow => 4,
        }
    }

    fn symbol(self) -> &'static str {
        match self {
            BinOp::Add => " + ",
            BinOp::Sub => " - ",
            BinOp::Mul => "*",
            BinOp::Div => "/",
            BinOp::FloorDiv => "//",
            BinOp::Mod => "%",
            BinOp::Pow => "**",
        }
    }
}

/// Unevaluated expression tree produced by the parser.
#[derive(Clone, Debug, PartialEq)]
pub enum Expr {
    Num(Number),
    /// A free symbol, only produced by dialects that allow them.
    Symbol(String),
    /// A named constant such as `pi`.
    Const(String),
    Neg(Box<Expr>),
    Binary(BinOp, Box<Expr>, Box<Expr>),
    Call(String, Vec<Expr>),
}

impl Expr {
    pub fn binary(op: BinOp, lhs: Expr, rhs: Expr) -> Expr {
        Expr::Binary(op, Box::new(lhs), Box::new(rhs))
    }

    fn precedence(&self) -> u8 {
        match self {
            Expr::Binary(op, _, _) => op.precedence(),
            Expr::Neg(_) => 3,
            Expr::Num(Number::Int(value)) if *value < 0 => 3,
            Expr::Num(Number::Float(value)) if *value < 0.0 => 3,
            _ => 5,
        }
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expr::Num(Number::Float(value)) => write!(f, "{}", format_float(*value)),
            Expr::Num(number) => write!(f, "{}", number),
            Expr::Symbol(name) | Expr::Const(name) => write!(f, "{}", name),
            Expr::Neg(inner) => {
                if inner.precedence() < 3 {
                    write!(f, "-({})", inner)
                } else {
                    write!(f, "-{}", inner)
                }
            }
            Expr::Binary(op, lhs, rhs) => {
                let prec = op.precedence();
                // Power is right associative, everything else left associative.
                let (lhs_paren, rhs_paren) = if *op == BinOp::Pow {
                    (lhs.precedence() <= prec, rhs.precedence() < prec)
                } else {
                    (lhs.precedence() < prec, rhs.precedence() <= prec)
                };
                write_operand(f, lhs, lhs_paren)?;
                write!(f, "{}", op.symbol())?;
                write_operand(f, rhs, rhs_paren)
            }
            Expr::Call(name, args) => {
                write!(f, "{}(", name)?;
                for (idx, arg) in args.iter().enumerate() {
                    if idx > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", arg)?;
                }
                write!(f, ")")
            }
        }
    }
}

fn write_operand(f: &mut fmt::Formatter<'_>, expr: &Expr, paren: bool) -> fmt::Result {
    if paren {
        write!(f, "({})", expr)
    } else {
        write!(f, "{}", expr)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_with_minimal_parentheses() {
        let expr = Expr::binary(
            BinOp::Mul,
            Expr::binary(BinOp::Add, Expr::Symbol("x".into()), Expr::Num(Number::Int(1))),
            Expr::Symbol("y".into()),
        );
        assert_eq!(expr.to_string(), "(x + 1)*y");

        let expr = Expr::binary(
            BinOp::Sub,
            Expr::Symbol("a".into()),
            Expr::binary(BinOp::Sub, Expr::Symbol("b".into()), Expr::Symbol("c".into())),
        );
        assert_eq!(expr.to_string(), "a - (b - c)");
    }
}
