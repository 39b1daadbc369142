use super::ast::{BinOp, Expr};
use super::lexer::{tokenize, Token};

/// Functions known to every dialect, bare in the symbolic dialect and behind
/// the namespace prefix otherwise.
pub const MATH_FUNCTIONS: [&str; 8] = ["sqrt", "sin", "cos", "tan", "log", "exp", "Abs", "Rational"];
pub const CONSTANTS: [&str; 2] = ["pi", "E"];
pub const BUILTINS: [&str; 7] = ["abs", "round", "min", "max", "pow", "int", "float"];

/// Bounds on parser recursion and on input size. Together they bound the
/// depth of every tree the parser returns, so walking or dropping one never
/// exhausts the stack.
pub const MAX_DEPTH: usize = 256;
pub const MAX_TOKENS: usize = 2048;

/// The grammar accepted by one evaluation strategy.
#[derive(Clone, Copy, Debug)]
pub struct Dialect {
    /// Unknown names become free symbols instead of errors.
    pub free_symbols: bool,
    /// `//` and `%` are accepted.
    pub floor_ops: bool,
    /// Math functions and constants are only reachable as `<ns>.<name>`.
    pub namespace: Option<&'static str>,
    pub builtins: &'static [&'static str],
}

impl Dialect {
    pub const SYMBOLIC: Dialect = Dialect {
        free_symbols: true,
        floor_ops: false,
        namespace: None,
        builtins: &[],
    };

    pub const NAMESPACE: Dialect = Dialect {
        free_symbols: false,
        floor_ops: true,
        namespace: Some("sp"),
        builtins: &[],
    };

    pub const UNRESTRICTED: Dialect = Dialect {
        free_symbols: false,
        floor_ops: true,
        namespace: Some("sp"),
        builtins: &BUILTINS,
    };
}

/// Parses `input` into an expression tree without evaluating any of it.
pub fn parse(input: &str, dialect: &Dialect) -> Result<Expr, String> {
    let tokens = tokenize(input)?;
    if tokens.is_empty() {
        return Err("empty expression".to_string());
    }
    if tokens.len() > MAX_TOKENS {
        return Err(format!("expression too long ({} tokens, at most {})", tokens.len(), MAX_TOKENS));
    }
    let mut parser = Parser {
        tokens,
        pos: 0,
        depth: 0,
        dialect,
    };
    let expr = parser.expr()?;
    match parser.peek() {
        None => Ok(expr),
        Some(token) => Err(format!("unexpected token {:?}", token)),
    }
}

struct Parser<'a> {
    tokens: Vec<Token>,
    pos: usize,
    depth: usize,
    dialect: &'a Dialect,
}

impl Parser<'_> {
    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    fn advance(&mut self) -> Option<Token> {
        let token = self.tokens.get(self.pos).cloned();
        if token.is_some() {
            self.pos += 1;
        }
        token
    }

    fn expect(&mut self, expected: Token) -> Result<(), String> {
        match self.advance() {
            Some(token) if token == expected => Ok(()),
            Some(token) => Err(format!("expected {:?}, found {:?}", expected, token)),
            None => Err(format!("expected {:?}, found end of input", expected)),
        }
    }

    fn expr(&mut self) -> Result<Expr, String> {
        let mut lhs = self.term()?;
        loop {
            let op = match self.peek() {
                Some(Token::Plus) => BinOp::Add,
                Some(Token::Minus) => BinOp::Sub,
                _ => return Ok(lhs),
            };
            self.pos += 1;
            let rhs = self.term()?;
            lhs = Expr::binary(op, lhs, rhs);
        }
    }

    fn term(&mut self) -> Result<Expr, String> {
        let mut lhs = self.unary()?;
        loop {
            let op = match self.peek() {
                Some(Token::Star) => BinOp::Mul,
                Some(Token::Slash) => BinOp::Div,
                Some(Token::DoubleSlash) if self.dialect.floor_ops => BinOp::FloorDiv,
                Some(Token::Percent) if self.dialect.floor_ops => BinOp::Mod,
                _ => return Ok(lhs),
            };
            self.pos += 1;
            let rhs = self.unary()?;
            lhs = Expr::binary(op, lhs, rhs);
        }
    }

    /// Every nested construct (parentheses, signs, exponents, arguments)
    /// passes through here, so this is where nesting is counted.
    fn unary(&mut self) -> Result<Expr, String> {
        if self.depth >= MAX_DEPTH {
            return Err("expression nested too deeply".to_string());
        }
        self.depth += 1;
        let expr = self.signed();
        self.depth -= 1;
        expr
    }

    fn signed(&mut self) -> Result<Expr, String> {
        match self.peek() {
            Some(Token::Minus) => {
                self.pos += 1;
                Ok(Expr::Neg(Box::new(self.unary()?)))
            }
            Some(Token::Plus) => {
                self.pos += 1;
                self.unary()
            }
            _ => self.power(),
        }
    }

    fn power(&mut self) -> Result<Expr, String> {
        let base = self.atom()?;
        if self.peek() != Some(&Token::DoubleStar) {
            return Ok(base);
        }
        self.pos += 1;
        let exponent = self.unary()?;
        Ok(Expr::binary(BinOp::Pow, base, exponent))
    }

    fn atom(&mut self) -> Result<Expr, String> {
        match self.advance() {
            Some(Token::Num(number)) => Ok(Expr::Num(number)),
            Some(Token::LParen) => {
                let inner = self.expr()?;
                self.expect(Token::RParen)?;
                Ok(inner)
            }
            Some(Token::Ident(name)) => self.name(name),
            Some(token) => Err(format!("unexpected token {:?}", token)),
            None => Err("unexpected end of input".to_string()),
        }
    }

    fn name(&mut self, name: String) -> Result<Expr, String> {
        let calls = matches!(self.peek(), Some(Token::LParen));

        if let Some(namespace) = self.dialect.namespace {
            if name == namespace {
                self.expect(Token::Dot)?;
                let member = match self.advance() {
                    Some(Token::Ident(member)) => member,
                    _ => return Err(format!("invalid attribute access on '{}'", namespace)),
                };
                let calls = matches!(self.peek(), Some(Token::LParen));
                if CONSTANTS.contains(&member.as_str()) && !calls {
                    return Ok(Expr::Const(member));
                }
                if MATH_FUNCTIONS.contains(&member.as_str()) && calls {
                    let args = self.arguments()?;
                    return Ok(Expr::Call(member, args));
                }
                return Err(format!("module '{}' has no attribute '{}'", namespace, member));
            }
            if calls && self.dialect.builtins.contains(&name.as_str()) {
                let args = self.arguments()?;
                return Ok(Expr::Call(name, args));
            }
            return Err(format!("name '{}' is not defined", name));
        }

        if calls {
            if MATH_FUNCTIONS.contains(&name.as_str()) {
                let args = self.arguments()?;
                return Ok(Expr::Call(name, args));
            }
            return Err(format!("unknown function '{}'", name));
        }
        if CONSTANTS.contains(&name.as_str()) {
            return Ok(Expr::Const(name));
        }
        if self.dialect.free_symbols {
            return Ok(Expr::Symbol(name));
        }
        Err(format!("name '{}' is not defined", name))
    }

    fn arguments(&mut self) -> Result<Vec<Expr>, String> {
        self.expect(Token::LParen)?;
        let mut args = Vec::new();
        if matches!(self.peek(), Some(Token::RParen)) {
            self.pos += 1;
            return Ok(args);
        }
        loop {
            args.push(self.expr()?);
            match self.advance() {
                Some(Token::Comma) => continue,
                Some(Token::RParen) => return Ok(args),
                Some(token) => return Err(format!("unexpected token {:?} in argument list", token)),
                None => return Err("unclosed argument list".to_string()),
            }
        }
    }
}
