use super::value::Number;

#[derive(Clone, Debug, PartialEq)]
pub enum Token {
    Num(Number),
    Ident(String),
    Plus,
    Minus,
    Star,
    DoubleStar,
    Slash,
    DoubleSlash,
    Percent,
    Dot,
    Comma,
    LParen,
    RParen,
}

pub fn tokenize(input: &str) -> Result<Vec<Token>, String> {
    let chars: Vec<char> = input.chars().collect();
    let mut tokens = Vec::new();
    let mut idx = 0;

    while idx < chars.len() {
        let ch = chars[idx];
        if ch.is_whitespace() {
            idx += 1;
            continue;
        }
        let starts_number =
            ch.is_ascii_digit() || (ch == '.' && chars.get(idx + 1).is_some_and(|c| c.is_ascii_digit()));
        if starts_number {
            let (number, next) = read_number(&chars, idx)?;
            tokens.push(Token::Num(number));
            idx = next;
            continue;
        }
        if ch.is_alphabetic() || ch == '_' {
            let start = idx;
            while idx < chars.len() && (chars[idx].is_alphanumeric() || chars[idx] == '_') {
                idx += 1;
            }
            tokens.push(Token::Ident(chars[start..idx].iter().collect()));
            continue;
        }
        let next = chars.get(idx + 1).copied();
        let (token, width) = match (ch, next) {
            ('*', Some('*')) => (Token::DoubleStar, 2),
            ('/', Some('/')) => (Token::DoubleSlash, 2),
            ('+', _) => (Token::Plus, 1),
            ('-', _) => (Token::Minus, 1),
            ('*', _) => (Token::Star, 1),
            ('/', _) => (Token::Slash, 1),
            ('%', _) => (Token::Percent, 1),
            ('.', _) => (Token::Dot, 1),
            (',', _) => (Token::Comma, 1),
            ('(', _) => (Token::LParen, 1),
            (')', _) => (Token::RParen, 1),
            _ => return Err(format!("invalid character '{}' at position {}", ch, idx)),
        };
        tokens.push(token);
        idx += width;
    }

    Ok(tokens)
}

fn read_number(chars: &[char], start: usize) -> Result<(Number, usize), String> {
    let mut idx = start;
    let mut is_float = false;
    while idx < chars.len() && chars[idx].is_ascii_digit() {
        idx += 1;
    }
    if idx < chars.len() && chars[idx] == '.' {
        is_float = true;
        idx += 1;
        while idx < chars.len() && chars[idx].is_ascii_digit() {
            idx += 1;
        }
    }
    if idx < chars.len() && (chars[idx] == 'e' || chars[idx] == 'E') {
        let mut look = idx + 1;
        if look < chars.len() && (chars[look] == '+' || chars[look] == '-') {
            look += 1;
        }
        if look < chars.len() && chars[look].is_ascii_digit() {
            is_float = true;
            idx = look;
            while idx < chars.len() && chars[idx].is_ascii_digit() {
                idx += 1;
            }
        }
    }

    let text: String = chars[start..idx].iter().collect();
    let number = if is_float {
        text.parse::<f64>()
            .map(Number::Float)
            .map_err(|err| format!("invalid number '{}': {}", text, err))?
    } else {
        match text.parse::<i64>() {
            Ok(value) => Number::Int(value),
            Err(_) => text
                .parse::<f64>()
                .map(Number::Float)
                .map_err(|err| format!("invalid number '{}': {}", text, err))?,
        }
    };
    Ok((number, idx))
}
