use std::{fmt::Display, iter::Peekable, str::CharIndices};

use crate::expression::error::ExpressionError;

#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    Int(i64),
    Float(f64),
    Str(String),
    Bool(bool),
    Ident(String),
    Plus,
    Minus,
    Star,
    Slash,
    LParen,
    RParen,
    Eq,
    NotEq,
    Lt,
    Le,
    Gt,
    Ge,
}

impl Display for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Token::Int(value) => write!(f, "{value}"),
            Token::Float(value) => write!(f, "{value}"),
            Token::Str(value) => write!(f, "{value:?}"),
            Token::Bool(value) => write!(f, "{value}"),
            Token::Ident(name) => write!(f, "{name}"),
            Token::Plus => write!(f, "+"),
            Token::Minus => write!(f, "-"),
            Token::Star => write!(f, "*"),
            Token::Slash => write!(f, "/"),
            Token::LParen => write!(f, "("),
            Token::RParen => write!(f, ")"),
            Token::Eq => write!(f, "=="),
            Token::NotEq => write!(f, "!="),
            Token::Lt => write!(f, "<"),
            Token::Le => write!(f, "<="),
            Token::Gt => write!(f, ">"),
            Token::Ge => write!(f, ">="),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SpannedToken {
    pub token: Token,
    pub offset: usize,
}

pub fn tokenize(input: &str) -> Result<Vec<SpannedToken>, ExpressionError> {
    let mut tokens = Vec::new();
    let mut chars = input.char_indices().peekable();

    while let Some(&(offset, character)) = chars.peek() {
        if character.is_whitespace() {
            chars.next();
            continue;
        }

        let token = match character {
            '0'..='9' | '.' => lex_number(input, &mut chars)?,
            '\'' | '"' => lex_string(&mut chars, offset)?,
            c if c.is_alphabetic() || c == '_' => lex_identifier(input, &mut chars),
            _ => lex_operator(&mut chars, offset, character)?,
        };

        tokens.push(SpannedToken { token, offset });
    }

    Ok(tokens)
}

fn take_while(
    input: &str,
    chars: &mut Peekable<CharIndices<'_>>,
    predicate: impl Fn(char) -> bool,
) -> String {
    let start = chars.peek().map(|&(offset, _)| offset).unwrap_or(input.len());
    let mut end = start;
    while let Some(&(offset, character)) = chars.peek() {
        if !predicate(character) {
            break;
        }
        end = offset + character.len_utf8();
        chars.next();
    }
    input[start..end].to_owned()
}

fn lex_number(
    input: &str,
    chars: &mut Peekable<CharIndices<'_>>,
) -> Result<Token, ExpressionError> {
    let mut literal = take_while(input, chars, |c| c.is_ascii_digit() || c == '.');

    // Exponent part, e.g. `1e3` or `2.5E-2`.
    if let Some(&(_, 'e' | 'E')) = chars.peek() {
        let mut lookahead = chars.clone();
        lookahead.next();
        let sign = match lookahead.peek() {
            Some(&(_, sign @ ('+' | '-'))) => {
                lookahead.next();
                Some(sign)
            }
            _ => None,
        };

        if matches!(lookahead.peek(), Some(&(_, c)) if c.is_ascii_digit()) {
            *chars = lookahead;
            literal.push('e');
            if let Some(sign) = sign {
                literal.push(sign);
            }
            literal.push_str(&take_while(input, chars, |c| c.is_ascii_digit()));
        }
    }

    if literal.contains(['.', 'e']) {
        literal
            .parse::<f64>()
            .map(Token::Float)
            .map_err(|_| ExpressionError::InvalidNumber(literal))
    } else {
        literal
            .parse::<i64>()
            .map(Token::Int)
            .map_err(|_| ExpressionError::InvalidNumber(literal))
    }
}

fn lex_string(
    chars: &mut Peekable<CharIndices<'_>>,
    offset: usize,
) -> Result<Token, ExpressionError> {
    let Some((_, quote)) = chars.next() else {
        return Err(ExpressionError::UnterminatedString { offset });
    };

    let mut value = String::new();
    loop {
        match chars.next() {
            Some((_, '\\')) => match chars.next() {
                Some((_, escaped)) => value.push(escaped),
                None => return Err(ExpressionError::UnterminatedString { offset }),
            },
            Some((_, character)) if character == quote => return Ok(Token::Str(value)),
            Some((_, character)) => value.push(character),
            None => return Err(ExpressionError::UnterminatedString { offset }),
        }
    }
}

fn lex_identifier(input: &str, chars: &mut Peekable<CharIndices<'_>>) -> Token {
    let name = take_while(input, chars, |c| c.is_alphanumeric() || c == '_');
    match name.as_str() {
        "True" | "true" => Token::Bool(true),
        "False" | "false" => Token::Bool(false),
        _ => Token::Ident(name),
    }
}

fn lex_operator(
    chars: &mut Peekable<CharIndices<'_>>,
    offset: usize,
    character: char,
) -> Result<Token, ExpressionError> {
    chars.next();

    let followed_by_eq = matches!(chars.peek(), Some(&(_, '=')));
    let token = match character {
        '+' => Token::Plus,
        '-' => Token::Minus,
        '*' => Token::Star,
        '/' => Token::Slash,
        '(' => Token::LParen,
        ')' => Token::RParen,
        '<' if followed_by_eq => Token::Le,
        '<' => Token::Lt,
        '>' if followed_by_eq => Token::Ge,
        '>' => Token::Gt,
        '=' if followed_by_eq => Token::Eq,
        '!' if followed_by_eq => Token::NotEq,
        _ => {
            return Err(ExpressionError::UnexpectedCharacter { character, offset });
        }
    };

    if matches!(token, Token::Le | Token::Ge | Token::Eq | Token::NotEq) {
        chars.next();
    }

    Ok(token)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokens(input: &str) -> Vec<Token> {
        tokenize(input)
            .unwrap()
            .into_iter()
            .map(|spanned| spanned.token)
            .collect()
    }

    #[test]
    fn test_tokenize_arithmetic() {
        assert_eq!(
            tokens("x * 2 + (cost / 1.5)"),
            vec![
                Token::Ident(String::from("x")),
                Token::Star,
                Token::Int(2),
                Token::Plus,
                Token::LParen,
                Token::Ident(String::from("cost")),
                Token::Slash,
                Token::Float(1.5),
                Token::RParen,
            ]
        );
    }

    #[test]
    fn test_tokenize_comparisons() {
        assert_eq!(
            tokens("a<=b != c >= d == e < f > g"),
            vec![
                Token::Ident(String::from("a")),
                Token::Le,
                Token::Ident(String::from("b")),
                Token::NotEq,
                Token::Ident(String::from("c")),
                Token::Ge,
                Token::Ident(String::from("d")),
                Token::Eq,
                Token::Ident(String::from("e")),
                Token::Lt,
                Token::Ident(String::from("f")),
                Token::Gt,
                Token::Ident(String::from("g")),
            ]
        );
    }

    #[test]
    fn test_tokenize_literals() {
        assert_eq!(
            tokens("'it\\'s' \"B\" True false 1e3 2.5E-1 .5"),
            vec![
                Token::Str(String::from("it's")),
                Token::Str(String::from("B")),
                Token::Bool(true),
                Token::Bool(false),
                Token::Float(1000.0),
                Token::Float(0.25),
                Token::Float(0.5),
            ]
        );
    }

    #[test]
    fn test_tokenize_offsets() {
        let spanned = tokenize("  x +y").unwrap();
        assert_eq!(
            spanned.iter().map(|s| s.offset).collect::<Vec<_>>(),
            vec![2, 4, 5]
        );
    }

    #[test]
    fn test_tokenize_errors() {
        assert_eq!(
            tokenize("x = 1"),
            Err(ExpressionError::UnexpectedCharacter {
                character: '=',
                offset: 2
            })
        );
        assert_eq!(
            tokenize("__import__('os').system('ls')"),
            Err(ExpressionError::InvalidNumber(String::from(".")))
        );
        assert_eq!(
            tokenize("x; y"),
            Err(ExpressionError::UnexpectedCharacter {
                character: ';',
                offset: 1
            })
        );
        assert_eq!(
            tokenize("'open"),
            Err(ExpressionError::UnterminatedString { offset: 0 })
        );
        assert_eq!(
            tokenize("99999999999999999999"),
            Err(ExpressionError::InvalidNumber(String::from(
                "99999999999999999999"
            )))
        );
        assert_eq!(
            tokenize("1.2.3"),
            Err(ExpressionError::InvalidNumber(String::from("1.2.3")))
        );
    }
}
