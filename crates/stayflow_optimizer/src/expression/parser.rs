use std::fmt::Display;

use crate::{
    expression::{
        error::ExpressionError,
        token::{SpannedToken, Token, tokenize},
    },
    schedule::value::Value,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
    Neg,
    Plus,
}

impl UnaryOp {
    pub fn symbol(&self) -> &'static str {
        match self {
            UnaryOp::Neg => "-",
            UnaryOp::Plus => "+",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
    Eq,
    NotEq,
    Lt,
    Le,
    Gt,
    Ge,
}

impl BinaryOp {
    pub fn symbol(&self) -> &'static str {
        match self {
            BinaryOp::Add => "+",
            BinaryOp::Sub => "-",
            BinaryOp::Mul => "*",
            BinaryOp::Div => "/",
            BinaryOp::Eq => "==",
            BinaryOp::NotEq => "!=",
            BinaryOp::Lt => "<",
            BinaryOp::Le => "<=",
            BinaryOp::Gt => ">",
            BinaryOp::Ge => ">=",
        }
    }

    pub fn is_comparison(&self) -> bool {
        !matches!(
            self,
            BinaryOp::Add | BinaryOp::Sub | BinaryOp::Mul | BinaryOp::Div
        )
    }

    fn from_comparison_token(token: &Token) -> Option<BinaryOp> {
        match token {
            Token::Eq => Some(BinaryOp::Eq),
            Token::NotEq => Some(BinaryOp::NotEq),
            Token::Lt => Some(BinaryOp::Lt),
            Token::Le => Some(BinaryOp::Le),
            Token::Gt => Some(BinaryOp::Gt),
            Token::Ge => Some(BinaryOp::Ge),
            _ => None,
        }
    }
}

/// Untyped syntax tree of a formula.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Literal(Value),
    Identifier(String),
    Unary {
        op: UnaryOp,
        operand: Box<Expr>,
    },
    Binary {
        op: BinaryOp,
        lhs: Box<Expr>,
        rhs: Box<Expr>,
    },
}

impl Expr {
    pub fn parse(input: &str) -> Result<Expr, ExpressionError> {
        let tokens = tokenize(input)?;
        let mut parser = Parser { tokens, position: 0 };

        let expr = parser.parse_comparison()?;
        if let Some(spanned) = parser.peek() {
            return Err(ExpressionError::UnexpectedToken {
                found: spanned.token.to_string(),
                offset: spanned.offset,
                expected: "an operator or end of expression",
            });
        }

        Ok(expr)
    }
}

impl Display for Expr {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Expr::Literal(Value::Str(value)) => write!(f, "{value:?}"),
            Expr::Literal(value) => write!(f, "{value}"),
            Expr::Identifier(name) => write!(f, "{name}"),
            Expr::Unary { op, operand } => write!(f, "{}{}", op.symbol(), operand),
            Expr::Binary { op, lhs, rhs } => write!(f, "({} {} {})", lhs, op.symbol(), rhs),
        }
    }
}

struct Parser {
    tokens: Vec<SpannedToken>,
    position: usize,
}

impl Parser {
    fn peek(&self) -> Option<&SpannedToken> {
        self.tokens.get(self.position)
    }

    fn advance(&mut self) -> Option<SpannedToken> {
        let token = self.tokens.get(self.position).cloned();
        if token.is_some() {
            self.position += 1;
        }
        token
    }

    fn parse_comparison(&mut self) -> Result<Expr, ExpressionError> {
        let lhs = self.parse_additive()?;

        let Some(op) = self
            .peek()
            .and_then(|spanned| BinaryOp::from_comparison_token(&spanned.token))
        else {
            return Ok(lhs);
        };
        self.advance();

        let rhs = self.parse_additive()?;

        if let Some(spanned) = self.peek()
            && BinaryOp::from_comparison_token(&spanned.token).is_some()
        {
            return Err(ExpressionError::ChainedComparison {
                offset: spanned.offset,
            });
        }

        Ok(Expr::Binary {
            op,
            lhs: Box::new(lhs),
            rhs: Box::new(rhs),
        })
    }

    fn parse_additive(&mut self) -> Result<Expr, ExpressionError> {
        let mut lhs = self.parse_term()?;

        loop {
            let op = match self.peek().map(|spanned| &spanned.token) {
                Some(Token::Plus) => BinaryOp::Add,
                Some(Token::Minus) => BinaryOp::Sub,
                _ => return Ok(lhs),
            };
            self.advance();

            let rhs = self.parse_term()?;
            lhs = Expr::Binary {
                op,
                lhs: Box::new(lhs),
                rhs: Box::new(rhs),
            };
        }
    }

    fn parse_term(&mut self) -> Result<Expr, ExpressionError> {
        let mut lhs = self.parse_unary()?;

        loop {
            let op = match self.peek().map(|spanned| &spanned.token) {
                Some(Token::Star) => BinaryOp::Mul,
                Some(Token::Slash) => BinaryOp::Div,
                _ => return Ok(lhs),
            };
            self.advance();

            let rhs = self.parse_unary()?;
            lhs = Expr::Binary {
                op,
                lhs: Box::new(lhs),
                rhs: Box::new(rhs),
            };
        }
    }

    fn parse_unary(&mut self) -> Result<Expr, ExpressionError> {
        let op = match self.peek().map(|spanned| &spanned.token) {
            Some(Token::Minus) => UnaryOp::Neg,
            Some(Token::Plus) => UnaryOp::Plus,
            _ => return self.parse_primary(),
        };
        self.advance();

        let operand = self.parse_unary()?;
        Ok(Expr::Unary {
            op,
            operand: Box::new(operand),
        })
    }

    fn parse_primary(&mut self) -> Result<Expr, ExpressionError> {
        const EXPECTED: &str = "a literal, an identifier or `(`";

        let Some(SpannedToken { token, offset }) = self.advance() else {
            return Err(ExpressionError::UnexpectedEnd { expected: EXPECTED });
        };

        match token {
            Token::Int(value) => Ok(Expr::Literal(Value::Int(value))),
            Token::Float(value) => Ok(Expr::Literal(Value::Float(value))),
            Token::Str(value) => Ok(Expr::Literal(Value::Str(value))),
            Token::Bool(value) => Ok(Expr::Literal(Value::Bool(value))),
            Token::Ident(name) => Ok(Expr::Identifier(name)),
            Token::LParen => {
                let inner = self.parse_comparison()?;
                match self.advance() {
                    Some(SpannedToken {
                        token: Token::RParen,
                        ..
                    }) => Ok(inner),
                    Some(spanned) => Err(ExpressionError::UnexpectedToken {
                        found: spanned.token.to_string(),
                        offset: spanned.offset,
                        expected: "`)`",
                    }),
                    None => Err(ExpressionError::UnexpectedEnd { expected: "`)`" }),
                }
            }
            other => Err(ExpressionError::UnexpectedToken {
                found: other.to_string(),
                offset,
                expected: EXPECTED,
            }),
        }
    }
}
