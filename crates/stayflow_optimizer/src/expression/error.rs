use thiserror::Error;

use crate::schedule::value::ValueType;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ExpressionError {
    #[error("Unexpected character `{character}` at offset {offset}")]
    UnexpectedCharacter { character: char, offset: usize },
    #[error("Unterminated string literal starting at offset {offset}")]
    UnterminatedString { offset: usize },
    #[error("Invalid number literal `{0}`")]
    InvalidNumber(String),
    #[error("Unexpected `{found}` at offset {offset}, expected {expected}")]
    UnexpectedToken {
        found: String,
        offset: usize,
        expected: &'static str,
    },
    #[error("Unexpected end of expression, expected {expected}")]
    UnexpectedEnd { expected: &'static str },
    #[error("Comparisons cannot be chained (offset {offset})")]
    ChainedComparison { offset: usize },
    #[error("Unknown identifier `{0}`")]
    UnknownIdentifier(String),
    #[error("Operator `{operator}` cannot be applied to {lhs} and {rhs}")]
    InvalidOperands {
        operator: &'static str,
        lhs: ValueType,
        rhs: ValueType,
    },
    #[error("Operator `{operator}` cannot be applied to {operand}")]
    InvalidOperand {
        operator: &'static str,
        operand: ValueType,
    },
    #[error("Expression evaluates to {0}, expected a number")]
    NonNumericResult(ValueType),
    #[error("Division by zero at row {row}")]
    DivisionByZero { row: usize },
    #[error("Integer overflow at row {row}")]
    Overflow { row: usize },
    #[error("Column `{column}` is empty at row {row}")]
    NullOperand { column: String, row: usize },
    #[error("Value {value} at row {row} cannot be cast to an integer")]
    NotCastable { value: f64, row: usize },
}
