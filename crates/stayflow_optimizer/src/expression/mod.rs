//! Closed arithmetic grammar used by weight rules.
//!
//! Formulas go through three stages: [`token::tokenize`] splits the input,
//! [`parser::Expr`] holds the untyped syntax tree and
//! [`compiled_expression::CompiledExpression`] binds identifiers to table
//! columns, checks operand types and evaluates one row at a time. Nothing in
//! here can reach outside the table it is bound to.

pub mod compiled_expression;
pub mod error;
pub mod parser;
pub mod token;
