use std::cmp::Ordering;

use crate::{
    expression::{
        error::ExpressionError,
        parser::{BinaryOp, Expr, UnaryOp},
    },
    schedule::{
        schedule_table::{ColumnIdx, ScheduleTable},
        value::{Value, ValueType},
    },
};

/// Name under which the rule's primary column is visible to a formula.
pub const PRIMARY_ALIAS: &str = "x";

/// Binds identifiers to columns of a table. `x` resolves to the primary
/// column unless the table has a column literally named `x`.
pub struct ExpressionScope<'a> {
    table: &'a ScheduleTable,
    primary: Option<ColumnIdx>,
}

impl<'a> ExpressionScope<'a> {
    pub fn new(table: &'a ScheduleTable, primary: Option<ColumnIdx>) -> Self {
        ExpressionScope { table, primary }
    }

    fn resolve(&self, name: &str) -> Result<ColumnIdx, ExpressionError> {
        if let Some(column) = self.table.column_index(name) {
            return Ok(column);
        }

        match self.primary {
            Some(primary) if name == PRIMARY_ALIAS => Ok(primary),
            _ => Err(ExpressionError::UnknownIdentifier(name.to_owned())),
        }
    }
}

#[derive(Debug, Clone)]
enum CompiledNode {
    Literal(Value),
    Column(ColumnIdx),
    Unary {
        op: UnaryOp,
        operand: Box<CompiledNode>,
    },
    Binary {
        op: BinaryOp,
        lhs: Box<CompiledNode>,
        rhs: Box<CompiledNode>,
    },
}

/// A formula with identifiers resolved to column indices and a numeric
/// result type. Evaluating it can only fail on row data (nulls, division by
/// zero, overflow), never on names or types.
#[derive(Debug, Clone)]
pub struct CompiledExpression {
    root: CompiledNode,
    result_type: ValueType,
}

impl CompiledExpression {
    pub fn compile(expr: &Expr, scope: &ExpressionScope) -> Result<Self, ExpressionError> {
        let (root, result_type) = compile_node(expr, scope)?;

        if !result_type.is_numeric() {
            return Err(ExpressionError::NonNumericResult(result_type));
        }

        Ok(CompiledExpression { root, result_type })
    }

    pub fn compile_str(formula: &str, scope: &ExpressionScope) -> Result<Self, ExpressionError> {
        Self::compile(&Expr::parse(formula)?, scope)
    }

    pub fn result_type(&self) -> ValueType {
        self.result_type
    }

    /// Evaluates the expression on one row and casts the result to `i64`.
    /// Floats are truncated toward zero.
    pub fn evaluate(&self, table: &ScheduleTable, row: usize) -> Result<i64, ExpressionError> {
        match evaluate_node(&self.root, table, row)? {
            Value::Int(value) => Ok(value),
            Value::Bool(value) => Ok(i64::from(value)),
            Value::Float(value) => float_to_int(value, row),
            // Excluded by the type check in `compile`.
            Value::Str(_) | Value::Null => {
                Err(ExpressionError::NonNumericResult(self.result_type))
            }
        }
    }
}

fn compile_node(
    expr: &Expr,
    scope: &ExpressionScope,
) -> Result<(CompiledNode, ValueType), ExpressionError> {
    match expr {
        Expr::Literal(value) => {
            let value_type = value.value_type().unwrap_or(ValueType::Str);
            Ok((CompiledNode::Literal(value.clone()), value_type))
        }
        Expr::Identifier(name) => {
            let column = scope.resolve(name)?;
            let value_type = scope.table.column(column).value_type();
            Ok((CompiledNode::Column(column), value_type))
        }
        Expr::Unary { op, operand } => {
            let (operand, operand_type) = compile_node(operand, scope)?;
            let value_type = match operand_type {
                ValueType::Int | ValueType::Bool => ValueType::Int,
                ValueType::Float => ValueType::Float,
                ValueType::Str => {
                    return Err(ExpressionError::InvalidOperand {
                        operator: op.symbol(),
                        operand: operand_type,
                    });
                }
            };

            Ok((
                CompiledNode::Unary {
                    op: *op,
                    operand: Box::new(operand),
                },
                value_type,
            ))
        }
        Expr::Binary { op, lhs, rhs } => {
            let (lhs, lhs_type) = compile_node(lhs, scope)?;
            let (rhs, rhs_type) = compile_node(rhs, scope)?;
            let value_type = binary_result_type(*op, lhs_type, rhs_type)?;

            Ok((
                CompiledNode::Binary {
                    op: *op,
                    lhs: Box::new(lhs),
                    rhs: Box::new(rhs),
                },
                value_type,
            ))
        }
    }
}

fn binary_result_type(
    op: BinaryOp,
    lhs: ValueType,
    rhs: ValueType,
) -> Result<ValueType, ExpressionError> {
    let invalid = || ExpressionError::InvalidOperands {
        operator: op.symbol(),
        lhs,
        rhs,
    };

    if op.is_comparison() {
        return match (lhs, rhs) {
            (ValueType::Str, ValueType::Str) => Ok(ValueType::Bool),
            (lhs, rhs) if lhs.is_numeric() && rhs.is_numeric() => Ok(ValueType::Bool),
            _ => Err(invalid()),
        };
    }

    if !lhs.is_numeric() || !rhs.is_numeric() {
        return Err(invalid());
    }

    match op {
        BinaryOp::Div => Ok(ValueType::Float),
        _ if lhs == ValueType::Float || rhs == ValueType::Float => Ok(ValueType::Float),
        _ => Ok(ValueType::Int),
    }
}

#[derive(Debug, Clone, Copy)]
enum Number {
    Int(i64),
    Float(f64),
}

impl Number {
    fn from_value(value: &Value) -> Option<Number> {
        match value {
            Value::Int(value) => Some(Number::Int(*value)),
            Value::Float(value) => Some(Number::Float(*value)),
            Value::Bool(value) => Some(Number::Int(i64::from(*value))),
            Value::Str(_) | Value::Null => None,
        }
    }

    fn as_f64(self) -> f64 {
        match self {
            Number::Int(value) => value as f64,
            Number::Float(value) => value,
        }
    }
}

fn evaluate_node(
    node: &CompiledNode,
    table: &ScheduleTable,
    row: usize,
) -> Result<Value, ExpressionError> {
    match node {
        CompiledNode::Literal(value) => Ok(value.clone()),
        CompiledNode::Column(column) => match table.value(row, *column) {
            Value::Null => Err(ExpressionError::NullOperand {
                column: table.column(*column).name().to_owned(),
                row,
            }),
            value => Ok(value.clone()),
        },
        CompiledNode::Unary { op, operand } => {
            let operand = evaluate_node(operand, table, row)?;
            let number = expect_number(&operand, op.symbol())?;

            match (op, number) {
                (UnaryOp::Plus, Number::Int(value)) => Ok(Value::Int(value)),
                (UnaryOp::Plus, Number::Float(value)) => Ok(Value::Float(value)),
                (UnaryOp::Neg, Number::Int(value)) => value
                    .checked_neg()
                    .map(Value::Int)
                    .ok_or(ExpressionError::Overflow { row }),
                (UnaryOp::Neg, Number::Float(value)) => Ok(Value::Float(-value)),
            }
        }
        CompiledNode::Binary { op, lhs, rhs } => {
            let lhs = evaluate_node(lhs, table, row)?;
            let rhs = evaluate_node(rhs, table, row)?;

            if op.is_comparison() {
                return compare(*op, &lhs, &rhs).map(Value::Bool);
            }

            let lhs = expect_number(&lhs, op.symbol())?;
            let rhs = expect_number(&rhs, op.symbol())?;
            arithmetic(*op, lhs, rhs, row)
        }
    }
}

fn expect_number(value: &Value, operator: &'static str) -> Result<Number, ExpressionError> {
    Number::from_value(value).ok_or_else(|| ExpressionError::InvalidOperand {
        operator,
        operand: value.value_type().unwrap_or(ValueType::Str),
    })
}

fn arithmetic(op: BinaryOp, lhs: Number, rhs: Number, row: usize) -> Result<Value, ExpressionError> {
    if op == BinaryOp::Div {
        let divisor = rhs.as_f64();
        if divisor == 0.0 {
            return Err(ExpressionError::DivisionByZero { row });
        }
        return Ok(Value::Float(lhs.as_f64() / divisor));
    }

    match (lhs, rhs) {
        (Number::Int(lhs), Number::Int(rhs)) => {
            let result = match op {
                BinaryOp::Add => lhs.checked_add(rhs),
                BinaryOp::Sub => lhs.checked_sub(rhs),
                BinaryOp::Mul => lhs.checked_mul(rhs),
                _ => None,
            };
            result
                .map(Value::Int)
                .ok_or(ExpressionError::Overflow { row })
        }
        (lhs, rhs) => {
            let (lhs, rhs) = (lhs.as_f64(), rhs.as_f64());
            match op {
                BinaryOp::Add => Ok(Value::Float(lhs + rhs)),
                BinaryOp::Sub => Ok(Value::Float(lhs - rhs)),
                BinaryOp::Mul => Ok(Value::Float(lhs * rhs)),
                _ => Err(ExpressionError::Overflow { row }),
            }
        }
    }
}

fn compare(op: BinaryOp, lhs: &Value, rhs: &Value) -> Result<bool, ExpressionError> {
    let ordering = match (lhs, rhs) {
        (Value::Str(lhs), Value::Str(rhs)) => Some(lhs.cmp(rhs)),
        _ => {
            let lhs_number = expect_number(lhs, op.symbol())?;
            let rhs_number = expect_number(rhs, op.symbol())?;
            match (lhs_number, rhs_number) {
                (Number::Int(lhs), Number::Int(rhs)) => Some(lhs.cmp(&rhs)),
                (lhs, rhs) => lhs.as_f64().partial_cmp(&rhs.as_f64()),
            }
        }
    };

    // NaN compares unequal to everything.
    let Some(ordering) = ordering else {
        return Ok(op == BinaryOp::NotEq);
    };

    Ok(match op {
        BinaryOp::Eq => ordering == Ordering::Equal,
        BinaryOp::NotEq => ordering != Ordering::Equal,
        BinaryOp::Lt => ordering == Ordering::Less,
        BinaryOp::Le => ordering != Ordering::Greater,
        BinaryOp::Gt => ordering == Ordering::Greater,
        BinaryOp::Ge => ordering != Ordering::Less,
        BinaryOp::Add | BinaryOp::Sub | BinaryOp::Mul | BinaryOp::Div => false,
    })
}

fn float_to_int(value: f64, row: usize) -> Result<i64, ExpressionError> {
    // i64::MAX is not representable as f64; 2^63 is the first value past it.
    const UPPER: f64 = 9_223_372_036_854_775_808.0;

    if !value.is_finite() || value >= UPPER || value < -UPPER {
        return Err(ExpressionError::NotCastable { value, row });
    }

    Ok(value.trunc() as i64)
}
