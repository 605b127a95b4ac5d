use std::{borrow::Cow, fmt::Display};

/// Static type of a table column or of a compiled expression.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueType {
    Int,
    Float,
    Bool,
    Str,
}

impl ValueType {
    pub fn is_numeric(&self) -> bool {
        matches!(self, ValueType::Int | ValueType::Float | ValueType::Bool)
    }
}

impl Display for ValueType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ValueType::Int => write!(f, "int"),
            ValueType::Float => write!(f, "float"),
            ValueType::Bool => write!(f, "bool"),
            ValueType::Str => write!(f, "str"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Int(i64),
    Float(f64),
    Bool(bool),
    Str(String),
    Null,
}

impl Value {
    pub fn value_type(&self) -> Option<ValueType> {
        match self {
            Value::Int(_) => Some(ValueType::Int),
            Value::Float(_) => Some(ValueType::Float),
            Value::Bool(_) => Some(ValueType::Bool),
            Value::Str(_) => Some(ValueType::Str),
            Value::Null => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(value) => Some(value),
            _ => None,
        }
    }

    /// The text a category key is compared against. Null cells never match.
    pub fn category_key(&self) -> Option<Cow<'_, str>> {
        match self {
            Value::Str(value) => Some(Cow::Borrowed(value)),
            Value::Null => None,
            other => Some(Cow::Owned(other.to_string())),
        }
    }

    /// Parses a raw cell into the given column type. Empty cells are null.
    pub fn parse_as(raw: &str, value_type: ValueType) -> Option<Value> {
        if raw.is_empty() {
            return Some(Value::Null);
        }

        match value_type {
            ValueType::Int => raw.parse().ok().map(Value::Int),
            ValueType::Float => parse_finite(raw).map(Value::Float),
            ValueType::Bool => parse_bool(raw).map(Value::Bool),
            ValueType::Str => Some(Value::Str(raw.to_owned())),
        }
    }
}

impl Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Value::Int(value) => write!(f, "{value}"),
            Value::Float(value) => write!(f, "{value}"),
            Value::Bool(value) => write!(f, "{value}"),
            Value::Str(value) => write!(f, "{value}"),
            Value::Null => write!(f, "null"),
        }
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Int(value)
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Float(value)
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Bool(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::Str(value.to_owned())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::Str(value)
    }
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw {
        "true" | "True" | "TRUE" => Some(true),
        "false" | "False" | "FALSE" => Some(false),
        _ => None,
    }
}

/// `inf` and `NaN` are codes, not numbers.
fn parse_finite(raw: &str) -> Option<f64> {
    raw.parse::<f64>().ok().filter(|value| value.is_finite())
}

/// Infers the narrowest type every non-empty cell parses as.
pub fn infer_value_type<'a>(cells: impl IntoIterator<Item = &'a str>) -> ValueType {
    let cells = cells
        .into_iter()
        .filter(|cell| !cell.is_empty())
        .collect::<Vec<_>>();
    if cells.is_empty() {
        return ValueType::Str;
    }

    if cells.iter().all(|cell| cell.parse::<i64>().is_ok()) {
        ValueType::Int
    } else if cells.iter().all(|cell| parse_finite(cell).is_some()) {
        ValueType::Float
    } else if cells.iter().all(|cell| parse_bool(cell).is_some()) {
        ValueType::Bool
    } else {
        ValueType::Str
    }
}
