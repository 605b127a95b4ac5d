use std::{fmt::Display, path::PathBuf};

use thiserror::Error;

use crate::expression::error::ExpressionError;

/// Which formula of a rule an error refers to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RuleBranch {
    Formula,
    Category(String),
    Default,
}

impl Display for RuleBranch {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RuleBranch::Formula => write!(f, "formula"),
            RuleBranch::Category(category) => write!(f, "category `{category}`"),
            RuleBranch::Default => write!(f, "default"),
        }
    }
}

#[derive(Error, Debug)]
pub enum RuleError {
    #[error("Failed to open weight document {path}")]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Invalid JSON weight document")]
    Json(#[from] serde_json::Error),
    #[error("Invalid YAML weight document")]
    Yaml(#[from] serde_yaml::Error),
    #[error("Rule keys must not be empty")]
    EmptyPrimary,
    #[error(
        "Invalid rule `{primary}`: expected a formula string or a mapping of categories to formula strings, found {found}"
    )]
    InvalidRuleValue { primary: String, found: &'static str },
    #[error("Invalid rule `{primary}`: category `{category}` must map to a formula string, found {found}")]
    InvalidCategoryValue {
        primary: String,
        category: String,
        found: &'static str,
    },
    #[error("Rule `{primary}` refers to unknown column `{primary}`")]
    UnknownPrimaryColumn { primary: String },
    #[error("Rule `{primary}` ({branch}): invalid formula `{formula}`")]
    Compile {
        primary: String,
        branch: RuleBranch,
        formula: String,
        #[source]
        source: ExpressionError,
    },
    #[error("Rule `{primary}` failed to evaluate")]
    Evaluate {
        primary: String,
        #[source]
        source: ExpressionError,
    },
    #[error("Total penalty overflows at row {row}")]
    PenaltyOverflow { row: usize },
}
