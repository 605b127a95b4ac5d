use rayon::prelude::*;
use tracing::{debug, instrument};

use crate::{
    expression::{
        compiled_expression::{CompiledExpression, ExpressionScope},
        error::ExpressionError,
    },
    schedule::schedule_table::{ColumnIdx, ScheduleTable},
    rules::{
        error::{RuleBranch, RuleError},
        weight_rule::{CategoryMap, RuleValue, WeightRule, WeightRules},
    },
};

/// Row-wise penalty of a single rule, bound to one table.
#[derive(Debug, Clone)]
pub enum PenaltyExpr {
    Zero,
    Formula(CompiledExpression),
    Categories {
        primary: ColumnIdx,
        branches: Vec<(String, CompiledExpression)>,
        default: Option<CompiledExpression>,
    },
}

impl PenaltyExpr {
    pub fn evaluate(&self, table: &ScheduleTable, row: usize) -> Result<i64, ExpressionError> {
        match self {
            PenaltyExpr::Zero => Ok(0),
            PenaltyExpr::Formula(expr) => expr.evaluate(table, row),
            PenaltyExpr::Categories {
                primary,
                branches,
                default,
            } => {
                let key = table.value(row, *primary).category_key();
                let branch = key.and_then(|key| {
                    branches
                        .iter()
                        .find(|(category, _)| *category == key)
                        .map(|(_, expr)| expr)
                });

                match branch.or(default.as_ref()) {
                    Some(expr) => expr.evaluate(table, row),
                    None => Ok(0),
                }
            }
        }
    }
}

fn compile_formula(
    rule: &WeightRule,
    branch: RuleBranch,
    formula: &str,
    scope: &ExpressionScope,
) -> Result<CompiledExpression, RuleError> {
    CompiledExpression::compile_str(formula, scope).map_err(|source| RuleError::Compile {
        primary: rule.primary().to_owned(),
        branch,
        formula: formula.to_owned(),
        source,
    })
}

fn compile_categories(
    rule: &WeightRule,
    categories: &CategoryMap,
    table: &ScheduleTable,
) -> Result<PenaltyExpr, RuleError> {
    let primary = table.column_index(rule.primary());
    let scope = ExpressionScope::new(table, primary);

    let default = categories
        .default_formula()
        .map(|formula| compile_formula(rule, RuleBranch::Default, formula, &scope))
        .transpose()?;

    // Without branches the primary column is never read.
    if categories.branches().is_empty() {
        return Ok(default.map_or(PenaltyExpr::Zero, PenaltyExpr::Formula));
    }

    let primary = primary.ok_or_else(|| RuleError::UnknownPrimaryColumn {
        primary: rule.primary().to_owned(),
    })?;

    let branches = categories
        .branches()
        .iter()
        .map(|(category, formula)| {
            let branch = RuleBranch::Category(category.clone());
            compile_formula(rule, branch, formula, &scope).map(|expr| (category.clone(), expr))
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(PenaltyExpr::Categories {
        primary,
        branches,
        default,
    })
}

/// Binds a rule to the columns of `table`. Unknown identifiers and type
/// errors are reported here, before any row is evaluated.
pub fn compile_rule(rule: &WeightRule, table: &ScheduleTable) -> Result<PenaltyExpr, RuleError> {
    match rule.value() {
        RuleValue::Empty => Ok(PenaltyExpr::Zero),
        RuleValue::Formula(formula) => {
            let scope = ExpressionScope::new(table, table.column_index(rule.primary()));
            compile_formula(rule, RuleBranch::Formula, formula, &scope).map(PenaltyExpr::Formula)
        }
        RuleValue::Categories(categories) => compile_categories(rule, categories, table),
    }
}

#[derive(Debug, Clone)]
pub struct CompiledRule {
    primary: String,
    expr: PenaltyExpr,
}

impl CompiledRule {
    pub fn primary(&self) -> &str {
        &self.primary
    }

    pub fn evaluate(&self, table: &ScheduleTable, row: usize) -> Result<i64, RuleError> {
        self.expr
            .evaluate(table, row)
            .map_err(|source| RuleError::Evaluate {
                primary: self.primary.clone(),
                source,
            })
    }
}

/// Every rule of a document compiled against one table.
#[derive(Debug, Clone)]
pub struct PenaltyModel {
    rules: Vec<CompiledRule>,
}

impl PenaltyModel {
    #[instrument(skip_all, level = "debug")]
    pub fn compile(rules: &WeightRules, table: &ScheduleTable) -> Result<Self, RuleError> {
        let rules = rules
            .rules()
            .iter()
            .map(|rule| {
                compile_rule(rule, table).map(|expr| CompiledRule {
                    primary: rule.primary().to_owned(),
                    expr,
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        debug!("Compiled {} weight rules", rules.len());
        Ok(PenaltyModel { rules })
    }

    pub fn row_penalty(&self, table: &ScheduleTable, row: usize) -> Result<i64, RuleError> {
        self.rules.iter().try_fold(0_i64, |total, rule| {
            let penalty = rule.evaluate(table, row)?;
            total
                .checked_add(penalty)
                .ok_or(RuleError::PenaltyOverflow { row })
        })
    }

    /// Sum of every rule's penalty, one value per row. Rows are evaluated in
    /// parallel; the reported error is the one of the lowest failing row.
    pub fn total_penalty(&self, table: &ScheduleTable) -> Result<Vec<i64>, RuleError> {
        (0..table.len())
            .into_par_iter()
            .map(|row| self.row_penalty(table, row))
            .collect::<Vec<_>>()
            .into_iter()
            .collect()
    }
}

/// Compiles `rules` against `table` and returns the total penalty per row.
pub fn total_penalty(rules: &WeightRules, table: &ScheduleTable) -> Result<Vec<i64>, RuleError> {
    PenaltyModel::compile(rules, table)?.total_penalty(table)
}
