use std::{collections::BTreeMap, fs::File, io::Read, path::Path};

use schemars::{JsonSchema, schema_for};
use serde::Deserialize;
use tracing::{debug, instrument};

use crate::rules::{
    error::RuleError,
    weight_rule::{CategoryMap, RuleValue, WeightRule, WeightRules},
};

/// Raw weight document as written by users, e.g.
///
/// ```yaml
/// spec:
///   category:
///     A: "x * 2"
///     _: "0"
///   cost: "x / 10"
/// ```
///
/// Rule values are kept untyped here so that a malformed rule can be
/// reported by key.
#[derive(Deserialize, JsonSchema)]
#[serde(deny_unknown_fields, rename = "WeightDocument")]
pub struct JsonWeightDocument {
    #[schemars(with = "BTreeMap<String, Option<JsonRuleValue>>")]
    pub spec: BTreeMap<String, serde_json::Value>,
}

/// Shape of a single rule value, used for schema generation.
#[derive(Deserialize, JsonSchema)]
#[serde(untagged, rename = "RuleValue")]
pub enum JsonRuleValue {
    Formula(String),
    Categories(BTreeMap<String, String>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    Json,
    Yaml,
}

impl DocumentFormat {
    /// `.json` files are JSON, anything else is read as YAML.
    pub fn from_path(path: &Path) -> DocumentFormat {
        match path.extension().and_then(|extension| extension.to_str()) {
            Some(extension) if extension.eq_ignore_ascii_case("json") => DocumentFormat::Json,
            _ => DocumentFormat::Yaml,
        }
    }
}

impl JsonWeightDocument {
    pub fn from_reader<R: Read>(reader: R, format: DocumentFormat) -> Result<Self, RuleError> {
        match format {
            DocumentFormat::Json => Ok(serde_json::from_reader(reader)?),
            DocumentFormat::Yaml => Ok(serde_yaml::from_reader(reader)?),
        }
    }

    /// Validates every rule and converts the document into typed rules.
    #[instrument(skip_all, level = "debug")]
    pub fn build_rules(&self) -> Result<WeightRules, RuleError> {
        let rules = self
            .spec
            .iter()
            .map(|(primary, value)| parse_rule(primary, value))
            .collect::<Result<WeightRules, _>>()?;

        debug!("Parsed {} weight rules", rules.len());
        Ok(rules)
    }
}

impl WeightRules {
    pub fn from_reader<R: Read>(reader: R, format: DocumentFormat) -> Result<Self, RuleError> {
        JsonWeightDocument::from_reader(reader, format)?.build_rules()
    }

    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, RuleError> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|source| RuleError::Open {
            path: path.to_path_buf(),
            source,
        })?;

        Self::from_reader(file, DocumentFormat::from_path(path))
    }
}

pub fn generate_json_schema() -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(&schema_for!(JsonWeightDocument))
}

fn json_type_name(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "a boolean",
        serde_json::Value::Number(_) => "a number",
        serde_json::Value::String(_) => "a string",
        serde_json::Value::Array(_) => "a list",
        serde_json::Value::Object(_) => "a mapping",
    }
}

fn parse_rule(primary: &str, value: &serde_json::Value) -> Result<WeightRule, RuleError> {
    if primary.trim().is_empty() {
        return Err(RuleError::EmptyPrimary);
    }

    let rule_value = match value {
        serde_json::Value::Null => RuleValue::Empty,
        serde_json::Value::String(formula) if formula.trim().is_empty() => RuleValue::Empty,
        serde_json::Value::String(formula) => RuleValue::Formula(formula.clone()),
        serde_json::Value::Object(categories) => {
            let entries = categories
                .iter()
                .map(|(category, formula)| match formula {
                    serde_json::Value::String(formula) => Ok((category.as_str(), formula.as_str())),
                    other => Err(RuleError::InvalidCategoryValue {
                        primary: primary.to_owned(),
                        category: category.clone(),
                        found: json_type_name(other),
                    }),
                })
                .collect::<Result<Vec<_>, _>>()?;

            RuleValue::Categories(CategoryMap::from_entries(entries))
        }
        other => {
            return Err(RuleError::InvalidRuleValue {
                primary: primary.to_owned(),
                found: json_type_name(other),
            });
        }
    };

    Ok(WeightRule::new(primary, rule_value))
}
