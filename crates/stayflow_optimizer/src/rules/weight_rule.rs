/// Category key that marks the fallback formula of a category rule.
pub const DEFAULT_CATEGORY: &str = "_";

/// Formulas of a category rule. `branches` never contains
/// [`DEFAULT_CATEGORY`]; its formula lives in `default`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CategoryMap {
    branches: Vec<(String, String)>,
    default: Option<String>,
}

impl CategoryMap {
    pub fn new(branches: Vec<(String, String)>, default: Option<String>) -> Self {
        CategoryMap { branches, default }
    }

    /// Splits `(category, formula)` entries into branches and the `_`
    /// default without touching the input.
    pub fn from_entries<I, K, V>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let mut branches = Vec::new();
        let mut default = None;

        for (category, formula) in entries {
            let category = category.into();
            if category == DEFAULT_CATEGORY {
                default = Some(formula.into());
            } else {
                branches.push((category, formula.into()));
            }
        }

        CategoryMap { branches, default }
    }

    pub fn branches(&self) -> &[(String, String)] {
        &self.branches
    }

    pub fn default_formula(&self) -> Option<&str> {
        self.default.as_deref()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RuleValue {
    /// One formula applied to every row.
    Formula(String),
    /// One formula per value of the primary column, with an optional
    /// fallback.
    Categories(CategoryMap),
    /// Contributes 0 to every row.
    Empty,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WeightRule {
    primary: String,
    value: RuleValue,
}

impl WeightRule {
    pub fn new(primary: impl Into<String>, value: RuleValue) -> Self {
        WeightRule {
            primary: primary.into(),
            value,
        }
    }

    pub fn formula(primary: impl Into<String>, formula: impl Into<String>) -> Self {
        Self::new(primary, RuleValue::Formula(formula.into()))
    }

    pub fn categories<I, K, V>(primary: impl Into<String>, entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self::new(
            primary,
            RuleValue::Categories(CategoryMap::from_entries(entries)),
        )
    }

    pub fn primary(&self) -> &str {
        &self.primary
    }

    pub fn value(&self) -> &RuleValue {
        &self.value
    }
}

/// All rules of a weight document, in document order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WeightRules {
    rules: Vec<WeightRule>,
}

impl WeightRules {
    pub fn new(rules: Vec<WeightRule>) -> Self {
        WeightRules { rules }
    }

    pub fn rules(&self) -> &[WeightRule] {
        &self.rules
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

impl FromIterator<WeightRule> for WeightRules {
    fn from_iter<T: IntoIterator<Item = WeightRule>>(iter: T) -> Self {
        WeightRules {
            rules: iter.into_iter().collect(),
        }
    }
}
