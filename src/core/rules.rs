use crate::domain::model::{metric_class, Domain, DomainSignal};
use crate::utils::error::{LifeOpsError, Result};
use crate::utils::validation::Validate;
use serde::{Deserialize, Serialize};
use std::path::Path;

const DEFAULT_RULES: &str = include_str!("../../configs/default-rules.toml");

/// 匹配任意 metric 的萬用字元
pub const ANY_METRIC: &str = "*";

fn any_metric() -> String {
    ANY_METRIC.to_string()
}

/// One row of the cross-domain table:
/// `(trigger, metric class) -> (target, action template, weight)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rule {
    pub trigger: Domain,
    #[serde(default = "any_metric")]
    pub metric: String,
    pub target: Domain,
    pub action: String,
    pub weight: f64,
}

impl Rule {
    pub fn matches(&self, signal: &DomainSignal) -> bool {
        signal.domain == self.trigger
            && (self.metric == ANY_METRIC || metric_class(&self.metric) == signal.metric_class())
    }

    /// 將 action 模板中的佔位符替換為觸發訊號的內容
    pub fn render_action(&self, signal: &DomainSignal) -> String {
        self.action
            .replace("{metric}", &signal.metric)
            .replace("{value}", &format_number(signal.value))
            .replace("{severity}", &format!("{:.2}", signal.normalized_severity))
            .replace("{trigger}", self.trigger.as_str())
            .replace("{target}", self.target.as_str())
    }
}

fn format_number(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        format!("{:.2}", value)
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct RuleTable {
    #[serde(default)]
    pub rules: Vec<Rule>,
}

impl RuleTable {
    pub fn new(rules: Vec<Rule>) -> Self {
        Self { rules }
    }

    /// The table shipped in `configs/default-rules.toml`.
    pub fn builtin() -> Result<Self> {
        Self::from_toml_str(DEFAULT_RULES)
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let table: RuleTable =
            toml::from_str(content).map_err(|e| LifeOpsError::ConfigValidationError {
                field: "rules".to_string(),
                message: format!("TOML parsing error: {}", e),
            })?;
        table.validate()?;
        Ok(table)
    }

    /// Rules matching `signal`, with their declaration index.
    pub fn rules_for<'a>(
        &'a self,
        signal: &'a DomainSignal,
    ) -> impl Iterator<Item = (usize, &'a Rule)> + 'a {
        self.rules
            .iter()
            .enumerate()
            .filter(move |(_, rule)| rule.matches(signal))
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

impl Validate for RuleTable {
    fn validate(&self) -> Result<()> {
        if self.rules.is_empty() {
            return Err(LifeOpsError::MissingConfigError {
                field: "rules".to_string(),
            });
        }

        for (index, rule) in self.rules.iter().enumerate() {
            let invalid = |reason: String| LifeOpsError::InvalidRule { index, reason };

            if rule.trigger == rule.target {
                return Err(invalid(format!(
                    "trigger and target are both {}; rules must cross domains",
                    rule.trigger
                )));
            }
            if !rule.weight.is_finite() || rule.weight < 0.0 {
                return Err(invalid(format!(
                    "weight {} must be a finite number >= 0",
                    rule.weight
                )));
            }
            if rule.action.trim().is_empty() {
                return Err(invalid("action cannot be empty".to_string()));
            }
            if rule.metric.trim().is_empty() {
                return Err(invalid(format!(
                    "metric cannot be empty (use \"{}\" to match any metric)",
                    ANY_METRIC
                )));
            }
        }

        Ok(())
    }
}
