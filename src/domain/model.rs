use crate::utils::error::{LifeOpsError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// 生活領域。列舉順序 Health < Finance < Study 同時也是平手時的優先順序。
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum Domain {
    Health,
    Finance,
    Study,
}

impl Domain {
    pub const ALL: [Domain; 3] = [Domain::Health, Domain::Finance, Domain::Study];

    pub fn as_str(&self) -> &'static str {
        match self {
            Domain::Health => "Health",
            Domain::Finance => "Finance",
            Domain::Study => "Study",
        }
    }
}

impl fmt::Display for Domain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Domain {
    type Err = LifeOpsError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "health" => Ok(Domain::Health),
            "finance" => Ok(Domain::Finance),
            "study" => Ok(Domain::Study),
            _ => Err(LifeOpsError::UnknownDomain {
                domain: s.to_string(),
            }),
        }
    }
}

impl<'de> Deserialize<'de> for Domain {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let name = String::deserialize(deserializer)?;
        name.parse().map_err(serde::de::Error::custom)
    }
}

/// Normalized metric name used for rule lookups: `savingsRate`, `savings_rate`
/// and `Savings Rate` all map to `savingsrate`.
pub fn metric_class(metric: &str) -> String {
    metric
        .chars()
        .filter(|c| !matches!(c, '_' | '-' | ' '))
        .flat_map(char::to_lowercase)
        .collect()
}

/// A signal as it arrives at the input boundary, before the domain is checked.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SignalInput {
    pub domain: String,
    pub metric: String,
    pub value: f64,
    #[serde(alias = "normalizedSeverity", alias = "severity")]
    pub normalized_severity: f64,
}

impl SignalInput {
    pub fn new(
        domain: impl Into<String>,
        metric: impl Into<String>,
        value: f64,
        normalized_severity: f64,
    ) -> Self {
        Self {
            domain: domain.into(),
            metric: metric.into(),
            value,
            normalized_severity,
        }
    }

    /// Resolves the domain name. Severity is checked later by the evaluator.
    pub fn parse(&self) -> Result<DomainSignal> {
        let domain = self.domain.parse::<Domain>()?;
        Ok(DomainSignal {
            domain,
            metric: self.metric.clone(),
            value: self.value,
            normalized_severity: self.normalized_severity,
        })
    }
}

impl From<DomainSignal> for SignalInput {
    fn from(signal: DomainSignal) -> Self {
        Self {
            domain: signal.domain.to_string(),
            metric: signal.metric,
            value: signal.value,
            normalized_severity: signal.normalized_severity,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DomainSignal {
    pub domain: Domain,
    pub metric: String,
    pub value: f64,
    pub normalized_severity: f64,
}

impl DomainSignal {
    pub fn new(domain: Domain, metric: impl Into<String>, value: f64, normalized_severity: f64) -> Self {
        Self {
            domain,
            metric: metric.into(),
            value,
            normalized_severity,
        }
    }

    pub fn metric_class(&self) -> String {
        metric_class(&self.metric)
    }

    pub fn has_valid_severity(&self) -> bool {
        (0.0..=1.0).contains(&self.normalized_severity)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    pub target_domain: Domain,
    pub action: String,
    pub triggering_domain: Domain,
    pub rationale: String,
    pub priority: f64,
}

impl Recommendation {
    /// Same-domain "maintain current plan" entries carry no cross-domain cause.
    pub fn is_fallback(&self) -> bool {
        self.triggering_domain == self.target_domain
    }
}

/// A signal the evaluator skipped, kept so the caller can surface a warning.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RejectedSignal {
    pub index: usize,
    pub signal: DomainSignal,
    pub reason: String,
}

impl RejectedSignal {
    pub fn to_error(&self) -> LifeOpsError {
        LifeOpsError::InvalidSignal {
            domain: self.signal.domain.to_string(),
            metric: self.signal.metric.clone(),
            severity: self.signal.normalized_severity,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Evaluation {
    pub threshold: f64,
    pub recommendations: Vec<Recommendation>,
    pub rejected: Vec<RejectedSignal>,
}

impl Evaluation {
    pub fn has_warnings(&self) -> bool {
        !self.rejected.is_empty()
    }

    pub fn cross_domain(&self) -> impl Iterator<Item = &Recommendation> {
        self.recommendations.iter().filter(|r| !r.is_fallback())
    }
}
