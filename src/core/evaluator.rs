use crate::core::rules::{Rule, RuleTable};
use crate::domain::model::{
    Domain, DomainSignal, Evaluation, Recommendation, RejectedSignal, SignalInput,
};
use crate::utils::error::Result;
use crate::utils::validation::validate_range;
use std::cmp::Ordering;
use std::collections::btree_map::Entry;
use std::collections::BTreeMap;

pub const DEFAULT_THRESHOLD: f64 = 0.7;
pub const MAINTAIN_ACTION: &str = "Maintain current plan";

/// Cross-domain trade-off evaluator.
///
/// Stateless apart from its rule table and threshold: the same input always
/// produces the same, equally ordered recommendations.
#[derive(Debug, Clone)]
pub struct TradeoffEvaluator {
    rules: RuleTable,
    threshold: f64,
}

/// 某個 target domain 目前最佳的候選規則
struct Candidate<'a> {
    priority: f64,
    rule_index: usize,
    signal_index: usize,
    rule: &'a Rule,
    signal: &'a DomainSignal,
}

impl Candidate<'_> {
    /// Higher priority first, then trigger domain order, then declaration order.
    fn rank(&self, other: &Self) -> Ordering {
        other
            .priority
            .total_cmp(&self.priority)
            .then(self.rule.trigger.cmp(&other.rule.trigger))
            .then(self.rule_index.cmp(&other.rule_index))
            .then(self.signal_index.cmp(&other.signal_index))
    }
}

impl TradeoffEvaluator {
    pub fn new(rules: RuleTable) -> Self {
        Self {
            rules,
            threshold: DEFAULT_THRESHOLD,
        }
    }

    pub fn with_threshold(mut self, threshold: f64) -> Result<Self> {
        validate_range("evaluator.threshold", threshold, 0.0, 1.0)?;
        self.threshold = threshold;
        Ok(self)
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    pub fn rules(&self) -> &RuleTable {
        &self.rules
    }

    /// Evaluates raw boundary input. Any unrecognised domain rejects the whole
    /// call; out-of-range severities only reject their own signal.
    pub fn evaluate(&self, inputs: &[SignalInput]) -> Result<Evaluation> {
        let signals = inputs
            .iter()
            .map(SignalInput::parse)
            .collect::<Result<Vec<_>>>()?;
        Ok(self.evaluate_signals(&signals))
    }

    pub fn evaluate_signals(&self, signals: &[DomainSignal]) -> Evaluation {
        let mut rejected = Vec::new();
        let mut supplied: BTreeMap<Domain, usize> = BTreeMap::new();
        let mut best: BTreeMap<Domain, Candidate<'_>> = BTreeMap::new();

        for (signal_index, signal) in signals.iter().enumerate() {
            if !signal.has_valid_severity() {
                tracing::warn!(
                    "⚠️ Rejecting signal #{} {}/{}: severity {} outside [0, 1]",
                    signal_index,
                    signal.domain,
                    signal.metric,
                    signal.normalized_severity
                );
                rejected.push(RejectedSignal {
                    index: signal_index,
                    signal: signal.clone(),
                    reason: format!(
                        "normalized severity {} is outside [0, 1]",
                        signal.normalized_severity
                    ),
                });
                continue;
            }

            *supplied.entry(signal.domain).or_insert(0) += 1;

            if signal.normalized_severity <= self.threshold {
                continue;
            }

            for (rule_index, rule) in self.rules.rules_for(signal) {
                let candidate = Candidate {
                    priority: signal.normalized_severity * rule.weight,
                    rule_index,
                    signal_index,
                    rule,
                    signal,
                };
                tracing::debug!(
                    "🔀 {}/{} ({:.2}) triggers rule #{} -> {} (priority {:.3})",
                    signal.domain,
                    signal.metric,
                    signal.normalized_severity,
                    rule_index,
                    rule.target,
                    candidate.priority
                );

                match best.entry(rule.target) {
                    Entry::Vacant(slot) => {
                        slot.insert(candidate);
                    }
                    Entry::Occupied(mut slot) => {
                        if candidate.rank(slot.get()) == Ordering::Less {
                            slot.insert(candidate);
                        }
                    }
                }
            }
        }

        let mut recommendations: Vec<Recommendation> = best
            .values()
            .map(|candidate| self.cross_domain_recommendation(candidate))
            .collect();

        // 沒有被跨領域規則覆蓋的領域，回退為「維持目前計畫」
        for (domain, count) in &supplied {
            if !best.contains_key(domain) {
                recommendations.push(self.maintain_recommendation(*domain, *count));
            }
        }

        recommendations.sort_by(|a, b| {
            b.priority
                .total_cmp(&a.priority)
                .then(a.target_domain.cmp(&b.target_domain))
        });

        tracing::debug!(
            "Evaluated {} signals: {} recommendations, {} rejected",
            signals.len(),
            recommendations.len(),
            rejected.len()
        );

        Evaluation {
            threshold: self.threshold,
            recommendations,
            rejected,
        }
    }

    fn cross_domain_recommendation(&self, candidate: &Candidate<'_>) -> Recommendation {
        let rule = candidate.rule;
        let signal = candidate.signal;
        Recommendation {
            target_domain: rule.target,
            action: rule.render_action(signal),
            triggering_domain: rule.trigger,
            rationale: format!(
                "{} signal '{}' (value {}) has severity {:.2}, above threshold {:.2}; rule weight {:.2}",
                signal.domain,
                signal.metric,
                signal.value,
                signal.normalized_severity,
                self.threshold,
                rule.weight
            ),
            priority: candidate.priority,
        }
    }

    fn maintain_recommendation(&self, domain: Domain, signal_count: usize) -> Recommendation {
        Recommendation {
            target_domain: domain,
            action: MAINTAIN_ACTION.to_string(),
            triggering_domain: domain,
            rationale: format!(
                "No cross-domain trigger above threshold {:.2} affects {}; {} {} signal(s) reviewed",
                self.threshold, domain, signal_count, domain
            ),
            priority: 0.0,
        }
    }
}
