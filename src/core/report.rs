use crate::app::dashboard::{DashboardSummary, StudyDay};
use crate::core::collection::CollectionFailure;
use crate::domain::model::{Evaluation, Recommendation, RejectedSignal};
use crate::utils::error::{LifeOpsError, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt::{self, Write};
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
    Csv,
}

impl OutputFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Text => "txt",
            OutputFormat::Json => "json",
            OutputFormat::Csv => "csv",
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            OutputFormat::Text => "text",
            OutputFormat::Json => "json",
            OutputFormat::Csv => "csv",
        })
    }
}

impl FromStr for OutputFormat {
    type Err = LifeOpsError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "text" | "txt" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            "csv" => Ok(OutputFormat::Csv),
            other => Err(LifeOpsError::InvalidConfigValueError {
                field: "output.format".to_string(),
                value: other.to_string(),
                reason: "Unsupported format. Valid formats: text, json, csv".to_string(),
            }),
        }
    }
}

/// Everything produced by one run, ready to hand to a presentation layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Report {
    pub evaluation_id: String,
    pub generated_at: DateTime<Utc>,
    pub threshold: f64,
    pub signal_count: usize,
    pub recommendations: Vec<Recommendation>,
    pub rejected: Vec<RejectedSignal>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub collection_failures: Vec<CollectionFailure>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<DashboardSummary>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub study_schedule: Option<Vec<StudyDay>>,
}

impl Report {
    pub fn new(evaluation: Evaluation, signal_count: usize) -> Self {
        let generated_at = Utc::now();
        Self {
            evaluation_id: format!("eval_{}", generated_at.format("%Y%m%d_%H%M%S")),
            generated_at,
            threshold: evaluation.threshold,
            signal_count,
            recommendations: evaluation.recommendations,
            rejected: evaluation.rejected,
            collection_failures: Vec::new(),
            summary: None,
            study_schedule: None,
        }
    }

    pub fn render(&self, format: OutputFormat) -> Result<String> {
        match format {
            OutputFormat::Text => Ok(self.render_text()),
            OutputFormat::Json => Ok(serde_json::to_string_pretty(self)?),
            OutputFormat::Csv => self.render_csv(),
        }
    }

    /// One row per recommendation, in ranked order.
    fn render_csv(&self) -> Result<String> {
        let mut writer = csv::Writer::from_writer(Vec::new());
        writer.write_record([
            "rank",
            "priority",
            "target_domain",
            "triggering_domain",
            "action",
            "rationale",
        ])?;

        for (rank, rec) in self.recommendations.iter().enumerate() {
            writer.write_record([
                (rank + 1).to_string(),
                format!("{:.3}", rec.priority),
                rec.target_domain.to_string(),
                rec.triggering_domain.to_string(),
                rec.action.clone(),
                rec.rationale.clone(),
            ])?;
        }

        let data = writer
            .into_inner()
            .map_err(|e| LifeOpsError::IoError(e.into_error()))?;
        String::from_utf8(data).map_err(|e| LifeOpsError::IoError(std::io::Error::other(e)))
    }

    fn render_text(&self) -> String {
        let mut out = String::new();
        // 寫入 String 不會失敗，忽略 fmt::Result
        let _ = writeln!(
            out,
            "📋 LifeOps recommendations ({}, threshold {:.2}, {} signals)",
            self.evaluation_id, self.threshold, self.signal_count
        );
        let _ = writeln!(out);

        if self.recommendations.is_empty() {
            let _ = writeln!(out, "  No signals supplied, nothing to recommend.");
        }

        for (rank, rec) in self.recommendations.iter().enumerate() {
            let cause = if rec.is_fallback() {
                "-".to_string()
            } else {
                format!("from {}", rec.triggering_domain)
            };
            let _ = writeln!(
                out,
                "  {}. [{:.3}] {:<8} {:<13} {}",
                rank + 1,
                rec.priority,
                rec.target_domain.as_str(),
                cause,
                rec.action
            );
            let _ = writeln!(out, "       ↳ {}", rec.rationale);
        }

        if !self.rejected.is_empty() {
            let _ = writeln!(out);
            let _ = writeln!(out, "⚠️ Rejected signals:");
            for rejected in &self.rejected {
                let _ = writeln!(
                    out,
                    "  - #{} {}/{}: {}",
                    rejected.index, rejected.signal.domain, rejected.signal.metric, rejected.reason
                );
            }
        }

        if !self.collection_failures.is_empty() {
            let _ = writeln!(out);
            let _ = writeln!(out, "⚠️ Skipped collectors:");
            for failure in &self.collection_failures {
                let _ = writeln!(out, "  - {}: {}", failure.collector_name, failure.error);
            }
        }

        if let Some(summary) = &self.summary {
            let _ = writeln!(out);
            let _ = writeln!(out, "📊 Dashboard:");
            if let Some(stress) = summary.stress_level {
                let _ = writeln!(out, "  Stress level:    {}/10", stress);
            }
            if let Some(days) = summary.days_until_exam {
                let _ = writeln!(out, "  Days until exam: {}", days);
            }
            if let Some(savings) = summary.monthly_savings {
                let _ = writeln!(out, "  Monthly savings: ${:.0}", savings);
            }
            if let Some(score) = summary.health_score {
                let _ = writeln!(out, "  Health score:    {:.0}/10", score);
            }
        }

        if let Some(schedule) = &self.study_schedule {
            let _ = writeln!(out);
            let _ = writeln!(out, "📅 Study schedule:");
            for day in schedule {
                let _ = writeln!(out, "  {}  {:.1}h", day.date.format("%b %d"), day.hours);
            }
        }

        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::{Domain, DomainSignal};

    fn sample_report() -> Report {
        let evaluation = Evaluation {
            threshold: 0.7,
            recommendations: vec![
                Recommendation {
                    target_domain: Domain::Study,
                    action: "Cut study time, add breaks".to_string(),
                    triggering_domain: Domain::Health,
                    rationale: "Health signal 'stress' is high".to_string(),
                    priority: 0.9,
                },
                Recommendation {
                    target_domain: Domain::Health,
                    action: "Maintain current plan".to_string(),
                    triggering_domain: Domain::Health,
                    rationale: "nothing above threshold".to_string(),
                    priority: 0.0,
                },
            ],
            rejected: vec![RejectedSignal {
                index: 2,
                signal: DomainSignal::new(Domain::Finance, "debt", 1.0, 1.5),
                reason: "normalized severity 1.5 is outside [0, 1]".to_string(),
            }],
        };
        Report::new(evaluation, 3)
    }

    #[test]
    fn test_output_format_parsing() {
        assert_eq!("JSON".parse::<OutputFormat>().unwrap(), OutputFormat::Json);
        assert_eq!("txt".parse::<OutputFormat>().unwrap(), OutputFormat::Text);
        assert!("xml".parse::<OutputFormat>().is_err());
        assert_eq!(OutputFormat::Csv.extension(), "csv");
    }

    #[test]
    fn test_render_csv_has_header_and_ranked_rows() {
        let csv = sample_report().render(OutputFormat::Csv).unwrap();
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(
            lines[0],
            "rank,priority,target_domain,triggering_domain,action,rationale"
        );
        assert!(lines[1].starts_with("1,0.900,Study,Health,"));
        // 逗號欄位會被加上引號
        assert!(lines[1].contains("\"Cut study time, add breaks\""));
        assert_eq!(lines.len(), 3);
    }

    #[test]
    fn test_render_json_is_parseable() {
        let json = sample_report().render(OutputFormat::Json).unwrap();
        let parsed: Report = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.recommendations.len(), 2);
        assert_eq!(parsed.rejected.len(), 1);
        assert!(parsed.summary.is_none());
    }

    #[test]
    fn test_render_text_mentions_warnings() {
        let text = sample_report().render(OutputFormat::Text).unwrap();
        assert!(text.contains("from Health"));
        assert!(text.contains("Rejected signals"));
        assert!(text.contains("Finance/debt"));
    }
}
