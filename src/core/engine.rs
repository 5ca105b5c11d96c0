use crate::app::dashboard::{DashboardSummary, StudyDay};
use crate::core::collection::CollectionSequence;
use crate::core::evaluator::TradeoffEvaluator;
use crate::core::report::Report;
use crate::core::rules::RuleTable;
use crate::domain::ports::{ConfigProvider, Storage};
use crate::utils::error::Result;

/// Result of a full collect → evaluate → load run.
#[derive(Debug, Clone)]
pub struct RunOutput {
    pub report: Report,
    pub rendered: String,
    pub output_path: Option<String>,
}

pub struct LifeOpsEngine<S: Storage, C: ConfigProvider> {
    evaluator: TradeoffEvaluator,
    sequence: CollectionSequence,
    storage: S,
    config: C,
    summary: Option<DashboardSummary>,
    study_schedule: Option<Vec<StudyDay>>,
}

impl<S: Storage, C: ConfigProvider> LifeOpsEngine<S, C> {
    pub fn new(rules: RuleTable, sequence: CollectionSequence, storage: S, config: C) -> Result<Self> {
        let evaluator = TradeoffEvaluator::new(rules).with_threshold(config.threshold())?;
        Ok(Self {
            evaluator,
            sequence,
            storage,
            config,
            summary: None,
            study_schedule: None,
        })
    }

    pub fn with_summary(mut self, summary: DashboardSummary) -> Self {
        self.summary = Some(summary);
        self
    }

    pub fn with_study_schedule(mut self, schedule: Vec<StudyDay>) -> Self {
        self.study_schedule = Some(schedule);
        self
    }

    pub fn evaluator(&self) -> &TradeoffEvaluator {
        &self.evaluator
    }

    /// Collects and evaluates without writing anything.
    pub async fn evaluate(&self) -> Result<Report> {
        tracing::info!("🚀 Collecting signals from {} collectors", self.sequence.len());
        let outcome = self.sequence.collect_all().await?;
        let signals = outcome.signals();
        tracing::info!(
            "📥 Collected {} signals in {:?}",
            signals.len(),
            outcome.total_duration()
        );

        let evaluation = self.evaluator.evaluate(&signals)?;
        for rejected in &evaluation.rejected {
            tracing::warn!("⚠️ {}", rejected.to_error());
        }
        tracing::info!(
            "🔄 Produced {} recommendations ({} cross-domain)",
            evaluation.recommendations.len(),
            evaluation.cross_domain().count()
        );

        let mut report = Report::new(evaluation, signals.len());
        report.collection_failures = outcome.failures;
        report.summary = self.summary.clone();
        report.study_schedule = self.study_schedule.clone();
        Ok(report)
    }

    pub async fn run(&self) -> Result<RunOutput> {
        let report = self.evaluate().await?;
        let rendered = report.render(self.config.output_format())?;
        let output_path = self.load(&rendered).await?;

        Ok(RunOutput {
            report,
            rendered,
            output_path,
        })
    }

    async fn load(&self, rendered: &str) -> Result<Option<String>> {
        let Some(base_path) = self.config.output_path() else {
            return Ok(None);
        };

        let filename = self.config.report_filename();
        tracing::debug!("Writing report ({} bytes) to storage", rendered.len());
        self.storage.write_file(&filename, rendered.as_bytes()).await?;

        let output_path = format!("{}/{}", base_path.trim_end_matches('/'), filename);
        tracing::info!("💾 Report saved to: {}", output_path);
        Ok(Some(output_path))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::collectors::StaticCollector;
    use crate::core::report::OutputFormat;
    use crate::domain::model::{Domain, SignalInput};
    use crate::utils::error::LifeOpsError;
    use std::collections::HashMap;
    use std::sync::Arc;
    use tokio::sync::Mutex;

    #[derive(Clone, Default)]
    struct MockStorage {
        files: Arc<Mutex<HashMap<String, Vec<u8>>>>,
    }

    impl MockStorage {
        async fn get_file(&self, path: &str) -> Option<Vec<u8>> {
            let files = self.files.lock().await;
            files.get(path).cloned()
        }
    }

    impl Storage for MockStorage {
        async fn write_file(&self, path: &str, data: &[u8]) -> Result<()> {
            let mut files = self.files.lock().await;
            files.insert(path.to_string(), data.to_vec());
            Ok(())
        }
    }

    struct TestConfig {
        threshold: f64,
        output_path: Option<String>,
        format: OutputFormat,
    }

    impl ConfigProvider for TestConfig {
        fn threshold(&self) -> f64 {
            self.threshold
        }

        fn output_path(&self) -> Option<&str> {
            self.output_path.as_deref()
        }

        fn output_format(&self) -> OutputFormat {
            self.format
        }

        fn report_filename(&self) -> String {
            format!("report.{}", self.format.extension())
        }
    }

    fn sequence(signals: Vec<SignalInput>) -> CollectionSequence {
        let mut sequence = CollectionSequence::new();
        sequence.add(StaticCollector::new("test", signals));
        sequence
    }

    #[tokio::test]
    async fn test_run_writes_report_to_storage() {
        let storage = MockStorage::default();
        let config = TestConfig {
            threshold: 0.7,
            output_path: Some("./out/".to_string()),
            format: OutputFormat::Json,
        };
        let engine = LifeOpsEngine::new(
            RuleTable::builtin().unwrap(),
            sequence(vec![SignalInput::new("Health", "stress", 9.0, 0.9)]),
            storage.clone(),
            config,
        )
        .unwrap();

        let output = engine.run().await.unwrap();
        assert_eq!(output.output_path.as_deref(), Some("./out/report.json"));
        assert_eq!(output.report.recommendations[0].target_domain, Domain::Study);

        let written = storage.get_file("report.json").await.unwrap();
        assert_eq!(String::from_utf8(written).unwrap(), output.rendered);
    }

    #[tokio::test]
    async fn test_run_without_output_path_writes_nothing() {
        let storage = MockStorage::default();
        let config = TestConfig {
            threshold: 0.7,
            output_path: None,
            format: OutputFormat::Text,
        };
        let engine = LifeOpsEngine::new(
            RuleTable::builtin().unwrap(),
            sequence(vec![SignalInput::new("Health", "stress", 2.0, 0.2)]),
            storage.clone(),
            config,
        )
        .unwrap();

        let output = engine.run().await.unwrap();
        assert!(output.output_path.is_none());
        assert!(storage.files.lock().await.is_empty());
        assert!(output.rendered.contains("Maintain current plan"));
    }

    #[tokio::test]
    async fn test_unknown_domain_fails_run() {
        let config = TestConfig {
            threshold: 0.7,
            output_path: None,
            format: OutputFormat::Text,
        };
        let engine = LifeOpsEngine::new(
            RuleTable::builtin().unwrap(),
            sequence(vec![SignalInput::new("Sleep", "hours", 4.0, 0.9)]),
            MockStorage::default(),
            config,
        )
        .unwrap();

        let err = engine.run().await.unwrap_err();
        assert!(matches!(err, LifeOpsError::UnknownDomain { .. }));
    }

    #[test]
    fn test_invalid_threshold_rejected() {
        let config = TestConfig {
            threshold: 1.5,
            output_path: None,
            format: OutputFormat::Text,
        };
        let result = LifeOpsEngine::new(
            RuleTable::builtin().unwrap(),
            CollectionSequence::new(),
            MockStorage::default(),
            config,
        );
        assert!(result.is_err());
    }
}
