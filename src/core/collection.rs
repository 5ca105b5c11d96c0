use crate::domain::model::SignalInput;
use crate::domain::ports::SignalCollector;
use crate::utils::error::{LifeOpsError, Result};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::task::JoinSet;

/// What to do when a collector fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FailurePolicy {
    #[default]
    Abort,
    Skip,
}

/// 單一收集器的執行結果
#[derive(Debug, Clone)]
pub struct CollectionResult {
    pub collector_name: String,
    pub signals: Vec<SignalInput>,
    pub duration: Duration,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CollectionFailure {
    pub collector_name: String,
    pub error: String,
}

#[derive(Debug, Clone, Default)]
pub struct CollectionOutcome {
    pub results: Vec<CollectionResult>,
    pub failures: Vec<CollectionFailure>,
}

impl CollectionOutcome {
    /// All collected signals, in collector declaration order.
    pub fn signals(&self) -> Vec<SignalInput> {
        self.results
            .iter()
            .flat_map(|result| result.signals.clone())
            .collect()
    }

    pub fn total_duration(&self) -> Duration {
        self.results.iter().map(|r| r.duration).sum()
    }
}

/// Runs signal collectors in a fixed order and assembles one signal set.
///
/// In parallel mode every collector runs as its own task, but the results are
/// still assembled in declaration order so the evaluator input is identical to
/// a sequential run.
pub struct CollectionSequence {
    collectors: Vec<Arc<dyn SignalCollector>>,
    parallel: bool,
    on_failure: FailurePolicy,
}

impl Default for CollectionSequence {
    fn default() -> Self {
        Self::new()
    }
}

impl CollectionSequence {
    pub fn new() -> Self {
        Self {
            collectors: Vec::new(),
            parallel: false,
            on_failure: FailurePolicy::default(),
        }
    }

    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    pub fn with_failure_policy(mut self, policy: FailurePolicy) -> Self {
        self.on_failure = policy;
        self
    }

    pub fn add_collector(&mut self, collector: Arc<dyn SignalCollector>) {
        self.collectors.push(collector);
    }

    pub fn add<C: SignalCollector + 'static>(&mut self, collector: C) {
        self.add_collector(Arc::new(collector));
    }

    pub fn len(&self) -> usize {
        self.collectors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.collectors.is_empty()
    }

    pub fn collector_names(&self) -> Vec<&str> {
        self.collectors.iter().map(|c| c.name()).collect()
    }

    pub async fn collect_all(&self) -> Result<CollectionOutcome> {
        let attempts = if self.parallel {
            self.run_parallel().await?
        } else {
            self.run_sequential().await
        };

        let mut outcome = CollectionOutcome::default();
        for (name, result, duration) in attempts {
            match result {
                Ok(signals) => {
                    tracing::info!(
                        "✅ Collector executed: {} (signals: {}, duration: {:?})",
                        name,
                        signals.len(),
                        duration
                    );
                    outcome.results.push(CollectionResult {
                        collector_name: name,
                        signals,
                        duration,
                    });
                }
                Err(e) => match self.on_failure {
                    FailurePolicy::Abort => {
                        tracing::error!("❌ Collector failed: {}: {}", name, e);
                        return Err(e);
                    }
                    FailurePolicy::Skip => {
                        tracing::warn!("⏭️ Skipping failed collector {}: {}", name, e);
                        outcome.failures.push(CollectionFailure {
                            collector_name: name,
                            error: e.to_string(),
                        });
                    }
                },
            }
        }

        Ok(outcome)
    }

    async fn run_sequential(&self) -> Vec<(String, Result<Vec<SignalInput>>, Duration)> {
        let mut attempts = Vec::with_capacity(self.collectors.len());
        for collector in &self.collectors {
            let start_time = Instant::now();
            let result = collector.collect().await;
            attempts.push((collector.name().to_string(), result, start_time.elapsed()));
        }
        attempts
    }

    async fn run_parallel(&self) -> Result<Vec<(String, Result<Vec<SignalInput>>, Duration)>> {
        let mut tasks = JoinSet::new();
        for (index, collector) in self.collectors.iter().enumerate() {
            let collector = Arc::clone(collector);
            tasks.spawn(async move {
                let start_time = Instant::now();
                let result = collector.collect().await;
                (index, result, start_time.elapsed())
            });
        }

        let mut slots: Vec<Option<(Result<Vec<SignalInput>>, Duration)>> =
            (0..self.collectors.len()).map(|_| None).collect();

        while let Some(joined) = tasks.join_next().await {
            let (index, result, duration) = joined.map_err(|e| LifeOpsError::CollectionError {
                collector: "parallel".to_string(),
                details: format!("collector task failed: {}", e),
            })?;
            slots[index] = Some((result, duration));
        }

        // 依宣告順序重新排列
        Ok(self
            .collectors
            .iter()
            .zip(slots)
            .filter_map(|(collector, slot)| {
                slot.map(|(result, duration)| (collector.name().to_string(), result, duration))
            })
            .collect())
    }
}
