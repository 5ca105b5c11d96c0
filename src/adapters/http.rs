use crate::domain::model::SignalInput;
use crate::domain::ports::SignalCollector;
use crate::utils::error::{LifeOpsError, Result};
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;

pub const DEFAULT_TIMEOUT_SECONDS: u64 = 10;

/// Fetches signals from a JSON endpoint.
///
/// The endpoint must answer with either an array of signal objects or an
/// object holding that array under `signals`.
pub struct HttpCollector {
    name: String,
    endpoint: String,
    client: Client,
}

impl HttpCollector {
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> Result<Self> {
        let endpoint = endpoint.into();
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            name: format!("http:{}", endpoint),
            endpoint,
            client,
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn parse_body(&self, body: serde_json::Value) -> Result<Vec<SignalInput>> {
        let items = match body {
            serde_json::Value::Array(items) => items,
            serde_json::Value::Object(mut obj) => match obj.remove("signals") {
                Some(serde_json::Value::Array(items)) => items,
                _ => {
                    return Err(LifeOpsError::CollectionError {
                        collector: self.name.clone(),
                        details: "response object has no 'signals' array".to_string(),
                    })
                }
            },
            other => {
                return Err(LifeOpsError::CollectionError {
                    collector: self.name.clone(),
                    details: format!("unexpected response shape: {}", other),
                })
            }
        };

        items
            .into_iter()
            .map(|item| serde_json::from_value::<SignalInput>(item).map_err(LifeOpsError::from))
            .collect()
    }
}

#[async_trait]
impl SignalCollector for HttpCollector {
    fn name(&self) -> &str {
        &self.name
    }

    async fn collect(&self) -> Result<Vec<SignalInput>> {
        tracing::debug!("Making API request to: {}", self.endpoint);
        let response = self.client.get(&self.endpoint).send().await?;
        tracing::debug!("API response status: {}", response.status());

        if !response.status().is_success() {
            return Err(LifeOpsError::CollectionError {
                collector: self.name.clone(),
                details: format!("endpoint returned HTTP {}", response.status()),
            });
        }

        let body: serde_json::Value = response.json().await?;
        let signals = self.parse_body(body)?;
        tracing::debug!("📥 Received {} signals from {}", signals.len(), self.endpoint);
        Ok(signals)
    }
}
