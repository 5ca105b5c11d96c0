pub mod finance;
pub mod health;
pub mod profile;
pub mod study;

use crate::domain::model::{Domain, DomainSignal, SignalInput};
use crate::domain::ports::SignalCollector;
use crate::utils::error::Result;
use async_trait::async_trait;
use chrono::NaiveDate;
use profile::UserProfile;

/// 依領域分派到對應的收集函式
pub fn collect_domain(domain: Domain, profile: &UserProfile, today: NaiveDate) -> Vec<DomainSignal> {
    match domain {
        Domain::Health => health::collect(&profile.health),
        Domain::Finance => finance::collect(&profile.finance),
        Domain::Study => study::collect(&profile.study, today),
    }
}

/// Collects one domain's signals from the user profile.
pub struct ProfileCollector {
    name: String,
    domain: Domain,
    profile: UserProfile,
    today: NaiveDate,
}

impl ProfileCollector {
    pub fn new(domain: Domain, profile: UserProfile, today: NaiveDate) -> Self {
        Self {
            name: format!("profile:{}", domain.as_str().to_ascii_lowercase()),
            domain,
            profile,
            today,
        }
    }

    /// One collector per domain, in the fixed Health → Finance → Study order.
    pub fn for_all_domains(profile: &UserProfile, today: NaiveDate) -> Vec<Self> {
        Domain::ALL
            .iter()
            .map(|domain| Self::new(*domain, profile.clone(), today))
            .collect()
    }

    pub fn domain(&self) -> Domain {
        self.domain
    }
}

#[async_trait]
impl SignalCollector for ProfileCollector {
    fn name(&self) -> &str {
        &self.name
    }

    async fn collect(&self) -> Result<Vec<SignalInput>> {
        let signals = collect_domain(self.domain, &self.profile, self.today);
        Ok(signals.into_iter().map(SignalInput::from).collect())
    }
}

/// Signals given verbatim, e.g. `[[signals]]` entries in the config file.
pub struct StaticCollector {
    name: String,
    signals: Vec<SignalInput>,
}

impl StaticCollector {
    pub fn new(name: impl Into<String>, signals: Vec<SignalInput>) -> Self {
        Self {
            name: name.into(),
            signals,
        }
    }
}

#[async_trait]
impl SignalCollector for StaticCollector {
    fn name(&self) -> &str {
        &self.name
    }

    async fn collect(&self) -> Result<Vec<SignalInput>> {
        Ok(self.signals.clone())
    }
}
