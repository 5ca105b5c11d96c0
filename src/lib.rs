pub mod adapters;
pub mod app;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;
pub use config::LifeOpsConfig;

pub use adapters::{http::HttpCollector, storage::LocalStorage};
pub use app::collectors::{profile::UserProfile, ProfileCollector, StaticCollector};
pub use crate::core::{
    collection::CollectionSequence, engine::LifeOpsEngine, evaluator::TradeoffEvaluator,
    report::OutputFormat, rules::RuleTable,
};
pub use domain::model::{Domain, DomainSignal, Evaluation, Recommendation, SignalInput};
pub use utils::error::{LifeOpsError, Result};
