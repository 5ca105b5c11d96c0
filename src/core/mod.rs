pub mod collection;
pub mod engine;
pub mod evaluator;
pub mod report;
pub mod rules;

pub use crate::domain::model::{Domain, DomainSignal, Evaluation, Recommendation, SignalInput};
pub use crate::domain::ports::{ConfigProvider, SignalCollector, Storage};
pub use crate::utils::error::Result;
