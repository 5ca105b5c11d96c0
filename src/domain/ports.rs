use crate::core::report::OutputFormat;
use crate::domain::model::SignalInput;
use crate::utils::error::Result;
use async_trait::async_trait;

/// Destination for rendered reports.
pub trait Storage: Send + Sync {
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
}

pub trait ConfigProvider: Send + Sync {
    fn threshold(&self) -> f64;
    /// Directory for the rendered report; `None` prints to stdout only.
    fn output_path(&self) -> Option<&str>;
    fn output_format(&self) -> OutputFormat;
    fn report_filename(&self) -> String;
}

/// Gathers raw signals for the evaluator. Implementations own any I/O,
/// timeouts or retries; the evaluator only ever sees the returned inputs.
#[async_trait]
pub trait SignalCollector: Send + Sync {
    fn name(&self) -> &str;
    async fn collect(&self) -> Result<Vec<SignalInput>>;
}
