use crate::config::toml_config::LifeOpsConfig;
use crate::core::report::OutputFormat;
use chrono::NaiveDate;
use clap::Parser;

#[derive(Debug, Clone, Parser)]
#[command(name = "lifeops")]
#[command(about = "Cross-domain health, finance and study recommendations")]
pub struct CliConfig {
    /// Path to TOML configuration file
    #[arg(short, long, default_value = "lifeops.toml")]
    pub config: String,

    /// Override the trigger threshold (0.0 - 1.0)
    #[arg(long)]
    pub threshold: Option<f64>,

    /// Override the report format
    #[arg(long, value_enum)]
    pub format: Option<OutputFormat>,

    /// Write the report into this directory instead of stdout
    #[arg(short, long)]
    pub output: Option<String>,

    /// Evaluate as of this date (YYYY-MM-DD) instead of today
    #[arg(long)]
    pub today: Option<NaiveDate>,

    /// Run collectors concurrently
    #[arg(long)]
    pub parallel: bool,

    /// Show the configuration and rule table without evaluating
    #[arg(long)]
    pub dry_run: bool,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Emit logs as JSON")]
    pub log_json: bool,
}

impl CliConfig {
    /// 套用命令列覆蓋設定
    pub fn apply_overrides(&self, config: &mut LifeOpsConfig) {
        if let Some(threshold) = self.threshold {
            config.evaluator.threshold = Some(threshold);
            tracing::info!("🔧 Threshold overridden to: {}", threshold);
        }
        if let Some(format) = self.format {
            config.output.format = Some(format);
        }
        if let Some(output) = &self.output {
            config.output.path = Some(output.clone());
        }
        if self.parallel {
            config.collection.parallel = Some(true);
        }
    }

    pub fn today(&self) -> NaiveDate {
        self.today
            .unwrap_or_else(|| chrono::Local::now().date_naive())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ports::ConfigProvider;

    #[test]
    fn test_overrides_replace_config_values() {
        let args = CliConfig::parse_from([
            "lifeops",
            "--threshold",
            "0.5",
            "--format",
            "csv",
            "--output",
            "./reports",
            "--today",
            "2026-10-19",
            "--parallel",
        ]);
        let mut config = LifeOpsConfig::default();
        args.apply_overrides(&mut config);

        assert_eq!(config.threshold(), 0.5);
        assert_eq!(config.output_format(), OutputFormat::Csv);
        assert_eq!(ConfigProvider::output_path(&config), Some("./reports"));
        assert!(config.is_parallel());
        assert_eq!(args.today(), NaiveDate::from_ymd_opt(2026, 10, 19).unwrap());
    }

    #[test]
    fn test_defaults() {
        let args = CliConfig::parse_from(["lifeops"]);
        assert_eq!(args.config, "lifeops.toml");
        assert!(!args.dry_run);

        let mut config = LifeOpsConfig::default();
        args.apply_overrides(&mut config);
        assert!(!config.is_parallel());
    }
}
