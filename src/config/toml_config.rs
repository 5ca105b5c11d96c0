use crate::adapters::http::{HttpCollector, DEFAULT_TIMEOUT_SECONDS};
use crate::app::collectors::profile::UserProfile;
use crate::app::collectors::{ProfileCollector, StaticCollector};
use crate::core::collection::{CollectionSequence, FailurePolicy};
use crate::core::evaluator::DEFAULT_THRESHOLD;
use crate::core::report::OutputFormat;
use crate::core::rules::{Rule, RuleTable};
use crate::domain::model::SignalInput;
use crate::domain::ports::ConfigProvider;
use crate::utils::error::{LifeOpsError, Result};
use crate::utils::validation::{
    validate_non_empty_string, validate_path, validate_range, validate_url, Validate,
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LifeOpsConfig {
    #[serde(default)]
    pub evaluator: EvaluatorConfig,
    /// Inline rule table; takes precedence over `evaluator.rules_file`.
    #[serde(default)]
    pub rules: Vec<Rule>,
    pub profile: Option<UserProfile>,
    #[serde(default)]
    pub signals: Vec<SignalInput>,
    pub source: Option<SourceConfig>,
    #[serde(default)]
    pub collection: CollectionConfig,
    #[serde(default)]
    pub output: OutputConfig,
    /// 設定檔所在目錄，用來解析相對路徑
    #[serde(skip)]
    base_dir: Option<PathBuf>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EvaluatorConfig {
    pub threshold: Option<f64>,
    pub rules_file: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceConfig {
    pub endpoint: String,
    pub timeout_seconds: Option<u64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CollectionConfig {
    pub parallel: Option<bool>,
    pub on_failure: Option<FailurePolicy>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OutputConfig {
    pub format: Option<OutputFormat>,
    pub path: Option<String>,
    pub filename: Option<String>,
}

impl LifeOpsConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path)?;
        let mut config = Self::from_toml_str(&content)?;
        config.base_dir = path.as_ref().parent().map(Path::to_path_buf);
        Ok(config)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| LifeOpsError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${API_KEY})，未設定的變數保持原樣
    fn substitute_env_vars(content: &str) -> Result<String> {
        use regex::Regex;
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| LifeOpsError::ConfigValidationError {
            field: "env_substitution".to_string(),
            message: e.to_string(),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    pub fn threshold(&self) -> f64 {
        self.evaluator.threshold.unwrap_or(DEFAULT_THRESHOLD)
    }

    pub fn is_parallel(&self) -> bool {
        self.collection.parallel.unwrap_or(false)
    }

    pub fn failure_policy(&self) -> FailurePolicy {
        self.collection.on_failure.unwrap_or_default()
    }

    fn resolve_path(&self, path: &str) -> PathBuf {
        let path = Path::new(path);
        match &self.base_dir {
            Some(base) if path.is_relative() => base.join(path),
            _ => path.to_path_buf(),
        }
    }

    /// Inline rules first, then `rules_file`, then the built-in table.
    pub fn rule_table(&self) -> Result<RuleTable> {
        if !self.rules.is_empty() {
            let table = RuleTable::new(self.rules.clone());
            table.validate()?;
            return Ok(table);
        }

        match &self.evaluator.rules_file {
            Some(file) => {
                let path = self.resolve_path(file);
                tracing::debug!("Loading rule table from {}", path.display());
                RuleTable::from_file(path)
            }
            None => RuleTable::builtin(),
        }
    }

    /// Collectors in fixed order: profile (Health, Finance, Study), inline
    /// signals, then the HTTP source.
    pub fn collection_sequence(&self, today: NaiveDate) -> Result<CollectionSequence> {
        let mut sequence = CollectionSequence::new()
            .with_parallel(self.is_parallel())
            .with_failure_policy(self.failure_policy());

        if let Some(profile) = self.profile.as_ref().filter(|p| !p.is_empty()) {
            for collector in ProfileCollector::for_all_domains(profile, today) {
                sequence.add(collector);
            }
        }

        if !self.signals.is_empty() {
            sequence.add(StaticCollector::new("config:signals", self.signals.clone()));
        }

        if let Some(source) = &self.source {
            let timeout = source.timeout_seconds.unwrap_or(DEFAULT_TIMEOUT_SECONDS);
            sequence.add(HttpCollector::new(
                source.endpoint.clone(),
                Duration::from_secs(timeout),
            )?);
        }

        Ok(sequence)
    }

    /// 驗證配置的合理性
    pub fn validate_config(&self) -> Result<()> {
        self.validate_as_of(chrono::Local::now().date_naive())
    }

    /// Same as `validate_config`, with exam dates measured from `today`.
    pub fn validate_as_of(&self, today: NaiveDate) -> Result<()> {
        validate_range("evaluator.threshold", self.threshold(), 0.0, 1.0)?;

        if let Some(file) = &self.evaluator.rules_file {
            validate_path("evaluator.rules_file", file)?;
        }

        if !self.rules.is_empty() {
            RuleTable::new(self.rules.clone()).validate()?;
        }

        if let Some(profile) = &self.profile {
            profile.validate_as_of(today)?;
        }

        if let Some(source) = &self.source {
            validate_url("source.endpoint", &source.endpoint)?;
            if let Some(timeout) = source.timeout_seconds {
                validate_range("source.timeout_seconds", timeout, 1, 300)?;
            }
        }

        if let Some(path) = &self.output.path {
            validate_path("output.path", path)?;
        }
        if let Some(filename) = &self.output.filename {
            validate_non_empty_string("output.filename", filename)?;
        }

        Ok(())
    }
}

impl ConfigProvider for LifeOpsConfig {
    fn threshold(&self) -> f64 {
        self.threshold()
    }

    fn output_path(&self) -> Option<&str> {
        self.output.path.as_deref()
    }

    fn output_format(&self) -> OutputFormat {
        self.output.format.unwrap_or_default()
    }

    fn report_filename(&self) -> String {
        self.output.filename.clone().unwrap_or_else(|| {
            format!("lifeops_action_plan.{}", self.output_format().extension())
        })
    }
}

impl Validate for LifeOpsConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::Domain;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_parse_full_config() {
        let toml_content = r#"
[evaluator]
threshold = 0.6

[profile]
problem = "Exam stress and a tight budget"

[profile.health]
stress_level = 8
sleep_hours = 6
exercise_frequency = "Rarely"

[profile.finance]
monthly_budget = 2000
current_expenses = 1900

[profile.study]
exam_date = "2026-11-01"
current_study_hours = 6

[[signals]]
domain = "Health"
metric = "burnout"
value = 0.8
normalized_severity = 0.8

[collection]
parallel = true
on_failure = "skip"

[output]
format = "json"
path = "./output"
"#;

        let config = LifeOpsConfig::from_toml_str(toml_content).unwrap();
        assert_eq!(config.threshold(), 0.6);
        assert!(config.is_parallel());
        assert_eq!(config.failure_policy(), FailurePolicy::Skip);
        assert_eq!(config.output_format(), OutputFormat::Json);
        assert_eq!(config.report_filename(), "lifeops_action_plan.json");

        let profile = config.profile.as_ref().unwrap();
        assert_eq!(profile.health.stress_level, Some(8));
        assert_eq!(profile.study.exam_date, NaiveDate::from_ymd_opt(2026, 11, 1));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_defaults() {
        let config = LifeOpsConfig::from_toml_str("").unwrap();
        assert_eq!(config.threshold(), DEFAULT_THRESHOLD);
        assert_eq!(config.output_format(), OutputFormat::Text);
        assert!(ConfigProvider::output_path(&config).is_none());
        assert_eq!(config.rule_table().unwrap(), RuleTable::builtin().unwrap());
    }

    #[test]
    fn test_inline_rules_take_precedence() {
        let toml_content = r#"
[evaluator]
rules_file = "does-not-exist.toml"

[[rules]]
trigger = "Finance"
metric = "debt"
target = "Study"
action = "Use the library"
weight = 0.5
"#;
        let config = LifeOpsConfig::from_toml_str(toml_content).unwrap();
        let table = config.rule_table().unwrap();
        assert_eq!(table.len(), 1);
        assert_eq!(table.rules[0].target, Domain::Study);
    }

    #[test]
    fn test_env_var_substitution() {
        std::env::set_var("LIFEOPS_TEST_ENDPOINT", "https://signals.example.com/v1");

        let toml_content = r#"
[source]
endpoint = "${LIFEOPS_TEST_ENDPOINT}"
"#;
        let config = LifeOpsConfig::from_toml_str(toml_content).unwrap();
        assert_eq!(
            config.source.as_ref().unwrap().endpoint,
            "https://signals.example.com/v1"
        );

        std::env::remove_var("LIFEOPS_TEST_ENDPOINT");
    }

    #[test]
    fn test_config_validation() {
        let config = LifeOpsConfig::from_toml_str("[evaluator]\nthreshold = 1.4\n").unwrap();
        assert!(config.validate().is_err());

        let config = LifeOpsConfig::from_toml_str("[source]\nendpoint = \"invalid-url\"\n").unwrap();
        assert!(config.validate().is_err());

        let config =
            LifeOpsConfig::from_toml_str("[profile.health]\nstress_level = 12\n").unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_oversized_exam_horizon_rejected() {
        let today = NaiveDate::from_ymd_opt(2026, 10, 19).unwrap();

        let config = LifeOpsConfig::from_toml_str(
            "[profile.study]\ndays_until_exam = 100000000000\ncurrent_study_hours = 4\n",
        )
        .unwrap();
        assert!(config.validate_as_of(today).is_err());

        let config = LifeOpsConfig::from_toml_str(
            "[profile.study]\nexam_date = \"2030-01-01\"\ncurrent_study_hours = 4\n",
        )
        .unwrap();
        assert!(config.validate_as_of(today).is_err());

        let config =
            LifeOpsConfig::from_toml_str("[profile.health]\nsleep_hours = 20\n").unwrap();
        assert!(config.validate_as_of(today).is_err());
    }

    #[test]
    fn test_unknown_domain_in_rules_is_parse_error() {
        let toml_content = r#"
[[rules]]
trigger = "Sleep"
target = "Study"
action = "Nap"
weight = 1.0
"#;
        let err = LifeOpsConfig::from_toml_str(toml_content).unwrap_err();
        assert!(err.to_string().contains("Sleep"));
    }

    #[test]
    fn test_rules_file_relative_to_config() {
        let dir = tempfile::TempDir::new().unwrap();
        std::fs::write(
            dir.path().join("rules.toml"),
            r#"
[[rules]]
trigger = "Study"
metric = "load"
target = "Health"
action = "Rest"
weight = 0.9
"#,
        )
        .unwrap();

        let config_path = dir.path().join("lifeops.toml");
        let mut file = std::fs::File::create(&config_path).unwrap();
        file.write_all(b"[evaluator]\nrules_file = \"rules.toml\"\n").unwrap();

        let config = LifeOpsConfig::from_file(&config_path).unwrap();
        let table = config.rule_table().unwrap();
        assert_eq!(table.len(), 1);
        assert_eq!(table.rules[0].action, "Rest");
    }

    #[test]
    fn test_config_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file
            .write_all(b"[output]\nformat = \"csv\"\nfilename = \"plan.csv\"\n")
            .unwrap();

        let config = LifeOpsConfig::from_file(temp_file.path()).unwrap();
        assert_eq!(config.output_format(), OutputFormat::Csv);
        assert_eq!(config.report_filename(), "plan.csv");
    }

    #[test]
    fn test_collection_sequence_order() {
        let toml_content = r#"
[profile.health]
stress_level = 5

[[signals]]
domain = "Study"
metric = "load"
value = 8
severity = 0.8
"#;
        let config = LifeOpsConfig::from_toml_str(toml_content).unwrap();
        let today = NaiveDate::from_ymd_opt(2026, 10, 19).unwrap();
        let sequence = config.collection_sequence(today).unwrap();
        assert_eq!(
            sequence.collector_names(),
            vec!["profile:health", "profile:finance", "profile:study", "config:signals"]
        );
    }
}
