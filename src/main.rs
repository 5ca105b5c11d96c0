use anyhow::Context;
use clap::Parser;
use lifeops::app::dashboard::{study_schedule_for, DashboardSummary};
use lifeops::core::ConfigProvider;
use lifeops::utils::logger;
use lifeops::{CliConfig, LifeOpsConfig, LifeOpsEngine, LocalStorage, RuleTable};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = CliConfig::parse();

    // 初始化日誌
    if args.log_json {
        logger::init_json_logger(args.verbose);
    } else {
        logger::init_cli_logger(args.verbose);
    }

    tracing::info!("🚀 Starting LifeOps evaluator");
    tracing::info!("📁 Loading configuration from: {}", args.config);

    let mut config = LifeOpsConfig::from_file(&args.config)
        .with_context(|| format!("failed to load config file '{}'", args.config))?;
    args.apply_overrides(&mut config);
    let today = args.today();

    // 驗證配置
    if let Err(e) = config.validate_as_of(today) {
        tracing::error!("❌ Configuration validation failed: {}", e);
        tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(e.exit_code().max(1));
    }

    let rules = match config.rule_table() {
        Ok(rules) => rules,
        Err(e) => {
            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 {}", e.recovery_suggestion());
            std::process::exit(e.exit_code().max(1));
        }
    };

    tracing::info!("✅ Configuration loaded and validated successfully");

    let sequence = config.collection_sequence(today)?;

    if args.dry_run {
        display_config_summary(&config, &rules, &sequence.collector_names());
        return Ok(());
    }

    let storage = LocalStorage::new(ConfigProvider::output_path(&config).unwrap_or("."));
    let profile = config.profile.clone().unwrap_or_default();
    let schedule = study_schedule_for(&profile, today);
    let has_profile = !profile.is_empty();

    let mut engine = LifeOpsEngine::new(rules, sequence, storage, config)?;
    if has_profile {
        engine = engine.with_summary(DashboardSummary::from_profile(&profile, today));
    }
    if let Some(schedule) = schedule {
        engine = engine.with_study_schedule(schedule);
    }

    match engine.run().await {
        Ok(output) => {
            if output.report.rejected.is_empty() {
                tracing::info!("✅ Evaluation completed");
            } else {
                tracing::warn!(
                    "⚠️ Evaluation completed with {} rejected signals",
                    output.report.rejected.len()
                );
            }

            match output.output_path {
                Some(path) => println!("📁 Report saved to: {}", path),
                None => println!("{}", output.rendered),
            }
        }
        Err(e) => {
            tracing::error!(
                "❌ Evaluation failed: {} (Category: {:?}, Severity: {:?})",
                e,
                e.category(),
                e.severity()
            );
            tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 {}", e.recovery_suggestion());

            let exit_code = e.exit_code();
            if exit_code > 0 {
                std::process::exit(exit_code);
            }
        }
    }

    Ok(())
}

fn display_config_summary(config: &LifeOpsConfig, rules: &RuleTable, collectors: &[&str]) {
    println!("📋 Configuration Summary:");
    println!("  Threshold: {:.2}", config.threshold());
    println!(
        "  Output: {} ({})",
        ConfigProvider::output_path(config).unwrap_or("stdout"),
        config.output_format()
    );
    println!(
        "  Collection: {} ({:?} on failure)",
        if config.is_parallel() { "parallel" } else { "sequential" },
        config.failure_policy()
    );
    println!("  Collectors: {}", collectors.join(", "));
    println!();

    println!("🔀 Rule table ({} rules):", rules.len());
    for (index, rule) in rules.rules.iter().enumerate() {
        println!(
            "  #{:<2} {:<7} {:<14} -> {:<7} w={:.2}  {}",
            index,
            rule.trigger.as_str(),
            rule.metric,
            rule.target.as_str(),
            rule.weight,
            rule.action
        );
    }

    println!();
    println!("🔍 DRY RUN MODE - no signals were collected");
}
