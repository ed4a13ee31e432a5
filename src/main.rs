use audit_feed::core::{ConfigProvider, Pipeline};
use audit_feed::utils::error::ErrorSeverity;
use audit_feed::utils::{logger, validation::Validate};
use audit_feed::{ArchiveConnector, AuditPipeline, CliConfig, EtlEngine, LocalStorage, TomlConfig};
use clap::Parser;
use std::path::Path;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = CliConfig::parse();

    logger::init_cli_logger(args.verbose, args.log_format);
    tracing::info!("Starting audit-feed CLI");
    if args.verbose {
        tracing::debug!("CLI config: {:?}", args);
    }

    let exit_code = match &args.config {
        Some(path) => {
            tracing::info!("📁 Loading configuration from: {}", path.display());
            match TomlConfig::from_file(path) {
                Ok(config) => execute(config, args.schema_only).await?,
                Err(e) => {
                    eprintln!("❌ Failed to load config file '{}': {}", path.display(), e);
                    eprintln!("💡 Make sure the file exists and is valid TOML format");
                    1
                }
            }
        }
        None => execute(args.clone(), args.schema_only).await?,
    };

    if exit_code > 0 {
        std::process::exit(exit_code);
    }
    Ok(())
}

async fn execute<C: ConfigProvider + Validate>(config: C, schema_only: bool) -> anyhow::Result<i32> {
    if schema_only {
        let pipeline = AuditPipeline::new(config)?;
        println!("{}", serde_json::to_string_pretty(&pipeline.schema())?);
        return Ok(0);
    }

    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());
        return Ok(1);
    }

    let output_path = Path::new(config.output_path()).join(config.archive_name());
    let storage = LocalStorage::new(config.output_path());
    let connector = ArchiveConnector::new(storage, config.archive_name());
    let engine = EtlEngine::new(AuditPipeline::new(config)?, connector);

    match engine.run().await {
        Ok(rows) => {
            println!("✅ Exported {} audited files", rows);
            println!("📁 Output saved to: {}", output_path.display());
            Ok(0)
        }
        Err(e) => {
            tracing::error!(
                "❌ Audit feed failed: {} (Category: {:?}, Severity: {:?})",
                e,
                e.category(),
                e.severity()
            );
            tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 Suggestion: {}", e.recovery_suggestion());

            Ok(match e.severity() {
                ErrorSeverity::Medium => 2,
                ErrorSeverity::High => 1,
                ErrorSeverity::Critical => 3,
            })
        }
    }
}
