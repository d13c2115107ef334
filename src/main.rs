use clap::Parser;
use media_mentions::adapters::{build_gateway, roster::resolve_roster};
use media_mentions::domain::ports::ConfigProvider;
use media_mentions::utils::{logger, validation::Validate};
use media_mentions::{CliConfig, EtlEngine, LocalStorage, MentionPipeline, ScanError};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = CliConfig::parse();

    logger::init_logger(config.verbose, config.log_json);

    tracing::info!("Starting media-mentions CLI");
    if config.verbose {
        tracing::debug!("CLI config: {:?}", config);
    }

    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(e.exit_code().max(1));
    }

    let monitor_enabled = config.monitor;
    if monitor_enabled {
        tracing::info!("🔍 System monitoring enabled");
    }

    match run(config, monitor_enabled).await {
        Ok(output_path) => {
            tracing::info!("✅ Scan completed successfully!");
            tracing::info!("📁 Reports saved to: {}", output_path);
            println!("✅ Scan completed successfully!");
            println!("📁 Reports saved to: {}", output_path);
        }
        Err(e) => {
            tracing::error!(
                "❌ Scan failed: {} (Category: {:?}, Severity: {:?})",
                e,
                e.category(),
                e.severity()
            );
            tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 Suggestion: {}", e.recovery_suggestion());

            let exit_code = e.exit_code();
            if exit_code > 0 {
                std::process::exit(exit_code);
            }
        }
    }

    Ok(())
}

async fn run(config: CliConfig, monitor_enabled: bool) -> Result<String, ScanError> {
    let engine_settings = config.engine_settings();
    let roster = resolve_roster(
        &config.names,
        config.roster.as_deref(),
        config.roster_url.as_deref(),
        &engine_settings,
    )
    .await?;
    tracing::info!("👥 Roster: {} persons", roster.len());

    let gateway = build_gateway(&engine_settings)?;
    let storage = LocalStorage::new(config.output_path.clone());
    let pipeline = MentionPipeline::new(storage, config, gateway, roster)?;

    let engine = EtlEngine::new_with_monitoring(pipeline, monitor_enabled);
    engine.run().await
}
