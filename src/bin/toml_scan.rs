use anyhow::Context;
use clap::Parser;
use media_mentions::adapters::{build_gateway, roster::resolve_roster};
use media_mentions::config::toml_config::TomlConfig;
use media_mentions::core::queries::QueryPlanner;
use media_mentions::domain::model::Roster;
use media_mentions::domain::ports::ConfigProvider;
use media_mentions::utils::{logger, validation::Validate};
use media_mentions::{EtlEngine, LocalStorage, MentionPipeline};

#[derive(Parser)]
#[command(name = "toml-scan")]
#[command(about = "Media mention scan driven by a TOML configuration file")]
struct Args {
    /// Path to TOML configuration file
    #[arg(short, long, default_value = "media-mentions.toml")]
    config: String,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Override monitoring setting from config
    #[arg(long)]
    monitor: Option<bool>,

    /// Show the roster and planned queries without searching
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let config = match TomlConfig::from_file(&args.config) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("❌ Failed to load config file '{}': {}", args.config, e);
            eprintln!("💡 Make sure the file exists and is valid TOML format");
            std::process::exit(e.exit_code().max(1));
        }
    };

    logger::init_logger(args.verbose, config.run.log_json);
    tracing::info!("🚀 Starting TOML-based media mention scan");
    tracing::info!("📁 Configuration loaded from: {}", args.config);

    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(e.exit_code().max(1));
    }

    let engine_settings = config.engine_settings();
    let roster = match resolve_roster(
        &config.roster.names,
        config.roster.path.as_deref(),
        config.roster.url.as_deref(),
        &engine_settings,
    )
    .await
    {
        Ok(roster) => roster,
        Err(e) => {
            tracing::error!("❌ Could not load roster: {}", e);
            eprintln!("❌ {}", e.user_friendly_message());
            std::process::exit(e.exit_code().max(1));
        }
    };

    display_config_summary(&config, &roster, &args);

    if args.dry_run {
        tracing::info!("🔍 DRY RUN MODE - No searches will be sent");
        perform_dry_run(&config, &roster);
        return Ok(());
    }

    let monitor_enabled = args.monitor.unwrap_or_else(|| config.monitoring_enabled());
    if monitor_enabled {
        tracing::info!("🔍 System monitoring enabled");
    }

    let gateway = build_gateway(&engine_settings)
        .with_context(|| format!("building {:?} gateway", engine_settings.engine))?;
    let storage = LocalStorage::new(config.output_path().to_string());
    let pipeline = MentionPipeline::new(storage, config, gateway, roster)
        .context("preparing scan pipeline")?;
    let engine = EtlEngine::new_with_monitoring(pipeline, monitor_enabled);

    match engine.run().await {
        Ok(output_path) => {
            tracing::info!("✅ Scan completed successfully!");
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

fn display_config_summary(config: &TomlConfig, roster: &Roster, args: &Args) {
    let scan = config.scan_settings();
    let engine = config.engine_settings();

    println!("📋 Configuration Summary:");
    println!("  Period: {}", scan.period.label);
    println!("  Roster: {} persons", roster.len());
    println!("  Engine: {:?} ({})", engine.engine, engine.base_url());
    println!("  Source mode: {:?}", scan.source_mode);
    println!("  Per-person cap: {}", scan.per_person_cap);
    println!("  Proximity window: {} words", scan.proximity_window);
    println!("  Output: {}", config.output_path());
    println!("  Concurrent persons: {}", config.concurrent_requests());
    println!(
        "  Politeness: {}-{} ms, {} queries in flight",
        engine.min_delay_ms, engine.max_delay_ms, engine.max_concurrent_queries
    );

    if args.dry_run {
        println!("  🔍 DRY RUN MODE ENABLED");
    }

    println!();
}

fn perform_dry_run(config: &TomlConfig, roster: &Roster) {
    let scan = config.scan_settings();
    let planner = QueryPlanner::from_settings(&scan);

    println!("🔍 Dry Run Analysis:");
    println!();
    println!("👥 Roster:");
    for name in roster.names() {
        println!("  {}", name);
    }

    if let Some(first) = roster.persons().first() {
        println!();
        println!("🔎 Queries for {}:", first.full_name);
        for query in planner.queries_for(first) {
            println!("  {}", query);
        }
    }

    let total = roster.len() * planner.len();
    println!();
    println!(
        "📊 {} queries in total, up to {} results each",
        total, scan.results_per_query
    );
    println!("✅ Dry run analysis complete.");
}
