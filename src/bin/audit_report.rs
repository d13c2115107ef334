use clap::Parser;
use media_mentions::adapters::roster::load_roster_file;
use media_mentions::adapters::sinks::read_tabular;
use media_mentions::core::attribution::AttributionValidator;
use media_mentions::core::audit::{IssueKind, ReportAuditor};
use media_mentions::core::sources::SourceRegistry;
use media_mentions::domain::ports::Storage;
use media_mentions::utils::logger;
use media_mentions::utils::validation::validate_file_extensions;
use media_mentions::{LocalStorage, ScanError};

#[derive(Parser)]
#[command(name = "audit-report")]
#[command(about = "Check a media mentions spreadsheet for attribution and source problems")]
struct Args {
    /// Tabular report (CSV) to audit
    report: String,

    /// Roster file; its names are also checked for cross-attribution
    #[arg(long)]
    roster: Option<String>,

    /// Proximity window used when re-validating rows
    #[arg(long, default_value = "5")]
    window: usize,

    /// Minimum share of rows from trusted outlets
    #[arg(long, default_value = "0.0")]
    min_source_quality: f64,

    /// Print the full audit as JSON
    #[arg(long)]
    json: bool,

    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    logger::init_cli_logger(args.verbose);

    match audit(&args).await {
        Ok(passed) => {
            if !passed {
                std::process::exit(1);
            }
        }
        Err(e) => {
            tracing::error!("❌ Audit failed: {}", e);
            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 Suggestion: {}", e.recovery_suggestion());
            std::process::exit(e.exit_code().max(1));
        }
    }
    Ok(())
}

async fn audit(args: &Args) -> Result<bool, ScanError> {
    validate_file_extensions("report", std::slice::from_ref(&args.report), &["csv"])?;
    let storage = LocalStorage::new(".".to_string());
    let table = read_tabular(&storage.read_file(&args.report).await?)?;

    let mut auditor = ReportAuditor::new(
        SourceRegistry::default(),
        AttributionValidator::new(args.window),
    );
    if let Some(path) = &args.roster {
        auditor = auditor.with_roster(load_roster_file(&storage, path).await?);
    }

    let report = auditor.audit(&table.columns, &table.rows);
    let quality_ok = report.source_quality() >= args.min_source_quality;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("📋 Audit of {}", args.report);
        if !report.missing_columns.is_empty() {
            println!("  ❌ Missing columns: {}", report.missing_columns.join(", "));
        }
        println!("  Rows checked: {}", report.rows_checked);
        println!("  Placeholder rows: {}", report.sentinel_rows);
        println!(
            "  Source quality: {:.0}% trusted",
            report.source_quality() * 100.0
        );
        for (kind, label) in [
            (IssueKind::AuthorMismatch, "Author differs from faculty name"),
            (IssueKind::EmptyTitle, "Empty titles"),
            (IssueKind::EmptyUrl, "Empty URLs"),
            (IssueKind::UnverifiedAttribution, "Attribution not verifiable"),
            (IssueKind::CrossAttribution, "Mentions another faculty member"),
        ] {
            println!("  {}: {}", label, report.count(kind));
        }
        for issue in &report.issues {
            println!("    row {} ({}): {}", issue.row, issue.faculty_name, issue.detail);
        }
    }

    let passed = report.passed() && quality_ok;
    if passed {
        println!("✅ Report passed the audit");
    } else {
        println!("❌ Report failed the audit");
    }
    Ok(passed)
}
