use clap::Parser;
use media_mentions::adapters::sinks::{encode_csv, read_tabular};
use media_mentions::core::merge::merge_rows;
use media_mentions::domain::model::ReportPeriod;
use media_mentions::domain::ports::Storage;
use media_mentions::utils::logger;
use media_mentions::utils::validation::validate_file_extensions;
use media_mentions::{LocalStorage, ScanError};

#[derive(Parser)]
#[command(name = "merge-reports")]
#[command(about = "Merge media mention spreadsheets from several runs")]
struct Args {
    /// Tabular reports (CSV) to merge, oldest first
    #[arg(required = true)]
    inputs: Vec<String>,

    /// Where to write the merged CSV
    #[arg(short, long, default_value = "media_mentions_merged.csv")]
    output: String,

    /// Label used in the placeholder row if nothing survives the merge
    #[arg(long, default_value = "June 2025 - July 2025")]
    period: String,

    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    logger::init_cli_logger(args.verbose);

    match merge(&args).await {
        Ok(location) => {
            println!("✅ Merged {} reports", args.inputs.len());
            println!("📁 Output saved to: {}", location);
        }
        Err(e) => {
            tracing::error!("❌ Merge failed: {}", e);
            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 Suggestion: {}", e.recovery_suggestion());
            std::process::exit(e.exit_code().max(1));
        }
    }
    Ok(())
}

async fn merge(args: &Args) -> Result<String, ScanError> {
    validate_file_extensions("inputs", &args.inputs, &["csv"])?;
    let storage = LocalStorage::new(".".to_string());

    let mut batches = Vec::with_capacity(args.inputs.len());
    for input in &args.inputs {
        let table = read_tabular(&storage.read_file(input).await?)?;
        tracing::info!(file = %input, rows = table.rows.len(), "Read report");
        batches.push(table.rows);
    }

    let period = ReportPeriod::new(args.period.clone());
    let rows = merge_rows(batches, &period, chrono::Local::now().date_naive());
    tracing::info!(rows = rows.len(), "Merged rows");

    storage.write_file(&args.output, &encode_csv(&rows)?).await?;
    Ok(storage.locate(&args.output))
}
