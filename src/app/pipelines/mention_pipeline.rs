use async_trait::async_trait;
use chrono::NaiveDate;
use futures::stream::{self, StreamExt};
use tracing::{debug, info, warn};

use crate::adapters::sinks::{encode_bundle, encode_csv, encode_json};
use crate::config::settings::ScanSettings;
use crate::core::aggregate::ResultAggregator;
use crate::core::queries::QueryPlanner;
use crate::core::report::ReportAssembler;
use crate::domain::model::{Person, Roster, TransformResult};
use crate::domain::ports::{ConfigProvider, PersonCandidates, Pipeline, SearchGateway, Storage};
use crate::utils::error::Result;

/// Roster-wide scan: search every person, validate and aggregate the hits,
/// then write the report files.
pub struct MentionPipeline<S: Storage, C: ConfigProvider, G: SearchGateway> {
    storage: S,
    config: C,
    gateway: G,
    roster: Roster,
    settings: ScanSettings,
    planner: QueryPlanner,
    aggregator: ResultAggregator,
    assembler: ReportAssembler,
    run_date: NaiveDate,
}

impl<S: Storage, C: ConfigProvider, G: SearchGateway> MentionPipeline<S, C, G> {
    pub fn new(storage: S, config: C, gateway: G, roster: Roster) -> Result<Self> {
        let settings = config.scan_settings();
        Ok(Self {
            planner: QueryPlanner::from_settings(&settings),
            aggregator: ResultAggregator::from_settings(&settings)?,
            assembler: ReportAssembler::from_settings(&settings),
            settings,
            storage,
            config,
            gateway,
            roster,
            run_date: chrono::Local::now().date_naive(),
        })
    }

    /// Fixes the "Date Found" stamp; handy for reproducible reports.
    pub fn with_run_date(mut self, run_date: NaiveDate) -> Self {
        self.run_date = run_date;
        self
    }

    pub fn roster(&self) -> &Roster {
        &self.roster
    }

    /// Base name shared by all report files of this period.
    pub fn output_stem(&self) -> String {
        format!("media_mentions_{}", self.settings.period.slug())
    }

    async fn search_person(&self, person: Person) -> PersonCandidates {
        let mut candidates = Vec::new();
        for query in self.planner.queries_for(&person) {
            match self
                .gateway
                .search(&query, self.settings.results_per_query)
                .await
            {
                Ok(hits) => candidates.extend(hits),
                Err(e) => warn!(
                    person = %person.full_name,
                    query = %query,
                    error = %e,
                    "query failed; continuing"
                ),
            }
        }
        debug!(person = %person.full_name, candidates = candidates.len(), "searched person");
        PersonCandidates { person, candidates }
    }
}

#[async_trait]
impl<S: Storage, C: ConfigProvider, G: SearchGateway> Pipeline for MentionPipeline<S, C, G> {
    async fn extract(&self) -> Result<Vec<PersonCandidates>> {
        let concurrency = self.config.concurrent_requests().max(1);
        info!(
            persons = self.roster.len(),
            queries_per_person = self.planner.len(),
            engine = self.gateway.name(),
            concurrency,
            "Searching roster"
        );

        // `buffered` yields in roster order whatever order the searches finish in.
        let collected = stream::iter(self.roster.persons().iter().cloned())
            .map(|person| self.search_person(person))
            .buffered(concurrency)
            .collect::<Vec<_>>()
            .await;
        Ok(collected)
    }

    async fn transform(&self, data: Vec<PersonCandidates>) -> Result<TransformResult> {
        let report = self.aggregator.aggregate_all(&self.roster, data, self.run_date);
        let result = self.assembler.assemble(report, self.run_date);

        let summary = &result.summary;
        let stats = &summary.stats;
        info!(
            persons = summary.persons,
            with_mentions = summary.persons_with_mentions,
            mentions = summary.total_mentions,
            "Aggregated mentions"
        );
        info!(
            seen = stats.candidates_seen,
            malformed = stats.malformed,
            attribution = stats.rejected_attribution,
            untrusted = stats.rejected_untrusted,
            out_of_period = stats.rejected_out_of_period,
            duplicates = stats.duplicates,
            over_cap = stats.over_cap,
            "Rejection counters"
        );
        for (source, count) in &summary.source_distribution {
            debug!(source = %source, count, "source distribution");
        }
        let missing: Vec<&str> = result
            .report
            .without_mentions()
            .map(|p| p.full_name.as_str())
            .collect();
        if !missing.is_empty() {
            info!(count = missing.len(), persons = ?missing, "No mentions found");
        }

        Ok(result)
    }

    async fn load(&self, result: TransformResult) -> Result<String> {
        let stem = self.output_stem();
        let csv_name = format!("{}.csv", stem);
        let files = vec![
            (csv_name.clone(), encode_csv(&result.rows)?),
            (
                format!("{}.md", stem),
                self.assembler
                    .render_document(&result.sections)
                    .into_bytes(),
            ),
            (
                format!("{}.json", stem),
                encode_json(&result.summary, &result.sections)?,
            ),
        ];

        for (name, data) in &files {
            debug!(file = %name, bytes = data.len(), "Writing report file");
            self.storage.write_file(name, data).await?;
        }

        if self.settings.bundle {
            let zip_name = format!("{}.zip", stem);
            let zip_data = encode_bundle(&files)?;
            debug!(file = %zip_name, bytes = zip_data.len(), "Writing report bundle");
            self.storage.write_file(&zip_name, &zip_data).await?;
            return Ok(self.storage.locate(&zip_name));
        }

        Ok(self.storage.locate(&csv_name))
    }
}
