use std::collections::{HashMap, HashSet};

use chrono::NaiveDate;
use tracing::{debug, warn};

use crate::config::settings::ScanSettings;
use crate::core::attribution::AttributionValidator;
use crate::core::dates::{parse_extracted, DateExtractor};
use crate::core::sources::SourceRegistry;
use crate::domain::model::{
    AggregatedReport, Candidate, Person, PersonMentions, PersonStats, ReportPeriod, Roster,
    SourceMode, ValidatedMention,
};
use crate::domain::ports::PersonCandidates;
use crate::utils::error::Result;

/// Turns raw per-person candidate streams into capped, de-duplicated mentions.
#[derive(Debug, Clone)]
pub struct ResultAggregator {
    registry: SourceRegistry,
    dates: DateExtractor,
    validator: AttributionValidator,
    mode: SourceMode,
    cap: usize,
    period: ReportPeriod,
    enforce_period: bool,
}

impl ResultAggregator {
    pub fn new(registry: SourceRegistry, dates: DateExtractor, validator: AttributionValidator) -> Self {
        Self {
            registry,
            dates,
            validator,
            mode: SourceMode::TrustedOnly,
            cap: 3,
            period: ReportPeriod::default(),
            enforce_period: false,
        }
    }

    pub fn from_settings(settings: &ScanSettings) -> Result<Self> {
        let registry = SourceRegistry::from_override(settings.trusted_sources.as_deref());
        let dates = DateExtractor::new(&settings.date_years, settings.effective_date_label())?;
        let validator = AttributionValidator::new(settings.proximity_window);

        Ok(Self::new(registry, dates, validator)
            .with_mode(settings.source_mode)
            .with_cap(settings.per_person_cap)
            .with_period(settings.period.clone(), settings.enforce_period))
    }

    pub fn with_mode(mut self, mode: SourceMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_cap(mut self, cap: usize) -> Self {
        self.cap = cap;
        self
    }

    /// With `enforce` set, mentions whose extracted date parses to a day
    /// outside the period are dropped. Undated mentions are always kept.
    pub fn with_period(mut self, period: ReportPeriod, enforce: bool) -> Self {
        self.period = period;
        self.enforce_period = enforce;
        self
    }

    pub fn registry(&self) -> &SourceRegistry {
        &self.registry
    }

    pub fn validator(&self) -> &AttributionValidator {
        &self.validator
    }

    pub fn aggregate<I>(&self, person: &Person, candidates: I, discovered_at: NaiveDate) -> PersonMentions
    where
        I: IntoIterator<Item = Candidate>,
    {
        let mut stats = PersonStats::default();
        let mut seen_urls: HashSet<String> = HashSet::new();
        let mut mentions = Vec::new();

        for candidate in candidates {
            stats.candidates_seen += 1;

            if candidate.url.trim().is_empty() || candidate.title.trim().is_empty() {
                stats.malformed += 1;
                continue;
            }

            if !self
                .validator
                .validate(&person.full_name, &candidate.title, &candidate.snippet)
            {
                stats.rejected_attribution += 1;
                continue;
            }

            let source = self.registry.lookup(&candidate.url);
            if !source.is_trusted && self.mode == SourceMode::TrustedOnly {
                stats.rejected_untrusted += 1;
                continue;
            }

            let text = format!("{} {}", candidate.title, candidate.snippet);
            let publication_date = self.dates.extract(&text);
            if self.enforce_period {
                if let Some(date) = parse_extracted(&publication_date) {
                    if !self.period.contains(date) {
                        stats.rejected_out_of_period += 1;
                        continue;
                    }
                }
            }

            // Dedup runs before the cap, so an over-cap URL still counts as seen.
            if !seen_urls.insert(candidate.url.clone()) {
                stats.duplicates += 1;
                continue;
            }

            if mentions.len() >= self.cap {
                stats.over_cap += 1;
                continue;
            }

            mentions.push(ValidatedMention::new(
                person.clone(),
                candidate,
                source.canonical_name,
                publication_date,
                discovered_at,
            ));
        }

        stats.accepted = mentions.len();
        debug!(
            person = %person.full_name,
            seen = stats.candidates_seen,
            accepted = stats.accepted,
            rejected = stats.rejected_attribution,
            untrusted = stats.rejected_untrusted,
            duplicates = stats.duplicates,
            "aggregated person"
        );

        PersonMentions {
            person: person.clone(),
            mentions,
            stats,
        }
    }

    /// Every roster person ends up in the report, with or without candidates.
    pub fn aggregate_all(
        &self,
        roster: &Roster,
        collected: Vec<PersonCandidates>,
        run_date: NaiveDate,
    ) -> AggregatedReport {
        let mut by_name: HashMap<String, Vec<Candidate>> = HashMap::new();
        for batch in collected {
            by_name
                .entry(batch.person.full_name)
                .or_default()
                .extend(batch.candidates);
        }

        let entries = roster
            .persons()
            .iter()
            .map(|person| {
                let candidates = by_name.remove(&person.full_name).unwrap_or_default();
                self.aggregate(person, candidates, run_date)
            })
            .collect();

        for name in by_name.keys() {
            warn!(person = %name, "candidates for a person not on the roster were ignored");
        }

        AggregatedReport::from_entries(entries)
    }
}
