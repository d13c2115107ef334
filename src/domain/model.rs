use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};

/// A faculty affiliate tracked for media mentions.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Person {
    pub full_name: String,
}

impl Person {
    pub fn new(full_name: impl Into<String>) -> Self {
        Self {
            full_name: full_name.into(),
        }
    }
}

/// Ordered, de-duplicated set of persons for one run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Roster {
    persons: Vec<Person>,
}

impl Roster {
    /// Names are trimmed; blanks and exact (case-sensitive) repeats are dropped, first occurrence wins.
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut seen = HashSet::new();
        let persons = names
            .into_iter()
            .map(|name| name.as_ref().trim().to_string())
            .filter(|name| !name.is_empty())
            .filter(|name| seen.insert(name.clone()))
            .map(Person::new)
            .collect();
        Self { persons }
    }

    pub fn persons(&self) -> &[Person] {
        &self.persons
    }

    pub fn len(&self) -> usize {
        self.persons.len()
    }

    pub fn is_empty(&self) -> bool {
        self.persons.is_empty()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.persons.iter().map(|p| p.full_name.as_str())
    }
}

/// Raw, unvalidated search hit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Candidate {
    pub title: String,
    pub url: String,
    pub snippet: String,
    pub query_used: String,
}

/// A candidate that passed attribution and was annotated with source and date.
/// Only constructed by the aggregator, so nothing unvalidated reaches the report layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidatedMention {
    person: Person,
    title: String,
    url: String,
    snippet: String,
    source_name: String,
    publication_date: String,
    discovered_at: NaiveDate,
}

impl ValidatedMention {
    pub(crate) fn new(
        person: Person,
        candidate: Candidate,
        source_name: String,
        publication_date: String,
        discovered_at: NaiveDate,
    ) -> Self {
        Self {
            person,
            title: candidate.title,
            url: candidate.url,
            snippet: candidate.snippet,
            source_name,
            publication_date,
            discovered_at,
        }
    }

    pub fn person(&self) -> &Person {
        &self.person
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn snippet(&self) -> &str {
        &self.snippet
    }

    pub fn source_name(&self) -> &str {
        &self.source_name
    }

    pub fn publication_date(&self) -> &str {
        &self.publication_date
    }

    pub fn discovered_at(&self) -> NaiveDate {
        self.discovered_at
    }
}

/// Whether untrusted sources are dropped or kept under a derived label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SourceMode {
    #[default]
    TrustedOnly,
    AllSources,
}

impl std::str::FromStr for SourceMode {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "trusted-only" | "trusted" => Ok(SourceMode::TrustedOnly),
            "all-sources" | "all" => Ok(SourceMode::AllSources),
            other => Err(format!("unknown source mode '{}'", other)),
        }
    }
}

/// Reporting period: a human label plus optional bounds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportPeriod {
    pub label: String,
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
}

impl ReportPeriod {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            start: None,
            end: None,
        }
    }

    pub fn with_bounds(mut self, start: Option<NaiveDate>, end: Option<NaiveDate>) -> Self {
        self.start = start;
        self.end = end;
        self
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start.is_none_or(|start| date >= start) && self.end.is_none_or(|end| date <= end)
    }

    /// File-name friendly form of the label, e.g. `june_2025_to_july_2025`.
    pub fn slug(&self) -> String {
        let mut slug = String::new();
        for word in self
            .label
            .split(|c: char| !c.is_alphanumeric() && c != '-')
            .filter(|w| !w.is_empty())
        {
            if !slug.is_empty() {
                slug.push('_');
            }
            if word == "-" {
                slug.push_str("to");
            } else {
                slug.push_str(&word.to_lowercase());
            }
        }
        if slug.is_empty() {
            "unspecified".to_string()
        } else {
            slug
        }
    }
}

impl Default for ReportPeriod {
    fn default() -> Self {
        Self::new("June 2025 - July 2025")
    }
}

/// Why the aggregator dropped (or kept) candidates for one person.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersonStats {
    pub candidates_seen: usize,
    pub malformed: usize,
    pub rejected_attribution: usize,
    pub rejected_untrusted: usize,
    pub rejected_out_of_period: usize,
    pub duplicates: usize,
    pub over_cap: usize,
    pub accepted: usize,
}

impl PersonStats {
    pub fn absorb(&mut self, other: &PersonStats) {
        self.candidates_seen += other.candidates_seen;
        self.malformed += other.malformed;
        self.rejected_attribution += other.rejected_attribution;
        self.rejected_untrusted += other.rejected_untrusted;
        self.rejected_out_of_period += other.rejected_out_of_period;
        self.duplicates += other.duplicates;
        self.over_cap += other.over_cap;
        self.accepted += other.accepted;
    }
}

/// One person's retained mentions, in discovery order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PersonMentions {
    pub person: Person,
    pub mentions: Vec<ValidatedMention>,
    pub stats: PersonStats,
}

/// Every roster person with their retained mentions, ordered by name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AggregatedReport {
    entries: Vec<PersonMentions>,
}

impl AggregatedReport {
    pub fn from_entries(mut entries: Vec<PersonMentions>) -> Self {
        entries.sort_by(|a, b| a.person.full_name.cmp(&b.person.full_name));
        Self { entries }
    }

    pub fn entries(&self) -> &[PersonMentions] {
        &self.entries
    }

    pub fn with_mentions(&self) -> impl Iterator<Item = &PersonMentions> {
        self.entries.iter().filter(|e| !e.mentions.is_empty())
    }

    pub fn without_mentions(&self) -> impl Iterator<Item = &Person> {
        self.entries
            .iter()
            .filter(|e| e.mentions.is_empty())
            .map(|e| &e.person)
    }

    pub fn total_mentions(&self) -> usize {
        self.entries.iter().map(|e| e.mentions.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.total_mentions() == 0
    }

    pub fn stats(&self) -> PersonStats {
        let mut total = PersonStats::default();
        for entry in &self.entries {
            total.absorb(&entry.stats);
        }
        total
    }
}

/// One spreadsheet row. Column names are fixed; downstream consumers key on them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TabularRow {
    #[serde(rename = "Faculty Name")]
    pub faculty_name: String,
    #[serde(rename = "Author")]
    pub author: String,
    #[serde(rename = "Title")]
    pub title: String,
    #[serde(rename = "Source")]
    pub source: String,
    #[serde(rename = "URL")]
    pub url: String,
    #[serde(rename = "Publication Date")]
    pub publication_date: String,
    #[serde(rename = "Date Found")]
    pub date_found: String,
    #[serde(rename = "Search Order")]
    pub search_order: Option<usize>,
    #[serde(rename = "Snippet")]
    pub snippet: String,
}

impl TabularRow {
    pub const COLUMNS: [&'static str; 9] = [
        "Faculty Name",
        "Author",
        "Title",
        "Source",
        "URL",
        "Publication Date",
        "Date Found",
        "Search Order",
        "Snippet",
    ];

    /// The "no results for period" placeholder has no person attached.
    pub fn is_sentinel(&self) -> bool {
        self.faculty_name.is_empty() && self.url.is_empty() && self.search_order.is_none()
    }
}

/// One heading of the narrative report with its citation lines.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupedSection {
    pub person: String,
    pub lines: Vec<String>,
    pub has_mentions: bool,
}

/// Counts for the end-of-run log and the JSON summary.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunSummary {
    pub period: String,
    pub run_date: String,
    pub persons: usize,
    pub persons_with_mentions: usize,
    pub total_mentions: usize,
    pub source_distribution: Vec<(String, usize)>,
    pub stats: PersonStats,
}

impl RunSummary {
    pub fn from_report(report: &AggregatedReport, period: &ReportPeriod, run_date: NaiveDate) -> Self {
        let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
        for entry in report.entries() {
            for mention in &entry.mentions {
                *counts.entry(mention.source_name()).or_default() += 1;
            }
        }
        let mut source_distribution: Vec<(String, usize)> = counts
            .into_iter()
            .map(|(name, count)| (name.to_string(), count))
            .collect();
        source_distribution.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));

        Self {
            period: period.label.clone(),
            run_date: run_date.to_string(),
            persons: report.entries().len(),
            persons_with_mentions: report.with_mentions().count(),
            total_mentions: report.total_mentions(),
            source_distribution,
            stats: report.stats(),
        }
    }
}

/// Output of the transform phase.
#[derive(Debug, Clone)]
pub struct TransformResult {
    pub report: AggregatedReport,
    pub rows: Vec<TabularRow>,
    pub sections: Vec<GroupedSection>,
    pub summary: RunSummary,
}
