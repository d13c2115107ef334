//! Renders an aggregated report into the spreadsheet rows and the
//! per-person citation document.

use chrono::NaiveDate;

use crate::config::settings::{ScanSettings, DEFAULT_REPORT_TITLE};
use crate::domain::model::{
    AggregatedReport, GroupedSection, ReportPeriod, RunSummary, TabularRow, TransformResult,
    ValidatedMention,
};

pub const NO_MENTIONS_NOTICE: &str = "No media mentions found for this period.";

#[derive(Debug, Clone)]
pub struct ReportAssembler {
    period: ReportPeriod,
    snippet_budget: usize,
    title: String,
}

impl ReportAssembler {
    pub fn new(period: ReportPeriod, snippet_budget: usize) -> Self {
        Self {
            period,
            snippet_budget,
            title: DEFAULT_REPORT_TITLE.to_string(),
        }
    }

    pub fn from_settings(settings: &ScanSettings) -> Self {
        Self::new(settings.period.clone(), settings.snippet_budget)
            .with_title(settings.report_title.clone())
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn period(&self) -> &ReportPeriod {
        &self.period
    }

    pub fn render_tabular(&self, report: &AggregatedReport, run_date: NaiveDate) -> Vec<TabularRow> {
        let mut rows = Vec::with_capacity(report.total_mentions());
        for entry in report.with_mentions() {
            for (idx, mention) in entry.mentions.iter().enumerate() {
                rows.push(TabularRow {
                    faculty_name: entry.person.full_name.clone(),
                    author: entry.person.full_name.clone(),
                    title: mention.title().to_string(),
                    source: mention.source_name().to_string(),
                    url: mention.url().to_string(),
                    publication_date: mention.publication_date().to_string(),
                    date_found: mention.discovered_at().to_string(),
                    search_order: Some(idx + 1),
                    snippet: truncate_snippet(mention.snippet(), self.snippet_budget),
                });
            }
        }

        if rows.is_empty() {
            rows.push(sentinel_row(&self.period, run_date));
        }
        rows
    }

    pub fn render_grouped(&self, report: &AggregatedReport) -> Vec<GroupedSection> {
        report
            .entries()
            .iter()
            .map(|entry| {
                let lines = if entry.mentions.is_empty() {
                    vec![NO_MENTIONS_NOTICE.to_string()]
                } else {
                    entry.mentions.iter().map(citation_line).collect()
                };
                GroupedSection {
                    person: entry.person.full_name.clone(),
                    lines,
                    has_mentions: !entry.mentions.is_empty(),
                }
            })
            .collect()
    }

    /// Markdown document: title, period, then one heading per person.
    pub fn render_document(&self, sections: &[GroupedSection]) -> String {
        let mut doc = format!("# {}\n\n## {}\n\n", self.title, self.period.label);
        for section in sections {
            doc.push_str(&format!("### {}\n\n", section.person));
            for line in &section.lines {
                doc.push_str(line);
                doc.push_str("\n\n");
            }
        }
        doc
    }

    pub fn assemble(&self, report: AggregatedReport, run_date: NaiveDate) -> TransformResult {
        let rows = self.render_tabular(&report, run_date);
        let sections = self.render_grouped(&report);
        let summary = RunSummary::from_report(&report, &self.period, run_date);
        TransformResult {
            report,
            rows,
            sections,
            summary,
        }
    }
}

/// `"{author}, {title}, {source}, {date}, {url}."`
pub fn citation_line(mention: &ValidatedMention) -> String {
    format!(
        "{}, {}, {}, {}, {}.",
        mention.person().full_name,
        mention.title(),
        mention.source_name(),
        mention.publication_date(),
        mention.url()
    )
}

pub fn sentinel_row(period: &ReportPeriod, run_date: NaiveDate) -> TabularRow {
    TabularRow {
        faculty_name: String::new(),
        author: String::new(),
        title: format!("No media mentions found for {}", period.label),
        source: String::new(),
        url: String::new(),
        publication_date: period.label.clone(),
        date_found: run_date.to_string(),
        search_order: None,
        snippet: String::new(),
    }
}

/// Cuts to `budget` characters and marks the cut with `...`.
pub fn truncate_snippet(snippet: &str, budget: usize) -> String {
    if snippet.chars().count() <= budget {
        return snippet.to_string();
    }
    let mut cut: String = snippet.chars().take(budget).collect();
    cut.push_str("...");
    cut
}
