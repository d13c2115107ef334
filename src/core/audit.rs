//! Quality checks over a finished tabular report.

use serde::Serialize;
use tracing::debug;

use crate::core::attribution::AttributionValidator;
use crate::core::sources::SourceRegistry;
use crate::domain::model::TabularRow;

pub const REQUIRED_COLUMNS: [&str; 5] = ["Faculty Name", "Author", "Title", "Source", "URL"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum IssueKind {
    AuthorMismatch,
    EmptyTitle,
    EmptyUrl,
    UnverifiedAttribution,
    CrossAttribution,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AuditIssue {
    /// 1-based data row, header excluded.
    pub row: usize,
    pub faculty_name: String,
    pub kind: IssueKind,
    pub detail: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AuditReport {
    pub missing_columns: Vec<String>,
    pub rows_checked: usize,
    pub sentinel_rows: usize,
    pub trusted_rows: usize,
    pub issues: Vec<AuditIssue>,
}

impl AuditReport {
    /// Share of checked rows whose Source is a trusted canonical name.
    pub fn source_quality(&self) -> f64 {
        if self.rows_checked == 0 {
            return 1.0;
        }
        self.trusted_rows as f64 / self.rows_checked as f64
    }

    pub fn count(&self, kind: IssueKind) -> usize {
        self.issues.iter().filter(|i| i.kind == kind).count()
    }

    pub fn passed(&self) -> bool {
        self.missing_columns.is_empty() && self.issues.is_empty()
    }
}

pub struct ReportAuditor {
    registry: SourceRegistry,
    validator: AttributionValidator,
    extra_roster: Vec<String>,
}

impl ReportAuditor {
    pub fn new(registry: SourceRegistry, validator: AttributionValidator) -> Self {
        Self {
            registry,
            validator,
            extra_roster: Vec::new(),
        }
    }

    /// Names checked for cross-attribution in addition to the report's own faculty.
    pub fn with_roster<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.extra_roster = names.into_iter().map(Into::into).collect();
        self
    }

    pub fn audit(&self, columns: &[String], rows: &[TabularRow]) -> AuditReport {
        let missing_columns: Vec<String> = REQUIRED_COLUMNS
            .iter()
            .filter(|required| !columns.iter().any(|c| c.trim() == **required))
            .map(|c| c.to_string())
            .collect();
        if !missing_columns.is_empty() {
            return AuditReport {
                missing_columns,
                ..AuditReport::default()
            };
        }

        let mut roster: Vec<String> = self.extra_roster.clone();
        for row in rows {
            if !row.faculty_name.is_empty() && !roster.contains(&row.faculty_name) {
                roster.push(row.faculty_name.clone());
            }
        }

        let mut report = AuditReport::default();
        for (idx, row) in rows.iter().enumerate() {
            if row.is_sentinel() {
                report.sentinel_rows += 1;
                continue;
            }
            report.rows_checked += 1;
            let mut flag = |kind: IssueKind, detail: String| {
                report.issues.push(AuditIssue {
                    row: idx + 1,
                    faculty_name: row.faculty_name.clone(),
                    kind,
                    detail,
                });
            };

            if row.author != row.faculty_name {
                flag(
                    IssueKind::AuthorMismatch,
                    format!("author '{}' differs from faculty name", row.author),
                );
            }
            if row.title.trim().is_empty() {
                flag(IssueKind::EmptyTitle, "title is empty".to_string());
            }
            if row.url.trim().is_empty() {
                flag(IssueKind::EmptyUrl, "URL is empty".to_string());
            }
            if !self
                .validator
                .validate(&row.faculty_name, &row.title, &row.snippet)
            {
                flag(
                    IssueKind::UnverifiedAttribution,
                    format!("'{}' not found near each other in title or snippet", row.faculty_name),
                );
            }

            let text = format!("{} {}", row.title, row.snippet).to_lowercase();
            for other in roster.iter().filter(|name| **name != row.faculty_name) {
                if text.contains(&other.to_lowercase()) {
                    flag(
                        IssueKind::CrossAttribution,
                        format!("mentions another faculty member, {}", other),
                    );
                }
            }

            if self.registry.is_canonical_name(&row.source) {
                report.trusted_rows += 1;
            }
        }

        debug!(
            rows = report.rows_checked,
            issues = report.issues.len(),
            "audit finished"
        );
        report
    }
}
