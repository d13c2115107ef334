use crate::config::settings::ScanSettings;
use crate::domain::model::{Person, ReportPeriod};

pub const NAME_PLACEHOLDER: &str = "{name}";

/// Expands query templates for one person.
#[derive(Debug, Clone)]
pub struct QueryPlanner {
    templates: Vec<String>,
    freshness: Option<String>,
}

impl QueryPlanner {
    pub fn new(templates: Vec<String>, period: &ReportPeriod) -> Self {
        Self {
            templates: templates
                .into_iter()
                .map(|t| t.trim().to_string())
                .filter(|t| !t.is_empty())
                .collect(),
            freshness: period
                .start
                .map(|start| format!(" after:{}", start.format("%Y-%m-%d"))),
        }
    }

    pub fn from_settings(settings: &ScanSettings) -> Self {
        Self::new(settings.query_templates.clone(), &settings.period)
    }

    pub fn queries_for(&self, person: &Person) -> Vec<String> {
        self.templates
            .iter()
            .map(|template| {
                let mut query = template.replace(NAME_PLACEHOLDER, &person.full_name);
                if let Some(suffix) = &self.freshness {
                    query.push_str(suffix);
                }
                query
            })
            .collect()
    }

    pub fn len(&self) -> usize {
        self.templates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }
}
