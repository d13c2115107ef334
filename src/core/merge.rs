use std::collections::HashSet;

use chrono::NaiveDate;

use crate::core::report::sentinel_row;
use crate::domain::model::{ReportPeriod, TabularRow};

/// Combines tabular reports from several runs into one.
///
/// Sentinel rows are dropped, `(Faculty Name, URL)` pairs keep their first
/// occurrence, rows are stably sorted by faculty then date found, and Search
/// Order is renumbered per person.
pub fn merge_rows<I>(batches: I, period: &ReportPeriod, run_date: NaiveDate) -> Vec<TabularRow>
where
    I: IntoIterator<Item = Vec<TabularRow>>,
{
    let mut seen: HashSet<(String, String)> = HashSet::new();
    let mut rows: Vec<TabularRow> = batches
        .into_iter()
        .flatten()
        .filter(|row| !row.is_sentinel())
        .filter(|row| seen.insert((row.faculty_name.clone(), row.url.clone())))
        .collect();

    rows.sort_by(|a, b| {
        a.faculty_name
            .cmp(&b.faculty_name)
            .then_with(|| a.date_found.cmp(&b.date_found))
    });

    let mut current: Option<String> = None;
    let mut order = 0;
    for row in rows.iter_mut() {
        if current.as_deref() != Some(row.faculty_name.as_str()) {
            current = Some(row.faculty_name.clone());
            order = 0;
        }
        order += 1;
        row.search_order = Some(order);
    }

    if rows.is_empty() {
        rows.push(sentinel_row(period, run_date));
    }
    rows
}
