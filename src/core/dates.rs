//! Publication-date extraction from free text.

use chrono::NaiveDate;
use regex::{Regex, RegexBuilder};

use crate::utils::error::{Result, ScanError};

/// Accepted spellings per month, longest first; January is index 0.
const MONTH_FORMS: [&[&str]; 12] = [
    &["january", "jan"],
    &["february", "feb"],
    &["march", "mar"],
    &["april", "apr"],
    &["may"],
    &["june", "jun"],
    &["july", "jul"],
    &["august", "aug"],
    &["september", "sept", "sep"],
    &["october", "oct"],
    &["november", "nov"],
    &["december", "dec"],
];

#[derive(Debug, Clone)]
pub struct DateExtractor {
    patterns: Vec<Regex>,
    default_label: String,
}

impl DateExtractor {
    /// Patterns, in priority order: month-name day year, `MM/DD/YYYY` or
    /// `MM-DD-YYYY`, ISO `YYYY-MM-DD`. Only the listed years are recognised.
    pub fn new(years: &[i32], default_label: impl Into<String>) -> Result<Self> {
        let default_label = default_label.into();
        if default_label.trim().is_empty() {
            return Err(ScanError::ConfigError {
                message: "date placeholder label must not be empty".to_string(),
            });
        }
        if years.is_empty() {
            return Err(ScanError::ConfigError {
                message: "at least one publication year is required".to_string(),
            });
        }

        let years = years
            .iter()
            .map(|y| y.to_string())
            .collect::<Vec<_>>()
            .join("|");
        let months = MONTH_FORMS
            .iter()
            .flat_map(|forms| forms.iter())
            .copied()
            .collect::<Vec<_>>()
            .join("|");
        let sources = [
            format!(r"\b(?:{months})\.?\s+\d{{1,2}},?\s+(?:{years})\b"),
            format!(r"\b\d{{1,2}}[/-]\d{{1,2}}[/-](?:{years})\b"),
            format!(r"\b(?:{years})-\d{{2}}-\d{{2}}\b"),
        ];

        let patterns = sources
            .iter()
            .map(|source| {
                RegexBuilder::new(source)
                    .case_insensitive(true)
                    .build()
                    .map_err(|e| ScanError::ConfigError {
                        message: format!("invalid date pattern: {}", e),
                    })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            patterns,
            default_label,
        })
    }

    /// First matching date text as written, or the placeholder label. Never empty.
    pub fn extract(&self, text: &str) -> String {
        self.find(text)
            .map(str::to_string)
            .unwrap_or_else(|| self.default_label.clone())
    }

    pub fn find<'t>(&self, text: &'t str) -> Option<&'t str> {
        self.patterns
            .iter()
            .find_map(|pattern| pattern.find(text))
            .map(|m| m.as_str())
    }

    pub fn default_label(&self) -> &str {
        &self.default_label
    }
}

/// Best-effort calendar date for an extracted date string. `None` for the
/// placeholder or anything that doesn't resolve to a real day.
pub fn parse_extracted(text: &str) -> Option<NaiveDate> {
    let cleaned = text.trim().replace(',', "").replace('.', "");
    let parts: Vec<&str> = cleaned.split_whitespace().collect();

    if parts.len() == 3 {
        let month = month_number(parts[0])?;
        let day: u32 = parts[1].parse().ok()?;
        let year: i32 = parts[2].parse().ok()?;
        return NaiveDate::from_ymd_opt(year, month, day);
    }

    ["%Y-%m-%d", "%m/%d/%Y", "%m-%d-%Y"]
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(&cleaned, fmt).ok())
}

fn month_number(word: &str) -> Option<u32> {
    let word = word.to_lowercase();
    MONTH_FORMS
        .iter()
        .position(|forms| forms.contains(&word.as_str()))
        .map(|idx| idx as u32 + 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn extractor() -> DateExtractor {
        DateExtractor::new(&[2024, 2025], "2025").unwrap()
    }

    #[test]
    fn test_month_name_dates() {
        let dates = extractor();
        assert_eq!(dates.extract("Published June 12, 2025 by staff"), "June 12, 2025");
        assert_eq!(dates.extract("Updated Sept. 3 2024"), "Sept. 3 2024");
        assert_eq!(dates.extract("JAN 5, 2025"), "JAN 5, 2025");
    }

    #[test]
    fn test_numeric_and_iso_dates() {
        let dates = extractor();
        assert_eq!(dates.extract("posted 07/04/2025 in opinion"), "07/04/2025");
        assert_eq!(dates.extract("posted 7-4-2024"), "7-4-2024");
        assert_eq!(dates.extract("https://x.org/2025-06-30/story"), "2025-06-30");
    }

    #[test]
    fn test_pattern_priority_beats_position() {
        let dates = extractor();
        assert_eq!(
            dates.extract("2025-01-02 archive copy of article from March 3, 2025"),
            "March 3, 2025"
        );
    }

    #[test]
    fn test_other_years_fall_back_to_placeholder() {
        let dates = extractor();
        assert_eq!(dates.extract("June 12, 2019"), "2025");
        assert_eq!(dates.extract(""), "2025");
        assert_eq!(dates.extract("13/45/2023 and 2023-01-01"), "2025");
    }

    #[test]
    fn test_words_starting_like_months_are_not_dates() {
        let dates = extractor();
        assert_eq!(dates.extract("Mayor 12, 2025 candidates debate"), "2025");
        assert_eq!(dates.extract("Marching 3, 2025 through the capital"), "2025");
        assert_eq!(dates.extract("Decide 4 2025"), "2025");
        assert_eq!(
            dates.extract("Mayor 12, 2025 race, reported May 13, 2025"),
            "May 13, 2025"
        );
    }

    #[test]
    fn test_empty_placeholder_is_rejected() {
        assert!(DateExtractor::new(&[2025], "  ").is_err());
        assert!(DateExtractor::new(&[], "2025").is_err());
    }

    #[test]
    fn test_parse_extracted() {
        assert_eq!(
            parse_extracted("June 12, 2025"),
            NaiveDate::from_ymd_opt(2025, 6, 12)
        );
        assert_eq!(
            parse_extracted("Sept. 3 2024"),
            NaiveDate::from_ymd_opt(2024, 9, 3)
        );
        assert_eq!(
            parse_extracted("07/04/2025"),
            NaiveDate::from_ymd_opt(2025, 7, 4)
        );
        assert_eq!(
            parse_extracted("2025-06-30"),
            NaiveDate::from_ymd_opt(2025, 6, 30)
        );
        assert_eq!(parse_extracted("2025"), None);
        assert_eq!(parse_extracted("Feb 30, 2025"), None);
        assert_eq!(parse_extracted("Mayor 12, 2025"), None);
        assert_eq!(
            parse_extracted("SEPTEMBER 1, 2024"),
            NaiveDate::from_ymd_opt(2024, 9, 1)
        );
    }
}
