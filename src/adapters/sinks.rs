//! Byte encoders for the report files. Writing goes through `Storage`.

use std::io::{Cursor, Write};

use serde::Serialize;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

use crate::domain::model::{GroupedSection, RunSummary, TabularRow};
use crate::utils::error::{Result, ScanError};

/// Column names plus rows of a tabular report read back from CSV.
#[derive(Debug, Clone, Default)]
pub struct TabularTable {
    pub columns: Vec<String>,
    pub rows: Vec<TabularRow>,
}

#[derive(Serialize)]
struct JsonReport<'a> {
    summary: &'a RunSummary,
    sections: &'a [GroupedSection],
}

pub fn encode_csv(rows: &[TabularRow]) -> Result<Vec<u8>> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    for row in rows {
        writer.serialize(row)?;
    }
    writer
        .into_inner()
        .map_err(|e| ScanError::IoError(e.into_error()))
}

/// Lenient reader: unknown columns are ignored and missing ones read as empty,
/// so reports from older runs can still be audited and merged.
pub fn read_tabular(bytes: &[u8]) -> Result<TabularTable> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_reader(bytes);
    let columns: Vec<String> = reader
        .headers()?
        .iter()
        .map(|h| h.trim().to_string())
        .collect();
    let index = |name: &str| columns.iter().position(|c| c == name);
    let positions: Vec<Option<usize>> = TabularRow::COLUMNS.iter().map(|c| index(c)).collect();

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        let field = |slot: usize| {
            positions[slot]
                .and_then(|i| record.get(i))
                .unwrap_or_default()
                .to_string()
        };
        rows.push(TabularRow {
            faculty_name: field(0),
            author: field(1),
            title: field(2),
            source: field(3),
            url: field(4),
            publication_date: field(5),
            date_found: field(6),
            search_order: field(7).trim().parse().ok(),
            snippet: field(8),
        });
    }

    Ok(TabularTable { columns, rows })
}

pub fn encode_json(summary: &RunSummary, sections: &[GroupedSection]) -> Result<Vec<u8>> {
    Ok(serde_json::to_vec_pretty(&JsonReport { summary, sections })?)
}

/// Zip archive of `(file name, contents)` pairs, in the given order.
pub fn encode_bundle(files: &[(String, Vec<u8>)]) -> Result<Vec<u8>> {
    let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

    for (name, data) in files {
        zip.start_file(name.as_str(), options)?;
        zip.write_all(data)?;
    }

    let cursor = zip.finish()?;
    Ok(cursor.into_inner())
}
