//! Parallel report processing and row fan-out.

use crate::table::{read_table, write_table, Table};
use crate::{BatchError, BatchResult, DEFAULT_TEXT_COLUMN};
use pathreport_core::{Report, ReportExtractor, SpecimenRecord};
use rayon::prelude::*;
use std::path::Path;

/// Columns appended to every fanned-out row, in order.
pub const OUTPUT_COLUMNS: [&str; 6] = [
    "Accession No",
    "Specimen Identifier",
    "Specimen Description",
    "Diagnosis",
    "Microscopic Description",
    "Clinical Impression",
];

/// Batch driver configuration resolved at startup.
#[derive(Clone, Debug)]
pub struct BatchConfig {
    text_column: String,
    threads: Option<usize>,
}

impl BatchConfig {
    /// Create a new `BatchConfig`.
    ///
    /// `threads` of `None` (or `Some(0)`) uses the global rayon pool.
    pub fn new(text_column: impl Into<String>, threads: Option<usize>) -> Self {
        Self {
            text_column: text_column.into(),
            threads: threads.filter(|n| *n > 0),
        }
    }

    pub fn text_column(&self) -> &str {
        &self.text_column
    }

    pub fn threads(&self) -> Option<usize> {
        self.threads
    }
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self::new(DEFAULT_TEXT_COLUMN, None)
    }
}

/// Counts reported after a batch run.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct BatchSummary {
    pub reports: usize,
    pub reports_without_specimens: usize,
    pub rows_written: usize,
}

/// Extracts every report in parallel.
///
/// The result has one entry per input text, in input order.
pub fn process_reports<S>(extractor: &ReportExtractor, texts: &[S]) -> Vec<Report>
where
    S: AsRef<str> + Sync,
{
    texts
        .par_iter()
        .map(|text| extractor.extract(text.as_ref()))
        .collect()
}

/// Replicates each input row once per extracted specimen and appends the record columns.
///
/// # Errors
///
/// Returns `BatchError::MissingColumn` if the configured text column is not in the header, or
/// `BatchError::ThreadPool` if a dedicated pool was requested and could not be built.
pub fn expand_rows(
    table: &Table,
    cfg: &BatchConfig,
    extractor: &ReportExtractor,
) -> BatchResult<(Table, BatchSummary)> {
    let column = table
        .column_index(cfg.text_column())
        .ok_or_else(|| BatchError::MissingColumn(cfg.text_column().to_owned()))?;

    let texts: Vec<&str> = (0..table.rows.len())
        .map(|row| table.cell(row, column))
        .collect();

    let reports = match cfg.threads() {
        Some(threads) => rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .build()?
            .install(|| process_reports(extractor, &texts)),
        None => process_reports(extractor, &texts),
    };

    let mut headers = table.headers.clone();
    headers.extend(OUTPUT_COLUMNS.iter().map(|c| (*c).to_owned()));

    let mut summary = BatchSummary {
        reports: reports.len(),
        ..BatchSummary::default()
    };
    let mut rows = Vec::new();
    for (row, report) in table.rows.iter().zip(&reports) {
        if report.records.is_empty() {
            summary.reports_without_specimens += 1;
            continue;
        }
        for record in &report.records {
            let mut expanded = row.clone();
            expanded.resize(table.headers.len(), String::new());
            expanded.extend(record_columns(report, record));
            rows.push(expanded);
        }
    }
    summary.rows_written = rows.len();

    Ok((Table::new(headers, rows), summary))
}

fn record_columns(report: &Report, record: &SpecimenRecord) -> [String; 6] {
    [
        report
            .accession
            .as_ref()
            .map(|a| a.as_str().to_owned())
            .unwrap_or_default(),
        record.identifier.to_string(),
        record.description.clone(),
        record.diagnosis.clone(),
        record.microscopic_description.clone(),
        record.clinical_impression.clone(),
    ]
}

/// Reads `input`, expands every report row and writes the result to `output`.
pub fn run(
    input: &Path,
    output: &Path,
    cfg: &BatchConfig,
    extractor: &ReportExtractor,
) -> BatchResult<BatchSummary> {
    let table = read_table(input)?;
    tracing::info!(rows = table.rows.len(), input = %input.display(), "loaded reports");

    let (expanded, summary) = expand_rows(&table, cfg, extractor)?;
    write_table(output, &expanded)?;

    tracing::info!(
        reports = summary.reports,
        without_specimens = summary.reports_without_specimens,
        rows = summary.rows_written,
        output = %output.display(),
        "batch complete"
    );
    Ok(summary)
}
