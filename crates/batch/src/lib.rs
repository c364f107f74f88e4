//! # Pathology Report Batch Driver
//!
//! Runs report extraction over a table of reports and fans each input row out into one row per
//! extracted specimen.
//!
//! - Reports are processed in parallel; output keeps input row order and, within a row,
//!   specimen order.
//! - A missing or empty report cell is processed as an empty report.
//! - Rows whose report yields no specimens contribute no output rows.

mod driver;
mod table;

pub use driver::{expand_rows, process_reports, run, BatchConfig, BatchSummary, OUTPUT_COLUMNS};
pub use table::{read_table, write_table, Table};

/// The report text column used when none is configured.
pub const DEFAULT_TEXT_COLUMN: &str = "Path Report Text";

/// Errors that can occur while running a batch
#[derive(Debug, thiserror::Error)]
pub enum BatchError {
    /// The configured report text column is not in the input header
    #[error("report text column not found: {0}")]
    MissingColumn(String),

    /// CSV parsing or writing failed
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// I/O error occurred
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The worker pool could not be created
    #[error("failed to build worker pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}

pub type BatchResult<T> = std::result::Result<T, BatchError>;
