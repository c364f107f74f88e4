//! In-memory report tables and their CSV representation.

use crate::BatchResult;
use std::path::Path;

/// A header row plus data rows, all as strings.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Table {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl Table {
    pub fn new(headers: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        Self { headers, rows }
    }

    /// Returns the index of the column named `name`.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }

    /// Returns the cell at `(row, column)`, or `""` when the row is short.
    pub fn cell(&self, row: usize, column: usize) -> &str {
        self.rows
            .get(row)
            .and_then(|r| r.get(column))
            .map_or("", String::as_str)
    }
}

/// Reads a CSV file with a header row.
///
/// Rows may have fewer fields than the header; missing trailing cells read as empty.
pub fn read_table(path: &Path) -> BatchResult<Table> {
    let mut reader = csv::ReaderBuilder::new().flexible(true).from_path(path)?;
    let headers: Vec<String> = reader.headers()?.iter().map(str::to_owned).collect();

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        let mut row: Vec<String> = record.iter().map(str::to_owned).collect();
        if row.len() < headers.len() {
            row.resize(headers.len(), String::new());
        }
        rows.push(row);
    }

    Ok(Table { headers, rows })
}

/// Writes a table as CSV with a header row.
pub fn write_table(path: &Path, table: &Table) -> BatchResult<()> {
    let mut writer = csv::WriterBuilder::new().flexible(true).from_path(path)?;
    writer.write_record(&table.headers)?;
    for row in &table.rows {
        writer.write_record(row)?;
    }
    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_write_then_read_preserves_multiline_cells() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("reports.csv");
        let table = Table::new(
            vec!["MRN".into(), "Path Report Text".into()],
            vec![vec![
                "001".into(),
                "SPECIMEN SUBMITTED:\nA. skin, \"left\" arm".into(),
            ]],
        );

        write_table(&path, &table).unwrap();
        let read = read_table(&path).unwrap();
        assert_eq!(read, table);
    }

    #[test]
    fn test_read_pads_short_rows() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("short.csv");
        std::fs::write(&path, "MRN,Path Report Text\n001\n").unwrap();

        let table = read_table(&path).unwrap();
        assert_eq!(table.rows, vec![vec!["001".to_string(), String::new()]]);
    }

    #[test]
    fn test_cell_defaults_to_empty() {
        let table = Table::new(vec!["a".into()], vec![vec![]]);
        assert_eq!(table.cell(0, 0), "");
        assert_eq!(table.cell(5, 0), "");
        assert_eq!(table.column_index("a"), Some(0));
        assert_eq!(table.column_index("b"), None);
    }

    #[test]
    fn test_read_missing_file_fails() {
        let temp_dir = TempDir::new().unwrap();
        assert!(read_table(&temp_dir.path().join("absent.csv")).is_err());
    }
}
