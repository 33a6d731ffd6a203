//! Loads a plot's companion CSV file.
//!
//! Layout: header row `<unused>,<dataset_1>,...,<dataset_N>`, then one row
//! per x-axis category: `<category_label>,<value_1>,...,<value_N>`. The
//! category label is kept as a literal string (it is a display label, e.g. a
//! year), values are parsed as floating point.

use csv::ReaderBuilder;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DataError {
    #[error("failed reading data file {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed CSV in {path}")]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },
    #[error("{path}: empty data file (missing header row)")]
    EmptyFile { path: PathBuf },
    #[error("{path}: line {line}: expected {expected} columns, found {found}")]
    RowLength { path: PathBuf, line: usize, expected: usize, found: usize },
    #[error("{path}: line {line}, column {column}: '{value}' is not a number")]
    BadValue { path: PathBuf, line: usize, column: usize, value: String },
}

/// One plot's data: category labels down the first column, one named numeric
/// column per dataset.
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    pub dataset_names: Vec<String>,
    pub category_labels: Vec<String>,
    /// Row-major: `values[category][dataset]`.
    pub values: Vec<Vec<f64>>,
}

impl Dataset {
    pub fn category_count(&self) -> usize {
        self.category_labels.len()
    }

    pub fn dataset_count(&self) -> usize {
        self.dataset_names.len()
    }
}

/// Read `path` into a [`Dataset`]. Always re-reads the file; nothing is
/// cached between invocations.
pub fn load_dataset(path: &Path) -> Result<Dataset, DataError> {
    let file = std::fs::File::open(path)
        .map_err(|source| DataError::Io { path: path.to_path_buf(), source })?;

    // The csv reader strips a leading UTF-8 BOM; lengths are checked by hand
    // so that a short row reports its own line number.
    let mut reader = ReaderBuilder::new().has_headers(true).flexible(true).from_reader(file);

    let headers = reader
        .headers()
        .map_err(|source| DataError::Csv { path: path.to_path_buf(), source })?
        .clone();
    if headers.is_empty() || (headers.len() == 1 && headers[0].trim().is_empty()) {
        return Err(DataError::EmptyFile { path: path.to_path_buf() });
    }

    // Header column 0 is reserved for the category column and discarded.
    let dataset_names: Vec<String> = headers.iter().skip(1).map(str::to_string).collect();
    let expected = headers.len();

    let mut category_labels = Vec::new();
    let mut values = Vec::new();

    for (index, record) in reader.records().enumerate() {
        let line = index + 2;
        let record = record.map_err(|source| DataError::Csv { path: path.to_path_buf(), source })?;
        if record.len() != expected {
            return Err(DataError::RowLength {
                path: path.to_path_buf(),
                line,
                expected,
                found: record.len(),
            });
        }

        category_labels.push(record[0].to_string());

        let mut row = Vec::with_capacity(expected - 1);
        for (offset, cell) in record.iter().skip(1).enumerate() {
            let parsed: f64 = cell.trim().parse().map_err(|_| DataError::BadValue {
                path: path.to_path_buf(),
                line,
                column: offset + 2,
                value: cell.to_string(),
            })?;
            row.push(parsed);
        }
        values.push(row);
    }

    Ok(Dataset { dataset_names, category_labels, values })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn write_csv(content: &str) -> (TempDir, PathBuf) {
        let tmp = TempDir::new().expect("tmp");
        let path = tmp.path().join("data.csv");
        fs::write(&path, content).expect("write csv");
        (tmp, path)
    }

    #[test]
    fn loads_header_labels_and_value_matrix() {
        let (_tmp, path) = write_csv("x,A,B\n2010,3,5\n2011,7,2\n");
        let data = load_dataset(&path).expect("dataset");
        assert_eq!(data.dataset_names, ["A", "B"]);
        assert_eq!(data.category_labels, ["2010", "2011"]);
        assert_eq!(data.values, [[3.0, 5.0], [7.0, 2.0]]);
        assert_eq!(data.category_count(), 2);
        assert_eq!(data.dataset_count(), 2);
    }

    #[test]
    fn category_labels_stay_literal_strings() {
        let (_tmp, path) = write_csv("x,A\n2010-2014,1.5\n");
        let data = load_dataset(&path).expect("dataset");
        assert_eq!(data.category_labels, ["2010-2014"]);
        assert_eq!(data.values, [[1.5]]);
    }

    #[test]
    fn tolerates_a_leading_bom() {
        let (_tmp, path) = write_csv("\u{feff}x,A\n2010,4\n");
        let data = load_dataset(&path).expect("dataset");
        assert_eq!(data.dataset_names, ["A"]);
        assert_eq!(data.values, [[4.0]]);
    }

    #[test]
    fn short_row_reports_its_line_number() {
        let (_tmp, path) = write_csv("x,A,B\n2010,3,5\n2011,7\n");
        let err = load_dataset(&path).expect_err("row length error");
        match err {
            DataError::RowLength { line, expected, found, .. } => {
                assert_eq!(line, 3);
                assert_eq!(expected, 3);
                assert_eq!(found, 2);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn non_numeric_cell_reports_line_and_column() {
        let (_tmp, path) = write_csv("x,A,B\n2010,3,five\n");
        let err = load_dataset(&path).expect_err("value error");
        match err {
            DataError::BadValue { line, column, value, .. } => {
                assert_eq!(line, 2);
                assert_eq!(column, 3);
                assert_eq!(value, "five");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn empty_file_is_fatal() {
        let (_tmp, path) = write_csv("");
        assert!(matches!(load_dataset(&path), Err(DataError::EmptyFile { .. })));
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let tmp = TempDir::new().expect("tmp");
        let err = load_dataset(&tmp.path().join("absent.csv")).expect_err("io error");
        assert!(matches!(err, DataError::Io { .. }));
    }
}
