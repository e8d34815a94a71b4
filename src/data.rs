use crate::error::ReportError;
use anyhow::{Context, Result};
use csv::{ReaderBuilder, StringRecord, Trim};
use std::{
    fs::File,
    io::{BufReader, Read},
    path::{Path, PathBuf},
};

/// Durations (in hours) read from one column of one CSV file.
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    file: PathBuf,
    vals: Vec<f64>,
}

impl Dataset {
    pub fn new<P: AsRef<Path>>(file: P, vals: Vec<f64>) -> Self {
        Self {
            file: file.as_ref().to_path_buf(),
            vals,
        }
    }

    /// Load the column `col_index` of a CSV file with a header row.
    ///
    /// # Errors
    /// Returns an error if the file cannot be opened, if the column does not
    /// exist in the header or in any record, or if any value in the column is
    /// not a floating-point number.
    pub fn from_file<P: AsRef<Path>>(file: P, col_index: usize) -> Result<Self> {
        let file = file.as_ref();
        let reader = File::open(file).with_context(|| format!("failed to open {file:?}"))?;
        Self::from_reader(file, BufReader::new(reader), col_index)
    }

    /// Same as [`Dataset::from_file`], reading the contents from `reader`.
    /// `file` is only used to name the dataset and in error messages.
    pub fn from_reader<P: AsRef<Path>, R: Read>(
        file: P,
        reader: R,
        col_index: usize,
    ) -> Result<Self> {
        let file = file.as_ref();
        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .trim(Trim::All)
            .from_reader(reader);

        let header = reader
            .headers()
            .map_err(|err| csv_error(file, err))?
            .clone();
        if header.is_empty() {
            return Err(ReportError::DataFormat {
                file: file.to_path_buf(),
                line: 1,
                value: String::new(),
                reason: "missing header row".to_string(),
            }
            .into());
        }
        column(file, &header, col_index)?;

        let mut vals = Vec::new();
        let mut record = StringRecord::new();
        loop {
            match reader.read_record(&mut record) {
                Ok(true) => {}
                Ok(false) => break,
                Err(err) => return Err(csv_error(file, err).into()),
            }
            let line = record.position().map_or(0, |pos| pos.line());
            let cell = column(file, &record, col_index)?;
            let val = cell
                .parse::<f64>()
                .map_err(|err| err.to_string())
                .and_then(|val| {
                    if val.is_finite() {
                        Ok(val)
                    } else {
                        Err("value is not a finite number".to_string())
                    }
                })
                .map_err(|reason| ReportError::DataFormat {
                    file: file.to_path_buf(),
                    line,
                    value: cell.to_string(),
                    reason,
                })?;
            vals.push(val);
        }

        log::debug!("read {} values from {file:?}", vals.len());

        Ok(Self::new(file, vals))
    }

    pub fn file(&self) -> &Path {
        &self.file
    }

    /// Base name of the source file, as shown in subplot titles.
    pub fn name(&self) -> String {
        self.file
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.file.to_string_lossy().into_owned())
    }

    pub fn vals(&self) -> &[f64] {
        &self.vals
    }
}

/// Bounds-checked access to one cell of a record.
fn column<'r>(
    file: &Path,
    record: &'r StringRecord,
    index: usize,
) -> Result<&'r str, ReportError> {
    record.get(index).ok_or_else(|| ReportError::ColumnIndex {
        file: file.to_path_buf(),
        index,
        n_cols: record.len(),
    })
}

fn csv_error(file: &Path, err: csv::Error) -> ReportError {
    let line = err.position().map_or(0, |pos| pos.line());
    ReportError::DataFormat {
        file: file.to_path_buf(),
        line,
        value: String::new(),
        reason: err.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn load(contents: &str, col_index: usize) -> Result<Dataset> {
        Dataset::from_reader("answers.csv", contents.as_bytes(), col_index)
    }

    fn report_error(err: &anyhow::Error) -> &ReportError {
        err.downcast_ref::<ReportError>()
            .expect("error should carry a ReportError")
    }

    #[test]
    fn reads_configured_column() {
        let dataset = load("id,hours,comment\n1,4.5,a\n2, 10 ,b\n3,0,c\n", 1).unwrap();
        assert_eq!(dataset.vals(), &[4.5, 10.0, 0.0]);
        assert_eq!(dataset.name(), "answers.csv");
    }

    #[test]
    fn other_columns_are_not_parsed() {
        let dataset = load("name,hours\nalice,3\nbob,7\n", 1).unwrap();
        assert_eq!(dataset.vals(), &[3.0, 7.0]);
    }

    #[test]
    fn header_only_yields_empty_dataset() {
        let dataset = load("id,hours\n", 1).unwrap();
        assert!(dataset.vals().is_empty());
    }

    #[test]
    fn column_index_beyond_header_fails() {
        let err = load("id,hours\n1,2\n", 2).unwrap_err();
        assert!(matches!(
            report_error(&err),
            ReportError::ColumnIndex {
                index: 2,
                n_cols: 2,
                ..
            }
        ));
    }

    #[test]
    fn short_record_fails_with_column_index() {
        let err = load("id,hours\n1,2\n3\n", 1).unwrap_err();
        assert!(matches!(
            report_error(&err),
            ReportError::ColumnIndex { n_cols: 1, .. }
        ));
    }

    #[test]
    fn non_numeric_value_fails() {
        let err = load("id,hours\n1,2\n2,abc\n", 1).unwrap_err();
        match report_error(&err) {
            ReportError::DataFormat { value, line, .. } => {
                assert_eq!(value, "abc");
                assert_eq!(*line, 3);
            }
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn non_finite_values_fail() {
        for value in ["inf", "-infinity", "NaN"] {
            let err = load(&format!("id,hours\n1,2\n2,{value}\n"), 1).unwrap_err();
            match report_error(&err) {
                ReportError::DataFormat { value: bad, line, .. } => {
                    assert_eq!(bad, value);
                    assert_eq!(*line, 3);
                }
                other => panic!("unexpected error {other:?} for {value:?}"),
            }
        }
    }

    #[test]
    fn empty_file_fails_with_missing_header() {
        let err = load("", 0).unwrap_err();
        match report_error(&err) {
            ReportError::DataFormat { reason, .. } => assert_eq!(reason, "missing header row"),
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn empty_cell_is_not_coerced() {
        let err = load("id,hours\n1,\n", 1).unwrap_err();
        assert!(matches!(report_error(&err), ReportError::DataFormat { .. }));
    }
}
