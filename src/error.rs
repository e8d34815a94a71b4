//! Error taxonomy of the report generator.
//!
//! Every variant is fatal. Operations return [`anyhow::Result`] and wrap these
//! with context, so callers recover the typed cause with
//! `error.downcast_ref::<ReportError>()`.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ReportError {
    #[error("input path {0:?} does not exist")]
    InputNotFound(PathBuf),

    #[error("input directory {0:?} contains no CSV files")]
    NoDatasets(PathBuf),

    #[error("column index {index} is out of range for {file:?} ({n_cols} columns)")]
    ColumnIndex {
        file: PathBuf,
        index: usize,
        n_cols: usize,
    },

    #[error("invalid value {value:?} in {file:?} at line {line}: {reason}")]
    DataFormat {
        file: PathBuf,
        line: u64,
        value: String,
        reason: String,
    },

    #[error("dataset {0:?} has no values")]
    EmptyDataset(PathBuf),

    #[error("histogram range 0..{max} would need more than {max_bins} bins")]
    BinRange { max: f64, max_bins: usize },

    #[error("figsize must have exactly two numbers (width and height), but has {0}")]
    FigsizeArgument(usize),

    #[error("unsupported output format {0:?} (expected png, jpg, jpeg, bmp or svg)")]
    OutputFormat(String),

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("failed to render figure: {0}")]
    Render(String),
}
