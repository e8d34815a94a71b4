use crate::error::ReportError;
use crate::plot::OutputFormat;
use anyhow::{Context, Result};
use serde::Deserialize;
use std::{
    fmt::Debug,
    fs,
    ops::RangeBounds,
    path::{Path, PathBuf},
};

/// Column holding the duration in hours when none is given.
pub const DEFAULT_DATA_COL_INDEX: usize = 1;
/// Number of subplot columns when none is given.
pub const DEFAULT_NCOLS: usize = 3;
/// Raster pixels per plotting unit when none is given.
pub const DEFAULT_DPI: f64 = 100.0;
/// Plotting units per grid row and column when no figure size is given.
pub const UNITS_PER_SUBPLOT: f64 = 5.0;

/// Figure size in plotting units (inches).
#[derive(Debug, PartialEq, Clone, Copy)]
pub struct FigSize {
    pub width: f64,
    pub height: f64,
}

impl FigSize {
    /// Build a figure size from a list of numbers, which must hold exactly
    /// a width and a height.
    pub fn from_slice(vals: &[f64]) -> Result<Self, ReportError> {
        match *vals {
            [width, height] => Ok(Self { width, height }),
            _ => Err(ReportError::FigsizeArgument(vals.len())),
        }
    }

    /// Default size for a grid of `n_rows x n_cols` subplots.
    pub fn for_grid(n_rows: usize, n_cols: usize) -> Self {
        Self {
            width: UNITS_PER_SUBPLOT * n_cols as f64,
            height: UNITS_PER_SUBPLOT * n_rows as f64,
        }
    }

    /// Size in pixels at the given resolution.
    pub fn to_pixels(self, dpi: f64) -> (u32, u32) {
        (
            (self.width * dpi).round() as u32,
            (self.height * dpi).round() as u32,
        )
    }
}

/// Partially specified options.
///
/// Both the command line and the optional TOML config file produce one of
/// these. Missing fields fall through to the next source.
#[derive(Debug, PartialEq, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Options {
    pub data_col_index: Option<usize>,
    pub figsize: Option<Vec<f64>>,
    pub ncols: Option<usize>,
    pub output_file: Option<PathBuf>,
    pub dpi: Option<f64>,
    pub show: Option<bool>,
}

impl Options {
    /// Load options from a TOML file.
    pub fn from_file<P: AsRef<Path>>(file: P) -> Result<Self> {
        let file = file.as_ref();
        let contents = fs::read_to_string(file)
            .map_err(|err| ReportError::Config(format!("failed to read {file:?}: {err}")))?;
        let options: Options = toml::from_str(&contents)
            .map_err(|err| ReportError::Config(format!("failed to parse {file:?}: {err}")))?;
        Ok(options)
    }

    /// Fill every field missing in `self` from `other`.
    pub fn or(self, other: Options) -> Self {
        Self {
            data_col_index: self.data_col_index.or(other.data_col_index),
            figsize: self.figsize.or(other.figsize),
            ncols: self.ncols.or(other.ncols),
            output_file: self.output_file.or(other.output_file),
            dpi: self.dpi.or(other.dpi),
            show: self.show.or(other.show),
        }
    }
}

/// Report configuration.
///
/// Built once at startup with [`Config::resolve`] and validated before any
/// dataset is touched.
#[derive(Debug, PartialEq, Clone)]
pub struct Config {
    /// Zero-based index of the column holding the duration in hours.
    pub data_col_index: usize,
    /// Desired number of subplot columns (clamped to the number of datasets).
    pub ncols: usize,
    /// Explicit figure size; derived from the grid when `None`.
    pub figsize: Option<FigSize>,
    /// Explicit output path; derived from the input path when `None`.
    pub output_file: Option<PathBuf>,
    /// Raster pixels per plotting unit.
    pub dpi: f64,
    /// Open the written figure in the default viewer.
    pub show: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_col_index: DEFAULT_DATA_COL_INDEX,
            ncols: DEFAULT_NCOLS,
            figsize: None,
            output_file: None,
            dpi: DEFAULT_DPI,
            show: true,
        }
    }
}

impl Config {
    /// Merge command line options over the config file (if any) and defaults.
    ///
    /// The figure size given on the command line is checked before the config
    /// file is read, so a malformed `--figsize` fails without any file I/O.
    ///
    /// # Errors
    /// Returns an error if any option is invalid or the config file cannot be
    /// read or parsed.
    pub fn resolve(cli: Options, cfg_file: Option<&Path>) -> Result<Self> {
        if let Some(vals) = &cli.figsize {
            FigSize::from_slice(vals).context("invalid figsize argument")?;
        }

        let options = match cfg_file {
            Some(file) => {
                let file_options = Options::from_file(file)
                    .with_context(|| format!("failed to load config file {file:?}"))?;
                cli.or(file_options)
            }
            None => cli,
        };

        let default = Config::default();
        let figsize = match options.figsize {
            Some(vals) => Some(FigSize::from_slice(&vals).context("invalid figsize")?),
            None => None,
        };
        let cfg = Config {
            data_col_index: options.data_col_index.unwrap_or(default.data_col_index),
            ncols: options.ncols.unwrap_or(default.ncols),
            figsize,
            output_file: options.output_file,
            dpi: options.dpi.unwrap_or(default.dpi),
            show: options.show.unwrap_or(default.show),
        };

        cfg.validate().context("failed to validate config")?;

        Ok(cfg)
    }

    fn validate(&self) -> Result<(), ReportError> {
        check_num("ncols", self.ncols, 1..)?;
        check_num("dpi", self.dpi, 1.0..=1200.0)?;

        if let Some(figsize) = self.figsize {
            check_num("figsize width", figsize.width, f64::MIN_POSITIVE..1000.0)?;
            check_num("figsize height", figsize.height, f64::MIN_POSITIVE..1000.0)?;
        }

        if let Some(output_file) = &self.output_file {
            OutputFormat::from_path(output_file)?;
        }

        Ok(())
    }
}

fn check_num<T, R>(name: &str, num: T, range: R) -> Result<(), ReportError>
where
    T: PartialOrd + Debug,
    R: RangeBounds<T> + Debug,
{
    if !range.contains(&num) {
        return Err(ReportError::Config(format!(
            "{name} must be in the range {range:?}, but is {num:?}"
        )));
    }
    Ok(())
}
