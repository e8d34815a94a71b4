use crate::config::Config;
use crate::data::Dataset;
use crate::error::ReportError;
use crate::plot::{Figure, Panel};
use anyhow::{Context, Result};
use glob::{MatchOptions, Pattern, glob_with};
use std::path::{Path, PathBuf};

/// File name of the figure when no output file is given.
pub const DEFAULT_OUTPUT_NAME: &str = "time_effort_estimation.png";

/// Report generator.
///
/// Resolves the input path into datasets, summarizes them and writes the
/// histogram grid. Any error aborts the whole report.
pub struct Manager {
    input_path: PathBuf,
    cfg: Config,
}

impl Manager {
    pub fn new<P: AsRef<Path>>(input_path: P, cfg: Config) -> Result<Self> {
        let input_path = input_path.as_ref().to_path_buf();
        if !input_path.exists() {
            return Err(ReportError::InputNotFound(input_path).into());
        }
        Ok(Self { input_path, cfg })
    }

    /// Files to report on, in subplot order.
    ///
    /// A directory yields every `*.csv` file directly inside it, sorted by
    /// name; a file yields itself.
    pub fn input_files(&self) -> Result<Vec<PathBuf>> {
        if !self.input_path.is_dir() {
            return Ok(vec![self.input_path.clone()]);
        }

        let dir = self
            .input_path
            .to_str()
            .context("input path is not valid UTF-8")?;
        let pattern = Path::new(&Pattern::escape(dir)).join("*.csv");
        let pattern = pattern.to_str().context("pattern is not valid UTF-8")?;
        let options = MatchOptions {
            require_literal_leading_dot: true,
            ..MatchOptions::new()
        };

        let mut files: Vec<_> = glob_with(pattern, options)
            .context("failed to glob input files")?
            .filter_map(Result::ok)
            .filter(|p| p.is_file())
            .collect();
        files.sort_by(|a, b| a.file_name().cmp(&b.file_name()));

        if files.is_empty() {
            return Err(ReportError::NoDatasets(self.input_path.clone()).into());
        }
        Ok(files)
    }

    /// Destination of the figure.
    ///
    /// Without an explicit output file, the figure goes next to an input file
    /// or inside an input directory.
    pub fn output_file(&self) -> PathBuf {
        if let Some(output_file) = &self.cfg.output_file {
            return output_file.clone();
        }
        let dir = if self.input_path.is_dir() {
            self.input_path.as_path()
        } else {
            self.input_path.parent().unwrap_or(Path::new(""))
        };
        dir.join(DEFAULT_OUTPUT_NAME)
    }

    pub fn load_datasets(&self) -> Result<Vec<Dataset>> {
        let files = self.input_files().context("failed to resolve input files")?;

        let mut datasets = Vec::with_capacity(files.len());
        for file in files {
            let dataset = Dataset::from_file(&file, self.cfg.data_col_index)
                .with_context(|| format!("failed to load {file:?}"))?;
            datasets.push(dataset);
        }
        Ok(datasets)
    }

    /// Load every dataset and lay out its histogram.
    pub fn build_figure(&self) -> Result<Figure> {
        let datasets = self.load_datasets()?;

        let mut panels = Vec::with_capacity(datasets.len());
        for dataset in &datasets {
            let panel = Panel::new(dataset)
                .with_context(|| format!("failed to summarize {:?}", dataset.file()))?;
            log::info!("{:?}: {:?}", dataset.file(), panel.summary);
            log::debug!("{:?}: {} bins", dataset.file(), panel.hist.n_bins());
            panels.push(panel);
        }

        Ok(Figure::new(panels, self.cfg.ncols, self.cfg.figsize))
    }

    /// Build the figure and write it, returning the path written.
    pub fn generate_report(&self) -> Result<PathBuf> {
        let figure = self.build_figure()?;
        let grid = figure.grid();
        log::info!(
            "laid out {} subplots in a {}x{} grid ({} hidden slots)",
            figure.panels().len(),
            grid.n_rows(),
            grid.n_cols(),
            grid.n_hidden()
        );

        let output_file = self.output_file();
        figure
            .save(&output_file, self.cfg.dpi)
            .with_context(|| format!("failed to save {output_file:?}"))?;
        log::info!("saved {output_file:?}");

        Ok(output_file)
    }
}
