mod config;
mod data;
mod display;
mod error;
mod layout;
mod manager;
mod plot;
mod stats;

use crate::config::{Config, Options};
use crate::manager::Manager;
use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;

/// Summarize time effort estimations from CSV files and plot one histogram per file.
#[derive(Debug, Parser)]
#[command(version, about)]
struct CLI {
    /// CSV file with the estimated durations in hours, or a directory whose
    /// CSV files (non-recursively) are all processed.
    input_path: PathBuf,

    /// Index of the column holding the duration in hours [default: 1].
    #[arg(long = "data_col_index")]
    data_col_index: Option<usize>,

    /// Figure size as two numbers (width and height); derived from the
    /// number of subplots if not given.
    #[arg(long, num_args = 0.., allow_negative_numbers = true)]
    figsize: Option<Vec<f64>>,

    /// Number of subplot columns [default: 3].
    #[arg(long)]
    ncols: Option<usize>,

    /// Path of the figure; its extension selects the format. Defaults to
    /// time_effort_estimation.png next to the input file or inside the
    /// input directory.
    #[arg(long = "output_file")]
    output_file: Option<PathBuf>,

    /// Pixels per figure size unit for raster output [default: 100].
    #[arg(long)]
    dpi: Option<f64>,

    /// Do not open the figure in the default viewer after saving it.
    #[arg(long = "no_show")]
    no_show: bool,

    /// TOML file with default values for the options above.
    #[arg(long)]
    config: Option<PathBuf>,
}

fn main() {
    env_logger::Builder::new()
        .format_timestamp_millis()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .init();

    if let Err(error) = run_cli() {
        log::error!("{error:#?}");
        std::process::exit(1);
    }
}

fn run_cli() -> Result<()> {
    let args = CLI::parse();
    log::info!("{args:#?}");

    let options = Options {
        data_col_index: args.data_col_index,
        figsize: args.figsize,
        ncols: args.ncols,
        output_file: args.output_file,
        dpi: args.dpi,
        show: args.no_show.then_some(false),
    };
    let cfg =
        Config::resolve(options, args.config.as_deref()).context("failed to construct cfg")?;
    log::info!("{cfg:#?}");
    let show = cfg.show;

    let mgr = Manager::new(&args.input_path, cfg).context("failed to construct mgr")?;
    let output_file = mgr.generate_report()?;

    if show {
        display::show(&output_file);
    }

    Ok(())
}
