use crate::error::ReportError;
use std::path::Path;

/// Width of every histogram bin, in hours.
pub const BIN_WIDTH: f64 = 2.0;
/// Largest number of bins a single histogram may span.
pub const MAX_BINS: usize = 10_000;

/// Summary statistics of one dataset.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Summary {
    pub count: usize,
    pub mean: f64,
    pub median: f64,
    /// Maximum value rounded to the nearest integer (ties to even).
    pub max: f64,
}

impl Summary {
    /// Compute the summary of `vals`, read from `file`.
    pub fn new(file: &Path, vals: &[f64]) -> Result<Self, ReportError> {
        if vals.is_empty() {
            return Err(ReportError::EmptyDataset(file.to_path_buf()));
        }
        Ok(Self {
            count: vals.len(),
            mean: compute_mean(vals),
            median: compute_median(vals),
            max: vals
                .iter()
                .copied()
                .fold(f64::NEG_INFINITY, f64::max)
                .round_ties_even(),
        })
    }

    /// Second title line of a subplot.
    pub fn caption(&self) -> String {
        format!(
            "{} responses; mean = {:.1}; median = {:.1}",
            self.count, self.mean, self.median
        )
    }
}

/// Counts of values per fixed-width bin.
#[derive(Debug, Clone, PartialEq)]
pub struct Histogram {
    /// Bin edges; bin `i` spans `edges[i]..edges[i + 1]`.
    pub edges: Vec<f64>,
    pub counts: Vec<usize>,
}

impl Histogram {
    /// Bin `vals` with width [`BIN_WIDTH`] over `0..=max`.
    ///
    /// Edges run `0, 2, 4, ...` while below `max + BIN_WIDTH`, so the last edge
    /// may exceed `max`. All bins are half-open except the last, which is
    /// closed. Values outside the edges are not counted. There is always at
    /// least one bin, and at most [`MAX_BINS`].
    pub fn new(vals: &[f64], max: f64) -> Result<Self, ReportError> {
        let n_edges = ((max + BIN_WIDTH) / BIN_WIDTH).ceil().max(2.0);
        if !max.is_finite() || n_edges > (MAX_BINS + 1) as f64 {
            return Err(ReportError::BinRange { max, max_bins: MAX_BINS });
        }
        let n_edges = n_edges as usize;
        let edges: Vec<f64> = (0..n_edges).map(|i| i as f64 * BIN_WIDTH).collect();
        let n_bins = n_edges - 1;
        let upper = edges[n_bins];

        let mut counts = vec![0; n_bins];
        for &val in vals {
            if !(0.0..=upper).contains(&val) {
                continue;
            }
            let i_bin = ((val / BIN_WIDTH).floor() as usize).min(n_bins - 1);
            counts[i_bin] += 1;
        }

        Ok(Self { edges, counts })
    }

    pub fn n_bins(&self) -> usize {
        self.counts.len()
    }

    pub fn max_count(&self) -> usize {
        self.counts.iter().copied().max().unwrap_or(0)
    }

    /// Iterate over `(lower edge, upper edge, count)` of each bin.
    pub fn bins(&self) -> impl Iterator<Item = (f64, f64, usize)> + '_ {
        self.edges
            .windows(2)
            .zip(&self.counts)
            .map(|(edge, &count)| (edge[0], edge[1], count))
    }
}

fn compute_mean(vals: &[f64]) -> f64 {
    vals.iter().sum::<f64>() / vals.len() as f64
}

fn compute_median(vals: &[f64]) -> f64 {
    let mut sorted = vals.to_vec();
    sorted.sort_by(f64::total_cmp);
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        (sorted[mid - 1] + sorted[mid]) / 2.0
    } else {
        sorted[mid]
    }
}
