//! Figure model and rendering.
//!
//! A [`Figure`] is built from the loaded datasets without touching any
//! backend, then [`Figure::save`] draws it with [`plotters`] into a file whose
//! format follows the file extension.

use crate::config::FigSize;
use crate::data::Dataset;
use crate::error::ReportError;
use crate::layout::Grid;
use crate::stats::{Histogram, Summary};
use plotters::coord::Shift;
use plotters::prelude::*;
use std::path::Path;

/// Label of the horizontal axis of every subplot.
pub const X_LABEL: &str = "Estimated Hours";
const Y_LABEL: &str = "Count";
const FONT_FAMILY: &str = "sans-serif";

/// Image formats the rendering backends can write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Png,
    Jpeg,
    Bmp,
    Svg,
}

impl OutputFormat {
    /// Pick the format from the extension of `path` (case-insensitive).
    pub fn from_path(path: &Path) -> Result<Self, ReportError> {
        let ext = path
            .extension()
            .map(|ext| ext.to_string_lossy().to_ascii_lowercase())
            .unwrap_or_default();
        match ext.as_str() {
            "png" => Ok(Self::Png),
            "jpg" | "jpeg" => Ok(Self::Jpeg),
            "bmp" => Ok(Self::Bmp),
            "svg" => Ok(Self::Svg),
            _ => Err(ReportError::OutputFormat(ext)),
        }
    }
}

/// Histogram subplot of one dataset.
#[derive(Debug, Clone, PartialEq)]
pub struct Panel {
    pub title: String,
    pub summary: Summary,
    pub hist: Histogram,
}

impl Panel {
    pub fn new(dataset: &Dataset) -> Result<Self, ReportError> {
        let summary = Summary::new(dataset.file(), dataset.vals())?;
        let hist = Histogram::new(dataset.vals(), summary.max)?;
        let title = format!("{}\n{}", dataset.name(), summary.caption());
        Ok(Self {
            title,
            summary,
            hist,
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Figure {
    grid: Grid,
    panels: Vec<Panel>,
    size: FigSize,
}

impl Figure {
    /// Arrange `panels` in a grid of at most `ncols` columns.
    ///
    /// Without an explicit `figsize` every grid cell gets the default subplot size.
    pub fn new(panels: Vec<Panel>, ncols: usize, figsize: Option<FigSize>) -> Self {
        let grid = Grid::new(panels.len(), ncols);
        let size = figsize.unwrap_or_else(|| FigSize::for_grid(grid.n_rows(), grid.n_cols()));
        Self { grid, panels, size }
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn panels(&self) -> &[Panel] {
        &self.panels
    }

    pub fn size(&self) -> FigSize {
        self.size
    }

    /// Render the figure into `path` at `dpi` pixels per plotting unit.
    pub fn save(&self, path: &Path, dpi: f64) -> Result<(), ReportError> {
        let format = OutputFormat::from_path(path)?;
        let (width, height) = self.size.to_pixels(dpi);
        let size = (width.max(1), height.max(1));
        let fonts = Fonts::new(dpi);

        match format {
            OutputFormat::Svg => {
                let root = SVGBackend::new(path, size).into_drawing_area();
                self.draw(&root, &fonts)?;
                root.present()
                    .map_err(|err| ReportError::Render(err.to_string()))?;
            }
            OutputFormat::Png | OutputFormat::Jpeg | OutputFormat::Bmp => {
                let root = BitMapBackend::new(path, size).into_drawing_area();
                self.draw(&root, &fonts)?;
                root.present()
                    .map_err(|err| ReportError::Render(err.to_string()))?;
            }
        }

        Ok(())
    }

    fn draw<DB: DrawingBackend>(
        &self,
        root: &DrawingArea<DB, Shift>,
        fonts: &Fonts,
    ) -> Result<(), ReportError> {
        root.fill(&WHITE)
            .map_err(|err| ReportError::Render(err.to_string()))?;

        let areas = root.split_evenly((self.grid.n_rows(), self.grid.n_cols()));
        for (slot, area) in self.grid.slots().iter().zip(&areas) {
            if !slot.visible {
                continue;
            }
            if let Some(panel) = slot.dataset.and_then(|idx| self.panels.get(idx)) {
                log::debug!("drawing subplot at row {}, column {}", slot.row, slot.col);
                draw_panel(panel, area, fonts)?;
            }
        }

        Ok(())
    }
}

/// Font sizes in pixels for a given resolution.
struct Fonts {
    title: f64,
    label: f64,
    tick: f64,
}

impl Fonts {
    fn new(dpi: f64) -> Self {
        let pt = |size: f64| size * dpi / 72.0;
        Self {
            title: pt(12.0),
            label: pt(10.0),
            tick: pt(9.0),
        }
    }
}

fn draw_panel<DB: DrawingBackend>(
    panel: &Panel,
    area: &DrawingArea<DB, Shift>,
    fonts: &Fonts,
) -> Result<(), ReportError> {
    // Captions are single-line, so each title line gets its own strip.
    let mut titled = None;
    for line in panel.title.lines() {
        let parent = titled.as_ref().unwrap_or(area);
        titled = Some(
            parent
                .titled(line, (FONT_FAMILY, fonts.title).into_font())
                .map_err(|err| ReportError::Render(err.to_string()))?,
        );
    }
    let area = titled.as_ref().unwrap_or(area);

    let x_max = panel.hist.edges.last().copied().unwrap_or(0.0);
    let y_max = (panel.hist.max_count() as f64 * 1.05).max(1.0);

    let mut chart = ChartBuilder::on(area)
        .margin(fonts.label as u32)
        .x_label_area_size((fonts.label * 3.5) as u32)
        .y_label_area_size((fonts.label * 4.0) as u32)
        .build_cartesian_2d(0.0..x_max, 0.0..y_max)
        .map_err(|err| ReportError::Render(err.to_string()))?;

    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_desc(X_LABEL)
        .y_desc(Y_LABEL)
        .axis_desc_style((FONT_FAMILY, fonts.label))
        .label_style((FONT_FAMILY, fonts.tick))
        .y_label_formatter(&|y| format!("{y:.0}"))
        .draw()
        .map_err(|err| ReportError::Render(err.to_string()))?;

    chart
        .draw_series(panel.hist.bins().map(|(lower, upper, count)| {
            Rectangle::new([(lower, 0.0), (upper, count as f64)], BLUE.mix(0.5).filled())
        }))
        .map_err(|err| ReportError::Render(err.to_string()))?;

    chart
        .draw_series(panel.hist.bins().map(|(lower, upper, count)| {
            Rectangle::new([(lower, 0.0), (upper, count as f64)], BLACK.stroke_width(1))
        }))
        .map_err(|err| ReportError::Render(err.to_string()))?;

    Ok(())
}
