//! Page layout: the tree, the time series and the clades side by side
//! inside the viewport, plus the legend and the title.

pub mod clades;
pub mod coloring;
pub mod settings;
pub mod time_series;
pub mod title;
pub mod tree_part;

pub use clades::{CladeArrow, Clades};
pub use coloring::{Black, ByContinent, ByResidue, Coloring, Legend};
pub use settings::Settings;
pub use time_series::TimeSeries;
pub use title::Title;
pub use tree_part::TreePart;

use crate::libs::draw::{PdfSurface, Surface};
use crate::libs::geometry::{Location, Size, Viewport};
use crate::libs::phylo::{Tree, TreeError};

/// US letter in points
pub const DEFAULT_CANVAS: Size = Size {
    width: 72.0 * 8.5,
    height: 72.0 * 11.0,
};

#[derive(Debug, Clone, PartialEq)]
pub struct TreeImage {
    pub canvas: Size,
    /// Relative to the canvas size
    pub border: f64,
    pub space_tree_ts: f64,
    pub space_ts_clades: f64,
    pub viewport: Viewport,
    pub tree: TreePart,
    pub time_series: TimeSeries,
    pub clades: Clades,
    pub legend: Legend,
    pub title: Title,
}

impl Default for TreeImage {
    fn default() -> Self {
        Self {
            canvas: DEFAULT_CANVAS,
            border: 0.1,
            space_tree_ts: 5.0,
            space_ts_clades: 5.0,
            viewport: Viewport::default(),
            tree: TreePart::default(),
            time_series: TimeSeries::default(),
            clades: Clades::default(),
            legend: Legend::default(),
            title: Title::default(),
        }
    }
}

impl TreeImage {
    fn clades_shown(&self) -> bool {
        self.clades.show && self.clades.width > 1.0
    }

    /// Right edge available to the tree once the regions right of it are
    /// placed.
    pub fn tree_right_margin(&self) -> f64 {
        let mut right = self.viewport.opposite().x;
        if self.clades_shown() {
            if self.clades.origin.x >= 0.0 {
                right = self.clades.origin.x;
            } else {
                right -= self.clades.width;
            }
            right -= self.space_ts_clades;
        }
        if self.time_series.show {
            if self.time_series.origin.x >= 0.0 {
                right = self.time_series.origin.x;
            } else {
                right -= self.time_series.width;
            }
            right -= self.space_tree_ts;
        }
        right
    }

    /// Computes every region's size and origin. `surface` only measures
    /// text.
    pub fn setup(&mut self, tree: &Tree, surface: &dyn Surface) {
        self.viewport = Viewport::inset(self.canvas, self.border);
        self.tree.setup(&self.viewport, tree);
        self.time_series.setup(tree);
        self.clades.setup(tree, surface);

        let right_margin = self.tree_right_margin();
        self.tree.fit(surface, tree, right_margin);

        let mut x = right_margin;
        if self.time_series.show {
            x += self.space_tree_ts;
            if self.time_series.origin.x < 0.0 {
                self.time_series.origin.x = x;
            }
            self.time_series.origin.y = self.viewport.origin.y;
            x = self.time_series.origin.x + self.time_series.width;
        }
        if self.clades_shown() {
            x += self.space_ts_clades;
            if self.clades.origin.x < 0.0 {
                self.clades.origin.x = x;
            }
            x = self.clades.origin.x + self.clades.width;
        }
        self.clades.origin.y = self.viewport.origin.y;

        log::info!(
            "image width: {}  canvas width: {}",
            x - self.viewport.origin.x,
            self.canvas.width
        );
    }

    /// Under the last leaf row, from the left end of the tree.
    pub fn legend_origin(&self) -> Location {
        let last_row = match self.tree.number_of_lines {
            0 => self.tree.origin.y,
            n => self.tree.line_y((n - 1) as f64) + self.tree.label_size() / 2.0,
        };
        Location::new(
            self.tree.origin.x + self.legend.offset.x,
            last_row + self.legend.offset.y,
        )
    }

    pub fn draw(&self, tree: &Tree, coloring: &dyn Coloring, surface: &mut dyn Surface) {
        self.tree.draw(surface, tree, coloring);
        self.time_series
            .draw(surface, tree, &self.tree, &self.viewport, coloring);
        self.clades.draw(surface, &self.tree, &self.time_series);
        if self.legend.show {
            coloring.draw_legend(surface, self.legend_origin(), &self.legend);
        }
        self.title.draw(surface, &self.viewport);
    }

    /// Lays out and draws `tree` into a one page PDF at `output`.
    pub fn make_pdf(
        &mut self,
        output: &str,
        tree: &Tree,
        coloring: &dyn Coloring,
    ) -> Result<(), TreeError> {
        let mut surface = PdfSurface::create(output, self.canvas)?;
        self.setup(tree, &surface);
        self.draw(tree, coloring, &mut surface);
        surface.finish()
    }

    pub fn load_settings(&mut self, s: &Settings) {
        if let Some([w, h]) = s.canvas {
            if w > 0.0 && h > 0.0 {
                self.canvas = Size::new(w, h);
            }
        }
        settings::set_if_non_negative(&mut self.border, s.border);
        settings::set_if_non_negative(&mut self.space_tree_ts, s.space_tree_ts);
        settings::set_if_non_negative(&mut self.space_ts_clades, s.space_ts_clades);
        if let Some(t) = &s.tree {
            self.tree.load_settings(t);
        }
        if let Some(t) = &s.time_series {
            self.time_series.load_settings(t);
        }
        if let Some(c) = &s.clades {
            self.clades.load_settings(c);
        }
        if let Some(c) = &s.coloring {
            self.legend.load_settings(c);
        }
        if let Some(t) = &s.title {
            self.title.load_settings(t);
        }
    }

    pub fn load_settings_json(&mut self, value: &serde_json::Value) -> Result<(), TreeError> {
        let s = Settings::from_json(value)?;
        self.load_settings(&s);
        Ok(())
    }

    pub fn dump_settings(&self) -> Settings {
        Settings {
            comment: Some("Tree image settings, negative values mean default".to_string()),
            canvas: Some([self.canvas.width, self.canvas.height]),
            border: Some(self.border),
            space_tree_ts: Some(self.space_tree_ts),
            space_ts_clades: Some(self.space_ts_clades),
            viewport: Some([
                self.viewport.origin.x,
                self.viewport.origin.y,
                self.viewport.size.width,
                self.viewport.size.height,
            ]),
            tree: Some(self.tree.dump_settings()),
            time_series: Some(self.time_series.dump_settings()),
            clades: Some(self.clades.dump_settings()),
            coloring: Some(self.legend.dump_settings()),
            title: Some(self.title.dump_settings()),
        }
    }
}
