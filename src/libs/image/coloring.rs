use super::settings::{self, ColoringSettings};
use crate::libs::color::{palette, Color};
use crate::libs::draw::Surface;
use crate::libs::geometry::Location;
use crate::libs::phylo::{Node, Tree};
use itertools::Itertools;
use std::collections::{BTreeMap, BTreeSet};

/// Where and how a coloring legend is drawn.
#[derive(Debug, Clone, PartialEq)]
pub struct Legend {
    pub show: bool,
    /// From the left end of the tree under its last leaf row
    pub offset: Location,
    pub font_size: f64,
    pub interleave: f64,
}

impl Default for Legend {
    fn default() -> Self {
        Self {
            show: true,
            offset: Location::new(10.0, 10.0),
            font_size: 8.0,
            interleave: 1.3,
        }
    }
}

impl Legend {
    pub fn load_settings(&mut self, s: &ColoringSettings) {
        settings::set_if_some(&mut self.show, &s.legend_show);
        if let Some([x, y]) = s.legend_offset {
            self.offset = Location::new(x, y);
        }
        settings::set_if_non_negative(&mut self.font_size, s.legend_font_size);
        settings::set_if_non_negative(&mut self.interleave, s.legend_interleave);
    }

    pub fn dump_settings(&self) -> ColoringSettings {
        ColoringSettings {
            legend_show: Some(self.show),
            legend_offset: Some([self.offset.x, self.offset.y]),
            legend_font_size: Some(self.font_size),
            legend_interleave: Some(self.interleave),
        }
    }
}

/// Maps nodes to colors for leaf labels and time series dashes.
pub trait Coloring {
    fn color(&self, node: &Node) -> Color;

    /// Legend lines, top to bottom.
    fn legend(&self) -> Vec<(String, Color)> {
        Vec::new()
    }

    /// Stacks the legend downward, the top of the first line at `origin`.
    fn draw_legend(&self, surface: &mut dyn Surface, origin: Location, legend: &Legend) {
        let step = legend.font_size * legend.interleave;
        for (no, (text, color)) in self.legend().iter().enumerate() {
            surface.text(
                Location::new(origin.x, origin.y + legend.font_size + no as f64 * step),
                text,
                *color,
                legend.font_size,
                0.0,
            );
        }
    }
}

/// Everything black, no legend.
pub struct Black;

impl Coloring for Black {
    fn color(&self, _node: &Node) -> Color {
        Color::BLACK
    }
}

/// Leaves colored by their continent through the shared palette.
pub struct ByContinent {
    present: BTreeSet<String>,
}

impl ByContinent {
    pub fn new(tree: &Tree) -> Self {
        let present = tree
            .leaves()
            .into_iter()
            .filter(|leaf| !leaf.continent.is_empty())
            .map(|leaf| leaf.continent.clone())
            .collect();
        Self { present }
    }
}

impl Coloring for ByContinent {
    fn color(&self, node: &Node) -> Color {
        palette().continent(&node.continent)
    }

    fn legend(&self) -> Vec<(String, Color)> {
        self.present
            .iter()
            .map(|c| (c.clone(), palette().continent(c)))
            .collect()
    }
}

/// Leaves colored by the amino acid at one position.
///
/// Residues are ranked by how many leaves carry them, the most common
/// first, and take the distinct colors in that order. Leaves without a
/// residue at the position are black.
pub struct ByResidue {
    pos: String,
    alphabet: Vec<(String, usize)>,
}

impl ByResidue {
    pub fn new(tree: &Tree, pos: &str) -> Self {
        let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
        for leaf in tree.leaves() {
            if let Some(aa) = leaf.aa_at.get(pos) {
                *counts.entry(aa.as_str()).or_default() += 1;
            }
        }
        let alphabet = counts
            .into_iter()
            .sorted_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(b.0)))
            .map(|(aa, count)| (aa.to_string(), count))
            .collect();
        Self {
            pos: pos.to_string(),
            alphabet,
        }
    }

    pub fn alphabet(&self) -> Vec<&str> {
        self.alphabet.iter().map(|(aa, _)| aa.as_str()).collect()
    }

    fn residue_color(&self, aa: &str) -> Color {
        match self.alphabet.iter().position(|(a, _)| a == aa) {
            Some(rank) => palette().distinct(rank),
            None => Color::BLACK,
        }
    }
}

impl Coloring for ByResidue {
    fn color(&self, node: &Node) -> Color {
        node.aa_at
            .get(&self.pos)
            .map_or(Color::BLACK, |aa| self.residue_color(aa))
    }

    fn legend(&self) -> Vec<(String, Color)> {
        let mut lines = vec![(self.pos.clone(), Color::BLACK)];
        lines.extend(
            self.alphabet
                .iter()
                .map(|(aa, count)| (format!("{} {}", aa, count), self.residue_color(aa))),
        );
        lines
    }
}
