use super::settings::{self, CladeArrowSettings, CladesSettings};
use super::time_series::TimeSeries;
use super::tree_part::TreePart;
use crate::libs::color::Color;
use crate::libs::draw::{LineCap, Surface};
use crate::libs::geometry::Location;
use crate::libs::phylo::Tree;
use std::collections::BTreeMap;

/// Vertical extent of one clade, in leaf lines, and how it is marked.
#[derive(Debug, Clone, PartialEq)]
pub struct CladeArrow {
    pub id: String,
    pub label: String,
    pub begin: usize,
    pub end: usize,
    /// Column in the clades region, `-1` until assigned
    pub slot: i64,
    /// `top`, `bottom` or `middle`
    pub label_position: String,
    pub label_position_offset: f64,
    pub label_rotation: f64,
    pub label_offset: f64,
    pub show: bool,
}

impl CladeArrow {
    pub fn new(id: &str, begin: usize, end: usize) -> Self {
        Self {
            id: id.to_string(),
            label: id.to_string(),
            begin,
            end,
            slot: -1,
            label_position: "middle".to_string(),
            label_position_offset: 0.0,
            label_rotation: 0.0,
            label_offset: 3.0,
            show: true,
        }
    }

    fn apply(&mut self, s: &CladeArrowSettings) {
        if let Some(label) = &s.label {
            self.label = label.clone();
        }
        if let Some(begin) = s.begin.filter(|v| *v >= 0) {
            self.begin = begin as usize;
        }
        if let Some(end) = s.end.filter(|v| *v >= 0) {
            self.end = end as usize;
        }
        if let Some(slot) = s.slot.filter(|v| *v >= 0) {
            self.slot = slot;
        }
        settings::set_if_not_empty(&mut self.label_position, &s.label_position);
        settings::set_if_some(&mut self.label_position_offset, &s.label_position_offset);
        settings::set_if_some(&mut self.label_rotation, &s.label_rotation);
        settings::set_if_some(&mut self.label_offset, &s.label_offset);
        settings::set_if_some(&mut self.show, &s.show);
    }

    fn dump(&self) -> CladeArrowSettings {
        CladeArrowSettings {
            id: self.id.clone(),
            begin: Some(self.begin as i64),
            end: Some(self.end as i64),
            label: Some(self.label.clone()),
            label_position: Some(self.label_position.clone()),
            label_position_offset: Some(self.label_position_offset),
            label_rotation: Some(self.label_rotation),
            label_offset: Some(self.label_offset),
            slot: Some(self.slot),
            show: Some(self.show),
        }
    }
}

/// Arrows marking clades right of the time series.
#[derive(Debug, Clone, PartialEq)]
pub struct Clades {
    pub show: bool,
    pub slot_width: f64,
    pub line_width: f64,
    pub arrow_width: f64,
    pub arrow_color: Color,
    /// Fraction of the vertical step to extend arrows up and down
    pub arrow_extra: f64,
    pub label_color: Color,
    pub label_size: f64,
    pub separator_color: Color,
    pub separator_width: f64,
    pub separator_in_tree: bool,
    pub separator_in_time_series: bool,
    pub origin: Location,
    pub per_clade: Vec<CladeArrowSettings>,

    // computed by setup
    pub clades: Vec<CladeArrow>,
    pub width: f64,
}

impl Default for Clades {
    fn default() -> Self {
        Self {
            show: false,
            slot_width: 5.0,
            line_width: 1.0,
            arrow_width: 3.0,
            arrow_color: Color::BLACK,
            arrow_extra: 0.5,
            label_color: Color::BLACK,
            label_size: 10.0,
            separator_color: Color::GRAY,
            separator_width: 0.2,
            separator_in_tree: true,
            separator_in_time_series: true,
            origin: Location::new(-1.0, -1.0),
            per_clade: Vec::new(),
            clades: Vec::new(),
            width: 0.0,
        }
    }
}

impl Clades {
    /// Collects the line range of every clade found on the leaves,
    /// applies overrides, assigns slots and measures the region.
    pub fn setup(&mut self, tree: &Tree, surface: &dyn Surface) {
        let mut extents: BTreeMap<&str, (usize, usize)> = BTreeMap::new();
        for leaf in tree.leaves() {
            for clade in &leaf.clades {
                let e = extents
                    .entry(clade.as_str())
                    .or_insert((leaf.line_no, leaf.line_no));
                e.0 = e.0.min(leaf.line_no);
                e.1 = e.1.max(leaf.line_no);
            }
        }

        self.clades = extents
            .into_iter()
            .map(|(id, (begin, end))| {
                let mut arrow = CladeArrow::new(id, begin, end);
                if let Some(s) = self.per_clade.iter().find(|s| s.id == id) {
                    arrow.apply(s);
                }
                arrow
            })
            .collect();
        self.clades
            .sort_by(|a, b| a.begin.cmp(&b.begin).then(b.end.cmp(&a.end)));
        for (no, clade) in self.clades.iter_mut().enumerate() {
            if clade.slot < 0 {
                clade.slot = no as i64;
            }
        }

        self.width = self
            .clades
            .iter()
            .filter(|c| c.show)
            .map(|c| {
                c.slot as f64 * self.slot_width
                    + c.label_offset
                    + surface.text_size(&c.label, self.label_size).width
            })
            .fold(0.0f64, f64::max);
        log::info!("clades: {}  width: {}", self.clades.len(), self.width);
    }

    pub fn draw(&self, surface: &mut dyn Surface, tree_part: &TreePart, time_series: &TimeSeries) {
        if !self.show {
            return;
        }
        for clade in self.clades.iter().filter(|c| c.show) {
            self.draw_clade(surface, clade, tree_part, time_series);
        }
    }

    fn draw_clade(
        &self,
        surface: &mut dyn Surface,
        clade: &CladeArrow,
        tree_part: &TreePart,
        time_series: &TimeSeries,
    ) {
        let x = self.origin.x + clade.slot as f64 * self.slot_width;
        let top = tree_part.line_y(clade.begin as f64 - self.arrow_extra);
        let bottom = tree_part.line_y(clade.end as f64 + self.arrow_extra);

        let label = surface.text_size(&clade.label, self.label_size);
        let vpos = match clade.label_position.as_str() {
            "top" => top,
            "bottom" => bottom,
            _ => (top + bottom) / 2.0,
        } + label.height / 2.0
            + clade.label_position_offset;

        surface.double_arrow(
            Location::new(x, top),
            Location::new(x, bottom),
            self.arrow_color,
            self.line_width,
            self.arrow_width,
        );
        surface.text(
            Location::new(x + clade.label_offset, vpos),
            &clade.label,
            self.label_color,
            self.label_size,
            clade.label_rotation,
        );

        let time_series_left = if time_series.show && time_series.width > 0.0 {
            time_series.origin.x
        } else {
            x
        };
        if clade.begin > 0 {
            self.draw_separator(surface, top, x, time_series_left, tree_part.origin.x);
        }
        if clade.end + 1 < tree_part.number_of_lines {
            self.draw_separator(surface, bottom, x, time_series_left, tree_part.origin.x);
        }
    }

    fn draw_separator(
        &self,
        surface: &mut dyn Surface,
        y: f64,
        x: f64,
        time_series_left: f64,
        tree_left: f64,
    ) {
        let right = if self.separator_in_time_series {
            x
        } else {
            time_series_left
        };
        let left = if self.separator_in_tree {
            tree_left
        } else {
            time_series_left
        };
        if left < right {
            surface.line(
                Location::new(left, y),
                Location::new(right, y),
                self.separator_color,
                self.separator_width,
                LineCap::Butt,
            );
        }
    }

    pub fn load_settings(&mut self, s: &CladesSettings) {
        settings::set_if_some(&mut self.show, &s.show);
        settings::set_if_non_negative(&mut self.slot_width, s.slot_width);
        settings::set_if_non_negative(&mut self.line_width, s.line_width);
        settings::set_if_non_negative(&mut self.arrow_width, s.arrow_width);
        settings::set_if_some(&mut self.arrow_color, &s.arrow_color);
        settings::set_if_non_negative(&mut self.arrow_extra, s.arrow_extra);
        settings::set_if_some(&mut self.label_color, &s.label_color);
        settings::set_if_non_negative(&mut self.label_size, s.label_size);
        settings::set_if_some(&mut self.separator_color, &s.separator_color);
        settings::set_if_non_negative(&mut self.separator_width, s.separator_width);
        settings::set_if_some(&mut self.separator_in_tree, &s.separator_in_tree);
        settings::set_if_some(&mut self.separator_in_time_series, &s.separator_in_time_series);
        settings::set_if_non_negative(&mut self.origin.x, s.origin_x);
        settings::set_if_some(&mut self.per_clade, &s.per_clade);
    }

    /// Computed clades are dumped as per-clade entries, so a dumped
    /// settings object pins the current arrangement.
    pub fn dump_settings(&self) -> CladesSettings {
        let per_clade = if self.clades.is_empty() {
            self.per_clade.clone()
        } else {
            self.clades.iter().map(CladeArrow::dump).collect()
        };
        CladesSettings {
            comment: Some(
                "Clades settings, negative values mean default, arrow_extra is a fraction of vertical_step to extend arrow up and down"
                    .to_string(),
            ),
            show: Some(self.show),
            slot_width: Some(self.slot_width),
            line_width: Some(self.line_width),
            arrow_width: Some(self.arrow_width),
            arrow_color: Some(self.arrow_color),
            arrow_extra: Some(self.arrow_extra),
            label_color: Some(self.label_color),
            label_size: Some(self.label_size),
            separator_color: Some(self.separator_color),
            separator_width: Some(self.separator_width),
            separator_in_tree: Some(self.separator_in_tree),
            separator_in_time_series: Some(self.separator_in_time_series),
            origin_x: Some(self.origin.x),
            per_clade: Some(per_clade),
            width: Some(self.width),
        }
    }
}
