use super::coloring::Coloring;
use super::settings::{self, SubtreeTopBottom, TimeSeriesSettings};
use super::tree_part::TreePart;
use crate::libs::color::Color;
use crate::libs::date::{months_between, Date};
use crate::libs::draw::{LineCap, Surface};
use crate::libs::geometry::{Location, Viewport};
use crate::libs::phylo::Tree;
use std::f64::consts::FRAC_PI_2;

/// Calendar strip right of the tree: one column per month, a dash per
/// dated leaf.
#[derive(Debug, Clone, PartialEq)]
pub struct TimeSeries {
    pub show: bool,
    /// First month shown, empty means the earliest leaf date
    pub begin: Date,
    /// Last month shown, empty means the latest leaf date
    pub end: Date,
    pub month_width: f64,
    /// Relative to `month_width`
    pub dash_width: f64,
    pub dash_line_width: f64,
    pub month_label_scale: f64,
    pub max_number_of_months: usize,
    pub month_separator_color: Color,
    pub month_separator_width: f64,
    pub origin: Location,
    pub show_subtree_top_bottom: bool,
    pub subtree_top_bottom: Vec<SubtreeTopBottom>,

    // computed by setup
    pub number_of_months: usize,
    pub width: f64,
}

impl Default for TimeSeries {
    fn default() -> Self {
        Self {
            show: true,
            begin: Date::default(),
            end: Date::default(),
            month_width: 10.0,
            dash_width: 0.5,
            dash_line_width: 1.0,
            month_label_scale: 0.9,
            max_number_of_months: 20,
            month_separator_color: Color::BLACK,
            month_separator_width: 0.1,
            origin: Location::new(-1.0, -1.0),
            show_subtree_top_bottom: false,
            subtree_top_bottom: Vec::new(),
            number_of_months: 0,
            width: 0.0,
        }
    }
}

impl TimeSeries {
    /// Month range and width from the leaf dates.
    pub fn setup(&mut self, tree: &Tree) {
        self.number_of_months = 0;
        if self.show {
            let (min, max) = tree.min_max_date();
            log::info!("dates in source tree: {} {}", min, max);
            if self.begin.is_empty() {
                self.begin = min.first_of_month();
            }
            if self.end.is_empty() {
                self.end = max.first_of_month();
            }

            if self.begin.is_empty() || self.end.is_empty() {
                log::warn!("no dates for the time series");
            } else {
                let months = months_between(&self.begin, &self.end) + 1;
                if months > 0 {
                    self.number_of_months = months as usize;
                }
                if self.number_of_months > self.max_number_of_months {
                    self.begin = self
                        .end
                        .subtract_months(self.max_number_of_months.saturating_sub(1));
                    self.number_of_months = self.max_number_of_months;
                }
                log::info!(
                    "dates to show: {} {}  months: {}",
                    self.begin,
                    self.end,
                    self.number_of_months
                );
            }
        }
        self.width = self.number_of_months as f64 * self.month_width;
    }

    pub fn draw(
        &self,
        surface: &mut dyn Surface,
        tree: &Tree,
        tree_part: &TreePart,
        viewport: &Viewport,
        coloring: &dyn Coloring,
    ) {
        if !self.show || self.number_of_months == 0 {
            return;
        }
        self.draw_labels(surface, viewport);
        self.draw_month_separators(surface, viewport);
        self.draw_dashes(surface, tree, tree_part, coloring);
        if self.show_subtree_top_bottom {
            self.draw_subtree_top_bottom(surface, tree, tree_part);
        }
    }

    fn draw_labels(&self, surface: &mut dyn Surface, viewport: &Viewport) {
        let size = self.month_width * self.month_label_scale;
        let month_max_width = surface.text_size("May ", size).width;
        let big = surface.text_size("May 99", size);
        let text_up = (self.month_width - big.height) * 0.5;

        let top = viewport.origin.y - big.width - big.x_bearing;
        let bottom = viewport.opposite().y + big.x_bearing;
        for y in [top, bottom] {
            let mut current = self.begin;
            for month_no in 0..self.number_of_months {
                let left = self.origin.x + month_no as f64 * self.month_width + text_up;
                surface.text(
                    Location::new(left, y),
                    current.month_3(),
                    Color::BLACK,
                    size,
                    FRAC_PI_2,
                );
                surface.text(
                    Location::new(left, y + month_max_width),
                    &current.year_2(),
                    Color::BLACK,
                    size,
                    FRAC_PI_2,
                );
                current.increment_month();
            }
        }
    }

    fn draw_month_separators(&self, surface: &mut dyn Surface, viewport: &Viewport) {
        let bottom = viewport.opposite().y;
        for month_no in 0..=self.number_of_months {
            let x = self.origin.x + month_no as f64 * self.month_width;
            surface.line(
                Location::new(x, self.origin.y),
                Location::new(x, bottom),
                self.month_separator_color,
                self.month_separator_width,
                LineCap::Butt,
            );
        }
    }

    fn draw_dashes(
        &self,
        surface: &mut dyn Surface,
        tree: &Tree,
        tree_part: &TreePart,
        coloring: &dyn Coloring,
    ) {
        let base_x = self.origin.x + self.month_width * (1.0 - self.dash_width) * 0.5;
        for leaf in tree.leaves() {
            let month_no = match leaf.months_from(&self.begin) {
                Some(m) if m >= 0 && (m as usize) < self.number_of_months => m as f64,
                _ => continue,
            };
            let a = Location::new(
                base_x + self.month_width * month_no,
                tree_part.line_y(leaf.line_no as f64),
            );
            let b = Location::new(a.x + self.month_width * self.dash_width, a.y);
            surface.line(a, b, coloring.color(leaf), self.dash_line_width, LineCap::Round);
        }
    }

    fn draw_subtree_top_bottom(&self, surface: &mut dyn Surface, tree: &Tree, tree_part: &TreePart) {
        let right = self.origin.x + self.width;
        for entry in &self.subtree_top_bottom {
            let leaves = tree
                .find_branch(&entry.id)
                .and_then(|node| node.first_last_leaf());
            let Some((first, last)) = leaves else {
                log::warn!("subtree_top_bottom: no branch with id {}", entry.id);
                continue;
            };
            let mut guides = vec![];
            if entry.show_top {
                guides.push(tree_part.line_y(first.line_no as f64));
            }
            if entry.show_bottom {
                guides.push(tree_part.line_y(last.line_no as f64));
            }
            for y in guides {
                surface.line(
                    Location::new(self.origin.x, y),
                    Location::new(right, y),
                    entry.color,
                    entry.line_width,
                    LineCap::Butt,
                );
            }
        }
    }

    pub fn load_settings(&mut self, s: &TimeSeriesSettings) {
        settings::set_if_some(&mut self.show, &s.show);
        settings::set_date_if_not_empty(&mut self.begin, s.begin);
        settings::set_date_if_not_empty(&mut self.end, s.end);
        settings::set_if_non_negative(&mut self.month_width, s.month_width);
        settings::set_if_non_negative(&mut self.dash_width, s.dash_width);
        settings::set_if_non_negative(&mut self.dash_line_width, s.dash_line_width);
        settings::set_if_non_negative(&mut self.month_label_scale, s.month_label_scale);
        settings::set_count_if_non_negative(&mut self.max_number_of_months, s.max_number_of_months);
        settings::set_if_some(&mut self.month_separator_color, &s.month_separator_color);
        settings::set_if_non_negative(&mut self.month_separator_width, s.month_separator_width);
        settings::set_if_non_negative(&mut self.origin.x, s.origin_x);
        settings::set_if_some(&mut self.show_subtree_top_bottom, &s.show_subtree_top_bottom);
        settings::set_if_some(&mut self.subtree_top_bottom, &s.subtree_top_bottom);
    }

    pub fn dump_settings(&self) -> TimeSeriesSettings {
        TimeSeriesSettings {
            comment: Some(
                "Time series settings, negative values mean default, dash_width is relative to month_width"
                    .to_string(),
            ),
            show: Some(self.show),
            begin: Some(self.begin),
            end: Some(self.end),
            month_width: Some(self.month_width),
            dash_width: Some(self.dash_width),
            dash_line_width: Some(self.dash_line_width),
            month_label_scale: Some(self.month_label_scale),
            max_number_of_months: Some(self.max_number_of_months as i64),
            month_separator_color: Some(self.month_separator_color),
            month_separator_width: Some(self.month_separator_width),
            origin_x: Some(self.origin.x),
            show_subtree_top_bottom: Some(self.show_subtree_top_bottom),
            subtree_top_bottom: Some(self.subtree_top_bottom.clone()),
            width: Some(self.width),
            number_of_months: Some(self.number_of_months),
        }
    }
}
