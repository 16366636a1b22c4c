use super::coloring::Coloring;
use super::settings::{self, BranchAnnotation, TreeSettings};
use crate::libs::color::Color;
use crate::libs::draw::{LineCap, Surface};
use crate::libs::geometry::{Location, Viewport};
use crate::libs::phylo::{Node, Tree};

/// Bounds the horizontal step shrink applied when labels alone cannot
/// bring the tree inside its margin.
const MAX_STEP_SHRINKS: usize = 200;
const MAX_STEP_GROWS: usize = 1000;

/// The tree region: branches, leaf labels and branch annotations.
#[derive(Debug, Clone, PartialEq)]
pub struct TreePart {
    /// Points per unit of edge length
    pub horizontal_step: f64,
    pub line_width: f64,
    /// Leaf label font size relative to the vertical step
    pub label_scale: f64,
    pub line_color: Color,
    pub name_offset: f64,
    /// Length drawn for the root stub, in edge units
    pub root_edge: f64,
    /// `origin.x < 0` means automatic placement
    pub origin: Location,

    pub number_strains_threshold: usize,
    pub branch_annotation_color: Color,
    pub branch_annotation_size: f64,
    /// Gap between a branch and the first line of its annotation
    pub branch_annotation_offset: f64,
    pub line_interleave: f64,
    pub show_branch_ids: bool,
    pub branch_id_color: Color,
    pub branch_id_size: f64,
    pub branch_annotations: Vec<BranchAnnotation>,

    // computed by setup
    pub width: f64,
    pub number_of_lines: usize,
    pub vertical_step: f64,
}

impl Default for TreePart {
    fn default() -> Self {
        Self {
            horizontal_step: 5.0,
            line_width: 0.2,
            label_scale: 1.0,
            line_color: Color::BLACK,
            name_offset: 0.2,
            root_edge: 0.0,
            origin: Location::new(-1.0, -1.0),
            number_strains_threshold: 0,
            branch_annotation_color: Color::BLACK,
            branch_annotation_size: 3.0,
            branch_annotation_offset: 1.0,
            line_interleave: 1.2,
            show_branch_ids: false,
            branch_id_color: Color::GRAY,
            branch_id_size: 2.0,
            branch_annotations: Vec::new(),
            width: 0.0,
            number_of_lines: 0,
            vertical_step: 0.0,
        }
    }
}

impl TreePart {
    /// Vertical step from the leaf count, origin unless pinned.
    pub fn setup(&mut self, viewport: &Viewport, tree: &Tree) {
        self.number_of_lines = tree.number_of_leaves();
        self.vertical_step = viewport.size.height / (self.number_of_lines as f64 + 2.0);
        if self.origin.x < 0.0 {
            self.origin = Location::new(viewport.origin.x, viewport.origin.y + self.vertical_step);
        } else {
            self.origin.y = viewport.origin.y + self.vertical_step;
        }
    }

    /// Vertical canvas position of `line` (a leaf row or a node middle).
    pub fn line_y(&self, line: f64) -> f64 {
        self.origin.y + self.vertical_step * line
    }

    pub fn label_size(&self) -> f64 {
        self.vertical_step * self.label_scale
    }

    /// Horizontal extent from the tree origin to the end of the widest
    /// leaf label.
    pub fn tree_width(&self, surface: &dyn Surface, tree: &Tree) -> f64 {
        self.node_width(surface, tree.root(), Some(self.root_edge))
    }

    fn node_width(&self, surface: &dyn Surface, node: &Node, edge: Option<f64>) -> f64 {
        let r = if node.is_leaf() {
            surface
                .text_size(&node.display_name(), self.label_size())
                .width
                + self.name_offset
        } else {
            node.subtree
                .iter()
                .map(|child| self.node_width(surface, child, None))
                .fold(0.0f64, f64::max)
        };
        r + edge.unwrap_or(node.edge_length) * self.horizontal_step
    }

    fn overflows(&self, width: f64, right_margin: f64) -> bool {
        width + self.origin.x > right_margin
    }

    /// Shrink labels (and the horizontal step if labels alone don't
    /// help) until the tree fits left of `right_margin`, then grow the
    /// horizontal step while it still fits.
    pub fn fit(&mut self, surface: &dyn Surface, tree: &Tree, right_margin: f64) {
        let mut width = self.tree_width(surface, tree);

        while self.label_scale * self.vertical_step > 1.0 && self.overflows(width, right_margin) {
            self.label_scale *= 0.95;
            width = self.tree_width(surface, tree);
        }
        log::info!("label scale: {}", self.label_scale);

        let mut shrinks = 0;
        while self.overflows(width, right_margin) && shrinks < MAX_STEP_SHRINKS {
            self.horizontal_step *= 0.95;
            width = self.tree_width(surface, tree);
            shrinks += 1;
        }

        for _ in 0..MAX_STEP_GROWS {
            let saved = self.horizontal_step;
            self.horizontal_step *= 1.05;
            let grown = self.tree_width(surface, tree);
            if grown + self.origin.x >= right_margin || grown <= width {
                self.horizontal_step = saved;
                break;
            }
            width = grown;
        }
        log::info!("horizontal step: {}", self.horizontal_step);

        if self.overflows(width, right_margin) {
            log::warn!(
                "tree is {} wide, does not fit into {}",
                width,
                right_margin - self.origin.x
            );
        }
        self.width = width;
    }

    pub fn draw(&self, surface: &mut dyn Surface, tree: &Tree, coloring: &dyn Coloring) {
        self.draw_node(surface, tree.root(), self.origin.x, coloring, Some(self.root_edge));
    }

    fn draw_node(
        &self,
        surface: &mut dyn Surface,
        node: &Node,
        left: f64,
        coloring: &dyn Coloring,
        edge: Option<f64>,
    ) {
        let right = left + edge.unwrap_or(node.edge_length) * self.horizontal_step;
        let y = self.line_y(node.middle());
        surface.line(
            Location::new(left, y),
            Location::new(right, y),
            self.line_color,
            self.line_width,
            LineCap::Butt,
        );

        if node.is_leaf() {
            let size = self.label_size();
            let text = node.display_name();
            let extents = surface.text_size(&text, size);
            surface.text(
                Location::new(right + self.name_offset, y + extents.height / 2.0),
                &text,
                coloring.color(node),
                size,
                0.0,
            );
            return;
        }

        surface.line(
            Location::new(right, self.line_y(node.top)),
            Location::new(right, self.line_y(node.bottom)),
            self.line_color,
            self.line_width,
            LineCap::Butt,
        );
        self.draw_branch_annotation(surface, node, left, right, y);
        if self.show_branch_ids && !node.branch_id.is_empty() {
            surface.text(
                Location::new(left + self.branch_id_size * 0.2, y - self.line_width - 1.0),
                &node.branch_id,
                self.branch_id_color,
                self.branch_id_size,
                0.0,
            );
        }

        for child in &node.subtree {
            self.draw_node(surface, child, right, coloring, None);
        }
    }

    fn annotation_for(&self, node: &Node) -> Option<&BranchAnnotation> {
        if node.branch_id.is_empty() {
            return None;
        }
        self.branch_annotations.iter().find(|a| a.id == node.branch_id)
    }

    fn draw_branch_annotation(
        &self,
        surface: &mut dyn Surface,
        node: &Node,
        left: f64,
        right: f64,
        y: f64,
    ) {
        if node.number_strains <= self.number_strains_threshold {
            return;
        }
        let annotation = self.annotation_for(node);
        let label = match annotation {
            Some(a) if !a.label.is_empty() => a.label.as_str(),
            _ => node.name.as_str(),
        };
        if label.is_empty() {
            return;
        }

        let size = annotation
            .and_then(|a| a.font_size)
            .unwrap_or(self.branch_annotation_size);
        let color = annotation
            .and_then(|a| a.color)
            .unwrap_or(self.branch_annotation_color);
        let (offset_x, offset_y) = annotation
            .map(|a| (a.label_offset_x, a.label_offset_y))
            .unwrap_or((0.0, 0.0));

        let middle = (left + right) / 2.0;
        let top = y + self.branch_annotation_offset + offset_y;
        let height = surface.text_size("X", size).height;
        for (no, text) in label.split('\n').enumerate() {
            let extents = surface.text_size(text, size);
            let baseline = top + height * (1.0 + no as f64 * self.line_interleave);
            surface.text(
                Location::new(middle - extents.width / 2.0 + offset_x, baseline),
                text,
                color,
                size,
                0.0,
            );
        }

        if let Some(a) = annotation.filter(|a| a.show_line) {
            let line_y = a.line_y.unwrap_or(top - y);
            surface.line(
                Location::new(middle, y),
                Location::new(middle + offset_x, y + line_y),
                a.line_color.unwrap_or(color),
                a.line_width.unwrap_or(self.line_width),
                LineCap::Butt,
            );
        }
    }

    pub fn load_settings(&mut self, s: &TreeSettings) {
        settings::set_if_non_negative(&mut self.horizontal_step, s.horizontal_step);
        settings::set_if_non_negative(&mut self.line_width, s.line_width);
        settings::set_if_non_negative(&mut self.label_scale, s.label_scale);
        settings::set_if_some(&mut self.line_color, &s.line_color);
        settings::set_if_non_negative(&mut self.name_offset, s.name_offset);
        settings::set_if_non_negative(&mut self.root_edge, s.root_edge);
        settings::set_if_non_negative(&mut self.origin.x, s.origin_x);

        settings::set_count_if_non_negative(
            &mut self.number_strains_threshold,
            s.number_strains_threshold,
        );
        settings::set_if_some(&mut self.branch_annotation_color, &s.branch_annotation_color);
        settings::set_if_non_negative(&mut self.branch_annotation_size, s.branch_annotation_size);
        settings::set_if_non_negative(
            &mut self.branch_annotation_offset,
            s.branch_annotation_offset,
        );
        settings::set_if_non_negative(&mut self.line_interleave, s.line_interleave);
        settings::set_if_some(&mut self.show_branch_ids, &s.show_branch_ids);
        settings::set_if_some(&mut self.branch_id_color, &s.branch_id_color);
        settings::set_if_non_negative(&mut self.branch_id_size, s.branch_id_size);
        settings::set_if_some(&mut self.branch_annotations, &s.branch_annotations);
    }

    pub fn dump_settings(&self) -> TreeSettings {
        TreeSettings {
            comment: Some("Tree settings, negative values mean default".to_string()),
            horizontal_step: Some(self.horizontal_step),
            line_width: Some(self.line_width),
            label_scale: Some(self.label_scale),
            line_color: Some(self.line_color),
            name_offset: Some(self.name_offset),
            root_edge: Some(self.root_edge),
            origin_x: Some(self.origin.x),
            number_strains_threshold: Some(self.number_strains_threshold as i64),
            branch_annotation_color: Some(self.branch_annotation_color),
            branch_annotation_size: Some(self.branch_annotation_size),
            branch_annotation_offset: Some(self.branch_annotation_offset),
            line_interleave: Some(self.line_interleave),
            show_branch_ids: Some(self.show_branch_ids),
            branch_id_color: Some(self.branch_id_color),
            branch_id_size: Some(self.branch_id_size),
            branch_annotations: Some(self.branch_annotations.clone()),
            width: Some(self.width),
            width_comment: Some("informative, not used".to_string()),
            number_of_lines: Some(self.number_of_lines),
            vertical_step: Some(self.vertical_step),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::libs::draw::RecordingSurface;
    use crate::libs::geometry::Size;
    use crate::libs::image::coloring::Black;
    use approx::assert_relative_eq;

    fn surface() -> RecordingSurface {
        RecordingSurface::new(Size::new(612.0, 792.0))
    }

    fn viewport() -> Viewport {
        Viewport::inset(Size::new(612.0, 792.0), 0.1)
    }

    #[test]
    fn test_setup() {
        let tree = Tree::from_newick("((A:1,B:2):3,C:4);").unwrap();
        let mut part = TreePart::default();
        part.setup(&viewport(), &tree);
        assert_eq!(part.number_of_lines, 3);
        assert_relative_eq!(part.vertical_step, 712.8 / 5.0, epsilon = 1e-9);
        assert_relative_eq!(part.origin.x, 30.6, epsilon = 1e-9);
        assert_relative_eq!(part.origin.y, 39.6 + 712.8 / 5.0, epsilon = 1e-9);

        // a pinned x survives, y follows the step
        part.origin.x = 100.0;
        part.setup(&viewport(), &tree);
        assert_eq!(part.origin.x, 100.0);
    }

    #[test]
    fn test_tree_width() {
        let tree = Tree::from_newick("((A:1,B:2):3,C:4);").unwrap();
        let s = surface();
        let mut part = TreePart::default();
        part.setup(&viewport(), &tree);
        part.horizontal_step = 10.0;
        part.root_edge = 0.5;

        let size = part.label_size();
        let label = |t: &str| s.text_size(t, size).width + 0.2;
        // root stub 5, then B at 30 + 20 or C at 40
        let expected = 5.0 + f64::max(50.0 + label("B"), 40.0 + label("C"));
        assert_relative_eq!(part.tree_width(&s, &tree), expected, epsilon = 1e-9);
    }

    #[test]
    fn test_fit_stays_within_margin() {
        let tree = Tree::from_newick(
            "((A/SOME/VERY/LONG/STRAIN/NAME/1:0.01,B:0.02):0.03,(C:0.04,D:0.01):0.02);",
        )
        .unwrap();
        let s = surface();
        let mut part = TreePart::default();
        part.setup(&viewport(), &tree);
        for margin in [120.0, 300.0, 560.0] {
            let mut p = part.clone();
            p.fit(&s, &tree, margin);
            assert!(p.width + p.origin.x <= margin + 1e-9, "margin {}", margin);
            assert_relative_eq!(p.width, p.tree_width(&s, &tree));
        }
    }

    #[test]
    fn test_fit_grows_step() {
        let tree = Tree::from_newick("((A:1,B:2):3,C:4);").unwrap();
        let s = surface();
        let mut part = TreePart::default();
        part.setup(&viewport(), &tree);
        part.label_scale = 0.05;
        let before = part.horizontal_step;
        part.fit(&s, &tree, 500.0);
        assert!(part.horizontal_step > before);
        assert!(part.width + part.origin.x < 500.0);
        // one more 5% step would overshoot
        let mut next = part.clone();
        next.horizontal_step *= 1.05;
        assert!(next.tree_width(&s, &tree) + next.origin.x >= 500.0);
    }

    #[test]
    fn test_fit_without_edges_terminates() {
        let tree = Tree::from_newick("(A,B);").unwrap();
        let s = surface();
        let mut part = TreePart::default();
        part.setup(&viewport(), &tree);
        part.fit(&s, &tree, 500.0);
        assert_eq!(part.horizontal_step, 5.0);
    }

    #[test]
    fn test_fit_shrinks_labels() {
        let tree = Tree::from_newick("((A:1,B:2):3,C:4);").unwrap();
        let s = surface();
        let mut part = TreePart::default();
        part.setup(&viewport(), &tree);
        // labels are set at the full vertical step, far too wide here
        part.fit(&s, &tree, 120.0);
        assert!(part.label_scale < 1.0);
        assert!(part.width + part.origin.x <= 120.0);
    }

    #[test]
    fn test_draw() {
        let tree = Tree::from_newick("((A:1,B:2):3,C:4);").unwrap();
        let mut s = surface();
        let mut part = TreePart::default();
        part.setup(&viewport(), &tree);
        part.draw(&mut s, &tree, &Black);

        // root stub + internal horizontal + internal vertical: 2 per internal, 1 per leaf
        assert_eq!(s.lines().count(), 2 * 2 + 3);
        let labels: Vec<_> = s.texts().map(|t| t.1).collect();
        assert_eq!(labels, vec!["A", "B", "C"]);

        // leaf A sits on its line, right of its branch end
        let (at, _, size, _) = s.texts().next().unwrap();
        let x_a = part.origin.x + (3.0 + 1.0) * part.horizontal_step + part.name_offset;
        assert_relative_eq!(at.x, x_a, epsilon = 1e-9);
        assert_relative_eq!(
            at.y,
            part.line_y(0.0) + s.text_size("A", size).height / 2.0,
            epsilon = 1e-9
        );
    }

    #[test]
    fn test_draw_branch_annotations() {
        let mut tree = Tree::from_newick("((A:1,B:2):3,C:4);").unwrap();
        tree.root_mut().subtree[0].name = "K160T\nN171K".to_string();
        tree.root_mut().subtree[0].branch_id = "b1".to_string();

        let mut part = TreePart::default();
        part.setup(&viewport(), &tree);

        let mut s = surface();
        part.draw(&mut s, &tree, &Black);
        let labels: Vec<_> = s.texts().map(|t| t.1.to_string()).collect();
        assert!(labels.contains(&"K160T".to_string()));
        assert!(labels.contains(&"N171K".to_string()));
        assert!(!labels.contains(&"b1".to_string()));

        // below the threshold nothing is annotated
        part.number_strains_threshold = 2;
        let mut s = surface();
        part.draw(&mut s, &tree, &Black);
        assert_eq!(s.texts().count(), 3);

        // overrides and branch ids
        part.number_strains_threshold = 0;
        part.show_branch_ids = true;
        part.branch_annotations = vec![BranchAnnotation {
            id: "b1".to_string(),
            label: "2a1".to_string(),
            show_line: true,
            ..Default::default()
        }];
        let mut s = surface();
        part.draw(&mut s, &tree, &Black);
        let labels: Vec<_> = s.texts().map(|t| t.1.to_string()).collect();
        assert!(labels.contains(&"2a1".to_string()));
        assert!(labels.contains(&"b1".to_string()));
        assert!(!labels.contains(&"K160T".to_string()));
        assert_eq!(s.lines().count(), 2 * 2 + 3 + 1);
    }

    #[test]
    fn test_settings_round_trip() {
        let mut part = TreePart::default();
        part.horizontal_step = 7.5;
        part.line_color = Color::new(0x123456);
        let dumped = part.dump_settings();

        let mut loaded = TreePart::default();
        loaded.load_settings(&dumped);
        assert_eq!(loaded.horizontal_step, 7.5);
        assert_eq!(loaded.line_color, Color::new(0x123456));
        // automatic origin stays automatic
        assert_eq!(loaded.origin.x, -1.0);
    }
}
