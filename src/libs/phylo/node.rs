use crate::libs::date::{months_between, Date};
use std::collections::{BTreeMap, BTreeSet};

/// A tree node: either a leaf (named strain) or an internal node (subtree).
///
/// A node owns its children exclusively through `subtree`. Leaf-only and
/// internal-only fields live side by side; which ones are meaningful is
/// decided by [`Node::is_leaf`].
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Node {
    /// Length of the incoming edge (horizontal span from the parent)
    pub edge_length: f64,

    /// Strain name for leaves, branch annotation for internal nodes
    pub name: String,
    pub date: Date,
    pub continent: String,
    pub clades: BTreeSet<String>,
    /// Position label -> single amino-acid letter
    pub aa_at: BTreeMap<String, String>,
    /// Row at which a leaf is drawn, assigned by `Tree::analyse`
    pub line_no: usize,

    pub subtree: Vec<Node>,
    pub branch_id: String,
    pub number_strains: usize,
    /// Vertical middle of the first child, assigned by `Tree::analyse`
    pub top: f64,
    /// Vertical middle of the last child, assigned by `Tree::analyse`
    pub bottom: f64,

    // Ladderize keys
    pub(crate) max_edge_length: f64,
    pub(crate) max_date: Date,
    pub(crate) max_name: String,
}

impl Node {
    pub fn leaf(name: impl Into<String>, edge_length: f64) -> Self {
        Self {
            name: name.into(),
            edge_length,
            ..Default::default()
        }
    }

    pub fn internal(subtree: Vec<Node>, edge_length: f64) -> Self {
        Self {
            subtree,
            edge_length,
            ..Default::default()
        }
    }

    pub fn with_date(mut self, date: Date) -> Self {
        self.date = date;
        self
    }

    pub fn with_clades<I, S>(mut self, clades: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.clades = clades.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_continent(mut self, continent: impl Into<String>) -> Self {
        self.continent = continent.into();
        self
    }

    /// Leaf iff no children and a non-empty name.
    pub fn is_leaf(&self) -> bool {
        self.subtree.is_empty() && !self.name.is_empty()
    }

    /// Vertical position in lines: a leaf's row, or the midpoint between
    /// the first and last child of an internal node.
    pub fn middle(&self) -> f64 {
        if self.is_leaf() {
            self.line_no as f64
        } else {
            (self.top + self.bottom) / 2.0
        }
    }

    /// Leaf label as drawn: name, then date if any.
    ///
    /// ```
    /// use tredraw::libs::date::Date;
    /// use tredraw::libs::phylo::Node;
    /// let n = Node::leaf("A/PERTH/16/2009", 0.1).with_date(Date::new(2009, 7, 4));
    /// assert_eq!(n.display_name(), "A/PERTH/16/2009 2009-07-04");
    /// ```
    pub fn display_name(&self) -> String {
        if self.date.is_empty() {
            self.name.clone()
        } else {
            format!("{} {}", self.name, self.date)
        }
    }

    /// Months from `start` to this node's date, `None` for undated nodes.
    pub fn months_from(&self, start: &Date) -> Option<i32> {
        if self.date.is_empty() {
            None
        } else {
            Some(months_between(start, &self.date))
        }
    }

    /// Maximum accumulated edge length down to a leaf (including this
    /// node's own edge) and the number of leaves.
    pub fn width_height(&self) -> (f64, usize) {
        if self.is_leaf() {
            return (self.edge_length, 1);
        }
        let (width, height) = self
            .subtree
            .iter()
            .map(Node::width_height)
            .fold((0.0f64, 0usize), |(w, h), (cw, ch)| (w.max(cw), h + ch));
        (width + self.edge_length, height)
    }

    /// First and last leaf below (or at) this node.
    pub fn first_last_leaf(&self) -> Option<(&Node, &Node)> {
        fn first(n: &Node) -> Option<&Node> {
            if n.is_leaf() {
                Some(n)
            } else {
                n.subtree.iter().find_map(first)
            }
        }
        fn last(n: &Node) -> Option<&Node> {
            if n.is_leaf() {
                Some(n)
            } else {
                n.subtree.iter().rev().find_map(last)
            }
        }
        Some((first(self)?, last(self)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_leaf_predicate() {
        assert!(Node::leaf("A", 1.0).is_leaf());
        assert!(!Node::leaf("", 1.0).is_leaf());
        let mut inner = Node::internal(vec![Node::leaf("A", 1.0)], 0.5);
        assert!(!inner.is_leaf());
        inner.name = "annotated".to_string();
        assert!(!inner.is_leaf());
    }

    #[test]
    fn test_width_height() {
        let n = Node::internal(
            vec![
                Node::internal(vec![Node::leaf("A", 1.0), Node::leaf("B", 2.0)], 3.0),
                Node::leaf("C", 4.0),
            ],
            0.0,
        );
        assert_eq!(n.width_height(), (5.0, 3));
        let (first, last) = n.first_last_leaf().unwrap();
        assert_eq!(first.name, "A");
        assert_eq!(last.name, "C");
    }
}
