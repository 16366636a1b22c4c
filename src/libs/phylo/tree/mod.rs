pub mod ladderize;
pub mod stat;
#[cfg(test)]
mod tests;
pub mod traversal;

pub use traversal::{Visit, VisitMut};

use super::node::Node;
use crate::libs::date::Date;
use std::io::Write;

/// A rooted tree. The root node owns every other node through its
/// `subtree`; its `edge_length` is drawn as the root stub.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Tree {
    pub root: Node,
}

impl Tree {
    pub fn new(root: Node) -> Self {
        Self { root }
    }

    pub fn root(&self) -> &Node {
        &self.root
    }

    pub fn root_mut(&mut self) -> &mut Node {
        &mut self.root
    }

    // --- Delegation to traversal ---

    pub fn iterate<'a, F>(&'a self, mut f: F)
    where
        F: FnMut(Visit<'a>),
    {
        traversal::iterate(&self.root, &mut f)
    }

    pub fn iterate_mut<F>(&mut self, mut f: F)
    where
        F: FnMut(VisitMut<'_>),
    {
        traversal::iterate_mut(&mut self.root, &mut f)
    }

    pub fn leaves(&self) -> Vec<&Node> {
        traversal::leaves(&self.root)
    }

    pub fn number_of_leaves(&self) -> usize {
        self.leaves().len()
    }

    pub fn find_branch(&self, id: &str) -> Option<&Node> {
        traversal::find_branch(&self.root, id)
    }

    // --- Analysis passes ---

    /// Assign `line_no` to leaves in order, `top`/`bottom` and
    /// `number_strains` to internal nodes.
    pub fn analyse(&mut self) {
        let mut current_line = 0usize;
        self.iterate_mut(|v| match v {
            VisitMut::Leaf(node) => {
                node.line_no = current_line;
                current_line += 1;
            }
            VisitMut::Pre(_) => {}
            VisitMut::Post(node) => {
                if let (Some(first), Some(last)) = (node.subtree.first(), node.subtree.last()) {
                    node.top = first.middle();
                    node.bottom = last.middle();
                }
                node.number_strains = node
                    .subtree
                    .iter()
                    .map(|c| if c.is_leaf() { 1 } else { c.number_strains })
                    .sum();
            }
        });
    }

    pub fn ladderize(&mut self) {
        ladderize::ladderize(self)
    }

    /// Strip host and subtype noise from leaf names.
    ///
    /// ```
    /// use tredraw::libs::phylo::{Node, Tree};
    /// let mut tree = Tree::new(Node::internal(vec![Node::leaf("A/HUMAN/B", 0.0)], 0.0));
    /// tree.fix_labels();
    /// assert_eq!(tree.leaves()[0].name, "AB");
    /// ```
    pub fn fix_labels(&mut self) {
        self.iterate_mut(|v| {
            if let VisitMut::Leaf(node) = v {
                for noise in ["/HUMAN/", "(H3N2)/", "(H1N1)/"] {
                    if let Some(pos) = node.name.find(noise) {
                        node.name.replace_range(pos..pos + noise.len(), "");
                    }
                }
                node.name = node.name.replacen("__", " ", 1);
            }
        });
    }

    // --- Delegation to stat ---

    pub fn min_max_date(&self) -> (Date, Date) {
        stat::min_max_date(self)
    }

    pub fn min_max_edge(&self) -> (f64, f64) {
        stat::min_max_edge(self)
    }

    pub fn width_height(&self) -> (f64, usize) {
        self.root.width_height()
    }

    pub fn print<W: Write + ?Sized>(&self, out: &mut W) -> std::io::Result<()> {
        stat::print(self, out)
    }

    pub fn print_edges<W: Write + ?Sized>(&self, out: &mut W) -> std::io::Result<()> {
        stat::print_edges(self, out)
    }

    pub fn differences(&self, other: &Tree) -> Vec<String> {
        stat::differences(self, other)
    }
}
