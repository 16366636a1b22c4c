use super::traversal::{iterate_mut, VisitMut};
use super::Tree;
use crate::libs::phylo::node::Node;
use std::cmp::Ordering;

/// Sort the children of every internal node so that the subtree with the
/// longest path to a leaf comes last.
///
/// Ties on the path length (closer than `f64::EPSILON`) fall back to the
/// latest leaf date, then to the greatest leaf name.
///
/// # Example
/// ```
/// use tredraw::libs::phylo::parser::parse_newick;
///
/// let mut tree = parse_newick("((A:1,B:5):1,(C:2,D:2):1);").unwrap();
/// tree.ladderize();
/// let names: Vec<_> = tree.leaves().iter().map(|n| n.name.clone()).collect();
/// assert_eq!(names, vec!["C", "D", "A", "B"]);
/// ```
pub fn ladderize(tree: &mut Tree) {
    iterate_mut(&mut tree.root, &mut |v| match v {
        VisitMut::Leaf(node) => {
            node.max_edge_length = node.edge_length;
            node.max_date = node.date;
            node.max_name = node.name.clone();
        }
        VisitMut::Pre(_) => {}
        VisitMut::Post(node) => {
            let mut max_edge = 0.0f64;
            for child in &node.subtree {
                max_edge = max_edge.max(child.max_edge_length);
            }
            node.max_edge_length = node.edge_length + max_edge;
            node.max_date = node
                .subtree
                .iter()
                .map(|c| c.max_date)
                .max()
                .unwrap_or_default();
            node.max_name = node
                .subtree
                .iter()
                .map(|c| c.max_name.as_str())
                .max()
                .unwrap_or_default()
                .to_string();
            node.subtree.sort_by(ladder_order);
        }
    });
    tree.analyse();
}

fn ladder_order(a: &Node, b: &Node) -> Ordering {
    let diff = a.max_edge_length - b.max_edge_length;
    if diff.abs() < f64::EPSILON {
        a.max_date
            .cmp(&b.max_date)
            .then_with(|| a.max_name.cmp(&b.max_name))
    } else if diff < 0.0 {
        Ordering::Less
    } else {
        Ordering::Greater
    }
}
