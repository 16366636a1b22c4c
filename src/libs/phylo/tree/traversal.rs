use crate::libs::phylo::node::Node;

/// One step of a depth-first walk.
///
/// Leaves are reported once; internal nodes twice, before (`Pre`) and after
/// (`Post`) their children.
#[derive(Debug, Clone, Copy)]
pub enum Visit<'a> {
    Leaf(&'a Node),
    Pre(&'a Node),
    Post(&'a Node),
}

#[derive(Debug)]
pub enum VisitMut<'a> {
    Leaf(&'a mut Node),
    Pre(&'a mut Node),
    Post(&'a mut Node),
}

impl<'a> Visit<'a> {
    pub fn node(&self) -> &'a Node {
        match *self {
            Visit::Leaf(n) | Visit::Pre(n) | Visit::Post(n) => n,
        }
    }
}

/// Walk `node` depth-first, children in order.
pub fn iterate<'a, F>(node: &'a Node, f: &mut F)
where
    F: FnMut(Visit<'a>),
{
    if node.is_leaf() {
        f(Visit::Leaf(node));
    } else {
        f(Visit::Pre(node));
        for child in &node.subtree {
            iterate(child, f);
        }
        f(Visit::Post(node));
    }
}

/// Mutable counterpart of [`iterate`]. A `Pre` callback may reorder or edit
/// the children before they are visited.
pub fn iterate_mut<F>(node: &mut Node, f: &mut F)
where
    F: FnMut(VisitMut<'_>),
{
    if node.is_leaf() {
        f(VisitMut::Leaf(node));
    } else {
        f(VisitMut::Pre(node));
        for child in node.subtree.iter_mut() {
            iterate_mut(child, f);
        }
        f(VisitMut::Post(node));
    }
}

/// Leaves in drawing order.
pub fn leaves(node: &Node) -> Vec<&Node> {
    let mut result = Vec::new();
    iterate(node, &mut |v| {
        if let Visit::Leaf(n) = v {
            result.push(n);
        }
    });
    result
}

/// First internal node (pre-order) whose `branch_id` equals `id`.
pub fn find_branch<'a>(node: &'a Node, id: &str) -> Option<&'a Node> {
    if node.is_leaf() {
        return None;
    }
    if node.branch_id == id {
        return Some(node);
    }
    node.subtree.iter().find_map(|c| find_branch(c, id))
}
