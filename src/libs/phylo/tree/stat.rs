use super::traversal::{iterate, Visit};
use super::Tree;
use crate::libs::date::Date;
use itertools::Itertools;
use std::io::Write;

/// Earliest and latest leaf date; both empty when no leaf is dated.
pub fn min_max_date(tree: &Tree) -> (Date, Date) {
    let mut min = Date::default();
    let mut max = Date::default();
    iterate(&tree.root, &mut |v| {
        if let Visit::Leaf(node) = v {
            if !node.date.is_empty() {
                if min.is_empty() || node.date < min {
                    min = node.date;
                }
                if max.is_empty() || max < node.date {
                    max = node.date;
                }
            }
        }
    });
    (min, max)
}

/// Shortest and longest positive edge length over all nodes, `(0, 0)` when
/// there is none.
pub fn min_max_edge(tree: &Tree) -> (f64, f64) {
    let mut min = f64::INFINITY;
    let mut max = 0.0f64;
    iterate(&tree.root, &mut |v| {
        if matches!(v, Visit::Post(_)) {
            return;
        }
        let edge = v.node().edge_length;
        if edge > 0.0 {
            min = min.min(edge);
            max = max.max(edge);
        }
    });
    if min.is_infinite() {
        (0.0, 0.0)
    } else {
        (min, max)
    }
}

/// Indented dump, leaves as `name[ date]:edge`, subtrees as `(` ... `):edge`.
pub fn print<W: Write + ?Sized>(tree: &Tree, out: &mut W) -> std::io::Result<()> {
    let mut indent = 0usize;
    let mut result = Ok(());
    iterate(&tree.root, &mut |v| {
        if result.is_err() {
            return;
        }
        result = match v {
            Visit::Leaf(node) => writeln!(
                out,
                "{:indent$}{}:{}",
                "",
                node.display_name(),
                node.edge_length,
                indent = indent
            ),
            Visit::Pre(_) => {
                let r = writeln!(out, "{:indent$}(", "", indent = indent);
                indent += 2;
                r
            }
            Visit::Post(node) => {
                indent = indent.saturating_sub(2);
                writeln!(out, "{:indent$}):{}", "", node.edge_length, indent = indent)
            }
        };
    });
    result
}

/// Histogram of edge lengths (`length count` per line, ascending), then
/// the positive range.
pub fn print_edges<W: Write + ?Sized>(tree: &Tree, out: &mut W) -> std::io::Result<()> {
    let mut edges = Vec::new();
    iterate(&tree.root, &mut |v| {
        if !matches!(v, Visit::Post(_)) {
            edges.push(v.node().edge_length);
        }
    });
    edges.sort_by(f64::total_cmp);

    for (count, edge) in edges.into_iter().dedup_by_with_count(|a, b| a == b) {
        writeln!(out, "{} {}", edge, count)?;
    }
    let (min, max) = min_max_edge(tree);
    writeln!(out, "min: {}  max: {}", min, max)?;
    Ok(())
}

/// Human-readable differences between two trees, compared leaf by leaf in
/// drawing order and node by node in structure. Empty when they are equal.
pub fn differences(a: &Tree, b: &Tree) -> Vec<String> {
    let mut diffs = Vec::new();

    let la = a.leaves();
    let lb = b.leaves();
    if la.len() != lb.len() {
        diffs.push(format!("number of leaves: {} vs {}", la.len(), lb.len()));
    }
    for (i, (x, y)) in la.iter().zip(lb.iter()).enumerate() {
        if x.name != y.name {
            diffs.push(format!("leaf {}: name {} vs {}", i, x.name, y.name));
        } else if x.date != y.date {
            diffs.push(format!("leaf {} {}: date {} vs {}", i, x.name, x.date, y.date));
        } else if (x.edge_length - y.edge_length).abs() > f64::EPSILON {
            diffs.push(format!(
                "leaf {} {}: edge {} vs {}",
                i, x.name, x.edge_length, y.edge_length
            ));
        }
    }

    let mut sa = Vec::new();
    iterate(&a.root, &mut |v| shape(&mut sa, v));
    let mut sb = Vec::new();
    iterate(&b.root, &mut |v| shape(&mut sb, v));
    if diffs.is_empty() && sa != sb {
        diffs.push("topology or internal edge lengths differ".to_string());
    }

    diffs
}

fn shape(acc: &mut Vec<String>, v: Visit<'_>) {
    match v {
        Visit::Leaf(_) => acc.push("L".to_string()),
        Visit::Pre(_) => acc.push("(".to_string()),
        Visit::Post(node) => acc.push(format!("):{}", node.edge_length)),
    }
}
