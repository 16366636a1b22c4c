use super::*;
use crate::libs::phylo::parser::parse_newick;

fn leaf_names(tree: &Tree) -> Vec<String> {
    tree.leaves().iter().map(|n| n.name.clone()).collect()
}

// Every leaf numbered in order, every subtree spanning its first and last child
fn assert_analysed(tree: &Tree) {
    for (i, leaf) in tree.leaves().iter().enumerate() {
        assert_eq!(leaf.line_no, i, "{}", leaf.name);
    }
    tree.iterate(|v| {
        if let Visit::Post(node) = v {
            assert_eq!(node.top, node.subtree[0].middle());
            assert_eq!(node.bottom, node.subtree[node.subtree.len() - 1].middle());
            let (first, last) = node.first_last_leaf().unwrap();
            assert!(node.top >= first.line_no as f64);
            assert!(node.bottom <= last.line_no as f64);
        }
    });
}

#[test]
fn test_tree_analyse() {
    let tree = parse_newick("((A:1,B:2):3,C:4);").unwrap();
    let leaves = tree.leaves();
    assert_eq!(leaves[0].line_no, 0);
    assert_eq!(leaves[1].line_no, 1);
    assert_eq!(leaves[2].line_no, 2);

    let inner = &tree.root().subtree[0];
    assert_eq!(inner.top, 0.0);
    assert_eq!(inner.bottom, 1.0);
    assert_eq!(inner.middle(), 0.5);
    assert_eq!(inner.number_strains, 2);

    assert_eq!(tree.root().top, 0.5);
    assert_eq!(tree.root().bottom, 2.0);
    assert_eq!(tree.root().number_strains, 3);
    assert_analysed(&tree);
}

#[test]
fn test_tree_traversal_order() {
    let tree = parse_newick("((A,B),(C,(D,E)));").unwrap();
    let mut events = Vec::new();
    tree.iterate(|v| match v {
        Visit::Leaf(n) => events.push(n.name.clone()),
        Visit::Pre(_) => events.push("(".to_string()),
        Visit::Post(_) => events.push(")".to_string()),
    });
    assert_eq!(
        events.concat(),
        "((AB)(C(DE)))".to_string()
    );
    assert_analysed(&tree);
}

#[test]
fn test_tree_ladderize() {
    let mut tree = parse_newick("((A:1,B:5):1,(C:2,D:2):1);").unwrap();
    tree.ladderize();
    let root = tree.root();
    assert!(root.subtree[1].subtree.iter().any(|n| n.name == "B"));
    assert_eq!(leaf_names(&tree), vec!["C", "D", "A", "B"]);
    assert_analysed(&tree);
}

#[test]
fn test_tree_ladderize_ties() {
    // equal path lengths: later date last, then greater name last
    let mut tree = parse_newick("(B-2015-01-01:1,A-2016-01-01:1,D:1,C:1);").unwrap();
    tree.ladderize();
    assert_eq!(leaf_names(&tree), vec!["C", "D", "B", "A"]);
}

#[test]
fn test_tree_ladderize_idempotent() {
    for newick in [
        "((A:1,B:5):1,(C:2,D:2):1);",
        "(((X:0.1,Y:0.3):0.2,Z:0.05):0.01,((P:0.2,Q:0.2):0.2,R:0.4):0.0);",
        "((A-2019-01-01:1,B-2018-01-01:1):1,(C:1,D:1):1,E:2);",
    ] {
        let mut once = parse_newick(newick).unwrap();
        once.ladderize();
        let mut twice = once.clone();
        twice.ladderize();
        assert_eq!(leaf_names(&once), leaf_names(&twice), "{}", newick);
        assert_eq!(once, twice, "{}", newick);
    }
}

#[test]
fn test_tree_fix_labels() {
    // parentheses are not valid in Newick names, build the tree directly
    let names = ["A/HUMAN/B", "A__B", "X(H3N2)/Y", "P(H1N1)/Q/HUMAN/R__S__T"];
    let mut tree = Tree::new(Node::internal(
        names.iter().map(|n| Node::leaf(*n, 1.0)).collect(),
        0.0,
    ));
    tree.analyse();
    tree.fix_labels();
    assert_eq!(leaf_names(&tree), vec!["AB", "A B", "XY", "PQR S__T"]);
}

#[test]
fn test_tree_min_max() {
    let tree =
        parse_newick("((A-2019-01-15:0.5,B-2019-05-20:0):0.25,C:2,D-2018-12-01:0.1);").unwrap();
    let (min, max) = tree.min_max_date();
    assert_eq!(min.to_string(), "2018-12-01");
    assert_eq!(max.to_string(), "2019-05-20");
    assert_eq!(tree.min_max_edge(), (0.1, 2.0));
    assert_eq!(tree.width_height(), (2.0, 4));

    let undated = parse_newick("(A:0,B:0);").unwrap();
    let (min, max) = undated.min_max_date();
    assert!(min.is_empty() && max.is_empty());
    assert_eq!(undated.min_max_edge(), (0.0, 0.0));
}

#[test]
fn test_tree_print() {
    let tree = parse_newick("((A-2019-01-15:1,B:2):3,C:4);").unwrap();
    let mut out = Vec::new();
    tree.print(&mut out).unwrap();
    let expected = "(\n  (\n    A 2019-01-15:1\n    B:2\n  ):3\n  C:4\n):0\n";
    assert_eq!(String::from_utf8(out).unwrap(), expected);
}

#[test]
fn test_tree_print_edges() {
    let tree = parse_newick("((A:1,B:2):1,C:0.5);").unwrap();
    let mut out = Vec::new();
    tree.print_edges(&mut out).unwrap();
    let expected = "0 1\n0.5 1\n1 2\n2 1\nmin: 0.5  max: 2\n";
    assert_eq!(String::from_utf8(out).unwrap(), expected);
}

#[test]
fn test_tree_differences() {
    let a = parse_newick("((A:1,B:2):3,C:4);").unwrap();
    let b = parse_newick("((A:1,B:2):3,C:4);").unwrap();
    assert!(a.differences(&b).is_empty());

    let c = parse_newick("((A:1,B:2):2,C:4);").unwrap();
    assert_eq!(a.differences(&c).len(), 1);

    let d = parse_newick("((B:1,A:2):3,C:4);").unwrap();
    assert_eq!(a.differences(&d).len(), 2);
}

#[test]
fn test_tree_find_branch() {
    let mut tree = parse_newick("((A,B),(C,D));").unwrap();
    tree.root_mut().subtree[1].branch_id = "cd".to_string();
    let node = tree.find_branch("cd").unwrap();
    assert_eq!(node.top, 2.0);
    assert!(tree.find_branch("missing").is_none());
}
