use super::error::TreeError;
use super::node::Node;
use super::tree::Tree;
use crate::libs::date::Date;
use serde_json::{json, Map, Value};

/// Value of the `version` key of a tree document.
pub const TREE_JSON_VERSION: &str = "phylogenetic-tree-v1";

/// A tree document: the tree plus the raw `_settings` object, if any.
#[derive(Debug, Clone)]
pub struct TreeDocument {
    pub tree: Tree,
    pub settings: Option<Value>,
}

/// Reads a `phylogenetic-tree-v1` document.
///
/// ```
/// use tredraw::libs::phylo::json::parse_tree_json;
/// let doc = parse_tree_json(r#"{
///   "version": "phylogenetic-tree-v1",
///   "tree": {"edge_length": 0, "subtree": [
///     {"name": "A", "edge_length": 1, "date": "2019-01-15", "clades": ["3C.2a"]},
///     {"name": "B", "edge_length": 2}
///   ]}
/// }"#).unwrap();
/// assert_eq!(doc.tree.number_of_leaves(), 2);
/// assert!(doc.settings.is_none());
/// ```
pub fn parse_tree_json(text: &str) -> Result<TreeDocument, TreeError> {
    let doc: Value = serde_json::from_str(text)?;
    let version = doc.get("version").and_then(Value::as_str).unwrap_or("");
    if version != TREE_JSON_VERSION {
        return Err(TreeError::JsonStructure(format!(
            "unsupported version {}",
            version
        )));
    }
    let root = doc
        .get("tree")
        .ok_or_else(|| TreeError::JsonStructure("no tree".to_string()))?;
    let mut tree = Tree::new(node_from_json(root)?);
    tree.analyse();

    Ok(TreeDocument {
        tree,
        settings: doc.get("_settings").cloned(),
    })
}

fn str_field(j: &Value, key: &str) -> Result<String, TreeError> {
    match j.get(key) {
        None | Some(Value::Null) => Ok(String::new()),
        Some(Value::String(s)) => Ok(s.clone()),
        Some(other) => Err(TreeError::JsonStructure(format!(
            "{} must be a string: {}",
            key, other
        ))),
    }
}

/// Builds a node and its subtree from a JSON node object.
pub fn node_from_json(j: &Value) -> Result<Node, TreeError> {
    if !j.is_object() {
        return Err(TreeError::JsonStructure(format!("unrecognized node: {}", j)));
    }
    let mut node = Node {
        edge_length: j.get("edge_length").and_then(Value::as_f64).unwrap_or(0.0),
        name: str_field(j, "name")?,
        ..Default::default()
    };

    if let Some(subtree) = j.get("subtree") {
        let subtree = subtree.as_array().ok_or_else(|| {
            TreeError::JsonStructure(format!("unrecognized subtree: {}", subtree))
        })?;
        if subtree.is_empty() && node.name.is_empty() {
            return Err(TreeError::JsonStructure("empty subtree".to_string()));
        }
        node.subtree = subtree
            .iter()
            .map(node_from_json)
            .collect::<Result<Vec<_>, _>>()?;
        node.number_strains = j
            .get("number_strains")
            .and_then(Value::as_u64)
            .unwrap_or(0) as usize;
        node.branch_id = str_field(j, "id")?;
    } else {
        if node.name.is_empty() {
            return Err(TreeError::JsonStructure(format!("leaf without name: {}", j)));
        }
        let date = str_field(j, "date")?;
        if !date.is_empty() {
            node.date = Date::parse(&date)?;
        }
        node.continent = str_field(j, "continent")?;
        if let Some(clades) = j.get("clades") {
            let clades = clades.as_array().ok_or_else(|| {
                TreeError::JsonStructure(format!("unrecognized clades: {}", clades))
            })?;
            node.clades = clades
                .iter()
                .filter_map(Value::as_str)
                .map(str::to_string)
                .collect();
        }
        if let Some(Value::Object(aa_at)) = j.get("aa_at") {
            node.aa_at = aa_at
                .iter()
                .filter_map(|(pos, aa)| aa.as_str().map(|aa| (pos.clone(), aa.to_string())))
                .collect();
        }
    }
    Ok(node)
}

/// JSON node object, omitting empty optional fields.
pub fn node_to_json(node: &Node) -> Value {
    let mut j = Map::new();
    j.insert("edge_length".to_string(), json!(node.edge_length));
    if node.is_leaf() {
        j.insert("name".to_string(), json!(node.name));
        if !node.date.is_empty() {
            j.insert("date".to_string(), json!(node.date.to_string()));
        }
        if !node.continent.is_empty() {
            j.insert("continent".to_string(), json!(node.continent));
        }
        if !node.clades.is_empty() {
            j.insert("clades".to_string(), json!(node.clades));
        }
        if !node.aa_at.is_empty() {
            j.insert("aa_at".to_string(), json!(node.aa_at));
        }
    } else {
        if !node.name.is_empty() {
            j.insert("name".to_string(), json!(node.name));
        }
        if !node.branch_id.is_empty() {
            j.insert("id".to_string(), json!(node.branch_id));
        }
        if node.number_strains > 0 {
            j.insert("number_strains".to_string(), json!(node.number_strains));
        }
        let subtree: Vec<Value> = node.subtree.iter().map(node_to_json).collect();
        j.insert("subtree".to_string(), Value::Array(subtree));
    }
    Value::Object(j)
}

/// Serializes a tree document, indented by two spaces and newline
/// terminated. `creator` names the tool that wrote it.
pub fn tree_to_json(tree: &Tree, creator: &str, settings: Option<Value>) -> String {
    let user = std::env::var("USER").unwrap_or_default();
    let date = chrono::Local::now().format("%Y-%m-%d %H:%M %Z").to_string();

    let mut doc = Map::new();
    doc.insert("version".to_string(), json!(TREE_JSON_VERSION));
    doc.insert(
        "updated".to_string(),
        json!({"user": user, "date": date, "creator": creator}),
    );
    doc.insert("tree".to_string(), node_to_json(&tree.root));
    if let Some(settings) = settings {
        doc.insert("_settings".to_string(), settings);
    }

    // to_string_pretty cannot fail on a Value
    let mut text = serde_json::to_string_pretty(&Value::Object(doc)).unwrap_or_default();
    text.push('\n');
    text
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::libs::phylo::parser::parse_newick;

    fn same_tree(a: &Node, b: &Node) {
        assert_eq!(a.edge_length, b.edge_length);
        assert_eq!(a.name, b.name);
        assert_eq!(a.date, b.date);
        assert_eq!(a.continent, b.continent);
        assert_eq!(a.clades, b.clades);
        assert_eq!(a.subtree.len(), b.subtree.len());
        for (x, y) in a.subtree.iter().zip(b.subtree.iter()) {
            same_tree(x, y);
        }
    }

    #[test]
    fn test_json_round_trip() {
        for newick in [
            "((A:1,B:2):3,C:4);",
            "(X%20Y-2015-03-12:0.5);",
            "(((A-2019-01-15:0.01,B-2019-02-01:0.02):0.5,C:1e-3):0.1,D:0):0.25;",
        ] {
            let mut tree = parse_newick(newick).unwrap();
            tree.iterate_mut(|v| {
                if let crate::libs::phylo::tree::VisitMut::Leaf(n) = v {
                    n.continent = "EUROPE".to_string();
                    n.clades.insert(format!("clade-{}", n.line_no % 2));
                }
            });
            let text = tree_to_json(&tree, "test", None);
            let doc = parse_tree_json(&text).unwrap();
            same_tree(tree.root(), doc.tree.root());
            assert_eq!(doc.tree, tree);
        }
    }

    #[test]
    fn test_json_document_layout() {
        let tree = parse_newick("((A:1,B:2):3,C:4);").unwrap();
        let text = tree_to_json(&tree, "tredraw to-json", Some(json!({"border": 0.1})));
        assert!(text.ends_with("}\n"));
        let doc: Value = serde_json::from_str(&text).unwrap();
        assert_eq!(doc["version"], TREE_JSON_VERSION);
        assert_eq!(doc["updated"]["creator"], "tredraw to-json");
        assert_eq!(doc["tree"]["number_strains"], 3);
        assert_eq!(doc["tree"]["subtree"][1]["name"], "C");
        assert!(doc["tree"]["subtree"][1].get("date").is_none());
        assert_eq!(doc["_settings"]["border"], 0.1);
    }

    #[test]
    fn test_json_leaf_fields() {
        let j = json!({
            "edge_length": 0.5,
            "name": "A/PERTH/16/2009",
            "date": "2009-07",
            "continent": "AUSTRALIA-OCEANIA",
            "clades": ["3C", "3C.2a"],
            "aa_at": {"142": "K", "158": "N"}
        });
        let node = node_from_json(&j).unwrap();
        assert!(node.is_leaf());
        assert_eq!(node.date, Date::new(2009, 7, 1));
        assert_eq!(node.clades.len(), 2);
        assert_eq!(node.aa_at["158"], "N");
        assert_eq!(node_to_json(&node)["aa_at"]["142"], "K");
    }

    #[test]
    fn test_json_errors() {
        let wrong_version = r#"{"version": "phylogenetic-tree-v2", "tree": {"name": "A"}}"#;
        assert!(matches!(
            parse_tree_json(wrong_version),
            Err(TreeError::JsonStructure(m)) if m.contains("unsupported version")
        ));

        let spaced_key = r#"{"  version": "phylogenetic-tree-v1", "tree": {"name": "A"}}"#;
        assert!(parse_tree_json(spaced_key).is_err());

        let bad_subtree = r#"{"version": "phylogenetic-tree-v1", "tree": {"subtree": {}}}"#;
        assert!(matches!(
            parse_tree_json(bad_subtree),
            Err(TreeError::JsonStructure(m)) if m.contains("subtree")
        ));

        let empty = r#"{"version": "phylogenetic-tree-v1", "tree": {"subtree": []}}"#;
        assert!(parse_tree_json(empty).is_err());

        let bad_date = r#"{"version": "phylogenetic-tree-v1",
            "tree": {"subtree": [{"name": "A", "date": "2019"}]}}"#;
        assert!(matches!(
            parse_tree_json(bad_date),
            Err(TreeError::DateFormat(_))
        ));

        assert!(parse_tree_json("{").is_err());
    }
}
