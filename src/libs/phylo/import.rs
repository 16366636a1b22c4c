use super::error::TreeError;
use super::json::{parse_tree_json, TreeDocument};
use super::parser::parse_newick;
use crate::libs::io::{decompress_if_xz, reader};
use std::io::Read;

/// Loads a tree from `-` or `stdin`, a file, or inline Newick/JSON text.
///
/// xz input is decompressed first. Newick sources carry no settings.
///
/// ```
/// use tredraw::libs::phylo::import::import_tree;
/// let doc = import_tree("((A:1,B:2):3,C:4);").unwrap();
/// assert_eq!(doc.tree.number_of_leaves(), 3);
/// assert!(doc.settings.is_none());
/// ```
pub fn import_tree(source: &str) -> Result<TreeDocument, TreeError> {
    let data = load_source(source)?;
    import_bytes(data)
}

/// Sniffs the format of `data` and parses it.
pub fn import_bytes(data: Vec<u8>) -> Result<TreeDocument, TreeError> {
    let data = decompress_if_xz(data)?;
    let text = String::from_utf8(data).map_err(|e| {
        TreeError::io(
            "cannot import tree",
            std::io::Error::new(std::io::ErrorKind::InvalidData, e),
        )
    })?;
    match text.as_bytes().first() {
        Some(b'(') => {
            let tree = parse_newick(&text)?;
            log::info!("newick tree with {} leaves", tree.number_of_leaves());
            Ok(TreeDocument {
                tree,
                settings: None,
            })
        }
        Some(b'{') => {
            let doc = parse_tree_json(&text)?;
            log::info!(
                "json tree with {} leaves{}",
                doc.tree.number_of_leaves(),
                if doc.settings.is_some() { " and settings" } else { "" }
            );
            Ok(doc)
        }
        _ => Err(TreeError::FormatUnrecognized),
    }
}

fn load_source(source: &str) -> Result<Vec<u8>, TreeError> {
    let is_file = std::path::Path::new(source).is_file();
    if source == "-" || source == "stdin" || is_file {
        let mut data = Vec::new();
        reader(source)?
            .read_to_end(&mut data)
            .map_err(|e| TreeError::io(format!("cannot read {}", source), e))?;
        Ok(data)
    } else if source.starts_with('(') || source.starts_with('{') {
        Ok(source.as_bytes().to_vec())
    } else {
        Err(TreeError::io(
            format!("cannot open {}", source),
            std::io::Error::from(std::io::ErrorKind::NotFound),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_import_sniffing() {
        let doc = import_tree(r#"{"version": "phylogenetic-tree-v1", "tree": {"subtree": [{"name": "A"}]}, "_settings": {}}"#).unwrap();
        assert_eq!(doc.tree.number_of_leaves(), 1);
        assert!(doc.settings.is_some());

        assert!(matches!(
            import_bytes(b"A;".to_vec()),
            Err(TreeError::FormatUnrecognized)
        ));
        assert!(matches!(
            import_bytes(Vec::new()),
            Err(TreeError::FormatUnrecognized)
        ));
        assert!(matches!(
            import_tree("no-such-tree.nwk"),
            Err(TreeError::Io { .. })
        ));
    }

    #[test]
    fn test_import_xz_bytes() {
        let mut encoder = xz2::write::XzEncoder::new(Vec::new(), 6);
        encoder.write_all(b"((A:1,B:2):3,C:4);").unwrap();
        let data = encoder.finish().unwrap();
        let doc = import_bytes(data).unwrap();
        assert_eq!(doc.tree.number_of_leaves(), 3);
    }

    #[test]
    fn test_import_file() {
        let doc = import_tree("tests/newick/abc.nwk").unwrap();
        let names: Vec<_> = doc.tree.leaves().iter().map(|n| n.name.clone()).collect();
        assert_eq!(names, vec!["A", "B", "C"]);
    }
}
