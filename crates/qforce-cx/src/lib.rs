//! # QForce CX Reader
//!
//! Reads CX network exchange documents into the plain data the layout engine
//! needs: node ids, an ordered edge list, the network name and a node-size
//! hint taken from the visual properties.
//!
//! A CX document is a JSON array of aspect fragments. Each fragment is an
//! object mapping one aspect name to a list of aspect elements; the same
//! aspect may appear in several fragments and unknown aspects are skipped.
//!
//! ## Usage
//!
//! ```
//! # use qforce_cx::{parse, CxError};
//!
//! fn main() -> Result<(), CxError> {
//!     let source = r#"[
//!         {"nodes": [{"@id": 1, "n": "TP53"}, {"@id": 2, "n": "MDM2"}]},
//!         {"edges": [{"@id": 3, "s": 2, "t": 1, "i": "inhibits"}]}
//!     ]"#;
//!
//!     let network = parse(source)?;
//!     assert_eq!(network.edges(), &[(2, 1)]);
//!     Ok(())
//! }
//! ```

mod aspect;
mod error;

pub use error::CxError;

use std::io::Read;

use indexmap::IndexSet;
use log::{debug, trace};
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

/// The layout-relevant content of a CX document.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Network {
    name: Option<String>,
    node_ids: Vec<i64>,
    edges: Vec<(i64, i64)>,
    node_size: Option<f64>,
}

impl Network {
    /// The `name` network attribute, if present.
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Declared node ids, in document order and without duplicates.
    pub fn node_ids(&self) -> &[i64] {
        &self.node_ids
    }

    /// Edges as `(source, target)` pairs, in document order.
    pub fn edges(&self) -> &[(i64, i64)] {
        &self.edges
    }

    /// Node size from the default node style, if the document has one.
    pub fn node_size(&self) -> Option<f64> {
        self.node_size
    }
}

/// Parse a CX document from a string.
///
/// # Errors
///
/// Returns [`CxError::Json`] if the text is not a JSON array of objects and
/// [`CxError::Aspect`] if a known aspect has malformed elements.
pub fn parse(source: &str) -> Result<Network, CxError> {
    let fragments: Vec<Map<String, Value>> = serde_json::from_str(source)?;
    from_fragments(fragments)
}

/// Parse a CX document from a reader.
///
/// # Errors
///
/// Same as [`parse`], plus I/O failures surfaced through [`CxError::Json`].
pub fn from_reader(reader: impl Read) -> Result<Network, CxError> {
    let fragments: Vec<Map<String, Value>> = serde_json::from_reader(reader)?;
    from_fragments(fragments)
}

fn from_fragments(fragments: Vec<Map<String, Value>>) -> Result<Network, CxError> {
    let mut node_ids = IndexSet::new();
    let mut edges = Vec::new();
    let mut name = None;
    let mut node_size = None;

    for (aspect_name, elements) in fragments.into_iter().flatten() {
        match aspect_name.as_str() {
            aspect::NODES => {
                let nodes: Vec<aspect::Node> = elements_of(&aspect_name, elements)?;
                node_ids.extend(nodes.into_iter().map(|node| node.id));
            }
            aspect::EDGES => {
                let batch: Vec<aspect::Edge> = elements_of(&aspect_name, elements)?;
                edges.extend(batch.into_iter().map(|edge| (edge.source, edge.target)));
            }
            aspect::NETWORK_ATTRIBUTES => {
                let attributes: Vec<aspect::NetworkAttribute> =
                    elements_of(&aspect_name, elements)?;
                if name.is_none() {
                    name = attributes
                        .into_iter()
                        .find(|attribute| attribute.name == "name")
                        .and_then(|attribute| attribute.value.as_str().map(str::to_string));
                }
            }
            aspect::CY_VISUAL_PROPERTIES => {
                let properties: Vec<aspect::VisualProperties> =
                    elements_of(&aspect_name, elements)?;
                if node_size.is_none() {
                    node_size = properties
                        .iter()
                        .find_map(aspect::VisualProperties::default_node_size);
                }
            }
            other => trace!(aspect = other; "Skipping aspect"),
        }
    }

    debug!(
        nodes = node_ids.len(),
        edges = edges.len(),
        node_size:?;
        "Parsed CX network"
    );

    Ok(Network {
        name,
        node_ids: node_ids.into_iter().collect(),
        edges,
        node_size,
    })
}

fn elements_of<T: DeserializeOwned>(aspect: &str, elements: Value) -> Result<Vec<T>, CxError> {
    serde_json::from_value(elements).map_err(|err| CxError::aspect(aspect, err))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_full_document() {
        let source = r#"[
            {"numberVerification": [{"longNumber": 281474976710655}]},
            {"networkAttributes": [{"n": "name", "v": "Nectin adhesion"}, {"n": "version", "v": "1.0"}]},
            {"nodes": [{"@id": 10, "n": "A"}, {"@id": 11, "n": "B"}, {"@id": 12, "n": "C"}]},
            {"edges": [{"@id": 20, "s": 10, "t": 11}, {"@id": 21, "s": 11, "t": 12}]},
            {"cyVisualProperties": [
                {"properties_of": "network", "properties": {"NETWORK_WIDTH": "800"}},
                {"properties_of": "nodes:default", "properties": {"NODE_WIDTH": "60.0", "NODE_HEIGHT": "30.0", "NODE_SIZE": "35.0"}}
            ]},
            {"status": [{"error": "", "success": true}]}
        ]"#;

        let network = parse(source).expect("valid CX");
        assert_eq!(network.name(), Some("Nectin adhesion"));
        assert_eq!(network.node_ids(), &[10, 11, 12]);
        assert_eq!(network.edges(), &[(10, 11), (11, 12)]);
        assert_eq!(network.node_size(), Some(60.0));
    }

    #[test]
    fn test_aspects_split_across_fragments() {
        let source = r#"[
            {"edges": [{"s": 1, "t": 2}]},
            {"nodes": [{"@id": 1}]},
            {"edges": [{"s": 2, "t": 3}]},
            {"nodes": [{"@id": 2}, {"@id": 1}, {"@id": 3}]}
        ]"#;

        let network = parse(source).expect("valid CX");
        assert_eq!(network.node_ids(), &[1, 2, 3]);
        assert_eq!(network.edges(), &[(1, 2), (2, 3)]);
        assert_eq!(network.name(), None);
        assert_eq!(network.node_size(), None);
    }

    #[test]
    fn test_empty_document() {
        let network = parse("[]").expect("valid CX");
        assert_eq!(network, Network::default());
    }

    #[test]
    fn test_not_an_array() {
        let err = parse(r#"{"nodes": []}"#).unwrap_err();
        assert!(matches!(err, CxError::Json(_)));
    }

    #[test]
    fn test_malformed_edge() {
        let err = parse(r#"[{"edges": [{"s": "one", "t": 2}]}]"#).unwrap_err();
        assert!(matches!(err, CxError::Aspect { ref aspect, .. } if aspect == "edges"));
        assert!(err.to_string().starts_with("malformed `edges` aspect"));
    }

    #[test]
    fn test_from_reader() {
        let source = br#"[{"edges": [{"s": 4, "t": 5}]}]"#;
        let network = from_reader(&source[..]).expect("valid CX");
        assert_eq!(network.edges(), &[(4, 5)]);
    }
}
