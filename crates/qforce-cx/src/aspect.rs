//! Serde models for the CX aspects qforce reads.
//!
//! Only the fields needed for layout are modelled; everything else in an
//! aspect element is ignored.

use std::collections::HashMap;

use serde::Deserialize;
use serde_json::Value;

/// Aspect holding node declarations.
pub(crate) const NODES: &str = "nodes";
/// Aspect holding edge declarations.
pub(crate) const EDGES: &str = "edges";
/// Aspect holding network-level attributes such as the name.
pub(crate) const NETWORK_ATTRIBUTES: &str = "networkAttributes";
/// Aspect containing visual properties where node size can be extracted.
pub(crate) const CY_VISUAL_PROPERTIES: &str = "cyVisualProperties";

/// Visual property group holding the default node style.
const NODES_DEFAULT: &str = "nodes:default";
/// Visual properties that bound the drawn node size.
const NODE_SIZE_PROPERTIES: [&str; 3] = ["NODE_WIDTH", "NODE_HEIGHT", "NODE_SIZE"];

#[derive(Debug, Deserialize)]
pub(crate) struct Node {
    #[serde(rename = "@id")]
    pub(crate) id: i64,
}

#[derive(Debug, Deserialize)]
pub(crate) struct Edge {
    #[serde(rename = "s")]
    pub(crate) source: i64,
    #[serde(rename = "t")]
    pub(crate) target: i64,
}

#[derive(Debug, Deserialize)]
pub(crate) struct NetworkAttribute {
    #[serde(rename = "n")]
    pub(crate) name: String,
    #[serde(rename = "v", default)]
    pub(crate) value: Value,
}

#[derive(Debug, Deserialize)]
pub(crate) struct VisualProperties {
    pub(crate) properties_of: String,
    #[serde(default)]
    pub(crate) properties: HashMap<String, Value>,
}

impl VisualProperties {
    /// The largest of the width, height and size properties of the default
    /// node style, or `None` if this is not the default node style or none
    /// of them is numeric.
    pub(crate) fn default_node_size(&self) -> Option<f64> {
        if self.properties_of != NODES_DEFAULT {
            return None;
        }

        NODE_SIZE_PROPERTIES
            .iter()
            .filter_map(|key| self.properties.get(*key).and_then(numeric))
            .reduce(f64::max)
    }
}

/// Visual property values are usually strings ("75.0") but some writers emit numbers.
fn numeric(value: &Value) -> Option<f64> {
    match value {
        Value::Number(number) => number.as_f64(),
        Value::String(text) => text.trim().parse().ok(),
        _ => None,
    }
}
