//! JSON form of a component tree.
//!
//! ```json
//! {"type": "document", "children": [
//!     {"type": "content", "children": [
//!         {"type": "text", "props": {"bold": true}, "children": ["Hello"]},
//!         {"component": "Signature", "props": {"name": "Ada"}}
//!     ]}
//! ]}
//! ```
//!
//! Strings and numbers become text, `null` and `false` render nothing, and
//! arrays are fragments.

use super::{ComponentTree, Node, Props, Tag};
use crate::renderer::RenderError;
use serde_json::{Map, Value};

impl ComponentTree {
    pub fn from_json(value: &Value) -> Result<Self, RenderError> {
        Ok(ComponentTree::new(node_from_json(value, "$")?))
    }

    pub fn from_json_str(json: &str) -> Result<Self, RenderError> {
        let value: Value = serde_json::from_str(json)?;
        Self::from_json(&value)
    }
}

fn node_from_json(value: &Value, path: &str) -> Result<Node, RenderError> {
    match value {
        Value::Null | Value::Bool(false) => Ok(Node::Empty),
        Value::Bool(true) => Err(RenderError::Json(format!(
            "{path}: `true` is not a node"
        ))),
        Value::String(s) => Ok(Node::Text(s.clone())),
        Value::Number(n) => Ok(Node::Text(n.to_string())),
        Value::Array(items) => items
            .iter()
            .enumerate()
            .map(|(i, item)| node_from_json(item, &format!("{path}[{i}]")))
            .collect::<Result<Vec<_>, _>>()
            .map(Node::Fragment),
        Value::Object(map) => object_from_json(map, path),
    }
}

fn object_from_json(map: &Map<String, Value>, path: &str) -> Result<Node, RenderError> {
    if let Some(key) = map
        .keys()
        .find(|k| !matches!(k.as_str(), "type" | "component" | "props" | "children"))
    {
        return Err(RenderError::Json(format!("{path}: unexpected key '{key}'")));
    }

    let props = match map.get("props") {
        None | Some(Value::Null) => Props::new(),
        Some(Value::Object(props)) => props
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect(),
        Some(_) => {
            return Err(RenderError::Json(format!("{path}.props must be an object")));
        }
    };

    let children = match map.get("children") {
        None => Vec::new(),
        Some(Value::Array(items)) => items
            .iter()
            .enumerate()
            .map(|(i, item)| node_from_json(item, &format!("{path}.children[{i}]")))
            .collect::<Result<Vec<_>, _>>()?,
        Some(single) => vec![node_from_json(single, &format!("{path}.children"))?],
    };

    match (map.get("type"), map.get("component")) {
        (Some(Value::String(tag)), None) => Ok(Node::Element {
            tag: tag.parse::<Tag>()?,
            props,
            children,
        }),
        (None, Some(Value::String(name))) => Ok(Node::Named {
            name: name.clone(),
            props,
            children,
        }),
        (Some(_), Some(_)) => Err(RenderError::Json(format!(
            "{path}: 'type' and 'component' are mutually exclusive"
        ))),
        _ => Err(RenderError::Json(format!(
            "{path}: expected a string 'type' or 'component'"
        ))),
    }
}
