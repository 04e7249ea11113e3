//! Design-token trees in the DTCG layout and their flat projection.
//!
//! A token tree is a nested JSON object. Objects carrying a `$value` key are
//! leaves, other objects are groups, and `$`-prefixed keys hold metadata such
//! as `$type` (which groups pass down to their descendants). The tree is kept
//! as a [`TokenNode`] tagged union so walkers match on the node kind instead of
//! checking for `$value` at every step, while still serializing back to the
//! exact JSON it was read from.

pub mod display;
pub mod edit;
pub mod flatten;
pub mod prompt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::Result;

pub use display::display_value;
pub use edit::set_value_at_path;
pub use flatten::flatten;
pub use prompt::format_for_prompt;

/// Key marking a leaf token.
pub const VALUE_KEY: &str = "$value";
/// Key carrying a token or group category.
pub const TYPE_KEY: &str = "$type";

/// One node of a token tree.
#[derive(Debug, Clone, PartialEq)]
pub enum TokenNode {
    /// An object without `$value`; its non-`$` members are children.
    Group(TokenGroup),
    /// An object with `$value`, kept verbatim.
    Leaf(TokenLeaf),
    /// Metadata (`$`-prefixed member) or a non-object member.
    Raw(Value),
}

/// Ordered members of a group object.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TokenGroup {
    entries: Vec<(String, TokenNode)>,
}

/// A leaf token object, including its `$value`.
#[derive(Debug, Clone, PartialEq)]
pub struct TokenLeaf {
    fields: Map<String, Value>,
}

/// A parsed token tree. The root is always a group.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "Map<String, Value>", into = "Map<String, Value>")]
pub struct TokenTree {
    root: TokenGroup,
}

/// A leaf token projected out of the tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FlatToken {
    /// Dot-delimited path from the root.
    pub path: String,
    /// Category name, or `"unknown"` when neither leaf nor ancestors declare one.
    #[serde(rename = "type")]
    pub token_type: String,
    /// Human-readable rendering of the value.
    pub display_value: String,
    /// The original `$value`.
    pub raw_value: Value,
}

impl TokenNode {
    fn from_member(key: &str, value: Value) -> Self {
        if key.starts_with('$') {
            return Self::Raw(value);
        }
        match value {
            Value::Object(map) if map.contains_key(VALUE_KEY) => {
                Self::Leaf(TokenLeaf { fields: map })
            }
            Value::Object(map) => Self::Group(TokenGroup::from_map(map)),
            other => Self::Raw(other),
        }
    }

    fn into_value(self) -> Value {
        match self {
            Self::Group(group) => Value::Object(group.into_map()),
            Self::Leaf(leaf) => Value::Object(leaf.fields),
            Self::Raw(value) => value,
        }
    }
}

impl TokenGroup {
    fn from_map(map: Map<String, Value>) -> Self {
        let mut entries = Vec::with_capacity(map.len());
        for (key, value) in map {
            let node = TokenNode::from_member(&key, value);
            entries.push((key, node));
        }
        Self { entries }
    }

    fn into_map(self) -> Map<String, Value> {
        self.entries
            .into_iter()
            .map(|(key, node)| (key, node.into_value()))
            .collect()
    }

    /// The group's own `$type`, if it declares one.
    #[must_use]
    pub fn declared_type(&self) -> Option<&str> {
        self.entries.iter().find_map(|(key, node)| match node {
            TokenNode::Raw(Value::String(ty)) if key == TYPE_KEY => Some(ty.as_str()),
            _ => None,
        })
    }

    /// Non-metadata members in document order.
    pub fn children(&self) -> impl Iterator<Item = (&str, &TokenNode)> {
        self.entries
            .iter()
            .filter(|(key, _)| !key.starts_with('$'))
            .map(|(key, node)| (key.as_str(), node))
    }

    fn member_mut(&mut self, key: &str) -> Option<&mut TokenNode> {
        self.entries
            .iter_mut()
            .find(|(k, _)| k == key)
            .map(|(_, node)| node)
    }
}

impl TokenLeaf {
    /// The token's `$value`.
    #[must_use]
    pub fn value(&self) -> &Value {
        self.fields.get(VALUE_KEY).unwrap_or(&Value::Null)
    }

    /// The leaf's own `$type`, if present.
    #[must_use]
    pub fn declared_type(&self) -> Option<&str> {
        self.fields.get(TYPE_KEY).and_then(Value::as_str)
    }
}

impl TokenTree {
    /// Parses a token tree from JSON text.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::Json`] when the text is not a JSON object.
    pub fn from_json_str(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }

    /// Serializes the tree back to pretty-printed JSON.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::Json`] if serialization fails.
    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// The root group.
    #[must_use]
    pub fn root(&self) -> &TokenGroup {
        &self.root
    }

    /// Converts the tree back into a JSON value.
    #[must_use]
    pub fn to_value(&self) -> Value {
        Value::Object(self.root.clone().into_map())
    }
}

impl From<Map<String, Value>> for TokenTree {
    fn from(map: Map<String, Value>) -> Self {
        Self {
            root: TokenGroup::from_map(map),
        }
    }
}

impl From<TokenTree> for Map<String, Value> {
    fn from(tree: TokenTree) -> Self {
        tree.root.into_map()
    }
}
