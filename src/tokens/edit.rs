//! Point edits of token values by dotted path.

use serde_json::{Map, Value};

use super::{TokenGroup, TokenLeaf, TokenNode, TokenTree, VALUE_KEY};

/// Returns a copy of `tree` with the `$value` at `path` replaced by `new_value`.
///
/// Each dot-separated segment selects a member of the current object. When a
/// segment is missing or lands on something other than an object, the walk
/// stops and the copy is returned unchanged; `tree` itself is never touched.
/// Callers that need to know whether the write landed must re-read the copy.
///
/// Addressing a group turns it into a leaf carrying the new `$value`.
#[must_use]
pub fn set_value_at_path(tree: &TokenTree, path: &str, new_value: Value) -> TokenTree {
    let mut copy = tree.clone();
    let segments: Vec<&str> = path.split('.').collect();
    if let Some((last, parents)) = segments.split_last() {
        let mut cursor = Cursor::Group(&mut copy.root);
        for segment in parents {
            match cursor.descend(segment) {
                Some(next) => cursor = next,
                None => return copy,
            }
        }
        cursor.assign(last, new_value);
    }
    copy
}

/// Position of the walk: inside a parsed group, or inside a raw JSON object
/// (leaf fields or metadata).
enum Cursor<'a> {
    Group(&'a mut TokenGroup),
    Object(&'a mut Map<String, Value>),
}

impl<'a> Cursor<'a> {
    fn descend(self, key: &str) -> Option<Cursor<'a>> {
        match self {
            Cursor::Group(group) => match group.member_mut(key)? {
                TokenNode::Group(child) => Some(Cursor::Group(child)),
                TokenNode::Leaf(leaf) => Some(Cursor::Object(&mut leaf.fields)),
                TokenNode::Raw(Value::Object(map)) => Some(Cursor::Object(map)),
                TokenNode::Raw(_) => None,
            },
            Cursor::Object(map) => match map.get_mut(key)? {
                Value::Object(child) => Some(Cursor::Object(child)),
                _ => None,
            },
        }
    }

    fn assign(self, key: &str, new_value: Value) {
        match self {
            Cursor::Group(group) => {
                let Some(node) = group.member_mut(key) else {
                    return;
                };
                match node {
                    TokenNode::Leaf(leaf) => {
                        leaf.fields.insert(VALUE_KEY.to_string(), new_value);
                    }
                    TokenNode::Group(child) => {
                        let mut fields = std::mem::take(child).into_map();
                        fields.insert(VALUE_KEY.to_string(), new_value);
                        *node = TokenNode::Leaf(TokenLeaf { fields });
                    }
                    TokenNode::Raw(Value::Object(map)) => {
                        map.insert(VALUE_KEY.to_string(), new_value);
                    }
                    TokenNode::Raw(_) => {}
                }
            }
            Cursor::Object(map) => {
                if let Some(Value::Object(target)) = map.get_mut(key) {
                    target.insert(VALUE_KEY.to_string(), new_value);
                }
            }
        }
    }
}
