//! Depth-first flattening of a token tree into leaf tokens.

use super::display::display_value;
use super::{FlatToken, TokenGroup, TokenNode, TokenTree};

/// Type assigned to leaves that neither declare nor inherit a `$type`.
const UNKNOWN_TYPE: &str = "unknown";

/// Flattens `tree` into one [`FlatToken`] per leaf, in document order.
///
/// A group's `$type` is inherited by every descendant that does not declare
/// its own. Metadata members and non-object members are never visited.
#[must_use]
pub fn flatten(tree: &TokenTree) -> Vec<FlatToken> {
    let mut tokens = Vec::new();
    walk(tree.root(), "", None, &mut tokens);
    tokens
}

fn walk(group: &TokenGroup, parent_path: &str, inherited: Option<&str>, out: &mut Vec<FlatToken>) {
    let effective = group.declared_type().or(inherited);
    for (key, node) in group.children() {
        let path = if parent_path.is_empty() {
            key.to_string()
        } else {
            format!("{parent_path}.{key}")
        };
        match node {
            TokenNode::Leaf(leaf) => {
                let token_type = leaf.declared_type().or(effective).unwrap_or(UNKNOWN_TYPE);
                out.push(FlatToken {
                    display_value: display_value(token_type, leaf.value()),
                    token_type: token_type.to_string(),
                    raw_value: leaf.value().clone(),
                    path,
                });
            }
            TokenNode::Group(child) => walk(child, &path, effective, out),
            TokenNode::Raw(_) => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::{json, Value};

    use super::*;

    fn flat(value: Value) -> Vec<FlatToken> {
        flatten(&serde_json::from_value(value).unwrap())
    }

    #[test]
    fn single_nested_color() {
        let tokens = flat(json!({
            "color": {"brand": {"primary": {"$type": "color", "$value": "#112233"}}}
        }));
        assert_eq!(
            tokens,
            vec![FlatToken {
                path: "color.brand.primary".into(),
                token_type: "color".into(),
                display_value: "#112233".into(),
                raw_value: json!("#112233"),
            }]
        );
    }

    #[test]
    fn leaf_inherits_nearest_group_type() {
        let tokens = flat(json!({
            "palette": {
                "$type": "color",
                "primary": {"$value": "#fff"},
                "sizes": {"$type": "dimension", "gap": {"$value": "4px"}},
                "accent": {"$type": "gradient", "$value": "linear-gradient(#000, #fff)"}
            }
        }));
        let summary: Vec<(&str, &str)> = tokens
            .iter()
            .map(|t| (t.path.as_str(), t.token_type.as_str()))
            .collect();
        assert_eq!(
            summary,
            vec![
                ("palette.primary", "color"),
                ("palette.sizes.gap", "dimension"),
                ("palette.accent", "gradient"),
            ]
        );
    }

    #[test]
    fn untyped_leaves_are_unknown() {
        let tokens = flat(json!({"misc": {"radius": {"$value": 4}}}));
        assert_eq!(tokens.len(), 1);
        assert_eq!(tokens[0].token_type, "unknown");
        assert_eq!(tokens[0].display_value, "4");
    }

    #[test]
    fn root_type_applies_to_top_level_leaves() {
        let tokens = flat(json!({"$type": "color", "ink": {"$value": "#000"}}));
        assert_eq!(tokens[0].path, "ink");
        assert_eq!(tokens[0].token_type, "color");
    }

    #[test]
    fn skips_metadata_and_scalar_members() {
        let tokens = flat(json!({
            "$description": "ignored",
            "version": "1.0",
            "spacing": {
                "$extensions": {"tool": {"$value": "not a token"}},
                "sm": {"$type": "spacing", "$value": "8px"}
            }
        }));
        assert_eq!(tokens.len(), 1);
        assert_eq!(tokens[0].path, "spacing.sm");
    }

    #[test]
    fn leaf_value_objects_are_not_descended() {
        let tokens = flat(json!({
            "type": {"body": {
                "$type": "typography",
                "$value": {"fontFamily": "Inter", "fontSize": "14px"}
            }}
        }));
        assert_eq!(tokens.len(), 1);
        assert_eq!(tokens[0].display_value, "Inter 14px");
    }
}
