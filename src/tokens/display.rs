//! Type-directed rendering of token values for display and prompts.

use serde_json::{Map, Value};

/// Renders a token value according to its category.
#[must_use]
pub fn display_value(token_type: &str, value: &Value) -> String {
    match token_type {
        "color" => match value {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        },
        "typography" | "fontFamily" => match value {
            Value::Object(fields) => typography(fields),
            other => stringify(other),
        },
        "shadow" | "boxShadow" => match value {
            Value::Array(items) => items.iter().map(shadow_item).collect::<Vec<_>>().join(", "),
            other => shadow_item(other),
        },
        // Dimensions, spacing and the font metrics all share the generic rendering.
        _ => stringify(value),
    }
}

/// Generic rendering: strings as-is, scalars as JSON text, `{value, unit}`
/// dimensions concatenated, scalar lists comma-joined, anything else as JSON.
pub(crate) fn stringify(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Object(fields) => dimension(fields).unwrap_or_else(|| value.to_string()),
        Value::Array(items) if items.iter().all(is_scalar) => {
            items.iter().map(stringify).collect::<Vec<_>>().join(", ")
        }
        other => other.to_string(),
    }
}

fn is_scalar(value: &Value) -> bool {
    !matches!(value, Value::Array(_) | Value::Object(_))
}

fn dimension(fields: &Map<String, Value>) -> Option<String> {
    if fields.len() != 2 {
        return None;
    }
    let amount = fields.get("value").filter(|v| v.is_number())?;
    let unit = fields.get("unit")?.as_str()?;
    Some(format!("{amount}{unit}"))
}

fn typography(fields: &Map<String, Value>) -> String {
    let mut parts: Vec<String> = ["fontFamily", "fontSize", "fontWeight"]
        .iter()
        .filter_map(|key| fields.get(*key))
        .map(stringify)
        .collect();
    if let Some(line_height) = fields.get("lineHeight") {
        parts.push(format!("/{}", stringify(line_height)));
    }
    parts.join(" ")
}

fn shadow_item(value: &Value) -> String {
    match value {
        Value::Object(fields) => ["offsetX", "offsetY", "blur", "spread", "color"]
            .iter()
            .filter_map(|key| fields.get(*key))
            .map(stringify)
            .collect::<Vec<_>>()
            .join(" "),
        other => stringify(other),
    }
}
