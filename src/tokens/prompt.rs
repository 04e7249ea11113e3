//! Grouped plain-text rendering of flat tokens for LLM prompt context.

use super::FlatToken;

/// Prompt sections in output order, with the token types each one collects.
const SECTIONS: &[(&str, &[&str])] = &[
    ("BRAND COLORS", &["color"]),
    (
        "TYPOGRAPHY",
        &[
            "typography",
            "fontFamily",
            "fontWeight",
            "fontSize",
            "lineHeight",
            "letterSpacing",
        ],
    ),
    (
        "SPACING",
        &[
            "dimension",
            "spacing",
            "sizing",
            "borderRadius",
            "borderWidth",
        ],
    ),
    ("SHADOWS", &["shadow", "boxShadow"]),
];

/// Heading for tokens whose type no section claims.
const OTHER_SECTION: &str = "OTHER TOKENS";

/// Renders tokens as headed `- path: value` lists, one block per non-empty
/// section, blocks separated by a blank line.
#[must_use]
pub fn format_for_prompt(tokens: &[FlatToken]) -> String {
    let mut buckets: Vec<Vec<&FlatToken>> = vec![Vec::new(); SECTIONS.len() + 1];
    for token in tokens {
        let index = SECTIONS
            .iter()
            .position(|(_, types)| types.contains(&token.token_type.as_str()))
            .unwrap_or(SECTIONS.len());
        buckets[index].push(token);
    }

    let headings = SECTIONS
        .iter()
        .map(|(heading, _)| *heading)
        .chain([OTHER_SECTION]);
    let blocks: Vec<String> = headings
        .zip(&buckets)
        .filter(|(_, bucket)| !bucket.is_empty())
        .map(|(heading, bucket)| {
            let mut block = format!("{heading}:");
            for token in bucket {
                block.push_str(&format!("\n- {}: {}", token.path, token.display_value));
            }
            block
        })
        .collect();

    blocks.join("\n\n").trim_end().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn token(path: &str, token_type: &str, display: &str) -> FlatToken {
        FlatToken {
            path: path.into(),
            token_type: token_type.into(),
            display_value: display.into(),
            raw_value: json!(display),
        }
    }

    #[test]
    fn single_color_token() {
        let out = format_for_prompt(&[token("color.brand.primary", "color", "#112233")]);
        assert_eq!(out, "BRAND COLORS:\n- color.brand.primary: #112233");
    }

    #[test]
    fn sections_follow_fixed_order_regardless_of_input_order() {
        let out = format_for_prompt(&[
            token("motion.fast", "duration", "100ms"),
            token("shadow.card", "boxShadow", "0 1px 2px #000"),
            token("space.sm", "spacing", "8px"),
            token("font.body", "fontFamily", "Inter"),
            token("color.ink", "color", "#000"),
        ]);
        assert_eq!(
            out,
            "BRAND COLORS:\n- color.ink: #000\n\n\
             TYPOGRAPHY:\n- font.body: Inter\n\n\
             SPACING:\n- space.sm: 8px\n\n\
             SHADOWS:\n- shadow.card: 0 1px 2px #000\n\n\
             OTHER TOKENS:\n- motion.fast: 100ms"
        );
    }

    #[test]
    fn empty_sections_are_omitted() {
        let out = format_for_prompt(&[
            token("radius.md", "borderRadius", "6px"),
            token("weight.bold", "fontWeight", "700"),
            token("radius.lg", "borderRadius", "12px"),
        ]);
        assert_eq!(
            out,
            "TYPOGRAPHY:\n- weight.bold: 700\n\nSPACING:\n- radius.md: 6px\n- radius.lg: 12px"
        );
    }

    #[test]
    fn no_tokens_renders_empty_string() {
        assert_eq!(format_for_prompt(&[]), "");
    }
}
