//! JSON-like declaration parser.
//!
//! Build profiles are JSON5 and element files are plain JSON; both are valid
//! JavaScript object literals, so the text is parsed with the TypeScript
//! grammar and lowered into a small typed tree that keeps byte spans.

use super::utils::{decode_string_literal, named_children, node_text, parse_typescript};
use crate::error::{ArkresError, Result};
use tree_sitter::Node;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub enum JsonKind {
    Object(Vec<JsonProperty>),
    Array(Vec<JsonNode>),
    String(String),
    Number(f64),
    Bool(bool),
    Null,
    /// Any expression outside the JSON subset (identifiers, calls, interpolated templates).
    Other,
}

#[derive(Debug, Clone, PartialEq)]
pub struct JsonNode {
    pub kind: JsonKind,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct JsonProperty {
    pub key: String,
    pub key_span: Span,
    pub value: JsonNode,
}

impl JsonNode {
    pub fn is_object(&self) -> bool {
        matches!(self.kind, JsonKind::Object(_))
    }

    pub fn as_object(&self) -> Option<&[JsonProperty]> {
        match &self.kind {
            JsonKind::Object(props) => Some(props),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&[JsonNode]> {
        match &self.kind {
            JsonKind::Array(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match &self.kind {
            JsonKind::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self.kind {
            JsonKind::Number(n) => Some(n),
            _ => None,
        }
    }

    /// Property lookup; a repeated key resolves to its last occurrence, as in JavaScript.
    pub fn get(&self, key: &str) -> Option<&JsonNode> {
        self.as_object()?
            .iter()
            .rev()
            .find(|p| p.key == key)
            .map(|p| &p.value)
    }

    /// The node's source text, given the text it was parsed from.
    pub fn text<'a>(&self, source: &'a str) -> &'a str {
        source.get(self.span.start..self.span.end).unwrap_or_default()
    }
}

pub fn parse_json(text: &str) -> Result<JsonNode> {
    parse_json_at(text, 0)
}

/// Parses `text` and reports spans shifted by `base`, for text sliced out of a
/// larger file.
pub fn parse_json_at(text: &str, base: usize) -> Result<JsonNode> {
    // Parenthesized so a leading `{` is an object literal, not a block. The
    // closing paren goes on its own line in case the text ends in a line comment.
    let wrapped = format!("({}\n)", text);
    let tree = parse_typescript(&wrapped)?;
    let root = tree.root_node();
    if root.has_error() {
        return Err(ArkresError::Parsing("Malformed JSON-like document".to_string()));
    }

    let statements = named_children(root);
    let [statement] = statements.as_slice() else {
        return Err(ArkresError::Parsing(
            "Expected a single JSON-like value".to_string(),
        ));
    };
    let inner = named_children(*statement)
        .into_iter()
        .find(|n| n.kind() == "parenthesized_expression")
        .and_then(|paren| named_children(paren).into_iter().next())
        .ok_or_else(|| ArkresError::Parsing("Expected a JSON-like value".to_string()))?;

    let lowering = Lowering {
        source: &wrapped,
        base,
    };
    Ok(lowering.node(inner))
}

struct Lowering<'a> {
    source: &'a str,
    base: usize,
}

impl Lowering<'_> {
    fn span(&self, node: Node<'_>) -> Span {
        // one byte for the opening paren
        Span {
            start: node.start_byte() - 1 + self.base,
            end: node.end_byte() - 1 + self.base,
        }
    }

    fn node(&self, node: Node<'_>) -> JsonNode {
        let kind = match node.kind() {
            "object" => JsonKind::Object(
                named_children(node)
                    .into_iter()
                    .filter_map(|child| self.property(child))
                    .collect(),
            ),
            "array" => JsonKind::Array(
                named_children(node)
                    .into_iter()
                    .map(|child| self.node(child))
                    .collect(),
            ),
            "string" => JsonKind::String(decode_string_literal(node_text(node, self.source))),
            "template_string" => {
                let interpolated = named_children(node)
                    .iter()
                    .any(|c| c.kind() == "template_substitution");
                if interpolated {
                    JsonKind::Other
                } else {
                    JsonKind::String(decode_string_literal(node_text(node, self.source)))
                }
            }
            "number" | "unary_expression" => parse_number(node_text(node, self.source))
                .map(JsonKind::Number)
                .unwrap_or(JsonKind::Other),
            "true" => JsonKind::Bool(true),
            "false" => JsonKind::Bool(false),
            "null" | "undefined" => JsonKind::Null,
            "parenthesized_expression" => {
                if let Some(inner) = named_children(node).into_iter().next() {
                    return self.node(inner);
                }
                JsonKind::Other
            }
            _ => JsonKind::Other,
        };
        JsonNode {
            kind,
            span: self.span(node),
        }
    }

    fn property(&self, node: Node<'_>) -> Option<JsonProperty> {
        if node.kind() != "pair" {
            return None;
        }
        let key_node = node.child_by_field_name("key")?;
        let value_node = node.child_by_field_name("value")?;
        let key = match key_node.kind() {
            "string" => decode_string_literal(node_text(key_node, self.source)),
            "property_identifier" | "number" => node_text(key_node, self.source).to_string(),
            _ => return None,
        };
        Some(JsonProperty {
            key,
            key_span: self.span(key_node),
            value: self.node(value_node),
        })
    }
}

fn parse_number(text: &str) -> Option<f64> {
    let compact: String = text.chars().filter(|c| !c.is_whitespace()).collect();
    let (negative, digits) = match compact.as_bytes().first() {
        Some(b'-') => (true, &compact[1..]),
        Some(b'+') => (false, &compact[1..]),
        _ => (false, compact.as_str()),
    };
    let magnitude = if let Some(hex) = digits
        .strip_prefix("0x")
        .or_else(|| digits.strip_prefix("0X"))
    {
        i64::from_str_radix(hex, 16).ok()? as f64
    } else {
        digits.replace('_', "").parse::<f64>().ok()?
    };
    Some(if negative { -magnitude } else { magnitude })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_plain_json() {
        let text = r##"{ "color": [ { "name": "primary", "value": "#FF0000" } ] }"##;
        let root = parse_json(text).unwrap();
        let colors = root.get("color").and_then(JsonNode::as_array).unwrap();
        assert_eq!(colors.len(), 1);
        let name = colors[0].get("name").unwrap();
        assert_eq!(name.as_str(), Some("primary"));
        assert_eq!(name.text(text), "\"primary\"");
        assert_eq!(colors[0].get("value").unwrap().as_str(), Some("#FF0000"));
    }

    #[test]
    fn test_parse_json5_features() {
        let text = r#"
            // build profile
            {
              apiType: 'stageMode',
              targets: [
                { name: "default", runtimeOS: 'HarmonyOS', },
              ],
              /* numbers */
              retries: -3,
              mask: 0xFF,
              ok: true,
              nothing: null,
            }
            // trailing comment"#;
        let root = parse_json(text).unwrap();
        assert_eq!(root.get("apiType").and_then(JsonNode::as_str), Some("stageMode"));
        let targets = root.get("targets").and_then(JsonNode::as_array).unwrap();
        assert_eq!(targets[0].get("name").and_then(JsonNode::as_str), Some("default"));
        assert_eq!(root.get("retries").and_then(JsonNode::as_f64), Some(-3.0));
        assert_eq!(root.get("mask").and_then(JsonNode::as_f64), Some(255.0));
        assert_eq!(root.get("ok").map(|n| n.kind.clone()), Some(JsonKind::Bool(true)));
        assert_eq!(root.get("nothing").map(|n| n.kind.clone()), Some(JsonKind::Null));
    }

    #[test]
    fn test_key_spans_point_into_source() {
        let text = "{\n  \"a\": 1,\n  b: [2]\n}";
        let root = parse_json(text).unwrap();
        let props = root.as_object().unwrap();
        assert_eq!(&text[props[0].key_span.start..props[0].key_span.end], "\"a\"");
        assert_eq!(&text[props[1].key_span.start..props[1].key_span.end], "b");
        assert_eq!(root.span, Span { start: 0, end: text.len() });
    }

    #[test]
    fn test_base_offset() {
        let file = "module.exports.sys = { color: { x: 1 } }";
        let start = file.find('{').unwrap();
        let root = parse_json_at(&file[start..], start).unwrap();
        let color = root.as_object().unwrap();
        let x = color[0].value.as_object().unwrap();
        assert_eq!(&file[x[0].key_span.start..x[0].key_span.end], "x");
    }

    #[test]
    fn test_malformed_is_error() {
        assert!(parse_json("{ \"a\": }").is_err());
        assert!(parse_json("{ \"a\": 1 } junk junk").is_err());
        assert!(parse_json("").is_err());
    }
}
