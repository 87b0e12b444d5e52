//! Declaration extraction from `element/*.json` files.

use crate::error::{ArkresError, Result};
use crate::parser::{JsonNode, parse_json};
use crate::util::LineIndex;
use arkres_api::{Declaration, Range, ResourceKind};
use std::path::Path;

/// A top-level key that is not a resource kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidResourceType {
    pub key: String,
    pub range: Range,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ElementContent {
    pub declarations: Vec<Declaration>,
    pub invalid_types: Vec<InvalidResourceType>,
}

pub fn parse_element_file(uri: &Path, text: &str) -> Result<ElementContent> {
    let root = parse_json(text)?;
    let groups = root.as_object().ok_or_else(|| {
        ArkresError::Parsing("element file must contain a top-level object".to_string())
    })?;
    let index = LineIndex::new(text);
    let mut content = ElementContent::default();

    for group in groups {
        let Ok(kind) = group.key.parse::<ResourceKind>() else {
            content.invalid_types.push(InvalidResourceType {
                key: group.key.clone(),
                range: index.range(group.key_span.start, group.key_span.end),
            });
            continue;
        };
        let Some(entries) = group.value.as_array() else {
            tracing::debug!("'{}' in {} is not an array", group.key, uri.display());
            continue;
        };
        for entry in entries {
            let Some(name_node) = entry.get("name") else {
                continue;
            };
            let Some(name) = name_node.as_str() else {
                continue;
            };
            let value_text = entry
                .get("value")
                .map(|value| value_text(value, text))
                .unwrap_or_default();
            content.declarations.push(Declaration {
                kind,
                name: name.to_string(),
                value_text,
                name_range: index.range(name_node.span.start, name_node.span.end),
                uri: uri.to_path_buf(),
            });
        }
    }
    Ok(content)
}

fn value_text(value: &JsonNode, source: &str) -> String {
    match value.as_str() {
        Some(s) => s.to_string(),
        None => value.text(source).to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_declarations() {
        let text = r##"{
  "color": [
    { "name": "primary_color", "value": "#007DFF" },
    { "name": "alias", "value": "$color:primary_color" }
  ],
  "integer": [{ "name": "count", "value": 42 }],
  "strarray": [{ "name": "items", "value": [{ "value": "a" }] }]
}"##;
        let content = parse_element_file(Path::new("/r/color.json"), text).unwrap();
        assert!(content.invalid_types.is_empty());
        let names: Vec<_> = content.declarations.iter().map(|d| d.name.as_str()).collect();
        assert_eq!(names, vec!["primary_color", "alias", "count", "items"]);

        let primary = &content.declarations[0];
        assert_eq!(primary.kind, ResourceKind::Color);
        assert_eq!(primary.value_text, "#007DFF");
        assert_eq!(primary.name_range.start_line, 2);
        assert_eq!(primary.name_range.start_col, 14);
        assert_eq!(primary.name_range.end_col, 29);

        assert_eq!(content.declarations[2].value_text, "42");
        assert_eq!(content.declarations[3].value_text, r#"[{ "value": "a" }]"#);
    }

    #[test]
    fn test_invalid_types_and_nameless_entries() {
        let text = r#"{ "colour": [], "string": [{ "value": "x" }, { "name": 3, "value": "y" }] }"#;
        let content = parse_element_file(Path::new("/r/bad.json"), text).unwrap();
        assert!(content.declarations.is_empty());
        assert_eq!(content.invalid_types.len(), 1);
        assert_eq!(content.invalid_types[0].key, "colour");
        assert_eq!(content.invalid_types[0].range.start_col, 2);
        assert_eq!(content.invalid_types[0].range.end_col, 10);
    }

    #[test]
    fn test_malformed() {
        assert!(parse_element_file(Path::new("/r/x.json"), "{ \"color\": [ ").is_err());
        assert!(parse_element_file(Path::new("/r/x.json"), "[]").is_err());
    }
}
