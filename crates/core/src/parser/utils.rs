use crate::error::{ArkresError, Result};
use crate::util::LineIndex;
use arkres_api::Range;
use tree_sitter::{Node, Parser, Tree};

/// Parses TypeScript-family source (`.ts`, `.ets`, JSON-like text).
pub fn parse_typescript(source: &str) -> Result<Tree> {
    let mut parser = Parser::new();
    parser
        .set_language(&tree_sitter_typescript::LANGUAGE_TYPESCRIPT.into())
        .map_err(|e| ArkresError::Parsing(e.to_string()))?;
    parser
        .parse(source, None)
        .ok_or_else(|| ArkresError::Parsing("Failed to parse source".to_string()))
}

/// Converts a node's byte span into an editor range.
pub fn node_range(node: Node<'_>, index: &LineIndex<'_>) -> Range {
    index.range(node.start_byte(), node.end_byte())
}

pub fn node_text<'a>(node: Node<'_>, source: &'a str) -> &'a str {
    source.get(node.byte_range()).unwrap_or_default()
}

/// Pre-order traversal of every node below (and including) `root`.
pub fn walk_tree<'t>(root: Node<'t>, mut visit: impl FnMut(Node<'t>)) {
    let mut cursor = root.walk();
    loop {
        visit(cursor.node());
        if cursor.goto_first_child() {
            continue;
        }
        loop {
            if cursor.goto_next_sibling() {
                break;
            }
            if !cursor.goto_parent() {
                return;
            }
        }
    }
}

/// Named children, skipping comments.
pub fn named_children<'t>(node: Node<'t>) -> Vec<Node<'t>> {
    let mut cursor = node.walk();
    node.named_children(&mut cursor)
        .filter(|child| child.kind() != "comment")
        .collect()
}

/// Decodes a quoted string or template literal (quotes included in `raw`).
pub fn decode_string_literal(raw: &str) -> String {
    let inner = match raw.len() {
        0 | 1 => "",
        len => raw.get(1..len - 1).unwrap_or_default(),
    };
    let mut out = String::with_capacity(inner.len());
    let mut chars = inner.chars().peekable();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('t') => out.push('\t'),
            Some('r') => out.push('\r'),
            Some('b') => out.push('\u{8}'),
            Some('f') => out.push('\u{c}'),
            Some('v') => out.push('\u{b}'),
            Some('0') => out.push('\0'),
            Some('u') => {
                let code: String = if chars.peek() == Some(&'{') {
                    chars.next();
                    chars.by_ref().take_while(|c| *c != '}').collect()
                } else {
                    chars.by_ref().take(4).collect()
                };
                match u32::from_str_radix(&code, 16).ok().and_then(char::from_u32) {
                    Some(ch) => out.push(ch),
                    None => {
                        out.push_str("\\u");
                        out.push_str(&code);
                    }
                }
            }
            // line continuation
            Some('\n') => {}
            Some(other) => out.push(other),
            None => out.push('\\'),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_string_literal() {
        assert_eq!(decode_string_literal("'app.color.x'"), "app.color.x");
        assert_eq!(decode_string_literal("\"a\\\"b\""), "a\"b");
        assert_eq!(decode_string_literal("`x\\ny`"), "x\ny");
        assert_eq!(decode_string_literal("'\\u0041\\u{1F600}'"), "A\u{1F600}");
        assert_eq!(decode_string_literal("''"), "");
    }

    #[test]
    fn test_walk_tree_visits_all() {
        let source = "f(1); g(2);";
        let tree = parse_typescript(source).unwrap();
        let mut calls = 0;
        walk_tree(tree.root_node(), |node| {
            if node.kind() == "call_expression" {
                calls += 1;
            }
        });
        assert_eq!(calls, 2);
    }
}
