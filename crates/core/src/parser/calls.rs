//! Scoped call-site finder for global functions such as `$r`.
//!
//! Two passes over the tree: the first records whether the name is ever
//! rebound in the file (import, variable, function or class); the second
//! collects calls whose callee is the bare identifier, and keeps them only when
//! the name was never rebound. The shadow check is file-wide, not lexical.

use super::utils::{decode_string_literal, named_children, node_range, node_text, parse_typescript, walk_tree};
use crate::error::Result;
use crate::util::LineIndex;
use arkres_api::CallSite;
use std::path::{Path, PathBuf};
use tree_sitter::Node;

/// Where a symbol's declaration lives, as reported by a [`SymbolResolver`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeclarationOrigin {
    pub file: PathBuf,
}

/// Symbol lookup provided by a type-checking collaborator.
pub trait SymbolResolver: Send + Sync {
    /// Declarations of the identifier `name` referenced at byte `offset` in `file`.
    fn declarations(
        &self,
        file: &Path,
        name: &str,
        offset: usize,
    ) -> std::result::Result<Vec<DeclarationOrigin>, Box<dyn std::error::Error + Send + Sync>>;
}

/// Outcome of [`find_global_calls`], telling the caller how much analysis backs it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CallAnalysis {
    /// Candidates were confirmed against symbol resolution.
    Resolved(Vec<CallSite>),
    /// No resolver was available; only the syntactic shadow check was applied.
    SyntacticOnly(Vec<CallSite>),
}

impl CallAnalysis {
    pub fn calls(&self) -> &[CallSite] {
        match self {
            CallAnalysis::Resolved(calls) | CallAnalysis::SyntacticOnly(calls) => calls,
        }
    }

    pub fn into_calls(self) -> Vec<CallSite> {
        match self {
            CallAnalysis::Resolved(calls) | CallAnalysis::SyntacticOnly(calls) => calls,
        }
    }
}

/// Every call to the global function `identifier` in `source`.
pub fn find_calls(source: &str, identifier: &str) -> Result<Vec<CallSite>> {
    let tree = parse_typescript(source)?;
    let root = tree.root_node();
    if is_shadowed(root, source, identifier) {
        return Ok(Vec::new());
    }
    let index = LineIndex::new(source);
    Ok(collect_calls(root, source, identifier)
        .into_iter()
        .map(|call| call_site(call, source, &index))
        .collect())
}

/// Like [`find_calls`], additionally rejecting candidates whose callee resolves
/// to a declaration inside `file` when a resolver is supplied.
pub fn find_global_calls(
    source: &str,
    identifier: &str,
    file: &Path,
    resolver: Option<&dyn SymbolResolver>,
) -> Result<CallAnalysis> {
    let tree = parse_typescript(source)?;
    let root = tree.root_node();
    let index = LineIndex::new(source);
    let candidates = if is_shadowed(root, source, identifier) {
        Vec::new()
    } else {
        collect_calls(root, source, identifier)
    };

    let Some(resolver) = resolver else {
        return Ok(CallAnalysis::SyntacticOnly(
            candidates
                .into_iter()
                .map(|call| call_site(call, source, &index))
                .collect(),
        ));
    };

    let accepted = candidates
        .into_iter()
        .filter(|call| {
            let offset = call
                .child_by_field_name("function")
                .map(|callee| callee.start_byte())
                .unwrap_or_else(|| call.start_byte());
            match resolver.declarations(file, identifier, offset) {
                Ok(origins) => origins.iter().all(|origin| origin.file.as_path() != file),
                Err(e) => {
                    tracing::debug!(
                        "Symbol resolution for {} failed in {}, assuming global: {}",
                        identifier,
                        file.display(),
                        e
                    );
                    true
                }
            }
        })
        .map(|call| call_site(call, source, &index))
        .collect();
    Ok(CallAnalysis::Resolved(accepted))
}

fn is_shadowed(root: Node<'_>, source: &str, identifier: &str) -> bool {
    let mut shadowed = false;
    walk_tree(root, |node| {
        if !shadowed {
            shadowed = binding_name(node, source) == Some(identifier);
        }
    });
    shadowed
}

/// The name a declaration-like node binds in its scope, if any.
fn binding_name<'a>(node: Node<'_>, source: &'a str) -> Option<&'a str> {
    let name = match node.kind() {
        // import { a as b } binds `b`
        "import_specifier" => node
            .child_by_field_name("alias")
            .or_else(|| node.child_by_field_name("name"))?,
        // import a from '...'
        "import_clause" => named_children(node)
            .into_iter()
            .find(|c| c.kind() == "identifier")?,
        "variable_declarator"
        | "function_declaration"
        | "generator_function_declaration"
        | "function_signature"
        | "class_declaration"
        | "abstract_class_declaration" => node.child_by_field_name("name")?,
        _ => return None,
    };
    matches!(name.kind(), "identifier" | "type_identifier").then(|| node_text(name, source))
}

fn collect_calls<'t>(root: Node<'t>, source: &str, identifier: &str) -> Vec<Node<'t>> {
    let mut calls = Vec::new();
    walk_tree(root, |node| {
        if node.kind() != "call_expression" {
            return;
        }
        let is_target = node
            .child_by_field_name("function")
            .is_some_and(|callee| callee.kind() == "identifier" && node_text(callee, source) == identifier);
        if is_target {
            calls.push(node);
        }
    });
    calls
}

fn call_site(call: Node<'_>, source: &str, index: &LineIndex<'_>) -> CallSite {
    let arguments = call.child_by_field_name("arguments");
    let first = arguments.and_then(|args| named_children(args).into_iter().next());

    let (argument_text, literal) = match first {
        Some(arg) if arg.kind() == "string" => (decode_string_literal(node_text(arg, source)), true),
        Some(arg) if arg.kind() == "template_string" => {
            let interpolated = named_children(arg)
                .iter()
                .any(|c| c.kind() == "template_substitution");
            if interpolated {
                (String::new(), false)
            } else {
                (decode_string_literal(node_text(arg, source)), true)
            }
        }
        _ => (String::new(), false),
    };

    let argument_range = first
        .or(arguments)
        .map(|n| node_range(n, index))
        .unwrap_or_else(|| node_range(call, index));

    CallSite {
        argument_text,
        whole_range: node_range(call, index),
        argument_range,
        literal,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_binding_names() {
        let source = "import { a as b } from 'm'; import c from 'n'; let d = 1; function e() {} class F {}";
        let tree = parse_typescript(source).unwrap();
        let mut names = Vec::new();
        walk_tree(tree.root_node(), |node| {
            if let Some(name) = binding_name(node, source) {
                names.push(name.to_string());
            }
        });
        assert_eq!(names, vec!["b", "c", "d", "e", "F"]);
    }

    #[test]
    fn test_member_calls_ignored() {
        let source = "obj.$r('app.color.a'); $r.call(null, 'x');";
        assert!(find_calls(source, "$r").unwrap().is_empty());
    }

    #[test]
    fn test_ranges() {
        let source = "const x = $r('app.color.a');";
        let calls = find_calls(source, "$r").unwrap();
        assert_eq!(calls.len(), 1);
        let call = &calls[0];
        assert_eq!(call.whole_range.start_col, 10);
        assert_eq!(call.whole_range.end_col, 27);
        assert_eq!(call.argument_range.start_col, 13);
        assert_eq!(call.argument_range.end_col, 26);
    }
}
