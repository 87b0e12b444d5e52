use arkres_api as api;
use arkres_core::features::{is_element_file, is_source_file};
use arkres_core::util::LineIndex;
use std::path::{Path, PathBuf};
use tower_lsp::lsp_types::{
    Diagnostic, DiagnosticSeverity, NumberOrString, Position, Range, TextDocumentContentChangeEvent,
    Url,
};

pub fn uri_to_path(uri: &Url) -> Option<PathBuf> {
    uri.to_file_path().ok()
}

pub fn path_to_uri(path: &Path) -> Option<Url> {
    Url::from_file_path(path).ok()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentKind {
    Source,
    Element,
    Other,
}

impl DocumentKind {
    pub fn of(uri: &Url) -> Self {
        match uri_to_path(uri) {
            Some(path) if is_source_file(&path) => DocumentKind::Source,
            Some(path) if is_element_file(&path) => DocumentKind::Element,
            _ => DocumentKind::Other,
        }
    }
}

/// Lightweight container for document state
pub struct Document {
    pub content: String,
    pub kind: DocumentKind,
    pub version: i32,
}

impl Document {
    pub fn new(content: String, kind: DocumentKind, version: i32) -> Self {
        Self {
            content,
            kind,
            version,
        }
    }
}

/// Applies incremental or full-text changes in order.
pub fn apply_changes(content: &mut String, changes: &[TextDocumentContentChangeEvent]) {
    for change in changes {
        match change.range {
            Some(range) => {
                let (start, end) = {
                    let index = LineIndex::new(content.as_str());
                    (
                        index.offset(from_lsp_position(range.start)),
                        index.offset(from_lsp_position(range.end)),
                    )
                };
                content.replace_range(start..end.max(start), &change.text);
            }
            None => *content = change.text.clone(),
        }
    }
}

pub fn from_lsp_position(position: Position) -> api::Position {
    api::Position::new(position.line as usize, position.character as usize)
}

pub fn to_lsp_range(range: api::Range) -> Range {
    Range {
        start: Position::new(range.start_line as u32, range.start_col as u32),
        end: Position::new(range.end_line as u32, range.end_col as u32),
    }
}

pub fn to_lsp_diagnostic(diagnostic: api::ResourceDiagnostic) -> Diagnostic {
    let severity = match diagnostic.severity {
        api::Severity::Error => DiagnosticSeverity::ERROR,
        api::Severity::Warning => DiagnosticSeverity::WARNING,
        api::Severity::Information => DiagnosticSeverity::INFORMATION,
        api::Severity::Hint => DiagnosticSeverity::HINT,
    };
    Diagnostic {
        range: to_lsp_range(diagnostic.range),
        severity: Some(severity),
        code: Some(NumberOrString::String(diagnostic.code.as_str().to_string())),
        source: Some(api::ResourceDiagnostic::SOURCE.to_string()),
        message: diagnostic.message,
        ..Default::default()
    }
}
