use super::{CallTarget, calls_of, is_element_file, is_source_file};
use crate::config::Settings;
use crate::project::parse_element_file;
use crate::resource::ResourceResolver;
use arkres_api::{DiagnosticCode, ResourceDiagnostic, ResourceScope, Severity};
use std::path::Path;

/// Diagnostics for any supported file; other files get none.
pub async fn diagnose(
    resolver: &ResourceResolver,
    settings: &Settings,
    path: &Path,
    text: &str,
) -> Vec<ResourceDiagnostic> {
    if is_source_file(path) {
        source_diagnostics(resolver, settings, text).await
    } else if is_element_file(path) {
        element_diagnostics(path, text)
    } else {
        Vec::new()
    }
}

pub async fn source_diagnostics(
    resolver: &ResourceResolver,
    settings: &Settings,
    source: &str,
) -> Vec<ResourceDiagnostic> {
    let mut diagnostics = Vec::new();
    for call in calls_of(source, settings, CallTarget::Resource) {
        let reference = call.argument_text.as_str();
        if reference.is_empty() {
            diagnostics.push(ResourceDiagnostic {
                range: call.argument_range,
                message: "Resource reference is not provided".to_string(),
                severity: Severity::Warning,
                code: DiagnosticCode::ResourceNotProvided,
            });
            continue;
        }

        let scope_segment = reference.split('.').next().unwrap_or_default();
        let Ok(scope) = scope_segment.parse::<ResourceScope>() else {
            diagnostics.push(ResourceDiagnostic {
                range: call.argument_range,
                message: format!(
                    "Invalid resource scope '{}', expected 'app' or 'sys'",
                    scope_segment
                ),
                severity: Severity::Error,
                code: DiagnosticCode::InvalidResourceScope,
            });
            continue;
        };

        if resolver.resolve(reference).await.is_none() {
            let (code, label) = match scope {
                ResourceScope::App => (DiagnosticCode::AppResourceNotFound, "Application"),
                ResourceScope::Sys => (DiagnosticCode::SysResourceNotFound, "System"),
            };
            diagnostics.push(ResourceDiagnostic {
                range: call.argument_range,
                message: format!("{} resource '{}' not found", label, reference),
                severity: Severity::Error,
                code,
            });
        }
    }
    diagnostics
}

/// Unknown top-level resource types in an element file. Unparsable files
/// report nothing; the index already skips them.
pub fn element_diagnostics(path: &Path, text: &str) -> Vec<ResourceDiagnostic> {
    let content = match parse_element_file(path, text) {
        Ok(content) => content,
        Err(e) => {
            tracing::debug!("No element diagnostics for {}: {}", path.display(), e);
            return Vec::new();
        }
    };
    content
        .invalid_types
        .into_iter()
        .map(|invalid| ResourceDiagnostic {
            range: invalid.range,
            message: format!("Unknown resource type '{}'", invalid.key),
            severity: Severity::Error,
            code: DiagnosticCode::InvalidResourceType,
        })
        .collect()
}
