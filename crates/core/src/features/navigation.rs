use super::{CallTarget, calls_of};
use crate::config::Settings;
use crate::resource::ResourceResolver;
use arkres_api::{DocumentLink, LocationLink, Position, ResourceReference};

/// Targets of the resource or raw-file reference under the cursor.
pub async fn definition(
    resolver: &ResourceResolver,
    settings: &Settings,
    source: &str,
    position: Position,
) -> Vec<LocationLink> {
    let under_cursor = |target| {
        calls_of(source, settings, target)
            .into_iter()
            .find(|call| call.argument_range.contains(position.line, position.col))
    };

    if let Some(call) = under_cursor(CallTarget::Resource) {
        let Some(reference) = ResourceReference::parse(&call.argument_text) else {
            return Vec::new();
        };
        return resolver
            .locations(&reference)
            .await
            .into_iter()
            .map(|location| LocationLink {
                target_uri: location.uri,
                target_range: location.range,
                origin_selection_range: call.argument_range,
            })
            .collect();
    }

    if let Some(call) = under_cursor(CallTarget::RawFile) {
        if let Some(location) = resolver.resolve_rawfile(&call.argument_text).await {
            return vec![LocationLink {
                target_uri: location.uri,
                target_range: None,
                origin_selection_range: call.argument_range,
            }];
        }
    }
    Vec::new()
}

/// One link per resolvable resource or raw-file reference in the document.
pub async fn document_links(
    resolver: &ResourceResolver,
    settings: &Settings,
    source: &str,
) -> Vec<DocumentLink> {
    let mut links = Vec::new();
    for call in calls_of(source, settings, CallTarget::Resource) {
        if let Some(location) = resolver.resolve(&call.argument_text).await {
            links.push(DocumentLink {
                range: call.argument_range,
                target: location.uri,
                tooltip: Some(call.argument_text.clone()),
            });
        }
    }
    for call in calls_of(source, settings, CallTarget::RawFile) {
        if let Some(location) = resolver.resolve_rawfile(&call.argument_text).await {
            links.push(DocumentLink {
                range: call.argument_range,
                target: location.uri,
                tooltip: Some(format!("rawfile/{}", call.argument_text)),
            });
        }
    }
    links
}
