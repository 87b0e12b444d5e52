//! Segment-wise completion of `scope.type.name`.

use super::index::ResourceIndex;
use super::resolver::ResourceResolver;
use arkres_api::{CandidateKind, CompletionCandidate, ResourceKind, ResourceScope};

impl ResourceResolver {
    pub async fn complete(&self, partial: &str) -> Vec<CompletionCandidate> {
        self.with_index(|index| complete_in(index, partial)).await
    }
}

pub fn complete_in(index: &ResourceIndex, partial: &str) -> Vec<CompletionCandidate> {
    let segments: Vec<&str> = partial.split('.').collect();
    let mut candidates = Vec::new();

    match segments.as_slice() {
        [scope_prefix] => {
            for scope in ResourceScope::ALL {
                if scope.as_str().starts_with(scope_prefix) {
                    candidates.push(scope_candidate(scope));
                }
            }
            if let Ok(scope) = scope_prefix.parse::<ResourceScope>() {
                candidates.extend(kinds(index, scope).into_iter().map(|k| kind_candidate(scope, k)));
            }
        }
        [scope, kind_prefix] => {
            let Ok(scope) = scope.parse::<ResourceScope>() else {
                return candidates;
            };
            let kinds = kinds(index, scope);
            candidates.extend(
                kinds
                    .iter()
                    .filter(|k| k.as_str().starts_with(kind_prefix))
                    .map(|k| kind_candidate(scope, *k)),
            );
            if let Ok(kind) = kind_prefix.parse::<ResourceKind>() {
                if kinds.contains(&kind) {
                    candidates.extend(name_candidates(index, scope, kind, ""));
                }
            }
        }
        [scope, kind, name_prefix] => {
            let (Ok(scope), Ok(kind)) = (scope.parse::<ResourceScope>(), kind.parse::<ResourceKind>()) else {
                return candidates;
            };
            candidates.extend(name_candidates(index, scope, kind, name_prefix));
        }
        _ => {}
    }
    candidates
}

/// Referable kinds with at least one entry under `scope`, by name.
fn kinds(index: &ResourceIndex, scope: ResourceScope) -> Vec<ResourceKind> {
    let mut kinds: Vec<ResourceKind> = index
        .kinds_in(scope)
        .into_iter()
        .filter(ResourceKind::is_referable)
        .collect();
    kinds.sort_by_key(|kind| kind.as_str());
    kinds
}

fn scope_candidate(scope: ResourceScope) -> CompletionCandidate {
    CompletionCandidate {
        label: scope.as_str().to_string(),
        kind: CandidateKind::Scope,
        scope: Some(scope),
        detail: Some(scope.description().to_string()),
        insert_text: scope.as_str().to_string(),
        filter_text: scope.as_str().to_string(),
    }
}

fn kind_candidate(scope: ResourceScope, kind: ResourceKind) -> CompletionCandidate {
    CompletionCandidate {
        label: kind.as_str().to_string(),
        kind: CandidateKind::Type,
        scope: Some(scope),
        detail: Some(format!("{} {} resources", scope, kind.as_str())),
        insert_text: kind.as_str().to_string(),
        filter_text: kind.as_str().to_string(),
    }
}

fn name_candidates(
    index: &ResourceIndex,
    scope: ResourceScope,
    kind: ResourceKind,
    prefix: &str,
) -> Vec<CompletionCandidate> {
    let mut items: Vec<_> = index
        .filter(Some(scope), Some(kind))
        .filter(|item| item.name.starts_with(prefix))
        .collect();
    items.sort_by(|a, b| a.name.cmp(&b.name));
    items
        .into_iter()
        .map(|item| CompletionCandidate {
            label: item.name.clone(),
            kind: CandidateKind::Name(kind),
            scope: Some(scope),
            detail: item.value().map(str::to_string),
            insert_text: item.name.clone(),
            filter_text: item.name.clone(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use arkres_api::{IndexItem, ResourceLocation};
    use std::path::PathBuf;

    fn index() -> ResourceIndex {
        let mut index = ResourceIndex::default();
        for (kind, name) in [
            (ResourceKind::Color, "primary_color"),
            (ResourceKind::Color, "bg_color"),
            (ResourceKind::String, "app_name"),
            (ResourceKind::StrArray, "items"),
        ] {
            index.insert(IndexItem {
                scope: ResourceScope::App,
                kind,
                name: name.to_string(),
                location: ResourceLocation::file(PathBuf::from("/r.json")),
            });
        }
        index
    }

    fn labels(candidates: &[CompletionCandidate]) -> Vec<&str> {
        candidates.iter().map(|c| c.label.as_str()).collect()
    }

    #[test]
    fn test_scope_segment() {
        let index = index();
        assert_eq!(labels(&complete_in(&index, "a")), vec!["app"]);
        assert_eq!(labels(&complete_in(&index, "")), vec!["app", "sys"]);
        // exact scope also offers its referable kinds
        assert_eq!(labels(&complete_in(&index, "app")), vec!["app", "color", "string"]);
        assert_eq!(labels(&complete_in(&index, "sys")), vec!["sys"]);
        assert!(complete_in(&index, "x").is_empty());
    }

    #[test]
    fn test_type_segment() {
        let index = index();
        assert_eq!(labels(&complete_in(&index, "app.c")), vec!["color"]);
        assert_eq!(
            labels(&complete_in(&index, "app.color")),
            vec!["color", "bg_color", "primary_color"]
        );
        assert!(complete_in(&index, "ap.c").is_empty());
        assert!(complete_in(&index, "app.strarray").is_empty());
    }

    #[test]
    fn test_name_segment() {
        let index = index();
        let hits = complete_in(&index, "app.color.p");
        assert_eq!(labels(&hits), vec!["primary_color"]);
        assert_eq!(hits[0].kind, CandidateKind::Name(ResourceKind::Color));
        assert!(complete_in(&index, "app.colr.p").is_empty());
        assert!(complete_in(&index, "app.color.p.x").is_empty());
    }
}
