use super::position::Range;
use super::resource::{ResourceKind, ResourceScope};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum CandidateKind {
    Scope,
    Type,
    Name(ResourceKind),
}

/// One completion proposal for a partially typed `scope.type.name`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct CompletionCandidate {
    pub label: String,
    pub kind: CandidateKind,
    pub scope: Option<ResourceScope>,
    pub detail: Option<String>,
    pub insert_text: String,
    pub filter_text: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct CompletionList {
    pub is_incomplete: bool,
    pub items: Vec<CompletionCandidate>,
    /// Span of the segment being typed; items replace it when present.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub replace_range: Option<Range>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct LocationLink {
    pub target_uri: PathBuf,
    pub target_range: Option<Range>,
    pub origin_selection_range: Range,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct DocumentLink {
    pub range: Range,
    pub target: PathBuf,
    pub tooltip: Option<String>,
}
