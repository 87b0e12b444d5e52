//! Hierarchical model of a project's resource layout.
//!
//! `Workspace → Module → Product → Resource → ResourceDirectory →
//! {ElementDirectory → ElementFile | MediaDirectory → MediaFile | RawFile}`

mod cache;
pub mod discovery;
pub mod element;
mod invalidate;
mod model;
mod node;

pub use cache::{CacheKey, NodeCache};
pub use discovery::{BuildProfile, BuildTarget, ProfileScope};
pub use element::{ElementContent, InvalidResourceType, parse_element_file};
pub use model::ProjectModel;
pub use node::{DirectoryKind, NodeId, NodeInfo, NodeKind, NodePayload};
