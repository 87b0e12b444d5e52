//! Mapping of file-change notifications onto cached nodes.

use super::cache::CacheKey;
use super::discovery::BUILD_PROFILE;
use super::model::ProjectModel;
use super::node::{NodeId, NodeKind};
use std::path::Path;

impl ProjectModel {
    /// Resets the cache of the deepest nodes whose URI contains `path`.
    ///
    /// Overlapping workspaces can discover the same file or directory more
    /// than once; every node sharing the deepest URI is reset. Returns the
    /// nodes that were reset, empty when the change does not affect the model
    /// (outside every workspace, or a source file owned only by a module or
    /// workspace).
    pub fn invalidate(&self, path: &Path) -> Vec<NodeId> {
        let mut reset = Vec::new();
        for owner in self.owners_of(path) {
            let Some(kind) = self.kind(owner) else {
                continue;
            };
            if matches!(kind, NodeKind::Workspace | NodeKind::Module) && !is_structural(path) {
                tracing::trace!("Ignoring change to {}", path.display());
                continue;
            }
            self.reset_owner(owner, kind, path);
            reset.push(owner);
        }
        reset
    }

    fn reset_owner(&self, owner: NodeId, kind: NodeKind, path: &Path) {
        self.reset(owner);
        tracing::debug!("Invalidated {:?} {} for {}", kind, owner, path.display());

        // The node itself changed, possibly deleted: its parent relists.
        if self.uri(owner).as_deref() == Some(path) {
            if let (Some(parent), Some(key)) = (self.parent(owner), CacheKey::listing(kind)) {
                self.reset_keys(parent, &[key]);
            }
        }

        // Resource roots are derived from the module's build profile.
        let is_module_profile = kind == NodeKind::Module
            && path.file_name().is_some_and(|name| name == BUILD_PROFILE)
            && self.uri(owner).as_deref() == path.parent();
        if is_module_profile {
            for child in self.children(owner) {
                if self.kind(child) == Some(NodeKind::Product) {
                    self.reset_keys(child, &[CacheKey::Resources]);
                }
            }
        }
    }

    /// Every node with the longest URI that is a prefix of `path`, sorted by id.
    fn owners_of(&self, path: &Path) -> Vec<NodeId> {
        let candidates: Vec<(NodeId, usize)> = self
            .all_nodes()
            .into_iter()
            .filter(|(_, uri)| path.starts_with(uri))
            .map(|(id, uri)| (id, uri.components().count()))
            .collect();
        let Some(longest) = candidates.iter().map(|(_, len)| *len).max() else {
            return Vec::new();
        };
        let mut owners: Vec<NodeId> = candidates
            .into_iter()
            .filter(|(_, len)| *len == longest)
            .map(|(id, _)| id)
            .collect();
        owners.sort();
        owners
    }
}

/// Changes that can alter discovery: manifests, declaration files and
/// directories (no extension).
fn is_structural(path: &Path) -> bool {
    match path.extension().and_then(|ext| ext.to_str()) {
        None => true,
        Some(ext) => ext == "json" || ext == "json5",
    }
}
