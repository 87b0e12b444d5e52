use super::discovery::BuildProfile;
use super::element::ElementContent;
use super::node::{NodeId, NodeKind};
use std::sync::Arc;

/// Names one memo cell of a [`NodeCache`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CacheKey {
    Exists,
    BuildProfile,
    Modules,
    Products,
    Resources,
    Directories,
    Element,
    Media,
    Files,
    Declarations,
}

impl CacheKey {
    pub const ALL: [CacheKey; 10] = [
        CacheKey::Exists,
        CacheKey::BuildProfile,
        CacheKey::Modules,
        CacheKey::Products,
        CacheKey::Resources,
        CacheKey::Directories,
        CacheKey::Element,
        CacheKey::Media,
        CacheKey::Files,
        CacheKey::Declarations,
    ];

    /// The parent's cell listing nodes of `kind`.
    pub fn listing(kind: NodeKind) -> Option<CacheKey> {
        CacheKey::ALL.into_iter().find(|key| key.produces(kind))
    }

    /// Whether children of `kind` are produced by the accessor behind this key.
    pub fn produces(&self, kind: NodeKind) -> bool {
        match self {
            CacheKey::Modules => kind == NodeKind::Module,
            CacheKey::Products => kind == NodeKind::Product,
            CacheKey::Resources => kind == NodeKind::Resource,
            CacheKey::Directories => matches!(kind, NodeKind::ResourceDirectory(_)),
            CacheKey::Element => kind == NodeKind::ElementDirectory,
            CacheKey::Media => kind == NodeKind::MediaDirectory,
            CacheKey::Files => matches!(
                kind,
                NodeKind::ElementFile | NodeKind::MediaFile | NodeKind::RawFile
            ),
            CacheKey::Exists | CacheKey::BuildProfile | CacheKey::Declarations => false,
        }
    }
}

/// Per-node memoization. `None` means "not computed yet".
#[derive(Debug, Default, Clone)]
pub struct NodeCache {
    pub exists: Option<bool>,
    pub build_profile: Option<Option<Arc<BuildProfile>>>,
    pub modules: Option<Vec<NodeId>>,
    pub products: Option<Vec<NodeId>>,
    pub resources: Option<Vec<NodeId>>,
    pub directories: Option<Vec<NodeId>>,
    pub element: Option<Option<NodeId>>,
    pub media: Option<Option<NodeId>>,
    pub files: Option<Vec<NodeId>>,
    pub declarations: Option<Arc<ElementContent>>,
}

impl NodeCache {
    pub fn clear(&mut self, key: CacheKey) {
        match key {
            CacheKey::Exists => self.exists = None,
            CacheKey::BuildProfile => self.build_profile = None,
            CacheKey::Modules => self.modules = None,
            CacheKey::Products => self.products = None,
            CacheKey::Resources => self.resources = None,
            CacheKey::Directories => self.directories = None,
            CacheKey::Element => self.element = None,
            CacheKey::Media => self.media = None,
            CacheKey::Files => self.files = None,
            CacheKey::Declarations => self.declarations = None,
        }
    }

    pub fn clear_all(&mut self) {
        *self = NodeCache::default();
    }

    pub fn is_cached(&self, key: CacheKey) -> bool {
        match key {
            CacheKey::Exists => self.exists.is_some(),
            CacheKey::BuildProfile => self.build_profile.is_some(),
            CacheKey::Modules => self.modules.is_some(),
            CacheKey::Products => self.products.is_some(),
            CacheKey::Resources => self.resources.is_some(),
            CacheKey::Directories => self.directories.is_some(),
            CacheKey::Element => self.element.is_some(),
            CacheKey::Media => self.media.is_some(),
            CacheKey::Files => self.files.is_some(),
            CacheKey::Declarations => self.declarations.is_some(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clear_single_cell() {
        let mut cache = NodeCache {
            exists: Some(true),
            files: Some(vec![NodeId(1)]),
            ..Default::default()
        };
        cache.clear(CacheKey::Files);
        assert!(!cache.is_cached(CacheKey::Files));
        assert!(cache.is_cached(CacheKey::Exists));
        cache.clear_all();
        assert!(CacheKey::ALL.iter().all(|k| !cache.is_cached(*k)));
    }
}
