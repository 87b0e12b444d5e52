//! Arena of project nodes with lazily computed, per-node cached children.
//!
//! Every node is addressed by a [`NodeId`] and owned by the arena; a node only
//! knows its parent's id. Accessors compute on first use and memoize into the
//! node's [`NodeCache`]; `force` recomputes. A child rediscovered under the same
//! parent with the same URI keeps its id and its caches, and children that
//! disappear are pruned together with their subtrees.
//!
//! No arena lock is held across an `.await`: reads copy what they need out of
//! the map, the file system is queried, and the result is written back. Two
//! concurrent misses on the same cell both compute and the last write wins.

use super::cache::{CacheKey, NodeCache};
use super::discovery::{self, BuildProfile, BuildTarget};
use super::element::{self, ElementContent};
use super::node::{DirectoryKind, Node, NodeId, NodeInfo, NodeKind, NodePayload};
use crate::fs::{DirEntry, FileSystem};
use arkres_api::{Declaration, NameReference, ResourceKind};
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use indexmap::IndexMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};

pub struct ProjectModel {
    fs: Arc<dyn FileSystem>,
    nodes: DashMap<NodeId, Node>,
    /// `(parent, uri)` to node; workspaces have no parent.
    identities: DashMap<(Option<NodeId>, PathBuf), NodeId>,
    next_id: AtomicU32,
}

impl ProjectModel {
    pub fn new(fs: Arc<dyn FileSystem>) -> Self {
        Self {
            fs,
            nodes: DashMap::new(),
            identities: DashMap::new(),
            next_id: AtomicU32::new(0),
        }
    }

    pub fn fs(&self) -> &Arc<dyn FileSystem> {
        &self.fs
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    // ---------------------------------------------------------------------
    // Workspaces
    // ---------------------------------------------------------------------

    /// Registers a workspace folder; adding the same folder twice is a no-op.
    pub fn add_workspace(&self, root: impl Into<PathBuf>) -> NodeId {
        let root = root.into();
        let id = self.attach(None, NodeKind::Workspace, root.clone(), NodePayload::None);
        tracing::info!("Workspace {} registered as {}", root.display(), id);
        id
    }

    /// Drops a workspace folder and everything discovered below it.
    pub fn remove_workspace(&self, root: &Path) -> bool {
        let id = self
            .identities
            .get(&(None, root.to_path_buf()))
            .map(|entry| *entry.value());
        match id {
            Some(id) => {
                self.remove_subtree(id);
                tracing::info!("Workspace {} removed", root.display());
                true
            }
            None => false,
        }
    }

    pub fn workspaces(&self) -> Vec<NodeId> {
        let mut roots: Vec<(PathBuf, NodeId)> = self
            .nodes
            .iter()
            .filter(|node| node.kind == NodeKind::Workspace)
            .map(|node| (node.uri.clone(), *node.key()))
            .collect();
        roots.sort();
        roots.into_iter().map(|(_, id)| id).collect()
    }

    // ---------------------------------------------------------------------
    // Node inspection
    // ---------------------------------------------------------------------

    pub fn node(&self, id: NodeId) -> Option<NodeInfo> {
        self.nodes.get(&id).map(|node| NodeInfo {
            id,
            kind: node.kind,
            uri: node.uri.clone(),
            parent: node.parent,
            payload: node.payload.clone(),
        })
    }

    pub fn uri(&self, id: NodeId) -> Option<PathBuf> {
        self.nodes.get(&id).map(|node| node.uri.clone())
    }

    pub fn kind(&self, id: NodeId) -> Option<NodeKind> {
        self.nodes.get(&id).map(|node| node.kind)
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes.get(&id).and_then(|node| node.parent)
    }

    pub fn children(&self, id: NodeId) -> Vec<NodeId> {
        self.nodes
            .get(&id)
            .map(|node| node.children.clone())
            .unwrap_or_default()
    }

    /// Nodes whose URI equals `uri`, in no particular order.
    pub fn find(&self, uri: &Path) -> Vec<NodeId> {
        self.nodes
            .iter()
            .filter(|node| node.uri == uri)
            .map(|node| *node.key())
            .collect()
    }

    pub(crate) fn all_nodes(&self) -> Vec<(NodeId, PathBuf)> {
        self.nodes
            .iter()
            .map(|node| (*node.key(), node.uri.clone()))
            .collect()
    }

    // ---------------------------------------------------------------------
    // Cache control
    // ---------------------------------------------------------------------

    pub fn reset(&self, id: NodeId) {
        self.update(id, NodeCache::clear_all);
    }

    pub fn reset_keys(&self, id: NodeId, keys: &[CacheKey]) {
        self.update(id, |cache| {
            for key in keys {
                cache.clear(*key);
            }
        });
    }

    pub fn is_cached(&self, id: NodeId, key: CacheKey) -> bool {
        self.nodes
            .get(&id)
            .is_some_and(|node| node.cache.is_cached(key))
    }

    // ---------------------------------------------------------------------
    // Accessors
    // ---------------------------------------------------------------------

    pub async fn is_exist(&self, id: NodeId, force: bool) -> bool {
        if !force {
            if let Some(exists) = self.cached(id, |c| c.exists) {
                return exists;
            }
        }
        let Some(uri) = self.uri(id) else {
            return false;
        };
        let exists = self.fs.exists(&uri).await;
        self.update(id, |c| c.exists = Some(exists));
        exists
    }

    pub async fn modules(&self, workspace: NodeId, force: bool) -> Vec<NodeId> {
        if self.kind(workspace) != Some(NodeKind::Workspace) {
            return Vec::new();
        }
        if !force {
            if let Some(ids) = self.cached(workspace, |c| c.modules.clone()) {
                return ids;
            }
        }
        let Some(root) = self.uri(workspace) else {
            return Vec::new();
        };

        let ids: Vec<NodeId> = discovery::discover_modules(self.fs.as_ref(), &root)
            .await
            .into_iter()
            .map(|dir| self.attach(Some(workspace), NodeKind::Module, dir, NodePayload::None))
            .collect();
        tracing::debug!("{} module(s) under {}", ids.len(), root.display());
        self.commit(workspace, CacheKey::Modules, &ids, |c| c.modules = Some(ids.clone()));
        ids
    }

    pub async fn build_profile(&self, module: NodeId, force: bool) -> Option<Arc<BuildProfile>> {
        if self.kind(module) != Some(NodeKind::Module) {
            return None;
        }
        if !force {
            if let Some(profile) = self.cached(module, |c| c.build_profile.clone()) {
                return profile;
            }
        }
        let root = self.uri(module)?;
        let profile = discovery::load_build_profile(self.fs.as_ref(), &root)
            .await
            .map(Arc::new);
        self.update(module, |c| c.build_profile = Some(profile.clone()));
        profile
    }

    pub async fn products(&self, module: NodeId, force: bool) -> Vec<NodeId> {
        if self.kind(module) != Some(NodeKind::Module) {
            return Vec::new();
        }
        if !force {
            if let Some(ids) = self.cached(module, |c| c.products.clone()) {
                return ids;
            }
        }
        let Some(root) = self.uri(module) else {
            return Vec::new();
        };
        let targets = self
            .build_profile(module, force)
            .await
            .map(|profile| profile.targets.clone())
            .unwrap_or_default();

        let ids: Vec<NodeId> = discovery::discover_products(self.fs.as_ref(), &root, &targets)
            .await
            .into_iter()
            .map(|(manifest, target)| {
                self.attach(
                    Some(module),
                    NodeKind::Product,
                    manifest,
                    NodePayload::Target(target),
                )
            })
            .collect();
        self.commit(module, CacheKey::Products, &ids, |c| c.products = Some(ids.clone()));
        ids
    }

    pub async fn resources(&self, product: NodeId, force: bool) -> Vec<NodeId> {
        let Some(info) = self.node(product) else {
            return Vec::new();
        };
        if info.kind != NodeKind::Product {
            return Vec::new();
        }
        if !force {
            if let Some(ids) = self.cached(product, |c| c.resources.clone()) {
                return ids;
            }
        }
        let Some(module) = info.parent else {
            return Vec::new();
        };
        let Some(module_root) = self.uri(module) else {
            return Vec::new();
        };
        let target_name = info.payload.target().unwrap_or(discovery::DEFAULT_TARGET);
        let target = self
            .build_profile(module, false)
            .await
            .and_then(|profile| profile.target(target_name).cloned())
            .unwrap_or_else(|| BuildTarget::named(target_name));

        let ids: Vec<NodeId> = discovery::resource_roots(&module_root, &target)
            .into_iter()
            .map(|root| {
                self.attach(
                    Some(product),
                    NodeKind::Resource,
                    root,
                    NodePayload::Target(target.name.clone()),
                )
            })
            .collect();
        self.commit(product, CacheKey::Resources, &ids, |c| c.resources = Some(ids.clone()));
        ids
    }

    pub async fn directories(&self, resource: NodeId, force: bool) -> Vec<NodeId> {
        if self.kind(resource) != Some(NodeKind::Resource) {
            return Vec::new();
        }
        if !force {
            if let Some(ids) = self.cached(resource, |c| c.directories.clone()) {
                return ids;
            }
        }
        let Some(root) = self.uri(resource) else {
            return Vec::new();
        };

        let ids: Vec<NodeId> = self
            .list_dir(&root)
            .await
            .into_iter()
            .filter(DirEntry::is_dir)
            .map(|entry| {
                let kind = DirectoryKind::classify(entry.file_name());
                self.attach(
                    Some(resource),
                    NodeKind::ResourceDirectory(kind),
                    entry.path,
                    NodePayload::None,
                )
            })
            .collect();
        self.commit(resource, CacheKey::Directories, &ids, |c| {
            c.directories = Some(ids.clone())
        });
        ids
    }

    /// The `element` directory of a resource group.
    pub async fn element(&self, directory: NodeId, force: bool) -> Option<NodeId> {
        self.group_subdirectory(directory, CacheKey::Element, force).await
    }

    /// The `media` directory of a resource group.
    pub async fn media(&self, directory: NodeId, force: bool) -> Option<NodeId> {
        self.group_subdirectory(directory, CacheKey::Media, force).await
    }

    pub async fn element_files(&self, element: NodeId, force: bool) -> Vec<NodeId> {
        self.file_children(element, NodeKind::ElementDirectory, NodeKind::ElementFile, force, |entry| {
            entry.path.extension().is_some_and(|ext| ext == "json")
        })
        .await
    }

    pub async fn media_files(&self, media: NodeId, force: bool) -> Vec<NodeId> {
        self.file_children(media, NodeKind::MediaDirectory, NodeKind::MediaFile, force, |entry| {
            !entry.file_name().starts_with('.')
        })
        .await
    }

    /// Every file below a `rawfile` or `resfile` directory, recursively.
    pub async fn raw_files(&self, directory: NodeId, force: bool) -> Vec<NodeId> {
        match self.kind(directory) {
            Some(NodeKind::ResourceDirectory(kind)) if kind.holds_raw_files() => {}
            _ => return Vec::new(),
        }
        if !force {
            if let Some(ids) = self.cached(directory, |c| c.files.clone()) {
                return ids;
            }
        }
        let Some(root) = self.uri(directory) else {
            return Vec::new();
        };
        let files = match self.fs.walk_files(&root).await {
            Ok(files) => files,
            Err(e) => {
                tracing::debug!("Cannot list raw files under {}: {}", root.display(), e);
                Vec::new()
            }
        };

        let ids: Vec<NodeId> = files
            .into_iter()
            .map(|file| self.attach(Some(directory), NodeKind::RawFile, file, NodePayload::None))
            .collect();
        self.commit(directory, CacheKey::Files, &ids, |c| c.files = Some(ids.clone()));
        ids
    }

    /// Parsed content of an element file. Unreadable or malformed files yield
    /// empty content.
    pub async fn declarations(&self, file: NodeId, force: bool) -> Arc<ElementContent> {
        if self.kind(file) != Some(NodeKind::ElementFile) {
            return Arc::default();
        }
        if !force {
            if let Some(content) = self.cached(file, |c| c.declarations.clone()) {
                return content;
            }
        }
        let Some(uri) = self.uri(file) else {
            return Arc::default();
        };

        let content = match self.fs.read_to_string(&uri).await {
            Ok(text) => match element::parse_element_file(&uri, &text) {
                Ok(content) => content,
                Err(e) => {
                    tracing::warn!("Skipping malformed element file {}: {}", uri.display(), e);
                    ElementContent::default()
                }
            },
            Err(e) => {
                tracing::debug!("Cannot read element file {}: {}", uri.display(), e);
                ElementContent::default()
            }
        };
        let content = Arc::new(content);
        self.update(file, |c| c.declarations = Some(content.clone()));
        content
    }

    // ---------------------------------------------------------------------
    // Traversals
    // ---------------------------------------------------------------------

    pub async fn all_modules(&self, force: bool) -> Vec<NodeId> {
        let mut modules = Vec::new();
        for workspace in self.workspaces() {
            modules.extend(self.modules(workspace, force).await);
        }
        modules
    }

    /// Every resource directory of every product of every module.
    pub async fn resource_directories(&self, force: bool) -> Vec<NodeId> {
        let mut directories = Vec::new();
        for module in self.all_modules(force).await {
            for product in self.products(module, force).await {
                for resource in self.resources(product, force).await {
                    directories.extend(self.directories(resource, force).await);
                }
            }
        }
        directories
    }

    pub async fn all_element_files(&self, force: bool) -> Vec<NodeId> {
        let mut files = Vec::new();
        for directory in self.resource_directories(force).await {
            if let Some(element) = self.element(directory, force).await {
                files.extend(self.element_files(element, force).await);
            }
        }
        files
    }

    pub async fn all_media_files(&self, force: bool) -> Vec<NodeId> {
        let mut files = Vec::new();
        for directory in self.resource_directories(force).await {
            if let Some(media) = self.media(directory, force).await {
                files.extend(self.media_files(media, force).await);
            }
        }
        files
    }

    /// Declarations grouped by `(kind, name)` across every qualified directory,
    /// in discovery order.
    pub async fn name_references(&self, kind: Option<ResourceKind>) -> Vec<NameReference> {
        let mut groups: IndexMap<(ResourceKind, String), Vec<Declaration>> = IndexMap::new();
        for file in self.all_element_files(false).await {
            let content = self.declarations(file, false).await;
            for declaration in &content.declarations {
                if kind.is_some_and(|k| k != declaration.kind) {
                    continue;
                }
                groups
                    .entry((declaration.kind, declaration.name.clone()))
                    .or_default()
                    .push(declaration.clone());
            }
        }
        groups
            .into_iter()
            .map(|((kind, name), references)| NameReference {
                kind,
                name,
                references,
            })
            .collect()
    }

    // ---------------------------------------------------------------------
    // Internals
    // ---------------------------------------------------------------------

    fn cached<T>(&self, id: NodeId, read: impl FnOnce(&NodeCache) -> Option<T>) -> Option<T> {
        self.nodes.get(&id).and_then(|node| read(&node.cache))
    }

    fn update(&self, id: NodeId, write: impl FnOnce(&mut NodeCache)) {
        if let Some(mut node) = self.nodes.get_mut(&id) {
            write(&mut node.cache);
        }
    }

    /// Writes a child cell and prunes children the same accessor produced
    /// before but not this time.
    fn commit(&self, parent: NodeId, key: CacheKey, ids: &[NodeId], write: impl FnOnce(&mut NodeCache)) {
        let previous = match self.nodes.get_mut(&parent) {
            Some(mut node) => {
                write(&mut node.cache);
                node.children.clone()
            }
            None => return,
        };
        for child in previous {
            if ids.contains(&child) {
                continue;
            }
            if self.kind(child).is_some_and(|kind| key.produces(kind)) {
                self.remove_subtree(child);
            }
        }
    }

    fn attach(&self, parent: Option<NodeId>, kind: NodeKind, uri: PathBuf, payload: NodePayload) -> NodeId {
        let id = *self
            .identities
            .entry((parent, uri.clone()))
            .or_insert_with(|| NodeId(self.next_id.fetch_add(1, Ordering::Relaxed)));

        match self.nodes.entry(id) {
            Entry::Occupied(mut entry) => {
                let node = entry.get_mut();
                if node.kind != kind || node.payload != payload {
                    node.kind = kind;
                    node.payload = payload;
                    node.cache.clear_all();
                }
            }
            Entry::Vacant(entry) => {
                entry.insert(Node {
                    kind,
                    uri,
                    parent,
                    payload,
                    children: Vec::new(),
                    cache: NodeCache::default(),
                });
            }
        }

        if let Some(parent) = parent {
            if let Some(mut node) = self.nodes.get_mut(&parent) {
                if !node.children.contains(&id) {
                    node.children.push(id);
                }
            }
        }
        id
    }

    fn remove_subtree(&self, id: NodeId) {
        let Some((_, node)) = self.nodes.remove(&id) else {
            return;
        };
        self.identities.remove(&(node.parent, node.uri.clone()));
        if let Some(parent) = node.parent {
            if let Some(mut parent) = self.nodes.get_mut(&parent) {
                parent.children.retain(|child| *child != id);
            }
        }
        for child in node.children {
            self.remove_subtree(child);
        }
    }

    async fn list_dir(&self, dir: &Path) -> Vec<DirEntry> {
        match self.fs.read_dir(dir).await {
            Ok(entries) => entries,
            Err(e) => {
                tracing::debug!("Cannot list {}: {}", dir.display(), e);
                Vec::new()
            }
        }
    }

    async fn group_subdirectory(&self, directory: NodeId, key: CacheKey, force: bool) -> Option<NodeId> {
        if self.kind(directory)? != NodeKind::ResourceDirectory(DirectoryKind::ResourceGroup) {
            return None;
        }
        let (name, kind) = match key {
            CacheKey::Element => ("element", NodeKind::ElementDirectory),
            CacheKey::Media => ("media", NodeKind::MediaDirectory),
            _ => return None,
        };
        if !force {
            let cached = self.cached(directory, |c| match key {
                CacheKey::Element => c.element,
                _ => c.media,
            });
            if let Some(child) = cached {
                return child;
            }
        }

        let path = self.uri(directory)?.join(name);
        let child = if self.fs.is_dir(&path).await {
            Some(self.attach(Some(directory), kind, path, NodePayload::None))
        } else {
            None
        };
        let ids: Vec<NodeId> = child.into_iter().collect();
        self.commit(directory, key, &ids, |c| match key {
            CacheKey::Element => c.element = Some(child),
            _ => c.media = Some(child),
        });
        child
    }

    async fn file_children(
        &self,
        parent: NodeId,
        parent_kind: NodeKind,
        child_kind: NodeKind,
        force: bool,
        accept: impl Fn(&DirEntry) -> bool,
    ) -> Vec<NodeId> {
        if self.kind(parent) != Some(parent_kind) {
            return Vec::new();
        }
        if !force {
            if let Some(ids) = self.cached(parent, |c| c.files.clone()) {
                return ids;
            }
        }
        let Some(dir) = self.uri(parent) else {
            return Vec::new();
        };

        let ids: Vec<NodeId> = self
            .list_dir(&dir)
            .await
            .into_iter()
            .filter(|entry| entry.is_file() && accept(entry))
            .map(|entry| self.attach(Some(parent), child_kind, entry.path, NodePayload::None))
            .collect();
        self.commit(parent, CacheKey::Files, &ids, |c| c.files = Some(ids.clone()));
        ids
    }
}
