//! Resource resolver owning the flat index for one project model and SDK.

use super::index::ResourceIndex;
use super::sys;
use crate::project::{DirectoryKind, NodeKind, ProjectModel};
use arkres_api::{
    Declaration, IndexItem, IndexKey, NameReference, ResourceKind, ResourceLocation,
    ResourceReference, ResourceScope,
};
use futures::future::join_all;
use serde::Serialize;
use std::path::{Component, Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::{OnceCell, RwLock};

#[derive(Debug, Clone, Copy, Serialize)]
pub struct IndexSummary {
    pub app: usize,
    pub sys: usize,
    pub elapsed: Duration,
}

/// Answers reference queries from an index built over a [`ProjectModel`].
///
/// The SDK path is fixed for the lifetime of a resolver; the owner builds a new
/// resolver when it changes. System entries are loaded once per instance.
pub struct ResourceResolver {
    model: Arc<ProjectModel>,
    sdk_path: Option<PathBuf>,
    index: RwLock<ResourceIndex>,
    sys_items: OnceCell<Vec<IndexItem>>,
}

impl ResourceResolver {
    pub fn new(model: Arc<ProjectModel>, sdk_path: Option<PathBuf>) -> Self {
        Self {
            model,
            sdk_path,
            index: RwLock::new(ResourceIndex::default()),
            sys_items: OnceCell::new(),
        }
    }

    pub fn model(&self) -> &Arc<ProjectModel> {
        &self.model
    }

    pub fn sdk_path(&self) -> Option<&Path> {
        self.sdk_path.as_deref()
    }

    /// Rebuilds the index from scratch: element declarations and media files
    /// for `app`, the SDK manifest for `sys`.
    ///
    /// With `force` every level of the project model is rediscovered and every
    /// element file reread; otherwise cells left by earlier traversals are
    /// reused, which is enough after [`ProjectModel::invalidate`].
    pub async fn build_index(&self, force: bool) -> IndexSummary {
        let started = Instant::now();
        let (app, sys) = futures::join!(self.app_items(force), self.sys_items());

        let mut fresh = ResourceIndex::default();
        fresh.extend(app);
        fresh.extend(sys.iter().cloned());
        let summary = IndexSummary {
            app: fresh.count(ResourceScope::App),
            sys: fresh.count(ResourceScope::Sys),
            elapsed: started.elapsed(),
        };
        *self.index.write().await = fresh;

        tracing::info!(
            "Resource index built{}: {} app, {} sys in {:?}",
            if force { " (full rescan)" } else { "" },
            summary.app,
            summary.sys,
            summary.elapsed
        );
        summary
    }

    async fn app_items(&self, force: bool) -> Vec<IndexItem> {
        let files = self.model.all_element_files(force).await;
        let contents = join_all(files.iter().map(|file| self.model.declarations(*file, force))).await;

        let mut items: Vec<IndexItem> = contents
            .iter()
            .flat_map(|content| content.declarations.iter())
            .map(|declaration| IndexItem {
                scope: ResourceScope::App,
                kind: declaration.kind,
                name: declaration.name.clone(),
                location: declaration.location(),
            })
            .collect();

        for file in self.model.all_media_files(force).await {
            let Some(info) = self.model.node(file) else {
                continue;
            };
            items.push(IndexItem {
                scope: ResourceScope::App,
                kind: ResourceKind::Media,
                name: info.stem().to_string(),
                location: media_location(&info.uri),
            });
        }
        items
    }

    async fn sys_items(&self) -> &[IndexItem] {
        self.sys_items
            .get_or_init(|| sys::load_sys_items(self.model.fs().as_ref(), self.sdk_path.as_deref()))
            .await
    }

    pub async fn len(&self) -> usize {
        self.index.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.index.read().await.is_empty()
    }

    /// Location of `scope.type.name`, or `None` when unparsable or unknown.
    pub async fn resolve(&self, reference: &str) -> Option<ResourceLocation> {
        let reference = ResourceReference::parse(reference)?;
        self.lookup(&reference).await
    }

    pub async fn lookup(&self, reference: &ResourceReference) -> Option<ResourceLocation> {
        self.index
            .read()
            .await
            .get(&reference.key())
            .map(|item| item.location.clone())
    }

    /// Case-insensitive substring search over names and values. Name matches
    /// come first, each group sorted by name.
    pub async fn search(
        &self,
        keyword: &str,
        scope: Option<ResourceScope>,
        kind: Option<ResourceKind>,
    ) -> Vec<IndexItem> {
        let needle = keyword.to_lowercase();
        let index = self.index.read().await;
        let mut hits: Vec<(bool, &IndexItem)> = index
            .filter(scope, kind)
            .filter_map(|item| {
                let by_name = item.name.to_lowercase().contains(&needle);
                let by_value = item
                    .value()
                    .is_some_and(|value| value.to_lowercase().contains(&needle));
                (by_name || by_value).then_some((!by_name, item))
            })
            .collect();
        hits.sort_by(|a, b| {
            a.0.cmp(&b.0)
                .then_with(|| a.1.name.cmp(&b.1.name))
                .then_with(|| a.1.key().cmp(&b.1.key()))
        });
        hits.into_iter().map(|(_, item)| item.clone()).collect()
    }

    pub async fn list_by_type(
        &self,
        scope: Option<ResourceScope>,
        kind: Option<ResourceKind>,
    ) -> Vec<IndexItem> {
        let index = self.index.read().await;
        let mut items: Vec<IndexItem> = index.filter(scope, kind).cloned().collect();
        items.sort_by(|a, b| a.name.cmp(&b.name).then_with(|| a.key().cmp(&b.key())));
        items
    }

    /// Every qualified variant of an `app` reference; the single indexed
    /// location for `sys`.
    pub async fn locations(&self, reference: &ResourceReference) -> Vec<ResourceLocation> {
        if reference.scope == ResourceScope::Sys {
            return self.lookup(reference).await.into_iter().collect();
        }

        let mut locations: Vec<ResourceLocation> = self
            .name_reference(reference)
            .await
            .map(|group| group.references.iter().map(Declaration::location).collect())
            .unwrap_or_default();

        if reference.kind == ResourceKind::Media {
            for file in self.model.all_media_files(false).await {
                let Some(info) = self.model.node(file) else {
                    continue;
                };
                if info.stem() == reference.name {
                    locations.push(media_location(&info.uri));
                }
            }
        }

        if locations.is_empty() {
            locations.extend(self.lookup(reference).await);
        }
        locations
    }

    /// Declarations of an `app` reference grouped across qualified directories.
    pub async fn name_reference(&self, reference: &ResourceReference) -> Option<NameReference> {
        if reference.scope != ResourceScope::App {
            return None;
        }
        self.model
            .name_references(Some(reference.kind))
            .await
            .into_iter()
            .find(|group| group.name == reference.name)
    }

    /// A file under any `rawfile` directory, addressed by its relative path.
    pub async fn resolve_rawfile(&self, path: &str) -> Option<ResourceLocation> {
        let relative = Path::new(path.trim_start_matches('/'));
        let escapes = relative
            .components()
            .any(|c| !matches!(c, Component::Normal(_)));
        if path.trim().is_empty() || escapes {
            return None;
        }

        for directory in self.model.resource_directories(false).await {
            if self.model.kind(directory) != Some(NodeKind::ResourceDirectory(DirectoryKind::RawFile)) {
                continue;
            }
            let Some(root) = self.model.uri(directory) else {
                continue;
            };
            let candidate = root.join(relative);
            if self.model.fs().exists(&candidate).await {
                return Some(ResourceLocation::file(candidate));
            }
        }
        None
    }

    pub(crate) async fn with_index<T>(&self, read: impl FnOnce(&ResourceIndex) -> T) -> T {
        let index = self.index.read().await;
        read(&index)
    }

    pub async fn contains(&self, key: &IndexKey) -> bool {
        self.index.read().await.get(key).is_some()
    }
}

fn media_location(uri: &Path) -> ResourceLocation {
    ResourceLocation {
        uri: uri.to_path_buf(),
        range: None,
        value: uri
            .file_name()
            .and_then(|name| name.to_str())
            .map(str::to_string),
    }
}
