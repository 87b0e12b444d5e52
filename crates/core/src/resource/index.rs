use arkres_api::{IndexItem, IndexKey, ResourceKind, ResourceScope};
use std::collections::{BTreeSet, HashMap};

/// Flat `scope.type.name` table. Inserting an existing key replaces it.
#[derive(Debug, Default, Clone)]
pub struct ResourceIndex {
    items: HashMap<IndexKey, IndexItem>,
}

impl ResourceIndex {
    pub fn insert(&mut self, item: IndexItem) {
        self.items.insert(item.key(), item);
    }

    pub fn extend(&mut self, items: impl IntoIterator<Item = IndexItem>) {
        for item in items {
            self.insert(item);
        }
    }

    pub fn get(&self, key: &IndexKey) -> Option<&IndexItem> {
        self.items.get(key)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn count(&self, scope: ResourceScope) -> usize {
        self.items.keys().filter(|key| key.scope == scope).count()
    }

    pub fn iter(&self) -> impl Iterator<Item = &IndexItem> {
        self.items.values()
    }

    pub fn filter(
        &self,
        scope: Option<ResourceScope>,
        kind: Option<ResourceKind>,
    ) -> impl Iterator<Item = &IndexItem> {
        self.items.values().filter(move |item| {
            scope.is_none_or(|s| s == item.scope) && kind.is_none_or(|k| k == item.kind)
        })
    }

    /// Distinct kinds that have at least one entry under `scope`.
    pub fn kinds_in(&self, scope: ResourceScope) -> BTreeSet<ResourceKind> {
        self.items
            .keys()
            .filter(|key| key.scope == scope)
            .map(|key| key.kind)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use arkres_api::ResourceLocation;
    use std::path::PathBuf;

    fn item(scope: ResourceScope, kind: ResourceKind, name: &str, file: &str) -> IndexItem {
        IndexItem {
            scope,
            kind,
            name: name.to_string(),
            location: ResourceLocation::file(PathBuf::from(file)),
        }
    }

    #[test]
    fn test_last_write_wins() {
        let mut index = ResourceIndex::default();
        index.insert(item(ResourceScope::App, ResourceKind::Color, "a", "/base.json"));
        index.insert(item(ResourceScope::App, ResourceKind::Color, "a", "/dark.json"));
        assert_eq!(index.len(), 1);
        let key = IndexKey::new(ResourceScope::App, ResourceKind::Color, "a");
        assert_eq!(index.get(&key).unwrap().location.uri, PathBuf::from("/dark.json"));
    }

    #[test]
    fn test_filter_and_kinds() {
        let mut index = ResourceIndex::default();
        index.extend([
            item(ResourceScope::App, ResourceKind::String, "s", "/s.json"),
            item(ResourceScope::App, ResourceKind::Color, "c", "/c.json"),
            item(ResourceScope::Sys, ResourceKind::Float, "f", "/sys.js"),
        ]);
        assert_eq!(index.filter(Some(ResourceScope::App), None).count(), 2);
        assert_eq!(index.filter(None, Some(ResourceKind::Float)).count(), 1);
        assert_eq!(
            index.kinds_in(ResourceScope::App).into_iter().collect::<Vec<_>>(),
            vec![ResourceKind::Color, ResourceKind::String]
        );
        assert_eq!(index.count(ResourceScope::Sys), 1);
    }
}
