use super::{DirEntry, FileKind, FileStat, FileSystem, GlobOptions};
use crate::error::Result;
use async_trait::async_trait;
use dashmap::DashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Layers unsaved editor buffers over another [`FileSystem`].
///
/// Reads of an open document return the buffer; directory listings and globs
/// still come from the inner file system.
pub struct OverlayFileSystem {
    inner: Arc<dyn FileSystem>,
    buffers: DashMap<PathBuf, Arc<str>>,
}

impl OverlayFileSystem {
    pub fn new(inner: Arc<dyn FileSystem>) -> Self {
        Self {
            inner,
            buffers: DashMap::new(),
        }
    }

    pub fn open(&self, path: PathBuf, content: impl Into<Arc<str>>) {
        self.buffers.insert(path, content.into());
    }

    pub fn close(&self, path: &Path) {
        self.buffers.remove(path);
    }

    pub fn buffer(&self, path: &Path) -> Option<Arc<str>> {
        self.buffers.get(path).map(|b| b.value().clone())
    }
}

#[async_trait]
impl FileSystem for OverlayFileSystem {
    async fn exists(&self, path: &Path) -> bool {
        self.buffers.contains_key(path) || self.inner.exists(path).await
    }

    async fn stat(&self, path: &Path) -> Result<FileStat> {
        if let Some(buffer) = self.buffer(path) {
            return Ok(FileStat {
                kind: FileKind::File,
                size: buffer.len() as u64,
                modified: None,
            });
        }
        self.inner.stat(path).await
    }

    async fn read_dir(&self, path: &Path) -> Result<Vec<DirEntry>> {
        self.inner.read_dir(path).await
    }

    async fn glob(&self, root: &Path, pattern: &str, options: &GlobOptions) -> Result<Vec<PathBuf>> {
        self.inner.glob(root, pattern, options).await
    }

    async fn read_to_string(&self, path: &Path) -> Result<String> {
        if let Some(buffer) = self.buffer(path) {
            return Ok(buffer.to_string());
        }
        self.inner.read_to_string(path).await
    }

    async fn walk_files(&self, root: &Path) -> Result<Vec<PathBuf>> {
        self.inner.walk_files(root).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fs::DiskFileSystem;
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_buffer_wins_over_disk() {
        let dir = tempdir().unwrap();
        let file = dir.path().join("color.json");
        std::fs::write(&file, "disk").unwrap();

        let overlay = OverlayFileSystem::new(Arc::new(DiskFileSystem::new()));
        assert_eq!(overlay.read_to_string(&file).await.unwrap(), "disk");

        overlay.open(file.clone(), "buffer");
        assert_eq!(overlay.read_to_string(&file).await.unwrap(), "buffer");
        assert_eq!(overlay.stat(&file).await.unwrap().size, 6);

        overlay.close(&file);
        assert_eq!(overlay.read_to_string(&file).await.unwrap(), "disk");
    }

    #[tokio::test]
    async fn test_unsaved_new_file_exists() {
        let dir = tempdir().unwrap();
        let file = dir.path().join("new.json");
        let overlay = OverlayFileSystem::new(Arc::new(DiskFileSystem::new()));
        assert!(!overlay.exists(&file).await);
        overlay.open(file.clone(), "{}");
        assert!(overlay.exists(&file).await);
    }
}
