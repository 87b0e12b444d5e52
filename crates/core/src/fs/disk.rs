use super::{DirEntry, FileKind, FileStat, FileSystem, GlobOptions};
use crate::error::{ArkresError, Result};
use async_trait::async_trait;
use ignore::WalkBuilder;
use ignore::overrides::OverrideBuilder;
use std::path::{Path, PathBuf};

/// [`FileSystem`] backed by `tokio::fs`. Directory walks run on tokio's
/// blocking pool, the same way `tokio::fs` itself does.
#[derive(Debug, Default, Clone)]
pub struct DiskFileSystem;

impl DiskFileSystem {
    pub fn new() -> Self {
        Self
    }
}

fn kind_of(file_type: std::fs::FileType) -> FileKind {
    if file_type.is_dir() {
        FileKind::Directory
    } else if file_type.is_file() {
        FileKind::File
    } else {
        FileKind::Other
    }
}

fn glob_blocking(root: &Path, pattern: &str, options: &GlobOptions) -> Result<Vec<PathBuf>> {
    let mut overrides = OverrideBuilder::new(root);
    overrides
        .add(pattern)
        .map_err(|e| ArkresError::Parsing(format!("Invalid glob '{}': {}", pattern, e)))?;
    let overrides = overrides
        .build()
        .map_err(|e| ArkresError::Parsing(format!("Invalid glob '{}': {}", pattern, e)))?;

    let excluded = options.exclude_dirs.clone();
    let mut builder = WalkBuilder::new(root);
    builder
        .standard_filters(false)
        .overrides(overrides)
        .max_depth(options.max_depth)
        .sort_by_file_path(|a, b| a.cmp(b))
        .filter_entry(move |entry| {
            let is_dir = entry.file_type().is_some_and(|t| t.is_dir());
            !(is_dir
                && entry.depth() > 0
                && entry
                    .file_name()
                    .to_str()
                    .is_some_and(|name| excluded.iter().any(|e| e == name)))
        });

    let mut paths = Vec::new();
    for entry in builder.build() {
        match entry {
            Ok(entry) if entry.file_type().is_some_and(|t| t.is_file()) => {
                paths.push(entry.into_path());
            }
            Ok(_) => {}
            Err(e) => tracing::debug!("Skipping unreadable entry under {}: {}", root.display(), e),
        }
    }
    Ok(paths)
}

fn walk_blocking(root: &Path) -> Vec<PathBuf> {
    walkdir::WalkDir::new(root)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|entry| match entry {
            Ok(entry) => Some(entry),
            Err(e) => {
                tracing::debug!("Skipping unreadable entry under {}: {}", root.display(), e);
                None
            }
        })
        .filter(|entry| entry.file_type().is_file())
        .map(walkdir::DirEntry::into_path)
        .collect()
}

#[async_trait]
impl FileSystem for DiskFileSystem {
    async fn exists(&self, path: &Path) -> bool {
        tokio::fs::try_exists(path).await.unwrap_or(false)
    }

    async fn stat(&self, path: &Path) -> Result<FileStat> {
        let metadata = tokio::fs::metadata(path).await?;
        Ok(FileStat {
            kind: kind_of(metadata.file_type()),
            size: metadata.len(),
            modified: metadata.modified().ok(),
        })
    }

    async fn read_dir(&self, path: &Path) -> Result<Vec<DirEntry>> {
        let mut reader = tokio::fs::read_dir(path).await?;
        let mut entries = Vec::new();
        loop {
            match reader.next_entry().await {
                Ok(Some(entry)) => {
                    let kind = match entry.file_type().await {
                        Ok(t) => kind_of(t),
                        Err(e) => {
                            tracing::debug!("Cannot stat {}: {}", entry.path().display(), e);
                            continue;
                        }
                    };
                    entries.push(DirEntry {
                        path: entry.path(),
                        kind,
                    });
                }
                Ok(None) => break,
                Err(e) => {
                    tracing::debug!("Error reading {}: {}", path.display(), e);
                    break;
                }
            }
        }
        entries.sort_by(|a, b| a.path.cmp(&b.path));
        Ok(entries)
    }

    async fn glob(&self, root: &Path, pattern: &str, options: &GlobOptions) -> Result<Vec<PathBuf>> {
        let root = root.to_path_buf();
        let pattern = pattern.to_string();
        let options = options.clone();
        tokio::task::spawn_blocking(move || glob_blocking(&root, &pattern, &options)).await?
    }

    async fn read_to_string(&self, path: &Path) -> Result<String> {
        Ok(tokio::fs::read_to_string(path).await?)
    }

    async fn walk_files(&self, root: &Path) -> Result<Vec<PathBuf>> {
        if !tokio::fs::try_exists(root).await? {
            return Ok(Vec::new());
        }
        let root = root.to_path_buf();
        Ok(tokio::task::spawn_blocking(move || walk_blocking(&root)).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_glob_skips_excluded_dirs() {
        let dir = tempdir().unwrap();
        let root = dir.path();
        fs::create_dir_all(root.join("entry/src/main")).unwrap();
        fs::create_dir_all(root.join("entry/build/default")).unwrap();
        fs::create_dir_all(root.join("oh_modules/lib")).unwrap();
        fs::write(root.join("entry/src/main/module.json5"), "{}").unwrap();
        fs::write(root.join("entry/build/default/module.json5"), "{}").unwrap();
        fs::write(root.join("oh_modules/lib/module.json5"), "{}").unwrap();
        fs::write(root.join("entry/src/main/other.json5"), "{}").unwrap();

        let found = DiskFileSystem::new()
            .glob(root, "**/module.json5", &GlobOptions::default())
            .await
            .unwrap();
        assert_eq!(found, vec![root.join("entry/src/main/module.json5")]);
    }

    #[tokio::test]
    async fn test_walk_files_recursive() {
        let dir = tempdir().unwrap();
        let root = dir.path();
        fs::create_dir_all(root.join("rawfile/nested/deeper")).unwrap();
        fs::write(root.join("rawfile/b.txt"), "b").unwrap();
        fs::write(root.join("rawfile/nested/deeper/a.bin"), "a").unwrap();

        let fs_ = DiskFileSystem::new();
        let files = fs_.walk_files(&root.join("rawfile")).await.unwrap();
        assert_eq!(
            files,
            vec![
                root.join("rawfile/b.txt"),
                root.join("rawfile/nested/deeper/a.bin"),
            ]
        );
        assert!(fs_.walk_files(&root.join("missing")).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_read_dir_sorted_and_missing() {
        let dir = tempdir().unwrap();
        fs::create_dir(dir.path().join("b")).unwrap();
        fs::write(dir.path().join("a.txt"), "x").unwrap();

        let fs_ = DiskFileSystem::new();
        let entries = fs_.read_dir(dir.path()).await.unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].file_name(), "a.txt");
        assert!(entries[0].is_file());
        assert!(entries[1].is_dir());

        assert!(fs_.read_dir(&dir.path().join("missing")).await.is_err());
        assert!(!fs_.exists(&dir.path().join("missing")).await);
    }
}
