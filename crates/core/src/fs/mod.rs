//! Abstract file system consumed by the project model.
//!
//! Every accessor in the model goes through [`FileSystem`], so the language
//! server can put an [`OverlayFileSystem`] in front of the disk and have
//! unsaved editor buffers win over on-disk content.

mod disk;
mod overlay;

pub use disk::DiskFileSystem;
pub use overlay::OverlayFileSystem;

use crate::error::Result;
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

/// Directories never worth descending into when globbing a project.
pub const DEFAULT_GLOB_EXCLUDES: [&str; 6] = [
    "build",
    "oh_modules",
    "node_modules",
    ".hvigor",
    ".git",
    ".idea",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileKind {
    File,
    Directory,
    Other,
}

#[derive(Debug, Clone)]
pub struct FileStat {
    pub kind: FileKind,
    pub size: u64,
    pub modified: Option<SystemTime>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirEntry {
    pub path: PathBuf,
    pub kind: FileKind,
}

impl DirEntry {
    pub fn is_dir(&self) -> bool {
        self.kind == FileKind::Directory
    }

    pub fn is_file(&self) -> bool {
        self.kind == FileKind::File
    }

    pub fn file_name(&self) -> &str {
        self.path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or_default()
    }
}

#[derive(Debug, Clone)]
pub struct GlobOptions {
    /// Directory names pruned from the walk.
    pub exclude_dirs: Vec<String>,
    pub max_depth: Option<usize>,
}

impl Default for GlobOptions {
    fn default() -> Self {
        Self {
            exclude_dirs: DEFAULT_GLOB_EXCLUDES.iter().map(|s| s.to_string()).collect(),
            max_depth: None,
        }
    }
}

#[async_trait]
pub trait FileSystem: Send + Sync {
    async fn exists(&self, path: &Path) -> bool;

    async fn stat(&self, path: &Path) -> Result<FileStat>;

    /// Immediate children of a directory, sorted by path.
    async fn read_dir(&self, path: &Path) -> Result<Vec<DirEntry>>;

    /// Files under `root` whose root-relative path matches `pattern`
    /// (gitignore-style glob, e.g. `**/module.json5`), sorted by path.
    async fn glob(&self, root: &Path, pattern: &str, options: &GlobOptions) -> Result<Vec<PathBuf>>;

    async fn read_to_string(&self, path: &Path) -> Result<String>;

    async fn is_dir(&self, path: &Path) -> bool {
        matches!(self.stat(path).await, Ok(stat) if stat.kind == FileKind::Directory)
    }

    /// Every file below `root`, depth first, sorted by path.
    async fn walk_files(&self, root: &Path) -> Result<Vec<PathBuf>> {
        self.glob(root, "**/*", &GlobOptions {
            exclude_dirs: Vec::new(),
            max_depth: None,
        })
        .await
    }
}
