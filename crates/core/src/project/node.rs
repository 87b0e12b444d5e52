use super::cache::NodeCache;
use std::fmt;
use std::path::PathBuf;

/// Handle of a node in the [`ProjectModel`](super::ProjectModel) arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub(crate) u32);

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Classification of a resource root's immediate subdirectory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DirectoryKind {
    RawFile,
    ResFile,
    /// A qualified directory such as `base`, `dark` or `en_US`.
    ResourceGroup,
}

impl DirectoryKind {
    pub fn classify(dir_name: &str) -> Self {
        match dir_name {
            "rawfile" => DirectoryKind::RawFile,
            "resfile" => DirectoryKind::ResFile,
            _ => DirectoryKind::ResourceGroup,
        }
    }

    /// Raw and res file directories hold opaque files only.
    pub fn holds_raw_files(&self) -> bool {
        matches!(self, DirectoryKind::RawFile | DirectoryKind::ResFile)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    Workspace,
    Module,
    Product,
    Resource,
    ResourceDirectory(DirectoryKind),
    ElementDirectory,
    ElementFile,
    MediaDirectory,
    MediaFile,
    RawFile,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum NodePayload {
    #[default]
    None,
    /// Build target a product or resource root was derived from.
    Target(String),
}

impl NodePayload {
    pub fn target(&self) -> Option<&str> {
        match self {
            NodePayload::Target(name) => Some(name),
            NodePayload::None => None,
        }
    }
}

pub(crate) struct Node {
    pub kind: NodeKind,
    pub uri: PathBuf,
    pub parent: Option<NodeId>,
    pub payload: NodePayload,
    pub children: Vec<NodeId>,
    pub cache: NodeCache,
}

/// Read-only snapshot of a node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeInfo {
    pub id: NodeId,
    pub kind: NodeKind,
    pub uri: PathBuf,
    pub parent: Option<NodeId>,
    pub payload: NodePayload,
}

impl NodeInfo {
    pub fn name(&self) -> &str {
        self.uri
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or_default()
    }

    /// File name without extension, which is the resource name of a media file.
    pub fn stem(&self) -> &str {
        self.uri
            .file_stem()
            .and_then(|n| n.to_str())
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_directories() {
        assert_eq!(DirectoryKind::classify("base"), DirectoryKind::ResourceGroup);
        assert_eq!(DirectoryKind::classify("en_US"), DirectoryKind::ResourceGroup);
        assert_eq!(DirectoryKind::classify("dark"), DirectoryKind::ResourceGroup);
        assert_eq!(DirectoryKind::classify("rawfile"), DirectoryKind::RawFile);
        assert_eq!(DirectoryKind::classify("resfile"), DirectoryKind::ResFile);
        assert!(DirectoryKind::ResFile.holds_raw_files());
        assert!(!DirectoryKind::ResourceGroup.holds_raw_files());
    }
}
