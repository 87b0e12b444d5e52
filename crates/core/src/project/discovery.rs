//! Layout rules for locating modules, products and resource roots.

use crate::error::{ArkresError, Result};
use crate::fs::{FileSystem, GlobOptions};
use crate::parser::{JsonNode, parse_json};
use std::path::{Component, Path, PathBuf};

pub const BUILD_PROFILE: &str = "build-profile.json5";
pub const PACKAGE_MANIFEST: &str = "oh-package.json5";
pub const MODULE_MANIFEST: &str = "module.json5";
pub const DEFAULT_TARGET: &str = "default";

const MODULE_SHAPE_KEYS: [&str; 3] = ["targets", "apiType", "buildOption"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProfileScope {
    Workspace,
    Module,
    Unknown,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildTarget {
    pub name: String,
    /// `resource.directories`, relative to the module root.
    pub resource_dirs: Vec<String>,
}

impl BuildTarget {
    pub fn named(name: &str) -> Self {
        Self {
            name: name.to_string(),
            resource_dirs: Vec::new(),
        }
    }
}

/// The parts of a `build-profile.json5` the resolver cares about.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildProfile {
    pub scope: ProfileScope,
    /// Module targets; `[default]` when none are declared.
    pub targets: Vec<BuildTarget>,
    /// `modules[].srcPath` of a workspace profile.
    pub module_paths: Vec<String>,
}

impl BuildProfile {
    pub fn parse(text: &str) -> Result<Self> {
        let root = parse_json(text)?;
        if !root.is_object() {
            return Err(ArkresError::Parsing(
                "build profile is not an object".to_string(),
            ));
        }

        let scope = classify(&root);
        let mut targets: Vec<BuildTarget> = root
            .get("targets")
            .and_then(JsonNode::as_array)
            .unwrap_or_default()
            .iter()
            .filter_map(parse_target)
            .collect();
        if targets.is_empty() {
            targets.push(BuildTarget::named(DEFAULT_TARGET));
        }

        let module_paths = root
            .get("modules")
            .and_then(JsonNode::as_array)
            .unwrap_or_default()
            .iter()
            .filter_map(|m| m.get("srcPath").and_then(JsonNode::as_str))
            .map(str::to_string)
            .collect();

        Ok(Self {
            scope,
            targets,
            module_paths,
        })
    }

    pub fn target(&self, name: &str) -> Option<&BuildTarget> {
        self.targets.iter().find(|t| t.name == name)
    }

    pub fn target_names(&self) -> Vec<&str> {
        self.targets.iter().map(|t| t.name.as_str()).collect()
    }
}

fn classify(root: &JsonNode) -> ProfileScope {
    let has_app = root.get("app").is_some();
    if !has_app && MODULE_SHAPE_KEYS.iter().any(|k| root.get(k).is_some()) {
        ProfileScope::Module
    } else if has_app {
        ProfileScope::Workspace
    } else {
        ProfileScope::Unknown
    }
}

fn parse_target(node: &JsonNode) -> Option<BuildTarget> {
    let name = node.get("name")?.as_str()?;
    let resource_dirs = node
        .get("resource")
        .and_then(|r| r.get("directories"))
        .and_then(JsonNode::as_array)
        .unwrap_or_default()
        .iter()
        .filter_map(JsonNode::as_str)
        .map(str::to_string)
        .collect();
    Some(BuildTarget {
        name: name.to_string(),
        resource_dirs,
    })
}

/// Whether a manifest at `relative` (module-root relative) belongs to `target`.
pub fn target_matches(target: &str, relative: &Path) -> bool {
    let wanted = if target == DEFAULT_TARGET { "main" } else { target };
    relative
        .components()
        .any(|c| matches!(c, Component::Normal(s) if s == wanted))
}

/// First target in declaration order owning the manifest.
pub fn match_target<'a>(targets: &'a [BuildTarget], relative: &Path) -> Option<&'a BuildTarget> {
    targets.iter().find(|t| target_matches(&t.name, relative))
}

pub fn resource_roots(module_root: &Path, target: &BuildTarget) -> Vec<PathBuf> {
    if !target.resource_dirs.is_empty() {
        return target
            .resource_dirs
            .iter()
            .map(|dir| normalize(&module_root.join(dir)))
            .collect();
    }
    let source_set = if target.name == DEFAULT_TARGET {
        "main"
    } else {
        target.name.as_str()
    };
    vec![module_root.join("src").join(source_set).join("resources")]
}

pub async fn load_build_profile(fs: &dyn FileSystem, dir: &Path) -> Option<BuildProfile> {
    let path = dir.join(BUILD_PROFILE);
    let text = match fs.read_to_string(&path).await {
        Ok(text) => text,
        Err(e) => {
            tracing::debug!("No build profile at {}: {}", path.display(), e);
            return None;
        }
    };
    match BuildProfile::parse(&text) {
        Ok(profile) => Some(profile),
        Err(e) => {
            tracing::warn!("Skipping malformed build profile {}: {}", path.display(), e);
            None
        }
    }
}

async fn is_module_dir(fs: &dyn FileSystem, dir: &Path) -> bool {
    let Some(profile) = load_build_profile(fs, dir).await else {
        return false;
    };
    profile.scope == ProfileScope::Module && fs.exists(&dir.join(PACKAGE_MANIFEST)).await
}

/// Module roots below `workspace_root`, sorted and deduplicated.
pub async fn discover_modules(fs: &dyn FileSystem, workspace_root: &Path) -> Vec<PathBuf> {
    let pattern = format!("**/{}", BUILD_PROFILE);
    let profiles = match fs.glob(workspace_root, &pattern, &GlobOptions::default()).await {
        Ok(paths) => paths,
        Err(e) => {
            tracing::warn!("Module scan failed under {}: {}", workspace_root.display(), e);
            return Vec::new();
        }
    };

    let mut candidates: Vec<PathBuf> = profiles
        .iter()
        .filter_map(|p| p.parent().map(Path::to_path_buf))
        .collect();

    // Modules may live outside the workspace tree and are then only reachable
    // through the workspace profile.
    if let Some(profile) = load_build_profile(fs, workspace_root).await {
        for src in &profile.module_paths {
            candidates.push(normalize(&workspace_root.join(src)));
        }
    }
    candidates.sort();
    candidates.dedup();

    let mut modules = Vec::new();
    for dir in candidates {
        if is_module_dir(fs, &dir).await {
            modules.push(dir);
        }
    }
    modules
}

/// `(manifest, target)` pairs for every product of a module.
pub async fn discover_products(
    fs: &dyn FileSystem,
    module_root: &Path,
    targets: &[BuildTarget],
) -> Vec<(PathBuf, String)> {
    let pattern = format!("**/{}", MODULE_MANIFEST);
    let manifests = match fs.glob(module_root, &pattern, &GlobOptions::default()).await {
        Ok(paths) => paths,
        Err(e) => {
            tracing::warn!("Product scan failed under {}: {}", module_root.display(), e);
            return Vec::new();
        }
    };
    manifests
        .into_iter()
        .filter_map(|manifest| {
            let relative = manifest.strip_prefix(module_root).ok()?;
            let target = match_target(targets, relative)?;
            Some((manifest.clone(), target.name.clone()))
        })
        .collect()
}

/// Lexically folds `.` and `..` so `./entry` and `entry` name the same node.
fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                out.pop();
            }
            other => out.push(other),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_profiles() {
        let module = BuildProfile::parse("{ apiType: 'stageMode', targets: [{ name: 'default' }] }").unwrap();
        assert_eq!(module.scope, ProfileScope::Module);

        let workspace = BuildProfile::parse(
            "{ app: { products: [] }, modules: [{ name: 'entry', srcPath: './entry' }] }",
        )
        .unwrap();
        assert_eq!(workspace.scope, ProfileScope::Workspace);
        assert_eq!(workspace.module_paths, vec!["./entry".to_string()]);

        // an `app` key wins over module-shaped keys
        let mixed = BuildProfile::parse("{ app: {}, targets: [] }").unwrap();
        assert_eq!(mixed.scope, ProfileScope::Workspace);

        assert_eq!(BuildProfile::parse("{}").unwrap().scope, ProfileScope::Unknown);
        assert!(BuildProfile::parse("[1]").is_err());
    }

    #[test]
    fn test_targets_default_and_resources() {
        let profile = BuildProfile::parse("{ buildOption: {} }").unwrap();
        assert_eq!(profile.target_names(), vec!["default"]);

        let profile = BuildProfile::parse(
            "{ targets: [{ name: 'default' }, { name: 'free', resource: { directories: ['./src/free/res', 'common/res'] } }] }",
        )
        .unwrap();
        let free = profile.target("free").unwrap();
        assert_eq!(free.resource_dirs.len(), 2);
        let roots = resource_roots(Path::new("/m"), free);
        assert_eq!(roots[1], PathBuf::from("/m/common/res"));
        assert_eq!(
            resource_roots(Path::new("/m"), profile.target("default").unwrap()),
            vec![PathBuf::from("/m/src/main/resources")]
        );
        assert_eq!(
            resource_roots(Path::new("/m"), &BuildTarget::named("ohosTest")),
            vec![PathBuf::from("/m/src/ohosTest/resources")]
        );
    }

    #[test]
    fn test_target_matching() {
        assert!(target_matches("default", Path::new("src/main/module.json5")));
        assert!(!target_matches("default", Path::new("src/mainline/module.json5")));
        assert!(target_matches("ohosTest", Path::new("src/ohosTest/module.json5")));
        assert!(!target_matches("ohosTest", Path::new("src/main/module.json5")));

        let targets = vec![BuildTarget::named("default"), BuildTarget::named("src")];
        // both match; declaration order decides
        let hit = match_target(&targets, Path::new("src/main/module.json5")).unwrap();
        assert_eq!(hit.name, "default");
    }

    #[test]
    fn test_normalize() {
        assert_eq!(normalize(Path::new("/ws/./entry")), PathBuf::from("/ws/entry"));
        assert_eq!(normalize(Path::new("/ws/a/../b")), PathBuf::from("/ws/b"));
    }
}
