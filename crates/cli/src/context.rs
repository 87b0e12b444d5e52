use anyhow::Context;
use arkres_core::config::Settings;
use arkres_core::fs::{DiskFileSystem, FileSystem};
use arkres_core::project::ProjectModel;
use arkres_core::resource::{IndexSummary, ResourceResolver};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::info;

/// An indexed project opened from the command line.
pub struct ProjectContext {
    pub root: PathBuf,
    pub model: Arc<ProjectModel>,
    pub resolver: ResourceResolver,
    pub settings: Settings,
    pub summary: IndexSummary,
}

impl ProjectContext {
    pub async fn open(path: &Path, settings: Settings) -> anyhow::Result<Self> {
        let root = path
            .canonicalize()
            .with_context(|| format!("Cannot open project at {}", path.display()))?;

        let fs: Arc<dyn FileSystem> = Arc::new(DiskFileSystem::new());
        let model = Arc::new(ProjectModel::new(fs));
        model.add_workspace(root.clone());

        let sdk_path = settings.resolved_sdk_path();
        if sdk_path.is_none() {
            info!("No SDK path given, system resources are skipped");
        }
        let resolver = ResourceResolver::new(model.clone(), sdk_path);

        info!("Indexing project at: {}...", root.display());
        let summary = resolver.build_index(true).await;
        info!(
            "Indexing complete in {:?}: {} app, {} sys",
            summary.elapsed, summary.app, summary.sys
        );

        Ok(Self {
            root,
            model,
            resolver,
            settings,
            summary,
        })
    }

    /// `path` relative to the project root when it lies inside it.
    pub fn display_path(&self, path: &Path) -> String {
        path.strip_prefix(&self.root)
            .unwrap_or(path)
            .display()
            .to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn write(root: &Path, relative: &str, content: &str) {
        let path = root.join(relative);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    #[tokio::test]
    async fn test_open_indexes_project() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().join("project");
        write(
            &root,
            "build-profile.json5",
            r#"{ modules: [{ name: "entry", srcPath: "./entry" }] }"#,
        );
        write(&root, "entry/build-profile.json5", r#"{ apiType: "stageMode" }"#);
        write(&root, "entry/oh-package.json5", "{}");
        write(&root, "entry/src/main/module.json5", "{}");
        write(
            &root,
            "entry/src/main/resources/base/element/color.json",
            r##"{ "color": [{ "name": "primary_color", "value": "#007DFF" }] }"##,
        );

        let settings = Settings {
            sdk_path: Some(dir.path().join("missing-sdk")),
            ..Settings::default()
        };
        let ctx = ProjectContext::open(&root, settings).await.unwrap();
        assert_eq!(ctx.summary.app, 1);
        assert_eq!(ctx.summary.sys, 0);

        let location = ctx.resolver.resolve("app.color.primary_color").await.unwrap();
        assert_eq!(
            ctx.display_path(&location.uri),
            Path::new("entry/src/main/resources/base/element/color.json")
                .display()
                .to_string()
        );
    }

    #[tokio::test]
    async fn test_open_missing_project_fails() {
        let dir = tempfile::tempdir().unwrap();
        let result = ProjectContext::open(&dir.path().join("nope"), Settings::default()).await;
        assert!(result.is_err());
    }
}
