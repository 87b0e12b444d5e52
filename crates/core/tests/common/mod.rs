#![allow(dead_code)]

use arkres_core::fs::{DiskFileSystem, FileSystem};
use arkres_core::project::ProjectModel;
use arkres_core::resource::ResourceResolver;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tempfile::TempDir;

pub const RESOURCES: &str = "entry/src/main/resources";

/// A small on-disk project: one `entry` module with `base`, `dark` and
/// `en_US` resource groups, a `rawfile` and a `resfile` directory, a fake SDK,
/// and a few decoys that discovery has to skip.
pub struct Fixture {
    _dir: TempDir,
    pub root: PathBuf,
    pub sdk: PathBuf,
}

impl Fixture {
    pub fn new() -> Self {
        let dir = tempfile::tempdir().unwrap();
        let base = dir.path().to_path_buf();
        let fixture = Self {
            root: base.join("project"),
            sdk: base.join("sdk"),
            _dir: dir,
        };
        fixture.populate();
        fixture
    }

    fn populate(&self) {
        self.write(
            "build-profile.json5",
            r#"{
  app: { products: [{ name: "default", signingConfig: "default" }] },
  modules: [{ name: "entry", srcPath: "./entry", targets: [{ name: "default", applyToProducts: ["default"] }] }],
}"#,
        );
        self.write(
            "entry/build-profile.json5",
            r#"{
  // module profile
  apiType: "stageMode",
  buildOption: {},
  targets: [{ name: "default", runtimeOS: "HarmonyOS" }],
}"#,
        );
        self.write("entry/oh-package.json5", r#"{ name: "entry", version: "1.0.0" }"#);
        self.write("entry/src/main/module.json5", r#"{ module: { name: "entry", type: "entry" } }"#);
        self.write("entry/src/ohosTest/module.json5", r#"{ module: { name: "entry_test", type: "feature" } }"#);
        self.write("entry/build/default/intermediates/module.json5", "{}");
        self.write(
            "entry/src/main/ets/pages/Index.ets",
            "Text('hi').fontColor($r('app.color.primary_color'))\n",
        );

        // decoys: excluded directory, missing package manifest
        self.write("oh_modules/dep/build-profile.json5", r#"{ apiType: "stageMode" }"#);
        self.write("oh_modules/dep/oh-package.json5", "{}");
        self.write("scratch/build-profile.json5", r#"{ apiType: "stageMode" }"#);

        self.resource(
            "base/element/color.json",
            r##"{
  "color": [
    { "name": "primary_color", "value": "#007DFF" },
    { "name": "bg_color", "value": "#F1F3F5" }
  ]
}"##,
        );
        self.resource(
            "base/element/string.json",
            r#"{
  "string": [
    { "name": "app_name", "value": "Arkres Demo" },
    { "name": "greeting", "value": "Hello" }
  ]
}"#,
        );
        self.resource("base/element/broken.json", r#"{ "color": [ { "name": "#);
        self.resource(
            "dark/element/color.json",
            r##"{ "color": [{ "name": "primary_color", "value": "#0A59F7" }] }"##,
        );
        self.resource(
            "en_US/element/string.json",
            r#"{ "string": [{ "name": "farewell", "value": "Bye" }] }"#,
        );
        self.resource("base/media/icon.png", "png");
        self.resource("rawfile/data.txt", "raw");
        self.resource("rawfile/config/settings.json", "{}");
        self.resource(
            "rawfile/element/color.json",
            r##"{ "color": [{ "name": "raw_only_color", "value": "#000000" }] }"##,
        );
        self.resource("resfile/cert.pem", "pem");

        self.write_sdk(
            "module.exports.sys = {\n  color: {\n    ohos_id_color_foreground: 125829120,\n    ohos_id_color_background: 125829121,\n  },\n  float: {\n    ohos_id_corner_radius_default_m: 125829122,\n  },\n};\n",
        );
    }

    pub fn path(&self, relative: &str) -> PathBuf {
        self.root.join(relative)
    }

    pub fn resources(&self) -> PathBuf {
        self.root.join(RESOURCES)
    }

    pub fn resource_path(&self, relative: &str) -> PathBuf {
        self.resources().join(relative)
    }

    pub fn write(&self, relative: &str, content: &str) {
        write_file(&self.root.join(relative), content);
    }

    pub fn resource(&self, relative: &str, content: &str) {
        write_file(&self.resource_path(relative), content);
    }

    pub fn write_sdk(&self, content: &str) {
        write_file(
            &self.sdk.join("ets/build-tools/ets-loader/sysResource.js"),
            content,
        );
    }

    pub fn model(&self) -> Arc<ProjectModel> {
        self.model_with(Arc::new(DiskFileSystem::new()))
    }

    pub fn model_with(&self, fs: Arc<dyn FileSystem>) -> Arc<ProjectModel> {
        let model = Arc::new(ProjectModel::new(fs));
        model.add_workspace(self.root.clone());
        model
    }

    /// A resolver with the index already built.
    pub async fn resolver(&self) -> ResourceResolver {
        let resolver = ResourceResolver::new(self.model(), Some(self.sdk.clone()));
        resolver.build_index(true).await;
        resolver
    }
}

fn write_file(path: &Path, content: &str) {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).unwrap();
    }
    std::fs::write(path, content).unwrap();
}
