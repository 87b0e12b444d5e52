//! System resource table shipped with the SDK.
//!
//! `sysResource.js` is a CommonJS module of the form
//! `module.exports.sys = { color: { ohos_id_color_foreground: 125829120, ... }, ... }`.

use crate::error::{ArkresError, Result};
use crate::fs::FileSystem;
use crate::parser::utils::{parse_typescript, walk_tree};
use crate::parser::{JsonNode, parse_json_at};
use crate::util::LineIndex;
use arkres_api::{IndexItem, ResourceKind, ResourceLocation, ResourceScope};
use std::path::{Path, PathBuf};

pub const SYS_RESOURCE_MANIFEST: [&str; 4] = ["ets", "build-tools", "ets-loader", "sysResource.js"];

pub fn manifest_path(sdk_path: &Path) -> PathBuf {
    SYS_RESOURCE_MANIFEST
        .iter()
        .fold(sdk_path.to_path_buf(), |path, segment| path.join(segment))
}

pub fn parse_sys_manifest(uri: &Path, text: &str) -> Result<Vec<IndexItem>> {
    let table = table_literal(text)?;
    let index = LineIndex::new(text);
    let mut items = Vec::new();

    for group in table.as_object().unwrap_or_default() {
        let Ok(kind) = group.key.parse::<ResourceKind>() else {
            tracing::debug!("Unknown system resource kind '{}'", group.key);
            continue;
        };
        for entry in group.value.as_object().unwrap_or_default() {
            items.push(IndexItem {
                scope: ResourceScope::Sys,
                kind,
                name: entry.key.clone(),
                location: ResourceLocation {
                    uri: uri.to_path_buf(),
                    range: Some(index.range(entry.key_span.start, entry.key_span.end)),
                    value: Some(entry.value.text(text).to_string()),
                },
            });
        }
    }
    Ok(items)
}

/// The first object literal in the file, lowered with spans into `text`.
fn table_literal(text: &str) -> Result<JsonNode> {
    let tree = parse_typescript(text)?;
    let mut span = None;
    walk_tree(tree.root_node(), |node| {
        if span.is_none() && node.kind() == "object" {
            span = Some((node.start_byte(), node.end_byte()));
        }
    });
    let (start, end) = span.ok_or_else(|| {
        ArkresError::Parsing("no object literal in system resource manifest".to_string())
    })?;
    let literal = text
        .get(start..end)
        .ok_or_else(|| ArkresError::Parsing("object literal is not on a char boundary".to_string()))?;
    parse_json_at(literal, start)
}

/// Loads the table once per resolver. Any failure leaves `sys` empty with a warning.
pub async fn load_sys_items(fs: &dyn FileSystem, sdk_path: Option<&Path>) -> Vec<IndexItem> {
    match read_sys_manifest(fs, sdk_path).await {
        Ok(items) => items,
        Err(e) => {
            tracing::warn!("System resources are unavailable: {}", e);
            Vec::new()
        }
    }
}

async fn read_sys_manifest(fs: &dyn FileSystem, sdk_path: Option<&Path>) -> Result<Vec<IndexItem>> {
    let sdk_path =
        sdk_path.ok_or_else(|| ArkresError::Config("no SDK path configured".to_string()))?;
    let manifest = manifest_path(sdk_path);
    if !fs.exists(&manifest).await {
        return Err(ArkresError::NotFound(format!(
            "system resource manifest {}",
            manifest.display()
        )));
    }
    let text = fs.read_to_string(&manifest).await?;
    parse_sys_manifest(&manifest, &text).map_err(|e| {
        ArkresError::Parsing(format!("{} is malformed: {}", manifest.display(), e))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_manifest() {
        let text = "module.exports.sys = {\n  color: {\n    ohos_id_color_foreground: 125829120,\n  },\n  bogus: { x: 1 },\n  float: { ohos_id_corner_radius: 125829121 }\n};\n";
        let items = parse_sys_manifest(Path::new("/sdk/sysResource.js"), text).unwrap();
        assert_eq!(items.len(), 2);
        let fg = &items[0];
        assert_eq!(fg.kind, ResourceKind::Color);
        assert_eq!(fg.name, "ohos_id_color_foreground");
        assert_eq!(fg.value(), Some("125829120"));
        let range = fg.location.range.unwrap();
        assert_eq!((range.start_line, range.start_col, range.end_col), (2, 4, 28));
        assert_eq!(items[1].kind, ResourceKind::Float);
    }

    #[test]
    fn test_manifest_path() {
        assert_eq!(
            manifest_path(Path::new("/sdk")),
            PathBuf::from("/sdk/ets/build-tools/ets-loader/sysResource.js")
        );
    }

    #[test]
    fn test_no_object() {
        assert!(parse_sys_manifest(Path::new("/x.js"), "module.exports.sys = 1;").is_err());
    }

    #[tokio::test]
    async fn test_manifest_failures_are_typed() {
        let fs = crate::fs::DiskFileSystem::new();
        let err = read_sys_manifest(&fs, None).await.unwrap_err();
        assert!(matches!(err, ArkresError::Config(_)));

        let dir = tempfile::tempdir().unwrap();
        let err = read_sys_manifest(&fs, Some(dir.path())).await.unwrap_err();
        assert!(matches!(err, ArkresError::NotFound(_)));

        let manifest = manifest_path(dir.path());
        std::fs::create_dir_all(manifest.parent().unwrap()).unwrap();
        std::fs::write(&manifest, "module.exports.sys = { color: { a: 1 }, float: { b: 2 } };").unwrap();
        let items = load_sys_items(&fs, Some(dir.path())).await;
        assert_eq!(items.len(), 2);
    }
}
