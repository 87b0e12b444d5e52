use crate::context::ProjectContext;
use crate::view::{self, KindCountRow};
use arkres_api::ResourceScope;
use arkres_core::config::Settings;
use serde_json::json;
use std::collections::BTreeMap;
use std::path::PathBuf;

pub async fn run(path: PathBuf, settings: Settings, json: bool) -> anyhow::Result<()> {
    let ctx = ProjectContext::open(&path, settings).await?;

    let mut rows = Vec::new();
    for scope in ResourceScope::ALL {
        let mut counts = BTreeMap::new();
        for item in ctx.resolver.list_by_type(Some(scope), None).await {
            *counts.entry(item.kind).or_insert(0) += 1;
        }
        rows.extend(counts.into_iter().map(|(kind, count)| KindCountRow {
            scope: scope.to_string(),
            kind: kind.to_string(),
            count,
        }));
    }

    if json {
        let modules: Vec<String> = ctx
            .model
            .all_modules(false)
            .await
            .into_iter()
            .filter_map(|id| ctx.model.uri(id))
            .map(|uri| ctx.display_path(&uri))
            .collect();
        let out = json!({
            "root": ctx.root,
            "summary": ctx.summary,
            "modules": modules,
            "kinds": rows,
        });
        println!("{}", serde_json::to_string_pretty(&out)?);
        return Ok(());
    }

    println!(
        "Indexed {} app and {} sys resources in {:?}",
        ctx.summary.app, ctx.summary.sys, ctx.summary.elapsed
    );
    if !rows.is_empty() {
        println!("{}", view::table(&rows));
    }
    Ok(())
}
