use crate::context::ProjectContext;
use crate::view::{self, ItemRow};
use arkres_api::{ResourceKind, ResourceScope};
use arkres_core::config::Settings;
use std::path::PathBuf;

pub async fn run(
    path: PathBuf,
    keyword: String,
    scope: Option<ResourceScope>,
    kind: Option<ResourceKind>,
    settings: Settings,
    json: bool,
) -> anyhow::Result<()> {
    let ctx = ProjectContext::open(&path, settings).await?;
    let items = ctx.resolver.search(&keyword, scope, kind).await;

    if json {
        println!("{}", serde_json::to_string_pretty(&items)?);
        return Ok(());
    }
    if items.is_empty() {
        println!("No resources match '{}'.", keyword);
        return Ok(());
    }
    let rows: Vec<ItemRow> = items.iter().map(|item| ItemRow::new(&ctx, item)).collect();
    println!("{}", view::table(&rows));
    Ok(())
}
