use crate::context::ProjectContext;
use crate::view::{self, ItemRow};
use arkres_api::{ApiError, IndexItem, ResourceReference};
use arkres_core::config::Settings;
use std::path::PathBuf;

pub async fn run(
    path: PathBuf,
    reference: String,
    settings: Settings,
    json: bool,
) -> anyhow::Result<()> {
    let parsed = ResourceReference::parse(&reference)
        .ok_or_else(|| ApiError::InvalidReference(reference.clone()))?;
    let ctx = ProjectContext::open(&path, settings).await?;

    let locations = ctx.resolver.locations(&parsed).await;
    if locations.is_empty() {
        return Err(ApiError::NotFound(reference).into());
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&locations)?);
        return Ok(());
    }

    // one row per qualified variant
    let rows: Vec<ItemRow> = locations
        .into_iter()
        .map(|location| {
            let item = IndexItem {
                scope: parsed.scope,
                kind: parsed.kind,
                name: parsed.name.clone(),
                location,
            };
            ItemRow::new(&ctx, &item)
        })
        .collect();
    println!("{}", view::table(&rows));
    Ok(())
}
