use crate::context::ProjectContext;
use crate::view::{self, DiagnosticRow};
use anyhow::Context;
use arkres_api::{ResourceDiagnostic, Severity};
use arkres_core::config::Settings;
use arkres_core::features;
use std::path::PathBuf;

pub async fn run(path: PathBuf, file: PathBuf, settings: Settings, json: bool) -> anyhow::Result<()> {
    let text = tokio::fs::read_to_string(&file)
        .await
        .with_context(|| format!("Cannot read {}", file.display()))?;
    let file = file.canonicalize().unwrap_or(file);
    let ctx = ProjectContext::open(&path, settings).await?;

    let diagnostics = features::diagnose(&ctx.resolver, &ctx.settings, &file, &text).await;

    if json {
        println!("{}", serde_json::to_string_pretty(&diagnostics)?);
    } else if diagnostics.is_empty() {
        println!("{}: no problems found", ctx.display_path(&file));
    } else {
        println!("{}", ctx.display_path(&file));
        let rows: Vec<DiagnosticRow> = diagnostics.iter().map(DiagnosticRow::from).collect();
        println!("{}", view::table(&rows));
    }

    let errors = error_count(&diagnostics);
    if errors > 0 {
        anyhow::bail!("{} error(s) in {}", errors, ctx.display_path(&file));
    }
    Ok(())
}

fn error_count(diagnostics: &[ResourceDiagnostic]) -> usize {
    diagnostics
        .iter()
        .filter(|d| d.severity == Severity::Error)
        .count()
}
