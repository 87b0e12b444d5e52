use crate::context::ProjectContext;
use arkres_api::{IndexItem, ResourceDiagnostic, ResourceLocation};
use serde::Serialize;
use tabled::settings::Style;
use tabled::{Table, Tabled};

#[derive(Tabled, Serialize)]
pub struct KindCountRow {
    #[tabled(rename = "Scope")]
    pub scope: String,
    #[tabled(rename = "Type")]
    pub kind: String,
    #[tabled(rename = "Count")]
    pub count: usize,
}

#[derive(Tabled)]
pub struct ItemRow {
    #[tabled(rename = "Reference")]
    pub reference: String,
    #[tabled(rename = "Value")]
    pub value: String,
    #[tabled(rename = "Location")]
    pub location: String,
}

impl ItemRow {
    pub fn new(ctx: &ProjectContext, item: &IndexItem) -> Self {
        Self {
            reference: item.key().to_string(),
            value: item.value().map(shorten).unwrap_or_else(|| "-".to_string()),
            location: location(ctx, &item.location),
        }
    }
}

#[derive(Tabled)]
pub struct DiagnosticRow {
    #[tabled(rename = "Pos")]
    pub position: String,
    #[tabled(rename = "Severity")]
    pub severity: String,
    #[tabled(rename = "Code")]
    pub code: String,
    #[tabled(rename = "Message")]
    pub message: String,
}

impl From<&ResourceDiagnostic> for DiagnosticRow {
    fn from(d: &ResourceDiagnostic) -> Self {
        Self {
            position: format!("{}:{}", d.range.start_line + 1, d.range.start_col + 1),
            severity: format!("{:?}", d.severity).to_lowercase(),
            code: d.code.to_string(),
            message: d.message.clone(),
        }
    }
}

/// `file:line` for a location, one-based.
pub fn location(ctx: &ProjectContext, location: &ResourceLocation) -> String {
    let path = ctx.display_path(&location.uri);
    match location.range {
        Some(range) => format!("{}:{}", path, range.start_line + 1),
        None => path,
    }
}

pub fn table<T: Tabled>(rows: &[T]) -> String {
    Table::new(rows).with(Style::psql()).to_string()
}

fn shorten(value: &str) -> String {
    const MAX: usize = 48;
    let single_line = value.replace('\n', " ");
    if single_line.chars().count() <= MAX {
        return single_line;
    }
    let cut: String = single_line.chars().take(MAX - 3).collect();
    format!("{}...", cut)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shorten() {
        assert_eq!(shorten("#007DFF"), "#007DFF");
        let long = "x".repeat(60);
        let short = shorten(&long);
        assert_eq!(short.chars().count(), 48);
        assert!(short.ends_with("..."));
    }
}
