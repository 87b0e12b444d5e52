mod check;
mod context;
mod index;
mod resolve;
mod search;
mod view;
mod watch;

use arkres_api::{ApiError, ApiResult, ResourceKind, ResourceScope};
use arkres_core::config::Settings;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "arkres",
    version,
    about = "Resource reference resolution for ArkTS projects",
    long_about = "Arkres indexes the resources an OpenHarmony / HarmonyOS project declares \
                  (element JSON, media, raw files) together with the SDK's system resources, \
                  and resolves, searches and checks `$r('scope.type.name')` references."
)]
pub struct Cli {
    /// SDK root holding the system resource manifest (falls back to ARKRES_SDK_PATH / OHOS_SDK_PATH)
    #[arg(long, global = true, value_name = "SDK_PATH")]
    pub sdk: Option<PathBuf>,

    /// Print JSON instead of tables
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the Language Server Protocol (LSP) server on stdio
    Lsp,
    /// Index a project and print resource counts
    Index {
        /// Path to the workspace root
        #[arg(value_name = "PROJECT_PATH")]
        path: PathBuf,
    },
    /// Resolve one reference such as `app.color.primary`
    Resolve {
        #[arg(value_name = "PROJECT_PATH")]
        path: PathBuf,
        #[arg(value_name = "REFERENCE")]
        reference: String,
    },
    /// Search resource names and values
    #[command(
        long_about = "Case-insensitive substring search over resource names and values. \
                      Name matches are listed before value matches."
    )]
    Search {
        #[arg(value_name = "PROJECT_PATH")]
        path: PathBuf,
        #[arg(value_name = "KEYWORD")]
        keyword: String,
        /// Restrict to `app` or `sys`
        #[arg(long, value_parser = parse_scope)]
        scope: Option<ResourceScope>,
        /// Restrict to one resource type, e.g. `color`
        #[arg(long = "type", value_parser = parse_kind)]
        kind: Option<ResourceKind>,
    },
    /// Report unresolved references in a source or element file
    Check {
        #[arg(value_name = "PROJECT_PATH")]
        path: PathBuf,
        #[arg(value_name = "FILE")]
        file: PathBuf,
    },
    /// Keep the index up to date while files change
    Watch {
        #[arg(value_name = "PROJECT_PATH")]
        path: PathBuf,
    },
}

fn parse_scope(s: &str) -> ApiResult<ResourceScope> {
    s.parse()
        .map_err(|_| ApiError::InvalidArgument(format!("unknown scope '{}', expected app or sys", s)))
}

fn parse_kind(s: &str) -> ApiResult<ResourceKind> {
    s.parse()
        .map_err(|_| ApiError::InvalidArgument(format!("unknown resource type '{}'", s)))
}

pub fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let component = match &cli.command {
        Commands::Lsp => "lsp",
        _ => "cli",
    };
    // stdout carries the protocol in lsp mode
    let _guard = arkres_core::logging::init_logging(component, !matches!(cli.command, Commands::Lsp));

    let settings = Settings {
        sdk_path: cli.sdk,
        ..Settings::default()
    };
    let json = cli.json;
    let rt = tokio::runtime::Runtime::new()?;

    match cli.command {
        Commands::Lsp => rt
            .block_on(arkres_lsp::run_server(settings))
            .map_err(|e| anyhow::anyhow!("LSP server failed: {}", e)),
        Commands::Index { path } => rt.block_on(index::run(path, settings, json)),
        Commands::Resolve { path, reference } => {
            rt.block_on(resolve::run(path, reference, settings, json))
        }
        Commands::Search {
            path,
            keyword,
            scope,
            kind,
        } => rt.block_on(search::run(path, keyword, scope, kind, settings, json)),
        Commands::Check { path, file } => rt.block_on(check::run(path, file, settings, json)),
        Commands::Watch { path } => rt.block_on(watch::run(path, settings)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_search_filters() {
        let cli = Cli::try_parse_from([
            "arkres", "search", "/p", "primary", "--scope", "app", "--type", "color", "--json",
        ])
        .unwrap();
        assert!(cli.json);
        match cli.command {
            Commands::Search { scope, kind, .. } => {
                assert_eq!(scope, Some(ResourceScope::App));
                assert_eq!(kind, Some(ResourceKind::Color));
            }
            _ => panic!("expected search"),
        }
        assert!(Cli::try_parse_from(["arkres", "search", "/p", "x", "--scope", "lib"]).is_err());
    }
}
