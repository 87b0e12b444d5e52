//! Editor-facing services over the call-site finder and the resolver.

pub mod completion;
pub mod diagnostics;
pub mod navigation;

pub use completion::completion;
pub use diagnostics::{diagnose, element_diagnostics, source_diagnostics};
pub use navigation::{definition, document_links};

use crate::config::Settings;
use crate::parser::find_calls;
use crate::project::DirectoryKind;
use arkres_api::CallSite;
use std::path::Path;

pub const SOURCE_EXTENSIONS: [&str; 2] = ["ets", "ts"];

pub fn is_source_file(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| SOURCE_EXTENSIONS.contains(&ext))
}

/// A `.json` file directly inside an `element` directory that is not
/// itself under a raw file directory.
pub fn is_element_file(path: &Path) -> bool {
    let Some(element_dir) = path.parent() else {
        return false;
    };
    path.extension().is_some_and(|ext| ext == "json")
        && element_dir.file_name().is_some_and(|name| name == "element")
        && !element_dir
            .ancestors()
            .skip(1)
            .filter_map(|dir| dir.file_name().and_then(|name| name.to_str()))
            .take_while(|name| *name != "resources")
            .any(|name| DirectoryKind::classify(name).holds_raw_files())
}

/// Which call a call site belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallTarget {
    Resource,
    RawFile,
}

/// Calls to the configured resource function, or nothing if the source does not parse.
pub(crate) fn calls_of(source: &str, settings: &Settings, target: CallTarget) -> Vec<CallSite> {
    let identifier = match target {
        CallTarget::Resource => settings.resource_function.as_str(),
        CallTarget::RawFile => settings.rawfile_function.as_str(),
    };
    match find_calls(source, identifier) {
        Ok(calls) => calls,
        Err(e) => {
            tracing::debug!("Call scan for {} failed: {}", identifier, e);
            Vec::new()
        }
    }
}
