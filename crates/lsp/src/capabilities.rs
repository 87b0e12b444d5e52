use tower_lsp::lsp_types::*;

pub const WATCHED_FILES_REGISTRATION_ID: &str = "arkres-watched-files";

/// Globs for the files that shape the project tree: build profiles, element
/// JSON and anything under media or rawfile directories. Deleting a directory
/// only reports the directory itself, so qualifier directories and their
/// immediate children are watched as entries too.
pub const WATCHED_GLOBS: [&str; 6] = [
    "**/*.json5",
    "**/*.json",
    "**/media/**",
    "**/rawfile/**",
    "**/resources/*",
    "**/resources/*/*",
];

pub fn server_capabilities() -> ServerCapabilities {
    ServerCapabilities {
        text_document_sync: Some(TextDocumentSyncCapability::Options(
            TextDocumentSyncOptions {
                open_close: Some(true),
                change: Some(TextDocumentSyncKind::INCREMENTAL),
                save: Some(TextDocumentSyncSaveOptions::Supported(true)),
                ..Default::default()
            },
        )),
        completion_provider: Some(CompletionOptions {
            trigger_characters: Some(
                [".", "'", "\"", "`"].iter().map(|c| c.to_string()).collect(),
            ),
            resolve_provider: Some(false),
            ..Default::default()
        }),
        definition_provider: Some(OneOf::Left(true)),
        document_link_provider: Some(DocumentLinkOptions {
            resolve_provider: Some(false),
            work_done_progress_options: Default::default(),
        }),
        workspace: Some(WorkspaceServerCapabilities {
            workspace_folders: Some(WorkspaceFoldersServerCapabilities {
                supported: Some(true),
                change_notifications: Some(OneOf::Left(true)),
            }),
            file_operations: None,
        }),
        ..Default::default()
    }
}

/// Dynamic registration for `workspace/didChangeWatchedFiles`.
pub fn watched_files_registration() -> Registration {
    let watchers = WATCHED_GLOBS
        .iter()
        .map(|glob| FileSystemWatcher {
            glob_pattern: GlobPattern::String(glob.to_string()),
            kind: None,
        })
        .collect();
    Registration {
        id: WATCHED_FILES_REGISTRATION_ID.to_string(),
        method: "workspace/didChangeWatchedFiles".to_string(),
        register_options: serde_json::to_value(DidChangeWatchedFilesRegistrationOptions {
            watchers,
        })
        .ok(),
    }
}

/// Whether the client lets the server register file watchers at runtime.
pub fn supports_watched_files(capabilities: &ClientCapabilities) -> bool {
    capabilities
        .workspace
        .as_ref()
        .and_then(|w| w.did_change_watched_files.as_ref())
        .and_then(|c| c.dynamic_registration)
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_incremental_sync_and_triggers() {
        let caps = server_capabilities();
        let Some(TextDocumentSyncCapability::Options(sync)) = caps.text_document_sync else {
            panic!("expected sync options");
        };
        assert_eq!(sync.change, Some(TextDocumentSyncKind::INCREMENTAL));
        let triggers = caps.completion_provider.unwrap().trigger_characters.unwrap();
        assert!(triggers.contains(&".".to_string()));
        assert!(triggers.contains(&"'".to_string()));
    }

    #[test]
    fn test_watched_files_registration() {
        let registration = watched_files_registration();
        assert_eq!(registration.method, "workspace/didChangeWatchedFiles");
        let options = registration.register_options.unwrap();
        assert_eq!(options["watchers"].as_array().unwrap().len(), WATCHED_GLOBS.len());
        assert_eq!(options["watchers"][0]["globPattern"], "**/*.json5");
        let globs: Vec<_> = options["watchers"]
            .as_array()
            .unwrap()
            .iter()
            .filter_map(|w| w["globPattern"].as_str())
            .collect();
        assert!(globs.contains(&"**/resources/*"));
        assert!(globs.contains(&"**/resources/*/*"));
    }
}
