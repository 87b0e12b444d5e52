pub mod capabilities;
pub mod completion;
pub mod diagnostics;
pub mod goto;
pub mod indexer;
pub mod links;
pub mod util;

use crate::indexer::Indexer;
use crate::util::{apply_changes, uri_to_path, Document, DocumentKind};
use arkres_core::config::Settings;
use arkres_core::fs::{DiskFileSystem, FileSystem, OverlayFileSystem};
use arkres_core::project::ProjectModel;
use arkres_core::resource::ResourceResolver;
use dashmap::DashMap;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::RwLock;
use tokio_util::sync::CancellationToken;
use tower_lsp::jsonrpc::Result;
use tower_lsp::lsp_types::*;
use tower_lsp::{Client, LanguageServer};

/// The resolver and settings requests run against.
///
/// Cloning is cheap; handlers take a snapshot and release the lock before
/// doing any work.
#[derive(Clone)]
pub struct Session {
    pub resolver: Arc<ResourceResolver>,
    pub settings: Settings,
}

impl Session {
    pub fn new(model: Arc<ProjectModel>, settings: Settings) -> Self {
        let resolver = Arc::new(ResourceResolver::new(model, settings.resolved_sdk_path()));
        Self { resolver, settings }
    }
}

pub struct LspServer {
    client: Client,
    pub overlay: Arc<OverlayFileSystem>,
    pub model: Arc<ProjectModel>,
    pub session: Arc<RwLock<Session>>,
    pub documents: Arc<DashMap<Url, Arc<Document>>>,
    indexer: Indexer,
    defaults: Settings,
    watch_files: AtomicBool,
    cancel_token: CancellationToken,
}

impl LspServer {
    /// `defaults` fill in whatever the client's configuration leaves unset.
    pub fn new(client: Client, defaults: Settings) -> Self {
        let overlay = Arc::new(OverlayFileSystem::new(Arc::new(DiskFileSystem::new())));
        let fs: Arc<dyn FileSystem> = overlay.clone();
        let model = Arc::new(ProjectModel::new(fs));
        let documents = Arc::new(DashMap::new());
        let cancel_token = CancellationToken::new();
        Self {
            indexer: Indexer::new(client.clone(), documents.clone(), cancel_token.clone()),
            client,
            overlay,
            session: Arc::new(RwLock::new(Session::new(model.clone(), defaults.clone()))),
            model,
            documents,
            defaults,
            watch_files: AtomicBool::new(false),
            cancel_token,
        }
    }

    pub async fn session(&self) -> Session {
        self.session.read().await.clone()
    }

    fn settings_from(&self, value: Option<&serde_json::Value>) -> Settings {
        let mut settings = Settings::from_json(value);
        if settings.sdk_path.is_none() {
            settings.sdk_path = self.defaults.sdk_path.clone();
        }
        settings
    }

    async fn reindex(&self, reason: &'static str, force: bool) {
        self.indexer.spawn(self.session().await, reason, force);
    }

    async fn publish(&self, uri: &Url) {
        let session = self.session().await;
        diagnostics::publish(&self.client, &session, &self.documents, uri).await;
    }

    /// Mirrors an open element file into the overlay and drops the cached
    /// declarations it backs.
    fn sync_overlay(&self, uri: &Url, content: Option<&str>) -> bool {
        let Some(path) = uri_to_path(uri) else {
            return false;
        };
        match content {
            Some(text) => self.overlay.open(path.clone(), text),
            None => self.overlay.close(&path),
        }
        DocumentKind::of(uri) == DocumentKind::Element && !self.model.invalidate(&path).is_empty()
    }
}

#[tower_lsp::async_trait]
impl LanguageServer for LspServer {
    async fn initialize(&self, params: InitializeParams) -> Result<InitializeResult> {
        let settings = self.settings_from(params.initialization_options.as_ref());

        #[allow(deprecated)]
        let roots: Vec<PathBuf> = match params.workspace_folders {
            Some(folders) => folders
                .iter()
                .filter_map(|folder| uri_to_path(&folder.uri))
                .collect(),
            None => params
                .root_uri
                .as_ref()
                .and_then(uri_to_path)
                .into_iter()
                .collect(),
        };
        for root in roots {
            tracing::info!("Adding workspace {}", root.display());
            self.model.add_workspace(root);
        }

        *self.session.write().await = Session::new(self.model.clone(), settings);
        self.watch_files.store(
            capabilities::supports_watched_files(&params.capabilities),
            Ordering::SeqCst,
        );

        Ok(InitializeResult {
            server_info: Some(ServerInfo {
                name: "arkres".to_string(),
                version: Some(env!("CARGO_PKG_VERSION").to_string()),
            }),
            capabilities: capabilities::server_capabilities(),
        })
    }

    async fn initialized(&self, _: InitializedParams) {
        if self.watch_files.load(Ordering::SeqCst) {
            if let Err(e) = self
                .client
                .register_capability(vec![capabilities::watched_files_registration()])
                .await
            {
                self.client
                    .log_message(
                        MessageType::ERROR,
                        format!("Failed to register file watchers: {}", e),
                    )
                    .await;
            }
        }
        self.reindex("startup", true).await;
    }

    async fn shutdown(&self) -> Result<()> {
        self.cancel_token.cancel();
        Ok(())
    }

    async fn did_open(&self, params: DidOpenTextDocumentParams) {
        let uri = params.text_document.uri;
        let kind = DocumentKind::of(&uri);
        let content = params.text_document.text;

        let reindex = self.sync_overlay(&uri, Some(&content));
        self.documents.insert(
            uri.clone(),
            Arc::new(Document::new(content, kind, params.text_document.version)),
        );
        if reindex {
            self.reindex("element file opened", false).await;
        }
        self.publish(&uri).await;
    }

    async fn did_change(&self, params: DidChangeTextDocumentParams) {
        let uri = params.text_document.uri;
        let version = params.text_document.version;

        let content = {
            let Some(mut doc_ref) = self.documents.get_mut(&uri) else {
                return;
            };
            let doc = doc_ref.value_mut();
            let mut content = doc.content.clone();
            apply_changes(&mut content, &params.content_changes);
            *doc = Arc::new(Document::new(content.clone(), doc.kind, version));
            content
        };

        if self.sync_overlay(&uri, Some(&content)) {
            self.reindex("element file edited", false).await;
        }
        self.publish(&uri).await;
    }

    async fn did_save(&self, params: DidSaveTextDocumentParams) {
        let uri = params.text_document.uri;
        // no watchers report changes elsewhere in the tree
        if !self.watch_files.load(Ordering::SeqCst) {
            self.reindex("file saved", true).await;
        }
        self.publish(&uri).await;
    }

    async fn did_close(&self, params: DidCloseTextDocumentParams) {
        let uri = params.text_document.uri;
        self.client
            .log_message(MessageType::LOG, format!("LSP Event: did_close uri={}", uri))
            .await;
        self.documents.remove(&uri);
        // back to the on-disk content
        if self.sync_overlay(&uri, None) {
            self.reindex("element file closed", false).await;
        }
        diagnostics::clear(&self.client, uri).await;
    }

    async fn did_change_watched_files(&self, params: DidChangeWatchedFilesParams) {
        let mut changed = 0;
        for event in &params.changes {
            let Some(path) = uri_to_path(&event.uri) else {
                continue;
            };
            let owners = self.model.invalidate(&path);
            if !owners.is_empty() {
                tracing::debug!("{} invalidated {:?}", path.display(), owners);
                changed += 1;
            }
        }
        self.client
            .log_message(
                MessageType::LOG,
                format!(
                    "LSP Event: didChangeWatchedFiles {} events, {} invalidated",
                    params.changes.len(),
                    changed
                ),
            )
            .await;
        if changed > 0 {
            self.reindex("files changed", false).await;
        }
    }

    async fn did_change_workspace_folders(&self, params: DidChangeWorkspaceFoldersParams) {
        for folder in &params.event.removed {
            if let Some(root) = uri_to_path(&folder.uri) {
                self.model.remove_workspace(&root);
            }
        }
        for folder in &params.event.added {
            if let Some(root) = uri_to_path(&folder.uri) {
                self.model.add_workspace(root);
            }
        }
        self.reindex("workspace folders changed", true).await;
    }

    async fn did_change_configuration(&self, params: DidChangeConfigurationParams) {
        let settings = self.settings_from(Some(&params.settings));
        let sdk_path = settings.resolved_sdk_path();

        let rebuild = {
            let mut session = self.session.write().await;
            if session.settings == settings {
                return;
            }
            let rebuild = session.resolver.sdk_path() != sdk_path.as_deref();
            if rebuild {
                *session = Session::new(self.model.clone(), settings);
            } else {
                session.settings = settings;
            }
            rebuild
        };

        self.client
            .log_message(MessageType::INFO, "Configuration changed")
            .await;
        if rebuild {
            self.reindex("SDK path changed", true).await;
        } else {
            let session = self.session().await;
            diagnostics::publish_all(&self.client, &session, &self.documents).await;
        }
    }

    async fn completion(&self, params: CompletionParams) -> Result<Option<CompletionResponse>> {
        let uri = &params.text_document_position.text_document.uri;
        let pos = params.text_document_position.position;
        self.client
            .log_message(
                MessageType::LOG,
                format!(
                    "LSP Request: textDocument/completion uri={} pos={}:{}",
                    uri, pos.line, pos.character
                ),
            )
            .await;
        let result = completion::completion(self, params).await;
        match &result {
            Ok(Some(CompletionResponse::List(list))) => {
                self.client
                    .log_message(
                        MessageType::LOG,
                        format!("LSP Response: {} completion items", list.items.len()),
                    )
                    .await
            }
            Ok(_) => {
                self.client
                    .log_message(MessageType::LOG, "LSP Response: no completion")
                    .await
            }
            Err(e) => {
                self.client
                    .log_message(MessageType::ERROR, format!("LSP Error: {}", e))
                    .await
            }
        }
        result
    }

    async fn goto_definition(
        &self,
        params: GotoDefinitionParams,
    ) -> Result<Option<GotoDefinitionResponse>> {
        let uri = &params.text_document_position_params.text_document.uri;
        let pos = params.text_document_position_params.position;
        self.client
            .log_message(
                MessageType::LOG,
                format!(
                    "LSP Request: textDocument/definition uri={} pos={}:{}",
                    uri, pos.line, pos.character
                ),
            )
            .await;
        let result = goto::definition(self, params).await;
        match &result {
            Ok(Some(resp)) => {
                let count = match resp {
                    GotoDefinitionResponse::Scalar(_) => 1,
                    GotoDefinitionResponse::Array(v) => v.len(),
                    GotoDefinitionResponse::Link(v) => v.len(),
                };
                self.client
                    .log_message(
                        MessageType::LOG,
                        format!("LSP Response: found {} locations", count),
                    )
                    .await;
            }
            Ok(None) => {
                self.client
                    .log_message(MessageType::LOG, "LSP Response: no definition found")
                    .await
            }
            Err(e) => {
                self.client
                    .log_message(MessageType::ERROR, format!("LSP Error: {}", e))
                    .await
            }
        }
        result
    }

    async fn document_link(&self, params: DocumentLinkParams) -> Result<Option<Vec<DocumentLink>>> {
        self.client
            .log_message(
                MessageType::LOG,
                format!(
                    "LSP Request: textDocument/documentLink uri={}",
                    params.text_document.uri
                ),
            )
            .await;
        let result = links::document_links(self, params).await;
        if let Ok(Some(links)) = &result {
            self.client
                .log_message(
                    MessageType::LOG,
                    format!("LSP Response: found {} links", links.len()),
                )
                .await;
        }
        result
    }
}

pub async fn run_server(defaults: Settings) -> std::result::Result<(), Box<dyn std::error::Error>> {
    let stdin = tokio::io::stdin();
    let stdout = tokio::io::stdout();

    let (service, socket) =
        tower_lsp::LspService::new(move |client| LspServer::new(client, defaults.clone()));
    tower_lsp::Server::new(stdin, stdout, socket)
        .serve(service)
        .await;

    Ok(())
}
