use crate::util::{to_lsp_diagnostic, uri_to_path, Document};
use crate::Session;
use arkres_core::features;
use dashmap::DashMap;
use std::sync::Arc;
use tower_lsp::lsp_types::Url;
use tower_lsp::Client;

/// Computes and publishes diagnostics for one open document.
///
/// Results computed for a version the editor has already moved past are dropped.
pub async fn publish(
    client: &Client,
    session: &Session,
    documents: &DashMap<Url, Arc<Document>>,
    uri: &Url,
) {
    let Some(doc) = documents.get(uri).map(|d| d.value().clone()) else {
        return;
    };
    let Some(path) = uri_to_path(uri) else {
        return;
    };

    let diagnostics =
        features::diagnose(&session.resolver, &session.settings, &path, &doc.content).await;

    let current = documents.get(uri).map(|d| d.version);
    if current != Some(doc.version) {
        tracing::debug!("Dropping stale diagnostics for {} v{}", uri, doc.version);
        return;
    }

    client
        .publish_diagnostics(
            uri.clone(),
            diagnostics.into_iter().map(to_lsp_diagnostic).collect(),
            Some(doc.version),
        )
        .await;
}

pub async fn publish_all(
    client: &Client,
    session: &Session,
    documents: &DashMap<Url, Arc<Document>>,
) {
    let uris: Vec<Url> = documents.iter().map(|entry| entry.key().clone()).collect();
    for uri in &uris {
        publish(client, session, documents, uri).await;
    }
}

pub async fn clear(client: &Client, uri: Url) {
    client.publish_diagnostics(uri, Vec::new(), None).await;
}
