use crate::util::{path_to_uri, to_lsp_range, DocumentKind};
use crate::LspServer;
use arkres_core::features;
use tower_lsp::jsonrpc::Result;
use tower_lsp::lsp_types::*;

pub async fn document_links(
    server: &LspServer,
    params: DocumentLinkParams,
) -> Result<Option<Vec<DocumentLink>>> {
    let doc = match server.documents.get(&params.text_document.uri) {
        Some(d) => d.clone(),
        None => return Ok(None),
    };
    if doc.kind != DocumentKind::Source {
        return Ok(None);
    }

    let session = server.session().await;
    let links = features::document_links(&session.resolver, &session.settings, &doc.content)
        .await
        .into_iter()
        .map(|link| DocumentLink {
            range: to_lsp_range(link.range),
            target: path_to_uri(&link.target),
            tooltip: link.tooltip,
            data: None,
        })
        .collect();
    Ok(Some(links))
}
