use crate::util::{from_lsp_position, path_to_uri, to_lsp_range, DocumentKind};
use crate::LspServer;
use arkres_core::features;
use tower_lsp::jsonrpc::Result;
use tower_lsp::lsp_types::*;

pub async fn definition(
    server: &LspServer,
    params: GotoDefinitionParams,
) -> Result<Option<GotoDefinitionResponse>> {
    let uri = params.text_document_position_params.text_document.uri;
    let position = params.text_document_position_params.position;

    let doc = match server.documents.get(&uri) {
        Some(d) => d.clone(),
        None => return Ok(None),
    };
    if doc.kind != DocumentKind::Source {
        return Ok(None);
    }

    let session = server.session().await;
    let links = features::definition(
        &session.resolver,
        &session.settings,
        &doc.content,
        from_lsp_position(position),
    )
    .await;

    let links: Vec<LocationLink> = links
        .into_iter()
        .filter_map(|link| {
            let target_uri = path_to_uri(&link.target_uri)?;
            let target_range = link.target_range.map(to_lsp_range).unwrap_or_default();
            Some(LocationLink {
                origin_selection_range: Some(to_lsp_range(link.origin_selection_range)),
                target_uri,
                target_range,
                target_selection_range: target_range,
            })
        })
        .collect();

    if links.is_empty() {
        return Ok(None);
    }
    Ok(Some(GotoDefinitionResponse::Link(links)))
}
