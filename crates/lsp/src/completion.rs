use crate::util::{from_lsp_position, to_lsp_range, DocumentKind};
use crate::LspServer;
use arkres_api::{CandidateKind, CompletionCandidate, ResourceKind};
use arkres_core::features;
use tower_lsp::jsonrpc::Result;
use tower_lsp::lsp_types::*;

pub async fn completion(
    server: &LspServer,
    params: CompletionParams,
) -> Result<Option<CompletionResponse>> {
    let uri = params.text_document_position.text_document.uri;
    let position = params.text_document_position.position;

    let doc = match server.documents.get(&uri) {
        Some(d) => d.clone(),
        None => return Ok(None),
    };
    if doc.kind != DocumentKind::Source {
        return Ok(None);
    }

    let session = server.session().await;
    let Some(list) = features::completion(
        &session.resolver,
        &session.settings,
        &doc.content,
        from_lsp_position(position),
    )
    .await
    else {
        return Ok(None);
    };

    let replace = list.replace_range.map(to_lsp_range);
    let items = list
        .items
        .into_iter()
        .map(|candidate| to_completion_item(candidate, replace))
        .collect();
    Ok(Some(CompletionResponse::List(CompletionList {
        is_incomplete: list.is_incomplete,
        items,
    })))
}

fn to_completion_item(candidate: CompletionCandidate, replace: Option<Range>) -> CompletionItem {
    let kind = match candidate.kind {
        CandidateKind::Scope => CompletionItemKind::MODULE,
        CandidateKind::Type => CompletionItemKind::ENUM,
        CandidateKind::Name(ResourceKind::Color) => CompletionItemKind::COLOR,
        CandidateKind::Name(ResourceKind::Media) => CompletionItemKind::FILE,
        CandidateKind::Name(_) => CompletionItemKind::CONSTANT,
    };
    CompletionItem {
        label: candidate.label,
        kind: Some(kind),
        detail: candidate.detail,
        filter_text: Some(candidate.filter_text),
        text_edit: replace.map(|range| {
            CompletionTextEdit::Edit(TextEdit {
                range,
                new_text: candidate.insert_text.clone(),
            })
        }),
        insert_text: Some(candidate.insert_text),
        ..Default::default()
    }
}
