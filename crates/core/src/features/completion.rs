use super::{CallTarget, calls_of};
use crate::config::Settings;
use crate::resource::ResourceResolver;
use crate::util::LineIndex;
use arkres_api::{CompletionList, Position, Range};

/// Completion for a cursor strictly inside the string argument of a resource call.
pub async fn completion(
    resolver: &ResourceResolver,
    settings: &Settings,
    source: &str,
    position: Position,
) -> Option<CompletionList> {
    let call = calls_of(source, settings, CallTarget::Resource)
        .into_iter()
        .find(|call| call.literal && call.argument_range.strictly_contains(position))?;

    let index = LineIndex::new(source);
    // skip the opening quote or backtick
    let start = index.offset(call.argument_range.start()) + 1;
    let cursor = index.offset(position);
    let partial = source.get(start..cursor)?;

    // the segment being typed starts after the last dot
    let segment_start = start + partial.rfind('.').map(|dot| dot + 1).unwrap_or(0);
    let replace_range = Range::new(index.position(segment_start), position);

    Some(CompletionList {
        is_incomplete: false,
        items: resolver.complete(partial).await,
        replace_range: Some(replace_range),
    })
}
