//! Content-language compatibility between a stored entry and a new request.

use super::entry::CachedEntry;
use crate::http::{HeaderAliases, HeaderField, HttpRequest};

/// Language ranges from an Accept-Language value, lowercased, `q=0` ranges dropped
fn accepted_ranges(value: &str) -> Vec<String> {
    value
        .split(',')
        .filter_map(|part| {
            let mut pieces = part.split(';');
            let range = pieces.next()?.trim().to_ascii_lowercase();
            let rejected = pieces.any(|param| {
                param
                    .trim()
                    .strip_prefix("q=")
                    .and_then(|q| q.trim().parse::<f32>().ok())
                    .is_some_and(|q| q <= 0.0)
            });
            (!range.is_empty() && !rejected).then_some(range)
        })
        .collect()
}

fn primary_subtag(tag: &str) -> &str {
    tag.split(['-', '_']).next().unwrap_or(tag)
}

/// Whether `entry` may be served to `request` as far as languages are concerned
pub fn is_language_compatible(
    entry: &CachedEntry,
    request: &HttpRequest,
    aliases: &HeaderAliases,
) -> bool {
    let Some(accept) = aliases.get(&request.headers, HeaderField::AcceptLanguage) else {
        return true;
    };
    let accepted = accepted_ranges(accept);
    if accepted.is_empty() || accepted.iter().any(|range| range == "*") {
        return true;
    }

    match aliases.get(&entry.headers, HeaderField::ContentLanguage) {
        Some(content_language) => content_language
            .split(',')
            .map(|tag| tag.trim().to_ascii_lowercase())
            .filter(|tag| !tag.is_empty())
            .any(|tag| {
                accepted
                    .iter()
                    .any(|range| primary_subtag(range) == primary_subtag(&tag))
            }),
        None => match entry.metadata.accept_language.as_deref() {
            Some(stored) => accepted_ranges(stored) == accepted,
            None => true,
        },
    }
}
