//! RFC 5988 `Link` header parsing.
//!
//! GitHub advertises pagination as
//! `<https://api.github.com/user/1/starred?per_page=100&page=2>; rel="next", <...&page=9>; rel="last"`.
//! Malformed entries are dropped one at a time; the parser never fails.

use url::Url;

use super::types::PageCursor;

/// Parse a `Link` header value into a [`PageCursor`].
///
/// An absent or empty header yields an empty cursor.
pub fn parse_link_header(header: Option<&str>) -> PageCursor {
    let mut cursor = PageCursor::default();
    let Some(header) = header else {
        return cursor;
    };

    for entry in header.split(',') {
        let segments: Vec<&str> = entry.split(';').map(str::trim).collect();
        if segments.len() < 2 {
            if !entry.trim().is_empty() {
                tracing::trace!(entry, "Skipping link entry without parameters");
            }
            continue;
        }

        let page = extract_page_from_target(segments[0]);
        let rel = segments[1..].iter().find_map(|s| extract_rel(s));

        match (rel.as_deref(), page) {
            (Some("first"), Some(page)) => cursor.first = Some(page),
            (Some("prev"), Some(page)) => cursor.prev = Some(page),
            (Some("next"), Some(page)) => cursor.next = Some(page),
            (Some("last"), Some(page)) => cursor.last = Some(page),
            _ => tracing::trace!(entry, "Dropping unusable link entry"),
        }
    }

    cursor
}

/// Extract the positive `page` query parameter from a `<url>` target.
fn extract_page_from_target(target: &str) -> Option<u32> {
    let raw = target.trim();
    let raw = raw.strip_prefix('<').unwrap_or(raw);
    let raw = raw.strip_suffix('>').unwrap_or(raw);

    let url = Url::parse(raw.trim()).ok()?;
    let (_, value) = url.query_pairs().find(|(key, _)| key == "page")?;
    value.trim().parse::<u32>().ok().filter(|page| *page > 0)
}

/// Extract the relation name from a `rel="name"` parameter.
fn extract_rel(segment: &str) -> Option<String> {
    let (key, value) = segment.split_once('=')?;
    if !key.trim().eq_ignore_ascii_case("rel") {
        return None;
    }

    let name = value.trim().trim_matches('"').trim();
    if name.is_empty() {
        None
    } else {
        Some(name.to_ascii_lowercase())
    }
}
