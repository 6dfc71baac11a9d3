use std::borrow::Cow;

use percent_encoding::percent_decode_str;

/// A request for a resource detail page: `/<collection>/<segment>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetailPath<'a> {
    pub collection: &'a str,
    /// Percent-decoded path segment.
    pub segment: Cow<'a, str>,
}

impl<'a> DetailPath<'a> {
    /// ## Summary
    /// Parses `/<collection>/<segment>` where `collection` satisfies
    /// `is_monitored`. A single trailing slash is tolerated; anything deeper,
    /// an empty segment, or a segment that does not decode to UTF-8 yields
    /// `None`.
    #[must_use]
    pub fn parse(path: &'a str, is_monitored: impl Fn(&str) -> bool) -> Option<Self> {
        let rest = path.strip_prefix('/')?;
        let rest = rest.strip_suffix('/').unwrap_or(rest);
        let (collection, segment) = rest.split_once('/')?;

        if collection.is_empty() || segment.is_empty() || segment.contains('/') {
            return None;
        }
        if !is_monitored(collection) {
            return None;
        }
        let segment = percent_decode_str(segment).decode_utf8().ok()?;

        Some(Self {
            collection,
            segment,
        })
    }
}

/// Builds the canonical detail path for a record.
#[must_use]
pub fn detail_path(collection: &str, slug: &str) -> String {
    format!("/{collection}/{slug}")
}
