//! Slug generation utilities for human-readable resource identifiers.
//!
//! ## Summary
//! Generates URL-safe slugs from resource names. Slugs are lowercase ASCII
//! alphanumerics separated by single hyphens. Accented characters keep their
//! base letter (`"Köln"` becomes `"koln"`).

use std::fmt;

use serde::{Deserialize, Serialize};
use unicode_normalization::UnicodeNormalization;
use unicode_normalization::char::is_combining_mark;

use crate::constants::DEFAULT_FALLBACK_SLUG;
use crate::error::{CoreError, CoreResult};

/// Normalize arbitrary text into a slug.
///
/// Decomposes the input (NFD), drops combining marks, lowercases, and turns
/// every run of characters outside `[a-z0-9]` into a single hyphen. Leading
/// and trailing hyphens are never emitted.
///
/// An empty result is valid: it means the input had nothing to keep.
///
/// Examples:
/// - "Masai Mara" -> "masai-mara"
/// - "  Café Köln!! " -> "cafe-koln"
/// - "!!!" -> ""
#[must_use]
pub fn normalize(text: &str) -> String {
    let mut slug = String::with_capacity(text.len());
    let mut pending_hyphen = false;

    for c in text
        .nfd()
        .filter(|c| !is_combining_mark(*c))
        .flat_map(char::to_lowercase)
    {
        if c.is_ascii_lowercase() || c.is_ascii_digit() {
            if pending_hyphen && !slug.is_empty() {
                slug.push('-');
            }
            pending_hyphen = false;
            slug.push(c);
        } else {
            pending_hyphen = true;
        }
    }

    slug
}

/// Build a slug candidate from a preferred name, falling back to a secondary
/// string (usually the record id) and finally to `default`.
#[must_use]
pub fn build_candidate(preferred: Option<&str>, fallback: Option<&str>, default: &str) -> String {
    [preferred, fallback]
        .into_iter()
        .flatten()
        .map(normalize)
        .find(|slug| !slug.is_empty())
        .unwrap_or_else(|| default.to_string())
}

/// [`build_candidate`] with the `"hotel"` default used by the hotel collection.
#[must_use]
pub fn build_hotel_candidate(preferred: Option<&str>, fallback: Option<&str>) -> String {
    build_candidate(preferred, fallback, DEFAULT_FALLBACK_SLUG)
}

/// Returns true if `value` is already in normalized slug form and non-empty.
#[must_use]
pub fn is_valid_slug(value: &str) -> bool {
    !value.is_empty()
        && !value.starts_with('-')
        && !value.ends_with('-')
        && !value.contains("--")
        && value
            .bytes()
            .all(|b| b.is_ascii_lowercase() || b.is_ascii_digit() || b == b'-')
}

/// A validated canonical slug.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Slug(String);

impl Slug {
    /// ## Summary
    /// Parses an already-normalized slug.
    ///
    /// ## Errors
    /// Returns `CoreError::InvalidSlug` if `value` contains characters
    /// outside `[a-z0-9-]`, is empty, or has leading, trailing, or doubled
    /// hyphens.
    pub fn parse(value: &str) -> CoreResult<Self> {
        if is_valid_slug(value) {
            Ok(Self(value.to_string()))
        } else {
            Err(CoreError::InvalidSlug(value.to_string()))
        }
    }

    /// Returns `{self}-{suffix}`. Used to break uniqueness collisions.
    #[must_use]
    pub fn with_suffix(&self, suffix: impl fmt::Display) -> Self {
        Self(format!("{}-{suffix}", self.0))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl TryFrom<String> for Slug {
    type Error = CoreError;

    fn try_from(value: String) -> CoreResult<Self> {
        if is_valid_slug(&value) {
            Ok(Self(value))
        } else {
            Err(CoreError::InvalidSlug(value))
        }
    }
}

impl From<Slug> for String {
    fn from(slug: Slug) -> Self {
        slug.0
    }
}

impl fmt::Display for Slug {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Slug {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
