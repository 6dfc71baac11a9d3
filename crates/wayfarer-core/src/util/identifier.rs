//! Record identifiers and the heuristic separating them from slugs.
//!
//! ## Summary
//! Storage assigns each record a 20-character alphanumeric id. Request paths
//! carry either that id or a human slug, and nothing in the path says which.
//! [`looks_like_generated_id`] guesses from the shape: a 20-character slug
//! made only of letters and digits (no hyphen) is misclassified as an id.
//! Callers treat the classification as a hint, not a guarantee.

use std::fmt;

use crate::constants::GENERATED_ID_LEN;

const ID_ALPHABET: &[u8; 62] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789";

/// Largest multiple of the alphabet size that fits in a byte; bytes at or
/// above it are rejected to keep the distribution uniform.
const REJECT_AT: u8 = 248;

/// Returns true if `segment` has the shape of a generated record id:
/// exactly 20 ASCII letters or digits.
#[must_use]
pub fn looks_like_generated_id(segment: &str) -> bool {
    segment.len() == GENERATED_ID_LEN && segment.bytes().all(|b| b.is_ascii_alphanumeric())
}

/// Generate a new record id in the same shape storage uses.
#[must_use]
pub fn generate_id() -> String {
    let mut id = String::with_capacity(GENERATED_ID_LEN);

    while id.len() < GENERATED_ID_LEN {
        let bytes = uuid::Uuid::new_v4().into_bytes();
        // Bytes 6 and 8 carry the version and variant bits.
        for (idx, byte) in bytes.into_iter().enumerate() {
            if idx == 6 || idx == 8 || byte >= REJECT_AT {
                continue;
            }
            id.push(char::from(ID_ALPHABET[usize::from(byte) % ID_ALPHABET.len()]));
            if id.len() == GENERATED_ID_LEN {
                break;
            }
        }
    }

    id
}

/// A path segment classified as either a generated id or a slug.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Identifier {
    /// Backend-generated id (e.g., "AbCdEfGhIj1234567890")
    Id(String),
    /// Human-readable slug (e.g., "masai-mara-lodge")
    Slug(String),
}

impl Identifier {
    /// Classify a raw path segment by shape.
    #[must_use]
    pub fn classify(segment: &str) -> Self {
        if looks_like_generated_id(segment) {
            Self::Id(segment.to_string())
        } else {
            Self::Slug(segment.to_string())
        }
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Id(value) | Self::Slug(value) => value,
        }
    }

    #[must_use]
    pub const fn is_id(&self) -> bool {
        matches!(self, Self::Id(_))
    }
}

impl From<&str> for Identifier {
    fn from(segment: &str) -> Self {
        Self::classify(segment)
    }
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
