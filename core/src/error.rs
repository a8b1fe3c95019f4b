//! Error taxonomy shared by every lookup operation.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// The reason a lookup failed.
///
/// Serialized as the wire code (`"BAD_INPUT"`, `"NOT_FOUND"`, ...). Upstream
/// error details are logged where they occur and never carried in here.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LookupError {
    /// Input failed shape, length or charset validation before any external access.
    #[error("invalid input")]
    BadInput,

    /// The dictionary service has no entry for the word.
    #[error("no dictionary entry")]
    NotFound,

    /// The dictionary service was unreachable, answered non-2xx, or sent a
    /// malformed body.
    #[error("dictionary service unavailable")]
    UpstreamError,

    /// Resolution succeeded but produced no reading usable as a key.
    #[error("no usable reading")]
    NoBestGuess,

    /// The reading key is well-formed but no indexed phrase matches it.
    #[error("no matching phrases")]
    NoSuggestions,
}

impl LookupError {
    /// Wire code, identical to the serde representation.
    pub fn code(self) -> &'static str {
        match self {
            Self::BadInput => "BAD_INPUT",
            Self::NotFound => "NOT_FOUND",
            Self::UpstreamError => "UPSTREAM_ERROR",
            Self::NoBestGuess => "NO_BEST_GUESS",
            Self::NoSuggestions => "NO_SUGGESTIONS",
        }
    }

    /// Short label for display to end users.
    pub fn label(self) -> &'static str {
        match self {
            Self::BadInput => "Please enter a single character",
            Self::NotFound => "Not found in dictionary",
            Self::UpstreamError => "Dictionary unavailable, try again later",
            Self::NoBestGuess => "No reading available",
            Self::NoSuggestions => "No matching idioms",
        }
    }

    /// Status code used at the HTTP boundary.
    pub fn http_status(self) -> u16 {
        match self {
            Self::BadInput => 400,
            Self::NotFound | Self::NoSuggestions => 404,
            Self::NoBestGuess => 422,
            Self::UpstreamError => 502,
        }
    }
}

/// Result alias for lookup operations.
pub type Result<T> = std::result::Result<T, LookupError>;
