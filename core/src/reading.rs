//! Reading normalization.
//!
//! The dictionary service annotates some readings with a fullwidth
//! parenthesized usage note, e.g. `（語音）ㄨㄛˇ` for the colloquial reading.
//! Those notes are stripped before a reading is stored or used as a key.

use std::collections::HashSet;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use unicode_normalization::UnicodeNormalization;

use crate::error::{LookupError, Result};

/// Longest accepted input, in code points.
pub const MAX_INPUT_CHARS: usize = 64;

static LEADING_ANNOTATIONS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(?:（[^）]*）\s*)+").expect("annotation pattern is valid"));

/// Trim `raw` and drop any leading `（…）` annotation blocks.
///
/// A `（` without a closing `）` is not an annotation and is kept.
pub fn normalize(raw: &str) -> String {
    let s = raw.trim();
    LEADING_ANNOTATIONS.replace(s, "").trim().to_string()
}

/// Remove repeated values, keeping each first occurrence in place.
pub fn dedup_preserve_order<I, S>(values: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let mut seen = HashSet::new();
    let mut out = Vec::new();
    for v in values {
        let v = v.into();
        if seen.insert(v.clone()) {
            out.push(v);
        }
    }
    out
}

/// Trim, length-check and NFC-normalize a user supplied word.
///
/// The limit applies to the code points as given, before composition.
pub fn clean_word(raw: &str) -> Result<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || trimmed.chars().count() > MAX_INPUT_CHARS {
        return Err(LookupError::BadInput);
    }
    Ok(trimmed.nfc().collect())
}

/// All known readings of a word, in dictionary order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WordReading {
    word: String,
    readings: Vec<String>,
    best_guess: Option<String>,
}

impl WordReading {
    /// Build from raw annotations: normalize, drop empties, dedup.
    ///
    /// The first surviving reading becomes the best guess.
    pub fn from_raw<I, S>(word: impl Into<String>, raw: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let readings = dedup_preserve_order(
            raw.into_iter()
                .map(|r| normalize(r.as_ref()))
                .filter(|r| !r.is_empty()),
        );
        let best_guess = readings.first().cloned();
        Self {
            word: word.into(),
            readings,
            best_guess,
        }
    }

    pub fn word(&self) -> &str {
        &self.word
    }

    pub fn readings(&self) -> &[String] {
        &self.readings
    }

    pub fn best_guess(&self) -> Option<&str> {
        self.best_guess.as_deref()
    }

    pub fn is_empty(&self) -> bool {
        self.readings.is_empty()
    }

    pub fn into_parts(self) -> (String, Vec<String>, Option<String>) {
        (self.word, self.readings, self.best_guess)
    }
}
