//! JSON bodies returned to callers of the lookup service.
//!
//! Every body carries `ok`; failures add the error code and echo the input
//! they were about. Upstream error text never appears here.

use serde::{Deserialize, Serialize};
use zhuyin_core::{LookupError, PhraseSuggestion, PhraseSuggestions, WordReading};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WordToZhuyinOk {
    pub ok: bool,
    pub word: String,
    pub zhuyin: Vec<String>,
    pub best_guess: Option<String>,
}

impl From<WordReading> for WordToZhuyinOk {
    fn from(reading: WordReading) -> Self {
        let (word, zhuyin, best_guess) = reading.into_parts();
        Self {
            ok: true,
            word,
            zhuyin,
            best_guess,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KeySuggestionsOk {
    pub ok: bool,
    pub key_no_tone: String,
    pub suggestions: Vec<PhraseSuggestion>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PhraseSuggestionsOk {
    pub ok: bool,
    #[serde(flatten)]
    pub result: PhraseSuggestions,
}

/// Failure body. Exactly one of `word` / `key_no_tone` is set, depending on
/// what the caller asked about.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LookupFailure {
    pub ok: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub word: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key_no_tone: Option<String>,
    pub error: LookupError,
}

impl LookupFailure {
    pub fn for_word(word: &str, error: LookupError) -> Self {
        Self {
            ok: false,
            word: Some(word.trim().to_string()),
            key_no_tone: None,
            error,
        }
    }

    pub fn for_key(key: &str, error: LookupError) -> Self {
        Self {
            ok: false,
            word: None,
            key_no_tone: Some(key.trim().to_string()),
            error,
        }
    }
}

/// An HTTP status and the JSON body to send with it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    pub status: u16,
    pub body: String,
}

impl Reply {
    pub fn json<T: Serialize>(status: u16, value: &T) -> Self {
        match serde_json::to_string(value) {
            Ok(body) => Self { status, body },
            Err(e) => {
                tracing::error!(error = %e, "serializing reply failed");
                Self {
                    status: 500,
                    body: r#"{"ok":false}"#.to_string(),
                }
            }
        }
    }

    pub fn failure(failure: LookupFailure) -> Self {
        Self::json(failure.error.http_status(), &failure)
    }
}

pub fn word_to_zhuyin_reply(word: &str, result: zhuyin_core::error::Result<WordReading>) -> Reply {
    match result {
        Ok(reading) => Reply::json(200, &WordToZhuyinOk::from(reading)),
        Err(e) => Reply::failure(LookupFailure::for_word(word, e)),
    }
}

pub fn key_suggestions_reply(
    key: &str,
    result: zhuyin_core::error::Result<Vec<PhraseSuggestion>>,
) -> Reply {
    match result {
        Ok(suggestions) => Reply::json(
            200,
            &KeySuggestionsOk {
                ok: true,
                key_no_tone: key.trim().to_string(),
                suggestions,
            },
        ),
        Err(e) => Reply::failure(LookupFailure::for_key(key, e)),
    }
}

pub fn phrase_suggestions_reply(
    word: &str,
    result: zhuyin_core::error::Result<PhraseSuggestions>,
) -> Reply {
    match result {
        Ok(result) => Reply::json(200, &PhraseSuggestionsOk { ok: true, result }),
        Err(e) => Reply::failure(LookupFailure::for_word(word, e)),
    }
}
