//! Word -> Zhuyin lookups against the Moedict JSON API.
//!
//! `GET {base}/a/{word}.json` answers with an entry whose `h` array lists one
//! object per heteronym (distinct pronunciation); each may carry its Zhuyin
//! reading in `b`:
//!
//! ```json
//! { "t": "我", "h": [ { "b": "ㄨㄛˇ", "d": [...] } ] }
//! ```
//!
//! Uses the blocking `reqwest` client; there is no async runtime.
//! One request per lookup and no retries; successful lookups may be served
//! from a small in-process cache for up to the configured TTL.

use std::num::NonZeroUsize;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use lru::LruCache;
use reqwest::header::ACCEPT;
use reqwest::StatusCode;
use serde_json::Value;
use zhuyin_core::error::Result;
use zhuyin_core::{clean_word, LookupError, ReadingResolver, WordReading};

use crate::config::ZhuyinConfig;

struct CachedReading {
    reading: WordReading,
    stored_at: Instant,
}

struct ReadingCache {
    entries: Mutex<LruCache<String, CachedReading>>,
    ttl: Duration,
}

impl ReadingCache {
    fn new(capacity: usize, ttl: Duration) -> Option<Self> {
        if ttl.is_zero() {
            return None;
        }
        let capacity = NonZeroUsize::new(capacity)?;
        Some(Self {
            entries: Mutex::new(LruCache::new(capacity)),
            ttl,
        })
    }

    fn get(&self, word: &str) -> Option<WordReading> {
        let mut entries = self.entries.lock().ok()?;
        match entries.get(word) {
            Some(hit) if hit.stored_at.elapsed() < self.ttl => return Some(hit.reading.clone()),
            Some(_) => {}
            None => return None,
        }
        entries.pop(word);
        None
    }

    fn put(&self, word: String, reading: WordReading) {
        if let Ok(mut entries) = self.entries.lock() {
            entries.put(
                word,
                CachedReading {
                    reading,
                    stored_at: Instant::now(),
                },
            );
        }
    }
}

/// Dictionary client for resolving words to their Zhuyin readings.
pub struct DictionaryClient {
    base_url: String,
    client: reqwest::blocking::Client,
    cache: Option<ReadingCache>,
}

impl DictionaryClient {
    /// Create a client from the service configuration.
    pub fn new(config: &ZhuyinConfig) -> std::result::Result<Self, reqwest::Error> {
        let client = reqwest::blocking::Client::builder()
            .timeout(config.timeout())
            .build()?;
        Ok(Self {
            base_url: config.dictionary_url.trim_end_matches('/').to_string(),
            client,
            cache: ReadingCache::new(config.cache_capacity, config.cache_ttl()),
        })
    }

    /// Create an uncached client for `base_url` with the default timeout.
    pub fn with_base_url(base_url: &str) -> std::result::Result<Self, reqwest::Error> {
        let config = ZhuyinConfig {
            dictionary_url: base_url.to_string(),
            cache_ttl_secs: 0,
            ..ZhuyinConfig::default()
        };
        Self::new(&config)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn is_caching(&self) -> bool {
        self.cache.is_some()
    }

    /// Request URL for an already cleaned word.
    pub fn entry_url(&self, word: &str) -> String {
        format!("{}/a/{}.json", self.base_url, urlencoding::encode(word))
    }

    /// Resolve `word` to its readings.
    ///
    /// Validation happens before any network access. Errors are never cached.
    pub fn lookup(&self, word: &str) -> Result<WordReading> {
        let word = clean_word(word)?;

        if let Some(hit) = self.cache.as_ref().and_then(|c| c.get(&word)) {
            tracing::debug!(%word, "dictionary cache hit");
            return Ok(hit);
        }

        let reading = self.fetch(&word)?;
        if let Some(cache) = &self.cache {
            cache.put(word, reading.clone());
        }
        Ok(reading)
    }

    fn fetch(&self, word: &str) -> Result<WordReading> {
        let url = self.entry_url(word);
        tracing::debug!(%url, "dictionary request");

        let response = self
            .client
            .get(&url)
            .header(ACCEPT, "application/json")
            .send()
            .map_err(|e| {
                tracing::warn!(%word, error = %e, "dictionary request failed");
                LookupError::UpstreamError
            })?;

        // The status alone decides these; the body is not read.
        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Err(LookupError::NotFound);
        }
        if !status.is_success() {
            tracing::warn!(%word, %status, "dictionary returned an error status");
            return Err(LookupError::UpstreamError);
        }

        let body = response.text().map_err(|e| {
            tracing::warn!(%word, error = %e, "reading dictionary response failed");
            LookupError::UpstreamError
        })?;

        readings_from_response(word, status, &body)
    }
}

impl ReadingResolver for DictionaryClient {
    fn resolve(&self, word: &str) -> Result<WordReading> {
        self.lookup(word)
    }
}

/// Interpret a dictionary response for `word`.
///
/// 404 means the word is unknown; any other non-2xx or an unparseable body is
/// an upstream failure. A well-formed body without usable readings is treated
/// as unknown.
pub fn readings_from_response(word: &str, status: StatusCode, body: &str) -> Result<WordReading> {
    if status == StatusCode::NOT_FOUND {
        return Err(LookupError::NotFound);
    }
    if !status.is_success() {
        tracing::warn!(%word, %status, "dictionary returned an error status");
        return Err(LookupError::UpstreamError);
    }

    let json: Value = serde_json::from_str(body).map_err(|e| {
        tracing::warn!(%word, error = %e, "malformed dictionary response");
        LookupError::UpstreamError
    })?;

    let reading = WordReading::from_raw(word, extract_annotations(&json));
    if reading.is_empty() {
        return Err(LookupError::NotFound);
    }
    Ok(reading)
}

/// Non-blank `h[*].b` strings, in order. Anything shaped differently is skipped.
fn extract_annotations(json: &Value) -> Vec<&str> {
    json.get("h")
        .and_then(Value::as_array)
        .map(|heteronyms| {
            heteronyms
                .iter()
                .filter_map(|h| h.get("b").and_then(Value::as_str))
                .filter(|b| !b.trim().is_empty())
                .collect()
        })
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn entry_url_percent_encodes() {
        let client = DictionaryClient::with_base_url("https://www.moedict.tw/").unwrap();
        assert_eq!(
            client.entry_url("我"),
            "https://www.moedict.tw/a/%E6%88%91.json"
        );
        assert_eq!(client.entry_url("a b"), "https://www.moedict.tw/a/a%20b.json");
    }

    #[test]
    fn with_base_url_disables_cache() {
        let client = DictionaryClient::with_base_url("http://localhost").unwrap();
        assert!(!client.is_caching());
        assert!(DictionaryClient::new(&ZhuyinConfig::default()).unwrap().is_caching());
    }

    #[test]
    fn bad_input_skips_network() {
        // Any request to this host would come back as UpstreamError.
        let client = DictionaryClient::with_base_url("http://192.0.2.1:9").unwrap();
        assert_eq!(client.lookup("   "), Err(LookupError::BadInput));
        assert_eq!(client.lookup(&"字".repeat(65)), Err(LookupError::BadInput));
    }

    #[test]
    fn response_with_annotations() {
        let body = r#"{"t":"我","h":[{"b":"（語音）ㄨㄛˇ"},{"b":"ㄨㄛˇ"},{"b":"ㄜˇ"}]}"#;
        let reading = readings_from_response("我", StatusCode::OK, body).unwrap();
        assert_eq!(reading.readings(), &["ㄨㄛˇ".to_string(), "ㄜˇ".to_string()]);
        assert_eq!(reading.best_guess(), Some("ㄨㄛˇ"));
        assert_eq!(reading.word(), "我");
    }

    #[test]
    fn response_status_mapping() {
        assert_eq!(
            readings_from_response("龘", StatusCode::NOT_FOUND, ""),
            Err(LookupError::NotFound)
        );
        assert_eq!(
            readings_from_response("我", StatusCode::INTERNAL_SERVER_ERROR, "{}"),
            Err(LookupError::UpstreamError)
        );
        assert_eq!(
            readings_from_response("我", StatusCode::FORBIDDEN, "{}"),
            Err(LookupError::UpstreamError)
        );
    }

    #[test]
    fn malformed_body_is_upstream_error() {
        assert_eq!(
            readings_from_response("我", StatusCode::OK, "<html>"),
            Err(LookupError::UpstreamError)
        );
    }

    #[test]
    fn unusable_shapes_are_not_found() {
        for body in [
            "{}",
            r#"{"h":"ㄨㄛˇ"}"#,
            r#"{"h":[]}"#,
            r#"{"h":[{"b":42},{"b":"  "},"x",{"d":[]}]}"#,
            r#"{"h":[{"b":"（語音）"}]}"#,
            "[]",
            "null",
        ] {
            assert_eq!(
                readings_from_response("我", StatusCode::OK, body),
                Err(LookupError::NotFound),
                "body: {body}"
            );
        }
    }

    #[test]
    fn mixed_entries_keep_good_ones() {
        let body = r#"{"h":[{"b":null},{"b":"ㄒㄧㄥˊ"},{"b":"ㄏㄤˊ"}]}"#;
        let reading = readings_from_response("行", StatusCode::OK, body).unwrap();
        assert_eq!(reading.readings().len(), 2);
        assert_eq!(reading.best_guess(), Some("ㄒㄧㄥˊ"));
    }

    #[test]
    fn cache_expires_entries() {
        let cache = ReadingCache::new(4, Duration::from_millis(20)).unwrap();
        cache.put("我".into(), WordReading::from_raw("我", ["ㄨㄛˇ"]));
        assert!(cache.get("我").is_some());
        std::thread::sleep(Duration::from_millis(40));
        assert!(cache.get("我").is_none());
    }

    #[test]
    fn cache_disabled_by_zero_settings() {
        assert!(ReadingCache::new(0, Duration::from_secs(60)).is_none());
        assert!(ReadingCache::new(16, Duration::ZERO).is_none());
    }
}
