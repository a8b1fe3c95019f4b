//! Reading-index phrase matching.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::catalog::{PhraseMatch, ReferenceData};
use crate::error::{LookupError, Result};
use crate::reading::MAX_INPUT_CHARS;
use crate::tone::{contains_tone_mark, contains_zhuyin};

/// An idiom whose characters carry the looked-up reading.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhraseSuggestion {
    pub id: String,
    pub text: String,
    pub matches: Vec<PhraseMatch>,
}

/// Trim and validate a tone-free reading key.
pub fn validate_key(raw: &str) -> Result<&str> {
    let key = raw.trim();
    if key.is_empty()
        || key.chars().count() > MAX_INPUT_CHARS
        || contains_tone_mark(key)
        || !contains_zhuyin(key)
    {
        return Err(LookupError::BadInput);
    }
    Ok(key)
}

/// Looks up idiom suggestions for tone-free reading keys.
///
/// Holds a shared handle to the reference data; cloning is cheap and every
/// clone sees the same tables.
#[derive(Debug, Clone)]
pub struct PhraseMatcher {
    data: Arc<ReferenceData>,
}

impl PhraseMatcher {
    pub fn new(data: Arc<ReferenceData>) -> Self {
        Self { data }
    }

    pub fn data(&self) -> &ReferenceData {
        &self.data
    }

    /// Suggestions for `key`, in index order.
    ///
    /// Entries pointing at phrases missing from the catalog are skipped; if
    /// nothing is left the lookup fails with `NoSuggestions`.
    pub fn suggest(&self, key: &str) -> Result<Vec<PhraseSuggestion>> {
        let key = validate_key(key)?;
        let entries = self.data.index.get(key);

        let mut suggestions = Vec::with_capacity(entries.len());
        for entry in entries {
            match self.data.catalog.get(&entry.phrase_id) {
                Some(phrase) => suggestions.push(PhraseSuggestion {
                    id: phrase.id.clone(),
                    text: phrase.text.clone(),
                    matches: entry.matches.clone(),
                }),
                None => {
                    tracing::warn!(key, phrase_id = %entry.phrase_id, "index entry has no catalog phrase");
                }
            }
        }

        tracing::debug!(key, found = suggestions.len(), "phrase lookup");
        if suggestions.is_empty() {
            return Err(LookupError::NoSuggestions);
        }
        Ok(suggestions)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{Phrase, PhraseCatalog, ReadingIndex, ReadingIndexEntry};

    fn matcher() -> PhraseMatcher {
        let catalog = PhraseCatalog::new(vec![
            Phrase {
                id: "p1".into(),
                text: "我行我素".into(),
                readings: None,
                reading_key_syllables: None,
            },
            Phrase {
                id: "p2".into(),
                text: "臥虎藏龍".into(),
                readings: None,
                reading_key_syllables: None,
            },
        ]);
        let mut index = ReadingIndex::new();
        index.push(
            "ㄨㄛ",
            ReadingIndexEntry {
                phrase_id: "p1".into(),
                matches: vec![PhraseMatch {
                    char: "我".into(),
                    positions: vec![0, 2],
                }],
            },
        );
        index.push(
            "ㄨㄛ",
            ReadingIndexEntry {
                phrase_id: "ghost".into(),
                matches: vec![],
            },
        );
        index.push(
            "ㄨㄛ",
            ReadingIndexEntry {
                phrase_id: "p2".into(),
                matches: vec![PhraseMatch {
                    char: "臥".into(),
                    positions: vec![0],
                }],
            },
        );
        index.push(
            "ㄍㄨㄟ",
            ReadingIndexEntry {
                phrase_id: "ghost".into(),
                matches: vec![],
            },
        );
        PhraseMatcher::new(Arc::new(ReferenceData::new(catalog, index)))
    }

    #[test]
    fn suggest_preserves_index_order_and_drops_dangling() {
        let m = matcher();
        let got = m.suggest("ㄨㄛ").unwrap();
        let ids: Vec<&str> = got.iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids, vec!["p1", "p2"]);
        assert_eq!(got[0].text, "我行我素");
        assert_eq!(got[0].matches[0].positions, vec![0, 2]);
    }

    #[test]
    fn suggest_is_deterministic() {
        let m = matcher();
        assert_eq!(m.suggest("ㄨㄛ"), m.suggest("ㄨㄛ"));
    }

    #[test]
    fn suggest_trims_key() {
        assert!(matcher().suggest("  ㄨㄛ ").is_ok());
    }

    #[test]
    fn missing_key_has_no_suggestions() {
        assert_eq!(matcher().suggest("ㄅㄨ"), Err(LookupError::NoSuggestions));
    }

    #[test]
    fn only_dangling_entries_has_no_suggestions() {
        assert_eq!(matcher().suggest("ㄍㄨㄟ"), Err(LookupError::NoSuggestions));
    }

    #[test]
    fn no_partial_prefix_match() {
        assert_eq!(matcher().suggest("ㄨ"), Err(LookupError::NoSuggestions));
    }

    #[test]
    fn rejects_malformed_keys() {
        let m = matcher();
        assert_eq!(m.suggest(""), Err(LookupError::BadInput));
        assert_eq!(m.suggest("   "), Err(LookupError::BadInput));
        assert_eq!(m.suggest("ㄨㄛˇ"), Err(LookupError::BadInput));
        assert_eq!(m.suggest("wo"), Err(LookupError::BadInput));
        assert_eq!(m.suggest("我"), Err(LookupError::BadInput));
        let long = "ㄨ".repeat(MAX_INPUT_CHARS + 1);
        assert_eq!(m.suggest(&long), Err(LookupError::BadInput));
    }
}
