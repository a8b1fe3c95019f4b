// core/src/pipeline.rs
//
// Word -> reading -> idiom suggestions, composed over any reading source.

use serde::Serialize;

use crate::error::{LookupError, Result};
use crate::matcher::{PhraseMatcher, PhraseSuggestion};
use crate::reading::WordReading;
use crate::tone::strip_tone_marks;

/// Anything that can turn a word into its readings.
///
/// Implementations must validate input before doing external work and map
/// every failure onto a [`LookupError`].
pub trait ReadingResolver {
    fn resolve(&self, word: &str) -> Result<WordReading>;
}

impl<T: ReadingResolver + ?Sized> ReadingResolver for &T {
    fn resolve(&self, word: &str) -> Result<WordReading> {
        (**self).resolve(word)
    }
}

impl<T: ReadingResolver + ?Sized> ReadingResolver for std::sync::Arc<T> {
    fn resolve(&self, word: &str) -> Result<WordReading> {
        (**self).resolve(word)
    }
}

/// Successful result of [`PhrasePipeline::suggest_for_char`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PhraseSuggestions {
    pub word: String,
    pub zhuyin: Vec<String>,
    pub best_guess: Option<String>,
    pub key_no_tone: String,
    pub suggestions: Vec<PhraseSuggestion>,
}

/// Resolver plus matcher.
pub struct PhrasePipeline<R> {
    resolver: R,
    matcher: PhraseMatcher,
}

impl<R: ReadingResolver> PhrasePipeline<R> {
    pub fn new(resolver: R, matcher: PhraseMatcher) -> Self {
        Self { resolver, matcher }
    }

    pub fn resolver(&self) -> &R {
        &self.resolver
    }

    pub fn matcher(&self) -> &PhraseMatcher {
        &self.matcher
    }

    /// Readings for a word, straight from the resolver.
    pub fn to_reading(&self, word: &str) -> Result<WordReading> {
        self.resolver.resolve(word)
    }

    /// Suggestions for a tone-free key, straight from the matcher.
    pub fn suggest(&self, key: &str) -> Result<Vec<PhraseSuggestion>> {
        self.matcher.suggest(key)
    }

    /// Resolve a single character and suggest idioms keyed by its first reading.
    ///
    /// Stages run in order and the first failure is returned unchanged.
    pub fn suggest_for_char(&self, input: &str) -> Result<PhraseSuggestions> {
        let ch = input.trim();
        if ch.chars().count() != 1 {
            return Err(LookupError::BadInput);
        }

        let reading = self.resolver.resolve(ch)?;
        let key = reading
            .best_guess()
            .map(|best| strip_tone_marks(best).trim().to_string())
            .filter(|k| !k.is_empty())
            .ok_or(LookupError::NoBestGuess)?;

        let suggestions = self.matcher.suggest(&key)?;
        let (word, zhuyin, best_guess) = reading.into_parts();
        Ok(PhraseSuggestions {
            word,
            zhuyin,
            best_guess,
            key_no_tone: key,
            suggestions,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{Phrase, PhraseCatalog, PhraseMatch, ReadingIndex, ReadingIndexEntry, ReferenceData};
    use std::cell::Cell;
    use std::sync::Arc;

    struct Stub {
        result: Result<WordReading>,
        calls: Cell<usize>,
    }

    impl Stub {
        fn reading(word: &str, readings: &[&str]) -> Self {
            Self {
                result: Ok(WordReading::from_raw(word, readings.iter().copied())),
                calls: Cell::new(0),
            }
        }

        fn failing(err: LookupError) -> Self {
            Self {
                result: Err(err),
                calls: Cell::new(0),
            }
        }
    }

    impl ReadingResolver for Stub {
        fn resolve(&self, _word: &str) -> Result<WordReading> {
            self.calls.set(self.calls.get() + 1);
            self.result.clone()
        }
    }

    fn matcher() -> PhraseMatcher {
        let catalog = PhraseCatalog::new(vec![Phrase {
            id: "p1".into(),
            text: "我行我素".into(),
            readings: None,
            reading_key_syllables: None,
        }]);
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
        PhraseMatcher::new(Arc::new(ReferenceData::new(catalog, index)))
    }

    #[test]
    fn end_to_end_success() {
        let p = PhrasePipeline::new(Stub::reading("我", &["ㄨㄛˇ"]), matcher());
        let got = p.suggest_for_char("我").unwrap();
        assert_eq!(got.key_no_tone, "ㄨㄛ");
        assert_eq!(got.best_guess.as_deref(), Some("ㄨㄛˇ"));
        assert_eq!(got.suggestions.len(), 1);
        assert_eq!(got.suggestions[0].text, "我行我素");
        assert_eq!(got.suggestions[0].matches[0].positions, vec![0, 2]);
    }

    #[test]
    fn missing_key_is_no_suggestions() {
        let p = PhrasePipeline::new(Stub::reading("不", &["ㄅㄨˊ"]), matcher());
        assert_eq!(p.suggest_for_char("不"), Err(LookupError::NoSuggestions));
    }

    #[test]
    fn resolver_errors_propagate_unchanged() {
        for err in [
            LookupError::NotFound,
            LookupError::UpstreamError,
            LookupError::BadInput,
        ] {
            let p = PhrasePipeline::new(Stub::failing(err), matcher());
            assert_eq!(p.suggest_for_char("龘"), Err(err));
        }
    }

    #[test]
    fn multi_char_rejected_before_resolving() {
        let p = PhrasePipeline::new(Stub::reading("我們", &["ㄨㄛˇ ㄇㄣ˙"]), matcher());
        assert_eq!(p.suggest_for_char("我們"), Err(LookupError::BadInput));
        assert_eq!(p.suggest_for_char(""), Err(LookupError::BadInput));
        assert_eq!(p.resolver().calls.get(), 0);
    }

    #[test]
    fn empty_reading_is_no_best_guess() {
        let p = PhrasePipeline::new(Stub::reading("我", &[]), matcher());
        assert_eq!(p.suggest_for_char("我"), Err(LookupError::NoBestGuess));
    }

    #[test]
    fn tone_only_reading_is_no_best_guess() {
        let p = PhrasePipeline::new(Stub::reading("我", &["˙"]), matcher());
        assert_eq!(p.suggest_for_char("我"), Err(LookupError::NoBestGuess));
    }

    #[test]
    fn malformed_key_from_resolver_is_bad_input() {
        let p = PhrasePipeline::new(Stub::reading("a", &["abc"]), matcher());
        assert_eq!(p.suggest_for_char("a"), Err(LookupError::BadInput));
    }

    #[test]
    fn serializes_camel_case() {
        let p = PhrasePipeline::new(Stub::reading("我", &["ㄨㄛˇ"]), matcher());
        let json = serde_json::to_value(p.suggest_for_char("我").unwrap()).unwrap();
        assert_eq!(json["keyNoTone"], "ㄨㄛ");
        assert_eq!(json["zhuyin"][0], "ㄨㄛˇ");
        assert_eq!(json["suggestions"][0]["matches"][0]["char"], "我");
    }
}
