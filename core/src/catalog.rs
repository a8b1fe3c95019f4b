//! Reference data: the phrase catalog and the reading index.
//!
//! Both tables are produced offline and shipped as JSON:
//!
//! - `phrases.json`: `[{ "id", "text", "readings"?, "readingKeySyllables"? }]`
//! - `readingIndex.json`: `{ "<tone-free key>": [{ "phraseId", "matches": [{ "char", "positions" }] }] }`
//!
//! They are loaded once into [`ReferenceData`] and only ever read afterwards;
//! share it behind an `Arc` across threads.

use std::collections::HashMap;
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

use ahash::AHashMap;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::tone::{split_syllables, strip_tone_marks};

/// A four-character idiom.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Phrase {
    pub id: String,
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub readings: Option<Vec<String>>,
    /// One tone-free syllable per character of `text`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reading_key_syllables: Option<Vec<String>>,
}

/// Positions in a phrase where `char` carries the looked-up reading.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhraseMatch {
    pub char: String,
    pub positions: Vec<usize>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReadingIndexEntry {
    pub phrase_id: String,
    #[serde(default)]
    pub matches: Vec<PhraseMatch>,
}

/// Phrases in catalog order plus an id lookup table.
#[derive(Debug, Clone, Default)]
pub struct PhraseCatalog {
    phrases: Vec<Phrase>,
    by_id: AHashMap<String, usize>,
}

impl PhraseCatalog {
    pub fn new(phrases: Vec<Phrase>) -> Self {
        let mut by_id = AHashMap::with_capacity(phrases.len());
        for (idx, p) in phrases.iter().enumerate() {
            // Later duplicates win, matching a plain id -> phrase map build.
            by_id.insert(p.id.clone(), idx);
        }
        Self { phrases, by_id }
    }

    pub fn load_json<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let f = File::open(path)
            .with_context(|| format!("opening phrase catalog {}", path.display()))?;
        let phrases: Vec<Phrase> = serde_json::from_reader(BufReader::new(f))
            .with_context(|| format!("parsing phrase catalog {}", path.display()))?;
        Ok(Self::new(phrases))
    }

    pub fn get(&self, id: &str) -> Option<&Phrase> {
        self.by_id.get(id).map(|&idx| &self.phrases[idx])
    }

    pub fn phrases(&self) -> &[Phrase] {
        &self.phrases
    }

    pub fn len(&self) -> usize {
        self.phrases.len()
    }

    pub fn is_empty(&self) -> bool {
        self.phrases.is_empty()
    }
}

/// Tone-free reading key -> ordered index entries.
///
/// Entry order is the ranking: lookups return entries exactly as stored.
#[derive(Debug, Clone, Default)]
pub struct ReadingIndex {
    map: AHashMap<String, Vec<ReadingIndexEntry>>,
}

impl ReadingIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an entry under `key`.
    pub fn push<K: Into<String>>(&mut self, key: K, entry: ReadingIndexEntry) {
        self.map.entry(key.into()).or_default().push(entry);
    }

    /// Exact lookup; no prefix or fuzzy matching.
    pub fn get(&self, key: &str) -> &[ReadingIndexEntry] {
        self.map.get(key).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.map.keys().map(String::as_str)
    }

    pub fn load_json<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let f = File::open(path)
            .with_context(|| format!("opening reading index {}", path.display()))?;
        let raw: HashMap<String, Vec<ReadingIndexEntry>> =
            serde_json::from_reader(BufReader::new(f))
                .with_context(|| format!("parsing reading index {}", path.display()))?;
        Ok(Self {
            map: raw.into_iter().collect(),
        })
    }

    /// Write the index as JSON with keys sorted, so rebuilt files diff cleanly.
    pub fn save_json<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let sorted: std::collections::BTreeMap<&str, &Vec<ReadingIndexEntry>> =
            self.map.iter().map(|(k, v)| (k.as_str(), v)).collect();
        let f = File::create(path)
            .with_context(|| format!("creating reading index {}", path.display()))?;
        serde_json::to_writer_pretty(BufWriter::new(f), &sorted)
            .with_context(|| format!("writing reading index {}", path.display()))?;
        Ok(())
    }

    /// Build an index from the per-character key syllables of each phrase.
    ///
    /// Phrases are visited in catalog order, so that order becomes the
    /// suggestion ranking. A phrase contributes one entry per distinct
    /// syllable; within it, positions are grouped by character. Phrases
    /// without usable syllables, or whose syllable count differs from their
    /// character count, are skipped.
    pub fn build(catalog: &PhraseCatalog) -> Self {
        let mut index = Self::new();
        for phrase in catalog.phrases() {
            let Some(syllables) = key_syllables(phrase) else {
                tracing::debug!(id = %phrase.id, "phrase has no key syllables, skipped");
                continue;
            };
            let chars: Vec<char> = phrase.text.chars().collect();
            if syllables.len() != chars.len() {
                tracing::warn!(
                    id = %phrase.id,
                    chars = chars.len(),
                    syllables = syllables.len(),
                    "syllable count does not match phrase length, skipped"
                );
                continue;
            }

            // syllable -> matches, both in first-seen order
            let mut grouped: Vec<(&str, Vec<PhraseMatch>)> = Vec::new();
            for (pos, (ch, syl)) in chars.iter().zip(syllables.iter()).enumerate() {
                if syl.is_empty() {
                    continue;
                }
                let slot = match grouped.iter().position(|(k, _)| *k == syl.as_str()) {
                    Some(i) => i,
                    None => {
                        grouped.push((syl.as_str(), Vec::new()));
                        grouped.len() - 1
                    }
                };
                let matches = &mut grouped[slot].1;
                let ch = ch.to_string();
                match matches.iter_mut().find(|m| m.char == ch) {
                    Some(m) => m.positions.push(pos),
                    None => matches.push(PhraseMatch {
                        char: ch,
                        positions: vec![pos],
                    }),
                }
            }

            for (syl, matches) in grouped {
                index.push(
                    syl,
                    ReadingIndexEntry {
                        phrase_id: phrase.id.clone(),
                        matches,
                    },
                );
            }
        }
        index
    }
}

impl FromIterator<(String, Vec<ReadingIndexEntry>)> for ReadingIndex {
    fn from_iter<T: IntoIterator<Item = (String, Vec<ReadingIndexEntry>)>>(iter: T) -> Self {
        Self {
            map: iter.into_iter().collect(),
        }
    }
}

/// Tone-free syllables for each character of a phrase.
///
/// Prefers `readingKeySyllables`; falls back to splitting the first full
/// reading and stripping its tone marks.
fn key_syllables(phrase: &Phrase) -> Option<Vec<String>> {
    if let Some(keys) = &phrase.reading_key_syllables {
        if !keys.is_empty() {
            return Some(keys.iter().map(|k| strip_tone_marks(k).trim().to_string()).collect());
        }
    }
    let first = phrase.readings.as_ref()?.first()?;
    let syllables: Vec<String> = split_syllables(first)
        .iter()
        .map(|s| strip_tone_marks(s))
        .collect();
    if syllables.is_empty() {
        None
    } else {
        Some(syllables)
    }
}

/// The catalog and index, loaded together before any lookup is served.
#[derive(Debug, Clone, Default)]
pub struct ReferenceData {
    pub catalog: PhraseCatalog,
    pub index: ReadingIndex,
}

impl ReferenceData {
    pub fn new(catalog: PhraseCatalog, index: ReadingIndex) -> Self {
        Self { catalog, index }
    }

    pub fn load<P: AsRef<Path>, Q: AsRef<Path>>(phrases: P, index: Q) -> Result<Self> {
        let catalog = PhraseCatalog::load_json(phrases)?;
        let index = ReadingIndex::load_json(index)?;
        tracing::info!(
            phrases = catalog.len(),
            keys = index.len(),
            "loaded reference data"
        );
        Ok(Self { catalog, index })
    }

    /// Load using the paths in a [`Config`](crate::Config).
    pub fn from_config(config: &crate::Config) -> Result<Self> {
        Self::load(&config.phrases_path, &config.reading_index_path)
    }
}
