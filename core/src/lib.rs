//! zhuyin-core
//!
//! Network-free core of the Zhuyin lookup service: tone-mark handling,
//! reading normalization, the idiom catalog and reading index, phrase
//! matching, and the word -> idiom pipeline over a pluggable reading source.
//!
//! Public API:
//! - `strip_tone_marks`, `parse_syllable`, `split_syllables` - syllable utilities
//! - `normalize`, `dedup_preserve_order`, `WordReading` - reading cleanup
//! - `ReferenceData` - phrase catalog + reading index, loaded once
//! - `PhraseMatcher` - tone-free key -> idiom suggestions
//! - `ReadingResolver`, `PhrasePipeline` - single character -> suggestions
//! - `LookupError` - the error taxonomy every operation reports
//! - `Config` - data file locations
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

pub mod tone;
pub use tone::{
    contains_tone_mark, contains_zhuyin, is_tone_mark, is_zhuyin_symbol, parse_syllable,
    split_syllables, strip_tone_marks, Syllable, ToneMark,
};

pub mod reading;
pub use reading::{clean_word, dedup_preserve_order, normalize, WordReading, MAX_INPUT_CHARS};

pub mod error;
pub use error::LookupError;

pub mod catalog;
pub use catalog::{Phrase, PhraseCatalog, PhraseMatch, ReadingIndex, ReadingIndexEntry, ReferenceData};

pub mod matcher;
pub use matcher::{validate_key, PhraseMatcher, PhraseSuggestion};

pub mod pipeline;
pub use pipeline::{PhrasePipeline, PhraseSuggestions, ReadingResolver};

pub mod ticket;
pub use ticket::{RequestSequencer, Ticket};

pub mod layout;
pub use layout::{render_columns, vertical_layout, TonePlacement, VerticalSyllable};

pub mod rng;
pub use rng::SeededRng;

/// Generic configuration for the core.
///
/// Only data locations live here. Service options (dictionary endpoint,
/// caching, server binding) belong in `ZhuyinConfig` in the libzhuyin crate.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    /// Phrase catalog (`phrases.json`)
    pub phrases_path: PathBuf,
    /// Reading index (`readingIndex.json`)
    pub reading_index_path: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            phrases_path: PathBuf::from("data/phrases.json"),
            reading_index_path: PathBuf::from("data/readingIndex.json"),
        }
    }
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load_toml<P: AsRef<std::path::Path>>(
        path: P,
    ) -> Result<Self, Box<dyn std::error::Error>> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    /// Save configuration to a TOML file.
    pub fn save_toml<P: AsRef<std::path::Path>>(
        &self,
        path: P,
    ) -> Result<(), Box<dyn std::error::Error>> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Load configuration from TOML string.
    pub fn from_toml_str(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// Serialize configuration to TOML string.
    pub fn to_toml_string(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }
}
