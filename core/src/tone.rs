//! Tone-mark handling for Zhuyin syllables.
//!
//! Zhuyin marks four of the five Mandarin tones with a trailing diacritic:
//!
//! | mark | tone |
//! |------|------|
//! | `˙`  | neutral (5) |
//! | `ˊ`  | 2 |
//! | `ˇ`  | 3 |
//! | `ˋ`  | 4 |
//!
//! The first tone carries no mark. Everything here is pure and total.

use serde::{Deserialize, Serialize};

/// First and last code points of the Bopomofo letters block used for readings.
const ZHUYIN_FIRST: char = '\u{3105}';
const ZHUYIN_LAST: char = '\u{3129}';

/// A Zhuyin tone diacritic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ToneMark {
    /// `˙`
    Neutral,
    /// `ˊ`
    Rising,
    /// `ˇ`
    Dipping,
    /// `ˋ`
    Falling,
}

impl ToneMark {
    pub fn from_char(c: char) -> Option<Self> {
        match c {
            '˙' => Some(Self::Neutral),
            'ˊ' => Some(Self::Rising),
            'ˇ' => Some(Self::Dipping),
            'ˋ' => Some(Self::Falling),
            _ => None,
        }
    }

    pub fn as_char(self) -> char {
        match self {
            Self::Neutral => '˙',
            Self::Rising => 'ˊ',
            Self::Dipping => 'ˇ',
            Self::Falling => 'ˋ',
        }
    }

    /// Conventional tone number (the neutral tone is numbered 5).
    pub fn number(self) -> u8 {
        match self {
            Self::Neutral => 5,
            Self::Rising => 2,
            Self::Dipping => 3,
            Self::Falling => 4,
        }
    }
}

/// A single syllable split into its symbols and optional trailing tone.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Syllable {
    pub base: String,
    pub tone: Option<ToneMark>,
}

pub fn is_tone_mark(c: char) -> bool {
    ToneMark::from_char(c).is_some()
}

pub fn contains_tone_mark(s: &str) -> bool {
    s.chars().any(is_tone_mark)
}

pub fn is_zhuyin_symbol(c: char) -> bool {
    (ZHUYIN_FIRST..=ZHUYIN_LAST).contains(&c)
}

pub fn contains_zhuyin(s: &str) -> bool {
    s.chars().any(is_zhuyin_symbol)
}

/// Remove every tone mark from `s`, wherever it occurs.
pub fn strip_tone_marks(s: &str) -> String {
    s.chars().filter(|c| !is_tone_mark(*c)).collect()
}

/// Split a trimmed syllable into its base and trailing tone mark.
///
/// Only the final character is inspected; a tone mark in the middle of the
/// input stays part of `base`.
pub fn parse_syllable(raw: &str) -> Syllable {
    let s = raw.trim();
    let mut chars = s.chars();
    match chars.next_back().and_then(ToneMark::from_char) {
        Some(tone) => Syllable {
            base: chars.as_str().to_string(),
            tone: Some(tone),
        },
        None => Syllable {
            base: s.to_string(),
            tone: None,
        },
    }
}

/// Split a multi-syllable reading on whitespace runs.
pub fn split_syllables(raw: &str) -> Vec<String> {
    raw.split_whitespace().map(str::to_string).collect()
}
