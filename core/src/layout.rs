//! Vertical layout of Zhuyin readings.
//!
//! Zhuyin is traditionally set in a narrow column beside the character: the
//! symbols of a syllable stack top to bottom, tones 2-4 sit to the right of
//! the column and the neutral-tone dot sits above it.

use crate::tone::{parse_syllable, split_syllables, ToneMark};

/// Where a tone mark is drawn relative to the symbol column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TonePlacement {
    Above,
    Right,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerticalSyllable {
    /// Symbols from top to bottom.
    pub symbols: Vec<char>,
    pub tone: Option<ToneMark>,
}

impl VerticalSyllable {
    /// `None` when the syllable has no symbols.
    pub fn from_syllable(raw: &str) -> Option<Self> {
        let syl = parse_syllable(raw);
        if syl.base.is_empty() {
            return None;
        }
        Some(Self {
            symbols: syl.base.chars().collect(),
            tone: syl.tone,
        })
    }

    pub fn tone_placement(&self) -> Option<TonePlacement> {
        self.tone.map(|t| match t {
            ToneMark::Neutral => TonePlacement::Above,
            _ => TonePlacement::Right,
        })
    }

    /// Rows of this column including the dot row (if any), each padded to
    /// two cells: the symbol and the right-hand tone slot.
    fn rows(&self) -> Vec<[char; 2]> {
        let mut rows = Vec::with_capacity(self.symbols.len() + 1);
        if let Some(ToneMark::Neutral) = self.tone {
            rows.push(['˙', ' ']);
        }
        for (i, &c) in self.symbols.iter().enumerate() {
            let right = match self.tone {
                Some(t) if i == 0 && t != ToneMark::Neutral => t.as_char(),
                _ => ' ',
            };
            rows.push([c, right]);
        }
        rows
    }
}

/// Lay out every syllable of a (possibly multi-syllable) reading.
pub fn vertical_layout(reading: &str) -> Vec<VerticalSyllable> {
    split_syllables(reading)
        .iter()
        .filter_map(|s| VerticalSyllable::from_syllable(s))
        .collect()
}

/// Draw the columns side by side as plain text, one line per row.
///
/// Right-side tones are drawn level with the top symbol. Trailing spaces are
/// trimmed from each line.
pub fn render_columns(columns: &[VerticalSyllable]) -> String {
    let rows: Vec<Vec<[char; 2]>> = columns.iter().map(VerticalSyllable::rows).collect();
    let height = rows.iter().map(Vec::len).max().unwrap_or(0);

    let mut out = String::new();
    for r in 0..height {
        let mut line = String::new();
        for col in &rows {
            // Top-align columns of different heights.
            match col.get(r) {
                Some([c, t]) => {
                    line.push(*c);
                    line.push(*t);
                }
                None => line.push_str("　 "),
            }
        }
        out.push_str(line.trim_end());
        out.push('\n');
    }
    out
}
