//! Keyword lexicon
//!
//! Two ordered tables of curated phrase weights. Direction comes from table
//! membership, so both tables hold positive magnitudes. A weight is the
//! estimated strength of the phrase's market impact: "regulatory ban"
//! outweighs "minor delay".

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::boundary::normalize;
use crate::error::LexiconError;

/// One lexicon phrase with its impact magnitude
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeywordEntry {
    pub phrase: String,
    pub weight: f64,
}

impl KeywordEntry {
    pub fn new(phrase: impl Into<String>, weight: f64) -> Self {
        Self {
            phrase: phrase.into(),
            weight,
        }
    }
}

/// Positive-impact phrases
const POSITIVE: &[(&str, f64)] = &[
    ("etf approval", 3.0),
    ("etf approved", 3.0),
    ("regulatory clarity", 2.5),
    ("institutional adoption", 2.5),
    ("all-time high", 2.5),
    ("record high", 2.5),
    ("approval", 2.0),
    ("approved", 2.0),
    ("approves", 2.0),
    ("bullish", 2.0),
    ("rally", 2.0),
    ("rallies", 2.0),
    ("surge", 2.0),
    ("surges", 2.0),
    ("soars", 2.0),
    ("adoption", 1.5),
    ("partnership", 1.5),
    ("breakout", 1.5),
    ("upgrade", 1.5),
    ("inflows", 1.5),
    ("accumulation", 1.5),
    ("gains", 1.5),
    ("recovery", 1.5),
    ("rebound", 1.5),
    ("listing", 1.5),
    ("mainnet", 1.5),
    ("buyback", 1.5),
    ("launch", 1.0),
    ("launches", 1.0),
    ("integration", 1.0),
    ("investment", 1.0),
    ("milestone", 1.0),
    ("halving", 1.0),
];

/// Negative-impact phrases
const NEGATIVE: &[(&str, f64)] = &[
    ("regulatory ban", 3.0),
    ("security breach", 3.0),
    ("rug pull", 3.0),
    ("hack", 3.0),
    ("hacked", 3.0),
    ("fraud", 3.0),
    ("scam", 3.0),
    ("bankruptcy", 3.0),
    ("insolvency", 3.0),
    ("sec lawsuit", 2.5),
    ("exploit", 2.5),
    ("crash", 2.5),
    ("plunge", 2.5),
    ("plunges", 2.5),
    ("delisting", 2.5),
    ("delisted", 2.5),
    ("crackdown", 2.5),
    ("ban", 2.0),
    ("banned", 2.0),
    ("sell-off", 2.0),
    ("selloff", 2.0),
    ("bearish", 2.0),
    ("lawsuit", 2.0),
    ("liquidation", 2.0),
    ("investigation", 1.5),
    ("outflows", 1.5),
    ("penalty", 1.5),
    ("downtime", 1.5),
    ("outage", 1.5),
    ("decline", 1.5),
    ("losses", 1.5),
    ("delay", 1.0),
    ("warning", 1.0),
    ("fud", 1.0),
    ("minor delay", 0.5),
];

/// Serialized lexicon layout: `{"positive": [{phrase, weight}], "negative": [...]}`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LexiconDocument {
    #[serde(default)]
    pub positive: Vec<KeywordEntry>,
    #[serde(default)]
    pub negative: Vec<KeywordEntry>,
}

/// Read-only phrase → weight tables
///
/// Built once and shared; there is no way to mutate a lexicon after
/// construction.
#[derive(Debug, Clone, PartialEq)]
pub struct Lexicon {
    positive: Vec<KeywordEntry>,
    negative: Vec<KeywordEntry>,
}

impl Default for Lexicon {
    fn default() -> Self {
        Self::builtin()
    }
}

impl Lexicon {
    /// The curated crypto-news lexicon
    pub fn builtin() -> Self {
        let to_entries = |table: &[(&str, f64)]| -> Vec<KeywordEntry> {
            table
                .iter()
                .map(|(phrase, weight)| KeywordEntry::new(*phrase, *weight))
                .collect()
        };
        Self {
            positive: to_entries(POSITIVE),
            negative: to_entries(NEGATIVE),
        }
    }

    /// Build a validated lexicon from custom tables
    ///
    /// Phrases are normalized (lowercase, single spaces). Empty phrases,
    /// duplicates within a table, and weights that are not finite and
    /// positive are rejected.
    pub fn new(
        positive: impl IntoIterator<Item = KeywordEntry>,
        negative: impl IntoIterator<Item = KeywordEntry>,
    ) -> Result<Self, LexiconError> {
        Ok(Self {
            positive: Self::validate_table(positive, "positive")?,
            negative: Self::validate_table(negative, "negative")?,
        })
    }

    /// Parse a lexicon from its JSON document form
    pub fn from_json(json: &str) -> Result<Self, LexiconError> {
        let doc: LexiconDocument =
            serde_json::from_str(json).map_err(|e| LexiconError::Parse(e.to_string()))?;
        Self::from_document(doc)
    }

    pub fn from_document(doc: LexiconDocument) -> Result<Self, LexiconError> {
        Self::new(doc.positive, doc.negative)
    }

    fn validate_table(
        entries: impl IntoIterator<Item = KeywordEntry>,
        table: &'static str,
    ) -> Result<Vec<KeywordEntry>, LexiconError> {
        let mut seen = HashSet::new();
        let mut out = Vec::new();
        for entry in entries {
            let phrase = normalize(&entry.phrase);
            if phrase.is_empty() {
                return Err(LexiconError::EmptyPhrase { table });
            }
            if !entry.weight.is_finite() || entry.weight <= 0.0 {
                return Err(LexiconError::InvalidWeight {
                    phrase,
                    weight: entry.weight,
                });
            }
            if !seen.insert(phrase.clone()) {
                return Err(LexiconError::Duplicate { phrase, table });
            }
            out.push(KeywordEntry::new(phrase, entry.weight));
        }
        Ok(out)
    }

    /// Positive-impact entries in table order
    pub fn positive(&self) -> &[KeywordEntry] {
        &self.positive
    }

    /// Negative-impact entries in table order
    pub fn negative(&self) -> &[KeywordEntry] {
        &self.negative
    }

    pub fn positive_weight(&self, phrase: &str) -> Option<f64> {
        Self::lookup(&self.positive, phrase)
    }

    pub fn negative_weight(&self, phrase: &str) -> Option<f64> {
        Self::lookup(&self.negative, phrase)
    }

    fn lookup(table: &[KeywordEntry], phrase: &str) -> Option<f64> {
        let phrase = normalize(phrase);
        table.iter().find(|e| e.phrase == phrase).map(|e| e.weight)
    }

    /// Total number of phrases across both tables
    pub fn len(&self) -> usize {
        self.positive.len() + self.negative.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Document form, suitable for serializing back to JSON
    pub fn to_document(&self) -> LexiconDocument {
        LexiconDocument {
            positive: self.positive.clone(),
            negative: self.negative.clone(),
        }
    }
}
