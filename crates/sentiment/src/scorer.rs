//! Keyword scoring
//!
//! ## Algorithm
//!
//! 1. Normalize the text (lowercase, single spaces)
//! 2. Every lexicon phrase present on word boundaries adds its weight to the
//!    positive or negative accumulator, once per text. Nested phrases
//!    ("ban" inside "regulatory ban") are distinct entries and both count.
//! 3. `net = positive - negative`, `total = positive + negative`
//! 4. `net > threshold` → Positive, `net < -threshold` → Negative,
//!    otherwise Neutral
//! 5. Confidence:
//!    - no evidence (`total == 0`) → `baseline`
//!    - Neutral with evidence → `baseline`
//!    - directional → `baseline + (ceiling - baseline) * dominance * evidence`
//!      with `dominance = |net| / total` and
//!      `evidence = 1 - exp(-total / evidence_scale)`

use herald_core::{ImpactClass, clamp_confidence};
use serde::Serialize;
use std::ops::Add;
use std::sync::Arc;

use crate::boundary::{contains_bounded, normalize};
use crate::config::ScoringConfig;
use crate::error::ConfigError;
use crate::lexicon::{KeywordEntry, Lexicon};

/// Raw positive/negative accumulators for a text
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SignalTally {
    pub positive: f64,
    pub negative: f64,
}

impl SignalTally {
    pub fn net(&self) -> f64 {
        self.positive - self.negative
    }

    pub fn total(&self) -> f64 {
        self.positive + self.negative
    }

    pub fn is_empty(&self) -> bool {
        self.total() == 0.0
    }

    /// Both accumulators multiplied by `factor`
    pub fn scaled(&self, factor: f64) -> Self {
        Self {
            positive: self.positive * factor,
            negative: self.negative * factor,
        }
    }
}

impl Add for SignalTally {
    type Output = SignalTally;

    fn add(self, rhs: SignalTally) -> SignalTally {
        SignalTally {
            positive: self.positive + rhs.positive,
            negative: self.negative + rhs.negative,
        }
    }
}

/// A lexicon phrase found in a text
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct KeywordMatch {
    pub keyword: String,
    pub weight: f64,
}

/// All phrases found in a text, in lexicon order
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct KeywordMatches {
    pub positive: Vec<KeywordMatch>,
    pub negative: Vec<KeywordMatch>,
}

impl KeywordMatches {
    pub fn total(&self) -> usize {
        self.positive.len() + self.negative.len()
    }

    /// Accumulators implied by the matches
    pub fn tally(&self) -> SignalTally {
        SignalTally {
            positive: self.positive.iter().map(|m| m.weight).sum(),
            negative: self.negative.iter().map(|m| m.weight).sum(),
        }
    }
}

/// Lexicon-driven impact scorer
#[derive(Debug, Clone)]
pub struct KeywordScorer {
    lexicon: Arc<Lexicon>,
    config: ScoringConfig,
}

impl KeywordScorer {
    /// Scorer with default constants
    pub fn new(lexicon: Arc<Lexicon>) -> Self {
        Self {
            lexicon,
            config: ScoringConfig::default(),
        }
    }

    /// Scorer with custom constants (validated)
    pub fn with_config(lexicon: Arc<Lexicon>, config: ScoringConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self { lexicon, config })
    }

    pub fn lexicon(&self) -> &Lexicon {
        &self.lexicon
    }

    pub fn config(&self) -> &ScoringConfig {
        &self.config
    }

    /// Classify `text` into an impact class and a confidence in `[0, 100]`
    pub fn score(&self, text: &str) -> (ImpactClass, f64) {
        self.classify(&self.tally(text))
    }

    /// Sum of matched weights per direction
    pub fn tally(&self, text: &str) -> SignalTally {
        let normalized = normalize(text);
        SignalTally {
            positive: Self::matching(self.lexicon.positive(), &normalized)
                .map(|e| e.weight)
                .sum(),
            negative: Self::matching(self.lexicon.negative(), &normalized)
                .map(|e| e.weight)
                .sum(),
        }
    }

    /// Phrases present in `text`, with their weights
    pub fn matches(&self, text: &str) -> KeywordMatches {
        let normalized = normalize(text);
        let collect = |entries: &[KeywordEntry]| -> Vec<KeywordMatch> {
            Self::matching(entries, &normalized)
                .map(|e| KeywordMatch {
                    keyword: e.phrase.clone(),
                    weight: e.weight,
                })
                .collect()
        };
        KeywordMatches {
            positive: collect(self.lexicon.positive()),
            negative: collect(self.lexicon.negative()),
        }
    }

    /// Apply the classification policy and confidence mapping to a tally
    pub fn classify(&self, tally: &SignalTally) -> (ImpactClass, f64) {
        let cfg = &self.config;
        let total = tally.total();
        if total <= 0.0 || !total.is_finite() {
            return (ImpactClass::Neutral, clamp_confidence(cfg.baseline));
        }

        let net = tally.net();
        let impact = if net > cfg.threshold {
            ImpactClass::Positive
        } else if net < -cfg.threshold {
            ImpactClass::Negative
        } else {
            ImpactClass::Neutral
        };

        let confidence = match impact {
            ImpactClass::Neutral => cfg.baseline,
            ImpactClass::Positive | ImpactClass::Negative => {
                let dominance = net.abs() / total;
                let evidence = 1.0 - (-total / cfg.evidence_scale).exp();
                cfg.baseline + (cfg.ceiling - cfg.baseline) * dominance * evidence
            }
        };

        (impact, clamp_confidence(confidence))
    }

    fn matching<'a>(
        entries: &'a [KeywordEntry],
        normalized: &'a str,
    ) -> impl Iterator<Item = &'a KeywordEntry> + 'a {
        entries
            .iter()
            .filter(move |e| contains_bounded(normalized, &e.phrase))
    }
}
