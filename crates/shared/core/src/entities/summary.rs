use serde::{Deserialize, Serialize};

use super::ImpactClass;
use crate::values::CoinSymbol;

/// Mention count for one coin across a set of results
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoinMentions {
    pub coin: CoinSymbol,
    pub mentions: usize,
}

/// Statistics over a batch of analysis results
///
/// Derived on every call; never stored as an entity of record.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BatchSummary {
    pub positive_count: usize,
    pub negative_count: usize,
    pub neutral_count: usize,
    /// Results with confidence strictly above the high-confidence cutoff
    pub high_confidence_count: usize,
    pub low_confidence_count: usize,
    pub error_count: usize,
    /// Mean confidence, one decimal place
    pub avg_confidence: f64,
    /// Most mentioned coins, most frequent first
    pub top_affected_coins: Vec<CoinMentions>,
}

impl BatchSummary {
    /// Number of results the summary was computed over
    pub fn total(&self) -> usize {
        self.positive_count + self.negative_count + self.neutral_count
    }

    /// Direction with more votes; ties go to Neutral
    pub fn dominant_impact(&self) -> ImpactClass {
        use std::cmp::Ordering;
        match self.positive_count.cmp(&self.negative_count) {
            Ordering::Greater => ImpactClass::Positive,
            Ordering::Less => ImpactClass::Negative,
            Ordering::Equal => ImpactClass::Neutral,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dominant_impact() {
        let mut summary = BatchSummary {
            positive_count: 3,
            negative_count: 1,
            neutral_count: 5,
            ..Default::default()
        };
        assert_eq!(summary.dominant_impact(), ImpactClass::Positive);
        assert_eq!(summary.total(), 9);

        summary.negative_count = 3;
        assert_eq!(summary.dominant_impact(), ImpactClass::Neutral);

        summary.negative_count = 4;
        assert_eq!(summary.dominant_impact(), ImpactClass::Negative);
    }
}
