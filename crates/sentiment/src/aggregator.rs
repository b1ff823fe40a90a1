//! Batch aggregation
//!
//! Folds a sequence of analysis results into market-level statistics.
//!
//! ## Top coins
//!
//! Coins are counted across every result's `affected_coins`, then sorted by
//! count with a stable sort, so equal counts keep the order in which each
//! coin was first seen in the flattened mention sequence. Only the first
//! `top_coins` survive.

use herald_core::{AnalysisResult, BatchSummary, CoinMentions, ImpactClass, round_one_decimal};

/// Confidence strictly above this counts as high confidence
pub const HIGH_CONFIDENCE_CUTOFF: f64 = 75.0;

/// Number of coins reported in `top_affected_coins`
pub const TOP_COINS_LIMIT: usize = 5;

/// Computes [`BatchSummary`] values
#[derive(Debug, Clone, Copy)]
pub struct BatchAggregator {
    pub high_confidence_cutoff: f64,
    pub top_coins: usize,
}

impl Default for BatchAggregator {
    fn default() -> Self {
        Self {
            high_confidence_cutoff: HIGH_CONFIDENCE_CUTOFF,
            top_coins: TOP_COINS_LIMIT,
        }
    }
}

impl BatchAggregator {
    pub fn summarize(&self, results: &[AnalysisResult]) -> BatchSummary {
        let mut summary = BatchSummary::default();
        let mut confidence_sum = 0.0;

        for result in results {
            match result.impact() {
                ImpactClass::Positive => summary.positive_count += 1,
                ImpactClass::Negative => summary.negative_count += 1,
                ImpactClass::Neutral => summary.neutral_count += 1,
            }

            if result.confidence() > self.high_confidence_cutoff {
                summary.high_confidence_count += 1;
            } else {
                summary.low_confidence_count += 1;
            }

            if result.is_error() {
                summary.error_count += 1;
            }

            confidence_sum += result.confidence();
        }

        if !results.is_empty() {
            summary.avg_confidence = round_one_decimal(confidence_sum / results.len() as f64);
        }

        summary.top_affected_coins = self.top_coins(
            results
                .iter()
                .flat_map(|r| r.affected_coins().iter().map(String::as_str)),
        );

        summary
    }

    /// Most frequent coins, ties in first-seen order
    pub fn top_coins<'a>(&self, mentions: impl IntoIterator<Item = &'a str>) -> Vec<CoinMentions> {
        let mut counts: Vec<CoinMentions> = Vec::new();
        for coin in mentions {
            match counts.iter_mut().find(|c| c.coin == coin) {
                Some(entry) => entry.mentions += 1,
                None => counts.push(CoinMentions {
                    coin: coin.to_string(),
                    mentions: 1,
                }),
            }
        }

        // sort_by is stable
        counts.sort_by(|a, b| b.mentions.cmp(&a.mentions));
        counts.truncate(self.top_coins);
        counts
    }
}

/// Summarize with the default cutoffs
pub fn summarize(results: &[AnalysisResult]) -> BatchSummary {
    BatchAggregator::default().summarize(results)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result(impact: ImpactClass, confidence: f64, coins: &[&str]) -> AnalysisResult {
        AnalysisResult::new(
            impact,
            confidence,
            coins.iter().map(|c| c.to_string()).collect(),
            "r",
        )
    }

    #[test]
    fn test_empty_batch() {
        let summary = summarize(&[]);
        assert_eq!(summary, BatchSummary::default());
        assert_eq!(summary.avg_confidence, 0.0);
        assert!(summary.top_affected_coins.is_empty());
    }

    #[test]
    fn test_counts_and_average() {
        let results = vec![
            result(ImpactClass::Positive, 80.0, &["BTC"]),
            result(ImpactClass::Negative, 75.0, &["ETH"]),
            result(ImpactClass::Neutral, 50.0, &[]),
            AnalysisResult::failed("r", "title is empty or missing"),
        ];
        let summary = summarize(&results);
        assert_eq!(summary.positive_count, 1);
        assert_eq!(summary.negative_count, 1);
        assert_eq!(summary.neutral_count, 2);
        // 75 is not strictly above the cutoff
        assert_eq!(summary.high_confidence_count, 1);
        assert_eq!(summary.low_confidence_count, 3);
        assert_eq!(summary.error_count, 1);
        // (80 + 75 + 50 + 0) / 4 = 51.25
        assert_eq!(summary.avg_confidence, 51.3);
        assert_eq!(summary.total(), results.len());
    }

    #[test]
    fn test_top_coins_ranked_with_stable_ties() {
        let results = vec![
            result(ImpactClass::Neutral, 50.0, &["SOL", "ETH"]),
            result(ImpactClass::Neutral, 50.0, &["BTC", "ETH"]),
            result(ImpactClass::Neutral, 50.0, &["BTC", "XRP"]),
            result(ImpactClass::Neutral, 50.0, &["ADA", "DOGE", "LTC"]),
        ];
        let summary = summarize(&results);
        let ranked: Vec<(&str, usize)> = summary
            .top_affected_coins
            .iter()
            .map(|c| (c.coin.as_str(), c.mentions))
            .collect();
        // ETH seen before BTC; SOL, XRP, ADA tie in first-seen order; DOGE/LTC cut
        assert_eq!(
            ranked,
            vec![("ETH", 2), ("BTC", 2), ("SOL", 1), ("XRP", 1), ("ADA", 1)]
        );
    }

    #[test]
    fn test_custom_cutoffs() {
        let aggregator = BatchAggregator {
            high_confidence_cutoff: 60.0,
            top_coins: 1,
        };
        let results = vec![
            result(ImpactClass::Positive, 70.0, &["BTC", "ETH"]),
            result(ImpactClass::Positive, 55.0, &["ETH"]),
        ];
        let summary = aggregator.summarize(&results);
        assert_eq!(summary.high_confidence_count, 1);
        assert_eq!(summary.top_affected_coins.len(), 1);
        assert_eq!(summary.top_affected_coins[0].coin, "ETH");
    }
}
