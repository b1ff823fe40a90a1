//! End-to-end properties of the sentiment engine
//!
//! Exercises the public API the tool server relies on:
//! - single-item analysis of realistic headlines
//! - batch length/order guarantees with failing items
//! - summary invariants
//! - confidence bounds at the input length limits

use herald_core::{ImpactClass, NewsItem};
use herald_sentiment::{
    AnalysisEngine, CoinDetector, KeywordEntry, KeywordScorer, Lexicon, ScoringConfig, summarize,
};
use std::sync::Arc;

#[test]
fn test_regulatory_ban_headline_is_negative() {
    let engine = AnalysisEngine::with_defaults();
    let result = engine
        .analyze_single(
            "Major exchange announces regulatory ban on trading",
            "Authorities have issued a ban affecting multiple exchanges",
            "req-ban",
        )
        .unwrap();

    assert_eq!(result.impact(), ImpactClass::Negative);
    assert!(result.confidence() > ScoringConfig::default().baseline);
    assert!(result.affected_coins().is_empty());
    assert_eq!(result.request_id(), "req-ban");
}

#[test]
fn test_quiet_bitcoin_day_is_neutral() {
    let engine = AnalysisEngine::with_defaults();
    let result = engine
        .analyze_single(
            "Bitcoin price stable amid quiet trading day",
            "No major news reported",
            "req-quiet",
        )
        .unwrap();

    assert_eq!(result.impact(), ImpactClass::Neutral);
    assert_eq!(result.confidence(), 50.0);
    assert_eq!(result.affected_coins(), ["BTC"]);
}

#[test]
fn test_no_signal_text_scores_baseline_without_coins() {
    let engine = AnalysisEngine::with_defaults();
    let text = "The weather in the city was pleasant this afternoon";
    assert_eq!(engine.scorer().score(text), (ImpactClass::Neutral, 50.0));
    assert!(engine.detector().detect(text).is_empty());
}

#[test]
fn test_batch_with_empty_title_keeps_length_and_order() {
    let engine = AnalysisEngine::with_defaults();
    let items = vec![
        NewsItem::new("Ethereum upgrade goes live", "Mainnet launch is a milestone"),
        NewsItem::new("", "Summary without a headline"),
        NewsItem::new("Exchange hacked", "Bitcoin withdrawals halted after exploit"),
    ];

    let results = engine.analyze_batch(&items, "batch-1");

    assert_eq!(results.len(), 3);
    assert_eq!(results[0].impact(), ImpactClass::Positive);
    assert_eq!(results[0].affected_coins(), ["ETH"]);

    assert!(results[1].is_error());
    assert_eq!(results[1].impact(), ImpactClass::Neutral);
    assert_eq!(results[1].confidence(), 0.0);

    assert_eq!(results[2].impact(), ImpactClass::Negative);
    assert_eq!(results[2].affected_coins(), ["BTC"]);
    assert!(!results[2].is_error());

    let ids: Vec<_> = results.iter().map(|r| r.request_id()).collect();
    assert_eq!(ids, ["batch-1_item_0", "batch-1_item_1", "batch-1_item_2"]);
}

#[test]
fn test_summary_counts_match_input_length() {
    let engine = AnalysisEngine::with_defaults();
    let items: Vec<NewsItem> = [
        ("BTC rally", "Record high for bitcoin"),
        ("", ""),
        ("SOL outage", "Solana downtime again"),
        ("Quiet", "Nothing"),
        ("ETH ETF approval", "Inflows expected"),
    ]
    .into_iter()
    .map(|(t, s)| NewsItem::new(t, s))
    .collect();

    let results = engine.analyze_batch(&items, "b");
    let summary = summarize(&results);

    assert_eq!(
        summary.positive_count + summary.negative_count + summary.neutral_count,
        results.len()
    );
    assert_eq!(summary.error_count, 1);
    assert_eq!(summary.positive_count, 2);
    assert_eq!(summary.negative_count, 1);
    assert_eq!(summary.top_affected_coins[0].coin, "BTC");
}

#[test]
fn test_confidence_bounded_at_length_limits() {
    let engine = AnalysisEngine::with_defaults();
    let title: String = "hack scam fraud ".repeat(40).chars().take(500).collect();
    let summary: String = "rally surge record high ".repeat(100).chars().take(2000).collect();

    let result = engine.analyze_single(&title, &summary, "long").unwrap();
    assert!((0.0..=100.0).contains(&result.confidence()));

    for text in ["", " ", title.as_str(), summary.as_str()] {
        let (_, confidence) = engine.scorer().score(text);
        assert!((0.0..=100.0).contains(&confidence));
    }
}

#[test]
fn test_embedded_tickers_never_detected() {
    let detector = CoinDetector::default();
    for text in ["BETH", "Ethan", "methane", "solve", "unicode", "adapt", "dotted", "linkedin"] {
        assert!(
            detector.detect(text).is_empty(),
            "unexpected coin in {:?}",
            text
        );
    }
    assert_eq!(detector.detect("BETH and ETH"), vec!["ETH"]);
}

#[test]
fn test_injected_lexicon_drives_scoring() {
    let lexicon = Lexicon::new(
        vec![KeywordEntry::new("wagmi", 2.0)],
        vec![KeywordEntry::new("ngmi", 2.0)],
    )
    .unwrap();
    let engine = AnalysisEngine::new(
        KeywordScorer::new(Arc::new(lexicon)),
        CoinDetector::default(),
    );

    let result = engine.analyze_single("WAGMI", "doge community says", "c").unwrap();
    assert_eq!(result.impact(), ImpactClass::Positive);
    assert_eq!(result.affected_coins(), ["DOGE"]);

    // The built-in phrases are unknown to this lexicon
    let result = engine.analyze_single("Exchange hacked", "ngmi", "d").unwrap();
    assert_eq!(result.impact(), ImpactClass::Negative);
}
