//! Herald Sentiment Engine
//!
//! Turns crypto news title/summary pairs into a directional market-impact
//! verdict, a confidence score and the set of coins the news is about:
//!
//! - **Boundary matching**: word-anchored, case-insensitive phrase search
//! - **Lexicon**: curated positive/negative phrase weights
//! - **Coin detection**: canonical tickers mentioned in a text
//! - **Keyword scoring**: lexicon tally → impact class + confidence
//! - **Analysis engine**: per-item analysis, batch with error containment
//! - **Aggregation**: batch-level statistics
//!
//! ## Architecture
//!
//! ```text
//!   title / summary
//!         │
//!    ┌────┴─────────────┐
//!    ▼                  ▼
//! ┌──────────────┐  ┌──────────────┐
//! │ CoinDetector │  │ KeywordScorer│◄── Lexicon (read-only)
//! └──────┬───────┘  └──────┬───────┘
//!        │ coins           │ impact, confidence
//!        └───────┬─────────┘
//!                ▼
//!       ┌─────────────────┐
//!       │ AnalysisEngine  │◄── ImpactAssessor (optional)
//!       └────────┬────────┘
//!                │ AnalysisResult × N
//!                ▼
//!       ┌─────────────────┐
//!       │ BatchAggregator │──► BatchSummary
//!       └─────────────────┘
//! ```
//!
//! Everything here is synchronous and free of shared mutable state, so an
//! engine can be shared across tasks behind an `Arc`.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use herald_sentiment::{AnalysisEngine, summarize};
//!
//! let engine = AnalysisEngine::with_defaults();
//! let result = engine.analyze_single(
//!     "SEC approves spot Bitcoin ETF",
//!     "Analysts expect strong inflows",
//!     "req-1",
//! )?;
//! let summary = summarize(&[result]);
//! ```

pub mod aggregator;
pub mod boundary;
pub mod coins;
pub mod config;
pub mod engine;
pub mod error;
pub mod lexicon;
pub mod scorer;

// Re-export main types
pub use aggregator::{BatchAggregator, HIGH_CONFIDENCE_CUTOFF, TOP_COINS_LIMIT, summarize};
pub use boundary::{contains_bounded, find_bounded, normalize};
pub use coins::{CoinDefinition, CoinDetector};
pub use config::ScoringConfig;
pub use engine::{AnalysisEngine, Assessment, ImpactAssessor, ItemOutcome, item_request_id};
pub use error::{AnalysisError, AssessorError, ConfigError, LexiconError, Result};
pub use lexicon::{KeywordEntry, Lexicon};
pub use scorer::{KeywordMatch, KeywordMatches, KeywordScorer, SignalTally};
