//! Herald Core Domain
//!
//! Pure value types for the Herald news sentiment server.
//! This crate contains no async, no I/O, and is 100% unit testable.

pub mod entities;
pub mod values;

// Re-export commonly used types at crate root
pub use entities::{
    // Analysis records
    AnalysisResult,
    // Aggregates
    BatchSummary,
    CoinMentions,
    ImpactClass,
    MarketSentiment,
    NewsItem,
    SentimentBreakdown,
    Timeframe,
};
pub use values::{
    CONFIDENCE_MAX, CONFIDENCE_MIN, CoinSymbol, RequestId, Timestamp, clamp_confidence,
    round_one_decimal,
};
