use chrono::Duration;
use serde::{Deserialize, Serialize};
use std::fmt;

use super::{CoinMentions, ImpactClass};
use crate::values::{CoinSymbol, Timestamp};

/// Look-back window for market-wide sentiment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Timeframe {
    #[serde(rename = "1h")]
    OneHour,
    #[serde(rename = "6h")]
    SixHours,
    #[default]
    #[serde(rename = "24h")]
    OneDay,
}

impl Timeframe {
    pub const ALL: [Timeframe; 3] = [Timeframe::OneHour, Timeframe::SixHours, Timeframe::OneDay];

    pub fn as_str(&self) -> &'static str {
        match self {
            Timeframe::OneHour => "1h",
            Timeframe::SixHours => "6h",
            Timeframe::OneDay => "24h",
        }
    }

    /// Parse the wire name (`1h`, `6h`, `24h`)
    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.as_str() == s)
    }

    pub fn duration(&self) -> Duration {
        match self {
            Timeframe::OneHour => Duration::hours(1),
            Timeframe::SixHours => Duration::hours(6),
            Timeframe::OneDay => Duration::hours(24),
        }
    }
}

impl fmt::Display for Timeframe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Per-class counts inside a market sentiment report
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SentimentBreakdown {
    pub positive: usize,
    pub negative: usize,
    pub neutral: usize,
}

/// Market-wide sentiment over recently analyzed news
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarketSentiment {
    pub timeframe: Timeframe,
    pub overall_sentiment: ImpactClass,
    pub confidence: f64,
    pub analyzed_items: usize,
    pub sentiment_breakdown: SentimentBreakdown,
    pub top_coins_mentioned: Vec<CoinMentions>,
    pub timestamp: Timestamp,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filtered_coins: Option<Vec<CoinSymbol>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timeframe_wire_names() {
        assert_eq!(Timeframe::parse("6h"), Some(Timeframe::SixHours));
        assert_eq!(Timeframe::parse("7d"), None);
        assert_eq!(
            serde_json::to_string(&Timeframe::OneDay).unwrap(),
            "\"24h\""
        );
        assert_eq!(Timeframe::OneHour.duration(), Duration::hours(1));
    }
}
