mod analysis;
mod impact;
mod market;
mod news;
mod summary;

pub use analysis::AnalysisResult;
pub use impact::ImpactClass;
pub use market::{MarketSentiment, SentimentBreakdown, Timeframe};
pub use news::NewsItem;
pub use summary::{BatchSummary, CoinMentions};
