//! Herald Server
//!
//! JSON-RPC 2.0 tool server over stdin/stdout exposing crypto news
//! sentiment analysis to workflow-automation clients.
//!
//! ## Methods
//!
//! - `initialize`, `ping`, `tools/list`, `tools/call`
//! - `notifications/*` are accepted silently
//!
//! ## Tools
//!
//! | Tool | Purpose |
//! |------|---------|
//! | `crypto_news_analyze` | Score one title/summary pair |
//! | `crypto_news_batch_analyze` | Score up to 50 items, with a summary |
//! | `crypto_market_sentiment` | Aggregate recent analyses per timeframe |
//! | `crypto_impact_keywords` | Show which lexicon phrases a text hits |
//! | `server_health_check` | Component status |
//!
//! Protocol frames go to stdout; logs go to stderr.

pub mod config;
pub mod error;
pub mod handlers;
pub mod journal;
pub mod protocol;
pub mod server;
pub mod tools;

pub use config::{Limits, ServerConfig};
pub use error::{ConfigError, Result, RpcError, ServerError, codes};
pub use journal::AnalysisJournal;
pub use protocol::{PROTOCOL_VERSION, RpcRequest, RpcResponse};
pub use server::ToolServer;
pub use tools::{Tool, catalog};
