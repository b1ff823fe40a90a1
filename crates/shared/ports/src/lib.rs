//! Herald Ports
//!
//! Port definitions (traits) for the Herald news sentiment server.
//! These define the boundaries between the analysis core, the tool server,
//! and infrastructure (cache store, webhook delivery).

mod cache;
mod error;
mod notify;

pub use cache::{CacheStats, SentimentCache};
pub use error::{CacheError, CacheResult, NotifyError, NotifyResult};
pub use notify::{DeliveryStatus, NotificationSink};
