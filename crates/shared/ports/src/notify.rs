use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::NotifyResult;

/// Result of probing a notification receiver
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeliveryStatus {
    Healthy,
    Unhealthy,
    Disabled,
}

impl DeliveryStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            DeliveryStatus::Healthy => "healthy",
            DeliveryStatus::Unhealthy => "unhealthy",
            DeliveryStatus::Disabled => "disabled",
        }
    }
}

/// Port for fire-and-forget delivery of batch results
///
/// Delivery outcome never affects the analysis result itself.
#[async_trait]
pub trait NotificationSink: Send + Sync {
    /// Whether a receiver is configured
    fn is_enabled(&self) -> bool;

    /// Deliver the serialized results of one batch
    async fn send_batch_results(&self, results: &[Value], request_id: &str) -> NotifyResult<()>;

    /// Check that the receiver is reachable
    async fn test(&self) -> DeliveryStatus;
}
