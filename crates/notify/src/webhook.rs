use async_trait::async_trait;
use chrono::Utc;
use herald_ports::{DeliveryStatus, NotificationSink, NotifyError, NotifyResult};
use log::{debug, info, warn};
use reqwest::Client;
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;

use crate::config::WebhookConfig;

/// Body posted after a batch completes
#[derive(Debug, Serialize)]
struct BatchNotification<'a> {
    event: &'static str,
    request_id: &'a str,
    total_items: usize,
    results: &'a [Value],
    timestamp: String,
}

/// Body posted by the webhook health check
#[derive(Debug, Serialize)]
struct TestNotification {
    event: &'static str,
    timestamp: String,
}

fn timestamp() -> String {
    Utc::now().format("%Y-%m-%dT%H:%M:%S%.6fZ").to_string()
}

/// Webhook delivery over HTTP
#[derive(Clone)]
pub struct WebhookNotifier {
    client: Client,
    url: String,
}

impl WebhookNotifier {
    pub fn new(url: impl Into<String>, config: &WebhookConfig) -> NotifyResult<Self> {
        let client = Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(|e| NotifyError::Delivery(e.to_string()))?;
        Ok(Self {
            client,
            url: url.into(),
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    async fn post<B: Serialize + Sync>(&self, body: &B) -> NotifyResult<()> {
        let resp = self
            .client
            .post(&self.url)
            .json(body)
            .send()
            .await
            .map_err(|e| NotifyError::Delivery(e.to_string()))?;

        let status = resp.status();
        if status.is_success() {
            Ok(())
        } else {
            Err(NotifyError::Status(status.as_u16()))
        }
    }
}

#[async_trait]
impl NotificationSink for WebhookNotifier {
    fn is_enabled(&self) -> bool {
        true
    }

    async fn send_batch_results(&self, results: &[Value], request_id: &str) -> NotifyResult<()> {
        let body = BatchNotification {
            event: "batch_analysis_complete",
            request_id,
            total_items: results.len(),
            results,
            timestamp: timestamp(),
        };
        self.post(&body).await?;
        debug!("Webhook delivered for {} ({} items)", request_id, results.len());
        Ok(())
    }

    async fn test(&self) -> DeliveryStatus {
        let body = TestNotification {
            event: "webhook_test",
            timestamp: timestamp(),
        };
        match self.post(&body).await {
            Ok(()) => DeliveryStatus::Healthy,
            Err(e) => {
                warn!("Webhook health check failed: {}", e);
                DeliveryStatus::Unhealthy
            }
        }
    }
}

/// Sink used when no webhook is configured
#[derive(Debug, Clone, Copy, Default)]
pub struct DisabledNotifier;

#[async_trait]
impl NotificationSink for DisabledNotifier {
    fn is_enabled(&self) -> bool {
        false
    }

    async fn send_batch_results(&self, _results: &[Value], _request_id: &str) -> NotifyResult<()> {
        Ok(())
    }

    async fn test(&self) -> DeliveryStatus {
        DeliveryStatus::Disabled
    }
}

/// Webhook sink when a URL is configured, otherwise the disabled sink
pub fn notifier_from_config(config: &WebhookConfig) -> NotifyResult<Arc<dyn NotificationSink>> {
    match config.url() {
        Some(url) => {
            info!("Webhook notifications enabled");
            Ok(Arc::new(WebhookNotifier::new(url, config)?))
        }
        None => {
            info!("Webhook notifications disabled (no URL configured)");
            Ok(Arc::new(DisabledNotifier))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_disabled_notifier() {
        let sink = DisabledNotifier;
        assert!(!sink.is_enabled());
        assert!(sink.send_batch_results(&[], "r").await.is_ok());
        assert_eq!(sink.test().await, DeliveryStatus::Disabled);
    }

    #[test]
    fn test_blank_url_disables() {
        let config = WebhookConfig {
            url: Some("   ".to_string()),
            ..Default::default()
        };
        let sink = notifier_from_config(&config).unwrap();
        assert!(!sink.is_enabled());
    }

    #[test]
    fn test_url_enables() {
        let config = WebhookConfig {
            url: Some("http://127.0.0.1:9/hook".to_string()),
            ..Default::default()
        };
        let sink = notifier_from_config(&config).unwrap();
        assert!(sink.is_enabled());
    }

    #[tokio::test]
    async fn test_unreachable_receiver_reports_failure() {
        // Port 9 (discard) is closed on test machines; connection is refused
        let config = WebhookConfig {
            url: Some("http://127.0.0.1:9/hook".to_string()),
            timeout_secs: 2,
        };
        let notifier = WebhookNotifier::new("http://127.0.0.1:9/hook", &config).unwrap();
        let err = notifier.send_batch_results(&[], "r").await.unwrap_err();
        assert!(matches!(err, NotifyError::Delivery(_)));
        assert_eq!(notifier.test().await, DeliveryStatus::Unhealthy);
    }

    #[test]
    fn test_batch_body_shape() {
        let results = vec![serde_json::json!({"impact": "Positive"})];
        let body = BatchNotification {
            event: "batch_analysis_complete",
            request_id: "mcp_batch_1",
            total_items: results.len(),
            results: &results,
            timestamp: "2024-01-01T00:00:00.000000Z".to_string(),
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["event"], "batch_analysis_complete");
        assert_eq!(json["total_items"], 1);
        assert_eq!(json["results"][0]["impact"], "Positive");
    }
}
