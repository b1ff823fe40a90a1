//! Herald Notify
//!
//! Implementations of the [`NotificationSink`] port:
//! - [`WebhookNotifier`]: POSTs batch results as JSON to a configured URL
//! - [`DisabledNotifier`]: used when no receiver is configured
//!
//! Delivery is best effort. There are no retries and no queue; the caller
//! logs failures and moves on.
//!
//! [`NotificationSink`]: herald_ports::NotificationSink

mod config;
mod webhook;

pub use config::WebhookConfig;
pub use webhook::{DisabledNotifier, WebhookNotifier, notifier_from_config};
