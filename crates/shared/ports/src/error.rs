use thiserror::Error;

/// Errors raised by a cache backend
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CacheError {
    #[error("Cache is not connected")]
    Disconnected,

    #[error("Cache backend error: {0}")]
    Backend(String),

    #[error("Cached value could not be encoded: {0}")]
    Encoding(String),
}

pub type CacheResult<T> = std::result::Result<T, CacheError>;

/// Errors raised while delivering a notification
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum NotifyError {
    #[error("Notifications are disabled")]
    Disabled,

    #[error("Delivery failed: {0}")]
    Delivery(String),

    #[error("Receiver answered with status {0}")]
    Status(u16),

    #[error("Payload could not be encoded: {0}")]
    Encoding(String),
}

pub type NotifyResult<T> = std::result::Result<T, NotifyError>;
