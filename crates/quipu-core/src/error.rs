use thiserror::Error;

/// Top-level error type for Quipu.
#[derive(Debug, Error)]
pub enum QuipuError {
    /// Error from the persistent store.
    #[error("storage error: {0}")]
    Storage(String),

    /// Error from the exchange-rate provider.
    #[error("rates error: {0}")]
    Rates(String),

    /// Error delivering an outbound message.
    #[error("delivery error: {0}")]
    Delivery(String),

    /// Configuration error.
    #[error("config error: {0}")]
    Config(String),

    /// I/O error.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
