use crate::error::QuipuError;
use async_trait::async_trait;

/// Exchange-rate lookup — consumed only by the currency converter.
///
/// Implementations call an external provider; the converter decides what
/// happens on failure, so implementations should propagate errors rather
/// than mask them.
#[async_trait]
pub trait RateSource: Send + Sync {
    /// How many units of `target` one unit of `base` buys right now.
    async fn lookup_rate(&self, base: &str, target: &str) -> Result<f64, QuipuError>;
}

/// Outbound welcome delivery — consumed only by the add-user command.
///
/// Delivery success is a precondition of persisting the invited user, so a
/// returned error must mean the message was not accepted by the platform.
#[async_trait]
pub trait WelcomeDelivery: Send + Sync {
    /// Send `body` to the phone number `to`.
    async fn send_welcome(&self, to: &str, body: &str) -> Result<(), QuipuError>;
}
