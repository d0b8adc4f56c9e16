//! Outbound WhatsApp delivery through the Twilio REST API.

use async_trait::async_trait;
use quipu_core::config::TwilioConfig;
use quipu_core::error::QuipuError;
use quipu_core::traits::WelcomeDelivery;
use tracing::info;

/// Sends WhatsApp messages through Twilio's Messages endpoint.
pub struct TwilioSender {
    client: reqwest::Client,
    account_sid: String,
    auth_token: String,
    from_number: String,
}

impl TwilioSender {
    pub fn new(config: &TwilioConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            account_sid: config.account_sid.clone(),
            auth_token: config.auth_token.clone(),
            from_number: config.from_number.clone(),
        }
    }
}

#[async_trait]
impl WelcomeDelivery for TwilioSender {
    async fn send_welcome(&self, to: &str, body: &str) -> Result<(), QuipuError> {
        let url = format!(
            "https://api.twilio.com/2010-04-01/Accounts/{}/Messages.json",
            self.account_sid
        );

        let params = [
            ("From", format!("whatsapp:{}", self.from_number)),
            ("To", format!("whatsapp:{to}")),
            ("Body", body.to_string()),
        ];

        let response = self
            .client
            .post(&url)
            .basic_auth(&self.account_sid, Some(&self.auth_token))
            .form(&params)
            .send()
            .await
            .map_err(|e| QuipuError::Delivery(format!("twilio request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            return Err(QuipuError::Delivery(format!(
                "twilio returned {status}: {detail}"
            )));
        }

        info!("welcome message delivered to {to}");
        Ok(())
    }
}

/// Delivery stand-in used when Twilio is disabled in config. Always fails,
/// which keeps the add-user command's delivery-before-persistence contract
/// honest instead of silently skipping the welcome message.
pub struct DisabledDelivery;

#[async_trait]
impl WelcomeDelivery for DisabledDelivery {
    async fn send_welcome(&self, _to: &str, _body: &str) -> Result<(), QuipuError> {
        Err(QuipuError::Delivery(
            "outbound delivery is disabled in config".to_string(),
        ))
    }
}
