//! # quipu-rates
//!
//! Currency conversion. Identity conversions never touch the network, and a
//! failed rate lookup is masked by a configured fallback rate — the user
//! always gets a reply, even with an approximate conversion.

use async_trait::async_trait;
use quipu_core::config::RatesConfig;
use quipu_core::error::QuipuError;
use quipu_core::traits::RateSource;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::warn;

/// Converts amounts between currencies through a [`RateSource`].
#[derive(Clone)]
pub struct Converter {
    source: Arc<dyn RateSource>,
    fallback_rate: f64,
}

impl Converter {
    pub fn new(source: Arc<dyn RateSource>, fallback_rate: f64) -> Self {
        Self {
            source,
            fallback_rate,
        }
    }

    /// Convert `amount` from `base` to `target`.
    ///
    /// Same-currency conversions return the amount unchanged without a
    /// lookup. A failed lookup is logged and replaced by the fallback rate,
    /// never propagated.
    pub async fn convert(&self, amount: f64, base: &str, target: &str) -> f64 {
        if base == target {
            return amount;
        }

        let rate = match self.source.lookup_rate(base, target).await {
            Ok(rate) => rate,
            Err(e) => {
                warn!("rate lookup {base}->{target} failed, using fallback: {e}");
                self.fallback_rate
            }
        };

        amount * rate
    }
}

/// Response shape of the Fixer `latest` endpoint (only the part we read).
#[derive(Debug, serde::Deserialize)]
struct FixerResponse {
    #[serde(default)]
    rates: HashMap<String, f64>,
}

/// Exchange-rate client for the apilayer Fixer API.
pub struct FixerClient {
    client: reqwest::Client,
    api_url: String,
    api_key: String,
}

impl FixerClient {
    pub fn new(config: &RatesConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_url: config.api_url.clone(),
            api_key: config.api_key.clone(),
        }
    }
}

#[async_trait]
impl RateSource for FixerClient {
    async fn lookup_rate(&self, base: &str, target: &str) -> Result<f64, QuipuError> {
        let url = format!("{}?base={base}&symbols={target}", self.api_url);

        let response = self
            .client
            .get(&url)
            .header("apikey", &self.api_key)
            .send()
            .await
            .map_err(|e| QuipuError::Rates(format!("request failed: {e}")))?;

        if !response.status().is_success() {
            return Err(QuipuError::Rates(format!(
                "provider returned {}",
                response.status()
            )));
        }

        let body: FixerResponse = response
            .json()
            .await
            .map_err(|e| QuipuError::Rates(format!("malformed response: {e}")))?;

        body.rates
            .get(target)
            .copied()
            .ok_or_else(|| QuipuError::Rates(format!("no rate for {target} in response")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Rate source that counts lookups and returns a fixed rate or an error.
    struct FakeSource {
        rate: Option<f64>,
        calls: AtomicUsize,
    }

    #[async_trait]
    impl RateSource for FakeSource {
        async fn lookup_rate(&self, _base: &str, _target: &str) -> Result<f64, QuipuError> {
            self.calls.fetch_add(1, Ordering::Relaxed);
            self.rate
                .ok_or_else(|| QuipuError::Rates("provider down".to_string()))
        }
    }

    #[tokio::test]
    async fn test_identity_conversion_skips_lookup() {
        let source = Arc::new(FakeSource {
            rate: Some(4000.0),
            calls: AtomicUsize::new(0),
        });
        let converter = Converter::new(source.clone(), 4700.0);

        assert_eq!(converter.convert(123.45, "COP", "COP").await, 123.45);
        assert_eq!(source.calls.load(Ordering::Relaxed), 0);
    }

    #[tokio::test]
    async fn test_conversion_multiplies_by_rate() {
        let source = Arc::new(FakeSource {
            rate: Some(4000.0),
            calls: AtomicUsize::new(0),
        });
        let converter = Converter::new(source.clone(), 4700.0);

        assert_eq!(converter.convert(100.0, "USD", "COP").await, 400_000.0);
        assert_eq!(source.calls.load(Ordering::Relaxed), 1);
    }

    #[tokio::test]
    async fn test_lookup_failure_uses_fallback_rate() {
        let source = Arc::new(FakeSource {
            rate: None,
            calls: AtomicUsize::new(0),
        });
        let converter = Converter::new(source, 4700.0);

        assert_eq!(converter.convert(2.0, "USD", "COP").await, 9400.0);
    }
}
