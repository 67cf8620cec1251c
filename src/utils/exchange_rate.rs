use serde::Deserialize;
use std::collections::HashMap;
use tracing::{info, warn};

use crate::config::ExchangeRateConfig;
use crate::models::{ConversionRate, RateSource};
use crate::utils::http::{FetchedResponse, ResilientFetcher, Target};

/// Shape of the exchange-rate API response. Only `result` is always present.
#[derive(Debug, Deserialize)]
struct RatePayload {
    result: String,
    #[serde(rename = "error-type")]
    error_type: Option<String>,
    #[serde(default)]
    conversion_rates: HashMap<String, f64>,
}

/// Success predicate for the rate endpoint: the payload must say `success`.
fn require_success_marker(response: &FetchedResponse) -> Result<(), String> {
    let payload: RatePayload = serde_json::from_str(&response.body)
        .map_err(|e| format!("invalid payload (status {}): {}", response.status, e))?;

    if payload.result == "success" {
        Ok(())
    } else {
        Err(payload
            .error_type
            .unwrap_or_else(|| format!("result: {}", payload.result)))
    }
}

/// Resolves the base-to-target conversion factor once per run, degrading to
/// the configured fallback when the API cannot be used.
pub struct RateResolver<'a> {
    config: &'a ExchangeRateConfig,
}

impl<'a> RateResolver<'a> {
    pub fn new(config: &'a ExchangeRateConfig) -> Self {
        Self { config }
    }

    pub async fn resolve_rate(&self, fetcher: &ResilientFetcher) -> ConversionRate {
        let target = Target::new(self.config.api_url.clone());

        match fetcher
            .fetch(&target, &self.config.fetch, require_success_marker)
            .await
        {
            Ok(response) => match self.extract_rate(&response) {
                Some(rate) => {
                    info!(
                        "API success 1 USD -> {} {}",
                        rate.value(),
                        self.config.target_currency
                    );
                    return rate;
                }
                None => warn!(
                    "Exchange-rate payload has no usable {} rate",
                    self.config.target_currency
                ),
            },
            Err(e) => warn!("Could not fetch the conversion rate: {}", e),
        }

        self.fallback()
    }

    fn extract_rate(&self, response: &FetchedResponse) -> Option<ConversionRate> {
        let payload: RatePayload = serde_json::from_str(&response.body).ok()?;
        let value = *payload.conversion_rates.get(&self.config.target_currency)?;
        ConversionRate::new(value, RateSource::Live)
    }

    fn fallback(&self) -> ConversionRate {
        warn!(
            "Using fallback rate 1 USD -> {} {}",
            self.config.fallback_rate, self.config.target_currency
        );
        ConversionRate::new(self.config.fallback_rate, RateSource::Fallback)
            .unwrap_or(ConversionRate::DEFAULT_FALLBACK)
    }
}
