use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;
use std::time::Duration;

const DEFAULT_CONFIG: &str = include_str!("../config/default.toml");

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub listing: ListingConfig,
    pub exchange_rate: ExchangeRateConfig,
    pub report: ReportConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListingConfig {
    pub url: String,
    pub user_agent: String,
    #[serde(default)]
    pub headers: HashMap<String, String>,
    pub card_selector: String,
    pub title_selector: String,
    pub price_selector: String,
    pub image_selector: String,
    /// Attributes tried in order when reading the card image.
    pub image_attributes: Vec<String>,
    pub fetch: RetryPolicy,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExchangeRateConfig {
    pub api_url: String,
    pub target_currency: String,
    pub fallback_rate: f64,
    pub fetch: RetryPolicy,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportConfig {
    pub csv_path: PathBuf,
    pub chart_path: PathBuf,
    pub chart_title: String,
    pub fixed_divisor: f64,
    pub primary_currency: String,
    pub secondary_currency: String,
}

/// Attempt budget for a single network call site.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub timeout_secs: u64,
    pub backoff_ms: u64,
}

impl RetryPolicy {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn backoff(&self) -> Duration {
        Duration::from_millis(self.backoff_ms)
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            timeout_secs: 5,
            backoff_ms: 1000,
        }
    }
}

impl Config {
    /// Built-in defaults, overlaid by an optional `price_report.*` file and
    /// `PRICE_REPORT__SECTION__KEY` environment variables.
    pub fn load() -> Result<Self> {
        let settings = config::Config::builder()
            .add_source(config::File::from_str(DEFAULT_CONFIG, config::FileFormat::Toml))
            .add_source(config::File::with_name("price_report").required(false))
            .add_source(config::Environment::with_prefix("PRICE_REPORT").separator("__"))
            .build()?;

        let cfg: Config = settings.try_deserialize()?;
        cfg.validate()?;

        Ok(cfg)
    }

    /// Defaults only, ignoring files and environment.
    pub fn defaults() -> Result<Self> {
        let settings = config::Config::builder()
            .add_source(config::File::from_str(DEFAULT_CONFIG, config::FileFormat::Toml))
            .build()?;

        Ok(settings.try_deserialize()?)
    }

    pub fn validate(&self) -> Result<()> {
        if self.listing.url.trim().is_empty() {
            bail!("listing.url must not be empty");
        }
        if self.exchange_rate.api_url.trim().is_empty() {
            bail!("exchange_rate.api_url must not be empty");
        }

        for (name, policy) in [
            ("listing.fetch", &self.listing.fetch),
            ("exchange_rate.fetch", &self.exchange_rate.fetch),
        ] {
            if policy.max_attempts == 0 {
                bail!("{}.max_attempts must be at least 1", name);
            }
        }

        if !(self.exchange_rate.fallback_rate > 0.0) {
            bail!("exchange_rate.fallback_rate must be positive");
        }
        if !(self.report.fixed_divisor > 0.0) {
            bail!("report.fixed_divisor must be positive");
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn defaults_match_reference_run() {
        let cfg = Config::defaults().unwrap();

        assert_eq!(cfg.listing.url, "https://www.jumia.ma/iphone/");
        assert_eq!(cfg.listing.fetch, RetryPolicy::default());
        assert_eq!(cfg.exchange_rate.fetch, RetryPolicy::default());
        assert_eq!(cfg.exchange_rate.fallback_rate, 10.0);
        assert_eq!(cfg.exchange_rate.target_currency, "MAD");
        assert_eq!(cfg.report.fixed_divisor, 10.0);
        assert_eq!(
            cfg.listing.headers.get("accept-language").map(String::as_str),
            Some("en-US,en;q=0.9,ar;q=0.8")
        );
        assert_eq!(cfg.listing.image_attributes, vec!["data-src", "src"]);
        cfg.validate().unwrap();
    }

    #[test]
    fn rejects_zero_attempts() {
        let mut cfg = Config::defaults().unwrap();
        cfg.exchange_rate.fetch.max_attempts = 0;

        let err = cfg.validate().unwrap_err();
        assert!(err.to_string().contains("exchange_rate.fetch.max_attempts"));
    }

    #[test]
    fn rejects_non_positive_divisor() {
        let mut cfg = Config::defaults().unwrap();
        cfg.report.fixed_divisor = 0.0;

        assert!(cfg.validate().is_err());
    }

    #[test]
    fn retry_policy_durations() {
        let policy = RetryPolicy {
            max_attempts: 2,
            timeout_secs: 7,
            backoff_ms: 250,
        };

        assert_eq!(policy.timeout(), Duration::from_secs(7));
        assert_eq!(policy.backoff(), Duration::from_millis(250));
    }
}
