use serde::{Deserialize, Serialize};
use std::fmt;

/// One product card as found on the listing page. Any field may be missing
/// when the card lacks the matching sub-element.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawProduct {
    pub title: Option<String>,
    pub price_text: Option<String>,
    pub image_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PricedProduct {
    pub title: String,
    pub price_primary: f64,
    pub price_secondary: f64,
    /// Empty when the card had no image.
    pub image_url: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RateSource {
    Live,
    Fallback,
}

impl fmt::Display for RateSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RateSource::Live => write!(f, "live"),
            RateSource::Fallback => write!(f, "fallback"),
        }
    }
}

/// Units of the target currency per one unit of the base currency.
/// Resolved once per run and never mutated afterwards.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConversionRate {
    value: f64,
    source: RateSource,
}

impl ConversionRate {
    /// Used when the configured fallback is itself unusable.
    pub const DEFAULT_FALLBACK: Self = Self {
        value: 10.0,
        source: RateSource::Fallback,
    };

    /// Returns `None` unless `value` is finite and positive.
    pub fn new(value: f64, source: RateSource) -> Option<Self> {
        (value.is_finite() && value > 0.0).then_some(Self { value, source })
    }

    pub fn value(&self) -> f64 {
        self.value
    }

    pub fn source(&self) -> RateSource {
        self.source
    }

    pub fn is_fallback(&self) -> bool {
        self.source == RateSource::Fallback
    }
}

impl fmt::Display for ConversionRate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.value, self.source)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn conversion_rate_must_be_positive() {
        assert!(ConversionRate::new(0.0, RateSource::Live).is_none());
        assert!(ConversionRate::new(-3.2, RateSource::Live).is_none());
        assert!(ConversionRate::new(f64::NAN, RateSource::Live).is_none());

        let rate = ConversionRate::new(9.87, RateSource::Fallback).unwrap();
        assert_eq!(rate.value(), 9.87);
        assert!(rate.is_fallback());
        assert_eq!(rate.to_string(), "9.87 (fallback)");
    }
}
