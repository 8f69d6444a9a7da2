//! Exchange rate abstractions

use crate::core::rounding::round2;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::warn;

pub const BASE_CURRENCY: &str = "USD";

/// Multipliers from the base currency to each quoted currency.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExchangeRates {
    pub base: String,
    pub rates: HashMap<String, f64>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl ExchangeRates {
    pub fn new(base: &str, rates: HashMap<String, f64>) -> Self {
        ExchangeRates {
            base: base.to_string(),
            rates,
            updated_at: None,
        }
    }

    pub fn rate(&self, currency: &str) -> Option<f64> {
        self.rates.get(currency).copied()
    }
}

/// Source of a full rate set. Implementations report failures through
/// logging and return `None`.
#[async_trait]
pub trait ExchangeRateProvider: Send + Sync {
    async fn fetch_rates(&self) -> Option<ExchangeRates>;
}

/// Converts `amount` from the base currency into `target_currency`.
pub fn convert(amount: f64, target_currency: &str, rates: &ExchangeRates) -> Option<f64> {
    let Some(rate) = rates.rate(target_currency) else {
        warn!("Currency '{target_currency}' not found in exchange rates.");
        return None;
    };
    Some(round2(amount * rate))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_rates() -> ExchangeRates {
        ExchangeRates::new(
            BASE_CURRENCY,
            HashMap::from([("EUR".to_string(), 0.92), ("JPY".to_string(), 149.5)]),
        )
    }

    #[test]
    fn test_convert_known_currency() {
        let rates = sample_rates();
        assert_eq!(convert(150.80, "EUR", &rates), Some(138.74));
        assert_eq!(convert(2.0, "JPY", &rates), Some(299.0));
    }

    #[test]
    fn test_convert_unknown_currency() {
        assert_eq!(convert(100.0, "XYZ", &sample_rates()), None);
    }

    #[test]
    fn test_convert_is_case_sensitive() {
        assert_eq!(convert(100.0, "eur", &sample_rates()), None);
    }
}
