//! Exchange-rate tables relative to the base currency.

use crate::core::catalog::{BASE_CURRENCY, CurrencyCode, normalize};
use serde::Deserialize;
use std::collections::{BTreeMap, HashMap};
use thiserror::Error;
use tracing::debug;

/// Why a refresh did not produce a usable table.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RateError {
    #[error("Failed to fetch rates: {0}")]
    Fetch(String),

    #[error("Malformed rate payload: {0}")]
    Malformed(String),

    #[error("Rate payload does not contain the base currency {base}", base = BASE_CURRENCY)]
    MissingBase,

    #[error("Rate payload covers {found} known currencies, at least {required} required")]
    InsufficientCoverage { found: usize, required: usize },
}

/// Units of each currency per one unit of [`BASE_CURRENCY`].
///
/// Tables are immutable once built. The base entry is always exactly 1.
#[derive(Debug, Clone, PartialEq)]
pub struct RateTable {
    rates: BTreeMap<CurrencyCode, f64>,
}

impl RateTable {
    /// Builds a table from `(code, rate)` pairs, dropping non-positive or
    /// non-finite rates and pinning the base currency to 1.
    pub fn new(rates: impl IntoIterator<Item = (CurrencyCode, f64)>) -> Self {
        let mut rates: BTreeMap<CurrencyCode, f64> = rates
            .into_iter()
            .filter(|(code, rate)| {
                let usable = rate.is_finite() && *rate > 0.0;
                if !usable {
                    debug!("Dropping unusable rate {} for {}", rate, code);
                }
                usable
            })
            .collect();
        rates.insert(BASE_CURRENCY, 1.0);
        Self { rates }
    }

    /// Hand-maintained rates bundled with the crate. Never expires.
    pub fn fallback() -> Self {
        Self::new(FALLBACK_RATES.iter().copied())
    }

    pub fn get(&self, code: CurrencyCode) -> Option<f64> {
        if code.is_base() {
            return Some(1.0);
        }
        self.rates.get(&code).copied()
    }

    pub fn contains(&self, code: CurrencyCode) -> bool {
        self.rates.contains_key(&code)
    }

    pub fn len(&self) -> usize {
        self.rates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rates.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (CurrencyCode, f64)> + '_ {
        self.rates.iter().map(|(code, rate)| (*code, *rate))
    }

    /// Parses and validates a provider payload.
    ///
    /// The payload must be an object with a `rates` (or `conversion_rates`)
    /// map. Codes outside the catalog are ignored. The base currency must be
    /// present, and the share of catalog codes carried must reach
    /// `min_coverage`.
    pub fn from_payload(payload: &serde_json::Value, min_coverage: f64) -> Result<Self, RateError> {
        let parsed = RatePayload::deserialize(payload)
            .map_err(|e| RateError::Malformed(e.to_string()))?;

        let mut known = HashMap::new();
        for (raw_code, value) in &parsed.rates {
            let Some(code) = normalize(raw_code) else {
                continue;
            };
            match value.as_f64() {
                Some(rate) => {
                    known.insert(code, rate);
                }
                None => debug!("Ignoring non-numeric rate for {}: {}", raw_code, value),
            }
        }

        if !known.contains_key(&BASE_CURRENCY) {
            return Err(RateError::MissingBase);
        }

        let table = Self::new(known);
        let required = required_coverage(min_coverage);
        if table.len() < required {
            return Err(RateError::InsufficientCoverage {
                found: table.len(),
                required,
            });
        }

        Ok(table)
    }
}

fn required_coverage(min_coverage: f64) -> usize {
    let fraction = min_coverage.clamp(0.0, 1.0);
    ((CurrencyCode::ALL.len() as f64) * fraction).ceil() as usize
}

#[derive(Debug, Deserialize)]
struct RatePayload {
    #[serde(alias = "conversion_rates")]
    rates: HashMap<String, serde_json::Value>,
}

const FALLBACK_RATES: [(CurrencyCode, f64); 36] = [
    (CurrencyCode::Cny, 1.0),
    (CurrencyCode::Usd, 0.14),
    (CurrencyCode::Eur, 0.13),
    (CurrencyCode::Gbp, 0.11),
    (CurrencyCode::Jpy, 20.5),
    (CurrencyCode::Hkd, 1.09),
    (CurrencyCode::Aud, 0.21),
    (CurrencyCode::Nzd, 0.23),
    (CurrencyCode::Sgd, 0.18),
    (CurrencyCode::Krw, 190.0),
    (CurrencyCode::Twd, 4.4),
    (CurrencyCode::Mop, 1.12),
    (CurrencyCode::Thb, 4.8),
    (CurrencyCode::Myr, 0.62),
    (CurrencyCode::Idr, 2250.0),
    (CurrencyCode::Php, 7.9),
    (CurrencyCode::Vnd, 3500.0),
    (CurrencyCode::Inr, 11.7),
    (CurrencyCode::Chf, 0.12),
    (CurrencyCode::Sek, 1.45),
    (CurrencyCode::Nok, 1.48),
    (CurrencyCode::Dkk, 0.95),
    (CurrencyCode::Pln, 0.55),
    (CurrencyCode::Czk, 3.2),
    (CurrencyCode::Huf, 50.0),
    (CurrencyCode::Rub, 12.5),
    (CurrencyCode::Try, 4.6),
    (CurrencyCode::Aed, 0.51),
    (CurrencyCode::Sar, 0.52),
    (CurrencyCode::Qar, 0.51),
    (CurrencyCode::Ils, 0.51),
    (CurrencyCode::Egp, 6.8),
    (CurrencyCode::Zar, 2.5),
    (CurrencyCode::Cad, 0.19),
    (CurrencyCode::Mxn, 2.6),
    (CurrencyCode::Brl, 0.77),
];
