//! Pivot conversion through the base currency, plus display formatting.

use crate::core::catalog::{BASE_CURRENCY, CurrencyCode, CurrencyDescriptor, normalize};
use crate::core::rates::RateTable;
use rust_decimal::prelude::*;
use tracing::debug;

/// Converts `amount` from one currency to another via the base currency.
///
/// Same-currency conversion returns `amount` untouched. A missing rate for
/// either side also returns `amount`, so callers always get something to
/// show. Otherwise the result is rounded half-up to two decimals.
pub fn convert(amount: f64, from: CurrencyCode, to: CurrencyCode, table: &RateTable) -> f64 {
    if from == to {
        return amount;
    }

    let (Some(from_rate), Some(to_rate)) = (table.get(from), table.get(to)) else {
        debug!("No rate for {} -> {}, passing amount through", from, to);
        return amount;
    };

    let in_base = if from.is_base() {
        amount
    } else {
        amount / from_rate
    };
    let result = if to.is_base() {
        in_base
    } else {
        in_base * to_rate
    };

    round_half_up(result, 2)
}

/// String-keyed variant of [`convert`] for untrusted input.
///
/// Both codes are normalized first; an unknown code on either side passes
/// `amount` through unchanged.
pub fn convert_codes(amount: f64, from: &str, to: &str, table: &RateTable) -> f64 {
    match (normalize(from), normalize(to)) {
        (Some(from), Some(to)) => convert(amount, from, to, table),
        _ => {
            debug!("Unknown currency in {} -> {}, passing amount through", from, to);
            amount
        }
    }
}

pub(crate) fn round_half_up(value: f64, decimals: u32) -> f64 {
    Decimal::from_f64(value)
        .map(|d| d.round_dp_with_strategy(decimals, RoundingStrategy::MidpointAwayFromZero))
        .and_then(|d| d.to_f64())
        .unwrap_or(value)
}

/// A price to render: an amount in `source`, shown in the selected currency.
#[derive(Debug, Clone, PartialEq)]
pub struct PriceDisplay {
    pub amount: f64,
    pub source: CurrencyCode,
    pub show_symbol: bool,
    pub suffix: Option<String>,
}

impl PriceDisplay {
    pub fn new(amount: f64) -> Self {
        Self {
            amount,
            source: BASE_CURRENCY,
            show_symbol: true,
            suffix: None,
        }
    }

    pub fn from_currency(mut self, source: CurrencyCode) -> Self {
        self.source = source;
        self
    }

    pub fn without_symbol(mut self) -> Self {
        self.show_symbol = false;
        self
    }

    pub fn with_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.suffix = Some(suffix.into());
        self
    }
}

/// Formats an already converted amount for end users.
///
/// This is a separate rounding stage from [`convert`]: the value is rounded
/// half-up to whole units and grouped in thousands.
pub fn format_price(
    value: f64,
    descriptor: &CurrencyDescriptor,
    show_symbol: bool,
    suffix: Option<&str>,
) -> String {
    let whole = round_half_up(value, 0);
    let sign = if whole < 0.0 { "-" } else { "" };
    let digits = format!("{:.0}", whole.abs());
    let symbol = if show_symbol { descriptor.symbol } else { "" };

    format!(
        "{sign}{symbol}{}{}",
        group_thousands(&digits),
        suffix.unwrap_or_default()
    )
}

fn group_thousands(digits: &str) -> String {
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    grouped
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> RateTable {
        RateTable::fallback()
    }

    #[test]
    fn test_same_currency_is_identity() {
        let empty = RateTable::new([] as [(CurrencyCode, f64); 0]);
        for code in CurrencyCode::ALL {
            assert_eq!(convert(123.456, code, code, &table()), 123.456);
            assert_eq!(convert(0.005, code, code, &empty), 0.005);
        }
    }

    #[test]
    fn test_base_to_usd_with_fallback() {
        assert_eq!(convert(1000.0, CurrencyCode::Cny, CurrencyCode::Usd, &table()), 140.00);
    }

    #[test]
    fn test_usd_to_base() {
        assert_eq!(convert(14.0, CurrencyCode::Usd, CurrencyCode::Cny, &table()), 100.0);
    }

    #[test]
    fn test_cross_rate_goes_through_base() {
        // 100 USD -> 714.2857 CNY -> 92.857 EUR
        assert_eq!(convert(100.0, CurrencyCode::Usd, CurrencyCode::Eur, &table()), 92.86);
    }

    #[test]
    fn test_missing_rate_passes_through() {
        let partial = RateTable::new([(CurrencyCode::Usd, 0.14)]);
        assert_eq!(convert(100.0, CurrencyCode::Cny, CurrencyCode::Zar, &partial), 100.0);
        assert_eq!(convert(100.0, CurrencyCode::Zar, CurrencyCode::Usd, &partial), 100.0);
    }

    #[test]
    fn test_convert_codes_normalizes_and_fails_soft() {
        assert_eq!(convert_codes(1000.0, "rmb", "usd", &table()), 140.0);
        assert_eq!(convert_codes(100.0, "CNY", "ZZZ", &table()), 100.0);
        assert_eq!(convert_codes(100.0, "xyz", "USD", &table()), 100.0);
    }

    #[test]
    fn test_round_trip_within_a_cent() {
        let pairs = [
            (CurrencyCode::Usd, CurrencyCode::Eur),
            (CurrencyCode::Eur, CurrencyCode::Gbp),
            (CurrencyCode::Usd, CurrencyCode::Gbp),
            (CurrencyCode::Hkd, CurrencyCode::Cny),
        ];
        for (a, b) in pairs {
            for amount in [0.0, 1.0, 99.99, 1000.0, 123456.78] {
                for (from, to) in [(a, b), (b, a)] {
                    let there = convert(amount, from, to, &table());
                    let back = convert(there, to, from, &table());
                    assert!(
                        (back - amount).abs() <= 0.01 + 1e-9,
                        "{amount} {from}->{to}->{from} gave {back}"
                    );
                }
            }
        }
    }

    #[test]
    fn test_rounding_is_half_up() {
        assert_eq!(round_half_up(2.345, 2), 2.35);
        assert_eq!(round_half_up(2.344, 2), 2.34);
        assert_eq!(round_half_up(0.5, 0), 1.0);
        assert_eq!(round_half_up(2.5, 0), 3.0);
        assert!(round_half_up(f64::NAN, 2).is_nan());
    }

    #[test]
    fn test_format_price() {
        let usd = CurrencyCode::Usd.descriptor();
        assert_eq!(format_price(140.0, usd, true, None), "$140");
        assert_eq!(format_price(1234567.5, usd, true, None), "$1,234,568");
        assert_eq!(format_price(999.49, usd, false, Some(" / month")), "999 / month");
        assert_eq!(format_price(-1500.0, usd, true, None), "-$1,500");
        assert_eq!(format_price(0.4, usd, true, None), "$0");
    }

    #[test]
    fn test_price_display_defaults() {
        let display = PriceDisplay::new(10.0);
        assert_eq!(display.source, BASE_CURRENCY);
        assert!(display.show_symbol);
        assert!(display.suffix.is_none());

        let display = display
            .from_currency(CurrencyCode::Usd)
            .without_symbol()
            .with_suffix("+");
        assert_eq!(display.source, CurrencyCode::Usd);
        assert!(!display.show_symbol);
        assert_eq!(display.suffix.as_deref(), Some("+"));
    }
}
