//! Static catalog of supported display currencies.
//!
//! Every code the rest of the crate handles is a [`CurrencyCode`], so an
//! unknown code can only exist as a raw string until it passes through
//! [`normalize`].

use std::fmt::{self, Display};
use std::str::FromStr;

/// Currency all source amounts are expressed in, and the pivot for rate math.
pub const BASE_CURRENCY: CurrencyCode = CurrencyCode::Cny;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd)]
pub enum CurrencyCode {
    Cny,
    Usd,
    Eur,
    Gbp,
    Jpy,
    Hkd,
    Aud,
    Nzd,
    Sgd,
    Krw,
    Twd,
    Mop,
    Thb,
    Myr,
    Idr,
    Php,
    Vnd,
    Inr,
    Chf,
    Sek,
    Nok,
    Dkk,
    Pln,
    Czk,
    Huf,
    Rub,
    Try,
    Aed,
    Sar,
    Qar,
    Ils,
    Egp,
    Zar,
    Cad,
    Mxn,
    Brl,
}

/// Display metadata for a single currency.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CurrencyDescriptor {
    pub code: CurrencyCode,
    pub symbol: &'static str,
    pub display_name: &'static str,
    pub flag: &'static str,
}

/// Buckets used to group the catalog in selection screens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd)]
pub enum CurrencyGroup {
    Major,
    AsiaPacific,
    Europe,
    MiddleEastAfrica,
    Americas,
}

impl CurrencyGroup {
    pub const ALL: [CurrencyGroup; 5] = [
        CurrencyGroup::Major,
        CurrencyGroup::AsiaPacific,
        CurrencyGroup::Europe,
        CurrencyGroup::MiddleEastAfrica,
        CurrencyGroup::Americas,
    ];

    pub fn display_name(&self) -> &'static str {
        match self {
            CurrencyGroup::Major => "Major",
            CurrencyGroup::AsiaPacific => "Asia Pacific",
            CurrencyGroup::Europe => "Europe",
            CurrencyGroup::MiddleEastAfrica => "Middle East & Africa",
            CurrencyGroup::Americas => "Americas",
        }
    }
}

impl Display for CurrencyGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

// Ordered exactly like the enum variants; `descriptor` indexes by discriminant.
static CATALOG: [CurrencyDescriptor; 36] = [
    entry(CurrencyCode::Cny, "¥", "Chinese Yuan", "🇨🇳"),
    entry(CurrencyCode::Usd, "$", "US Dollar", "🇺🇸"),
    entry(CurrencyCode::Eur, "€", "Euro", "🇪🇺"),
    entry(CurrencyCode::Gbp, "£", "British Pound", "🇬🇧"),
    entry(CurrencyCode::Jpy, "JP¥", "Japanese Yen", "🇯🇵"),
    entry(CurrencyCode::Hkd, "HK$", "Hong Kong Dollar", "🇭🇰"),
    entry(CurrencyCode::Aud, "A$", "Australian Dollar", "🇦🇺"),
    entry(CurrencyCode::Nzd, "NZ$", "New Zealand Dollar", "🇳🇿"),
    entry(CurrencyCode::Sgd, "S$", "Singapore Dollar", "🇸🇬"),
    entry(CurrencyCode::Krw, "₩", "South Korean Won", "🇰🇷"),
    entry(CurrencyCode::Twd, "NT$", "New Taiwan Dollar", "🇹🇼"),
    entry(CurrencyCode::Mop, "MOP$", "Macanese Pataca", "🇲🇴"),
    entry(CurrencyCode::Thb, "฿", "Thai Baht", "🇹🇭"),
    entry(CurrencyCode::Myr, "RM", "Malaysian Ringgit", "🇲🇾"),
    entry(CurrencyCode::Idr, "Rp", "Indonesian Rupiah", "🇮🇩"),
    entry(CurrencyCode::Php, "₱", "Philippine Peso", "🇵🇭"),
    entry(CurrencyCode::Vnd, "₫", "Vietnamese Dong", "🇻🇳"),
    entry(CurrencyCode::Inr, "₹", "Indian Rupee", "🇮🇳"),
    entry(CurrencyCode::Chf, "CHF", "Swiss Franc", "🇨🇭"),
    entry(CurrencyCode::Sek, "kr", "Swedish Krona", "🇸🇪"),
    entry(CurrencyCode::Nok, "kr", "Norwegian Krone", "🇳🇴"),
    entry(CurrencyCode::Dkk, "kr", "Danish Krone", "🇩🇰"),
    entry(CurrencyCode::Pln, "zł", "Polish Zloty", "🇵🇱"),
    entry(CurrencyCode::Czk, "Kč", "Czech Koruna", "🇨🇿"),
    entry(CurrencyCode::Huf, "Ft", "Hungarian Forint", "🇭🇺"),
    entry(CurrencyCode::Rub, "₽", "Russian Ruble", "🇷🇺"),
    entry(CurrencyCode::Try, "₺", "Turkish Lira", "🇹🇷"),
    entry(CurrencyCode::Aed, "د.إ", "UAE Dirham", "🇦🇪"),
    entry(CurrencyCode::Sar, "﷼", "Saudi Riyal", "🇸🇦"),
    entry(CurrencyCode::Qar, "QR", "Qatari Riyal", "🇶🇦"),
    entry(CurrencyCode::Ils, "₪", "Israeli New Shekel", "🇮🇱"),
    entry(CurrencyCode::Egp, "E£", "Egyptian Pound", "🇪🇬"),
    entry(CurrencyCode::Zar, "R", "South African Rand", "🇿🇦"),
    entry(CurrencyCode::Cad, "C$", "Canadian Dollar", "🇨🇦"),
    entry(CurrencyCode::Mxn, "MX$", "Mexican Peso", "🇲🇽"),
    entry(CurrencyCode::Brl, "R$", "Brazilian Real", "🇧🇷"),
];

const fn entry(
    code: CurrencyCode,
    symbol: &'static str,
    display_name: &'static str,
    flag: &'static str,
) -> CurrencyDescriptor {
    CurrencyDescriptor {
        code,
        symbol,
        display_name,
        flag,
    }
}

/// Alternate spellings accepted on input. Only `RMB` is known to be in use.
const ALIASES: [(&str, CurrencyCode); 1] = [("RMB", CurrencyCode::Cny)];

impl CurrencyCode {
    pub const ALL: [CurrencyCode; 36] = [
        CurrencyCode::Cny,
        CurrencyCode::Usd,
        CurrencyCode::Eur,
        CurrencyCode::Gbp,
        CurrencyCode::Jpy,
        CurrencyCode::Hkd,
        CurrencyCode::Aud,
        CurrencyCode::Nzd,
        CurrencyCode::Sgd,
        CurrencyCode::Krw,
        CurrencyCode::Twd,
        CurrencyCode::Mop,
        CurrencyCode::Thb,
        CurrencyCode::Myr,
        CurrencyCode::Idr,
        CurrencyCode::Php,
        CurrencyCode::Vnd,
        CurrencyCode::Inr,
        CurrencyCode::Chf,
        CurrencyCode::Sek,
        CurrencyCode::Nok,
        CurrencyCode::Dkk,
        CurrencyCode::Pln,
        CurrencyCode::Czk,
        CurrencyCode::Huf,
        CurrencyCode::Rub,
        CurrencyCode::Try,
        CurrencyCode::Aed,
        CurrencyCode::Sar,
        CurrencyCode::Qar,
        CurrencyCode::Ils,
        CurrencyCode::Egp,
        CurrencyCode::Zar,
        CurrencyCode::Cad,
        CurrencyCode::Mxn,
        CurrencyCode::Brl,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            CurrencyCode::Cny => "CNY",
            CurrencyCode::Usd => "USD",
            CurrencyCode::Eur => "EUR",
            CurrencyCode::Gbp => "GBP",
            CurrencyCode::Jpy => "JPY",
            CurrencyCode::Hkd => "HKD",
            CurrencyCode::Aud => "AUD",
            CurrencyCode::Nzd => "NZD",
            CurrencyCode::Sgd => "SGD",
            CurrencyCode::Krw => "KRW",
            CurrencyCode::Twd => "TWD",
            CurrencyCode::Mop => "MOP",
            CurrencyCode::Thb => "THB",
            CurrencyCode::Myr => "MYR",
            CurrencyCode::Idr => "IDR",
            CurrencyCode::Php => "PHP",
            CurrencyCode::Vnd => "VND",
            CurrencyCode::Inr => "INR",
            CurrencyCode::Chf => "CHF",
            CurrencyCode::Sek => "SEK",
            CurrencyCode::Nok => "NOK",
            CurrencyCode::Dkk => "DKK",
            CurrencyCode::Pln => "PLN",
            CurrencyCode::Czk => "CZK",
            CurrencyCode::Huf => "HUF",
            CurrencyCode::Rub => "RUB",
            CurrencyCode::Try => "TRY",
            CurrencyCode::Aed => "AED",
            CurrencyCode::Sar => "SAR",
            CurrencyCode::Qar => "QAR",
            CurrencyCode::Ils => "ILS",
            CurrencyCode::Egp => "EGP",
            CurrencyCode::Zar => "ZAR",
            CurrencyCode::Cad => "CAD",
            CurrencyCode::Mxn => "MXN",
            CurrencyCode::Brl => "BRL",
        }
    }

    /// Group this currency is listed under. The match is exhaustive, so
    /// every code lands in exactly one group.
    pub fn group(&self) -> CurrencyGroup {
        use CurrencyCode::*;
        match self {
            Cny | Usd | Eur | Gbp | Jpy | Hkd => CurrencyGroup::Major,
            Aud | Nzd | Sgd | Krw | Twd | Mop | Thb | Myr | Idr | Php | Vnd | Inr => {
                CurrencyGroup::AsiaPacific
            }
            Chf | Sek | Nok | Dkk | Pln | Czk | Huf | Rub | Try => CurrencyGroup::Europe,
            Aed | Sar | Qar | Ils | Egp | Zar => CurrencyGroup::MiddleEastAfrica,
            Cad | Mxn | Brl => CurrencyGroup::Americas,
        }
    }

    pub fn descriptor(&self) -> &'static CurrencyDescriptor {
        &CATALOG[*self as usize]
    }

    pub fn is_base(&self) -> bool {
        *self == BASE_CURRENCY
    }
}

impl Display for CurrencyCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CurrencyCode {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        normalize(s).ok_or_else(|| anyhow::anyhow!("Unknown currency code: {}", s))
    }
}

/// Resolves a raw code to a catalog entry.
///
/// Matching is case-insensitive, ignores surrounding whitespace and maps
/// known aliases (`RMB` to `CNY`). Feeding the result's `as_str()` back in
/// yields the same code.
pub fn normalize(raw: &str) -> Option<CurrencyCode> {
    let upper = raw.trim().to_uppercase();
    if let Some((_, code)) = ALIASES.iter().find(|(alias, _)| *alias == upper) {
        return Some(*code);
    }
    CurrencyCode::ALL
        .iter()
        .copied()
        .find(|code| code.as_str() == upper)
}

/// Descriptor for `raw`, or the base currency's descriptor when unknown.
pub fn lookup(raw: &str) -> &'static CurrencyDescriptor {
    normalize(raw).unwrap_or(BASE_CURRENCY).descriptor()
}

/// Catalog partitioned by [`CurrencyGroup`], in display order.
pub fn grouped_view() -> Vec<(CurrencyGroup, Vec<&'static CurrencyDescriptor>)> {
    CurrencyGroup::ALL
        .iter()
        .map(|group| {
            let members = CurrencyCode::ALL
                .iter()
                .filter(|code| code.group() == *group)
                .map(|code| code.descriptor())
                .collect();
            (*group, members)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_catalog_order_matches_enum() {
        for code in CurrencyCode::ALL {
            assert_eq!(code.descriptor().code, code);
        }
        assert_eq!(CATALOG.len(), CurrencyCode::ALL.len());
    }

    #[test]
    fn test_codes_are_unique() {
        let codes: HashSet<&str> = CurrencyCode::ALL.iter().map(|c| c.as_str()).collect();
        assert_eq!(codes.len(), CurrencyCode::ALL.len());
    }

    #[test]
    fn test_normalize_aliases_and_case() {
        assert_eq!(normalize("rmb"), Some(CurrencyCode::Cny));
        assert_eq!(normalize("RMB"), Some(CurrencyCode::Cny));
        assert_eq!(normalize("CNY"), Some(CurrencyCode::Cny));
        assert_eq!(normalize(" usd "), Some(CurrencyCode::Usd));
        assert_eq!(normalize("xyz"), None);
        assert_eq!(normalize(""), None);
    }

    #[test]
    fn test_normalize_is_idempotent() {
        for raw in ["rmb", "Usd", "eur", "AED", "try"] {
            let once = normalize(raw).unwrap();
            assert_eq!(normalize(once.as_str()), Some(once));
        }
    }

    #[test]
    fn test_lookup_falls_back_to_base() {
        assert_eq!(lookup("usd").code, CurrencyCode::Usd);
        assert_eq!(lookup("not-a-code").code, BASE_CURRENCY);
        assert_eq!(lookup("").symbol, "¥");
    }

    #[test]
    fn test_grouped_view_is_a_partition() {
        let view = grouped_view();
        assert_eq!(view.len(), CurrencyGroup::ALL.len());
        assert_eq!(view[0].0, CurrencyGroup::Major);

        let mut seen = HashSet::new();
        for (group, members) in &view {
            assert!(!members.is_empty(), "{group} has no members");
            for descriptor in members {
                assert!(seen.insert(descriptor.code), "{} listed twice", descriptor.code);
            }
        }
        assert_eq!(seen.len(), CurrencyCode::ALL.len());
    }

    #[test]
    fn test_from_str() {
        assert_eq!("rmb".parse::<CurrencyCode>().unwrap(), CurrencyCode::Cny);
        let err = "xyz".parse::<CurrencyCode>().unwrap_err();
        assert_eq!(err.to_string(), "Unknown currency code: xyz");
    }
}
