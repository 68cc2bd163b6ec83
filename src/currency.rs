// 💱 Currency Converter - USD base prices, optional EUR display
//
// All catalog prices are stored in USD. Conversion happens only at
// presentation time, with a fixed rate; the converter never rounds,
// formatting decides how many decimals to show.

use serde::{Deserialize, Serialize};

/// Fixed USD→EUR conversion rate
pub const USD_TO_EUR_RATE: f64 = 0.9524;

// ============================================================================
// CURRENCY
// ============================================================================

/// Display currency for plot prices. USD is the base and the default;
/// anything that is not exactly "EUR" or "USD" falls back to USD.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Currency {
    #[serde(rename = "USD")]
    Usd,

    #[serde(rename = "EUR")]
    Eur,
}

impl Currency {
    /// ISO-style code as used in query parameters and payloads
    pub fn code(&self) -> &'static str {
        match self {
            Currency::Usd => "USD",
            Currency::Eur => "EUR",
        }
    }

    /// Symbol for formatted display
    pub fn symbol(&self) -> &'static str {
        match self {
            Currency::Usd => "$",
            Currency::Eur => "€",
        }
    }

    /// Parse a raw parameter value. Recognition is exact and
    /// case-sensitive; unknown values (including "eur", "gbp", empty)
    /// silently resolve to USD rather than erroring.
    pub fn from_param(value: Option<&str>) -> Currency {
        match value {
            Some("EUR") => Currency::Eur,
            Some("USD") => Currency::Usd,
            _ => Currency::Usd,
        }
    }

    /// The other display currency (for a toggle control)
    pub fn toggled(&self) -> Currency {
        match self {
            Currency::Usd => Currency::Eur,
            Currency::Eur => Currency::Usd,
        }
    }
}

impl Default for Currency {
    fn default() -> Currency {
        Currency::Usd
    }
}

// ============================================================================
// CONVERSION
// ============================================================================

/// Convert a USD amount into the target display currency.
///
/// USD is the identity; EUR multiplies by `USD_TO_EUR_RATE` and keeps
/// the full floating-point result (no rounding).
pub fn convert(amount_usd: f64, target: Currency) -> f64 {
    match target {
        Currency::Usd => amount_usd,
        Currency::Eur => amount_usd * USD_TO_EUR_RATE,
    }
}

// ============================================================================
// DISPLAY FORMATTING
// ============================================================================

/// Format an already-converted amount for display: currency symbol,
/// thousands separators, fractional digits kept only when the
/// conversion produced them ("$175,000", "€160,003.2").
pub fn format_price(amount: f64, currency: Currency) -> String {
    format!("{}{}", currency.symbol(), group_thousands(amount))
}

fn group_thousands(amount: f64) -> String {
    if !amount.is_finite() {
        return amount.to_string();
    }

    let text = amount.abs().to_string();
    let (int_part, frac_part) = match text.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (text.as_str(), None),
    };

    let mut grouped = String::new();
    if amount < 0.0 {
        grouped.push('-');
    }
    for (i, c) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }
    if let Some(frac) = frac_part {
        grouped.push('.');
        grouped.push_str(frac);
    }

    grouped
}

// ============================================================================
// TESTS
// ============================================================================
