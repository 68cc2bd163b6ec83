// 🔍 Query Normalizer - Raw request parameters → validated FilterSpec
//
// Input can come from a URL query string, a web form, or interactive
// UI fields. Whatever the source, normalization is total: malformed
// values degrade to "no constraint", they never produce an error.

use crate::currency::Currency;
use std::collections::HashMap;

// ============================================================================
// RAW PARAMETERS
// ============================================================================

/// Snapshot of string-keyed request parameters, before validation.
///
/// Duplicate keys keep the first value, unknown keys are carried but
/// ignored by the normalizer.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawParams {
    params: HashMap<String, String>,
}

impl RawParams {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert, mostly for tests and the CLI
    pub fn with(mut self, key: &str, value: &str) -> Self {
        self.params
            .entry(key.to_string())
            .or_insert_with(|| value.to_string());
        self
    }

    /// Parse an HTTP query string ("minPrice=150000&currency=EUR").
    /// Percent-escapes and '+' are decoded; segments that fail to
    /// decode are kept verbatim rather than dropped.
    pub fn from_query_string(query: &str) -> Self {
        let query = query.strip_prefix('?').unwrap_or(query);
        let mut params = HashMap::new();

        for segment in query.split('&') {
            if segment.is_empty() {
                continue;
            }
            let (key, value) = match segment.split_once('=') {
                Some((k, v)) => (k, v),
                None => (segment, ""),
            };
            params
                .entry(decode_component(key))
                .or_insert_with(|| decode_component(value));
        }

        RawParams { params }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.params.get(key).map(|v| v.as_str())
    }

    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }
}

fn decode_component(raw: &str) -> String {
    let with_spaces = raw.replace('+', " ");
    match urlencoding::decode(&with_spaces) {
        Ok(decoded) => decoded.into_owned(),
        Err(_) => with_spaces,
    }
}

// ============================================================================
// FILTER SPEC
// ============================================================================

/// The validated, typed filter request. The default spec matches
/// everything and displays USD.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterSpec {
    /// Inclusive lower price bound, in display currency units
    pub min_price: Option<f64>,

    /// Inclusive upper price bound, in display currency units
    pub max_price: Option<f64>,

    /// Location search text (trimmed, non-empty)
    pub location_query: Option<String>,

    /// Display currency for prices and bounds
    pub currency: Currency,
}

impl FilterSpec {
    /// Normalize raw parameters into a spec. Only `minPrice`,
    /// `maxPrice`, `location` and `currency` are consulted.
    pub fn from_params(params: &RawParams) -> FilterSpec {
        FilterSpec {
            min_price: params.get("minPrice").and_then(parse_price),
            max_price: params.get("maxPrice").and_then(parse_price),
            location_query: params.get("location").and_then(normalize_location),
            currency: Currency::from_param(params.get("currency")),
        }
    }

    /// Convenience for the common URL entry point
    pub fn from_query_string(query: &str) -> FilterSpec {
        Self::from_params(&RawParams::from_query_string(query))
    }

    /// True when no constraint narrows the catalog (currency alone
    /// does not filter anything)
    pub fn is_unconstrained(&self) -> bool {
        self.min_price.is_none() && self.max_price.is_none() && self.location_query.is_none()
    }
}

/// Price parsing keeps only ASCII digits, then parses the remainder.
/// "150000", "$150,000" and "150000 USD" all mean 150000; a string
/// with no digits means "no bound". Signs and decimal points are
/// stripped with everything else, so values are always non-negative
/// whole numbers (or the fallback None).
fn parse_price(raw: &str) -> Option<f64> {
    let digits: String = raw.chars().filter(|c| c.is_ascii_digit()).collect();
    if digits.is_empty() {
        return None;
    }
    digits.parse::<f64>().ok()
}

/// Location text is taken almost verbatim; only surrounding whitespace
/// is dropped, and an effectively-empty query means "no constraint".
fn normalize_location(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

// ============================================================================
// TESTS
// ============================================================================
