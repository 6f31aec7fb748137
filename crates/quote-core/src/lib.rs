#![deny(warnings)]

//! Core domain types for quote estimation.
//!
//! This crate defines the form-state snapshot taken as input by every
//! simulator, the itemized cost breakdown they produce, and the defensive
//! numeric parsing that keeps NaN out of the arithmetic.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;

/// Contact details attached to a quote request. Never validated by the
/// calculators; carried through for the callback workflow only.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactInfo {
    /// Full name, optionally empty.
    #[serde(default)]
    pub name: String,
    /// Email address, optionally empty.
    #[serde(default)]
    pub email: String,
    /// Phone number, optionally empty.
    #[serde(default)]
    pub phone: String,
}

/// A flat snapshot of the estimation form, exactly as the UI holds it:
/// numeric magnitudes are free-text strings, categorical selectors are
/// strings, add-ons are booleans.
///
/// Requests are ephemeral. They start all-empty (`QuoteRequest::default()`),
/// are mutated field by field, and are discarded after use; nothing here is
/// ever persisted.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct QuoteRequest {
    /// Contact details for the callback request.
    #[serde(default)]
    pub contact: ContactInfo,
    /// Categorical fields, e.g. "cleaning_type" or "work_type".
    #[serde(default)]
    pub selectors: BTreeMap<String, String>,
    /// Free-text numeric fields, e.g. "surface" or "distance".
    #[serde(default)]
    pub magnitudes: BTreeMap<String, String>,
    /// Add-on toggles, e.g. "packing" or "architect".
    #[serde(default)]
    pub addons: BTreeMap<String, bool>,
}

impl QuoteRequest {
    /// Raw selector value, empty string when the field was never touched.
    pub fn selector(&self, field: &str) -> &str {
        self.selectors.get(field).map(String::as_str).unwrap_or("")
    }

    /// Selector value, or `MissingField` when empty or absent.
    pub fn require_selector(&self, field: &str) -> Result<&str, QuoteError> {
        let value = self.selector(field);
        if value.trim().is_empty() {
            return Err(QuoteError::MissingField(field.to_string()));
        }
        Ok(value)
    }

    /// Raw magnitude text, empty string when the field was never touched.
    pub fn magnitude_raw(&self, field: &str) -> &str {
        self.magnitudes.get(field).map(String::as_str).unwrap_or("")
    }

    /// Parsed magnitude; empty or absent input is `MissingField`.
    pub fn magnitude(&self, field: &str) -> Result<Decimal, QuoteError> {
        parse_magnitude(field, self.magnitude_raw(field))
    }

    /// Parsed magnitude for an optional field: empty or absent input counts
    /// as zero, anything non-empty must parse.
    pub fn magnitude_or_zero(&self, field: &str) -> Result<Decimal, QuoteError> {
        let raw = self.magnitude_raw(field);
        if raw.trim().is_empty() {
            return Ok(Decimal::ZERO);
        }
        parse_magnitude(field, raw)
    }

    /// Parsed magnitude with a fallback used when the field is empty.
    pub fn magnitude_or(&self, field: &str, fallback: Decimal) -> Result<Decimal, QuoteError> {
        let raw = self.magnitude_raw(field);
        if raw.trim().is_empty() {
            return Ok(fallback);
        }
        parse_magnitude(field, raw)
    }

    /// Parsed whole-number magnitude (term lengths, room counts used as
    /// counts). Fractional input is rejected.
    pub fn count(&self, field: &str) -> Result<u32, QuoteError> {
        let value = self.magnitude(field)?;
        if value.fract() != Decimal::ZERO {
            return Err(QuoteError::InvalidNumber {
                field: field.to_string(),
                raw: self.magnitude_raw(field).to_string(),
            });
        }
        value.to_u32().ok_or_else(|| QuoteError::InvalidNumber {
            field: field.to_string(),
            raw: self.magnitude_raw(field).to_string(),
        })
    }

    /// Parsed coordinate field (latitude/longitude in degrees).
    pub fn coordinate(&self, field: &str) -> Result<f64, QuoteError> {
        parse_coordinate(field, self.magnitude_raw(field))
    }

    /// Add-on flag, false when never toggled.
    pub fn addon(&self, field: &str) -> bool {
        self.addons.get(field).copied().unwrap_or(false)
    }

    /// Builder-style setter used by tests and the CLI.
    pub fn with_selector(mut self, field: &str, value: &str) -> Self {
        self.selectors.insert(field.to_string(), value.to_string());
        self
    }

    /// Builder-style setter used by tests and the CLI.
    pub fn with_magnitude(mut self, field: &str, value: &str) -> Self {
        self.magnitudes.insert(field.to_string(), value.to_string());
        self
    }

    /// Builder-style setter used by tests and the CLI.
    pub fn with_addon(mut self, field: &str, on: bool) -> Self {
        self.addons.insert(field.to_string(), on);
        self
    }
}

/// Errors produced while validating and parsing a quote request.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum QuoteError {
    /// A required field was empty or absent. The calculation refuses to run
    /// and produces no partial result.
    #[error("missing required field: {0}")]
    MissingField(String),
    /// A numeric field did not parse. The whole request is rejected rather
    /// than letting NaN reach the sums.
    #[error("field `{field}` is not a number: {raw:?}")]
    InvalidNumber { field: String, raw: String },
    /// Magnitudes are physical quantities; negatives are rejected.
    #[error("field `{0}` must not be negative")]
    NegativeMagnitude(String),
    /// A floating-point conversion produced a non-finite value.
    #[error("non-finite numeric value")]
    NonFinite,
}

/// Parse a free-text magnitude field into a `Decimal`.
///
/// Accepts French input forms: spaces (including narrow no-break spaces) as
/// thousands separators and a comma as the decimal separator, unless a point
/// is also present, in which case commas are treated as grouping.
///
/// Empty input is `MissingField`, non-numeric input is `InvalidNumber`, and
/// negative values are `NegativeMagnitude`.
pub fn parse_magnitude(field: &str, raw: &str) -> Result<Decimal, QuoteError> {
    let normalized = normalize_numeric(field, raw)?;
    let value: Decimal = normalized
        .parse()
        .map_err(|_| QuoteError::InvalidNumber {
            field: field.to_string(),
            raw: raw.to_string(),
        })?;
    if value < Decimal::ZERO {
        return Err(QuoteError::NegativeMagnitude(field.to_string()));
    }
    Ok(value)
}

/// Parse a latitude/longitude form field in degrees.
///
/// Unlike magnitudes, coordinates may be negative; they must still be
/// finite numbers in the same accepted input forms.
pub fn parse_coordinate(field: &str, raw: &str) -> Result<f64, QuoteError> {
    let normalized = normalize_numeric(field, raw)?;
    let value: f64 = normalized
        .parse()
        .map_err(|_| QuoteError::InvalidNumber {
            field: field.to_string(),
            raw: raw.to_string(),
        })?;
    if !value.is_finite() {
        return Err(QuoteError::NonFinite);
    }
    Ok(value)
}

fn normalize_numeric(field: &str, raw: &str) -> Result<String, QuoteError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(QuoteError::MissingField(field.to_string()));
    }
    let compact: String = trimmed
        .chars()
        .filter(|c| !matches!(c, ' ' | '\u{a0}' | '\u{202f}'))
        .collect();
    if compact.contains(',') && compact.contains('.') {
        Ok(compact.replace(',', ""))
    } else {
        Ok(compact.replace(',', "."))
    }
}

/// One itemized line of a cost breakdown.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BreakdownRow {
    /// Human-readable cost component label.
    pub label: String,
    /// Amount in euros. Zero rows stay in the breakdown so its shape is
    /// stable regardless of what the user selected.
    pub amount: Decimal,
}

impl BreakdownRow {
    pub fn new(label: impl Into<String>, amount: Decimal) -> Self {
        Self {
            label: label.into(),
            amount,
        }
    }
}

/// A computed estimate: ordered breakdown rows and their exact sum.
///
/// Quotes are always built whole via [`Quote::from_rows`] and never mutated
/// in place, so `total` equals the sum of the row amounts by construction.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Quote {
    /// Exact sum of all breakdown amounts.
    pub total: Decimal,
    /// Ordered cost components.
    pub breakdown: Vec<BreakdownRow>,
}

impl Quote {
    /// Build a quote from its rows; the total is the exact Decimal sum.
    pub fn from_rows(breakdown: Vec<BreakdownRow>) -> Self {
        let total = breakdown.iter().map(|row| row.amount).sum();
        Self { total, breakdown }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn parse_accepts_french_forms() {
        assert_eq!(
            parse_magnitude("surface", "1 234,5").unwrap(),
            Decimal::new(12345, 1)
        );
        assert_eq!(
            parse_magnitude("surface", "1234.5").unwrap(),
            Decimal::new(12345, 1)
        );
        assert_eq!(
            parse_magnitude("surface", " 80 ").unwrap(),
            Decimal::new(80, 0)
        );
    }

    #[test]
    fn parse_rejects_empty() {
        assert_eq!(
            parse_magnitude("surface", ""),
            Err(QuoteError::MissingField("surface".to_string()))
        );
        assert_eq!(
            parse_magnitude("surface", "   "),
            Err(QuoteError::MissingField("surface".to_string()))
        );
    }

    #[test]
    fn parse_rejects_garbage() {
        let err = parse_magnitude("volume", "douze").unwrap_err();
        assert_eq!(
            err,
            QuoteError::InvalidNumber {
                field: "volume".to_string(),
                raw: "douze".to_string(),
            }
        );
    }

    #[test]
    fn coordinates_allow_negatives() {
        assert_eq!(parse_coordinate("from_lon", "-4,486").unwrap(), -4.486);
        assert_eq!(parse_coordinate("from_lat", "48.39").unwrap(), 48.39);
        assert!(matches!(
            parse_coordinate("from_lat", "nord"),
            Err(QuoteError::InvalidNumber { .. })
        ));
        assert_eq!(
            parse_coordinate("from_lat", ""),
            Err(QuoteError::MissingField("from_lat".to_string()))
        );
    }

    #[test]
    fn parse_rejects_negative() {
        assert_eq!(
            parse_magnitude("distance", "-3"),
            Err(QuoteError::NegativeMagnitude("distance".to_string()))
        );
    }

    #[test]
    fn optional_magnitude_defaults_to_zero() {
        let req = QuoteRequest::default();
        assert_eq!(req.magnitude_or_zero("rooms").unwrap(), Decimal::ZERO);
        let req = req.with_magnitude("rooms", "x");
        assert!(req.magnitude_or_zero("rooms").is_err());
    }

    #[test]
    fn count_rejects_fractional() {
        let req = QuoteRequest::default().with_magnitude("term_months", "24");
        assert_eq!(req.count("term_months").unwrap(), 24);
        let req = QuoteRequest::default().with_magnitude("term_months", "24.5");
        assert!(req.count("term_months").is_err());
    }

    #[test]
    fn require_selector_flags_empty() {
        let req = QuoteRequest::default().with_selector("work_type", "");
        assert_eq!(
            req.require_selector("work_type"),
            Err(QuoteError::MissingField("work_type".to_string()))
        );
        let req = req.with_selector("work_type", "painting");
        assert_eq!(req.require_selector("work_type").unwrap(), "painting");
    }

    #[test]
    fn quote_total_is_row_sum() {
        let quote = Quote::from_rows(vec![
            BreakdownRow::new("Forfait de base", Decimal::new(50, 0)),
            BreakdownRow::new("Surface", Decimal::new(500, 0)),
            BreakdownRow::new("Vitres", Decimal::ZERO),
        ]);
        assert_eq!(quote.total, Decimal::new(550, 0));
        assert_eq!(quote.breakdown.len(), 3);
    }

    #[test]
    fn serde_roundtrip_request() {
        let req = QuoteRequest::default()
            .with_selector("cleaning_type", "regular")
            .with_magnitude("surface", "100")
            .with_addon("windows", true);
        let s = serde_json::to_string(&req).unwrap();
        let back: QuoteRequest = serde_json::from_str(&s).unwrap();
        assert_eq!(back, req);
    }

    #[test]
    fn serde_accepts_sparse_request() {
        // Form snapshots omit untouched sections entirely.
        let back: QuoteRequest =
            serde_json::from_str(r#"{"magnitudes":{"surface":"42"}}"#).unwrap();
        assert_eq!(back.magnitude("surface").unwrap(), Decimal::new(42, 0));
        assert_eq!(back.selector("cleaning_type"), "");
        assert!(!back.addon("windows"));
    }

    proptest! {
        #[test]
        fn quote_sum_invariant(cents in proptest::collection::vec(0i64..1_000_000, 1..12)) {
            let rows: Vec<BreakdownRow> = cents
                .iter()
                .enumerate()
                .map(|(i, c)| BreakdownRow::new(format!("row {i}"), Decimal::new(*c, 2)))
                .collect();
            let quote = Quote::from_rows(rows);
            let sum: Decimal = quote.breakdown.iter().map(|r| r.amount).sum();
            prop_assert_eq!(quote.total, sum);
        }

        #[test]
        fn parse_roundtrips_plain_decimals(units in 0i64..1_000_000, scale in 0u32..3) {
            let d = Decimal::new(units, scale);
            let parsed = parse_magnitude("surface", &d.to_string()).unwrap();
            prop_assert_eq!(parsed, d);
        }
    }
}
