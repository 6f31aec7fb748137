#![deny(warnings)]

//! Rate tables and the shared linear quote calculator.
//!
//! Every simulator is the same shape: a base fee, a handful of
//! quantity-times-rate terms, flat add-on fees, and an optional frequency or
//! formula multiplier. This crate implements that shape once, driven by a
//! declarative [`QuoteConfig`] per simulator.

use quote_core::{BreakdownRow, Quote, QuoteError, QuoteRequest};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::debug;

/// Categorical key to per-unit rate lookup with a hard-coded fallback.
///
/// An empty or unrecognized key yields the table default instead of an
/// error; selectors are suggestions to the pricing, never hard failures.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RateTable {
    default: Decimal,
    rates: BTreeMap<String, Decimal>,
}

impl RateTable {
    pub fn new<'a>(
        default: Decimal,
        entries: impl IntoIterator<Item = (&'a str, Decimal)>,
    ) -> Self {
        Self {
            default,
            rates: entries
                .into_iter()
                .map(|(k, v)| (k.to_string(), v))
                .collect(),
        }
    }

    /// Rate for `key`, falling back to the table default when the key is
    /// empty or unknown.
    pub fn rate_for(&self, key: &str) -> Decimal {
        match self.rates.get(key) {
            Some(rate) => *rate,
            None => {
                if !key.is_empty() {
                    debug!(key, default = %self.default, "unknown rate key, using default");
                }
                self.default
            }
        }
    }

    pub fn default_rate(&self) -> Decimal {
        self.default
    }
}

/// Frequency/formula multiplier lookup; unknown keys multiply by one.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MultiplierTable(RateTable);

impl MultiplierTable {
    pub fn new<'a>(entries: impl IntoIterator<Item = (&'a str, Decimal)>) -> Self {
        Self(RateTable::new(Decimal::ONE, entries))
    }

    pub fn factor_for(&self, key: &str) -> Decimal {
        self.0.rate_for(key)
    }
}

/// Where a variable term gets its per-unit rate.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum RateSource {
    /// Rate looked up in a table keyed by a selector field.
    Table {
        selector_field: String,
        table: RateTable,
    },
    /// Fixed per-unit rate, e.g. 50 € per room.
    PerUnit(Decimal),
}

/// One quantity-times-rate term of a quote.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct VariableTerm {
    /// Breakdown row label.
    pub label: String,
    /// Magnitude field read from the request; empty counts as zero.
    pub magnitude_field: String,
    /// Per-unit rate for the magnitude.
    pub rate: RateSource,
}

impl VariableTerm {
    pub fn from_table(label: &str, magnitude_field: &str, selector_field: &str, table: RateTable) -> Self {
        Self {
            label: label.to_string(),
            magnitude_field: magnitude_field.to_string(),
            rate: RateSource::Table {
                selector_field: selector_field.to_string(),
                table,
            },
        }
    }

    pub fn per_unit(label: &str, magnitude_field: &str, rate: Decimal) -> Self {
        Self {
            label: label.to_string(),
            magnitude_field: magnitude_field.to_string(),
            rate: RateSource::PerUnit(rate),
        }
    }
}

/// A flat add-on fee behind a boolean toggle. The row is always emitted,
/// with amount zero when the toggle is off, so the breakdown keeps a stable
/// shape for chart rendering.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AddonFee {
    pub label: String,
    pub flag_field: String,
    pub fee: Decimal,
}

impl AddonFee {
    pub fn new(label: &str, flag_field: &str, fee: Decimal) -> Self {
        Self {
            label: label.to_string(),
            flag_field: flag_field.to_string(),
            fee,
        }
    }
}

/// Multiplier applied to the base fee and variable terms, never to add-ons.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Multiplier {
    pub selector_field: String,
    pub table: MultiplierTable,
}

/// Declarative description of one simulator's pricing.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct QuoteConfig {
    /// Label of the base fee row.
    pub base_label: String,
    /// Flat fee charged on every quote.
    pub base_fee: Decimal,
    /// Quantity-times-rate terms, in breakdown order.
    pub variable_terms: Vec<VariableTerm>,
    /// Flat add-on fees, in breakdown order after the variable terms.
    pub addons: Vec<AddonFee>,
    /// Optional frequency/formula multiplier.
    pub multiplier: Option<Multiplier>,
    /// Selector that must be non-empty before anything is computed.
    pub primary_selector: Option<String>,
    /// Magnitude that must be non-empty before anything is computed.
    pub primary_magnitude: Option<String>,
}

/// Evaluate a linear quote config against a request snapshot.
///
/// Total = (base + Σ magnitude × rate) × multiplier + Σ add-on fees, one
/// breakdown row per component. Multiplied rows carry their multiplied
/// amounts, so the quote total is the exact sum of its rows.
///
/// The primary selector and magnitude named by the config must be non-empty
/// or the computation refuses to run; optional magnitudes default to zero
/// but still must parse when present.
pub fn compute_linear_quote(
    config: &QuoteConfig,
    request: &QuoteRequest,
) -> Result<Quote, QuoteError> {
    if let Some(field) = &config.primary_selector {
        request.require_selector(field)?;
    }
    if let Some(field) = &config.primary_magnitude {
        request.magnitude(field)?;
    }

    let factor = match &config.multiplier {
        Some(m) => m.table.factor_for(request.selector(&m.selector_field)),
        None => Decimal::ONE,
    };

    let mut rows = Vec::with_capacity(1 + config.variable_terms.len() + config.addons.len());
    rows.push(BreakdownRow::new(
        config.base_label.as_str(),
        config.base_fee * factor,
    ));
    for term in &config.variable_terms {
        let magnitude = request.magnitude_or_zero(&term.magnitude_field)?;
        let rate = match &term.rate {
            RateSource::Table {
                selector_field,
                table,
            } => table.rate_for(request.selector(selector_field)),
            RateSource::PerUnit(rate) => *rate,
        };
        rows.push(BreakdownRow::new(
            term.label.as_str(),
            magnitude * rate * factor,
        ));
    }
    for addon in &config.addons {
        let amount = if request.addon(&addon.flag_field) {
            addon.fee
        } else {
            Decimal::ZERO
        };
        rows.push(BreakdownRow::new(addon.label.as_str(), amount));
    }

    let quote = Quote::from_rows(rows);
    debug!(total = %quote.total, rows = quote.breakdown.len(), "linear quote computed");
    Ok(quote)
}
