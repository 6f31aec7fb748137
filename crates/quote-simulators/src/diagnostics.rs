//! Diagnostics simulator: surface-based bundle rate by property type plus
//! one flat fee per regulatory diagnostic.

use quote_core::{Quote, QuoteError, QuoteRequest};
use quote_pricing::{compute_linear_quote, AddonFee, QuoteConfig, RateTable, VariableTerm};
use rust_decimal::Decimal;

/// Pricing configuration. Rates are provisional product values.
pub fn config() -> QuoteConfig {
    QuoteConfig {
        base_label: "Forfait de base".to_string(),
        base_fee: Decimal::new(90, 0),
        variable_terms: vec![VariableTerm::from_table(
            "Surface",
            "surface",
            "property_type",
            RateTable::new(
                Decimal::new(16, 1),
                [
                    ("apartment", Decimal::new(16, 1)),
                    ("house", Decimal::new(21, 1)),
                ],
            ),
        )],
        addons: vec![
            AddonFee::new("DPE", "dpe", Decimal::new(120, 0)),
            AddonFee::new("Amiante", "amiante", Decimal::new(110, 0)),
            AddonFee::new("Plomb", "plomb", Decimal::new(130, 0)),
            AddonFee::new("Électricité", "electricite", Decimal::new(110, 0)),
            AddonFee::new("Gaz", "gaz", Decimal::new(110, 0)),
            AddonFee::new("Termites", "termites", Decimal::new(100, 0)),
        ],
        multiplier: None,
        primary_selector: Some("property_type".to_string()),
        primary_magnitude: Some("surface".to_string()),
    }
}

pub fn estimate(request: &QuoteRequest) -> Result<Quote, QuoteError> {
    compute_linear_quote(&config(), request)
}
