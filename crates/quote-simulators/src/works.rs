//! Works simulator: renovation cost by work type, surface and room count.

use quote_core::{Quote, QuoteError, QuoteRequest};
use quote_pricing::{compute_linear_quote, AddonFee, QuoteConfig, RateTable, VariableTerm};
use rust_decimal::Decimal;

/// Pricing configuration. Rates are provisional product values.
pub fn config() -> QuoteConfig {
    QuoteConfig {
        base_label: "Forfait de base".to_string(),
        base_fee: Decimal::new(300, 0),
        variable_terms: vec![
            VariableTerm::from_table(
                "Surface",
                "surface",
                "work_type",
                RateTable::new(
                    Decimal::new(50, 0),
                    [
                        ("painting", Decimal::new(25, 0)),
                        ("flooring", Decimal::new(40, 0)),
                        ("electrical", Decimal::new(90, 0)),
                        ("plumbing", Decimal::new(75, 0)),
                        ("full_renovation", Decimal::new(950, 0)),
                    ],
                ),
            ),
            VariableTerm::per_unit("Pièces", "rooms", Decimal::new(50, 0)),
        ],
        addons: vec![
            AddonFee::new("Architecte", "architect", Decimal::new(600, 0)),
            AddonFee::new("Aide au permis", "permit_assistance", Decimal::new(350, 0)),
        ],
        multiplier: None,
        primary_selector: Some("work_type".to_string()),
        primary_magnitude: Some("surface".to_string()),
    }
}

pub fn estimate(request: &QuoteRequest) -> Result<Quote, QuoteError> {
    compute_linear_quote(&config(), request)
}
