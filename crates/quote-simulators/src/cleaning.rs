//! Cleaning simulator: per-square-meter rate by cleaning type, discounted
//! by booking frequency, plus flat add-on services.

use quote_core::{Quote, QuoteError, QuoteRequest};
use quote_pricing::{
    compute_linear_quote, AddonFee, Multiplier, MultiplierTable, QuoteConfig, RateTable,
    VariableTerm,
};
use rust_decimal::Decimal;

/// Pricing configuration. Rates and the fallback default are the product's
/// provisional values, pending confirmation as business rules.
pub fn config() -> QuoteConfig {
    QuoteConfig {
        base_label: "Forfait de base".to_string(),
        base_fee: Decimal::new(50, 0),
        variable_terms: vec![VariableTerm::from_table(
            "Surface",
            "surface",
            "cleaning_type",
            RateTable::new(
                Decimal::new(5, 0),
                [
                    ("regular", Decimal::new(5, 0)),
                    ("deep", Decimal::new(8, 0)),
                    ("post_construction", Decimal::new(12, 0)),
                ],
            ),
        )],
        addons: vec![
            AddonFee::new("Vitres", "windows", Decimal::new(40, 0)),
            AddonFee::new("Nettoyage en profondeur", "deep_cleaning", Decimal::new(80, 0)),
            AddonFee::new("Désinfection", "disinfection", Decimal::new(60, 0)),
        ],
        multiplier: Some(Multiplier {
            selector_field: "frequency".to_string(),
            table: MultiplierTable::new([
                ("one_time", Decimal::ONE),
                ("weekly", Decimal::new(9, 1)),
                ("biweekly", Decimal::new(85, 2)),
                ("monthly", Decimal::new(8, 1)),
            ]),
        }),
        primary_selector: Some("cleaning_type".to_string()),
        primary_magnitude: Some("surface".to_string()),
    }
}

pub fn estimate(request: &QuoteRequest) -> Result<Quote, QuoteError> {
    compute_linear_quote(&config(), request)
}
