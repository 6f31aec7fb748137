//! Furnishing simulator: per-square-meter rate by furnishing level plus a
//! per-room allowance.

use quote_core::{Quote, QuoteError, QuoteRequest};
use quote_pricing::{compute_linear_quote, AddonFee, QuoteConfig, RateTable, VariableTerm};
use rust_decimal::Decimal;

/// Pricing configuration. Rates are provisional product values.
pub fn config() -> QuoteConfig {
    QuoteConfig {
        base_label: "Forfait de base".to_string(),
        base_fee: Decimal::new(120, 0),
        variable_terms: vec![
            VariableTerm::from_table(
                "Surface",
                "surface",
                "furnishing_level",
                RateTable::new(
                    Decimal::new(160, 0),
                    [
                        ("essential", Decimal::new(90, 0)),
                        ("comfort", Decimal::new(160, 0)),
                        ("premium", Decimal::new(260, 0)),
                    ],
                ),
            ),
            VariableTerm::per_unit("Pièces", "rooms", Decimal::new(75, 0)),
        ],
        addons: vec![
            AddonFee::new("Livraison", "delivery", Decimal::new(150, 0)),
            AddonFee::new("Installation", "installation", Decimal::new(200, 0)),
        ],
        multiplier: None,
        primary_selector: Some("furnishing_level".to_string()),
        primary_magnitude: Some("surface".to_string()),
    }
}

pub fn estimate(request: &QuoteRequest) -> Result<Quote, QuoteError> {
    compute_linear_quote(&config(), request)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn comfort_level_two_rooms() {
        let request = QuoteRequest::default()
            .with_selector("furnishing_level", "comfort")
            .with_magnitude("surface", "35")
            .with_magnitude("rooms", "2")
            .with_addon("delivery", true);
        let quote = estimate(&request).unwrap();
        // 120 + 35×160 + 2×75 + 150
        assert_eq!(quote.total, Decimal::new(6020, 0));
    }

    #[test]
    fn missing_level_refuses_to_run() {
        let request = QuoteRequest::default().with_magnitude("surface", "35");
        assert_eq!(
            estimate(&request),
            Err(QuoteError::MissingField("furnishing_level".to_string()))
        );
    }
}
