//! Moving simulator: volume and distance based pricing.
//!
//! The distance field is locked by default and recomputed from the two
//! endpoint coordinates (haversine times the road-detour factor); the
//! `distance_unlocked` toggle switches to the user-entered value instead.

use quote_core::{Quote, QuoteError, QuoteRequest};
use quote_geo::{resolve_distance_km, DistanceInput, GeoPoint};
use quote_pricing::{compute_linear_quote, AddonFee, QuoteConfig, RateTable, VariableTerm};
use rust_decimal::Decimal;

/// Pricing configuration. Rates are provisional product values.
pub fn config() -> QuoteConfig {
    QuoteConfig {
        base_label: "Forfait de base".to_string(),
        base_fee: Decimal::new(150, 0),
        variable_terms: vec![
            VariableTerm::from_table(
                "Volume",
                "volume",
                "dwelling_size",
                RateTable::new(
                    Decimal::new(35, 0),
                    [
                        ("studio", Decimal::new(30, 0)),
                        ("apartment", Decimal::new(35, 0)),
                        ("house", Decimal::new(40, 0)),
                    ],
                ),
            ),
            VariableTerm::per_unit("Distance", "distance", Decimal::new(12, 1)),
            VariableTerm::per_unit(
                "Étages sans ascenseur",
                "floors_no_elevator",
                Decimal::new(30, 0),
            ),
        ],
        addons: vec![
            AddonFee::new("Emballage", "packing", Decimal::new(250, 0)),
            AddonFee::new("Montage des meubles", "furniture_assembly", Decimal::new(180, 0)),
            AddonFee::new("Piano", "piano", Decimal::new(350, 0)),
        ],
        multiplier: None,
        primary_selector: Some("dwelling_size".to_string()),
        primary_magnitude: Some("volume".to_string()),
    }
}

pub fn estimate(request: &QuoteRequest) -> Result<Quote, QuoteError> {
    let distance = resolve_distance(request)?;
    let mut prepared = request.clone();
    prepared
        .magnitudes
        .insert("distance".to_string(), distance.to_string());
    compute_linear_quote(&config(), &prepared)
}

fn resolve_distance(request: &QuoteRequest) -> Result<Decimal, QuoteError> {
    if request.addon("distance_unlocked") {
        return resolve_distance_km(&DistanceInput::Manual(
            request.magnitude_raw("distance").to_string(),
        ));
    }
    let from = endpoint(request, "from_lat", "from_lon")?;
    let to = endpoint(request, "to_lat", "to_lon")?;
    resolve_distance_km(&DistanceInput::Locked { from, to })
}

fn endpoint(
    request: &QuoteRequest,
    lat_field: &str,
    lon_field: &str,
) -> Result<GeoPoint, QuoteError> {
    Ok(GeoPoint {
        lat_deg: request.coordinate(lat_field)?,
        lon_deg: request.coordinate(lon_field)?,
    })
}
