#![deny(warnings)]

//! Distance estimation for the moving simulator.
//!
//! Great-circle distance via the haversine formula, inflated by a fixed
//! road-detour factor to approximate driving distance. The user can unlock
//! the distance field and type a value instead; both paths resolve through
//! [`resolve_distance_km`].

use quote_core::{parse_magnitude, QuoteError};
use rust_decimal::prelude::FromPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Mean Earth radius in kilometers.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Fixed inflation applied to great-circle distance to approximate the road
/// network. Roads are not geodesics; 1.4 is the product's calibration.
pub const ROAD_DETOUR_FACTOR: f64 = 1.4;

/// A latitude/longitude pair in degrees.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub lat_deg: f64,
    pub lon_deg: f64,
}

/// Great-circle distance between two points in kilometers.
pub fn haversine_km(a: GeoPoint, b: GeoPoint) -> f64 {
    let lat_a = a.lat_deg.to_radians();
    let lat_b = b.lat_deg.to_radians();
    let d_lat = (b.lat_deg - a.lat_deg).to_radians();
    let d_lon = (b.lon_deg - a.lon_deg).to_radians();
    let h = (d_lat / 2.0).sin().powi(2) + lat_a.cos() * lat_b.cos() * (d_lon / 2.0).sin().powi(2);
    // Near-antipodal points can push h a few ulps past 1.
    2.0 * EARTH_RADIUS_KM * h.sqrt().min(1.0).asin()
}

/// Driving-distance approximation: haversine times the detour factor.
pub fn road_distance_km(a: GeoPoint, b: GeoPoint) -> f64 {
    haversine_km(a, b) * ROAD_DETOUR_FACTOR
}

/// How the distance field is being driven.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum DistanceInput {
    /// Field locked: recomputed from the two endpoints.
    Locked { from: GeoPoint, to: GeoPoint },
    /// Field unlocked: the raw user-entered text is used as-is.
    Manual(String),
}

/// Resolve the distance in kilometers for a quote, rounded to the cent of a
/// kilometer for stable display.
///
/// Manual input goes through the same defensive parsing as every other
/// magnitude field; locked input is a pure function of the endpoints.
pub fn resolve_distance_km(input: &DistanceInput) -> Result<Decimal, QuoteError> {
    match input {
        DistanceInput::Locked { from, to } => {
            let km = road_distance_km(*from, *to);
            let value = Decimal::from_f64(km).ok_or(QuoteError::NonFinite)?;
            Ok(value.round_dp(2))
        }
        DistanceInput::Manual(raw) => parse_magnitude("distance", raw),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const PARIS: GeoPoint = GeoPoint {
        lat_deg: 48.8566,
        lon_deg: 2.3522,
    };
    const LYON: GeoPoint = GeoPoint {
        lat_deg: 45.7640,
        lon_deg: 4.8357,
    };

    #[test]
    fn identical_points_are_zero() {
        assert_eq!(haversine_km(PARIS, PARIS), 0.0);
        assert_eq!(road_distance_km(LYON, LYON), 0.0);
    }

    #[test]
    fn one_degree_of_meridian() {
        let a = GeoPoint {
            lat_deg: 45.0,
            lon_deg: 0.0,
        };
        let b = GeoPoint {
            lat_deg: 46.0,
            lon_deg: 0.0,
        };
        // 2π·6371/360 ≈ 111.195 km
        let d = haversine_km(a, b);
        assert!((d - 111.195).abs() < 0.01, "got {d}");
    }

    #[test]
    fn paris_lyon_plausible() {
        let d = haversine_km(PARIS, LYON);
        assert!((380.0..405.0).contains(&d), "got {d}");
    }

    #[test]
    fn road_factor_is_pure_multiplication() {
        let d = haversine_km(PARIS, LYON);
        assert_eq!(road_distance_km(PARIS, LYON), d * ROAD_DETOUR_FACTOR);
    }

    #[test]
    fn manual_override_bypasses_estimator() {
        let resolved =
            resolve_distance_km(&DistanceInput::Manual("123,5".to_string())).unwrap();
        assert_eq!(resolved, Decimal::new(1235, 1));
    }

    #[test]
    fn manual_garbage_is_rejected() {
        let err = resolve_distance_km(&DistanceInput::Manual("loin".to_string())).unwrap_err();
        assert!(matches!(err, QuoteError::InvalidNumber { .. }));
        assert_eq!(
            resolve_distance_km(&DistanceInput::Manual(String::new())),
            Err(QuoteError::MissingField("distance".to_string()))
        );
    }

    #[test]
    fn locked_input_resolves_road_distance() {
        let resolved = resolve_distance_km(&DistanceInput::Locked {
            from: PARIS,
            to: LYON,
        })
        .unwrap();
        let expected = road_distance_km(PARIS, LYON);
        let diff = (resolved.to_string().parse::<f64>().unwrap() - expected).abs();
        assert!(diff < 0.01, "rounded {resolved} vs {expected}");
    }

    proptest! {
        #[test]
        fn symmetric_and_nonnegative(
            lat_a in -85.0f64..85.0, lon_a in -180.0f64..180.0,
            lat_b in -85.0f64..85.0, lon_b in -180.0f64..180.0,
        ) {
            let a = GeoPoint { lat_deg: lat_a, lon_deg: lon_a };
            let b = GeoPoint { lat_deg: lat_b, lon_deg: lon_b };
            let ab = haversine_km(a, b);
            let ba = haversine_km(b, a);
            prop_assert!(ab >= 0.0);
            prop_assert!((ab - ba).abs() < 1e-9);
            // Nothing on Earth is farther than half the circumference.
            prop_assert!(ab <= std::f64::consts::PI * EARTH_RADIUS_KM + 1e-6);
        }
    }
}
