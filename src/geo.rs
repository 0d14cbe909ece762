//! Great-circle distance between coordinates

use haversine::{Location as HaversineLocation, Units, distance};

use crate::models::{Coordinate, round_to};
use crate::{ExplorerError, Result};

/// Great-circle distance in kilometers, rounded to 2 decimals.
///
/// Fails when either coordinate is out of range or not finite.
pub fn distance_km(from: &Coordinate, to: &Coordinate) -> Result<f64> {
    from.validate()?;
    to.validate()?;

    let from_haversine = HaversineLocation {
        latitude: from.latitude,
        longitude: from.longitude,
    };
    let to_haversine = HaversineLocation {
        latitude: to.latitude,
        longitude: to.longitude,
    };
    let km = distance(from_haversine, to_haversine, Units::Kilometers);

    if !km.is_finite() || km < 0.0 {
        return Err(ExplorerError::internal(format!(
            "Distance between {from:?} and {to:?} is not a valid length: {km}"
        )));
    }

    Ok(round_to(km, 2))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_distance_in_puno() {
        let user = Coordinate::new(-15.8403, -70.0217);
        let poi = Coordinate::new(-15.8400, -70.0200);

        let km = distance_km(&user, &poi).unwrap();
        assert!(km > 0.0);
        assert_eq!(km, 0.18);
        assert_eq!(distance_km(&user, &poi).unwrap(), km);
    }

    #[test]
    fn test_distance_is_symmetric_and_zero_at_origin() {
        let a = Coordinate::new(-15.8403, -70.0217);
        let b = Coordinate::new(-16.5, -68.15);

        assert_eq!(distance_km(&a, &a).unwrap(), 0.0);
        assert_eq!(distance_km(&a, &b).unwrap(), distance_km(&b, &a).unwrap());
    }

    #[test]
    fn test_invalid_coordinate_is_rejected() {
        let valid = Coordinate::new(-15.8403, -70.0217);
        let invalid = Coordinate::new(123.0, -70.0);

        assert!(distance_km(&valid, &invalid).is_err());
        assert!(distance_km(&Coordinate::new(f64::NAN, 0.0), &valid).is_err());
    }
}
