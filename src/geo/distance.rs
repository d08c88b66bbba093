//! Great-circle distance on a mean-radius spherical Earth.

use crate::models::coordinate::Coordinate;

const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// Haversine distance between two positions, in meters.
///
/// Accurate to within a few meters at geofence scale (tens to hundreds of
/// meters). Identical inputs return exactly 0; the result is symmetric and
/// never negative.
pub fn haversine_m(a: &Coordinate, b: &Coordinate) -> f64 {
    if a.latitude == b.latitude && a.longitude == b.longitude {
        return 0.0;
    }

    let dlat = (b.latitude - a.latitude).to_radians();
    let dlon = (b.longitude - a.longitude).to_radians();
    let lat1 = a.latitude.to_radians();
    let lat2 = b.latitude.to_radians();

    let h = (dlat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (dlon / 2.0).sin().powi(2);

    // clamp keeps asin's argument in domain when h rounds past 1.0
    let c = 2.0 * h.sqrt().min(1.0).asin();

    EARTH_RADIUS_M * c
}

#[cfg(test)]
mod tests {
    use super::*;

    fn coord(lat: f64, lon: f64) -> Coordinate {
        Coordinate::new(lat, lon).unwrap()
    }

    #[test]
    fn identical_points_are_exactly_zero() {
        let a = coord(52.0907, 5.1214);
        assert_eq!(haversine_m(&a, &a), 0.0);
    }

    #[test]
    fn symmetric() {
        let a = coord(52.0907, 5.1214);
        let b = coord(51.9244, 4.4777);
        assert_eq!(haversine_m(&a, &b), haversine_m(&b, &a));
    }

    #[test]
    fn never_negative() {
        let pairs = [
            (coord(0.0, 0.0), coord(0.0, 180.0)),
            (coord(90.0, 0.0), coord(-90.0, 0.0)),
            (coord(-45.0, -170.0), coord(45.0, 170.0)),
        ];
        for (a, b) in pairs {
            assert!(haversine_m(&a, &b) >= 0.0);
        }
    }

    #[test]
    fn ninety_meter_scale_latitude_offset() {
        // 0.0009 degrees of latitude is ~100 m anywhere on the sphere.
        let a = coord(52.0000, 5.0000);
        let b = coord(52.0009, 5.0000);
        let d = haversine_m(&a, &b);
        assert!((90.0..110.0).contains(&d), "got {} m", d);
    }

    #[test]
    fn antipodal_is_half_circumference() {
        let a = coord(0.0, 0.0);
        let b = coord(0.0, 180.0);
        let d = haversine_m(&a, &b);
        let half = std::f64::consts::PI * 6_371_000.0;
        assert!((d - half).abs() < 1.0);
    }

    #[test]
    fn utrecht_to_rotterdam_plausible() {
        // ~57 km as the crow flies
        let a = coord(52.0907, 5.1214);
        let b = coord(51.9244, 4.4777);
        let d = haversine_m(&a, &b);
        assert!((45_000.0..60_000.0).contains(&d), "got {} m", d);
    }
}
