use crate::errors::{AppError, AppResult};
use serde::{Deserialize, Serialize};

/// A captured or registered position: signed decimal degrees plus the
/// optional accuracy radius (meters) reported by the positioning source.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub latitude: f64,
    pub longitude: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub accuracy: Option<f64>,
}

impl Coordinate {
    pub fn new(latitude: f64, longitude: f64) -> AppResult<Self> {
        if !latitude.is_finite() || !(-90.0..=90.0).contains(&latitude) {
            return Err(AppError::InvalidCoordinate(format!(
                "latitude {} out of range [-90, 90]",
                latitude
            )));
        }
        if !longitude.is_finite() || !(-180.0..=180.0).contains(&longitude) {
            return Err(AppError::InvalidCoordinate(format!(
                "longitude {} out of range [-180, 180]",
                longitude
            )));
        }
        Ok(Self {
            latitude,
            longitude,
            accuracy: None,
        })
    }

    pub fn with_accuracy(latitude: f64, longitude: f64, accuracy: Option<f64>) -> AppResult<Self> {
        let mut c = Self::new(latitude, longitude)?;
        c.accuracy = accuracy;
        Ok(c)
    }

    /// Parse a CLI coordinate string: `"lat,lon"` or `"lat,lon,accuracy"`.
    pub fn parse(s: &str) -> AppResult<Self> {
        let parts: Vec<&str> = s.split(',').map(str::trim).collect();

        if parts.len() < 2 || parts.len() > 3 {
            return Err(AppError::InvalidCoordinate(format!(
                "'{}': expected 'lat,lon' or 'lat,lon,accuracy'",
                s
            )));
        }

        let lat: f64 = parts[0]
            .parse()
            .map_err(|_| AppError::InvalidCoordinate(format!("invalid latitude '{}'", parts[0])))?;
        let lon: f64 = parts[1].parse().map_err(|_| {
            AppError::InvalidCoordinate(format!("invalid longitude '{}'", parts[1]))
        })?;

        let accuracy = if parts.len() == 3 {
            let acc: f64 = parts[2].parse().map_err(|_| {
                AppError::InvalidCoordinate(format!("invalid accuracy '{}'", parts[2]))
            })?;
            Some(acc)
        } else {
            None
        };

        Self::with_accuracy(lat, lon, accuracy)
    }

    /// Short human-readable rendering, e.g. `52.0907, 5.1214`.
    pub fn display_short(&self) -> String {
        format!("{:.4}, {:.4}", self.latitude, self.longitude)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_lat_lon() {
        let c = Coordinate::parse("52.0907,5.1214").unwrap();
        assert_eq!(c.latitude, 52.0907);
        assert_eq!(c.longitude, 5.1214);
        assert!(c.accuracy.is_none());
    }

    #[test]
    fn parse_with_accuracy_and_spaces() {
        let c = Coordinate::parse(" 52.0907 , 5.1214 , 12.5 ").unwrap();
        assert_eq!(c.accuracy, Some(12.5));
    }

    #[test]
    fn rejects_out_of_range() {
        assert!(Coordinate::new(90.1, 0.0).is_err());
        assert!(Coordinate::new(-90.1, 0.0).is_err());
        assert!(Coordinate::new(0.0, 180.5).is_err());
        assert!(Coordinate::new(f64::NAN, 0.0).is_err());
    }

    #[test]
    fn rejects_garbage() {
        assert!(Coordinate::parse("north,south").is_err());
        assert!(Coordinate::parse("52.0").is_err());
        assert!(Coordinate::parse("1,2,3,4").is_err());
    }

    #[test]
    fn poles_and_antimeridian_are_valid() {
        assert!(Coordinate::new(90.0, 180.0).is_ok());
        assert!(Coordinate::new(-90.0, -180.0).is_ok());
    }
}
