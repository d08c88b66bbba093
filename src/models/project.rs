use crate::geo::distance::haversine_m;
use crate::models::coordinate::Coordinate;
use crate::models::verdict::ComplianceVerdict;
use serde::Serialize;

/// A work site employees clock in and out of. The registered coordinate and
/// allowed radius together form the project's geofence; both are optional
/// (a project without a coordinate cannot be checked and yields
/// indeterminate verdicts).
#[derive(Debug, Clone, Serialize)]
pub struct Project {
    pub id: i64,
    pub name: String,
    pub company: String,
    pub address: String,
    pub coordinate: Option<Coordinate>,
    pub radius_m: Option<f64>,
    pub created_at: String,
}

impl Project {
    /// The radius that governs this project's geofence: its configured
    /// value, or the global default when none is set.
    pub fn effective_radius_m(&self, default_radius_m: f64) -> f64 {
        self.radius_m.unwrap_or(default_radius_m)
    }

    /// Distance from a captured position to the registered coordinate, or
    /// `None` when the project has no coordinate.
    pub fn distance_from(&self, position: &Coordinate) -> Option<f64> {
        self.coordinate.as_ref().map(|c| haversine_m(c, position))
    }

    /// Distance and geofence verdict for a captured position, in one step.
    pub fn check_position(
        &self,
        position: &Coordinate,
        default_radius_m: f64,
    ) -> (Option<f64>, ComplianceVerdict) {
        let distance = self.distance_from(position);
        let verdict =
            ComplianceVerdict::evaluate(distance, self.effective_radius_m(default_radius_m));
        (distance, verdict)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn project(coordinate: Option<Coordinate>, radius_m: Option<f64>) -> Project {
        Project {
            id: 1,
            name: "Kantoor Noord".into(),
            company: "The Global".into(),
            address: "".into(),
            coordinate,
            radius_m,
            created_at: "2025-01-01T00:00:00+00:00".into(),
        }
    }

    #[test]
    fn no_coordinate_yields_indeterminate() {
        let p = project(None, Some(50.0));
        let here = Coordinate::new(52.0, 5.0).unwrap();
        let (d, v) = p.check_position(&here, 50.0);
        assert!(d.is_none());
        assert_eq!(v, ComplianceVerdict::Indeterminate);
    }

    #[test]
    fn default_radius_applies_when_unset() {
        let site = Coordinate::new(52.0, 5.0).unwrap();
        let p = project(Some(site), None);
        // ~100 m north of the site: outside the 50 m default,
        // inside a configured 200 m radius.
        let near = Coordinate::new(52.0009, 5.0).unwrap();

        let (_, v) = p.check_position(&near, 50.0);
        assert_eq!(v, ComplianceVerdict::OutsideRadius);

        let wide = project(Some(site), Some(200.0));
        let (_, v) = wide.check_position(&near, 50.0);
        assert_eq!(v, ComplianceVerdict::WithinRadius);
    }

    #[test]
    fn at_the_site_is_within() {
        let site = Coordinate::new(52.0, 5.0).unwrap();
        let p = project(Some(site), Some(50.0));
        let (d, v) = p.check_position(&site, 50.0);
        assert_eq!(d, Some(0.0));
        assert!(v.is_within());
    }
}
