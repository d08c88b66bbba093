use serde::Serialize;

/// Geofence compliance classification for a captured position against a
/// project's registered location.
///
/// A verdict is derived only from the recorded coordinate and the project's
/// coordinate/radius at evaluation time. Missing project coordinates yield
/// `Indeterminate`; never a default of "within".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ComplianceVerdict {
    WithinRadius,
    OutsideRadius,
    Indeterminate,
}

impl ComplianceVerdict {
    /// Classify a computed distance against the allowed radius (meters).
    /// `None` means the distance could not be computed because the project
    /// has no registered coordinate. The boundary is inclusive: a distance
    /// exactly equal to the radius is compliant.
    pub fn evaluate(distance_m: Option<f64>, radius_m: f64) -> Self {
        match distance_m {
            None => ComplianceVerdict::Indeterminate,
            Some(d) if d <= radius_m => ComplianceVerdict::WithinRadius,
            Some(_) => ComplianceVerdict::OutsideRadius,
        }
    }

    /// Convert enum → DB string
    pub fn to_db_str(&self) -> &'static str {
        match self {
            ComplianceVerdict::WithinRadius => "within",
            ComplianceVerdict::OutsideRadius => "outside",
            ComplianceVerdict::Indeterminate => "indeterminate",
        }
    }

    /// Convert DB string → enum
    pub fn from_db_str(s: &str) -> Option<Self> {
        match s {
            "within" => Some(ComplianceVerdict::WithinRadius),
            "outside" => Some(ComplianceVerdict::OutsideRadius),
            "indeterminate" => Some(ComplianceVerdict::Indeterminate),
            _ => None,
        }
    }

    pub fn is_within(&self) -> bool {
        matches!(self, ComplianceVerdict::WithinRadius)
    }

    pub fn is_outside(&self) -> bool {
        matches!(self, ComplianceVerdict::OutsideRadius)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn boundary_is_inclusive() {
        assert_eq!(
            ComplianceVerdict::evaluate(Some(50.0), 50.0),
            ComplianceVerdict::WithinRadius
        );
        assert_eq!(
            ComplianceVerdict::evaluate(Some(51.0), 50.0),
            ComplianceVerdict::OutsideRadius
        );
    }

    #[test]
    fn zero_distance_is_within() {
        assert_eq!(
            ComplianceVerdict::evaluate(Some(0.0), 50.0),
            ComplianceVerdict::WithinRadius
        );
    }

    #[test]
    fn missing_project_location_is_indeterminate_regardless_of_values() {
        for radius in [0.0, 50.0, 10_000.0] {
            assert_eq!(
                ComplianceVerdict::evaluate(None, radius),
                ComplianceVerdict::Indeterminate
            );
        }
    }

    #[test]
    fn db_roundtrip() {
        for v in [
            ComplianceVerdict::WithinRadius,
            ComplianceVerdict::OutsideRadius,
            ComplianceVerdict::Indeterminate,
        ] {
            assert_eq!(ComplianceVerdict::from_db_str(v.to_db_str()), Some(v));
        }
        assert_eq!(ComplianceVerdict::from_db_str("close enough"), None);
    }
}
