//! Map coordinates embedded in an Event.
//!
//! [`MapCoordinates`] is a value object: it has no identifier of its own,
//! is compared by value and only exists as part of its owning record.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::validation::{Collector, FieldError, FieldErrorKind, ValidationError};

/// Inclusive latitude bound in degrees.
pub const MAX_LATITUDE: f64 = 90.0;
/// Inclusive longitude bound in degrees.
pub const MAX_LONGITUDE: f64 = 180.0;

/// A validated geographic point.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, ToSchema)]
pub struct MapCoordinates {
    latitude: f64,
    longitude: f64,
}

impl MapCoordinates {
    /// Creates a point, checking each component against its bounds.
    ///
    /// Bounds are inclusive: `(90, 180)` and `(-90, -180)` are valid.
    ///
    /// # Errors
    ///
    /// Returns a [`ValidationError`] with one `GeoRange` failure per
    /// out-of-range component.
    pub fn new(latitude: f64, longitude: f64) -> Result<Self, ValidationError> {
        let mut errors = Collector::default();
        check_latitude(&mut errors, latitude);
        check_longitude(&mut errors, longitude);
        errors.finish()?;
        Ok(Self {
            latitude,
            longitude,
        })
    }

    /// Latitude in degrees, within `[-90, 90]`.
    #[must_use]
    pub const fn latitude(&self) -> f64 {
        self.latitude
    }

    /// Longitude in degrees, within `[-180, 180]`.
    #[must_use]
    pub const fn longitude(&self) -> f64 {
        self.longitude
    }
}

/// Unvalidated coordinates as submitted; either component may be missing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct CoordinatesDraft {
    /// Latitude in degrees.
    #[serde(default)]
    pub latitude: Option<f64>,
    /// Longitude in degrees.
    #[serde(default)]
    pub longitude: Option<f64>,
}

impl CoordinatesDraft {
    /// Validates the pair as a unit: both components are required and each
    /// is range-checked independently.
    ///
    /// # Errors
    ///
    /// Returns a [`ValidationError`] naming every missing or out-of-range
    /// component.
    pub fn validate(self) -> Result<MapCoordinates, ValidationError> {
        if let (Some(latitude), Some(longitude)) = (self.latitude, self.longitude) {
            return MapCoordinates::new(latitude, longitude);
        }
        let mut errors = Collector::default();
        match self.latitude {
            Some(lat) => check_latitude(&mut errors, lat),
            None => errors.push(FieldError::new(
                "mapCoordinates.latitude",
                FieldErrorKind::Required,
                "Latitude is required",
            )),
        }
        match self.longitude {
            Some(lon) => check_longitude(&mut errors, lon),
            None => errors.push(FieldError::new(
                "mapCoordinates.longitude",
                FieldErrorKind::Required,
                "Longitude is required",
            )),
        }
        Err(errors.into_error())
    }
}

impl From<MapCoordinates> for CoordinatesDraft {
    fn from(c: MapCoordinates) -> Self {
        Self {
            latitude: Some(c.latitude),
            longitude: Some(c.longitude),
        }
    }
}

fn check_latitude(errors: &mut Collector, latitude: f64) {
    // NaN fails the range check as well.
    if !(-MAX_LATITUDE..=MAX_LATITUDE).contains(&latitude) {
        errors.push(FieldError::new(
            "mapCoordinates.latitude",
            FieldErrorKind::GeoRange,
            "Latitude must be between -90 and 90",
        ));
    }
}

fn check_longitude(errors: &mut Collector, longitude: f64) {
    if !(-MAX_LONGITUDE..=MAX_LONGITUDE).contains(&longitude) {
        errors.push(FieldError::new(
            "mapCoordinates.longitude",
            FieldErrorKind::GeoRange,
            "Longitude must be between -180 and 180",
        ));
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn bounds_are_inclusive() {
        assert!(MapCoordinates::new(90.0, 180.0).is_ok());
        assert!(MapCoordinates::new(-90.0, -180.0).is_ok());
        assert!(MapCoordinates::new(0.0, 0.0).is_ok());
    }

    #[test]
    fn latitude_91_is_a_geo_range_error() {
        let Err(err) = MapCoordinates::new(91.0, 10.0) else {
            panic!("latitude 91 must fail");
        };
        assert!(err.is_geo_range());
        assert_eq!(err.field_names(), vec!["mapCoordinates.latitude"]);
    }

    #[test]
    fn components_checked_independently() {
        let Err(err) = MapCoordinates::new(-90.5, 180.01) else {
            panic!("both components out of range");
        };
        assert_eq!(
            err.field_names(),
            vec!["mapCoordinates.latitude", "mapCoordinates.longitude"]
        );
    }

    #[test]
    fn nan_is_out_of_range() {
        assert!(MapCoordinates::new(f64::NAN, 0.0).is_err());
    }

    #[test]
    fn draft_requires_both_components() {
        let draft = CoordinatesDraft {
            latitude: Some(12.9),
            longitude: None,
        };
        let Err(err) = draft.validate() else {
            panic!("missing longitude must fail");
        };
        assert_eq!(
            err.message_for("mapCoordinates.longitude"),
            Some("Longitude is required")
        );
        assert!(!err.is_geo_range());
    }

    #[test]
    fn draft_round_trips_through_value() {
        let Ok(point) = MapCoordinates::new(28.61, 77.21) else {
            panic!("valid point");
        };
        let back = CoordinatesDraft::from(point).validate().ok();
        assert_eq!(back, Some(point));
    }

    #[test]
    fn serializes_without_identifier() {
        let Ok(point) = MapCoordinates::new(1.5, -2.5) else {
            panic!("valid point");
        };
        let json = serde_json::to_value(point).unwrap_or_default();
        assert_eq!(json, serde_json::json!({ "latitude": 1.5, "longitude": -2.5 }));
    }
}
